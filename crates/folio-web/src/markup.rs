#![forbid(unsafe_code)]

//! Class names and tooltip markup shared with the page stylesheet.

use folio_core::TooltipContent;
use folio_core::placement::Side;

/// Added to the element a tour step points at.
pub const HIGHLIGHT_CLASS: &str = "mobile-highlight";
/// Tooltip container.
pub const TOOLTIP_CLASS: &str = "mobile-tooltip";
pub const TOOLTIP_CONTENT_CLASS: &str = "tooltip-content";
pub const TOOLTIP_PROGRESS_CLASS: &str = "tooltip-progress";
pub const TOOLTIP_STEP_CLASS: &str = "tooltip-step";
pub const TOOLTIP_SKIP_CLASS: &str = "tooltip-skip";
pub const TOOLTIP_NEXT_CLASS: &str = "tooltip-next";

pub const DARK_THEME_CLASS: &str = "dark-theme";
pub const ACTIVE_CLASS: &str = "active";
pub const BACK_TO_TOP_CLASS: &str = "back-to-top";
pub const THEME_MODE_CLASS: &str = "theme-mode";
pub const VISIBLE_CLASS: &str = "visible";

/// Keeps the tooltip above page content.
pub const TOOLTIP_Z_INDEX: &str = "10000";

/// Escape text for insertion into HTML element content or a quoted
/// attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Inner HTML of the tooltip container.
pub fn tooltip_inner_html(content: &TooltipContent<'_>) -> String {
    let next_label = if content.is_last() { "Done" } else { "Got it" };
    format!(
        concat!(
            r#"<div class="{content}">"#,
            "<p>{message}</p>",
            r#"<div class="{progress}">"#,
            r#"<span class="{step}">{label}</span>"#,
            r#"<button class="{skip}" aria-label="Skip tour">Skip</button>"#,
            r#"<button class="{next}" aria-label="Next tip">{next_label}</button>"#,
            "</div></div>"
        ),
        content = TOOLTIP_CONTENT_CLASS,
        message = escape_html(content.message),
        progress = TOOLTIP_PROGRESS_CLASS,
        step = TOOLTIP_STEP_CLASS,
        label = content.progress_label(),
        skip = TOOLTIP_SKIP_CLASS,
        next = TOOLTIP_NEXT_CLASS,
        next_label = next_label,
    )
}

/// Value of the tooltip's `data-side` attribute.
pub fn side_attr(side: Side) -> &'static str {
    side.as_str()
}

/// `"12.5px"`.
pub fn px(value: f64) -> String {
    format!("{value}px")
}

/// Class selector for a class name.
pub fn class_selector(class: &str) -> String {
    format!(".{class}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("Theme toggle • plain"), "Theme toggle • plain");
    }

    #[test]
    fn tooltip_markup_has_hooks() {
        let content = TooltipContent {
            message: "Tap <here>",
            index: 1,
            count: 5,
        };
        let html = tooltip_inner_html(&content);
        assert!(html.starts_with(r#"<div class="tooltip-content"><p>Tap &lt;here&gt;</p>"#));
        assert!(html.contains(r#"<span class="tooltip-step">2/5</span>"#));
        assert!(html.contains(r#"class="tooltip-skip""#));
        assert!(html.contains(
            r#"<button class="tooltip-next" aria-label="Next tip">Got it</button>"#
        ));
    }

    #[test]
    fn last_step_says_done() {
        let content = TooltipContent {
            message: "Print",
            index: 4,
            count: 5,
        };
        assert!(tooltip_inner_html(&content).contains(">Done</button>"));
    }

    #[test]
    fn small_helpers() {
        assert_eq!(px(12.5), "12.5px");
        assert_eq!(px(10.0), "10px");
        assert_eq!(class_selector(TOOLTIP_NEXT_CLASS), ".tooltip-next");
        assert_eq!(side_attr(Side::Left), "left");
    }
}
