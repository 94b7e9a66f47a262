#![forbid(unsafe_code)]

//! Pointer hover micro-animations.
//!
//! Each rule names a selector, the inline style applied on pointer enter and
//! the style restored on leave. Rules with `skip_active` leave elements that
//! carry the `active` class alone.

/// Inline `transform` / `box-shadow` pair. `None` leaves the property as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverStyle {
    pub transform: &'static str,
    pub box_shadow: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverRule {
    pub selector: &'static str,
    pub enter: HoverStyle,
    pub leave: HoverStyle,
    pub skip_active: bool,
}

impl HoverRule {
    /// Style to apply for a pointer transition, if any.
    pub fn style_for(&self, entering: bool, element_is_active: bool) -> Option<HoverStyle> {
        if self.skip_active && element_is_active {
            return None;
        }
        Some(if entering { self.enter } else { self.leave })
    }
}

pub const HOVER_RULES: &[HoverRule] = &[
    HoverRule {
        selector: ".card",
        enter: HoverStyle {
            transform: "translateY(-8px)",
            box_shadow: Some("0 20px 40px rgba(0, 0, 0, 0.15)"),
        },
        leave: HoverStyle {
            transform: "translateY(0)",
            box_shadow: Some("var(--box-shadow)"),
        },
        skip_active: false,
    },
    HoverRule {
        selector: ".skill-tag",
        enter: HoverStyle {
            transform: "translateY(-4px) scale(1.05)",
            box_shadow: Some("0 6px 12px rgba(255, 105, 0, 0.2)"),
        },
        leave: HoverStyle {
            transform: "translateY(0) scale(1)",
            box_shadow: Some("none"),
        },
        skip_active: false,
    },
    HoverRule {
        selector: ".nav-item",
        enter: HoverStyle {
            transform: "translateY(-4px) scale(1.1)",
            box_shadow: None,
        },
        leave: HoverStyle {
            transform: "translateY(0) scale(1)",
            box_shadow: None,
        },
        skip_active: true,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(selector: &str) -> &'static HoverRule {
        HOVER_RULES
            .iter()
            .find(|rule| rule.selector == selector)
            .unwrap()
    }

    #[test]
    fn cards_lift_and_settle() {
        let card = rule(".card");
        assert_eq!(card.style_for(true, false).unwrap().transform, "translateY(-8px)");
        assert_eq!(card.style_for(false, true).unwrap().transform, "translateY(0)");
    }

    #[test]
    fn active_nav_item_is_untouched() {
        let nav = rule(".nav-item");
        assert_eq!(nav.style_for(true, true), None);
        assert_eq!(nav.style_for(false, true), None);
        assert_eq!(nav.style_for(true, false).unwrap().box_shadow, None);
    }
}
