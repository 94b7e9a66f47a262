#![forbid(unsafe_code)]

//! Section navigation: scroll-spy and the smart action button.
//!
//! Everything here is a pure function of scroll position and section
//! geometry. The web crate measures, calls in, and applies classes.

use serde::{Deserialize, Serialize};

use crate::config::NavigationConfig;

/// What the floating action button does at the current scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmartButtonMode {
    /// Near the top: toggles the theme.
    Theme,
    /// Scrolled down: returns to the top.
    BackToTop,
}

impl SmartButtonMode {
    /// `BackToTop` once `scroll_y` is strictly past `threshold`.
    pub fn for_scroll(scroll_y: f64, threshold: f64) -> Self {
        if scroll_y > threshold {
            Self::BackToTop
        } else {
            Self::Theme
        }
    }

    pub const fn title(self) -> Option<&'static str> {
        match self {
            Self::Theme => None,
            Self::BackToTop => Some("Back to Top"),
        }
    }

    pub const fn icon_class(self) -> Option<&'static str> {
        match self {
            Self::Theme => None,
            Self::BackToTop => Some("fas fa-arrow-up"),
        }
    }
}

/// Document-relative geometry of one page section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    /// Half-open `[top, top + height)`.
    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Picks the section the reader is looking at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSpy {
    probe_offset: f64,
    scroll_offset: f64,
    back_to_top_threshold: f64,
}

impl Default for ScrollSpy {
    fn default() -> Self {
        Self::from_config(&NavigationConfig::default())
    }
}

impl ScrollSpy {
    pub fn from_config(config: &NavigationConfig) -> Self {
        Self {
            probe_offset: config.probe_offset,
            scroll_offset: config.scroll_offset,
            back_to_top_threshold: config.back_to_top_threshold,
        }
    }

    /// First section, in page order, containing `scroll_y + probe_offset`.
    pub fn active_section<'a>(
        &self,
        scroll_y: f64,
        sections: &'a [SectionBounds],
    ) -> Option<&'a str> {
        let probe = scroll_y + self.probe_offset;
        sections
            .iter()
            .find(|section| section.contains(probe))
            .map(|section| section.id.as_str())
    }

    /// Scroll target for a section whose top is `viewport_top` pixels below
    /// the viewport while the page is scrolled to `page_y`.
    pub fn section_scroll_top(&self, viewport_top: f64, page_y: f64) -> f64 {
        (viewport_top + page_y - self.scroll_offset).max(0.0)
    }

    pub fn button_mode(&self, scroll_y: f64) -> SmartButtonMode {
        SmartButtonMode::for_scroll(scroll_y, self.back_to_top_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<SectionBounds> {
        vec![
            SectionBounds::new("about", 0.0, 600.0),
            SectionBounds::new("experience", 600.0, 900.0),
            SectionBounds::new("skills", 1500.0, 500.0),
        ]
    }

    #[test]
    fn probe_is_offset_from_scroll() {
        let spy = ScrollSpy::default();
        let sections = sections();
        assert_eq!(spy.active_section(0.0, &sections), Some("about"));
        assert_eq!(spy.active_section(499.0, &sections), Some("about"));
        assert_eq!(spy.active_section(500.0, &sections), Some("experience"));
        assert_eq!(spy.active_section(1400.0, &sections), Some("skills"));
    }

    #[test]
    fn past_last_section_is_none() {
        let spy = ScrollSpy::default();
        assert_eq!(spy.active_section(1900.0, &sections()), None);
        assert_eq!(spy.active_section(0.0, &[]), None);
    }

    #[test]
    fn first_match_wins_on_overlap() {
        let spy = ScrollSpy::default();
        let overlapping = vec![
            SectionBounds::new("a", 0.0, 500.0),
            SectionBounds::new("b", 50.0, 500.0),
        ];
        assert_eq!(spy.active_section(0.0, &overlapping), Some("a"));
    }

    #[test]
    fn section_scroll_leaves_offset() {
        let spy = ScrollSpy::default();
        assert_eq!(spy.section_scroll_top(300.0, 1000.0), 1280.0);
        assert_eq!(spy.section_scroll_top(5.0, 0.0), 0.0);
    }

    #[test]
    fn button_switches_strictly_past_threshold() {
        let spy = ScrollSpy::default();
        assert_eq!(spy.button_mode(300.0), SmartButtonMode::Theme);
        assert_eq!(spy.button_mode(300.5), SmartButtonMode::BackToTop);
        assert_eq!(SmartButtonMode::BackToTop.title(), Some("Back to Top"));
        assert_eq!(SmartButtonMode::Theme.icon_class(), None);
    }
}
