#![forbid(unsafe_code)]

//! Site configuration.
//!
//! Captures every tunable of the page behavior as a single [`SiteConfig`]
//! that the page can hand over as JSON at boot, so timing constants and
//! selectors do not require a rebuild.
//!
//! # Loading
//!
//! ```
//! use folio_core::config::SiteConfig;
//!
//! let config = SiteConfig::from_json_str(r#"{
//!     "tour": { "auto_advance_ms": 3000 },
//!     "log_level": "debug"
//! }"#).unwrap();
//! assert_eq!(config.tour.auto_advance_ms, 3000);
//! assert_eq!(config.tour.start_delay_ms, 800);
//! ```
//!
//! # Defaults
//!
//! Every field has a default matching the page's stock markup, so
//! `SiteConfig::default()` works on the shipped page without any JSON.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::StepCatalog;
use crate::device::DeviceConfig;
use crate::placement::DEFAULT_MARGIN;

// ---------------------------------------------------------------------------
// Top-level SiteConfig
// ---------------------------------------------------------------------------

/// Top-level configuration for the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Guided tour timing and behavior.
    pub tour: TourConfig,
    /// Mobile classification.
    pub device: DeviceConfig,
    /// Theme persistence.
    pub theme: ThemeConfig,
    /// Scroll-spy and section navigation.
    pub navigation: NavigationConfig,
    /// DOM hooks the page wiring looks up.
    pub selectors: SelectorConfig,
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    pub log_level: String,
    /// Tour steps; `None` uses [`StepCatalog::mobile_intro`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<StepCatalog>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            tour: TourConfig::default(),
            device: DeviceConfig::default(),
            theme: ThemeConfig::default(),
            navigation: NavigationConfig::default(),
            selectors: SelectorConfig::default(),
            log_level: "info".to_string(),
            steps: None,
        }
    }
}

impl SiteConfig {
    /// Load from a JSON string and validate.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// The tour catalog to use.
    pub fn catalog(&self) -> StepCatalog {
        self.steps.clone().unwrap_or_else(StepCatalog::mobile_intro)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let tour = &self.tour;
        if tour.auto_advance_ms == 0 {
            errors.push("tour.auto_advance_ms must be > 0".to_string());
        }
        if !tour.margin.is_finite() || tour.margin < 0.0 {
            errors.push(format!(
                "tour.margin must be a finite value >= 0, got {}",
                tour.margin
            ));
        }
        if !tour.gap.is_finite() || tour.gap < 0.0 {
            errors.push(format!(
                "tour.gap must be a finite value >= 0, got {}",
                tour.gap
            ));
        }
        if tour.seen_flag_key.trim().is_empty() {
            errors.push("tour.seen_flag_key must not be empty".to_string());
        }

        if !self.device.max_mobile_width.is_finite() || self.device.max_mobile_width < 0.0 {
            errors.push(format!(
                "device.max_mobile_width must be a finite value >= 0, got {}",
                self.device.max_mobile_width
            ));
        }

        if self.theme.storage_key.trim().is_empty() {
            errors.push("theme.storage_key must not be empty".to_string());
        }
        if self.theme.storage_key == tour.seen_flag_key {
            errors.push("theme.storage_key and tour.seen_flag_key must differ".to_string());
        }

        let nav = &self.navigation;
        for (name, value) in [
            ("navigation.probe_offset", nav.probe_offset),
            ("navigation.scroll_offset", nav.scroll_offset),
            ("navigation.back_to_top_threshold", nav.back_to_top_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{name} must be a finite value >= 0, got {value}"));
            }
        }
        if nav.sections.iter().any(|id| id.trim().is_empty()) {
            errors.push("navigation.sections must not contain empty ids".to_string());
        }

        if !matches!(
            self.log_level.to_ascii_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error" | "off"
        ) {
            errors.push(format!("log_level {:?} is not a known level", self.log_level));
        }

        if let Some(steps) = &self.steps {
            errors.extend(steps.validate());
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// When the sequencer scrolls a step's target into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollIntoView {
    /// Only for the first step shown.
    FirstStep,
    /// For every step except the first.
    AfterFirst,
    /// For every step.
    #[default]
    Always,
    /// Never.
    Never,
}

impl ScrollIntoView {
    /// Whether the step at `index` should be scrolled into view.
    pub fn applies_to(self, index: usize) -> bool {
        match self {
            Self::FirstStep => index == 0,
            Self::AfterFirst => index > 0,
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Guided tour parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    /// Dwell time before a step auto-advances.
    pub auto_advance_ms: u64,
    /// Delay between page-ready and the first step.
    pub start_delay_ms: u64,
    /// Distance kept between tooltip and viewport edges.
    pub margin: f64,
    /// Distance between tooltip and target.
    pub gap: f64,
    pub scroll_into_view: ScrollIntoView,
    /// Taps outside the highlighted target also advance.
    pub advance_on_tap_anywhere: bool,
    /// Storage key of the "has seen intro" flag.
    pub seen_flag_key: String,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            auto_advance_ms: 5000,
            start_delay_ms: 800,
            margin: DEFAULT_MARGIN,
            gap: DEFAULT_MARGIN,
            scroll_into_view: ScrollIntoView::Always,
            advance_on_tap_anywhere: true,
            seen_flag_key: "hasSeenMobileIntro".to_string(),
        }
    }
}

impl TourConfig {
    pub fn auto_advance(&self) -> Duration {
        Duration::from_millis(self.auto_advance_ms)
    }

    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }
}

/// Theme persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub storage_key: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "theme".to_string(),
        }
    }
}

/// Scroll-spy, smart button and section navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Added to the scroll position when probing for the active section.
    pub probe_offset: f64,
    /// Space left above a section when scrolling to it.
    pub scroll_offset: f64,
    /// Scroll position past which the smart button turns into "Back to Top".
    pub back_to_top_threshold: f64,
    pub scroll_debounce_ms: u64,
    /// Section ids in page order.
    pub sections: Vec<String>,
    /// Section whose nav item also resets the skills tabs.
    pub skills_section: String,
    pub skills_default_tab: String,
    pub skills_tab_delay_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            probe_offset: 100.0,
            scroll_offset: 20.0,
            back_to_top_threshold: 300.0,
            scroll_debounce_ms: 50,
            sections: ["about", "experience", "skills", "keypoints", "focus"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            skills_section: "skills".to_string(),
            skills_default_tab: "technical".to_string(),
            skills_tab_delay_ms: 300,
        }
    }
}

impl NavigationConfig {
    pub fn scroll_debounce(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_ms)
    }

    pub fn skills_tab_delay(&self) -> Duration {
        Duration::from_millis(self.skills_tab_delay_ms)
    }
}

/// Selectors for the page's interactive elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub smart_button: String,
    pub print_button: String,
    pub nav_items: String,
    pub tabs: String,
    pub tab_panels: String,
    /// Element faded in on load.
    pub profile_name: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            smart_button: "#smartActionBtn".to_string(),
            print_button: "#printBtn".to_string(),
            nav_items: ".nav-item".to_string(),
            tabs: ".tab".to_string(),
            tab_panels: ".tab-content".to_string(),
            profile_name: ".profile-title h1".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a site configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
    /// The user-agent marker list did not compile.
    Pattern(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
            Self::Pattern(e) => write!(f, "invalid agent pattern: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Validation(_) | Self::Pattern(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_is_valid() {
        assert!(SiteConfig::default().validate().is_empty());
    }

    #[test]
    fn empty_json_yields_defaults() {
        let config = SiteConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.catalog(), StepCatalog::mobile_intro());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = SiteConfig::from_json_str(
            r#"{"tour": {"auto_advance_ms": 8000, "scroll_into_view": "after_first"},
                "navigation": {"sections": ["about", "skills"]}}"#,
        )
        .unwrap();
        assert_eq!(config.tour.auto_advance(), Duration::from_secs(8));
        assert_eq!(config.tour.scroll_into_view, ScrollIntoView::AfterFirst);
        assert_eq!(config.tour.start_delay(), Duration::from_millis(800));
        assert_eq!(config.navigation.sections, vec!["about", "skills"]);
        assert_eq!(config.navigation.probe_offset, 100.0);
    }

    #[test]
    fn custom_steps_replace_catalog() {
        let config = SiteConfig::from_json_str(
            r##"{"steps": [{"target": "#bottomNav", "message": "Navigate", "placement": "top"}]}"##,
        )
        .unwrap();
        assert_eq!(config.catalog().len(), 1);
    }

    #[test]
    fn validation_collects_every_problem() {
        let err = SiteConfig::from_json_str(
            r#"{"tour": {"auto_advance_ms": 0, "margin": -1.0},
                "log_level": "loud",
                "steps": [{"target": "", "message": "m"}]}"#,
        )
        .unwrap_err();
        let errors = match err {
            ConfigError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other}"),
        };
        assert_eq!(errors.len(), 4, "{errors:?}");
        assert!(errors.iter().any(|e| e.contains("auto_advance_ms")));
        assert!(errors.iter().any(|e| e.contains("tour.margin")));
        assert!(errors.iter().any(|e| e.contains("log_level")));
        assert!(errors.iter().any(|e| e.contains("steps[0].target")));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = SiteConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().starts_with("JSON parse error"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn clashing_flag_keys_are_rejected() {
        let mut config = SiteConfig::default();
        config.theme.storage_key = config.tour.seen_flag_key.clone();
        assert_eq!(
            config.validate(),
            vec!["theme.storage_key and tour.seen_flag_key must differ".to_string()]
        );
    }

    #[test]
    fn scroll_policy_applies_to_expected_steps() {
        assert!(ScrollIntoView::FirstStep.applies_to(0));
        assert!(!ScrollIntoView::FirstStep.applies_to(1));
        assert!(!ScrollIntoView::AfterFirst.applies_to(0));
        assert!(ScrollIntoView::AfterFirst.applies_to(3));
        assert!(ScrollIntoView::Always.applies_to(2));
        assert!(!ScrollIntoView::Never.applies_to(0));
    }
}
