#![forbid(unsafe_code)]

//! Device classification.
//!
//! Decides whether the current viewport/agent counts as "mobile". The
//! classifier is pure; hosts hand it a fresh [`DeviceSnapshot`] every time so
//! rotating a phone or resizing a window is picked up without caching.

use regex_lite::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Viewport widths at or below this count as mobile.
pub const DEFAULT_MAX_MOBILE_WIDTH: f64 = 768.0;

/// User-agent fragments that identify handheld browsers.
pub const DEFAULT_AGENT_MARKERS: &[&str] = &[
    "Android",
    "webOS",
    "iPhone",
    "iPad",
    "iPod",
    "BlackBerry",
    "IEMobile",
    "Opera Mini",
];

/// What the host knows about the device right now.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeviceSnapshot {
    pub user_agent: String,
    pub viewport_width: f64,
}

impl DeviceSnapshot {
    pub fn new(user_agent: impl Into<String>, viewport_width: f64) -> Self {
        Self {
            user_agent: user_agent.into(),
            viewport_width,
        }
    }
}

/// Classifier settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub max_mobile_width: f64,
    pub agent_markers: Vec<String>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            max_mobile_width: DEFAULT_MAX_MOBILE_WIDTH,
            agent_markers: DEFAULT_AGENT_MARKERS
                .iter()
                .map(|marker| (*marker).to_string())
                .collect(),
        }
    }
}

/// Compiled mobile classifier.
#[derive(Debug, Clone)]
pub struct DeviceClassifier {
    max_mobile_width: f64,
    agent_pattern: Option<Regex>,
}

impl Default for DeviceClassifier {
    fn default() -> Self {
        Self::from_config(&DeviceConfig::default())
            .unwrap_or_else(|_| Self::width_only(DEFAULT_MAX_MOBILE_WIDTH))
    }
}

impl DeviceClassifier {
    /// Build a classifier. Markers are matched literally and
    /// case-insensitively; an empty list disables agent matching.
    pub fn from_config(config: &DeviceConfig) -> Result<Self, ConfigError> {
        let alternatives: Vec<String> = config
            .agent_markers
            .iter()
            .map(|marker| marker.trim())
            .filter(|marker| !marker.is_empty())
            .map(regex_lite::escape)
            .collect();

        let agent_pattern = if alternatives.is_empty() {
            None
        } else {
            let pattern = RegexBuilder::new(&alternatives.join("|"))
                .case_insensitive(true)
                .build()
                .map_err(|err| ConfigError::Pattern(err.to_string()))?;
            Some(pattern)
        };

        Ok(Self {
            max_mobile_width: config.max_mobile_width,
            agent_pattern,
        })
    }

    /// A classifier that only looks at viewport width.
    pub fn width_only(max_mobile_width: f64) -> Self {
        Self {
            max_mobile_width,
            agent_pattern: None,
        }
    }

    pub fn is_mobile(&self, device: &DeviceSnapshot) -> bool {
        let narrow =
            device.viewport_width.is_finite() && device.viewport_width <= self.max_mobile_width;
        narrow
            || self
                .agent_pattern
                .as_ref()
                .is_some_and(|pattern| pattern.is_match(&device.user_agent))
    }
}
