#![forbid(unsafe_code)]

//! Tour step catalog.
//!
//! An ordered list of steps, fixed at configuration time. Insertion order is
//! display order. Steps refer to their targets by selector; the host decides
//! whether a selector resolves to anything on the current page.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::placement::Placement;

/// Selector identifying a step's target element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetSelector(String);

impl TargetSelector {
    pub fn new(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetSelector {
    fn from(selector: &str) -> Self {
        Self::new(selector)
    }
}

/// Demo action run by the host when a step is left by auto-advance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "arg", rename_all = "snake_case")]
pub enum StepAction {
    /// Switch the skills tab strip to the given tab.
    ActivateTab(String),
    /// Scroll the page back to the top (the smart button's second mode).
    ScrollToTop,
}

/// One entry in the tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourStep {
    pub target: TargetSelector,
    pub message: String,
    #[serde(default)]
    pub placement: Placement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<StepAction>,
}

impl TourStep {
    pub fn new(
        target: impl Into<String>,
        message: impl Into<String>,
        placement: Placement,
    ) -> Self {
        Self {
            target: TargetSelector::new(target),
            message: message.into(),
            placement,
            action: None,
        }
    }

    /// Attach a demo action.
    #[must_use]
    pub fn with_action(mut self, action: StepAction) -> Self {
        self.action = Some(action);
        self
    }
}

/// Ordered tour steps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepCatalog {
    steps: Vec<TourStep>,
}

impl StepCatalog {
    pub fn new(steps: Vec<TourStep>) -> Self {
        Self { steps }
    }

    /// The first-visit tour shown on phones.
    pub fn mobile_intro() -> Self {
        Self::new(vec![
            TourStep::new(
                ".whatsapp-item",
                "Tap to contact me directly on WhatsApp",
                Placement::Bottom,
            ),
            TourStep::new(
                "#smartActionBtn",
                "Theme toggle • Switches to \"Back to Top\" when scrolling",
                Placement::Left,
            )
            .with_action(StepAction::ScrollToTop),
            TourStep::new(
                "#bottomNav",
                "Swipe or tap icons to navigate sections",
                Placement::Top,
            ),
            TourStep::new(
                "#skillsTabs",
                "Tap to switch between Technical and Business skills",
                Placement::Top,
            )
            .with_action(StepAction::ActivateTab("business".to_string())),
            TourStep::new("#printBtn", "Tap for printer-friendly resume", Placement::Left),
        ])
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TourStep> {
        self.steps.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TourStep> {
        self.steps.iter()
    }

    /// Problems that make a catalog unusable, one message per step.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for (index, step) in self.steps.iter().enumerate() {
            if step.target.as_str().trim().is_empty() {
                errors.push(format!("steps[{index}].target must not be empty"));
            }
            if step.message.trim().is_empty() {
                errors.push(format!("steps[{index}].message must not be empty"));
            }
            if let Some(StepAction::ActivateTab(tab)) = &step.action {
                if tab.trim().is_empty() {
                    errors.push(format!("steps[{index}].action tab id must not be empty"));
                }
            }
        }
        errors
    }
}

impl FromIterator<TourStep> for StepCatalog {
    fn from_iter<I: IntoIterator<Item = TourStep>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
