#![forbid(unsafe_code)]

//! Light/dark theme preference.

use serde::{Deserialize, Serialize};

use crate::flags::{FlagStore, FlagValue, PersistedFlag};

/// Stored theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Icon shown on the toggle: the theme a click switches to.
    pub const fn icon_class(self) -> &'static str {
        match self {
            Self::Light => "fas fa-moon",
            Self::Dark => "fas fa-sun",
        }
    }

    /// Button title: the theme a click switches to.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Light => "Dark Mode",
            Self::Dark => "Light Mode",
        }
    }
}

impl FlagValue for ThemePreference {
    fn encode(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    fn decode(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

/// Theme state plus its persisted flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeToggle {
    current: ThemePreference,
    flag: PersistedFlag<ThemePreference>,
}

impl ThemeToggle {
    /// Restore from storage. Unset or unrecognized values mean light.
    pub fn load(store: &(impl FlagStore + ?Sized), key: impl Into<String>) -> Self {
        let flag = PersistedFlag::new(key);
        let current = flag.read(store).unwrap_or_default();
        Self { current, flag }
    }

    pub fn current(&self) -> ThemePreference {
        self.current
    }

    pub fn current_is_dark(&self) -> bool {
        self.current.is_dark()
    }

    /// Flip the theme and persist it. A failed write keeps the new theme for
    /// this page view.
    pub fn toggle(&mut self, store: &mut (impl FlagStore + ?Sized)) -> ThemePreference {
        self.current = self.current.toggled();
        if let Err(err) = self.flag.write(store, &self.current) {
            tracing::warn!(error = %err, key = self.flag.key(), "failed to persist theme");
        }
        tracing::debug!(theme = self.current.encode(), "theme toggled");
        self.current
    }
}
