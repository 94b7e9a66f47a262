#![forbid(unsafe_code)]

//! Folio Core
//!
//! Host-independent behavior for the folio portfolio page.
//!
//! # Key Components
//!
//! - [`TourSequencer`] - First-visit guided tour state machine
//! - [`Placer`] - Tooltip placement with flip and clamp
//! - [`DeviceClassifier`] - Mobile detection from viewport width and agent
//! - [`PersistedFlag`] - Typed handle over a [`FlagStore`]
//! - [`ThemeToggle`], [`ScrollSpy`], [`TabSwitcher`] - Page collaborators
//! - [`SiteConfig`] - JSON-loadable configuration
//!
//! # How it fits in the system
//! Nothing here touches a browser. The sequencer talks to its environment
//! through the [`TourHost`] traits; `folio-web` implements them over the DOM
//! and [`headless::HeadlessHost`] implements them for tests with a virtual
//! clock.

pub mod catalog;
pub mod config;
pub mod device;
pub mod error;
pub mod flags;
pub mod geometry;
pub mod headless;
pub mod host;
pub mod nav;
pub mod placement;
pub mod tabs;
pub mod theme;
pub mod tour;

pub use catalog::{StepAction, StepCatalog, TargetSelector, TourStep};
pub use config::{ConfigError, SiteConfig, TourConfig};
pub use device::{DeviceClassifier, DeviceSnapshot};
pub use error::{Error, Result};
pub use flags::{FlagError, FlagStore, MemoryFlagStore, PersistedFlag};
pub use geometry::{Rect, Size};
pub use host::{TapTarget, TimerHost, TimerId, TooltipContent, TourHost, TourSurface};
pub use nav::{ScrollSpy, SectionBounds, SmartButtonMode};
pub use placement::{Placement, Placer, Side, TooltipPlacement};
pub use tabs::TabSwitcher;
pub use theme::{ThemePreference, ThemeToggle};
pub use tour::{AdvanceReason, CompletionReason, TourEvent, TourPhase, TourSequencer, TourState};
