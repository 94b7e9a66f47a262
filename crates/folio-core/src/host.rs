#![forbid(unsafe_code)]

//! Host capabilities the tour sequencer drives.
//!
//! The sequencer never touches a rendering surface, a clock or storage
//! directly. A host (the DOM binding in `folio-web`, or
//! [`HeadlessHost`](crate::headless::HeadlessHost) in tests) implements three
//! seams:
//!
//! - [`TourSurface`]: target lookup, highlight decoration, tooltip lifecycle,
//!   scrolling and demo actions.
//! - [`TimerHost`]: fire-once timers identified by [`TimerId`]. When a timer
//!   elapses the host calls back into the sequencer with that id.
//! - [`FlagStore`]: persisted flags.

use core::time::Duration;

use crate::catalog::{StepAction, TargetSelector};
use crate::device::DeviceSnapshot;
use crate::flags::FlagStore;
use crate::geometry::{Rect, Size};
use crate::placement::TooltipPlacement;

/// Identity of one armed timer. Ids are never reused within a sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Fire-once timers.
pub trait TimerHost {
    /// Arrange for the sequencer to be told about `id` after `delay`.
    fn arm_timer(&mut self, id: TimerId, delay: Duration);

    /// Cancel a previously armed timer. Cancelling an unknown or already
    /// fired id is a no-op.
    fn cancel_timer(&mut self, id: TimerId);
}

/// What a tap landed on, as classified by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapTarget {
    /// The currently highlighted target (or something inside it).
    Highlighted,
    /// Anywhere else on the page.
    Elsewhere,
    /// The print control; never advances the tour.
    PrintControl,
    /// The tooltip itself, outside its controls.
    TooltipBody,
    /// The tooltip's "next" control.
    NextControl,
    /// The tooltip's "skip" control.
    SkipControl,
}

/// Everything a host needs to render one tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipContent<'a> {
    pub message: &'a str,
    /// Zero-based step index.
    pub index: usize,
    pub count: usize,
}

impl TooltipContent<'_> {
    /// Progress label, e.g. `"2/5"`.
    pub fn progress_label(&self) -> String {
        format!("{}/{}", self.index + 1, self.count)
    }

    /// Accessible label for the tooltip container.
    pub fn aria_label(&self) -> String {
        format!("Tip: {}", self.message)
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.count
    }
}

/// Rendering surface for the tour.
pub trait TourSurface {
    /// Current device characteristics, read fresh on every call.
    fn device(&self) -> DeviceSnapshot;

    /// Visible viewport size.
    fn viewport(&self) -> Size;

    /// Resolve a target and report its viewport-relative bounds. `None`
    /// means the target does not exist on this page.
    fn target_bounds(&mut self, target: &TargetSelector) -> Option<Rect>;

    /// Scroll the target into view.
    fn scroll_into_view(&mut self, target: &TargetSelector);

    /// Decorate the target with the highlight marker.
    fn highlight(&mut self, target: &TargetSelector);

    /// Remove the highlight marker from whatever is decorated.
    fn clear_highlight(&mut self);

    /// Create the tooltip and return its measured size.
    fn mount_tooltip(&mut self, content: &TooltipContent<'_>) -> Size;

    /// Move the mounted tooltip.
    fn position_tooltip(&mut self, placement: &TooltipPlacement);

    /// Destroy the mounted tooltip.
    fn unmount_tooltip(&mut self);

    /// Run a step's demo action.
    fn run_action(&mut self, action: &StepAction);
}

/// Everything the sequencer needs from its environment.
pub trait TourHost: TourSurface + TimerHost + FlagStore {}

impl<T: TourSurface + TimerHost + FlagStore> TourHost for T {}
