#![forbid(unsafe_code)]

//! Headless tour host.
//!
//! A [`TourHost`](crate::host::TourHost) with no browser behind it: targets
//! are fixed rectangles in document coordinates, timers run on a virtual
//! clock the caller advances, and every surface call is recorded so tests
//! can assert on what a real page would have seen. Scrolling a target into
//! view centers it vertically, as a smooth `scrollIntoView` would.
//!
//! ```
//! use core::time::Duration;
//! use folio_core::headless::{HeadlessHost, drive};
//! use folio_core::{SiteConfig, TourSequencer};
//!
//! let config = SiteConfig::default();
//! let mut tour = TourSequencer::from_config(&config).unwrap();
//! let mut host = HeadlessHost::phone().with_targets([".whatsapp-item", "#printBtn"]);
//!
//! assert!(tour.schedule_start(&mut host));
//! drive(&mut tour, &mut host, Duration::from_millis(800));
//! assert_eq!(tour.current_index(), Some(0));
//! ```

use std::collections::BTreeMap;

use core::time::Duration;

use crate::catalog::{StepAction, TargetSelector};
use crate::device::DeviceSnapshot;
use crate::flags::{FlagError, FlagStore, MemoryFlagStore};
use crate::geometry::{Rect, Size};
use crate::host::{TimerHost, TimerId, TooltipContent, TourSurface};
use crate::placement::TooltipPlacement;
use crate::tour::{TourEvent, TourSequencer};

const PHONE_AGENT: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";
const DESKTOP_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36";

/// Default tooltip measurement.
pub const DEFAULT_TOOLTIP_SIZE: Size = Size {
    width: 240.0,
    height: 72.0,
};

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    ScrollIntoView(String),
    Highlight(String),
    ClearHighlight,
    /// Carries the tooltip message.
    MountTooltip(String),
    PositionTooltip(TooltipPlacement),
    UnmountTooltip,
}

/// In-memory host for tests and native tools.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    device: DeviceSnapshot,
    viewport: Size,
    targets: BTreeMap<String, Rect>,
    tooltip_size: Size,
    flags: MemoryFlagStore,
    now: Duration,
    timers: BTreeMap<TimerId, Duration>,
    armed: Vec<(TimerId, Duration)>,
    cancelled: Vec<TimerId>,
    calls: Vec<SurfaceCall>,
    actions: Vec<StepAction>,
    scroll_y: f64,
    highlighted: Option<String>,
    highlight_count: usize,
    tooltip: Option<String>,
    tooltip_count: usize,
}

impl HeadlessHost {
    pub fn new(device: DeviceSnapshot, viewport: Size) -> Self {
        Self {
            device,
            viewport,
            targets: BTreeMap::new(),
            tooltip_size: DEFAULT_TOOLTIP_SIZE,
            flags: MemoryFlagStore::new(),
            now: Duration::ZERO,
            timers: BTreeMap::new(),
            armed: Vec::new(),
            cancelled: Vec::new(),
            calls: Vec::new(),
            actions: Vec::new(),
            scroll_y: 0.0,
            highlighted: None,
            highlight_count: 0,
            tooltip: None,
            tooltip_count: 0,
        }
    }

    /// A 390x844 phone.
    pub fn phone() -> Self {
        Self::new(
            DeviceSnapshot::new(PHONE_AGENT, 390.0),
            Size::new(390.0, 844.0),
        )
    }

    /// A 1280x800 desktop browser.
    pub fn desktop() -> Self {
        Self::new(
            DeviceSnapshot::new(DESKTOP_AGENT, 1280.0),
            Size::new(1280.0, 800.0),
        )
    }

    /// Add a target at an explicit document position.
    #[must_use]
    pub fn with_target(mut self, selector: impl Into<String>, bounds: Rect) -> Self {
        self.targets.insert(selector.into(), bounds);
        self
    }

    /// Add targets stacked down the page, 48px tall with 100px between
    /// their tops, inset 16px from each side.
    #[must_use]
    pub fn with_targets<I, S>(mut self, selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let width = (self.viewport.width - 32.0).max(0.0);
        for selector in selectors {
            let top = 40.0 + 100.0 * self.targets.len() as f64;
            self.targets
                .insert(selector.into(), Rect::new(16.0, top, width, 48.0));
        }
        self
    }

    /// Seed a raw flag value.
    #[must_use]
    pub fn with_flag(mut self, key: &str, value: &str) -> Self {
        self.flags = self.flags.with(key, value);
        self
    }

    /// Make every flag write fail.
    #[must_use]
    pub fn with_read_only_flags(mut self) -> Self {
        self.flags = MemoryFlagStore::read_only();
        self
    }

    #[must_use]
    pub fn with_tooltip_size(mut self, size: Size) -> Self {
        self.tooltip_size = size;
        self
    }

    /// Change the viewport, as a rotation or resize would.
    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.device.viewport_width = viewport.width;
    }

    pub fn remove_target(&mut self, selector: &str) {
        self.targets.remove(selector);
    }

    /// Current vertical document scroll offset.
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward and return the timers that came due, earliest
    /// first. Returned timers are no longer pending.
    pub fn advance_clock(&mut self, by: Duration) -> Vec<TimerId> {
        self.now = self.now.saturating_add(by);
        let mut due: Vec<(Duration, TimerId)> = self
            .timers
            .iter()
            .filter(|(_, deadline)| **deadline <= self.now)
            .map(|(id, deadline)| (*deadline, *id))
            .collect();
        due.sort();
        for (_, id) in &due {
            self.timers.remove(id);
        }
        due.into_iter().map(|(_, id)| id).collect()
    }

    /// The earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.values().min().copied()
    }

    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Demo actions run so far.
    pub fn actions(&self) -> &[StepAction] {
        &self.actions
    }

    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    pub fn tooltip_message(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    /// Targets currently highlighted.
    pub fn highlight_count(&self) -> usize {
        self.highlight_count
    }

    /// Tooltips currently mounted.
    pub fn tooltip_count(&self) -> usize {
        self.tooltip_count
    }

    /// Messages of every tooltip mounted so far, in order.
    pub fn mounted_messages(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::MountTooltip(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    /// The most recent tooltip placement.
    pub fn last_placement(&self) -> Option<&TooltipPlacement> {
        self.calls.iter().rev().find_map(|call| match call {
            SurfaceCall::PositionTooltip(placement) => Some(placement),
            _ => None,
        })
    }

    pub fn pending_timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Delays of every timer armed so far, in arming order.
    pub fn armed_delays(&self) -> Vec<Duration> {
        self.armed.iter().map(|(_, delay)| *delay).collect()
    }

    pub fn was_cancelled(&self, id: TimerId) -> bool {
        self.cancelled.contains(&id)
    }

    pub fn flag(&self, key: &str) -> Option<&str> {
        self.flags.get(key)
    }
}

impl TimerHost for HeadlessHost {
    fn arm_timer(&mut self, id: TimerId, delay: Duration) {
        self.timers.insert(id, self.now.saturating_add(delay));
        self.armed.push((id, delay));
    }

    fn cancel_timer(&mut self, id: TimerId) {
        if self.timers.remove(&id).is_some() {
            self.cancelled.push(id);
        }
    }
}

impl FlagStore for HeadlessHost {
    fn read_raw(&self, key: &str) -> Option<String> {
        self.flags.read_raw(key)
    }

    fn write_raw(&mut self, key: &str, value: &str) -> Result<(), FlagError> {
        self.flags.write_raw(key, value)
    }
}

impl TourSurface for HeadlessHost {
    fn device(&self) -> DeviceSnapshot {
        self.device.clone()
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn target_bounds(&mut self, target: &TargetSelector) -> Option<Rect> {
        let bounds = self.targets.get(target.as_str())?;
        Some(Rect::new(
            bounds.x,
            bounds.y - self.scroll_y,
            bounds.width,
            bounds.height,
        ))
    }

    fn scroll_into_view(&mut self, target: &TargetSelector) {
        if let Some(bounds) = self.targets.get(target.as_str()) {
            self.scroll_y = (bounds.center_y() - self.viewport.height / 2.0).max(0.0);
        }
        self.calls
            .push(SurfaceCall::ScrollIntoView(target.as_str().to_string()));
    }

    fn highlight(&mut self, target: &TargetSelector) {
        self.highlighted = Some(target.as_str().to_string());
        self.highlight_count += 1;
        self.calls
            .push(SurfaceCall::Highlight(target.as_str().to_string()));
    }

    fn clear_highlight(&mut self) {
        self.highlighted = None;
        self.highlight_count = self.highlight_count.saturating_sub(1);
        self.calls.push(SurfaceCall::ClearHighlight);
    }

    fn mount_tooltip(&mut self, content: &TooltipContent<'_>) -> Size {
        self.tooltip = Some(content.message.to_string());
        self.tooltip_count += 1;
        self.calls
            .push(SurfaceCall::MountTooltip(content.message.to_string()));
        self.tooltip_size
    }

    fn position_tooltip(&mut self, placement: &TooltipPlacement) {
        self.calls.push(SurfaceCall::PositionTooltip(*placement));
    }

    fn unmount_tooltip(&mut self) {
        self.tooltip = None;
        self.tooltip_count = self.tooltip_count.saturating_sub(1);
        self.calls.push(SurfaceCall::UnmountTooltip);
    }

    fn run_action(&mut self, action: &StepAction) {
        if *action == StepAction::ScrollToTop {
            self.scroll_y = 0.0;
        }
        self.actions.push(action.clone());
    }
}

/// Advance the virtual clock by `elapsed`, delivering every timer that comes
/// due in deadline order, including timers armed along the way.
pub fn drive(
    tour: &mut TourSequencer,
    host: &mut HeadlessHost,
    elapsed: Duration,
) -> Vec<TourEvent> {
    let target = host.now().saturating_add(elapsed);
    let mut events = Vec::new();
    while let Some(deadline) = host.next_deadline() {
        if deadline > target {
            break;
        }
        let step = deadline.saturating_sub(host.now());
        for id in host.advance_clock(step) {
            if let Some(event) = tour.on_timer_elapsed(host, id) {
                events.push(event);
            }
        }
    }
    let rest = target.saturating_sub(host.now());
    host.advance_clock(rest);
    events
}
