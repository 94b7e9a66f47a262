#![forbid(unsafe_code)]

//! Guided tour sequencer.
//!
//! Drives the first-visit mobile intro: which step is current, the lifecycle
//! of its tooltip and highlight, the single auto-advance timer, and
//! completion. All side effects go through a [`TourHost`].
//!
//! # States
//!
//! ```text
//!   Idle ──start──▶ Showing(0) ──advance──▶ Showing(1) ─ … ─▶ Completed
//!                        │                                        ▲
//!                        └──────────────── skip ──────────────────┘
//! ```
//!
//! # Invariants
//!
//! 1. At most one tooltip is mounted and at most one target highlighted.
//!    The previous step is torn down before the next is decorated.
//! 2. At most one timer is pending. It is cancelled before another is armed
//!    and on every exit transition; a firing with any other id is ignored.
//! 3. The step index only increases. Steps whose target is absent are
//!    skipped without rendering; the skip loop is bounded by the catalog
//!    length, so the tour always reaches `Completed`.
//! 4. `Completed` is terminal for the session. Every operation is a no-op
//!    in `Idle` (except starting) and in `Completed`.
//!
//! # Demo actions
//!
//! A step's action runs only when the step is left by auto-advance. Manual
//! taps never trigger it.

use crate::catalog::StepCatalog;
use crate::config::{ConfigError, SiteConfig, TourConfig};
use crate::device::DeviceClassifier;
use crate::flags::PersistedFlag;
use crate::geometry::Size;
use crate::host::{TapTarget, TimerId, TooltipContent, TourHost};
use crate::placement::Placer;

/// Sequencer phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourPhase {
    Idle,
    Showing(usize),
    Completed,
}

/// Why a step was left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceReason {
    Start,
    AutoAdvance,
    TargetTap,
    PageTap,
    NextControl,
}

/// Why the tour ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    /// Ran past the last step.
    Finished,
    /// The skip control was used.
    Skipped,
}

/// Result of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TourEvent {
    StepShown {
        index: usize,
        /// Absent targets passed over on the way to `index`.
        skipped: usize,
        reason: AdvanceReason,
    },
    Completed {
        reason: CompletionReason,
        skipped: usize,
    },
}

/// Snapshot of the sequencer's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TourState {
    pub active: bool,
    /// Step on screen, or the catalog length once the tour has ended.
    pub current_index: usize,
    pub pending_timer: Option<TimerId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerPurpose {
    Start,
    AutoAdvance(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingTimer {
    id: TimerId,
    purpose: TimerPurpose,
}

/// The guided tour state machine.
#[derive(Debug, Clone)]
pub struct TourSequencer {
    catalog: StepCatalog,
    config: TourConfig,
    classifier: DeviceClassifier,
    placer: Placer,
    seen_flag: PersistedFlag<bool>,
    phase: TourPhase,
    /// Index of the step on screen; the catalog length once completed.
    current_index: usize,
    pending: Option<PendingTimer>,
    next_timer_id: u64,
    highlighted: bool,
    tooltip: Option<Size>,
}

impl TourSequencer {
    pub fn new(catalog: StepCatalog, config: TourConfig, classifier: DeviceClassifier) -> Self {
        let placer = Placer::new(config.margin).gap(config.gap);
        let seen_flag = PersistedFlag::new(config.seen_flag_key.clone());
        Self {
            catalog,
            config,
            classifier,
            placer,
            seen_flag,
            phase: TourPhase::Idle,
            current_index: 0,
            pending: None,
            next_timer_id: 0,
            highlighted: false,
            tooltip: None,
        }
    }

    /// Build from site configuration: the configured (or built-in) catalog,
    /// tour timing and the device classifier.
    pub fn from_config(config: &SiteConfig) -> Result<Self, ConfigError> {
        let classifier = DeviceClassifier::from_config(&config.device)?;
        Ok(Self::new(config.catalog(), config.tour.clone(), classifier))
    }

    pub fn phase(&self) -> TourPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, TourPhase::Showing(_))
    }

    pub fn is_completed(&self) -> bool {
        self.phase == TourPhase::Completed
    }

    /// Index of the step on screen, if any.
    pub fn current_index(&self) -> Option<usize> {
        match self.phase {
            TourPhase::Showing(index) => Some(index),
            TourPhase::Idle | TourPhase::Completed => None,
        }
    }

    pub fn state(&self) -> TourState {
        TourState {
            active: self.is_active(),
            current_index: self.current_index,
            pending_timer: self.pending.map(|pending| pending.id),
        }
    }

    pub fn step_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn catalog(&self) -> &StepCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &TourConfig {
        &self.config
    }

    /// Whether a tooltip is currently mounted.
    pub fn has_tooltip(&self) -> bool {
        self.tooltip.is_some()
    }

    /// Whether a target is currently highlighted.
    pub fn has_highlight(&self) -> bool {
        self.highlighted
    }

    /// Mobile device and the "intro seen" flag never written.
    pub fn is_eligible<H: TourHost>(&self, host: &H) -> bool {
        self.classifier.is_mobile(&host.device()) && !self.seen_flag.is_set(host)
    }

    /// Page-ready hook: arm the start delay if the tour should run.
    ///
    /// Returns `true` when the tour was scheduled (or started right away for
    /// a zero delay).
    pub fn schedule_start<H: TourHost>(&mut self, host: &mut H) -> bool {
        if self.phase != TourPhase::Idle || self.pending.is_some() {
            return false;
        }
        if !self.is_eligible(host) {
            tracing::debug!("guided tour not offered: not mobile or already seen");
            return false;
        }
        let delay = self.config.start_delay();
        if delay.is_zero() {
            return self.start(host).is_some();
        }
        self.arm(host, TimerPurpose::Start);
        tracing::debug!(delay_ms = self.config.start_delay_ms, "guided tour scheduled");
        true
    }

    /// `Idle → Showing(0)`.
    pub fn start<H: TourHost>(&mut self, host: &mut H) -> Option<TourEvent> {
        if self.phase != TourPhase::Idle {
            return None;
        }
        if !self.is_eligible(host) {
            tracing::debug!("guided tour start ignored: not eligible");
            return None;
        }
        tracing::info!(steps = self.catalog.len(), "guided tour started");
        Some(self.enter_step(host, 0, AdvanceReason::Start))
    }

    /// Leave the current step for the next one.
    pub fn advance<H: TourHost>(
        &mut self,
        host: &mut H,
        reason: AdvanceReason,
    ) -> Option<TourEvent> {
        let TourPhase::Showing(index) = self.phase else {
            return None;
        };
        if reason == AdvanceReason::AutoAdvance {
            if let Some(action) = self.catalog.get(index).and_then(|step| step.action.as_ref()) {
                tracing::debug!(index, ?action, "running step action");
                host.run_action(action);
            }
        }
        Some(self.enter_step(host, index + 1, reason))
    }

    /// The tooltip's "next" control.
    pub fn next<H: TourHost>(&mut self, host: &mut H) -> Option<TourEvent> {
        self.advance(host, AdvanceReason::NextControl)
    }

    /// The tooltip's "skip" control.
    pub fn skip<H: TourHost>(&mut self, host: &mut H) -> Option<TourEvent> {
        if !self.is_active() {
            return None;
        }
        Some(self.complete(host, CompletionReason::Skipped, 0))
    }

    /// Host callback for an elapsed timer.
    pub fn on_timer_elapsed<H: TourHost>(
        &mut self,
        host: &mut H,
        id: TimerId,
    ) -> Option<TourEvent> {
        let pending = match self.pending {
            Some(pending) if pending.id == id => pending,
            _ => {
                tracing::trace!(timer = id.0, "ignoring stale timer");
                return None;
            }
        };
        self.pending = None;
        match pending.purpose {
            TimerPurpose::Start => self.start(host),
            TimerPurpose::AutoAdvance(index) if self.phase == TourPhase::Showing(index) => {
                self.advance(host, AdvanceReason::AutoAdvance)
            }
            TimerPurpose::AutoAdvance(_) => None,
        }
    }

    /// Host callback for a tap anywhere on the page.
    pub fn on_tap<H: TourHost>(&mut self, host: &mut H, tap: TapTarget) -> Option<TourEvent> {
        if !self.is_active() {
            return None;
        }
        match tap {
            TapTarget::Highlighted => self.advance(host, AdvanceReason::TargetTap),
            TapTarget::Elsewhere if self.config.advance_on_tap_anywhere => {
                self.advance(host, AdvanceReason::PageTap)
            }
            TapTarget::NextControl => self.next(host),
            TapTarget::SkipControl => self.skip(host),
            TapTarget::Elsewhere | TapTarget::PrintControl | TapTarget::TooltipBody => None,
        }
    }

    /// Re-place the current tooltip after a viewport change.
    pub fn relayout<H: TourHost>(&mut self, host: &mut H) -> bool {
        let (Some(index), Some(size)) = (self.current_index(), self.tooltip) else {
            return false;
        };
        let Some(step) = self.catalog.get(index) else {
            return false;
        };
        let Some(bounds) = host.target_bounds(&step.target) else {
            return false;
        };
        let placement = self.placer.place(bounds, size, host.viewport(), step.placement);
        host.position_tooltip(&placement);
        true
    }

    /// Enter `index`, skipping forward over absent targets.
    fn enter_step<H: TourHost>(
        &mut self,
        host: &mut H,
        index: usize,
        reason: AdvanceReason,
    ) -> TourEvent {
        self.cancel_pending(host);
        self.teardown(host);

        let mut index = index;
        let mut skipped = 0;
        let bounds = loop {
            let Some(step) = self.catalog.get(index) else {
                return self.complete(host, CompletionReason::Finished, skipped);
            };
            if let Some(bounds) = host.target_bounds(&step.target) {
                break bounds;
            }
            tracing::debug!(index, target = %step.target, "tour target missing; skipping step");
            skipped += 1;
            index += 1;
        };

        self.phase = TourPhase::Showing(index);
        self.current_index = index;
        let count = self.catalog.len();
        let Some(step) = self.catalog.get(index) else {
            return self.complete(host, CompletionReason::Finished, skipped);
        };

        let bounds = if self.config.scroll_into_view.applies_to(index) {
            host.scroll_into_view(&step.target);
            host.target_bounds(&step.target).unwrap_or(bounds)
        } else {
            bounds
        };

        host.highlight(&step.target);
        self.highlighted = true;

        let content = TooltipContent {
            message: &step.message,
            index,
            count,
        };
        let size = host.mount_tooltip(&content);
        self.tooltip = Some(size);
        let placement = self.placer.place(bounds, size, host.viewport(), step.placement);
        host.position_tooltip(&placement);

        self.arm(host, TimerPurpose::AutoAdvance(index));

        tracing::debug!(
            index,
            skipped,
            ?reason,
            side = placement.side.as_str(),
            "tour step shown"
        );
        TourEvent::StepShown {
            index,
            skipped,
            reason,
        }
    }

    fn complete<H: TourHost>(
        &mut self,
        host: &mut H,
        reason: CompletionReason,
        skipped: usize,
    ) -> TourEvent {
        self.cancel_pending(host);
        self.teardown(host);
        self.phase = TourPhase::Completed;
        self.current_index = self.catalog.len();
        if let Err(err) = self.seen_flag.write(host, &true) {
            tracing::warn!(
                error = %err,
                key = self.seen_flag.key(),
                "failed to persist tour completion"
            );
        }
        tracing::info!(?reason, skipped, "guided tour completed");
        TourEvent::Completed { reason, skipped }
    }

    fn teardown<H: TourHost>(&mut self, host: &mut H) {
        if self.highlighted {
            host.clear_highlight();
            self.highlighted = false;
        }
        if self.tooltip.take().is_some() {
            host.unmount_tooltip();
        }
    }

    fn arm<H: TourHost>(&mut self, host: &mut H, purpose: TimerPurpose) {
        self.cancel_pending(host);
        self.next_timer_id += 1;
        let id = TimerId(self.next_timer_id);
        let delay = match purpose {
            TimerPurpose::Start => self.config.start_delay(),
            TimerPurpose::AutoAdvance(_) => self.config.auto_advance(),
        };
        host.arm_timer(id, delay);
        self.pending = Some(PendingTimer { id, purpose });
    }

    fn cancel_pending<H: TourHost>(&mut self, host: &mut H) {
        if let Some(pending) = self.pending.take() {
            host.cancel_timer(pending.id);
        }
    }
}
