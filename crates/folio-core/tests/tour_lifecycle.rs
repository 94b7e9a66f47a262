//! End-to-end tour behavior against the headless host.
//!
//! Covers:
//! 1. Dwell-driven progression through a short catalog
//! 2. Forward skip over targets missing from the page
//! 3. Completion persisting the seen flag and gating later sessions
//! 4. Single tooltip / single highlight / single timer at every step
//! 5. Demo actions firing on auto-advance only
//! 6. Targets below the fold scrolled into view before decoration

use core::time::Duration;

use folio_core::headless::{HeadlessHost, SurfaceCall, drive};
use folio_core::{
    AdvanceReason, CompletionReason, Placement, Rect, SiteConfig, StepAction, StepCatalog,
    TapTarget, TourConfig, TourEvent, TourPhase, TourSequencer, TourStep, TourSurface,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const DWELL: Duration = Duration::from_millis(5000);

fn two_step_catalog() -> StepCatalog {
    [
        TourStep::new(
            ".whatsapp-item",
            "Tap to contact me directly on WhatsApp",
            Placement::Bottom,
        ),
        TourStep::new(
            "#bottomNav",
            "Swipe or tap icons to navigate sections",
            Placement::Top,
        ),
    ]
    .into_iter()
    .collect()
}

fn tour_with(catalog: StepCatalog) -> TourSequencer {
    let config = TourConfig {
        auto_advance_ms: 5000,
        ..TourConfig::default()
    };
    TourSequencer::new(catalog, config, Default::default())
}

#[test]
fn two_steps_advance_on_dwell_then_complete() {
    let mut host = HeadlessHost::phone().with_targets([".whatsapp-item", "#bottomNav"]);
    let mut tour = tour_with(two_step_catalog());

    assert!(matches!(
        tour.start(&mut host),
        Some(TourEvent::StepShown { index: 0, .. })
    ));
    assert_eq!(host.highlighted(), Some(".whatsapp-item"));

    let events = drive(&mut tour, &mut host, DWELL);
    assert_eq!(
        events,
        vec![TourEvent::StepShown {
            index: 1,
            skipped: 0,
            reason: AdvanceReason::AutoAdvance
        }]
    );
    assert_eq!(host.highlighted(), Some("#bottomNav"));
    assert_eq!(host.flag("hasSeenMobileIntro"), None);

    let events = drive(&mut tour, &mut host, DWELL);
    assert_eq!(
        events,
        vec![TourEvent::Completed {
            reason: CompletionReason::Finished,
            skipped: 0
        }]
    );
    assert_eq!(tour.phase(), TourPhase::Completed);
    assert_eq!(host.flag("hasSeenMobileIntro"), Some("true"));
    assert_eq!(host.tooltip_count(), 0);
    assert_eq!(host.pending_timer_count(), 0);

    let state = tour.state();
    assert!(!state.active);
    assert_eq!(state.current_index, 2);
    assert_eq!(state.pending_timer, None);
}

#[test]
fn dwell_not_yet_elapsed_keeps_step() {
    let mut host = HeadlessHost::phone().with_targets([".whatsapp-item", "#bottomNav"]);
    let mut tour = tour_with(two_step_catalog());
    tour.start(&mut host);
    assert!(drive(&mut tour, &mut host, Duration::from_millis(4999)).is_empty());
    assert_eq!(tour.current_index(), Some(0));
    assert_eq!(drive(&mut tour, &mut host, Duration::from_millis(1)).len(), 1);
    assert_eq!(tour.current_index(), Some(1));
}

#[test]
fn missing_second_target_completes_after_first_dwell() {
    let mut host = HeadlessHost::phone().with_targets([".whatsapp-item"]);
    let mut tour = tour_with(two_step_catalog());
    tour.start(&mut host);

    let events = drive(&mut tour, &mut host, DWELL);
    assert_eq!(
        events,
        vec![TourEvent::Completed {
            reason: CompletionReason::Finished,
            skipped: 1
        }]
    );
    assert_eq!(host.mounted_messages().len(), 1);
    assert_eq!(host.flag("hasSeenMobileIntro"), Some("true"));
}

#[test]
fn missing_second_target_completes_after_tap() {
    let mut host = HeadlessHost::phone().with_targets([".whatsapp-item"]);
    let mut tour = tour_with(two_step_catalog());
    tour.start(&mut host);
    assert!(matches!(
        tour.on_tap(&mut host, TapTarget::Highlighted),
        Some(TourEvent::Completed { skipped: 1, .. })
    ));
}

#[test]
fn scheduled_start_waits_for_delay() {
    let config = SiteConfig::default();
    let mut tour = TourSequencer::from_config(&config).unwrap();
    let mut host = HeadlessHost::phone().with_targets([".whatsapp-item", "#smartActionBtn"]);

    assert!(tour.schedule_start(&mut host));
    assert!(drive(&mut tour, &mut host, Duration::from_millis(799)).is_empty());
    assert_eq!(tour.phase(), TourPhase::Idle);

    let events = drive(&mut tour, &mut host, Duration::from_millis(1));
    assert_eq!(
        events,
        vec![TourEvent::StepShown {
            index: 0,
            skipped: 0,
            reason: AdvanceReason::Start
        }]
    );
}

#[test]
fn completed_tour_is_not_offered_again() {
    let mut host = HeadlessHost::phone().with_targets([".whatsapp-item", "#bottomNav"]);
    let mut tour = tour_with(two_step_catalog());
    tour.start(&mut host);
    tour.skip(&mut host);

    assert_eq!(tour.state().current_index, 2);

    let mut next_visit = tour_with(two_step_catalog());
    assert!(!next_visit.schedule_start(&mut host));
    assert_eq!(next_visit.start(&mut host), None);
}

#[test]
fn desktop_visit_never_schedules() {
    let mut host = HeadlessHost::desktop().with_targets([".whatsapp-item"]);
    let mut tour = tour_with(two_step_catalog());
    assert!(!tour.schedule_start(&mut host));
    assert_eq!(host.pending_timer_count(), 0);
}

#[test]
fn full_intro_runs_actions_on_dwell() {
    let config = SiteConfig {
        tour: TourConfig {
            start_delay_ms: 0,
            ..TourConfig::default()
        },
        ..SiteConfig::default()
    };
    let mut tour = TourSequencer::from_config(&config).unwrap();
    let mut host = HeadlessHost::phone().with_targets([
        ".whatsapp-item",
        "#smartActionBtn",
        "#bottomNav",
        "#skillsTabs",
        "#printBtn",
    ]);

    assert!(tour.schedule_start(&mut host));
    let events = drive(&mut tour, &mut host, DWELL * 5);
    assert_eq!(events.len(), 5);
    assert!(tour.is_completed());
    assert_eq!(
        host.actions(),
        &[
            StepAction::ScrollToTop,
            StepAction::ActivateTab("business".into())
        ]
    );
}

#[test]
fn default_config_scrolls_below_the_fold_target_into_view() {
    let config = SiteConfig {
        tour: TourConfig {
            start_delay_ms: 0,
            ..TourConfig::default()
        },
        ..SiteConfig::default()
    };
    let mut tour = TourSequencer::from_config(&config).unwrap();
    let mut host = HeadlessHost::phone()
        .with_targets([".whatsapp-item", "#smartActionBtn", "#bottomNav"])
        .with_target("#skillsTabs", Rect::new(16.0, 2400.0, 358.0, 48.0));

    assert!(tour.schedule_start(&mut host));
    drive(&mut tour, &mut host, DWELL * 3);
    assert_eq!(tour.current_index(), Some(3));
    let scrolled = SurfaceCall::ScrollIntoView("#skillsTabs".into());
    assert!(host.calls().contains(&scrolled));
    assert_eq!(host.actions(), &[StepAction::ScrollToTop]);

    let viewport = host.viewport();
    let target = host.target_bounds(&"#skillsTabs".into()).unwrap();
    assert!(target.y >= 0.0 && target.bottom() <= viewport.height);

    let placement = *host.last_placement().unwrap();
    let above = placement.top + placement.height <= target.y;
    let below = placement.top >= target.bottom();
    assert!(above || below, "tooltip overlaps target: {placement:?} vs {target:?}");
    let distance = if above {
        target.y - (placement.top + placement.height)
    } else {
        placement.top - target.bottom()
    };
    assert!(distance <= config.tour.gap + 1e-9, "tooltip detached: {distance}");

    // The tab demo runs while its target is on screen.
    drive(&mut tour, &mut host, DWELL);
    assert_eq!(
        host.actions(),
        &[
            StepAction::ScrollToTop,
            StepAction::ActivateTab("business".into())
        ]
    );
}

// ── Invariants under arbitrary interaction ──────────────────────────────

#[derive(Debug, Clone)]
enum Input {
    Tap(TapTarget),
    Wait(u64),
    Start,
    Relayout,
}

fn input_strategy() -> impl Strategy<Value = Input> {
    prop_oneof![
        prop_oneof![
            Just(TapTarget::Highlighted),
            Just(TapTarget::Elsewhere),
            Just(TapTarget::PrintControl),
            Just(TapTarget::TooltipBody),
            Just(TapTarget::NextControl),
            Just(TapTarget::SkipControl),
        ]
        .prop_map(Input::Tap),
        (0u64..12_000).prop_map(Input::Wait),
        Just(Input::Start),
        Just(Input::Relayout),
    ]
}

proptest! {
    #[test]
    fn at_most_one_of_everything(
        present in proptest::collection::vec(any::<bool>(), 0..8),
        inputs in proptest::collection::vec(input_strategy(), 0..40),
    ) {
        let selectors: Vec<String> = (0..present.len()).map(|i| format!("#step{i}")).collect();
        let catalog: StepCatalog = selectors
            .iter()
            .map(|s| TourStep::new(s.as_str(), format!("tip {s}"), Placement::Auto))
            .collect();
        let on_page = selectors
            .iter()
            .zip(&present)
            .filter(|(_, here)| **here)
            .map(|(s, _)| s.clone());
        let mut host = HeadlessHost::phone().with_targets(on_page);
        let mut tour = tour_with(catalog);
        let mut last_index = None;

        tour.start(&mut host);
        for input in inputs {
            match input {
                Input::Tap(tap) => { tour.on_tap(&mut host, tap); }
                Input::Wait(ms) => { drive(&mut tour, &mut host, Duration::from_millis(ms)); }
                Input::Start => { tour.start(&mut host); }
                Input::Relayout => { tour.relayout(&mut host); }
            }

            prop_assert!(host.tooltip_count() <= 1);
            prop_assert!(host.highlight_count() <= 1);
            prop_assert!(host.pending_timer_count() <= 1);
            prop_assert_eq!(host.highlight_count() == 1, tour.is_active());
            prop_assert_eq!(host.highlighted().is_some(), tour.is_active());
            prop_assert_eq!(host.tooltip_count() == 1, tour.is_active());

            if let Some(index) = tour.current_index() {
                prop_assert!(present[index]);
                if let Some(prev) = last_index {
                    prop_assert!(index >= prev);
                }
                last_index = Some(index);
            }
            if tour.is_completed() {
                prop_assert_eq!(host.flag("hasSeenMobileIntro"), Some("true"));
                prop_assert_eq!(host.pending_timer_count(), 0);
            }
        }

        // Enough dwell always finishes the tour.
        drive(&mut tour, &mut host, DWELL * (present.len() as u32 + 1));
        prop_assert!(tour.is_completed());
    }

    #[test]
    fn n_advances_complete(n in 0usize..10) {
        let selectors: Vec<String> = (0..n).map(|i| format!("#s{i}")).collect();
        let catalog: StepCatalog = selectors
            .iter()
            .map(|s| TourStep::new(s.as_str(), "tip", Placement::Auto))
            .collect();
        let mut host = HeadlessHost::phone().with_targets(selectors.clone());
        let mut tour = tour_with(catalog);
        tour.start(&mut host);
        if n == 0 {
            prop_assert!(tour.is_completed());
        }
        for i in 0..n {
            prop_assert!(!tour.is_completed(), "completed early at {}", i);
            tour.next(&mut host);
        }
        prop_assert!(tour.is_completed());
        prop_assert_eq!(host.flag("hasSeenMobileIntro"), Some("true"));
    }
}
