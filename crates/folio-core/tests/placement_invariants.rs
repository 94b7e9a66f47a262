//! Property tests for tooltip placement.
//!
//! 1. The tooltip extent stays inside `[margin, viewport - margin]` on both
//!    axes whenever the viewport is at least two margins wide/tall
//! 2. Targets larger than the viewport are handled the same way
//! 3. Placement is deterministic
//! 4. Non-finite input never yields a non-finite position

use folio_core::geometry::{Rect, Size};
use folio_core::placement::{self, Placement, Placer};
use proptest::prelude::*;

const EPS: f64 = 1e-6;

fn hint_strategy() -> impl Strategy<Value = Placement> {
    prop_oneof![
        Just(Placement::Top),
        Just(Placement::Bottom),
        Just(Placement::Left),
        Just(Placement::Right),
        Just(Placement::Auto),
    ]
}

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (-3000.0..3000.0f64, -3000.0..3000.0f64, 0.0..4000.0f64, 0.0..4000.0f64)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

fn size_strategy(max: f64) -> impl Strategy<Value = Size> {
    (0.0..max, 0.0..max).prop_map(|(w, h)| Size::new(w, h))
}

fn awkward_f64() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
        -1e6..1e6f64,
    ]
}

proptest! {
    #[test]
    fn extent_stays_inside_margins(
        target in rect_strategy(),
        tooltip in size_strategy(2000.0),
        viewport in (20.0..2000.0f64, 20.0..2000.0f64).prop_map(|(w, h)| Size::new(w, h)),
        hint in hint_strategy(),
    ) {
        let margin = 10.0;
        let placed = placement::place(target, tooltip, viewport, hint, margin);

        prop_assert!(placed.left >= margin - EPS, "left {} < margin", placed.left);
        prop_assert!(placed.top >= margin - EPS, "top {} < margin", placed.top);
        prop_assert!(
            placed.left + placed.width <= viewport.width - margin + EPS,
            "right edge {} past {}", placed.left + placed.width, viewport.width - margin
        );
        prop_assert!(
            placed.top + placed.height <= viewport.height - margin + EPS,
            "bottom edge {} past {}", placed.top + placed.height, viewport.height - margin
        );
        prop_assert!(placed.width <= tooltip.width + EPS);
        prop_assert!(placed.height <= tooltip.height + EPS);
    }

    #[test]
    fn tiny_viewport_stays_inside(
        target in rect_strategy(),
        tooltip in size_strategy(500.0),
        viewport in size_strategy(20.0),
        hint in hint_strategy(),
    ) {
        let placed = Placer::default().place(target, tooltip, viewport, hint);
        prop_assert!(placed.left >= -EPS);
        prop_assert!(placed.top >= -EPS);
        prop_assert!(placed.left + placed.width <= viewport.width + EPS);
        prop_assert!(placed.top + placed.height <= viewport.height + EPS);
    }

    #[test]
    fn placement_is_pure(
        target in rect_strategy(),
        tooltip in size_strategy(800.0),
        viewport in size_strategy(2000.0),
        hint in hint_strategy(),
    ) {
        let placer = Placer::default();
        prop_assert_eq!(
            placer.place(target, tooltip, viewport, hint),
            placer.place(target, tooltip, viewport, hint)
        );
    }

    #[test]
    fn non_finite_input_is_contained(
        x in awkward_f64(),
        y in awkward_f64(),
        w in awkward_f64(),
        tw in awkward_f64(),
        hint in hint_strategy(),
    ) {
        let placed = Placer::default().place(
            Rect::new(x, y, w, 40.0),
            Size::new(tw, 60.0),
            Size::new(375.0, 667.0),
            hint,
        );
        prop_assert!(placed.top.is_finite());
        prop_assert!(placed.left.is_finite());
        prop_assert!(placed.width.is_finite() && placed.width >= 0.0);
        prop_assert!(placed.left >= 10.0 - EPS);
        prop_assert!(placed.left + placed.width <= 365.0 + EPS);
    }
}

#[test]
fn oversized_target_keeps_tooltip_on_screen() {
    let viewport = Size::new(375.0, 667.0);
    let target = Rect::new(-50.0, -200.0, 500.0, 1200.0);
    for hint in [Placement::Top, Placement::Bottom, Placement::Left, Placement::Right] {
        let placed = placement::place(target, Size::new(200.0, 80.0), viewport, hint, 10.0);
        assert!(placed.top >= 10.0 && placed.top + 80.0 <= 657.0, "{hint:?}: {placed:?}");
        assert!(placed.left >= 10.0 && placed.left + 200.0 <= 365.0, "{hint:?}: {placed:?}");
    }
}
