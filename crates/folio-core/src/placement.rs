#![forbid(unsafe_code)]

//! Tooltip placement relative to a target element.
//!
//! [`Placer`] computes where a tooltip of a measured size should sit next to
//! a target's bounding box. The preferred side comes from the step's
//! [`Placement`] hint; when the tooltip would overflow the viewport on that
//! side the placer flips to the opposite side, then clamps both axes so the
//! whole tooltip stays inside the viewport margin.
//!
//! # Invariants
//!
//! 1. For any finite or non-finite input, the returned extent lies within
//!    `[margin, viewport - margin]` on both axes (the margin shrinks to half
//!    the viewport when the viewport is smaller than two margins).
//! 2. A tooltip larger than the usable span is shrunk to that span.
//! 3. The function is pure: same inputs, same output.
//!
//! # Example
//!
//! ```
//! use folio_core::geometry::{Rect, Size};
//! use folio_core::placement::{Placement, Placer, Side};
//!
//! let target = Rect::new(100.0, 10.0, 40.0, 20.0);
//! let placed = Placer::default().place(
//!     target,
//!     Size::new(120.0, 50.0),
//!     Size::new(375.0, 667.0),
//!     Placement::Top,
//! );
//! // No room above the target: flipped below it.
//! assert_eq!(placed.side, Side::Bottom);
//! assert!(placed.top >= target.bottom());
//! ```

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Size, finite_or_zero};

/// Default distance kept between a tooltip and the viewport edges.
pub const DEFAULT_MARGIN: f64 = 10.0;

/// Side hint attached to a tour step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Above the target.
    Top,
    /// Below the target.
    Bottom,
    /// Left of the target.
    Left,
    /// Right of the target.
    Right,
    /// Let the placer pick its default side.
    #[default]
    Auto,
}

/// A concrete side after hint resolution and flip logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Return the opposite side for flip logic.
    pub const fn flip(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Whether this side stacks the tooltip above/below the target.
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// Lowercase name, used for `data-side` styling hooks.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Where the tooltip ends up, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipPlacement {
    pub top: f64,
    pub left: f64,
    /// Width after shrinking to the usable span.
    pub width: f64,
    /// Height after shrinking to the usable span.
    pub height: f64,
    /// The side the tooltip was placed on.
    pub side: Side,
}

impl TooltipPlacement {
    /// The tooltip's extent as a rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }
}

/// Placement parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placer {
    /// Minimum distance between the tooltip and the viewport edges.
    pub margin: f64,
    /// Distance between the tooltip and the target.
    pub gap: f64,
    /// Side used for [`Placement::Auto`].
    pub auto_side: Side,
}

impl Default for Placer {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            gap: DEFAULT_MARGIN,
            auto_side: Side::Bottom,
        }
    }
}

impl Placer {
    /// Create a placer with the given margin (gap defaults to the margin).
    pub fn new(margin: f64) -> Self {
        let margin = finite_or_zero(margin).max(0.0);
        Self {
            margin,
            gap: margin,
            ..Self::default()
        }
    }

    /// Set the gap between target and tooltip.
    #[must_use]
    pub fn gap(mut self, gap: f64) -> Self {
        self.gap = finite_or_zero(gap).max(0.0);
        self
    }

    /// Set the side used when the hint is [`Placement::Auto`].
    #[must_use]
    pub fn auto_side(mut self, side: Side) -> Self {
        self.auto_side = side;
        self
    }

    /// Resolve a hint to a concrete side.
    pub fn resolve(&self, hint: Placement) -> Side {
        match hint {
            Placement::Top => Side::Top,
            Placement::Bottom => Side::Bottom,
            Placement::Left => Side::Left,
            Placement::Right => Side::Right,
            Placement::Auto => self.auto_side,
        }
    }

    /// Compute the tooltip position for `target` inside `viewport`.
    pub fn place(
        &self,
        target: Rect,
        tooltip: Size,
        viewport: Size,
        hint: Placement,
    ) -> TooltipPlacement {
        let target = target.sanitized();
        let viewport = viewport.sanitized();
        let tooltip = tooltip.sanitized();

        let frame = Frame::new(viewport, self.margin);
        let width = tooltip.width.min(frame.usable_width());
        let height = tooltip.height.min(frame.usable_height());
        let size = Size::new(width, height);

        let primary = self.resolve(hint);
        let side = self.resolve_side(primary, target, size, &frame);
        let (top, left) = self.candidate(side, target, size);

        TooltipPlacement {
            top: clamp_axis(top, frame.margin_y, viewport.height - frame.margin_y - height),
            left: clamp_axis(left, frame.margin_x, viewport.width - frame.margin_x - width),
            width,
            height,
            side,
        }
    }

    /// Flip logic: keep the primary side when it fits, otherwise take the
    /// opposite side when that fits, otherwise whichever has more room.
    fn resolve_side(&self, primary: Side, target: Rect, size: Size, frame: &Frame) -> Side {
        let room = self.room(primary, target, frame);
        let needed = if primary.is_vertical() {
            size.height
        } else {
            size.width
        };
        if room >= needed {
            return primary;
        }

        let flipped = primary.flip();
        let flipped_room = self.room(flipped, target, frame);
        if flipped_room >= needed || flipped_room > room {
            flipped
        } else {
            primary
        }
    }

    /// Space available between the target (plus gap) and the viewport margin.
    fn room(&self, side: Side, target: Rect, frame: &Frame) -> f64 {
        match side {
            Side::Top => target.top() - self.gap - frame.margin_y,
            Side::Bottom => frame.viewport.height - frame.margin_y - target.bottom() - self.gap,
            Side::Left => target.left() - self.gap - frame.margin_x,
            Side::Right => frame.viewport.width - frame.margin_x - target.right() - self.gap,
        }
    }

    /// Unclamped `(top, left)` on the given side, centered on the other axis.
    fn candidate(&self, side: Side, target: Rect, size: Size) -> (f64, f64) {
        let centered_left = target.left() + (target.width - size.width) / 2.0;
        let centered_top = target.top() + (target.height - size.height) / 2.0;
        match side {
            Side::Top => (target.top() - size.height - self.gap, centered_left),
            Side::Bottom => (target.bottom() + self.gap, centered_left),
            Side::Left => (centered_top, target.left() - size.width - self.gap),
            Side::Right => (centered_top, target.right() + self.gap),
        }
    }
}

/// Compute a placement with the default [`Placer`] and the given margin.
pub fn place(
    target: Rect,
    tooltip: Size,
    viewport: Size,
    hint: Placement,
    margin: f64,
) -> TooltipPlacement {
    Placer::new(margin).place(target, tooltip, viewport, hint)
}

/// Viewport plus effective per-axis margins.
struct Frame {
    viewport: Size,
    margin_x: f64,
    margin_y: f64,
}

impl Frame {
    fn new(viewport: Size, margin: f64) -> Self {
        let margin = finite_or_zero(margin).max(0.0);
        Self {
            viewport,
            margin_x: margin.min(viewport.width / 2.0),
            margin_y: margin.min(viewport.height / 2.0),
        }
    }

    fn usable_width(&self) -> f64 {
        (self.viewport.width - 2.0 * self.margin_x).max(0.0)
    }

    fn usable_height(&self) -> f64 {
        (self.viewport.height - 2.0 * self.margin_y).max(0.0)
    }
}

/// Clamp without panicking when the bounds cross through rounding.
fn clamp_axis(value: f64, lo: f64, hi: f64) -> f64 {
    if hi < lo {
        return lo;
    }
    value.max(lo).min(hi)
}
