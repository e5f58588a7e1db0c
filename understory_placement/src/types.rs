// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for placement: sides, containers, measurement modes, candidates, and final placements.
//!
//! ## Overview
//!
//! These types flow through the whole pipeline.
//! [`Candidate`] values are created and discarded inside a single placement run by
//! [`search`](crate::search); a [`Placement`] is the one value that survives a run and is
//! written back to the host panel.

use kurbo::{Point, Size};

/// A side of the origin on which a panel can be placed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    /// Above the origin.
    Top,
    /// Right of the origin.
    Right,
    /// Below the origin.
    Bottom,
    /// Left of the origin.
    Left,
}

impl Side {
    /// All sides in clockwise order starting at the top.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// The side across the origin.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// True for [`Side::Top`] and [`Side::Bottom`]: the panel stacks on the vertical axis
    /// and is centered on the horizontal one.
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// Expand a single preferred side into a full fallback order.
    ///
    /// The preferred side comes first, then its opposite, then the two perpendicular sides.
    ///
    /// ```
    /// use understory_placement::types::Side;
    /// assert_eq!(
    ///     Side::Left.fallback_order(),
    ///     [Side::Left, Side::Right, Side::Top, Side::Bottom]
    /// );
    /// ```
    pub const fn fallback_order(self) -> [Self; 4] {
        if self.is_vertical() {
            [self, self.opposite(), Self::Right, Self::Left]
        } else {
            [self, self.opposite(), Self::Top, Self::Bottom]
        }
    }
}

/// The bounding container a candidate is tested against.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Container {
    /// The visible viewport.
    Window,
    /// The whole scrollable document.
    Document,
}

impl Container {
    /// Containers in search order.
    pub const SEARCH_ORDER: [Self; 2] = [Self::Window, Self::Document];
}

/// How the panel was measured for a candidate.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mode {
    /// Unconstrained, natural flow size.
    Natural,
    /// Width capped to the available space on the tested side.
    Constrained,
}

impl Mode {
    /// Modes in the order they are tried for each side.
    pub const SEARCH_ORDER: [Self; 2] = [Self::Natural, Self::Constrained];
}

/// Gap kept between origin and panel, split per axis.
///
/// Only one of the two components is non-zero for a given side.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Distance {
    /// Gap on the horizontal axis (left/right placements).
    pub horizontal: f64,
    /// Gap on the vertical axis (top/bottom placements).
    pub vertical: f64,
}

impl Distance {
    /// Build the per-axis distance for `side` from a scalar gap.
    pub const fn for_side(side: Side, gap: f64) -> Self {
        if side.is_vertical() {
            Self {
                horizontal: 0.0,
                vertical: gap,
            }
        } else {
            Self {
                horizontal: gap,
                vertical: 0.0,
            }
        }
    }

    /// The component that applies to the side; the other one is zero.
    pub fn scalar(self) -> f64 {
        if self.horizontal != 0.0 {
            self.horizontal
        } else {
            self.vertical
        }
    }

    /// Grow `size` by this distance.
    pub fn outer(self, size: Size) -> Size {
        Size::new(size.width + self.horizontal, size.height + self.vertical)
    }
}

/// Anchor scalars on the origin, one per side.
///
/// Each value is a window-relative coordinate on the axis the panel is centered on
/// for that side: `top`/`bottom` are horizontal coordinates, `left`/`right` vertical ones.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Targets {
    /// Horizontal anchor used for a panel above the origin.
    pub top: f64,
    /// Vertical anchor used for a panel right of the origin.
    pub right: f64,
    /// Horizontal anchor used for a panel below the origin.
    pub bottom: f64,
    /// Vertical anchor used for a panel left of the origin.
    pub left: f64,
}

impl Targets {
    /// The anchor for `side`.
    pub const fn get(&self, side: Side) -> f64 {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }
}

/// One tested combination of container, side and measurement mode.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    /// Container the candidate was tested against.
    pub container: Container,
    /// Side of the origin.
    pub side: Side,
    /// Measurement mode.
    pub mode: Mode,
    /// Gap kept between origin and panel.
    pub distance: Distance,
    /// Measured panel size.
    pub size: Size,
    /// Panel size plus distance.
    pub outer_size: Size,
    /// Whether `outer_size` fits the available space on that side.
    pub fits: bool,
    /// Window candidates only: fits and the origin keeps a minimum visible intersection.
    pub whole: Option<bool>,
    /// Anchor coordinate for this side.
    pub target: f64,
}

impl Candidate {
    /// True when the candidate is a whole window placement.
    pub fn is_whole(&self) -> bool {
        self.whole == Some(true)
    }
}

/// How the host should position the panel box.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PositionMode {
    /// Coordinates are relative to the panel's positioned parent.
    #[default]
    Absolute,
    /// Coordinates are relative to the viewport.
    Fixed,
}

/// Offset of the arrow along the panel edge that faces the origin.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ArrowOffset {
    /// Distance from the panel's left edge (top/bottom placements).
    Left(f64),
    /// Distance from the panel's top edge (left/right placements).
    Top(f64),
}

impl ArrowOffset {
    /// The offset value regardless of axis.
    pub const fn value(self) -> f64 {
        match self {
            Self::Left(v) | Self::Top(v) => v,
        }
    }
}

/// Proposed placement in window coordinates, handed to
/// [`PlacementHooks::position`](crate::hooks::PlacementHooks::position) for a final say.
#[derive(Clone, Debug, PartialEq)]
pub struct Proposal {
    /// Chosen side.
    pub side: Side,
    /// Top-left corner relative to the viewport.
    pub coord: Point,
    /// Panel size.
    pub size: Size,
    /// Scalar gap for the chosen side.
    pub distance: f64,
    /// Anchor coordinate for the chosen side.
    pub target: f64,
}

/// The result of a placement run, ready to be written to the panel.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    /// Chosen side.
    pub side: Side,
    /// Top-left corner in the panel parent's space (or viewport space for [`PositionMode::Fixed`]).
    pub coord: Point,
    /// Panel size to apply.
    pub size: Size,
    /// Scalar gap for the chosen side.
    pub distance: f64,
    /// Anchor coordinate for the chosen side, window-relative.
    pub target: f64,
    /// Arrow offset within the panel.
    pub arrow: ArrowOffset,
    /// Positioning scheme for `coord`.
    pub position: PositionMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_order_vertical_and_horizontal() {
        assert_eq!(
            Side::Top.fallback_order(),
            [Side::Top, Side::Bottom, Side::Right, Side::Left]
        );
        assert_eq!(
            Side::Right.fallback_order(),
            [Side::Right, Side::Left, Side::Top, Side::Bottom]
        );
    }

    #[test]
    fn distance_applies_to_one_axis() {
        let d = Distance::for_side(Side::Left, 8.0);
        assert_eq!(d.vertical, 0.0);
        assert_eq!(d.scalar(), 8.0);
        assert_eq!(d.outer(Size::new(10.0, 10.0)), Size::new(18.0, 10.0));
        let d = Distance::for_side(Side::Bottom, 4.0);
        assert_eq!(d.outer(Size::new(10.0, 10.0)), Size::new(10.0, 14.0));
    }

    #[test]
    fn targets_index_by_side() {
        let t = Targets {
            top: 1.0,
            right: 2.0,
            bottom: 3.0,
            left: 4.0,
        };
        assert_eq!(
            Side::ALL.map(|s| t.get(s)),
            [1.0, 2.0, 3.0, 4.0],
            "targets should map clockwise"
        );
    }
}
