// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement options.
//!
//! [`PlacementConfig::default`] carries the stock values; builder methods adjust them.
//!
//! ```
//! use understory_placement::config::{PlacementConfig, SideDistances};
//! use understory_placement::types::Side;
//!
//! let config = PlacementConfig::default()
//!     .side(Side::Right)
//!     .distance(SideDistances::from_shorthand(&[4.0, 8.0]).unwrap())
//!     .min_intersection(12.0);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.sides, vec![Side::Right, Side::Left, Side::Top, Side::Bottom]);
//! ```

use core::time::Duration;

use kurbo::Vec2;
use thiserror::Error;

use crate::types::Side;

/// Errors reported by [`PlacementConfig::validate`] and [`SideDistances::from_shorthand`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// No side is allowed.
    #[error("at least one side must be allowed")]
    NoSides,
    /// A side appears twice in the fallback order.
    #[error("side {0:?} appears more than once in the fallback order")]
    DuplicateSide(Side),
    /// A distance, intersection or width is negative or not finite.
    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidLength {
        /// Name of the option.
        field: &'static str,
        /// Offending value.
        value: f64,
    },
    /// `max_width` is below `min_width`.
    #[error("max_width {max} is smaller than min_width {min}")]
    WidthRange {
        /// Configured minimum.
        min: f64,
        /// Configured maximum.
        max: f64,
    },
    /// A distance shorthand with zero or more than four values.
    #[error("distance shorthand takes 1 to 4 values, got {0}")]
    DistanceArity(usize),
    /// The tracker interval is zero.
    #[error("tracker interval must be non-zero")]
    ZeroInterval,
}

/// Gap between origin and panel for each side.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideDistances {
    /// Gap above the origin.
    pub top: f64,
    /// Gap right of the origin.
    pub right: f64,
    /// Gap below the origin.
    pub bottom: f64,
    /// Gap left of the origin.
    pub left: f64,
}

impl SideDistances {
    /// The same gap on every side.
    pub const fn uniform(gap: f64) -> Self {
        Self {
            top: gap,
            right: gap,
            bottom: gap,
            left: gap,
        }
    }

    /// Expand 1 to 4 values CSS-style: `[all]`, `[vertical, horizontal]`,
    /// `[top, horizontal, bottom]`, `[top, right, bottom, left]`.
    pub fn from_shorthand(values: &[f64]) -> Result<Self, ConfigError> {
        match *values {
            [a] => Ok(Self::uniform(a)),
            [v, h] => Ok(Self {
                top: v,
                right: h,
                bottom: v,
                left: h,
            }),
            [t, h, b] => Ok(Self {
                top: t,
                right: h,
                bottom: b,
                left: h,
            }),
            [top, right, bottom, left] => Ok(Self {
                top,
                right,
                bottom,
                left,
            }),
            _ => Err(ConfigError::DistanceArity(values.len())),
        }
    }

    /// Gap for `side`.
    pub const fn get(&self, side: Side) -> f64 {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }
}

impl Default for SideDistances {
    fn default() -> Self {
        Self::uniform(6.0)
    }
}

/// Options for placement and tracking.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlacementConfig {
    /// Allowed sides in order of preference.
    pub sides: Vec<Side>,
    /// Gap between origin and panel per side.
    pub distance: SideDistances,
    /// Minimum visible overlap, in pixels, between panel and origin on the cross axis.
    pub min_intersection: f64,
    /// Try to keep the panel within the viewport.
    pub viewport_aware: bool,
    /// Minimum content width forwarded to the panel.
    pub min_width: f64,
    /// Maximum content width forwarded to the panel.
    pub max_width: Option<f64>,
    /// Document offset of the panel's positioned parent.
    ///
    /// Coordinates are only exact when the parent does not itself scroll; the usual
    /// setup is a parent at the document origin (`0, 0`).
    pub parent_origin: Vec2,
    /// Re-run placement when the origin moves or resizes.
    pub track_origin: bool,
    /// Re-run placement when the panel content resizes.
    pub track_panel: bool,
    /// Close instead of following a moved origin.
    pub close_on_origin_move: bool,
    /// Close when any tracked scroll happens.
    pub close_on_scroll: bool,
    /// Run a full placement on every scroll instead of translating the panel.
    pub reposition_on_scroll: bool,
    /// Minimum time between two tracker polls.
    #[cfg_attr(feature = "serde", serde(with = "millis"))]
    pub tracker_interval: Duration,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            sides: Side::Top.fallback_order().to_vec(),
            distance: SideDistances::default(),
            min_intersection: 16.0,
            viewport_aware: true,
            min_width: 0.0,
            max_width: None,
            parent_origin: Vec2::ZERO,
            track_origin: false,
            track_panel: false,
            close_on_origin_move: false,
            close_on_scroll: false,
            reposition_on_scroll: false,
            tracker_interval: Duration::from_millis(500),
        }
    }
}

impl PlacementConfig {
    /// Prefer `side`, falling back to its opposite then the perpendicular sides.
    #[must_use]
    pub fn side(mut self, side: Side) -> Self {
        self.sides = side.fallback_order().to_vec();
        self
    }

    /// Set an explicit fallback order.
    #[must_use]
    pub fn sides(mut self, sides: impl Into<Vec<Side>>) -> Self {
        self.sides = sides.into();
        self
    }

    /// Set per-side distances.
    #[must_use]
    pub fn distance(mut self, distance: SideDistances) -> Self {
        self.distance = distance;
        self
    }

    /// Set the minimum intersection.
    #[must_use]
    pub fn min_intersection(mut self, px: f64) -> Self {
        self.min_intersection = px;
        self
    }

    /// Enable or disable viewport awareness.
    #[must_use]
    pub fn viewport_aware(mut self, aware: bool) -> Self {
        self.viewport_aware = aware;
        self
    }

    /// Set content width limits.
    #[must_use]
    pub fn width_limits(mut self, min: f64, max: Option<f64>) -> Self {
        self.min_width = min;
        self.max_width = max;
        self
    }

    /// Set the document offset of the panel's positioned parent.
    #[must_use]
    pub fn parent_origin(mut self, offset: Vec2) -> Self {
        self.parent_origin = offset;
        self
    }

    /// Enable origin and panel tracking.
    #[must_use]
    pub fn track(mut self, origin: bool, panel: bool) -> Self {
        self.track_origin = origin;
        self.track_panel = panel;
        self
    }

    /// Close the panel instead of following a moved origin.
    #[must_use]
    pub fn close_on_origin_move(mut self, close: bool) -> Self {
        self.close_on_origin_move = close;
        self
    }

    /// Close the panel on scroll.
    #[must_use]
    pub fn close_on_scroll(mut self, close: bool) -> Self {
        self.close_on_scroll = close;
        self
    }

    /// Re-run placement on every scroll.
    #[must_use]
    pub fn reposition_on_scroll(mut self, reposition: bool) -> Self {
        self.reposition_on_scroll = reposition;
        self
    }

    /// Set the tracker poll interval.
    #[must_use]
    pub fn tracker_interval(mut self, interval: Duration) -> Self {
        self.tracker_interval = interval;
        self
    }

    /// Position of `side` in the fallback order, or `usize::MAX` if not allowed.
    pub fn side_rank(&self, side: Side) -> usize {
        self.sides
            .iter()
            .position(|s| *s == side)
            .unwrap_or(usize::MAX)
    }

    /// Check the options for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sides.is_empty() {
            return Err(ConfigError::NoSides);
        }
        for (i, side) in self.sides.iter().enumerate() {
            if self.sides[..i].contains(side) {
                return Err(ConfigError::DuplicateSide(*side));
            }
        }
        let lengths = [
            ("distance.top", self.distance.top),
            ("distance.right", self.distance.right),
            ("distance.bottom", self.distance.bottom),
            ("distance.left", self.distance.left),
            ("min_intersection", self.min_intersection),
            ("min_width", self.min_width),
            ("max_width", self.max_width.unwrap_or(0.0)),
        ];
        for (field, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidLength { field, value });
            }
        }
        if let Some(max) = self.max_width
            && max < self.min_width
        {
            return Err(ConfigError::WidthRange {
                min: self.min_width,
                max,
            });
        }
        if self.tracker_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
mod millis {
    use core::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Intervals beyond u64 milliseconds are not meaningful."
        )]
        s.serialize_u64(d.as_millis() as u64)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
