// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turn the winning candidate into final coordinates.
//!
//! ## Steps
//!
//! 1. [`propose`]: center the panel on the target on the cross axis, put it flush against
//!    the origin (plus distance) on the main axis, then correct overflow in window space.
//! 2. The proposal goes through [`PlacementHooks::position`](crate::hooks::PlacementHooks::position);
//!    an override is taken as-is.
//! 3. [`finalize`]: clamp the arrow into the panel and convert to the parent's space.
//!
//! ## Parent space
//!
//! Non-fixed panels are positioned relative to their parent, which is assumed to sit at
//! [`PlacementConfig::parent_origin`] in the document and not to scroll itself. With the
//! default parent at `(0, 0)` this is plain document space.

use kurbo::Point;

use crate::config::PlacementConfig;
use crate::geometry::GeometrySnapshot;
use crate::types::{ArrowOffset, Candidate, Container, Placement, PositionMode, Proposal, Side};

/// Window-space proposal for `winner`.
pub fn propose(winner: &Candidate, geo: &GeometrySnapshot, min_intersection: f64) -> Proposal {
    let o = geo.origin.window_offset;
    let window = geo.window.size;
    let size = winner.size;
    let target = winner.target;

    let mut x = 0.0;
    let mut y = 0.0;
    if winner.side.is_vertical() {
        x = (target - size.width / 2.0).floor();
    } else {
        y = (target - size.height / 2.0).floor();
    }
    match winner.side {
        Side::Left => x = o.x0 - winner.outer_size.width,
        Side::Right => x = o.x1 + winner.distance.horizontal,
        Side::Top => y = o.y0 - winner.outer_size.height,
        Side::Bottom => y = o.y1 + winner.distance.vertical,
    }

    // Only the cross axis is corrected; the main axis stays flush against the origin.
    match (winner.container, winner.side.is_vertical()) {
        (Container::Window, true) => {
            x = clamp_cross_axis(x, size.width, o.x0, o.x1, window.width, min_intersection);
        }
        (Container::Document, true) => {
            // Right overflow first; any left overflow that creates wins.
            if x > window.width - size.width {
                x = window.width - size.width;
            }
            if x < 0.0 {
                x = 0.0;
            }
        }
        (_, false) => {
            y = clamp_cross_axis(y, size.height, o.y0, o.y1, window.height, min_intersection);
        }
    }

    Proposal {
        side: winner.side,
        coord: Point::new(x, y),
        size,
        distance: winner.distance.scalar(),
        target,
    }
}

/// Keep `[pos, pos + len]` within `[0, extent]` on one axis, unless that would push the
/// panel past the origin `[near, far]` by more than `min_intersection`; then overflow just
/// enough to keep the intersection.
fn clamp_cross_axis(
    pos: f64,
    len: f64,
    near: f64,
    far: f64,
    extent: f64,
    min_intersection: f64,
) -> f64 {
    if pos < 0.0 {
        if far - min_intersection >= 0.0 {
            0.0
        } else {
            far - min_intersection - 1.0
        }
    } else if pos > extent - len {
        if near + min_intersection <= extent {
            extent - len
        } else {
            near + min_intersection + 1.0 - len
        }
    } else {
        pos
    }
}

/// Arrow offset for a window-space proposal, clamped to
/// `[min_intersection, size − min_intersection]` on the relevant axis.
pub fn arrow_offset(proposal: &Proposal, min_intersection: f64) -> ArrowOffset {
    let (raw, len) = if proposal.side.is_vertical() {
        (proposal.target - proposal.coord.x, proposal.size.width)
    } else {
        (proposal.target - proposal.coord.y, proposal.size.height)
    };
    let max = len - min_intersection;
    let value = if raw < min_intersection {
        min_intersection
    } else if raw > max {
        max
    } else {
        raw
    };
    if proposal.side.is_vertical() {
        ArrowOffset::Left(value)
    } else {
        ArrowOffset::Top(value)
    }
}

/// Convert a window-space coordinate into the panel's positioning space.
pub fn to_parent_space(
    coord: Point,
    geo: &GeometrySnapshot,
    config: &PlacementConfig,
) -> (Point, PositionMode) {
    if geo.origin.fixed_lineage {
        (coord, PositionMode::Fixed)
    } else {
        (
            coord + geo.window.scroll - config.parent_origin,
            PositionMode::Absolute,
        )
    }
}

/// Finish a (possibly overridden) proposal.
pub fn finalize(proposal: Proposal, geo: &GeometrySnapshot, config: &PlacementConfig) -> Placement {
    let arrow = arrow_offset(&proposal, config.min_intersection);
    let (coord, position) = to_parent_space(proposal.coord, geo, config);
    Placement {
        side: proposal.side,
        coord,
        size: proposal.size,
        distance: proposal.distance,
        target: proposal.target,
        arrow,
        position,
    }
}
