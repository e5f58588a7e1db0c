// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement tracker: follow an open panel's origin and content.
//!
//! ## Overview
//!
//! [`Tracker`] is a small state machine, `Idle` or `Tracking`. It never touches the host;
//! it compares observations against what it recorded at the last placement and returns
//! [`TrackerCommand`]s for the caller to execute, in order.
//!
//! - [`Tracker::poll`] runs on a timer. It closes a panel whose origin or panel left the
//!   document, and re-places (or closes) when the origin or content changed.
//! - [`Tracker::on_scroll`] handles scroll events. Viewport scrolls need nothing unless a
//!   re-run is requested; ancestor scrolls hide a clipped panel, show it again once the
//!   origin is back in view, and translate it by the origin's movement.
//!
//! ## Example
//!
//! ```
//! use core::time::Duration;
//! use kurbo::{Rect, Size, Vec2};
//! use understory_placement::config::PlacementConfig;
//! use understory_placement::geometry::GeometrySnapshot;
//! use understory_placement::tracker::{Observation, Tracker, TrackerCommand};
//! # use understory_placement::types::{ArrowOffset, Placement, PositionMode, Side};
//! # use kurbo::Point;
//! # let placement = Placement {
//! #     side: Side::Top, coord: Point::ZERO, size: Size::new(10.0, 10.0), distance: 6.0,
//! #     target: 0.0, arrow: ArrowOffset::Left(5.0), position: PositionMode::Absolute,
//! # };
//!
//! let config = PlacementConfig::default().track(true, false);
//! let window = Size::new(800.0, 600.0);
//! let at = |x: f64| {
//!     GeometrySnapshot::from_parts(Rect::new(x, 10.0, x + 20.0, 30.0), false, window, Vec2::ZERO, window)
//! };
//!
//! let mut tracker = Tracker::new();
//! tracker.start(Duration::ZERO, at(10.0), placement, Size::new(10.0, 10.0));
//!
//! let moved = Observation::attached(at(50.0), Size::new(10.0, 10.0));
//! assert_eq!(tracker.poll(Duration::from_secs(1), &config, &moved), vec![TrackerCommand::Reposition]);
//! ```

use core::time::Duration;

use kurbo::{Point, Rect, Size};

use crate::config::PlacementConfig;
use crate::geometry::{GeometrySnapshot, OriginGeometry};
use crate::host::{ClipAxes, ScrollAncestor, ScrollSource};
use crate::types::Placement;

/// Whether a tracker is following a panel.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum TrackerState {
    /// No panel is open.
    #[default]
    Idle,
    /// A panel is open and being followed.
    Tracking,
}

/// Action the caller should take in response to a tracker decision.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TrackerCommand {
    /// Run a full placement again.
    Reposition,
    /// Close the panel.
    Close,
    /// Show or hide the panel without closing it.
    SetVisible(bool),
    /// Move the panel to these coordinates (in the placement's space) without re-running.
    MoveTo(Point),
}

/// What the host reports on a timer tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Observation {
    /// The origin is still part of the document.
    pub origin_attached: bool,
    /// The panel is still part of the document.
    pub panel_attached: bool,
    /// Fresh geometry.
    pub geometry: GeometrySnapshot,
    /// Current size of the panel's content box.
    pub content: Size,
}

impl Observation {
    /// Observation with both origin and panel attached.
    pub fn attached(geometry: GeometrySnapshot, content: Size) -> Self {
        Self {
            origin_attached: true,
            panel_attached: true,
            geometry,
            content,
        }
    }
}

/// Follows one open panel.
#[derive(Clone, Debug, Default)]
pub struct Tracker {
    state: TrackerState,
    geometry: GeometrySnapshot,
    content: Size,
    placement: Option<Placement>,
    visible: bool,
    last_poll: Option<Duration>,
}

impl Tracker {
    /// An idle tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> TrackerState {
        self.state
    }

    /// True while tracking.
    pub fn is_tracking(&self) -> bool {
        self.state == TrackerState::Tracking
    }

    /// The placement recorded last.
    pub fn last_placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    /// False while the panel is hidden because its origin is clipped.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Start tracking a freshly placed, visible panel.
    pub fn start(
        &mut self,
        now: Duration,
        geometry: GeometrySnapshot,
        placement: Placement,
        content: Size,
    ) {
        self.state = TrackerState::Tracking;
        self.visible = true;
        self.last_poll = Some(now);
        self.record(geometry, placement, content);
    }

    /// Record the result of a new placement run.
    pub fn record(&mut self, geometry: GeometrySnapshot, placement: Placement, content: Size) {
        self.geometry = geometry;
        self.placement = Some(placement);
        self.content = content;
    }

    /// Stop tracking and forget everything recorded.
    pub fn stop(&mut self) {
        *self = Self::default();
    }

    /// Timer tick. Does nothing when idle or when called again within the configured interval.
    pub fn poll(
        &mut self,
        now: Duration,
        config: &PlacementConfig,
        observation: &Observation,
    ) -> Vec<TrackerCommand> {
        if !self.is_tracking() {
            return Vec::new();
        }
        if let Some(last) = self.last_poll
            && now.saturating_sub(last) < config.tracker_interval
        {
            return Vec::new();
        }
        self.last_poll = Some(now);

        if !observation.origin_attached || !observation.panel_attached {
            #[cfg(feature = "tracing")]
            tracing::debug!("origin or panel detached, closing");
            return vec![TrackerCommand::Close];
        }

        if config.track_origin && origin_moved(&self.geometry.origin, &observation.geometry.origin)
        {
            self.geometry = observation.geometry;
            #[cfg(feature = "tracing")]
            tracing::debug!(close = config.close_on_origin_move, "origin moved");
            return vec![if config.close_on_origin_move {
                TrackerCommand::Close
            } else {
                TrackerCommand::Reposition
            }];
        }

        if config.track_panel && observation.content != self.content {
            self.content = observation.content;
            #[cfg(feature = "tracing")]
            tracing::debug!("panel content resized");
            return vec![TrackerCommand::Reposition];
        }

        Vec::new()
    }

    /// Scroll event. `geometry` is recomputed by the caller after the scroll; `clipped`
    /// is the result of [`origin_clipped`] for ancestor scrolls.
    pub fn on_scroll(
        &mut self,
        source: ScrollSource,
        config: &PlacementConfig,
        geometry: &GeometrySnapshot,
        clipped: bool,
    ) -> Vec<TrackerCommand> {
        if !self.is_tracking() {
            return Vec::new();
        }
        if config.close_on_scroll {
            return vec![TrackerCommand::Close];
        }

        match source {
            // A non-fixed panel scrolls with the document; a fixed one stays with its origin.
            ScrollSource::Window => {
                if !self.geometry.origin.fixed_lineage && config.reposition_on_scroll {
                    vec![TrackerCommand::Reposition]
                } else {
                    Vec::new()
                }
            }
            ScrollSource::Ancestor => {
                let mut out = Vec::new();
                if clipped {
                    if self.visible {
                        self.visible = false;
                        out.push(TrackerCommand::SetVisible(false));
                    }
                    return out;
                }
                if !self.visible {
                    self.visible = true;
                    out.push(TrackerCommand::SetVisible(true));
                }
                if config.reposition_on_scroll {
                    out.push(TrackerCommand::Reposition);
                } else if let Some(placement) = &self.placement {
                    let delta = geometry.origin.document_offset.origin()
                        - self.geometry.origin.document_offset.origin();
                    out.push(TrackerCommand::MoveTo(placement.coord + delta));
                }
                out
            }
        }
    }
}

/// Size first, then the offset that matters for the origin's positioning.
fn origin_moved(before: &OriginGeometry, after: &OriginGeometry) -> bool {
    if before.size != after.size {
        return true;
    }
    if after.fixed_lineage {
        before.window_offset != after.window_offset
    } else {
        before.document_offset != after.document_offset
    }
}

/// True if an ancestor hides part of the origin through its overflow clipping.
///
/// `ancestors` are ordered from the nearest outwards. A fixed origin is never clipped, and
/// the walk stops after the first fixed ancestor, since nothing beyond it scrolls it.
pub fn origin_clipped(
    geometry: &GeometrySnapshot,
    origin_fixed: bool,
    ancestors: &[ScrollAncestor],
) -> bool {
    if origin_fixed {
        return false;
    }
    let o = geometry.origin.window_offset;
    for ancestor in ancestors {
        if clips(ancestor, o) {
            return true;
        }
        if ancestor.fixed {
            break;
        }
    }
    false
}

fn clips(ancestor: &ScrollAncestor, o: Rect) -> bool {
    let r = ancestor.rect;
    (ancestor.clip.contains(ClipAxes::X) && (o.x0 < r.x0 || o.x1 > r.x1))
        || (ancestor.clip.contains(ClipAxes::Y) && (o.y0 < r.y0 || o.y1 > r.y1))
}
