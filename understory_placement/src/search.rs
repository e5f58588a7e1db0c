// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Candidate search: enumerate container × side × mode, measure, score, and select.
//!
//! ## Search
//!
//! - Containers are tried in order `[window, document]`; the window is skipped when
//!   viewport awareness is off.
//! - Sides follow the configured fallback order; each side tries `natural` then `constrained`.
//! - A natural measurement that fits, or whose width already fits, makes the constrained
//!   attempt pointless and it is skipped.
//! - Once a [whole](Candidate::whole) candidate is found the search is satisfied and further
//!   tests are skipped, unless [`PlacementHooks::position_test`] forces them.
//!
//! ## Ordering
//!
//! [`compare`] is a total order over candidates:
//!
//! 1. Whole candidates first, among them by side preference, then natural before constrained.
//! 2. Then fitting candidates, by side preference, then natural before constrained.
//! 3. Then everything else, with the document/bottom/natural candidate first: overflowing the
//!    document downwards grows it, while overflowing left or top cannot be scrolled to.
//!
//! Ties keep search order.

use core::cmp::Ordering;

use crate::config::PlacementConfig;
use crate::geometry::GeometrySnapshot;
use crate::hooks::{PlacementHooks, Probe, TestDecision};
use crate::host::Measurable;
use crate::ruler::{Fits, Ruler};
use crate::types::{Candidate, Container, Distance, Mode, Side, Targets};

/// Run the search and return every tested candidate, in test order.
pub fn run<M, H>(
    geo: &GeometrySnapshot,
    targets: &Targets,
    config: &PlacementConfig,
    ruler: &mut Ruler<'_, M>,
    hooks: &mut H,
) -> Vec<Candidate>
where
    M: Measurable + ?Sized,
    H: PlacementHooks + ?Sized,
{
    let mut results = Vec::new();
    let mut satisfied = false;

    for container in Container::SEARCH_ORDER {
        let probe = Probe {
            container,
            side: None,
            mode: None,
            satisfied,
        };
        let take = match hooks.position_test(&probe, &results) {
            TestDecision::Take => true,
            TestDecision::Skip => false,
            TestDecision::Default => {
                !satisfied && (container != Container::Window || config.viewport_aware)
            }
        };
        if !take {
            continue;
        }

        for &side in &config.sides {
            let distance = Distance::for_side(side, config.distance.get(side));
            ruler.set_side(side);

            for mode in Mode::SEARCH_ORDER {
                let probe = Probe {
                    container,
                    side: Some(side),
                    mode: Some(mode),
                    satisfied,
                };
                let take = match hooks.position_test(&probe, &results) {
                    TestDecision::Take => true,
                    TestDecision::Skip => false,
                    TestDecision::Default => !satisfied,
                };
                if !take {
                    continue;
                }

                let candidate =
                    measure_candidate(geo, targets, config, ruler, container, side, mode, distance);
                let available = geo.available.get(container, side);
                let pointless_constraint = mode == Mode::Natural
                    && (candidate.fits || candidate.size.width <= available.width);

                #[cfg(feature = "tracing")]
                tracing::trace!(
                    ?container,
                    ?side,
                    ?mode,
                    width = candidate.size.width,
                    height = candidate.size.height,
                    fits = candidate.fits,
                    whole = ?candidate.whole,
                    "tested placement candidate"
                );

                let whole = candidate.is_whole();
                results.push(candidate);
                if whole {
                    satisfied = true;
                } else if pointless_constraint {
                    break;
                }
            }
        }
    }

    results
}

/// Measure one candidate.
pub fn measure_candidate<M: Measurable + ?Sized>(
    geo: &GeometrySnapshot,
    targets: &Targets,
    config: &PlacementConfig,
    ruler: &mut Ruler<'_, M>,
    container: Container,
    side: Side,
    mode: Mode,
    distance: Distance,
) -> Candidate {
    let available = geo.available.get(container, side);
    let measurement = match mode {
        Mode::Natural => ruler.free().measure(),
        Mode::Constrained => ruler
            .constrain(
                available.width - distance.horizontal,
                available.height - distance.vertical,
            )
            .measure(),
    };
    let size = measurement.size;
    let outer_size = distance.outer(size);
    let fits = match mode {
        Mode::Natural => {
            available.width >= outer_size.width && available.height >= outer_size.height
        }
        Mode::Constrained => measurement.fits.is_some_and(Fits::both),
    };
    let whole = (container == Container::Window)
        .then(|| fits && keeps_intersection(geo, side, config.min_intersection));

    Candidate {
        container,
        side,
        mode,
        distance,
        size,
        outer_size,
        fits,
        whole,
        target: targets.get(side),
    }
}

/// True if at least `min_intersection` pixels of the origin stay on screen on the
/// cross axis of `side`, so an arrow can point at it.
pub fn keeps_intersection(geo: &GeometrySnapshot, side: Side, min_intersection: f64) -> bool {
    let o = geo.origin.window_offset;
    let w = geo.window.size;
    if side.is_vertical() {
        o.x1 >= min_intersection && w.width - o.x0 >= min_intersection
    } else {
        o.y1 >= min_intersection && w.height - o.y0 >= min_intersection
    }
}

/// Total order used to pick the winner; see the [module docs](self).
pub fn compare(a: &Candidate, b: &Candidate, config: &PlacementConfig) -> Ordering {
    match (a.is_whole(), b.is_whole()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => by_preference(a, b, config),
        (false, false) => match (a.fits, b.fits) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (true, true) => by_preference(a, b, config),
            (false, false) => is_last_resort(b).cmp(&is_last_resort(a)),
        },
    }
}

fn by_preference(a: &Candidate, b: &Candidate, config: &PlacementConfig) -> Ordering {
    config
        .side_rank(a.side)
        .cmp(&config.side_rank(b.side))
        .then_with(|| mode_rank(a.mode).cmp(&mode_rank(b.mode)))
}

fn mode_rank(mode: Mode) -> u8 {
    match mode {
        Mode::Natural => 0,
        Mode::Constrained => 1,
    }
}

fn is_last_resort(c: &Candidate) -> bool {
    c.container == Container::Document && c.side == Side::Bottom && c.mode == Mode::Natural
}

/// Sort `candidates` with [`compare`] and return the winner.
pub fn select(mut candidates: Vec<Candidate>, config: &PlacementConfig) -> Option<Candidate> {
    candidates.sort_by(|a, b| compare(a, b, config));
    candidates.into_iter().next()
}

/// Measure the document/bottom/natural candidate used when nothing else is available.
pub fn last_resort<M: Measurable + ?Sized>(
    geo: &GeometrySnapshot,
    targets: &Targets,
    config: &PlacementConfig,
    ruler: &mut Ruler<'_, M>,
) -> Candidate {
    let side = Side::Bottom;
    ruler.set_side(side);
    measure_candidate(
        geo,
        targets,
        config,
        ruler,
        Container::Document,
        side,
        Mode::Natural,
        Distance::for_side(side, config.distance.get(side)),
    )
}
