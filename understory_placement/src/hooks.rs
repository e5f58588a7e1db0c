// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed extension points for a placement run.
//!
//! ## Overview
//!
//! Every decision point is a method on [`PlacementHooks`] that returns a value; nothing is
//! communicated by mutating a shared payload. All methods have no-op defaults, so an
//! implementation only overrides what it cares about. [`NoHooks`] is the empty implementation.
//!
//! Call order within one run:
//!
//! 1. [`origin_box`](PlacementHooks::origin_box) while computing the geometry snapshot.
//! 2. [`position_test`](PlacementHooks::position_test) once per container, then once per
//!    side and mode, before each measurement.
//! 3. [`position_tested`](PlacementHooks::position_tested) once with all candidates.
//! 4. [`position`](PlacementHooks::position) once with the resolved proposal.
//!
//! ## Example
//!
//! ```
//! use understory_placement::hooks::{PlacementHooks, Probe, TestDecision};
//! use understory_placement::types::{Candidate, Container};
//!
//! /// Never place relative to the document.
//! struct WindowOnly;
//!
//! impl PlacementHooks for WindowOnly {
//!     fn position_test(&mut self, probe: &Probe, _results: &[Candidate]) -> TestDecision {
//!         if probe.container == Container::Document {
//!             TestDecision::Skip
//!         } else {
//!             TestDecision::Default
//!         }
//!     }
//! }
//! ```

use kurbo::Rect;

use crate::geometry::GeometrySnapshot;
use crate::types::{Candidate, Container, Mode, Proposal, Side};

/// What to do with the test described by a [`Probe`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum TestDecision {
    /// Run the test only if the search is not yet satisfied (and, for the window
    /// container, only if viewport awareness is enabled).
    #[default]
    Default,
    /// Run the test even if the search is already satisfied.
    Take,
    /// Do not run the test.
    Skip,
}

/// Describes a test about to be run.
///
/// `side` and `mode` are `None` for the container-level probe that gates a whole container.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Probe {
    /// Container about to be tested.
    pub container: Container,
    /// Side about to be tested.
    pub side: Option<Side>,
    /// Mode about to be tested.
    pub mode: Option<Mode>,
    /// True once a whole candidate has been found.
    pub satisfied: bool,
}

/// Decision returned by [`PlacementHooks::position`].
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PositionDecision {
    /// Keep the proposal.
    #[default]
    Accept,
    /// Replace the proposal. The replacement is used as-is: no clamping is re-applied.
    Override(Proposal),
}

/// Context passed along with the final proposal.
#[derive(Copy, Clone, Debug)]
pub struct PositionContext<'a> {
    /// The winning candidate.
    pub winner: &'a Candidate,
    /// Geometry the run was based on.
    pub geometry: &'a GeometrySnapshot,
}

/// Caller-supplied extension points. See the [module docs](self) for call order.
pub trait PlacementHooks {
    /// Replace the raw origin box (window space) before derived geometry is computed.
    fn origin_box(&mut self, raw: Rect) -> Rect {
        raw
    }

    /// Decide whether the described test runs. `results` holds the candidates so far.
    fn position_test(&mut self, _probe: &Probe, _results: &[Candidate]) -> TestDecision {
        TestDecision::Default
    }

    /// Optionally replace the candidate list before it is sorted.
    ///
    /// Returning an empty list makes the run fall back to a document, bottom,
    /// natural placement.
    fn position_tested(&mut self, _results: &[Candidate]) -> Option<Vec<Candidate>> {
        None
    }

    /// Final say over side, coordinates and size.
    fn position(&mut self, _proposal: &Proposal, _ctx: PositionContext<'_>) -> PositionDecision {
        PositionDecision::Accept
    }
}

/// Hooks that keep every default.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoHooks;

impl PlacementHooks for NoHooks {}

impl<H: PlacementHooks + ?Sized> PlacementHooks for &mut H {
    fn origin_box(&mut self, raw: Rect) -> Rect {
        (**self).origin_box(raw)
    }

    fn position_test(&mut self, probe: &Probe, results: &[Candidate]) -> TestDecision {
        (**self).position_test(probe, results)
    }

    fn position_tested(&mut self, results: &[Candidate]) -> Option<Vec<Candidate>> {
        (**self).position_tested(results)
    }

    fn position(&mut self, proposal: &Proposal, ctx: PositionContext<'_>) -> PositionDecision {
        (**self).position(proposal, ctx)
    }
}
