// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placer: one full placement run, from geometry to the final write.
//!
//! ## Pipeline
//!
//! 1. [`GeometrySnapshot::compute`] reads origin and viewport.
//! 2. [`find_targets`] locates the per-side anchors.
//! 3. A measuring copy of the panel gets the width limits and a [`Ruler`].
//! 4. [`search::run`] tests candidates; [`PlacementHooks::position_tested`] may edit them.
//! 5. [`search::select`] picks the winner, or [`search::last_resort`] measures one.
//! 6. [`resolve::propose`] computes coordinates; [`PlacementHooks::position`] may override.
//! 7. The ruler is dropped and [`resolve::finalize`] converts to the parent's space.
//!
//! Nothing is written to the real panel until [`Placer::place`] makes its single
//! [`Positionable::apply`] call at the very end.

use crate::config::{ConfigError, PlacementConfig};
use crate::geometry::GeometrySnapshot;
use crate::hooks::{NoHooks, PlacementHooks, PositionContext, PositionDecision};
use crate::host::{Measurable, Origin, Positionable, Viewport};
use crate::resolve;
use crate::ruler::Ruler;
use crate::search;
use crate::target::find_targets;
use crate::types::{Candidate, Placement};

/// Everything a run produced, for bookkeeping and diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementRun {
    /// Geometry the run was based on.
    pub geometry: GeometrySnapshot,
    /// The winning candidate.
    pub winner: Candidate,
    /// Final placement.
    pub placement: Placement,
}

/// Runs placements with a fixed configuration and set of hooks.
#[derive(Clone, Debug, Default)]
pub struct Placer<H = NoHooks> {
    config: PlacementConfig,
    hooks: H,
}

impl Placer<NoHooks> {
    /// Create a placer without hooks.
    pub fn new(config: PlacementConfig) -> Self {
        Self {
            config,
            hooks: NoHooks,
        }
    }

    /// Create a placer without hooks, rejecting an invalid configuration.
    pub fn try_new(config: PlacementConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }
}

impl<H: PlacementHooks> Placer<H> {
    /// Create a placer with caller-supplied hooks.
    pub fn with_hooks(config: PlacementConfig, hooks: H) -> Self {
        Self { config, hooks }
    }

    /// Current configuration.
    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Mutable configuration; changes apply to the next run.
    pub fn config_mut(&mut self) -> &mut PlacementConfig {
        &mut self.config
    }

    /// The hooks.
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Mutable hooks.
    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Take a geometry snapshot with this placer's [`origin_box`](PlacementHooks::origin_box) hook.
    pub fn snapshot<O, V>(&mut self, origin: &O, viewport: &V) -> GeometrySnapshot
    where
        O: Origin + ?Sized,
        V: Viewport + ?Sized,
    {
        GeometrySnapshot::compute(origin, viewport, &mut self.hooks)
    }

    /// Compute a placement without touching the real panel.
    pub fn compute<O, V, P>(&mut self, origin: &mut O, viewport: &V, panel: &P) -> PlacementRun
    where
        O: Origin + ?Sized,
        V: Viewport + ?Sized,
        P: Positionable + ?Sized,
    {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("placement_run").entered();

        let geometry = self.snapshot(origin, viewport);
        let targets = find_targets(origin, &geometry);

        let mut copy = panel.measuring_copy();
        copy.set_width_limits(self.config.min_width, self.config.max_width);
        let mut ruler = Ruler::new(&mut copy);

        let mut candidates =
            search::run(&geometry, &targets, &self.config, &mut ruler, &mut self.hooks);
        if let Some(edited) = self.hooks.position_tested(&candidates) {
            candidates = edited;
        }
        let winner = match search::select(candidates, &self.config) {
            Some(winner) => winner,
            None => search::last_resort(&geometry, &targets, &self.config, &mut ruler),
        };
        ruler.set_side(winner.side);

        let proposal = resolve::propose(&winner, &geometry, self.config.min_intersection);
        let ctx = PositionContext {
            winner: &winner,
            geometry: &geometry,
        };
        let proposal = match self.hooks.position(&proposal, ctx) {
            PositionDecision::Accept => proposal,
            PositionDecision::Override(replacement) => replacement,
        };
        ruler.destroy();

        let placement = resolve::finalize(proposal, &geometry, &self.config);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            container = ?winner.container,
            side = ?placement.side,
            mode = ?winner.mode,
            x = placement.coord.x,
            y = placement.coord.y,
            "placed panel"
        );

        PlacementRun {
            geometry,
            winner,
            placement,
        }
    }

    /// Compute a placement and write it to `panel`.
    pub fn place<O, V, P>(&mut self, origin: &mut O, viewport: &V, panel: &mut P) -> PlacementRun
    where
        O: Origin + ?Sized,
        V: Viewport + ?Sized,
        P: Positionable + ?Sized,
    {
        let run = self.compute(origin, viewport, panel);
        panel.apply(&run.placement);
        run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{FlowPanel, HeadlessOrigin, HeadlessViewport};
    use crate::hooks::{Probe, TestDecision};
    use crate::types::{Container, Mode, PositionMode, Proposal, Side};
    use kurbo::{Point, Rect, Size};

    fn viewport() -> HeadlessViewport {
        HeadlessViewport::new(Size::new(800.0, 600.0))
    }

    #[test]
    fn prefers_top_when_it_fits() {
        let mut origin = HeadlessOrigin::new(Rect::new(300.0, 300.0, 340.0, 320.0));
        let mut panel = FlowPanel::rigid(Size::new(100.0, 50.0));
        let mut placer = Placer::new(PlacementConfig::default());
        let run = placer.place(&mut origin, &viewport(), &mut panel);
        assert_eq!(run.winner.container, Container::Window);
        assert_eq!(run.placement.side, Side::Top);
        assert_eq!(run.placement.coord, Point::new(270.0, 244.0));
        assert_eq!(panel.applied(), Some(&run.placement));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PlacementConfig::default().sides(Vec::<Side>::new());
        assert_eq!(Placer::try_new(config).err(), Some(ConfigError::NoSides));
    }

    #[test]
    fn measuring_copy_is_restored() {
        let mut origin = HeadlessOrigin::new(Rect::new(300.0, 300.0, 340.0, 320.0));
        let panel = FlowPanel::text(Size::new(900.0, 20.0), 80.0);
        let mut placer = Placer::new(PlacementConfig::default());
        let _ = placer.compute(&mut origin, &viewport(), &panel);
        assert_eq!(panel.open_copies(), 0);
        assert!(panel.applied().is_none(), "compute never writes to the panel");
    }

    #[test]
    fn empty_edit_falls_back_to_document_bottom() {
        struct Clear;
        impl PlacementHooks for Clear {
            fn position_tested(&mut self, _results: &[Candidate]) -> Option<Vec<Candidate>> {
                Some(Vec::new())
            }
        }
        let mut origin = HeadlessOrigin::new(Rect::new(300.0, 300.0, 340.0, 320.0));
        let panel = FlowPanel::rigid(Size::new(100.0, 50.0));
        let mut placer = Placer::with_hooks(PlacementConfig::default(), Clear);
        let run = placer.compute(&mut origin, &viewport(), &panel);
        assert_eq!(run.winner.container, Container::Document);
        assert_eq!(run.winner.side, Side::Bottom);
        assert_eq!(run.winner.mode, Mode::Natural);
    }

    #[test]
    fn override_is_taken_verbatim() {
        struct Pin;
        impl PlacementHooks for Pin {
            fn position(&mut self, p: &Proposal, _ctx: PositionContext<'_>) -> PositionDecision {
                PositionDecision::Override(Proposal {
                    side: Side::Left,
                    coord: Point::new(-500.0, 3.0),
                    ..p.clone()
                })
            }
        }
        let mut origin = HeadlessOrigin::new(Rect::new(300.0, 300.0, 340.0, 320.0));
        let panel = FlowPanel::rigid(Size::new(100.0, 50.0));
        let mut placer = Placer::with_hooks(PlacementConfig::default(), Pin);
        let run = placer.compute(&mut origin, &viewport(), &panel);
        assert_eq!(run.placement.side, Side::Left);
        assert_eq!(run.placement.coord, Point::new(-500.0, 3.0));
        assert_eq!(run.placement.position, PositionMode::Absolute);
    }

    #[test]
    fn hooks_can_be_borrowed() {
        #[derive(Default)]
        struct Count(u32);
        impl PlacementHooks for Count {
            fn position_test(&mut self, _probe: &Probe, _results: &[Candidate]) -> TestDecision {
                self.0 += 1;
                TestDecision::Default
            }
        }
        let mut count = Count::default();
        let mut origin = HeadlessOrigin::new(Rect::new(300.0, 300.0, 340.0, 320.0));
        let panel = FlowPanel::rigid(Size::new(100.0, 50.0));
        let mut placer = Placer::with_hooks(PlacementConfig::default(), &mut count);
        let _ = placer.compute(&mut origin, &viewport(), &panel);
        // One container probe each, plus every side and mode of the window even once satisfied.
        assert_eq!(count.0, 10);
    }
}
