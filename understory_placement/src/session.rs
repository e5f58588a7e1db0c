// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session: the open/track/close lifecycle of one panel.
//!
//! ## Overview
//!
//! A [`Session`] owns an origin and a panel and composes a [`Placer`] with a [`Tracker`] by
//! plain delegation. The viewport is borrowed per call, since many sessions share one.
//!
//! - [`Session::open`] places and shows the panel and starts tracking.
//! - [`Session::tick`] and [`Session::on_scroll`] feed the tracker and execute its commands.
//! - [`Session::on_resize`] and [`Session::reposition`] re-run placement.
//! - [`Session::close`] hides the panel and stops tracking.
//!
//! Each method returns what it did, so callers can log or assert on it.

use core::time::Duration;

use crate::hooks::{NoHooks, PlacementHooks};
use crate::host::{Origin, Positionable, ScrollSource, ScrollTrackable, Viewport};
use crate::placer::{PlacementRun, Placer};
use crate::tracker::{Observation, Tracker, TrackerCommand, origin_clipped};
use crate::types::Placement;

/// One panel attached to one origin.
#[derive(Debug)]
pub struct Session<O, P, H = NoHooks> {
    origin: O,
    panel: P,
    placer: Placer<H>,
    tracker: Tracker,
    last_run: Option<PlacementRun>,
}

impl<O, P, H> Session<O, P, H>
where
    O: Origin + ScrollTrackable,
    P: Positionable,
    H: PlacementHooks,
{
    /// A closed session.
    pub fn new(origin: O, panel: P, placer: Placer<H>) -> Self {
        Self {
            origin,
            panel,
            placer,
            tracker: Tracker::new(),
            last_run: None,
        }
    }

    /// The origin.
    pub fn origin(&self) -> &O {
        &self.origin
    }

    /// Mutable origin, for hosts that update it in place.
    pub fn origin_mut(&mut self) -> &mut O {
        &mut self.origin
    }

    /// The panel.
    pub fn panel(&self) -> &P {
        &self.panel
    }

    /// Mutable panel, for hosts that change its content.
    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    /// The placer.
    pub fn placer(&self) -> &Placer<H> {
        &self.placer
    }

    /// Mutable placer, for configuration changes between runs.
    pub fn placer_mut(&mut self) -> &mut Placer<H> {
        &mut self.placer
    }

    /// The tracker.
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// The most recent placement run, kept while open.
    pub fn last_run(&self) -> Option<&PlacementRun> {
        self.last_run.as_ref()
    }

    /// The most recent placement, kept while open.
    pub fn last_placement(&self) -> Option<&Placement> {
        self.last_run.as_ref().map(|run| &run.placement)
    }

    /// True while the panel is open.
    pub fn is_open(&self) -> bool {
        self.tracker.is_tracking()
    }

    /// True while both origin and panel are part of the document.
    pub fn is_alive(&self) -> bool {
        ScrollTrackable::is_attached(&self.origin) && self.panel.is_attached()
    }

    /// Take back the origin and panel.
    pub fn into_parts(self) -> (O, P, Placer<H>) {
        (self.origin, self.panel, self.placer)
    }

    /// Place and show the panel, then start tracking. Re-places if already open.
    pub fn open<V: Viewport + ?Sized>(&mut self, now: Duration, viewport: &V) -> &PlacementRun {
        let run = self.placer.place(&mut self.origin, viewport, &mut self.panel);
        self.panel.set_visible(true);
        self.tracker.start(
            now,
            run.geometry,
            run.placement.clone(),
            self.panel.content_size(),
        );
        self.last_run.insert(run)
    }

    /// Hide the panel and stop tracking.
    pub fn close(&mut self) {
        if !self.is_open() {
            return;
        }
        self.panel.set_visible(false);
        self.tracker.stop();
        self.last_run = None;
    }

    /// Re-run placement. Does nothing while closed.
    pub fn reposition<V: Viewport + ?Sized>(&mut self, viewport: &V) -> Option<&PlacementRun> {
        if !self.is_open() {
            return None;
        }
        let run = self.placer.place(&mut self.origin, viewport, &mut self.panel);
        self.tracker.record(
            run.geometry,
            run.placement.clone(),
            self.panel.content_size(),
        );
        Some(self.last_run.insert(run))
    }

    /// Timer tick: poll the tracker and execute its commands.
    pub fn tick<V: Viewport + ?Sized>(
        &mut self,
        now: Duration,
        viewport: &V,
    ) -> Vec<TrackerCommand> {
        if !self.is_open() {
            return Vec::new();
        }
        let observation = Observation {
            origin_attached: ScrollTrackable::is_attached(&self.origin),
            panel_attached: self.panel.is_attached(),
            geometry: self.placer.snapshot(&self.origin, viewport),
            content: self.panel.content_size(),
        };
        let commands = self
            .tracker
            .poll(now, self.placer.config(), &observation);
        self.execute(&commands, viewport);
        commands
    }

    /// A scroll happened in the viewport or in an ancestor of the origin.
    pub fn on_scroll<V: Viewport + ?Sized>(
        &mut self,
        source: ScrollSource,
        viewport: &V,
    ) -> Vec<TrackerCommand> {
        if !self.is_open() {
            return Vec::new();
        }
        let geometry = self.placer.snapshot(&self.origin, viewport);
        let clipped = source == ScrollSource::Ancestor
            && origin_clipped(
                &geometry,
                self.origin.is_fixed(),
                &self.origin.scroll_ancestors(),
            );
        let commands = self
            .tracker
            .on_scroll(source, self.placer.config(), &geometry, clipped);
        self.execute(&commands, viewport);
        commands
    }

    /// The viewport was resized.
    pub fn on_resize<V: Viewport + ?Sized>(&mut self, viewport: &V) -> Option<&PlacementRun> {
        self.reposition(viewport)
    }

    fn execute<V: Viewport + ?Sized>(&mut self, commands: &[TrackerCommand], viewport: &V) {
        for command in commands {
            match *command {
                TrackerCommand::Reposition => {
                    self.reposition(viewport);
                }
                TrackerCommand::Close => {
                    self.close();
                    return;
                }
                TrackerCommand::SetVisible(visible) => self.panel.set_visible(visible),
                TrackerCommand::MoveTo(coord) => self.panel.move_to(coord),
            }
        }
    }
}
