// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless host: in-memory implementations of the capability traits.
//!
//! ## Overview
//!
//! - [`HeadlessViewport`]: a window of fixed size over a scrollable document.
//! - [`HeadlessOrigin`]: one or more line boxes, optionally an image-map area, clipping
//!   ancestors, and fixed positioning.
//! - [`FlowPanel`]: a panel whose content reflows like text. It wraps into lines no narrower
//!   than its widest unbreakable run, growing taller at constant line height.
//!
//! Useful for tests, benchmarks, and for running the engine outside a document model.
//!
//! ```
//! use kurbo::{Rect, Size};
//! use understory_placement::config::PlacementConfig;
//! use understory_placement::headless::{FlowPanel, HeadlessOrigin, HeadlessViewport};
//! use understory_placement::placer::Placer;
//! use understory_placement::types::Side;
//!
//! let viewport = HeadlessViewport::new(Size::new(800.0, 600.0));
//! let mut origin = HeadlessOrigin::new(Rect::new(10.0, 10.0, 50.0, 30.0));
//! let mut panel = FlowPanel::text(Size::new(300.0, 20.0), 60.0);
//!
//! let run = Placer::new(PlacementConfig::default()).place(&mut origin, &viewport, &mut panel);
//! // No room above: the panel flips below the origin.
//! assert_eq!(run.placement.side, Side::Bottom);
//! ```

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Point, Rect, Size, Vec2};

use crate::geometry::AreaShape;
use crate::host::{
    Measurable, Origin, PanelLayout, Positionable, ScrollAncestor, ScrollTrackable, Sizing,
    Viewport,
};
use crate::types::{Placement, Side};

/// A window over a scrollable document.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HeadlessViewport {
    /// Visible size.
    pub window: Size,
    /// Scroll position.
    pub scroll: Vec2,
    /// Full document size.
    pub document: Size,
}

impl HeadlessViewport {
    /// Unscrolled viewport over a document of the same size.
    pub fn new(window: Size) -> Self {
        Self {
            window,
            scroll: Vec2::ZERO,
            document: window,
        }
    }

    /// Set the document size.
    #[must_use]
    pub fn with_document(mut self, document: Size) -> Self {
        self.document = document;
        self
    }

    /// Set the scroll position.
    #[must_use]
    pub fn with_scroll(mut self, scroll: Vec2) -> Self {
        self.scroll = scroll;
        self
    }
}

impl Viewport for HeadlessViewport {
    fn window_size(&self) -> Size {
        self.window
    }

    fn scroll(&self) -> Vec2 {
        self.scroll
    }

    fn document_size(&self) -> Size {
        self.document
    }
}

/// An origin made of window-relative line boxes.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadlessOrigin {
    lines: Vec<Rect>,
    area: Option<AreaShape>,
    fixed_lineage: bool,
    fixed: bool,
    attached: bool,
    ancestors: Vec<ScrollAncestor>,
    opacity: f64,
}

impl HeadlessOrigin {
    /// A single-box origin.
    pub fn new(rect: Rect) -> Self {
        Self::lines(vec![rect])
    }

    /// An inline origin wrapped over several lines, in document order.
    pub fn lines(lines: Vec<Rect>) -> Self {
        Self {
            lines,
            area: None,
            fixed_lineage: false,
            fixed: false,
            attached: true,
            ancestors: Vec::new(),
            opacity: 1.0,
        }
    }

    /// An image-map area over `image`.
    pub fn area(image: Rect, shape: AreaShape) -> Self {
        Self {
            area: Some(shape),
            ..Self::new(image)
        }
    }

    /// Mark an ancestor as fixed.
    #[must_use]
    pub fn with_fixed_lineage(mut self) -> Self {
        self.fixed_lineage = true;
        self
    }

    /// Mark the element itself as fixed (implies fixed lineage).
    #[must_use]
    pub fn with_fixed(mut self) -> Self {
        self.fixed = true;
        self.fixed_lineage = true;
        self
    }

    /// Set the clipping ancestors, nearest first.
    #[must_use]
    pub fn with_ancestors(mut self, ancestors: Vec<ScrollAncestor>) -> Self {
        self.ancestors = ancestors;
        self
    }

    /// Move every line box, as a scroll or layout change would.
    pub fn translate(&mut self, delta: Vec2) {
        for line in &mut self.lines {
            *line = *line + delta;
        }
    }

    /// Replace the line boxes.
    pub fn set_lines(&mut self, lines: Vec<Rect>) {
        self.lines = lines;
    }

    /// Remove the origin from the document.
    pub fn detach(&mut self) {
        self.attached = false;
    }
}

impl Origin for HeadlessOrigin {
    fn bounding_rect(&self) -> Option<Rect> {
        if !self.attached {
            return None;
        }
        let mut it = self.lines.iter().copied();
        let first = it.next()?;
        Some(it.fold(first, |acc, r| acc.union(r)))
    }

    fn client_rects(&self) -> Vec<Rect> {
        if self.attached && self.area.is_none() {
            self.lines.clone()
        } else {
            Vec::new()
        }
    }

    fn area(&self) -> Option<AreaShape> {
        self.area.clone()
    }

    fn fixed_lineage(&self) -> bool {
        self.fixed_lineage
    }

    fn opacity(&self) -> f64 {
        self.opacity
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity;
    }
}

impl ScrollTrackable for HeadlessOrigin {
    fn is_attached(&self) -> bool {
        self.attached
    }

    fn is_fixed(&self) -> bool {
        self.fixed
    }

    fn scroll_ancestors(&self) -> Vec<ScrollAncestor> {
        self.ancestors.clone()
    }
}

/// Reflowing content shared by [`FlowPanel`] and [`FlowCopy`].
#[derive(Copy, Clone, Debug, PartialEq)]
struct Content {
    natural: Size,
    min_content: f64,
}

impl Content {
    /// Height when laid out in lines of `width`.
    fn height_at(self, width: f64) -> f64 {
        let line = width.max(self.min_content.min(self.natural.width));
        if line <= 0.0 || self.natural.width <= line {
            self.natural.height
        } else {
            self.natural.height * (self.natural.width / line).ceil()
        }
    }

    /// Width the content needs no matter how narrow its box.
    fn min_width(self) -> f64 {
        self.min_content.min(self.natural.width)
    }
}

/// A panel with reflowing content.
#[derive(Debug)]
pub struct FlowPanel {
    content: Content,
    open_copies: Rc<Cell<usize>>,
    applied: Option<Placement>,
    coord: Option<Point>,
    visible: bool,
    attached: bool,
}

impl FlowPanel {
    /// Content that reflows between its natural width and `min_content`.
    pub fn text(natural: Size, min_content: f64) -> Self {
        Self {
            content: Content {
                natural,
                min_content: min_content.max(0.0),
            },
            open_copies: Rc::new(Cell::new(0)),
            applied: None,
            coord: None,
            visible: false,
            attached: true,
        }
    }

    /// Content that never reflows.
    pub fn rigid(size: Size) -> Self {
        Self::text(size, size.width)
    }

    /// Change the content's natural size.
    pub fn set_natural(&mut self, natural: Size) {
        self.content.natural = natural;
    }

    /// Last placement written with [`Positionable::apply`].
    pub fn applied(&self) -> Option<&Placement> {
        self.applied.as_ref()
    }

    /// Current coordinates.
    pub fn coord(&self) -> Option<Point> {
        self.coord
    }

    /// Whether the panel is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Measuring copies not yet restored.
    pub fn open_copies(&self) -> usize {
        self.open_copies.get()
    }

    /// Remove the panel from the document.
    pub fn detach(&mut self) {
        self.attached = false;
    }
}

impl Positionable for FlowPanel {
    type Measured = FlowCopy;

    fn measuring_copy(&self) -> FlowCopy {
        self.open_copies.set(self.open_copies.get() + 1);
        FlowCopy {
            content: self.content,
            side: None,
            min_width: 0.0,
            max_width: None,
            sizing: Sizing::Natural,
            animated: true,
            flushes: 0,
            open_copies: Some(Rc::clone(&self.open_copies)),
        }
    }

    fn apply(&mut self, placement: &Placement) {
        self.coord = Some(placement.coord);
        self.applied = Some(placement.clone());
    }

    fn move_to(&mut self, coord: Point) {
        self.coord = Some(coord);
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn content_size(&self) -> Size {
        self.content.natural
    }

    fn is_attached(&self) -> bool {
        self.attached
    }
}

/// Detached measuring copy of a [`FlowPanel`].
#[derive(Debug)]
pub struct FlowCopy {
    content: Content,
    side: Option<Side>,
    min_width: f64,
    max_width: Option<f64>,
    sizing: Sizing,
    animated: bool,
    flushes: u32,
    open_copies: Option<Rc<Cell<usize>>>,
}

impl FlowCopy {
    /// Side styling last applied.
    pub fn side(&self) -> Option<Side> {
        self.side
    }

    /// False once entrance-animation styling was removed.
    pub fn is_animated(&self) -> bool {
        self.animated
    }

    /// Layout flushes so far.
    pub fn flushes(&self) -> u32 {
        self.flushes
    }

    /// Width the content lays out in for a box of `width`, after the width limits.
    fn limited(&self, width: f64) -> f64 {
        let capped = self.max_width.map_or(width, |max| width.min(max));
        capped.max(self.min_width)
    }
}

impl Measurable for FlowCopy {
    fn set_side(&mut self, side: Side) {
        self.side = Some(side);
    }

    fn set_width_limits(&mut self, min: f64, max: Option<f64>) {
        self.min_width = min.max(0.0);
        self.max_width = max;
    }

    fn remove_entrance_animation(&mut self) {
        self.animated = false;
    }

    fn set_sizing(&mut self, sizing: Sizing) {
        self.sizing = sizing;
    }

    fn flush_layout(&mut self) {
        self.flushes += 1;
    }

    fn layout(&self) -> PanelLayout {
        let content = self.content;
        match self.sizing {
            Sizing::Natural => {
                let width = self.limited(content.natural.width);
                PanelLayout {
                    border_box: Size::new(width, content.height_at(width)),
                    content_width: width,
                    content_scroll_width: width.max(content.min_width()),
                }
            }
            Sizing::Constrained(c) => {
                let wrap = self.limited(c.width);
                PanelLayout {
                    border_box: Size::new(c.width, content.height_at(wrap)),
                    content_width: c.width,
                    content_scroll_width: c.width.max(wrap).max(content.min_width()),
                }
            }
        }
    }

    fn restore(&mut self) {
        self.sizing = Sizing::Natural;
        if let Some(open) = self.open_copies.take() {
            open.set(open.get().saturating_sub(1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruler::{Fits, Ruler};

    #[test]
    fn rigid_content_overflows_narrow_constraint() {
        let panel = FlowPanel::rigid(Size::new(120.0, 80.0));
        let mut copy = panel.measuring_copy();
        let mut ruler = Ruler::new(&mut copy);
        let m = ruler.constrain(100.0, 100.0).measure();
        assert_eq!(
            m.fits,
            Some(Fits {
                width: false,
                height: true
            })
        );
        drop(ruler);
        assert_eq!(panel.open_copies(), 0);
    }

    #[test]
    fn text_wraps_into_more_lines() {
        let panel = FlowPanel::text(Size::new(900.0, 20.0), 80.0);
        let mut copy = panel.measuring_copy();
        let mut ruler = Ruler::new(&mut copy);
        let m = ruler.constrain(400.0, 100.0).measure();
        assert_eq!(m.size, Size::new(400.0, 60.0));
        assert!(m.fits.is_some_and(Fits::both));
        let m = ruler.constrain(400.0, 50.0).measure();
        assert!(!m.fits.is_some_and(|f| f.height));
    }

    #[test]
    fn width_limits_apply_in_natural_mode() {
        let panel = FlowPanel::text(Size::new(900.0, 20.0), 80.0);
        let mut copy = panel.measuring_copy();
        copy.set_width_limits(0.0, Some(300.0));
        assert_eq!(copy.layout().border_box, Size::new(300.0, 60.0));
        copy.set_width_limits(1000.0, None);
        assert_eq!(copy.layout().border_box, Size::new(1000.0, 20.0));
    }

    #[test]
    fn area_origin_reports_image_box_only() {
        let shape = AreaShape::parse("rect", "0,0,10,10").unwrap();
        let origin = HeadlessOrigin::area(Rect::new(5.0, 5.0, 105.0, 105.0), shape);
        assert_eq!(origin.bounding_rect(), Some(Rect::new(5.0, 5.0, 105.0, 105.0)));
        assert!(origin.client_rects().is_empty());
    }

    #[test]
    fn detached_origin_has_no_boxes() {
        let mut origin = HeadlessOrigin::lines(vec![
            Rect::new(0.0, 0.0, 50.0, 20.0),
            Rect::new(0.0, 20.0, 30.0, 40.0),
        ]);
        assert_eq!(origin.bounding_rect(), Some(Rect::new(0.0, 0.0, 50.0, 40.0)));
        origin.detach();
        assert_eq!(origin.bounding_rect(), None);
        assert!(!ScrollTrackable::is_attached(&origin));
    }
}
