// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capability traits the host toolkit implements.
//!
//! ## Overview
//!
//! The engine never touches a document model directly. Each capability it needs is a
//! small trait:
//!
//! - [`Viewport`]: window size, scroll position, and document size.
//! - [`Origin`]: the reference element's rendered boxes.
//! - [`ScrollTrackable`]: attachment and overflow-clipping ancestry of the origin.
//! - [`Measurable`]: a detached copy of the panel that can be sized and measured.
//! - [`Positionable`]: the real panel, which receives the final write.
//!
//! All rectangles are window-relative (the viewport's top-left corner is the origin).
//! See [`headless`](crate::headless) for an in-memory implementation.

use bitflags::bitflags;
use kurbo::{Point, Rect, Size, Vec2};

use crate::geometry::AreaShape;
use crate::types::{Placement, Side};

/// Read access to the viewport and document.
pub trait Viewport {
    /// Size of the visible viewport.
    fn window_size(&self) -> Size;
    /// Current scroll position of the viewport within the document.
    fn scroll(&self) -> Vec2;
    /// Full scrollable size of the document.
    fn document_size(&self) -> Size;
}

/// The reference element a panel is attached to.
pub trait Origin {
    /// Window-relative border box, or `None` when the element is detached.
    ///
    /// For an image-map area this is the box of the image the map is bound to;
    /// [`Origin::area`] then describes the area within that image.
    fn bounding_rect(&self) -> Option<Rect>;

    /// Window-relative boxes the element renders as, in document order.
    ///
    /// Wrapped inline content reports one box per line fragment.
    fn client_rects(&self) -> Vec<Rect>;

    /// Image-map area shape, when the origin is an area element.
    fn area(&self) -> Option<AreaShape> {
        None
    }

    /// True if the element or one of its ancestors is positioned `fixed`.
    fn fixed_lineage(&self) -> bool {
        false
    }

    /// Current opacity.
    fn opacity(&self) -> f64 {
        1.0
    }

    /// Set opacity. Used transiently while reading client rects.
    fn set_opacity(&mut self, _opacity: f64) {}
}

bitflags! {
    /// Axes on which an ancestor hides overflowing content.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ClipAxes: u8 {
        /// Horizontal overflow is not visible.
        const X = 0b0000_0001;
        /// Vertical overflow is not visible.
        const Y = 0b0000_0010;
    }
}

impl Default for ClipAxes {
    fn default() -> Self {
        Self::empty()
    }
}

/// A scrollable or clipping ancestor of the origin.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ScrollAncestor {
    /// Window-relative border box of the ancestor.
    pub rect: Rect,
    /// Axes on which the ancestor clips its content.
    pub clip: ClipAxes,
    /// True if the ancestor itself is positioned `fixed`.
    pub fixed: bool,
}

/// Where a scroll event came from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ScrollSource {
    /// The viewport itself scrolled.
    Window,
    /// An intermediate scrollable ancestor of the origin scrolled.
    Ancestor,
}

/// Origin capabilities needed to follow it while a panel is open.
pub trait ScrollTrackable {
    /// True while the element is part of the document.
    fn is_attached(&self) -> bool;
    /// True if the element itself (not an ancestor) is positioned `fixed`.
    fn is_fixed(&self) -> bool {
        false
    }
    /// Ancestors from the nearest outwards, up to (excluding) the root.
    fn scroll_ancestors(&self) -> Vec<ScrollAncestor>;
}

/// Sizing applied to the measured panel copy.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Sizing {
    /// Natural flow size with visible overflow.
    Natural,
    /// Box width fixed to the given width, height automatic, overflow scrollable.
    ///
    /// The height is kept so the host can report it, but layout does not cap it.
    Constrained(Size),
}

/// Layout readings from a measured panel copy.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PanelLayout {
    /// Rendered border box size of the panel.
    pub border_box: Size,
    /// Rendered width of the content box.
    pub content_width: f64,
    /// Scroll width of the content box (rounded by most engines).
    pub content_scroll_width: f64,
}

/// A detached copy of the panel that can be resized and measured.
pub trait Measurable {
    /// Apply side-dependent styling (for example an arrow).
    fn set_side(&mut self, side: Side);
    /// Forward width limits to the content.
    fn set_width_limits(&mut self, min: f64, max: Option<f64>);
    /// Drop any entrance-animation styling that would distort the size.
    fn remove_entrance_animation(&mut self);
    /// Change the sizing mode.
    fn set_sizing(&mut self, sizing: Sizing);
    /// Force layout so the next reading is not stale.
    fn flush_layout(&mut self);
    /// Read the current layout.
    fn layout(&self) -> PanelLayout;
    /// Restore the authored overflow and size values.
    fn restore(&mut self);
}

/// The real, visible panel.
pub trait Positionable {
    /// Detached copy type used for measuring.
    type Measured: Measurable;
    /// Create a detached copy for measurement. The copy is never shown.
    fn measuring_copy(&self) -> Self::Measured;
    /// Write the final placement: side styling, position scheme, coordinates, size and arrow.
    fn apply(&mut self, placement: &Placement);
    /// Move the panel without changing anything else.
    fn move_to(&mut self, coord: Point);
    /// Show or hide the panel without closing it.
    fn set_visible(&mut self, visible: bool);
    /// Current size of the content box.
    fn content_size(&self) -> Size;
    /// True while the panel is part of the document.
    fn is_attached(&self) -> bool;
}
