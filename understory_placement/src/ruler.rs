// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ruler: measure a detached panel copy, naturally or within a constraint box.
//!
//! ## Usage
//!
//! 1) Create a [`Ruler`] over the copy returned by
//!    [`Positionable::measuring_copy`](crate::host::Positionable::measuring_copy).
//! 2) Call [`Ruler::free`] or [`Ruler::constrain`], then [`Ruler::measure`], as often as needed.
//! 3) Drop the ruler (or call [`Ruler::destroy`]); the copy's authored overflow and size
//!    values are restored either way.
//!
//! A ruler holds the only mutable borrow of its copy, so two measurement sessions can never
//! interleave on the same node.

use kurbo::Size;

use crate::host::{Measurable, Sizing};
use crate::types::Side;

/// Tolerance for rounded scroll widths, in pixels.
const SCROLL_WIDTH_TOLERANCE: f64 = 1.0;

/// Per-axis fit of a constrained measurement.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Fits {
    /// The panel fits the constraint width without horizontal scrolling.
    pub width: bool,
    /// The panel height is within the constraint height.
    pub height: bool,
}

impl Fits {
    /// True when both axes fit.
    pub const fn both(self) -> bool {
        self.width && self.height
    }
}

/// Result of [`Ruler::measure`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Measurement {
    /// Rendered panel size.
    pub size: Size,
    /// Per-axis fit; only present when the ruler is constrained.
    pub fits: Option<Fits>,
}

/// A measurement session over a detached panel copy.
#[derive(Debug)]
pub struct Ruler<'a, M: Measurable + ?Sized> {
    panel: &'a mut M,
    constraints: Option<Size>,
}

impl<'a, M: Measurable + ?Sized> Ruler<'a, M> {
    /// Start a session. Entrance-animation styling is removed from the copy first.
    pub fn new(panel: &'a mut M) -> Self {
        panel.remove_entrance_animation();
        Self {
            panel,
            constraints: None,
        }
    }

    /// Current constraint box, if any.
    pub fn constraints(&self) -> Option<Size> {
        self.constraints
    }

    /// Apply side-dependent styling to the copy.
    pub fn set_side(&mut self, side: Side) -> &mut Self {
        self.panel.set_side(side);
        self
    }

    /// Cap the copy at `width` × `height` and make overflow observable.
    ///
    /// Negative values are treated as zero.
    pub fn constrain(&mut self, width: f64, height: f64) -> &mut Self {
        let c = Size::new(width.max(0.0), height.max(0.0));
        self.constraints = Some(c);
        self.panel.set_sizing(Sizing::Constrained(c));
        self
    }

    /// Return the copy to natural flow sizing.
    pub fn free(&mut self) -> &mut Self {
        self.constraints = None;
        self.panel.set_sizing(Sizing::Natural);
        self
    }

    /// Flush layout and read the copy's size.
    ///
    /// When constrained, the height must be within the constraint height and the width
    /// within the constraint width, with content needing at most
    /// one pixel of horizontal scrolling.
    pub fn measure(&mut self) -> Measurement {
        self.panel.flush_layout();
        let layout = self.panel.layout();
        let fits = self.constraints.map(|c| Fits {
            height: layout.border_box.height <= c.height,
            width: layout.border_box.width <= c.width
                && layout.content_width >= layout.content_scroll_width - SCROLL_WIDTH_TOLERANCE,
        });
        Measurement {
            size: layout.border_box,
            fits,
        }
    }

    /// End the session explicitly. Equivalent to dropping the ruler.
    pub fn destroy(self) {}
}

impl<M: Measurable + ?Sized> Drop for Ruler<'_, M> {
    fn drop(&mut self) {
        self.panel.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::PanelLayout;

    /// Unbreakable content of a fixed size.
    #[derive(Debug, Default)]
    struct Rigid {
        content: Size,
        sizing: Option<Sizing>,
        flushes: u32,
        restored: bool,
        animated: bool,
    }

    impl Measurable for Rigid {
        fn set_side(&mut self, _side: Side) {}
        fn set_width_limits(&mut self, _min: f64, _max: Option<f64>) {}
        fn remove_entrance_animation(&mut self) {
            self.animated = false;
        }
        fn set_sizing(&mut self, sizing: Sizing) {
            self.sizing = Some(sizing);
        }
        fn flush_layout(&mut self) {
            self.flushes += 1;
        }
        fn layout(&self) -> PanelLayout {
            match self.sizing {
                Some(Sizing::Constrained(c)) => PanelLayout {
                    border_box: Size::new(c.width, self.content.height),
                    content_width: c.width,
                    content_scroll_width: self.content.width.max(c.width),
                },
                _ => PanelLayout {
                    border_box: self.content,
                    content_width: self.content.width,
                    content_scroll_width: self.content.width,
                },
            }
        }
        fn restore(&mut self) {
            self.restored = true;
            self.sizing = None;
        }
    }

    #[test]
    fn constrained_reports_per_axis_fit() {
        let mut panel = Rigid {
            content: Size::new(120.0, 80.0),
            animated: true,
            ..Default::default()
        };
        let mut ruler = Ruler::new(&mut panel);
        let m = ruler.constrain(100.0, 100.0).measure();
        assert_eq!(
            m.fits,
            Some(Fits {
                width: false,
                height: true
            })
        );
        drop(ruler);
        assert!(panel.restored, "dropping the ruler restores the copy");
        assert!(!panel.animated, "animation styling is removed before measuring");
    }

    #[test]
    fn free_measurement_has_no_fit() {
        let mut panel = Rigid {
            content: Size::new(120.0, 80.0),
            ..Default::default()
        };
        let mut ruler = Ruler::new(&mut panel);
        let m = ruler.free().measure();
        assert_eq!(m.size, Size::new(120.0, 80.0));
        assert!(m.fits.is_none());
        ruler.destroy();
        assert_eq!(panel.flushes, 1, "each measure flushes layout once");
    }

    #[test]
    fn one_pixel_scroll_tolerance() {
        let mut panel = Rigid {
            content: Size::new(101.0, 20.0),
            ..Default::default()
        };
        let mut ruler = Ruler::new(&mut panel);
        assert!(ruler.constrain(100.0, 50.0).measure().fits.unwrap().both());
        assert!(!ruler.constrain(99.0, 50.0).measure().fits.unwrap().width);
    }

    #[test]
    fn negative_constraints_clamp_to_zero() {
        let mut panel = Rigid::default();
        let mut ruler = Ruler::new(&mut panel);
        ruler.constrain(-5.0, -1.0);
        assert_eq!(ruler.constraints(), Some(Size::ZERO));
    }
}
