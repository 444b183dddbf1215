//! Axis-aligned rectangles and the predicates the quadtree is built on.
//!
//! Coordinates follow screen convention: the origin is the top-left corner
//! of the window, `x` grows to the right and `y` grows downwards. A `Rect` is
//! a top-left corner plus a width and height.
//!
//! Every predicate here is inclusive on its edges. A point lying exactly on
//! a shared edge belongs to the rectangles on both sides, and two rectangles
//! that only touch count as overlapping. The broad phase relies on this: it
//! may report too many candidates, never too few.

use crate::simulation::states::NVec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    top_left: NVec2,
    width: f64,
    height: f64,
}

impl Rect {
    pub fn new(top_left: NVec2, width: f64, height: f64) -> Self {
        debug_assert!(width >= 0.0 && height >= 0.0, "rect sides must be non-negative");
        Self {
            top_left,
            width,
            height,
        }
    }

    /// Axis-aligned square enclosing a circle (side = 2 * radius)
    pub fn bounding_square(center: &NVec2, radius: f64) -> Self {
        let side = radius * 2.0;
        Self::new(center - NVec2::new(radius, radius), side, side)
    }

    pub fn top_left(&self) -> NVec2 {
        self.top_left
    }

    pub fn top_right(&self) -> NVec2 {
        NVec2::new(self.top_left.x + self.width, self.top_left.y)
    }

    pub fn bottom_left(&self) -> NVec2 {
        NVec2::new(self.top_left.x, self.top_left.y + self.height)
    }

    pub fn bottom_right(&self) -> NVec2 {
        NVec2::new(self.top_left.x + self.width, self.top_left.y + self.height)
    }

    pub fn center(&self) -> NVec2 {
        NVec2::new(
            self.top_left.x + self.width * 0.5,
            self.top_left.y + self.height * 0.5,
        )
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// The four corners in quadrant order: top-left, top-right,
    /// bottom-left, bottom-right
    pub fn corners(&self) -> [NVec2; 4] {
        [
            self.top_left(),
            self.top_right(),
            self.bottom_left(),
            self.bottom_right(),
        ]
    }

    /// Split into four equal quadrants, in the same order as [`Rect::corners`]
    pub fn quadrants(&self) -> [Rect; 4] {
        let w = self.width * 0.5;
        let h = self.height * 0.5;
        let tl = self.top_left;
        [
            Rect::new(tl, w, h),
            Rect::new(tl + NVec2::new(w, 0.0), w, h),
            Rect::new(tl + NVec2::new(0.0, h), w, h),
            Rect::new(tl + NVec2::new(w, h), w, h),
        ]
    }

    pub fn contains_point(&self, point: &NVec2) -> bool {
        point_in_rect(self, point)
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        rect_overlaps(self, other)
    }

    /// True if `inner` lies entirely within `self`
    pub fn contains_rect(&self, inner: &Rect) -> bool {
        rect_fully_inside(inner, self)
    }
}

/// Point-in-rectangle test, inclusive on all four edges
pub fn point_in_rect(rect: &Rect, point: &NVec2) -> bool {
    let br = rect.bottom_right();
    rect.top_left.y <= point.y
        && br.y >= point.y
        && rect.top_left.x <= point.x
        && br.x >= point.x
}

/// True when the projections of `a` and `b` overlap (or touch) on both axes
pub fn rect_overlaps(a: &Rect, b: &Rect) -> bool {
    let a_br = a.bottom_right();
    let b_br = b.bottom_right();
    a_br.x >= b.top_left.x // a's right edge past b's left edge
        && a.top_left.x <= b_br.x // a's left edge before b's right edge
        && a_br.y >= b.top_left.y // a's bottom edge past b's top edge
        && a.top_left.y <= b_br.y // a's top edge before b's bottom edge
}

/// True iff all four corners of `inner` are inside `outer`
pub fn rect_fully_inside(inner: &Rect, outer: &Rect) -> bool {
    inner.corners().iter().all(|corner| point_in_rect(outer, corner))
}
