//! Axis-aligned rectangles.

use serde::{Deserialize, Serialize};

use crate::point::Point;
use crate::span::Span;

/// An axis-aligned rectangle, specified by lower-left and upper-right corners.
///
/// The corners are kept normalized: `p0` is always the lower-left corner
/// and `p1` the upper-right, regardless of how the rectangle was built.
#[derive(
    Debug, Default, Copy, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Rect {
    /// The lower-left corner.
    p0: Point,
    /// The upper-right corner.
    p1: Point,
}

impl Rect {
    /// Creates a rectangle from all 4 sides (left, bottom, right, top).
    ///
    /// Swapped sides are reordered.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_sides(15, 20, 30, 40);
    /// assert_eq!(rect.left(), 15);
    /// assert_eq!(rect.bot(), 20);
    /// assert_eq!(rect.right(), 30);
    /// assert_eq!(rect.top(), 40);
    /// ```
    pub fn from_sides(left: i64, bot: i64, right: i64, top: i64) -> Self {
        Self::from_spans(Span::new(left, right), Span::new(bot, top))
    }

    fn from_spans(h: Span, v: Span) -> Self {
        Self {
            p0: Point::new(h.start(), v.start()),
            p1: Point::new(h.stop(), v.stop()),
        }
    }

    /// Creates a zero-area rectangle containing the given point.
    pub const fn from_point(p: Point) -> Self {
        Self { p0: p, p1: p }
    }

    /// Returns the lower-left corner.
    #[inline]
    pub const fn lower_left(&self) -> Point {
        self.p0
    }

    /// Returns the upper-right corner.
    #[inline]
    pub const fn upper_right(&self) -> Point {
        self.p1
    }

    /// Returns the center point of the rectangle.
    ///
    /// Odd dimensions round toward negative infinity.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_sides(0, 0, 200, 100);
    /// assert_eq!(rect.center(), Point::new(100, 50));
    /// ```
    pub const fn center(&self) -> Point {
        Point::new(
            (self.p0.x + self.p1.x).div_euclid(2),
            (self.p0.y + self.p1.y).div_euclid(2),
        )
    }

    /// Returns the bottom y-coordinate of the rectangle.
    #[inline]
    pub const fn bot(&self) -> i64 {
        self.p0.y
    }

    /// Returns the top y-coordinate of the rectangle.
    #[inline]
    pub const fn top(&self) -> i64 {
        self.p1.y
    }

    /// Returns the left x-coordinate of the rectangle.
    #[inline]
    pub const fn left(&self) -> i64 {
        self.p0.x
    }

    /// Returns the right x-coordinate of the rectangle.
    #[inline]
    pub const fn right(&self) -> i64 {
        self.p1.x
    }

    /// Returns the horizontal width of the rectangle.
    #[inline]
    pub const fn width(&self) -> i64 {
        self.p1.x - self.p0.x
    }

    /// Returns the vertical height of the rectangle.
    #[inline]
    pub const fn height(&self) -> i64 {
        self.p1.y - self.p0.y
    }

    /// Expands the rectangle by `amount` on all sides.
    ///
    /// A negative `amount` shrinks the rectangle.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let rect = Rect::from_sides(0, 0, 100, 200);
    /// assert_eq!(rect.expand_all(20), Rect::from_sides(-20, -20, 120, 220));
    /// assert_eq!(rect.expand_all(-20), Rect::from_sides(20, 20, 80, 180));
    /// ```
    pub fn expand_all(&self, amount: i64) -> Self {
        Self::from_spans(self.hspan().expand_all(amount), self.vspan().expand_all(amount))
    }

    /// Returns the smallest rectangle containing both `self` and `other`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let a = Rect::from_sides(0, 0, 10, 10);
    /// let b = Rect::from_sides(20, -5, 30, 5);
    /// assert_eq!(a.union(b), Rect::from_sides(0, -5, 30, 10));
    /// ```
    pub fn union(self, other: Self) -> Self {
        Self::from_spans(
            self.hspan().union(other.hspan()),
            self.vspan().union(other.vspan()),
        )
    }

    /// Returns the bounding box of an iterator of rectangles, or [`None`] if it is empty.
    pub fn bbox_of(rects: impl IntoIterator<Item = Rect>) -> Option<Self> {
        rects.into_iter().reduce(Rect::union)
    }

    /// Returns `true` if `other` lies entirely within this rectangle, edges included.
    pub fn contains(&self, other: &Rect) -> bool {
        self.hspan().contains(other.hspan()) && self.vspan().contains(other.vspan())
    }

    fn hspan(&self) -> Span {
        Span::new(self.p0.x, self.p1.x)
    }

    fn vspan(&self) -> Span {
        Span::new(self.p0.y, self.p1.y)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn corners_are_normalized() {
        let rect = Rect::from_sides(30, 40, 10, 20);
        assert_eq!(rect.lower_left(), Point::new(10, 20));
        assert_eq!(rect.upper_right(), Point::new(30, 40));
        assert_eq!(rect.width(), 20);
        assert_eq!(rect.height(), 20);
    }

    #[test]
    fn shrinking_past_center_collapses() {
        let rect = Rect::from_sides(0, 0, 10, 100);
        let shrunk = rect.expand_all(-20);
        assert_eq!(shrunk.width(), 0);
        assert_eq!(shrunk.height(), 60);
        assert_eq!(shrunk.center(), rect.center());
    }

    #[test]
    fn bbox_of_rects() {
        let rects = [
            Rect::from_sides(0, 0, 10, 10),
            Rect::from_sides(-5, 3, 2, 40),
            Rect::from_sides(8, -1, 9, 0),
        ];
        assert_eq!(Rect::bbox_of(rects), Some(Rect::from_sides(-5, -1, 10, 40)));
        assert_eq!(Rect::bbox_of([]), None);
    }

    #[test]
    fn containment_includes_edges() {
        let outer = Rect::from_sides(0, 0, 100, 100);
        assert!(outer.contains(&Rect::from_sides(0, 0, 100, 50)));
        assert!(!outer.contains(&Rect::from_sides(-1, 0, 50, 50)));
        assert!(outer.contains(&Rect::from_point(Point::new(100, 100))));
    }
}
