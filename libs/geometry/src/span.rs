//! A one-dimensional span.
//!
//! A span represents the closed interval `[start, stop]`.
use serde::{Deserialize, Serialize};

/// A closed interval of coordinates in one dimension.
///
/// Represents the range `[start, stop]`.
#[derive(
    Debug, Default, Clone, Copy, Hash, Ord, PartialOrd, Serialize, Deserialize, PartialEq, Eq,
)]
pub struct Span {
    start: i64,
    stop: i64,
}

impl Span {
    /// Creates a new [`Span`] between two integers.
    ///
    /// The endpoints are sorted, so the order of the arguments does not matter.
    pub fn new(start: i64, stop: i64) -> Self {
        use std::cmp::{max, min};
        Self {
            start: min(start, stop),
            stop: max(start, stop),
        }
    }

    /// Creates a span of zero length encompassing the given point.
    pub const fn from_point(x: i64) -> Self {
        Self { start: x, stop: x }
    }

    /// Creates a new [`Span`] expanded by `amount` in both directions.
    ///
    /// A negative `amount` shrinks the span. Shrinking past the center
    /// collapses the span onto its midpoint.
    pub fn expand_all(self, amount: i64) -> Self {
        let start = self.start - amount;
        let stop = self.stop + amount;
        if start > stop {
            Self::from_point(self.center())
        } else {
            Self { start, stop }
        }
    }

    /// Returns the start of the span.
    #[inline]
    pub const fn start(&self) -> i64 {
        self.start
    }

    /// Returns the stop of the span.
    #[inline]
    pub const fn stop(&self) -> i64 {
        self.stop
    }

    /// Returns the midpoint of the span, rounded toward negative infinity.
    #[inline]
    pub const fn center(&self) -> i64 {
        (self.start + self.stop).div_euclid(2)
    }

    /// Returns the smallest span containing both `self` and `other`.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::span::Span;
    /// let a = Span::new(0, 10);
    /// let b = Span::new(20, 30);
    /// assert_eq!(a.union(b), Span::new(0, 30));
    /// ```
    pub fn union(self, other: Self) -> Self {
        use std::cmp::{max, min};
        Self {
            start: min(self.start, other.start),
            stop: max(self.stop, other.stop),
        }
    }

    /// Returns `true` if `other` lies entirely within this span.
    pub const fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.stop <= self.stop
    }
}
