//! Fixed-point grid arithmetic.
//!
//! Layout coordinates are real values in microns; scene coordinates are
//! integers in database units (dbu). Every real coordinate is snapped onto the
//! manufacturing grid with [`grid_fix`] before it is converted to scene units
//! by a [`GridConverter`].

use serde::{Deserialize, Serialize};

/// Floating-point error, in database units, absorbed before truncating to an integer.
const SCENE_NUDGE: f64 = 1e-6;

/// Snaps `value` down onto a multiple of `grid`.
///
/// `epsilon` is measured in grid steps and absorbs floating-point error, so a
/// value that is within `epsilon` steps below a grid line lands on that line.
///
/// # Example
///
/// ```
/// # use geometry::prelude::*;
/// use approx::assert_relative_eq;
///
/// assert_relative_eq!(grid_fix(0.1234, 0.005, 0.001), 0.12);
/// // 0.15 cannot be represented exactly, but still lands on 0.15.
/// assert_relative_eq!(grid_fix(0.1 + 0.05, 0.005, 0.001), 0.15);
/// ```
pub fn grid_fix(value: f64, grid: f64, epsilon: f64) -> f64 {
    debug_assert!(grid > 0.0);
    (value / grid + epsilon).floor() * grid
}

/// A value that can be aligned to a manufacturing grid.
pub trait GridFix: Sized {
    /// Returns `self` aligned to `grid`.
    fn grid_fix(self, grid: f64, epsilon: f64) -> Self;
}

impl GridFix for f64 {
    #[inline]
    fn grid_fix(self, grid: f64, epsilon: f64) -> Self {
        grid_fix(self, grid, epsilon)
    }
}

/// Integer scene coordinates are already grid aligned.
impl GridFix for i64 {
    #[inline]
    fn grid_fix(self, _grid: f64, _epsilon: f64) -> Self {
        self
    }
}

/// Converts between layout units (microns) and scene units (dbu).
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConverter {
    dbu: i64,
}

impl GridConverter {
    /// Creates a converter with `dbu` database units per micron.
    ///
    /// # Panics
    ///
    /// Panics if `dbu` is not positive.
    pub const fn new(dbu: i64) -> Self {
        assert!(dbu > 0);
        Self { dbu }
    }

    /// Database units per micron.
    #[inline]
    pub const fn dbu(&self) -> i64 {
        self.dbu
    }

    /// Converts a micron value to scene units, truncating toward zero.
    ///
    /// # Example
    ///
    /// ```
    /// # use geometry::prelude::*;
    /// let conv = GridConverter::new(1000);
    /// assert_eq!(conv.to_scene(0.155), 155);
    /// assert_eq!(conv.to_scene(-0.155), -155);
    /// assert_eq!(conv.to_scene(0.1 + 0.2), 300);
    /// assert_eq!(conv.to_scene(0.0009), 0);
    /// ```
    pub fn to_scene(&self, value: f64) -> i64 {
        let scaled = value * self.dbu as f64;
        (scaled + SCENE_NUDGE.copysign(scaled)).trunc() as i64
    }

    /// Converts a scene value back to microns.
    #[inline]
    pub fn to_layout(&self, value: i64) -> f64 {
        value as f64 / self.dbu as f64
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const GRID: f64 = 0.005;
    const EPS: f64 = 0.001;

    #[test]
    fn grid_fix_is_idempotent() {
        for i in -2000..2000 {
            let v = i as f64 * 0.000_37;
            let once = grid_fix(v, GRID, EPS);
            let twice = grid_fix(once, GRID, EPS);
            assert_relative_eq!(once, twice, epsilon = 1e-12);
        }
    }

    #[test]
    fn grid_fix_rounds_down() {
        assert_relative_eq!(grid_fix(0.0149, GRID, EPS), 0.01);
        assert_relative_eq!(grid_fix(-0.001, GRID, EPS), -0.005);
        assert_relative_eq!(grid_fix(1.0, GRID, EPS), 1.0);
    }

    #[test]
    fn integers_pass_through() {
        assert_eq!(155i64.grid_fix(GRID, EPS), 155);
        assert_relative_eq!(0.1234f64.grid_fix(GRID, EPS), 0.12);
    }

    #[test]
    fn lossy_round_trip_is_bounded() {
        let conv = GridConverter::new(1000);
        for i in -5000..5000 {
            let x = i as f64 * 0.000_731;
            let back = conv.to_layout(conv.to_scene(x));
            assert!((back - x).abs() < 1.0 / conv.dbu() as f64, "{x} -> {back}");
        }
    }

    #[test]
    fn grid_values_convert_exactly() {
        let conv = GridConverter::new(1000);
        for i in 0..1000 {
            let v = grid_fix(i as f64 * GRID, GRID, EPS);
            assert_eq!(conv.to_scene(v), i * 5);
        }
    }
}
