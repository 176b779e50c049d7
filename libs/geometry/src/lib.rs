//! 2-D geometry for parametric cell layout.
//!
//! Scene coordinates are integers in database units; layout coordinates are
//! real values in microns. The [`grid`] module converts between the two and
//! snaps real values onto the process manufacturing grid.
//!
//! # Examples
//!
//! Create a [rectangle](crate::rect::Rect):
//!
//! ```
//! # use geometry::prelude::*;
//! let rect = Rect::from_sides(10, 20, 30, 40);
//! assert_eq!(rect.width(), 20);
//! ```
#![warn(missing_docs)]

extern crate self as geometry;

pub mod grid;
pub mod point;
pub mod prelude;
pub mod rect;
pub mod span;
