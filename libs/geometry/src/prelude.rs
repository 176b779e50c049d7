//! An import prelude that re-exports commonly used items.

pub use crate::grid::{grid_fix, GridConverter, GridFix};
pub use crate::point::Point;
pub use crate::rect::Rect;
