//! Primitive geometry builders.
//!
//! Generators compute edges in microns. The builder snaps every coordinate
//! onto the grid, converts it to scene units and wraps it in a record.

use arcstr::ArcStr;
use geometry::prelude::*;
use layir::{Direction, Font, Label, Layer, Pin, PinType, Shape, Via, ViaArray};

use crate::rules::{CommonRules, PinLayer};

/// An axis-aligned rectangle in microns.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct MicronRect {
    pub left: f64,
    pub bot: f64,
    pub right: f64,
    pub top: f64,
}

impl MicronRect {
    /// Creates a rectangle from its four sides. Swapped sides are reordered.
    pub fn from_sides(left: f64, bot: f64, right: f64, top: f64) -> Self {
        Self {
            left: left.min(right),
            bot: bot.min(top),
            right: left.max(right),
            top: bot.max(top),
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.top - self.bot
    }

    #[inline]
    pub fn center_x(&self) -> f64 {
        (self.left + self.right) / 2.
    }

    #[inline]
    pub fn center_y(&self) -> f64 {
        (self.bot + self.top) / 2.
    }

    /// Grows the rectangle by `amount` on every side. Negative amounts shrink it.
    pub fn expand_all(&self, amount: f64) -> Self {
        Self::from_sides(
            self.left - amount,
            self.bot - amount,
            self.right + amount,
            self.top + amount,
        )
    }

    /// The smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            left: self.left.min(other.left),
            bot: self.bot.min(other.bot),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
        }
    }
}

/// Builds geometry records from micron coordinates.
#[derive(Debug, Clone)]
pub struct PrimitiveBuilder {
    grid: f64,
    epsilon: f64,
    conv: GridConverter,
    font: Font,
}

impl PrimitiveBuilder {
    pub fn new(common: &CommonRules) -> Self {
        Self {
            grid: common.grid,
            epsilon: common.epsilon,
            conv: common.converter(),
            font: common.label_font.clone(),
        }
    }

    /// Snaps a micron value down onto the grid.
    #[inline]
    pub fn fix(&self, value: f64) -> f64 {
        value.grid_fix(self.grid, self.epsilon)
    }

    /// Snaps a micron value and converts it to scene units.
    #[inline]
    pub fn scene(&self, value: f64) -> i64 {
        self.conv.to_scene(self.fix(value))
    }

    #[inline]
    pub fn converter(&self) -> GridConverter {
        self.conv
    }

    pub fn point(&self, x: f64, y: f64) -> Point {
        Point::new(self.scene(x), self.scene(y))
    }

    pub fn scene_rect(&self, rect: MicronRect) -> Rect {
        Rect::from_sides(
            self.scene(rect.left),
            self.scene(rect.bot),
            self.scene(rect.right),
            self.scene(rect.top),
        )
    }

    pub fn rect(&self, layer: &Layer, rect: MicronRect) -> Shape {
        Shape::new(layer.clone(), self.scene_rect(rect))
    }

    /// A label in the default style, centered on `(x, y)`.
    pub fn label(&self, layer: &Layer, text: impl Into<ArcStr>, x: f64, y: f64) -> Label {
        self.label_at(layer, text, self.point(x, y))
    }

    /// A label in the default style, centered on a scene point.
    pub fn label_at(&self, layer: &Layer, text: impl Into<ArcStr>, anchor: Point) -> Label {
        Label::new(layer.clone(), text, anchor).with_font(self.font.clone())
    }

    /// A bidirectional signal pin named by a label at its center.
    pub fn pin(&self, layer: &PinLayer, name: impl Into<ArcStr>, rect: MicronRect) -> Pin {
        self.pin_with(layer, name, rect, Direction::InOut, PinType::Signal)
    }

    pub fn pin_with(
        &self,
        layer: &PinLayer,
        name: impl Into<ArcStr>,
        rect: MicronRect,
        direction: Direction,
        pin_type: PinType,
    ) -> Pin {
        let name = name.into();
        let rect = self.scene_rect(rect);
        let label = self.label_at(&layer.label, name.clone(), rect.center());
        Pin::new(name, layer.pin.clone(), rect, direction, pin_type, label)
    }

    /// A regular array of `count.0 × count.1` square vias of edge `size`.
    ///
    /// `origin` is the lower-left corner of the first via.
    pub fn via_array(
        &self,
        layer: &Layer,
        origin: (f64, f64),
        size: f64,
        pitch: (f64, f64),
        count: (u32, u32),
    ) -> ViaArray {
        let edge = self.scene(size);
        let via = Via {
            layer: layer.clone(),
            width: edge,
            height: edge,
        };
        ViaArray::new(
            self.point(origin.0, origin.1),
            via,
            (self.scene(pitch.0), self.scene(pitch.1)),
            count,
        )
    }
}
