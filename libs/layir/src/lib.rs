//! Flat layout geometry records.
//!
//! A parametric cell produces an ordered [`CellGeometry`]: a list of
//! [`Element`]s, each of which is a rectangle, a text label, a pin or a
//! compact via array. All coordinates are integer scene units.

pub mod gds;

#[cfg(test)]
mod tests;

use std::fmt::Display;
use std::hash::{Hash, Hasher};

use arcstr::ArcStr;
use geometry::prelude::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A GDS layer specification: `(layer, datatype)`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct GdsLayer(pub u16, pub u16);

impl Display for GdsLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, self.1)
    }
}

/// The purpose of a layer.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerPurpose {
    /// Drawn geometry.
    Drawing,
    /// Pin shapes.
    Pin,
    /// Text annotations.
    #[serde(alias = "text")]
    Label,
}

impl LayerPurpose {
    /// Parses a purpose name as written in technology files.
    ///
    /// `"text"` is accepted as a synonym for [`LayerPurpose::Label`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "drawing" | "drw" => Some(Self::Drawing),
            "pin" => Some(Self::Pin),
            "label" | "text" => Some(Self::Label),
            _ => None,
        }
    }
}

impl Display for LayerPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Drawing => write!(f, "drawing"),
            Self::Pin => write!(f, "pin"),
            Self::Label => write!(f, "label"),
        }
    }
}

/// The identity of a logical layer.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct LayerKey {
    /// The layer name (e.g. `Metal1`).
    pub name: ArcStr,
    /// The layer purpose.
    pub purpose: LayerPurpose,
}

impl LayerKey {
    pub fn new(name: impl Into<ArcStr>, purpose: LayerPurpose) -> Self {
        Self {
            name: name.into(),
            purpose,
        }
    }
}

impl Display for LayerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.name, self.purpose)
    }
}

/// A logical layer and the GDS pair it is written to.
///
/// Equality and hashing only consider the [`LayerKey`]; several logical
/// layers may share one GDS pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    key: LayerKey,
    gds: GdsLayer,
}

impl Layer {
    pub fn new(name: impl Into<ArcStr>, purpose: LayerPurpose, gds: GdsLayer) -> Self {
        Self {
            key: LayerKey::new(name, purpose),
            gds,
        }
    }

    #[inline]
    pub fn key(&self) -> &LayerKey {
        &self.key
    }

    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.key.name
    }

    #[inline]
    pub fn purpose(&self) -> LayerPurpose {
        self.key.purpose
    }

    #[inline]
    pub fn gds(&self) -> GdsLayer {
        self.gds
    }
}

impl PartialEq for Layer {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Layer {}

impl Hash for Layer {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.key, self.gds)
    }
}

/// Port directions.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Input.
    Input,
    /// Output.
    Output,
    /// Input or output.
    #[default]
    InOut,
}

/// The electrical role of a pin.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
pub enum PinType {
    #[default]
    Signal,
    Ground,
    Power,
    Clock,
    Digital,
    Analog,
}

/// Horizontal justification of a label about its anchor.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Label orientation.
///
/// `M*` variants mirror about the named axis before rotating.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    R0,
    R90,
    R180,
    R270,
    MX,
    MXR90,
    MY,
    MYR90,
}

impl Orientation {
    /// The rotation angle in degrees, applied after any reflection.
    pub fn angle(&self) -> f64 {
        match self {
            Self::R0 | Self::MX | Self::MY => 0.,
            Self::R90 | Self::MXR90 | Self::MYR90 => 90.,
            Self::R180 => 180.,
            Self::R270 => 270.,
        }
    }

    /// Whether the orientation reflects about the x-axis.
    ///
    /// A reflection about the y-axis is a reflection about the x-axis followed
    /// by a half turn, so [`Orientation::MY`] reports `true` here and an extra
    /// 180 degrees in [`Orientation::gds_angle`].
    pub fn reflect_vert(&self) -> bool {
        matches!(self, Self::MX | Self::MXR90 | Self::MY | Self::MYR90)
    }

    /// The rotation angle in the reflect-then-rotate form used by GDS.
    pub fn gds_angle(&self) -> f64 {
        match self {
            Self::MY => 180.,
            Self::MYR90 => 270.,
            _ => self.angle(),
        }
    }
}

/// A label font descriptor.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: ArcStr,
    /// Point size.
    pub size: u32,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: arcstr::literal!("Arial"),
            size: 1,
        }
    }
}

/// A rectangle drawn on a layer.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    layer: Layer,
    rect: Rect,
}

impl Shape {
    #[inline]
    pub fn new(layer: Layer, rect: Rect) -> Self {
        Self { layer, rect }
    }

    #[inline]
    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }
}

/// A text annotation anchored at a point.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Label {
    layer: Layer,
    text: ArcStr,
    anchor: Point,
    font: Font,
    alignment: Alignment,
    orientation: Orientation,
}

impl Label {
    /// Creates a centered, unrotated label in the default font.
    #[inline]
    pub fn new(layer: Layer, text: impl Into<ArcStr>, anchor: Point) -> Self {
        Self {
            layer,
            text: text.into(),
            anchor,
            font: Font::default(),
            alignment: Alignment::default(),
            orientation: Orientation::default(),
        }
    }

    pub fn with_font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[inline]
    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    #[inline]
    pub fn text(&self) -> &ArcStr {
        &self.text
    }

    #[inline]
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    #[inline]
    pub fn font(&self) -> &Font {
        &self.font
    }

    #[inline]
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }
}

/// A location at which a cell should be connected.
///
/// A pin owns the label that names it.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    name: ArcStr,
    layer: Layer,
    rect: Rect,
    direction: Direction,
    pin_type: PinType,
    label: Label,
}

impl Pin {
    pub fn new(
        name: impl Into<ArcStr>,
        layer: Layer,
        rect: Rect,
        direction: Direction,
        pin_type: PinType,
        label: Label,
    ) -> Self {
        Self {
            name: name.into(),
            layer,
            rect,
            direction,
            pin_type,
            label,
        }
    }

    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    #[inline]
    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn pin_type(&self) -> PinType {
        self.pin_type
    }

    #[inline]
    pub fn label(&self) -> &Label {
        &self.label
    }
}

/// A single cut of a via array.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Via {
    pub layer: Layer,
    pub width: i64,
    pub height: i64,
}

/// A regular grid of identical vias.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ViaArray {
    /// Lower-left corner of the first via.
    origin: Point,
    via: Via,
    pitch_x: i64,
    pitch_y: i64,
    nx: u32,
    ny: u32,
}

impl ViaArray {
    pub fn new(origin: Point, via: Via, pitch: (i64, i64), count: (u32, u32)) -> Self {
        Self {
            origin,
            via,
            pitch_x: pitch.0,
            pitch_y: pitch.1,
            nx: count.0,
            ny: count.1,
        }
    }

    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    #[inline]
    pub fn via(&self) -> &Via {
        &self.via
    }

    #[inline]
    pub fn pitch(&self) -> (i64, i64) {
        (self.pitch_x, self.pitch_y)
    }

    #[inline]
    pub fn count(&self) -> (u32, u32) {
        (self.nx, self.ny)
    }

    /// Total number of vias in the array.
    pub fn len(&self) -> usize {
        self.nx as usize * self.ny as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over every via rectangle, row by row from the bottom.
    pub fn cuts(&self) -> impl Iterator<Item = Rect> + '_ {
        (0..self.ny).flat_map(move |j| {
            (0..self.nx).map(move |i| {
                let x0 = self.origin.x + i as i64 * self.pitch_x;
                let y0 = self.origin.y + j as i64 * self.pitch_y;
                Rect::from_sides(x0, y0, x0 + self.via.width, y0 + self.via.height)
            })
        })
    }

    /// The bounding box of all cuts, or [`None`] if the array is empty.
    pub fn bbox(&self) -> Option<Rect> {
        Rect::bbox_of(self.cuts())
    }
}

/// A primitive layout element.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Element {
    Rect(Shape),
    Label(Label),
    Pin(Pin),
    ViaArray(ViaArray),
}

impl Element {
    /// The layer the element is drawn on.
    ///
    /// For a via array this is the cut layer.
    pub fn layer(&self) -> &Layer {
        match self {
            Self::Rect(shape) => shape.layer(),
            Self::Label(label) => label.layer(),
            Self::Pin(pin) => pin.layer(),
            Self::ViaArray(array) => &array.via().layer,
        }
    }

    /// The area covered by the element. Labels cover only their anchor.
    pub fn bbox(&self) -> Option<Rect> {
        match self {
            Self::Rect(shape) => Some(shape.rect()),
            Self::Label(label) => Some(Rect::from_point(label.anchor())),
            Self::Pin(pin) => Some(pin.rect()),
            Self::ViaArray(array) => array.bbox(),
        }
    }
}

impl From<Shape> for Element {
    fn from(value: Shape) -> Self {
        Self::Rect(value)
    }
}

impl From<Label> for Element {
    fn from(value: Label) -> Self {
        Self::Label(value)
    }
}

impl From<Pin> for Element {
    fn from(value: Pin) -> Self {
        Self::Pin(value)
    }
}

impl From<ViaArray> for Element {
    fn from(value: ViaArray) -> Self {
        Self::ViaArray(value)
    }
}

/// The ordered geometry of one generated cell.
#[derive(Debug, Clone, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellGeometry {
    elements: Vec<Element>,
}

impl CellGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_element(&mut self, element: impl Into<Element>) {
        self.elements.push(element.into())
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterates over the rectangles drawn on the layer named `name` with purpose `purpose`.
    pub fn rects_on<'a>(
        &'a self,
        name: &'a str,
        purpose: LayerPurpose,
    ) -> impl Iterator<Item = Rect> + 'a {
        self.elements.iter().filter_map(move |elt| match elt {
            Element::Rect(shape)
                if shape.layer().name() == name && shape.layer().purpose() == purpose =>
            {
                Some(shape.rect())
            }
            _ => None,
        })
    }

    pub fn pins(&self) -> impl Iterator<Item = &Pin> {
        self.elements.iter().filter_map(|elt| match elt {
            Element::Pin(pin) => Some(pin),
            _ => None,
        })
    }

    /// Gets a pin by name.
    pub fn pin(&self, name: &str) -> Option<&Pin> {
        self.pins().find(|pin| pin.name() == name)
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.elements.iter().filter_map(|elt| match elt {
            Element::Label(label) => Some(label),
            _ => None,
        })
    }

    pub fn via_arrays(&self) -> impl Iterator<Item = &ViaArray> {
        self.elements.iter().filter_map(|elt| match elt {
            Element::ViaArray(array) => Some(array),
            _ => None,
        })
    }

    /// The bounding box of all elements, or [`None`] if there are none.
    pub fn bbox(&self) -> Option<Rect> {
        Rect::bbox_of(self.elements.iter().filter_map(Element::bbox))
    }
}

impl Extend<Element> for CellGeometry {
    fn extend<T: IntoIterator<Item = Element>>(&mut self, iter: T) {
        self.elements.extend(iter)
    }
}

impl FromIterator<Element> for CellGeometry {
    fn from_iter<T: IntoIterator<Item = Element>>(iter: T) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for CellGeometry {
    type Item = Element;
    type IntoIter = std::vec::IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a CellGeometry {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
