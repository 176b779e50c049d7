//! Mapping of geometry records to GDS layer/datatype records.
//!
//! This module stops at the record level: every element becomes one or more
//! [`GdsRecord`]s carrying an explicit [`GdsLayer`] and integer points.
//! Serializing records to a GDSII stream is left to a GDS writer.

use arcstr::ArcStr;
use geometry::prelude::{Point, Rect};
use serde::{Deserialize, Serialize};

use crate::{Alignment, Element, GdsLayer, Label, Orientation};

/// The result type returned by GDS flattening.
pub type Result<T> = std::result::Result<T, GdsError>;

/// An error raised while flattening geometry to GDS records.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GdsError {
    /// GDS points are 32-bit signed integers.
    #[error("coordinate ({x}, {y}) does not fit in a GDS point")]
    CoordinateOverflow { x: i64, y: i64 },
}

/// GDS library units.
///
/// The first number is the size of a database unit in user units; the second
/// is the size of a database unit in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GdsUnits(pub f64, pub f64);

impl GdsUnits {
    pub fn new(num1: f64, num2: f64) -> Self {
        Self(num1, num2)
    }

    /// Units for a layout drawn in microns with `dbu` database units per micron.
    pub fn from_dbu(dbu: i64) -> Self {
        let db = 1.0 / dbu as f64;
        Self(db, db * 1e-6)
    }

    /// The database-unit size, in meters.
    pub fn db_unit(&self) -> f64 {
        self.1
    }

    /// The user-unit size, in meters.
    pub fn user_unit(&self) -> f64 {
        self.1 / self.0
    }
}

impl Default for GdsUnits {
    /// A 1 µm user unit and a 1 nm database unit.
    fn default() -> Self {
        Self(1e-3, 1e-9)
    }
}

/// A closed polygon on one layer/datatype pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GdsBoundary {
    pub layer: GdsLayer,
    /// Closed point list: the first point is repeated at the end.
    pub xy: Vec<Point>,
}

/// A text element on one layer/texttype pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GdsText {
    pub layer: GdsLayer,
    pub string: ArcStr,
    pub xy: Point,
    /// Horizontal presentation: 0 left, 1 center, 2 right.
    pub presentation: u8,
    pub reflected: bool,
    /// Rotation in degrees.
    pub angle: f64,
    /// Font size as a magnification factor.
    pub mag: f64,
}

/// A flattened GDS record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GdsRecord {
    Boundary(GdsBoundary),
    Text(GdsText),
}

impl GdsRecord {
    pub fn layer(&self) -> GdsLayer {
        match self {
            Self::Boundary(b) => b.layer,
            Self::Text(t) => t.layer,
        }
    }
}

/// Flattens elements into GDS records, in order.
///
/// Pins produce a boundary followed by the text of their label; via arrays
/// produce one boundary per cut.
pub fn flatten<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Result<Vec<GdsRecord>> {
    let mut records = Vec::new();
    for elt in elements {
        match elt {
            Element::Rect(shape) => {
                records.push(export_rect(shape.layer().gds(), shape.rect())?);
            }
            Element::Label(label) => records.push(export_label(label)?),
            Element::Pin(pin) => {
                records.push(export_rect(pin.layer().gds(), pin.rect())?);
                records.push(export_label(pin.label())?);
            }
            Element::ViaArray(array) => {
                let layer = array.via().layer.gds();
                for cut in array.cuts() {
                    records.push(export_rect(layer, cut)?);
                }
            }
        }
    }
    tracing::trace!(count = records.len(), "flattened geometry to gds records");
    Ok(records)
}

fn check_point(p: Point) -> Result<Point> {
    if i32::try_from(p.x).is_ok() && i32::try_from(p.y).is_ok() {
        Ok(p)
    } else {
        Err(GdsError::CoordinateOverflow { x: p.x, y: p.y })
    }
}

fn export_rect(layer: GdsLayer, rect: Rect) -> Result<GdsRecord> {
    let bl = check_point(rect.lower_left())?;
    let ur = check_point(rect.upper_right())?;
    let br = Point::new(ur.x, bl.y);
    let ul = Point::new(bl.x, ur.y);
    Ok(GdsRecord::Boundary(GdsBoundary {
        layer,
        xy: vec![bl, br, ur, ul, bl],
    }))
}

fn export_label(label: &Label) -> Result<GdsRecord> {
    let orientation: Orientation = label.orientation();
    Ok(GdsRecord::Text(GdsText {
        layer: label.layer().gds(),
        string: label.text().clone(),
        xy: check_point(label.anchor())?,
        presentation: match label.alignment() {
            Alignment::Left => 0,
            Alignment::Center => 1,
            Alignment::Right => 2,
        },
        reflected: orientation.reflect_vert(),
        angle: orientation.gds_angle(),
        mag: label.font().size as f64,
    }))
}
