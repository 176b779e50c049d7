//! Device parameter records.
//!
//! Records are parsed from JSON such as
//! `{"cell": "nmos", "width": "4u", "length": "0.13u", "fingers": "1"}`.
//! Lengths become [`PhysicalQuantity`] values, so two records describing the
//! same device compare and hash equal however their units were written.

use serde::{Deserialize, Serialize};

use crate::quantity::{count, PhysicalQuantity};

/// Parameters of an nmos transistor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NmosParams {
    /// Total gate width across all fingers.
    #[serde(alias = "w")]
    pub width: PhysicalQuantity,
    /// Gate length.
    #[serde(alias = "l")]
    pub length: PhysicalQuantity,
    /// Number of gate fingers.
    #[serde(alias = "ng", alias = "nf", with = "count", default = "one")]
    pub fingers: u32,
}

impl NmosParams {
    pub fn new(width: PhysicalQuantity, length: PhysicalQuantity, fingers: u32) -> Self {
        Self {
            width,
            length,
            fingers,
        }
    }
}

/// Parameters of a silicided poly resistor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RsilParams {
    /// Length of each straight stripe.
    #[serde(alias = "l")]
    pub length: PhysicalQuantity,
    /// Stripe width.
    #[serde(alias = "w")]
    pub width: PhysicalQuantity,
    /// Number of U-turns; the body has `bends + 1` stripes.
    #[serde(alias = "b", with = "count", default)]
    pub bends: u32,
    /// Spacing between neighboring stripes. Defaults to the technology minimum.
    #[serde(alias = "ps", default, skip_serializing_if = "Option::is_none")]
    pub poly_space: Option<PhysicalQuantity>,
}

impl RsilParams {
    pub fn new(length: PhysicalQuantity, width: PhysicalQuantity, bends: u32) -> Self {
        Self {
            length,
            width,
            bends,
            poly_space: None,
        }
    }

    pub fn with_poly_space(mut self, poly_space: PhysicalQuantity) -> Self {
        self.poly_space = Some(poly_space);
        self
    }
}

/// Parameters of a MIM capacitor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CmimParams {
    #[serde(alias = "w")]
    pub width: PhysicalQuantity,
    #[serde(alias = "l")]
    pub length: PhysicalQuantity,
}

impl CmimParams {
    pub fn new(width: PhysicalQuantity, length: PhysicalQuantity) -> Self {
        Self { width, length }
    }
}

/// Parameters of any supported device, tagged by cell name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "cell", rename_all = "lowercase")]
pub enum DeviceParameters {
    Nmos(NmosParams),
    Rsil(RsilParams),
    Cmim(CmimParams),
}

impl DeviceParameters {
    /// The name of the cell these parameters describe.
    pub fn cell_name(&self) -> &'static str {
        match self {
            Self::Nmos(_) => "nmos",
            Self::Rsil(_) => "rsil",
            Self::Cmim(_) => "cmim",
        }
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl From<NmosParams> for DeviceParameters {
    fn from(value: NmosParams) -> Self {
        Self::Nmos(value)
    }
}

impl From<RsilParams> for DeviceParameters {
    fn from(value: RsilParams) -> Self {
        Self::Rsil(value)
    }
}

impl From<CmimParams> for DeviceParameters {
    fn from(value: CmimParams) -> Self {
        Self::Cmim(value)
    }
}

fn one() -> u32 {
    1
}
