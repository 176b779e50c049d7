//! Technology-derived constants for each device generator.
//!
//! A [`DeviceRuleSet`] is built once per technology table. Rules shared by
//! every device are required up front; each device's own rule group is
//! resolved eagerly, but a failure is only reported when that device is
//! generated, so a kit without resistor rules can still draw transistors.

use geometry::prelude::*;
use layir::{Font, Layer};
use techparams::{LayerTable, TechError, TechParameterTable};

type TechResult<T> = std::result::Result<T, TechError>;

/// Rules shared by every device.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonRules {
    /// Manufacturing grid, in microns.
    pub grid: f64,
    /// Grid-snapping tolerance, in grid steps.
    pub epsilon: f64,
    /// Database units per micron.
    pub dbu: i64,
    /// Font for labels generated without an explicit style.
    pub label_font: Font,
}

impl CommonRules {
    pub fn from_table(table: &TechParameterTable) -> TechResult<Self> {
        let mut label_font = Font::default();
        if table.contains("labelFont") {
            label_font.family = table.get_str("labelFont")?.clone();
        }
        if table.contains("labelSize") {
            let size = table.get_i64("labelSize")?;
            label_font.size = u32::try_from(size).map_err(|_| TechError::Invalid {
                rule: arcstr::literal!("labelSize"),
                reason: arcstr::literal!("label size must be a non-negative integer"),
            })?;
        }
        Ok(Self {
            grid: table.grid(),
            epsilon: table.epsilon(),
            dbu: table.dbu(),
            label_font,
        })
    }

    /// Snaps a micron value down onto the grid.
    #[inline]
    pub fn fix(&self, value: f64) -> f64 {
        grid_fix(value, self.grid, self.epsilon)
    }

    #[inline]
    pub fn converter(&self) -> GridConverter {
        GridConverter::new(self.dbu)
    }
}

/// A pin layer and the layer its label is drawn on.
///
/// The label goes on the layer's `label` companion when the technology
/// defines one, and on the pin layer itself otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinLayer {
    pub pin: Layer,
    pub label: Layer,
}

impl PinLayer {
    pub fn resolve(layers: &LayerTable, name: &str) -> TechResult<Self> {
        let pin = layers.pin(name)?.clone();
        let label = layers.label_layer_for(&pin).unwrap_or(&pin).clone();
        Ok(Self { pin, label })
    }
}

/// Contact rules shared by the diffusion and poly devices.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactRules {
    /// Contact edge length (`Cnt_a`).
    pub size: f64,
    /// Contact-to-contact spacing (`Cnt_b`).
    pub spacing: f64,
    /// Diffusion enclosure of a contact (`Cnt_c`).
    pub activ_enclosure: f64,
    /// Poly enclosure of a contact (`Cnt_d`).
    pub poly_enclosure: f64,
    /// Spacing from a contact on poly to diffusion (`Cnt_e`).
    pub poly_contact_to_activ: f64,
    /// Spacing from a diffusion contact to a gate (`Cnt_f`).
    pub contact_to_gate: f64,
    /// Metal1 enclosure of a contact (`M1_c`).
    pub metal1_enclosure: f64,
}

impl ContactRules {
    fn from_table(table: &TechParameterTable) -> TechResult<Self> {
        Ok(Self {
            size: table.get_f64("Cnt_a")?,
            spacing: table.get_f64("Cnt_b")?,
            activ_enclosure: table.get_f64("Cnt_c")?,
            poly_enclosure: table.get_f64("Cnt_d")?,
            poly_contact_to_activ: table.get_f64("Cnt_e")?,
            contact_to_gate: table.get_f64("Cnt_f")?,
            metal1_enclosure: table.get_f64("M1_c")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NmosRules {
    pub min_width: f64,
    pub min_length: f64,
    /// Poly extension past the diffusion (`Gat_c`).
    pub poly_endcap: f64,
    pub contact: ContactRules,
    pub activ: Layer,
    pub poly: Layer,
    pub cont: Layer,
    pub metal1: Layer,
    pub metal1_pin: PinLayer,
    pub thermal: Layer,
}

impl NmosRules {
    fn from_table(table: &TechParameterTable) -> TechResult<Self> {
        let layers = table.layers();
        Ok(Self {
            min_width: table.get_f64("nmos_minW")?,
            min_length: table.get_f64("nmos_minL")?,
            poly_endcap: table.get_f64("Gat_c")?,
            contact: ContactRules::from_table(table)?,
            activ: layers.drawing("Activ")?.clone(),
            poly: layers.drawing("GatPoly")?.clone(),
            cont: layers.drawing("Cont")?.clone(),
            metal1: layers.drawing("Metal1")?.clone(),
            metal1_pin: PinLayer::resolve(layers, "Metal1")?,
            thermal: layers.drawing("HeatTrans")?.clone(),
        })
    }
}

/// Silicided poly resistor rules.
///
/// Sheet values are in ohms per square; `rzspec` is in ohm-microns.
#[derive(Debug, Clone, PartialEq)]
pub struct RsilRules {
    pub min_width: f64,
    pub min_length: f64,
    pub min_poly_space: f64,
    /// Body sheet resistance.
    pub rspec: f64,
    /// Sheet resistance of the bends.
    pub rkspec: f64,
    /// Head transition resistance.
    pub rzspec: f64,
    /// Line width delta: drawn width plus `lwd` is the effective width.
    pub lwd: f64,
    /// Corner-square correction factor.
    pub kappa: f64,
    /// EXTBlock enclosure of the body.
    pub extblock_enclosure: f64,
    /// Widths this close to `min_width` are taken as `min_width`.
    pub width_tolerance: f64,
    pub contact: ContactRules,
    pub poly: Layer,
    pub cont: Layer,
    pub metal1: Layer,
    pub metal1_pin: PinLayer,
    pub res: Layer,
    pub extblock: Layer,
    pub text: Layer,
    pub thermal: Layer,
}

impl RsilRules {
    fn from_table(table: &TechParameterTable) -> TechResult<Self> {
        let layers = table.layers();
        let rules = Self {
            min_width: table.get_f64("rsil_minW")?,
            min_length: table.get_f64("rsil_minL")?,
            min_poly_space: table.get_f64("rsil_minPS")?,
            rspec: table.get_f64("rsil_rspec")?,
            rkspec: table.get_f64("rsil_rkspec")?,
            rzspec: table.get_f64("rsil_rzspec")?,
            lwd: table.get_f64("rsil_lwd")?,
            kappa: table.get_f64("rsil_kappa")?,
            extblock_enclosure: table.get_f64("rsil_extb_enc")?,
            width_tolerance: table.epsilon(),
            contact: ContactRules::from_table(table)?,
            poly: layers.drawing("GatPoly")?.clone(),
            cont: layers.drawing("Cont")?.clone(),
            metal1: layers.drawing("Metal1")?.clone(),
            metal1_pin: PinLayer::resolve(layers, "Metal1")?,
            res: layers.drawing("RES")?.clone(),
            extblock: layers.drawing("EXTBlock")?.clone(),
            text: layers.drawing("TEXT")?.clone(),
            thermal: layers.drawing("HeatRes")?.clone(),
        };
        if rules.kappa == 0.0 {
            return Err(TechError::Invalid {
                rule: arcstr::literal!("rsil_kappa"),
                reason: arcstr::literal!("kappa must be non-zero"),
            });
        }
        Ok(rules)
    }
}

/// MIM capacitor rules.
///
/// `caspec` is in farads per square micron, `cpspec` in farads per micron.
#[derive(Debug, Clone, PartialEq)]
pub struct CmimRules {
    pub min_width: f64,
    pub min_length: f64,
    pub caspec: f64,
    pub cpspec: f64,
    /// Via edge length (`Vmim_a`).
    pub via_size: f64,
    /// Via-to-via spacing (`Vmim_b`).
    pub via_spacing: f64,
    /// MIM enclosure of a via (`Vmim_c`).
    pub via_enclosure: f64,
    /// Bottom plate enclosure of the MIM (`Mim_c`).
    pub bottom_enclosure: f64,
    /// Top plate inset from the MIM (`Mim_d`).
    pub top_inset: f64,
    pub mim: Layer,
    pub vmim: Layer,
    pub bottom: Layer,
    pub bottom_pin: PinLayer,
    pub top: Layer,
    pub top_pin: PinLayer,
    pub text: Layer,
    pub thermal: Layer,
}

impl CmimRules {
    fn from_table(table: &TechParameterTable) -> TechResult<Self> {
        let layers = table.layers();
        Ok(Self {
            min_width: table.get_f64("cmim_minW")?,
            min_length: table.get_f64("cmim_minL")?,
            caspec: table.get_f64("cmim_caspec")?,
            cpspec: table.get_f64("cmim_cpspec")?,
            via_size: table.get_f64("Vmim_a")?,
            via_spacing: table.get_f64("Vmim_b")?,
            via_enclosure: table.get_f64("Vmim_c")?,
            bottom_enclosure: table.get_f64("Mim_c")?,
            top_inset: table.get_f64("Mim_d")?,
            mim: layers.drawing("MIM")?.clone(),
            vmim: layers.drawing("Vmim")?.clone(),
            bottom: layers.drawing("Metal5")?.clone(),
            bottom_pin: PinLayer::resolve(layers, "Metal5")?,
            top: layers.drawing("TopMetal1")?.clone(),
            top_pin: PinLayer::resolve(layers, "TopMetal1")?,
            text: layers.drawing("TEXT")?.clone(),
            thermal: layers.drawing("HeatRes")?.clone(),
        })
    }
}

/// All technology constants consumed by the device generators.
#[derive(Debug, Clone)]
pub struct DeviceRuleSet {
    common: CommonRules,
    nmos: TechResult<NmosRules>,
    rsil: TechResult<RsilRules>,
    cmim: TechResult<CmimRules>,
}

impl DeviceRuleSet {
    /// Resolves every rule group from `table`.
    ///
    /// Only a failure of the common rules is reported here.
    pub fn from_table(table: &TechParameterTable) -> TechResult<Self> {
        let common = CommonRules::from_table(table)?;
        let rules = Self {
            common,
            nmos: NmosRules::from_table(table),
            rsil: RsilRules::from_table(table),
            cmim: CmimRules::from_table(table),
        };
        for (device, result) in [
            ("nmos", rules.nmos.as_ref().err()),
            ("rsil", rules.rsil.as_ref().err()),
            ("cmim", rules.cmim.as_ref().err()),
        ] {
            if let Some(err) = result {
                tracing::debug!(device, %err, "device rules unavailable");
            }
        }
        Ok(rules)
    }

    /// Replaces the default label font.
    pub fn with_label_font(mut self, font: Font) -> Self {
        self.common.label_font = font;
        self
    }

    #[inline]
    pub fn common(&self) -> &CommonRules {
        &self.common
    }

    pub fn nmos(&self) -> TechResult<&NmosRules> {
        self.nmos.as_ref().map_err(Clone::clone)
    }

    pub fn rsil(&self) -> TechResult<&RsilRules> {
        self.rsil.as_ref().map_err(Clone::clone)
    }

    pub fn cmim(&self) -> TechResult<&CmimRules> {
        self.cmim.as_ref().map_err(Clone::clone)
    }
}
