//! Metal-insulator-metal capacitor.
//!
//! The dielectric spans `[0, w] × [0, l]`. Vias are tiled over it with the
//! shared contact tiler. The bottom plate (Metal5) encloses the dielectric;
//! the top plate (TopMetal1) is inset from it.

use crate::devices::{Generation, Output, PCell};
use crate::error::Result;
use crate::params::CmimParams;
use crate::primitives::{MicronRect, PrimitiveBuilder};
use crate::quantity::format_engineering;
use crate::rules::{CmimRules, DeviceRuleSet};
use crate::thermal::thermal_annotation;
use crate::tiler::ContactTiler;

/// The MIM capacitor cell.
pub struct Cmim;

impl PCell for Cmim {
    type Params = CmimParams;
    const NAME: &'static str = "cmim";

    fn generate(rules: &DeviceRuleSet, params: &Self::Params) -> Result<Generation> {
        cmim(rules, params)
    }
}

impl CmimRules {
    /// Capacitance in farads of a `w × l` micron dielectric: area plus fringe.
    pub fn capacitance(&self, w: f64, l: f64) -> f64 {
        w * l * self.caspec + 2.0 * (w + l) * self.cpspec
    }
}

/// Generates a MIM capacitor.
pub fn cmim(rules: &DeviceRuleSet, params: &CmimParams) -> Result<Generation> {
    let r = rules.cmim()?;
    let common = rules.common();
    let b = PrimitiveBuilder::new(common);
    let mut out = Output::new(Cmim::NAME, common);

    let w = out.clamp_min("width", b.fix(params.width.to_microns()), r.min_width);
    let l = out.clamp_min("length", b.fix(params.length.to_microns()), r.min_length);

    let mim = MicronRect::from_sides(0.0, 0.0, w, l);
    out.add(b.rect(&r.mim, mim));

    let tiler = ContactTiler::new(common, r.via_size, r.via_spacing, r.via_enclosure);
    match tiler.tile(mim).to_via_array(&b, &r.vmim) {
        Some(vias) => out.add(vias),
        None => out.degenerate("via array"),
    }

    let bottom = mim.expand_all(r.bottom_enclosure);
    out.add(b.rect(&r.bottom, bottom));
    out.add(b.pin(&r.bottom_pin, "MINUS", bottom));

    let top = mim.expand_all(-r.top_inset);
    out.add(b.rect(&r.top, top));
    out.add(b.pin(&r.top_pin, "PLUS", top));

    let capacitance = r.capacitance(w, l);
    out.add(b.label(
        &r.text,
        format!("C={}F", format_engineering(capacitance)),
        mim.center_x(),
        mim.center_y(),
    ));
    out.extend(thermal_annotation(
        &b,
        &r.thermal,
        (mim.left, mim.bot),
        (mim.right, mim.top),
        true,
        Cmim::NAME,
    ));

    out.property("w", w);
    out.property("l", l);
    out.property("C", capacitance);
    Ok(out.finish())
}
