//! Multi-finger nmos transistor.
//!
//! Source/drain strips alternate with poly gates along x, starting and
//! ending with a strip:
//!
//! ```text
//!          pad     pad
//!          |G|     |G|
//!    +----+---+---+---+----+
//!    | S  |   | D |   | S  |   Activ, 0..wf
//!    +----+---+---+---+----+
//!          poly    poly       endcap below the diffusion
//! ```
//!
//! Each strip is tiled with contacts and covered by Metal1. Each gate
//! carries a contacted poly pad above the diffusion. Only the first
//! source, drain and gate get pins.

use crate::devices::{Generation, Output, PCell};
use crate::error::Result;
use crate::params::NmosParams;
use crate::primitives::{MicronRect, PrimitiveBuilder};
use crate::rules::DeviceRuleSet;
use crate::thermal::thermal_annotation;
use crate::tiler::ContactTiler;

/// The nmos transistor cell.
pub struct Nmos;

impl PCell for Nmos {
    type Params = NmosParams;
    const NAME: &'static str = "nmos";

    fn generate(rules: &DeviceRuleSet, params: &Self::Params) -> Result<Generation> {
        nmos(rules, params)
    }
}

/// Generates an nmos transistor.
pub fn nmos(rules: &DeviceRuleSet, params: &NmosParams) -> Result<Generation> {
    let r = rules.nmos()?;
    let common = rules.common();
    let b = PrimitiveBuilder::new(common);
    let mut out = Output::new(Nmos::NAME, common);
    let c = &r.contact;

    let fingers = out.clamp_min("fingers", params.fingers as f64, 1.0) as u32;
    let width = out.clamp_min("width", b.fix(params.width.to_microns()), r.min_width);
    let length = out.clamp_min("length", b.fix(params.length.to_microns()), r.min_length);
    let finger_width = out.clamp_min(
        "finger width",
        b.fix(width / fingers as f64),
        r.min_width,
    );

    let sd_len = b.fix(c.size + 2.0 * c.contact_to_gate);
    let pitch = sd_len + length;
    let total_x = fingers as f64 * pitch + sd_len;
    out.add(b.rect(
        &r.activ,
        MicronRect::from_sides(0.0, 0.0, total_x, finger_width),
    ));

    let sd_tiler = ContactTiler::new(common, c.size, c.spacing, c.activ_enclosure);
    for i in 0..=fingers {
        let x0 = i as f64 * pitch;
        let strip = MicronRect::from_sides(x0, 0.0, x0 + sd_len, finger_width);
        let array = sd_tiler.tile(strip);
        if array.is_empty() {
            out.degenerate("source/drain strip");
        }
        out.extend(array.to_elements(&b, &r.cont, None));
        let metal = array.cover_rect(c.metal1_enclosure);
        if let Some(metal) = metal {
            out.add(b.rect(&r.metal1, metal));
        }

        let name = match i {
            0 => "S",
            1 => "D",
            _ => continue,
        };
        out.add(b.pin(&r.metal1_pin, name, metal.unwrap_or(strip)));
    }

    let pad_tiler = ContactTiler::new(common, c.size, c.spacing, c.poly_enclosure);
    let contact_bot = finger_width + c.poly_contact_to_activ;
    let pad_half = c.size / 2.0 + c.poly_enclosure;
    for i in 0..fingers {
        let gx0 = sd_len * (i + 1) as f64 + length * i as f64;
        let gx1 = gx0 + length;
        let cx = (gx0 + gx1) / 2.0;
        let pad = MicronRect::from_sides(
            cx - pad_half,
            contact_bot - c.poly_enclosure,
            cx + pad_half,
            contact_bot + c.size + c.poly_enclosure,
        );
        out.add(b.rect(
            &r.poly,
            MicronRect::from_sides(gx0, -r.poly_endcap, gx1, pad.bot),
        ));

        // The pad is the path rectangle of its own contact array.
        let array = pad_tiler.tile(pad);
        if array.is_empty() {
            out.degenerate("gate contact pad");
        }
        out.extend(array.to_elements(&b, &r.cont, Some(&r.poly)));
        let metal = array.cover_rect(c.metal1_enclosure);
        if let Some(metal) = metal {
            out.add(b.rect(&r.metal1, metal));
        }
        if i == 0 {
            out.add(b.pin(&r.metal1_pin, "G", metal.unwrap_or(pad)));
        }

        out.extend(thermal_annotation(
            &b,
            &r.thermal,
            (gx0, 0.0),
            (gx1, finger_width),
            i == 0,
            Nmos::NAME,
        ));
    }

    out.property("w", finger_width * fingers as f64);
    out.property("l", length);
    out.property("ng", fingers as f64);
    Ok(out.finish())
}
