//! Silicided poly resistor.
//!
//! The body is a serpentine of `bends + 1` vertical poly stripes of length
//! `l`, joined by U-turns that alternate between the top and the bottom.
//! Contacted heads terminate both free ends.
//!
//! The resistance of a body of drawn width `w` is
//!
//! ```text
//! R = (l / weff)·(b + 1)·rspec + (2/κ·weff + ps)·(b / weff)·rkspec + (2 / w)·rzspec
//! ```
//!
//! with `weff = w + lwd`. The first term counts the squares of the straight
//! stripes, the second the squares of the bends and the third the two head
//! transitions. A width within tolerance of the minimum is taken as the
//! minimum, both here and in the inverse solvers.

use crate::devices::{Generation, Output, PCell};
use crate::error::{Error, Result};
use crate::params::RsilParams;
use crate::primitives::{MicronRect, PrimitiveBuilder};
use crate::quantity::format_engineering;
use crate::rules::{DeviceRuleSet, RsilRules};
use crate::thermal::thermal_annotation;
use crate::tiler::ContactTiler;

/// The silicided poly resistor cell.
pub struct Rsil;

impl PCell for Rsil {
    type Params = RsilParams;
    const NAME: &'static str = "rsil";

    fn generate(rules: &DeviceRuleSet, params: &Self::Params) -> Result<Generation> {
        rsil(rules, params)
    }
}

impl RsilRules {
    /// Returns `min_width` if `w` is within tolerance of it, otherwise `w`.
    pub fn snap_width(&self, w: f64) -> f64 {
        if (w - self.min_width).abs() < self.width_tolerance {
            self.min_width
        } else {
            w
        }
    }

    /// Resistance in ohms of a body with `bends` bends. Dimensions are in microns.
    pub fn resistance(&self, l: f64, w: f64, bends: u32, ps: f64) -> f64 {
        let w = self.snap_width(w);
        let b = bends as f64;
        let weff = w + self.lwd;
        (l / weff) * (b + 1.0) * self.rspec
            + (2.0 / self.kappa * weff + ps) * (b / weff) * self.rkspec
            + (2.0 / w) * self.rzspec
    }

    /// The stripe length giving resistance `r` at width `w`.
    pub fn solve_length(&self, r: f64, w: f64, bends: u32, ps: f64) -> Result<f64> {
        let w = self.snap_width(w);
        let b = bends as f64;
        let weff = w + self.lwd;
        if w <= 0.0 || weff <= 0.0 {
            return Err(unsolvable("length", "width must be positive"));
        }
        let bend_r = (2.0 / self.kappa * weff + ps) * (b / weff) * self.rkspec;
        let head_r = (2.0 / w) * self.rzspec;
        let l = (r - bend_r - head_r) * weff / ((b + 1.0) * self.rspec);
        if l.is_finite() && l > 0.0 {
            Ok(l)
        } else {
            Err(unsolvable(
                "length",
                "resistance is below that of the bends and heads alone",
            ))
        }
    }

    /// The stripe width giving resistance `r` at stripe length `l`.
    ///
    /// Multiplying the resistance equation through by `w·weff` gives
    /// `R'·w² + (R'·lwd − K − Z)·w − Z·lwd = 0`, where `R'` is `r` less the
    /// width-independent part of the bends, `K = l·(b+1)·rspec + ps·b·rkspec`
    /// and `Z = 2·rzspec`. The positive root is returned.
    pub fn solve_width(&self, r: f64, l: f64, bends: u32, ps: f64) -> Result<f64> {
        let b = bends as f64;
        let a = r - (2.0 / self.kappa) * b * self.rkspec;
        if a.is_nan() || a <= 0.0 {
            return Err(unsolvable(
                "width",
                "resistance is below that of the bends alone",
            ));
        }
        let k = l * (b + 1.0) * self.rspec + ps * b * self.rkspec;
        let z = 2.0 * self.rzspec;
        let bq = a * self.lwd - k - z;
        let c = -z * self.lwd;
        let disc = bq * bq - 4.0 * a * c;
        if disc < 0.0 {
            return Err(unsolvable("width", "no real solution"));
        }
        let w = (-bq + disc.sqrt()) / (2.0 * a);
        if w.is_finite() && w > 0.0 {
            Ok(self.snap_width(w))
        } else {
            Err(unsolvable("width", "no positive solution"))
        }
    }
}

fn unsolvable(target: &'static str, reason: &'static str) -> Error {
    Error::Unsolvable {
        target,
        reason: reason.into(),
    }
}

/// Generates a silicided poly resistor.
pub fn rsil(rules: &DeviceRuleSet, params: &RsilParams) -> Result<Generation> {
    let r = rules.rsil()?;
    let common = rules.common();
    let b = PrimitiveBuilder::new(common);
    let mut out = Output::new(Rsil::NAME, common);
    let c = &r.contact;

    let w = r.snap_width(b.fix(params.width.to_microns()));
    let w = out.clamp_min("width", w, r.min_width);
    let l = out.clamp_min("length", b.fix(params.length.to_microns()), r.min_length);
    let ps = match params.poly_space {
        Some(ps) => out.clamp_min("poly space", b.fix(ps.to_microns()), r.min_poly_space),
        None => r.min_poly_space,
    };
    let bends = params.bends;

    let stripe_x = |i: u32| i as f64 * (w + ps);
    for i in 0..=bends {
        let x0 = stripe_x(i);
        out.add(b.rect(&r.poly, MicronRect::from_sides(x0, 0.0, x0 + w, l)));
    }

    let mut body = MicronRect::from_sides(0.0, 0.0, stripe_x(bends) + w, l);
    for i in 0..bends {
        let (x0, x1) = (stripe_x(i), stripe_x(i + 1) + w);
        let turn = if i % 2 == 0 {
            MicronRect::from_sides(x0, l, x1, l + w)
        } else {
            MicronRect::from_sides(x0, -w, x1, 0.0)
        };
        body = body.union(&turn);
        out.add(b.rect(&r.poly, turn));
    }

    // The last stripe's free end is opposite its turn.
    let head_len = c.size + 2.0 * c.poly_enclosure;
    let last_x = stripe_x(bends);
    let plus = MicronRect::from_sides(0.0, -head_len, w, 0.0);
    let minus = if bends % 2 == 1 {
        MicronRect::from_sides(last_x, -head_len, last_x + w, 0.0)
    } else {
        MicronRect::from_sides(last_x, l, last_x + w, l + head_len)
    };
    let tiler = ContactTiler::new(common, c.size, c.spacing, c.poly_enclosure);
    for (name, head) in [("PLUS", plus), ("MINUS", minus)] {
        let array = tiler.tile(head);
        if array.is_empty() {
            out.degenerate("resistor head");
        }
        out.extend(array.to_elements(&b, &r.cont, Some(&r.poly)));
        let metal = array.cover_rect(c.metal1_enclosure);
        if let Some(metal) = metal {
            out.add(b.rect(&r.metal1, metal));
        }
        out.add(b.pin(&r.metal1_pin, name, metal.unwrap_or(head)));
    }

    out.add(b.rect(&r.res, body));
    out.add(b.rect(&r.extblock, body.expand_all(r.extblock_enclosure)));

    let resistance = r.resistance(l, w, bends, ps);
    out.add(b.label(
        &r.text,
        format!("R={}Ohm", format_engineering(resistance)),
        body.center_x(),
        body.center_y(),
    ));
    out.extend(thermal_annotation(
        &b,
        &r.thermal,
        (body.left, body.bot),
        (body.right, body.top),
        true,
        Rsil::NAME,
    ));

    out.property("w", w);
    out.property("l", l);
    out.property("b", bends as f64);
    out.property("ps", ps);
    out.property("R", resistance);
    Ok(out.finish())
}
