//! Contact and via array tiling.
//!
//! Along each axis the usable span is the region minus the edge overlap on
//! both sides. As many contacts as fit at minimum spacing are placed; the
//! spacing is then widened uniformly to fill the span, and whatever the grid
//! cannot absorb is split evenly between the two ends.

use layir::{Element, Layer, ViaArray};

use crate::primitives::{MicronRect, PrimitiveBuilder};
use crate::rules::CommonRules;

/// Computes regular arrays of square contacts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactTiler {
    size: f64,
    spacing: f64,
    overlap: f64,
    grid: f64,
    epsilon: f64,
}

impl ContactTiler {
    /// Creates a tiler for contacts of edge `size`, at least `spacing` apart,
    /// kept `overlap` inside the tiled region.
    pub fn new(common: &CommonRules, size: f64, spacing: f64, overlap: f64) -> Self {
        Self {
            size,
            spacing,
            overlap,
            grid: common.grid,
            epsilon: common.epsilon,
        }
    }

    fn fix(&self, value: f64) -> f64 {
        geometry::grid::grid_fix(value, self.grid, self.epsilon)
    }

    /// The number of contacts that fit in `usable` microns. Never negative.
    pub fn count(&self, usable: f64) -> u32 {
        let count = ((usable + self.spacing) / (self.size + self.spacing) + self.epsilon).floor();
        if count <= 0.0 {
            0
        } else {
            count as u32
        }
    }

    fn tile_axis(&self, low: f64, high: f64) -> AxisTiling {
        let usable = (high - low) - 2.0 * self.overlap;
        let count = self.count(usable);
        match count {
            0 => AxisTiling {
                start: low,
                pitch: 0.0,
                count,
            },
            1 => AxisTiling {
                start: self.fix((low + high - self.size) / 2.0),
                pitch: 0.0,
                count,
            },
            _ => {
                let n = count as f64;
                let gap = self.fix((usable - n * self.size) / (n - 1.0));
                let used = n * self.size + (n - 1.0) * gap;
                let leftover = usable - used;
                AxisTiling {
                    start: self.fix(low + self.overlap + leftover / 2.0),
                    pitch: self.fix(self.size + gap),
                    count,
                }
            }
        }
    }

    /// Tiles `region` with contacts.
    pub fn tile(&self, region: MicronRect) -> ContactArray {
        let x = self.tile_axis(region.left, region.right);
        let y = self.tile_axis(region.bot, region.top);
        let array = ContactArray {
            size: self.size,
            region,
            x,
            y,
        };
        tracing::trace!(nx = x.count, ny = y.count, "tiled contact array");
        array
    }
}

/// Placement of contacts along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTiling {
    /// Low edge of the first contact.
    pub start: f64,
    /// Distance between the low edges of neighboring contacts.
    pub pitch: f64,
    pub count: u32,
}

impl AxisTiling {
    fn low(&self, index: u32) -> f64 {
        self.start + index as f64 * self.pitch
    }
}

/// A regular two-dimensional array of square contacts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactArray {
    size: f64,
    region: MicronRect,
    pub x: AxisTiling,
    pub y: AxisTiling,
}

impl ContactArray {
    #[inline]
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Total number of contacts.
    pub fn len(&self) -> usize {
        self.x.count as usize * self.y.count as usize
    }

    /// Returns `true` if either axis has no room for a contact.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the contacts, row by row from the bottom.
    pub fn contacts(&self) -> impl Iterator<Item = MicronRect> + '_ {
        (0..self.y.count).flat_map(move |j| {
            (0..self.x.count).map(move |i| {
                let left = self.x.low(i);
                let bot = self.y.low(j);
                MicronRect::from_sides(left, bot, left + self.size, bot + self.size)
            })
        })
    }

    /// The bounding box of all contacts, or [`None`] if the array is empty.
    pub fn bbox(&self) -> Option<MicronRect> {
        if self.is_empty() {
            return None;
        }
        let last_x = self.x.low(self.x.count - 1) + self.size;
        let last_y = self.y.low(self.y.count - 1) + self.size;
        Some(MicronRect::from_sides(self.x.start, self.y.start, last_x, last_y))
    }

    /// The rectangle drawn on the path layer. Always the full tiled region,
    /// even when no contact fits.
    #[inline]
    pub fn path_rect(&self) -> MicronRect {
        self.region
    }

    /// The bounding box grown by `enclosure`, or [`None`] if the array is empty.
    pub fn cover_rect(&self, enclosure: f64) -> Option<MicronRect> {
        self.bbox().map(|bbox| bbox.expand_all(enclosure))
    }

    /// The path rectangle on `path` if requested, followed by one rectangle per
    /// contact on `layer`.
    pub fn to_elements(
        &self,
        builder: &PrimitiveBuilder,
        layer: &Layer,
        path: Option<&Layer>,
    ) -> Vec<Element> {
        let mut elements = Vec::with_capacity(self.len() + 1);
        if let Some(path) = path {
            elements.push(builder.rect(path, self.path_rect()).into());
        }
        elements.extend(
            self.contacts()
                .map(|contact| Element::from(builder.rect(layer, contact))),
        );
        elements
    }

    /// The whole array as one compact record, or [`None`] if it is empty.
    pub fn to_via_array(&self, builder: &PrimitiveBuilder, layer: &Layer) -> Option<ViaArray> {
        if self.is_empty() {
            return None;
        }
        Some(builder.via_array(
            layer,
            (self.x.start, self.y.start),
            self.size,
            (self.x.pitch, self.y.pitch),
            (self.x.count, self.y.count),
        ))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use geometry::rect::Rect;
    use layir::{Font, GdsLayer, LayerPurpose};

    use super::*;

    fn common() -> CommonRules {
        CommonRules {
            grid: 0.005,
            epsilon: 0.001,
            dbu: 1000,
            label_font: Font::default(),
        }
    }

    fn contact_tiler() -> ContactTiler {
        ContactTiler::new(&common(), 0.16, 0.18, 0.07)
    }

    #[test]
    fn single_contact_is_centered() {
        let array = contact_tiler().tile(MicronRect::from_sides(0.0, 0.0, 0.38, 0.30));
        assert_eq!(array.len(), 1);
        let contact = array.contacts().next().unwrap();
        assert_abs_diff_eq!(contact.left, 0.11, epsilon = 1e-9);
        assert_abs_diff_eq!(contact.bot, 0.07, epsilon = 1e-9);
        assert_abs_diff_eq!(contact.width(), 0.16, epsilon = 1e-9);
    }

    #[test]
    fn narrow_region_is_empty() {
        let array = contact_tiler().tile(MicronRect::from_sides(0.0, 0.0, 0.38, 0.15));
        assert_eq!(array.y.count, 0);
        assert!(array.is_empty());
        assert_eq!(array.contacts().count(), 0);
        assert!(array.bbox().is_none());
        assert!(array.cover_rect(0.05).is_none());
    }

    fn path_of(region: MicronRect) -> (Vec<Element>, Layer, Layer) {
        let common = common();
        let builder = PrimitiveBuilder::new(&common);
        let cont = Layer::new("Cont", LayerPurpose::Drawing, GdsLayer(6, 0));
        let poly = Layer::new("GatPoly", LayerPurpose::Drawing, GdsLayer(5, 0));
        let array = contact_tiler().tile(region);
        assert_eq!(array.path_rect(), region);
        (array.to_elements(&builder, &cont, Some(&poly)), cont, poly)
    }

    #[test]
    fn path_covers_populated_region() {
        let region = MicronRect::from_sides(0.0, 0.0, 2.0, 4.0);
        let (elements, cont, poly) = path_of(region);
        let Element::Rect(path) = &elements[0] else {
            panic!("expected the path rectangle first");
        };
        assert_eq!(path.layer(), &poly);
        assert_eq!(path.rect(), Rect::from_sides(0, 0, 2000, 4000));
        let contacts = elements[1..]
            .iter()
            .filter(|e| matches!(e, Element::Rect(r) if r.layer() == &cont))
            .count();
        assert_eq!(contacts, elements.len() - 1);
        assert!(contacts > 1);
    }

    #[test]
    fn path_is_drawn_for_empty_array() {
        let region = MicronRect::from_sides(0.0, 0.0, 0.38, 0.15);
        let (elements, _, poly) = path_of(region);
        assert_eq!(elements.len(), 1);
        let Element::Rect(path) = &elements[0] else {
            panic!("expected a path rectangle");
        };
        assert_eq!(path.layer(), &poly);
        assert_eq!(path.rect(), Rect::from_sides(0, 0, 380, 150));
    }

    #[test]
    fn count_is_monotonic_in_span() {
        let tiler = contact_tiler();
        let mut prev = 0;
        for i in 0..2000 {
            let count = tiler.count(i as f64 * 0.005 - 1.0);
            assert!(count >= prev, "count decreased at step {i}");
            prev = count;
        }
        assert!(prev > 10);
    }

    #[test]
    fn fill_is_exact_within_grid() {
        let tiler = contact_tiler();
        for i in 0..400 {
            let height = 0.5 + i as f64 * 0.005;
            let array = tiler.tile(MicronRect::from_sides(0.0, 0.0, 0.38, height));
            let y = array.y;
            if y.count < 2 {
                continue;
            }
            let usable = height - 2.0 * 0.07;
            let gap = y.pitch - 0.16;
            assert!(gap >= 0.18 - 1e-9, "gap {gap} below spacing");
            let used = y.count as f64 * 0.16 + (y.count - 1) as f64 * gap;
            assert!(used <= usable + 1e-9);
            // Each gap loses at most one grid step to rounding.
            assert!(usable - used < (y.count as f64) * 0.005 + 1e-9);
            // Leftover is split between both ends.
            let bbox = array.bbox().unwrap();
            let lo = bbox.bot - 0.07;
            let hi = height - 0.07 - bbox.top;
            assert!(lo >= -1e-9 && hi >= -1e-9);
            assert!((lo - hi).abs() <= 0.005 + 1e-9);
        }
    }

    #[test]
    fn contacts_are_on_grid() {
        let array = contact_tiler().tile(MicronRect::from_sides(0.0, 0.0, 2.0, 4.0));
        for contact in array.contacts() {
            for v in [contact.left, contact.bot, contact.right, contact.top] {
                let steps = v / 0.005;
                assert_abs_diff_eq!(steps, steps.round(), epsilon = 1e-6);
            }
        }
    }
}
