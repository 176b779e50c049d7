//! Thermal-annotation rectangles.

use layir::{Element, Layer};

use crate::primitives::{MicronRect, PrimitiveBuilder};

/// Marks the rectangle spanned by `corner1` and `corner2` on a thermal layer.
///
/// Always returns the rectangle; with `include_label`, also returns a
/// label in the default style centered on it.
pub fn thermal_annotation(
    builder: &PrimitiveBuilder,
    layer: &Layer,
    corner1: (f64, f64),
    corner2: (f64, f64),
    include_label: bool,
    label_text: &str,
) -> Vec<Element> {
    let rect = MicronRect::from_sides(corner1.0, corner1.1, corner2.0, corner2.1);
    let shape = builder.rect(layer, rect);
    let center = shape.rect().center();
    let mut elements = vec![Element::from(shape)];
    if include_label {
        elements.push(builder.label_at(layer, label_text, center).into());
    }
    elements
}

#[cfg(test)]
mod tests {
    use geometry::prelude::*;
    use layir::{Font, GdsLayer, LayerPurpose};

    use super::*;
    use crate::rules::CommonRules;

    fn builder() -> PrimitiveBuilder {
        PrimitiveBuilder::new(&CommonRules {
            grid: 0.005,
            epsilon: 0.001,
            dbu: 1000,
            label_font: Font::default(),
        })
    }

    fn heat() -> Layer {
        Layer::new("HeatRes", LayerPurpose::Drawing, GdsLayer(52, 0))
    }

    #[test]
    fn rectangle_only() {
        let elements = thermal_annotation(&builder(), &heat(), (1.0, 2.0), (0.0, 0.0), false, "x");
        assert_eq!(elements.len(), 1);
        match &elements[0] {
            Element::Rect(shape) => {
                assert_eq!(shape.rect(), Rect::from_sides(0, 0, 1000, 2000));
                assert_eq!(shape.layer(), &heat());
            }
            other => panic!("expected a rectangle, got {other:?}"),
        }
    }

    #[test]
    fn centered_label() {
        let elements = thermal_annotation(&builder(), &heat(), (0.0, 0.0), (1.0, 2.0), true, "rsil");
        assert_eq!(elements.len(), 2);
        match &elements[1] {
            Element::Label(label) => {
                assert_eq!(label.text(), "rsil");
                assert_eq!(label.anchor(), Point::new(500, 1000));
                assert_eq!(label.alignment(), layir::Alignment::Center);
            }
            other => panic!("expected a label, got {other:?}"),
        }
    }
}
