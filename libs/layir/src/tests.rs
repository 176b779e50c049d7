use geometry::prelude::*;
use test_log::test;

use crate::gds::{flatten, GdsError, GdsRecord, GdsUnits};
use crate::*;

fn metal1() -> Layer {
    Layer::new("Metal1", LayerPurpose::Drawing, GdsLayer(8, 0))
}

fn metal1_pin() -> Layer {
    Layer::new("Metal1", LayerPurpose::Pin, GdsLayer(8, 2))
}

fn metal1_label() -> Layer {
    Layer::new("Metal1", LayerPurpose::Label, GdsLayer(8, 25))
}

#[test]
fn layer_identity_ignores_gds_pair() {
    let a = Layer::new("Metal1", LayerPurpose::Drawing, GdsLayer(8, 0));
    let b = Layer::new("Metal1", LayerPurpose::Drawing, GdsLayer(9, 1));
    assert_eq!(a, b);
    assert_ne!(metal1(), metal1_pin());
}

#[test]
fn purpose_names() {
    assert_eq!(LayerPurpose::from_name("drawing"), Some(LayerPurpose::Drawing));
    assert_eq!(LayerPurpose::from_name("text"), Some(LayerPurpose::Label));
    assert_eq!(LayerPurpose::from_name("blockage"), None);
    let purpose: LayerPurpose = serde_json::from_str("\"text\"").unwrap();
    assert_eq!(purpose, LayerPurpose::Label);
}

#[test]
fn via_array_cuts() {
    let via = Via {
        layer: Layer::new("Cont", LayerPurpose::Drawing, GdsLayer(6, 0)),
        width: 160,
        height: 160,
    };
    let array = ViaArray::new(Point::new(70, 70), via, (340, 400), (3, 2));
    let cuts: Vec<Rect> = array.cuts().collect();
    assert_eq!(cuts.len(), 6);
    assert_eq!(cuts[0], Rect::from_sides(70, 70, 230, 230));
    assert_eq!(cuts[2], Rect::from_sides(750, 70, 910, 230));
    assert_eq!(cuts[5], Rect::from_sides(750, 470, 910, 630));
    assert_eq!(array.bbox(), Some(Rect::from_sides(70, 70, 910, 630)));
}

#[test]
fn empty_via_array_has_no_bbox() {
    let via = Via {
        layer: Layer::new("Vmim", LayerPurpose::Drawing, GdsLayer(129, 0)),
        width: 420,
        height: 420,
    };
    let array = ViaArray::new(Point::zero(), via, (940, 940), (0, 3));
    assert!(array.is_empty());
    assert_eq!(array.bbox(), None);
}

#[test]
fn flatten_preserves_layers_and_coordinates() {
    let mut cell = CellGeometry::new();
    cell.add_element(Shape::new(metal1(), Rect::from_sides(0, 0, 100, 200)));
    let label = Label::new(metal1_label(), "S", Point::new(50, 100));
    cell.add_element(Pin::new(
        "S",
        metal1_pin(),
        Rect::from_sides(0, 0, 100, 200),
        Direction::InOut,
        PinType::Signal,
        label,
    ));
    cell.add_element(
        Label::new(metal1(), "note", Point::new(-10, 5)).with_orientation(Orientation::MY),
    );

    let records = flatten(&cell).unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0].layer(), GdsLayer(8, 0));
    assert_eq!(records[1].layer(), GdsLayer(8, 2));
    assert_eq!(records[2].layer(), GdsLayer(8, 25));
    match &records[0] {
        GdsRecord::Boundary(b) => {
            assert_eq!(b.xy.len(), 5);
            assert_eq!(b.xy[0], b.xy[4]);
            assert_eq!(b.xy[2], Point::new(100, 200));
        }
        other => panic!("expected a boundary, got {other:?}"),
    }
    match &records[3] {
        GdsRecord::Text(t) => {
            assert_eq!(t.xy, Point::new(-10, 5));
            assert_eq!(t.presentation, 1);
            assert!(t.reflected);
            assert_eq!(t.angle, 180.);
        }
        other => panic!("expected text, got {other:?}"),
    }
}

#[test]
fn flatten_rejects_out_of_range_coordinates() {
    let cell: CellGeometry = [Element::from(Shape::new(
        metal1(),
        Rect::from_sides(0, 0, i64::from(i32::MAX) + 1, 10),
    ))]
    .into_iter()
    .collect();
    assert!(matches!(
        flatten(&cell),
        Err(GdsError::CoordinateOverflow { .. })
    ));
}

#[test]
fn default_units() {
    let units = GdsUnits::default();
    assert_eq!(units.db_unit(), 1e-9);
    assert!((units.user_unit() - 1e-6).abs() < 1e-18);
    let units = GdsUnits::from_dbu(1000);
    assert!((units.db_unit() - 1e-9).abs() < 1e-21);
}

#[test]
fn geometry_queries() {
    let mut cell = CellGeometry::new();
    cell.add_element(Shape::new(metal1(), Rect::from_sides(0, 0, 10, 10)));
    cell.add_element(Shape::new(metal1(), Rect::from_sides(20, 0, 30, 40)));
    assert_eq!(cell.rects_on("Metal1", LayerPurpose::Drawing).count(), 2);
    assert_eq!(cell.rects_on("Metal1", LayerPurpose::Pin).count(), 0);
    assert_eq!(cell.bbox(), Some(Rect::from_sides(0, 0, 30, 40)));
    assert!(cell.pin("S").is_none());
}
