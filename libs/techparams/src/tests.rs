use approx::assert_relative_eq;
use layir::{GdsLayer, LayerPurpose};
use test_log::test;

use crate::*;

const TECH: &str = r##"{
    "Parameters": {
        "grid": 0.005,
        "epsilon": 0.001,
        "dbu": 1000,
        "Cnt_a": 0.16,
        "nmos_minL": 0.13,
        "labelFont": "Arial",
        "labelSize": 2,
        "hasRes": true
    },
    "Layers": [
        { "name": "Metal1", "purpose": "drawing", "layer": 8, "datatype": 0, "fill": "#0000ff" },
        { "name": "Metal1", "purpose": "pin", "layer": 8, "datatype": 2 },
        { "name": "Metal1", "purpose": "text", "layer": 8, "datatype": 25 },
        { "name": "Metal1", "purpose": "filler", "layer": 8, "datatype": 22 },
        { "name": "HeatRes", "purpose": "drawing", "layer": 52, "datatype": 0 },
        { "name": "Metal1Alias", "purpose": "drawing", "layer": 8, "datatype": 0 }
    ]
}"##;

#[test]
fn loads_rules() {
    let table = TechParameterTable::from_json_str(TECH).unwrap();
    assert_relative_eq!(table.grid(), 0.005);
    assert_relative_eq!(table.epsilon(), 0.001);
    assert_eq!(table.dbu(), 1000);
    assert_relative_eq!(table.get_f64("Cnt_a").unwrap(), 0.16);
    assert_eq!(table.get_str("labelFont").unwrap(), "Arial");
    assert_eq!(table.get_i64("labelSize").unwrap(), 2);
    assert!(table.get_bool("hasRes").unwrap());
    // Integer rules widen to floats.
    assert_relative_eq!(table.get_f64("dbu").unwrap(), 1000.);
}

#[test]
fn loading_is_idempotent() {
    let a = TechParameterTable::from_json_str(TECH).unwrap();
    let b = TechParameterTable::from_json_str(TECH).unwrap();
    assert_eq!(a, b);
}

#[test]
fn unknown_rule() {
    let table = TechParameterTable::from_json_str(TECH).unwrap();
    let err = table.get("Cnt_z").unwrap_err();
    assert!(matches!(err, TechError::UnknownRule(ref rule) if rule == "Cnt_z"));
    assert!(!table.contains("Cnt_z"));
}

#[test]
fn wrong_type() {
    let table = TechParameterTable::from_json_str(TECH).unwrap();
    let err = table.get_i64("Cnt_a").unwrap_err();
    assert!(matches!(
        err,
        TechError::WrongType {
            expected: "int",
            found: "float",
            ..
        }
    ));
    assert!(table.get_f64("labelFont").is_err());
}

#[test]
fn rejects_missing_grid() {
    let json = r#"{ "Parameters": { "epsilon": 0.001, "dbu": 1000 } }"#;
    let err = TechParameterTable::from_json_str(json).unwrap_err();
    assert!(matches!(err, TechError::UnknownRule(ref rule) if rule == GRID));
}

#[test]
fn rejects_non_positive_dbu() {
    let json = r#"{ "Parameters": { "grid": 0.005, "epsilon": 0.001, "dbu": 0 } }"#;
    let err = TechParameterTable::from_json_str(json).unwrap_err();
    assert!(matches!(err, TechError::Invalid { .. }));

    let json = r#"{ "Parameters": { "grid": 0.005, "epsilon": 0.001, "dbu": 0.5 } }"#;
    let err = TechParameterTable::from_json_str(json).unwrap_err();
    assert!(matches!(err, TechError::WrongType { .. }));
}

#[test]
fn rejects_malformed_json() {
    let err = TechParameterTable::from_json_str("{ \"Parameters\": [").unwrap_err();
    assert!(matches!(err, TechError::Parse(_)));
    let err = TechParameterTable::from_json_str("{ \"Layers\": [] }").unwrap_err();
    assert!(matches!(err, TechError::Parse(_)));
}

#[test]
fn missing_file() {
    let err = TechParameterTable::load("/nonexistent/tech.json").unwrap_err();
    assert!(matches!(err, TechError::Io(_)));
}

#[test]
fn layer_lookup() {
    let table = TechParameterTable::from_json_str(TECH).unwrap();
    let layers = table.layers();
    // The unsupported `filler` purpose is skipped.
    assert_eq!(layers.len(), 5);

    let m1 = layers.drawing("Metal1").unwrap();
    assert_eq!(m1.gds(), GdsLayer(8, 0));
    assert_eq!(layers.pin("Metal1").unwrap().gds(), GdsLayer(8, 2));

    let label = layers.label_layer_for(m1).unwrap();
    assert_eq!(label.purpose(), LayerPurpose::Label);
    assert_eq!(label.gds(), GdsLayer(8, 25));

    let heat = layers.drawing("HeatRes").unwrap();
    assert!(layers.label_layer_for(heat).is_none());

    assert_eq!(layers.by_gds(GdsLayer(8, 0)).count(), 2);
    assert!(matches!(
        layers.get("Metal9", LayerPurpose::Drawing),
        Err(TechError::UnknownLayer { .. })
    ));

    let attrs = layers.attributes(m1.key()).unwrap();
    assert_eq!(attrs.get("fill").and_then(|v| v.as_str()), Some("#0000ff"));
}

#[test]
fn duplicate_layers_are_rejected() {
    let json = r#"{
        "Parameters": { "grid": 0.005, "epsilon": 0.001, "dbu": 1000 },
        "Layers": [
            { "name": "Cont", "purpose": "drawing", "layer": 6, "datatype": 0 },
            { "name": "Cont", "purpose": "drawing", "layer": 6, "datatype": 1 }
        ]
    }"#;
    let err = TechParameterTable::from_json_str(json).unwrap_err();
    assert!(matches!(err, TechError::DuplicateLayer(_)));
}
