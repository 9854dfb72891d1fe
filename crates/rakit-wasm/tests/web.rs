//! Browser tests for the bindings.
//!
//! Run with: wasm-pack test --headless --firefox crates/rakit-wasm

#![cfg(target_arch = "wasm32")]

use rakit_core::CatalogEntry;
use rakit_wasm::{
    load_selection, parse_catalog_js, store_selection, Configurator, InstanceJs, PrototypeJs,
    PrototypeNodeJs,
};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn cube(name: &str, size: [f32; 3]) -> JsValue {
    let half = size.map(|s| s * 0.5);
    let asset = PrototypeJs {
        nodes: vec![PrototypeNodeJs {
            name: name.to_string(),
            translation: [0.0, half[1], 0.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0, 1.0, 1.0],
            children: vec![],
            mesh: Some(1),
            bounds_min: Some(half.map(|h| -h)),
            bounds_max: Some(half),
        }],
        roots: vec![0],
        motions: vec![],
    };
    serde_wasm_bindgen::to_value(&asset).unwrap()
}

#[wasm_bindgen_test]
fn grid_rebuild_reports_units() {
    let mut configurator = Configurator::new();
    configurator.register_prototype("rack", cube("rak", [0.4, 0.4, 0.4])).unwrap();
    configurator.set_dimensions_cm(40.0, 40.0, 40.0);
    configurator.set_grid(3, 2);

    let summary: InstanceJs =
        serde_wasm_bindgen::from_value(configurator.rebuild().unwrap()).unwrap();
    assert!(!summary.empty);
    assert_eq!(summary.unit_count, 6);
    assert_eq!(summary.clones.len(), 6);
    assert!(summary.bounds_min[1].abs() < 1e-4);
    assert_eq!(configurator.price(100.0), 600.0);
}

#[wasm_bindgen_test]
fn missing_asset_gives_empty_layout() {
    let mut configurator = Configurator::new();
    configurator.register_prototype("module", cube("lemari", [1.0, 1.8, 0.6])).unwrap();
    configurator.report_load_error("module", "404");
    assert!(!configurator.has_prototype("module"));

    let summary: InstanceJs =
        serde_wasm_bindgen::from_value(configurator.rebuild().unwrap()).unwrap();
    assert!(summary.empty);
    assert_eq!(summary.bounds_max, [0.0, 0.0, 0.0]);
}

#[wasm_bindgen_test]
fn stacked_drawer_toggles() {
    let mut configurator = Configurator::new();
    configurator.register_prototype("base", cube("alas", [0.6, 0.1, 0.5])).unwrap();
    configurator.register_prototype("drawer", cube("laci", [0.6, 0.2, 0.5])).unwrap();
    configurator.set_stack(2, 0);
    configurator.rebuild().unwrap();

    assert_eq!(configurator.toggle("laci", 1, 0).unwrap(), Some(true));
    assert_eq!(configurator.toggle("drawer", 7, 0).unwrap(), None);
    assert!(configurator.toggle("lamp", 0, 0).is_err());
    assert!(configurator.tick());
}

#[wasm_bindgen_test]
fn selection_round_trips_through_local_storage() {
    let feed = r#"[{"name":"Rak Buku","file":"./models/rak.glb","type":"rack"}]"#;
    let catalog = parse_catalog_js(feed).unwrap();
    let entries: Vec<CatalogEntry> = serde_wasm_bindgen::from_value(catalog).unwrap();
    let entry = serde_wasm_bindgen::to_value(&entries[0]).unwrap();

    store_selection(entry).unwrap();
    let loaded: CatalogEntry = serde_wasm_bindgen::from_value(load_selection().unwrap()).unwrap();
    assert_eq!(loaded.name, "Rak Buku");
    assert_eq!(loaded.kind, "rack");
}
