//! Test suite for the Web and headless browsers.

#![cfg(target_arch = "wasm32")]

extern crate wasm_bindgen_test;
use salvage_loot::{default_catalog_json, init_logging, LootRoller};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn builtin_roller_rolls() {
    init_logging(false);
    let roller = LootRoller::builtin();
    let json = roller.roll(r#"{"shipTier": 2, "seed": 4}"#);
    assert!(json.contains("\"rarity\""), "{}", json);
    assert_eq!(json, roller.roll(r#"{"shipTier": 2, "seed": 4}"#));
}

#[wasm_bindgen_test]
fn catalog_json_builds_a_roller() {
    let roller = LootRoller::new(&default_catalog_json()).unwrap();
    let report = roller.report(r#"{"shipTier": 5, "seed": 1}"#, 50);
    assert!(report.starts_with("Loot report"));
}
