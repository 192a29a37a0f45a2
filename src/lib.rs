use wasm_bindgen::prelude::*;

pub mod loot;
mod console;

use loot::{loot_report, CatalogRegistry, LootError, LootPipeline, RollContext};

pub use console::init_logging;

fn error_json(err: &LootError) -> String {
    serde_json::json!({ "error": err.to_string() }).to_string()
}

fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// JS-facing handle owning one immutable catalog.
#[wasm_bindgen]
pub struct LootRoller {
    catalog: CatalogRegistry,
}

#[wasm_bindgen]
impl LootRoller {
    #[wasm_bindgen(constructor)]
    pub fn new(catalog_json: &str) -> Result<LootRoller, String> {
        set_panic_hook();
        CatalogRegistry::from_json(catalog_json)
            .map(|catalog| LootRoller { catalog })
            .map_err(|e| e.to_string())
    }

    pub fn builtin() -> LootRoller {
        set_panic_hook();
        LootRoller {
            catalog: CatalogRegistry::builtin(),
        }
    }

    /// Rolls a JSON `RollContext`, returning a JSON `RollResult` or `{"error": ...}`.
    pub fn roll(&self, context_json: &str) -> String {
        let rolled = parse_context(context_json)
            .and_then(|ctx| LootPipeline::new(&self.catalog).roll_loot(&ctx))
            .and_then(|result| serde_json::to_string(&result).map_err(LootError::from));
        match rolled {
            Ok(json) => json,
            Err(e) => error_json(&e),
        }
    }

    pub fn report(&self, context_json: &str, rolls: u32) -> String {
        let report = parse_context(context_json).and_then(|ctx| {
            loot_report(&LootPipeline::new(&self.catalog), &ctx, rolls as usize)
        });
        match report {
            Ok(text) => text,
            Err(e) => error_json(&e),
        }
    }

    #[wasm_bindgen(js_name = catalogJson)]
    pub fn catalog_json(&self) -> String {
        match self.catalog.to_json() {
            Ok(json) => json,
            Err(e) => error_json(&e),
        }
    }
}

fn parse_context(json: &str) -> loot::Result<RollContext> {
    Ok(serde_json::from_str(json)?)
}

#[wasm_bindgen]
pub fn default_catalog_json() -> String {
    LootRoller::builtin().catalog_json()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_returns_result_json() {
        let roller = LootRoller::builtin();
        let json = roller.roll(r#"{"shipTier": 3, "seed": 99}"#);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert!(value.get("error").is_none(), "{json}");
        assert!(value["rarity"].is_string());
        assert_eq!(json, roller.roll(r#"{"shipTier": 3, "seed": 99}"#));
    }

    #[test]
    fn errors_come_back_as_json() {
        let roller = LootRoller::builtin();

        let missing = roller.roll(r#"{"shipTier": 7}"#);
        assert_eq!(
            missing,
            r#"{"error":"invalid catalog: no ship profile for tier 7"}"#
        );

        let malformed = roller.roll("shipTier=3");
        assert!(malformed.starts_with(r#"{"error":"JSON error"#));
    }

    #[test]
    fn custom_catalog_round_trips_through_json() {
        let json = default_catalog_json();
        let roller = LootRoller::new(&json).unwrap();
        assert_eq!(roller.catalog_json(), json);
        assert!(LootRoller::new("42").is_err());
    }
}
