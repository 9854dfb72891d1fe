//! Catalog parsing and the page-to-page selection handoff.

use rakit_core::{parse_catalog, CatalogEntry, SELECTION_STORAGE_KEY};
use wasm_bindgen::prelude::*;
use web_sys::Storage;

use crate::error::{decode, to_js, WasmError};

fn local_storage() -> Result<Storage, WasmError> {
    let window = web_sys::window().ok_or(WasmError::StorageUnavailable)?;
    window
        .local_storage()
        .ok()
        .flatten()
        .ok_or(WasmError::StorageUnavailable)
}

/// Parse the catalog feed into an array of `{name, thumbnail, file, type}`.
#[wasm_bindgen(js_name = parseCatalog)]
pub fn parse_catalog_js(json: &str) -> Result<JsValue, JsError> {
    let entries = parse_catalog(json)?;
    to_js(&entries)
}

/// Layout recipe for a catalog entry: `"tiled-grid"`, `"stacked-composite"`
/// or `"single"`.
#[wasm_bindgen(js_name = variantOf)]
pub fn variant_of(entry: JsValue) -> Result<JsValue, JsError> {
    let entry: CatalogEntry = decode(entry, "catalog entry")?;
    to_js(&entry.variant())
}

/// Remember the chosen catalog entry for the configurator page.
#[wasm_bindgen(js_name = storeSelection)]
pub fn store_selection(entry: JsValue) -> Result<(), JsError> {
    let entry: CatalogEntry = decode(entry, "catalog entry")?;
    let json = entry.to_storage_json()?;
    local_storage()?
        .set_item(SELECTION_STORAGE_KEY, &json)
        .map_err(|_| WasmError::Storage { operation: "write" })?;
    Ok(())
}

/// The stored selection, or the default wardrobe when nothing was chosen.
///
/// A missing or unreadable storage behaves like an empty one.
#[wasm_bindgen(js_name = loadSelection)]
pub fn load_selection() -> Result<JsValue, JsError> {
    let stored = local_storage()
        .ok()
        .and_then(|storage| storage.get_item(SELECTION_STORAGE_KEY).ok().flatten());
    let entry = CatalogEntry::from_storage_json(stored.as_deref())?;
    to_js(&entry)
}
