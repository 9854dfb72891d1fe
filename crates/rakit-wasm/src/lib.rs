//! WebAssembly bindings for the Rakit configurator.
//!
//! The page owns asset loading, rendering and DOM wiring; this crate owns the
//! configuration, the prototypes and the layout engine.
//!
//! ## Example
//!
//! ```js
//! import { Configurator, loadSelection } from 'rakit';
//!
//! const selection = loadSelection();
//! const configurator = new Configurator();
//! configurator.selectCatalogEntry(selection);
//!
//! // Once the asset has loaded:
//! configurator.registerPrototype('module', { nodes, roots });
//!
//! configurator.setDimensionsCm(120, 180, 40);
//! configurator.setGrid(2, 1);
//! const summary = configurator.rebuild();
//! priceLabel.textContent = formatRupiah(configurator.price(1500000));
//!
//! function frame() {
//!   configurator.tick();
//!   draw(configurator.drawables());
//!   requestAnimationFrame(frame);
//! }
//! ```

use glam::Vec3;
use rakit_core::{
    CatalogEntry, Configuration, Dimensions, LayoutConstants, PartRole, ProductVariant, StableId,
};
use rakit_layout::{compute_count, HeuristicClassifier, LayoutEngine, Prototype, PrototypeSet};
use rakit_scene::Camera;
use wasm_bindgen::prelude::*;

mod error;
mod storage;
mod types;

pub use error::WasmError;
pub use storage::*;
pub use types::*;

use error::{decode, to_js};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(debug_assertions)]
    console_error_panic_hook::set_once();
}

/// The configurator state behind one product page.
#[wasm_bindgen]
pub struct Configurator {
    engine: LayoutEngine,
    prototypes: PrototypeSet,
    config: Configuration,
    camera: Camera,
}

impl Default for Configurator {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Configurator {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            engine: LayoutEngine::default(),
            prototypes: PrototypeSet::new(),
            config: Configuration::default(),
            camera: Camera::default(),
        }
    }

    /// Get the version of the bindings.
    #[wasm_bindgen(js_name = version)]
    pub fn version() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    /// Apply a partial configuration such as `{ dimensionsCm: [120, 180, 40], columns: 2 }`.
    #[wasm_bindgen(js_name = setConfiguration)]
    pub fn set_configuration(&mut self, update: JsValue) -> Result<(), JsError> {
        let update: ConfigurationJs = decode(update, "configuration")?;
        self.config = update.into_core(self.config);
        Ok(())
    }

    /// Current configuration as a plain object.
    #[wasm_bindgen(js_name = getConfiguration)]
    pub fn get_configuration(&self) -> Result<JsValue, JsError> {
        to_js(&self.config)
    }

    /// Pick the recipe that matches a catalog entry's type.
    #[wasm_bindgen(js_name = selectCatalogEntry)]
    pub fn select_catalog_entry(&mut self, entry: JsValue) -> Result<(), JsError> {
        let entry: CatalogEntry = decode(entry, "catalog entry")?;
        self.config.variant = entry.variant();
        Ok(())
    }

    /// Slider values in centimetres.
    #[wasm_bindgen(js_name = setDimensionsCm)]
    pub fn set_dimensions_cm(&mut self, width: f32, height: f32, depth: f32) {
        self.config.dimensions = Dimensions::from_cm(width, height, depth);
    }

    #[wasm_bindgen(js_name = setGrid)]
    pub fn set_grid(&mut self, columns: u32, rows: u32) {
        self.config.variant = ProductVariant::TiledGrid;
        self.config.counts.columns = columns;
        self.config.counts.rows = rows;
    }

    #[wasm_bindgen(js_name = setStack)]
    pub fn set_stack(&mut self, drawers: u32, units: u32) {
        self.config.variant = ProductVariant::StackedComposite;
        self.config.counts.drawers = drawers;
        self.config.counts.units = units;
    }

    #[wasm_bindgen(js_name = setShelves)]
    pub fn set_shelves(&mut self, shelves: u32) {
        self.config.counts.shelves = shelves;
    }

    /// Override layout constants. Missing fields keep their defaults.
    ///
    /// Door angles and slide distances apply to prototypes registered
    /// afterwards.
    #[wasm_bindgen(js_name = setConstants)]
    pub fn set_constants(&mut self, constants: JsValue) -> Result<(), JsError> {
        let constants: LayoutConstants = decode(constants, "layout constants")?;
        constants.validate()?;
        self.engine.set_constants(constants);
        Ok(())
    }

    /// Register a loaded asset `{ nodes, roots, motions? }` for a part role.
    #[wasm_bindgen(js_name = registerPrototype)]
    pub fn register_prototype(&mut self, role: &str, asset: JsValue) -> Result<(), JsError> {
        let role: PartRole = role.parse()?;
        let asset: PrototypeJs = decode(asset, "prototype")?;
        let graph = asset.to_graph()?;
        let constants = self.engine.constants();

        let prototype = match asset.classifier() {
            Some(named) => Prototype::new(role, graph, &named, constants),
            None => Prototype::new(role, graph, &HeuristicClassifier::default(), constants),
        };
        self.prototypes.insert(prototype);
        Ok(())
    }

    /// Record a failed asset load. The role's prototype is dropped, so the
    /// next rebuild yields an empty layout instead of stale clones.
    #[wasm_bindgen(js_name = reportLoadError)]
    pub fn report_load_error(&mut self, role: &str, message: &str) {
        let warning = format!("Failed to load {role} model: {message}");
        web_sys::console::warn_1(&JsValue::from_str(&warning));
        if let Ok(role) = role.parse::<PartRole>() {
            self.prototypes.remove(role);
        }
    }

    #[wasm_bindgen(js_name = hasPrototype)]
    pub fn has_prototype(&self, role: &str) -> bool {
        role.parse::<PartRole>().is_ok_and(|role| self.prototypes.contains(role))
    }

    /// Rebuild the layout and return its summary.
    #[wasm_bindgen]
    pub fn rebuild(&mut self) -> Result<JsValue, JsError> {
        let unit_count = compute_count(&self.config);
        let instance = self.engine.rebuild(&self.config, &self.prototypes);
        to_js(&InstanceJs::new(instance, unit_count))
    }

    /// Flip a door or drawer. Returns its new state, or `undefined` if absent.
    #[wasm_bindgen]
    pub fn toggle(&mut self, role: &str, index: u32, part: u16) -> Result<Option<bool>, JsError> {
        let role: PartRole = role.parse()?;
        Ok(self.engine.toggle(&StableId::new(role, index).with_part(part)))
    }

    /// Advance door and drawer animation by one frame.
    #[wasm_bindgen]
    pub fn tick(&mut self) -> bool {
        self.engine.tick()
    }

    /// Meshes to draw with their world matrices.
    #[wasm_bindgen]
    pub fn drawables(&self) -> Result<JsValue, JsError> {
        let list = self.engine.instance().map(drawables).unwrap_or_default();
        to_js(&list)
    }

    /// Interactive part under a world-space ray, or `null`.
    #[wasm_bindgen]
    #[allow(clippy::too_many_arguments)]
    pub fn pick(
        &self,
        ox: f32,
        oy: f32,
        oz: f32,
        dx: f32,
        dy: f32,
        dz: f32,
    ) -> Result<JsValue, JsError> {
        let Some(instance) = self.engine.instance() else {
            return Ok(JsValue::NULL);
        };
        let hit = instance
            .pick(Vec3::new(ox, oy, oz), Vec3::new(dx, dy, dz))
            .and_then(|id| instance.part(&id));
        match hit {
            Some(part) => to_js(&PartJs::from(part)),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(js_name = unitCount)]
    pub fn unit_count(&self) -> u32 {
        compute_count(&self.config)
    }

    /// Total price for the current configuration.
    #[wasm_bindgen]
    pub fn price(&self, unit_price: f64) -> f64 {
        f64::from(self.unit_count()) * unit_price
    }

    /// Fit the camera to the current layout and return its placement.
    #[wasm_bindgen(js_name = frameCamera)]
    pub fn frame_camera(&mut self) -> Result<JsValue, JsError> {
        self.engine.frame(&mut self.camera);
        to_js(&CameraJs::from(&self.camera))
    }
}
