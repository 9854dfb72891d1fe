//! Errors raised by the bindings before anything reaches the engine.

use rakit_core::{CatalogError, ConfigError};
use rakit_scene::SceneError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;

#[derive(Debug, Error)]
pub enum WasmError {
    #[error("Invalid {what}: {message}")]
    Decode { what: &'static str, message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("Prototype node {index} lists missing child {child}")]
    DanglingChild { index: usize, child: usize },

    #[error("Prototype node {index} is reachable more than once")]
    SharedNode { index: usize },

    #[error("Local storage is not available")]
    StorageUnavailable,

    #[error("Local storage {operation} failed")]
    Storage { operation: &'static str },
}

/// Deserialize a JS value, naming what was expected on failure.
pub(crate) fn decode<T: DeserializeOwned>(
    value: JsValue,
    what: &'static str,
) -> Result<T, WasmError> {
    serde_wasm_bindgen::from_value(value).map_err(|e| WasmError::Decode {
        what,
        message: e.to_string(),
    })
}

pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
