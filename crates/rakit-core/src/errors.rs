//! Error types for the Rakit configurator.
//!
//! The layout core itself never fails; these cover the surrounding input
//! handling (tuning constants, role names, catalog feeds).

use thiserror::Error;

/// Errors while reading configuration input.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value {value} for constant '{name}'")]
    InvalidConstant { name: &'static str, value: f32 },

    #[error("Unknown part role: {name}")]
    UnknownRole { name: String },
}

/// Errors while reading the catalog feed or the stored selection.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog entry {index} has an empty name")]
    EmptyName { index: usize },

    #[error("Catalog entry '{name}' has no model file")]
    MissingFile { name: String },
}
