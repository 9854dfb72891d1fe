//! Core types for the Rakit furniture configurator.
//!
//! This crate provides the foundational types shared by the other rakit crates:
//! - Configuration value objects (dimensions, counts, product variant)
//! - Part roles and stable identifiers for interactive sub-parts
//! - Layout tuning constants
//! - Catalog records and the page-to-page selection handoff
//! - Error types

pub mod catalog;
pub mod constants;
pub mod errors;
pub mod types;

pub use catalog::*;
pub use constants::*;
pub use errors::*;
pub use types::*;
