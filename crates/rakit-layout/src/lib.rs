//! Parametric layout engine for Rakit products.
//!
//! Takes loaded prototype assemblies and a [`Configuration`], and produces a
//! [`LayoutInstance`]: scaled, positioned clones under one assembly root,
//! resting on the floor and centred horizontally.
//!
//! ```ignore
//! let mut engine = LayoutEngine::default();
//! let instance = engine.rebuild(&config, &prototypes);
//! let count = compute_count(&config);
//! ```
//!
//! Interactive parts (doors, drawers) keep their open/closed state across
//! rebuilds through their [`StableId`].
//!
//! [`Configuration`]: rakit_core::Configuration
//! [`StableId`]: rakit_core::StableId

pub mod classify;
pub mod engine;
pub mod instance;
pub mod interactive;
pub mod prototype;
mod recipe;

pub use classify::{
    Axis, Direction, HeuristicClassifier, Motion, NamedClassifier, PartClassifier, PartContext,
    PivotSide, StaticClassifier,
};
pub use engine::{compute_count, rebuild, rebuild_with_state, toggle, LayoutEngine};
pub use instance::{LayoutInstance, Measurements, PlacedPart};
pub use interactive::{InteractivePart, InteractiveStateMap};
pub use prototype::{Mover, MoverTarget, Prototype, PrototypeSet};
