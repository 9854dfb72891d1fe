//! Scene graph for Rakit assemblies.
//!
//! This crate provides:
//! - An arena scene graph with explicit, world-preserving reparenting
//! - Decomposed transforms and axis-aligned bounding boxes
//! - An orbit camera that frames a bounding box

mod bounds;
mod camera;
mod error;
mod graph;
mod transform;

pub use bounds::BoundingBox;
pub use camera::Camera;
pub use error::{Result, SceneError};
pub use graph::{Geometry, MeshId, SceneGraph, SceneNode, SceneTraverser};
pub use transform::Transform;
