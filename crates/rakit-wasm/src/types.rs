//! JavaScript-facing data transfer types.

use glam::{Quat, Vec3};
use rakit_core::{Configuration, Dimensions, ProductVariant};
use rakit_layout::{
    Axis, Direction, InteractivePart, LayoutInstance, Motion, NamedClassifier, PivotSide,
};
use rakit_scene::{BoundingBox, Camera, Geometry, MeshId, SceneGraph, SceneNode, Transform};
use serde::{Deserialize, Serialize};

use crate::error::WasmError;

/// Partial configuration update from JavaScript. Absent fields keep their
/// current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationJs {
    /// Width, height and depth in centimetres.
    #[serde(default)]
    pub dimensions_cm: Option<[f32; 3]>,
    #[serde(default)]
    pub columns: Option<u32>,
    #[serde(default)]
    pub rows: Option<u32>,
    #[serde(default)]
    pub drawers: Option<u32>,
    #[serde(default)]
    pub units: Option<u32>,
    #[serde(default)]
    pub shelves: Option<u32>,
    #[serde(default)]
    pub variant: Option<ProductVariant>,
}

impl ConfigurationJs {
    pub fn into_core(self, current: Configuration) -> Configuration {
        let mut config = current;
        if let Some([w, h, d]) = self.dimensions_cm {
            config.dimensions = Dimensions::from_cm(w, h, d);
        }
        if let Some(columns) = self.columns {
            config.counts.columns = columns;
        }
        if let Some(rows) = self.rows {
            config.counts.rows = rows;
        }
        if let Some(drawers) = self.drawers {
            config.counts.drawers = drawers;
        }
        if let Some(units) = self.units {
            config.counts.units = units;
        }
        if let Some(shelves) = self.shelves {
            config.counts.shelves = shelves;
        }
        if let Some(variant) = self.variant {
            config.variant = variant;
        }
        config
    }
}

/// How an asset node moves, when the asset ships its own metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MotionKindJs {
    HingeLeft,
    HingeRight,
    SlideForward,
    SlideBack,
    Static,
}

impl MotionKindJs {
    pub fn into_core(self) -> Motion {
        match self {
            MotionKindJs::HingeLeft => Motion::Hinge {
                axis: Axis::Y,
                pivot_side: PivotSide::Left,
            },
            MotionKindJs::HingeRight => Motion::Hinge {
                axis: Axis::Y,
                pivot_side: PivotSide::Right,
            },
            MotionKindJs::SlideForward => Motion::Slider {
                axis: Axis::Z,
                direction: Direction::Positive,
            },
            MotionKindJs::SlideBack => Motion::Slider {
                axis: Axis::Z,
                direction: Direction::Negative,
            },
            MotionKindJs::Static => Motion::Static,
        }
    }
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// One node of a loaded asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrototypeNodeJs {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub translation: [f32; 3],
    /// Quaternion as `[x, y, z, w]`.
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    #[serde(default)]
    pub children: Vec<usize>,
    /// Host-side mesh handle, echoed back in draw lists.
    #[serde(default)]
    pub mesh: Option<u32>,
    /// Local-space mesh bounds.
    #[serde(default)]
    pub bounds_min: Option<[f32; 3]>,
    #[serde(default)]
    pub bounds_max: Option<[f32; 3]>,
}

impl PrototypeNodeJs {
    fn to_node(&self) -> SceneNode {
        let transform = Transform {
            translation: Vec3::from_array(self.translation),
            rotation: Quat::from_array(self.rotation).normalize(),
            scale: Vec3::from_array(self.scale),
        };
        let node = SceneNode::new(self.name.clone()).transformed(transform);
        match (self.bounds_min, self.bounds_max) {
            (Some(min), Some(max)) => node.with_geometry(Geometry {
                mesh: self.mesh.map(MeshId),
                bounds: BoundingBox::new(Vec3::from_array(min), Vec3::from_array(max)),
            }),
            _ => node,
        }
    }
}

/// A loaded asset: its node tree and optional per-node motion metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrototypeJs {
    pub nodes: Vec<PrototypeNodeJs>,
    pub roots: Vec<usize>,
    /// Node name to motion. When empty, moving parts are detected heuristically.
    #[serde(default)]
    pub motions: Vec<(String, MotionKindJs)>,
}

impl PrototypeJs {
    /// Build the scene graph, rejecting dangling or shared child links.
    pub fn to_graph(&self) -> Result<SceneGraph, WasmError> {
        let mut graph = SceneGraph::new();
        let mut visited = vec![false; self.nodes.len()];
        // (asset index, (parent asset index, parent graph index))
        let mut stack: Vec<(usize, Option<(usize, usize)>)> =
            self.roots.iter().rev().map(|&r| (r, None)).collect();

        while let Some((index, parent)) = stack.pop() {
            let node = self.nodes.get(index).ok_or(WasmError::DanglingChild {
                index: parent.map_or(index, |(js, _)| js),
                child: index,
            })?;
            if std::mem::replace(&mut visited[index], true) {
                return Err(WasmError::SharedNode { index });
            }

            let added = match parent {
                Some((_, p)) => graph.add_child(p, node.to_node())?,
                None => graph.add_root(node.to_node()),
            };
            for &child in node.children.iter().rev() {
                stack.push((child, Some((index, added))));
            }
        }
        Ok(graph)
    }

    pub fn classifier(&self) -> Option<NamedClassifier> {
        if self.motions.is_empty() {
            return None;
        }
        let mut classifier = NamedClassifier::new();
        for (name, kind) in &self.motions {
            classifier.insert(name.clone(), kind.into_core());
        }
        Some(classifier)
    }
}

/// Dimension labels in centimetres.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementsJs {
    pub width_cm: u32,
    pub height_cm: u32,
    pub depth_cm: u32,
}

/// One placed clone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneJs {
    pub role: String,
    pub index: u32,
    pub node: usize,
    pub scale: [f32; 3],
}

/// One interactive part.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartJs {
    pub id: String,
    pub role: String,
    pub index: u32,
    pub part: u16,
    pub is_open: bool,
    /// 0 when closed, 1 when fully open.
    pub progress: f32,
}

impl From<&InteractivePart> for PartJs {
    fn from(part: &InteractivePart) -> Self {
        let progress = if part.open_offset.abs() > f32::EPSILON {
            part.current_offset / part.open_offset
        } else {
            0.0
        };
        Self {
            id: part.id.to_string(),
            role: part.id.role.to_string(),
            index: part.id.index,
            part: part.id.part,
            is_open: part.is_open,
            progress,
        }
    }
}

/// Result of a rebuild, for the page to refresh its labels and price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceJs {
    pub empty: bool,
    pub variant: ProductVariant,
    pub unit_count: u32,
    pub bounds_min: [f32; 3],
    pub bounds_max: [f32; 3],
    pub center: [f32; 3],
    pub measurements: MeasurementsJs,
    pub clones: Vec<CloneJs>,
    pub parts: Vec<PartJs>,
}

impl InstanceJs {
    pub fn new(instance: &LayoutInstance, unit_count: u32) -> Self {
        let bounds = instance.bounds();
        let m = instance.measurements();
        Self {
            empty: instance.is_empty(),
            variant: instance.variant(),
            unit_count,
            bounds_min: bounds.min.to_array(),
            bounds_max: bounds.max.to_array(),
            center: bounds.center().to_array(),
            measurements: MeasurementsJs {
                width_cm: m.width_cm,
                height_cm: m.height_cm,
                depth_cm: m.depth_cm,
            },
            clones: instance
                .placed()
                .iter()
                .map(|p| CloneJs {
                    role: p.role.to_string(),
                    index: p.index,
                    node: p.node,
                    scale: p.scale.to_array(),
                })
                .collect(),
            parts: instance.parts().iter().map(PartJs::from).collect(),
        }
    }
}

/// Something to draw this frame: a host mesh (or a plain box when `mesh` is
/// null) at a world transform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawableJs {
    pub node: usize,
    pub name: String,
    pub mesh: Option<u32>,
    pub bounds_min: [f32; 3],
    pub bounds_max: [f32; 3],
    /// Column-major world matrix.
    pub world: [f32; 16],
}

pub fn drawables(instance: &LayoutInstance) -> Vec<DrawableJs> {
    instance
        .graph()
        .traverse()
        .filter_map(|(node, scene_node, world)| {
            scene_node.geometry.map(|g| DrawableJs {
                node,
                name: scene_node.name.clone(),
                mesh: g.mesh.map(|m| m.0),
                bounds_min: g.bounds.min.to_array(),
                bounds_max: g.bounds.max.to_array(),
                world: world.to_cols_array(),
            })
        })
        .collect()
}

/// Camera placement after framing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraJs {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub distance: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Column-major view matrix.
    pub view: [f32; 16],
}

impl From<&Camera> for CameraJs {
    fn from(camera: &Camera) -> Self {
        Self {
            position: camera.position().to_array(),
            target: camera.target.to_array(),
            distance: camera.distance,
            fov: camera.fov,
            near: camera.near,
            far: camera.far,
            view: camera.view_matrix().to_cols_array(),
        }
    }
}
