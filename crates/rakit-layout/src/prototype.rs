//! Prototype assemblies: loaded, unscaled assets used as cloning templates.

use glam::{Mat4, Vec3};
use indexmap::IndexMap;
use rakit_core::{LayoutConstants, PartRole};
use rakit_scene::{BoundingBox, SceneGraph, SceneNode, Transform};
use tracing::{debug, warn};

use crate::classify::{Axis, Direction, Motion, PartClassifier, PartContext, PivotSide};

/// What a mover moves inside a clone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoverTarget {
    /// The whole clone slides or swings.
    Whole,
    /// A node of the prototype graph (a hinge pivot or a sliding mesh).
    Node(usize),
}

/// A movable sub-part discovered in a prototype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mover {
    pub target: MoverTarget,
    pub motion: Motion,
    /// Open displacement: radians for hinges, distance for sliders.
    ///
    /// For [`MoverTarget::Whole`] the distance is in unscaled prototype units
    /// and is scaled with the clone.
    pub open_offset: f32,
}

/// A loaded asset ready for cloning.
///
/// The graph is recentred so its bounding box is centred on the origin, and
/// hinged meshes already hang from pivot nodes on their hinge line.
#[derive(Debug, Clone)]
pub struct Prototype {
    role: PartRole,
    graph: SceneGraph,
    bounds: BoundingBox,
    movers: Vec<Mover>,
}

/// Motion of parts that always move as a whole, regardless of their meshes.
fn whole_part_motion(role: PartRole) -> Option<Motion> {
    match role {
        PartRole::Drawer => Some(Motion::Slider {
            axis: Axis::Z,
            direction: Direction::Positive,
        }),
        _ => None,
    }
}

impl Prototype {
    /// Prepare a loaded graph for cloning.
    pub fn new(
        role: PartRole,
        mut graph: SceneGraph,
        classifier: &dyn PartClassifier,
        constants: &LayoutConstants,
    ) -> Self {
        let original = graph.compute_bounds().unwrap_or_default();
        let center = original.center();
        graph.translate_roots(-center);
        let bounds = original.translated(-center);

        let movers = match whole_part_motion(role) {
            Some(motion) => {
                let extent = motion.axis().map_or(0.0, |a| bounds.size()[a.index()]);
                vec![Mover {
                    target: MoverTarget::Whole,
                    motion,
                    open_offset: extent * constants.slider_open_fraction,
                }]
            }
            None => detect_movers(&mut graph, &bounds, classifier, constants),
        };

        debug!(
            %role,
            nodes = graph.node_count(),
            movers = movers.len(),
            size = ?bounds.size(),
            "prototype ready"
        );
        Self {
            role,
            graph,
            bounds,
            movers,
        }
    }

    /// A prototype with no moving parts.
    pub fn rigid(role: PartRole, graph: SceneGraph) -> Self {
        Self::new(role, graph, &crate::classify::StaticClassifier, &LayoutConstants::default())
    }

    pub fn role(&self) -> PartRole {
        self.role
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Original-size bounds, centred on the origin.
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Bounding-box size with every axis floored to `epsilon`.
    pub fn safe_size(&self, epsilon: f32) -> Vec3 {
        self.bounds.size().max(Vec3::splat(epsilon))
    }

    pub fn movers(&self) -> &[Mover] {
        &self.movers
    }
}

/// Classify every mesh node and rig the moving ones.
fn detect_movers(
    graph: &mut SceneGraph,
    model_bounds: &BoundingBox,
    classifier: &dyn PartClassifier,
    constants: &LayoutConstants,
) -> Vec<Mover> {
    let candidates: Vec<(usize, String, BoundingBox)> = graph
        .traverse()
        .filter_map(|(index, node, world)| {
            node.geometry
                .map(|g| (index, node.name.clone(), g.bounds.transformed(&world)))
        })
        .collect();

    let mut movers: Vec<Mover> = Vec::new();
    for (index, name, bounds) in candidates {
        let rigged = movers.iter().any(|m| match m.target {
            MoverTarget::Node(n) => graph.is_ancestor(n, index),
            MoverTarget::Whole => false,
        });
        if rigged {
            continue;
        }

        let context = PartContext {
            name: &name,
            bounds,
            model_bounds: *model_bounds,
        };
        let motion = classifier.classify(&context);
        match motion {
            Motion::Static => {}
            Motion::Slider { axis, .. } => movers.push(Mover {
                target: MoverTarget::Node(index),
                motion,
                open_offset: bounds.size()[axis.index()] * constants.slider_open_fraction,
            }),
            Motion::Hinge { pivot_side, .. } => {
                match attach_pivot(graph, index, &name, &bounds, pivot_side) {
                    Some(pivot) => movers.push(Mover {
                        target: MoverTarget::Node(pivot),
                        motion,
                        open_offset: constants.hinge_open_angle,
                    }),
                    None => {
                        warn!(name = name.as_str(), "door pivot set-up failed; part stays static")
                    }
                }
            }
        }
    }
    movers
}

/// Insert a pivot on the hinge line and hang the door from it.
fn attach_pivot(
    graph: &mut SceneGraph,
    door: usize,
    name: &str,
    bounds: &BoundingBox,
    side: PivotSide,
) -> Option<usize> {
    let center = bounds.center();
    let hinge_x = match side {
        PivotSide::Left => bounds.min.x,
        PivotSide::Right => bounds.max.x,
    };
    let hinge_world = Vec3::new(hinge_x, center.y, center.z);

    let parent = graph.node(door)?.parent;
    let parent_world = match parent {
        Some(p) => graph.world_matrix(p).ok()?,
        None => Mat4::IDENTITY,
    };
    let hinge_local = parent_world.inverse().transform_point3(hinge_world);
    let pivot_node = SceneNode::new(format!("pivot_{name}"))
        .transformed(Transform::from_translation(hinge_local));

    let pivot = match parent {
        Some(p) => graph.add_child(p, pivot_node).ok()?,
        None => graph.add_root(pivot_node),
    };
    graph.reparent_preserving_world(door, Some(pivot)).ok()?;
    Some(pivot)
}

/// The loaded prototypes, keyed by role.
#[derive(Debug, Clone, Default)]
pub struct PrototypeSet {
    prototypes: IndexMap<PartRole, Prototype>,
}

impl PrototypeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the prototype for its role.
    pub fn insert(&mut self, prototype: Prototype) -> Option<Prototype> {
        self.prototypes.insert(prototype.role(), prototype)
    }

    pub fn with(mut self, prototype: Prototype) -> Self {
        self.insert(prototype);
        self
    }

    pub fn get(&self, role: PartRole) -> Option<&Prototype> {
        self.prototypes.get(&role)
    }

    pub fn contains(&self, role: PartRole) -> bool {
        self.prototypes.contains_key(&role)
    }

    pub fn remove(&mut self, role: PartRole) -> Option<Prototype> {
        self.prototypes.shift_remove(&role)
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }
}
