//! Part classification: which meshes of a prototype move, and how.
//!
//! Detection is fuzzy by nature, so it sits behind [`PartClassifier`]. The
//! default [`HeuristicClassifier`] looks at names and bounding-box proportions;
//! [`NamedClassifier`] takes authoritative per-asset metadata instead.

use glam::Vec3;
use indexmap::IndexMap;
use rakit_scene::BoundingBox;
use tracing::debug;

/// A principal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(&self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Sense of travel along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    pub fn sign(&self) -> f32 {
        match self {
            Direction::Positive => 1.0,
            Direction::Negative => -1.0,
        }
    }
}

/// Which vertical edge of a door carries the hinge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PivotSide {
    Left,
    Right,
}

impl PivotSide {
    /// Rotation sign about +Y that swings the door out toward +Z.
    pub fn sign(&self) -> f32 {
        match self {
            PivotSide::Left => -1.0,
            PivotSide::Right => 1.0,
        }
    }
}

/// How a part moves between closed and open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    /// Rotates about `axis` through a hinge line on `pivot_side`.
    Hinge { axis: Axis, pivot_side: PivotSide },
    /// Translates along `axis`.
    Slider { axis: Axis, direction: Direction },
    Static,
}

impl Motion {
    pub fn axis(&self) -> Option<Axis> {
        match self {
            Motion::Hinge { axis, .. } | Motion::Slider { axis, .. } => Some(*axis),
            Motion::Static => None,
        }
    }
}

/// What a classifier gets to see about one mesh node.
#[derive(Debug, Clone, Copy)]
pub struct PartContext<'a> {
    /// Node name from the asset.
    pub name: &'a str,
    /// Mesh bounds in prototype space.
    pub bounds: BoundingBox,
    /// Bounds of the whole prototype.
    pub model_bounds: BoundingBox,
}

/// Decides the motion of a mesh node.
pub trait PartClassifier {
    fn classify(&self, part: &PartContext<'_>) -> Motion;
}

impl<F> PartClassifier for F
where
    F: Fn(&PartContext<'_>) -> Motion,
{
    fn classify(&self, part: &PartContext<'_>) -> Motion {
        self(part)
    }
}

/// Treats every part as static.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticClassifier;

impl PartClassifier for StaticClassifier {
    fn classify(&self, _part: &PartContext<'_>) -> Motion {
        Motion::Static
    }
}

/// Name and proportion rules for doors and drawers.
///
/// Ratios are relative to the prototype's size.
#[derive(Debug, Clone)]
pub struct HeuristicClassifier {
    /// Name fragments that mark a door regardless of shape.
    pub door_names: Vec<String>,
    /// A hinged part must lie this close to the left or right side.
    pub side_margin: f32,
    /// Door shape: taller than this...
    pub door_min_height: f32,
    /// ...narrower than this...
    pub door_max_width: f32,
    /// ...and thinner than this.
    pub door_max_depth: f32,
    /// Drawer shape: wider than this...
    pub drawer_min_width: f32,
    /// ...lower than this...
    pub drawer_max_height: f32,
    /// ...and shallower than this.
    pub drawer_max_depth: f32,
}

impl Default for HeuristicClassifier {
    fn default() -> Self {
        Self {
            door_names: ["door", "pintu", "panel", "leaf"].iter().map(|s| s.to_string()).collect(),
            side_margin: 0.06,
            door_min_height: 0.45,
            door_max_width: 0.6,
            door_max_depth: 0.35,
            drawer_min_width: 0.3,
            drawer_max_height: 0.6,
            drawer_max_depth: 0.5,
        }
    }
}

impl PartClassifier for HeuristicClassifier {
    fn classify(&self, part: &PartContext<'_>) -> Motion {
        let size = part.bounds.size();
        let model = part.model_bounds.size();
        let name = part.name.to_lowercase();

        let dist_to_min_x = (part.bounds.min.x - part.model_bounds.min.x).abs();
        let dist_to_max_x = (part.bounds.max.x - part.model_bounds.max.x).abs();
        let margin = model.x * self.side_margin;

        let door_name = self.door_names.iter().any(|n| name.contains(n.as_str()));
        let door_shape = size.y > model.y * self.door_min_height
            && size.x < model.x * self.door_max_width
            && size.z < model.z * self.door_max_depth;
        let near_side = dist_to_min_x < margin || dist_to_max_x < margin;

        if (door_name || door_shape) && near_side {
            let pivot_side = if dist_to_min_x < dist_to_max_x {
                PivotSide::Left
            } else {
                PivotSide::Right
            };
            debug!(name = part.name, ?pivot_side, size = ?size, "door candidate");
            return Motion::Hinge {
                axis: Axis::Y,
                pivot_side,
            };
        }

        let drawer_shape = size.x > model.x * self.drawer_min_width
            && size.y < model.y * self.drawer_max_height
            && size.z < model.z * self.drawer_max_depth;
        if drawer_shape {
            let direction = if part.bounds.center().z >= part.model_bounds.center().z {
                Direction::Positive
            } else {
                Direction::Negative
            };
            debug!(name = part.name, ?direction, size = ?size, "drawer candidate");
            return Motion::Slider {
                axis: Axis::Z,
                direction,
            };
        }

        Motion::Static
    }
}

/// Motions looked up by node name, for assets that ship their own metadata.
#[derive(Debug, Clone, Default)]
pub struct NamedClassifier {
    motions: IndexMap<String, Motion>,
}

impl NamedClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, motion: Motion) -> Self {
        self.motions.insert(name.into(), motion);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, motion: Motion) {
        self.motions.insert(name.into(), motion);
    }

    pub fn len(&self) -> usize {
        self.motions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motions.is_empty()
    }
}

impl PartClassifier for NamedClassifier {
    fn classify(&self, part: &PartContext<'_>) -> Motion {
        self.motions.get(part.name).copied().unwrap_or(Motion::Static)
    }
}
