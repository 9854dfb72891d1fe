//! The layout instance: the assembly the engine hands to the renderer.

use glam::Vec3;
use rakit_core::{PartRole, ProductVariant, StableId, CM_PER_UNIT};
use rakit_scene::{BoundingBox, SceneGraph, SceneNode};
use tracing::trace;

use crate::interactive::{InteractivePart, InteractiveStateMap};

/// One clone (or procedural board) placed in the assembly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedPart {
    pub role: PartRole,
    /// Sequence index within the role.
    pub index: u32,
    /// Wrapper node holding the clone's placement.
    pub node: usize,
    /// Per-axis scale applied to the prototype.
    pub scale: Vec3,
}

/// Outer size of an assembly in whole centimetres, for dimension labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurements {
    pub width_cm: u32,
    pub height_cm: u32,
    pub depth_cm: u32,
}

/// An assembly of positioned clones, owned by the engine until replaced.
///
/// After a rebuild the assembly rests on y = 0 and is centred on x = 0,
/// z = 0. Moving doors and drawers afterwards does not re-centre it.
#[derive(Debug, Clone)]
pub struct LayoutInstance {
    variant: ProductVariant,
    graph: SceneGraph,
    root: usize,
    placed: Vec<PlacedPart>,
    parts: Vec<InteractivePart>,
}

impl LayoutInstance {
    /// An instance with an assembly root and nothing in it.
    pub fn empty(variant: ProductVariant) -> Self {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(SceneNode::new("assembly"));
        Self {
            variant,
            graph,
            root,
            placed: Vec::new(),
            parts: Vec::new(),
        }
    }

    pub fn variant(&self) -> ProductVariant {
        self.variant
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub(crate) fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    /// The assembly root node.
    pub fn root(&self) -> usize {
        self.root
    }

    pub fn placed(&self) -> &[PlacedPart] {
        &self.placed
    }

    /// Placed parts of one role, in sequence order.
    pub fn placed_with_role(&self, role: PartRole) -> impl Iterator<Item = &PlacedPart> {
        self.placed.iter().filter(move |p| p.role == role)
    }

    pub(crate) fn push_placed(&mut self, placed: PlacedPart) {
        self.placed.push(placed);
    }

    pub fn parts(&self) -> &[InteractivePart] {
        &self.parts
    }

    pub fn part(&self, id: &StableId) -> Option<&InteractivePart> {
        self.parts.iter().find(|p| p.id == *id)
    }

    pub(crate) fn push_part(&mut self, part: InteractivePart) {
        self.parts.push(part);
    }

    /// True when nothing was placed (no prototype, or still loading).
    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    /// World-space bounds of the assembly; a zero box at the origin when empty.
    pub fn bounds(&self) -> BoundingBox {
        self.graph
            .subtree_bounds(self.root)
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    pub fn center(&self) -> Vec3 {
        self.bounds().center()
    }

    pub fn measurements(&self) -> Measurements {
        let size = self.bounds().size() * CM_PER_UNIT;
        Measurements {
            width_cm: size.x.round().max(0.0) as u32,
            height_cm: size.y.round().max(0.0) as u32,
            depth_cm: size.z.round().max(0.0) as u32,
        }
    }

    /// Open flags of every interactive part.
    pub fn interactive_state(&self) -> InteractiveStateMap {
        InteractiveStateMap::from_parts(&self.parts)
    }

    /// Flip one part. Returns its new state, or `None` if no such part exists.
    pub fn toggle(&mut self, id: &StableId) -> Option<bool> {
        let part = self.parts.iter_mut().find(|p| p.id == *id)?;
        part.is_open = !part.is_open;
        trace!(%id, open = part.is_open, "toggled");
        Some(part.is_open)
    }

    /// Open a part immediately, with no animation. Used when carrying state
    /// over from a previous instance.
    pub(crate) fn restore_open(&mut self, state: &InteractiveStateMap) -> usize {
        let mut restored = 0;
        for i in 0..self.parts.len() {
            if state.is_open(&self.parts[i].id) {
                self.parts[i].is_open = true;
                self.parts[i].snap();
                self.apply_pose(i);
                restored += 1;
            }
        }
        restored
    }

    /// Advance every moving part one tick. Returns true while any still moves.
    pub fn tick(&mut self, smoothing_factor: f32, snap_epsilon: f32) -> bool {
        let mut moving = false;
        for i in 0..self.parts.len() {
            if self.parts[i].is_settled() {
                continue;
            }
            moving |= self.parts[i].step(smoothing_factor, snap_epsilon);
            self.apply_pose(i);
        }
        moving
    }

    fn apply_pose(&mut self, index: usize) {
        let part = &self.parts[index];
        let pose = part.pose();
        if let Some(node) = self.graph.node_mut(part.node) {
            node.transform = pose;
        }
    }

    /// Translate the root so the assembly rests on y = 0, centred on x and z.
    pub(crate) fn recenter(&mut self) {
        let Some(bounds) = self.graph.subtree_bounds(self.root).ok().flatten() else {
            return;
        };
        let center = bounds.center();
        let shift = Vec3::new(-center.x, -bounds.min.y, -center.z);
        if let Some(root) = self.graph.node_mut(self.root) {
            root.transform.translation += shift;
        }
    }

    /// Nearest interactive part hit by a world-space ray.
    pub fn pick(&self, origin: Vec3, direction: Vec3) -> Option<StableId> {
        self.parts
            .iter()
            .filter_map(|part| {
                let bounds = self.graph.subtree_bounds(part.node).ok().flatten()?;
                bounds.ray_hit(origin, direction).map(|t| (t, part.id))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_instance() {
        let instance = LayoutInstance::empty(ProductVariant::TiledGrid);
        assert!(instance.is_empty());
        assert_eq!(instance.bounds(), BoundingBox::ZERO);
        assert_eq!(instance.center(), Vec3::ZERO);
        assert_eq!(
            instance.measurements(),
            Measurements {
                width_cm: 0,
                height_cm: 0,
                depth_cm: 0
            }
        );
        assert!(instance.interactive_state().is_empty());
    }

    #[test]
    fn test_toggle_missing_part_is_noop() {
        let mut instance = LayoutInstance::empty(ProductVariant::Single);
        assert_eq!(instance.toggle(&StableId::new(PartRole::Drawer, 0)), None);
        assert!(!instance.tick(0.16, 0.001));
    }
}
