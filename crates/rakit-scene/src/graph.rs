//! Arena scene graph.
//!
//! Nodes live in a flat vector and refer to each other by index. A graph owns
//! all of its nodes; copying a prototype into an assembly is an explicit
//! [`SceneGraph::instantiate`] that appends a remapped copy.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::bounds::BoundingBox;
use crate::error::{Result, SceneError};
use crate::transform::Transform;

/// Opaque handle of a renderable mesh owned by the host renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshId(pub u32);

/// Geometry attached to a node: what to draw and its local-space extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// `None` for procedural geometry the host draws as a box.
    pub mesh: Option<MeshId>,
    /// Bounds in the node's local space.
    pub bounds: BoundingBox,
}

impl Geometry {
    pub fn mesh(mesh: MeshId, bounds: BoundingBox) -> Self {
        Self {
            mesh: Some(mesh),
            bounds,
        }
    }

    /// A box of `size` centred on the node origin.
    pub fn cuboid(size: Vec3) -> Self {
        Self {
            mesh: None,
            bounds: BoundingBox::from_center_size(Vec3::ZERO, size),
        }
    }
}

/// A node in the scene graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    /// Node name (asset names drive part classification).
    pub name: String,
    /// Local transform.
    pub transform: Transform,
    /// Parent node index, `None` for roots.
    pub parent: Option<usize>,
    /// Child node indices.
    pub children: Vec<usize>,
    /// Geometry, if this node draws something.
    pub geometry: Option<Geometry>,
}

impl SceneNode {
    /// Create a new named node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the transform.
    pub fn transformed(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the geometry.
    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }
}

/// A scene graph owning its nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    roots: Vec<usize>,
}

impl SceneGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn node(&self, index: usize) -> Option<&SceneNode> {
        self.nodes.get(index)
    }

    pub fn node_mut(&mut self, index: usize) -> Option<&mut SceneNode> {
        self.nodes.get_mut(index)
    }

    /// First node with the given name.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    /// Add a root node and return its index.
    pub fn add_root(&mut self, mut node: SceneNode) -> usize {
        let index = self.nodes.len();
        node.parent = None;
        node.children.clear();
        self.nodes.push(node);
        self.roots.push(index);
        index
    }

    /// Add a child node to a parent and return its index.
    pub fn add_child(&mut self, parent: usize, mut node: SceneNode) -> Result<usize> {
        self.check(parent)?;
        let index = self.nodes.len();
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent].children.push(index);
        Ok(index)
    }

    /// Copy every node of `source` into this graph.
    ///
    /// The source roots become children of `parent` (or roots when `None`).
    /// Returns the new index of every source node, indexed by its old index.
    pub fn instantiate(
        &mut self,
        source: &SceneGraph,
        parent: Option<usize>,
    ) -> Result<Vec<usize>> {
        if let Some(p) = parent {
            self.check(p)?;
        }

        let base = self.nodes.len();
        let mapping: Vec<usize> = (base..base + source.nodes.len()).collect();

        for node in &source.nodes {
            let mut copy = node.clone();
            copy.parent = node.parent.map(|p| mapping[p]).or(parent);
            copy.children = node.children.iter().map(|&c| mapping[c]).collect();
            self.nodes.push(copy);
        }

        for &root in &source.roots {
            let new_root = mapping[root];
            match parent {
                Some(p) => self.nodes[p].children.push(new_root),
                None => self.roots.push(new_root),
            }
        }

        trace!(copied = source.nodes.len(), ?parent, "instantiated subgraph");
        Ok(mapping)
    }

    /// World transform of a node (product of all ancestor transforms).
    pub fn world_matrix(&self, index: usize) -> Result<Mat4> {
        self.check(index)?;
        let mut matrix = self.nodes[index].transform.to_matrix();
        let mut current = self.nodes[index].parent;
        // Parent links are acyclic by construction; the bound only guards
        // against a corrupted graph.
        let mut remaining = self.nodes.len();
        while let Some(p) = current {
            if remaining == 0 {
                break;
            }
            remaining -= 1;
            matrix = self.nodes[p].transform.to_matrix() * matrix;
            current = self.nodes[p].parent;
        }
        Ok(matrix)
    }

    fn parent_world_matrix(&self, index: usize) -> Result<Mat4> {
        match self.nodes.get(index).and_then(|n| n.parent) {
            Some(p) => self.world_matrix(p),
            None => Ok(Mat4::IDENTITY),
        }
    }

    /// Whether `ancestor` is `node` or lies on its parent chain.
    pub fn is_ancestor(&self, ancestor: usize, node: usize) -> bool {
        let mut current = Some(node);
        let mut remaining = self.nodes.len() + 1;
        while let Some(index) = current {
            if index == ancestor {
                return true;
            }
            if remaining == 0 {
                break;
            }
            remaining -= 1;
            current = self.nodes.get(index).and_then(|n| n.parent);
        }
        false
    }

    /// Move `child` under `new_parent` (or to the roots) without moving it
    /// visually.
    ///
    /// The new local transform is `inverse(parent_world) * child_world`.
    pub fn reparent_preserving_world(
        &mut self,
        child: usize,
        new_parent: Option<usize>,
    ) -> Result<()> {
        self.check(child)?;
        if let Some(p) = new_parent {
            self.check(p)?;
            if self.is_ancestor(child, p) {
                return Err(SceneError::Cycle { child, parent: p });
            }
        }

        let child_world = self.world_matrix(child)?;
        let parent_world = match new_parent {
            Some(p) => self.world_matrix(p)?,
            None => Mat4::IDENTITY,
        };
        if parent_world.determinant().abs() < f32::EPSILON {
            return Err(SceneError::SingularTransform {
                index: new_parent.unwrap_or(child),
            });
        }
        let local = parent_world.inverse() * child_world;

        match self.nodes[child].parent {
            Some(old) => self.nodes[old].children.retain(|&c| c != child),
            None => self.roots.retain(|&r| r != child),
        }
        match new_parent {
            Some(p) => self.nodes[p].children.push(child),
            None => self.roots.push(child),
        }

        let node = &mut self.nodes[child];
        node.parent = new_parent;
        node.transform = Transform::from_matrix(local);
        Ok(())
    }

    /// Shift every root by `offset` in world space.
    pub fn translate_roots(&mut self, offset: Vec3) {
        for &root in &self.roots {
            self.nodes[root].transform.translation += offset;
        }
    }

    /// Iterate over all nodes with their world transforms, depth first.
    pub fn traverse(&self) -> SceneTraverser<'_> {
        let stack = self.roots.iter().rev().map(|&idx| (idx, Mat4::IDENTITY)).collect();
        SceneTraverser { graph: self, stack }
    }

    /// Iterate over a node and its descendants with their world transforms.
    pub fn traverse_from(&self, index: usize) -> Result<SceneTraverser<'_>> {
        self.check(index)?;
        let parent = self.parent_world_matrix(index)?;
        Ok(SceneTraverser {
            graph: self,
            stack: vec![(index, parent)],
        })
    }

    /// World-space bounds of a node's subtree, `None` without geometry.
    pub fn subtree_bounds(&self, index: usize) -> Result<Option<BoundingBox>> {
        Ok(Self::union_geometry(self.traverse_from(index)?))
    }

    /// World-space bounds of the whole graph, `None` without geometry.
    pub fn compute_bounds(&self) -> Option<BoundingBox> {
        Self::union_geometry(self.traverse())
    }

    fn union_geometry(traverser: SceneTraverser<'_>) -> Option<BoundingBox> {
        traverser
            .filter_map(|(_, node, world)| node.geometry.map(|g| g.bounds.transformed(&world)))
            .reduce(|a, b| a.union(&b))
    }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.nodes.len() {
            Ok(())
        } else {
            Err(SceneError::NodeNotFound { index })
        }
    }
}

/// Iterator for traversing the scene graph.
pub struct SceneTraverser<'a> {
    graph: &'a SceneGraph,
    stack: Vec<(usize, Mat4)>,
}

impl<'a> Iterator for SceneTraverser<'a> {
    type Item = (usize, &'a SceneNode, Mat4);

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, parent_transform) = self.stack.pop()?;
        let node = &self.graph.nodes[idx];
        let world_transform = parent_transform * node.transform.to_matrix();

        // Push children in reverse order so they're processed left-to-right
        for &child_idx in node.children.iter().rev() {
            self.stack.push((child_idx, world_transform));
        }

        Some((idx, node, world_transform))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn unit_cube() -> Geometry {
        Geometry::cuboid(Vec3::ONE)
    }

    #[test]
    fn test_empty_graph() {
        let graph = SceneGraph::new();
        assert_eq!(graph.node_count(), 0);
        assert!(graph.compute_bounds().is_none());
    }

    #[test]
    fn test_add_child_unknown_parent() {
        let mut graph = SceneGraph::new();
        let err = graph.add_child(3, SceneNode::new("orphan")).unwrap_err();
        assert_eq!(err, SceneError::NodeNotFound { index: 3 });
    }

    #[test]
    fn test_traversal_order() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(SceneNode::new("root"));
        let child1 = graph.add_child(root, SceneNode::new("child1")).unwrap();
        let _child2 = graph.add_child(root, SceneNode::new("child2")).unwrap();
        let _grandchild = graph.add_child(child1, SceneNode::new("grandchild")).unwrap();

        let names: Vec<&str> = graph.traverse().map(|(_, n, _)| n.name.as_str()).collect();
        assert_eq!(names, vec!["root", "child1", "grandchild", "child2"]);
    }

    #[test]
    fn test_world_matrix_composes() {
        let mut graph = SceneGraph::new();
        let placed = Transform::from_translation_scale(Vec3::new(1.0, 0.0, 0.0), Vec3::splat(2.0));
        let root = graph.add_root(SceneNode::new("root").transformed(placed));
        let raised = Transform::from_translation(Vec3::new(0.0, 1.0, 0.0));
        let child = graph.add_child(root, SceneNode::new("child").transformed(raised)).unwrap();

        let p = graph.world_matrix(child).unwrap().transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_subtree_bounds_transforms_geometry() {
        let mut graph = SceneGraph::new();
        let stretched =
            Transform::from_translation_scale(Vec3::new(5.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let root = graph.add_root(SceneNode::new("root").transformed(stretched));
        graph.add_child(root, SceneNode::new("box").with_geometry(unit_cube())).unwrap();

        let bounds = graph.subtree_bounds(root).unwrap().unwrap();
        assert!((bounds.min - Vec3::new(4.0, -0.5, -0.5)).length() < 1e-5);
        assert!((bounds.max - Vec3::new(6.0, 0.5, 0.5)).length() < 1e-5);
    }

    #[test]
    fn test_instantiate_remaps_indices() {
        let mut proto = SceneGraph::new();
        let p_root = proto.add_root(SceneNode::new("frame"));
        proto.add_child(p_root, SceneNode::new("door").with_geometry(unit_cube())).unwrap();

        let mut graph = SceneGraph::new();
        let assembly = graph.add_root(SceneNode::new("assembly"));
        let first = graph.instantiate(&proto, Some(assembly)).unwrap();
        let second = graph.instantiate(&proto, Some(assembly)).unwrap();

        assert_eq!(first, vec![1, 2]);
        assert_eq!(second, vec![3, 4]);
        assert_eq!(graph.node(assembly).unwrap().children, vec![1, 3]);
        assert_eq!(graph.node(4).unwrap().parent, Some(3));
        assert_eq!(graph.node(3).unwrap().parent, Some(assembly));
        assert_eq!(graph.roots(), &[assembly]);
    }

    #[test]
    fn test_reparent_preserves_world() {
        let mut graph = SceneGraph::new();
        let placed = Transform::from_translation_scale(Vec3::new(0.0, 1.0, 0.0), Vec3::splat(2.0));
        let root = graph.add_root(SceneNode::new("model").transformed(placed));
        let offset = Transform::from_translation(Vec3::new(0.5, 0.0, 0.0));
        let door = graph.add_child(root, SceneNode::new("door").transformed(offset)).unwrap();
        let pivot = graph
            .add_child(
                root,
                SceneNode::new("pivot").transformed(Transform {
                    translation: Vec3::new(0.25, 0.0, 0.0),
                    rotation: Quat::from_rotation_y(0.3),
                    scale: Vec3::ONE,
                }),
            )
            .unwrap();

        let before = graph.world_matrix(door).unwrap();
        graph.reparent_preserving_world(door, Some(pivot)).unwrap();
        let after = graph.world_matrix(door).unwrap();

        assert!(before.abs_diff_eq(after, 1e-5));
        assert_eq!(graph.node(door).unwrap().parent, Some(pivot));
        assert_eq!(graph.node(root).unwrap().children, vec![pivot]);
        assert_eq!(graph.node(pivot).unwrap().children, vec![door]);
    }

    #[test]
    fn test_reparent_rejects_cycle() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(SceneNode::new("root"));
        let child = graph.add_child(root, SceneNode::new("child")).unwrap();

        let err = graph.reparent_preserving_world(root, Some(child)).unwrap_err();
        assert_eq!(err, SceneError::Cycle { child: root, parent: child });
    }

    #[test]
    fn test_reparent_rejects_singular_parent() {
        let mut graph = SceneGraph::new();
        let squashed = Transform::from_translation_scale(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0));
        let flat = graph.add_root(SceneNode::new("flat").transformed(squashed));
        let other = graph.add_root(SceneNode::new("other"));

        let err = graph.reparent_preserving_world(other, Some(flat)).unwrap_err();
        assert_eq!(err, SceneError::SingularTransform { index: flat });
    }

    #[test]
    fn test_translate_roots() {
        let mut graph = SceneGraph::new();
        graph.add_root(SceneNode::new("a").with_geometry(unit_cube()));
        graph.translate_roots(Vec3::new(0.0, 0.5, 0.0));
        let bounds = graph.compute_bounds().unwrap();
        assert!((bounds.min.y - 0.0).abs() < 1e-6);
    }
}
