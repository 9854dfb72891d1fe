//! Property-based tests for the layout engine.
//!
//! Run with: cargo test -p rakit-layout -- proptest

use glam::Vec3;
use proptest::prelude::*;
use rakit_core::{
    Configuration, Dimensions, LayoutConstants, LayoutCounts, PartRole, ProductVariant,
};
use rakit_layout::{compute_count, rebuild, HeuristicClassifier, Prototype, PrototypeSet};
use rakit_scene::{Geometry, SceneGraph, SceneNode, Transform};

// =============================================================================
// Fixtures
// =============================================================================

/// A box mesh placed away from the origin, as assets usually are.
fn offset_box(size: Vec3, at: Vec3) -> SceneGraph {
    let mut graph = SceneGraph::new();
    graph.add_root(
        SceneNode::new("box")
            .transformed(Transform::from_translation(at))
            .with_geometry(Geometry::cuboid(size)),
    );
    graph
}

/// Cabinet with a door on each side.
fn cabinet() -> SceneGraph {
    let mut graph = SceneGraph::new();
    let placed = Transform::from_translation(Vec3::new(2.0, 0.9, -1.0));
    let root = graph.add_root(SceneNode::new("rak").transformed(placed));
    let body = SceneNode::new("body").with_geometry(Geometry::cuboid(Vec3::new(0.8, 1.8, 0.4)));
    graph.add_child(root, body).unwrap();
    for (name, x) in [("door_l", -0.2), ("door_r", 0.2)] {
        graph
            .add_child(
                root,
                SceneNode::new(name)
                    .transformed(Transform::from_translation(Vec3::new(x, 0.0, 0.19)))
                    .with_geometry(Geometry::cuboid(Vec3::new(0.38, 1.7, 0.02))),
            )
            .unwrap();
    }
    graph
}

fn full_set() -> PrototypeSet {
    let constants = LayoutConstants::default();
    let heuristic = HeuristicClassifier::default();
    let rigid = |role, size: [f32; 3], at: [f32; 3]| {
        Prototype::rigid(role, offset_box(Vec3::from_array(size), Vec3::from_array(at)))
    };
    PrototypeSet::new()
        .with(Prototype::new(PartRole::Module, cabinet(), &heuristic, &constants))
        .with(rigid(PartRole::Base, [0.6, 0.08, 0.5], [0.0, 3.0, 1.0]))
        .with(rigid(PartRole::Drawer, [0.6, 0.18, 0.5], [-1.0, 0.0, 0.0]))
        .with(rigid(PartRole::Divider, [0.6, 0.01, 0.5], [0.0, 0.0, 0.0]))
        .with(rigid(PartRole::Unit, [0.6, 0.4, 0.5], [0.0, -2.0, 0.0]))
        .with(rigid(PartRole::Frame, [0.62, 1.0, 0.52], [0.5, 0.5, 0.5]))
}

// =============================================================================
// Strategies
// =============================================================================

fn arb_variant() -> impl Strategy<Value = ProductVariant> {
    prop_oneof![
        Just(ProductVariant::TiledGrid),
        Just(ProductVariant::StackedComposite),
        Just(ProductVariant::Single),
    ]
}

/// Dimensions including degenerate ones.
fn arb_dimensions() -> impl Strategy<Value = Dimensions> {
    prop::array::uniform3(-0.5f32..3.0).prop_map(|[w, h, d]| Dimensions::new(w, h, d))
}

fn arb_counts() -> impl Strategy<Value = LayoutCounts> {
    (0u32..5, 0u32..4, 0u32..5, 0u32..3, 0u32..5).prop_map(
        |(columns, rows, drawers, units, shelves)| LayoutCounts {
            columns,
            rows,
            drawers,
            units,
            shelves,
        },
    )
}

fn arb_config() -> impl Strategy<Value = Configuration> {
    (arb_dimensions(), arb_counts(), arb_variant())
        .prop_map(|(d, c, v)| Configuration::new(d, c, v))
}

// =============================================================================
// Properties
// =============================================================================

const TOL: f32 = 1e-3;

proptest! {
    #[test]
    fn proptest_rebuild_is_centred(config in arb_config()) {
        let instance = rebuild(&config, &full_set(), None, &LayoutConstants::default());
        let bounds = instance.bounds();

        prop_assert!(!instance.is_empty());
        prop_assert!(bounds.center().x.abs() < TOL, "center.x = {}", bounds.center().x);
        prop_assert!(bounds.center().z.abs() < TOL, "center.z = {}", bounds.center().z);
        prop_assert!(bounds.min.y.abs() < TOL, "min.y = {}", bounds.min.y);
    }

    #[test]
    fn proptest_open_parts_stay_centred(config in arb_config(), next in arb_config()) {
        let set = full_set();
        let constants = LayoutConstants::default();
        let mut instance = rebuild(&config, &set, None, &constants);
        let ids: Vec<_> = instance.parts().iter().map(|p| p.id).collect();
        for id in &ids {
            instance.toggle(id);
        }

        let rebuilt = rebuild(&next, &set, Some(instance), &constants);
        let bounds = rebuilt.bounds();
        prop_assert!(bounds.center().x.abs() < TOL);
        prop_assert!(bounds.center().z.abs() < TOL);
        prop_assert!(bounds.min.y.abs() < TOL);

        // Only parts present in both instances can be open.
        for part in rebuilt.parts() {
            prop_assert_eq!(part.is_open, ids.contains(&part.id));
        }
    }

    #[test]
    fn proptest_clone_count_matches_unit_count(config in arb_config()) {
        let instance = rebuild(&config, &full_set(), None, &LayoutConstants::default());
        let priced = match config.variant {
            ProductVariant::TiledGrid => instance.placed_with_role(PartRole::Module).count(),
            ProductVariant::StackedComposite => {
                instance.placed_with_role(PartRole::Drawer).count()
                    + instance.placed_with_role(PartRole::Unit).count()
            }
            ProductVariant::Single => instance.placed_with_role(PartRole::Module).count(),
        };
        prop_assert_eq!(priced as u32, compute_count(&config));
    }
}
