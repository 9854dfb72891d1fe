//! Structural recipes: how each product variant turns prototypes into clones.

use glam::Vec3;
use rakit_core::{Configuration, LayoutConstants, LayoutCounts, PartRole, ProductVariant, StableId};
use rakit_scene::{Geometry, SceneError, SceneNode, Transform};

use crate::classify::Motion;
use crate::instance::{LayoutInstance, PlacedPart};
use crate::interactive::InteractivePart;
use crate::prototype::{MoverTarget, Prototype, PrototypeSet};

/// Why a recipe could not produce an assembly.
#[derive(Debug)]
pub(crate) enum BuildError {
    /// The active variant needs a prototype that has not loaded.
    MissingPrototype(PartRole),
    Scene(SceneError),
}

impl From<SceneError> for BuildError {
    fn from(err: SceneError) -> Self {
        BuildError::Scene(err)
    }
}

/// Accumulates clones into a fresh instance.
struct Assembler {
    instance: LayoutInstance,
}

impl Assembler {
    fn new(variant: ProductVariant) -> Self {
        Self {
            instance: LayoutInstance::empty(variant),
        }
    }

    /// Clone `prototype` under a wrapper node carrying the placement.
    ///
    /// Every mover of the prototype becomes an interactive part of the clone,
    /// numbered in mover order.
    fn place(
        &mut self,
        prototype: &Prototype,
        index: u32,
        translation: Vec3,
        scale: Vec3,
    ) -> Result<usize, SceneError> {
        let role = prototype.role();
        let root = self.instance.root();
        let graph = self.instance.graph_mut();

        let wrapper = graph.add_child(
            root,
            SceneNode::new(format!("{role}_{index}"))
                .transformed(Transform::from_translation_scale(translation, scale)),
        )?;
        let mapping = graph.instantiate(prototype.graph(), Some(wrapper))?;

        let mut parts = Vec::with_capacity(prototype.movers().len());
        for (k, mover) in prototype.movers().iter().enumerate() {
            let (node, open_offset) = match mover.target {
                // The wrapper lives in assembly space, so slide distances
                // follow the clone's scale.
                MoverTarget::Whole => {
                    let along = match mover.motion {
                        Motion::Slider { axis, .. } => scale[axis.index()],
                        _ => 1.0,
                    };
                    (wrapper, mover.open_offset * along)
                }
                MoverTarget::Node(n) => {
                    let node =
                        mapping.get(n).copied().ok_or(SceneError::NodeNotFound { index: n })?;
                    (node, mover.open_offset)
                }
            };
            let rest = graph
                .node(node)
                .map(|n| n.transform)
                .ok_or(SceneError::NodeNotFound { index: node })?;
            let id = StableId::new(role, index).with_part(k as u16);
            parts.push(InteractivePart::new(id, node, mover.motion, rest, open_offset));
        }

        for part in parts {
            self.instance.push_part(part);
        }
        self.instance.push_placed(PlacedPart {
            role,
            index,
            node: wrapper,
            scale,
        });
        Ok(wrapper)
    }

    /// Add a static board directly under the assembly root.
    fn board(
        &mut self,
        role: PartRole,
        index: u32,
        center: Vec3,
        size: Vec3,
    ) -> Result<usize, SceneError> {
        let root = self.instance.root();
        let node = self.instance.graph_mut().add_child(
            root,
            SceneNode::new(format!("{role}_{index}"))
                .transformed(Transform::from_translation(center))
                .with_geometry(Geometry::cuboid(size)),
        )?;
        self.instance.push_placed(PlacedPart {
            role,
            index,
            node,
            scale: Vec3::ONE,
        });
        Ok(node)
    }

    fn finish(self) -> LayoutInstance {
        self.instance
    }
}

fn require(prototypes: &PrototypeSet, role: PartRole) -> Result<&Prototype, BuildError> {
    prototypes.get(role).ok_or(BuildError::MissingPrototype(role))
}

/// Per-axis scale that maps a prototype onto `target`.
fn fit_scale(prototype: &Prototype, target: Vec3, epsilon: f32) -> Vec3 {
    target / prototype.safe_size(epsilon)
}

/// Build the uncentred assembly for a configuration.
///
/// Dimensions and counts are expected to be clamped already.
pub(crate) fn build(
    config: &Configuration,
    prototypes: &PrototypeSet,
    constants: &LayoutConstants,
) -> Result<LayoutInstance, BuildError> {
    let dims = Vec3::from_array(config.dimensions.to_array());
    let mut asm = Assembler::new(config.variant);
    let counts = &config.counts;
    match config.variant {
        ProductVariant::TiledGrid => tile_grid(&mut asm, prototypes, dims, counts, constants)?,
        ProductVariant::StackedComposite => stack(&mut asm, prototypes, dims, counts, constants)?,
        ProductVariant::Single => single(&mut asm, prototypes, dims, counts, constants)?,
    }
    Ok(asm.finish())
}

fn tile_grid(
    asm: &mut Assembler,
    prototypes: &PrototypeSet,
    dims: Vec3,
    counts: &LayoutCounts,
    constants: &LayoutConstants,
) -> Result<(), BuildError> {
    let module = require(prototypes, PartRole::Module)?;
    let scale = fit_scale(module, dims, constants.epsilon);

    let column_overlap = if counts.columns > 1 { constants.column_overlap } else { 0.0 };
    let row_overlap = if counts.rows > 1 { constants.row_overlap } else { 0.0 };
    let step = Vec3::new(dims.x - column_overlap, dims.y - row_overlap, 0.0);

    for r in 0..counts.rows {
        for c in 0..counts.columns {
            let translation = Vec3::new(c as f32 * step.x, r as f32 * step.y, 0.0);
            asm.place(module, r * counts.columns + c, translation, scale)?;
        }
    }
    Ok(())
}

fn stack(
    asm: &mut Assembler,
    prototypes: &PrototypeSet,
    dims: Vec3,
    counts: &LayoutCounts,
    constants: &LayoutConstants,
) -> Result<(), BuildError> {
    let base = require(prototypes, PartRole::Base)?;
    let drawer = if counts.drawers > 0 {
        Some(require(prototypes, PartRole::Drawer)?)
    } else {
        None
    };
    let unit = if counts.units > 0 {
        Some(require(prototypes, PartRole::Unit)?)
    } else {
        None
    };
    let divider = prototypes.get(PartRole::Divider);
    let eps = constants.epsilon;

    // x/z follow the configured footprint, y keeps the native height.
    let footprint = |p: &Prototype| {
        let size = p.safe_size(eps);
        Vec3::new(dims.x / size.x, 1.0, dims.z / size.z)
    };

    let base_bounds = base.bounds();
    asm.place(base, 0, Vec3::new(0.0, -base_bounds.min.y, 0.0), footprint(base))?;
    let mut offset = base_bounds.size().y;

    let push = |asm: &mut Assembler,
                part: &Prototype,
                index: u32,
                offset: &mut f32|
     -> Result<(), SceneError> {
        let bounds = part.bounds();
        asm.place(part, index, Vec3::new(0.0, *offset - bounds.min.y, 0.0), footprint(part))?;
        *offset += bounds.size().y + constants.stack_gap;
        Ok(())
    };

    if let Some(drawer) = drawer {
        for i in 0..counts.drawers {
            push(asm, drawer, i, &mut offset)?;
            if let Some(divider) = divider.filter(|_| i + 1 < counts.drawers) {
                push(asm, divider, i, &mut offset)?;
            }
        }
    }
    if let Some(unit) = unit {
        for i in 0..counts.units {
            push(asm, unit, i, &mut offset)?;
        }
    }

    if let Some(frame) = prototypes.get(PartRole::Frame) {
        let bounds = frame.bounds();
        let height = offset.max(constants.frame_min_height);
        let sy = height / frame.safe_size(eps).y;
        let mut scale = footprint(frame);
        scale.y = sy;
        asm.place(frame, 0, Vec3::new(0.0, -bounds.min.y * sy, 0.0), scale)?;
    }
    Ok(())
}

fn single(
    asm: &mut Assembler,
    prototypes: &PrototypeSet,
    dims: Vec3,
    counts: &LayoutCounts,
    constants: &LayoutConstants,
) -> Result<(), BuildError> {
    let module = require(prototypes, PartRole::Module)?;
    asm.place(module, 0, Vec3::ZERO, fit_scale(module, dims, constants.epsilon))?;

    for (i, (center, size)) in shelf_boards(dims, counts.shelves, constants).enumerate() {
        asm.board(PartRole::Shelf, i as u32, center, size)?;
    }
    Ok(())
}

/// Evenly spaced shelf boards inside a module of size `dims` centred on the
/// origin, as (centre, size) pairs from the bottom up.
pub(crate) fn shelf_boards(
    dims: Vec3,
    count: u32,
    constants: &LayoutConstants,
) -> impl Iterator<Item = (Vec3, Vec3)> {
    let t = constants.shelf_thickness;
    let slots = count as f32 + 1.0;
    let space = (dims.y - t * slots) / slots;
    let size = Vec3::new(dims.x - t, t, dims.z - t / 2.0).max(Vec3::splat(constants.epsilon));
    let bottom = -dims.y / 2.0;

    (0..count).map(move |i| {
        let y = bottom + t / 2.0 + (i as f32 + 1.0) * (space + t) - t / 2.0;
        (Vec3::new(0.0, y, 0.0), size)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shelf_boards_evenly_spaced() {
        let constants = LayoutConstants::default();
        let boards: Vec<_> = shelf_boards(Vec3::new(1.0, 1.5, 0.5), 2, &constants).collect();
        assert_eq!(boards.len(), 2);

        // Spacing is (1.5 - 3 * 0.05) / 3 = 0.45 plus one board.
        let gap = boards[1].0.y - boards[0].0.y;
        assert!((gap - 0.5).abs() < 1e-5);
        assert!((boards[0].0.y + 0.25).abs() < 1e-5);
        assert!((boards[0].1 - Vec3::new(0.95, 0.05, 0.475)).length() < 1e-5);
    }

    #[test]
    fn test_no_shelves() {
        assert_eq!(shelf_boards(Vec3::ONE, 0, &LayoutConstants::default()).count(), 0);
    }

    #[test]
    fn test_shelf_boards_huge_count() {
        let constants = LayoutConstants::default();
        let mut boards = shelf_boards(Vec3::new(1.0, 1.5, 0.5), u32::MAX, &constants);
        let (first, size) = boards.next().unwrap();
        assert!(first.y.is_finite());
        assert!((size.y - constants.shelf_thickness).abs() < 1e-6);
        assert_eq!(boards.size_hint().0, u32::MAX as usize - 1);
    }

    #[test]
    fn test_missing_module_is_reported() {
        let config = Configuration::default().with_variant(ProductVariant::TiledGrid);
        let err = build(&config, &PrototypeSet::new(), &LayoutConstants::default()).unwrap_err();
        assert!(matches!(err, BuildError::MissingPrototype(PartRole::Module)));
    }
}
