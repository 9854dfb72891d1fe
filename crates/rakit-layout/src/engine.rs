//! Rebuild, toggle and count: the engine's public operations.

use rakit_core::{Configuration, LayoutConstants, ProductVariant, StableId};
use rakit_scene::Camera;
use tracing::{debug, info, warn};

use crate::instance::LayoutInstance;
use crate::interactive::InteractiveStateMap;
use crate::prototype::PrototypeSet;
use crate::recipe::{self, BuildError};

/// Produce a fresh instance for `config`, consuming the previous one.
///
/// Open/closed flags of the previous instance carry over by stable id; parts
/// that no longer exist are dropped. A missing prototype for the active
/// variant yields an empty instance.
pub fn rebuild(
    config: &Configuration,
    prototypes: &PrototypeSet,
    previous: Option<LayoutInstance>,
    constants: &LayoutConstants,
) -> LayoutInstance {
    let state = previous
        .as_ref()
        .map(LayoutInstance::interactive_state)
        .unwrap_or_default();
    drop(previous);
    rebuild_with_state(config, prototypes, &state, constants)
}

/// [`rebuild`] from an explicit state map rather than a previous instance.
pub fn rebuild_with_state(
    config: &Configuration,
    prototypes: &PrototypeSet,
    state: &InteractiveStateMap,
    constants: &LayoutConstants,
) -> LayoutInstance {
    let config = Configuration {
        dimensions: config.dimensions.clamped(constants.epsilon),
        counts: config.counts.clamped(),
        variant: config.variant,
    };

    let mut instance = match recipe::build(&config, prototypes, constants) {
        Ok(instance) => instance,
        Err(BuildError::MissingPrototype(role)) => {
            info!(variant = ?config.variant, %role, "prototype not loaded; layout is empty");
            return LayoutInstance::empty(config.variant);
        }
        Err(BuildError::Scene(err)) => {
            warn!(variant = ?config.variant, error = %err, "layout failed; layout is empty");
            return LayoutInstance::empty(config.variant);
        }
    };

    let restored = instance.restore_open(state);
    instance.recenter();

    debug!(
        variant = ?config.variant,
        placed = instance.placed().len(),
        interactive = instance.parts().len(),
        restored,
        dropped = state.iter().filter(|(_, open)| **open).count().saturating_sub(restored),
        "layout rebuilt"
    );
    instance
}

/// Flip the open flag of one part. Returns the new state, `None` if absent.
pub fn toggle(instance: &mut LayoutInstance, id: &StableId) -> Option<bool> {
    instance.toggle(id)
}

/// Number of priced units a configuration produces, saturating at `u32::MAX`.
pub fn compute_count(config: &Configuration) -> u32 {
    let counts = config.counts.clamped();
    match config.variant {
        ProductVariant::TiledGrid => counts.columns.saturating_mul(counts.rows),
        ProductVariant::StackedComposite => counts.drawers.saturating_add(counts.units),
        ProductVariant::Single => 1,
    }
}

/// The engine's persistent state: tuning constants and the live instance.
///
/// Configuration and prototypes are passed in on every rebuild.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    constants: LayoutConstants,
    instance: Option<LayoutInstance>,
}

impl LayoutEngine {
    pub fn new(constants: LayoutConstants) -> Self {
        Self {
            constants,
            instance: None,
        }
    }

    pub fn constants(&self) -> &LayoutConstants {
        &self.constants
    }

    /// Replace the constants. Takes effect on the next rebuild.
    pub fn set_constants(&mut self, constants: LayoutConstants) {
        self.constants = constants;
    }

    /// Replace the live instance with one built for `config`.
    pub fn rebuild(
        &mut self,
        config: &Configuration,
        prototypes: &PrototypeSet,
    ) -> &LayoutInstance {
        let previous = self.instance.take();
        let next = rebuild(config, prototypes, previous, &self.constants);
        self.instance.insert(next)
    }

    pub fn toggle(&mut self, id: &StableId) -> Option<bool> {
        self.instance.as_mut().and_then(|instance| instance.toggle(id))
    }

    /// Advance open/close smoothing by one frame. Returns true while anything moves.
    pub fn tick(&mut self) -> bool {
        let (factor, snap) = (self.constants.smoothing_factor, self.constants.snap_epsilon);
        self.instance.as_mut().is_some_and(|instance| instance.tick(factor, snap))
    }

    pub fn instance(&self) -> Option<&LayoutInstance> {
        self.instance.as_ref()
    }

    /// Open flags of the live instance.
    pub fn state(&self) -> InteractiveStateMap {
        self.instance
            .as_ref()
            .map(LayoutInstance::interactive_state)
            .unwrap_or_default()
    }

    /// Point `camera` at the live instance.
    pub fn frame(&self, camera: &mut Camera) {
        let bounds = self.instance.as_ref().map(LayoutInstance::bounds).unwrap_or_default();
        camera.fit_to_bounds(&bounds);
    }
}
