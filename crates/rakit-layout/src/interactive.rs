//! Interactive sub-parts and their open/closed smoothing.

use std::collections::BTreeMap;

use glam::Quat;
use rakit_core::StableId;
use rakit_scene::Transform;

use crate::classify::Motion;

/// A door or drawer inside a layout instance.
///
/// The part moves between `closed_offset` and `open_offset` along its
/// [`Motion`]; `current_offset` chases the target once per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractivePart {
    pub id: StableId,
    /// Node in the instance graph that carries the motion.
    pub node: usize,
    pub motion: Motion,
    /// Node transform at offset zero.
    pub rest: Transform,
    pub is_open: bool,
    pub closed_offset: f32,
    pub open_offset: f32,
    pub current_offset: f32,
}

impl InteractivePart {
    pub fn new(
        id: StableId,
        node: usize,
        motion: Motion,
        rest: Transform,
        open_offset: f32,
    ) -> Self {
        Self {
            id,
            node,
            motion,
            rest,
            is_open: false,
            closed_offset: 0.0,
            open_offset,
            current_offset: 0.0,
        }
    }

    pub fn target_offset(&self) -> f32 {
        if self.is_open {
            self.open_offset
        } else {
            self.closed_offset
        }
    }

    pub fn is_settled(&self) -> bool {
        self.current_offset == self.target_offset()
    }

    /// Jump straight to the target, without animation.
    pub fn snap(&mut self) {
        self.current_offset = self.target_offset();
    }

    /// Advance one tick toward the target.
    ///
    /// Returns true while the part is still moving.
    pub fn step(&mut self, smoothing_factor: f32, snap_epsilon: f32) -> bool {
        let target = self.target_offset();
        self.current_offset += (target - self.current_offset) * smoothing_factor;
        if (target - self.current_offset).abs() < snap_epsilon {
            self.current_offset = target;
        }
        !self.is_settled()
    }

    /// Node transform for the current offset.
    pub fn pose(&self) -> Transform {
        let mut pose = self.rest;
        match self.motion {
            Motion::Slider { axis, direction } => {
                pose.translation += axis.unit() * direction.sign() * self.current_offset;
            }
            Motion::Hinge { axis, pivot_side } => {
                let angle = pivot_side.sign() * self.current_offset;
                pose.rotation = self.rest.rotation * Quat::from_axis_angle(axis.unit(), angle);
            }
            Motion::Static => {}
        }
        pose
    }
}

/// Open flags keyed by stable id, carried from one instance to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractiveStateMap {
    open: BTreeMap<StableId, bool>,
}

impl InteractiveStateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the state of every part.
    pub fn from_parts<'a>(parts: impl IntoIterator<Item = &'a InteractivePart>) -> Self {
        Self {
            open: parts.into_iter().map(|p| (p.id, p.is_open)).collect(),
        }
    }

    pub fn get(&self, id: &StableId) -> Option<bool> {
        self.open.get(id).copied()
    }

    pub fn is_open(&self, id: &StableId) -> bool {
        self.get(id).unwrap_or(false)
    }

    pub fn set(&mut self, id: StableId, open: bool) {
        self.open.insert(id, open);
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StableId, &bool)> {
        self.open.iter()
    }
}
