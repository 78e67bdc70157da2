//! Owned physics resources of a bound entity.
//!
//! Each guard frees its resource when dropped. The structs below declare
//! their guards in release order, so dropping a binding tears it down
//! attachments first, then joints, then the shape, then the body.

use log::{debug, error};

use crate::core::{BodyHandle, ConstraintHandle, ShapeHandle, SpaceHandle};
use crate::models::gripping::GripperMounts;
use crate::models::Grippable;

/// Owns a body registered in a space
pub(crate) struct BodyGuard {
    space: SpaceHandle,
    handle: BodyHandle,
}

impl BodyGuard {
    pub(crate) fn new(space: SpaceHandle, handle: BodyHandle) -> Self {
        Self { space, handle }
    }

    pub(crate) fn handle(&self) -> BodyHandle {
        self.handle
    }
}

impl Drop for BodyGuard {
    fn drop(&mut self) {
        if let Err(err) = self.space.borrow_mut().remove_body(self.handle) {
            error!("Failed to remove body {:?}: {}", self.handle, err);
        }
    }
}

/// Owns an active shape registered in a space
pub(crate) struct ShapeGuard {
    space: SpaceHandle,
    handle: ShapeHandle,
}

impl ShapeGuard {
    pub(crate) fn new(space: SpaceHandle, handle: ShapeHandle) -> Self {
        Self { space, handle }
    }

    pub(crate) fn handle(&self) -> ShapeHandle {
        self.handle
    }
}

impl Drop for ShapeGuard {
    fn drop(&mut self) {
        if let Err(err) = self.space.borrow_mut().remove_shape(self.handle) {
            error!("Failed to remove shape {:?}: {}", self.handle, err);
        }
    }
}

/// Owns a static shape; the static index is rebuilt once it is gone
pub(crate) struct StaticShapeGuard {
    space: SpaceHandle,
    handle: ShapeHandle,
}

impl StaticShapeGuard {
    pub(crate) fn new(space: SpaceHandle, handle: ShapeHandle) -> Self {
        Self { space, handle }
    }

    pub(crate) fn handle(&self) -> ShapeHandle {
        self.handle
    }
}

impl Drop for StaticShapeGuard {
    fn drop(&mut self) {
        let mut space = self.space.borrow_mut();
        if let Err(err) = space.remove_static_shape(self.handle) {
            error!("Failed to remove static shape {:?}: {}", self.handle, err);
        }
        space.reindex_static();
    }
}

/// Owns a constraint registered in a space
pub(crate) struct ConstraintGuard {
    space: SpaceHandle,
    handle: ConstraintHandle,
}

impl ConstraintGuard {
    pub(crate) fn new(space: SpaceHandle, handle: ConstraintHandle) -> Self {
        Self { space, handle }
    }

    pub(crate) fn handle(&self) -> ConstraintHandle {
        self.handle
    }
}

impl Drop for ConstraintGuard {
    fn drop(&mut self) {
        if let Err(err) = self.space.borrow_mut().remove_constraint(self.handle) {
            error!("Failed to remove constraint {:?}: {}", self.handle, err);
        }
    }
}

/// The two joints pinning a movable body to the ground
pub(crate) struct FrictionJoints {
    pub(crate) linear: ConstraintGuard,
    pub(crate) angular: ConstraintGuard,
}

/// Resources of a movable entity, in release order
pub(crate) struct DynamicBinding {
    pub(crate) grippers: GripperMounts,
    pub(crate) grippable: Option<Grippable>,
    pub(crate) friction: FrictionJoints,
    pub(crate) shape: ShapeGuard,
    pub(crate) body: BodyGuard,
}

/// Resources of an immovable entity
pub(crate) struct StaticBinding {
    pub(crate) shape: StaticShapeGuard,
}

/// Everything a live model owns in the space
pub(crate) enum Binding {
    Dynamic(DynamicBinding),
    Static(StaticBinding),
}

impl Binding {
    pub(crate) fn shape(&self) -> ShapeHandle {
        match self {
            Self::Dynamic(binding) => binding.shape.handle(),
            Self::Static(binding) => binding.shape.handle(),
        }
    }
}

impl Drop for DynamicBinding {
    fn drop(&mut self) {
        debug!(
            "Releasing body {:?} with shape {:?} and {} mounted gripper(s)",
            self.body.handle(),
            self.shape.handle(),
            self.grippers.len()
        );
    }
}
