use std::cell::RefCell;
use std::rc::Rc;

use crate::bodies::Body;
use crate::constraints::Constraint;
use crate::core::{BodyHandle, ConstraintHandle, ShapeHandle};
use crate::math::{Rect, Vector2};
use crate::shapes::Shape;
use crate::Result;

pub use crate::collision::SegmentQueryInfo;

/// Shared handle to a physics space.
///
/// Every model bound to a space holds one of these. Calls are sequential,
/// so a borrow must never be held across a call that can re-enter the
/// space (such as releasing attachments).
pub type SpaceHandle = Rc<RefCell<dyn PhysicsSpace>>;

/// The operations entity models need from a 2D rigid-body space
pub trait PhysicsSpace {
    /// The static reference body that anchors static shapes and friction
    /// joints
    fn ground(&self) -> BodyHandle;

    /// Registers a body
    fn add_body(&mut self, body: Body) -> BodyHandle;

    /// Unregisters a body. Fails while shapes or constraints still use it.
    fn remove_body(&mut self, handle: BodyHandle) -> Result<Body>;

    fn body(&self, handle: BodyHandle) -> Result<&Body>;

    fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body>;

    /// Registers a shape on a dynamic body and indexes it as active
    fn add_shape(&mut self, shape: Shape) -> Result<ShapeHandle>;

    /// Registers a shape that never moves and indexes it as static
    fn add_static_shape(&mut self, shape: Shape) -> Result<ShapeHandle>;

    /// Unregisters an active shape
    fn remove_shape(&mut self, handle: ShapeHandle) -> Result<Shape>;

    /// Unregisters a static shape. The static index keeps a stale entry
    /// until [`PhysicsSpace::reindex_static`] is called.
    fn remove_static_shape(&mut self, handle: ShapeHandle) -> Result<Shape>;

    fn shape(&self, handle: ShapeHandle) -> Result<&Shape>;

    /// Registers a constraint between two registered bodies
    fn add_constraint(&mut self, constraint: Box<dyn Constraint>) -> Result<ConstraintHandle>;

    /// Unregisters a constraint
    fn remove_constraint(&mut self, handle: ConstraintHandle) -> Result<Box<dyn Constraint>>;

    fn constraint(&self, handle: ConstraintHandle) -> Result<&dyn Constraint>;

    /// Recaches one active shape's bounds and refreshes its index entry
    fn reindex_shape(&mut self, handle: ShapeHandle) -> Result<()>;

    /// Recaches every static shape and rebuilds the static index
    fn reindex_static(&mut self);

    /// Counts registered shapes overlapping an unregistered probe shape.
    /// Shapes on the probe's own body are not counted, so static shapes on
    /// the ground body never count each other.
    fn shape_query(&self, probe: &Shape) -> usize;

    /// Counts shapes overlapping a registered shape, excluding itself
    fn shape_query_registered(&self, handle: ShapeHandle) -> Result<usize>;

    /// Intersects a segment with one shape
    fn segment_query(
        &self,
        handle: ShapeHandle,
        start: Vector2,
        end: Vector2,
    ) -> Result<Option<SegmentQueryInfo>>;

    /// Recomputes a shape's cached bounds from its body's pose
    fn cache_bounds(&mut self, handle: ShapeHandle) -> Result<Rect>;

    /// Reads a shape's cached bounds
    fn shape_bounds(&self, handle: ShapeHandle) -> Result<Rect>;
}
