use std::collections::BTreeSet;

use log::{debug, trace};

use crate::bodies::Body;
use crate::collision::{segment_query, NarrowPhase, SegmentQueryInfo, SpatialHashing};
use crate::constraints::Constraint;
use crate::core::{
    BodyHandle, BodyStorage, ConstraintHandle, PhysicsSpace, ShapeHandle, SpaceConfig, Storage,
};
use crate::error::PhysicsError;
use crate::math::{Rect, Vector2};
use crate::shapes::Shape;
use crate::Result;

/// A 2D rigid-body space: bodies, the shapes attached to them, the
/// constraints between them, and spatial indexes for queries.
#[derive(Debug)]
pub struct Space {
    /// All bodies, the ground included
    bodies: BodyStorage,

    /// All registered shapes, active and static
    shapes: Storage<ShapeHandle, Shape>,

    /// All constraints
    constraints: Storage<ConstraintHandle, Box<dyn Constraint>>,

    /// Broad-phase index of shapes on dynamic bodies
    active_index: SpatialHashing,

    /// Broad-phase index of shapes that never move
    static_index: SpatialHashing,

    /// Which registered shapes are static
    static_shapes: BTreeSet<ShapeHandle>,

    /// The static reference body
    ground: BodyHandle,

    /// Configuration for the space
    config: SpaceConfig,

    /// The total elapsed simulation time
    time: f32,
}

impl Default for Space {
    fn default() -> Self {
        Self::new()
    }
}

impl Space {
    /// Creates a new space with default settings
    pub fn new() -> Self {
        Self::with_config(SpaceConfig::default())
    }

    /// Creates a new space with the given configuration
    pub fn with_config(config: SpaceConfig) -> Self {
        let mut bodies = BodyStorage::new();
        let ground = bodies.add(Body::new_static());
        Self {
            bodies,
            shapes: Storage::new(),
            constraints: Storage::new(),
            active_index: SpatialHashing::new(config.cell_size),
            static_index: SpatialHashing::new(config.cell_size),
            static_shapes: BTreeSet::new(),
            ground,
            config,
            time: 0.0,
        }
    }

    /// Returns a reference to the space configuration
    pub fn get_config(&self) -> &SpaceConfig {
        &self.config
    }

    /// Returns the current simulation time
    pub fn get_time(&self) -> f32 {
        self.time
    }

    /// Number of bodies, the ground included
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Number of registered shapes
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Number of static shapes
    pub fn static_shape_count(&self) -> usize {
        self.static_shapes.len()
    }

    /// Number of constraints
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Returns true if the handle names a registered static shape
    pub fn is_static_shape(&self, handle: ShapeHandle) -> bool {
        self.static_shapes.contains(&handle)
    }

    /// Bounds a shape is currently indexed under, if any
    pub fn indexed_bounds(&self, handle: ShapeHandle) -> Option<Rect> {
        self.active_index
            .get_bounds(handle)
            .or_else(|| self.static_index.get_bounds(handle))
    }

    /// Shapes attached to a body
    pub fn shapes_on_body(&self, body: BodyHandle) -> Vec<ShapeHandle> {
        self.shapes
            .iter()
            .filter(|(_, shape)| shape.get_body() == body)
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Constraints involving a body
    pub fn constraints_on_body(&self, body: BodyHandle) -> Vec<ConstraintHandle> {
        self.constraints
            .iter()
            .filter(|(_, constraint)| constraint.involves_body(body))
            .map(|(handle, _)| handle)
            .collect()
    }

    /// Advances the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) -> Result<()> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(PhysicsError::InvalidParameter(format!(
                "Time step must be positive and finite, got {}",
                dt
            )));
        }

        for (_, body) in self.bodies.iter_mut() {
            body.integrate_velocity(dt);
        }

        let bias_coef = self.config.bias_coef(dt);
        for (_, constraint) in self.constraints.iter_mut() {
            constraint.prepare(dt, bias_coef, &self.bodies)?;
        }
        for _ in 0..self.config.iterations {
            for (_, constraint) in self.constraints.iter_mut() {
                constraint.solve_velocity(&mut self.bodies)?;
            }
        }

        for (handle, body) in self.bodies.iter_mut() {
            if !(body.get_velocity().is_finite() && body.get_angular_velocity().is_finite()) {
                return Err(PhysicsError::InternalError(format!(
                    "Solver produced a non-finite velocity for body {:?}",
                    handle
                )));
            }
            body.integrate_position(dt);
        }

        for (handle, shape) in self.shapes.iter_mut() {
            if self.static_shapes.contains(&handle) {
                continue;
            }
            let bounds = shape.cache_bounds(self.bodies.get(shape.get_body())?);
            self.active_index.insert(handle, bounds);
        }

        self.time += dt;
        trace!("Space stepped by {} to t = {}", dt, self.time);
        Ok(())
    }

    /// Advances the simulation by the configured time step
    pub fn tick(&mut self) -> Result<()> {
        self.step(self.config.time_step)
    }

    fn count_overlaps(&self, probe: &Shape, exclude: Option<ShapeHandle>) -> usize {
        let Ok(probe_body) = self.bodies.get(probe.get_body()) else {
            return 0;
        };
        let probe_geometry = probe.world_geometry(probe_body);
        let bounds = probe_geometry.bounds();

        let candidates: BTreeSet<ShapeHandle> = self
            .active_index
            .query(&bounds)
            .into_iter()
            .chain(self.static_index.query(&bounds))
            .collect();

        candidates
            .into_iter()
            .filter(|handle| Some(*handle) != exclude)
            .filter_map(|handle| self.shapes.get(handle).ok())
            .filter(|shape| !shape.is_sensor() && shape.shares_layers(probe))
            .filter(|shape| shape.get_body() != probe.get_body())
            .filter(|shape| {
                self.bodies.get(shape.get_body()).map_or(false, |body| {
                    NarrowPhase::overlaps(
                        &probe_geometry,
                        &shape.world_geometry(body),
                        self.config.collision_slop,
                    )
                })
            })
            .count()
    }
}

impl PhysicsSpace for Space {
    fn ground(&self) -> BodyHandle {
        self.ground
    }

    fn add_body(&mut self, body: Body) -> BodyHandle {
        let handle = self.bodies.add(body);
        debug!("Added body {:?}", handle);
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) -> Result<Body> {
        if handle == self.ground {
            return Err(PhysicsError::InvalidParameter(
                "The ground body cannot be removed".to_string(),
            ));
        }
        if !self.bodies.contains(handle) {
            return Err(PhysicsError::ResourceNotFound(format!(
                "Body with handle {:?} not found",
                handle
            )));
        }
        let shapes = self.shapes_on_body(handle);
        let constraints = self.constraints_on_body(handle);
        if !shapes.is_empty() || !constraints.is_empty() {
            return Err(PhysicsError::InvalidParameter(format!(
                "Body {:?} still has {} shape(s) and {} constraint(s) attached",
                handle,
                shapes.len(),
                constraints.len()
            )));
        }

        let body = self.bodies.remove(handle)?;
        debug!("Removed body {:?}", handle);
        Ok(body)
    }

    fn body(&self, handle: BodyHandle) -> Result<&Body> {
        self.bodies.get(handle)
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body> {
        self.bodies.get_mut(handle)
    }

    fn add_shape(&mut self, mut shape: Shape) -> Result<ShapeHandle> {
        let body = self.bodies.get(shape.get_body())?;
        if body.is_static() {
            return Err(PhysicsError::InvalidParameter(
                "Shapes on static bodies must be added as static shapes".to_string(),
            ));
        }

        let bounds = shape.cache_bounds(body);
        let handle = self.shapes.add(shape);
        self.active_index.insert(handle, bounds);
        debug!("Added shape {:?}", handle);
        Ok(handle)
    }

    fn add_static_shape(&mut self, mut shape: Shape) -> Result<ShapeHandle> {
        let body = self.bodies.get(shape.get_body())?;
        if !body.is_static() {
            return Err(PhysicsError::InvalidParameter(
                "Static shapes must be attached to a static body".to_string(),
            ));
        }

        let bounds = shape.cache_bounds(body);
        let handle = self.shapes.add(shape);
        self.static_shapes.insert(handle);
        self.static_index.insert(handle, bounds);
        debug!("Added static shape {:?}", handle);
        Ok(handle)
    }

    fn remove_shape(&mut self, handle: ShapeHandle) -> Result<Shape> {
        if self.static_shapes.contains(&handle) {
            return Err(PhysicsError::InvalidParameter(format!(
                "Shape {:?} is static and must be removed as such",
                handle
            )));
        }

        let shape = self.shapes.remove(handle)?;
        self.active_index.remove(handle);
        debug!("Removed shape {:?}", handle);
        Ok(shape)
    }

    fn remove_static_shape(&mut self, handle: ShapeHandle) -> Result<Shape> {
        if !self.static_shapes.contains(&handle) {
            return Err(PhysicsError::ResourceNotFound(format!(
                "Static shape with handle {:?} not found",
                handle
            )));
        }

        let shape = self.shapes.remove(handle)?;
        self.static_shapes.remove(&handle);
        debug!("Removed static shape {:?}", handle);
        Ok(shape)
    }

    fn shape(&self, handle: ShapeHandle) -> Result<&Shape> {
        self.shapes.get(handle)
    }

    fn add_constraint(&mut self, constraint: Box<dyn Constraint>) -> Result<ConstraintHandle> {
        for body in constraint.get_bodies() {
            self.bodies.get(*body)?;
        }

        let kind = constraint.constraint_type();
        let handle = self.constraints.add(constraint);
        debug!("Added {} {:?}", kind, handle);
        Ok(handle)
    }

    fn remove_constraint(&mut self, handle: ConstraintHandle) -> Result<Box<dyn Constraint>> {
        let constraint = self.constraints.remove(handle)?;
        debug!("Removed {} {:?}", constraint.constraint_type(), handle);
        Ok(constraint)
    }

    fn constraint(&self, handle: ConstraintHandle) -> Result<&dyn Constraint> {
        self.constraints.get(handle).map(|c| c.as_ref())
    }

    fn reindex_shape(&mut self, handle: ShapeHandle) -> Result<()> {
        let bounds = self.cache_bounds(handle)?;
        if self.static_shapes.contains(&handle) {
            self.static_index.insert(handle, bounds);
        } else {
            self.active_index.insert(handle, bounds);
        }
        trace!("Reindexed shape {:?}", handle);
        Ok(())
    }

    fn reindex_static(&mut self) {
        self.static_index.clear();
        for handle in self.static_shapes.iter().copied() {
            let Ok(shape) = self.shapes.get_mut(handle) else {
                continue;
            };
            let Ok(body) = self.bodies.get(shape.get_body()) else {
                continue;
            };
            let bounds = shape.cache_bounds(body);
            self.static_index.insert(handle, bounds);
        }
        debug!("Reindexed {} static shape(s)", self.static_index.len());
    }

    fn shape_query(&self, probe: &Shape) -> usize {
        let count = self.count_overlaps(probe, None);
        trace!("Shape query found {} overlap(s)", count);
        count
    }

    fn shape_query_registered(&self, handle: ShapeHandle) -> Result<usize> {
        let shape = self.shapes.get(handle)?;
        Ok(self.count_overlaps(shape, Some(handle)))
    }

    fn segment_query(
        &self,
        handle: ShapeHandle,
        start: Vector2,
        end: Vector2,
    ) -> Result<Option<SegmentQueryInfo>> {
        let shape = self.shapes.get(handle)?;
        let body = self.bodies.get(shape.get_body())?;
        Ok(segment_query(&shape.world_geometry(body), start, end))
    }

    fn cache_bounds(&mut self, handle: ShapeHandle) -> Result<Rect> {
        let shape = self.shapes.get_mut(handle)?;
        let body = self.bodies.get(shape.get_body())?;
        Ok(shape.cache_bounds(body))
    }

    fn shape_bounds(&self, handle: ShapeHandle) -> Result<Rect> {
        self.shapes.get(handle).map(|shape| shape.get_bounds())
    }
}
