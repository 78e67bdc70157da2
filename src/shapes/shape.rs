use std::sync::Arc;

use bitflags::bitflags;

use crate::bodies::Body;
use crate::core::BodyHandle;
use crate::math::Rect;
use crate::shapes::Geometry;

bitflags! {
    /// Collision layers of a shape. Two shapes can only touch when they
    /// share at least one layer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Layers: u32 {
        /// Layer 1
        const LAYER1 = 0x0000_0001;

        /// Layer 2
        const LAYER2 = 0x0000_0002;

        /// Layer 3
        const LAYER3 = 0x0000_0004;

        /// Layer 4
        const LAYER4 = 0x0000_0008;

        /// Every layer
        const ALL = 0xFFFF_FFFF;
    }
}

impl Default for Layers {
    fn default() -> Self {
        Self::ALL
    }
}

/// Category tag carried by a shape, read by the gripping logic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionCategory {
    /// Ordinary solid geometry
    #[default]
    Normal,

    /// Geometry that grippers are allowed to grab
    Grippable,

    /// The gripping part of a robot
    Gripper,
}

/// A piece of collision geometry attached to a body.
///
/// The geometry is shared, so cloning a shape to build a query probe does
/// not copy vertex data.
#[derive(Debug, Clone)]
pub struct Shape {
    geometry: Arc<Geometry>,
    body: BodyHandle,
    elasticity: f32,
    friction: f32,
    category: CollisionCategory,
    layers: Layers,
    sensor: bool,

    /// World bounds as of the last cache refresh
    bounds: Rect,
}

impl Shape {
    /// Creates a shape with default material on the given body
    pub fn new(body: BodyHandle, geometry: Arc<Geometry>) -> Self {
        Self {
            geometry,
            body,
            elasticity: 0.0,
            friction: 0.0,
            category: CollisionCategory::Normal,
            layers: Layers::ALL,
            sensor: false,
            bounds: Rect::default(),
        }
    }

    /// Sets the restitution coefficient
    pub fn with_elasticity(mut self, elasticity: f32) -> Self {
        self.elasticity = elasticity;
        self
    }

    /// Sets the friction coefficient
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Sets the collision category
    pub fn with_category(mut self, category: CollisionCategory) -> Self {
        self.category = category;
        self
    }

    /// Sets the collision layers
    pub fn with_layers(mut self, layers: Layers) -> Self {
        self.layers = layers;
        self
    }

    /// Marks the shape as a sensor, which overlap queries ignore
    pub fn with_sensor(mut self, sensor: bool) -> Self {
        self.sensor = sensor;
        self
    }

    /// Returns a copy of this shape usable as an unregistered query probe
    pub fn probe(&self) -> Self {
        self.clone()
    }

    #[inline]
    pub fn get_geometry(&self) -> &Arc<Geometry> {
        &self.geometry
    }

    #[inline]
    pub fn get_body(&self) -> BodyHandle {
        self.body
    }

    #[inline]
    pub fn get_elasticity(&self) -> f32 {
        self.elasticity
    }

    #[inline]
    pub fn get_friction(&self) -> f32 {
        self.friction
    }

    #[inline]
    pub fn get_category(&self) -> CollisionCategory {
        self.category
    }

    #[inline]
    pub fn get_layers(&self) -> Layers {
        self.layers
    }

    #[inline]
    pub fn is_sensor(&self) -> bool {
        self.sensor
    }

    /// Returns the cached world bounds
    #[inline]
    pub fn get_bounds(&self) -> Rect {
        self.bounds
    }

    /// Geometry placed at the body's current pose
    pub fn world_geometry(&self, body: &Body) -> Geometry {
        self.geometry.transformed(body.get_rotation(), body.get_position())
    }

    /// Recomputes and stores the world bounds for the body's current pose
    pub(crate) fn cache_bounds(&mut self, body: &Body) -> Rect {
        self.bounds = self.world_geometry(body).bounds();
        self.bounds
    }

    /// Returns true when the two shapes may interact at all
    #[inline]
    pub fn shares_layers(&self, other: &Self) -> bool {
        self.layers.intersects(other.layers)
    }
}
