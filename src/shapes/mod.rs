mod geometry;
mod shape;

pub use self::geometry::{Circle, Geometry, Polygon};
pub(crate) use self::geometry::closest_point_on_segment;
pub use self::shape::{CollisionCategory, Layers, Shape};
