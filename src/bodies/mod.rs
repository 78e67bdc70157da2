mod body;
mod body_type;
mod mass;

pub use self::body::{Body, BodyPose};
pub use self::body_type::BodyType;
pub use self::mass::{moment_for_circle, moment_for_polygon, polygon_signed_area};
