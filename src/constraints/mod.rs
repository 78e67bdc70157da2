mod constraint;
mod gear;
mod pivot;

pub use self::constraint::Constraint;
pub use self::gear::GearJoint;
pub use self::pivot::PivotJoint;
