pub mod config;
pub mod storage;
mod interface;
mod space;

pub use self::config::SpaceConfig;
pub use self::interface::{PhysicsSpace, SegmentQueryInfo, SpaceHandle};
pub use self::space::Space;
pub use self::storage::{Handle, Storage};

use crate::bodies::Body;

/// Storage of the bodies in a space
pub type BodyStorage = Storage<BodyHandle, Body>;

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) u32);

        impl Handle for $name {
            fn from_raw(id: u32) -> Self {
                Self(id)
            }

            fn raw(self) -> u32 {
                self.0
            }

            fn kind() -> &'static str {
                $kind
            }
        }
    };
}

define_handle!(
    /// A unique identifier for a body in a physics space
    BodyHandle,
    "Body"
);

define_handle!(
    /// A unique identifier for a shape in a physics space
    ShapeHandle,
    "Shape"
);

define_handle!(
    /// A unique identifier for a constraint in a physics space
    ConstraintHandle,
    "Constraint"
);
