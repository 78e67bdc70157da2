mod broad_phase;
mod narrow_phase;
mod segment_query;

pub use self::broad_phase::SpatialHashing;
pub use self::narrow_phase::NarrowPhase;
pub use self::segment_query::{segment_query, SegmentQueryInfo};
