pub mod interval;
pub mod sequence;
pub mod track;
pub mod track_pool;

// re-export for cleaner imports
pub use self::interval::{Feature, Interval};
pub use self::sequence::{Sequence, SequencePool};
pub use self::track::Track;
pub use self::track_pool::TrackPool;
