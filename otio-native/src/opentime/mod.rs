//! Opentime value types
//!
//! Plain `Copy` values; nothing here is reference counted.

pub mod rational_time;
pub mod status;
pub mod time_range;
pub mod time_transform;

pub use rational_time::{IsDropFrameRate, RationalTime, VALID_TIMECODE_RATES};
pub use status::{TimeErrorStatus, TimeOutcome};
pub use time_range::TimeRange;
pub use time_transform::TimeTransform;
