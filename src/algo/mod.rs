//! Visibility algorithms over the subdivision.
//!
//! A typical run, leaves first:
//!
//! - [`seed_partitions`]: insert a precomputed horizontal/vertical partition
//! - [`compute_visibility`]: insert occlusion chords seen from a guard and
//!   label every face with its visibility level
//! - [`merge_faces`]: fuse faces up to a level into reported regions

pub mod merge;
pub mod partition;
pub mod progress;
pub mod visibility;

pub use merge::merge_faces;
pub use partition::seed_partitions;
pub use progress::Progress;
pub use visibility::{
    assign_levels, compute_visibility, compute_visibility_with_options,
    compute_visibility_with_progress, crossing_level, VisibilityOptions,
};
