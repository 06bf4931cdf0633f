//! Progress reporting for long-running passes.
//!
//! Visibility propagation issues one batch of candidate chords per polygon
//! vertex and then labels every face; both phases report through this
//! callback.
//!
//! # Example
//!
//! ```
//! use sightmesh::algo::{compute_visibility_with_progress, Progress, VisibilityOptions};
//! use sightmesh::mesh::build_from_polygon;
//! use nalgebra::Point2;
//!
//! let mut mesh = build_from_polygon(&[
//!     Point2::new(0.0, 0.0),
//!     Point2::new(2.0, 0.0),
//!     Point2::new(2.0, 2.0),
//!     Point2::new(0.0, 2.0),
//! ])
//! .unwrap();
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//! compute_visibility_with_progress(
//!     &mut mesh,
//!     Point2::new(0.0, 0.0),
//!     &VisibilityOptions::default(),
//!     &progress,
//! )
//! .unwrap();
//! ```

/// A progress callback that receives updates during long-running operations.
///
/// The callback receives:
/// - `current`: Current step (0-based)
/// - `total`: Total number of steps
/// - `message`: Description of the current operation
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Report progress within a sub-range.
    ///
    /// Maps `[0, sub_total]` onto `[range_current, range_current + 1]` out of
    /// `range_total` top-level steps, scaled by 1000.
    #[inline]
    pub fn report_sub(
        &self,
        sub_current: usize,
        sub_total: usize,
        range_current: usize,
        range_total: usize,
        message: &str,
    ) {
        if sub_total == 0 || range_total == 0 {
            return;
        }
        let sub_fraction = (sub_current * 1000) / sub_total;
        let effective = range_current * 1000 + sub_fraction;
        (self.callback)(effective, range_total * 1000, message);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_report_sub_scales_into_range() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |current, total, _| {
            sink.lock().unwrap().push((current, total));
        });

        progress.report_sub(1, 2, 1, 2, "half of the second step");
        progress.report_sub(5, 0, 0, 2, "ignored");
        assert_eq!(*seen.lock().unwrap(), vec![(1500, 2000)]);
    }
}
