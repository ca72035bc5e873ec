//! Progress reporting between pipeline phases.
//!
//! ```ignore
//! use sharpdecimate_lowpoly::{LowPolyGenerator, Progress};
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//! let generator = LowPolyGenerator::new(config).with_progress(progress);
//! ```

/// Scale of the phase checkpoints reported by the generator
pub const PROGRESS_TOTAL: usize = 100;

/// A progress callback that receives updates as the pipeline advances.
///
/// The callback receives:
/// - `current`: checkpoint reached
/// - `total`: checkpoint scale ([`PROGRESS_TOTAL`])
/// - `message`: the phase just entered
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

    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Report a checkpoint on the [`PROGRESS_TOTAL`] scale.
    #[inline]
    pub fn checkpoint(&self, current: usize, message: &str) {
        self.report(current.min(PROGRESS_TOTAL), PROGRESS_TOTAL, message);
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
