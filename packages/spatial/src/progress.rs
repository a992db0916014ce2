//! Progress reporting for batch joins.
//!
//! [`ProgressCallback`] decouples the join loop from any rendering backend
//! (progress bars, log lines, or nothing). Implementations live in the
//! crates that pick a rendering strategy.

/// Receives progress updates from a long-running batch operation.
///
/// `Send + Sync` so one reporter can be shared by callers that split a
/// batch across threads.
pub trait ProgressCallback: Send + Sync {
    /// Set the total expected units of work.
    fn set_total(&self, total: u64);

    /// Advance progress by `delta` units.
    fn inc(&self, delta: u64);

    /// Mark progress as complete with a final message.
    fn finish(&self, msg: String);
}

/// Ignores every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn finish(&self, _msg: String) {}
}
