//! Progress reporting for coordinate lookups.
//!
//! Geocoding a fresh trips file can take a while because provider
//! requests are spaced out. [`ProgressCallback`] lets front ends show how
//! far along the lookups are without this crate knowing how they render.

/// Receives progress updates from long-running lookups.
///
/// Implementations must be `Send + Sync` so they can be shared through
/// an `Arc` across tasks.
pub trait ProgressCallback: Send + Sync {
    /// Set the total expected units of work.
    fn set_total(&self, total: u64);

    /// Advance progress by `delta` units.
    fn inc(&self, delta: u64);

    /// Update the message displayed alongside the progress indicator.
    fn set_message(&self, msg: String);

    /// Mark progress as complete and remove the progress indicator.
    fn finish_and_clear(&self);
}

/// A [`ProgressCallback`] that ignores all updates.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish_and_clear(&self) {}
}
