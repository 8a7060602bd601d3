//! Per-member progress reporting
//!
//! Progress is advisory. Attaching or omitting a sink never changes what a
//! scan produces.

use std::path::Path;

/// Receives per-member progress while a container is scanned
pub trait ProgressSink {
    /// Called once when the sink is attached, `total` is the member count
    fn started(&mut self, _archive: &Path, _total: usize) {}

    /// Called after each member is emitted
    fn advanced(&mut self, member: &str, completed: usize, total: usize);
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn advanced(&mut self, _member: &str, _completed: usize, _total: usize) {}
}
