//! Commands for the TEA pattern.
//!
//! Commands are outputs from the update function - side effects executed by
//! the runtime, keeping the update function itself synchronous and pure.

/// Output commands from the update function.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Start a catalog fetch (the runtime keeps at most one in flight).
    FetchNodes,
    /// Re-fetch after the retry-policy delay (silent recovery).
    ScheduleRetry,
    /// Fire the host's completion callback; emitted once, after the first
    /// successful load.
    NotifyLoaded,
}
