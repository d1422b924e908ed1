// ── Progress reporting ──
//
// Long-running operations narrate what they are doing through a
// `ProgressReporter`. Front ends decide how to show it.

/// Receives human-readable progress from a long-running operation.
pub trait ProgressReporter: Send + Sync {
    /// A step has started.
    fn report(&self, message: &str);

    /// The operation gave up; `message` says why.
    fn notify_error(&self, message: &str);
}

/// Discards all progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _message: &str) {}

    fn notify_error(&self, _message: &str) {}
}
