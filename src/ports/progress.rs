//! Progress outbound port. Report per-stage progress of long scrapes.

/// Creates progress reporters for pipeline stages.
///
/// Implemented by the terminal UI (progress bars) and by a silent reporter for tests.
pub trait ProgressPort: Send + Sync {
    /// Start a stage with a known number of steps.
    fn stage(&self, label: &str, total: u64) -> Box<dyn ProgressStage>;
}

/// Handle for one running stage.
pub trait ProgressStage: Send + Sync {
    fn inc(&self, n: u64);

    fn finish(&self);
}
