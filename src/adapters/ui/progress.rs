//! Implements ProgressPort with indicatif progress bars.

use crate::ports::{ProgressPort, ProgressStage};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str = "{msg:40} [{bar:30.magenta/cyan}] {pos}/{len} ({elapsed})";

/// Terminal progress bars, one line per stage.
pub struct TerminalProgress {
    multi: MultiProgress,
    style: ProgressStyle,
}

impl TerminalProgress {
    pub fn new() -> Self {
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        Self {
            multi: MultiProgress::new(),
            style,
        }
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressPort for TerminalProgress {
    fn stage(&self, label: &str, total: u64) -> Box<dyn ProgressStage> {
        let bar = self.multi.add(ProgressBar::new(total));
        bar.set_style(self.style.clone());
        bar.set_message(label.to_string());
        Box::new(BarStage { bar })
    }
}

struct BarStage {
    bar: ProgressBar,
}

impl ProgressStage for BarStage {
    fn inc(&self, n: u64) {
        self.bar.inc(n);
    }

    fn finish(&self) {
        self.bar.finish();
    }
}

/// Silent reporter (tests, non-interactive runs).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressPort for NoProgress {
    fn stage(&self, _label: &str, _total: u64) -> Box<dyn ProgressStage> {
        Box::new(NoProgress)
    }
}

impl ProgressStage for NoProgress {
    fn inc(&self, _n: u64) {}

    fn finish(&self) {}
}
