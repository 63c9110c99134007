//! Per-stage progress bars for the build pipeline.
//!
//! All bars are drawn to stderr and suppressed entirely when `quiet` is set.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

const BAR_TEMPLATE: &str = "{msg:>20} |{bar:40.cyan/blue}| {percent:>3}% | {pos}/{len}";

/// Owns the set of stage bars for one run.
pub struct Progress {
    multi: Option<MultiProgress>,
}

impl Progress {
    pub fn new(quiet: bool) -> Self {
        let multi = (!quiet).then(|| MultiProgress::with_draw_target(ProgressDrawTarget::stderr()));
        Self { multi }
    }

    /// Start a new stage bar with a known total.
    pub fn stage(&self, task: &str, total: u64) -> Stage {
        let bar = self.multi.as_ref().map(|multi| {
            let pb = multi.add(ProgressBar::new(total));
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(BAR_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▓░"),
            );
            pb.set_message(task.to_string());
            pb
        });
        Stage { bar }
    }
}

/// One stage's bar. Every method is a no-op when progress is hidden.
pub struct Stage {
    bar: Option<ProgressBar>,
}

impl Stage {
    pub fn inc(&self) {
        if let Some(pb) = &self.bar {
            pb.inc(1);
        }
    }

    pub fn finish(self) {
        if let Some(pb) = self.bar {
            if let Some(len) = pb.length() {
                pb.set_position(len);
            }
            pb.finish();
        }
    }
}
