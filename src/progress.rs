use crate::search::ProgressObserver;
use std::io::{self, Write};
use tracing::debug;

const BAR_LEN: usize = 60;

/// Single-line text progress bar redrawn with a carriage return.
pub struct ProgressBar<W: Write> {
    out: W,
    /// Set after the first failed redraw so the failure is logged once
    failed: bool,
}

impl<W: Write> ProgressBar<W> {
    pub fn new(out: W) -> Self {
        Self { out, failed: false }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn report_failure(&mut self, error: io::Error) {
        if !self.failed {
            debug!(%error, "progress bar could not be drawn");
            self.failed = true;
        }
    }
}

pub fn render(count: usize, total: usize) -> String {
    let filled = if total == 0 {
        BAR_LEN
    } else {
        let share = (BAR_LEN * count) as f64 / total as f64;
        (share.round() as usize).min(BAR_LEN)
    };

    format!(
        "[{}{}] iteration {}",
        "=".repeat(filled),
        "-".repeat(BAR_LEN - filled),
        count
    )
}

impl<W: Write> ProgressObserver for ProgressBar<W> {
    fn on_attempt(&mut self, attempt: usize, total: usize) {
        let drawn = write!(self.out, "{}\r", render(attempt, total)).and_then(|_| self.out.flush());
        if let Err(e) = drawn {
            self.report_failure(e);
        }
    }
}
