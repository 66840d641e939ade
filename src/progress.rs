//! Progress reporting on stderr
//!
//! The command stream owns stdout, so everything here draws or logs on
//! stderr: an `indicatif` bar with an ETA when the caller supplied a
//! total-revision hint and stderr is a real terminal, plain log lines
//! otherwise.

use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Stderr progress reporter for the extraction phase.
pub struct Progress {
    bar: Option<ProgressBar>,
    started: Instant,
}

impl Progress {
    /// `total_hint` is the expected total number of revisions (including
    /// ignored ones); without it, or without a terminal on stderr, no bar
    /// is drawn.
    pub fn new(total_hint: Option<u64>) -> Self {
        let bar = match total_hint {
            Some(total) if console::Term::stderr().is_term() => {
                let bar = ProgressBar::new(total);
                bar.set_style(
                    ProgressStyle::with_template(
                        "{bar:40} {pos}/{len} revisions ({eta} left) {msg}",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                Some(bar)
            }
            _ => None,
        };
        Self {
            bar,
            started: Instant::now(),
        }
    }

    /// A reporter that never draws; used by library callers and tests.
    pub fn disabled() -> Self {
        Self {
            bar: None,
            started: Instant::now(),
        }
    }

    /// A new page's title was observed.
    pub fn on_page(&self, title: &str) {
        match &self.bar {
            Some(bar) => bar.set_message(title.to_string()),
            None => log::debug!("processing page '{}'", title),
        }
    }

    /// `total` revisions (read + ignored) have been consumed so far.
    pub fn on_revisions(&self, total: u64) {
        if let Some(bar) = &self.bar {
            bar.set_position(total);
        }
    }

    /// Extraction finished; clear the bar.
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    /// Wall-clock time since this reporter was created.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
