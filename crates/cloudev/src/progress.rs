//! Terminal progress for long-running operations.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use cloudev_core::ProgressReporter;

/// Spinner on stderr that shows the latest step.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// A visible spinner, or a hidden one when `quiet`.
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        };
        Self { bar }
    }

    /// Leave `message` on screen and stop the spinner.
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_owned());
    }

    /// Remove the spinner without a trailing message.
    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressReporter for Spinner {
    fn report(&self, message: &str) {
        self.bar.set_message(message.to_owned());
    }

    fn notify_error(&self, message: &str) {
        self.bar.abandon_with_message(message.to_owned());
    }
}
