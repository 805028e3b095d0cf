//! Progress reporting utilities

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while tables load and checks run
#[derive(Debug)]
pub struct CheckProgress {
    spinner: Option<ProgressBar>,
}

impl CheckProgress {
    /// Create a progress reporter; disabled reporters draw nothing
    pub fn new(enabled: bool) -> Self {
        Self {
            spinner: if enabled { Some(create_spinner("Starting...")) } else { None },
        }
    }

    /// Create minimal progress reporter (no progress bars)
    pub fn new_minimal() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.spinner.is_some()
    }

    /// Update the message for the current stage
    pub fn stage(&self, message: &str) {
        if let Some(pb) = &self.spinner {
            pb.set_message(message.to_string());
        }
    }

    /// Clear the spinner so result output is not interleaved with it
    pub fn finish(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }
}

impl Drop for CheckProgress {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
