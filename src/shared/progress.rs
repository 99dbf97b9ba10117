//! Progress feedback for long scans. Draws on stderr so stdout stays a clean
//! data sink; indicatif hides the bar entirely when stderr is not a terminal.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner for unbounded history scans. Callers update the message with
/// scanned/accepted counters and must `finish_and_clear()` when done.
pub fn scan_spinner(label: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(label.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
