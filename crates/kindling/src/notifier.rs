//! Terminal notifier

use kindling_core::{Notifier, NotifyError, NotifyResult};
use std::io::Write;

/// Prints milestone celebrations to stdout. Silent in JSON mode so the
/// output stays machine readable.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleNotifier {
    quiet: bool,
}

impl ConsoleNotifier {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for ConsoleNotifier {
    fn on_milestone(&self, milestone: u32) -> NotifyResult {
        if self.quiet {
            return Ok(());
        }

        let mut out = std::io::stdout().lock();
        writeln!(out, "🎉 {milestone}-day streak reached!")
            .and_then(|_| {
                writeln!(
                    out,
                    "   Claim your reward with `kindling rewards claim {milestone}`"
                )
            })
            .map_err(|e| NotifyError::Unavailable(e.to_string()))
    }
}
