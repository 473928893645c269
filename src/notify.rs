//! User-facing notifications for submission outcomes.
use std::io::Write;

/// Surfaces success and failure messages to the user. Fire and forget.
pub trait NotificationSink: Send + Sync {
    fn notify_success(&self, message: &str);
    fn notify_error(&self, message: &str);
}

/// Writes notifications to stderr so stdout stays free for the reply.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn notify_success(&self, message: &str) {
        // Write errors are ignored: there is nowhere left to report them.
        let _ = writeln!(std::io::stderr(), "✓ {message}");
    }

    fn notify_error(&self, message: &str) {
        let _ = writeln!(std::io::stderr(), "✗ {message}");
    }
}
