//! User message surface port.
//!
//! Non-fatal failures (plugin load errors, script call failures surfaced
//! by adapters) are reported here instead of being propagated. The host
//! decides how messages are presented — status line, stderr, log.

/// Port for user-facing messages.
pub trait MessengerPort: Send + Sync {
    /// Informational message.
    fn message(&self, text: &str);

    /// Error message.
    fn error(&self, text: &str);
}
