//! Script call submission port.
//!
//! The interpreter is owned by a single engine thread; this port is the
//! only way the rest of the application may invoke script functions.
//! Implementations serialize submissions through the engine's request
//! queue and correlate each request with its own completion signal.

use thiserror::Error;

/// Outcome of a failed script call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CallError {
    /// No global with the requested name exists at call time.
    #[error("function does not exist: {0}")]
    FunctionNotFound(String),

    /// The interpreter raised an error while running the function body.
    #[error("script error: {0}")]
    Execution(String),

    /// The engine has shut down; no further calls will be served.
    #[error("scripting engine is closed")]
    EngineClosed,
}

/// Port for submitting named script calls.
///
/// Both entry points accept the target function name and its arguments as
/// plain strings; the engine packs them into a single sequence value on
/// the script side.
pub trait ScriptCallerPort: Send + Sync {
    /// Submit a call and block until its completion signal arrives.
    ///
    /// Returns the call's own outcome. Must not be invoked from the engine
    /// thread itself (the engine is the sole consumer of submissions) or
    /// from within an async runtime — use a blocking-capable thread.
    fn call_sync(&self, function: &str, args: Vec<String>) -> Result<(), CallError>;

    /// Submit a call and return as soon as it is accepted.
    ///
    /// `Ok(())` means "enqueued", not "succeeded": the eventual execution
    /// outcome is observed by a detached waiter and discarded.
    fn call_async(&self, function: &str, args: Vec<String>) -> Result<(), CallError>;
}
