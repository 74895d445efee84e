//! Call requests flowing to the engine thread.

use tokio::sync::oneshot;

use vellum_application::CallError;

/// One queued instruction to invoke a named script function.
///
/// The reply channel is the request's completion signal: the engine sends
/// exactly one outcome on it per consumed request. Keying the signal to
/// the request this way is what makes concurrent synchronous and
/// asynchronous submissions safe to interleave.
pub(crate) struct ScriptCall {
    pub function: String,
    pub args: Vec<String>,
    pub reply: oneshot::Sender<Result<(), CallError>>,
}
