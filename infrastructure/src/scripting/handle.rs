//! Handle to the scripting engine.
//!
//! `ScriptingHandle` is the submission API: the only way application code
//! interacts with the interpreter. Each submission carries its own reply
//! channel, so a synchronous caller can never be woken by a completion
//! that belongs to someone else's request, no matter how submissions
//! interleave.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use tokio::sync::{mpsc, oneshot, watch};

use vellum_application::{CallError, RedrawPort, ScriptCallerPort};
use vellum_domain::LoadedPlugin;

use super::command_api::{CommandEntry, CommandRegistry};
use super::keymap_api::{KeymapEntry, KeymapRegistry};
use super::request::ScriptCall;

/// Handle to the spawned scripting engine.
///
/// Calls may be submitted from any thread except the engine thread itself.
/// The synchronous path blocks the caller, so it must not be used from
/// inside an async runtime; hop to a blocking-capable thread first.
pub struct ScriptingHandle {
    pub(crate) call_tx: mpsc::Sender<ScriptCall>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) terminated: AtomicBool,
    pub(crate) thread_handle: Mutex<Option<thread::JoinHandle<()>>>,
    pub(crate) redraw: Arc<dyn RedrawPort>,
    pub(crate) loaded_plugins: Arc<Mutex<Vec<LoadedPlugin>>>,
    pub(crate) keymaps: Arc<Mutex<KeymapRegistry>>,
    pub(crate) commands: Arc<Mutex<CommandRegistry>>,
}

impl ScriptingHandle {
    /// Submit a call and block until its own completion signal arrives,
    /// then request a redraw and hand the outcome back.
    pub fn call_sync(&self, function: &str, args: Vec<String>) -> Result<(), CallError> {
        let reply_rx = self.submit(function, args)?;
        let outcome = reply_rx
            .blocking_recv()
            .map_err(|_| CallError::EngineClosed)?;
        self.redraw.request_redraw();
        outcome
    }

    /// Submit a call and return once it is accepted.
    ///
    /// A detached waiter observes the completion, requests the redraw, and
    /// discards the outcome — success and failure alike.
    pub fn call_async(&self, function: &str, args: Vec<String>) -> Result<(), CallError> {
        let reply_rx = self.submit(function, args)?;
        let redraw = Arc::clone(&self.redraw);
        thread::spawn(move || {
            if reply_rx.blocking_recv().is_ok() {
                redraw.request_redraw();
            }
        });
        Ok(())
    }

    /// Enqueue a request, handing back its private reply channel.
    ///
    /// Blocks while the request queue is full.
    fn submit(
        &self,
        function: &str,
        args: Vec<String>,
    ) -> Result<oneshot::Receiver<Result<(), CallError>>, CallError> {
        if self.terminated.load(Ordering::SeqCst) {
            return Err(CallError::EngineClosed);
        }

        let (reply_tx, reply_rx) = oneshot::channel();
        self.call_tx
            .blocking_send(ScriptCall {
                function: function.to_string(),
                args,
                reply: reply_tx,
            })
            .map_err(|_| CallError::EngineClosed)?;
        Ok(reply_rx)
    }

    /// Plugins loaded at bootstrap, in load order. Duplicates appear if a
    /// plugin was loaded more than once.
    pub fn loaded_plugins(&self) -> Vec<LoadedPlugin> {
        self.loaded_plugins
            .lock()
            .map(|plugins| plugins.clone())
            .unwrap_or_default()
    }

    /// Key bindings registered by scripts through `BindKey`.
    pub fn key_bindings(&self) -> Vec<KeymapEntry> {
        self.keymaps
            .lock()
            .map(|registry| registry.entries().to_vec())
            .unwrap_or_default()
    }

    /// Commands registered by scripts through `MakeCommand`.
    pub fn commands(&self) -> Vec<CommandEntry> {
        self.commands
            .lock()
            .map(|registry| registry.entries().to_vec())
            .unwrap_or_default()
    }

    /// Ask the engine to stop. The engine observes the signal between
    /// requests; a call already executing runs to completion first. The
    /// interpreter is released when the engine thread exits.
    pub fn shutdown(&self) {
        if self.terminated.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.shutdown_tx.send(true);
    }

    /// Whether `shutdown` has been requested.
    pub fn is_closed(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }

    /// Shut down and wait for the engine thread to finish.
    pub fn join(self) {
        self.shutdown();
        if let Ok(mut guard) = self.thread_handle.lock() {
            if let Some(handle) = guard.take() {
                let _ = handle.join();
            }
        }
    }
}

impl Drop for ScriptingHandle {
    fn drop(&mut self) {
        self.shutdown();
        if let Ok(mut guard) = self.thread_handle.lock() {
            if let Some(handle) = guard.take() {
                let _ = handle.join();
            }
        }
    }
}

impl ScriptCallerPort for ScriptingHandle {
    fn call_sync(&self, function: &str, args: Vec<String>) -> Result<(), CallError> {
        ScriptingHandle::call_sync(self, function, args)
    }

    fn call_async(&self, function: &str, args: Vec<String>) -> Result<(), CallError> {
        ScriptingHandle::call_async(self, function, args)
    }
}
