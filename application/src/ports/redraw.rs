//! Redraw signal port.
//!
//! Script calls may change anything the host renders, so every completed
//! submission requests a redraw: once when a synchronous call returns,
//! once when an asynchronous call's waiter observes completion.

/// Port for requesting that the host refresh its output.
pub trait RedrawPort: Send + Sync {
    fn request_redraw(&self);
}
