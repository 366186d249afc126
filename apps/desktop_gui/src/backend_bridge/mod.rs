//! Backend bridge: a worker thread with its own tokio runtime that serves
//! commands queued by the UI thread.

pub mod commands;
pub mod runtime;
