//! Detection backend: configuration, shared context and the worker thread.
//!
//! This crate owns the worker lifecycle, resolves intercepted paths against
//! the catalog and publishes the result to the notification board read by
//! the overlay.

pub mod app;
pub mod config;
pub mod resolver;
mod runtime;

pub use crate::app::AppContext;
pub use crate::runtime::{WorkerHandle, run};
