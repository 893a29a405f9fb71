//! Observation of the host's file-open calls.
//!
//! This crate turns intercepted file-open calls into background-music
//! detections. It focuses on:
//! - Deciding cheaply whether an opened path is a watched audio asset
//!   ([`filter`]).
//! - Handing matching paths to the worker through a single-slot
//!   [`mailbox::Mailbox`] that never blocks the producer.
//! - Forwarding every call to the original function untouched
//!   ([`handler`], [`detour`]).
//!
//! # Host-thread constraints
//! Handlers run synchronously on whatever thread the host opens files from,
//! possibly many threads at once and many times per second. They must not
//! block, must not allocate for non-matching paths, and must never let a
//! panic escape into the host.

pub mod detour;
pub mod filter;
pub mod handler;
pub mod mailbox;

pub use crate::filter::WatchedExtension;
pub use crate::handler::{Interceptor, Observation};
pub use crate::mailbox::Mailbox;
