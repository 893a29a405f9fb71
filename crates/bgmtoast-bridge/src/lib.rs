//! Shared state between the detection worker and the overlay.
//!
//! This crate defines the types that cross the boundary between the
//! background worker, which resolves intercepted asset paths into track
//! metadata, and the overlay, which renders that metadata once per host
//! frame.
//!
//! The handoff is one-directional:
//! - The worker publishes a complete [`notification::NowPlaying`] snapshot
//!   into the [`notification::NotificationBoard`].
//! - The overlay reads the latest snapshot and reacts to a bumped
//!   generation by starting a fresh slide-in.
//!
//! Nothing flows back from the overlay to the worker.

pub mod config;
pub mod notification;
