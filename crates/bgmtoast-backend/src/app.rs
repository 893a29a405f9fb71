//! Application context shared by the worker, the interception handlers and
//! the overlay.
//!
//! The context is built once at startup and lives for the whole process. Each
//! piece of mutable state has a single writer:
//! - the mailbox is written by the handlers and drained by the worker,
//! - the notification board is written by the worker and read by the overlay,
//! - the worker-active flag is written by the runtime and read by the worker.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use bgmtoast_bridge::config::Config;
use bgmtoast_bridge::notification::NotificationBoard;
use bgmtoast_catalog::Catalog;
use bgmtoast_intercept::{Interceptor, Mailbox, WatchedExtension};

const SECONDS_PER_HOUR: u64 = 60 * 60;

/// Shared application context.
#[derive(Debug)]
pub struct AppContext {
    /// Loaded configuration, immutable after startup.
    pub config: Config,
    /// Track catalog, immutable after startup.
    pub catalog: Arc<Catalog>,
    /// Handoff from the interception handlers to the worker.
    pub mailbox: Arc<Mailbox>,
    /// Handoff from the worker to the overlay.
    pub board: Arc<NotificationBoard>,
    worker_active: AtomicBool,
}

impl AppContext {
    pub fn new(config: Config, catalog: Catalog) -> Self {
        Self {
            config,
            catalog: Arc::new(catalog),
            mailbox: Arc::new(Mailbox::new()),
            board: Arc::new(NotificationBoard::new()),
            worker_active: AtomicBool::new(false),
        }
    }

    /// Extension the handlers watch for. Falls back to `.ogg` if the
    /// configured value was never validated.
    pub fn watched_extension(&self) -> WatchedExtension {
        let configured = &self.config.intercept.watched_extension;
        WatchedExtension::new(configured).unwrap_or_else(|| {
            log::warn!("Ignoring invalid watched extension {configured:?}.");
            WatchedExtension::default()
        })
    }

    /// Builds the handler side bound to this context's mailbox.
    pub fn interceptor(&self) -> Interceptor {
        Interceptor::new(self.mailbox.clone(), self.watched_extension())
    }

    pub fn cooldown(&self) -> Duration {
        let hours = self.config.notification.cooldown_hours;
        Duration::from_secs(hours.saturating_mul(SECONDS_PER_HOUR))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.config.intercept.poll_interval_ms)
    }

    pub fn is_worker_active(&self) -> bool {
        self.worker_active.load(Ordering::Acquire)
    }

    pub(crate) fn set_worker_active(&self, active: bool) {
        self.worker_active.store(active, Ordering::Release);
    }
}
