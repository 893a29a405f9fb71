use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bgmtoast_bridge::notification::NotificationBoard;
use bgmtoast_catalog::Catalog;

/// Outcome of resolving one intercepted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Same path as the previous one; ignored.
    Duplicate,
    /// No catalog key is a suffix of the path.
    Unmatched,
    /// Matched, and a fresh slide-in was requested.
    Shown { display_name: String },
    /// Matched within the cooldown of the same song name; metadata was
    /// updated without a new slide-in.
    Suppressed { display_name: String },
}

/// Turns intercepted paths into notifications. Owned by the worker thread.
#[derive(Debug)]
pub struct Resolver {
    catalog: Arc<Catalog>,
    board: Arc<NotificationBoard>,
    cooldown: Duration,
    last_path: Option<String>,
    last_shown: HashMap<String, Instant>,
}

impl Resolver {
    pub fn new(catalog: Arc<Catalog>, board: Arc<NotificationBoard>, cooldown: Duration) -> Self {
        Self {
            catalog,
            board,
            cooldown,
            last_path: None,
            last_shown: HashMap::new(),
        }
    }

    /// Resolves `path` as seen at `now`.
    ///
    /// The same physical file is often reopened several times in a row, so a
    /// path equal to the previous one is dropped before anything else. The
    /// cooldown is keyed by song name: two paths mapping to the same name
    /// share one window.
    pub fn resolve(&mut self, path: &str, now: Instant) -> Resolution {
        if self.last_path.as_deref() == Some(path) {
            return Resolution::Duplicate;
        }
        self.last_path = Some(path.to_string());
        log::info!("Processing audio file: {path}");

        let Some(entry) = self.catalog.find_suffix(path) else {
            return Resolution::Unmatched;
        };
        log::info!("Match found for: {}", entry.key);

        let display_name = entry.info.display_name.clone();
        let show = match self.last_shown.get(&display_name) {
            Some(shown_at) => now.saturating_duration_since(*shown_at) >= self.cooldown,
            None => true,
        };
        if show {
            self.last_shown.insert(display_name.clone(), now);
        }
        self.board.publish(entry.info.clone(), entry.key.clone(), show);

        if show {
            Resolution::Shown { display_name }
        } else {
            Resolution::Suppressed { display_name }
        }
    }
}
