use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

/// Human-readable metadata of a background-music track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackInfo {
    /// Song name shown on the first line of the toast.
    pub display_name: String,
    /// Disc label, may be empty.
    pub disc_label: String,
    /// Track label, may be empty.
    pub track_label: String,
}

impl TrackInfo {
    /// Returns the `"Disc X, Track Y"` line, or `None` when both labels are
    /// empty.
    pub fn detail_line(&self) -> Option<String> {
        if self.disc_label.is_empty() && self.track_label.is_empty() {
            return None;
        }
        Some(format!(
            "Disc {}, Track {}",
            self.disc_label, self.track_label
        ))
    }
}

/// The notification currently held by the board.
///
/// A snapshot is immutable once published; the worker replaces it as a whole
/// so readers never see a half-updated record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NowPlaying {
    /// Metadata of the last matched track.
    pub track: TrackInfo,
    /// Catalog key the track was matched with.
    pub source_key: String,
    /// Number of visible (re)shows requested so far. Zero means nothing has
    /// been shown yet.
    pub generation: u64,
}

/// Single-writer, single-reader slot holding the latest [`NowPlaying`].
///
/// The lock is only ever held for an `Arc` clone or swap.
#[derive(Debug, Default)]
pub struct NotificationBoard {
    current: Mutex<Arc<NowPlaying>>,
}

impl NotificationBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current notification with `track`. When `show` is set the
    /// generation is bumped, which makes the overlay start a fresh slide-in.
    /// Returns the generation of the published snapshot.
    pub fn publish(&self, track: TrackInfo, source_key: impl Into<String>, show: bool) -> u64 {
        let source_key = source_key.into();
        let mut current = self.lock();
        let generation = current.generation + u64::from(show);
        *current = Arc::new(NowPlaying {
            track,
            source_key,
            generation,
        });
        generation
    }

    /// Returns the latest snapshot, waiting for the writer if needed.
    pub fn snapshot(&self) -> Arc<NowPlaying> {
        self.lock().clone()
    }

    /// Returns the latest snapshot, or `None` if the writer holds the slot
    /// right now. Used on the render thread, which must never wait.
    pub fn try_snapshot(&self) -> Option<Arc<NowPlaying>> {
        match self.current.try_lock() {
            Ok(current) => Some(current.clone()),
            Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner().clone()),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Arc<NowPlaying>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
