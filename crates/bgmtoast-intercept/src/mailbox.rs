use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

#[derive(Debug, Default)]
struct PendingPath {
    /// Reused between publishes so a warm slot does not allocate.
    path: String,
    unread: bool,
}

/// Single-slot handoff from the interception handlers to the worker.
///
/// Producers never wait: if the slot is locked or still holds an unread path,
/// the new path is dropped. A missed detection is acceptable, a stalled host
/// thread is not.
#[derive(Debug, Default)]
pub struct Mailbox {
    slot: Mutex<PendingPath>,
}

impl Mailbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers `path` to the worker. Returns whether it was accepted.
    pub fn publish(&self, path: &str) -> bool {
        self.publish_with(|buffer| buffer.push_str(path))
    }

    /// Offers a byte path, replacing invalid UTF-8 sequences.
    pub fn publish_narrow(&self, path: &[u8]) -> bool {
        self.publish_with(|buffer| buffer.push_str(&String::from_utf8_lossy(path)))
    }

    /// Offers a UTF-16 path, replacing unpaired surrogates.
    pub fn publish_wide(&self, path: &[u16]) -> bool {
        self.publish_with(|buffer| {
            buffer.extend(
                char::decode_utf16(path.iter().copied())
                    .map(|decoded| decoded.unwrap_or(char::REPLACEMENT_CHARACTER)),
            )
        })
    }

    fn publish_with(&self, write: impl FnOnce(&mut String)) -> bool {
        let mut slot = match self.slot.try_lock() {
            Ok(slot) => slot,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return false,
        };
        if slot.unread {
            return false;
        }

        slot.path.clear();
        write(&mut slot.path);
        slot.unread = true;
        true
    }

    /// Takes the unread path, if any, leaving the slot empty. Only the worker
    /// calls this; it may wait briefly for a producer's copy to finish.
    pub fn take_if_present(&self) -> Option<String> {
        let mut slot = self.lock();
        if !slot.unread {
            return None;
        }
        slot.unread = false;
        Some(slot.path.clone())
    }

    /// Whether a path is waiting for the worker.
    pub fn has_unread(&self) -> bool {
        self.lock().unread
    }

    fn lock(&self) -> MutexGuard<'_, PendingPath> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
