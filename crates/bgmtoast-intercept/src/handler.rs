use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::filter::WatchedExtension;
use crate::mailbox::Mailbox;

/// What a handler did with an observed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Not a watched asset; the mailbox was not touched.
    Ignored,
    /// Watched asset, handed to the worker.
    Published,
    /// Watched asset, but the mailbox was busy or still full.
    Dropped,
}

/// The detection side of the file-open interception.
///
/// `observe_*` is the pure decision. `intercept_*` wraps it around a call to
/// the original file-open function, whose result is always returned as is.
#[derive(Debug, Clone)]
pub struct Interceptor {
    mailbox: Arc<Mailbox>,
    extension: WatchedExtension,
}

impl Interceptor {
    pub fn new(mailbox: Arc<Mailbox>, extension: WatchedExtension) -> Self {
        Self { mailbox, extension }
    }

    pub fn observe_narrow(&self, path: &[u8]) -> Observation {
        if !self.extension.matches_narrow(path) {
            return Observation::Ignored;
        }
        Self::outcome(self.mailbox.publish_narrow(path))
    }

    pub fn observe_wide(&self, path: &[u16]) -> Observation {
        if !self.extension.matches_wide(path) {
            return Observation::Ignored;
        }
        Self::outcome(self.mailbox.publish_wide(path))
    }

    /// Observes `path`, then calls `original` and returns its result.
    pub fn intercept_narrow<R>(&self, path: Option<&[u8]>, original: impl FnOnce() -> R) -> R {
        if let Some(path) = path {
            let _ = panic::catch_unwind(AssertUnwindSafe(|| self.observe_narrow(path)));
        }
        original()
    }

    /// Observes `path`, then calls `original` and returns its result.
    pub fn intercept_wide<R>(&self, path: Option<&[u16]>, original: impl FnOnce() -> R) -> R {
        if let Some(path) = path {
            let _ = panic::catch_unwind(AssertUnwindSafe(|| self.observe_wide(path)));
        }
        original()
    }

    fn outcome(accepted: bool) -> Observation {
        if accepted {
            Observation::Published
        } else {
            Observation::Dropped
        }
    }
}
