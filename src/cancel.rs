//! Cancellation signal for blocking waits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// A cloneable cancellation flag.
///
/// Clones share one flag: firing any of them cancels every wait polling the
/// token. Emission paths check it before starting and during every sleep or
/// yield loop, and return [`Error::Canceled`](crate::Error::Canceled)
/// promptly (not instantaneously) once it fires. A token stays canceled
/// forever; create a fresh one per operation that needs its own signal.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// A new, un-fired token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether the signal has fired.
    pub fn is_canceled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Process-wide token that never fires, backing the non-cancellable
    /// entry points.
    pub(crate) fn never() -> &'static CancelToken {
        static NEVER: OnceLock<CancelToken> = OnceLock::new();
        NEVER.get_or_init(CancelToken::new)
    }
}
