//! Outstanding-request tracking

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared loading flag
///
/// Counts calls currently in flight; `is_loading` is true while ANY tracked
/// call is outstanding, not an exclusive lock. A call's guard covers the
/// whole refresh-and-replay cycle, so the flag does not flicker mid-cycle.
#[derive(Clone, Default)]
pub struct LoadingGauge {
    active: Arc<AtomicUsize>,
}

impl LoadingGauge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a call until the returned guard drops
    pub fn start(&self) -> LoadingGuard {
        self.active.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            active: Arc::clone(&self.active),
        }
    }

    /// True while any tracked call is outstanding
    pub fn is_loading(&self) -> bool {
        self.active.load(Ordering::SeqCst) > 0
    }

    /// Number of calls currently outstanding
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }
}

/// Releases its slot on drop, so the gauge resets on every exit path,
/// errors and panics included.
pub struct LoadingGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}
