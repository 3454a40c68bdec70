//! Session-scoped shared state: the visited set and the abort guard

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use url::Url;

/// URLs claimed for processing during one crawl session
///
/// A URL is claimed at most once; `claim` is an atomic insert-if-absent.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a URL, returning false if another worker already owns it
    pub fn claim(&self, url: &Url) -> bool {
        self.lock().insert(url.as_str().to_string())
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.lock().contains(url.as_str())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies out every claimed URL
    pub fn snapshot(&self) -> HashSet<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.urls.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Abort switch shared by every worker of a harvest session
///
/// Trips when `abort` is called or the optional deadline passes. Workers check
/// it before claiming new work; fetches already in flight are left to finish.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    aborted: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl SessionGuard {
    /// Creates a guard with no deadline
    pub fn new() -> Self {
        Self {
            aborted: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// Creates a guard that trips `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            aborted: Arc::new(AtomicBool::new(false)),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Builds a guard from `session-timeout-secs` (0 = no deadline)
    pub fn from_timeout_secs(secs: u64) -> Self {
        if secs == 0 {
            Self::new()
        } else {
            Self::with_timeout(Duration::from_secs(secs))
        }
    }

    pub fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst) || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

impl Default for SessionGuard {
    fn default() -> Self {
        Self::new()
    }
}
