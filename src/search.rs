//! Cancellable background search.
//!
//! Each decision runs on one dedicated worker thread. The worker publishes
//! every completed result over a channel; the caller waits with a deadline,
//! keeps the latest result, and on timeout sets the shared cancellation flag
//! and walks away without joining. The worker polls the flag at its own
//! boundaries (a finished minimax depth, a finished playout) and stops
//! publishing once it is set.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

/// Shared flag asking a worker to stop.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Worker-side handle: publishes results until the search is cancelled.
pub struct Publisher<T> {
    tx: Sender<T>,
    token: CancellationToken,
}

impl<T> Publisher<T> {
    /// Send a completed result to the caller.
    ///
    /// Returns `false` once the search is cancelled or the caller is gone;
    /// nothing is sent in that case.
    pub fn publish(&self, value: T) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        self.tx.send(value).is_ok()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// Run `work` on a worker thread and wait at most `budget` for it.
///
/// Returns the last value the worker published before it finished or was
/// cancelled, or `None` if it published nothing in time.
pub fn run_cancellable<T, F>(budget: Duration, work: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce(Publisher<T>) + Send + 'static,
{
    let token = CancellationToken::new();
    let (tx, rx) = mpsc::channel();
    let publisher = Publisher {
        tx,
        token: token.clone(),
    };

    let handle = match thread::Builder::new()
        .name("search-worker".into())
        .spawn(move || work(publisher))
    {
        Ok(handle) => handle,
        Err(err) => {
            warn!(%err, "failed to spawn search worker");
            return None;
        }
    };

    let deadline = Instant::now() + budget;
    let mut latest = None;
    let finished = loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(value) => latest = Some(value),
            Err(RecvTimeoutError::Timeout) => {
                token.cancel();
                break false;
            }
            Err(RecvTimeoutError::Disconnected) => break true,
        }
    };

    // Results sent before the flag was raised are still complete.
    if let Some(value) = rx.try_iter().last() {
        latest = Some(value);
    }

    if finished {
        if handle.join().is_err() {
            warn!("search worker panicked");
        }
    } else {
        debug!(?budget, "search worker cancelled on timeout");
        if latest.is_none() {
            warn!("search worker cancelled before publishing a result");
        }
    }
    latest
}
