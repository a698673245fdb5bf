//! Atomic cross-thread progress reporting (spec §5.2).
//!
//! Adapted from bellman's `progress_bar::MultiBar`: that type coordinates a
//! channel of per-worker deltas into a single periodically-printed line. The
//! ceremony only needs the accumulation half of that (deltas arrive from
//! many exponentiation worker threads; one line is emitted on stderr, rate
//! limited, while the protocol's stdout channel stays silent and protocol-only).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

pub struct Progress {
    done: AtomicU64,
    total: u64,
    started: Instant,
}

impl Progress {
    pub fn new(total: u64) -> Self {
        Progress {
            done: AtomicU64::new(0),
            total,
            started: Instant::now(),
        }
    }

    /// Records that `count` more units of work completed. Safe to call
    /// concurrently from any number of worker threads.
    pub fn add(&self, count: u64) {
        self.done.fetch_add(count, Ordering::Relaxed);
    }

    pub fn done(&self) -> u64 {
        self.done.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Emits a single `tracing::info!` progress line. The caller decides the
    /// cadence (e.g. once per outer batch of the exponentiation loop); this
    /// type does no internal rate limiting of its own.
    pub fn report(&self) {
        let done = self.done();
        let percent = if self.total == 0 {
            100
        } else {
            done.saturating_mul(100) / self.total
        };
        tracing::info!(
            done,
            total = self.total,
            percent,
            elapsed_secs = self.elapsed().as_secs(),
            "exponentiation progress"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_across_calls() {
        let progress = Progress::new(100);
        progress.add(30);
        progress.add(20);
        assert_eq!(progress.done(), 50);
    }
}
