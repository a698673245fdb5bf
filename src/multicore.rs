//! Thread-pool-free chunked parallelism (spec §5.2, C6 support).
//!
//! Adapted from bellman's `multicore::Worker`: rather than pooling futures,
//! the ceremony only ever needs a single `crossbeam::scope` fan-out over
//! disjoint chunks of a point slice, so `Worker` is reduced to that one
//! primitive plus the chunk-size arithmetic bellman uses to keep each
//! thread's slice roughly even.

use crossbeam::thread::Scope;

#[derive(Clone)]
pub struct Worker {
    cpus: usize,
}

impl Worker {
    pub fn new() -> Self {
        let cpus = std::env::var("CEREMONY_THREADS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or_else(|| num_cpus::get().max(1));
        Worker { cpus }
    }

    pub fn cpus(&self) -> usize {
        self.cpus
    }

    /// Splits `elements` items into `self.cpus` roughly-even chunks and runs
    /// `f` inside a scoped thread fan-out, returning whatever `f` returns.
    pub fn scope<'a, F, R>(&self, elements: usize, f: F) -> R
    where
        F: FnOnce(&Scope<'a>, usize) -> R,
    {
        let chunk_size = if elements == 0 {
            1
        } else if elements < self.cpus {
            1
        } else {
            (elements + self.cpus - 1) / self.cpus
        };

        crossbeam::thread::scope(|scope| f(scope, chunk_size))
            .expect("worker thread panicked")
    }
}

impl Default for Worker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn scope_visits_every_chunk_exactly_once() {
        let worker = Worker::new();
        let data: Vec<usize> = (0..997).collect();
        let visited = AtomicUsize::new(0);

        worker.scope(data.len(), |scope, chunk_size| {
            for chunk in data.chunks(chunk_size) {
                let visited = &visited;
                scope.spawn(move |_| {
                    visited.fetch_add(chunk.len(), Ordering::SeqCst);
                });
            }
        });

        assert_eq!(visited.load(Ordering::SeqCst), data.len());
    }

    #[test]
    fn threads_env_override_is_honored() {
        std::env::set_var("CEREMONY_THREADS", "3");
        let worker = Worker::new();
        assert_eq!(worker.cpus(), 3);
        std::env::remove_var("CEREMONY_THREADS");
    }
}
