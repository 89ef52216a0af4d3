use std::sync::atomic::{AtomicUsize, Ordering};

use fxhash::FxHashMap;
use parking_lot::RwLock;

use super::{fitness::Fitness, individual::Fingerprint};

/// Memoized fitness values keyed by individual fingerprint.
///
/// Concurrent writers only ever insert the value computed for a key, so racing
/// inserts of the same key are harmless.
#[derive(Debug, Default)]
pub struct FitnessCache {
    entries: RwLock<FxHashMap<Fingerprint, Fitness>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl FitnessCache {
    pub fn get(&self, fingerprint: Fingerprint) -> Option<Fitness> {
        self.entries.read().get(&fingerprint).copied()
    }

    pub fn get_or_compute<F>(&self, fingerprint: Fingerprint, compute: F) -> Fitness
    where
        F: FnOnce() -> Fitness,
    {
        if let Some(fitness) = self.get(fingerprint) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return fitness;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let fitness = compute();
        self.entries.write().insert(fingerprint, fitness);
        fitness
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.entries.write().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}
