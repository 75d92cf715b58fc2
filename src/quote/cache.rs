/*
 * Per-pair cache of discovered pools
 */

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use crate::models::{PairKey, PoolCandidate};

/// Append-only store of discovery results. Entries live as long as the cache.
#[derive(Debug, Default)]
pub struct PairCache {
    entries: RwLock<HashMap<PairKey, Vec<PoolCandidate>>>,
}

impl PairCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &PairKey) -> Option<Vec<PoolCandidate>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Stores `candidates` unless the pair is already cached; the first result wins.
    pub fn put(&self, key: PairKey, candidates: Vec<PoolCandidate>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(candidates);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
