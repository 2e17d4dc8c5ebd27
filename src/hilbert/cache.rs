//! A read-mostly, shape-keyed cache of Hilbert permutations.
//!
//! Many lattices of the same shape are typically linearized in one run, so the
//! permutation is built once and shared as an `Arc<[usize]>`. Readers only take the
//! read lock; the first caller for a new shape takes the write lock, re-checks, and
//! is the only one that builds and inserts it.

use hashbrown::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use super::curve::hilbert_permutation;
use crate::config::HilbertPolicy;
use crate::error::{ComplexityError, Result};

type ShapeKey = (Vec<usize>, HilbertPolicy);

#[derive(Default)]
pub struct HilbertCache {
    entries: RwLock<HashMap<ShapeKey, Arc<[usize]>>>,
}

impl HilbertCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(&self, shape: &[usize], policy: HilbertPolicy) -> Result<Arc<[usize]>> {
        let key = (shape.to_vec(), policy);
        {
            let entries = self.entries.read().map_err(|_| poisoned())?;
            if let Some(hit) = entries.get(&key) {
                return Ok(Arc::clone(hit));
            }
        }

        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        if let Some(hit) = entries.get(&key) {
            return Ok(Arc::clone(hit));
        }
        log::debug!("hilbert cache miss for {:?} ({:?}), building", shape, policy);
        let permutation: Arc<[usize]> = hilbert_permutation(shape, policy)?.into();
        entries.insert(key, Arc::clone(&permutation));
        Ok(permutation)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

fn poisoned() -> ComplexityError {
    ComplexityError::InternalError("Hilbert cache lock poisoned".to_string())
}

static GLOBAL_CACHE: OnceLock<HilbertCache> = OnceLock::new();

/// The process-wide cache used by `Lattice::linearize`.
pub fn global_cache() -> &'static HilbertCache {
    GLOBAL_CACHE.get_or_init(HilbertCache::new)
}

/// Shorthand for `global_cache().get_or_build(shape, policy)`.
pub fn cached_permutation(shape: &[usize], policy: HilbertPolicy) -> Result<Arc<[usize]>> {
    global_cache().get_or_build(shape, policy)
}
