//! Inclusive cache implementation

use super::cache::CachePolicy;
use super::Cache;
use super::Ram;
use super::StorageInterface;
use crate::config::CacheConfig;
use crate::error::MemoryError;
use crate::error::SimulatorResult;

/// Inclusive, allocate-on-access, write-through hierarchy.
/// We maintain n (n >= 0) caches in front of 1 flat memory
pub struct InclusiveCache {
    pub n: usize,
    pub caches: Vec<Cache>,
    pub ram: Ram,
}

impl Default for InclusiveCache {
    /// No cache at all: a bare interpreter
    fn default() -> Self {
        Self::make(Vec::new(), Ram::make())
    }
}

impl InclusiveCache {
    /// Create an inclusive cache from a vector of
    /// cache policies for each level, L1 first
    pub fn make(policies: Vec<CachePolicy>, ram: Ram) -> Self {
        let caches: Vec<_> = policies
            .iter()
            .enumerate()
            .map(|(k, policy)| Cache::make(k + 1, *policy))
            .collect();
        Self { n: caches.len(), caches, ram }
    }

    pub fn from_config(config: &CacheConfig, ram: Ram) -> Self {
        Self::make(config.levels.clone(), ram)
    }

    /// Check that no row holds more blocks than the associativity
    pub fn verify_capacity(&self) -> SimulatorResult<()> {
        for cache in &self.caches {
            for (index, row) in cache.rows.iter().enumerate() {
                if row.blocks.len() > cache.policy.associativity {
                    return Err(MemoryError::CacheInconsistency(
                        cache.level,
                        format!(
                            "row {} holds {} blocks with associativity {}",
                            index,
                            row.blocks.len(),
                            cache.policy.associativity
                        ),
                    )
                    .into());
                }
            }
        }
        Ok(())
    }
}

impl StorageInterface for InclusiveCache {
    fn n(&self) -> usize {
        self.n
    }
    fn caches(&mut self, k: usize) -> &mut Cache {
        &mut self.caches[k]
    }
    fn ram(&mut self) -> &mut Ram {
        &mut self.ram
    }
}
