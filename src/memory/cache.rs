//! Cache implementation

use std::fmt;

/// Largest accepted cache size in cells, bounding the row table
pub const MAX_CACHE_SIZE: usize = 1 << 20;

/// One cache level.
/// Only tags and reference stamps are tracked, never data
pub struct Cache {
    /// 1-based level number, used for the "L1"/"L2" label
    pub level: usize,

    pub policy: CachePolicy,

    pub history: CacheHistory,

    pub rows: Vec<Row>,
}

// An address is split per level as
// | tag | row | offset |
// with the row and tag taken by division, not masking,
// since neither the row count nor the block size need be a power of 2
impl Cache {
    pub fn make(level: usize, policy: CachePolicy) -> Self {
        assert!(policy.is_valid());
        Self {
            level,
            policy,
            history: CacheHistory::default(),
            rows: (0..policy.num_rows).map(|_| Row::default()).collect(),
        }
    }

    /// The label used in reports and logs
    pub fn label(&self) -> String {
        format!("L{}", self.level)
    }

    pub fn get_block_id(&self, address: u16) -> usize {
        address as usize / self.policy.block_size
    }

    pub fn get_index(&self, address: u16) -> usize {
        self.get_block_id(address) % self.policy.num_rows
    }

    pub fn get_tag(&self, address: u16) -> usize {
        self.get_block_id(address) / self.policy.num_rows
    }

    /// Scan the row the address maps to.
    /// A single pass checks for a matching tag while tracking
    /// the least recently referenced block
    pub fn lookup(&self, address: u16) -> Lookup {
        let index = self.get_index(address);
        let tag = self.get_tag(address);
        let row = &self.rows[index];

        let mut lru: Option<(usize, u64)> = None;
        for (i, block) in row.blocks.iter().enumerate() {
            if block.tag == tag {
                return Lookup::Hit { index, slot: i };
            }
            // Strict comparison keeps the first minimum
            if lru.map_or(true, |(_, min_ref)| block.prv_ref < min_ref) {
                lru = Some((i, block.prv_ref));
            }
        }

        let victim = if row.blocks.len() >= self.policy.associativity {
            lru.map(|(i, _)| i)
        } else {
            None
        };
        Lookup::Miss { index, tag, victim }
    }

    pub fn is_in_cache(&self, address: u16) -> bool {
        matches!(self.lookup(address), Lookup::Hit { .. })
    }

    /// Refresh the reference stamp of a resident block
    pub fn access_index(&mut self, index: usize, slot: usize, clock: u64) {
        self.rows[index].blocks[slot].prv_ref = clock;
    }

    /// Evict the victim (if any) and append a new block to the row
    pub fn allocate(
        &mut self,
        index: usize,
        tag: usize,
        victim: Option<usize>,
        clock: u64,
    ) {
        let row = &mut self.rows[index];
        if let Some(victim) = victim {
            let evicted = row.blocks.remove(victim);
            tracing::trace!(
                level = self.level,
                row = index,
                tag = evicted.tag,
                "evicted"
            );
        }
        row.blocks.push(Block { tag, prv_ref: clock });
    }

    /// Computes the current miss rate of the cache
    pub fn get_miss_rate(&self) -> f64 {
        self.history.get_miss_rate()
    }

    pub fn record_hit(&mut self) {
        self.history.num_hit += 1;
    }

    pub fn record_miss(&mut self) {
        self.history.num_miss += 1;
    }
}

/// Configuration report line
impl fmt::Display for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cache {} has size {}, associativity {}, blocksize {}, rows {}",
            self.label(),
            self.policy.cache_size,
            self.policy.associativity,
            self.policy.block_size,
            self.policy.num_rows
        )
    }
}

/// Result of scanning a row
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Lookup {
    Hit {
        index: usize,
        slot: usize,
    },
    /// `victim` is set only when the row is already full
    Miss {
        index: usize,
        tag: usize,
        victim: Option<usize>,
    },
}

impl Lookup {
    pub fn index(&self) -> usize {
        match *self {
            Lookup::Hit { index, .. } | Lookup::Miss { index, .. } => index,
        }
    }
}

/// A set. Blocks are kept in insertion order,
/// and an empty slot is simply an absent entry
#[derive(Clone, Default, Debug)]
pub struct Row {
    pub blocks: Vec<Block>,
}

#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Block {
    pub tag: usize,
    /// Logical clock of the most recent reference
    pub prv_ref: u64,
}

#[derive(Clone, Copy, Default, Debug)]
pub struct CacheHistory {
    pub num_hit: u64,
    pub num_miss: u64,
}

impl CacheHistory {
    pub fn get_miss_rate(&self) -> f64 {
        let total = self.num_hit + self.num_miss;
        if total == 0 {
            0.
        } else {
            self.num_miss as f64 / total as f64
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CachePolicy {
    pub cache_size: usize,
    pub associativity: usize,
    pub block_size: usize,
    pub num_rows: usize,
}

impl CachePolicy {
    /// Arguments are in the command-line order
    pub fn make(
        cache_size: usize,
        associativity: usize,
        block_size: usize,
    ) -> Self {
        let num_rows = match block_size.checked_mul(associativity) {
            Some(set_size) if set_size > 0 => cache_size / set_size,
            _ => 0,
        };
        Self { cache_size, associativity, block_size, num_rows }
    }

    pub fn is_valid(&self) -> bool {
        if self.cache_size == 0 || self.associativity == 0 {
            return false;
        }
        if self.block_size == 0 {
            return false;
        }
        // cache_size = block_size * associativity * num_rows
        let total = self
            .block_size
            .checked_mul(self.associativity)
            .and_then(|set_size| set_size.checked_mul(self.num_rows));
        self.num_rows > 0
            && self.cache_size <= MAX_CACHE_SIZE
            && total == Some(self.cache_size)
    }
}
