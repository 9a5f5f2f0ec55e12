//! Cache configuration given on the command line

use std::str::FromStr;

use crate::error::ConfigError;
use crate::memory::cache::CachePolicy;
use crate::memory::cache::MAX_CACHE_SIZE;

/// Zero, one or two cache levels, L1 first
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CacheConfig {
    pub levels: Vec<CachePolicy>,
}

impl CacheConfig {
    /// Validate and wrap a list of levels
    pub fn make(levels: Vec<CachePolicy>) -> Result<Self, ConfigError> {
        for (k, policy) in levels.iter().enumerate() {
            check_level(k + 1, policy)?;
        }
        Ok(Self { levels })
    }

    pub fn n(&self) -> usize {
        self.levels.len()
    }
}

fn check_level(level: usize, policy: &CachePolicy) -> Result<(), ConfigError> {
    for (name, value) in [
        ("size", policy.cache_size),
        ("associativity", policy.associativity),
        ("blocksize", policy.block_size),
    ] {
        if value == 0 {
            return Err(ConfigError::ZeroParameter { level, name });
        }
    }
    if policy.cache_size > MAX_CACHE_SIZE {
        return Err(ConfigError::TooLarge {
            level,
            size: policy.cache_size,
            max: MAX_CACHE_SIZE,
        });
    }
    // Also covers products that overflow
    if !policy.is_valid() {
        return Err(ConfigError::Indivisible {
            level,
            size: policy.cache_size,
            associativity: policy.associativity,
            block_size: policy.block_size,
        });
    }
    Ok(())
}

/// Parses `size,assoc,blocksize` or
/// `size,assoc,blocksize,size,assoc,blocksize`
impl FromStr for CacheConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<usize>()
                    .map_err(|_| ConfigError::InvalidNumber(part.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if parts.len() != 3 && parts.len() != 6 {
            return Err(ConfigError::InvalidArity(parts.len()));
        }

        Self::make(
            parts
                .chunks(3)
                .map(|level| CachePolicy::make(level[0], level[1], level[2]))
                .collect(),
        )
    }
}
