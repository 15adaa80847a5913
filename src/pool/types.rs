/*!
 * Pool Types
 * Quota configuration and resolution outcomes for resource pools
 */

use crate::core::limits::UNLIMITED;
use serde::{Deserialize, Serialize};

/// Quota limits for one resource pool
///
/// Sentinels:
/// - `max_requests < 0`: unlimited concurrent requests
/// - `max_queued <= 0`: no queueing, reject once `max_requests` is reached
/// - `mem_limit_bytes < 0`: unlimited memory (zero is normalized to -1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawPoolConfig")]
pub struct PoolConfig {
    max_requests: i64,
    max_queued: i64,
    mem_limit_bytes: i64,
}

impl PoolConfig {
    /// Create a pool configuration, normalizing a zero memory limit to unlimited
    pub const fn new(max_requests: i64, max_queued: i64, mem_limit_bytes: i64) -> Self {
        Self {
            max_requests,
            max_queued,
            mem_limit_bytes: if mem_limit_bytes == 0 {
                UNLIMITED
            } else {
                mem_limit_bytes
            },
        }
    }

    /// No concurrency or memory limit, no queueing
    pub const fn unlimited() -> Self {
        Self::new(UNLIMITED, 0, UNLIMITED)
    }

    #[inline]
    pub const fn max_requests(&self) -> i64 {
        self.max_requests
    }

    #[inline]
    pub const fn max_queued(&self) -> i64 {
        self.max_queued
    }

    #[inline]
    pub const fn mem_limit_bytes(&self) -> i64 {
        self.mem_limit_bytes
    }

    /// Concurrent request limit, `None` when unlimited
    pub fn request_limit(&self) -> Option<u64> {
        u64::try_from(self.max_requests).ok()
    }

    /// Queue depth, `None` when queueing is disabled
    pub fn queue_limit(&self) -> Option<u64> {
        (self.max_queued > 0).then_some(self.max_queued as u64)
    }

    /// Memory ceiling in bytes, `None` when unlimited
    pub fn mem_limit(&self) -> Option<u64> {
        u64::try_from(self.mem_limit_bytes).ok()
    }

    /// Neither concurrency nor memory is bounded
    pub fn is_unlimited(&self) -> bool {
        self.max_requests < 0 && self.mem_limit_bytes < 0
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::unlimited()
    }
}

// Every deserialized config passes through `PoolConfig::new`
#[derive(Deserialize)]
struct RawPoolConfig {
    #[serde(default = "unlimited")]
    max_requests: i64,
    #[serde(default)]
    max_queued: i64,
    #[serde(default = "unlimited")]
    mem_limit_bytes: i64,
}

fn unlimited() -> i64 {
    UNLIMITED
}

impl From<RawPoolConfig> for PoolConfig {
    fn from(raw: RawPoolConfig) -> Self {
        Self::new(raw.max_requests, raw.max_queued, raw.mem_limit_bytes)
    }
}

/// Outcome of mapping a requested pool and user to an actual pool
///
/// `has_access == false` is a valid negative decision, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolResolution {
    pub resolved_pool_name: String,
    pub has_access: bool,
}

impl PoolResolution {
    pub fn granted(pool: impl Into<String>) -> Self {
        Self {
            resolved_pool_name: pool.into(),
            has_access: true,
        }
    }

    pub fn denied(pool: impl Into<String>) -> Self {
        Self {
            resolved_pool_name: pool.into(),
            has_access: false,
        }
    }
}
