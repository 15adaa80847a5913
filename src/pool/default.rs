/*!
 * Default Pool Policy
 * Single always-available pool used when no policy source is configured
 */

use super::types::{PoolConfig, PoolResolution};
use crate::config::AdmissionConfig;
use crate::core::limits::DEFAULT_POOL_NAME;
use crate::memspec::{parse_mem_spec, HostMemory, MemSpecError};
use tracing::{debug, info};

/// Static policy: one pool, open to every user, one configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultPoolPolicy {
    config: PoolConfig,
}

impl DefaultPoolPolicy {
    /// Build from a memory spec and the two integer limits
    ///
    /// Percentages are resolved against `host` here so only the final
    /// byte count is stored. A non-zero percentage that resolves to 0 bytes
    /// is an error, since 0 would otherwise mean no limit.
    pub fn new(
        mem_limit: &str,
        max_requests: i64,
        max_queued: i64,
        host: HostMemory,
    ) -> Result<Self, MemSpecError> {
        let spec = parse_mem_spec(mem_limit)?;
        let mem_limit_bytes = spec.resolve(host);
        if spec.is_percent() && spec.bytes() > 0 && mem_limit_bytes == 0 {
            return Err(MemSpecError::PercentResolvesToZero {
                spec: mem_limit.into(),
                total_bytes: host.total_bytes(),
            });
        }
        let config = PoolConfig::new(max_requests, max_queued, mem_limit_bytes);

        info!(
            pool = DEFAULT_POOL_NAME,
            max_requests = config.max_requests(),
            max_queued = config.max_queued(),
            mem_limit_bytes = config.mem_limit_bytes(),
            mem_limit_spec = mem_limit,
            "Default pool configured"
        );

        Ok(Self { config })
    }

    pub fn from_config(config: &AdmissionConfig, host: HostMemory) -> Result<Self, MemSpecError> {
        Self::new(
            &config.default_pool_mem_limit,
            config.default_pool_max_requests,
            config.default_pool_max_queued,
            host,
        )
    }

    #[inline]
    pub const fn pool_name(&self) -> &'static str {
        DEFAULT_POOL_NAME
    }

    /// Every request lands in the default pool with access granted
    pub fn resolve(&self, requested_pool: &str, user: &str) -> PoolResolution {
        debug!(requested_pool, user, "Resolved to default pool");
        PoolResolution::granted(DEFAULT_POOL_NAME)
    }

    /// The one static configuration, whatever pool is asked for
    #[inline]
    pub fn config(&self, _pool: &str) -> PoolConfig {
        self.config
    }
}
