/*!
 * Admission Policy Resolver
 * Maps (pool, user) to a pool assignment and its quota limits
 *
 * The resolver picks one of two modes at construction and never changes it:
 * - default-pool-only: no policy source configured; answers from `DefaultPoolPolicy`
 * - provider-delegated: forwards every lookup to a started `PolicyProvider`
 */

use crate::config::AdmissionConfig;
use crate::core::errors::{AdmissionError, AdmissionResult, HandshakeStage, ProviderOperation};
use crate::memspec::HostMemory;
use crate::monitoring::span_lookup;
use crate::pool::{DefaultPoolPolicy, PoolConfig, PoolResolution};
use crate::provider::{
    ManagedPolicyProvider, PoolConfigParams, PolicyProvider, ProviderFactory, ResolvePoolParams,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Resolution mode, fixed for the resolver's lifetime
#[derive(Clone)]
enum ResolverMode {
    DefaultPoolOnly(DefaultPoolPolicy),
    Delegated(Arc<dyn PolicyProvider>),
}

/// Admission policy resolver
///
/// Immutable after construction; share it across request threads with `Arc`.
#[derive(Clone)]
pub struct AdmissionPolicyResolver {
    mode: ResolverMode,
}

impl AdmissionPolicyResolver {
    /// Build the resolver from startup configuration
    ///
    /// Delegation is chosen iff a policy source path is configured. Any error
    /// returned here is fatal to startup.
    pub fn new<F: ProviderFactory>(
        config: &AdmissionConfig,
        host: HostMemory,
        factory: &F,
    ) -> AdmissionResult<Self> {
        match config.delegation_sources()? {
            None => {
                info!("No policy source configured, using default pool only");
                let policy = DefaultPoolPolicy::from_config(config, host).map_err(|e| {
                    error!(
                        mem_limit = %config.default_pool_mem_limit,
                        error = %e,
                        "Unable to parse default pool mem limit"
                    );
                    e
                })?;
                Ok(Self::default_pool_only(policy))
            }
            Some(sources) => {
                info!(
                    allocation_path = %sources.allocation_path.display(),
                    site_path = ?sources.site_path,
                    "Policy source configured, delegating pool resolution"
                );
                let provider = factory
                    .instantiate(&sources)
                    .map_err(|e| handshake_failed(HandshakeStage::Instantiate, e.to_string()))?;
                Self::delegated(provider)
            }
        }
    }

    /// Resolver answering from the static default pool
    pub fn default_pool_only(policy: DefaultPoolPolicy) -> Self {
        Self {
            mode: ResolverMode::DefaultPoolOnly(policy),
        }
    }

    /// Resolver forwarding to `provider`
    ///
    /// The provider is started and must report ready; handshake failures are
    /// returned as fatal `ProviderHandshake` errors.
    pub fn delegated<P: ManagedPolicyProvider + 'static>(provider: P) -> AdmissionResult<Self> {
        provider
            .start()
            .map_err(|e| handshake_failed(HandshakeStage::Start, e.to_string()))?;
        if !provider.is_ready() {
            return Err(handshake_failed(
                HandshakeStage::Readiness,
                "provider reported not ready after start".into(),
            ));
        }
        info!("Policy provider started");

        let provider: Arc<dyn PolicyProvider> = Arc::new(provider);
        Ok(Self {
            mode: ResolverMode::Delegated(provider),
        })
    }

    #[inline]
    pub fn is_default_pool_only(&self) -> bool {
        matches!(self.mode, ResolverMode::DefaultPoolOnly(_))
    }

    /// Map a requested pool and user to the pool the request belongs to
    ///
    /// `has_access == false` is returned as `Ok`; only failures to reach the
    /// provider are errors.
    pub fn resolve_pool(&self, requested_pool: &str, user: &str) -> AdmissionResult<PoolResolution> {
        let span = span_lookup("resolve_pool", requested_pool, !self.is_default_pool_only());
        let _entered = span.enter();

        let result = match &self.mode {
            ResolverMode::DefaultPoolOnly(policy) => Ok(policy.resolve(requested_pool, user)),
            ResolverMode::Delegated(provider) => provider
                .resolve_pool(&ResolvePoolParams::new(requested_pool, user))
                .map_err(|e| AdmissionError::communication(ProviderOperation::ResolvePool, e)),
        };

        match &result {
            Ok(resolution) if resolution.has_access => span.record_outcome("granted"),
            Ok(_) => span.record_outcome("denied"),
            Err(e) => {
                span.record_outcome("error");
                warn!(requested_pool, user, error = %e, "Pool resolution failed");
            }
        }
        result
    }

    /// Quota limits for a pool
    pub fn get_pool_config(&self, pool: &str) -> AdmissionResult<PoolConfig> {
        let span = span_lookup("get_pool_config", pool, !self.is_default_pool_only());
        let _entered = span.enter();

        let result = match &self.mode {
            ResolverMode::DefaultPoolOnly(policy) => Ok(policy.config(pool)),
            ResolverMode::Delegated(provider) => provider
                .pool_config(&PoolConfigParams::new(pool))
                .map_err(|e| AdmissionError::communication(ProviderOperation::GetPoolConfig, e)),
        };

        match &result {
            Ok(_) => span.record_outcome("ok"),
            Err(e) => {
                span.record_outcome("error");
                warn!(pool, error = %e, "Pool config lookup failed");
            }
        }
        result
    }
}

impl std::fmt::Debug for AdmissionPolicyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("AdmissionPolicyResolver");
        match &self.mode {
            ResolverMode::DefaultPoolOnly(policy) => s.field("default_pool", policy),
            ResolverMode::Delegated(_) => s.field("delegated", &true),
        };
        s.finish()
    }
}

fn handshake_failed(stage: HandshakeStage, reason: String) -> AdmissionError {
    error!(stage = stage.as_str(), reason = %reason, "Policy provider handshake failed");
    AdmissionError::handshake(stage, reason)
}
