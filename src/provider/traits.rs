/*!
 * Policy Provider Traits
 * Interface definitions for external pool resolution sources
 */

use super::types::{PoolConfigParams, ProviderResult, ResolvePoolParams};
use crate::config::PolicySources;
use crate::pool::{PoolConfig, PoolResolution};

/// Richer pool resolution and quota lookup source
///
/// Calls are synchronous and may block for the duration of the lookup.
/// Implementations must be safe to call from many threads at once.
pub trait PolicyProvider: Send + Sync {
    /// Map a requested pool and user to an actual pool and access decision
    fn resolve_pool(&self, params: &ResolvePoolParams) -> ProviderResult<PoolResolution>;

    /// Quota limits for a pool
    fn pool_config(&self, params: &PoolConfigParams) -> ProviderResult<PoolConfig>;
}

/// Provider with a startup lifecycle
pub trait ManagedPolicyProvider: PolicyProvider {
    /// Begin serving lookups
    fn start(&self) -> ProviderResult<()>;

    /// Whether lookups can be served
    fn is_ready(&self) -> bool {
        true
    }
}

/// Creates providers from configured policy sources
pub trait ProviderFactory {
    type Provider: ManagedPolicyProvider + 'static;

    fn instantiate(&self, sources: &PolicySources) -> ProviderResult<Self::Provider>;
}

/// Factory for processes that never delegate
///
/// Instantiation always fails, so configuring policy sources with this
/// factory is a startup error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProviderFactory;

/// Provider type of `NoProviderFactory`; cannot be constructed
#[derive(Debug)]
pub enum NoProvider {}

impl PolicyProvider for NoProvider {
    fn resolve_pool(&self, _params: &ResolvePoolParams) -> ProviderResult<PoolResolution> {
        match *self {}
    }

    fn pool_config(&self, _params: &PoolConfigParams) -> ProviderResult<PoolConfig> {
        match *self {}
    }
}

impl ManagedPolicyProvider for NoProvider {
    fn start(&self) -> ProviderResult<()> {
        match *self {}
    }
}

impl ProviderFactory for NoProviderFactory {
    type Provider = NoProvider;

    fn instantiate(&self, sources: &PolicySources) -> ProviderResult<NoProvider> {
        Err(super::ProviderError::Unavailable(format!(
            "no policy provider available for {}",
            sources.allocation_path.display()
        )))
    }
}
