/*!
 * Pool Admission Library
 * Resolves requests to resource pools and the quota limits that govern them
 */

pub mod config;
pub mod core;
pub mod memspec;
pub mod monitoring;
pub mod pool;
pub mod provider;
pub mod resolver;

// Re-exports
pub use config::{AdmissionConfig, ConfigError, PolicySources};
pub use crate::core::errors::{AdmissionError, AdmissionResult, HandshakeStage, ProviderOperation};
pub use crate::core::limits::DEFAULT_POOL_NAME;
pub use memspec::{parse_mem_spec, HostMemory, MemSpec, MemSpecError};
pub use monitoring::init_tracing;
pub use pool::{DefaultPoolPolicy, PoolConfig, PoolResolution};
pub use provider::{
    LocalPolicyProvider, LocalProviderFactory, ManagedPolicyProvider, NoProviderFactory,
    PolicyProvider, ProviderError, ProviderFactory,
};
pub use resolver::AdmissionPolicyResolver;
