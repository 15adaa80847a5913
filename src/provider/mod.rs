/*!
 * Policy Provider Module
 * Boundary to external pool resolution sources
 *
 * The resolver talks to providers only through `PolicyProvider`. Bridge
 * mechanics (marshaling, foreign runtime lifecycle) stay behind
 * `PolicyTransport`; `LocalPolicyProvider` serves the same contract in-process.
 */

pub mod bridge;
pub mod local;
pub mod traits;
pub mod types;

// Re-export public API
pub use bridge::{BridgeMethod, BridgeProviderFactory, BridgedPolicyProvider, PolicyTransport};
pub use local::{LocalPolicyProvider, LocalProviderFactory, PolicyTable, PoolDefinition};
pub use traits::{ManagedPolicyProvider, NoProviderFactory, PolicyProvider, ProviderFactory};
pub use types::{PoolConfigParams, ProviderError, ProviderResult, ResolvePoolParams};
