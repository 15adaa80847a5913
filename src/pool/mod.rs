/*!
 * Pool Module
 * Resource pool data model and the static default policy
 */

pub mod default;
pub mod types;

// Re-export public API
pub use default::DefaultPoolPolicy;
pub use types::{PoolConfig, PoolResolution};
