/*!
 * Provider Types
 * Request payloads and errors exchanged with a policy provider
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for provider calls
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Failures inside the provider boundary
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ProviderError {
    #[error("policy source unavailable: {0}")]
    #[diagnostic(code(provider::unavailable))]
    Unavailable(String),

    #[error("malformed policy source response: {0}")]
    #[diagnostic(code(provider::malformed))]
    Malformed(String),

    #[error("policy source not started")]
    #[diagnostic(code(provider::not_started))]
    NotStarted,

    #[error("policy source error: {0}")]
    #[diagnostic(code(provider::internal))]
    Internal(String),
}

/// Pool resolution request, keyed by (user, pool)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvePoolParams {
    pub user: String,
    pub requested_pool: String,
}

impl ResolvePoolParams {
    pub fn new(requested_pool: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            requested_pool: requested_pool.into(),
        }
    }
}

/// Pool configuration request, keyed by pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfigParams {
    pub pool: String,
}

impl PoolConfigParams {
    pub fn new(pool: impl Into<String>) -> Self {
        Self { pool: pool.into() }
    }
}
