/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export subsystem errors so callers can match on one path
pub use crate::config::ConfigError;
pub use crate::memspec::MemSpecError;
pub use crate::provider::ProviderError;

/// Result type for resolver operations
pub type AdmissionResult<T> = Result<T, AdmissionError>;

/// Stage of the provider startup handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandshakeStage {
    Instantiate,
    Start,
    Readiness,
}

impl HandshakeStage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Instantiate => "instantiate",
            Self::Start => "start",
            Self::Readiness => "readiness",
        }
    }
}

impl std::fmt::Display for HandshakeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolver operation that reached the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderOperation {
    ResolvePool,
    GetPoolConfig,
}

impl ProviderOperation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ResolvePool => "resolve_pool",
            Self::GetPoolConfig => "get_pool_config",
        }
    }
}

impl std::fmt::Display for ProviderOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified admission error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum AdmissionError {
    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Configuration(#[from] ConfigError),

    #[error("Invalid default pool memory limit: {0}")]
    #[diagnostic(
        code(admission::invalid_mem_limit),
        help("Use '<int>[bB]', '<float>[mM]', '<float>[gG]' or '<int>%'. Leave unset for no limit.")
    )]
    MemLimit(#[from] MemSpecError),

    #[error("Policy provider failed during {stage}: {reason}")]
    #[diagnostic(
        code(admission::provider_handshake),
        help("The policy source could not be brought up. Check the allocation and site files.")
    )]
    ProviderHandshake {
        stage: HandshakeStage,
        reason: String,
    },

    #[error("Policy provider call {operation} failed: {source}")]
    #[diagnostic(
        code(admission::provider_communication),
        help("The request should be rejected or retried. Other requests are unaffected.")
    )]
    ProviderCommunication {
        operation: ProviderOperation,
        #[source]
        source: ProviderError,
    },
}

impl AdmissionError {
    /// Errors that can only occur while the resolver is being built
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::ProviderCommunication { .. })
    }

    /// Per-call failures that the scheduler may retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ProviderCommunication { .. })
    }

    pub(crate) fn handshake(stage: HandshakeStage, reason: impl Into<String>) -> Self {
        Self::ProviderHandshake {
            stage,
            reason: reason.into(),
        }
    }

    pub(crate) fn communication(operation: ProviderOperation, source: ProviderError) -> Self {
        Self::ProviderCommunication { operation, source }
    }
}
