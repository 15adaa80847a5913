/*!
 * Admission Configuration
 *
 * Startup parameters read once from the environment. The presence of an
 * external policy source is the sole switch between default-pool-only and
 * provider-delegated resolution.
 *
 * Environment variables:
 * - POOL_ADMISSION_FAIR_SCHEDULER_ALLOCATION_PATH: allocation file for the policy source
 * - POOL_ADMISSION_LLAMA_SITE_PATH: site file refining the allocation (requires the above)
 * - POOL_ADMISSION_DEFAULT_POOL_MAX_REQUESTS: concurrent request limit (default: -1, no limit)
 * - POOL_ADMISSION_DEFAULT_POOL_MAX_QUEUED: queue depth (default: 0, reject once full)
 * - POOL_ADMISSION_DEFAULT_POOL_MEM_LIMIT: memory spec (default: unset, no limit)
 */

use crate::core::limits::{DEFAULT_MAX_QUEUED, DEFAULT_MAX_REQUESTS};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_ALLOCATION_PATH: &str = "POOL_ADMISSION_FAIR_SCHEDULER_ALLOCATION_PATH";
pub const ENV_SITE_PATH: &str = "POOL_ADMISSION_LLAMA_SITE_PATH";
pub const ENV_MAX_REQUESTS: &str = "POOL_ADMISSION_DEFAULT_POOL_MAX_REQUESTS";
pub const ENV_MAX_QUEUED: &str = "POOL_ADMISSION_DEFAULT_POOL_MAX_QUEUED";
pub const ENV_MEM_LIMIT: &str = "POOL_ADMISSION_DEFAULT_POOL_MEM_LIMIT";

/// Configuration errors, fatal at startup
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("llama site path is set but fair scheduler allocation path is not")]
    #[diagnostic(
        code(config::site_without_allocation),
        help("Set POOL_ADMISSION_FAIR_SCHEDULER_ALLOCATION_PATH or unset POOL_ADMISSION_LLAMA_SITE_PATH.")
    )]
    SitePathWithoutAllocation,

    #[error("{var}={value:?} is not a valid integer")]
    #[diagnostic(code(config::invalid_integer))]
    InvalidInteger { var: &'static str, value: String },
}

/// Locations of the external policy source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySources {
    pub allocation_path: PathBuf,
    pub site_path: Option<PathBuf>,
}

/// Admission configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionConfig {
    pub fair_scheduler_allocation_path: Option<PathBuf>,
    pub llama_site_path: Option<PathBuf>,
    /// Ignored when a policy source is configured
    pub default_pool_max_requests: i64,
    /// Ignored when a policy source is configured
    pub default_pool_max_queued: i64,
    /// Ignored when a policy source is configured
    pub default_pool_mem_limit: String,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            fair_scheduler_allocation_path: None,
            llama_site_path: None,
            default_pool_max_requests: DEFAULT_MAX_REQUESTS,
            default_pool_max_queued: DEFAULT_MAX_QUEUED,
            default_pool_mem_limit: String::new(),
        }
    }
}

impl AdmissionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let path = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        let int = |key: &'static str, default: i64| -> Result<i64, ConfigError> {
            match lookup(key) {
                None => Ok(default),
                Some(raw) => {
                    let value = raw.to_string_lossy();
                    let trimmed = value.trim();
                    if trimmed.is_empty() {
                        return Ok(default);
                    }
                    trimmed.parse().map_err(|_| ConfigError::InvalidInteger {
                        var: key,
                        value: value.to_string(),
                    })
                }
            }
        };

        let config = Self {
            fair_scheduler_allocation_path: path(ENV_ALLOCATION_PATH),
            llama_site_path: path(ENV_SITE_PATH),
            default_pool_max_requests: int(ENV_MAX_REQUESTS, DEFAULT_MAX_REQUESTS)?,
            default_pool_max_queued: int(ENV_MAX_QUEUED, DEFAULT_MAX_QUEUED)?,
            default_pool_mem_limit: lookup(ENV_MEM_LIMIT)
                .map(|v| v.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_allocation_path(mut self, path: impl AsRef<Path>) -> Self {
        self.fair_scheduler_allocation_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_site_path(mut self, path: impl AsRef<Path>) -> Self {
        self.llama_site_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_max_requests(mut self, max_requests: i64) -> Self {
        self.default_pool_max_requests = max_requests;
        self
    }

    pub fn with_max_queued(mut self, max_queued: i64) -> Self {
        self.default_pool_max_queued = max_queued;
        self
    }

    pub fn with_mem_limit(mut self, spec: impl Into<String>) -> Self {
        self.default_pool_mem_limit = spec.into();
        self
    }

    /// Check path flag consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llama_site_path.is_some() && self.fair_scheduler_allocation_path.is_none() {
            return Err(ConfigError::SitePathWithoutAllocation);
        }
        Ok(())
    }

    /// External policy source, if one is configured
    pub fn delegation_sources(&self) -> Result<Option<PolicySources>, ConfigError> {
        self.validate()?;
        Ok(self
            .fair_scheduler_allocation_path
            .as_ref()
            .map(|allocation_path| PolicySources {
                allocation_path: allocation_path.clone(),
                site_path: self.llama_site_path.clone(),
            }))
    }
}
