/*!
 * Configuration Tests
 * Environment loading and mode switch validation
 */

use pool_admission::config::{
    ENV_ALLOCATION_PATH, ENV_MAX_QUEUED, ENV_MAX_REQUESTS, ENV_MEM_LIMIT, ENV_SITE_PATH,
};
use pool_admission::{
    AdmissionConfig, AdmissionError, AdmissionPolicyResolver, ConfigError, HostMemory,
    NoProviderFactory,
};
use serial_test::serial;
use std::path::PathBuf;

const ALL_VARS: [&str; 5] = [
    ENV_ALLOCATION_PATH,
    ENV_SITE_PATH,
    ENV_MAX_REQUESTS,
    ENV_MAX_QUEUED,
    ENV_MEM_LIMIT,
];

/// Sets variables for the duration of a test and clears them afterwards
struct EnvGuard;

impl EnvGuard {
    fn set(vars: &[(&str, &str)]) -> Self {
        for var in ALL_VARS {
            std::env::remove_var(var);
        }
        for (key, value) in vars {
            std::env::set_var(key, value);
        }
        EnvGuard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in ALL_VARS {
            std::env::remove_var(var);
        }
    }
}

#[test]
#[serial]
fn test_from_env_defaults() {
    let _env = EnvGuard::set(&[]);
    let config = AdmissionConfig::from_env().unwrap();
    assert_eq!(config, AdmissionConfig::default());
}

#[test]
#[serial]
fn test_from_env_default_pool_settings() {
    let _env = EnvGuard::set(&[
        (ENV_MAX_REQUESTS, "12"),
        (ENV_MAX_QUEUED, "100"),
        (ENV_MEM_LIMIT, "2g"),
    ]);
    let config = AdmissionConfig::from_env().unwrap();
    assert_eq!(config.default_pool_max_requests, 12);
    assert_eq!(config.default_pool_max_queued, 100);
    assert_eq!(config.default_pool_mem_limit, "2g");

    let resolver =
        AdmissionPolicyResolver::new(&config, HostMemory::new(1 << 34), &NoProviderFactory)
            .unwrap();
    let pool = resolver.get_pool_config("any").unwrap();
    assert_eq!(pool.max_requests(), 12);
    assert_eq!(pool.max_queued(), 100);
    assert_eq!(pool.mem_limit_bytes(), 2 << 30);
}

#[test]
#[serial]
fn test_from_env_site_without_allocation() {
    let _env = EnvGuard::set(&[(ENV_SITE_PATH, "/etc/site.json")]);
    assert_eq!(
        AdmissionConfig::from_env().unwrap_err(),
        ConfigError::SitePathWithoutAllocation
    );
}

#[test]
#[serial]
fn test_from_env_paths() {
    let _env = EnvGuard::set(&[
        (ENV_ALLOCATION_PATH, "/etc/pools.json"),
        (ENV_SITE_PATH, "/etc/site.json"),
    ]);
    let config = AdmissionConfig::from_env().unwrap();
    let sources = config.delegation_sources().unwrap().unwrap();
    assert_eq!(sources.allocation_path, PathBuf::from("/etc/pools.json"));
    assert_eq!(sources.site_path, Some(PathBuf::from("/etc/site.json")));
}

#[test]
fn test_inconsistent_paths_fatal_at_construction() {
    // Built programmatically, so validation happens in the resolver
    let config = AdmissionConfig::new().with_site_path("/etc/site.json");
    let err = AdmissionPolicyResolver::new(&config, HostMemory::new(1 << 30), &NoProviderFactory)
        .unwrap_err();
    assert!(matches!(
        err,
        AdmissionError::Configuration(ConfigError::SitePathWithoutAllocation)
    ));
    assert!(err.is_fatal());
}

#[test]
fn test_config_serde() {
    let config: AdmissionConfig =
        serde_json::from_str(r#"{"default_pool_mem_limit": "75%"}"#).unwrap();
    assert_eq!(config.default_pool_mem_limit, "75%");
    assert_eq!(config.default_pool_max_requests, -1);
    assert_eq!(config.fair_scheduler_allocation_path, None);
}
