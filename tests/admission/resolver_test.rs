/*!
 * Resolver Tests
 * Default-pool-only mode behavior
 */

use pool_admission::{
    AdmissionConfig, AdmissionError, AdmissionPolicyResolver, DefaultPoolPolicy, HostMemory,
    MemSpecError, NoProviderFactory, PoolConfig, PoolResolution, DEFAULT_POOL_NAME,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;
use std::thread;

const HOST: HostMemory = HostMemory::new(16 * 1024 * 1024 * 1024);

fn default_resolver(mem_limit: &str, max_requests: i64, max_queued: i64) -> AdmissionPolicyResolver {
    let config = AdmissionConfig::new()
        .with_mem_limit(mem_limit)
        .with_max_requests(max_requests)
        .with_max_queued(max_queued);
    AdmissionPolicyResolver::new(&config, HOST, &NoProviderFactory).unwrap()
}

#[test]
fn test_default_mode_resolution() {
    let resolver = default_resolver("1g", 10, 5);
    assert!(resolver.is_default_pool_only());

    let resolution = resolver.resolve_pool("root.analytics", "alice").unwrap();
    assert_eq!(resolution, PoolResolution::granted(DEFAULT_POOL_NAME));
}

#[test]
fn test_percent_limit_without_host_memory_is_fatal() {
    let config = AdmissionConfig::new().with_mem_limit("50%");
    let err = AdmissionPolicyResolver::new(&config, HostMemory::new(0), &NoProviderFactory)
        .unwrap_err();
    assert!(matches!(
        err,
        AdmissionError::MemLimit(MemSpecError::PercentResolvesToZero { .. })
    ));
    assert!(err.is_fatal());
}

#[test]
fn test_default_mode_config() {
    let resolver = default_resolver("1g", 10, 5);
    assert_eq!(
        resolver.get_pool_config(DEFAULT_POOL_NAME).unwrap(),
        PoolConfig::new(10, 5, 1 << 30)
    );
}

#[test]
fn test_unset_mem_limit_normalized() {
    let resolver = default_resolver("", -1, 0);
    let config = resolver.get_pool_config(DEFAULT_POOL_NAME).unwrap();
    assert_eq!(config.mem_limit_bytes(), -1);
    assert_eq!(config.max_requests(), -1);
    assert_eq!(config.max_queued(), 0);
    assert!(config.is_unlimited());
}

#[test]
fn test_explicit_policy() {
    let policy = DefaultPoolPolicy::new("50%", 4, 4, HOST).unwrap();
    let resolver = AdmissionPolicyResolver::default_pool_only(policy);
    assert_eq!(
        resolver.get_pool_config("x").unwrap().mem_limit(),
        Some(8 * 1024 * 1024 * 1024)
    );
}

#[test]
fn test_concurrent_lookups() {
    let resolver = Arc::new(default_resolver("256m", 3, 9));
    let expected = resolver.get_pool_config("").unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let resolver = Arc::clone(&resolver);
            thread::spawn(move || {
                for j in 0..100 {
                    let pool = format!("pool-{}-{}", i, j);
                    let resolution = resolver.resolve_pool(&pool, "user").unwrap();
                    assert!(resolution.has_access);
                    assert_eq!(resolver.get_pool_config(&pool).unwrap(), expected);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

proptest! {
    #[test]
    fn prop_default_resolution_ignores_inputs(pool in ".*", user in ".*") {
        let resolver = default_resolver("", 1, 1);
        let resolution = resolver.resolve_pool(&pool, &user).unwrap();
        prop_assert_eq!(resolution.resolved_pool_name, DEFAULT_POOL_NAME);
        prop_assert!(resolution.has_access);
    }

    #[test]
    fn prop_default_config_ignores_pool(a in ".*", b in ".*") {
        let resolver = default_resolver("3m", 2, 0);
        prop_assert_eq!(
            resolver.get_pool_config(&a).unwrap(),
            resolver.get_pool_config(&b).unwrap()
        );
    }
}
