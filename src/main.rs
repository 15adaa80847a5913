/*!
 * Pool Resolver - Main Entry Point
 *
 * Resolves one request against the configured admission policy:
 *   pool-resolver <pool> <user>
 *
 * Configuration is read from POOL_ADMISSION_* environment variables.
 * Exits 1 on usage or startup errors and 2 when the user is denied access.
 * An empty <pool> ("") requests placement by the policy.
 */

use pool_admission::{
    init_tracing, AdmissionConfig, AdmissionPolicyResolver, HostMemory, LocalProviderFactory,
};
use serde_json::json;
use tracing::info;

const USAGE: &str = "usage: pool-resolver <pool> <user>";

/// Exactly two positional arguments: requested pool and user
fn parse_args<I>(args: I) -> miette::Result<(String, String)>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    match (args.next(), args.next(), args.next()) {
        (Some(pool), Some(user), None) => Ok((pool, user)),
        _ => Err(miette::miette!("{}", USAGE)),
    }
}

fn main() -> miette::Result<()> {
    init_tracing();

    let (pool, user) = parse_args(std::env::args().skip(1))?;

    info!("Loading admission configuration...");
    let config = AdmissionConfig::from_env()?;

    let host = HostMemory::detect();
    let resolver = AdmissionPolicyResolver::new(&config, host, &LocalProviderFactory)?;
    info!(
        default_pool_only = resolver.is_default_pool_only(),
        "Admission policy resolver ready"
    );

    let resolution = resolver.resolve_pool(&pool, &user)?;
    let pool_config = resolver.get_pool_config(&resolution.resolved_pool_name)?;

    let report = json!({
        "requested_pool": pool,
        "user": user,
        "resolution": resolution,
        "config": pool_config,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&report).map_err(|e| miette::miette!("{}", e))?
    );

    if !resolution.has_access {
        std::process::exit(2);
    }
    Ok(())
}
