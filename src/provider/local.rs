/*!
 * Local Policy Provider
 * In-process pool table with per-pool ACLs and quotas
 *
 * Pool names are qualified under `root` ("etl" and "root.etl" name the same
 * pool). An empty requested pool is placed in `root.default`. Pools missing
 * from the table resolve with access denied and report the fallback config.
 */

use super::traits::{ManagedPolicyProvider, PolicyProvider, ProviderFactory};
use super::types::{PoolConfigParams, ProviderError, ProviderResult, ResolvePoolParams};
use crate::config::PolicySources;
use crate::core::limits::{ACL_WILDCARD, LOCAL_DEFAULT_POOL, ROOT_POOL};
use crate::pool::{PoolConfig, PoolResolution};
use ahash::RandomState;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// One pool in a policy table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolDefinition {
    pub name: String,
    /// Users allowed to submit; `*` admits everyone
    #[serde(default = "open_acl")]
    pub acl: Vec<String>,
    #[serde(default)]
    pub config: PoolConfig,
}

fn open_acl() -> Vec<String> {
    vec![ACL_WILDCARD.to_string()]
}

impl PoolDefinition {
    /// Pool open to every user
    pub fn new(name: impl Into<String>, config: PoolConfig) -> Self {
        Self {
            name: name.into(),
            acl: open_acl(),
            config,
        }
    }

    /// Restrict the pool to the given users
    pub fn with_acl<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.acl = users.into_iter().map(Into::into).collect();
        self
    }
}

/// Serializable pool table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyTable {
    pub pools: Vec<PoolDefinition>,
    /// Reported for pools missing from the table
    pub fallback: PoolConfig,
}

impl PolicyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool(mut self, pool: PoolDefinition) -> Self {
        self.pools.push(pool);
        self
    }

    pub fn with_fallback(mut self, fallback: PoolConfig) -> Self {
        self.fallback = fallback;
        self
    }

    /// Load a table from a JSON document
    pub fn from_json_file(path: &Path) -> ProviderResult<Self> {
        read_json(path)
    }
}

/// Qualify a pool name under the root pool
pub fn qualify_pool_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        LOCAL_DEFAULT_POOL.to_string()
    } else if name == ROOT_POOL || name.starts_with("root.") {
        name.to_string()
    } else {
        format!("{}.{}", ROOT_POOL, name)
    }
}

#[derive(Debug)]
struct PoolEntry {
    acl: HashSet<String, RandomState>,
    config: PoolConfig,
}

impl PoolEntry {
    fn admits(&self, user: &str) -> bool {
        self.acl.contains(ACL_WILDCARD) || self.acl.contains(user)
    }
}

#[derive(Debug, Default)]
struct PoolIndex {
    pools: HashMap<String, PoolEntry, RandomState>,
    fallback: PoolConfig,
}

impl From<PolicyTable> for PoolIndex {
    fn from(table: PolicyTable) -> Self {
        let pools = table
            .pools
            .into_iter()
            .map(|def| {
                let entry = PoolEntry {
                    acl: def.acl.into_iter().collect(),
                    config: def.config,
                };
                (qualify_pool_name(&def.name), entry)
            })
            .collect();
        Self {
            pools,
            fallback: table.fallback,
        }
    }
}

/// In-process provider backed by a `PolicyTable`
#[derive(Debug)]
pub struct LocalPolicyProvider {
    index: RwLock<PoolIndex>,
    started: AtomicBool,
}

impl LocalPolicyProvider {
    pub fn new(table: PolicyTable) -> Self {
        Self {
            index: RwLock::new(table.into()),
            started: AtomicBool::new(false),
        }
    }

    /// Replace the pool table; later lookups observe the new table
    pub fn reload(&self, table: PolicyTable) {
        let index = PoolIndex::from(table);
        info!(pools = index.pools.len(), "Policy table reloaded");
        *self.index.write() = index;
    }

    pub fn pool_count(&self) -> usize {
        self.index.read().pools.len()
    }

    fn ensure_started(&self) -> ProviderResult<()> {
        if self.started.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(ProviderError::NotStarted)
        }
    }
}

impl PolicyProvider for LocalPolicyProvider {
    fn resolve_pool(&self, params: &ResolvePoolParams) -> ProviderResult<PoolResolution> {
        self.ensure_started()?;
        let pool = qualify_pool_name(&params.requested_pool);
        let index = self.index.read();
        let has_access = index
            .pools
            .get(&pool)
            .is_some_and(|entry| entry.admits(&params.user));
        debug!(pool = %pool, user = %params.user, has_access, "Local pool resolution");
        Ok(PoolResolution {
            resolved_pool_name: pool,
            has_access,
        })
    }

    fn pool_config(&self, params: &PoolConfigParams) -> ProviderResult<PoolConfig> {
        self.ensure_started()?;
        let pool = qualify_pool_name(&params.pool);
        let index = self.index.read();
        Ok(index
            .pools
            .get(&pool)
            .map(|entry| entry.config)
            .unwrap_or(index.fallback))
    }
}

impl ManagedPolicyProvider for LocalPolicyProvider {
    fn start(&self) -> ProviderResult<()> {
        self.started.store(true, Ordering::Release);
        info!(pools = self.pool_count(), "Local policy provider started");
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }
}

/// Builds a `LocalPolicyProvider` from JSON policy sources
///
/// The allocation file holds a `PolicyTable`; the optional site file holds a
/// `PoolConfig` that overrides the table's fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalProviderFactory;

impl ProviderFactory for LocalProviderFactory {
    type Provider = LocalPolicyProvider;

    fn instantiate(&self, sources: &PolicySources) -> ProviderResult<LocalPolicyProvider> {
        let mut table = PolicyTable::from_json_file(&sources.allocation_path)?;
        if let Some(site_path) = &sources.site_path {
            table.fallback = read_json(site_path)?;
        }
        info!(
            allocation_path = %sources.allocation_path.display(),
            pools = table.pools.len(),
            "Loaded policy table"
        );
        Ok(LocalPolicyProvider::new(table))
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> ProviderResult<T> {
    let file = File::open(path).map_err(|e| {
        ProviderError::Unavailable(format!("cannot open {}: {}", path.display(), e))
    })?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| ProviderError::Malformed(format!("{}: {}", path.display(), e)))
}
