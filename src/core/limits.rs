/*!
 * Admission Limits and Constants
 *
 * Centralized location for pool names, sentinel values and unit multipliers.
 * Organized by domain for maintainability and discoverability.
 */

use std::time::Duration;

// =============================================================================
// POOL NAMES
// =============================================================================

/// Pool name used when no external policy source is configured
pub const DEFAULT_POOL_NAME: &str = "default-pool";

/// Root of the qualified pool hierarchy served by the local provider
pub const ROOT_POOL: &str = "root";

/// Pool the local provider places requests into when none was requested
pub const LOCAL_DEFAULT_POOL: &str = "root.default";

/// ACL entry granting access to every user
pub const ACL_WILDCARD: &str = "*";

// =============================================================================
// QUOTA SENTINELS
// =============================================================================

/// Negative limit meaning "no limit" for requests and memory
pub const UNLIMITED: i64 = -1;

/// Default concurrency limit for the default pool (unlimited)
pub const DEFAULT_MAX_REQUESTS: i64 = UNLIMITED;

/// Default queue depth for the default pool
/// Zero rejects requests as soon as the concurrency limit is reached
pub const DEFAULT_MAX_QUEUED: i64 = 0;

// =============================================================================
// MEMORY UNITS
// =============================================================================

/// Bytes per megabyte (2^20)
pub const MIB: f64 = 1024.0 * 1024.0;

/// Bytes per gigabyte (2^30)
pub const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Largest accepted percentage of physical memory
pub const MAX_MEM_PERCENT: i64 = 100;

// =============================================================================
// PROVIDER BOUNDARY
// =============================================================================

/// Delegated lookups slower than this are logged as warnings
pub const SLOW_LOOKUP_THRESHOLD: Duration = Duration::from_millis(50);

/// Version byte prefixed to every bridge frame
pub const BRIDGE_FORMAT_VERSION: u8 = 1;
