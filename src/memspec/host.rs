/*!
 * Host Memory
 * Total physical memory, queried once and injected where percentages are resolved
 */

use sysinfo::System;
use tracing::{info, warn};

/// Physical memory of the host the resolver runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostMemory {
    total_bytes: u64,
}

impl HostMemory {
    /// Use a known total (tests, containers with an explicit budget)
    pub const fn new(total_bytes: u64) -> Self {
        Self { total_bytes }
    }

    /// Query the operating system for total physical memory
    pub fn detect() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        let total_bytes = sys.total_memory();

        if total_bytes == 0 {
            warn!("Physical memory size unavailable; percentage limits will be rejected");
        } else {
            info!(total_bytes, "Detected physical memory");
        }

        Self { total_bytes }
    }

    #[inline]
    pub const fn total_bytes(&self) -> u64 {
        self.total_bytes
    }
}
