/*!
 * Memory Spec Module
 * Human-readable memory limits and host memory lookup
 */

pub mod host;
pub mod parser;

// Re-export public API
pub use host::HostMemory;
pub use parser::{parse_mem_spec, MemSpec, MemSpecError};
