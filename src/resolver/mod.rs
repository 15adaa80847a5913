/*!
 * Resolver Module
 * Admission policy façade consumed by the scheduler
 */

pub mod admission;

// Re-export public API
pub use admission::AdmissionPolicyResolver;
