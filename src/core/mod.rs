/*!
 * Core Module
 * Fundamental admission types, constants and error handling
 */

pub mod errors;
pub mod limits;

// Re-export for convenience
pub use errors::*;
pub use limits::*;
