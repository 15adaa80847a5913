/*!
 * Monitoring Module
 * Tracing setup and lookup spans
 */

pub mod tracer;

pub use tracer::{init_tracing, span_lookup, LookupSpan};
