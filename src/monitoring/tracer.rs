/*!
 * Lookup Tracing
 * Structured tracing for pool resolution and quota lookups
 */

use crate::core::limits::SLOW_LOOKUP_THRESHOLD;
use std::time::Instant;
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - POOL_ADMISSION_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("POOL_ADMISSION_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    // try_init: embedding schedulers may already own the global subscriber
    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_names(true)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        info!(json = use_json, "Structured tracing initialized");
    }
}

/// Span around one resolver lookup
///
/// Logs completion on drop; delegated lookups slower than
/// `SLOW_LOOKUP_THRESHOLD` are logged as warnings.
pub struct LookupSpan {
    span: tracing::Span,
    start: Instant,
    operation: &'static str,
    delegated: bool,
}

impl LookupSpan {
    pub fn new(operation: &'static str, pool: &str, delegated: bool) -> Self {
        let span = span!(
            Level::DEBUG,
            "pool_lookup",
            operation,
            pool,
            delegated,
            outcome = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );
        Self {
            span,
            start: Instant::now(),
            operation,
            delegated,
        }
    }

    pub fn record_outcome(&self, outcome: &str) {
        self.span.record("outcome", outcome);
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for LookupSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let _entered = self.span.enter();
        self.span.record("duration_us", duration.as_micros() as u64);

        if self.delegated && duration > SLOW_LOOKUP_THRESHOLD {
            warn!(
                operation = self.operation,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow policy provider lookup"
            );
        } else {
            debug!(
                operation = self.operation,
                duration_us = duration.as_micros() as u64,
                "lookup completed"
            );
        }
    }
}

#[inline]
pub fn span_lookup(operation: &'static str, pool: &str, delegated: bool) -> LookupSpan {
    LookupSpan::new(operation, pool, delegated)
}
