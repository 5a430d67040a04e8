//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registration and dispatch produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (dispatch and registration counters)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields (prefix, method, path) instead of formatted strings
//! - Metric updates are no-ops until an exporter is installed, so the
//!   routing core can record unconditionally

pub mod logging;
pub mod metrics;
