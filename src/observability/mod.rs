//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! discovery / routing / binding / context produce:
//!     → tracing events (structured fields, see logging.rs for setup)
//!     → metrics.rs (counters through the metrics facade)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Metrics are cheap (no recorder, no cost)

pub mod logging;
pub mod metrics;
