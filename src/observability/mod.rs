//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (transaction and cycle counters, balance gauges)
//!
//! Consumers:
//!     → stdout (tracing fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Log lines carry the wallet address and task name as structured fields
//! - Metrics are recorded unconditionally; without an installed exporter they are no-ops

pub mod logging;
pub mod metrics;
