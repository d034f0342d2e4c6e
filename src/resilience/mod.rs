//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound call (HTTP quote, RPC send, balance read):
//!     → retries.rs (fixed-delay retry for transient server errors)
//! Between steps:
//!     → delay.rs (random pauses that end early on shutdown)
//! ```
//!
//! # Design Decisions
//! - Retries are opt-in per call site; most failures are logged and the
//!   cycle moves on
//! - The retry delay is constant, not exponential

pub mod delay;
pub mod retries;

pub use delay::{random_delay, sleep_or_shutdown};
pub use retries::{is_server_error, retry_fixed};
