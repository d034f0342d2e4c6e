//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → in-flight waits end early → the runner stops before the next
//!     account, task or cycle → Exit
//! ```
//!
//! # Design Decisions
//! - A transaction already broadcast is still awaited; only sleeps are cut short
//! - Shutdown is sticky: tasks that check after the signal still see it

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::spawn_signal_listener;
