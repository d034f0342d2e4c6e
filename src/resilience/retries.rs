//! Retry logic.
//!
//! # Responsibilities
//! - Re-run an operation a fixed number of times with a constant pause
//! - Stop early when the error is not worth retrying
//!
//! # Design Decisions
//! - Only transient upstream failures are retried; reverts and bad input fail fast
//! - Every failed attempt is logged as `attempt/max`

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Run `op` up to `attempts` times, sleeping `delay` between failures.
///
/// Returns the first success, the first non-retryable error, or the last
/// error once attempts are exhausted.
pub async fn retry_fixed<T, E, F, Fut, P>(
    attempts: u32,
    delay: Duration,
    label: &str,
    mut op: F,
    is_retryable: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    P: Fn(&E) -> bool,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::warn!(
                    attempt = format!("{}/{}", attempt, attempts),
                    error = %e,
                    "{} failed",
                    label
                );
                if attempt >= attempts || !is_retryable(&e) {
                    return Err(e);
                }
                attempt += 1;
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Whether an error looks like a transient server-side failure.
pub fn is_server_error<E: Display>(err: &E) -> bool {
    let message = err.to_string();
    let lower = message.to_lowercase();

    message.contains("SERVER_ERROR")
        || message.contains("503")
        || lower.contains("bad response")
        || (500..600).any(|code| message.contains(&format!("status {}", code)))
        || (500..600).any(|code| message.contains(&format!("HTTP {}", code)))
}
