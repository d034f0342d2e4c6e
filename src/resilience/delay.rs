//! Randomized pauses between transactions.

use std::time::Duration;

use rand::Rng;

use crate::lifecycle::Shutdown;

/// Uniform delay in `[min_secs, max_secs]` with millisecond resolution.
pub fn random_delay(min_secs: u64, max_secs: u64) -> Duration {
    let lo = min_secs.saturating_mul(1000);
    let hi = max_secs.saturating_mul(1000).max(lo);
    Duration::from_millis(rand::thread_rng().gen_range(lo..=hi))
}

/// Sleep for `duration` unless shutdown fires first.
///
/// Returns `false` when the sleep was cut short.
pub async fn sleep_or_shutdown(duration: Duration, shutdown: &Shutdown) -> bool {
    if shutdown.is_triggered() {
        return false;
    }
    tokio::select! {
        _ = tokio::time::sleep(duration) => true,
        _ = shutdown.wait() => false,
    }
}
