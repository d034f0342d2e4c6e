//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (percentages, delays, attempts)
//! - Check that URLs parse before any network call is made
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>

use std::fmt;
use std::time::Duration;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn push(errors: &mut Vec<ValidationError>, field: &'static str, message: impl Into<String>) {
    errors.push(ValidationError {
        field,
        message: message.into(),
    });
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let [pmin, pmax] = config.amounts.percent_range;
    if !(pmin > 0.0 && pmin <= pmax && pmax <= 100.0) {
        push(
            &mut errors,
            "amounts.percent_range",
            format!("expected 0 < min <= max <= 100, got [{}, {}]", pmin, pmax),
        );
    }

    let [smin, smax] = config.amounts.send_range;
    if !(smin > 0.0 && smin <= smax) {
        push(
            &mut errors,
            "amounts.send_range",
            format!("expected 0 < min <= max, got [{}, {}]", smin, smax),
        );
    }

    if config.delays.cycle_min_secs > config.delays.cycle_max_secs {
        push(&mut errors, "delays.cycle_min_secs", "must not exceed cycle_max_secs");
    }

    if config.retries.max_attempts == 0 {
        push(&mut errors, "retries.max_attempts", "must be at least 1");
    }

    if config.schedule.cycles == 0 {
        push(&mut errors, "schedule.cycles", "must be at least 1");
    }

    if let Some(hours) = config.schedule.interval_hours {
        if hours < 0.0 || Duration::try_from_secs_f64(hours * 3600.0).is_err() {
            push(
                &mut errors,
                "schedule.interval_hours",
                "must be a non-negative number of hours (0 disables repetition)",
            );
        }
    }

    if config.chain.chain_id == 0 {
        push(&mut errors, "chain.chain_id", "must not be 0");
    }

    for url in config.chain.all_urls() {
        if let Err(e) = url.parse::<url::Url>() {
            push(&mut errors, "chain.rpc_url", format!("invalid URL '{}': {}", url, e));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
