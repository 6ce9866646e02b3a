//! Error types for the Rust Loan Engine
//!
//! This module defines the per-item error taxonomy for batch simulation
//! processing. Every error carries the offending request's email so a batch
//! error list can be diagnosed without aborting sibling items.
//!
//! # Error Categories
//!
//! - **Validation Errors**: Structurally invalid requests, rejected before any I/O
//! - **Rate Errors**: No configured tier covers the applicant's age, or the tier
//!   set itself cannot be fetched/validated
//! - **Calculation Errors**: Arithmetic precondition failures (degenerate rate,
//!   overflow)
//! - **Downstream Errors**: Persistence, cache-write and notification failures,
//!   reported but non-fatal to the item's computed result
//! - **Timeout Errors**: A single item exceeded its processing deadline

use std::time::Duration;
use thiserror::Error;

/// Main error type for the loan-simulation engine
///
/// This enum represents all per-item errors that can occur while a batch is
/// processed. Each variant includes relevant context to help diagnose and
/// resolve the issue. None of these errors abort the batch; they are collected
/// into the batch's error list alongside the successes of sibling items.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Request failed structural validation
    ///
    /// The request never reached rate resolution or calculation.
    /// `violations` joins every failed check, not just the first one.
    #[error("Invalid simulation request for {email}: {violations}")]
    Validation {
        /// Email identifying the offending request
        email: String,
        /// All violation messages, joined with "; "
        violations: String,
    },

    /// No configured rate tier covers the applicant's derived age
    ///
    /// This is a recoverable error - only this item is aborted.
    #[error("rate not found for age {age} (applicant {email})")]
    RateNotFound {
        /// Email identifying the offending request
        email: String,
        /// The derived age that no tier covers
        age: i32,
    },

    /// Amortization arithmetic failed a precondition
    ///
    /// Typically a degenerate rate producing a zero or negative
    /// denominator, or an overflow in the growth exponentiation.
    #[error("Calculation failed for {email}: {reason}")]
    Calculation {
        /// Email identifying the offending request
        email: String,
        /// Description of the arithmetic failure
        reason: String,
    },

    /// The store rejected the computed simulation
    ///
    /// Non-fatal: the item still emits its computed result, and this
    /// error is reported alongside it.
    #[error("Failed to persist simulation for {email}: {cause}")]
    Persistence {
        /// Email identifying the affected request
        email: String,
        /// Description of the store failure
        cause: String,
    },

    /// The mailer rejected the simulation notification
    ///
    /// Non-fatal: notification is best-effort by design.
    #[error("Failed to notify {email}: {cause}")]
    Notification {
        /// Email identifying the affected request
        email: String,
        /// Description of the mail failure
        cause: String,
    },

    /// The cache rejected the simulation snapshot write
    ///
    /// Non-fatal: the item still emits its computed result. Cache *read*
    /// failures never produce this error; they degrade to a miss.
    #[error("Failed to cache simulation for {email}: {cause}")]
    CacheWrite {
        /// Email identifying the affected request
        email: String,
        /// Description of the cache failure
        cause: String,
    },

    /// The item exceeded its processing deadline
    ///
    /// A hanging downstream call cannot stall the whole batch; the item is
    /// abandoned and reported with this error.
    #[error("Simulation for {email} timed out after {limit:?}")]
    Timeout {
        /// Email identifying the affected request
        email: String,
        /// The configured per-item deadline
        limit: Duration,
    },

    /// The rate-tier set could not be fetched or failed validation
    ///
    /// This is the only batch-wide condition: it is replicated once per
    /// item, so every item in the batch fails identically.
    #[error("Rate tiers unavailable for {email}: {cause}")]
    TiersUnavailable {
        /// Email identifying the affected request
        email: String,
        /// Description of the provider or validation failure
        cause: String,
    },
}

// Helper functions for creating common errors

impl SimulationError {
    /// Create a Validation error from an accumulated violation list
    pub fn validation(email: &str, violations: Vec<String>) -> Self {
        SimulationError::Validation {
            email: email.to_string(),
            violations: violations.join("; "),
        }
    }

    /// Create a RateNotFound error
    pub fn rate_not_found(email: &str, age: i32) -> Self {
        SimulationError::RateNotFound {
            email: email.to_string(),
            age,
        }
    }

    /// Create a Calculation error
    pub fn calculation(email: &str, reason: &str) -> Self {
        SimulationError::Calculation {
            email: email.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a Persistence error
    pub fn persistence(email: &str, cause: &str) -> Self {
        SimulationError::Persistence {
            email: email.to_string(),
            cause: cause.to_string(),
        }
    }

    /// Create a Notification error
    pub fn notification(email: &str, cause: &str) -> Self {
        SimulationError::Notification {
            email: email.to_string(),
            cause: cause.to_string(),
        }
    }

    /// Create a CacheWrite error
    pub fn cache_write(email: &str, cause: &str) -> Self {
        SimulationError::CacheWrite {
            email: email.to_string(),
            cause: cause.to_string(),
        }
    }

    /// Create a Timeout error
    pub fn timeout(email: &str, limit: Duration) -> Self {
        SimulationError::Timeout {
            email: email.to_string(),
            limit,
        }
    }

    /// Create a TiersUnavailable error
    pub fn tiers_unavailable(email: &str, cause: &str) -> Self {
        SimulationError::TiersUnavailable {
            email: email.to_string(),
            cause: cause.to_string(),
        }
    }

    /// Email of the request this error belongs to
    ///
    /// Every variant carries the offending request's email; this accessor
    /// lets aggregation and reporting code treat the taxonomy uniformly.
    pub fn email(&self) -> &str {
        match self {
            SimulationError::Validation { email, .. }
            | SimulationError::RateNotFound { email, .. }
            | SimulationError::Calculation { email, .. }
            | SimulationError::Persistence { email, .. }
            | SimulationError::Notification { email, .. }
            | SimulationError::CacheWrite { email, .. }
            | SimulationError::Timeout { email, .. }
            | SimulationError::TiersUnavailable { email, .. } => email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::validation(
        SimulationError::Validation { email: "a@b.com".to_string(), violations: "loan amount must be greater than zero; birth date is required".to_string() },
        "Invalid simulation request for a@b.com: loan amount must be greater than zero; birth date is required"
    )]
    #[case::rate_not_found(
        SimulationError::RateNotFound { email: "a@b.com".to_string(), age: 17 },
        "rate not found for age 17 (applicant a@b.com)"
    )]
    #[case::calculation(
        SimulationError::Calculation { email: "a@b.com".to_string(), reason: "non-positive amortization denominator".to_string() },
        "Calculation failed for a@b.com: non-positive amortization denominator"
    )]
    #[case::persistence(
        SimulationError::Persistence { email: "a@b.com".to_string(), cause: "store offline".to_string() },
        "Failed to persist simulation for a@b.com: store offline"
    )]
    #[case::notification(
        SimulationError::Notification { email: "a@b.com".to_string(), cause: "smtp refused".to_string() },
        "Failed to notify a@b.com: smtp refused"
    )]
    #[case::cache_write(
        SimulationError::CacheWrite { email: "a@b.com".to_string(), cause: "connection reset".to_string() },
        "Failed to cache simulation for a@b.com: connection reset"
    )]
    #[case::timeout(
        SimulationError::Timeout { email: "a@b.com".to_string(), limit: Duration::from_secs(30) },
        "Simulation for a@b.com timed out after 30s"
    )]
    #[case::tiers_unavailable(
        SimulationError::TiersUnavailable { email: "a@b.com".to_string(), cause: "provider down".to_string() },
        "Rate tiers unavailable for a@b.com: provider down"
    )]
    fn test_error_display(#[case] error: SimulationError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::validation(
        SimulationError::validation("a@b.com", vec!["birth date is required".to_string(), "installment count must be greater than zero".to_string()]),
        SimulationError::Validation { email: "a@b.com".to_string(), violations: "birth date is required; installment count must be greater than zero".to_string() }
    )]
    #[case::rate_not_found(
        SimulationError::rate_not_found("a@b.com", 101),
        SimulationError::RateNotFound { email: "a@b.com".to_string(), age: 101 }
    )]
    #[case::calculation(
        SimulationError::calculation("a@b.com", "overflow"),
        SimulationError::Calculation { email: "a@b.com".to_string(), reason: "overflow".to_string() }
    )]
    #[case::persistence(
        SimulationError::persistence("a@b.com", "store offline"),
        SimulationError::Persistence { email: "a@b.com".to_string(), cause: "store offline".to_string() }
    )]
    #[case::timeout(
        SimulationError::timeout("a@b.com", Duration::from_millis(50)),
        SimulationError::Timeout { email: "a@b.com".to_string(), limit: Duration::from_millis(50) }
    )]
    #[case::tiers_unavailable(
        SimulationError::tiers_unavailable("a@b.com", "provider down"),
        SimulationError::TiersUnavailable { email: "a@b.com".to_string(), cause: "provider down".to_string() }
    )]
    fn test_helper_functions(#[case] result: SimulationError, #[case] expected: SimulationError) {
        assert_eq!(result, expected);
    }

    #[rstest]
    #[case::validation(SimulationError::validation("v@x.com", vec!["bad".to_string()]), "v@x.com")]
    #[case::rate_not_found(SimulationError::rate_not_found("r@x.com", 12), "r@x.com")]
    #[case::persistence(SimulationError::persistence("p@x.com", "down"), "p@x.com")]
    #[case::timeout(SimulationError::timeout("t@x.com", Duration::from_secs(1)), "t@x.com")]
    fn test_email_accessor(#[case] error: SimulationError, #[case] expected: &str) {
        assert_eq!(error.email(), expected);
    }

    #[test]
    fn test_rate_not_found_message_names_the_age() {
        let error = SimulationError::rate_not_found("a@b.com", 17);
        assert!(error.to_string().contains("rate not found for age 17"));
    }
}
