//! Simulation request types for the Rust Loan Engine
//!
//! This module defines the immutable input record for a batch run and the
//! age derivation used by rate resolution.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single loan-simulation request
///
/// Requests arrive as a batch and live only for the duration of one batch
/// call. The email doubles as the request's identifying field in error
/// reports, and together with the principal and installment count it keys
/// the simulation cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Requested loan principal
    ///
    /// Must be strictly positive to pass validation.
    pub loan_amount: Decimal,

    /// Number of monthly installments to amortize over
    ///
    /// Must be strictly positive to pass validation.
    pub installments: u32,

    /// Applicant's birth date
    ///
    /// `None` means the field was absent from the request; validation
    /// rejects such requests before any age derivation happens.
    pub birth_date: Option<NaiveDate>,

    /// Currency code for all monetary fields of the resulting schedule
    pub currency: String,

    /// Applicant's contact email
    ///
    /// Used as the notification recipient and to identify the request in
    /// per-item error reports.
    pub email: String,
}

impl SimulationRequest {
    /// Derive the applicant's age on the given day
    ///
    /// The age is the difference in calendar years, decremented by one if
    /// the birthday's day-of-year has not yet occurred in `today`'s year.
    ///
    /// # Arguments
    ///
    /// * `today` - The reference date, normally the current date
    ///
    /// # Returns
    ///
    /// * `Some(age)` if a birth date is present. The age can be negative
    ///   for a birth date in the future; such ages match no rate tier.
    /// * `None` if the request carries no birth date.
    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        let birth_date = self.birth_date?;

        let mut age = today.year() - birth_date.year();
        if today.ordinal() < birth_date.ordinal() {
            age -= 1;
        }
        Some(age)
    }
}
