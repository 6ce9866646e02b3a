//! Computed simulation types for the Rust Loan Engine
//!
//! This module defines the `LoanSimulation` entity produced by the
//! amortization calculator. It is the unit of caching and persistence:
//! the same serde shape is written to the store, round-tripped through the
//! cache as a JSON snapshot, and returned to the caller, so its field names
//! must stay stable.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single row of the amortization schedule
///
/// The engine produces flat (annuity) schedules: every installment carries
/// the same amount, and the per-installment fee equals that amount since no
/// per-period principal/interest split is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    /// 1-based position in the schedule
    pub installment_number: u32,

    /// Monthly payment amount, truncated to two decimal places
    pub installment_amount: Decimal,

    /// Fee amount carried by this installment
    ///
    /// Equal to `installment_amount` in the flat schedule.
    pub installment_fee_amount: Decimal,

    /// Currency code, copied from the request
    pub currency: String,
}

/// A computed loan simulation
///
/// Created by the calculator on a cache miss, optionally reconstituted from
/// a cache snapshot (bypassing recomputation and persistence), and never
/// mutated or deleted afterwards. All monetary fields are truncated to two
/// decimal places before the value leaves the calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSimulation {
    /// Requested principal, truncated to two decimal places
    pub loan_amount: Decimal,

    /// Total of all installment payments
    pub amount_to_be_paid: Decimal,

    /// Total fee: amount to be paid minus the principal
    pub amount_fee_to_be_paid: Decimal,

    /// Annual interest rate applied, as a percentage
    ///
    /// This is the resolved tier rate, not a monetary value, so it is not
    /// subject to the two-decimal truncation rule.
    pub fee_amount_percentage: Decimal,

    /// Number of installments in the schedule
    pub total_installments: u32,

    /// Currency code for every monetary field
    pub currency: String,

    /// Applicant's contact email
    pub email: String,

    /// When the schedule was computed
    pub simulation_date: DateTime<Utc>,

    /// The amortization schedule, installment numbers `1..=total_installments`
    pub installments: Vec<Installment>,
}
