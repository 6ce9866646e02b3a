//! Amortization calculator for fixed-installment (annuity) schedules
//!
//! This module is pure: request plus resolved annual rate in, schedule out.
//! Everything runs on [`Decimal`] so the growth exponentiation cannot pick up
//! binary floating-point drift, and every monetary output passes through
//! two-decimal truncation (not rounding) before it leaves this module.
//!
//! # Algorithm
//!
//! French (constant-payment) system:
//!
//! 1. `monthly_rate = annual_rate_percent / 1200`
//! 2. `growth = (1 + monthly_rate) ^ installments`, by repeated multiplication
//! 3. `installment = principal * monthly_rate * growth / (growth - 1)`
//! 4. `total = installment * installments`; `fee = total - principal`
//!
//! Each output field is truncated from its full-precision intermediate, so
//! `amount_to_be_paid` is `truncate(raw_installment * n)`, not
//! `truncate(truncated_installment) * n`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::types::{Installment, LoanSimulation, SimulationError, SimulationRequest};

/// Truncate a monetary value to two decimal places
///
/// Truncation drops digits instead of rounding: `10087.6827` becomes
/// `10087.68` and `1.999999` becomes `1.99`. Values with fewer than two
/// decimal places are returned unchanged. The operation is idempotent.
pub fn truncate_money(value: Decimal) -> Decimal {
    value.trunc_with_scale(2)
}

/// Raise a decimal base to a small non-negative integer exponent
///
/// Computed by repeated multiplication; the amortization growth factor only
/// ever needs installment-count exponents, so no closed-form power function
/// is involved.
///
/// # Returns
///
/// * `Some(result)`, with `power(base, 0) == 1` for any base
/// * `None` if an intermediate multiplication overflows
pub fn power(base: Decimal, exponent: u32) -> Option<Decimal> {
    let mut result = Decimal::ONE;
    for _ in 0..exponent {
        result = result.checked_mul(base)?;
    }
    Some(result)
}

/// Compute the full amortization schedule for a request
///
/// # Arguments
///
/// * `request` - The validated simulation request
/// * `annual_rate` - Annual interest rate percentage resolved from the tier set
/// * `simulation_date` - Timestamp recorded on the resulting simulation
///
/// # Returns
///
/// * `Ok(LoanSimulation)` with `installments` numbered `1..=n`, every row
///   carrying the same truncated amount and the request currency
/// * `Err(SimulationError::Calculation)` on a degenerate rate (zero or
///   negative amortization denominator, which a rate `<= 0` produces) or on
///   arithmetic overflow
pub fn build_simulation(
    request: &SimulationRequest,
    annual_rate: Decimal,
    simulation_date: DateTime<Utc>,
) -> Result<LoanSimulation, SimulationError> {
    let email = request.email.as_str();

    let monthly_rate = annual_rate
        .checked_div(Decimal::from(1200))
        .ok_or_else(|| SimulationError::calculation(email, "monthly rate is not representable"))?;

    let base = Decimal::ONE
        .checked_add(monthly_rate)
        .ok_or_else(|| SimulationError::calculation(email, "growth base overflowed"))?;

    let growth = power(base, request.installments).ok_or_else(|| {
        SimulationError::calculation(email, "growth exponentiation overflowed")
    })?;

    let denominator = growth
        .checked_sub(Decimal::ONE)
        .ok_or_else(|| SimulationError::calculation(email, "amortization denominator overflowed"))?;

    if denominator <= Decimal::ZERO {
        return Err(SimulationError::calculation(
            email,
            &format!(
                "non-positive amortization denominator for rate {} over {} installments",
                annual_rate, request.installments
            ),
        ));
    }

    let installment_raw = request
        .loan_amount
        .checked_mul(monthly_rate)
        .and_then(|value| value.checked_mul(growth))
        .and_then(|value| value.checked_div(denominator))
        .ok_or_else(|| SimulationError::calculation(email, "installment amount overflowed"))?;

    let total_raw = installment_raw
        .checked_mul(Decimal::from(request.installments))
        .ok_or_else(|| SimulationError::calculation(email, "total amount overflowed"))?;

    let fee_raw = total_raw
        .checked_sub(request.loan_amount)
        .ok_or_else(|| SimulationError::calculation(email, "fee amount overflowed"))?;

    let installment_amount = truncate_money(installment_raw);
    let installments = (1..=request.installments)
        .map(|installment_number| Installment {
            installment_number,
            installment_amount,
            installment_fee_amount: installment_amount,
            currency: request.currency.clone(),
        })
        .collect();

    Ok(LoanSimulation {
        loan_amount: truncate_money(request.loan_amount),
        amount_to_be_paid: truncate_money(total_raw),
        amount_fee_to_be_paid: truncate_money(fee_raw),
        fee_amount_percentage: annual_rate,
        total_installments: request.installments,
        currency: request.currency.clone(),
        email: request.email.clone(),
        simulation_date,
        installments,
    })
}
