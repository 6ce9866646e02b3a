//! Structural validation of simulation requests
//!
//! Validation runs before any I/O and accumulates every violation instead of
//! failing fast, so one rejected request reports all of its problems at once.
//! A request with violations never reaches rate resolution or calculation;
//! the engine converts the violation list into a single per-item error.

use rust_decimal::Decimal;

use crate::types::SimulationRequest;

/// Request validator with the configured currency whitelist
#[derive(Debug, Clone)]
pub struct Validator {
    /// Currency codes accepted in requests, matched exactly
    allowed_currencies: Vec<String>,
}

impl Validator {
    /// Create a new Validator
    ///
    /// # Arguments
    ///
    /// * `allowed_currencies` - Accepted currency codes; comparison is
    ///   case-sensitive
    pub fn new(allowed_currencies: Vec<String>) -> Self {
        Self { allowed_currencies }
    }

    /// Check a request and collect every violation
    ///
    /// Checks, never short-circuiting:
    /// - birth date is present
    /// - loan amount is strictly positive
    /// - installment count is strictly positive
    /// - currency is one of the configured codes
    ///
    /// # Returns
    ///
    /// All violation messages; an empty vector means the request is valid.
    pub fn validate(&self, request: &SimulationRequest) -> Vec<String> {
        let mut violations = Vec::new();

        if request.birth_date.is_none() {
            violations.push("birth date is required".to_string());
        }

        if request.loan_amount <= Decimal::ZERO {
            violations.push(format!(
                "loan amount must be greater than zero, got {}",
                request.loan_amount
            ));
        }

        if request.installments == 0 {
            violations.push("installment count must be greater than zero".to_string());
        }

        if !self
            .allowed_currencies
            .iter()
            .any(|code| code == &request.currency)
        {
            violations.push(format!("currency '{}' is not supported", request.currency));
        }

        violations
    }
}
