//! Email notification for completed simulations
//!
//! Renders a simulation into a small HTML summary and hands it to the
//! configured [`Mailer`]. Delivery failures are the caller's problem; the
//! engine records them against the item without failing the simulation.

use std::sync::Arc;

use chrono::Utc;

use crate::core::traits::{AdapterError, Mailer};
use crate::types::LoanSimulation;

/// Sends simulation result emails through a [`Mailer`] backend
#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    /// Email the simulation summary to the applicant
    ///
    /// The subject carries the send timestamp so repeated simulations for the
    /// same applicant stay distinguishable in an inbox.
    pub async fn notify(&self, simulation: &LoanSimulation) -> Result<(), AdapterError> {
        let subject = format!("Loan simulation {}", Utc::now().format("%Y-%m-%d %H:%M:%S"));
        let body = render_email(simulation);
        self.mailer.send(&subject, &body, &simulation.email).await
    }
}

/// Render a simulation as an HTML email body
///
/// Totals first, then one table row per installment.
pub fn render_email(simulation: &LoanSimulation) -> String {
    let mut body = String::new();
    body.push_str("<h2>Your loan simulation</h2>");
    body.push_str(&format!(
        "<p>Loan amount: {} {}</p>",
        simulation.loan_amount, simulation.currency
    ));
    body.push_str(&format!(
        "<p>Total to be paid: {} {}</p>",
        simulation.amount_to_be_paid, simulation.currency
    ));
    body.push_str(&format!(
        "<p>Total fees: {} {}</p>",
        simulation.amount_fee_to_be_paid, simulation.currency
    ));
    body.push_str(&format!(
        "<p>Interest rate: {}% per year over {} installments</p>",
        simulation.fee_amount_percentage, simulation.total_installments
    ));
    body.push_str("<table><tr><th>#</th><th>Amount</th><th>Fee</th></tr>");
    for installment in &simulation.installments {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            installment.installment_number,
            installment.installment_amount,
            installment.installment_fee_amount
        ));
    }
    body.push_str("</table>");
    body
}
