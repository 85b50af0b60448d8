use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::PaymentFrequency;

/// A single scheduled payment. `period_number` starts at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub period_number: u32,
    pub amount: Decimal,
}

/// The annual tax burden split into equal installments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSchedule {
    pub frequency: PaymentFrequency,

    /// Amount being scheduled (income tax plus EFKA, never negative).
    pub annual_total: Decimal,

    pub installment_count: u32,

    /// Per-installment amount rounded to cents.
    pub installment_amount: Decimal,

    /// Per-installment amount before rounding.
    pub installment_amount_exact: Decimal,

    pub installments: Vec<Installment>,
}

impl PaymentSchedule {
    /// Sum of the rounded installments.
    ///
    /// May differ from `annual_total` by up to half a cent per installment.
    pub fn scheduled_total(&self) -> Decimal {
        self.installments.iter().map(|i| i.amount).sum()
    }
}
