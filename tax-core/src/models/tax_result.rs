use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{BracketBreakdown, PaymentFrequency, PaymentSchedule};

/// Complete outcome of one tax calculation.
///
/// Monetary totals are rounded to cents. Rates are fractions; multiply by 100
/// for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    /// Gross annual income as entered.
    pub gross_income: Decimal,

    /// Deductible business expenses as entered.
    pub deductible_expenses: Decimal,

    /// Gross income minus expenses, never negative.
    pub taxable_income: Decimal,

    /// Per-bracket tax; brackets with nothing taxable are omitted.
    pub bracket_breakdown: Vec<BracketBreakdown>,

    pub total_income_tax: Decimal,

    /// Income tax divided by taxable income (zero when taxable income is zero).
    pub effective_income_tax_rate: Decimal,

    /// EFKA main insurance on gross income.
    pub efka_main: Decimal,

    /// EFKA additional contributions on gross income.
    pub efka_additional: Decimal,

    /// EFKA total; always `efka_main + efka_additional`.
    pub efka_total: Decimal,

    /// VAT on gross income. Collected from clients, not part of the burden.
    pub vat_amount: Decimal,

    /// Income tax plus EFKA.
    pub total_tax_burden: Decimal,

    /// Tax burden plus VAT.
    pub total_obligations: Decimal,

    /// Gross income minus the tax burden.
    pub net_income: Decimal,

    /// Tax burden divided by gross income (zero when gross income is zero).
    pub effective_total_rate: Decimal,

    pub schedule: PaymentSchedule,
}

impl TaxResult {
    pub fn frequency(&self) -> PaymentFrequency {
        self.schedule.frequency
    }

    pub fn installment_count(&self) -> u32 {
        self.schedule.installment_count
    }

    pub fn installment_amount(&self) -> Decimal {
        self.schedule.installment_amount
    }
}
