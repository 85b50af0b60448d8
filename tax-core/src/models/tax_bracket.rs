use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One progressive income tax bracket.
///
/// The bracket covers taxable income in `[min_income, max_income)`; the top
/// bracket has no upper edge (`max_income` is `None`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketRule {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
}

impl BracketRule {
    pub fn new(
        min_income: Decimal,
        max_income: Option<Decimal>,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            min_income,
            max_income,
            tax_rate,
        }
    }

    /// Portion of `taxable_income` that falls inside this bracket, never negative.
    pub fn taxable_amount(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        let ceiling = match self.max_income {
            Some(max_income) => max_income.min(taxable_income),
            None => taxable_income,
        };
        (ceiling - self.min_income).max(Decimal::ZERO)
    }
}

/// Income tax owed within a single bracket.
///
/// Amounts are kept unrounded so the per-bracket values sum exactly to the
/// income tax before it is rounded for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketBreakdown {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
    pub taxable_amount: Decimal,
    pub tax_amount: Decimal,
}
