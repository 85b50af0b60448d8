//! Greek freelancer tax engine.
//!
//! Turns a gross income, deductible expenses and a payment frequency into a
//! fully populated [`TaxResult`]. The engine is stateless: every call works
//! only from its arguments and the [`TaxYearConfig`] it was built with.
//!
//! # Calculation Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Validate inputs (non-negative, expenses ≤ income, known frequency) |
//! | 2    | Taxable income = gross income - expenses |
//! | 3    | Progressive income tax on taxable income, per bracket |
//! | 4    | Effective income tax rate (income tax / taxable income) |
//! | 5    | EFKA contributions on gross income (main + additional) |
//! | 6    | VAT on gross income |
//! | 7    | Tax burden = income tax + EFKA; obligations = burden + VAT |
//! | 8    | Net income = gross income - tax burden |
//! | 9    | Effective total rate (tax burden / gross income) |
//! | 10   | Payment schedule for the tax burden |
//!
//! Bracket amounts are carried unrounded; totals are rounded to cents with
//! [`round_half_up`].
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::TaxEngine;
//!
//! let engine = TaxEngine::default();
//! let result = engine.calculate(dec!(15000), dec!(0), "monthly").unwrap();
//!
//! assert_eq!(result.total_income_tax, dec!(2000.00));
//! assert_eq!(result.efka_total, dec!(3000.00));
//! assert_eq!(result.net_income, dec!(10000.00));
//! assert_eq!(result.installment_amount(), dec!(416.67));
//! ```

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::{ratio, round_half_up};
use crate::models::{
    BracketBreakdown, Installment, PaymentFrequency, PaymentSchedule, TaxResult,
    TaxYearConfig, TaxYearConfigError,
};

/// Errors that can occur while validating inputs or building an engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxEngineError {
    /// Gross income is negative or not a finite number.
    #[error("invalid gross income: {0}")]
    InvalidIncome(String),

    /// Expenses are negative, not finite, or exceed gross income.
    #[error("invalid deductible expenses: {0}")]
    InvalidExpenses(String),

    /// The payment frequency is not monthly, quarterly or annual.
    #[error("invalid payment frequency '{0}': must be one of monthly, quarterly, annual")]
    InvalidFrequency(String),

    /// The tax year configuration failed validation.
    #[error("invalid tax configuration: {0}")]
    InvalidConfig(#[from] TaxYearConfigError),
}

/// Inputs that passed validation, with amounts rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedInputs {
    pub gross_income: Decimal,
    pub deductible_expenses: Decimal,
    pub frequency: PaymentFrequency,
}

/// EFKA social security split. `main + additional == total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EfkaContributions {
    pub main: Decimal,
    pub additional: Decimal,
    pub total: Decimal,
}

/// Calculator for Greek freelancer taxes.
#[derive(Debug, Clone, Default)]
pub struct TaxEngine {
    config: TaxYearConfig,
}

impl TaxEngine {
    /// Creates an engine for the given tax year rules.
    ///
    /// # Errors
    ///
    /// Returns [`TaxEngineError::InvalidConfig`] if the configuration does not
    /// pass [`TaxYearConfig::validate`].
    pub fn new(config: TaxYearConfig) -> Result<Self, TaxEngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TaxYearConfig {
        &self.config
    }

    /// Checks raw inputs and normalizes them.
    ///
    /// Checks run on the amounts as given, in order (income, expenses,
    /// frequency), and the first failure is returned. Amounts are rounded to
    /// cents only once they pass.
    ///
    /// # Errors
    ///
    /// Returns [`TaxEngineError::InvalidIncome`], [`TaxEngineError::InvalidExpenses`]
    /// or [`TaxEngineError::InvalidFrequency`].
    pub fn validate_inputs(
        &self,
        gross_income: Decimal,
        deductible_expenses: Decimal,
        frequency: &str,
    ) -> Result<ValidatedInputs, TaxEngineError> {
        if gross_income < Decimal::ZERO {
            return Err(TaxEngineError::InvalidIncome(format!(
                "gross income cannot be negative (got {gross_income})"
            )));
        }
        if deductible_expenses < Decimal::ZERO {
            return Err(TaxEngineError::InvalidExpenses(format!(
                "deductible expenses cannot be negative (got {deductible_expenses})"
            )));
        }
        if deductible_expenses > gross_income {
            return Err(TaxEngineError::InvalidExpenses(format!(
                "deductible expenses ({deductible_expenses}) cannot exceed gross income ({gross_income})"
            )));
        }
        let frequency = PaymentFrequency::parse(frequency)
            .ok_or_else(|| TaxEngineError::InvalidFrequency(frequency.to_string()))?;

        Ok(ValidatedInputs {
            gross_income: round_half_up(gross_income),
            deductible_expenses: round_half_up(deductible_expenses),
            frequency,
        })
    }

    /// Gross income minus expenses, clamped at zero.
    pub fn compute_taxable_income(
        &self,
        gross_income: Decimal,
        deductible_expenses: Decimal,
    ) -> Decimal {
        (gross_income - deductible_expenses).max(Decimal::ZERO)
    }

    /// Progressive income tax.
    ///
    /// Returns the total rounded to cents and one unrounded breakdown entry per
    /// bracket that holds part of the income. Income exactly on a bracket edge
    /// is taxed entirely at the lower bracket's rate.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::calculations::TaxEngine;
    ///
    /// let engine = TaxEngine::default();
    ///
    /// let (tax, breakdown) = engine.compute_income_tax(dec!(10000));
    /// assert_eq!(tax, dec!(900.00));
    /// assert_eq!(breakdown.len(), 1);
    ///
    /// let (tax, breakdown) = engine.compute_income_tax(dec!(10000.01));
    /// assert_eq!(tax, dec!(900.00));
    /// assert_eq!(breakdown.len(), 2);
    /// ```
    pub fn compute_income_tax(
        &self,
        taxable_income: Decimal,
    ) -> (Decimal, Vec<BracketBreakdown>) {
        let mut breakdown = Vec::new();
        let mut total = Decimal::ZERO;

        for bracket in &self.config.brackets {
            if taxable_income <= bracket.min_income {
                break;
            }
            let taxable_amount = bracket.taxable_amount(taxable_income);
            if taxable_amount.is_zero() {
                continue;
            }
            let tax_amount = taxable_amount * bracket.tax_rate;
            total += tax_amount;

            breakdown.push(BracketBreakdown {
                min_income: bracket.min_income,
                max_income: bracket.max_income,
                tax_rate: bracket.tax_rate,
                taxable_amount,
                tax_amount,
            });
        }

        (round_half_up(total), breakdown)
    }

    /// `tax / base` as an unrounded fraction; zero when `base` is zero.
    pub fn compute_effective_rate(
        &self,
        tax: Decimal,
        base: Decimal,
    ) -> Decimal {
        ratio(tax, base)
    }

    /// EFKA contributions on gross income.
    ///
    /// Main and total are rounded independently and the additional part is
    /// their difference, so the parts always sum to the total.
    pub fn compute_contributions(
        &self,
        gross_income: Decimal,
    ) -> EfkaContributions {
        let main = round_half_up(gross_income * self.config.efka_main_rate);
        let total = round_half_up(gross_income * self.config.efka_total_rate());

        EfkaContributions {
            main,
            additional: total - main,
            total,
        }
    }

    /// VAT on gross income, rounded to cents.
    pub fn compute_vat(
        &self,
        gross_income: Decimal,
    ) -> Decimal {
        round_half_up(gross_income * self.config.vat_rate)
    }

    /// Splits `total` into equal installments for `frequency`.
    ///
    /// Negative totals are treated as zero.
    pub fn build_payment_schedule(
        &self,
        total: Decimal,
        frequency: PaymentFrequency,
    ) -> PaymentSchedule {
        let annual_total = total.max(Decimal::ZERO);
        let installment_count = frequency.installments_per_year();
        let installment_amount_exact = annual_total / Decimal::from(installment_count);
        let installment_amount = round_half_up(installment_amount_exact);

        let installments = (1..=installment_count)
            .map(|period_number| Installment {
                period_number,
                amount: installment_amount,
            })
            .collect();

        PaymentSchedule {
            frequency,
            annual_total,
            installment_count,
            installment_amount,
            installment_amount_exact,
            installments,
        }
    }

    /// Runs the full calculation.
    ///
    /// # Errors
    ///
    /// Returns a [`TaxEngineError`] if validation fails; nothing is computed
    /// in that case.
    pub fn calculate(
        &self,
        gross_income: Decimal,
        deductible_expenses: Decimal,
        frequency: &str,
    ) -> Result<TaxResult, TaxEngineError> {
        let inputs = self.validate_inputs(gross_income, deductible_expenses, frequency)?;
        Ok(self.calculate_validated(&inputs))
    }

    /// Floating point entry point. Rejects NaN and infinities before
    /// delegating to [`TaxEngine::calculate`].
    ///
    /// # Errors
    ///
    /// Same as [`TaxEngine::calculate`].
    pub fn calculate_f64(
        &self,
        gross_income: f64,
        deductible_expenses: f64,
        frequency: &str,
    ) -> Result<TaxResult, TaxEngineError> {
        let gross = Decimal::from_f64(gross_income).ok_or_else(|| {
            TaxEngineError::InvalidIncome(format!(
                "gross income must be a finite number within range (got {gross_income})"
            ))
        })?;
        let expenses = Decimal::from_f64(deductible_expenses).ok_or_else(|| {
            TaxEngineError::InvalidExpenses(format!(
                "deductible expenses must be a finite number within range (got {deductible_expenses})"
            ))
        })?;

        self.calculate(gross, expenses, frequency)
    }

    /// Computes a result from inputs that already passed validation.
    pub fn calculate_validated(
        &self,
        inputs: &ValidatedInputs,
    ) -> TaxResult {
        let gross_income = inputs.gross_income;

        let taxable_income =
            self.compute_taxable_income(gross_income, inputs.deductible_expenses);
        debug!(%gross_income, expenses = %inputs.deductible_expenses, %taxable_income, "computed taxable income");

        let (total_income_tax, bracket_breakdown) = self.compute_income_tax(taxable_income);
        let effective_income_tax_rate =
            self.compute_effective_rate(total_income_tax, taxable_income);
        debug!(
            %total_income_tax,
            brackets = bracket_breakdown.len(),
            "computed income tax"
        );

        let efka = self.compute_contributions(gross_income);
        let vat_amount = self.compute_vat(gross_income);
        debug!(efka_main = %efka.main, efka_additional = %efka.additional, efka_total = %efka.total, %vat_amount, "computed contributions and VAT");

        let total_tax_burden = total_income_tax + efka.total;
        let total_obligations = total_tax_burden + vat_amount;
        let net_income = gross_income - total_tax_burden;
        let effective_total_rate = self.compute_effective_rate(total_tax_burden, gross_income);

        let schedule = self.build_payment_schedule(total_tax_burden, inputs.frequency);
        debug!(
            frequency = %inputs.frequency,
            installments = schedule.installment_count,
            installment_amount = %schedule.installment_amount,
            "built payment schedule"
        );

        TaxResult {
            gross_income,
            deductible_expenses: inputs.deductible_expenses,
            taxable_income,
            bracket_breakdown,
            total_income_tax,
            effective_income_tax_rate,
            efka_main: efka.main,
            efka_additional: efka.additional,
            efka_total: efka.total,
            vat_amount,
            total_tax_burden,
            total_obligations,
            net_income,
            effective_total_rate,
            schedule,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::common::percentage;

    fn engine() -> TaxEngine {
        TaxEngine::default()
    }

    fn cents() -> impl Strategy<Value = Decimal> {
        (0i64..=2_000_000_000i64).prop_map(|c| Decimal::new(c, 2))
    }

    // =========================================================================
    // new tests
    // =========================================================================

    #[test]
    fn new_accepts_default_config() {
        let result = TaxEngine::new(TaxYearConfig::greek_2024());

        assert!(result.is_ok());
    }

    #[test]
    fn new_rejects_invalid_config() {
        let mut config = TaxYearConfig::greek_2024();
        config.brackets.clear();

        let result = TaxEngine::new(config);

        assert_eq!(
            result.map(|_| ()),
            Err(TaxEngineError::InvalidConfig(TaxYearConfigError::NoTaxBrackets))
        );
    }

    // =========================================================================
    // validate_inputs tests
    // =========================================================================

    #[test]
    fn validate_inputs_normalizes_values() {
        let result = engine()
            .validate_inputs(dec!(35000.004), dec!(5000.005), " Quarterly ")
            .unwrap();

        assert_eq!(
            result,
            ValidatedInputs {
                gross_income: dec!(35000.00),
                deductible_expenses: dec!(5000.01),
                frequency: PaymentFrequency::Quarterly,
            }
        );
    }

    #[test]
    fn validate_inputs_rejects_negative_income() {
        let result = engine().validate_inputs(dec!(-1), dec!(0), "monthly");

        assert!(matches!(result, Err(TaxEngineError::InvalidIncome(_))));
    }

    #[test]
    fn validate_inputs_rejects_negative_expenses() {
        let result = engine().validate_inputs(dec!(1000), dec!(-0.01), "monthly");

        assert!(matches!(result, Err(TaxEngineError::InvalidExpenses(_))));
    }

    #[test]
    fn validate_inputs_rejects_expenses_above_income() {
        let result = engine().validate_inputs(dec!(10000), dec!(10000.01), "monthly");

        assert!(matches!(result, Err(TaxEngineError::InvalidExpenses(_))));
    }

    #[test]
    fn validate_inputs_rejects_expenses_above_income_by_less_than_a_cent() {
        let result = engine().calculate(dec!(1000), dec!(1000.004), "monthly");

        assert!(matches!(result, Err(TaxEngineError::InvalidExpenses(_))));
    }

    #[test]
    fn validate_inputs_rejects_negative_income_that_rounds_to_zero() {
        let result = engine().validate_inputs(dec!(-0.004), dec!(0), "monthly");

        assert!(matches!(result, Err(TaxEngineError::InvalidIncome(_))));
    }

    #[test]
    fn validate_inputs_rejects_unknown_frequency() {
        let result = engine().validate_inputs(dec!(10000), dec!(0), "weekly");

        assert_eq!(
            result,
            Err(TaxEngineError::InvalidFrequency("weekly".to_string()))
        );
    }

    #[test]
    fn validate_inputs_reports_income_before_frequency() {
        let result = engine().validate_inputs(dec!(-5), dec!(0), "weekly");

        assert!(matches!(result, Err(TaxEngineError::InvalidIncome(_))));
    }

    // =========================================================================
    // compute_taxable_income tests
    // =========================================================================

    #[test]
    fn compute_taxable_income_subtracts_expenses() {
        let result = engine().compute_taxable_income(dec!(35000), dec!(5000));

        assert_eq!(result, dec!(30000));
    }

    #[test]
    fn compute_taxable_income_clamps_at_zero() {
        let result = engine().compute_taxable_income(dec!(100), dec!(200));

        assert_eq!(result, Decimal::ZERO);
    }

    // =========================================================================
    // compute_income_tax tests
    // =========================================================================

    #[test]
    fn compute_income_tax_zero_income_has_empty_breakdown() {
        let (tax, breakdown) = engine().compute_income_tax(Decimal::ZERO);

        assert_eq!(tax, Decimal::ZERO);
        assert!(breakdown.is_empty());
    }

    #[test]
    fn compute_income_tax_within_first_bracket() {
        let (tax, breakdown) = engine().compute_income_tax(dec!(5000));

        assert_eq!(tax, dec!(450.00));
        assert_eq!(breakdown.len(), 1);
    }

    #[test]
    fn compute_income_tax_first_boundary_stays_in_lower_bracket() {
        let (tax, breakdown) = engine().compute_income_tax(dec!(10000));

        assert_eq!(tax, dec!(900.00));
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].taxable_amount, dec!(10000));
    }

    #[test]
    fn compute_income_tax_one_cent_over_boundary_touches_second_bracket() {
        let (tax, breakdown) = engine().compute_income_tax(dec!(10000.01));

        assert_eq!(tax, dec!(900.00));
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[1].taxable_amount, dec!(0.01));
        assert_eq!(breakdown[1].tax_amount, dec!(0.0022));
    }

    #[test]
    fn compute_income_tax_one_unit_over_boundary() {
        let (tax, _) = engine().compute_income_tax(dec!(10001));

        assert_eq!(tax, dec!(900.22));
    }

    #[test]
    fn compute_income_tax_at_each_boundary() {
        let cases = [
            (dec!(20000), dec!(3100)),
            (dec!(30000), dec!(5900)),
            (dec!(40000), dec!(9500)),
            (dec!(50000), dec!(13900)),
        ];

        for (income, expected) in cases {
            let (tax, _) = engine().compute_income_tax(income);
            assert_eq!(tax, expected, "income {income}");
        }
    }

    #[test]
    fn compute_income_tax_spans_all_brackets() {
        let (tax, breakdown) = engine().compute_income_tax(dec!(100000));

        assert_eq!(tax, dec!(35900.00));
        assert_eq!(breakdown.len(), 5);
        assert_eq!(breakdown[4].taxable_amount, dec!(60000));
        assert_eq!(breakdown[4].tax_amount, dec!(26400));
    }

    // =========================================================================
    // compute_effective_rate tests
    // =========================================================================

    #[test]
    fn compute_effective_rate_divides_by_base() {
        let rate = engine().compute_effective_rate(dec!(5900), dec!(30000));

        assert_eq!(percentage(rate), dec!(19.67));
    }

    #[test]
    fn compute_effective_rate_is_zero_for_zero_base() {
        let rate = engine().compute_effective_rate(Decimal::ZERO, Decimal::ZERO);

        assert_eq!(rate, Decimal::ZERO);
    }

    // =========================================================================
    // compute_contributions tests
    // =========================================================================

    #[test]
    fn compute_contributions_splits_twenty_percent() {
        let efka = engine().compute_contributions(dec!(35000));

        assert_eq!(
            efka,
            EfkaContributions {
                main: dec!(4665.50),
                additional: dec!(2334.50),
                total: dec!(7000.00),
            }
        );
    }

    #[test]
    fn compute_contributions_parts_sum_when_rounding_diverges() {
        let efka = engine().compute_contributions(dec!(0.15));

        assert_eq!(efka.main, dec!(0.02));
        assert_eq!(efka.total, dec!(0.03));
        assert_eq!(efka.additional, dec!(0.01));
    }

    // =========================================================================
    // compute_vat tests
    // =========================================================================

    #[test]
    fn compute_vat_is_twenty_four_percent_of_gross() {
        assert_eq!(engine().compute_vat(dec!(50000)), dec!(12000.00));
        assert_eq!(engine().compute_vat(dec!(0.02)), dec!(0.00));
    }

    // =========================================================================
    // build_payment_schedule tests
    // =========================================================================

    #[test]
    fn build_payment_schedule_monthly() {
        let schedule = engine().build_payment_schedule(dec!(5000), PaymentFrequency::Monthly);

        assert_eq!(schedule.installment_count, 12);
        assert_eq!(schedule.installment_amount, dec!(416.67));
        assert_eq!(schedule.installments.len(), 12);
        assert_eq!(schedule.installments[0].period_number, 1);
        assert_eq!(schedule.installments[11].period_number, 12);
        assert_eq!(schedule.scheduled_total(), dec!(5000.04));
    }

    #[test]
    fn build_payment_schedule_annual_is_single_payment() {
        let schedule = engine().build_payment_schedule(dec!(30300), PaymentFrequency::Annual);

        assert_eq!(
            schedule.installments,
            vec![Installment {
                period_number: 1,
                amount: dec!(30300),
            }]
        );
    }

    #[test]
    fn build_payment_schedule_clamps_negative_total() {
        let schedule = engine().build_payment_schedule(dec!(-10), PaymentFrequency::Quarterly);

        assert_eq!(schedule.annual_total, Decimal::ZERO);
        assert_eq!(schedule.installment_amount, Decimal::ZERO);
        assert_eq!(schedule.installments.len(), 4);
    }

    // =========================================================================
    // calculate tests
    // =========================================================================

    #[test]
    fn calculate_low_income_monthly() {
        let result = engine().calculate(dec!(15000), dec!(0), "monthly").unwrap();

        assert_eq!(result.taxable_income, dec!(15000));
        assert_eq!(result.total_income_tax, dec!(2000));
        assert_eq!(result.efka_total, dec!(3000));
        assert_eq!(result.total_tax_burden, dec!(5000));
        assert_eq!(result.net_income, dec!(10000));
        assert_eq!(result.vat_amount, dec!(3600));
        assert_eq!(result.installment_amount(), dec!(416.67));
        assert_eq!(percentage(result.effective_total_rate), dec!(33.33));
    }

    #[test]
    fn calculate_mid_income_quarterly() {
        let result = engine().calculate(dec!(35000), dec!(0), "quarterly").unwrap();

        assert_eq!(result.total_income_tax, dec!(7700));
        assert_eq!(result.efka_total, dec!(7000));
        assert_eq!(result.total_tax_burden, dec!(14700));
        assert_eq!(result.net_income, dec!(20300));
        assert_eq!(result.vat_amount, dec!(8400));
        assert_eq!(result.installment_count(), 4);
        assert_eq!(result.installment_amount(), dec!(3675));
    }

    #[test]
    fn calculate_high_income_annual() {
        let result = engine().calculate(dec!(60000), dec!(0), "annual").unwrap();

        assert_eq!(result.total_income_tax, dec!(18300));
        assert_eq!(result.efka_total, dec!(12000));
        assert_eq!(result.total_tax_burden, dec!(30300));
        assert_eq!(result.net_income, dec!(29700));
        assert_eq!(result.vat_amount, dec!(14400));
        assert_eq!(result.total_obligations, dec!(44700));
        assert_eq!(result.installment_amount(), dec!(30300));
    }

    #[test]
    fn calculate_with_expenses_monthly() {
        let result = engine().calculate(dec!(50000), dec!(12000), "monthly").unwrap();

        assert_eq!(result.taxable_income, dec!(38000));
        assert_eq!(result.total_income_tax, dec!(8780));
        assert_eq!(result.efka_total, dec!(10000));
        assert_eq!(result.total_tax_burden, dec!(18780));
        assert_eq!(result.net_income, dec!(31220));
        assert_eq!(result.vat_amount, dec!(12000));
        assert_eq!(result.installment_amount(), dec!(1565));
    }

    #[test]
    fn calculate_regression_35000_with_5000_expenses() {
        let result = engine().calculate(dec!(35000), dec!(5000), "quarterly").unwrap();

        assert_eq!(result.taxable_income, dec!(30000));
        assert_eq!(result.total_income_tax, dec!(5900));
        assert_eq!(percentage(result.effective_income_tax_rate), dec!(19.67));
        assert_eq!(result.efka_total, dec!(7000));
        assert_eq!(result.vat_amount, dec!(8400));
        assert_eq!(result.total_tax_burden, dec!(12900));
        assert_eq!(result.net_income, dec!(22100));
        assert_eq!(percentage(result.effective_total_rate), dec!(36.86));
        assert_eq!(result.installment_amount(), dec!(3225));
    }

    #[test]
    fn calculate_regression_60000_with_10000_expenses() {
        let result = engine().calculate(dec!(60000), dec!(10000), "monthly").unwrap();

        assert_eq!(result.taxable_income, dec!(50000));
        assert_eq!(result.total_income_tax, dec!(13900));
        assert_eq!(percentage(result.effective_income_tax_rate), dec!(27.80));
        assert_eq!(result.efka_total, dec!(12000));
        assert_eq!(result.vat_amount, dec!(14400));
        assert_eq!(result.total_tax_burden, dec!(25900));
        assert_eq!(result.net_income, dec!(34100));
    }

    #[test]
    fn calculate_regression_high_expenses() {
        let result = engine().calculate(dec!(12000), dec!(9000), "annual").unwrap();

        assert_eq!(result.taxable_income, dec!(3000));
        assert_eq!(result.total_income_tax, dec!(270));
        assert_eq!(result.efka_total, dec!(2400));
        assert_eq!(result.total_tax_burden, dec!(2670));
        assert_eq!(result.net_income, dec!(9330));
        assert_eq!(result.vat_amount, dec!(2880));
    }

    #[test]
    fn calculate_expenses_equal_to_income_leaves_no_income_tax() {
        let result = engine().calculate(dec!(20000), dec!(20000), "monthly").unwrap();

        assert_eq!(result.taxable_income, Decimal::ZERO);
        assert_eq!(result.total_income_tax, Decimal::ZERO);
        assert!(result.bracket_breakdown.is_empty());
        assert_eq!(result.effective_income_tax_rate, Decimal::ZERO);
        assert_eq!(result.efka_total, dec!(4000));
    }

    #[test]
    fn calculate_zero_income() {
        let result = engine().calculate(Decimal::ZERO, Decimal::ZERO, "annual").unwrap();

        assert_eq!(result.total_tax_burden, Decimal::ZERO);
        assert_eq!(result.net_income, Decimal::ZERO);
        assert_eq!(result.effective_total_rate, Decimal::ZERO);
        assert_eq!(result.installment_amount(), Decimal::ZERO);
    }

    #[test]
    fn calculate_accepts_mixed_case_frequency() {
        let result = engine().calculate(dec!(15000), dec!(0), "MONTHLY").unwrap();

        assert_eq!(result.frequency(), PaymentFrequency::Monthly);
    }

    #[test]
    fn calculate_rejects_expenses_above_income() {
        let result = engine().calculate(dec!(1000), dec!(2000), "monthly");

        assert!(matches!(result, Err(TaxEngineError::InvalidExpenses(_))));
    }

    // =========================================================================
    // calculate_f64 tests
    // =========================================================================

    #[test]
    fn calculate_f64_matches_decimal_entry_point() {
        let from_f64 = engine().calculate_f64(35000.0, 5000.0, "quarterly").unwrap();
        let from_decimal = engine().calculate(dec!(35000), dec!(5000), "quarterly").unwrap();

        assert_eq!(from_f64, from_decimal);
    }

    #[test]
    fn calculate_f64_rejects_nan_income() {
        let result = engine().calculate_f64(f64::NAN, 0.0, "monthly");

        assert!(matches!(result, Err(TaxEngineError::InvalidIncome(_))));
    }

    #[test]
    fn calculate_f64_reports_out_of_range_income() {
        let reason = match engine().calculate_f64(1e30, 0.0, "monthly") {
            Err(TaxEngineError::InvalidIncome(reason)) => reason,
            other => panic!("expected InvalidIncome, got {other:?}"),
        };

        assert!(reason.contains("within range"));
    }

    #[test]
    fn calculate_f64_rejects_infinite_expenses() {
        let result = engine().calculate_f64(1000.0, f64::INFINITY, "monthly");

        assert!(matches!(result, Err(TaxEngineError::InvalidExpenses(_))));
    }

    // =========================================================================
    // properties
    // =========================================================================

    proptest! {
        #[test]
        fn breakdown_sums_to_income_tax(taxable in cents()) {
            let (tax, breakdown) = engine().compute_income_tax(taxable);
            let sum: Decimal = breakdown.iter().map(|b| b.tax_amount).sum();

            prop_assert!((sum - tax).abs() <= dec!(0.01));
        }

        #[test]
        fn efka_parts_sum_to_total(gross in cents()) {
            let efka = engine().compute_contributions(gross);

            prop_assert_eq!(efka.main + efka.additional, efka.total);
            prop_assert_eq!(efka.total, round_half_up(gross * dec!(0.20)));
        }

        #[test]
        fn income_tax_is_monotonic(a in cents(), b in cents()) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };

            let (low_tax, _) = engine().compute_income_tax(low);
            let (high_tax, _) = engine().compute_income_tax(high);

            prop_assert!(low_tax <= high_tax);
        }

        #[test]
        fn schedule_round_trips_within_installment_cents(
            total in cents(),
            index in 0usize..3,
        ) {
            let frequency = PaymentFrequency::ALL[index];
            let schedule = engine().build_payment_schedule(total, frequency);
            let tolerance = Decimal::new(i64::from(schedule.installment_count), 2);

            prop_assert!((schedule.scheduled_total() - total).abs() <= tolerance);
        }

        #[test]
        fn net_income_plus_burden_is_gross(
            gross in cents(),
            share in 0u32..=100,
        ) {
            let expenses = round_half_up(gross * Decimal::from(share) / dec!(100));
            let result = engine().calculate(gross, expenses, "monthly").unwrap();

            prop_assert_eq!(result.net_income + result.total_tax_burden, result.gross_income);
            prop_assert!(result.taxable_income >= Decimal::ZERO);
        }
    }
}
