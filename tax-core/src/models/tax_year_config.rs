//! Rates and limits for one Greek tax year.
//!
//! [`TaxYearConfig::greek_2024`] carries the published 2024 figures:
//!
//! | Taxable income        | Rate |
//! |-----------------------|------|
//! | €0 - €10,000          | 9%   |
//! | €10,000 - €20,000     | 22%  |
//! | €20,000 - €30,000     | 28%  |
//! | €30,000 - €40,000     | 36%  |
//! | €40,000+              | 44%  |
//!
//! VAT is 24% of gross income. EFKA social security is 20% of gross income,
//! split into 13.33% main insurance and 6.67% additional contributions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::BracketRule;

/// Errors raised when a tax year configuration is internally inconsistent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxYearConfigError {
    /// No brackets were configured.
    #[error("no tax brackets configured")]
    NoTaxBrackets,

    /// The lowest bracket must start at zero income.
    #[error("first tax bracket must start at 0, got {0}")]
    FirstBracketNotZero(Decimal),

    /// Consecutive brackets must share an edge.
    #[error("tax bracket {index} must start at {expected}, got {found}")]
    BracketGap {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    /// A bounded bracket must have an upper edge above its lower edge.
    #[error("tax bracket {index} has an upper limit that does not exceed its lower limit")]
    InvalidBracketRange { index: usize },

    /// Only the top bracket may be unbounded.
    #[error("tax bracket {index} is unbounded but is not the last bracket")]
    UnboundedBracketNotLast { index: usize },

    /// The top bracket must be unbounded.
    #[error("last tax bracket must have no upper limit")]
    LastBracketBounded,

    /// Bracket rates must be fractions in `[0, 1]`.
    #[error("tax bracket {index} rate must be between 0 and 1, got {rate}")]
    InvalidBracketRate { index: usize, rate: Decimal },

    #[error("VAT rate must be between 0 and 1, got {0}")]
    InvalidVatRate(Decimal),

    #[error("EFKA main insurance rate must be between 0 and 1, got {0}")]
    InvalidEfkaMainRate(Decimal),

    #[error("EFKA additional contribution rate must be between 0 and 1, got {0}")]
    InvalidEfkaAdditionalRate(Decimal),

    /// The upper sanity limit for income input must be positive.
    #[error("maximum annual income must be positive, got {0}")]
    InvalidMaxAnnualIncome(Decimal),
}

/// Tax rules for a single year. Rates are stored as fractions (`0.24`, not `24`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearConfig {
    pub tax_year: i32,

    /// Date the figures were last reviewed.
    pub last_updated: NaiveDate,

    /// Progressive brackets, ascending and contiguous; the last one is unbounded.
    pub brackets: Vec<BracketRule>,

    pub vat_rate: Decimal,
    pub efka_main_rate: Decimal,
    pub efka_additional_rate: Decimal,

    /// Inputs above this amount are rejected as unrealistic.
    pub max_annual_income: Decimal,
}

impl TaxYearConfig {
    /// The 2024 Greek freelancer rules.
    pub fn greek_2024() -> Self {
        Self {
            tax_year: 2024,
            last_updated: NaiveDate::from_ymd_opt(2024, 1, 15)
                .expect("2024-01-15 is a valid calendar date"),
            brackets: vec![
                BracketRule::new(dec!(0), Some(dec!(10000)), dec!(0.09)),
                BracketRule::new(dec!(10000), Some(dec!(20000)), dec!(0.22)),
                BracketRule::new(dec!(20000), Some(dec!(30000)), dec!(0.28)),
                BracketRule::new(dec!(30000), Some(dec!(40000)), dec!(0.36)),
                BracketRule::new(dec!(40000), None, dec!(0.44)),
            ],
            vat_rate: dec!(0.24),
            efka_main_rate: dec!(0.1333),
            efka_additional_rate: dec!(0.0667),
            max_annual_income: dec!(10000000),
        }
    }

    /// Combined EFKA rate (main + additional).
    pub fn efka_total_rate(&self) -> Decimal {
        self.efka_main_rate + self.efka_additional_rate
    }

    /// Checks the bracket table and rates for consistency.
    ///
    /// # Errors
    ///
    /// Returns the first [`TaxYearConfigError`] found.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::{TaxYearConfig, TaxYearConfigError};
    ///
    /// assert_eq!(TaxYearConfig::greek_2024().validate(), Ok(()));
    ///
    /// let mut config = TaxYearConfig::greek_2024();
    /// config.vat_rate = dec!(1.5);
    /// assert_eq!(config.validate(), Err(TaxYearConfigError::InvalidVatRate(dec!(1.5))));
    /// ```
    pub fn validate(&self) -> Result<(), TaxYearConfigError> {
        self.validate_brackets()?;

        if !is_fraction(self.vat_rate) {
            return Err(TaxYearConfigError::InvalidVatRate(self.vat_rate));
        }
        if !is_fraction(self.efka_main_rate) {
            return Err(TaxYearConfigError::InvalidEfkaMainRate(
                self.efka_main_rate,
            ));
        }
        if !is_fraction(self.efka_additional_rate) {
            return Err(TaxYearConfigError::InvalidEfkaAdditionalRate(
                self.efka_additional_rate,
            ));
        }
        if self.max_annual_income <= Decimal::ZERO {
            return Err(TaxYearConfigError::InvalidMaxAnnualIncome(
                self.max_annual_income,
            ));
        }
        Ok(())
    }

    fn validate_brackets(&self) -> Result<(), TaxYearConfigError> {
        let first = self
            .brackets
            .first()
            .ok_or(TaxYearConfigError::NoTaxBrackets)?;
        if first.min_income != Decimal::ZERO {
            return Err(TaxYearConfigError::FirstBracketNotZero(first.min_income));
        }

        let last_index = self.brackets.len() - 1;
        let mut expected_min = Decimal::ZERO;

        for (index, bracket) in self.brackets.iter().enumerate() {
            if bracket.min_income != expected_min {
                return Err(TaxYearConfigError::BracketGap {
                    index,
                    expected: expected_min,
                    found: bracket.min_income,
                });
            }
            if !is_fraction(bracket.tax_rate) {
                return Err(TaxYearConfigError::InvalidBracketRate {
                    index,
                    rate: bracket.tax_rate,
                });
            }
            match bracket.max_income {
                Some(max_income) if max_income <= bracket.min_income => {
                    return Err(TaxYearConfigError::InvalidBracketRange { index });
                }
                Some(_) if index == last_index => {
                    return Err(TaxYearConfigError::LastBracketBounded);
                }
                Some(max_income) => expected_min = max_income,
                None if index != last_index => {
                    return Err(TaxYearConfigError::UnboundedBracketNotLast { index });
                }
                None => {}
            }
        }
        Ok(())
    }
}

impl Default for TaxYearConfig {
    fn default() -> Self {
        Self::greek_2024()
    }
}

fn is_fraction(rate: Decimal) -> bool {
    (Decimal::ZERO..=Decimal::ONE).contains(&rate)
}
