//! Collecting calculation inputs from text and from interactive prompts.

use std::fmt;

use inquire::{Confirm, CustomUserError, InquireError, Select, Text, validator::Validation};
use rust_decimal::Decimal;
use tax_core::{PaymentFrequency, TaxYearConfig, ValidatedInputs};
use thiserror::Error;
use tracing::debug;

use crate::utils::{format_currency, format_currency_whole, parse_decimal};

pub const INCOME_FIELD: &str = "Gross income";
pub const EXPENSES_FIELD: &str = "Expenses";

const RULE_WIDTH: usize = 70;

fn euro(value: &Decimal) -> String {
    format_currency(*value)
}

fn whole_euro(value: &Decimal) -> String {
    format_currency_whole(*value)
}

/// Errors produced while reading or checking user input.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("{field}: please enter a value")]
    Empty { field: &'static str },

    #[error("{field} must be a valid number (not '{input}')")]
    NotANumber { field: &'static str, input: String },

    #[error("{field} cannot be negative (you entered {})", euro(.value))]
    Negative { field: &'static str, value: Decimal },

    #[error(
        "{field} of {} seems unrealistic; please enter a value less than {}",
        euro(.value),
        whole_euro(.max)
    )]
    Unrealistic {
        field: &'static str,
        value: Decimal,
        max: Decimal,
    },

    #[error(
        "deductible expenses ({}) cannot exceed gross income ({})",
        euro(.expenses),
        euro(.income)
    )]
    ExpensesExceedIncome { expenses: Decimal, income: Decimal },

    /// The user pressed Esc or Ctrl-C.
    #[error("input cancelled")]
    Cancelled,

    #[error("prompt failed: {0}")]
    Prompt(String),
}

impl InputError {
    /// Short description without the entered amounts, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            InputError::Empty { .. } => "empty input",
            InputError::NotANumber { .. } => "input is not a number",
            InputError::Negative { .. } => "negative amount",
            InputError::Unrealistic { .. } => "amount seems unrealistic",
            InputError::ExpensesExceedIncome { .. } => "expenses exceed gross income",
            InputError::Cancelled => "input cancelled",
            InputError::Prompt(_) => "prompt failed",
        }
    }
}

impl From<InquireError> for InputError {
    fn from(error: InquireError) -> Self {
        match error {
            InquireError::OperationCanceled | InquireError::OperationInterrupted => {
                InputError::Cancelled
            }
            other => InputError::Prompt(other.to_string()),
        }
    }
}

/// Parses a non-negative amount, accepting `,` thousands separators.
pub fn parse_amount(
    field: &'static str,
    raw: &str,
) -> Result<Decimal, InputError> {
    if raw.trim().is_empty() {
        return Err(InputError::Empty { field });
    }
    let value = parse_decimal(raw).map_err(|_| InputError::NotANumber {
        field,
        input: raw.trim().to_string(),
    })?;
    if value < Decimal::ZERO {
        return Err(InputError::Negative { field, value });
    }
    Ok(value)
}

/// Rejects amounts above `max`; such values are almost always typos.
pub fn check_realistic(
    field: &'static str,
    value: Decimal,
    max: Decimal,
) -> Result<(), InputError> {
    if value > max {
        return Err(InputError::Unrealistic { field, value, max });
    }
    Ok(())
}

pub fn check_expenses_against_income(
    expenses: Decimal,
    income: Decimal,
) -> Result<(), InputError> {
    if expenses > income {
        return Err(InputError::ExpensesExceedIncome { expenses, income });
    }
    Ok(())
}

/// Parses and checks a gross income entry.
pub fn validate_income(
    raw: &str,
    config: &TaxYearConfig,
) -> Result<Decimal, InputError> {
    let income = parse_amount(INCOME_FIELD, raw)?;
    check_realistic(INCOME_FIELD, income, config.max_annual_income)?;
    debug!(%income, "income accepted");
    Ok(income)
}

/// Parses and checks an expenses entry against the already accepted income.
pub fn validate_expenses(
    raw: &str,
    gross_income: Decimal,
    config: &TaxYearConfig,
) -> Result<Decimal, InputError> {
    let expenses = parse_amount(EXPENSES_FIELD, raw)?;
    check_realistic(EXPENSES_FIELD, expenses, config.max_annual_income)?;
    check_expenses_against_income(expenses, gross_income)?;
    debug!(%expenses, "expenses accepted");
    Ok(expenses)
}

/// Entries of the interactive main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    NewCalculation,
    Exit,
}

impl fmt::Display for MenuChoice {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            MenuChoice::NewCalculation => f.write_str("New Calculation"),
            MenuChoice::Exit => f.write_str("Exit"),
        }
    }
}

/// Frequency as shown in the selection list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrequencyOption(PaymentFrequency);

impl fmt::Display for FrequencyOption {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let count = self.0.installments_per_year();
        let noun = if count == 1 { "payment" } else { "payments" };
        write!(f, "{} ({count} {noun} per year)", self.0.label())
    }
}

/// Source of interactive answers. Every method may return
/// [`InputError::Cancelled`].
pub trait Prompter {
    fn main_menu(&mut self) -> Result<MenuChoice, InputError>;

    fn gross_income(
        &mut self,
        config: &TaxYearConfig,
    ) -> Result<Decimal, InputError>;

    fn expenses(
        &mut self,
        gross_income: Decimal,
        config: &TaxYearConfig,
    ) -> Result<Decimal, InputError>;

    fn frequency(&mut self) -> Result<PaymentFrequency, InputError>;

    fn confirm(
        &mut self,
        inputs: &ValidatedInputs,
    ) -> Result<bool, InputError>;
}

/// Terminal prompts backed by `inquire`. Invalid entries are re-asked.
#[derive(Debug, Default)]
pub struct InquirePrompter;

fn print_banner(
    title: &str,
    body: &[String],
) {
    let rule = "-".repeat(RULE_WIDTH);
    println!("\n{rule}\n{title}\n{rule}");
    for line in body {
        println!("{line}");
    }
    println!("{rule}");
}

impl Prompter for InquirePrompter {
    fn main_menu(&mut self) -> Result<MenuChoice, InputError> {
        let choice = Select::new(
            "MAIN MENU",
            vec![MenuChoice::NewCalculation, MenuChoice::Exit],
        )
        .prompt()?;
        Ok(choice)
    }

    fn gross_income(
        &mut self,
        config: &TaxYearConfig,
    ) -> Result<Decimal, InputError> {
        print_banner(
            "GROSS ANNUAL INCOME",
            &[
                "Enter your total gross annual income (excluding VAT).".to_string(),
                "Example: 50000 for €50,000".to_string(),
                "Enter 0 if you have no income to calculate.".to_string(),
            ],
        );

        let validator_config = config.clone();
        let raw = Text::new("Gross annual income (€):")
            .with_validator(move |input: &str| -> Result<Validation, CustomUserError> {
                Ok(match validate_income(input, &validator_config) {
                    Ok(_) => Validation::Valid,
                    Err(e) => Validation::Invalid(e.to_string().into()),
                })
            })
            .prompt()?;

        validate_income(&raw, config)
    }

    fn expenses(
        &mut self,
        gross_income: Decimal,
        config: &TaxYearConfig,
    ) -> Result<Decimal, InputError> {
        print_banner(
            "DEDUCTIBLE BUSINESS EXPENSES",
            &[
                "Enter your total deductible business expenses for the year.".to_string(),
                "This includes office rent, equipment, software, etc.".to_string(),
                format!("Maximum allowed: {}", format_currency(gross_income)),
                "Enter 0 if you have no deductible expenses.".to_string(),
            ],
        );

        let validator_config = config.clone();
        let raw = Text::new("Deductible expenses (€):")
            .with_validator(move |input: &str| -> Result<Validation, CustomUserError> {
                Ok(match validate_expenses(input, gross_income, &validator_config) {
                    Ok(_) => Validation::Valid,
                    Err(e) => Validation::Invalid(e.to_string().into()),
                })
            })
            .prompt()?;

        validate_expenses(&raw, gross_income, config)
    }

    fn frequency(&mut self) -> Result<PaymentFrequency, InputError> {
        let options = PaymentFrequency::ALL.map(FrequencyOption).to_vec();
        let FrequencyOption(frequency) =
            Select::new("SELECT PAYMENT FREQUENCY", options).prompt()?;
        Ok(frequency)
    }

    fn confirm(
        &mut self,
        inputs: &ValidatedInputs,
    ) -> Result<bool, InputError> {
        let rule = "=".repeat(RULE_WIDTH);
        println!("\n{rule}\nCONFIRM YOUR INPUTS\n{rule}");
        println!("{}", echo_inputs(inputs).join("\n"));
        println!("{rule}");

        let proceed = Confirm::new("Proceed with calculation?")
            .with_default(true)
            .prompt()?;
        Ok(proceed)
    }
}

/// The three input lines shown before confirming or computing.
pub fn echo_inputs(inputs: &ValidatedInputs) -> Vec<String> {
    vec![
        format!("{:<27}{}", "Gross Annual Income:", format_currency(inputs.gross_income)),
        format!(
            "{:<27}{}",
            "Deductible Expenses:",
            format_currency(inputs.deductible_expenses)
        ),
        format!("{:<27}{}", "Payment Frequency:", inputs.frequency.label()),
    ]
}
