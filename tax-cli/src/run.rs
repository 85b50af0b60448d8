//! Mode selection and the calculate / display / save flow.
//!
//! | Mode            | Trigger                                  | Prompts             |
//! |-----------------|------------------------------------------|---------------------|
//! | Interactive     | no calculation flags                     | menu loop           |
//! | Non-interactive | `--income`, `--expenses`, `--frequency`  | none                |
//! | Hybrid          | some of the three                        | missing values + confirm |
//! | Strict          | `--no-interactive`                       | none; missing flags fail |

use chrono::Local;
use tax_core::{PaymentFrequency, TaxEngine, TaxEngineError, TaxResult, ValidatedInputs};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::cli::Cli;
use crate::input::{InputError, MenuChoice, Prompter, echo_inputs, validate_expenses, validate_income};
use crate::output::ReportWriter;
use crate::report::{CONSOLE_TITLE, FILE_TITLE, format_config_summary, render_report};
use crate::utils::format_currency;

const RULE_WIDTH: usize = 70;

/// Errors that end a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Strict mode was requested without every calculation value.
    #[error(
        "--no-interactive mode requires all of: --income, --expenses, --frequency (missing: {})",
        .0.join(", ")
    )]
    MissingArguments(Vec<&'static str>),

    #[error(transparent)]
    Input(InputError),

    #[error(transparent)]
    Engine(#[from] TaxEngineError),

    /// The user cancelled a prompt.
    #[error("input cancelled")]
    Cancelled,
}

impl From<InputError> for RunError {
    fn from(error: InputError) -> Self {
        match error {
            InputError::Cancelled => RunError::Cancelled,
            other => RunError::Input(other),
        }
    }
}

impl RunError {
    /// Short description without amounts; the full message may carry them
    /// and is only logged at debug level.
    pub fn kind(&self) -> &'static str {
        match self {
            RunError::MissingArguments(_) => "missing required arguments",
            RunError::Input(e) => e.kind(),
            RunError::Engine(TaxEngineError::InvalidIncome(_)) => "invalid gross income",
            RunError::Engine(TaxEngineError::InvalidExpenses(_)) => "invalid deductible expenses",
            RunError::Engine(TaxEngineError::InvalidFrequency(_)) => "invalid payment frequency",
            RunError::Engine(TaxEngineError::InvalidConfig(_)) => "invalid tax configuration",
            RunError::Cancelled => "input cancelled",
        }
    }

    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Cancelled => 0,
            RunError::MissingArguments(_) => 2,
            RunError::Input(_) | RunError::Engine(_) => 1,
        }
    }
}

fn banner(
    c: char,
    lines: &[&str],
) {
    let rule = c.to_string().repeat(RULE_WIDTH);
    println!("\n{rule}");
    for line in lines {
        println!("{line}");
    }
    println!("{rule}");
}

/// Entry point shared by the binary and tests.
///
/// # Errors
///
/// See [`RunError::exit_code`] for how each failure maps to an exit status.
pub fn run<P: Prompter>(
    cli: &Cli,
    engine: &TaxEngine,
    prompter: &mut P,
    writer: &ReportWriter,
) -> Result<(), RunError> {
    if cli.show_config {
        println!("{}", format_config_summary(engine.config()).join("\n"));
        return Ok(());
    }

    if cli.has_calculation_args() {
        info!("running with command line arguments");
        run_with_args(cli, engine, prompter, writer)
    } else {
        info!("running in interactive mode");
        run_interactive(cli, engine, prompter, writer)
    }
}

/// Non-interactive, hybrid and strict modes.
fn run_with_args<P: Prompter>(
    cli: &Cli,
    engine: &TaxEngine,
    prompter: &mut P,
    writer: &ReportWriter,
) -> Result<(), RunError> {
    let missing = cli.missing_arguments();
    if cli.no_interactive && !missing.is_empty() {
        return Err(RunError::MissingArguments(missing));
    }
    let hybrid = !missing.is_empty();
    let config = engine.config();

    // Flag values are checked before anything is prompted for.
    let frequency = cli
        .frequency
        .as_deref()
        .map(|raw| {
            PaymentFrequency::parse(raw)
                .ok_or_else(|| TaxEngineError::InvalidFrequency(raw.to_string()))
        })
        .transpose()?;

    if hybrid && !cli.quiet {
        banner(
            '=',
            &[
                "HYBRID MODE: Some arguments provided via command line",
                "You will be prompted for any missing required values",
            ],
        );
    }

    let gross_income = match cli.income.as_deref() {
        Some(raw) => validate_income(raw, config)?,
        None => prompter.gross_income(config)?,
    };
    let expenses = match cli.expenses.as_deref() {
        Some(raw) => validate_expenses(raw, gross_income, config)?,
        None => prompter.expenses(gross_income, config)?,
    };
    let frequency = match frequency {
        Some(frequency) => frequency,
        None => prompter.frequency()?,
    };

    let inputs = engine.validate_inputs(gross_income, expenses, frequency.as_str())?;

    if hybrid {
        if !prompter.confirm(&inputs)? {
            info!("calculation cancelled at confirmation");
            println!("\nCalculation cancelled.");
            return Ok(());
        }
    } else if !cli.quiet {
        banner('=', &["CALCULATION PARAMETERS (from command line)"]);
        println!("{}", echo_inputs(&inputs).join("\n"));
    }

    calculate_and_report(cli, engine, writer, &inputs)?;
    Ok(())
}

/// Menu loop; returns when the user picks Exit or cancels a prompt.
fn run_interactive<P: Prompter>(
    cli: &Cli,
    engine: &TaxEngine,
    prompter: &mut P,
    writer: &ReportWriter,
) -> Result<(), RunError> {
    banner('=', &["  GREEK FREELANCER TAX CALCULATOR"]);

    loop {
        match prompter.main_menu()? {
            MenuChoice::Exit => {
                info!("user selected exit");
                banner('=', &["Thank you for using the Greek Freelancer Tax Calculator!"]);
                return Ok(());
            }
            MenuChoice::NewCalculation => {
                info!("user selected new calculation");
                match interactive_calculation(cli, engine, prompter, writer) {
                    Ok(()) => {}
                    Err(RunError::Cancelled) => return Err(RunError::Cancelled),
                    Err(e) => {
                        error!(kind = e.kind(), "calculation failed");
                        debug!(error = %e, "calculation failure detail");
                        println!("\nCalculation failed: {e}");
                        println!("Returning to main menu...");
                    }
                }
            }
        }
    }
}

fn interactive_calculation<P: Prompter>(
    cli: &Cli,
    engine: &TaxEngine,
    prompter: &mut P,
    writer: &ReportWriter,
) -> Result<(), RunError> {
    banner('=', &["NEW TAX CALCULATION"]);

    let config = engine.config();
    let gross_income = prompter.gross_income(config)?;
    let expenses = prompter.expenses(gross_income, config)?;
    let frequency = prompter.frequency()?;

    let inputs = engine.validate_inputs(gross_income, expenses, frequency.as_str())?;
    if !prompter.confirm(&inputs)? {
        info!("calculation cancelled at confirmation");
        println!("\nCalculation cancelled. Returning to main menu.");
        return Ok(());
    }

    calculate_and_report(cli, engine, writer, &inputs)?;
    Ok(())
}

/// Computes, prints and saves one result.
///
/// A failure to save is reported as a warning; the calculation still counts
/// as successful.
pub fn calculate_and_report(
    cli: &Cli,
    engine: &TaxEngine,
    writer: &ReportWriter,
    inputs: &ValidatedInputs,
) -> Result<TaxResult, RunError> {
    info!("starting tax calculation");
    debug!(frequency = %inputs.frequency, "calculation parameters");

    if inputs.gross_income.is_zero() {
        info!("zero income calculation requested");
        banner(
            '=',
            &[
                "ZERO INCOME CALCULATION",
                "You have entered zero gross income.",
                "All tax calculations will be zero.",
                "This is useful for planning purposes or understanding tax structure.",
            ],
        );
    }

    let result = engine.calculate_validated(inputs);
    let now = Local::now().naive_local();

    println!();
    println!(
        "{}",
        render_report(&result, engine.config(), CONSOLE_TITLE, now).join("\n")
    );

    let lines = render_report(&result, engine.config(), FILE_TITLE, now);
    match writer.save(&lines, now, cli.output.as_deref()) {
        Ok(path) => println!("\nResults saved to: {}", path.display()),
        Err(e) => {
            error!(error = %e, "failed to save results");
            eprintln!("\nWarning: could not save results to file: {e}");
        }
    }

    info!("tax calculation completed");
    debug!(
        net_income = %format_currency(result.net_income),
        "calculation summary"
    );
    Ok(result)
}
