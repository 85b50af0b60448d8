use std::path::{Path, PathBuf};

use clap::Parser;

/// Log file used when `--log-file` is not given.
pub const DEFAULT_LOG_FILE: &str = "tax_calculator_debug.log";

const EXAMPLES: &str = "\
Examples:
  # Interactive mode (default)
  greek-tax

  # Non-interactive mode
  greek-tax --income 50000 --expenses 10000 --frequency monthly

  # Hybrid mode (prompts only for missing values)
  greek-tax --income 50000

  # Custom output file (written inside ./output)
  greek-tax --income 50000 --expenses 10000 --frequency quarterly --output my_taxes.txt

  # Strict non-interactive (fail if required arguments are missing)
  greek-tax --income 50000 --expenses 10000 --frequency monthly --no-interactive";

/// Greek Freelancer Tax Calculator.
///
/// Calculates income tax, EFKA social security and VAT for a Greek
/// freelancer, prints a breakdown with a payment schedule, and saves the
/// report under ./output.
#[derive(Debug, Default, Parser)]
#[command(name = "greek-tax", version, about, long_about = None, after_help = EXAMPLES)]
pub struct Cli {
    /// Gross annual income in euros (e.g. 50000 for €50,000).
    #[arg(long, value_name = "AMOUNT", help_heading = "Calculation Options")]
    pub income: Option<String>,

    /// Deductible business expenses in euros.
    #[arg(long, value_name = "AMOUNT", help_heading = "Calculation Options")]
    pub expenses: Option<String>,

    /// Payment frequency: monthly, quarterly or annual.
    #[arg(long, value_name = "FREQUENCY", help_heading = "Calculation Options")]
    pub frequency: Option<String>,

    /// Custom report file name; only the file name is used, inside ./output.
    #[arg(long, value_name = "PATH", help_heading = "Calculation Options")]
    pub output: Option<PathBuf>,

    /// Fail instead of prompting when --income, --expenses or --frequency is missing.
    #[arg(long, default_value_t = false, help_heading = "Calculation Options")]
    pub no_interactive: bool,

    /// Print the tax configuration summary and exit.
    #[arg(long, default_value_t = false, help_heading = "Calculation Options")]
    pub show_config: bool,

    /// Verbose console logging (debug level).
    #[arg(
        short,
        long,
        default_value_t = false,
        conflicts_with = "quiet",
        help_heading = "Logging Options"
    )]
    pub verbose: bool,

    /// Quiet mode: only warnings and errors on the console.
    #[arg(short, long, default_value_t = false, help_heading = "Logging Options")]
    pub quiet: bool,

    /// Debug log file path.
    #[arg(
        long,
        value_name = "PATH",
        default_value = DEFAULT_LOG_FILE,
        help_heading = "Logging Options"
    )]
    pub log_file: PathBuf,

    /// Disable file logging.
    #[arg(long, default_value_t = false, help_heading = "Logging Options")]
    pub no_log_file: bool,
}

impl Cli {
    /// Console log level implied by `--verbose` / `--quiet`.
    pub fn console_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    /// True when any calculation value was given on the command line or
    /// strict mode was requested.
    pub fn has_calculation_args(&self) -> bool {
        self.income.is_some()
            || self.expenses.is_some()
            || self.frequency.is_some()
            || self.no_interactive
    }

    /// Flags still needed for a non-interactive run.
    pub fn missing_arguments(&self) -> Vec<&'static str> {
        [
            ("--income", self.income.is_none()),
            ("--expenses", self.expenses.is_none()),
            ("--frequency", self.frequency.is_none()),
        ]
        .into_iter()
        .filter_map(|(flag, missing)| missing.then_some(flag))
        .collect()
    }

    pub fn log_file(&self) -> Option<&Path> {
        (!self.no_log_file).then_some(self.log_file.as_path())
    }
}
