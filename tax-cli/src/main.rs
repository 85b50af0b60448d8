use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error, info};

use tax_cli::cli::Cli;
use tax_cli::input::InquirePrompter;
use tax_cli::logging;
use tax_cli::output::ReportWriter;
use tax_cli::run::{RunError, run};
use tax_core::TaxEngine;

// ─── logging ─────────────────────────────────────────────────────────────────

/// Console logging always starts; a log file that cannot be opened only
/// produces a warning.
fn init_tracing(cli: &Cli) {
    logging::init_logging(cli.console_filter());

    if let Some(path) = cli.log_file() {
        if let Err(e) = logging::enable_file_logging(path) {
            eprintln!("Warning: {e}");
            eprintln!("Continuing without file logging.");
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);
    info!("Greek Freelancer Tax Calculator starting");

    let engine = TaxEngine::default();
    let writer = ReportWriter::default();
    let mut prompter = InquirePrompter;

    match run(&cli, &engine, &mut prompter, &writer) {
        Ok(()) => ExitCode::SUCCESS,
        Err(RunError::Cancelled) => {
            info!("input cancelled by user");
            println!("\nInput cancelled.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(kind = e.kind(), "run failed");
            debug!(error = %e, "run failure detail");
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
