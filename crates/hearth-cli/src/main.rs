mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::compare::{CompareArgs, ValidateArgs};
use commands::fees::PurchaseFeesArgs;
use commands::mortgage::AmortizationArgs;
use commands::region::DefaultsArgs;
use commands::savings::{FutureValueArgs, SavingsArgs};
use commands::scenarios::SensitivityArgs;

/// Buy-versus-rent projections with decimal precision
#[derive(Parser)]
#[command(
    name = "hearth",
    version,
    about = "Buy-versus-rent projections with decimal precision",
    long_about = "Projects the net worth of buying a home against renting and investing \
                  the difference, year by year, using jurisdiction-specific fees, defaults \
                  and validation rules. Also prices mortgages, purchase fees and savings plans."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log engine progress to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Project buying against renting over a time horizon
    Compare(CompareArgs),
    /// Check a scenario against the jurisdiction's input rules
    Validate(ValidateArgs),
    /// Fixed-rate mortgage payment and amortization schedule
    Amortization(AmortizationArgs),
    /// One-time purchase costs (transfer duty, registration, closing costs)
    PurchaseFees(PurchaseFeesArgs),
    /// Future value of a lump sum plus monthly contributions
    FutureValue(FutureValueArgs),
    /// Two-way sensitivity grid of the buy-vs-rent difference
    Sensitivity(SensitivityArgs),
    /// Compare two savings plans side by side
    Savings(SavingsArgs),
    /// Print a jurisdiction's configuration and default inputs
    Defaults(DefaultsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::Validate(args) => commands::compare::run_validate(args),
        Commands::Amortization(args) => commands::mortgage::run_amortization(args),
        Commands::PurchaseFees(args) => commands::fees::run_purchase_fees(args),
        Commands::FutureValue(args) => commands::savings::run_future_value(args),
        Commands::Sensitivity(args) => commands::scenarios::run_sensitivity_grid(args),
        Commands::Savings(args) => commands::savings::run_savings(args),
        Commands::Defaults(args) => commands::region::run_defaults(args),
        Commands::Version => {
            println!("hearth {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
