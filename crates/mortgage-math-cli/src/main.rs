mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::affordability::AffordabilityArgs;
use commands::eligibility::EligibilityArgs;
use commands::insurance::{CmhcRateArgs, DownPaymentArgs};
use commands::land_transfer::LandTransferArgs;
use commands::payment::PaymentArgs;

/// Canadian mortgage arithmetic
#[derive(Parser)]
#[command(
    name = "mtg",
    version,
    about = "Canadian mortgage arithmetic",
    long_about = "A CLI for Canadian home-purchase calculations with decimal precision. \
                  Supports CMHC insurance premiums, down payment tiers, amortizing payments, \
                  provincial and municipal land transfer tax, stress-tested affordability, \
                  and eligibility pre-qualification."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculation details to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the CMHC premium rate for a down payment percentage
    CmhcRate(CmhcRateArgs),
    /// Compare down payment tiers for a purchase price
    DownPayment(DownPaymentArgs),
    /// Calculate the amortizing mortgage payment
    Payment(PaymentArgs),
    /// Calculate provincial and municipal land transfer tax
    LandTransferTax(LandTransferArgs),
    /// Find the maximum affordable price under the stress test
    Affordability(AffordabilityArgs),
    /// Pre-qualify a borrower and estimate the maximum loan
    Eligibility(EligibilityArgs),
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
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mortgage_math_core=debug,mtg=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // stdout carries the result document
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::CmhcRate(args) => commands::insurance::run_cmhc_rate(args),
        Commands::DownPayment(args) => commands::insurance::run_down_payment(args),
        Commands::Payment(args) => commands::payment::run_payment(args),
        Commands::LandTransferTax(args) => commands::land_transfer::run_land_transfer_tax(args),
        Commands::Affordability(args) => commands::affordability::run_affordability(args),
        Commands::Eligibility(args) => commands::eligibility::run_eligibility(args),
        Commands::Version => {
            println!("mtg {}", env!("CARGO_PKG_VERSION"));
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
