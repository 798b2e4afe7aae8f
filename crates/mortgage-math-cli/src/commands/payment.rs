use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_math_core::amortization::{self, PaymentInput};
use mortgage_math_core::PaymentFrequency;

use super::parse_variant;
use crate::input;

/// Arguments for the amortizing payment calculation
#[derive(Args)]
pub struct PaymentArgs {
    /// Mortgage principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual contract rate as a percentage (e.g. 5.89)
    #[arg(long, alias = "rate")]
    pub annual_rate_percent: Option<Decimal>,

    /// Amortization period in years
    #[arg(long, alias = "years", default_value = "25")]
    pub amortization_years: u32,

    /// monthly, bi-weekly, weekly, accelerated-bi-weekly or accelerated-weekly
    #[arg(long, value_parser = parse_variant::<PaymentFrequency>)]
    pub frequency: Option<PaymentFrequency>,

    /// Include the year-by-year amortization schedule
    #[arg(long)]
    pub schedule: bool,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payment_input: PaymentInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => PaymentInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args
                .annual_rate_percent
                .ok_or("--annual-rate-percent is required (or provide --input)")?,
            amortization_years: args.amortization_years,
            frequency: args.frequency.unwrap_or_default(),
            include_schedule: args.schedule,
        },
    };

    let result = amortization::calculate_payment(&payment_input)?;
    Ok(serde_json::to_value(result)?)
}
