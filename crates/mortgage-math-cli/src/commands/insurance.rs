use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use mortgage_math_core::insurance::cmhc;
use mortgage_math_core::insurance::down_payment::{self, DownPaymentInput};
use mortgage_math_core::rate_to_percent;

use crate::input;

/// Arguments for the CMHC premium rate lookup
#[derive(Args)]
pub struct CmhcRateArgs {
    /// Down payment as a percentage of the purchase price (e.g. 12.5)
    #[arg(long, allow_negative_numbers = true)]
    pub percent: Decimal,
}

/// Arguments for down payment tier comparison
#[derive(Args)]
pub struct DownPaymentArgs {
    /// Purchase price
    #[arg(long)]
    pub home_price: Option<Decimal>,

    /// Down payment percentage to evaluate; repeat for several (default 5/10/15/20)
    #[arg(long = "percent")]
    pub percents: Vec<Decimal>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_cmhc_rate(args: CmhcRateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.percent < Decimal::ZERO || args.percent > Decimal::ONE_HUNDRED {
        return Err(format!("--percent must be between 0 and 100, got {}", args.percent).into());
    }
    let rate = cmhc::cmhc_premium_rate(args.percent);
    Ok(json!({
        "down_payment_percent": args.percent,
        "premium_rate": rate,
        "premium_rate_percent": rate_to_percent(rate),
    }))
}

pub fn run_down_payment(args: DownPaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dp_input: DownPaymentInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => DownPaymentInput {
            home_price: args
                .home_price
                .ok_or("--home-price is required (or provide --input)")?,
            percents: args.percents,
        },
    };

    let result = down_payment::calculate_down_payment_tiers(&dp_input)?;
    Ok(serde_json::to_value(result)?)
}
