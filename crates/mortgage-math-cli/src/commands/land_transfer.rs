use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_math_core::land_transfer::tax::{self, LandTransferTaxInput};
use mortgage_math_core::Province;

use crate::input;

/// Arguments for land transfer tax
#[derive(Args)]
pub struct LandTransferArgs {
    /// Province code or name (ON, BC, Quebec, ...)
    #[arg(long)]
    pub province: Option<Province>,

    /// Purchase price
    #[arg(long, alias = "home-price")]
    pub price: Option<Decimal>,

    /// Apply the first-time buyer rebate where the province offers one
    #[arg(long)]
    pub first_time_buyer: bool,

    /// Municipality levying its own tax (e.g. Toronto, Montreal)
    #[arg(long)]
    pub city: Option<String>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_land_transfer_tax(args: LandTransferArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ltt_input: LandTransferTaxInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => LandTransferTaxInput {
            province: args
                .province
                .ok_or("--province is required (or provide --input)")?,
            home_price: args.price.ok_or("--price is required (or provide --input)")?,
            is_first_time_buyer: args.first_time_buyer,
            city: args.city,
        },
    };

    let result = tax::calculate_land_transfer_tax(&ltt_input)?;
    Ok(serde_json::to_value(result)?)
}
