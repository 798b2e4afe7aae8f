use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_math_core::affordability::stress_test::{self, AffordabilityAssumptions, AffordabilityInput};
use mortgage_math_core::CreditTier;

use super::parse_variant;
use crate::input;

/// Arguments for the stress-tested affordability search
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Gross annual household income
    #[arg(long)]
    pub annual_income: Option<Decimal>,

    /// Existing monthly debt payments (car, cards, loans)
    #[arg(long, default_value = "0")]
    pub monthly_debts: Decimal,

    /// Cash available for the down payment
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// excellent, good, fair, poor or very-poor
    #[arg(long, value_parser = parse_variant::<CreditTier>)]
    pub credit_tier: Option<CreditTier>,

    /// Quoted contract rate as a percentage; defaults to the tier's indicative rate
    #[arg(long)]
    pub contract_rate_percent: Option<Decimal>,

    /// Amortization period used to qualify
    #[arg(long)]
    pub amortization_years: Option<u32>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_affordability(args: AffordabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let aff_input: AffordabilityInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let mut assumptions = AffordabilityAssumptions::default();
            if let Some(years) = args.amortization_years {
                assumptions.amortization_years = years;
            }
            AffordabilityInput {
                annual_income: args
                    .annual_income
                    .ok_or("--annual-income is required (or provide --input)")?,
                monthly_debt_payments: args.monthly_debts,
                down_payment_available: args
                    .down_payment
                    .ok_or("--down-payment is required (or provide --input)")?,
                credit_tier: args.credit_tier.unwrap_or(CreditTier::Good),
                contract_rate_percent: args.contract_rate_percent,
                assumptions,
            }
        }
    };

    let result = stress_test::calculate_affordability(&aff_input)?;
    Ok(serde_json::to_value(result)?)
}
