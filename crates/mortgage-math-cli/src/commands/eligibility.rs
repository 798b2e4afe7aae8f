use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use mortgage_math_core::eligibility::scoring::{self, EligibilityInput};
use mortgage_math_core::{CreditTier, EmploymentStatus};

use super::parse_variant;
use crate::input;

/// Arguments for the eligibility pre-qualification
#[derive(Args)]
pub struct EligibilityArgs {
    /// Gross annual income
    #[arg(long)]
    pub annual_income: Option<Decimal>,

    /// full-time, self-employed, contract, part-time or retired
    #[arg(long, value_parser = parse_variant::<EmploymentStatus>)]
    pub employment: Option<EmploymentStatus>,

    /// excellent, good, fair, poor or very-poor
    #[arg(long, value_parser = parse_variant::<CreditTier>)]
    pub credit_tier: Option<CreditTier>,

    /// Cash available for the down payment
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Existing monthly debt payments
    #[arg(long, default_value = "0")]
    pub monthly_debts: Decimal,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_eligibility(args: EligibilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let elig_input: EligibilityInput = match input::load(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => EligibilityInput {
            annual_income: args
                .annual_income
                .ok_or("--annual-income is required (or provide --input)")?,
            employment_status: args.employment.unwrap_or(EmploymentStatus::FullTime),
            credit_tier: args
                .credit_tier
                .ok_or("--credit-tier is required (or provide --input)")?,
            down_payment: args.down_payment.unwrap_or(Decimal::ZERO),
            monthly_debts: args.monthly_debts,
        },
    };

    let result = scoring::assess_eligibility(&elig_input)?;
    Ok(serde_json::to_value(result)?)
}
