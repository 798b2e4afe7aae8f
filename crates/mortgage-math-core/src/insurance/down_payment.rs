use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageError;
use crate::insurance::cmhc::cmhc_premium_rate;
use crate::types::{percent_to_rate, with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::MortgageResult;

/// Purchase prices below this need 5% down.
pub const LOW_PRICE_THRESHOLD: Money = dec!(500_000);
/// At or above this price default insurance is unavailable and 20% is required.
pub const INSURABLE_PRICE_CEILING: Money = dec!(1_000_000);

/// Percentages compared in batch mode when the caller does not supply any.
pub const STANDARD_PERCENTS: [Percent; 4] = [dec!(5), dec!(10), dec!(15), dec!(20)];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownPaymentInput {
    pub home_price: Money,
    /// Down payment percentages (0-100) to evaluate. Empty means 5/10/15/20.
    #[serde(default)]
    pub percents: Vec<Percent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownPaymentTierResult {
    pub percent: Percent,
    pub down_payment: Money,
    pub mortgage_before_insurance: Money,
    pub insurance_rate: Rate,
    pub insurance_premium: Money,
    pub total_mortgage: Money,
    pub is_eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownPaymentOutput {
    pub home_price: Money,
    pub minimum_percent: Percent,
    pub minimum_down_payment: Money,
    pub insurance_available: bool,
    pub tiers: Vec<DownPaymentTierResult>,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Minimum down payment percentage for a purchase price.
pub fn minimum_down_payment_percent(home_price: Money) -> Percent {
    if home_price < LOW_PRICE_THRESHOLD {
        dec!(5)
    } else if home_price < INSURABLE_PRICE_CEILING {
        dec!(10)
    } else {
        dec!(20)
    }
}

fn eligibility_warning(home_price: Money, percent: Percent) -> Option<String> {
    let minimum = minimum_down_payment_percent(home_price);
    if percent >= minimum {
        return None;
    }
    let message = if home_price < LOW_PRICE_THRESHOLD {
        "Homes under $500,000 require a minimum down payment of 5%".to_string()
    } else if home_price < INSURABLE_PRICE_CEILING {
        "Homes between $500,000 and $1,000,000 require a minimum down payment of 10%".to_string()
    } else {
        "Homes of $1,000,000 or more require a minimum down payment of 20%; \
         mortgage default insurance is not available"
            .to_string()
    };
    Some(message)
}

/// Down payment, default insurance premium and total mortgage for a single
/// down payment percentage.
pub fn calculate_down_payment_tier(home_price: Money, percent: Percent) -> MortgageResult<DownPaymentTierResult> {
    validate_tier_input(home_price, percent)?;

    let down_payment = home_price * percent_to_rate(percent);
    let mortgage_before_insurance = home_price - down_payment;

    let insurance_rate = if home_price >= INSURABLE_PRICE_CEILING {
        Decimal::ZERO
    } else {
        cmhc_premium_rate(percent)
    };
    let insurance_premium = mortgage_before_insurance * insurance_rate;
    let warning_message = eligibility_warning(home_price, percent);

    Ok(DownPaymentTierResult {
        percent,
        down_payment,
        mortgage_before_insurance,
        insurance_rate,
        insurance_premium,
        total_mortgage: mortgage_before_insurance + insurance_premium,
        is_eligible: warning_message.is_none(),
        warning_message,
    })
}

/// Compare several down payment percentages for the same purchase price.
pub fn calculate_down_payment_tiers(
    input: &DownPaymentInput,
) -> MortgageResult<ComputationOutput<DownPaymentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let percents: Vec<Percent> = if input.percents.is_empty() {
        STANDARD_PERCENTS.to_vec()
    } else {
        input.percents.clone()
    };

    let tiers = percents
        .iter()
        .map(|p| calculate_down_payment_tier(input.home_price, *p))
        .collect::<MortgageResult<Vec<_>>>()?;

    if tiers.iter().all(|t| !t.is_eligible) {
        warnings.push("None of the requested down payments meet the minimum for this price".into());
    }

    let insurance_available = input.home_price < INSURABLE_PRICE_CEILING;
    if !insurance_available {
        warnings.push("Mortgage default insurance is unavailable at $1,000,000 and above".into());
    }

    let minimum_percent = minimum_down_payment_percent(input.home_price);
    let output = DownPaymentOutput {
        home_price: input.home_price,
        minimum_percent,
        minimum_down_payment: input.home_price * percent_to_rate(minimum_percent),
        insurance_available,
        tiers,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "premium_schedule": "CMHC 2.80% / 3.10% / 4.00%",
        "low_price_threshold": LOW_PRICE_THRESHOLD.to_string(),
        "insurable_price_ceiling": INSURABLE_PRICE_CEILING.to_string(),
    });

    Ok(with_metadata(
        "Minimum down payment and CMHC premium by tier",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_tier_input(home_price: Money, percent: Percent) -> MortgageResult<()> {
    if home_price <= Decimal::ZERO {
        return Err(MortgageError::invalid("home_price", "home price must be > 0"));
    }
    if percent < Decimal::ZERO || percent > dec!(100) {
        return Err(MortgageError::invalid(
            "percent",
            "down payment percent must be between 0 and 100",
        ));
    }
    Ok(())
}
