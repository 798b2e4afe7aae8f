use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageError;
use crate::types::{percent_to_rate, with_metadata, ComputationOutput, Money, PaymentFrequency, Percent, Rate};
use crate::MortgageResult;

/// Longest amortization accepted by the calculators.
pub const MAX_AMORTIZATION_YEARS: u32 = 50;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentInput {
    pub principal: Money,
    /// Nominal annual contract rate on the 0-100 scale (5.89 = 5.89%).
    pub annual_rate_percent: Percent,
    pub amortization_years: u32,
    #[serde(default)]
    pub frequency: PaymentFrequency,
    /// Attach a year-by-year amortization schedule to the output.
    #[serde(default)]
    pub include_schedule: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOutput {
    pub monthly_payment: Money,
    /// Payment at the requested frequency.
    pub payment: Money,
    pub frequency: PaymentFrequency,
    pub payments_per_year: u32,
    pub annual_payments: Money,
    /// Total paid over the full amortization on the monthly schedule.
    pub total_paid: Money,
    pub total_interest: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<AmortizationYear>>,
}

/// One year of a monthly amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationYear {
    pub year: u32,
    pub opening_balance: Money,
    pub interest_paid: Money,
    pub principal_paid: Money,
    pub closing_balance: Money,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
fn compound(rate: Rate, n: u32) -> MortgageResult<Decimal> {
    let factor = Decimal::ONE + rate;
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result
            .checked_mul(factor)
            .ok_or_else(|| MortgageError::ArithmeticOverflow {
                context: format!("compounding factor over {n} periods"),
            })?;
    }
    Ok(result)
}

fn not_computable(principal: Money, annual_rate: Rate, amortization_years: u32) -> Option<&'static str> {
    if principal <= Decimal::ZERO {
        Some("principal must be > 0")
    } else if annual_rate < Decimal::ZERO {
        Some("annual rate must not be negative")
    } else if amortization_years == 0 {
        Some("amortization must be at least one year")
    } else if amortization_years > MAX_AMORTIZATION_YEARS {
        Some("amortization must not exceed 50 years")
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Standard fixed-rate mortgage payment: P * r(1+r)^n / ((1+r)^n - 1),
/// with r the monthly rate and n the number of monthly payments.
///
/// Inputs that cannot produce a payment (non-positive principal, negative
/// rate, zero amortization) yield zero so calculators can display an empty
/// state. A zero rate amortizes straight-line.
pub fn monthly_payment(principal: Money, annual_rate: Rate, amortization_years: u32) -> MortgageResult<Money> {
    if not_computable(principal, annual_rate, amortization_years).is_some() {
        return Ok(Decimal::ZERO);
    }

    let total_months = amortization_years * 12;
    let monthly_rate = annual_rate / dec!(12);

    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(total_months));
    }

    let factor = compound(monthly_rate, total_months)?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        // Rate too small to register in 28 significant digits.
        return Ok(principal / Decimal::from(total_months));
    }

    let numerator = principal
        .checked_mul(monthly_rate)
        .and_then(|v| v.checked_mul(factor))
        .ok_or_else(|| MortgageError::ArithmeticOverflow {
            context: "mortgage payment numerator".into(),
        })?;

    Ok(numerator / denominator)
}

/// Convert a monthly payment to the requested payment frequency.
pub fn convert_frequency(monthly: Money, frequency: PaymentFrequency) -> Money {
    match frequency {
        PaymentFrequency::Monthly => monthly,
        PaymentFrequency::BiWeekly => monthly / dec!(2),
        PaymentFrequency::Weekly => monthly / dec!(4),
        PaymentFrequency::AcceleratedBiWeekly => monthly * dec!(12) / dec!(26),
        PaymentFrequency::AcceleratedWeekly => monthly * dec!(12) / dec!(52),
    }
}

/// Year-by-year balance run-off on the monthly schedule.
pub fn amortization_schedule(
    principal: Money,
    annual_rate: Rate,
    amortization_years: u32,
) -> MortgageResult<Vec<AmortizationYear>> {
    if not_computable(principal, annual_rate, amortization_years).is_some() {
        return Ok(Vec::new());
    }

    let payment = monthly_payment(principal, annual_rate, amortization_years)?;
    let monthly_rate = annual_rate / dec!(12);
    let mut balance = principal;
    let mut schedule = Vec::with_capacity(amortization_years as usize);

    for year in 1..=amortization_years {
        let opening = balance;
        let mut interest_paid = Decimal::ZERO;
        let mut principal_paid = Decimal::ZERO;

        for _ in 0..12 {
            if balance <= Decimal::ZERO {
                break;
            }
            let interest = balance * monthly_rate;
            // Final payment absorbs rounding so the loan closes at zero.
            let reduction = (payment - interest).min(balance);
            interest_paid += interest;
            principal_paid += reduction;
            balance -= reduction;
        }
        if year == amortization_years {
            principal_paid += balance;
            balance = Decimal::ZERO;
        }

        schedule.push(AmortizationYear {
            year,
            opening_balance: opening.round_dp(2),
            interest_paid: interest_paid.round_dp(2),
            principal_paid: principal_paid.round_dp(2),
            closing_balance: balance.round_dp(2),
        });
    }

    Ok(schedule)
}

/// Compute the periodic payment for a fixed-rate mortgage and its lifetime
/// cost on the monthly schedule.
pub fn calculate_payment(input: &PaymentInput) -> MortgageResult<ComputationOutput<PaymentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let annual_rate = percent_to_rate(input.annual_rate_percent);
    if let Some(reason) = not_computable(input.principal, annual_rate, input.amortization_years) {
        warnings.push(format!("Payment not computable: {reason}"));
    }
    if input.annual_rate_percent > dec!(25) {
        warnings.push(format!(
            "Annual rate of {}% is unusually high for a residential mortgage",
            input.annual_rate_percent
        ));
    }

    let monthly = monthly_payment(input.principal, annual_rate, input.amortization_years)?;
    let payment = convert_frequency(monthly, input.frequency);
    let payments_per_year = input.frequency.payments_per_year();

    let total_paid = if monthly.is_zero() {
        Decimal::ZERO
    } else {
        monthly * Decimal::from(u64::from(input.amortization_years) * 12)
    };
    let total_interest = if total_paid.is_zero() {
        Decimal::ZERO
    } else {
        (total_paid - input.principal).max(Decimal::ZERO)
    };

    let schedule = if input.include_schedule {
        Some(amortization_schedule(input.principal, annual_rate, input.amortization_years)?)
    } else {
        None
    };

    let output = PaymentOutput {
        monthly_payment: monthly.round_dp(2),
        payment: payment.round_dp(2),
        frequency: input.frequency,
        payments_per_year,
        annual_payments: (payment * Decimal::from(payments_per_year)).round_dp(2),
        total_paid: total_paid.round_dp(2),
        total_interest: total_interest.round_dp(2),
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "compounding": "monthly",
        "annual_rate": annual_rate.to_string(),
        "amortization_months": u64::from(input.amortization_years) * 12,
    });

    Ok(with_metadata(
        "Fixed-rate annuity payment (monthly compounding)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}
