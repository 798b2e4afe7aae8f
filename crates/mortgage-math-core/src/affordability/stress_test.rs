use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{monthly_payment, MAX_AMORTIZATION_YEARS};
use crate::error::MortgageError;
use crate::types::{percent_to_rate, with_metadata, ComputationOutput, CreditTier, Money, Percent, Rate};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Qualification limits and search parameters. Defaults follow the federal
/// minimum qualifying rate rules and the standard 32/40 GDS/TDS limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AffordabilityAssumptions {
    pub max_gds: Rate,
    pub max_tds: Rate,
    /// Added to the contract rate to obtain the qualifying rate.
    pub stress_test_buffer: Rate,
    /// The qualifying rate never falls below this floor.
    pub stress_test_floor: Rate,
    pub amortization_years: u32,
    pub monthly_heating_cost: Money,
    /// Property tax estimate as a fraction of price per year.
    pub annual_property_tax_rate: Rate,
    /// First price tested is the down payment plus this offset.
    pub initial_price_offset: Money,
    /// Price increment between search steps (result granularity).
    pub price_step: Money,
    pub max_iterations: u32,
}

impl Default for AffordabilityAssumptions {
    fn default() -> Self {
        Self {
            max_gds: dec!(0.32),
            max_tds: dec!(0.40),
            stress_test_buffer: dec!(0.02),
            stress_test_floor: dec!(0.0525),
            amortization_years: 25,
            monthly_heating_cost: dec!(200),
            annual_property_tax_rate: dec!(0.01),
            initial_price_offset: dec!(100_000),
            price_step: dec!(10_000),
            max_iterations: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub annual_income: Money,
    pub monthly_debt_payments: Money,
    pub down_payment_available: Money,
    pub credit_tier: CreditTier,
    /// Contract rate (0-100) to stress instead of the credit tier's
    /// indicative rate, e.g. a quoted lender rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_rate_percent: Option<Percent>,
    #[serde(default)]
    pub assumptions: AffordabilityAssumptions,
}

/// Debt service ratios for one candidate purchase price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtServiceRatios {
    pub home_price: Money,
    pub loan_amount: Money,
    pub monthly_mortgage_payment: Money,
    pub monthly_property_tax: Money,
    pub gds: Rate,
    pub tds: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityResult {
    pub max_home_price: Money,
    pub max_loan_amount: Money,
    pub max_mortgage_payment: Money,
    pub actual_gds: Rate,
    pub actual_tds: Rate,
    pub contract_rate: Rate,
    pub stress_test_rate: Rate,
    /// Which limit stopped the search: "gds", "tds", "iteration_cap" or "none".
    pub limiting_factor: String,
    pub iterations: u32,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Minimum qualifying rate: the greater of contract + buffer and the floor.
pub fn stress_test_rate(contract_rate: Rate, assumptions: &AffordabilityAssumptions) -> Rate {
    (contract_rate + assumptions.stress_test_buffer).max(assumptions.stress_test_floor)
}

/// GDS and TDS for buying `home_price` with `down_payment`, with the mortgage
/// payment computed at `qualifying_rate`.
pub fn debt_service_ratios(
    home_price: Money,
    down_payment: Money,
    monthly_income: Money,
    monthly_debts: Money,
    qualifying_rate: Rate,
    assumptions: &AffordabilityAssumptions,
) -> MortgageResult<DebtServiceRatios> {
    if monthly_income <= Decimal::ZERO {
        return Err(MortgageError::invalid("monthly_income", "monthly income must be > 0"));
    }
    let loan_amount = (home_price - down_payment).max(Decimal::ZERO);
    let payment = monthly_payment(loan_amount, qualifying_rate, assumptions.amortization_years)?;
    let property_tax = home_price * assumptions.annual_property_tax_rate / dec!(12);
    let housing = payment + property_tax + assumptions.monthly_heating_cost;

    Ok(DebtServiceRatios {
        home_price,
        loan_amount,
        monthly_mortgage_payment: payment,
        monthly_property_tax: property_tax,
        gds: housing / monthly_income,
        tds: (housing + monthly_debts) / monthly_income,
    })
}

/// Search for the highest purchase price whose GDS and TDS at the stress-test
/// rate stay within limits.
///
/// Prices are tested in `price_step` increments starting at the down payment
/// plus `initial_price_offset`; the last passing price is returned, so the
/// result is accurate to one step.
pub fn calculate_affordability(
    input: &AffordabilityInput,
) -> MortgageResult<ComputationOutput<AffordabilityResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let a = &input.assumptions;

    validate_input(input)?;

    let contract_rate = input
        .contract_rate_percent
        .map(percent_to_rate)
        .unwrap_or_else(|| input.credit_tier.indicative_rate());
    let qualifying_rate = stress_test_rate(contract_rate, a);
    let down = input.down_payment_available;

    let mut accepted: Option<DebtServiceRatios> = None;
    let mut limiting_factor = "none";
    let mut iterations = 0u32;

    if input.annual_income.is_zero() {
        warnings.push("No income provided; affordability limited to the down payment".into());
    } else {
        let monthly_income = input.annual_income / dec!(12);

        for i in 0..a.max_iterations {
            iterations = i + 1;
            let price = down + a.initial_price_offset + a.price_step * Decimal::from(i);
            if price - down <= Decimal::ZERO {
                continue;
            }

            let ratios = debt_service_ratios(
                price,
                down,
                monthly_income,
                input.monthly_debt_payments,
                qualifying_rate,
                a,
            )?;
            tracing::trace!(price = %price, gds = %ratios.gds, tds = %ratios.tds, "affordability step");

            if ratios.gds > a.max_gds {
                limiting_factor = "gds";
                break;
            }
            if ratios.tds > a.max_tds {
                limiting_factor = "tds";
                break;
            }
            accepted = Some(ratios);
            if i + 1 == a.max_iterations {
                limiting_factor = "iteration_cap";
            }
        }
    }

    if limiting_factor == "iteration_cap" {
        warnings.push(format!(
            "Search stopped after {} steps; the buyer may afford more than reported",
            a.max_iterations
        ));
    }

    let result = match accepted {
        Some(r) => AffordabilityResult {
            max_home_price: r.home_price,
            max_loan_amount: r.loan_amount,
            max_mortgage_payment: r.monthly_mortgage_payment.round_dp(2),
            actual_gds: r.gds,
            actual_tds: r.tds,
            contract_rate,
            stress_test_rate: qualifying_rate,
            limiting_factor: limiting_factor.to_string(),
            iterations,
        },
        None => {
            warnings.push("No purchase price above the down payment satisfies the GDS/TDS limits".into());
            AffordabilityResult {
                max_home_price: down,
                max_loan_amount: Decimal::ZERO,
                max_mortgage_payment: Decimal::ZERO,
                actual_gds: Decimal::ZERO,
                actual_tds: Decimal::ZERO,
                contract_rate,
                stress_test_rate: qualifying_rate,
                limiting_factor: limiting_factor.to_string(),
                iterations,
            }
        }
    };

    tracing::debug!(
        max_home_price = %result.max_home_price,
        stress_test_rate = %qualifying_rate,
        limiting_factor = %result.limiting_factor,
        iterations,
        "affordability search finished"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::to_value(a)?;

    Ok(with_metadata(
        "GDS/TDS stress-test affordability (linear price search)",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &AffordabilityInput) -> MortgageResult<()> {
    if input.annual_income < Decimal::ZERO {
        return Err(MortgageError::invalid("annual_income", "annual income must not be negative"));
    }
    if input.monthly_debt_payments < Decimal::ZERO {
        return Err(MortgageError::invalid(
            "monthly_debt_payments",
            "monthly debt payments must not be negative",
        ));
    }
    if input.down_payment_available < Decimal::ZERO {
        return Err(MortgageError::invalid(
            "down_payment_available",
            "down payment must not be negative",
        ));
    }
    if input.assumptions.price_step <= Decimal::ZERO {
        return Err(MortgageError::invalid("price_step", "price step must be > 0"));
    }
    if input.assumptions.amortization_years == 0 || input.assumptions.amortization_years > MAX_AMORTIZATION_YEARS {
        return Err(MortgageError::invalid(
            "amortization_years",
            format!("amortization must be between 1 and {MAX_AMORTIZATION_YEARS} years"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> AffordabilityInput {
        AffordabilityInput {
            annual_income: dec!(120_000),
            monthly_debt_payments: dec!(500),
            down_payment_available: dec!(100_000),
            credit_tier: CreditTier::Good,
            contract_rate_percent: None,
            assumptions: AffordabilityAssumptions::default(),
        }
    }

    #[test]
    fn test_stress_rate_uses_buffer_above_floor() {
        let a = AffordabilityAssumptions::default();
        assert_eq!(stress_test_rate(dec!(0.0519), &a), dec!(0.0719));
    }

    #[test]
    fn test_stress_rate_floor_applies() {
        let a = AffordabilityAssumptions::default();
        assert_eq!(stress_test_rate(dec!(0.0299), &a), dec!(0.0525));
    }

    #[test]
    fn test_gds_bound_search() {
        let out = calculate_affordability(&sample_input()).unwrap().result;
        assert_eq!(out.stress_test_rate, dec!(0.0719));
        assert_eq!(out.max_home_price, dec!(460_000));
        assert_eq!(out.max_loan_amount, dec!(360_000));
        assert_eq!(out.limiting_factor, "gds");
        assert!(out.actual_gds <= dec!(0.32));
        assert!(out.actual_tds <= dec!(0.40));
    }

    #[test]
    fn test_tds_bound_search() {
        let mut input = sample_input();
        input.monthly_debt_payments = dec!(2_000);
        let out = calculate_affordability(&input).unwrap().result;
        assert_eq!(out.max_home_price, dec!(310_000));
        assert_eq!(out.limiting_factor, "tds");
    }

    #[test]
    fn test_contract_rate_override() {
        let mut input = sample_input();
        input.contract_rate_percent = Some(dec!(3.99));
        let out = calculate_affordability(&input).unwrap().result;
        assert_eq!(out.contract_rate, dec!(0.0399));
        assert_eq!(out.stress_test_rate, dec!(0.0599));
        // Lower qualifying rate buys more house.
        assert!(out.max_home_price > dec!(460_000));
    }

    #[test]
    fn test_no_income_falls_back_to_down_payment() {
        let mut input = sample_input();
        input.annual_income = Decimal::ZERO;
        let out = calculate_affordability(&input).unwrap();
        assert_eq!(out.result.max_home_price, dec!(100_000));
        assert_eq!(out.result.max_loan_amount, Decimal::ZERO);
        assert!(!out.warnings.is_empty());
    }

    #[test]
    fn test_heavy_debts_fall_back_to_down_payment() {
        let mut input = sample_input();
        input.monthly_debt_payments = dec!(5_000);
        let out = calculate_affordability(&input).unwrap().result;
        assert_eq!(out.max_home_price, dec!(100_000));
        assert_eq!(out.limiting_factor, "tds");
        assert_eq!(out.iterations, 1);
    }

    #[test]
    fn test_iteration_cap_warns() {
        let mut input = sample_input();
        input.annual_income = dec!(1_000_000);
        input.monthly_debt_payments = Decimal::ZERO;
        input.down_payment_available = dec!(500_000);
        input.credit_tier = CreditTier::Excellent;
        let out = calculate_affordability(&input).unwrap();
        assert_eq!(out.result.limiting_factor, "iteration_cap");
        assert_eq!(out.result.max_home_price, dec!(1_590_000));
        assert!(out.warnings.iter().any(|w| w.contains("100 steps")));
    }

    #[test]
    fn test_step_is_configurable() {
        let mut input = sample_input();
        input.assumptions.price_step = dec!(1_000);
        input.assumptions.max_iterations = 1_000;
        let fine = calculate_affordability(&input).unwrap().result;
        assert!(fine.max_home_price >= dec!(460_000));
        assert!(fine.max_home_price < dec!(470_000));
    }

    #[test]
    fn test_negative_income_rejected() {
        let mut input = sample_input();
        input.annual_income = dec!(-1);
        assert!(calculate_affordability(&input).is_err());
    }

    #[test]
    fn test_unbounded_amortization_rejected() {
        let mut input = sample_input();
        input.assumptions.amortization_years = 400_000_000;
        match calculate_affordability(&input).unwrap_err() {
            MortgageError::InvalidInput { field, .. } => assert_eq!(field, "amortization_years"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
