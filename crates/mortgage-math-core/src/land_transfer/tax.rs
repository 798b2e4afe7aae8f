use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageError;
use crate::land_transfer::brackets::{marginal_tax_breakdown, rule_for_province, BracketCharge, LandTransferTaxRule};
use crate::types::{with_metadata, ComputationOutput, Money, Province, Rate};
use crate::MortgageResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandTransferTaxInput {
    pub province: Province,
    pub home_price: Money,
    #[serde(default)]
    pub is_first_time_buyer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandTransferTaxOutput {
    pub province: Province,
    pub provincial_tax: Money,
    pub municipal_tax: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub municipality: Option<String>,
    pub first_time_buyer_rebate: Money,
    pub total_tax: Money,
    pub effective_rate: Rate,
    pub provincial_breakdown: Vec<BracketCharge>,
    pub municipal_breakdown: Vec<BracketCharge>,
}

/// Land transfer tax using the built-in table for the input's province.
pub fn calculate_land_transfer_tax(
    input: &LandTransferTaxInput,
) -> MortgageResult<ComputationOutput<LandTransferTaxOutput>> {
    let rule = rule_for_province(input.province);
    calculate_land_transfer_tax_with_rule(input, &rule)
}

/// Land transfer tax against a caller-supplied rule (e.g. an updated rate
/// table loaded from configuration).
pub fn calculate_land_transfer_tax_with_rule(
    input: &LandTransferTaxInput,
    rule: &LandTransferTaxRule,
) -> MortgageResult<ComputationOutput<LandTransferTaxOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.home_price <= Decimal::ZERO {
        return Err(MortgageError::invalid("home_price", "home price must be > 0"));
    }
    if rule.province != input.province {
        return Err(MortgageError::invalid(
            "province",
            format!("rule is for {} but input is for {}", rule.province, input.province),
        ));
    }
    rule.validate()?;

    // --- Provincial portion ---
    let provincial_breakdown = marginal_tax_breakdown(input.home_price, &rule.base_rates);
    let provincial_tax: Money = provincial_breakdown.iter().map(|c| c.tax).sum();

    if !rule.levies_tax() {
        warnings.push(format!("{} does not levy a provincial land transfer tax", rule.province.name()));
    }

    // --- Municipal portion ---
    let (municipality, municipal_breakdown) = match input.city.as_deref() {
        Some(name) => match rule.city(name) {
            Some(city) => (
                Some(city.name.clone()),
                marginal_tax_breakdown(input.home_price, &city.brackets),
            ),
            None => {
                warnings.push(format!(
                    "No municipal land transfer tax on record for '{name}'; provincial tax only"
                ));
                (None, Vec::new())
            }
        },
        None => (None, Vec::new()),
    };
    let municipal_tax: Money = municipal_breakdown.iter().map(|c| c.tax).sum();

    // --- First-time buyer rebate (provincial portion only) ---
    let rebate = if input.is_first_time_buyer {
        if rule.first_time_buyer_rebate.is_zero() && rule.levies_tax() {
            warnings.push(format!(
                "{} offers no provincial first-time buyer rebate",
                rule.province.name()
            ));
        }
        provincial_tax.min(rule.first_time_buyer_rebate)
    } else {
        Decimal::ZERO
    };

    let total_tax = (provincial_tax - rebate + municipal_tax).max(Decimal::ZERO);
    let effective_rate = total_tax / input.home_price;

    tracing::debug!(
        province = %input.province,
        price = %input.home_price,
        provincial = %provincial_tax,
        municipal = %municipal_tax,
        rebate = %rebate,
        "land transfer tax computed"
    );

    let output = LandTransferTaxOutput {
        province: input.province,
        provincial_tax,
        municipal_tax,
        municipality,
        first_time_buyer_rebate: rebate,
        total_tax,
        effective_rate,
        provincial_breakdown,
        municipal_breakdown,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "province": input.province.code(),
        "rebate_cap": rule.first_time_buyer_rebate.to_string(),
        "rebate_applies_to": "provincial tax only",
    });

    Ok(with_metadata(
        "Marginal-bracket land transfer tax (provincial + municipal)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}
