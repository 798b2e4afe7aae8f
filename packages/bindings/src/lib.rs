use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use mortgage_math_core::rates::lender::{self, LenderRate, RateProduct};
use mortgage_math_core::{validation, Province};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_decimal(raw: &str) -> NapiResult<Decimal> {
    raw.trim().parse::<Decimal>().map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Insurance
// ---------------------------------------------------------------------------

/// Premium rate (fraction, as a decimal string) for a down payment percentage.
#[napi]
pub fn cmhc_premium_rate(down_payment_percent: String) -> NapiResult<String> {
    let percent = parse_decimal(&down_payment_percent)?;
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(to_napi_error(format!(
            "down payment percent must be between 0 and 100, got {percent}"
        )));
    }
    Ok(mortgage_math_core::insurance::cmhc::cmhc_premium_rate(percent).to_string())
}

#[napi]
pub fn down_payment_tiers(input_json: String) -> NapiResult<String> {
    let input: mortgage_math_core::insurance::down_payment::DownPaymentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage_math_core::insurance::down_payment::calculate_down_payment_tiers(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[napi]
pub fn mortgage_payment(input_json: String) -> NapiResult<String> {
    let input: mortgage_math_core::amortization::PaymentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        mortgage_math_core::amortization::calculate_payment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Land transfer tax
// ---------------------------------------------------------------------------

#[napi]
pub fn land_transfer_tax(input_json: String) -> NapiResult<String> {
    let input: mortgage_math_core::land_transfer::tax::LandTransferTaxInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage_math_core::land_transfer::tax::calculate_land_transfer_tax(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Built-in rate table for a province, so callers can edit and resubmit it.
#[napi]
pub fn land_transfer_rule(province: String) -> NapiResult<String> {
    let province: Province = province.parse().map_err(to_napi_error)?;
    let rule = mortgage_math_core::land_transfer::brackets::rule_for_province(province);
    serde_json::to_string(&rule).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct CustomRuleRequest {
    input: mortgage_math_core::land_transfer::tax::LandTransferTaxInput,
    rule: mortgage_math_core::land_transfer::brackets::LandTransferTaxRule,
}

#[napi]
pub fn land_transfer_tax_with_rule(request_json: String) -> NapiResult<String> {
    let request: CustomRuleRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let output = mortgage_math_core::land_transfer::tax::calculate_land_transfer_tax_with_rule(
        &request.input,
        &request.rule,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Affordability & eligibility
// ---------------------------------------------------------------------------

#[napi]
pub fn affordability(input_json: String) -> NapiResult<String> {
    let input: mortgage_math_core::affordability::stress_test::AffordabilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage_math_core::affordability::stress_test::calculate_affordability(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn eligibility(input_json: String) -> NapiResult<String> {
    let input: mortgage_math_core::eligibility::scoring::EligibilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = mortgage_math_core::eligibility::scoring::assess_eligibility(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Rates
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct BestRateRequest {
    rates: Vec<LenderRate>,
    product: RateProduct,
    term_years: u32,
    #[serde(default)]
    province: Option<Province>,
}

/// Lowest matching lender rate, or `null` when none qualifies.
#[napi]
pub fn best_rate(request_json: String) -> NapiResult<String> {
    let request: BestRateRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let best = lender::best_rate(&request.rates, request.product, request.term_years, request.province);
    serde_json::to_string(&best).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Form validation
// ---------------------------------------------------------------------------

#[napi]
pub fn parse_money(raw: String) -> NapiResult<String> {
    validation::parse_money(&raw)
        .map(|m| m.to_string())
        .map_err(to_napi_error)
}

#[napi]
pub fn parse_percent(raw: String) -> NapiResult<String> {
    validation::parse_percent(&raw)
        .map(|p| p.to_string())
        .map_err(to_napi_error)
}

#[napi]
pub fn validate_purchase(home_price: String, down_payment_percent: String) -> NapiResult<String> {
    let report = validation::validate_purchase(parse_decimal(&home_price)?, parse_decimal(&down_payment_percent)?);
    serde_json::to_string(&report).map_err(to_napi_error)
}

#[napi]
pub fn validate_income(annual_income: String, monthly_debts: String) -> NapiResult<String> {
    let report = validation::validate_income(parse_decimal(&annual_income)?, parse_decimal(&monthly_debts)?);
    serde_json::to_string(&report).map_err(to_napi_error)
}
