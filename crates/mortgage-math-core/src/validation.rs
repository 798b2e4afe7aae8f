//! Form-level validation for the calculators.
//!
//! The calculators fail fast on the first invalid field. Forms need every
//! problem at once, so these helpers collect messages into a
//! [`ValidationReport`] instead of returning an error.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::MortgageError;
use crate::types::{Money, Percent};
use crate::MortgageResult;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Parse a user-entered dollar amount such as `"$1,250,000.50"`.
pub fn parse_money(raw: &str) -> MortgageResult<Money> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '_' | ' '))
        .collect();
    if cleaned.is_empty() {
        return Err(MortgageError::invalid("amount", "a dollar amount is required"));
    }
    Decimal::from_str(&cleaned)
        .map_err(|_| MortgageError::invalid("amount", format!("'{raw}' is not a number")))
}

/// Parse a user-entered percentage such as `"12.5%"` onto the 0-100 scale.
pub fn parse_percent(raw: &str) -> MortgageResult<Percent> {
    let cleaned = raw.trim().trim_end_matches('%').trim();
    if cleaned.is_empty() {
        return Err(MortgageError::invalid("percent", "a percentage is required"));
    }
    Decimal::from_str(cleaned)
        .map_err(|_| MortgageError::invalid("percent", format!("'{raw}' is not a percentage")))
}

/// Check a purchase price and down payment percentage.
pub fn validate_purchase(home_price: Money, down_payment_percent: Percent) -> ValidationReport {
    let mut errors = Vec::new();
    if home_price <= Decimal::ZERO {
        errors.push("Home price must be greater than $0".to_string());
    }
    if down_payment_percent < Decimal::ZERO || down_payment_percent > dec!(100) {
        errors.push("Down payment must be between 0% and 100%".to_string());
    } else if down_payment_percent < dec!(5) {
        errors.push("Down payment must be at least 5% of the purchase price".to_string());
    }
    ValidationReport::from_errors(errors)
}

/// Check income and debt figures entered for affordability or eligibility.
pub fn validate_income(annual_income: Money, monthly_debts: Money) -> ValidationReport {
    let mut errors = Vec::new();
    if annual_income <= Decimal::ZERO {
        errors.push("Annual income must be greater than $0".to_string());
    }
    if monthly_debts < Decimal::ZERO {
        errors.push("Monthly debt payments cannot be negative".to_string());
    }
    if annual_income > Decimal::ZERO && monthly_debts * dec!(12) >= annual_income {
        errors.push("Monthly debt payments equal or exceed monthly income".to_string());
    }
    ValidationReport::from_errors(errors)
}
