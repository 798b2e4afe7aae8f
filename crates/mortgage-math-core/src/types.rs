use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MortgageError;

/// All monetary values (CAD). Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Percentages on the 0-100 scale. Only accepted at input boundaries, in
/// fields suffixed `_percent`, and converted with [`percent_to_rate`].
pub type Percent = Decimal;

pub fn percent_to_rate(percent: Percent) -> Rate {
    percent / dec!(100)
}

pub fn rate_to_percent(rate: Rate) -> Percent {
    rate * dec!(100)
}

/// Canadian province, serialized as its two-letter postal code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Province {
    #[serde(rename = "ON", alias = "on")]
    Ontario,
    #[serde(rename = "BC", alias = "bc")]
    BritishColumbia,
    #[serde(rename = "AB", alias = "ab")]
    Alberta,
    #[serde(rename = "QC", alias = "qc")]
    Quebec,
    #[serde(rename = "MB", alias = "mb")]
    Manitoba,
    #[serde(rename = "SK", alias = "sk")]
    Saskatchewan,
    #[serde(rename = "NS", alias = "ns")]
    NovaScotia,
    #[serde(rename = "NB", alias = "nb")]
    NewBrunswick,
    #[serde(rename = "PE", alias = "pe")]
    PrinceEdwardIsland,
    #[serde(rename = "NL", alias = "nl")]
    NewfoundlandAndLabrador,
}

impl Province {
    pub const ALL: [Province; 10] = [
        Province::Ontario,
        Province::BritishColumbia,
        Province::Alberta,
        Province::Quebec,
        Province::Manitoba,
        Province::Saskatchewan,
        Province::NovaScotia,
        Province::NewBrunswick,
        Province::PrinceEdwardIsland,
        Province::NewfoundlandAndLabrador,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Province::Ontario => "ON",
            Province::BritishColumbia => "BC",
            Province::Alberta => "AB",
            Province::Quebec => "QC",
            Province::Manitoba => "MB",
            Province::Saskatchewan => "SK",
            Province::NovaScotia => "NS",
            Province::NewBrunswick => "NB",
            Province::PrinceEdwardIsland => "PE",
            Province::NewfoundlandAndLabrador => "NL",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Province::Ontario => "Ontario",
            Province::BritishColumbia => "British Columbia",
            Province::Alberta => "Alberta",
            Province::Quebec => "Quebec",
            Province::Manitoba => "Manitoba",
            Province::Saskatchewan => "Saskatchewan",
            Province::NovaScotia => "Nova Scotia",
            Province::NewBrunswick => "New Brunswick",
            Province::PrinceEdwardIsland => "Prince Edward Island",
            Province::NewfoundlandAndLabrador => "Newfoundland and Labrador",
        }
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Province {
    type Err = MortgageError;

    /// Accepts a postal code ("ON") or the English name ("Ontario"),
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Province::ALL
            .iter()
            .copied()
            .find(|p| p.code().eq_ignore_ascii_case(needle) || p.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| MortgageError::UnknownProvince(s.to_string()))
    }
}

/// Credit score band used by the affordability and eligibility engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditTier {
    Excellent,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    FullTime,
    SelfEmployed,
    Contract,
    PartTime,
    Retired,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    BiWeekly,
    Weekly,
    AcceleratedBiWeekly,
    AcceleratedWeekly,
}

impl PaymentFrequency {
    pub fn payments_per_year(self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::BiWeekly | PaymentFrequency::AcceleratedBiWeekly => 26,
            PaymentFrequency::Weekly | PaymentFrequency::AcceleratedWeekly => 52,
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
