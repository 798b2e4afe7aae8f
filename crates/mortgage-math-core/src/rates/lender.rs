use serde::{Deserialize, Serialize};

use crate::types::{percent_to_rate, Percent, Province, Rate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateProduct {
    Fixed,
    Variable,
}

/// A posted lender rate as served by the rates endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LenderRate {
    pub lender: String,
    pub product: RateProduct,
    pub term_years: u32,
    pub rate_percent: Percent,
    /// Province the rate is restricted to; `None` for national rates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<Province>,
}

impl LenderRate {
    pub fn rate(&self) -> Rate {
        percent_to_rate(self.rate_percent)
    }

    pub fn available_in(&self, province: Province) -> bool {
        self.province.map_or(true, |p| p == province)
    }
}

/// Lowest rate for a product and term, optionally restricted to rates
/// available in `province`.
pub fn best_rate<'a>(
    rates: &'a [LenderRate],
    product: RateProduct,
    term_years: u32,
    province: Option<Province>,
) -> Option<&'a LenderRate> {
    rates
        .iter()
        .filter(|r| r.product == product && r.term_years == term_years)
        .filter(|r| province.map_or(true, |p| r.available_in(p)))
        .min_by(|a, b| a.rate_percent.cmp(&b.rate_percent))
}
