pub mod affordability;
pub mod eligibility;
pub mod insurance;
pub mod land_transfer;
pub mod payment;

use serde::de::DeserializeOwned;

/// Parse a snake_case enum flag value (`full-time`, `full_time`, `FULL_TIME`)
/// through its serde representation.
pub(crate) fn parse_variant<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|_| format!("unrecognised value '{raw}'"))
}
