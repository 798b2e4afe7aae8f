use serde_json::Value;

use super::format_scalar;

/// Headline figure of each calculator, in priority order.
const PRIORITY_KEYS: [&str; 7] = [
    "max_home_price",
    "max_loan_amount",
    "total_tax",
    "payment",
    "premium_rate",
    "minimum_down_payment",
    "eligible",
];

/// Print just the key answer value from the output.
///
/// Looks for the calculator's headline field, then falls back to the first
/// field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        let headline = PRIORITY_KEYS
            .iter()
            .find_map(|k| map.get(*k).filter(|v| !v.is_null()));
        if let Some(val) = headline {
            println!("{}", format_scalar(val));
            return;
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val));
            return;
        }
    }

    println!("{}", format_scalar(result_obj));
}
