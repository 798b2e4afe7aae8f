use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Percent, Rate};

/// One row of the mortgage default insurance premium schedule.
///
/// Covers down payments in `[min_percent, max_percent)`; the top row is
/// closed at 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumTier {
    pub min_percent: Percent,
    pub max_percent: Percent,
    pub rate: Rate,
}

const PREMIUM_TIERS: [PremiumTier; 4] = [
    PremiumTier {
        min_percent: dec!(20),
        max_percent: dec!(100),
        rate: dec!(0),
    },
    PremiumTier {
        min_percent: dec!(15),
        max_percent: dec!(20),
        rate: dec!(0.028),
    },
    PremiumTier {
        min_percent: dec!(10),
        max_percent: dec!(15),
        rate: dec!(0.031),
    },
    PremiumTier {
        min_percent: dec!(5),
        max_percent: dec!(10),
        rate: dec!(0.040),
    },
];

/// Premium applied below the 5% floor. Callers reject such down payments.
const FLOOR_RATE: Rate = dec!(0.040);

/// The premium schedule, highest down payment first.
pub fn cmhc_premium_tiers() -> &'static [PremiumTier] {
    &PREMIUM_TIERS
}

/// Premium rate (fraction of the insured loan) for a down payment percentage.
pub fn cmhc_premium_rate(down_payment_percent: Percent) -> Rate {
    if down_payment_percent >= dec!(100) {
        return Decimal::ZERO;
    }
    PREMIUM_TIERS
        .iter()
        .find(|t| down_payment_percent >= t.min_percent && down_payment_percent < t.max_percent)
        .map(|t| t.rate)
        .unwrap_or(FLOOR_RATE)
}
