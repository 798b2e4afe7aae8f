//! Lending lookup tables keyed by credit tier and employment status.
//!
//! Percentages in these tables are stored as fractions, except
//! [`CreditTier::min_down_payment_percent`] which is a policy threshold
//! quoted on the 0-100 scale.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{CreditTier, EmploymentStatus, Percent, Rate};

impl CreditTier {
    pub const ALL: [CreditTier; 5] = [
        CreditTier::Excellent,
        CreditTier::Good,
        CreditTier::Fair,
        CreditTier::Poor,
        CreditTier::VeryPoor,
    ];

    /// Haircut applied to the income-based loan amount.
    pub fn credit_multiplier(self) -> Decimal {
        match self {
            CreditTier::Excellent => dec!(1.00),
            CreditTier::Good => dec!(0.90),
            CreditTier::Fair => dec!(0.80),
            CreditTier::Poor => dec!(0.65),
            CreditTier::VeryPoor => dec!(0.50),
        }
    }

    /// Maximum monthly debts / monthly income before the file is declined.
    pub fn dti_ceiling(self) -> Rate {
        match self {
            CreditTier::Excellent => dec!(0.28),
            CreditTier::Good => dec!(0.32),
            CreditTier::Fair => dec!(0.36),
            CreditTier::Poor => dec!(0.40),
            CreditTier::VeryPoor => dec!(0.43),
        }
    }

    /// Base loan amount as a multiple of gross annual income.
    pub fn loan_to_income(self) -> Decimal {
        match self {
            CreditTier::Excellent => dec!(4.5),
            CreditTier::Good => dec!(4.0),
            CreditTier::Fair => dec!(3.5),
            CreditTier::Poor => dec!(3.0),
            CreditTier::VeryPoor => dec!(2.5),
        }
    }

    pub fn min_down_payment_percent(self) -> Percent {
        match self {
            CreditTier::Excellent => dec!(5),
            CreditTier::Good => dec!(10),
            CreditTier::Fair => dec!(15),
            CreditTier::Poor => dec!(20),
            CreditTier::VeryPoor => dec!(25),
        }
    }

    /// Indicative 5-year fixed contract rate offered to the tier.
    pub fn indicative_rate(self) -> Rate {
        match self {
            CreditTier::Excellent => dec!(0.0479),
            CreditTier::Good => dec!(0.0519),
            CreditTier::Fair => dec!(0.0579),
            CreditTier::Poor => dec!(0.0699),
            CreditTier::VeryPoor => dec!(0.0849),
        }
    }
}

impl EmploymentStatus {
    pub fn income_multiplier(self) -> Decimal {
        match self {
            EmploymentStatus::FullTime => dec!(1.00),
            EmploymentStatus::SelfEmployed => dec!(0.90),
            EmploymentStatus::Contract => dec!(0.85),
            EmploymentStatus::PartTime => dec!(0.80),
            EmploymentStatus::Retired => dec!(0.75),
        }
    }
}
