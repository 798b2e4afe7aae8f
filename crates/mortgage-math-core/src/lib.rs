pub mod amortization;
pub mod error;
pub mod insurance;
pub mod tiers;
pub mod types;
pub mod validation;

#[cfg(feature = "land_transfer")]
pub mod land_transfer;

#[cfg(feature = "affordability")]
pub mod affordability;

#[cfg(feature = "eligibility")]
pub mod eligibility;

#[cfg(feature = "rates")]
pub mod rates;

pub use error::MortgageError;
pub use types::*;

/// Standard result type for all mortgage calculations
pub type MortgageResult<T> = Result<T, MortgageError>;
