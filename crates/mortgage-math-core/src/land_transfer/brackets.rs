use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::MortgageError;
use crate::types::{Money, Province, Rate};
use crate::MortgageResult;

/// A marginal bracket: `rate` applies to the slice of price between the
/// previous bracket's `up_to` and this one. `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub up_to: Option<Money>,
    pub rate: Rate,
}

/// Municipal land transfer tax levied on top of the provincial tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipalRule {
    pub name: String,
    pub brackets: Vec<TaxBracket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandTransferTaxRule {
    pub province: Province,
    pub base_rates: Vec<TaxBracket>,
    #[serde(default)]
    pub cities: Vec<MunicipalRule>,
    /// Cap on the first-time buyer rebate, applied to the provincial tax only.
    pub first_time_buyer_rebate: Money,
}

/// Tax charged within a single bracket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketCharge {
    pub from: Money,
    pub up_to: Option<Money>,
    pub rate: Rate,
    pub taxable_amount: Money,
    pub tax: Money,
}

/// Walk the brackets in ascending order and charge each slice of `amount` at
/// its bracket rate.
pub fn marginal_tax(amount: Money, brackets: &[TaxBracket]) -> Money {
    marginal_tax_breakdown(amount, brackets).iter().map(|c| c.tax).sum()
}

/// Like [`marginal_tax`] but reports the charge in every bracket touched.
pub fn marginal_tax_breakdown(amount: Money, brackets: &[TaxBracket]) -> Vec<BracketCharge> {
    let mut charges = Vec::new();
    let mut remaining = amount;
    let mut previous_threshold = Decimal::ZERO;

    for bracket in brackets {
        if remaining <= Decimal::ZERO {
            break;
        }
        let taxable = match bracket.up_to {
            Some(limit) => (limit - previous_threshold).min(remaining),
            None => remaining,
        };
        charges.push(BracketCharge {
            from: previous_threshold,
            up_to: bracket.up_to,
            rate: bracket.rate,
            taxable_amount: taxable,
            tax: taxable * bracket.rate,
        });
        remaining -= taxable;
        if let Some(limit) = bracket.up_to {
            previous_threshold = limit;
        }
    }

    charges
}

fn validate_brackets(owner: &str, brackets: &[TaxBracket]) -> MortgageResult<()> {
    let fail = |reason: String| MortgageError::InvalidRule {
        province: owner.to_string(),
        reason,
    };

    let last = brackets
        .last()
        .ok_or_else(|| fail("bracket table is empty".into()))?;
    if last.up_to.is_some() {
        return Err(fail("last bracket must be unbounded".into()));
    }

    let mut previous = Decimal::ZERO;
    for (i, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
            return Err(fail(format!("bracket {i} rate must be within 0..=1")));
        }
        match bracket.up_to {
            Some(limit) if limit <= previous => {
                return Err(fail(format!("bracket {i} threshold {limit} is not increasing")));
            }
            Some(limit) => previous = limit,
            None if i + 1 != brackets.len() => {
                return Err(fail(format!("bracket {i} is unbounded but not last")));
            }
            None => {}
        }
    }
    Ok(())
}

impl LandTransferTaxRule {
    /// Check that every bracket table is contiguous, strictly increasing and
    /// ends in an unbounded bracket.
    pub fn validate(&self) -> MortgageResult<()> {
        validate_brackets(self.province.code(), &self.base_rates)?;
        for city in &self.cities {
            validate_brackets(&format!("{} / {}", self.province.code(), city.name), &city.brackets)?;
        }
        if self.first_time_buyer_rebate < Decimal::ZERO {
            return Err(MortgageError::InvalidRule {
                province: self.province.code().into(),
                reason: "first-time buyer rebate must not be negative".into(),
            });
        }
        Ok(())
    }

    /// Municipal rule by case-insensitive name.
    pub fn city(&self, name: &str) -> Option<&MunicipalRule> {
        let needle = name.trim();
        self.cities.iter().find(|c| c.name.eq_ignore_ascii_case(needle))
    }

    /// Whether the province levies any provincial land transfer tax.
    pub fn levies_tax(&self) -> bool {
        self.base_rates.iter().any(|b| !b.rate.is_zero())
    }
}

// ---------------------------------------------------------------------------
// Built-in tables
// ---------------------------------------------------------------------------

fn bracket(up_to: Money, rate: Rate) -> TaxBracket {
    TaxBracket {
        up_to: Some(up_to),
        rate,
    }
}

fn top(rate: Rate) -> TaxBracket {
    TaxBracket { up_to: None, rate }
}

fn ontario_brackets() -> Vec<TaxBracket> {
    vec![
        bracket(dec!(55_000), dec!(0.005)),
        bracket(dec!(250_000), dec!(0.01)),
        bracket(dec!(400_000), dec!(0.015)),
        bracket(dec!(2_000_000), dec!(0.02)),
        top(dec!(0.025)),
    ]
}

/// The built-in land transfer tax rule for a province.
pub fn rule_for_province(province: Province) -> LandTransferTaxRule {
    let (base_rates, cities, first_time_buyer_rebate) = match province {
        Province::Ontario => (
            ontario_brackets(),
            vec![MunicipalRule {
                name: "Toronto".into(),
                brackets: ontario_brackets(),
            }],
            dec!(4_000),
        ),
        Province::BritishColumbia => (
            vec![
                bracket(dec!(200_000), dec!(0.01)),
                bracket(dec!(2_000_000), dec!(0.02)),
                bracket(dec!(3_000_000), dec!(0.03)),
                top(dec!(0.05)),
            ],
            vec![],
            dec!(8_000),
        ),
        Province::Quebec => (
            vec![
                bracket(dec!(61_500), dec!(0.005)),
                bracket(dec!(307_800), dec!(0.01)),
                top(dec!(0.015)),
            ],
            vec![MunicipalRule {
                name: "Montreal".into(),
                brackets: vec![
                    bracket(dec!(61_500), dec!(0.005)),
                    bracket(dec!(307_800), dec!(0.01)),
                    bracket(dec!(552_300), dec!(0.015)),
                    bracket(dec!(1_104_700), dec!(0.02)),
                    bracket(dec!(2_136_500), dec!(0.025)),
                    bracket(dec!(3_113_000), dec!(0.035)),
                    top(dec!(0.04)),
                ],
            }],
            Decimal::ZERO,
        ),
        Province::Manitoba => (
            vec![
                bracket(dec!(30_000), Decimal::ZERO),
                bracket(dec!(90_000), dec!(0.005)),
                bracket(dec!(150_000), dec!(0.01)),
                bracket(dec!(200_000), dec!(0.015)),
                top(dec!(0.02)),
            ],
            vec![],
            Decimal::ZERO,
        ),
        Province::NewBrunswick => (vec![top(dec!(0.01))], vec![], Decimal::ZERO),
        Province::NovaScotia => (vec![top(dec!(0.015))], vec![], Decimal::ZERO),
        Province::PrinceEdwardIsland => (vec![top(dec!(0.01))], vec![], dec!(2_000)),
        Province::NewfoundlandAndLabrador => (vec![top(dec!(0.004))], vec![], Decimal::ZERO),
        Province::Alberta | Province::Saskatchewan => (vec![top(Decimal::ZERO)], vec![], Decimal::ZERO),
    };

    LandTransferTaxRule {
        province,
        base_rates,
        cities,
        first_time_buyer_rebate,
    }
}
