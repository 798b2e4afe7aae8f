use mortgage_math_core::land_transfer::brackets::{self, LandTransferTaxRule, MunicipalRule, TaxBracket};
use mortgage_math_core::land_transfer::tax::{self, LandTransferTaxInput};
use mortgage_math_core::Province;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn input(province: Province, price: Decimal, ftb: bool, city: Option<&str>) -> LandTransferTaxInput {
    LandTransferTaxInput {
        province,
        home_price: price,
        is_first_time_buyer: ftb,
        city: city.map(String::from),
    }
}

#[test]
fn test_ontario_toronto_500k_regression() {
    // Provincial and Toronto brackets are identical:
    //   55,000 * 0.5%  =   275
    //  195,000 * 1.0%  = 1,950
    //  150,000 * 1.5%  = 2,250
    //  100,000 * 2.0%  = 2,000
    //                    6,475 each -> 12,950
    let out = tax::calculate_land_transfer_tax(&input(Province::Ontario, dec!(500_000), false, Some("Toronto")))
        .unwrap()
        .result;
    assert_eq!(out.total_tax, dec!(12_950));
    assert_eq!(out.provincial_breakdown.len(), 4);
    assert_eq!(out.municipal_breakdown.len(), 4);
}

#[test]
fn test_montreal_uses_its_own_brackets() {
    // Provincial: 307.5 + 2,463 + 292,200 * 1.5% (4,383) = 7,153.5
    // Montreal caps the 1.5% slice at 552,300 (3,667.5) and charges
    // 2% on the remaining 47,700 (954) = 7,392
    let out = tax::calculate_land_transfer_tax(&input(Province::Quebec, dec!(600_000), false, Some("montreal")))
        .unwrap()
        .result;
    assert_eq!(out.provincial_tax, dec!(7_153.5));
    assert_eq!(out.municipal_tax, dec!(7_392));
    assert_eq!(out.total_tax, dec!(14_545.5));
}

#[test]
fn test_injected_rule_table() {
    let rule = LandTransferTaxRule {
        province: Province::NovaScotia,
        base_rates: vec![
            TaxBracket {
                up_to: Some(dec!(100_000)),
                rate: dec!(0.01),
            },
            TaxBracket {
                up_to: None,
                rate: dec!(0.02),
            },
        ],
        cities: vec![MunicipalRule {
            name: "Halifax".into(),
            brackets: vec![TaxBracket {
                up_to: None,
                rate: dec!(0.015),
            }],
        }],
        first_time_buyer_rebate: dec!(1_000),
    };
    let out = tax::calculate_land_transfer_tax_with_rule(
        &input(Province::NovaScotia, dec!(300_000), true, Some("Halifax")),
        &rule,
    )
    .unwrap()
    .result;
    // 1,000 + 4,000 provincial, 4,500 municipal, 1,000 rebate
    assert_eq!(out.provincial_tax, dec!(5_000));
    assert_eq!(out.municipal_tax, dec!(4_500));
    assert_eq!(out.total_tax, dec!(8_500));
}

#[test]
fn test_invalid_injected_rule_rejected() {
    let rule = LandTransferTaxRule {
        province: Province::NovaScotia,
        base_rates: vec![TaxBracket {
            up_to: Some(dec!(100_000)),
            rate: dec!(0.01),
        }],
        cities: vec![],
        first_time_buyer_rebate: Decimal::ZERO,
    };
    assert!(tax::calculate_land_transfer_tax_with_rule(&input(Province::NovaScotia, dec!(50_000), false, None), &rule)
        .is_err());
}

#[test]
fn test_rule_round_trips_through_json() {
    let rule = brackets::rule_for_province(Province::Ontario);
    let json = serde_json::to_string(&rule).unwrap();
    let back: LandTransferTaxRule = serde_json::from_str(&json).unwrap();
    assert_eq!(back, rule);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_tax_monotone_in_price(
        province_idx in 0usize..10,
        low in 1u64..4_000_000,
        bump in 0u64..1_000_000,
        ftb in any::<bool>(),
    ) {
        let province = Province::ALL[province_idx];
        let city = brackets::rule_for_province(province).cities.first().map(|c| c.name.clone());
        let at = |price: u64| {
            tax::calculate_land_transfer_tax(&input(province, Decimal::from(price), ftb, city.as_deref()))
                .unwrap()
                .result
                .total_tax
        };
        prop_assert!(at(low) <= at(low + bump));
    }

    #[test]
    fn prop_total_never_negative(province_idx in 0usize..10, price in 1u64..3_000_000) {
        let province = Province::ALL[province_idx];
        let out = tax::calculate_land_transfer_tax(&input(province, Decimal::from(price), true, None))
            .unwrap()
            .result;
        prop_assert!(out.total_tax >= Decimal::ZERO);
        prop_assert!(out.first_time_buyer_rebate <= out.provincial_tax);
    }
}
