use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::monthly_payment;
use crate::error::MortgageError;
use crate::types::{
    percent_to_rate, with_metadata, ComputationOutput, CreditTier, EmploymentStatus, Money, Rate,
};
use crate::MortgageResult;

/// Amortization used for the indicative payment estimate.
const ESTIMATE_AMORTIZATION_YEARS: u32 = 25;
/// Maximum share of the base loan removed as DTI approaches the ceiling.
const DTI_PENALTY: Decimal = dec!(0.2);
const HIGH_CONFIDENCE_DTI: Rate = dec!(0.25);
const LOW_CONFIDENCE_DTI: Rate = dec!(0.35);
const MAX_RECOMMENDATIONS: usize = 5;
const GENERIC_TIPS: [&str; 2] = [
    "Get pre-approved to hold your rate for up to 120 days while you shop",
    "Compare fixed and variable rate options with a licensed mortgage broker",
];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityInput {
    pub annual_income: Money,
    pub employment_status: EmploymentStatus,
    pub credit_tier: CreditTier,
    pub down_payment: Money,
    pub monthly_debts: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub eligible: bool,
    pub max_loan_amount: Money,
    pub max_purchase_price: Money,
    pub confidence: Confidence,
    pub dti_ratio: Rate,
    pub dti_ceiling: Rate,
    pub required_down_payment: Money,
    pub interest_rate: Rate,
    pub estimated_monthly_payment: Money,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Pre-qualification estimate: maximum loan from income, credit tier,
/// employment stability and existing debts, with a confidence rating and
/// advice for the applicant.
pub fn assess_eligibility(input: &EligibilityInput) -> MortgageResult<ComputationOutput<EligibilityResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let tier = input.credit_tier;
    let dti_ceiling = tier.dti_ceiling();
    let interest_rate = tier.indicative_rate();

    let result = if input.annual_income <= Decimal::ZERO {
        rejected(input, Decimal::ZERO, "Annual income must be greater than zero")
    } else {
        // monthly debts / monthly income, arranged to stay exact in Decimal
        let dti_ratio = input.monthly_debts * dec!(12) / input.annual_income;

        if dti_ratio > dti_ceiling {
            rejected(
                input,
                dti_ratio,
                &format!(
                    "Debt-to-income ratio of {}% exceeds the {}% limit for {} credit",
                    (dti_ratio * dec!(100)).round_dp(1),
                    (dti_ceiling * dec!(100)).round_dp(1),
                    tier_label(tier)
                ),
            )
        } else {
            let base_loan = (input.annual_income
                * tier.loan_to_income()
                * tier.credit_multiplier()
                * input.employment_status.income_multiplier()
                * (Decimal::ONE - (dti_ratio / dti_ceiling) * DTI_PENALTY))
                .round_dp(2);
            let required_down = (base_loan * percent_to_rate(tier.min_down_payment_percent())).round_dp(2);

            if input.down_payment < required_down {
                let mut r = rejected(
                    input,
                    dti_ratio,
                    &format!(
                        "Down payment of ${} is below the required ${} ({}% for {} credit)",
                        input.down_payment.round_dp(2),
                        required_down,
                        tier.min_down_payment_percent(),
                        tier_label(tier)
                    ),
                );
                r.required_down_payment = required_down;
                r
            } else {
                let max_purchase_price = base_loan + input.down_payment;
                let payment = monthly_payment(base_loan, interest_rate, ESTIMATE_AMORTIZATION_YEARS)?;

                EligibilityResult {
                    eligible: true,
                    max_loan_amount: base_loan,
                    max_purchase_price,
                    confidence: confidence(tier, input.employment_status, dti_ratio),
                    dti_ratio,
                    dti_ceiling,
                    required_down_payment: required_down,
                    interest_rate,
                    estimated_monthly_payment: payment.round_dp(2),
                    recommendations: recommendations(input, dti_ratio, Some(max_purchase_price)),
                    rejection_reason: None,
                }
            }
        }
    };

    if let Some(reason) = &result.rejection_reason {
        tracing::debug!(credit_tier = ?tier, reason = %reason, "eligibility rejected");
        warnings.push(reason.clone());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "loan_to_income": tier.loan_to_income().to_string(),
        "credit_multiplier": tier.credit_multiplier().to_string(),
        "employment_multiplier": input.employment_status.income_multiplier().to_string(),
        "min_down_payment_percent": tier.min_down_payment_percent().to_string(),
        "estimate_amortization_years": ESTIMATE_AMORTIZATION_YEARS,
    });

    Ok(with_metadata(
        "Income-multiple eligibility with credit, employment and DTI adjustments",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

/// High only for excellent credit, full-time work and DTI under 25%; low for
/// very poor credit or DTI over 35%.
pub fn confidence(tier: CreditTier, employment: EmploymentStatus, dti_ratio: Rate) -> Confidence {
    if tier == CreditTier::Excellent && employment == EmploymentStatus::FullTime && dti_ratio < HIGH_CONFIDENCE_DTI {
        Confidence::High
    } else if tier == CreditTier::VeryPoor || dti_ratio > LOW_CONFIDENCE_DTI {
        Confidence::Low
    } else {
        Confidence::Medium
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn rejected(input: &EligibilityInput, dti_ratio: Rate, reason: &str) -> EligibilityResult {
    EligibilityResult {
        eligible: false,
        max_loan_amount: Decimal::ZERO,
        max_purchase_price: Decimal::ZERO,
        confidence: Confidence::Low,
        dti_ratio,
        dti_ceiling: input.credit_tier.dti_ceiling(),
        required_down_payment: Decimal::ZERO,
        interest_rate: input.credit_tier.indicative_rate(),
        estimated_monthly_payment: Decimal::ZERO,
        recommendations: recommendations(input, dti_ratio, None),
        rejection_reason: Some(reason.to_string()),
    }
}

/// Threshold-driven advice first (at most three), then the generic tips.
fn recommendations(input: &EligibilityInput, dti_ratio: Rate, max_purchase_price: Option<Money>) -> Vec<String> {
    let mut tips: Vec<String> = Vec::new();

    if matches!(input.credit_tier, CreditTier::Fair | CreditTier::Poor | CreditTier::VeryPoor) {
        tips.push(
            "Improve your credit score by paying bills on time and keeping card balances below 30% of their limits"
                .into(),
        );
    }

    match input.employment_status {
        EmploymentStatus::FullTime => {}
        EmploymentStatus::SelfEmployed => tips.push(
            "Have two years of tax returns and Notices of Assessment ready to document self-employed income".into(),
        ),
        EmploymentStatus::Retired => {
            tips.push("Provide pension and investment statements to document retirement income".into())
        }
        EmploymentStatus::Contract | EmploymentStatus::PartTime => {
            tips.push("Two years of continuous employment history strengthens your application".into())
        }
    }

    if dti_ratio > input.credit_tier.dti_ceiling() * dec!(0.75) {
        tips.push("Paying down existing debts will lower your debt-to-income ratio and raise your borrowing power".into());
    }

    let low_down_payment = match max_purchase_price {
        Some(price) if price > Decimal::ZERO => input.down_payment / price < dec!(0.20),
        _ => input.down_payment.is_zero(),
    };
    if low_down_payment {
        tips.push("A down payment of 20% or more avoids CMHC mortgage default insurance premiums".into());
    }

    tips.truncate(MAX_RECOMMENDATIONS - GENERIC_TIPS.len());
    tips.extend(GENERIC_TIPS.iter().map(|t| t.to_string()));
    tips
}

fn tier_label(tier: CreditTier) -> &'static str {
    match tier {
        CreditTier::Excellent => "excellent",
        CreditTier::Good => "good",
        CreditTier::Fair => "fair",
        CreditTier::Poor => "poor",
        CreditTier::VeryPoor => "very poor",
    }
}

fn validate_input(input: &EligibilityInput) -> MortgageResult<()> {
    if input.down_payment < Decimal::ZERO {
        return Err(MortgageError::invalid("down_payment", "down payment must not be negative"));
    }
    if input.monthly_debts < Decimal::ZERO {
        return Err(MortgageError::invalid("monthly_debts", "monthly debts must not be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strong_applicant() -> EligibilityInput {
        EligibilityInput {
            annual_income: dec!(100_000),
            employment_status: EmploymentStatus::FullTime,
            credit_tier: CreditTier::Excellent,
            down_payment: dec!(50_000),
            monthly_debts: dec!(500),
        }
    }

    #[test]
    fn test_strong_applicant_base_loan() {
        let out = assess_eligibility(&strong_applicant()).unwrap().result;
        assert!(out.eligible);
        // dti = 500 / 8333.33 = 0.06; factor = 1 - (0.06/0.28)*0.2
        // base = 100k * 4.5 * (1 - 0.0428571...) ≈ 430,714.29
        assert_eq!(out.max_loan_amount, dec!(430_714.29));
        assert_eq!(out.max_purchase_price, dec!(480_714.29));
        assert_eq!(out.confidence, Confidence::High);
        assert_eq!(out.interest_rate, dec!(0.0479));
        assert!(out.estimated_monthly_payment > Decimal::ZERO);
    }

    #[test]
    fn test_zero_income_rejected() {
        let mut input = strong_applicant();
        input.annual_income = Decimal::ZERO;
        let out = assess_eligibility(&input).unwrap();
        assert!(!out.result.eligible);
        assert_eq!(out.result.max_loan_amount, Decimal::ZERO);
        assert!(out.result.rejection_reason.is_some());
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_dti_over_ceiling_rejected() {
        let mut input = strong_applicant();
        input.monthly_debts = dec!(2_500); // 30% > 28%
        let out = assess_eligibility(&input).unwrap().result;
        assert!(!out.eligible);
        assert_eq!(out.dti_ratio, dec!(0.3));
        assert!(out.rejection_reason.unwrap().contains("28"));
    }

    #[test]
    fn test_insufficient_down_payment_rejected() {
        let mut input = strong_applicant();
        input.credit_tier = CreditTier::Poor;
        input.down_payment = dec!(10_000);
        let out = assess_eligibility(&input).unwrap().result;
        assert!(!out.eligible);
        assert!(out.required_down_payment > dec!(10_000));
        assert!(out.rejection_reason.unwrap().contains("Down payment"));
    }

    #[test]
    fn test_confidence_rules() {
        use CreditTier::*;
        use EmploymentStatus::*;
        assert_eq!(confidence(Excellent, FullTime, dec!(0.10)), Confidence::High);
        assert_eq!(confidence(Excellent, FullTime, dec!(0.25)), Confidence::Medium);
        assert_eq!(confidence(Excellent, Contract, dec!(0.10)), Confidence::Medium);
        assert_eq!(confidence(Good, FullTime, dec!(0.10)), Confidence::Medium);
        assert_eq!(confidence(VeryPoor, FullTime, dec!(0.10)), Confidence::Low);
        assert_eq!(confidence(Poor, FullTime, dec!(0.36)), Confidence::Low);
    }

    #[test]
    fn test_employment_multiplier_reduces_loan() {
        let full = assess_eligibility(&strong_applicant()).unwrap().result;
        let mut input = strong_applicant();
        input.employment_status = EmploymentStatus::Retired;
        let retired = assess_eligibility(&input).unwrap().result;
        assert!(retired.max_loan_amount < full.max_loan_amount);
    }

    #[test]
    fn test_recommendations_capped_and_generic_tips_kept() {
        let input = EligibilityInput {
            annual_income: dec!(60_000),
            employment_status: EmploymentStatus::SelfEmployed,
            credit_tier: CreditTier::Fair,
            down_payment: dec!(30_000),
            monthly_debts: dec!(1_500), // 30% of monthly income, above 0.75 * 36%
        };
        let out = assess_eligibility(&input).unwrap().result;
        assert_eq!(out.recommendations.len(), 5);
        assert_eq!(out.recommendations[3], GENERIC_TIPS[0]);
        assert_eq!(out.recommendations[4], GENERIC_TIPS[1]);
        assert!(out.recommendations[0].contains("credit score"));
    }

    #[test]
    fn test_clean_file_gets_only_generic_advice() {
        let mut input = strong_applicant();
        input.down_payment = dec!(200_000);
        let out = assess_eligibility(&input).unwrap().result;
        assert_eq!(out.recommendations, GENERIC_TIPS.iter().map(|t| t.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn test_negative_debts_rejected_as_invalid() {
        let mut input = strong_applicant();
        input.monthly_debts = dec!(-1);
        assert!(assess_eligibility(&input).is_err());
    }
}
