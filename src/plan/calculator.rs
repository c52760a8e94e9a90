//! Flat-rate installment calculator
//!
//! Interest is simple flat rate per annum:
//! `interest = principal * (rate / 100) * (duration / 12)`. The monthly
//! installment is the total payable divided by the duration, rounded UP to
//! the next whole currency unit so the sum of installments never falls short
//! of the total. The final installment may over-collect by a few units; that
//! is accepted, not reconciled.

use serde::Serialize;
use thiserror::Error;

/// Calculator input errors
#[derive(Error, Debug, PartialEq)]
pub enum CalculatorError {
    #[error("Principal must be a positive amount")]
    NonPositivePrincipal,

    #[error("Duration must be a positive number of months")]
    NonPositiveDuration,

    #[error("Interest rate must be a finite, non-negative percentage")]
    InvalidRate,
}

/// Derived terms for a loan plan
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanTerms {
    /// Principal plus flat interest over the full duration
    pub total_payable: f64,
    /// Fixed monthly installment in whole currency units
    pub installment_amount: i64,
}

/// Compute the total payable and fixed monthly installment for a plan
pub fn plan_terms(
    principal: i64,
    annual_rate_percent: f64,
    duration_months: i32,
) -> Result<PlanTerms, CalculatorError> {
    if principal <= 0 {
        return Err(CalculatorError::NonPositivePrincipal);
    }
    if duration_months <= 0 {
        return Err(CalculatorError::NonPositiveDuration);
    }
    if !annual_rate_percent.is_finite() || annual_rate_percent < 0.0 {
        return Err(CalculatorError::InvalidRate);
    }

    let principal = principal as f64;
    let duration = duration_months as f64;

    let interest = principal * (annual_rate_percent / 100.0) * (duration / 12.0);
    let total_payable = principal + interest;
    let installment_amount = (total_payable / duration).ceil() as i64;

    Ok(PlanTerms {
        total_payable,
        installment_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_twelve_month_plan() {
        // 20,000 at 20% flat over 12 months: 20000 * (1 + 0.20) = 24000
        let terms = plan_terms(20_000, 20.0, 12).unwrap();
        assert_eq!(terms.total_payable, 24_000.0);
        assert_eq!(terms.installment_amount, 2_000);
    }

    #[test]
    fn test_ceiling_never_under_collects() {
        for (principal, rate, duration) in [
            (10_000, 18.0, 10),
            (50_000, 22.5, 24),
            (7_777, 13.0, 7),
            (1, 0.0, 1),
            (99_999, 35.0, 18),
        ] {
            let terms = plan_terms(principal, rate, duration).unwrap();
            let collected = terms.installment_amount * duration as i64;
            assert!(
                collected as f64 >= terms.total_payable,
                "installments {} fall short of total {}",
                collected,
                terms.total_payable
            );
            // Over-collection is bounded by one installment's worth of rounding
            assert!(collected as f64 - terms.total_payable < duration as f64);
        }
    }

    #[test]
    fn test_zero_rate_plan() {
        let terms = plan_terms(12_000, 0.0, 12).unwrap();
        assert_eq!(terms.total_payable, 12_000.0);
        assert_eq!(terms.installment_amount, 1_000);
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        assert_eq!(
            plan_terms(0, 20.0, 12),
            Err(CalculatorError::NonPositivePrincipal)
        );
        assert_eq!(
            plan_terms(-500, 20.0, 12),
            Err(CalculatorError::NonPositivePrincipal)
        );
        assert_eq!(
            plan_terms(10_000, 20.0, 0),
            Err(CalculatorError::NonPositiveDuration)
        );
        assert_eq!(
            plan_terms(10_000, -1.0, 12),
            Err(CalculatorError::InvalidRate)
        );
        assert_eq!(
            plan_terms(10_000, f64::NAN, 12),
            Err(CalculatorError::InvalidRate)
        );
        assert_eq!(
            plan_terms(10_000, f64::INFINITY, 12),
            Err(CalculatorError::InvalidRate)
        );
    }
}
