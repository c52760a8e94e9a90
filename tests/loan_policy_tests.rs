//! Loan calculator and issuance policy tests
//!
//! These exercise the pure lending rules: the flat-rate installment
//! calculation and the two issuance gates (active-loan exclusivity and the
//! first-loan principal cap).

use stratos_server::loan::{check_issuance, IssuanceError, FIRST_LOAN_PRINCIPAL_CAP};
use stratos_server::plan::{plan_terms, CalculatorError};

// ============================================================================
// Calculator Tests
// ============================================================================

#[test]
fn test_reference_plan_terms() {
    // 20,000 principal at 20% flat for 12 months
    let terms = plan_terms(20_000, 20.0, 12).unwrap();
    assert_eq!(terms.total_payable, 24_000.0);
    assert_eq!(terms.installment_amount, 2_000);
}

#[test]
fn test_uneven_division_rounds_up() {
    // 10,000 at 15% over 7 months: total 10875, 10875/7 = 1553.57...
    let terms = plan_terms(10_000, 15.0, 7).unwrap();
    assert_eq!(terms.installment_amount, 1_554);
    assert!(terms.installment_amount * 7 >= terms.total_payable as i64);
}

#[test]
fn test_installments_cover_total_payable() {
    let cases = [
        (5_000, 10.0, 6),
        (20_000, 20.0, 12),
        (35_000, 24.0, 18),
        (100_000, 17.5, 36),
        (333, 9.9, 5),
    ];

    for (principal, rate, duration) in cases {
        let terms = plan_terms(principal, rate, duration).unwrap();
        let collected = terms.installment_amount * duration as i64;
        assert!(
            collected as f64 >= terms.total_payable,
            "({}, {}, {}) under-collects: {} < {}",
            principal,
            rate,
            duration,
            collected,
            terms.total_payable
        );
    }
}

#[test]
fn test_calculator_rejects_bad_inputs() {
    assert_eq!(
        plan_terms(0, 20.0, 12).unwrap_err(),
        CalculatorError::NonPositivePrincipal
    );
    assert_eq!(
        plan_terms(10_000, 20.0, -3).unwrap_err(),
        CalculatorError::NonPositiveDuration
    );
    assert_eq!(
        plan_terms(10_000, f64::NAN, 12).unwrap_err(),
        CalculatorError::InvalidRate
    );
}

// ============================================================================
// Issuance Policy Tests
// ============================================================================

#[test]
fn test_first_loan_over_cap_rejected() {
    // Borrower with zero prior loans requesting 25,000
    let result = check_issuance(0, 0, 25_000);
    assert_eq!(
        result.unwrap_err(),
        IssuanceError::FirstLoanCapExceeded {
            cap: FIRST_LOAN_PRINCIPAL_CAP
        }
    );
}

#[test]
fn test_first_loan_at_cap_accepted() {
    assert!(check_issuance(0, 0, FIRST_LOAN_PRINCIPAL_CAP).is_ok());
}

#[test]
fn test_active_loan_blocks_any_new_issuance() {
    // The rule applies regardless of the requested plan size
    for principal in [1_000, 20_000, 500_000] {
        assert_eq!(
            check_issuance(3, 1, principal).unwrap_err(),
            IssuanceError::ActiveLoanExists
        );
    }
}

#[test]
fn test_history_lifts_the_cap() {
    // A borrower with completed history can take any plan
    assert!(check_issuance(2, 0, 150_000).is_ok());
}

#[test]
fn test_exclusivity_checked_before_cap() {
    // Both rules would fire; exclusivity is the named reason
    assert_eq!(
        check_issuance(0, 1, 50_000).unwrap_err(),
        IssuanceError::ActiveLoanExists
    );
}
