//! Loan issuance policy
//!
//! Two rules gate every issuance:
//! 1. A borrower may hold at most one active loan.
//! 2. A borrower with no loan history of any kind is capped at a fixed
//!    first-loan principal.
//!
//! The rules are pure over the borrower's loan counts so they can be tested
//! without a database; the service applies them inside the issuance
//! transaction and the storage layer backs rule 1 with a partial unique
//! index.

use thiserror::Error;

/// Maximum principal for a borrower with no prior loans, in whole currency
/// units
pub const FIRST_LOAN_PRINCIPAL_CAP: i64 = 20_000;

/// Issuance rejection reasons
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IssuanceError {
    #[error("Borrower already has an active loan; it must be completed before a new one is issued")]
    ActiveLoanExists,

    #[error("First-time borrowers are limited to loans of {cap} maximum")]
    FirstLoanCapExceeded { cap: i64 },
}

/// Validate that a borrower may receive a loan with the given principal
///
/// `total_loan_count` counts loans of every status; `active_loan_count`
/// counts only status=active.
pub fn check_issuance(
    total_loan_count: i64,
    active_loan_count: i64,
    plan_principal: i64,
) -> Result<(), IssuanceError> {
    if active_loan_count > 0 {
        return Err(IssuanceError::ActiveLoanExists);
    }

    if total_loan_count == 0 && plan_principal > FIRST_LOAN_PRINCIPAL_CAP {
        return Err(IssuanceError::FirstLoanCapExceeded {
            cap: FIRST_LOAN_PRINCIPAL_CAP,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_time_borrower_within_cap_accepted() {
        assert!(check_issuance(0, 0, 15_000).is_ok());
        // Exactly at the cap is accepted
        assert!(check_issuance(0, 0, FIRST_LOAN_PRINCIPAL_CAP).is_ok());
    }

    #[test]
    fn test_first_time_borrower_over_cap_rejected() {
        assert_eq!(
            check_issuance(0, 0, 25_000),
            Err(IssuanceError::FirstLoanCapExceeded { cap: 20_000 })
        );
    }

    #[test]
    fn test_active_loan_blocks_issuance_regardless_of_plan() {
        assert_eq!(
            check_issuance(1, 1, 5_000),
            Err(IssuanceError::ActiveLoanExists)
        );
        assert_eq!(
            check_issuance(4, 1, 100_000),
            Err(IssuanceError::ActiveLoanExists)
        );
    }

    #[test]
    fn test_repeat_borrower_not_capped() {
        // One completed loan on record lifts the first-loan cap
        assert!(check_issuance(1, 0, 50_000).is_ok());
    }
}
