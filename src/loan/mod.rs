//! Loan issuance and lifecycle
//!
//! A loan instantiates one plan for one borrower. Issuance is gated by the
//! policy rules in [`policy`]; afterwards the loan only ever moves
//! active → completed (ledger) or active → defaulted (administrative).

pub mod model;
pub mod policy;
pub mod service;

pub use model::{IssueLoanRequest, ListLoansQuery, Loan, LoanStatus, LoanSummaryRow};
pub use policy::{check_issuance, IssuanceError, FIRST_LOAN_PRINCIPAL_CAP};
pub use service::{LoanService, LoanServiceError};
