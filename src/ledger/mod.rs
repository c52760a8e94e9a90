//! Installment ledger
//!
//! The ledger derives a loan's repayment state from its append-only payment
//! rows: how many installments are paid, which one is due next, and whether
//! the schedule is complete. Recording a payment assigns the next installment
//! number and flips the loan to completed when the final installment lands,
//! all inside one transaction.

pub mod model;
pub mod schedule;
pub mod service;

pub use model::{
    InstallmentStatus, LoanProgress, Payment, PaymentReceipt, RecordPaymentRequest, ScheduleEntry,
};
pub use schedule::build_schedule;
pub use service::{LedgerError, LedgerService};
