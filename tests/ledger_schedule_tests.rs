//! Installment ledger derivation tests
//!
//! Schedule construction, repayment progress, and the completion boundary
//! are all pure over a (loan, payments) snapshot.

use chrono::{NaiveDate, TimeZone, Utc};
use stratos_server::ledger::{build_schedule, InstallmentStatus, LoanProgress, Payment};
use uuid::Uuid;

fn paid(loan_id: Uuid, number: i32, amount: i64) -> Payment {
    Payment {
        id: Uuid::new_v4(),
        loan_id,
        collector_id: Some(Uuid::new_v4()),
        amount,
        installment_number: number,
        notes: Some("Mobile collection".to_string()),
        collected_at: Utc.with_ymd_and_hms(2025, 4, 2, 10, 30, 0).unwrap(),
    }
}

// ============================================================================
// Progress Tests
// ============================================================================

#[test]
fn test_progress_next_installment_number() {
    let progress = LoanProgress::new(0, 12);
    assert_eq!(progress.next_installment_number(), 1);
    assert!(!progress.is_complete());

    let progress = LoanProgress::new(5, 12);
    assert_eq!(progress.next_installment_number(), 6);
    assert!(!progress.is_complete());
}

#[test]
fn test_progress_completion_boundary() {
    // Eleven of twelve paid: one to go
    assert!(!LoanProgress::new(11, 12).is_complete());

    // The twelfth payment completes the schedule; a thirteenth must not be
    // assignable
    assert!(LoanProgress::new(12, 12).is_complete());

    // Defensive: more payments than the duration still reads complete
    assert!(LoanProgress::new(13, 12).is_complete());
}

// ============================================================================
// Schedule Tests
// ============================================================================

#[test]
fn test_schedule_has_one_entry_per_installment() {
    let start = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
    let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();

    let schedule = build_schedule(start, 12, 2_000, &[], today);
    assert_eq!(schedule.len(), 12);

    let numbers: Vec<i32> = schedule.iter().map(|e| e.installment_number).collect();
    assert_eq!(numbers, (1..=12).collect::<Vec<i32>>());

    // Due dates advance one calendar month per installment
    assert_eq!(
        schedule[0].due_date,
        NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()
    );
    assert_eq!(
        schedule[11].due_date,
        NaiveDate::from_ymd_opt(2026, 1, 10).unwrap()
    );
}

#[test]
fn test_schedule_partitions_paid_overdue_pending() {
    let loan_id = Uuid::new_v4();
    let start = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
    let payments = vec![paid(loan_id, 1, 2_000), paid(loan_id, 2, 2_000)];
    // Installments 3 and 4 are past due, 5+ pending
    let today = NaiveDate::from_ymd_opt(2025, 5, 20).unwrap();

    let schedule = build_schedule(start, 12, 2_000, &payments, today);

    let paid_count = schedule
        .iter()
        .filter(|e| e.status == InstallmentStatus::Paid)
        .count();
    let overdue_count = schedule
        .iter()
        .filter(|e| e.status == InstallmentStatus::Overdue)
        .count();
    let pending_count = schedule
        .iter()
        .filter(|e| e.status == InstallmentStatus::Pending)
        .count();

    assert_eq!(paid_count, 2);
    assert_eq!(overdue_count, 2);
    assert_eq!(pending_count, 8);
    assert_eq!(paid_count + overdue_count + pending_count, schedule.len());
}

#[test]
fn test_paid_entries_carry_payment_details() {
    let loan_id = Uuid::new_v4();
    let start = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
    let payments = vec![paid(loan_id, 1, 2_000)];
    let today = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();

    let schedule = build_schedule(start, 3, 2_000, &payments, today);

    assert_eq!(schedule[0].status, InstallmentStatus::Paid);
    assert_eq!(schedule[0].paid_at, Some(payments[0].collected_at));
    assert_eq!(schedule[0].collector_id, payments[0].collector_id);
    assert!(schedule[1].paid_at.is_none());
}

#[test]
fn test_schedule_is_deterministic() {
    let loan_id = Uuid::new_v4();
    let start = NaiveDate::from_ymd_opt(2024, 11, 28).unwrap();
    let payments: Vec<Payment> = (1..=4).map(|i| paid(loan_id, i, 1_750)).collect();
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

    // Same snapshot in, same schedule out
    let first = build_schedule(start, 10, 1_750, &payments, today);
    let second = build_schedule(start, 10, 1_750, &payments, today);
    assert_eq!(first, second);
}

#[test]
fn test_out_of_order_payment_rows_do_not_matter() {
    let loan_id = Uuid::new_v4();
    let start = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
    let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

    let ordered = vec![paid(loan_id, 1, 2_000), paid(loan_id, 2, 2_000)];
    let reversed = vec![paid(loan_id, 2, 2_000), paid(loan_id, 1, 2_000)];

    let a = build_schedule(start, 6, 2_000, &ordered, today);
    let b = build_schedule(start, 6, 2_000, &reversed, today);

    let statuses_a: Vec<_> = a.iter().map(|e| e.status).collect();
    let statuses_b: Vec<_> = b.iter().map(|e| e.status).collect();
    assert_eq!(statuses_a, statuses_b);
}
