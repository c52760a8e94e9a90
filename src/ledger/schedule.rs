//! Repayment schedule derivation
//!
//! The schedule is a pure function of the loan snapshot (start date, plan
//! duration, fixed installment amount), the payment rows, and the reference
//! date. Installment i falls due i calendar months after the start date; an
//! unpaid installment whose due date has passed is overdue.

use chrono::{Months, NaiveDate};

use super::model::{InstallmentStatus, Payment, ScheduleEntry};

/// Derive the full repayment schedule for a loan snapshot
pub fn build_schedule(
    start_date: NaiveDate,
    duration_months: i32,
    installment_amount: i64,
    payments: &[Payment],
    today: NaiveDate,
) -> Vec<ScheduleEntry> {
    (1..=duration_months.max(0))
        .map(|number| {
            let due_date = start_date
                .checked_add_months(Months::new(number as u32))
                .unwrap_or(NaiveDate::MAX);

            let payment = payments.iter().find(|p| p.installment_number == number);

            let status = match payment {
                Some(_) => InstallmentStatus::Paid,
                None if today > due_date => InstallmentStatus::Overdue,
                None => InstallmentStatus::Pending,
            };

            ScheduleEntry {
                installment_number: number,
                due_date,
                amount: installment_amount,
                status,
                paid_at: payment.map(|p| p.collected_at),
                collector_id: payment.and_then(|p| p.collector_id),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn payment(loan_id: Uuid, number: i32) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            loan_id,
            collector_id: Some(Uuid::new_v4()),
            amount: 2_000,
            installment_number: number,
            notes: None,
            collected_at: Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_schedule_statuses() {
        let loan_id = Uuid::new_v4();
        let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let payments = vec![payment(loan_id, 1), payment(loan_id, 2)];
        // Installments 1 and 2 paid, installment 3 (due Apr 15) past due,
        // installment 4 (due May 15) still pending.
        let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();

        let schedule = build_schedule(start, 6, 2_000, &payments, today);

        assert_eq!(schedule.len(), 6);
        assert_eq!(schedule[0].status, InstallmentStatus::Paid);
        assert_eq!(schedule[1].status, InstallmentStatus::Paid);
        assert_eq!(schedule[2].status, InstallmentStatus::Overdue);
        assert_eq!(schedule[3].status, InstallmentStatus::Pending);
        assert_eq!(schedule[5].status, InstallmentStatus::Pending);

        assert_eq!(
            schedule[2].due_date,
            NaiveDate::from_ymd_opt(2025, 4, 15).unwrap()
        );
        assert!(schedule[0].paid_at.is_some());
        assert!(schedule[2].paid_at.is_none());
    }

    #[test]
    fn test_due_on_the_day_is_not_overdue() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 2, 15).unwrap();

        let schedule = build_schedule(start, 3, 1_500, &[], today);
        assert_eq!(schedule[0].status, InstallmentStatus::Pending);
    }

    #[test]
    fn test_schedule_is_idempotent_on_a_snapshot() {
        let loan_id = Uuid::new_v4();
        let start = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let payments = vec![payment(loan_id, 1)];
        let today = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();

        let first = build_schedule(start, 12, 2_000, &payments, today);
        let second = build_schedule(start, 12, 2_000, &payments, today);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_schedule_for_zero_duration() {
        let start = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert!(build_schedule(start, 0, 2_000, &[], today).is_empty());
    }
}
