//! Reporting aggregator and export tests

use chrono::{NaiveDate, TimeZone, Utc};
use stratos_server::export::{export_filename, render_csv};
use stratos_server::services::reporting::{
    collection_efficiency, installments_due, monthly_trend,
};

// ============================================================================
// Collection Efficiency Tests
// ============================================================================

#[test]
fn test_efficiency_normal_ratio() {
    assert_eq!(collection_efficiency(7_500, 10_000), 0.75);
}

#[test]
fn test_efficiency_caps_at_one() {
    // Over-collection (early payments) never reads above 100%
    assert_eq!(collection_efficiency(14_000, 10_000), 1.0);
}

#[test]
fn test_efficiency_zero_expected() {
    // No active loans: efficiency is defined as 0, never NaN
    let value = collection_efficiency(0, 0);
    assert_eq!(value, 0.0);
    assert!(!value.is_nan());

    assert_eq!(collection_efficiency(3_000, 0), 0.0);
}

// ============================================================================
// Monthly Trend Tests
// ============================================================================

#[test]
fn test_trend_covers_six_months_oldest_first() {
    let now = Utc.with_ymd_and_hms(2025, 7, 15, 8, 0, 0).unwrap();
    let trend = monthly_trend(&[], now);

    assert_eq!(trend.len(), 6);
    assert_eq!((trend[0].year, trend[0].month), (2025, 2));
    assert_eq!((trend[5].year, trend[5].month), (2025, 7));
    assert_eq!(trend[0].label, "Feb");
    assert_eq!(trend[5].label, "Jul");
}

#[test]
fn test_trend_sums_within_each_month() {
    let now = Utc.with_ymd_and_hms(2025, 7, 15, 8, 0, 0).unwrap();
    let payments = vec![
        (Utc.with_ymd_and_hms(2025, 7, 1, 9, 0, 0).unwrap(), 2_000),
        (Utc.with_ymd_and_hms(2025, 7, 9, 9, 0, 0).unwrap(), 2_000),
        (Utc.with_ymd_and_hms(2025, 6, 30, 9, 0, 0).unwrap(), 1_500),
    ];

    let trend = monthly_trend(&payments, now);
    assert_eq!(trend[5].total, 4_000);
    assert_eq!(trend[4].total, 1_500);
}

#[test]
fn test_trend_does_not_alias_across_years() {
    // February of the previous year must not land in the current February
    // bucket even though the month name matches.
    let now = Utc.with_ymd_and_hms(2026, 2, 10, 8, 0, 0).unwrap();
    let payments = vec![
        (Utc.with_ymd_and_hms(2026, 2, 5, 9, 0, 0).unwrap(), 1_000),
        (Utc.with_ymd_and_hms(2025, 2, 5, 9, 0, 0).unwrap(), 9_000),
    ];

    let trend = monthly_trend(&payments, now);
    let current = trend.last().unwrap();
    assert_eq!((current.year, current.month), (2026, 2));
    assert_eq!(current.total, 1_000);

    // The stale payment falls outside the window entirely
    let window_total: i64 = trend.iter().map(|b| b.total).sum();
    assert_eq!(window_total, 1_000);
}

#[test]
fn test_trend_ignores_payments_outside_window() {
    let now = Utc.with_ymd_and_hms(2025, 7, 15, 8, 0, 0).unwrap();
    let payments = vec![
        // Seven months back, one month before the window opens
        (Utc.with_ymd_and_hms(2024, 12, 20, 9, 0, 0).unwrap(), 5_000),
    ];

    let trend = monthly_trend(&payments, now);
    assert!(trend.iter().all(|b| b.total == 0));
}

// ============================================================================
// Arrears Derivation Tests
// ============================================================================

#[test]
fn test_installments_due_progression() {
    let start = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();

    assert_eq!(
        installments_due(start, 12, NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()),
        0
    );
    assert_eq!(
        installments_due(start, 12, NaiveDate::from_ymd_opt(2025, 4, 5).unwrap()),
        1
    );
    assert_eq!(
        installments_due(start, 12, NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()),
        5
    );
    // Capped at the plan duration well past the end date
    assert_eq!(
        installments_due(start, 12, NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()),
        12
    );
}

// ============================================================================
// CSV Export Tests
// ============================================================================

#[test]
fn test_export_filename_uses_iso_date() {
    let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
    assert_eq!(export_filename("loans", date), "loans_export_2025-07-04.csv");
    assert_eq!(
        export_filename("payments", date),
        "payments_export_2025-07-04.csv"
    );
}

#[test]
fn test_csv_fields_are_quoted() {
    let csv = render_csv(
        &["Full Name", "Address"],
        vec![vec![
            "W. A. Kumari".to_string(),
            "12/3, Lake Road, Kandy".to_string(),
        ]],
    );

    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "\"Full Name\",\"Address\"");
    // The embedded commas survive inside the quoted field
    assert_eq!(lines[1], "\"W. A. Kumari\",\"12/3, Lake Road, Kandy\"");
}

#[test]
fn test_csv_header_only_when_no_records() {
    let csv = render_csv(&["A", "B"], vec![]);
    assert_eq!(csv, "\"A\",\"B\"");
}
