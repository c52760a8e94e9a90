//! Reporting aggregator for Stratos
//!
//! Read-side folds over the loan book and payment ledger: dashboard KPIs,
//! collection efficiency, the six-month collections trend, and the data
//! behind the monthly / portfolio / arrears reports. Everything here is
//! derived from persisted state; nothing mutates.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Number of calendar months in the collections trend, current month included
const TREND_MONTHS: u32 = 6;

// ============================================================================
// Data Models
// ============================================================================

/// Dashboard KPI metrics, optionally scoped to one collector's portfolio
#[derive(Debug, Serialize, Clone)]
pub struct CollectionMetrics {
    /// All-time collected sum
    pub total_collected: i64,

    /// Collected sum for the current calendar day
    pub collected_today: i64,

    /// Collected sum for the current calendar month
    pub collected_this_month: i64,

    /// Number of loans with status=active
    pub active_loans_count: i64,

    /// Principal still in the field (sum over active loans)
    pub total_outstanding_principal: i64,

    /// Sum of installment amounts falling due next period (active loans)
    pub expected_next_period: i64,

    /// collected_this_month / expected_this_month, clamped to 1.0; 0 when
    /// nothing is expected
    pub collection_efficiency: f64,

    /// Collected sums for the last six calendar months, oldest first
    pub monthly_trend: Vec<MonthlyBucket>,
}

/// One month in the collections trend
///
/// Keyed by (year, month) so a trend spanning a year boundary never merges
/// two Januaries; the label is only for display.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    pub label: &'static str,
    pub total: i64,
}

/// Monthly collection summary report data
#[derive(Debug, Serialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub total_collected: i64,
    pub transaction_count: i64,
    pub rows: Vec<MonthlyCollectionRow>,
}

/// One collected payment in the monthly summary
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct MonthlyCollectionRow {
    pub collected_at: DateTime<Utc>,
    pub borrower_name: String,
    pub collector_id: Option<Uuid>,
    pub amount: i64,
}

/// Portfolio health report data
#[derive(Debug, Serialize)]
pub struct PortfolioHealth {
    pub active_loans_count: i64,
    /// Principal disbursed across active loans
    pub total_disbursed: i64,
    /// Principal plus interest receivable across active loans
    pub total_receivable: i64,
    /// Collected so far against active loans
    pub total_collected: i64,
    /// Receivable minus collected
    pub outstanding_balance: i64,
    pub rows: Vec<PortfolioRow>,
}

/// One active loan in the portfolio health report
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct PortfolioRow {
    pub loan_id: Uuid,
    pub borrower_name: String,
    pub principal_amount: i64,
    pub receivable: i64,
    pub collected: i64,
    pub end_date: NaiveDate,
}

/// One behind-schedule loan in the arrears report
#[derive(Debug, Serialize)]
pub struct ArrearsRow {
    pub loan_id: Uuid,
    pub borrower_name: String,
    pub phone: String,
    pub paid_count: i64,
    pub installments_due: i32,
    pub overdue_count: i32,
    pub overdue_amount: i64,
    pub end_date: NaiveDate,
}

// ============================================================================
// Internal Data Structures for Queries
// ============================================================================

/// Raw payment aggregates from the ledger
#[derive(Debug, sqlx::FromRow)]
struct PaymentAggregates {
    total_collected: Option<i64>,
    collected_today: Option<i64>,
    collected_this_month: Option<i64>,
}

/// Raw active-loan aggregates from the loan book
#[derive(Debug, sqlx::FromRow)]
struct LoanAggregates {
    active_loans: Option<i64>,
    outstanding_principal: Option<i64>,
    expected_installments: Option<i64>,
}

/// Active loan row with its paid count, for arrears derivation
#[derive(Debug, sqlx::FromRow)]
struct ActiveLoanProgressRow {
    loan_id: Uuid,
    borrower_name: String,
    phone: String,
    installment_amount: i64,
    duration_months: i32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    paid_count: Option<i64>,
}

// ============================================================================
// Pure folds
// ============================================================================

/// Collection efficiency as a ratio in [0, 1]
///
/// Defined as 0 when nothing is expected, so an empty book never divides by
/// zero.
pub fn collection_efficiency(collected: i64, expected: i64) -> f64 {
    if expected <= 0 {
        return 0.0;
    }
    (collected as f64 / expected as f64).min(1.0)
}

/// Bucket payment rows into the trailing `TREND_MONTHS` calendar months,
/// oldest bucket first
pub fn monthly_trend(payments: &[(DateTime<Utc>, i64)], now: DateTime<Utc>) -> Vec<MonthlyBucket> {
    let mut buckets: Vec<MonthlyBucket> = (0..TREND_MONTHS)
        .rev()
        .map(|back| {
            let anchor = now
                .date_naive()
                .checked_sub_months(Months::new(back))
                .unwrap_or(NaiveDate::MIN);
            MonthlyBucket {
                year: anchor.year(),
                month: anchor.month(),
                label: month_label(anchor.month()),
                total: 0,
            }
        })
        .collect();

    for (collected_at, amount) in payments {
        let date = collected_at.date_naive();
        if let Some(bucket) = buckets
            .iter_mut()
            .find(|b| b.year == date.year() && b.month == date.month())
        {
            bucket.total += amount;
        }
    }

    buckets
}

/// Count how many installments have fallen due by `today` (installment i is
/// due i calendar months after the start date)
pub fn installments_due(start_date: NaiveDate, duration_months: i32, today: NaiveDate) -> i32 {
    (1..=duration_months.max(0))
        .take_while(|i| {
            start_date
                .checked_add_months(Months::new(*i as u32))
                .map(|due| due <= today)
                .unwrap_or(false)
        })
        .count() as i32
}

/// Display label for a calendar month number
fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "???",
    }
}

// ============================================================================
// Reporting Service
// ============================================================================

/// Reporting service over the loan book and payment ledger
#[derive(Clone)]
pub struct ReportingService {
    db_pool: PgPool,
}

impl ReportingService {
    /// Create a new reporting service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Dashboard KPI metrics, optionally scoped to one collector
    pub async fn metrics(&self, collector_id: Option<Uuid>) -> Result<CollectionMetrics, ApiError> {
        let payment_aggs = sqlx::query_as::<_, PaymentAggregates>(
            r#"
            SELECT
                COALESCE(SUM(amount), 0) as total_collected,
                COALESCE(SUM(amount) FILTER (WHERE collected_at::date = CURRENT_DATE), 0) as collected_today,
                COALESCE(SUM(amount) FILTER (WHERE date_trunc('month', collected_at) = date_trunc('month', now())), 0) as collected_this_month
            FROM payments
            WHERE ($1::uuid IS NULL OR collector_id = $1)
            "#,
        )
        .bind(collector_id)
        .fetch_one(&self.db_pool)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let loan_aggs = sqlx::query_as::<_, LoanAggregates>(
            r#"
            SELECT
                COUNT(*) as active_loans,
                COALESCE(SUM(l.principal_amount), 0) as outstanding_principal,
                COALESCE(SUM(l.installment_amount), 0) as expected_installments
            FROM loans l
            JOIN borrowers b ON b.id = l.borrower_id
            WHERE l.status = 'active'
              AND ($1::uuid IS NULL OR b.collector_id = $1)
            "#,
        )
        .bind(collector_id)
        .fetch_one(&self.db_pool)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let now = Utc::now();
        let trend_rows: Vec<(DateTime<Utc>, i64)> = sqlx::query_as(
            r#"
            SELECT collected_at, amount
            FROM payments
            WHERE collected_at >= date_trunc('month', now()) - make_interval(months => $2)
              AND ($1::uuid IS NULL OR collector_id = $1)
            "#,
        )
        .bind(collector_id)
        .bind(TREND_MONTHS as i32 - 1)
        .fetch_all(&self.db_pool)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let collected_this_month = payment_aggs.collected_this_month.unwrap_or(0);
        let expected_this_month = loan_aggs.expected_installments.unwrap_or(0);

        Ok(CollectionMetrics {
            total_collected: payment_aggs.total_collected.unwrap_or(0),
            collected_today: payment_aggs.collected_today.unwrap_or(0),
            collected_this_month,
            active_loans_count: loan_aggs.active_loans.unwrap_or(0),
            total_outstanding_principal: loan_aggs.outstanding_principal.unwrap_or(0),
            expected_next_period: expected_this_month,
            collection_efficiency: collection_efficiency(collected_this_month, expected_this_month),
            monthly_trend: monthly_trend(&trend_rows, now),
        })
    }

    /// Collected payments for the current calendar month
    pub async fn monthly_summary(&self) -> Result<MonthlySummary, ApiError> {
        let rows = sqlx::query_as::<_, MonthlyCollectionRow>(
            r#"
            SELECT pay.collected_at, b.full_name as borrower_name, pay.collector_id, pay.amount
            FROM payments pay
            JOIN loans l ON l.id = pay.loan_id
            JOIN borrowers b ON b.id = l.borrower_id
            WHERE date_trunc('month', pay.collected_at) = date_trunc('month', now())
            ORDER BY pay.collected_at DESC
            "#,
        )
        .fetch_all(&self.db_pool)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let now = Utc::now();
        let total_collected = rows.iter().map(|r| r.amount).sum();
        let transaction_count = rows.len() as i64;

        Ok(MonthlySummary {
            year: now.year(),
            month: now.month(),
            total_collected,
            transaction_count,
            rows,
        })
    }

    /// Active-loan portfolio health
    pub async fn portfolio_health(&self) -> Result<PortfolioHealth, ApiError> {
        let rows = sqlx::query_as::<_, PortfolioRow>(
            r#"
            SELECT
                l.id as loan_id,
                b.full_name as borrower_name,
                l.principal_amount,
                l.installment_amount * p.duration_months as receivable,
                COALESCE((SELECT SUM(amount) FROM payments WHERE loan_id = l.id), 0) as collected,
                l.end_date
            FROM loans l
            JOIN borrowers b ON b.id = l.borrower_id
            JOIN loan_plans p ON p.id = l.plan_id
            WHERE l.status = 'active'
            ORDER BY l.end_date ASC
            "#,
        )
        .fetch_all(&self.db_pool)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let total_disbursed = rows.iter().map(|r| r.principal_amount).sum();
        let total_receivable: i64 = rows.iter().map(|r| r.receivable).sum();
        let total_collected: i64 = rows.iter().map(|r| r.collected).sum();

        Ok(PortfolioHealth {
            active_loans_count: rows.len() as i64,
            total_disbursed,
            total_receivable,
            total_collected,
            outstanding_balance: total_receivable - total_collected,
            rows,
        })
    }

    /// Active loans that are behind their installment schedule
    pub async fn arrears(&self) -> Result<Vec<ArrearsRow>, ApiError> {
        let rows = sqlx::query_as::<_, ActiveLoanProgressRow>(
            r#"
            SELECT
                l.id as loan_id,
                b.full_name as borrower_name,
                b.phone,
                l.installment_amount,
                p.duration_months,
                l.start_date,
                l.end_date,
                (SELECT COUNT(*) FROM payments WHERE loan_id = l.id) as paid_count
            FROM loans l
            JOIN borrowers b ON b.id = l.borrower_id
            JOIN loan_plans p ON p.id = l.plan_id
            WHERE l.status = 'active'
            "#,
        )
        .fetch_all(&self.db_pool)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let today = Utc::now().date_naive();

        let arrears = rows
            .into_iter()
            .filter_map(|row| {
                let paid_count = row.paid_count.unwrap_or(0);
                let due = installments_due(row.start_date, row.duration_months, today);
                let overdue_count = due - paid_count as i32;
                if overdue_count <= 0 {
                    return None;
                }
                Some(ArrearsRow {
                    loan_id: row.loan_id,
                    borrower_name: row.borrower_name,
                    phone: row.phone,
                    paid_count,
                    installments_due: due,
                    overdue_count,
                    overdue_amount: overdue_count as i64 * row.installment_amount,
                    end_date: row.end_date,
                })
            })
            .collect();

        Ok(arrears)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_efficiency_clamps_to_one() {
        assert_eq!(collection_efficiency(12_000, 10_000), 1.0);
        assert_eq!(collection_efficiency(5_000, 10_000), 0.5);
    }

    #[test]
    fn test_efficiency_zero_expected_is_zero() {
        // Never NaN or a division error on an empty book
        assert_eq!(collection_efficiency(0, 0), 0.0);
        assert_eq!(collection_efficiency(5_000, 0), 0.0);
    }

    #[test]
    fn test_trend_buckets_by_year_and_month() {
        let now = Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap();
        let payments = vec![
            // Feb 2026 (current month)
            (Utc.with_ymd_and_hms(2026, 2, 3, 9, 0, 0).unwrap(), 1_000),
            // Jan 2026
            (Utc.with_ymd_and_hms(2026, 1, 20, 9, 0, 0).unwrap(), 2_000),
            // Sep 2025 (oldest bucket)
            (Utc.with_ymd_and_hms(2025, 9, 1, 9, 0, 0).unwrap(), 4_000),
            // Feb 2025: same month name as the current bucket but a year
            // earlier, must NOT alias into Feb 2026
            (Utc.with_ymd_and_hms(2025, 2, 14, 9, 0, 0).unwrap(), 8_000),
        ];

        let trend = monthly_trend(&payments, now);

        assert_eq!(trend.len(), 6);
        assert_eq!((trend[0].year, trend[0].month), (2025, 9));
        assert_eq!(trend[0].total, 4_000);
        assert_eq!(trend[0].label, "Sep");

        let current = trend.last().unwrap();
        assert_eq!((current.year, current.month), (2026, 2));
        assert_eq!(current.total, 1_000);

        let january = &trend[4];
        assert_eq!((january.year, january.month), (2026, 1));
        assert_eq!(january.total, 2_000);
    }

    #[test]
    fn test_trend_empty_payments() {
        let now = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
        let trend = monthly_trend(&[], now);
        assert_eq!(trend.len(), 6);
        assert!(trend.iter().all(|b| b.total == 0));
    }

    #[test]
    fn test_installments_due() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

        // Before the first due date nothing is owed
        let early = NaiveDate::from_ymd_opt(2025, 2, 14).unwrap();
        assert_eq!(installments_due(start, 12, early), 0);

        // Three due dates have passed by Apr 20
        let later = NaiveDate::from_ymd_opt(2025, 4, 20).unwrap();
        assert_eq!(installments_due(start, 12, later), 3);

        // Never more than the plan duration
        let far = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        assert_eq!(installments_due(start, 12, far), 12);
    }
}
