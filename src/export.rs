//! CSV export for borrowers, loans and payments
//!
//! Flattens each entity type into comma-separated rows with every field
//! quoted, one file per entity, named `{type}_export_{ISO date}.csv`.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;

/// A rendered CSV file ready to be served
#[derive(Debug)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

/// Export service over the three entity tables
#[derive(Clone)]
pub struct ExportService {
    db_pool: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct BorrowerExportRow {
    full_name: String,
    nic_number: String,
    phone: String,
    address: String,
    status: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct LoanExportRow {
    id: Uuid,
    borrower_name: String,
    principal_amount: i64,
    interest_rate: f64,
    installment_amount: i64,
    status: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentExportRow {
    id: Uuid,
    borrower_name: String,
    amount: i64,
    installment_number: i32,
    collected_at: DateTime<Utc>,
    collector_id: Option<Uuid>,
}

impl ExportService {
    /// Create a new export service instance
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Full borrower registry, ordered by name
    pub async fn borrowers_csv(&self) -> Result<CsvExport, ApiError> {
        let rows = sqlx::query_as::<_, BorrowerExportRow>(
            r#"
            SELECT full_name, nic_number, phone, address, status::text as status, created_at
            FROM borrowers
            ORDER BY full_name ASC
            "#,
        )
        .fetch_all(&self.db_pool)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let records = rows
            .iter()
            .map(|b| {
                vec![
                    b.full_name.clone(),
                    b.nic_number.clone(),
                    b.phone.clone(),
                    b.address.clone(),
                    b.status.clone(),
                    b.created_at.date_naive().to_string(),
                ]
            })
            .collect();

        Ok(CsvExport {
            filename: export_filename("borrowers", Utc::now().date_naive()),
            content: render_csv(
                &["Full Name", "NIC Number", "Phone", "Address", "Status", "Registered Date"],
                records,
            ),
        })
    }

    /// Full loan portfolio, newest first
    pub async fn loans_csv(&self) -> Result<CsvExport, ApiError> {
        let rows = sqlx::query_as::<_, LoanExportRow>(
            r#"
            SELECT
                l.id, b.full_name as borrower_name, l.principal_amount,
                p.interest_rate, l.installment_amount, l.status::text as status,
                l.start_date, l.end_date
            FROM loans l
            JOIN borrowers b ON b.id = l.borrower_id
            JOIN loan_plans p ON p.id = l.plan_id
            ORDER BY l.created_at DESC
            "#,
        )
        .fetch_all(&self.db_pool)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let records = rows
            .iter()
            .map(|l| {
                vec![
                    l.id.to_string(),
                    l.borrower_name.clone(),
                    l.principal_amount.to_string(),
                    format!("{}%", l.interest_rate),
                    l.installment_amount.to_string(),
                    l.status.clone(),
                    l.start_date.to_string(),
                    l.end_date.to_string(),
                ]
            })
            .collect();

        Ok(CsvExport {
            filename: export_filename("loans", Utc::now().date_naive()),
            content: render_csv(
                &[
                    "Loan ID",
                    "Borrower",
                    "Principal Amount",
                    "Interest Rate",
                    "Installment Amount",
                    "Status",
                    "Start Date",
                    "End Date",
                ],
                records,
            ),
        })
    }

    /// Full payment history, newest first
    pub async fn payments_csv(&self) -> Result<CsvExport, ApiError> {
        let rows = sqlx::query_as::<_, PaymentExportRow>(
            r#"
            SELECT
                pay.id, b.full_name as borrower_name, pay.amount,
                pay.installment_number, pay.collected_at, pay.collector_id
            FROM payments pay
            JOIN loans l ON l.id = pay.loan_id
            JOIN borrowers b ON b.id = l.borrower_id
            ORDER BY pay.collected_at DESC
            "#,
        )
        .fetch_all(&self.db_pool)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let records = rows
            .iter()
            .map(|p| {
                vec![
                    p.id.to_string(),
                    p.borrower_name.clone(),
                    p.amount.to_string(),
                    p.installment_number.to_string(),
                    p.collected_at.date_naive().to_string(),
                    p.collector_id.map(|id| id.to_string()).unwrap_or_default(),
                ]
            })
            .collect();

        Ok(CsvExport {
            filename: export_filename("payments", Utc::now().date_naive()),
            content: render_csv(
                &[
                    "Payment ID",
                    "Borrower",
                    "Amount",
                    "Installment Number",
                    "Date Collected",
                    "Collector ID",
                ],
                records,
            ),
        })
    }
}

/// Build the dated export filename for an entity type
pub fn export_filename(kind: &str, date: NaiveDate) -> String {
    format!("{}_export_{}.csv", kind, date)
}

/// Render headers and records as CSV with every field quoted
pub fn render_csv(headers: &[&str], records: Vec<Vec<String>>) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| csv_escape(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    for record in records {
        lines.push(
            record
                .iter()
                .map(|f| csv_escape(f))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}

/// Quote a field, doubling any embedded quotes
fn csv_escape(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_escape_quotes_and_commas() {
        assert_eq!(csv_escape("plain"), "\"plain\"");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_render_csv() {
        let csv = render_csv(
            &["Name", "Phone"],
            vec![
                vec!["Nimal Perera".to_string(), "0771234567".to_string()],
                vec!["K. \"Sunil\"".to_string(), "0719876543".to_string()],
            ],
        );

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "\"Name\",\"Phone\"");
        assert_eq!(lines[1], "\"Nimal Perera\",\"0771234567\"");
        assert_eq!(lines[2], "\"K. \"\"Sunil\"\"\",\"0719876543\"");
    }

    #[test]
    fn test_export_filename_pattern() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        assert_eq!(
            export_filename("borrowers", date),
            "borrowers_export_2026-02-10.csv"
        );
    }
}
