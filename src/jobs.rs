//! Background jobs
//!
//! The ledger reconciliation job recomputes loan completion from payment
//! counts on a schedule. The payment path already flips status inside its own
//! transaction, so under normal operation this finds nothing; any repair it
//! does make is logged loudly because it means a loan was left fully paid but
//! still active.

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

/// Flip any active loan whose paid installment count has reached its plan
/// duration to completed, returning the repaired loan IDs
pub async fn reconcile_completed_loans(pool: &PgPool) -> Result<Vec<Uuid>, sqlx::Error> {
    let repaired = sqlx::query_as::<_, (Uuid,)>(
        r#"
        UPDATE loans l
        SET status = 'completed', updated_at = now()
        FROM loan_plans p
        WHERE p.id = l.plan_id
          AND l.status = 'active'
          AND (SELECT COUNT(*) FROM payments pay WHERE pay.loan_id = l.id) >= p.duration_months
        RETURNING l.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(repaired.into_iter().map(|(id,)| id).collect())
}

/// Start the job scheduler with the reconciliation job attached
pub async fn start_scheduler(pool: PgPool, schedule: &str) -> anyhow::Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    let job_pool = pool.clone();
    let job = Job::new_async(schedule, move |_job_id, _lock| {
        let pool = job_pool.clone();
        Box::pin(async move {
            match reconcile_completed_loans(&pool).await {
                Ok(repaired) if !repaired.is_empty() => {
                    tracing::warn!(
                        count = repaired.len(),
                        loan_ids = ?repaired,
                        "Reconciliation repaired fully-paid loans left active"
                    );
                }
                Ok(_) => {
                    tracing::debug!("Reconciliation found no inconsistent loans");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Reconciliation job failed");
                }
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!(schedule, "Ledger reconciliation job scheduled");

    Ok(scheduler)
}
