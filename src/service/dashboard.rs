use chrono::{Local, NaiveDate};
use sqlx::SqlitePool;
use tracing::instrument;

use crate::error::ApiError;
use crate::model::attendance::AttendanceStatus;
use crate::model::dashboard::DashboardStats;

/// Server-local calendar date used for the "today" counters.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[instrument(skip(pool))]
pub async fn stats(pool: &SqlitePool) -> Result<DashboardStats, ApiError> {
    stats_on(pool, today()).await
}

/// Recomputed from the tables on every call, inside one read transaction.
pub async fn stats_on(pool: &SqlitePool, day: NaiveDate) -> Result<DashboardStats, ApiError> {
    let mut tx = pool.begin().await?;

    let (total_employees, total_attendance_records, present_today, absent_today) =
        sqlx::query_as::<_, (i64, i64, i64, i64)>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM employees),
                (SELECT COUNT(*) FROM attendance),
                (SELECT COUNT(*) FROM attendance WHERE date = ? AND status = ?),
                (SELECT COUNT(*) FROM attendance WHERE date = ? AND status = ?)
            "#,
        )
        .bind(day)
        .bind(AttendanceStatus::Present)
        .bind(day)
        .bind(AttendanceStatus::Absent)
        .fetch_one(&mut *tx)
        .await?;

    let departments = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT department FROM employees ORDER BY department",
    )
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(DashboardStats {
        total_employees,
        total_attendance_records,
        present_today,
        absent_today,
        departments,
    })
}
