use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::model::attendance::{Attendance, AttendanceFilter, AttendanceStatus, NewAttendance};
use crate::service::employee;

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    Str(&'a str),
    Date(NaiveDate),
    Status(AttendanceStatus),
}

#[instrument(skip(pool, new), fields(employee_id = %new.employee_id, date = %new.date))]
pub async fn mark(pool: &SqlitePool, new: NewAttendance) -> Result<Attendance, ApiError> {
    let record = Attendance {
        id: Uuid::new_v4().to_string(),
        employee_id: new.employee_id,
        date: new.date,
        status: new.status,
        created_at: Utc::now(),
    };

    let result = sqlx::query(
        r#"
        INSERT INTO attendance (id, employee_id, date, status, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.id)
    .bind(&record.employee_id)
    .bind(record.date)
    .bind(record.status)
    .bind(record.created_at)
    .execute(pool)
    .await;

    // The FK and UNIQUE (employee_id, date) constraints do the checking
    if let Err(e) = result {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_foreign_key_violation() {
                return Err(ApiError::not_found("employee not found"));
            }
            if db_err.is_unique_violation() {
                return Err(ApiError::conflict("attendance already recorded for this date"));
            }
        }
        return Err(e.into());
    }

    info!(attendance_id = %record.id, status = %record.status, "Attendance marked");

    Ok(record)
}

/// Records for one employee, latest date first.
#[instrument(skip(pool))]
pub async fn list_for_employee(
    pool: &SqlitePool,
    employee_id: &str,
    filter: &AttendanceFilter,
) -> Result<Vec<Attendance>, ApiError> {
    let mut tx = pool.begin().await?;

    if !employee::exists(&mut tx, employee_id).await? {
        return Err(ApiError::not_found("employee not found"));
    }

    let mut where_sql = String::from(" WHERE employee_id = ?");
    let mut args = vec![FilterValue::Str(employee_id)];

    if let Some(from) = filter.from_date {
        where_sql.push_str(" AND date >= ?");
        args.push(FilterValue::Date(from));
    }

    if let Some(to) = filter.to_date {
        where_sql.push_str(" AND date <= ?");
        args.push(FilterValue::Date(to));
    }

    if let Some(status) = filter.status {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Status(status));
    }

    let sql = format!(
        "SELECT id, employee_id, date, status, created_at FROM attendance{} ORDER BY date DESC",
        where_sql
    );
    debug!(sql = %sql, "Fetching attendance");

    let mut query = sqlx::query_as::<_, Attendance>(&sql);
    for arg in args {
        query = match arg {
            FilterValue::Str(s) => query.bind(s),
            FilterValue::Date(d) => query.bind(d),
            FilterValue::Status(s) => query.bind(s),
        };
    }

    let records = query.fetch_all(&mut *tx).await?;
    tx.commit().await?;

    Ok(records)
}

#[instrument(skip(pool))]
pub async fn delete(pool: &SqlitePool, attendance_id: &str) -> Result<(), ApiError> {
    let removed = sqlx::query("DELETE FROM attendance WHERE id = ?")
        .bind(attendance_id)
        .execute(pool)
        .await?
        .rows_affected();

    if removed == 0 {
        return Err(ApiError::not_found("attendance record not found"));
    }

    info!("Attendance record deleted");
    Ok(())
}
