use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, instrument};

use crate::error::ApiError;
use crate::model::attendance::AttendanceStatus;
use crate::model::employee::{Employee, EmployeeWithStats, NewEmployee};

const SELECT_WITH_STATS: &str = r#"
    SELECT
        e.employee_id,
        e.full_name,
        e.email,
        e.department,
        e.created_at,
        COALESCE(SUM(CASE WHEN a.status = ? THEN 1 ELSE 0 END), 0) AS total_present,
        COALESCE(SUM(CASE WHEN a.status = ? THEN 1 ELSE 0 END), 0) AS total_absent,
        COUNT(a.id) AS total_records
    FROM employees e
    LEFT JOIN attendance a ON a.employee_id = e.employee_id
"#;

/// Existence check on a borrowed connection.
pub(crate) async fn exists(conn: &mut SqliteConnection, employee_id: &str) -> Result<bool, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees WHERE employee_id = ?")
        .bind(employee_id)
        .fetch_one(conn)
        .await?;
    Ok(count > 0)
}

#[instrument(skip(pool, new), fields(employee_id = %new.employee_id))]
pub async fn create(pool: &SqlitePool, new: NewEmployee) -> Result<Employee, ApiError> {
    let employee = Employee {
        employee_id: new.employee_id,
        full_name: new.full_name,
        email: new.email,
        department: new.department,
        created_at: Utc::now(),
    };

    // No read before the write: the unique indexes arbitrate concurrent creates
    let result = sqlx::query(
        r#"
        INSERT INTO employees (employee_id, full_name, email, department, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&employee.employee_id)
    .bind(&employee.full_name)
    .bind(&employee.email)
    .bind(&employee.department)
    .bind(employee.created_at)
    .execute(pool)
    .await;

    match result {
        Ok(_) => {}
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            debug!(constraint = %db_err.message(), "Employee insert rejected");
            // id takes precedence when both columns clash
            let mut conn = pool.acquire().await?;
            return Err(if exists(&mut conn, &employee.employee_id).await? {
                ApiError::conflict("duplicate employee_id")
            } else {
                ApiError::conflict("duplicate email")
            });
        }
        Err(e) => return Err(e.into()),
    }

    info!(department = %employee.department, "Employee created");

    Ok(employee)
}

/// Newest first. Rows inserted within the same timestamp keep insert order reversed.
#[instrument(skip(pool))]
pub async fn list(pool: &SqlitePool) -> Result<Vec<EmployeeWithStats>, ApiError> {
    let sql = format!(
        "{} GROUP BY e.employee_id ORDER BY e.created_at DESC, e.rowid DESC",
        SELECT_WITH_STATS
    );

    let employees = sqlx::query_as::<_, EmployeeWithStats>(&sql)
        .bind(AttendanceStatus::Present)
        .bind(AttendanceStatus::Absent)
        .fetch_all(pool)
        .await?;

    debug!(count = employees.len(), "Listed employees");
    Ok(employees)
}

#[instrument(skip(pool))]
pub async fn get_by_id(pool: &SqlitePool, employee_id: &str) -> Result<EmployeeWithStats, ApiError> {
    let sql = format!(
        "{} WHERE e.employee_id = ? GROUP BY e.employee_id",
        SELECT_WITH_STATS
    );

    sqlx::query_as::<_, EmployeeWithStats>(&sql)
        .bind(AttendanceStatus::Present)
        .bind(AttendanceStatus::Absent)
        .bind(employee_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("employee not found"))
}

/// Removes the employee and every attendance row it owns in one transaction.
/// Returns the number of attendance rows removed alongside it.
#[instrument(skip(pool))]
pub async fn delete(pool: &SqlitePool, employee_id: &str) -> Result<u64, ApiError> {
    let mut tx = pool.begin().await?;

    let removed_attendance = sqlx::query("DELETE FROM attendance WHERE employee_id = ?")
        .bind(employee_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let removed = sqlx::query("DELETE FROM employees WHERE employee_id = ?")
        .bind(employee_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if removed == 0 {
        // dropping tx rolls back
        return Err(ApiError::not_found("employee not found"));
    }

    tx.commit().await?;
    info!(removed_attendance, "Employee deleted");

    Ok(removed_attendance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{FileDb, test_pool};
    use crate::model::attendance::NewAttendance;
    use crate::service::attendance;
    use chrono::NaiveDate;

    fn new_employee(id: &str, email: &str, department: &str) -> NewEmployee {
        NewEmployee {
            employee_id: id.to_string(),
            full_name: format!("Employee {}", id),
            email: email.to_string(),
            department: department.to_string(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    async fn mark(pool: &SqlitePool, id: &str, d: u32, status: AttendanceStatus) {
        attendance::mark(
            pool,
            NewAttendance {
                employee_id: id.to_string(),
                date: day(d),
                status,
            },
        )
        .await
        .unwrap();
    }

    #[actix_web::test]
    async fn create_returns_persisted_employee() {
        let pool = test_pool().await;

        let created = create(&pool, new_employee("E1", "e1@x.com", "Eng")).await.unwrap();
        assert_eq!(created.employee_id, "E1");
        assert_eq!(created.email, "e1@x.com");

        let fetched = get_by_id(&pool, "E1").await.unwrap();
        assert_eq!(fetched.employee.full_name, "Employee E1");
        assert_eq!(fetched.employee.created_at, created.created_at);
        assert_eq!(fetched.total_records, 0);
    }

    #[actix_web::test]
    async fn duplicate_id_conflicts_even_with_other_fields_changed() {
        let pool = test_pool().await;
        create(&pool, new_employee("E1", "e1@x.com", "Eng")).await.unwrap();

        let err = create(&pool, new_employee("E1", "other@x.com", "Ops")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(ref m) if m == "duplicate employee_id"));
    }

    #[actix_web::test]
    async fn duplicate_email_conflicts() {
        let pool = test_pool().await;
        create(&pool, new_employee("E1", "e1@x.com", "Eng")).await.unwrap();

        let err = create(&pool, new_employee("E2", "e1@x.com", "Eng")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(ref m) if m == "duplicate email"));

        assert_eq!(list(&pool).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn list_is_newest_first() {
        let pool = test_pool().await;
        create(&pool, new_employee("E1", "e1@x.com", "Eng")).await.unwrap();
        create(&pool, new_employee("E2", "e2@x.com", "Eng")).await.unwrap();
        create(&pool, new_employee("E3", "e3@x.com", "Ops")).await.unwrap();

        let ids: Vec<String> = list(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.employee.employee_id)
            .collect();
        assert_eq!(ids, vec!["E3", "E2", "E1"]);
    }

    #[actix_web::test]
    async fn stats_add_up() {
        let pool = test_pool().await;
        create(&pool, new_employee("E1", "e1@x.com", "Eng")).await.unwrap();
        create(&pool, new_employee("E2", "e2@x.com", "Eng")).await.unwrap();

        mark(&pool, "E1", 1, AttendanceStatus::Present).await;
        mark(&pool, "E1", 2, AttendanceStatus::Present).await;
        mark(&pool, "E1", 3, AttendanceStatus::Absent).await;
        mark(&pool, "E2", 1, AttendanceStatus::Absent).await;

        let e1 = get_by_id(&pool, "E1").await.unwrap();
        assert_eq!((e1.total_present, e1.total_absent, e1.total_records), (2, 1, 3));

        for e in list(&pool).await.unwrap() {
            assert_eq!(e.total_present + e.total_absent, e.total_records);
        }
    }

    #[actix_web::test]
    async fn get_missing_employee_is_not_found() {
        let pool = test_pool().await;
        let err = get_by_id(&pool, "nobody").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "employee not found"));
    }

    #[actix_web::test]
    async fn delete_cascades_attendance() {
        let pool = test_pool().await;
        create(&pool, new_employee("E1", "e1@x.com", "Eng")).await.unwrap();
        create(&pool, new_employee("E2", "e2@x.com", "Eng")).await.unwrap();
        mark(&pool, "E1", 1, AttendanceStatus::Present).await;
        mark(&pool, "E1", 2, AttendanceStatus::Absent).await;
        mark(&pool, "E2", 1, AttendanceStatus::Present).await;

        assert_eq!(delete(&pool, "E1").await.unwrap(), 2);

        let orphans = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance WHERE employee_id = 'E1'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(orphans, 0);
        assert!(get_by_id(&pool, "E1").await.is_err());
        assert_eq!(get_by_id(&pool, "E2").await.unwrap().total_records, 1);
    }

    #[actix_web::test]
    async fn delete_missing_employee_is_not_found() {
        let pool = test_pool().await;
        let err = delete(&pool, "E404").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[actix_web::test]
    async fn deleted_id_and_email_can_be_reused() {
        let pool = test_pool().await;
        create(&pool, new_employee("E1", "e1@x.com", "Eng")).await.unwrap();
        delete(&pool, "E1").await.unwrap();

        create(&pool, new_employee("E1", "e1@x.com", "Ops")).await.unwrap();
        assert_eq!(get_by_id(&pool, "E1").await.unwrap().employee.department, "Ops");
    }

    #[actix_web::test]
    async fn id_wins_when_id_and_email_both_clash() {
        let pool = test_pool().await;
        create(&pool, new_employee("E1", "e1@x.com", "Eng")).await.unwrap();

        let err = create(&pool, new_employee("E1", "e1@x.com", "Eng")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(ref m) if m == "duplicate employee_id"));
    }

    async fn create_concurrently(pool: &SqlitePool, batch: Vec<NewEmployee>) -> Vec<Result<Employee, ApiError>> {
        let handles: Vec<_> = batch
            .into_iter()
            .map(|new| {
                let pool = pool.clone();
                actix_web::rt::spawn(async move { create(&pool, new).await })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await.unwrap());
        }
        results
    }

    #[actix_web::test]
    async fn concurrent_distinct_creates_all_succeed() {
        let db = FileDb::new(5).await;

        let batch = (0..40)
            .map(|i| new_employee(&format!("E{i}"), &format!("e{i}@x.com"), "Eng"))
            .collect();
        for result in create_concurrently(&db.pool, batch).await {
            assert!(result.is_ok(), "{:?}", result.err());
        }

        assert_eq!(list(&db.pool).await.unwrap().len(), 40);
    }

    #[actix_web::test]
    async fn concurrent_duplicates_conflict() {
        let db = FileDb::new(5).await;

        let same_id = (0..20)
            .map(|i| new_employee("E1", &format!("e{i}@x.com"), "Eng"))
            .collect();
        let results = create_concurrently(&db.pool, same_id).await;
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        for err in results.into_iter().filter_map(Result::err) {
            assert!(matches!(err, ApiError::Conflict(ref m) if m == "duplicate employee_id"), "{err:?}");
        }

        let same_email = (0..20)
            .map(|i| new_employee(&format!("N{i}"), "shared@x.com", "Ops"))
            .collect();
        let results = create_concurrently(&db.pool, same_email).await;
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        for err in results.into_iter().filter_map(Result::err) {
            assert!(matches!(err, ApiError::Conflict(ref m) if m == "duplicate email"), "{err:?}");
        }

        assert_eq!(list(&db.pool).await.unwrap().len(), 2);
    }
}
