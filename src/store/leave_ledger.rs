use crate::error::ApiResult;
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::MySqlPool;

/// One approved leave span from the leave ledger. Pending/rejected leave
/// never reaches the attendance core.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LeaveSpan {
    pub employee_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub leave_type: String,
}

impl LeaveSpan {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Whether an approved leave span covers the employee on the given date.
pub async fn is_on_leave(pool: &MySqlPool, employee_id: u64, date: NaiveDate) -> ApiResult<bool> {
    let covered: i64 = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM leave_requests
            WHERE employee_id = ? AND status = 'approved'
            AND start_date <= ? AND end_date >= ?
        )
        "#,
    )
    .bind(employee_id)
    .bind(date)
    .bind(date)
    .fetch_one(pool)
    .await?;
    Ok(covered != 0)
}

/// Every approved span touching the date range, across all employees.
/// Callers filter per employee in memory.
pub async fn spans_in_range(
    pool: &MySqlPool,
    start: NaiveDate,
    end: NaiveDate,
) -> ApiResult<Vec<LeaveSpan>> {
    let spans = sqlx::query_as::<_, LeaveSpan>(
        r#"
        SELECT employee_id, start_date, end_date, leave_type
        FROM leave_requests
        WHERE status = 'approved' AND start_date <= ? AND end_date >= ?
        "#,
    )
    .bind(end)
    .bind(start)
    .fetch_all(pool)
    .await?;
    Ok(spans)
}
