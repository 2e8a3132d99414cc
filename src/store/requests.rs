use crate::error::ApiResult;
use crate::model::activity_request::{ActivityRequest, PendingCounts, RequestKind, RequestStatus};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::{MySql, MySqlPool, Transaction};

const COLUMNS: &str = "id, employee_id, request_type, date, start_time, end_time, \
     requested_clock_in, requested_clock_out, reason, status, notes, \
     approved_by, approval_date, created_at";

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

/// Variant-specific columns of a new pending request; the unused ones stay
/// NULL in the polymorphic row.
pub struct NewRequest<'a> {
    pub employee_id: u64,
    pub kind: RequestKind,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub requested_clock_in: Option<NaiveTime>,
    pub requested_clock_out: Option<NaiveTime>,
    pub reason: &'a str,
}

pub async fn insert(pool: &MySqlPool, req: NewRequest<'_>) -> ApiResult<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO activity_requests
            (employee_id, request_type, date, start_time, end_time,
             requested_clock_in, requested_clock_out, reason, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'pending')
        "#,
    )
    .bind(req.employee_id)
    .bind(req.kind.to_string())
    .bind(req.date)
    .bind(req.start_time)
    .bind(req.end_time)
    .bind(req.requested_clock_in)
    .bind(req.requested_clock_out)
    .bind(req.reason)
    .execute(pool)
    .await?;

    Ok(result.last_insert_id())
}

pub async fn fetch(pool: &MySqlPool, id: u64) -> ApiResult<Option<ActivityRequest>> {
    let sql = format!("SELECT {COLUMNS} FROM activity_requests WHERE id = ?");
    let request = sqlx::query_as::<_, ActivityRequest>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(request)
}

pub async fn fetch_tx(
    tx: &mut Transaction<'_, MySql>,
    id: u64,
) -> ApiResult<Option<ActivityRequest>> {
    let sql = format!("SELECT {COLUMNS} FROM activity_requests WHERE id = ?");
    let request = sqlx::query_as::<_, ActivityRequest>(&sql)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    Ok(request)
}

/// Compare-and-set out of `pending`. Exactly one concurrent transition can
/// win; the loser sees false and must surface InvalidStateError, never
/// silently re-apply.
pub async fn transition_tx(
    tx: &mut Transaction<'_, MySql>,
    id: u64,
    to: RequestStatus,
    admin_id: u64,
    at: NaiveDateTime,
    notes: Option<&str>,
) -> ApiResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE activity_requests
        SET status = ?, approved_by = ?, approval_date = ?, notes = COALESCE(?, notes)
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(to.to_string())
    .bind(admin_id)
    .bind(at)
    .bind(notes)
    .bind(id)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Filtered cross-variant page plus the unpaged total, newest first.
pub async fn list(
    pool: &MySqlPool,
    kind: Option<RequestKind>,
    status: Option<RequestStatus>,
    employee_id: Option<u64>,
    page: u64,
    per_page: u64,
) -> ApiResult<(Vec<ActivityRequest>, i64)> {
    let kind_s = kind.map(|k| k.to_string());
    let status_s = status.map(|s| s.to_string());

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(emp_id) = employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }

    if let Some(k) = kind_s.as_deref() {
        where_sql.push_str(" AND request_type = ?");
        args.push(FilterValue::Str(k));
    }

    if let Some(s) = status_s.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(s));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM activity_requests{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool).await?;

    // -------------------------
    // DATA query
    // -------------------------
    let offset = (page - 1) * per_page;
    let data_sql = format!(
        "SELECT {COLUMNS} FROM activity_requests{} ORDER BY created_at DESC LIMIT ? OFFSET ?",
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, ActivityRequest>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let requests = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok((requests, total))
}

/// Per-variant pending totals for the badge summary.
pub async fn pending_counts(pool: &MySqlPool) -> ApiResult<PendingCounts> {
    let rows: Vec<(String, i64)> = sqlx::query_as(
        "SELECT request_type, COUNT(*) FROM activity_requests \
         WHERE status = 'pending' GROUP BY request_type",
    )
    .fetch_all(pool)
    .await?;

    let mut counts = PendingCounts::default();
    for (kind, n) in rows {
        counts.total += n;
        match kind.parse::<RequestKind>() {
            Ok(RequestKind::WorkFromHome) => counts.work_from_home = n,
            Ok(RequestKind::PartialDay) => counts.partial_day = n,
            Ok(RequestKind::Regularization) => counts.regularization = n,
            Err(_) => {}
        }
    }
    Ok(counts)
}

/// Approved WFH/partial-day annotations falling inside a date range, for the
/// team calendar projection.
pub async fn approved_in_range(
    pool: &MySqlPool,
    start: NaiveDate,
    end: NaiveDate,
) -> ApiResult<Vec<ActivityRequest>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM activity_requests \
         WHERE status = 'approved' AND date BETWEEN ? AND ? \
         AND request_type IN ('work_from_home', 'partial_day')"
    );
    let requests = sqlx::query_as::<_, ActivityRequest>(&sql)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;
    Ok(requests)
}
