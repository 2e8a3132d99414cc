use crate::error::ApiResult;
use crate::model::session::AttendanceSession;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{MySql, MySqlPool, Transaction};

const COLUMNS: &str =
    "id, employee_id, date, clock_in, clock_out, work_mode, geo_lat, geo_lng, notes";

/// Insert a new open session unless one already exists for the employee.
/// Check and insert are one statement, so a double-click or retry cannot
/// produce two concurrently open sessions. Returns false when the guard
/// blocked the insert.
pub async fn try_insert_open(
    pool: &MySqlPool,
    employee_id: u64,
    clock_in: NaiveDateTime,
    work_mode: &str,
    geo: Option<(f64, f64)>,
    notes: Option<&str>,
) -> ApiResult<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO attendance_sessions
            (employee_id, date, clock_in, work_mode, geo_lat, geo_lng, notes)
        SELECT ?, ?, ?, ?, ?, ?, ?
        FROM DUAL
        WHERE NOT EXISTS (
            SELECT 1 FROM attendance_sessions
            WHERE employee_id = ? AND clock_out IS NULL
        )
        "#,
    )
    .bind(employee_id)
    .bind(clock_in.date())
    .bind(clock_in)
    .bind(work_mode)
    .bind(geo.map(|g| g.0))
    .bind(geo.map(|g| g.1))
    .bind(notes)
    .bind(employee_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// The employee's one open session, if any.
pub async fn find_open(
    pool: &MySqlPool,
    employee_id: u64,
) -> ApiResult<Option<AttendanceSession>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM attendance_sessions \
         WHERE employee_id = ? AND clock_out IS NULL \
         ORDER BY clock_in LIMIT 1"
    );
    let session = sqlx::query_as::<_, AttendanceSession>(&sql)
        .bind(employee_id)
        .fetch_optional(pool)
        .await?;
    Ok(session)
}

/// The single derived "is the employee active" query. Consumers must use
/// this instead of recomputing their own definition.
pub async fn has_open_session(pool: &MySqlPool, employee_id: u64) -> ApiResult<bool> {
    let open: i64 = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM attendance_sessions WHERE employee_id = ? AND clock_out IS NULL)",
    )
    .bind(employee_id)
    .fetch_one(pool)
    .await?;
    Ok(open != 0)
}

/// Close an open session. Guarded on `clock_out IS NULL` so a concurrent
/// close cannot overwrite; returns false when the session was already closed.
pub async fn close(
    pool: &MySqlPool,
    session_id: u64,
    clock_out: NaiveDateTime,
    notes: Option<&str>,
) -> ApiResult<bool> {
    let result = sqlx::query(
        "UPDATE attendance_sessions SET clock_out = ?, notes = ? WHERE id = ? AND clock_out IS NULL",
    )
    .bind(clock_out)
    .bind(notes)
    .bind(session_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// All of one employee's sessions on one date, clock-in order.
pub async fn for_day(
    pool: &MySqlPool,
    employee_id: u64,
    date: NaiveDate,
) -> ApiResult<Vec<AttendanceSession>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM attendance_sessions \
         WHERE employee_id = ? AND date = ? ORDER BY clock_in"
    );
    let sessions = sqlx::query_as::<_, AttendanceSession>(&sql)
        .bind(employee_id)
        .bind(date)
        .fetch_all(pool)
        .await?;
    Ok(sessions)
}

/// One employee's sessions over an inclusive date range.
pub async fn for_range(
    pool: &MySqlPool,
    employee_id: u64,
    start: NaiveDate,
    end: NaiveDate,
) -> ApiResult<Vec<AttendanceSession>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM attendance_sessions \
         WHERE employee_id = ? AND date BETWEEN ? AND ? ORDER BY date, clock_in"
    );
    let sessions = sqlx::query_as::<_, AttendanceSession>(&sql)
        .bind(employee_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;
    Ok(sessions)
}

/// Every employee's sessions over an inclusive date range.
pub async fn all_for_range(
    pool: &MySqlPool,
    start: NaiveDate,
    end: NaiveDate,
) -> ApiResult<Vec<AttendanceSession>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM attendance_sessions \
         WHERE date BETWEEN ? AND ? ORDER BY employee_id, date, clock_in"
    );
    let sessions = sqlx::query_as::<_, AttendanceSession>(&sql)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;
    Ok(sessions)
}

/// All currently open sessions across the organization.
pub async fn all_open(pool: &MySqlPool) -> ApiResult<Vec<AttendanceSession>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM attendance_sessions \
         WHERE clock_out IS NULL ORDER BY clock_in"
    );
    let sessions = sqlx::query_as::<_, AttendanceSession>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(sessions)
}

/// Earliest session id for an employee/date, locked for the duration of the
/// surrounding transaction. Used by regularization reconciliation.
pub async fn earliest_for_day_tx(
    tx: &mut Transaction<'_, MySql>,
    employee_id: u64,
    date: NaiveDate,
) -> ApiResult<Option<u64>> {
    let id: Option<u64> = sqlx::query_scalar(
        "SELECT id FROM attendance_sessions \
         WHERE employee_id = ? AND date = ? ORDER BY clock_in LIMIT 1 FOR UPDATE",
    )
    .bind(employee_id)
    .bind(date)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(id)
}

/// Overwrite a session's recorded times with the regularized pair.
pub async fn overwrite_times_tx(
    tx: &mut Transaction<'_, MySql>,
    session_id: u64,
    clock_in: NaiveDateTime,
    clock_out: NaiveDateTime,
) -> ApiResult<()> {
    sqlx::query(
        "UPDATE attendance_sessions SET clock_in = ?, clock_out = ?, date = ? WHERE id = ?",
    )
    .bind(clock_in)
    .bind(clock_out)
    .bind(clock_in.date())
    .bind(session_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Insert an already-closed session, as produced by regularization approval
/// for a date with no recorded sessions.
pub async fn insert_closed_tx(
    tx: &mut Transaction<'_, MySql>,
    employee_id: u64,
    clock_in: NaiveDateTime,
    clock_out: NaiveDateTime,
    notes: &str,
) -> ApiResult<()> {
    sqlx::query(
        r#"
        INSERT INTO attendance_sessions
            (employee_id, date, clock_in, clock_out, work_mode, notes)
        VALUES (?, ?, ?, ?, 'office', ?)
        "#,
    )
    .bind(employee_id)
    .bind(clock_in.date())
    .bind(clock_in)
    .bind(clock_out)
    .bind(notes)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
