use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::model::session::{AttendanceSession, LATE_NOTE_PREFIX, WorkMode};
use crate::store::sessions;
use chrono::{Duration, Local, NaiveTime};
use sqlx::MySqlPool;

/// Late marker for a clock-in past `scheduled_start + grace`. Partial
/// minutes round up, so 30 seconds over the grace end is "Late by 1 minute".
pub fn late_annotation(
    clock_in: NaiveTime,
    scheduled_start: NaiveTime,
    grace_minutes: i64,
) -> Option<String> {
    let grace_end = scheduled_start + Duration::minutes(grace_minutes);
    if clock_in <= grace_end {
        return None;
    }
    let minutes = ((clock_in - grace_end).num_seconds() + 59) / 60;
    let unit = if minutes == 1 { "minute" } else { "minutes" };
    Some(format!("{LATE_NOTE_PREFIX}{minutes} {unit}"))
}

fn merge_notes(existing: Option<&str>, added: Option<&str>) -> Option<String> {
    match (existing, added.map(str::trim).filter(|s| !s.is_empty())) {
        (Some(a), Some(b)) => Some(format!("{a}; {b}")),
        (Some(a), None) => Some(a.to_string()),
        (None, Some(b)) => Some(b.to_string()),
        (None, None) => None,
    }
}

/// Open a new session for the employee. The one-open-session invariant is
/// enforced by the store's atomic guarded insert; a duplicate attempt
/// surfaces as Conflict and leaves the original session untouched.
pub async fn clock_in(
    pool: &MySqlPool,
    config: &Config,
    employee_id: u64,
    work_mode: WorkMode,
    geo: Option<(f64, f64)>,
) -> ApiResult<AttendanceSession> {
    let now = Local::now().naive_local();
    let note = late_annotation(now.time(), config.scheduled_start, config.grace_period_minutes);

    let inserted = sessions::try_insert_open(
        pool,
        employee_id,
        now,
        &work_mode.to_string(),
        geo,
        note.as_deref(),
    )
    .await?;

    if !inserted {
        return Err(ApiError::Conflict("Already clocked in".into()));
    }

    tracing::info!(employee_id, late = note.is_some(), "Clocked in");

    sessions::find_open(pool, employee_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No active session found".into()))
}

/// Close the employee's open session. The worked duration is
/// `clock_out - clock_in`, computed here; client-side running timers are
/// display-only and never persisted.
pub async fn clock_out(
    pool: &MySqlPool,
    employee_id: u64,
    notes: Option<&str>,
) -> ApiResult<AttendanceSession> {
    let mut session = sessions::find_open(pool, employee_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No active session found".into()))?;

    let now = Local::now().naive_local();
    let merged = merge_notes(session.notes.as_deref(), notes);

    let closed = sessions::close(pool, session.id, now, merged.as_deref()).await?;
    if !closed {
        // lost a race with another clock-out of the same session
        return Err(ApiError::NotFound("No active session found".into()));
    }

    tracing::info!(employee_id, session_id = session.id, "Clocked out");

    session.clock_out = Some(now);
    session.notes = merged;
    Ok(session)
}

/// Single source of truth for "employee is currently active".
pub async fn has_open_session(pool: &MySqlPool, employee_id: u64) -> ApiResult<bool> {
    sessions::has_open_session(pool, employee_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn within_grace_is_not_late() {
        assert_eq!(late_annotation(t(9, 14), t(9, 0), 15), None);
        assert_eq!(late_annotation(t(9, 15), t(9, 0), 15), None);
        assert_eq!(late_annotation(t(8, 30), t(9, 0), 15), None);
    }

    #[test]
    fn one_minute_past_grace() {
        assert_eq!(
            late_annotation(t(9, 16), t(9, 0), 15).as_deref(),
            Some("Late by 1 minute")
        );
    }

    #[test]
    fn late_minutes_count_from_grace_end() {
        assert_eq!(
            late_annotation(t(10, 0), t(9, 0), 15).as_deref(),
            Some("Late by 45 minutes")
        );
    }

    #[test]
    fn partial_minutes_round_up() {
        let clock_in = NaiveTime::from_hms_opt(9, 15, 30).unwrap();
        assert_eq!(
            late_annotation(clock_in, t(9, 0), 15).as_deref(),
            Some("Late by 1 minute")
        );
    }

    #[test]
    fn notes_merge() {
        assert_eq!(merge_notes(None, None), None);
        assert_eq!(merge_notes(Some("Late by 2 minutes"), None).as_deref(), Some("Late by 2 minutes"));
        assert_eq!(merge_notes(None, Some("leaving early")).as_deref(), Some("leaving early"));
        assert_eq!(
            merge_notes(Some("Late by 2 minutes"), Some("leaving early")).as_deref(),
            Some("Late by 2 minutes; leaving early")
        );
        assert_eq!(merge_notes(None, Some("   ")), None);
    }
}
