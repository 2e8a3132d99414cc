use std::collections::{BTreeMap, HashSet};

use crate::error::ApiResult;
use crate::model::attendance::{DailyAttendanceRecord, DayStatus};
use crate::model::session::AttendanceSession;
use crate::store::{holidays, leave_ledger, sessions};
use chrono::{Datelike, Local, NaiveDate, Weekday};
use sqlx::MySqlPool;

/// Fixed Saturday/Sunday rule. Deliberately not a configuration point.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Collaborator facts needed to classify one employee/day.
pub struct DayContext {
    pub date: NaiveDate,
    pub today: NaiveDate,
    pub on_leave: bool,
    pub holiday: bool,
}

/// Fold one day's sessions into the derived record.
///
/// `absent` applies only to a fully elapsed working day with no sessions;
/// the open session is excluded from totals and surfaces as
/// `has_active_session`.
pub fn fold_day(
    employee_id: u64,
    ctx: &DayContext,
    sessions: &[AttendanceSession],
) -> DailyAttendanceRecord {
    let total_minutes: i64 = sessions.iter().filter_map(|s| s.duration_minutes()).sum();
    let has_active_session = sessions.iter().any(|s| s.is_open());
    let first_clock_in = sessions.iter().map(|s| s.clock_in).min();
    let last_clock_out = sessions.iter().filter_map(|s| s.clock_out).max();
    let late = sessions.iter().any(|s| s.is_late());

    let status = if !sessions.is_empty() {
        DayStatus::Present
    } else if ctx.on_leave {
        DayStatus::OnLeave
    } else if !is_weekend(ctx.date) && !ctx.holiday && ctx.date < ctx.today {
        DayStatus::Absent
    } else {
        DayStatus::NotMarked
    };

    DailyAttendanceRecord {
        employee_id,
        date: ctx.date,
        status,
        total_minutes,
        session_count: sessions.len() as u32,
        first_clock_in,
        last_clock_out,
        has_active_session,
        late,
    }
}

/// One employee/day, fetching the day's sessions and collaborator facts.
pub async fn aggregate(
    pool: &MySqlPool,
    employee_id: u64,
    date: NaiveDate,
) -> ApiResult<DailyAttendanceRecord> {
    let day_sessions = sessions::for_day(pool, employee_id, date).await?;
    let on_leave = leave_ledger::is_on_leave(pool, employee_id, date).await?;
    let holiday = holidays::is_holiday(pool, date).await?;
    let ctx = DayContext {
        date,
        today: Local::now().date_naive(),
        on_leave,
        holiday,
    };
    Ok(fold_day(employee_id, &ctx, &day_sessions))
}

/// One employee over an inclusive range, batch-fetched: one session query,
/// one leave query, one holiday query for the whole window.
pub async fn aggregate_range(
    pool: &MySqlPool,
    employee_id: u64,
    start: NaiveDate,
    end: NaiveDate,
) -> ApiResult<Vec<DailyAttendanceRecord>> {
    let range_sessions = sessions::for_range(pool, employee_id, start, end).await?;
    let spans: Vec<_> = leave_ledger::spans_in_range(pool, start, end)
        .await?
        .into_iter()
        .filter(|s| s.employee_id == employee_id)
        .collect();
    let holiday_dates: HashSet<NaiveDate> = holidays::in_range(pool, start, end)
        .await?
        .into_iter()
        .map(|(date, _)| date)
        .collect();

    let mut by_date: BTreeMap<NaiveDate, Vec<AttendanceSession>> = BTreeMap::new();
    for session in range_sessions {
        by_date.entry(session.date).or_default().push(session);
    }

    let today = Local::now().date_naive();
    let mut records = Vec::new();
    let mut date = start;
    while date <= end {
        let ctx = DayContext {
            date,
            today,
            on_leave: spans.iter().any(|s| s.covers(date)),
            holiday: holiday_dates.contains(&date),
        };
        let empty = Vec::new();
        let day_sessions = by_date.get(&date).unwrap_or(&empty);
        records.push(fold_day(employee_id, &ctx, day_sessions));
        date = date.succ_opt().expect("date overflow");
    }
    Ok(records)
}

/// Every listed employee over an inclusive range, batch-fetched once for
/// the whole organization. Admin views use this instead of per-employee
/// query loops.
pub async fn aggregate_all_range(
    pool: &MySqlPool,
    employee_ids: &[u64],
    start: NaiveDate,
    end: NaiveDate,
) -> ApiResult<Vec<DailyAttendanceRecord>> {
    let members: HashSet<u64> = employee_ids.iter().copied().collect();

    let mut by_key: BTreeMap<(u64, NaiveDate), Vec<AttendanceSession>> = BTreeMap::new();
    for session in sessions::all_for_range(pool, start, end).await? {
        if members.contains(&session.employee_id) {
            by_key
                .entry((session.employee_id, session.date))
                .or_default()
                .push(session);
        }
    }

    let spans = leave_ledger::spans_in_range(pool, start, end).await?;
    let holiday_dates: HashSet<NaiveDate> = holidays::in_range(pool, start, end)
        .await?
        .into_iter()
        .map(|(date, _)| date)
        .collect();

    let today = Local::now().date_naive();
    let empty: Vec<AttendanceSession> = Vec::new();
    let mut records = Vec::new();
    for &employee_id in employee_ids {
        let mut date = start;
        while date <= end {
            let ctx = DayContext {
                date,
                today,
                on_leave: spans
                    .iter()
                    .any(|s| s.employee_id == employee_id && s.covers(date)),
                holiday: holiday_dates.contains(&date),
            };
            let day_sessions = by_key.get(&(employee_id, date)).unwrap_or(&empty);
            records.push(fold_day(employee_id, &ctx, day_sessions));
            date = date.succ_opt().expect("date overflow");
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, NaiveTime};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        date.and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    fn session(
        date: NaiveDate,
        clock_in: NaiveDateTime,
        clock_out: Option<NaiveDateTime>,
        notes: Option<&str>,
    ) -> AttendanceSession {
        AttendanceSession {
            id: 1,
            employee_id: 1000,
            date,
            clock_in,
            clock_out,
            work_mode: "office".into(),
            geo_lat: None,
            geo_lng: None,
            notes: notes.map(Into::into),
        }
    }

    fn workday_ctx(date: NaiveDate, today: NaiveDate) -> DayContext {
        DayContext {
            date,
            today,
            on_leave: false,
            holiday: false,
        }
    }

    #[test]
    fn split_day_folds_to_one_record() {
        // Monday with a lunch break: (09:00,12:00) and (13:00,18:00)
        let date = d(2026, 8, 3);
        let sessions = vec![
            session(date, at(date, 9, 0), Some(at(date, 12, 0)), None),
            session(date, at(date, 13, 0), Some(at(date, 18, 0)), None),
        ];
        let record = fold_day(1000, &workday_ctx(date, d(2026, 8, 4)), &sessions);

        assert_eq!(record.status, DayStatus::Present);
        assert_eq!(record.total_minutes, 480);
        assert_eq!(record.session_count, 2);
        assert!(!record.has_active_session);
        assert_eq!(record.first_clock_in, Some(at(date, 9, 0)));
        assert_eq!(record.last_clock_out, Some(at(date, 18, 0)));
    }

    #[test]
    fn open_session_excluded_from_total() {
        let date = d(2026, 8, 3);
        let sessions = vec![
            session(date, at(date, 9, 0), Some(at(date, 12, 0)), None),
            session(date, at(date, 13, 0), None, None),
        ];
        let record = fold_day(1000, &workday_ctx(date, date), &sessions);

        assert_eq!(record.total_minutes, 180);
        assert!(record.has_active_session);
        assert_eq!(record.status, DayStatus::Present);
    }

    #[test]
    fn elapsed_working_day_without_sessions_is_absent() {
        let date = d(2026, 8, 3); // Monday
        let record = fold_day(1000, &workday_ctx(date, d(2026, 8, 5)), &[]);
        assert_eq!(record.status, DayStatus::Absent);
    }

    #[test]
    fn current_day_without_sessions_is_not_absent_yet() {
        let date = d(2026, 8, 3);
        let record = fold_day(1000, &workday_ctx(date, date), &[]);
        assert_eq!(record.status, DayStatus::NotMarked);
    }

    #[test]
    fn weekend_and_holiday_are_never_absent() {
        let saturday = d(2026, 8, 1);
        let record = fold_day(1000, &workday_ctx(saturday, d(2026, 8, 5)), &[]);
        assert_eq!(record.status, DayStatus::NotMarked);

        let holiday = DayContext {
            date: d(2026, 8, 4),
            today: d(2026, 8, 6),
            on_leave: false,
            holiday: true,
        };
        assert_eq!(fold_day(1000, &holiday, &[]).status, DayStatus::NotMarked);
    }

    #[test]
    fn approved_leave_wins_over_absent() {
        let ctx = DayContext {
            date: d(2026, 8, 3),
            today: d(2026, 8, 5),
            on_leave: true,
            holiday: false,
        };
        assert_eq!(fold_day(1000, &ctx, &[]).status, DayStatus::OnLeave);
    }

    #[test]
    fn late_session_marks_the_day() {
        let date = d(2026, 8, 3);
        let sessions = vec![session(
            date,
            at(date, 9, 20),
            Some(at(date, 18, 0)),
            Some("Late by 5 minutes"),
        )];
        let record = fold_day(1000, &workday_ctx(date, d(2026, 8, 4)), &sessions);
        assert!(record.late);
    }

    #[test]
    fn weekend_rule_is_fixed_saturday_sunday() {
        assert!(is_weekend(d(2026, 8, 1))); // Sat
        assert!(is_weekend(d(2026, 8, 2))); // Sun
        assert!(!is_weekend(d(2026, 8, 3))); // Mon
        assert!(!is_weekend(d(2026, 8, 7))); // Fri
    }
}
