use std::collections::{BTreeMap, HashMap, HashSet};
use std::str::FromStr;

use crate::error::{ApiError, ApiResult};
use crate::model::activity_request::RequestKind;
use crate::model::attendance::{DailyAttendanceRecord, DayStatus};
use crate::model::calendar::{CalendarDayStatus, CalendarStatus};
use crate::model::employee::EmployeeDisplay;
use crate::model::session::AttendanceSession;
use crate::service::day_aggregator::{DayContext, fold_day, is_weekend};
use crate::store::{directory, holidays, leave_ledger, requests, sessions};
use chrono::{Local, Months, NaiveDate, NaiveTime};
use sqlx::MySqlPool;

/// Whose month grid to build: one manager's direct reports, or everyone.
#[derive(Debug, Copy, Clone)]
pub enum CalendarScope {
    All,
    Manager(u64),
}

impl FromStr for CalendarScope {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(CalendarScope::All);
        }
        s.parse::<u64>()
            .map(CalendarScope::Manager)
            .map_err(|_| ApiError::Validation("scope must be 'all' or a manager id".into()))
    }
}

/// Everything known about one employee/day, gathered for the cell decision.
pub struct DayFacts<'a> {
    pub record: &'a DailyAttendanceRecord,
    /// work_mode of the day's first session, if any.
    pub session_mode: Option<&'a str>,
    pub holiday: Option<&'a str>,
    pub leave_type: Option<&'a str>,
    pub wfh_approved: bool,
    pub partial: Option<(NaiveTime, NaiveTime)>,
}

/// Combine the aggregated day record with leave/holiday/request annotations
/// into one grid cell. Saturday/Sunday short-circuit to `weekend` whatever
/// the day holds.
pub fn day_cell(date: NaiveDate, facts: &DayFacts) -> CalendarStatus {
    let check_in = facts.record.first_clock_in;
    let check_out = facts.record.last_clock_out;

    if is_weekend(date) {
        return CalendarStatus {
            status: CalendarDayStatus::Weekend,
            detail: None,
            work_mode: None,
            check_in,
            check_out,
        };
    }

    let work_mode = if facts.wfh_approved {
        Some("remote".to_string())
    } else {
        facts.session_mode.map(String::from)
    };
    let detail = if let Some((start, end)) = facts.partial {
        Some(format!(
            "Partial day {}-{}",
            start.format("%H:%M"),
            end.format("%H:%M")
        ))
    } else if facts.wfh_approved {
        Some("Work from home".to_string())
    } else {
        None
    };

    match facts.record.status {
        DayStatus::Present => CalendarStatus {
            status: CalendarDayStatus::Present,
            detail,
            work_mode,
            check_in,
            check_out,
        },
        DayStatus::OnLeave => CalendarStatus {
            status: CalendarDayStatus::OnLeave,
            detail: facts
                .leave_type
                .map(|kind| format!("{kind} leave"))
                .or(detail),
            work_mode: None,
            check_in,
            check_out,
        },
        DayStatus::Absent => CalendarStatus {
            status: CalendarDayStatus::Absent,
            detail,
            work_mode,
            check_in,
            check_out,
        },
        DayStatus::NotMarked => match facts.holiday {
            Some(name) => CalendarStatus {
                status: CalendarDayStatus::Holiday,
                detail: Some(name.to_string()),
                work_mode: None,
                check_in,
                check_out,
            },
            None => CalendarStatus {
                status: CalendarDayStatus::NotMarked,
                detail,
                work_mode,
                check_in,
                check_out,
            },
        },
    }
}

/// Month grid for the scope: per employee, per day, one CalendarStatus.
/// Keys serialize as employee id -> ISO date.
pub async fn build_calendar(
    pool: &MySqlPool,
    scope: CalendarScope,
    year: i32,
    month: u32,
) -> ApiResult<(
    Vec<EmployeeDisplay>,
    BTreeMap<u64, BTreeMap<String, CalendarStatus>>,
)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ApiError::Validation("Invalid year/month".into()))?;
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| ApiError::Validation("Invalid year/month".into()))?;

    let employees = match scope {
        CalendarScope::All => directory::roster(pool).await?,
        CalendarScope::Manager(id) => directory::reports_of(pool, id).await?,
    };
    let member_ids: HashSet<u64> = employees.iter().map(|e| e.id).collect();

    let mut sessions_by: HashMap<(u64, NaiveDate), Vec<AttendanceSession>> = HashMap::new();
    for session in sessions::all_for_range(pool, start, end).await? {
        if member_ids.contains(&session.employee_id) {
            sessions_by
                .entry((session.employee_id, session.date))
                .or_default()
                .push(session);
        }
    }

    let spans = leave_ledger::spans_in_range(pool, start, end).await?;
    let holiday_names: HashMap<NaiveDate, String> =
        holidays::in_range(pool, start, end).await?.into_iter().collect();

    let mut wfh_days: HashSet<(u64, NaiveDate)> = HashSet::new();
    let mut partial_days: HashMap<(u64, NaiveDate), (NaiveTime, NaiveTime)> = HashMap::new();
    for request in requests::approved_in_range(pool, start, end).await? {
        match request.kind() {
            Some(RequestKind::WorkFromHome) => {
                wfh_days.insert((request.employee_id, request.date));
            }
            Some(RequestKind::PartialDay) => {
                if let (Some(s), Some(e)) = (request.start_time, request.end_time) {
                    partial_days.insert((request.employee_id, request.date), (s, e));
                }
            }
            _ => {}
        }
    }

    let today = Local::now().date_naive();
    let empty: Vec<AttendanceSession> = Vec::new();
    let mut calendar = BTreeMap::new();

    for employee in &employees {
        let mut days = BTreeMap::new();
        let mut date = start;
        while date <= end {
            let day_sessions = sessions_by.get(&(employee.id, date)).unwrap_or(&empty);
            let span = spans
                .iter()
                .find(|s| s.employee_id == employee.id && s.covers(date));
            let ctx = DayContext {
                date,
                today,
                on_leave: span.is_some(),
                holiday: holiday_names.contains_key(&date),
            };
            let record = fold_day(employee.id, &ctx, day_sessions);
            let facts = DayFacts {
                record: &record,
                session_mode: day_sessions.first().map(|s| s.work_mode.as_str()),
                holiday: holiday_names.get(&date).map(String::as_str),
                leave_type: span.map(|s| s.leave_type.as_str()),
                wfh_approved: wfh_days.contains(&(employee.id, date)),
                partial: partial_days.get(&(employee.id, date)).copied(),
            };
            days.insert(date.format("%Y-%m-%d").to_string(), day_cell(date, &facts));
            date = date.succ_opt().expect("date overflow");
        }
        calendar.insert(employee.id, days);
    }

    Ok((employees, calendar))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn record(date: NaiveDate, status: DayStatus) -> DailyAttendanceRecord {
        DailyAttendanceRecord {
            employee_id: 1000,
            date,
            status,
            total_minutes: 0,
            session_count: u32::from(status == DayStatus::Present),
            first_clock_in: None,
            last_clock_out: None,
            has_active_session: false,
            late: false,
        }
    }

    fn facts(record: &DailyAttendanceRecord) -> DayFacts<'_> {
        DayFacts {
            record,
            session_mode: None,
            holiday: None,
            leave_type: None,
            wfh_approved: false,
            partial: None,
        }
    }

    #[test]
    fn weekend_wins_over_everything() {
        let saturday = d(1);
        let rec = record(saturday, DayStatus::Present);
        let mut f = facts(&rec);
        f.holiday = Some("Founders Day");
        f.wfh_approved = true;
        assert_eq!(day_cell(saturday, &f).status, CalendarDayStatus::Weekend);
    }

    #[test]
    fn holiday_cell_carries_its_name() {
        let date = d(4);
        let rec = record(date, DayStatus::NotMarked);
        let mut f = facts(&rec);
        f.holiday = Some("Founders Day");
        let cell = day_cell(date, &f);
        assert_eq!(cell.status, CalendarDayStatus::Holiday);
        assert_eq!(cell.detail.as_deref(), Some("Founders Day"));
    }

    #[test]
    fn working_a_holiday_still_shows_present() {
        let date = d(4);
        let rec = record(date, DayStatus::Present);
        let mut f = facts(&rec);
        f.holiday = Some("Founders Day");
        f.session_mode = Some("office");
        let cell = day_cell(date, &f);
        assert_eq!(cell.status, CalendarDayStatus::Present);
        assert_eq!(cell.work_mode.as_deref(), Some("office"));
    }

    #[test]
    fn approved_wfh_annotates_work_mode() {
        let date = d(5);
        let rec = record(date, DayStatus::Present);
        let mut f = facts(&rec);
        f.session_mode = Some("office");
        f.wfh_approved = true;
        let cell = day_cell(date, &f);
        assert_eq!(cell.status, CalendarDayStatus::Present);
        assert_eq!(cell.work_mode.as_deref(), Some("remote"));
        assert_eq!(cell.detail.as_deref(), Some("Work from home"));
    }

    #[test]
    fn approved_partial_day_annotates_detail() {
        let date = d(5);
        let rec = record(date, DayStatus::Present);
        let mut f = facts(&rec);
        f.partial = Some((t(10, 0), t(14, 0)));
        let cell = day_cell(date, &f);
        assert_eq!(cell.detail.as_deref(), Some("Partial day 10:00-14:00"));
    }

    #[test]
    fn leave_cell_names_the_leave_kind() {
        let date = d(5);
        let rec = record(date, DayStatus::OnLeave);
        let mut f = facts(&rec);
        f.leave_type = Some("sick");
        let cell = day_cell(date, &f);
        assert_eq!(cell.status, CalendarDayStatus::OnLeave);
        assert_eq!(cell.detail.as_deref(), Some("sick leave"));
    }

    #[test]
    fn scope_parses_all_or_manager_id() {
        assert!(matches!("all".parse::<CalendarScope>(), Ok(CalendarScope::All)));
        assert!(matches!(
            "ALL".parse::<CalendarScope>(),
            Ok(CalendarScope::All)
        ));
        assert!(matches!(
            "42".parse::<CalendarScope>(),
            Ok(CalendarScope::Manager(42))
        ));
        assert!("team-x".parse::<CalendarScope>().is_err());
    }
}
