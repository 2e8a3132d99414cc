use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

/// Outcome of one employee/day after folding its sessions.
///
/// `NotMarked` covers the days where "absent" does not apply: a working day
/// that has not fully elapsed yet, or a weekend/holiday without sessions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DayStatus {
    Present,
    Absent,
    OnLeave,
    NotMarked,
}

/// Derived view over the sessions sharing `employee_id` + calendar date.
/// Never persisted; recomputed on read.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DailyAttendanceRecord {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2026-08-03", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "present")]
    pub status: DayStatus,
    /// Sum over closed sessions; the open session is excluded.
    #[schema(example = 480)]
    pub total_minutes: i64,
    #[schema(example = 2)]
    pub session_count: u32,
    #[schema(example = "2026-08-03T09:00:00", value_type = String, nullable = true)]
    pub first_clock_in: Option<NaiveDateTime>,
    #[schema(example = "2026-08-03T18:00:00", value_type = String, nullable = true)]
    pub last_clock_out: Option<NaiveDateTime>,
    pub has_active_session: bool,
    pub late: bool,
}

/// Rolling statistics over a date range.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PeriodStatistics {
    #[schema(example = 18)]
    pub present_days: u32,
    /// Working days in range; weekends and holidays excluded.
    #[schema(example = 21)]
    pub total_days: u32,
    /// Mean worked time across present days, hours:minutes.
    #[schema(example = "7:45")]
    pub average_hours: String,
    /// 100 when there are no present days: no data is no violations.
    #[schema(example = 88.9)]
    pub on_time_percentage: f64,
}
