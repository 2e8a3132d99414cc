use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

/// Cell status in the team calendar grid. Saturday/Sunday are always
/// `Weekend`, whatever else the day holds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CalendarDayStatus {
    Present,
    Absent,
    OnLeave,
    Weekend,
    Holiday,
    NotMarked,
}

/// One employee/day cell of the manager calendar view.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CalendarStatus {
    #[schema(example = "present")]
    pub status: CalendarDayStatus,
    /// Human-readable annotation: holiday name, leave kind, approved
    /// partial-day window.
    #[schema(example = "Partial day 10:00-14:00", nullable = true)]
    pub detail: Option<String>,
    #[schema(example = "remote", nullable = true)]
    pub work_mode: Option<String>,
    #[schema(example = "2026-08-03T09:00:00", value_type = String, nullable = true)]
    pub check_in: Option<NaiveDateTime>,
    #[schema(example = "2026-08-03T18:00:00", value_type = String, nullable = true)]
    pub check_out: Option<NaiveDateTime>,
}
