use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// How the employee worked the session.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WorkMode {
    Office,
    Remote,
}

/// One clock-in/clock-out pair. `clock_out` stays NULL while the session is
/// open; per employee at most one open session may exist at any time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceSession {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2026-08-03", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "2026-08-03T09:02:11", value_type = String)]
    pub clock_in: NaiveDateTime,
    #[schema(example = "2026-08-03T18:00:00", value_type = String, nullable = true)]
    pub clock_out: Option<NaiveDateTime>,
    #[schema(example = "office")]
    pub work_mode: String,
    #[schema(example = 23.7639, nullable = true)]
    pub geo_lat: Option<f64>,
    #[schema(example = 90.3889, nullable = true)]
    pub geo_lng: Option<f64>,
    #[schema(example = "Late by 2 minutes", nullable = true)]
    pub notes: Option<String>,
}

pub const LATE_NOTE_PREFIX: &str = "Late by ";

impl AttendanceSession {
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }

    /// Worked minutes once closed. Open sessions contribute nothing; any
    /// client-side running timer is cosmetic and never persisted.
    pub fn duration_minutes(&self) -> Option<i64> {
        self.clock_out
            .map(|out| (out - self.clock_in).num_minutes())
    }

    /// Whether clock-in carried the late annotation.
    pub fn is_late(&self) -> bool {
        self.notes
            .as_deref()
            .is_some_and(|n| n.starts_with(LATE_NOTE_PREFIX))
    }
}
