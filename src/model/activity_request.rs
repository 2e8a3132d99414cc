use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Discriminator stored with every request row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RequestKind {
    WorkFromHome,
    PartialDay,
    Regularization,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

/// One polymorphic record set carries all three request shapes; the unused
/// variant columns stay NULL.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ActivityRequest {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "work_from_home")]
    pub request_type: String,
    #[schema(example = "2026-08-10", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "10:00:00", value_type = String, nullable = true)]
    pub start_time: Option<NaiveTime>,
    #[schema(example = "14:00:00", value_type = String, nullable = true)]
    pub end_time: Option<NaiveTime>,
    #[schema(example = "09:00:00", value_type = String, nullable = true)]
    pub requested_clock_in: Option<NaiveTime>,
    #[schema(example = "18:00:00", value_type = String, nullable = true)]
    pub requested_clock_out: Option<NaiveTime>,
    #[schema(example = "Internet outage at the office")]
    pub reason: String,
    #[schema(example = "pending")]
    pub status: String,
    /// Admin-entered; required non-empty when the request is rejected.
    #[schema(example = "insufficient justification", nullable = true)]
    pub notes: Option<String>,
    #[schema(example = 1, nullable = true)]
    pub approved_by: Option<u64>,
    #[schema(example = "2026-08-11T10:15:00", value_type = String, nullable = true)]
    pub approval_date: Option<NaiveDateTime>,
    #[schema(example = "2026-08-09T16:40:00Z", value_type = String, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Submission payload, tagged by request type.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubmitRequest {
    WorkFromHome {
        date: NaiveDate,
        reason: String,
    },
    PartialDay {
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        reason: String,
    },
    Regularization {
        date: NaiveDate,
        requested_clock_in: NaiveTime,
        requested_clock_out: NaiveTime,
        reason: String,
    },
}

impl SubmitRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            SubmitRequest::WorkFromHome { .. } => RequestKind::WorkFromHome,
            SubmitRequest::PartialDay { .. } => RequestKind::PartialDay,
            SubmitRequest::Regularization { .. } => RequestKind::Regularization,
        }
    }
}

impl ActivityRequest {
    pub fn kind(&self) -> Option<RequestKind> {
        self.request_type.parse().ok()
    }
}

/// Listing row joined with employee display data.
#[derive(Debug, Serialize, ToSchema)]
pub struct RequestWithEmployee {
    pub id: u64,
    pub employee_id: u64,
    #[schema(example = "John Doe")]
    pub employee_name: String,
    #[schema(example = "john.doe@company.com")]
    pub email: String,
    #[schema(example = "Engineering", nullable = true)]
    pub department: Option<String>,
    pub request_type: String,
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(value_type = String, nullable = true)]
    pub start_time: Option<NaiveTime>,
    #[schema(value_type = String, nullable = true)]
    pub end_time: Option<NaiveTime>,
    #[schema(value_type = String, nullable = true)]
    pub requested_clock_in: Option<NaiveTime>,
    #[schema(value_type = String, nullable = true)]
    pub requested_clock_out: Option<NaiveTime>,
    pub reason: String,
    pub status: String,
    pub notes: Option<String>,
    pub approved_by: Option<u64>,
    #[schema(value_type = String, nullable = true)]
    pub approval_date: Option<NaiveDateTime>,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,
}

impl RequestWithEmployee {
    /// Join one request row with the directory's display view. A request
    /// whose submitter has left the directory still lists, with a
    /// placeholder name.
    pub fn from_parts(request: ActivityRequest, employee: Option<crate::model::employee::EmployeeDisplay>) -> Self {
        let (employee_name, email, department) = match employee {
            Some(e) => (e.name, e.email, e.department),
            None => (format!("Employee #{}", request.employee_id), String::new(), None),
        };
        Self {
            id: request.id,
            employee_id: request.employee_id,
            employee_name,
            email,
            department,
            request_type: request.request_type,
            date: request.date,
            start_time: request.start_time,
            end_time: request.end_time,
            requested_clock_in: request.requested_clock_in,
            requested_clock_out: request.requested_clock_out,
            reason: request.reason,
            status: request.status,
            notes: request.notes,
            approved_by: request.approved_by,
            approval_date: request.approval_date,
            created_at: request.created_at,
        }
    }
}

/// Per-variant pending totals for badge-style UI affordances.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct PendingCounts {
    #[schema(example = 4)]
    pub total: i64,
    #[schema(example = 2)]
    pub work_from_home: i64,
    #[schema(example = 1)]
    pub partial_day: i64,
    #[schema(example = 1)]
    pub regularization: i64,
}
