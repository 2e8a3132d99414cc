use crate::api::activity_request::{ActionPayload, RequestFilter, RequestListResponse};
use crate::api::attendance::{
    AttendanceWindow, ClockInPayload, ClockOutPayload, OrgTodaySummary,
};
use crate::api::calendar::CalendarQuery;
use crate::model::activity_request::{
    ActivityRequest, PendingCounts, RequestWithEmployee, SubmitRequest,
};
use crate::model::attendance::{DailyAttendanceRecord, DayStatus, PeriodStatistics};
use crate::model::calendar::{CalendarDayStatus, CalendarStatus};
use crate::model::employee::EmployeeDisplay;
use crate::model::session::{AttendanceSession, WorkMode};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Workforce Attendance API",
        version = "1.0.0",
        description = r#"
## Workforce Attendance & Activity Requests

This API powers the attendance core of a workforce-management system.

### 🔹 Key Features
- **Attendance Sessions**
  - Clock in / clock out with one-open-session enforcement and late marking
- **Attendance Views**
  - Daily records, rolling period statistics, org-wide admin overview
- **Activity Requests**
  - Work-from-home, partial-day and regularization requests with a
    pending → approved/rejected approval flow
- **Team Calendar**
  - Per-employee month grid combining attendance, leave and holidays

### 🔐 Security
All endpoints require **JWT Bearer authentication** issued by the identity
service. Approvals and org-wide views are restricted to **Admin** and **HR**
roles.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,
        crate::api::attendance::clock_status,
        crate::api::attendance::my_attendance,
        crate::api::attendance::all_attendance,

        crate::api::activity_request::submit_request,
        crate::api::activity_request::list_requests,
        crate::api::activity_request::pending_count,
        crate::api::activity_request::approve_request,
        crate::api::activity_request::reject_request,

        crate::api::calendar::team_calendar
    ),
    components(
        schemas(
            ClockInPayload,
            ClockOutPayload,
            AttendanceWindow,
            OrgTodaySummary,
            AttendanceSession,
            WorkMode,
            DailyAttendanceRecord,
            DayStatus,
            PeriodStatistics,
            SubmitRequest,
            ActivityRequest,
            RequestWithEmployee,
            RequestFilter,
            RequestListResponse,
            ActionPayload,
            PendingCounts,
            CalendarQuery,
            CalendarStatus,
            CalendarDayStatus,
            EmployeeDisplay
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Attendance session APIs"),
        (name = "Requests", description = "Activity request approval APIs"),
        (name = "Calendar", description = "Team calendar APIs"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
