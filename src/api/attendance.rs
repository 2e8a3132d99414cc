use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::model::attendance::DayStatus;
use crate::model::session::WorkMode;
use crate::service::{day_aggregator, period_stats, session_tracker};
use crate::store::{directory, sessions};
use crate::utils::employee_cache;
use actix_web::{HttpResponse, Responder, web};
use chrono::{Duration, Local};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct ClockInPayload {
    #[schema(example = "office")]
    pub work_mode: WorkMode,
    #[schema(example = 23.7639, nullable = true)]
    pub geo_lat: Option<f64>,
    #[schema(example = 90.3889, nullable = true)]
    pub geo_lng: Option<f64>,
}

#[derive(Deserialize, ToSchema)]
pub struct ClockOutPayload {
    #[schema(example = "leaving early for an appointment", nullable = true)]
    pub notes: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendanceWindow {
    /// Days of history to include, today inclusive (default 30, max 90)
    #[schema(example = 30)]
    pub days: Option<i64>,
}

/// Organization head count for today.
#[derive(Serialize, ToSchema)]
pub struct OrgTodaySummary {
    #[schema(example = 34)]
    pub present: u32,
    #[schema(example = 3)]
    pub on_leave: u32,
    #[schema(example = 2)]
    pub absent: u32,
    #[schema(example = 1)]
    pub not_marked: u32,
    #[schema(example = 40)]
    pub total_employees: u32,
}

/// Clock-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/clock-in",
    request_body = ClockInPayload,
    responses(
        (status = 200, description = "Clocked in successfully", body = Object, example = json!({
            "message": "Clocked in successfully"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "An open session already exists", body = Object, example = json!({
            "message": "Already clocked in"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn clock_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: web::Json<ClockInPayload>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.employee_id()?;

    let geo = payload.geo_lat.zip(payload.geo_lng);
    let session = session_tracker::clock_in(
        pool.get_ref(),
        config.get_ref(),
        employee_id,
        payload.work_mode,
        geo,
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Clocked in successfully",
        "session": session
    })))
}

/// Clock-out endpoint
#[utoipa::path(
    put,
    path = "/api/v1/attendance/clock-out",
    request_body = ClockOutPayload,
    responses(
        (status = 200, description = "Clocked out successfully", body = Object, example = json!({
            "message": "Clocked out successfully",
            "duration_minutes": 480
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "No open session to close", body = Object, example = json!({
            "message": "No active session found"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn clock_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<ClockOutPayload>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.employee_id()?;

    let session =
        session_tracker::clock_out(pool.get_ref(), employee_id, payload.notes.as_deref()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Clocked out successfully",
        "duration_minutes": session.duration_minutes(),
        "session": session
    })))
}

/// Whether the caller currently has an open session
#[utoipa::path(
    get,
    path = "/api/v1/attendance/status",
    responses(
        (status = 200, description = "Current clock status", body = Object, example = json!({
            "active": true
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn clock_status(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.employee_id()?;

    let active = session_tracker::has_open_session(pool.get_ref(), employee_id).await?;
    let session = if active {
        sessions::find_open(pool.get_ref(), employee_id).await?
    } else {
        None
    };

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "active": active,
        "session": session
    })))
}

/// Caller's own attendance: today, the recent window, and its statistics
#[utoipa::path(
    get,
    path = "/api/v1/attendance/me",
    params(AttendanceWindow),
    responses(
        (status = 200, description = "Attendance window with statistics"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn my_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceWindow>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.employee_id()?;

    let days = query.days.unwrap_or(30).clamp(1, 90);
    let today = Local::now().date_naive();
    let start = today - Duration::days(days - 1);

    let today_record = day_aggregator::aggregate(pool.get_ref(), employee_id, today).await?;
    let records = day_aggregator::aggregate_range(pool.get_ref(), employee_id, start, today).await?;
    let statistics = period_stats::compute_stats(pool.get_ref(), employee_id, start, today).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "today": today_record,
        "records": records,
        "statistics": statistics
    })))
}

/// Org-wide attendance for HR/Admin: window records, open sessions, head count
#[utoipa::path(
    get,
    path = "/api/v1/attendance/all",
    params(AttendanceWindow),
    responses(
        (status = 200, description = "Org-wide records, active sessions and today's head count"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn all_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceWindow>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let days = query.days.unwrap_or(7).clamp(1, 90);
    let today = Local::now().date_naive();
    let start = today - Duration::days(days - 1);

    let employees = directory::roster(pool.get_ref()).await?;
    let ids: Vec<u64> = employees.iter().map(|e| e.id).collect();

    let records =
        day_aggregator::aggregate_all_range(pool.get_ref(), &ids, start, today).await?;

    let mut active_sessions = Vec::new();
    for session in sessions::all_open(pool.get_ref()).await? {
        let name = employee_cache::display(pool.get_ref(), session.employee_id)
            .await?
            .map(|e| e.name);
        active_sessions.push(serde_json::json!({
            "session": session,
            "employee_name": name
        }));
    }

    let mut statistics = OrgTodaySummary {
        present: 0,
        on_leave: 0,
        absent: 0,
        not_marked: 0,
        total_employees: employees.len() as u32,
    };
    for record in records.iter().filter(|r| r.date == today) {
        match record.status {
            DayStatus::Present => statistics.present += 1,
            DayStatus::OnLeave => statistics.on_leave += 1,
            DayStatus::Absent => statistics.absent += 1,
            DayStatus::NotMarked => statistics.not_marked += 1,
        }
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "records": records,
        "active_sessions": active_sessions,
        "statistics": statistics
    })))
}
