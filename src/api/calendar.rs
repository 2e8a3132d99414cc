use crate::auth::auth::AuthUser;
use crate::service::team_calendar::{self, CalendarScope};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct CalendarQuery {
    /// "all" or a manager id (direct reports)
    #[schema(example = "all")]
    pub scope: Option<String>,
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = 8)]
    pub month: u32,
}

/// Month grid of per-employee day statuses
#[utoipa::path(
    get,
    path = "/api/v1/calendar",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Employees and their employee->date status grid"),
        (status = 400, description = "Invalid scope or month"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Calendar"
)]
pub async fn team_calendar(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<CalendarQuery>,
) -> actix_web::Result<impl Responder> {
    let scope: CalendarScope = query.scope.as_deref().unwrap_or("all").parse()?;

    let (employees, calendar) =
        team_calendar::build_calendar(pool.get_ref(), scope, query.year, query.month).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "employees": employees,
        "calendar": calendar
    })))
}
