use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::activity_request::{
    RequestKind, RequestStatus, RequestWithEmployee, SubmitRequest,
};
use crate::service::{approval, request_workflow};
use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct RequestFilter {
    /// Filter by request type (work_from_home / partial_day / regularization)
    #[schema(example = "regularization")]
    pub r#type: Option<String>,
    /// Filter by request status
    #[schema(example = "pending")]
    pub status: Option<String>,
    /// Filter by submitting employee
    #[schema(example = 1000)]
    pub employee_id: Option<u64>,
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u64>, // 1-based
    /// Pagination per page number
    #[schema(example = 10)]
    pub per_page: Option<u64>, // items per page
}

#[derive(Serialize, ToSchema)]
pub struct RequestListResponse {
    pub data: Vec<RequestWithEmployee>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct ActionPayload {
    /// Required on reject; shown to the employee
    #[schema(example = "insufficient justification", nullable = true)]
    pub notes: Option<String>,
}

/* =========================
Submit activity request
========================= */
/// Swagger doc for submit_request endpoint
#[utoipa::path(
    post,
    path = "/api/v1/requests",
    request_body(
        content = SubmitRequest,
        description = "Tagged request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Request submitted", body = Object, example = json!({
            "message": "Request submitted",
            "status": "pending"
        })),
        (status = 400, description = "Malformed variant payload"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Requests"
)]
pub async fn submit_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<SubmitRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.employee_id()?;

    let request = request_workflow::submit(pool.get_ref(), employee_id, &payload).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Request submitted",
        "request": request
    })))
}

/* =========================
List requests (HR/Admin)
========================= */
/// Swagger doc for list_requests endpoint
#[utoipa::path(
    get,
    path = "/api/v1/requests",
    params(RequestFilter),
    responses(
        (status = 200, description = "Merged cross-type request list", body = RequestListResponse),
        (status = 400, description = "Unknown type or status filter"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Requests"
)]
pub async fn list_requests(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<RequestFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let kind = query
        .r#type
        .as_deref()
        .map(|t| {
            t.parse::<RequestKind>()
                .map_err(|_| ApiError::Validation(format!("Unknown request type: {t}")))
        })
        .transpose()?;
    let status = query
        .status
        .as_deref()
        .map(|s| {
            s.to_lowercase()
                .parse::<RequestStatus>()
                .map_err(|_| ApiError::Validation(format!("Unknown status: {s}")))
        })
        .transpose()?;

    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);

    let (data, total) = approval::list(
        pool.get_ref(),
        kind,
        status,
        query.employee_id,
        page,
        per_page,
    )
    .await?;

    let response = RequestListResponse {
        data,
        page: page as u32,
        per_page: per_page as u32,
        total,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Pending totals per request type, for badge UI
#[utoipa::path(
    get,
    path = "/api/v1/requests/pending-count",
    responses(
        (status = 200, description = "Pending request totals"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Requests"
)]
pub async fn pending_count(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let counts = approval::pending_counts(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(counts))
}

/* =========================
Approve request (HR/Admin)
========================= */
/// Swagger doc for approve_request endpoint
#[utoipa::path(
    put,
    path = "/api/v1/requests/{request_id}/approve",
    params(
        ("request_id" = u64, Path, description = "ID of the request to approve")
    ),
    request_body = ActionPayload,
    responses(
        (status = 200, description = "Request approved", body = Object, example = json!({
            "message": "Request approved"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Unknown request id"),
        (status = 409, description = "Request is not pending", body = Object, example = json!({
            "message": "Request already processed"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Requests"
)]
pub async fn approve_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<ActionPayload>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let request_id = path.into_inner();

    let request = request_workflow::approve(
        pool.get_ref(),
        request_id,
        auth.user_id,
        payload.notes.as_deref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Request approved",
        "request": request
    })))
}

/* =========================
Reject request (HR/Admin)
========================= */
/// Swagger doc for reject_request endpoint
#[utoipa::path(
    put,
    path = "/api/v1/requests/{request_id}/reject",
    params(
        ("request_id" = u64, Path, description = "ID of the request to reject")
    ),
    request_body = ActionPayload,
    responses(
        (status = 200, description = "Request rejected", body = Object, example = json!({
            "message": "Request rejected"
        })),
        (status = 400, description = "Missing rejection reason"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Unknown request id"),
        (status = 409, description = "Request is not pending")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Requests"
)]
pub async fn reject_request(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<ActionPayload>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let request_id = path.into_inner();

    let request = request_workflow::reject(
        pool.get_ref(),
        request_id,
        auth.user_id,
        payload.notes.as_deref().unwrap_or_default(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Request rejected",
        "request": request
    })))
}
