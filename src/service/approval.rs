use crate::error::ApiResult;
use crate::model::activity_request::{
    PendingCounts, RequestKind, RequestStatus, RequestWithEmployee,
};
use crate::store::requests;
use crate::utils::employee_cache;
use sqlx::MySqlPool;

/// Merged cross-variant listing, newest first, each row joined with the
/// submitter's display data from the employee directory.
pub async fn list(
    pool: &MySqlPool,
    kind: Option<RequestKind>,
    status: Option<RequestStatus>,
    employee_id: Option<u64>,
    page: u64,
    per_page: u64,
) -> ApiResult<(Vec<RequestWithEmployee>, i64)> {
    let (rows, total) = requests::list(pool, kind, status, employee_id, page, per_page).await?;

    let mut joined = Vec::with_capacity(rows.len());
    for request in rows {
        let employee = employee_cache::display(pool, request.employee_id).await?;
        joined.push(RequestWithEmployee::from_parts(request, employee));
    }

    Ok((joined, total))
}

/// Pending totals per variant for badge UI.
pub async fn pending_counts(pool: &MySqlPool) -> ApiResult<PendingCounts> {
    requests::pending_counts(pool).await
}
