use crate::error::{ApiError, ApiResult};
use crate::model::activity_request::{
    ActivityRequest, RequestKind, RequestStatus, SubmitRequest,
};
use crate::store::{requests, requests::NewRequest, sessions};
use chrono::{Local, NaiveDate, NaiveDateTime};
use sqlx::{MySql, MySqlPool, Transaction};

/// Variant-specific shape validation, shared by every submission path.
pub fn validate(request: &SubmitRequest, today: NaiveDate) -> Result<(), ApiError> {
    match request {
        SubmitRequest::WorkFromHome { reason, .. } => require_reason(reason),
        SubmitRequest::PartialDay {
            start_time,
            end_time,
            reason,
            ..
        } => {
            require_reason(reason)?;
            if end_time <= start_time {
                return Err(ApiError::Validation(
                    "end_time must be after start_time".into(),
                ));
            }
            Ok(())
        }
        SubmitRequest::Regularization {
            date,
            requested_clock_in,
            requested_clock_out,
            reason,
        } => {
            require_reason(reason)?;
            if *date > today {
                return Err(ApiError::Validation(
                    "Cannot regularize a future date".into(),
                ));
            }
            if requested_clock_out <= requested_clock_in {
                return Err(ApiError::Validation(
                    "requested_clock_out must be after requested_clock_in".into(),
                ));
            }
            Ok(())
        }
    }
}

fn require_reason(reason: &str) -> Result<(), ApiError> {
    if reason.trim().is_empty() {
        return Err(ApiError::Validation("A reason is required".into()));
    }
    Ok(())
}

/// Create a request in `pending`, the only initial state.
pub async fn submit(
    pool: &MySqlPool,
    employee_id: u64,
    payload: &SubmitRequest,
) -> ApiResult<ActivityRequest> {
    validate(payload, Local::now().date_naive())?;

    let new = match payload {
        SubmitRequest::WorkFromHome { date, reason } => NewRequest {
            employee_id,
            kind: RequestKind::WorkFromHome,
            date: *date,
            start_time: None,
            end_time: None,
            requested_clock_in: None,
            requested_clock_out: None,
            reason,
        },
        SubmitRequest::PartialDay {
            date,
            start_time,
            end_time,
            reason,
        } => NewRequest {
            employee_id,
            kind: RequestKind::PartialDay,
            date: *date,
            start_time: Some(*start_time),
            end_time: Some(*end_time),
            requested_clock_in: None,
            requested_clock_out: None,
            reason,
        },
        SubmitRequest::Regularization {
            date,
            requested_clock_in,
            requested_clock_out,
            reason,
        } => NewRequest {
            employee_id,
            kind: RequestKind::Regularization,
            date: *date,
            start_time: None,
            end_time: None,
            requested_clock_in: Some(*requested_clock_in),
            requested_clock_out: Some(*requested_clock_out),
            reason,
        },
    };

    let id = requests::insert(pool, new).await?;
    tracing::info!(employee_id, request_id = id, kind = %payload.kind(), "Request submitted");

    requests::fetch(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".into()))
}

/// `pending -> approved`. The status compare-and-set and the regularization
/// side effect share one transaction, so two racing admins cannot both win
/// and the attendance write-back is applied exactly once.
pub async fn approve(
    pool: &MySqlPool,
    request_id: u64,
    admin_id: u64,
    notes: Option<&str>,
) -> ApiResult<ActivityRequest> {
    let mut tx = pool.begin().await?;

    let won = requests::transition_tx(
        &mut tx,
        request_id,
        RequestStatus::Approved,
        admin_id,
        Local::now().naive_local(),
        notes,
    )
    .await?;
    if !won {
        tx.rollback().await?;
        return Err(not_pending(pool, request_id).await?);
    }

    let request = requests::fetch_tx(&mut tx, request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".into()))?;

    if request.kind() == Some(RequestKind::Regularization) {
        reconcile_sessions(&mut tx, &request).await?;
    }

    tx.commit().await?;
    tracing::info!(request_id, admin_id, "Request approved");
    Ok(request)
}

/// `pending -> rejected`. The reason is shown to the employee, so it must
/// be non-empty.
pub async fn reject(
    pool: &MySqlPool,
    request_id: u64,
    admin_id: u64,
    notes: &str,
) -> ApiResult<ActivityRequest> {
    if notes.trim().is_empty() {
        return Err(ApiError::Validation("Rejection reason is required".into()));
    }

    let mut tx = pool.begin().await?;

    let won = requests::transition_tx(
        &mut tx,
        request_id,
        RequestStatus::Rejected,
        admin_id,
        Local::now().naive_local(),
        Some(notes),
    )
    .await?;
    if !won {
        tx.rollback().await?;
        return Err(not_pending(pool, request_id).await?);
    }

    let request = requests::fetch_tx(&mut tx, request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Request not found".into()))?;

    tx.commit().await?;
    tracing::info!(request_id, admin_id, "Request rejected");
    Ok(request)
}

/// Why a compare-and-set found nothing to update.
async fn not_pending(pool: &MySqlPool, request_id: u64) -> ApiResult<ApiError> {
    Ok(match requests::fetch(pool, request_id).await? {
        Some(_) => ApiError::InvalidState("Request already processed".into()),
        None => ApiError::NotFound("Request not found".into()),
    })
}

/// The regularization post-approval hook: rewrite the attendance record for
/// the target date. No sessions -> create one closed session from the
/// requested times; otherwise overwrite the earliest session's times and
/// leave later sessions untouched.
async fn reconcile_sessions(
    tx: &mut Transaction<'_, MySql>,
    request: &ActivityRequest,
) -> ApiResult<()> {
    let (in_time, out_time) = match (request.requested_clock_in, request.requested_clock_out) {
        (Some(i), Some(o)) => (i, o),
        _ => {
            return Err(ApiError::Validation(
                "Regularization request is missing requested times".into(),
            ))
        }
    };
    let clock_in = NaiveDateTime::new(request.date, in_time);
    let clock_out = NaiveDateTime::new(request.date, out_time);

    match sessions::earliest_for_day_tx(tx, request.employee_id, request.date).await? {
        Some(session_id) => {
            sessions::overwrite_times_tx(tx, session_id, clock_in, clock_out).await?;
            tracing::info!(
                employee_id = request.employee_id,
                session_id,
                "Regularization overwrote session times"
            );
        }
        None => {
            sessions::insert_closed_tx(tx, request.employee_id, clock_in, clock_out, "Regularized")
                .await?;
            tracing::info!(
                employee_id = request.employee_id,
                date = %request.date,
                "Regularization created session"
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn today() -> NaiveDate {
        d(7)
    }

    #[test]
    fn wfh_needs_a_reason() {
        let blank = SubmitRequest::WorkFromHome {
            date: d(10),
            reason: "  ".into(),
        };
        assert!(matches!(
            validate(&blank, today()),
            Err(ApiError::Validation(_))
        ));

        let ok = SubmitRequest::WorkFromHome {
            date: d(10),
            reason: "Internet outage at the office".into(),
        };
        assert!(validate(&ok, today()).is_ok());
    }

    #[test]
    fn partial_day_times_must_be_ordered() {
        let backwards = SubmitRequest::PartialDay {
            date: d(10),
            start_time: t(14, 0),
            end_time: t(10, 0),
            reason: "appointment".into(),
        };
        assert!(matches!(
            validate(&backwards, today()),
            Err(ApiError::Validation(_))
        ));

        let zero_length = SubmitRequest::PartialDay {
            date: d(10),
            start_time: t(10, 0),
            end_time: t(10, 0),
            reason: "appointment".into(),
        };
        assert!(validate(&zero_length, today()).is_err());

        let ok = SubmitRequest::PartialDay {
            date: d(10),
            start_time: t(10, 0),
            end_time: t(14, 0),
            reason: "appointment".into(),
        };
        assert!(validate(&ok, today()).is_ok());
    }

    #[test]
    fn regularization_cannot_target_the_future() {
        let future = SubmitRequest::Regularization {
            date: d(8),
            requested_clock_in: t(9, 0),
            requested_clock_out: t(18, 0),
            reason: "forgot to clock in".into(),
        };
        assert!(matches!(
            validate(&future, today()),
            Err(ApiError::Validation(_))
        ));

        // today itself is fine
        let today_req = SubmitRequest::Regularization {
            date: today(),
            requested_clock_in: t(9, 0),
            requested_clock_out: t(18, 0),
            reason: "forgot to clock in".into(),
        };
        assert!(validate(&today_req, today()).is_ok());
    }

    #[test]
    fn regularization_times_must_be_ordered() {
        let backwards = SubmitRequest::Regularization {
            date: d(5),
            requested_clock_in: t(18, 0),
            requested_clock_out: t(9, 0),
            reason: "forgot to clock out".into(),
        };
        assert!(matches!(
            validate(&backwards, today()),
            Err(ApiError::Validation(_))
        ));
    }
}
