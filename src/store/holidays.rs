use crate::error::ApiResult;
use chrono::NaiveDate;
use sqlx::MySqlPool;

/// Org-wide non-working dates inside the range, as (date, name) pairs.
pub async fn in_range(
    pool: &MySqlPool,
    start: NaiveDate,
    end: NaiveDate,
) -> ApiResult<Vec<(NaiveDate, String)>> {
    let holidays = sqlx::query_as::<_, (NaiveDate, String)>(
        "SELECT date, name FROM holidays WHERE date BETWEEN ? AND ? ORDER BY date",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    Ok(holidays)
}

pub async fn is_holiday(pool: &MySqlPool, date: NaiveDate) -> ApiResult<bool> {
    let hit: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM holidays WHERE date = ?)")
        .bind(date)
        .fetch_one(pool)
        .await?;
    Ok(hit != 0)
}
