use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

use crate::error::ApiResult;
use crate::model::employee::EmployeeDisplay;

/// id -> display view (name/email/department), the join data the approval
/// listings and calendar need on every row.
pub static EMPLOYEE_CACHE: Lazy<Cache<u64, EmployeeDisplay>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(100_000)
        .time_to_live(Duration::from_secs(3600)) // directory edits show up within the hour
        .build()
});

/// Cached directory lookup, falling back to the directory store on miss.
pub async fn display(pool: &MySqlPool, employee_id: u64) -> ApiResult<Option<EmployeeDisplay>> {
    if let Some(hit) = EMPLOYEE_CACHE.get(&employee_id).await {
        return Ok(Some(hit));
    }

    let fetched = crate::store::directory::display(pool, employee_id).await?;
    if let Some(employee) = &fetched {
        EMPLOYEE_CACHE.insert(employee_id, employee.clone()).await;
    }
    Ok(fetched)
}

async fn batch_insert(employees: &[EmployeeDisplay]) {
    let futures: Vec<_> = employees
        .iter()
        .map(|e| EMPLOYEE_CACHE.insert(e.id, e.clone()))
        .collect();

    // Await all insertions concurrently
    futures::future::join_all(futures).await;
}

/// Load the active roster into the in-memory cache (batched)
pub async fn warmup_employee_cache(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, EmployeeDisplay>(
        r#"
        SELECT e.id,
               CONCAT_WS(' ', e.first_name, e.last_name) AS name,
               e.email,
               d.name AS department
        FROM employees e
        LEFT JOIN departments d ON d.id = e.department_id
        WHERE e.status = 'active'
        "#,
    )
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total_count = 0usize;

    while let Some(row) = stream.next().await {
        batch.push(row?);
        total_count += 1;

        if batch.len() >= batch_size {
            batch_insert(&batch).await;
            batch.clear();
        }
    }

    if !batch.is_empty() {
        batch_insert(&batch).await;
    }

    log::info!(
        "Employee display cache warmup complete: {} active employees",
        total_count
    );

    Ok(())
}
