use crate::error::ApiResult;
use crate::model::employee::EmployeeDisplay;
use sqlx::MySqlPool;

const DISPLAY_SQL: &str = r#"
    SELECT e.id,
           CONCAT_WS(' ', e.first_name, e.last_name) AS name,
           e.email,
           d.name AS department
    FROM employees e
    LEFT JOIN departments d ON d.id = e.department_id
"#;

/// Display data for one employee.
pub async fn display(pool: &MySqlPool, id: u64) -> ApiResult<Option<EmployeeDisplay>> {
    let sql = format!("{DISPLAY_SQL} WHERE e.id = ?");
    let employee = sqlx::query_as::<_, EmployeeDisplay>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(employee)
}

/// Every active employee, for org-wide views.
pub async fn roster(pool: &MySqlPool) -> ApiResult<Vec<EmployeeDisplay>> {
    let sql = format!("{DISPLAY_SQL} WHERE e.status = 'active' ORDER BY e.id");
    let employees = sqlx::query_as::<_, EmployeeDisplay>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(employees)
}

/// A manager's direct reports.
pub async fn reports_of(pool: &MySqlPool, manager_id: u64) -> ApiResult<Vec<EmployeeDisplay>> {
    let sql = format!(
        "{DISPLAY_SQL} WHERE e.status = 'active' AND e.manager_id = ? ORDER BY e.id"
    );
    let employees = sqlx::query_as::<_, EmployeeDisplay>(&sql)
        .bind(manager_id)
        .fetch_all(pool)
        .await?;
    Ok(employees)
}
