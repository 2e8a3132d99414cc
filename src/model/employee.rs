use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Display view the employee-directory collaborator exposes. The core never
/// touches the full employee record; name/email/department is all it joins.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct EmployeeDisplay {
    #[schema(example = 1000)]
    pub id: u64,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john.doe@company.com")]
    pub email: String,
    #[schema(example = "Engineering", nullable = true)]
    pub department: Option<String>,
}
