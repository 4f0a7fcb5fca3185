use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": "EMP001",
        "full_name": "John Doe",
        "email": "john.doe@example.com",
        "department": "Engineering",
        "created_at": "2024-01-01T08:00:00+00:00"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    /// Human-facing employee code.
    #[schema(example = "EMP001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub full_name: String,

    #[schema(example = "john.doe@example.com")]
    pub email: String,

    #[schema(example = "Engineering")]
    pub department: String,

    #[schema(example = "2024-01-01T08:00:00+00:00", nullable = true)]
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Payload for `POST /api/employees`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "EMP001")]
    pub employee_id: String,
    #[schema(example = "John Doe")]
    pub full_name: String,
    #[schema(example = "john.doe@example.com", format = "email")]
    pub email: String,
    #[schema(example = "Engineering")]
    pub department: String,
}
