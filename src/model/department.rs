use serde::Serialize;
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::client::ApiError;

/// Offered when the HRMS API has no departments to list or cannot be reached.
pub const DEFAULT_DEPARTMENTS: [&str; 6] = [
    "Human Resources",
    "Engineering",
    "Marketing",
    "Sales",
    "Finance",
    "IT",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DepartmentSource {
    Remote,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[schema(example = json!({
    "names": ["Human Resources", "Engineering", "Marketing", "Sales", "Finance", "IT"],
    "source": "default"
}))]
pub struct Departments {
    pub names: Vec<String>,
    pub source: DepartmentSource,
}

impl Departments {
    pub fn defaults() -> Self {
        Self {
            names: DEFAULT_DEPARTMENTS.iter().map(|d| (*d).to_owned()).collect(),
            source: DepartmentSource::Default,
        }
    }

    /// Remote list when it has entries, the default set otherwise.
    pub fn resolve(remote: Result<Vec<String>, ApiError>) -> Self {
        match remote {
            Ok(names) if !names.is_empty() => Self {
                names,
                source: DepartmentSource::Remote,
            },
            Ok(_) => {
                debug!("HRMS API returned no departments, using defaults");
                Self::defaults()
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch departments, using defaults");
                Self::defaults()
            }
        }
    }
}
