use std::sync::Arc;
#[cfg(test)]
use std::time::Duration;

use tracing::debug;

use crate::client::HrmsApi;
use crate::config::Config;
use crate::console::clock::Clock;
use crate::console::forms::{AttendanceDraft, EmployeeDraft};
use crate::console::submission::SubmissionFlow;
use crate::model::department::Departments;
use crate::utils::department_cache::DepartmentCache;

/// Shared by every worker through `web::Data`.
pub struct AppState {
    pub api: Arc<dyn HrmsApi>,
    pub clock: Arc<dyn Clock>,
    pub attendance_form: SubmissionFlow<AttendanceDraft>,
    pub employee_form: SubmissionFlow<EmployeeDraft>,
    pub departments: DepartmentCache,
}

impl AppState {
    pub fn new(api: Arc<dyn HrmsApi>, clock: Arc<dyn Clock>, config: &Config) -> Self {
        Self {
            attendance_form: SubmissionFlow::new(
                "attendance",
                Arc::clone(&clock),
                config.form_reset_delay,
            ),
            employee_form: SubmissionFlow::new(
                "employee",
                Arc::clone(&clock),
                config.form_reset_delay,
            ),
            departments: DepartmentCache::new(config.department_cache_ttl),
            api,
            clock,
        }
    }

    /// Fills the department cache ahead of the first form view.
    pub async fn warm_up_departments(&self) -> Arc<Departments> {
        let departments = self.departments.get_or_fetch(self.api.as_ref()).await;
        debug!(
            source = ?departments.source,
            count = departments.names.len(),
            "Departments warmed up"
        );
        departments
    }

    #[cfg(test)]
    pub fn for_tests(api: Arc<dyn HrmsApi>, clock: Arc<dyn Clock>, reset_delay: Duration) -> Self {
        Self {
            attendance_form: SubmissionFlow::new("attendance", Arc::clone(&clock), reset_delay),
            employee_form: SubmissionFlow::new("employee", Arc::clone(&clock), reset_delay),
            departments: DepartmentCache::new(Duration::from_secs(60)),
            api,
            clock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::stub::StubApi;
    use crate::console::clock::FixedClock;
    use chrono::NaiveDate;

    #[tokio::test(start_paused = true)]
    async fn added_employee_refreshes_departments() {
        let api = Arc::new(StubApi::default());
        *api.departments.lock() = Some(vec!["Legal".to_string()]);
        let state = AppState::for_tests(
            api.clone(),
            Arc::new(FixedClock(NaiveDate::from_ymd_opt(2024, 6, 12).unwrap())),
            Duration::from_secs(2),
        );

        assert_eq!(state.warm_up_departments().await.names, vec!["Legal"]);

        let listener = tokio::spawn(
            state
                .departments
                .clone()
                .invalidate_on(state.employee_form.subscribe()),
        );
        let mut completions = state.employee_form.subscribe();

        state
            .employee_form
            .edit(|d| {
                d.employee_id = "EMP009".to_string();
                d.full_name = "Ada Lovelace".to_string();
                d.email = "ada@example.com".to_string();
                d.department = "Research".to_string();
            })
            .unwrap();
        *api.departments.lock() = Some(vec!["Legal".to_string(), "Research".to_string()]);
        assert_eq!(state.departments.get_or_fetch(api.as_ref()).await.names, vec!["Legal"]);

        let sender = Arc::clone(&state.api);
        state
            .employee_form
            .submit(move |payload| async move { sender.create_employee(payload).await })
            .await
            .unwrap();

        completions.changed().await.unwrap();
        let departments = state.departments.clone();
        drop(state);
        listener.await.unwrap();

        assert_eq!(
            departments.get_or_fetch(api.as_ref()).await.names,
            vec!["Legal", "Research"]
        );
        assert_eq!(*api.department_calls.lock(), 2);
    }
}
