use actix_web::{HttpResponse, Responder, web};
use tracing::{debug, error, instrument, warn};

use crate::api::upstream_error;
use crate::console::filter::{FilterCriteria, filter_attendance};
use crate::console::summary::{DashboardStats, summarize};
use crate::console::window::{DateWindow, DateWindowKind};
use crate::state::AppState;

/// Today's headcount and attendance tally
#[utoipa::path(
    get,
    path = "/api/console/dashboard",
    responses(
        (status = 200, description = "Dashboard statistics for today", body = DashboardStats),
        (status = 502, description = "HRMS API unavailable", body = Object, example = json!({
            "message": "Failed to load dashboard"
        }))
    ),
    tag = "Dashboard"
)]
#[instrument(name = "console_dashboard", skip(state))]
pub async fn get_dashboard(state: web::Data<AppState>) -> impl Responder {
    let today = state.clock.today();

    let (employees, records) = match futures::try_join!(
        state.api.list_employees(),
        state.api.list_attendance(Some(today))
    ) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!(error = %e, "Failed to load dashboard");
            return upstream_error(&e, "Failed to load dashboard");
        }
    };

    // The server filters by date already; records outside today are dropped.
    let window = DateWindow::resolve(Some(DateWindowKind::Today), today);
    let todays = filter_attendance(&records, &FilterCriteria::new("", window));
    if todays.len() != records.len() {
        warn!(
            requested = %today,
            returned = records.len(),
            kept = todays.len(),
            "HRMS API returned attendance outside the requested day"
        );
    }

    let stats = DashboardStats::new(today, employees.len(), summarize(todays));
    debug!(?stats, "Dashboard computed");

    HttpResponse::Ok().json(stats)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use actix_web::{App, test};
    use chrono::NaiveDate;
    use serde_json::Value;

    use super::*;
    use crate::client::stub::{StubApi, employee, record};
    use crate::console::clock::FixedClock;
    use crate::routes;

    #[actix_web::test]
    async fn counts_only_todays_records() {
        let api = Arc::new(StubApi::with_records(vec![
            record(1, "John", "2024-06-12", "Present"),
            record(2, "Jane", "2024-06-12T17:30:00", "Absent"),
            record(3, "Sam", "2024-06-12", "Late"),
            record(4, "John", "2024-06-11", "Present"),
        ]));
        *api.employees.lock() = vec![
            employee(1, "EMP001", "John Doe", "john@example.com", "Engineering"),
            employee(2, "EMP002", "Jane Roe", "jane@example.com", "Finance"),
        ];
        let today = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        let data = web::Data::new(AppState::for_tests(
            api.clone(),
            Arc::new(FixedClock(today)),
            Duration::from_millis(100),
        ));

        let app = test::init_service(App::new().app_data(data).configure(routes::console)).await;
        let req = test::TestRequest::get().uri("/console/dashboard").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["date"], "2024-06-12");
        assert_eq!(body["total_employees"], 2);
        assert_eq!(body["today_records"], 3);
        assert_eq!(body["present_today"], 1);
        assert_eq!(body["absent_today"], 1);
        assert_eq!(body["unrecognized_today"], 1);
        assert_eq!(*api.attendance_dates_requested.lock(), vec![Some(today)]);
    }
}
