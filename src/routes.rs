use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use anyhow::{Context, Result};

use crate::api::{attendance, dashboard, employee};

pub type Limiter = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiter allowing `requests_per_min` with the same burst.
pub fn build_limiter(requests_per_min: u32) -> Result<Limiter> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);

    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .context("invalid rate limit configuration")
}

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str, limiter: &Limiter) {
    cfg.service(
        web::scope(api_prefix)
            .wrap(Governor::new(limiter)) // rate limiting
            .configure(console),
    );
}

pub fn console(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/console")
            // /console/dashboard
            .service(web::resource("/dashboard").route(web::get().to(dashboard::get_dashboard)))
            .service(
                web::scope("/attendance")
                    // /attendance?employee=&window=
                    .service(web::resource("").route(web::get().to(attendance::list_attendance)))
                    // /attendance/employee/{employee_id}
                    .service(
                        web::resource("/employee/{employee_id}")
                            .route(web::get().to(attendance::list_employee_attendance)),
                    )
                    // /attendance/form
                    .service(
                        web::resource("/form")
                            .route(web::get().to(attendance::get_attendance_form))
                            .route(web::put().to(attendance::update_attendance_form)),
                    )
                    .service(
                        web::resource("/form/submit")
                            .route(web::post().to(attendance::submit_attendance_form)),
                    ),
            )
            .service(
                web::scope("/employees")
                    // /employees?search=
                    .service(web::resource("").route(web::get().to(employee::list_employees)))
                    .service(
                        web::resource("/departments")
                            .route(web::get().to(employee::list_departments)),
                    )
                    // /employees/form
                    .service(
                        web::resource("/form")
                            .route(web::get().to(employee::get_employee_form))
                            .route(web::put().to(employee::update_employee_form)),
                    )
                    .service(
                        web::resource("/form/submit")
                            .route(web::post().to(employee::submit_employee_form)),
                    )
                    // /employees/{id}, registered last so the fixed paths above win
                    .service(
                        web::resource("/{id}").route(web::delete().to(employee::delete_employee)),
                    ),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limiter_accepts_any_rate() {
        assert!(build_limiter(600).is_ok());
        assert!(build_limiter(0).is_ok());
        assert!(build_limiter(120_000).is_ok());
    }
}
