use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use dotenvy::dotenv;

mod api;
mod client;
mod config;
mod console;
mod docs;
mod model;
mod routes;
mod state;
mod utils;

use config::Config;

use crate::client::http::HttpHrmsClient;
use crate::console::clock::LocalClock;
use crate::docs::ApiDoc;
use crate::state::AppState;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "HRMS console is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(hrms_api_url = %config.hrms_api_url, "Server starting...");

    let api = HttpHrmsClient::new(&config.hrms_api_url, config.request_timeout)
        .context("failed to build HRMS API client")?;
    let state = Data::new(AppState::new(Arc::new(api), Arc::new(LocalClock), &config));
    let limiter = routes::build_limiter(config.rate_console_per_min)?;

    let warmup_state = state.clone();
    actix_web::rt::spawn(async move {
        warmup_state.warm_up_departments().await;
    });

    // A new employee may bring a new department with it.
    actix_web::rt::spawn(
        state
            .departments
            .clone()
            .invalidate_on(state.employee_form.subscribe()),
    );

    let server_addr = config.server_addr.clone();
    let api_prefix = config.api_prefix.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard {_:.*} matches the JS/CSS assets
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(state.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, &api_prefix, &limiter))
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
