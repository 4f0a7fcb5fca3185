use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde_json::json;

use crate::client::ApiError;
use crate::console::submission::FlowError;

pub mod attendance;
pub mod dashboard;
pub mod employee;

/// Relays a collaborator failure with the upstream status when it has one.
pub(crate) fn upstream_error(err: &ApiError, fallback: &str) -> HttpResponse {
    let status = err
        .status()
        .and_then(|s| StatusCode::from_u16(s).ok())
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or(StatusCode::BAD_GATEWAY);

    HttpResponse::build(status).json(json!({
        "message": err.user_message(fallback)
    }))
}

pub(crate) fn flow_error(err: &FlowError) -> HttpResponse {
    let body = json!({ "message": err.to_string() });
    match err {
        FlowError::Busy | FlowError::ResetPending => HttpResponse::Conflict().json(body),
        FlowError::Invalid(_) => HttpResponse::UnprocessableEntity().json(body),
    }
}
