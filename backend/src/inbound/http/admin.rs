//! Simulation tuning endpoints.
//!
//! These bypass the fault injector on purpose: an operator raising the
//! failure probability to 1.0 must still be able to lower it again.

use actix_web::{HttpResponse, post, web};
use serde_json::json;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::MockSettingsPatch;

/// Patch latency, failure probability, or page-size defaults.
#[utoipa::path(
    post,
    path = "/api/mock-config",
    request_body = MockSettingsPatch,
    responses(
        (status = 200, description = "Settings updated"),
        (status = 400, description = "Malformed patch", body = Error)
    ),
    tags = ["admin"],
    operation_id = "configureMock"
)]
#[post("/mock-config")]
pub async fn configure_mock(
    state: web::Data<HttpState>,
    payload: web::Json<MockSettingsPatch>,
) -> ApiResult<HttpResponse> {
    state.directory.configure(&payload.into_inner());
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

/// Regenerate the dataset and restore default settings.
#[utoipa::path(
    post,
    path = "/api/mock-reset",
    responses((status = 200, description = "Simulation reset")),
    tags = ["admin"],
    operation_id = "resetMock"
)]
#[post("/mock-reset")]
pub async fn reset_mock(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    state.directory.reset();
    state.directory.restore_settings();
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
