//! Mock login handler.
//!
//! Authentication is simulated: any non-empty credential pair signs in as the
//! first stored user and receives a constant token. The endpoint still goes
//! through the directory so configured latency and failure apply.

use actix_web::{post, web};
use pagination::PageRequest;
use serde::{Deserialize, Serialize};

use crate::domain::query::UserFilters;
use crate::domain::session::MOCK_TOKEN;
use crate::domain::{Directory, Error, UserRecord};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/auth/login`.
#[derive(Debug, Default, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Successful login payload.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// The signed-in user.
    pub user: UserRecord,
    /// Simulated bearer token; constant by design of the mock.
    pub token: String,
}

/// Sign in with any credentials and receive the first stored user.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 400, description = "Missing credentials", body = Error),
        (status = 401, description = "No account available", body = Error),
        (status = 500, description = "Injected failure", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let blank = |value: &Option<String>| {
        value.as_deref().is_none_or(|v| v.trim().is_empty())
    };
    if blank(&email) || blank(&password) {
        return Err(Error::invalid_request("Email and password are required"));
    }

    let first_user = state
        .directory
        .list_users(
            PageRequest::new(1, 1).map_err(|err| Error::internal(err.to_string()))?,
            &UserFilters::default(),
            None,
        )
        .await?
        .data
        .into_iter()
        .next()
        .ok_or_else(|| Error::unauthorized("Invalid credentials"))?;

    Ok(web::Json(LoginResponse {
        user: first_user,
        token: MOCK_TOKEN.to_owned(),
    }))
}
