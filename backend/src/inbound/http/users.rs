//! User CRUD and query handlers.
//!
//! ```text
//! GET    /api/users?page=2&pageSize=10&role=admin&sortBy=lastName
//! GET    /api/users/7
//! POST   /api/users
//! PUT    /api/users/7
//! DELETE /api/users/7
//! ```

use std::str::FromStr;

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::{PageRequest, Paginated};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::query::{SortDirection, SortField, SortSpec, UserFilters};
use crate::domain::{Directory, Error, NewUser, UserId, UserRecord, UserStatus, UserUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Query string accepted by `GET /api/users`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// One-based page number; defaults to 1.
    pub page: Option<u32>,
    /// Records per page; defaults to the directory's configured size.
    pub page_size: Option<u32>,
    /// Case-insensitive substring matched against name or email.
    pub search: Option<String>,
    /// Exact role identifier.
    pub role: Option<String>,
    /// Lifecycle status: active, inactive, or pending.
    pub status: Option<String>,
    /// Exact department name.
    pub department: Option<String>,
    /// Sort field name, e.g. `lastName` or `createdAt`.
    pub sort_by: Option<String>,
    /// `asc` (default) or `desc`.
    pub sort_direction: Option<String>,
}

impl ListUsersQuery {
    fn filters(&self) -> Result<UserFilters, Error> {
        let status = self
            .status
            .as_deref()
            .map(UserStatus::from_str)
            .transpose()?;
        Ok(UserFilters {
            search: self.search.clone(),
            role: self.role.clone(),
            status,
            department: self.department.clone(),
        })
    }

    fn sort(&self) -> Result<Option<SortSpec>, Error> {
        let Some(field) = self.sort_by.as_deref() else {
            return Ok(None);
        };
        let field = SortField::from_str(field)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let direction = match self.sort_direction.as_deref() {
            Some(raw) => SortDirection::from_str(raw)
                .map_err(|err| Error::invalid_request(err.to_string()))?,
            None => SortDirection::default(),
        };
        Ok(Some(SortSpec::new(field, direction)))
    }

    fn page_request(&self, default_page_size: u32) -> Result<PageRequest, Error> {
        PageRequest::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(default_page_size),
        )
        .map_err(|err| Error::invalid_request(err.to_string()))
    }
}

/// Request body for `POST /api/users`.
///
/// Every member is optional in the wire contract; required-field enforcement
/// happens in domain validation so the error message names the missing field
/// instead of failing deserialization.
#[derive(Debug, Default, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: Option<UserStatus>,
    pub department: Option<String>,
    pub location: Option<String>,
}

impl From<CreateUserRequest> for NewUser {
    fn from(value: CreateUserRequest) -> Self {
        Self {
            first_name: value.first_name.unwrap_or_default(),
            last_name: value.last_name.unwrap_or_default(),
            email: value.email.unwrap_or_default(),
            role: value.role.unwrap_or_default(),
            status: value.status,
            department: value.department,
            location: value.location,
        }
    }
}

fn parse_user_id(raw: &str) -> Result<UserId, Error> {
    // An unparseable id can never name a stored record, so it reads as absent
    // rather than malformed.
    UserId::new(raw).map_err(|_| Error::not_found(format!("User with ID {raw} not found.")))
}

/// List users with filtering, sorting, and pagination.
#[utoipa::path(
    get,
    path = "/api/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "One page of matching users", body = Paginated<UserRecord>),
        (status = 400, description = "Invalid query parameter", body = Error),
        (status = 500, description = "Injected failure", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    query: web::Query<ListUsersQuery>,
) -> ApiResult<web::Json<Paginated<UserRecord>>> {
    let default_page_size = state.directory.settings().default_page_size;
    let request = query.page_request(default_page_size)?;
    let filters = query.filters()?;
    let sort = query.sort()?;
    let page = state.directory.list_users(request, &filters, sort).await?;
    Ok(web::Json(page))
}

/// Fetch a single user by id.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "The user", body = UserRecord),
        (status = 404, description = "No such user", body = Error),
        (status = 500, description = "Injected failure", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserRecord>> {
    let id = parse_user_id(&path)?;
    let record = state.directory.get_user(&id).await?;
    Ok(web::Json(record))
}

/// Create a user; the directory assigns id and creation time.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "The stored user", body = UserRecord),
        (status = 400, description = "Validation failure", body = Error),
        (status = 500, description = "Injected failure", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let new_user = NewUser::from(payload.into_inner());
    let record = state.directory.create_user(new_user).await?;
    Ok(HttpResponse::Created().json(record))
}

/// Merge a partial update over an existing user.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "The updated user", body = UserRecord),
        (status = 404, description = "No such user", body = Error),
        (status = 500, description = "Injected failure", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UserUpdate>,
) -> ApiResult<web::Json<UserRecord>> {
    let id = parse_user_id(&path)?;
    let record = state
        .directory
        .update_user(&id, payload.into_inner())
        .await?;
    Ok(web::Json(record))
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Deletion confirmation"),
        (status = 404, description = "No such user", body = Error),
        (status = 500, description = "Injected failure", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path)?;
    state.directory.delete_user(&id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!("User with ID {id} deleted successfully"),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{deterministic_app, failing_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    #[actix_web::test]
    async fn list_defaults_to_first_page_of_ten() {
        let app = actix_test::init_service(deterministic_app()).await;
        let request = actix_test::TestRequest::get().uri("/api/users").to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["data"].as_array().map(Vec::len), Some(10));
        assert_eq!(body["pagination"]["page"], 1);
        assert_eq!(body["pagination"]["totalItems"], 55);
        assert_eq!(body["pagination"]["totalPages"], 6);
    }

    #[actix_web::test]
    async fn list_final_page_holds_the_remainder() {
        let app = actix_test::init_service(deterministic_app()).await;
        let request = actix_test::TestRequest::get()
            .uri("/api/users?page=6")
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["data"].as_array().map(Vec::len), Some(5));
    }

    #[actix_web::test]
    async fn list_sorted_by_last_name_is_ordered() {
        let app = actix_test::init_service(deterministic_app()).await;
        let request = actix_test::TestRequest::get()
            .uri("/api/users?sortBy=lastName&pageSize=55")
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        let body: Value = actix_test::read_body_json(response).await;
        let names: Vec<String> = body["data"]
            .as_array()
            .expect("data array")
            .iter()
            .map(|user| {
                user["lastName"]
                    .as_str()
                    .expect("lastName string")
                    .to_lowercase()
            })
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[rstest]
    #[case("/api/users?sortBy=lastModified")]
    #[case("/api/users?sortBy=lastName&sortDirection=sideways")]
    #[case("/api/users?status=hibernating")]
    #[case("/api/users?page=0")]
    #[actix_web::test]
    async fn list_rejects_malformed_parameters(#[case] uri: &str) {
        let app = actix_test::init_service(deterministic_app()).await;
        let request = actix_test::TestRequest::get().uri(uri).to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "invalid_request");
    }

    #[actix_web::test]
    async fn get_unknown_user_is_not_found() {
        let app = actix_test::init_service(deterministic_app()).await;
        let request = actix_test::TestRequest::get()
            .uri("/api/users/999")
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], "User with ID 999 not found.");
    }

    #[actix_web::test]
    async fn get_non_numeric_id_is_not_found() {
        let app = actix_test::init_service(deterministic_app()).await;
        let request = actix_test::TestRequest::get()
            .uri("/api/users/abc")
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn create_assigns_the_next_id() {
        let app = actix_test::init_service(deterministic_app()).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(CreateUserRequest {
                first_name: Some("Nia".into()),
                last_name: Some("Okafor".into()),
                email: Some("nia.okafor@example.com".into()),
                role: Some("manager".into()),
                status: Some(UserStatus::Active),
                ..CreateUserRequest::default()
            })
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["id"], "56");
        assert_eq!(body["firstName"], "Nia");
        assert_eq!(body["lastLogin"], Value::Null);
    }

    #[rstest]
    #[case(CreateUserRequest::default(), "Field 'firstName' is required")]
    #[case(
        CreateUserRequest {
            first_name: Some("Nia".into()),
            last_name: Some("   ".into()),
            ..CreateUserRequest::default()
        },
        "Field 'lastName' is required"
    )]
    #[case(
        CreateUserRequest {
            first_name: Some("Nia".into()),
            last_name: Some("Okafor".into()),
            email: Some("nia.okafor@example.com".into()),
            role: Some("user".into()),
            ..CreateUserRequest::default()
        },
        "Field 'status' is required"
    )]
    #[case(
        CreateUserRequest {
            first_name: Some("Nia".into()),
            last_name: Some("Okafor".into()),
            email: Some("not-an-email".into()),
            role: Some("user".into()),
            status: Some(UserStatus::Active),
            ..CreateUserRequest::default()
        },
        "Invalid email format"
    )]
    #[actix_web::test]
    async fn create_rejects_invalid_payloads(
        #[case] payload: CreateUserRequest,
        #[case] expected: &str,
    ) {
        let app = actix_test::init_service(deterministic_app()).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(payload)
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["message"], expected);
    }

    #[actix_web::test]
    async fn update_merges_and_returns_the_record() {
        let app = actix_test::init_service(deterministic_app()).await;
        let request = actix_test::TestRequest::put()
            .uri("/api/users/3")
            .set_json(serde_json::json!({ "department": "Platform" }))
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["id"], "3");
        assert_eq!(body["department"], "Platform");
    }

    #[actix_web::test]
    async fn delete_confirms_and_then_reads_as_absent() {
        let app = actix_test::init_service(deterministic_app()).await;
        let delete_req = actix_test::TestRequest::delete()
            .uri("/api/users/5")
            .to_request();

        let delete_res = actix_test::call_service(&app, delete_req).await;
        assert_eq!(delete_res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(delete_res).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "User with ID 5 deleted successfully");

        let get_req = actix_test::TestRequest::get()
            .uri("/api/users/5")
            .to_request();
        let get_res = actix_test::call_service(&app, get_req).await;
        assert_eq!(get_res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn injected_failure_surfaces_as_500_with_stable_shape() {
        let app = actix_test::init_service(failing_app()).await;
        let request = actix_test::TestRequest::get().uri("/api/users").to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "unavailable");
        assert_eq!(body["message"], "Failed to fetch users. Please try again.");
        assert_eq!(body["details"]["code"], "injected_failure");
    }
}
