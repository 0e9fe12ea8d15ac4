//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for the
//! mock directory API. The document is exported via
//! `cargo run --bin openapi-dump` for client generators and contract checks.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, Role, UserRecord, UserStatus, UserUpdate};
use crate::inbound::http::auth::{LoginRequest, LoginResponse};
use crate::inbound::http::users::CreateUserRequest;
use crate::outbound::memory::MockSettingsPatch;
use pagination::{Paginated, Pagination};

/// OpenAPI document for the mock user-directory API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Userdesk mock API",
        description = "Simulated user-directory backend with tunable latency and failures.",
        license(name = "ISC")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::roles::list_roles,
        crate::inbound::http::auth::login,
        crate::inbound::http::admin::configure_mock,
        crate::inbound::http::admin::reset_mock,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Role,
        UserRecord,
        UserStatus,
        UserUpdate,
        CreateUserRequest,
        LoginRequest,
        LoginResponse,
        MockSettingsPatch,
        Paginated<UserRecord>,
        Pagination,
    )),
    tags(
        (name = "users", description = "User CRUD and queries"),
        (name = "roles", description = "Role catalogue"),
        (name = "auth", description = "Simulated authentication"),
        (name = "admin", description = "Simulation tuning")
    )
)]
pub struct ApiDoc;
