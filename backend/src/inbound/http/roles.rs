//! Role catalogue handler.

use actix_web::{get, web};

use crate::domain::{Directory, Error, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// List the static role catalogue.
#[utoipa::path(
    get,
    path = "/api/roles",
    responses(
        (status = 200, description = "All defined roles", body = [Role]),
        (status = 500, description = "Injected failure", body = Error)
    ),
    tags = ["roles"],
    operation_id = "listRoles"
)]
#[get("/roles")]
pub async fn list_roles(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<Role>>> {
    let roles = state.directory.list_roles().await?;
    Ok(web::Json(roles))
}
