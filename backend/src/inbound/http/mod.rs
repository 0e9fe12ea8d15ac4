//! HTTP inbound adapter exposing REST endpoints.

pub mod admin;
pub mod auth;
pub mod error;
pub mod roles;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;

use actix_web::web;

/// Register every endpoint; callers mount this under the `/api` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .service(users::list_users)
        .service(users::get_user)
        .service(users::create_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(roles::list_roles)
        .service(auth::login)
        .service(admin::configure_mock)
        .service(admin::reset_mock);
}
