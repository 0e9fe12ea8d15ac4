//! Shared builders for handler tests.

use std::sync::Arc;

use actix_web::{App, web};
use mockable::DefaultClock;

use crate::inbound::http::state::HttpState;
use crate::outbound::memory::{InMemoryDirectory, MockSettings};

fn app_with(
    directory: InMemoryDirectory,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(Arc::new(directory));
    App::new()
        .app_data(web::Data::new(state))
        .service(web::scope("/api").configure(super::configure))
}

/// App over a zero-latency, zero-failure directory with a fixed seed.
pub fn deterministic_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    app_with(InMemoryDirectory::deterministic(11))
}

/// App whose directory fails every operation, without latency.
pub fn failing_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let settings = MockSettings {
        failure_probability: 1.0,
        ..MockSettings::instant()
    };
    app_with(InMemoryDirectory::with_seed(
        settings,
        11,
        Arc::new(DefaultClock),
    ))
}
