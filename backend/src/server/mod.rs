//! Server construction and wiring.

mod config;

pub use config::{ServerConfig, ServerConfigError, server_config_from_env};

use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tracing::info;

use crate::inbound::http;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryDirectory;

/// Build the directory the server serves from.
///
/// A configured seed produces the same dataset and fault sequence on every
/// start; without one the dataset differs per run.
#[must_use]
pub fn build_directory(config: &ServerConfig) -> InMemoryDirectory {
    match config.rng_seed {
        Some(seed) => InMemoryDirectory::with_seed(config.settings, seed, Arc::new(DefaultClock)),
        None => InMemoryDirectory::new(config.settings),
    }
}

/// Bind and return the HTTP server; the caller awaits it.
///
/// The directory is shared across workers so mutations and settings patches
/// are visible to every connection.
pub fn run(config: ServerConfig) -> std::io::Result<Server> {
    let state = HttpState::new(Arc::new(build_directory(&config)));
    info!(addr = %config.bind_addr, "starting user-directory mock server");

    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .service(web::scope("/api").configure(http::configure))
    })
    .bind(config.bind_addr)?
    .run();
    Ok(server)
}
