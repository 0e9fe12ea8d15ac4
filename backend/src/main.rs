//! Backend entry-point: wires configuration, logging, and the HTTP server.

use mockable::DefaultEnv;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use userdesk::server::{run, server_config_from_env};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = server_config_from_env(&DefaultEnv::default())
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    run(config)?.await
}
