//! Environment-driven server configuration.
//!
//! Centralises the environment parsing so it is validated consistently and
//! can be tested in isolation with a mock environment.

use std::net::SocketAddr;

use mockable::Env;
use tracing::warn;

use crate::outbound::memory::MockSettings;

const BIND_ADDR_ENV: &str = "USERDESK_BIND_ADDR";
const MIN_LATENCY_ENV: &str = "USERDESK_MIN_LATENCY_MS";
const MAX_LATENCY_ENV: &str = "USERDESK_MAX_LATENCY_MS";
const FAILURE_PROBABILITY_ENV: &str = "USERDESK_FAILURE_PROBABILITY";
const DEFAULT_PAGE_SIZE_ENV: &str = "USERDESK_DEFAULT_PAGE_SIZE";
const RNG_SEED_ENV: &str = "USERDESK_RNG_SEED";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Errors raised while validating server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ServerConfigError {
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// The latency bounds are inverted.
    #[error("{MIN_LATENCY_ENV} ({min}) exceeds {MAX_LATENCY_ENV} ({max})")]
    InvertedLatency { min: u64, max: u64 },
    /// The failure probability is outside `[0, 1]`.
    #[error("{FAILURE_PROBABILITY_ENV} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { value: f64 },
}

/// Validated runtime configuration for the HTTP server.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServerConfig {
    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,
    /// Simulation settings handed to the directory.
    pub settings: MockSettings,
    /// Optional fixed RNG seed for a reproducible dataset.
    pub rng_seed: Option<u64>,
}

/// Build server configuration from environment variables.
///
/// Unset variables fall back to defaults; set-but-invalid values are
/// rejected rather than silently ignored.
pub fn server_config_from_env<E: Env>(env: &E) -> Result<ServerConfig, ServerConfigError> {
    let bind_addr = bind_addr_from_env(env)?;
    let mut settings = MockSettings::default();

    if let Some(min) = parse_env::<u64>(env, MIN_LATENCY_ENV, "a millisecond count")? {
        settings.min_latency_ms = min;
    }
    if let Some(max) = parse_env::<u64>(env, MAX_LATENCY_ENV, "a millisecond count")? {
        settings.max_latency_ms = max;
    }
    if settings.min_latency_ms > settings.max_latency_ms {
        return Err(ServerConfigError::InvertedLatency {
            min: settings.min_latency_ms,
            max: settings.max_latency_ms,
        });
    }
    if let Some(p) = parse_env::<f64>(env, FAILURE_PROBABILITY_ENV, "a number in [0, 1]")? {
        if !(0.0..=1.0).contains(&p) {
            return Err(ServerConfigError::ProbabilityOutOfRange { value: p });
        }
        settings.failure_probability = p;
    }
    if let Some(size) = parse_env::<u32>(env, DEFAULT_PAGE_SIZE_ENV, "a positive page size")? {
        if size == 0 {
            return Err(ServerConfigError::InvalidEnv {
                name: DEFAULT_PAGE_SIZE_ENV,
                value: size.to_string(),
                expected: "a positive page size",
            });
        }
        settings.default_page_size = size;
    }
    let rng_seed = parse_env::<u64>(env, RNG_SEED_ENV, "an unsigned integer seed")?;
    if rng_seed.is_some() {
        warn!("fixed RNG seed configured; dataset and faults are reproducible");
    }

    Ok(ServerConfig {
        bind_addr,
        settings,
        rng_seed,
    })
}

fn bind_addr_from_env<E: Env>(env: &E) -> Result<SocketAddr, ServerConfigError> {
    let raw = env
        .string(BIND_ADDR_ENV)
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
    raw.parse()
        .map_err(|_| ServerConfigError::InvalidEnv {
            name: BIND_ADDR_ENV,
            value: raw,
            expected: "host:port",
        })
}

fn parse_env<T: std::str::FromStr>(
    env: &impl Env,
    name: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ServerConfigError> {
    match env.string(name) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ServerConfigError::InvalidEnv {
                name,
                value,
                expected,
            }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::MockEnv;
    use rstest::rstest;

    fn env_with(vars: &'static [(&'static str, &'static str)]) -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string().returning(move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned())
        });
        env
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = server_config_from_env(&env_with(&[])).expect("valid config");
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.settings, MockSettings::default());
        assert_eq!(config.rng_seed, None);
    }

    #[test]
    fn overrides_are_honoured() {
        let env = env_with(&[
            ("USERDESK_BIND_ADDR", "0.0.0.0:9000"),
            ("USERDESK_MIN_LATENCY_MS", "0"),
            ("USERDESK_MAX_LATENCY_MS", "50"),
            ("USERDESK_FAILURE_PROBABILITY", "0.25"),
            ("USERDESK_DEFAULT_PAGE_SIZE", "20"),
            ("USERDESK_RNG_SEED", "42"),
        ]);
        let config = server_config_from_env(&env).expect("valid config");
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.settings.max_latency_ms, 50);
        assert_eq!(config.settings.failure_probability, 0.25);
        assert_eq!(config.settings.default_page_size, 20);
        assert_eq!(config.rng_seed, Some(42));
    }

    #[rstest]
    #[case(&[("USERDESK_BIND_ADDR", "not-an-addr")])]
    #[case(&[("USERDESK_FAILURE_PROBABILITY", "1.5")])]
    #[case(&[("USERDESK_DEFAULT_PAGE_SIZE", "0")])]
    #[case(&[("USERDESK_MIN_LATENCY_MS", "500"), ("USERDESK_MAX_LATENCY_MS", "100")])]
    fn invalid_values_are_rejected(#[case] vars: &'static [(&'static str, &'static str)]) {
        assert!(server_config_from_env(&env_with(vars)).is_err());
    }
}
