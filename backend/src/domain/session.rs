//! Client session expiry policy.
//!
//! The dashboard keeps the signed-in user and a last-activity instant on the
//! client; expiry is a pure timestamp comparison against a configured
//! timeout. The clock is injected so tests control "now".

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use super::UserRecord;

/// Placeholder token issued by the mock login endpoint. Nothing verifies it.
pub const MOCK_TOKEN: &str = "mock-jwt-token";

/// Idle timeout before a session expires.
pub const DEFAULT_SESSION_TIMEOUT_MINUTES: i64 = 30;

/// A signed-in user plus activity bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    /// The authenticated user.
    pub user: UserRecord,
    /// Bearer token returned by login; a constant in the mock backend.
    pub token: String,
    /// Instant of the most recent tracked activity.
    pub last_activity: DateTime<Utc>,
}

/// Expiry rules applied to [`AuthSession`] instances.
pub struct SessionPolicy {
    timeout: TimeDelta,
    clock: Arc<dyn Clock>,
}

impl SessionPolicy {
    /// Policy with the default 30-minute idle timeout.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            timeout: TimeDelta::minutes(DEFAULT_SESSION_TIMEOUT_MINUTES),
            clock,
        }
    }

    /// Override the idle timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: TimeDelta) -> Self {
        self.timeout = timeout;
        self
    }

    /// Open a session for `user` stamped at the current instant.
    #[must_use]
    pub fn open(&self, user: UserRecord, token: impl Into<String>) -> AuthSession {
        AuthSession {
            user,
            token: token.into(),
            last_activity: self.clock.utc(),
        }
    }

    /// Whether the session has been idle longer than the timeout.
    #[must_use]
    pub fn is_expired(&self, session: &AuthSession) -> bool {
        self.clock.utc() - session.last_activity > self.timeout
    }

    /// Record activity, pushing expiry out by a full timeout.
    pub fn touch(&self, session: &mut AuthSession) {
        session.last_activity = self.clock.utc();
    }
}
