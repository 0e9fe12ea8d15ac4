//! Simulated latency and failure injection.
//!
//! Settings are injected at construction rather than living in process-wide
//! state, and the RNG is seedable, so tests can force either path
//! deterministically: probability 0 never fails, probability 1 always fails,
//! and a zero latency range skips the sleep entirely.

use std::sync::{Mutex, RwLock};
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;

/// Runtime-adjustable knobs of the simulated backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MockSettings {
    /// Lower latency bound in milliseconds.
    pub min_latency_ms: u64,
    /// Upper latency bound in milliseconds.
    pub max_latency_ms: u64,
    /// Probability in `[0, 1]` that an operation fails before running.
    pub failure_probability: f64,
    /// Page size applied when a list request does not specify one.
    pub default_page_size: u32,
}

impl Default for MockSettings {
    fn default() -> Self {
        Self {
            min_latency_ms: 300,
            max_latency_ms: 800,
            failure_probability: 0.05,
            default_page_size: pagination::DEFAULT_PAGE_SIZE,
        }
    }
}

impl MockSettings {
    /// Settings with no latency and no failures, for tests and tooling.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            min_latency_ms: 0,
            max_latency_ms: 0,
            failure_probability: 0.0,
            ..Self::default()
        }
    }

    /// Overlay the present fields of `patch`.
    pub fn apply(&mut self, patch: &MockSettingsPatch) {
        if let Some(min_latency_ms) = patch.min_latency_ms {
            self.min_latency_ms = min_latency_ms;
        }
        if let Some(max_latency_ms) = patch.max_latency_ms {
            self.max_latency_ms = max_latency_ms;
        }
        if let Some(failure_probability) = patch.failure_probability {
            self.failure_probability = failure_probability;
        }
        if let Some(default_page_size) = patch.default_page_size {
            self.default_page_size = default_page_size;
        }
    }
}

/// Partial settings update; absent fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MockSettingsPatch {
    /// Replacement lower latency bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_latency_ms: Option<u64>,
    /// Replacement upper latency bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_latency_ms: Option<u64>,
    /// Replacement failure probability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_probability: Option<f64>,
    /// Replacement default page size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_page_size: Option<u32>,
}

/// Gate every directory operation behind a random delay and failure roll.
pub struct FaultInjector {
    settings: RwLock<MockSettings>,
    rng: Mutex<SmallRng>,
}

impl FaultInjector {
    /// Injector with an entropy-seeded RNG.
    #[must_use]
    pub fn new(settings: MockSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
            rng: Mutex::new(SmallRng::from_entropy()),
        }
    }

    /// Injector with a fixed RNG seed for reproducible behaviour.
    #[must_use]
    pub fn with_seed(settings: MockSettings, seed: u64) -> Self {
        Self {
            settings: RwLock::new(settings),
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    /// Current settings snapshot.
    #[must_use]
    pub fn settings(&self) -> MockSettings {
        *self.settings.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Replace the settings wholesale.
    pub fn restore(&self, settings: MockSettings) {
        *self
            .settings
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = settings;
    }

    /// Overlay a partial update onto the current settings.
    pub fn configure(&self, patch: &MockSettingsPatch) {
        self.settings
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .apply(patch);
    }

    /// Sleep the simulated latency, then roll for failure.
    ///
    /// On a failed roll the returned error names `operation` and the
    /// underlying work must not run. Locks are released before suspending.
    pub async fn gate(&self, operation: &str) -> Result<(), Error> {
        let (delay_ms, failed) = self.roll();
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
        if failed {
            return Err(Error::injected(operation));
        }
        Ok(())
    }

    fn roll(&self) -> (u64, bool) {
        let settings = self.settings();
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let delay_ms = if settings.max_latency_ms > settings.min_latency_ms {
            rng.gen_range(settings.min_latency_ms..=settings.max_latency_ms)
        } else {
            settings.min_latency_ms
        };
        let failed = rng.gen_range(0.0..1.0) < settings.failure_probability;
        (delay_ms, failed)
    }

    /// Borrow the RNG for callers that need random data alongside the gate,
    /// such as the synthetic dataset generator.
    pub(crate) fn with_rng<T>(&self, f: impl FnOnce(&mut SmallRng) -> T) -> T {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut rng)
    }
}
