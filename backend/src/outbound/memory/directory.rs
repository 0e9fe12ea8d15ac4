//! In-memory directory adapter implementing the [`Directory`] port.
//!
//! Stands in for a real backend: every operation passes the fault injector
//! before touching the record store, so an injected failure leaves the store
//! unmodified. The adapter also exposes the administrative surface — settings
//! patching and dataset reset — that the port deliberately omits.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use pagination::{PageRequest, Paginated};
use tracing::debug;

use crate::domain::query::{self, SortSpec, UserFilters};
use crate::domain::{Directory, Error, NewUser, Role, UserId, UserRecord, UserUpdate, role};

use super::fault::{FaultInjector, MockSettings, MockSettingsPatch};
use super::store::{RecordStore, SEED_USER_COUNT};

/// The simulated user-directory backend.
pub struct InMemoryDirectory {
    store: RwLock<RecordStore>,
    fault: FaultInjector,
    baseline: MockSettings,
    clock: Arc<dyn Clock>,
}

impl InMemoryDirectory {
    /// Directory with the given settings, seeded from entropy.
    #[must_use]
    pub fn new(settings: MockSettings) -> Self {
        Self::build(FaultInjector::new(settings), Arc::new(DefaultClock))
    }

    /// Directory with a fixed RNG seed and injected clock, for
    /// deterministic tests.
    #[must_use]
    pub fn with_seed(settings: MockSettings, seed: u64, clock: Arc<dyn Clock>) -> Self {
        Self::build(FaultInjector::with_seed(settings, seed), clock)
    }

    /// Deterministic directory with zero latency and zero failures.
    #[must_use]
    pub fn deterministic(seed: u64) -> Self {
        Self::with_seed(MockSettings::instant(), seed, Arc::new(DefaultClock))
    }

    fn build(fault: FaultInjector, clock: Arc<dyn Clock>) -> Self {
        let now = clock.utc();
        let store = fault.with_rng(|rng| RecordStore::seeded(SEED_USER_COUNT, rng, now));
        let baseline = fault.settings();
        Self {
            store: RwLock::new(store),
            fault,
            baseline,
            clock,
        }
    }

    /// Current mock settings snapshot.
    #[must_use]
    pub fn settings(&self) -> MockSettings {
        self.fault.settings()
    }

    /// Overlay a partial settings update.
    pub fn configure(&self, patch: &MockSettingsPatch) {
        debug!(?patch, "mock settings updated");
        self.fault.configure(patch);
    }

    /// Roll the settings back to what the directory was constructed with.
    pub fn restore_settings(&self) {
        self.fault.restore(self.baseline);
    }

    /// Discard all mutations and regenerate the synthetic dataset.
    pub fn reset(&self) {
        let now = self.clock.utc();
        let mut store = self.write_store();
        self.fault
            .with_rng(|rng| store.reset(SEED_USER_COUNT, rng, now));
        debug!(count = SEED_USER_COUNT, "mock dataset reset");
    }

    /// Number of records currently held; test and diagnostics hook.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.read_store().len()
    }

    fn read_store(&self) -> std::sync::RwLockReadGuard<'_, RecordStore> {
        self.store
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_store(&self) -> std::sync::RwLockWriteGuard<'_, RecordStore> {
        self.store
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn not_found(id: &UserId) -> Error {
        Error::not_found(format!("User with ID {id} not found."))
    }
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn list_users(
        &self,
        page: PageRequest,
        filters: &UserFilters,
        sort: Option<SortSpec>,
    ) -> Result<Paginated<UserRecord>, Error> {
        self.fault.gate("fetch users").await?;
        let snapshot = self.read_store().snapshot();
        Ok(query::query(&snapshot, filters, sort, page))
    }

    async fn get_user(&self, id: &UserId) -> Result<UserRecord, Error> {
        self.fault.gate(&format!("fetch user with ID {id}")).await?;
        self.read_store()
            .get(id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<UserRecord, Error> {
        self.fault.gate("create user").await?;
        new_user.validate()?;

        let mut store = self.write_store();
        let record = new_user.into_record(store.next_id(), self.clock.utc());
        store.push(record.clone());
        debug!(id = %record.id, "user created");
        Ok(record)
    }

    async fn update_user(&self, id: &UserId, update: UserUpdate) -> Result<UserRecord, Error> {
        self.fault
            .gate(&format!("update user with ID {id}"))
            .await?;

        let mut store = self.write_store();
        let record = store.get_mut(id).ok_or_else(|| Self::not_found(id))?;
        update.apply(record);
        debug!(id = %id, "user updated");
        Ok(record.clone())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), Error> {
        self.fault
            .gate(&format!("delete user with ID {id}"))
            .await?;

        self.write_store()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id))?;
        debug!(id = %id, "user deleted");
        Ok(())
    }

    async fn list_roles(&self) -> Result<Vec<Role>, Error> {
        self.fault.gate("fetch roles").await?;
        Ok(role::catalogue().to_vec())
    }
}
