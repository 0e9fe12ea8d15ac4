//! Domain ports defining the edges of the hexagon.
//!
//! The directory port is how driving code — HTTP handlers and the optimistic
//! client cache — reaches the user directory without naming the in-memory
//! adapter. Tests substitute a mock for the whole backend.

use async_trait::async_trait;
use pagination::{PageRequest, Paginated};

use super::query::{SortSpec, UserFilters};
use super::{Error, NewUser, Role, UserId, UserRecord, UserUpdate};

/// CRUD and query surface of the user directory.
///
/// Every method is a suspension point: the in-memory adapter sleeps for its
/// simulated latency and may fail with an injected error before touching the
/// store. No method retries internally.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Directory: Send + Sync {
    /// Run the query pipeline over a snapshot of the store.
    async fn list_users(
        &self,
        page: PageRequest,
        filters: &UserFilters,
        sort: Option<SortSpec>,
    ) -> Result<Paginated<UserRecord>, Error>;

    /// Fetch a single record; `NotFound` if absent.
    async fn get_user(&self, id: &UserId) -> Result<UserRecord, Error>;

    /// Validate and append a record, assigning id and creation timestamp.
    async fn create_user(&self, new_user: NewUser) -> Result<UserRecord, Error>;

    /// Merge a partial update over an existing record; `NotFound` if absent.
    async fn update_user(&self, id: &UserId, update: UserUpdate) -> Result<UserRecord, Error>;

    /// Remove a record; `NotFound` if absent.
    async fn delete_user(&self, id: &UserId) -> Result<(), Error>;

    /// The static role catalogue, still subject to fault injection.
    async fn list_roles(&self) -> Result<Vec<Role>, Error>;
}
