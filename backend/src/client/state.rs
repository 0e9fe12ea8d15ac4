//! Optimistic client cache over the directory port.
//!
//! The client holds the last-fetched page plus its filter, sort, and
//! pagination state. Mutations apply speculatively to the cached page before
//! the directory call resolves, then reconcile with the authoritative
//! response or roll back by refetching. The invariant is that every failure
//! path ends in a refetch: the cache may be briefly optimistic but never
//! durably diverges from the directory.
//!
//! Two mutations issued back-to-back before either resolves can interleave
//! their directory calls in any completion order; there is no per-record
//! queue. Callers wanting ordering must await each mutation in turn.

use std::sync::Arc;

use mockable::Clock;
use pagination::{PageRequest, Pagination};
use tracing::warn;

use crate::domain::query::{SortDirection, SortField, SortSpec, UserFilters};
use crate::domain::{Directory, Error, NewUser, Role, UserId, UserRecord, UserUpdate};

/// Sentinel id carried by a speculative create before the directory assigns
/// a real one. Real ids start at 1, so 0 never collides.
fn provisional_id() -> UserId {
    UserId::from_number(0)
}

/// Outcome of the most recent mutating call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MutationPhase {
    /// No mutation has been issued yet.
    #[default]
    Idle,
    /// A speculative change is applied locally; the directory call is in
    /// flight.
    Pending,
    /// The directory confirmed the change and the cache holds the
    /// authoritative record.
    Committed,
    /// The directory rejected the change and the cache was refetched.
    RolledBack,
}

/// Cached page of the directory plus optimistic mutation handling.
pub struct DirectoryClient<G> {
    gateway: Arc<G>,
    clock: Arc<dyn Clock>,
    users: Vec<UserRecord>,
    current_user: Option<UserRecord>,
    pagination: Pagination,
    filters: UserFilters,
    sort: Option<SortSpec>,
    last_error: Option<String>,
    mutation: MutationPhase,
}

impl<G: Directory> DirectoryClient<G> {
    /// Client with an empty cache positioned on page 1.
    #[must_use]
    pub fn new(gateway: Arc<G>, clock: Arc<dyn Clock>, page_size: u32) -> Self {
        Self {
            gateway,
            clock,
            users: Vec::new(),
            current_user: None,
            pagination: Pagination {
                page: 1,
                page_size,
                total_items: 0,
                total_pages: 0,
            },
            filters: UserFilters::default(),
            sort: None,
            last_error: None,
            mutation: MutationPhase::Idle,
        }
    }

    /// The cached page of records.
    #[must_use]
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    /// The record most recently fetched, created, or updated.
    #[must_use]
    pub fn current_user(&self) -> Option<&UserRecord> {
        self.current_user.as_ref()
    }

    /// Pagination state of the cached page.
    #[must_use]
    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Filters applied to the cached page.
    #[must_use]
    pub fn filters(&self) -> &UserFilters {
        &self.filters
    }

    /// Human-readable message of the most recent failure, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Outcome of the most recent mutating call.
    #[must_use]
    pub fn mutation_phase(&self) -> MutationPhase {
        self.mutation
    }

    fn page_request(&self) -> Result<PageRequest, Error> {
        PageRequest::new(self.pagination.page, self.pagination.page_size)
            .map_err(|err| Error::invalid_request(err.to_string()))
    }

    fn recompute_total_pages(&mut self) {
        self.pagination.total_pages = self
            .pagination
            .total_items
            .div_ceil(u64::from(self.pagination.page_size));
    }

    /// Fetch the authoritative page for the current coordinates.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        self.last_error = None;
        self.refetch_list().await
    }

    /// Refetch without clearing a stored mutation error; rollback paths use
    /// this so the failure that triggered them stays visible.
    async fn refetch_list(&mut self) -> Result<(), Error> {
        let request = self.page_request()?;
        let outcome = self
            .gateway
            .list_users(request, &self.filters, self.sort)
            .await;
        match outcome {
            Ok(result) => {
                self.users = result.data;
                self.pagination = result.pagination;
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.message().to_owned());
                Err(err)
            }
        }
    }

    /// Fetch a single record into `current_user`.
    pub async fn fetch_user(&mut self, id: &UserId) -> Result<UserRecord, Error> {
        self.last_error = None;
        let outcome = self.gateway.get_user(id).await;
        match outcome {
            Ok(record) => {
                self.current_user = Some(record.clone());
                Ok(record)
            }
            Err(err) => {
                self.last_error = Some(err.message().to_owned());
                Err(err)
            }
        }
    }

    /// Fetch the role catalogue; no caching, roles are static.
    pub async fn fetch_roles(&mut self) -> Result<Vec<Role>, Error> {
        self.last_error = None;
        let outcome = self.gateway.list_roles().await;
        if let Err(err) = &outcome {
            self.last_error = Some(err.message().to_owned());
        }
        outcome
    }

    /// Create a record, optimistically inserting it at the head of page 1.
    pub async fn create_user(&mut self, new_user: NewUser) -> Result<UserRecord, Error> {
        self.last_error = None;
        self.mutation = MutationPhase::Pending;

        let provisional = new_user
            .clone()
            .into_record(provisional_id(), self.clock.utc());
        let speculated = self.pagination.page == 1;
        if speculated {
            self.users.insert(0, provisional);
            self.users.truncate(self.pagination.page_size as usize);
        }
        self.pagination.total_items += 1;
        self.recompute_total_pages();

        let outcome = self.gateway.create_user(new_user).await;
        match outcome {
            Ok(created) => {
                if speculated {
                    if let Some(slot) = self
                        .users
                        .iter_mut()
                        .find(|record| record.id == provisional_id())
                    {
                        *slot = created.clone();
                    }
                }
                self.current_user = Some(created.clone());
                self.mutation = MutationPhase::Committed;
                Ok(created)
            }
            Err(err) => {
                self.roll_back(&err).await;
                Err(err)
            }
        }
    }

    /// Update a record, optimistically merging the patch into the cache.
    pub async fn update_user(
        &mut self,
        id: &UserId,
        update: UserUpdate,
    ) -> Result<UserRecord, Error> {
        self.last_error = None;
        self.mutation = MutationPhase::Pending;

        if let Some(slot) = self.users.iter_mut().find(|record| &record.id == id) {
            update.apply(slot);
        }
        if let Some(current) = self.current_user.as_mut().filter(|c| &c.id == id) {
            update.apply(current);
        }

        let outcome = self.gateway.update_user(id, update).await;
        match outcome {
            Ok(updated) => {
                if let Some(slot) = self.users.iter_mut().find(|record| &record.id == id) {
                    *slot = updated.clone();
                }
                if self.current_user.as_ref().is_some_and(|c| &c.id == id) {
                    self.current_user = Some(updated.clone());
                }
                self.mutation = MutationPhase::Committed;
                Ok(updated)
            }
            Err(err) => {
                self.roll_back(&err).await;
                if self.current_user.as_ref().is_some_and(|c| &c.id == id) {
                    let refetched = self.gateway.get_user(id).await;
                    match refetched {
                        Ok(record) => self.current_user = Some(record),
                        Err(fetch_err) => {
                            warn!(error = %fetch_err, "rollback single-record refetch failed");
                        }
                    }
                }
                Err(err)
            }
        }
    }

    /// Delete a record, optimistically splicing it out of the cache.
    pub async fn delete_user(&mut self, id: &UserId) -> Result<(), Error> {
        self.last_error = None;
        self.mutation = MutationPhase::Pending;

        self.users.retain(|record| &record.id != id);
        if self.current_user.as_ref().is_some_and(|c| &c.id == id) {
            self.current_user = None;
        }
        self.pagination.total_items = self.pagination.total_items.saturating_sub(1);
        self.recompute_total_pages();

        let outcome = self.gateway.delete_user(id).await;
        match outcome {
            Ok(()) => {
                self.mutation = MutationPhase::Committed;
                Ok(())
            }
            Err(err) => {
                self.roll_back(&err).await;
                Err(err)
            }
        }
    }

    /// Record the failure and restore the cache from the directory.
    ///
    /// A refetch that itself fails is logged and swallowed; the original
    /// mutation error is the one surfaced to the caller.
    async fn roll_back(&mut self, err: &Error) {
        self.last_error = Some(err.message().to_owned());
        let refetched = self.refetch_list().await;
        if let Err(refetch_err) = refetched {
            warn!(error = %refetch_err, "rollback refetch failed");
            self.last_error = Some(err.message().to_owned());
        }
        self.mutation = MutationPhase::RolledBack;
    }

    /// Move to `page` and refetch.
    ///
    /// An invalid page number is rejected before the cached coordinates
    /// change, so a later [`refresh`](Self::refresh) still targets the page
    /// the client was on.
    pub async fn go_to_page(&mut self, page: u32) -> Result<(), Error> {
        PageRequest::new(page, self.pagination.page_size)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.pagination.page = page;
        self.refresh().await
    }

    /// Advance one page if one exists.
    pub async fn next_page(&mut self) -> Result<(), Error> {
        if self.pagination.has_next_page() {
            return self.go_to_page(self.pagination.page + 1).await;
        }
        Ok(())
    }

    /// Step back one page if one exists.
    pub async fn previous_page(&mut self) -> Result<(), Error> {
        if self.pagination.has_previous_page() {
            return self.go_to_page(self.pagination.page - 1).await;
        }
        Ok(())
    }

    /// Replace the filters, rewind to page 1, and refetch.
    pub async fn apply_filters(&mut self, filters: UserFilters) -> Result<(), Error> {
        self.filters = filters;
        self.pagination.page = 1;
        self.refresh().await
    }

    /// Apply a sort order and refetch.
    pub async fn apply_sort(
        &mut self,
        field: SortField,
        direction: SortDirection,
    ) -> Result<(), Error> {
        self.sort = Some(SortSpec::new(field, direction));
        self.refresh().await
    }

    /// Drop filters and sorting, rewind to page 1, and refetch.
    pub async fn reset_filters(&mut self) -> Result<(), Error> {
        self.filters = UserFilters::default();
        self.sort = None;
        self.pagination.page = 1;
        self.refresh().await
    }
}
