//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data`. The concrete in-memory
//! adapter is held rather than the bare directory port because the admin
//! endpoints tune and reset the simulation, which only that adapter exposes.

use std::sync::Arc;

use crate::outbound::memory::InMemoryDirectory;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// The simulated user directory backing every endpoint.
    pub directory: Arc<InMemoryDirectory>,
}

impl HttpState {
    /// Wrap a directory for injection into the Actix app.
    #[must_use]
    pub fn new(directory: Arc<InMemoryDirectory>) -> Self {
        Self { directory }
    }
}
