//! Domain types and the query pipeline.
//!
//! Purpose: define the user-directory model (records, roles, filters), the
//! pure filter → sort → paginate pipeline, the error envelope adapters map
//! to transports, and the ports the adapters plug into. Everything here is
//! side-effect free; the simulated backend lives in `outbound::memory`.

pub mod error;
pub mod ports;
pub mod query;
pub mod role;
pub mod session;
pub mod user;

#[cfg(test)]
mod query_tests;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ports::Directory;
pub use self::query::{SortDirection, SortField, SortSpec, UserFilters};
pub use self::role::Role;
pub use self::session::{AuthSession, SessionPolicy};
pub use self::user::{NewUser, UserId, UserRecord, UserStatus, UserUpdate, UserValidationError};
