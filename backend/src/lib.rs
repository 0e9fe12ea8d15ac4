//! Simulated user-directory backend.
//!
//! An in-memory stand-in for a real user-management service: a synthetic
//! dataset behind a filter/sort/paginate query pipeline, a fault injector
//! adding configurable latency and failures, a REST surface mirroring the
//! service it mocks, and an optimistic client cache for driving UIs against
//! it.

pub mod client;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
