//! Driven adapters behind the domain ports.

pub mod memory;
