//! Client-side state layer driving the directory port.

pub mod state;


pub use state::{DirectoryClient, MutationPhase};
