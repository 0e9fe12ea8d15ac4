//! The in-memory mock backend: record store, fault injector, and the
//! directory adapter combining them.

pub mod directory;
pub mod fault;
pub mod store;


pub use self::directory::InMemoryDirectory;
pub use self::fault::{FaultInjector, MockSettings, MockSettingsPatch};
pub use self::store::{RecordStore, SEED_USER_COUNT};
