//! Persistence layer (key-value port).
//!
//! The store persists whole collections under fixed keys, one JSON document
//! per key. Writes are synchronous: a call to [`KeyValueStore::set`] returns
//! only once the value is durable.

pub mod file;
pub mod memory;
pub mod migration;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use migration::{load_state, LoadedState, MigrationReport};

use crate::error::AppError;

/// Storage keys as constants.
pub mod keys {
    pub const EXERCISES: &str = "velovibe_exercises";
    pub const WORKOUTS: &str = "velovibe_workouts";
}

/// Durable string key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. A missing key is `Ok(None)`, not an error.
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Replace a value.
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
}
