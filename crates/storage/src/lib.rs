#![forbid(unsafe_code)]

pub mod progress_store;
pub mod repository;
pub mod sqlite;

pub use progress_store::{ProgressStore, StorageKey};
pub use repository::{InMemoryKeyValueStore, KeyValueStore, Storage, StorageError};
