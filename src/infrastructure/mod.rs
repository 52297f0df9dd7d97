pub mod file_store;
pub mod logging;
pub mod storage;

pub use file_store::JsonFileStore;
pub use storage::{open_store, KeyValueStore, MemoryStore};
