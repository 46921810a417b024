//! Repository Layer
//!
//! Key-value store abstraction and its SQLite and in-memory implementations.

mod traits;
mod db;
mod sqlite_store;
mod memory_store;


pub use traits::{keys, load_json, save_json, KeyValueStore, StoreScope};
pub use db::{init_db, DbState};
pub use sqlite_store::SqliteStore;
pub use memory_store::MemoryStore;
