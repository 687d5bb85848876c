//! Key-value store port and its adapters.
//!
//! The persistence layer only ever talks to a [`KeyValueStore`]: get, set and
//! delete by key. Stores cannot enumerate their keys, so anything that needs to
//! know "what exists" keeps its own manifest under a dedicated key.

mod error;
mod file;
mod memory;
mod traits;

pub use error::{Result, StoreError};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use traits::KeyValueStore;
