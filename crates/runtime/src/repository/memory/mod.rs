//! In-memory store implementation for tests and local development.

mod store;

pub use store::InMemoryStore;
