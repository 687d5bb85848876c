//! File-based store implementation.

mod store;

pub use store::FileStore;
