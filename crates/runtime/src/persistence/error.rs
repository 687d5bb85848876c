//! Errors surfaced by the save/load lifecycle.

use thiserror::Error;

use crate::repository::StoreError;

pub type Result<T> = std::result::Result<T, PersistenceError>;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("no active game state to save")]
    NoActiveState,

    #[error("save {id} not found")]
    SaveNotFound { id: String },

    #[error("store unavailable")]
    StoreUnavailable(#[from] StoreError),

    #[error("serialization failure: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PersistenceError {
    fn from(error: serde_json::Error) -> Self {
        PersistenceError::Serialization(error.to_string())
    }
}
