//! Errors raised by the stateless gameplay services.

use thiserror::Error;

use crate::state::ItemId;

/// Invalid input handed to one of the gameplay services.
///
/// Services never mutate a snapshot when they return an error, so callers can
/// keep the previous [`GameState`](crate::GameState) as-is.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("amount must not be negative (got {amount})")]
    NegativeAmount { amount: i64 },

    #[error("inventory is full ({capacity} slots)")]
    InventoryFull { capacity: usize },

    #[error("item {0} is not in the inventory")]
    ItemNotFound(ItemId),
}

pub type Result<T> = std::result::Result<T, CoreError>;
