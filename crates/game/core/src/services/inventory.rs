use crate::config::GameConfig;
use crate::error::{CoreError, Result};
use crate::state::{GameState, ItemId};

/// Inventory bookkeeping with a fixed slot count.
#[derive(Clone, Copy, Debug, Default)]
pub struct InventoryService;

impl InventoryService {
    pub const CAPACITY: usize = GameConfig::MAX_INVENTORY_SLOTS;

    /// Appends `item`; duplicates are allowed (stacks are separate slots).
    pub fn add_item(&self, state: GameState, item: ItemId) -> Result<GameState> {
        if state.inventory.len() >= Self::CAPACITY {
            return Err(CoreError::InventoryFull {
                capacity: Self::CAPACITY,
            });
        }
        let mut inventory = state.inventory.clone();
        inventory.push(item);
        Ok(state.with_inventory(inventory))
    }

    /// Removes the first occurrence of `item`.
    pub fn remove_item(&self, state: GameState, item: &ItemId) -> Result<GameState> {
        let slot = state
            .inventory
            .iter()
            .position(|held| held == item)
            .ok_or_else(|| CoreError::ItemNotFound(item.clone()))?;
        let mut inventory = state.inventory.clone();
        inventory.remove(slot);
        Ok(state.with_inventory(inventory))
    }

    pub fn contains(&self, state: &GameState, item: &ItemId) -> bool {
        state.inventory.contains(item)
    }
}
