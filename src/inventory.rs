use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::present::Presenter;

// ============================================================================
// Item Payload
// ============================================================================

/// An item as handed out by interactables and locks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemReward {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Opaque sprite handle resolved by the host
    #[serde(default)]
    pub icon: Option<String>,
}

// ============================================================================
// Inventory
// ============================================================================

pub const DEFAULT_CAPACITY: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventorySlot {
    pub item_name: String,
    pub description: String,
    pub icon: Option<String>,
}

impl InventorySlot {
    pub fn new(icon: Option<&str>, item_name: &str, description: &str) -> Self {
        Self {
            item_name: item_name.to_string(),
            description: description.to_string(),
            icon: icon.map(str::to_string),
        }
    }
}

/// Fixed-size slot array. Items are never removed.
#[derive(Debug, Clone, Serialize)]
pub struct Inventory {
    slots: Vec<Option<InventorySlot>>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Put an item in the first empty slot. When every slot is taken the item
    /// is dropped without any signal to the player; the returned index is
    /// informational only.
    pub fn add_item(
        &mut self,
        icon: Option<&str>,
        item_name: &str,
        description: &str,
        presenter: &mut dyn Presenter,
    ) -> Option<usize> {
        let Some(index) = self.slots.iter().position(Option::is_none) else {
            debug!("Inventory full, dropping {}", item_name);
            return None;
        };

        let slot = InventorySlot::new(icon, item_name, description);
        presenter.set_inventory_slot(index, &slot);
        self.slots[index] = Some(slot);
        info!("Added {} to inventory slot {}", item_name, index);
        Some(index)
    }

    pub fn add_reward(&mut self, reward: &ItemReward, presenter: &mut dyn Presenter) -> Option<usize> {
        self.add_item(reward.icon.as_deref(), &reward.name, &reward.description, presenter)
    }

    /// Exact, case-sensitive name match over occupied slots
    pub fn has_item(&self, item_name: &str) -> bool {
        self.slots
            .iter()
            .flatten()
            .any(|slot| slot.item_name == item_name)
    }

    pub fn show_item_description(
        &self,
        item_name: &str,
        description: &str,
        icon: Option<&str>,
        presenter: &mut dyn Presenter,
    ) {
        presenter.show_item_description(item_name, description, icon);
    }

    pub fn hide_item_description(&self, presenter: &mut dyn Presenter) {
        presenter.hide_item_description();
    }

    /// A click on a slot: show its item, or just note the empty click
    pub fn inspect_slot(&self, index: usize, presenter: &mut dyn Presenter) {
        match self.slots.get(index) {
            Some(Some(slot)) => {
                debug!("Slot clicked: {}", slot.item_name);
                self.show_item_description(&slot.item_name, &slot.description, slot.icon.as_deref(), presenter);
            }
            Some(None) => debug!("Clicked empty slot {}", index),
            None => debug!("Clicked slot {} outside inventory", index),
        }
    }

    pub fn slot(&self, index: usize) -> Option<&InventorySlot> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn item_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}
