//! Shopping list backed by the key-value store

use std::sync::{Arc, Mutex};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use super::storage::{load_records, save_records, KeyValueStore};
use crate::{
    state::{ObserverRegistry, SubscriptionId},
    utils::lock_or_recover,
};

/// Storage namespace of the shopping list
pub const GROCERY_STORAGE_KEY: &str = "groceryListItems";

/// One entry on the shopping list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroceryItem {
    pub id: String,
    pub item: String,
    pub quantity: String,
    /// Already in the cart
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrocerySnapshot {
    pub items: Vec<GroceryItem>,
    pub unchecked_count: usize,
    pub total_count: usize,
}

/// Shopping list tool
pub struct GroceryList {
    items: Mutex<Vec<GroceryItem>>,
    store: Arc<dyn KeyValueStore>,
    observers: ObserverRegistry<GrocerySnapshot>,
}

impl GroceryList {
    /// Load the stored items. Unreadable storage starts an empty list.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let items = load_records(store.as_ref(), GROCERY_STORAGE_KEY).unwrap_or_else(|e| {
            error!("Failed to load shopping list: {:#}", e);
            Vec::new()
        });
        info!("Loaded {} shopping list items", items.len());

        Self {
            items: Mutex::new(items),
            store,
            observers: ObserverRegistry::new(),
        }
    }

    pub fn snapshot(&self) -> GrocerySnapshot {
        let items = lock_or_recover(&self.items);
        GrocerySnapshot {
            items: items.clone(),
            unchecked_count: items.iter().filter(|item| !item.checked).count(),
            total_count: items.len(),
        }
    }

    /// Register an observer and call it with the current snapshot
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&GrocerySnapshot) + Send + Sync + 'static,
    {
        let snapshot = self.snapshot();
        self.observers.subscribe_with(observer, &snapshot)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn publish(&self) {
        let snapshot = self.snapshot();
        self.observers.notify(&snapshot);
    }

    /// Add an unchecked item. Ignored unless both fields have content.
    pub fn add_item(&self, item: &str, quantity: &str) {
        if item.trim().is_empty() || quantity.trim().is_empty() {
            return;
        }

        self.mutate(|items| {
            items.push(GroceryItem {
                id: Uuid::new_v4().to_string(),
                item: item.to_string(),
                quantity: quantity.to_string(),
                checked: false,
            });
        });
    }

    pub fn toggle_item(&self, id: &str) {
        self.mutate(|items| {
            if let Some(item) = items.iter_mut().find(|item| item.id == id) {
                item.checked = !item.checked;
            }
        });
    }

    pub fn remove_item(&self, id: &str) {
        self.mutate(|items| items.retain(|item| item.id != id));
    }

    pub fn clear_checked(&self) {
        self.mutate(|items| items.retain(|item| !item.checked));
    }

    fn mutate<F>(&self, change: F)
    where
        F: FnOnce(&mut Vec<GroceryItem>),
    {
        {
            let mut items = lock_or_recover(&self.items);
            change(&mut items);
            if let Err(e) = save_records(self.store.as_ref(), GROCERY_STORAGE_KEY, items.as_slice()) {
                error!("Failed to save shopping list: {:#}", e);
            }
        }
        self.publish();
    }
}
