use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::state::paged::PagedSlot;
use crate::domain::{Entity, EntityId};

/// Independent [`PagedSlot`]s routed by an owner id.
///
/// Used for followers-of-X, following-of-X and comments-of-post, where the
/// same kind of listing exists once per entity. Slots are created lazily on
/// first access and evicted when the owning view closes, so the map only
/// ever holds slots for views that were actually opened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedSlots<T, Q> {
    slots: HashMap<EntityId, PagedSlot<T, Q>>,
}

impl<T, Q> Default for KeyedSlots<T, Q> {
    fn default() -> Self {
        Self {
            slots: HashMap::new(),
        }
    }
}

impl<T, Q> KeyedSlots<T, Q>
where
    T: Entity + Clone,
    Q: Clone + PartialEq,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: EntityId) -> Option<&PagedSlot<T, Q>> {
        self.slots.get(&key)
    }

    /// Slot for `key`, created empty on first access
    pub fn slot_mut(&mut self, key: EntityId) -> &mut PagedSlot<T, Q> {
        self.slots.entry(key).or_default()
    }

    /// Slot for `key` only if it exists. Response handlers use this so a
    /// late reply never re-materializes an evicted slot.
    pub fn get_mut(&mut self, key: EntityId) -> Option<&mut PagedSlot<T, Q>> {
        self.slots.get_mut(&key)
    }

    /// Run `f` against the slot for `key` only if it exists. Mutation
    /// reconciliation uses this so that patches never materialize slots.
    pub fn patch_existing(&mut self, key: EntityId, f: impl FnOnce(&mut PagedSlot<T, Q>)) {
        if let Some(slot) = self.slots.get_mut(&key) {
            f(slot);
        }
    }

    /// Run `f` against every loaded slot
    pub fn patch_all(&mut self, mut f: impl FnMut(&mut PagedSlot<T, Q>)) {
        for slot in self.slots.values_mut() {
            f(slot);
        }
    }

    /// Drop the slot for `key`; called when its owning view closes
    pub fn evict(&mut self, key: EntityId) {
        self.slots.remove(&key);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
