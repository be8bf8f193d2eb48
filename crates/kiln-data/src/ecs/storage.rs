// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::EntityId;

/// Densely packed component values indexed by entity slot.
#[derive(Debug, Clone)]
pub struct SparseSet<T> {
    sparse: Vec<Option<usize>>,
    dense: Vec<T>,
    owners: Vec<EntityId>,
}

impl<T> Default for SparseSet<T> {
    fn default() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            owners: Vec::new(),
        }
    }
}

impl<T> SparseSet<T> {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, entity: EntityId) -> Option<usize> {
        let slot = (*self.sparse.get(entity.index as usize)?)?;
        (self.owners[slot] == entity).then_some(slot)
    }

    /// Stores `value` for `entity`, returning the value it replaces.
    pub fn insert(&mut self, entity: EntityId, value: T) -> Option<T> {
        let index = entity.index as usize;
        if index >= self.sparse.len() {
            self.sparse.resize(index + 1, None);
        }

        if let Some(slot) = self.sparse[index] {
            if self.owners[slot] == entity {
                return Some(std::mem::replace(&mut self.dense[slot], value));
            }
            // A stale generation still occupies the slot.
            self.remove_slot(slot);
        }

        self.sparse[index] = Some(self.dense.len());
        self.dense.push(value);
        self.owners.push(entity);
        None
    }

    /// Removes and returns the value of `entity`.
    pub fn remove(&mut self, entity: EntityId) -> Option<T> {
        let slot = self.slot(entity)?;
        Some(self.remove_slot(slot))
    }

    fn remove_slot(&mut self, slot: usize) -> T {
        let owner = self.owners.swap_remove(slot);
        let value = self.dense.swap_remove(slot);
        self.sparse[owner.index as usize] = None;
        if let Some(moved) = self.owners.get(slot) {
            self.sparse[moved.index as usize] = Some(slot);
        }
        value
    }

    /// The value of `entity`.
    pub fn get(&self, entity: EntityId) -> Option<&T> {
        self.slot(entity).map(|slot| &self.dense[slot])
    }

    /// Mutable access to the value of `entity`.
    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        self.slot(entity).map(|slot| &mut self.dense[slot])
    }

    /// Whether `entity` has a value.
    pub fn contains(&self, entity: EntityId) -> bool {
        self.slot(entity).is_some()
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Every `(entity, value)` pair in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.owners.iter().copied().zip(self.dense.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(index: u32, generation: u32) -> EntityId {
        EntityId { index, generation }
    }

    #[test]
    fn test_remove_keeps_other_entries_addressable() {
        let mut set = SparseSet::new();
        set.insert(entity(0, 0), "a");
        set.insert(entity(5, 0), "b");
        set.insert(entity(2, 0), "c");

        assert_eq!(set.remove(entity(0, 0)), Some("a"));

        assert_eq!(set.get(entity(5, 0)), Some(&"b"));
        assert_eq!(set.get(entity(2, 0)), Some(&"c"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_stale_generation_is_not_found() {
        let mut set = SparseSet::new();
        set.insert(entity(1, 0), 10);

        assert_eq!(set.get(entity(1, 1)), None);
        assert_eq!(set.insert(entity(1, 1), 20), None);
        assert_eq!(set.get(entity(1, 1)), Some(&20));
        assert_eq!(set.len(), 1);
    }
}
