/*
Adaptable priority queue: a binary min-heap whose entries can be removed or
re-keyed from any position in O(log n) through the handle returned by `add`.

Entries are kept in an arena of slots. The heap array holds (key, slot) pairs and
every slot records the heap index its entry currently sits at, so a handle finds
its heap position in O(1). Wiping an entry bumps the generation of its slot, which
keeps an old handle detectably stale even after the slot is reused.

Supported operations are Add, GetMin, RemoveMin, Remove, GetKey and UpdateKey.
*/

use crate::error::QueueError;

/// Token for one entry of an [`AdaptablePQ`].
///
/// A handle stays valid until its entry is removed. After that every
/// operation taking it fails with [`QueueError::StaleHandle`] and leaves the
/// queue untouched. Handles are only meaningful for the queue that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    slot: usize,
    generation: u64,
}

#[derive(Debug)]
struct HeapNode<K> {
    key: K,
    slot: usize,
}

#[derive(Debug)]
struct Slot<V> {
    generation: u64,
    index: usize,
    value: Option<V>,
}

#[derive(Debug)]
pub struct AdaptablePQ<K, V> {
    heap: Vec<HeapNode<K>>,
    slots: Vec<Slot<V>>,
    free_slots: Vec<usize>,
}

impl<K: Ord, V> Default for AdaptablePQ<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> AdaptablePQ<K, V> {
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            slots: Vec::new(),
            free_slots: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            free_slots: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Adds `value` with priority `key` and returns its handle.
    pub fn add(&mut self, key: K, value: V) -> Handle {
        let index = self.heap.len();
        let slot = match self.free_slots.pop() {
            Some(slot) => {
                self.slots[slot].index = index;
                self.slots[slot].value = Some(value);
                slot
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    index,
                    value: Some(value),
                });
                self.slots.len() - 1
            }
        };
        self.heap.push(HeapNode { key, slot });
        self.sift_up(index);
        Handle {
            slot,
            generation: self.slots[slot].generation,
        }
    }

    pub fn get_min(&self) -> Option<(&K, &V)> {
        let root = self.heap.first()?;
        let value = self.slots[root.slot].value.as_ref()?;
        Some((&root.key, value))
    }

    /// Handle of the entry currently at the root.
    pub fn min_handle(&self) -> Option<Handle> {
        self.heap.first().map(|root| Handle {
            slot: root.slot,
            generation: self.slots[root.slot].generation,
        })
    }

    pub fn remove_min(&mut self) -> Option<(K, V)> {
        let handle = self.min_handle()?;
        self.remove(&handle).ok()
    }

    /// Removes the entry behind `handle` and returns its key and value.
    ///
    /// The handle is wiped: a second `remove` with it fails.
    pub fn remove(&mut self, handle: &Handle) -> Result<(K, V), QueueError> {
        let index = self.locate(handle)?;
        let value = self.slots[handle.slot]
            .value
            .take()
            .ok_or(QueueError::StaleHandle)?;

        // Move the last node into the hole, then restore the heap from there.
        let node = self.heap.swap_remove(index);
        if index < self.heap.len() {
            let moved = self.heap[index].slot;
            self.slots[moved].index = index;
            self.rebalance(index);
        }

        let slot = &mut self.slots[node.slot];
        slot.generation = slot.generation.wrapping_add(1);
        slot.index = usize::MAX;
        self.free_slots.push(node.slot);
        Ok((node.key, value))
    }

    pub fn get_key(&self, handle: &Handle) -> Option<&K> {
        self.locate(handle).ok().map(|index| &self.heap[index].key)
    }

    pub fn get_value(&self, handle: &Handle) -> Option<&V> {
        self.locate(handle).ok()?;
        self.slots[handle.slot].value.as_ref()
    }

    /// Replaces the key of a live entry and moves it to its new position.
    pub fn update_key(&mut self, handle: &Handle, key: K) -> Result<(), QueueError> {
        let index = self.locate(handle)?;
        self.heap[index].key = key;
        self.rebalance(index);
        Ok(())
    }

    pub fn contains(&self, handle: &Handle) -> bool {
        self.locate(handle).is_ok()
    }

    /// Removes every entry, wiping all outstanding handles.
    pub fn clear(&mut self) {
        for node in self.heap.drain(..) {
            let slot = &mut self.slots[node.slot];
            slot.generation = slot.generation.wrapping_add(1);
            slot.index = usize::MAX;
            slot.value = None;
            self.free_slots.push(node.slot);
        }
    }

    /// Iterates over the live entries in heap-array order (not sorted).
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.heap.iter().filter_map(move |node| {
            self.slots[node.slot]
                .value
                .as_ref()
                .map(|value| (&node.key, value))
        })
    }

    // Heap index of a live handle. Rejects wiped handles and handles whose slot
    // no longer points back at itself.
    fn locate(&self, handle: &Handle) -> Result<usize, QueueError> {
        let slot = self
            .slots
            .get(handle.slot)
            .ok_or(QueueError::StaleHandle)?;
        if slot.generation != handle.generation || slot.value.is_none() {
            return Err(QueueError::StaleHandle);
        }
        match self.heap.get(slot.index) {
            Some(node) if node.slot == handle.slot => Ok(slot.index),
            _ => Err(QueueError::StaleHandle),
        }
    }

    // Sift up or down depending on the parent only, never both.
    fn rebalance(&mut self, index: usize) {
        if index > 0 && self.heap[index].key < self.heap[(index - 1) / 2].key {
            self.sift_up(index);
        } else {
            self.sift_down(index);
        }
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.heap[index].key < self.heap[parent].key {
                self.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.heap[right].key < self.heap[left].key {
                right
            } else {
                left
            };
            if self.heap[child].key < self.heap[index].key {
                self.swap(index, child);
                index = child;
            } else {
                break;
            }
        }
    }

    // Both slots must learn their new positions.
    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.slots[self.heap[i].slot].index = i;
        self.slots[self.heap[j].slot].index = j;
    }
}
