/*
Searchable adaptable priority queue. An AdaptablePQ plus a payload -> handle map so
callers can find an entry by its value without holding on to the handle.

Payloads are unique: adding a payload that is already queued is rejected.
*/

use hashbrown::HashMap;
use std::hash::Hash;

use crate::apq::{AdaptablePQ, Handle};
use crate::error::QueueError;

#[derive(Debug)]
pub struct SearchableAPQ<K, V> {
    pq: AdaptablePQ<K, V>,
    lookup: HashMap<V, Handle>,
}

impl<K: Ord, V: Hash + Eq + Clone> Default for SearchableAPQ<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V: Hash + Eq + Clone> SearchableAPQ<K, V> {
    pub fn new() -> Self {
        Self {
            pq: AdaptablePQ::new(),
            lookup: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.pq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pq.is_empty()
    }

    pub fn add(&mut self, key: K, value: V) -> Result<Handle, QueueError> {
        if self.lookup.contains_key(&value) {
            return Err(QueueError::DuplicatePayload);
        }
        let handle = self.pq.add(key, value.clone());
        self.lookup.insert(value, handle);
        Ok(handle)
    }

    pub fn search(&self, value: &V) -> Option<Handle> {
        self.lookup.get(value).copied()
    }

    pub fn contains(&self, value: &V) -> bool {
        self.lookup.contains_key(value)
    }

    pub fn get_min(&self) -> Option<(&K, &V)> {
        self.pq.get_min()
    }

    pub fn remove_min(&mut self) -> Option<(K, V)> {
        let (key, value) = self.pq.remove_min()?;
        self.lookup.remove(&value);
        Some((key, value))
    }

    pub fn remove(&mut self, handle: &Handle) -> Result<(K, V), QueueError> {
        let (key, value) = self.pq.remove(handle)?;
        self.lookup.remove(&value);
        Ok((key, value))
    }

    pub fn get_key(&self, handle: &Handle) -> Option<&K> {
        self.pq.get_key(handle)
    }

    pub fn update_key(&mut self, handle: &Handle, key: K) -> Result<(), QueueError> {
        self.pq.update_key(handle, key)
    }

    /// Looks the payload up and updates its key in one call.
    pub fn update_key_of(&mut self, value: &V, key: K) -> Result<(), QueueError> {
        let handle = self.search(value).ok_or(QueueError::UnknownPayload)?;
        self.pq.update_key(&handle, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_follows_add_and_remove() {
        let mut pq = SearchableAPQ::new();
        let a = pq.add(3, 'a').unwrap();
        pq.add(1, 'b').unwrap();
        assert!(pq.contains(&'a'));
        assert_eq!(pq.search(&'a'), Some(a));
        assert_eq!(pq.get_key(&a), Some(&3));

        assert_eq!(pq.remove(&a), Ok((3, 'a')));
        assert!(!pq.contains(&'a'));
        assert_eq!(pq.search(&'a'), None);

        assert_eq!(pq.remove_min(), Some((1, 'b')));
        assert!(!pq.contains(&'b'));
        assert!(pq.is_empty());
    }

    #[test]
    fn duplicate_payload_is_rejected() {
        let mut pq = SearchableAPQ::new();
        let first = pq.add(5, "x").unwrap();
        assert_eq!(pq.add(2, "x"), Err(QueueError::DuplicatePayload));
        assert_eq!(pq.len(), 1);
        assert_eq!(pq.search(&"x"), Some(first));
        assert_eq!(pq.get_min(), Some((&5, &"x")));
    }

    #[test]
    fn payload_can_be_requeued_after_removal() {
        let mut pq = SearchableAPQ::new();
        let first = pq.add(5, "x").unwrap();
        pq.remove(&first).unwrap();
        let second = pq.add(7, "x").unwrap();
        assert_eq!(pq.search(&"x"), Some(second));
        assert_eq!(pq.remove(&first), Err(QueueError::StaleHandle));
        assert_eq!(pq.len(), 1);
    }

    #[test]
    fn decrease_key_by_payload() {
        let mut pq = SearchableAPQ::new();
        pq.add(10, "a").unwrap();
        pq.add(20, "b").unwrap();
        pq.add(30, "c").unwrap();
        pq.update_key_of(&"c", 1).unwrap();
        assert_eq!(pq.get_min(), Some((&1, &"c")));
        assert_eq!(pq.update_key_of(&"z", 0), Err(QueueError::UnknownPayload));
        assert_eq!(pq.len(), 3);
    }

    #[test]
    fn update_key_of_a_removed_payload_is_unknown() {
        let mut pq = SearchableAPQ::new();
        pq.add(10, "a").unwrap();
        pq.add(20, "b").unwrap();
        assert_eq!(pq.remove_min(), Some((10, "a")));
        assert_eq!(pq.update_key_of(&"a", 1), Err(QueueError::UnknownPayload));
        assert_eq!(pq.get_min(), Some((&20, &"b")));
    }
}
