use std::{collections::BTreeMap, ops::Bound};

use cosmwasm_std::{Order, Record, Storage};

/// Write buffer over a read-only view of the contract store.
///
/// Reads see the buffered writes first. Nothing reaches the underlying store
/// until the buffer is prepared and committed.
pub struct StorageTransaction<'a> {
    storage: &'a dyn Storage,
    pending: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

/// Buffered writes detached from the store they were read against.
#[derive(Debug)]
pub struct PendingWrites(BTreeMap<Vec<u8>, Option<Vec<u8>>>);

impl<'a> StorageTransaction<'a> {
    pub fn new(storage: &'a dyn Storage) -> Self {
        Self {
            storage,
            pending: BTreeMap::new(),
        }
    }

    pub fn prepare(self) -> PendingWrites {
        PendingWrites(self.pending)
    }
}

impl PendingWrites {
    pub fn commit(self, storage: &mut dyn Storage) {
        for (key, value) in self.0 {
            match value {
                Some(value) => storage.set(&key, &value),
                None => storage.remove(&key),
            }
        }
    }
}

impl Storage for StorageTransaction<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.pending.get(key) {
            Some(value) => value.clone(),
            None => self.storage.get(key),
        }
    }

    fn range<'b>(
        &'b self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'b> {
        if let (Some(start), Some(end)) = (start, end) {
            if start >= end {
                return Box::new(std::iter::empty());
            }
        }

        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> = self
            .storage
            .range(start, end, Order::Ascending)
            .collect();

        let bounds = (
            start.map_or(Bound::Unbounded, |s| Bound::Included(s.to_vec())),
            end.map_or(Bound::Unbounded, |e| Bound::Excluded(e.to_vec())),
        );
        for (key, value) in self.pending.range(bounds) {
            if let Some(value) = value {
                merged.insert(key.clone(), value.clone());
            } else {
                merged.remove(key);
            }
        }

        match order {
            Order::Ascending => Box::new(merged.into_iter()),
            Order::Descending => Box::new(merged.into_iter().rev()),
        }
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        self.pending.insert(key.to_vec(), Some(value.to_vec()));
    }

    fn remove(&mut self, key: &[u8]) {
        self.pending.insert(key.to_vec(), None);
    }
}
