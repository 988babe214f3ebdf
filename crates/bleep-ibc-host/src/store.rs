// HOST KEY-VALUE STORE
// Byte-addressed store contract the IBC modules read and write through
//
// INVARIANTS:
// 1. One request = one atomic read-modify-write, supplied by the host
// 2. Stores never interpret values; encoding belongs to the record owners
// 3. A CacheStore touches its parent only on commit()

use crate::error::StoreError;
use log::debug;
use std::collections::BTreeMap;

/// Read half of the host store.
pub trait ReadStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Durable, ordered key-value store provided by the host chain.
pub trait KvStore: ReadStore {
    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError>;

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError>;
}

impl<S: ReadStore + ?Sized> ReadStore for &S {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }
}

impl<S: ReadStore + ?Sized> ReadStore for &mut S {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }
}

impl<S: KvStore + ?Sized> KvStore for &mut S {
    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        (**self).delete(key)
    }
}

impl<S: ReadStore + ?Sized> ReadStore for Box<S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }
}

impl<S: KvStore + ?Sized> KvStore for Box<S> {
    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        (**self).delete(key)
    }
}

/// In-memory store, used by tests and by hosts without persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ReadStore for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }
}

impl KvStore for MemoryStore {
    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        self.entries.insert(key.to_vec(), value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Write-buffering overlay over a parent store.
///
/// Reads fall through to the parent for keys the overlay has not touched.
/// Nothing reaches the parent until [`CacheStore::commit`]; dropping the
/// overlay discards every buffered write. Hosts use this to run a handshake
/// step speculatively before deciding to persist it.
pub struct CacheStore<'a, S: KvStore + ?Sized> {
    parent: &'a mut S,
    /// `None` marks a buffered delete
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a, S: KvStore + ?Sized> CacheStore<'a, S> {
    pub fn new(parent: &'a mut S) -> Self {
        CacheStore {
            parent,
            writes: BTreeMap::new(),
        }
    }

    /// Number of keys written or deleted through the overlay
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Flush buffered writes into the parent in key order.
    pub fn commit(self) -> Result<(), StoreError> {
        let count = self.writes.len();
        for (key, value) in self.writes {
            match value {
                Some(value) => self.parent.set(&key, value)?,
                None => self.parent.delete(&key)?,
            }
        }
        debug!("Committed {} cached writes to parent store", count);
        Ok(())
    }
}

impl<'a, S: KvStore + ?Sized> ReadStore for CacheStore<'a, S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        match self.writes.get(key) {
            Some(buffered) => Ok(buffered.clone()),
            None => self.parent.get(key),
        }
    }
}

impl<'a, S: KvStore + ?Sized> KvStore for CacheStore<'a, S> {
    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        self.writes.insert(key.to_vec(), Some(value));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        self.writes.insert(key.to_vec(), None);
        Ok(())
    }
}

/// RocksDB-backed store for hosts that persist IBC state locally.
#[cfg(feature = "rocksdb")]
pub struct RocksStore {
    db: rocksdb::DB,
}

#[cfg(feature = "rocksdb")]
impl RocksStore {
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self, StoreError> {
        let mut opts = rocksdb::Options::default();
        opts.create_if_missing(true);
        let db = rocksdb::DB::open(&opts, path)?;
        log::info!("Opened RocksDB IBC store at {}", db.path().display());
        Ok(RocksStore { db })
    }
}

#[cfg(feature = "rocksdb")]
impl ReadStore for RocksStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.db.get(key)?)
    }
}

#[cfg(feature = "rocksdb")]
impl KvStore for RocksStore {
    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), StoreError> {
        Ok(self.db.put(key, value)?)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StoreError> {
        Ok(self.db.delete(key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get(b"a").unwrap(), None);
        store.set(b"a", vec![1]).unwrap();
        assert!(store.has(b"a").unwrap());
        store.delete(b"a").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_cache_store_discards_on_drop() {
        let mut parent = MemoryStore::new();
        parent.set(b"kept", vec![0]).unwrap();
        {
            let mut cache = CacheStore::new(&mut parent);
            cache.set(b"new", vec![1]).unwrap();
            cache.delete(b"kept").unwrap();
            assert_eq!(cache.get(b"new").unwrap(), Some(vec![1]));
            assert_eq!(cache.get(b"kept").unwrap(), None);
            assert_eq!(cache.pending_writes(), 2);
        }
        assert_eq!(parent.get(b"kept").unwrap(), Some(vec![0]));
        assert_eq!(parent.get(b"new").unwrap(), None);
    }

    #[test]
    fn test_cache_store_commit_flushes() {
        let mut parent = MemoryStore::new();
        parent.set(b"gone", vec![9]).unwrap();
        let mut cache = CacheStore::new(&mut parent);
        cache.set(b"new", vec![1]).unwrap();
        cache.delete(b"gone").unwrap();
        cache.commit().unwrap();
        assert_eq!(parent.get(b"new").unwrap(), Some(vec![1]));
        assert!(!parent.has(b"gone").unwrap());
    }

    #[test]
    fn test_nested_cache_stores() {
        let mut parent = MemoryStore::new();
        let mut outer = CacheStore::new(&mut parent);
        {
            let mut inner = CacheStore::new(&mut outer);
            inner.set(b"k", vec![7]).unwrap();
            inner.commit().unwrap();
        }
        assert_eq!(outer.get(b"k").unwrap(), Some(vec![7]));
        outer.commit().unwrap();
        assert_eq!(parent.get(b"k").unwrap(), Some(vec![7]));
    }

    #[cfg(feature = "rocksdb")]
    #[test]
    fn test_rocks_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = RocksStore::open(dir.path()).unwrap();
            store.set(b"channelEnds/x", vec![1, 2, 3]).unwrap();
        }
        let store = RocksStore::open(dir.path()).unwrap();
        assert_eq!(store.get(b"channelEnds/x").unwrap(), Some(vec![1, 2, 3]));
    }

    proptest! {
        #[test]
        fn prop_cache_reads_match_committed_parent(
            ops in proptest::collection::vec((0u8..8, proptest::option::of(any::<u8>())), 0..32)
        ) {
            let mut direct = MemoryStore::new();
            let mut parent = MemoryStore::new();
            let mut cache = CacheStore::new(&mut parent);
            for (key, value) in &ops {
                let key = [*key];
                match value {
                    Some(v) => {
                        direct.set(&key, vec![*v]).unwrap();
                        cache.set(&key, vec![*v]).unwrap();
                    }
                    None => {
                        direct.delete(&key).unwrap();
                        cache.delete(&key).unwrap();
                    }
                }
            }
            for key in 0u8..8 {
                prop_assert_eq!(cache.get(&[key]).unwrap(), direct.get(&[key]).unwrap());
            }
            cache.commit().unwrap();
            for key in 0u8..8 {
                prop_assert_eq!(parent.get(&[key]).unwrap(), direct.get(&[key]).unwrap());
            }
        }
    }
}
