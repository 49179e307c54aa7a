//! Implements a store that keeps records in memory.

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use crate::{Error, PrimaryKey, filter::Filter, record::Record};

use super::{Store, ensure_saved, ensure_unsaved};

/// Keeps records in an ordered map from primary key to record.
///
/// Keys come from a counter that survives deletions, so a deleted key is never
/// handed out again, the same as the SQLite store. Since keys only grow, key
/// order is insertion order.
#[derive(Debug)]
pub struct MemoryStore<R> {
    table: Mutex<MemoryTable<R>>,
}

#[derive(Debug)]
struct MemoryTable<R> {
    records: BTreeMap<PrimaryKey, R>,
    last_pk: PrimaryKey,
}

impl<R: Record> MemoryStore<R> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            table: Mutex::new(MemoryTable {
                records: BTreeMap::new(),
                last_pk: 0,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryTable<R>>, Error> {
        self.table.lock().map_err(|_| Error::DatabaseLockError)
    }
}

impl<R: Record> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Store<R> for MemoryStore<R> {
    fn add(&self, record: &mut R) -> Result<PrimaryKey, Error> {
        ensure_unsaved(record)?;

        let mut table = self.lock()?;
        table.last_pk += 1;
        let pk = table.last_pk;

        record.set_pk(pk);
        table.records.insert(pk, record.clone());

        Ok(pk)
    }

    fn get(&self, pk: PrimaryKey) -> Result<Option<R>, Error> {
        Ok(self.lock()?.records.get(&pk).cloned())
    }

    fn get_all(&self, filter: Option<&Filter>) -> Result<Vec<R>, Error> {
        let table = self.lock()?;

        let records = match filter {
            None => table.records.values().cloned().collect(),
            Some(filter) => {
                filter.validate::<R>()?;

                table
                    .records
                    .values()
                    .filter(|record| filter.matches(*record))
                    .cloned()
                    .collect()
            }
        };

        Ok(records)
    }

    fn update(&self, record: &R) -> Result<(), Error> {
        ensure_saved::<R>(record.pk(), "update")?;

        let mut table = self.lock()?;
        match table.records.get_mut(&record.pk()) {
            Some(stored) => *stored = record.clone(),
            None => tracing::warn!(
                "ignoring update to missing {} record {}",
                R::TABLE,
                record.pk()
            ),
        }

        Ok(())
    }

    fn delete(&self, pk: PrimaryKey) -> Result<(), Error> {
        ensure_saved::<R>(pk, "delete")?;

        match self.lock()?.records.remove(&pk) {
            Some(_) => Ok(()),
            None => Err(Error::NotFound {
                table: R::TABLE,
                pk,
            }),
        }
    }
}

#[cfg(test)]
mod memory_store_tests {
    use crate::{stores::Store, test_utils::Custom};

    use super::MemoryStore;

    #[test]
    fn first_key_is_one() {
        let store = MemoryStore::new();

        assert_eq!(store.add(&mut Custom::new("a", 1)), Ok(1));
    }

    #[test]
    fn counter_survives_deleting_every_record() {
        let store = MemoryStore::new();
        let first = store.add(&mut Custom::new("a", 1)).unwrap();
        let second = store.add(&mut Custom::new("b", 2)).unwrap();
        store.delete(first).unwrap();
        store.delete(second).unwrap();

        let third = store.add(&mut Custom::new("c", 3)).unwrap();

        assert_eq!(third, 3);
    }

    #[test]
    fn stored_record_is_a_copy() {
        let store = MemoryStore::new();
        let mut custom = Custom::new("a", 1);
        let pk = store.add(&mut custom).unwrap();

        custom.name = "changed without update".to_owned();

        let stored = store.get(pk).unwrap().unwrap();
        assert_eq!(stored.name, "a");
    }
}
