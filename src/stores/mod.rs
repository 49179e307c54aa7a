//! Contains the store trait and its implementations for objects that satisfy [Record].

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{SQLiteStore, create_table};

use crate::{Error, PrimaryKey, UNSET_PK, filter::Filter, record::Record};

/// Adds, retrieves, updates and deletes records of type `R`.
///
/// The store owns key assignment: keys are positive, unique within a store and
/// never reused after a deletion.
pub trait Store<R: Record> {
    /// Add a new record to the store and set its primary key.
    ///
    /// # Errors
    /// Returns [Error::InvalidState] if `record` already has a primary key, or
    /// an error from the backing storage.
    fn add(&self, record: &mut R) -> Result<PrimaryKey, Error>;

    /// Get the record with key `pk`, `None` if there is no such record.
    ///
    /// # Errors
    /// Returns an error from the backing storage.
    fn get(&self, pk: PrimaryKey) -> Result<Option<R>, Error>;

    /// Get every record matching `filter` in insertion order, or every record
    /// if there is no filter.
    ///
    /// # Errors
    /// Returns [Error::UnknownField] if the filter names a field `R` does not
    /// declare, or an error from the backing storage.
    fn get_all(&self, filter: Option<&Filter>) -> Result<Vec<R>, Error>;

    /// Overwrite the stored record that has the same key as `record`.
    ///
    /// Updating a key that is not in the store succeeds without changing anything.
    ///
    /// # Errors
    /// Returns [Error::InvalidState] if `record` does not have a primary key, or
    /// an error from the backing storage.
    fn update(&self, record: &R) -> Result<(), Error>;

    /// Delete the record with key `pk`.
    ///
    /// # Errors
    /// Returns [Error::InvalidState] if `pk` is unset, [Error::NotFound] if
    /// there is no record with key `pk`, or an error from the backing storage.
    fn delete(&self, pk: PrimaryKey) -> Result<(), Error>;
}

fn ensure_unsaved<R: Record>(record: &R) -> Result<(), Error> {
    if record.pk() != UNSET_PK {
        return Err(Error::InvalidState(format!(
            "cannot add a {} record that already has the primary key {}",
            R::TABLE,
            record.pk()
        )));
    }

    Ok(())
}

fn ensure_saved<R: Record>(pk: PrimaryKey, operation: &str) -> Result<(), Error> {
    if pk == UNSET_PK {
        return Err(Error::InvalidState(format!(
            "cannot {operation} a {} record without a primary key",
            R::TABLE
        )));
    }

    Ok(())
}
