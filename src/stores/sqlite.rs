//! Implements a SQLite backed store with one table per record type.

use std::{
    marker::PhantomData,
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::{Connection, OptionalExtension, params_from_iter, types::Value};

use crate::{Error, PrimaryKey, filter::Filter, record::Record};

use super::{Store, ensure_saved, ensure_unsaved};

/// Adds, retrieves, updates and deletes records in a SQLite database.
///
/// Each record type gets its own table named [Record::TABLE] with an
/// auto-incrementing `pk` column followed by one column per field in
/// [Record::FIELDS]. Several stores may share one connection; each operation
/// holds the connection for a single statement.
#[derive(Debug)]
pub struct SQLiteStore<R> {
    connection: Arc<Mutex<Connection>>,
    record: PhantomData<fn() -> R>,
}

impl<R> Clone for SQLiteStore<R> {
    fn clone(&self) -> Self {
        Self {
            connection: self.connection.clone(),
            record: PhantomData,
        }
    }
}

impl<R: Record> SQLiteStore<R> {
    /// Create a store for `R`, creating its table if it does not exist.
    ///
    /// An existing table is used as-is; its columns are not checked against
    /// [Record::FIELDS].
    ///
    /// # Errors
    /// Returns an error if the table cannot be created or the connection lock is poisoned.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Result<Self, Error> {
        {
            let connection = connection.lock().map_err(|_| Error::DatabaseLockError)?;
            create_table::<R>(&connection)?;
        }

        Ok(Self {
            connection,
            record: PhantomData,
        })
    }

    /// Open the database file at `path`, creating it if needed, and create a store for `R`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or the table cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let connection = Connection::open(path)?;

        Self::new(Arc::new(Mutex::new(connection)))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::DatabaseLockError)
    }

    #[cfg(test)]
    pub(crate) fn connection_for_tests(&self) -> MutexGuard<'_, Connection> {
        self.connection.lock().unwrap()
    }

    fn select_sql() -> String {
        let columns: String = R::FIELDS
            .iter()
            .map(|field| format!(", \"{}\"", field.name))
            .collect();

        format!("SELECT pk{columns} FROM \"{}\"", R::TABLE)
    }
}

impl<R: Record> Store<R> for SQLiteStore<R> {
    fn add(&self, record: &mut R) -> Result<PrimaryKey, Error> {
        ensure_unsaved(record)?;

        let names: Vec<String> = R::FIELDS
            .iter()
            .map(|field| format!("\"{}\"", field.name))
            .collect();
        let placeholders: Vec<String> = (1..=R::FIELDS.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({})",
            R::TABLE,
            names.join(", "),
            placeholders.join(", ")
        );

        let connection = self.lock()?;
        connection.execute(&sql, params_from_iter(record.values()))?;
        let pk = connection.last_insert_rowid();
        tracing::debug!("inserted {} record {pk}", R::TABLE);

        record.set_pk(pk);

        Ok(pk)
    }

    fn get(&self, pk: PrimaryKey) -> Result<Option<R>, Error> {
        let sql = format!("{} WHERE pk = ?1", Self::select_sql());

        self.lock()?
            .prepare(&sql)?
            .query_row([pk], R::map_row)
            .optional()
            .map_err(|error| error.into())
    }

    fn get_all(&self, filter: Option<&Filter>) -> Result<Vec<R>, Error> {
        let filter = match filter {
            Some(filter) => {
                filter.validate::<R>()?;
                filter.clone()
            }
            None => Filter::new(),
        };
        let sql = format!(
            "{}{} ORDER BY pk",
            Self::select_sql(),
            filter.where_clause()
        );

        self.lock()?
            .prepare(&sql)?
            .query_map(params_from_iter(filter.patterns()), R::map_row)?
            .map(|maybe_record| maybe_record.map_err(|error| error.into()))
            .collect()
    }

    fn update(&self, record: &R) -> Result<(), Error> {
        ensure_saved::<R>(record.pk(), "update")?;

        let assignments: Vec<String> = R::FIELDS
            .iter()
            .enumerate()
            .map(|(index, field)| format!("\"{}\" = ?{}", field.name, index + 1))
            .collect();
        let sql = format!(
            "UPDATE \"{}\" SET {} WHERE pk = ?{}",
            R::TABLE,
            assignments.join(", "),
            R::FIELDS.len() + 1
        );
        let mut params = record.values();
        params.push(Value::Integer(record.pk()));

        let rows_affected = self.lock()?.execute(&sql, params_from_iter(params))?;

        if rows_affected == 0 {
            tracing::warn!(
                "ignoring update to missing {} record {}",
                R::TABLE,
                record.pk()
            );
        }

        Ok(())
    }

    fn delete(&self, pk: PrimaryKey) -> Result<(), Error> {
        ensure_saved::<R>(pk, "delete")?;

        let sql = format!("DELETE FROM \"{}\" WHERE pk = ?1", R::TABLE);
        let rows_affected = self.lock()?.execute(&sql, [pk])?;

        if rows_affected == 0 {
            return Err(Error::NotFound {
                table: R::TABLE,
                pk,
            });
        }

        tracing::debug!("deleted {} record {pk}", R::TABLE);

        Ok(())
    }
}

/// Create the table for `R` if it does not already exist.
///
/// The table has an auto-incrementing `pk` column followed by the columns of
/// [Record::FIELDS] in declared order. `AUTOINCREMENT` stops SQLite from
/// reusing the keys of deleted rows.
pub fn create_table<R: Record>(connection: &Connection) -> Result<(), rusqlite::Error> {
    let columns: String = R::FIELDS
        .iter()
        .map(|field| format!(", \"{}\" {}", field.name, field.kind.column_type()))
        .collect();

    connection.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (pk INTEGER PRIMARY KEY AUTOINCREMENT{columns})",
            R::TABLE
        ),
        (),
    )?;

    Ok(())
}
