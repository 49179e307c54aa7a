//! Bookkeeper keeps track of personal expenses, sorted into hierarchical
//! categories, and how they measure up against daily, weekly and monthly budgets.
//!
//! Records are kept through the narrow [Store] contract of `add`, `get`,
//! `get_all`, `update` and `delete`. [SQLiteStore] keeps one table per record
//! type on disk and [MemoryStore] keeps records in memory; both honour the
//! same contract.

#![warn(missing_docs)]

mod budget;
mod category;
mod database_id;
mod expense;
mod filter;
mod ledger;
mod logging;
mod record;
mod stores;
mod timezone;
mod tree;

#[cfg(test)]
mod test_utils;

pub use budget::{Budget, BudgetPeriod};
pub use category::Category;
pub use database_id::{PrimaryKey, UNSET_PK};
pub use expense::Expense;
pub use filter::{Filter, like};
pub use ledger::{
    CategoryRow, DEFAULT_CATEGORIES, ExpenseRow, Ledger, SQLiteLedger, create_sqlite_ledger,
};
pub use logging::{DEFAULT_LOG_FILTER, setup_logging};
pub use record::{Field, FieldKind, Record};
pub use stores::{MemoryStore, SQLiteStore, Store, create_table};
pub use timezone::{get_local_offset, today_in};
pub use tree::{INDENT_UNIT, TreeEntry, TreeReader, read_tree};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An operation was called with a record or key in a state it does not allow,
    /// e.g., adding a record that already has a primary key or deleting with an unset key.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Tried to delete a record that does not exist.
    ///
    /// Looking up a missing record is not an error, see [Store::get].
    #[error("there is no {table} record with the primary key {pk}")]
    NotFound {
        /// The table that was searched.
        table: &'static str,
        /// The key that was not found.
        pk: PrimaryKey,
    },

    /// The caller provided malformed input, e.g., a badly indented category outline.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A filter named a field that the record type does not declare.
    #[error("the {table} record has no field \"{field}\"")]
    UnknownField {
        /// The table of the record type.
        table: &'static str,
        /// The undeclared field name.
        field: String,
    },

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}
