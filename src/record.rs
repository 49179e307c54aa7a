//! The capability a type needs to be kept in a [Store](crate::stores::Store).

use rusqlite::{Row, types::Value};

use crate::database_id::PrimaryKey;

/// How the value of a field is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A 64-bit signed integer, possibly `NULL` for optional keys.
    Integer,
    /// UTF-8 text.
    Text,
    /// A calendar date, stored as ISO 8601 text (`YYYY-MM-DD`).
    Date,
}

impl FieldKind {
    /// The declared column type used when creating a table.
    pub fn column_type(self) -> &'static str {
        match self {
            FieldKind::Integer => "INTEGER",
            FieldKind::Text | FieldKind::Date => "TEXT",
        }
    }
}

/// A named attribute of a record, excluding its primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// The field name, which doubles as the column name.
    pub name: &'static str,
    /// How the field is stored.
    pub kind: FieldKind,
}

impl Field {
    /// Declare a field.
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// A structured value with ordered, named fields and a store-assigned primary key.
///
/// The field list is fixed at compile time through [Record::FIELDS]. Its order
/// determines the column order of the table backing the record type and the
/// order of [Record::values].
///
/// # Examples
/// ```
/// use bookkeeper::{Field, FieldKind, PrimaryKey, Record};
/// use rusqlite::{Row, types::Value};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Note {
///     text: String,
///     pk: PrimaryKey,
/// }
///
/// impl Record for Note {
///     const TABLE: &'static str = "note";
///     const FIELDS: &'static [Field] = &[Field::new("text", FieldKind::Text)];
///
///     fn pk(&self) -> PrimaryKey {
///         self.pk
///     }
///
///     fn set_pk(&mut self, pk: PrimaryKey) {
///         self.pk = pk;
///     }
///
///     fn values(&self) -> Vec<Value> {
///         vec![Value::Text(self.text.clone())]
///     }
///
///     fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
///         Ok(Self {
///             pk: row.get(0)?,
///             text: row.get(1)?,
///         })
///     }
/// }
///
/// let note = Note { text: "hello".to_owned(), pk: 0 };
/// assert_eq!(note.value_of("text"), Some(Value::Text("hello".to_owned())));
/// assert_eq!(note.value_of("pk"), None);
/// ```
pub trait Record: Clone {
    /// The name of the table holding records of this type, the lower-cased type name.
    const TABLE: &'static str;

    /// The declared fields in order, excluding `pk`.
    const FIELDS: &'static [Field];

    /// The primary key, or [UNSET_PK](crate::UNSET_PK) if the record has not been persisted.
    fn pk(&self) -> PrimaryKey;

    /// Set the primary key.
    fn set_pk(&mut self, pk: PrimaryKey);

    /// The field values in the order of [Record::FIELDS].
    fn values(&self) -> Vec<Value>;

    /// Convert a row into a record.
    ///
    /// **Note:** This function expects the row to hold the `pk` column followed
    /// by the columns of [Record::FIELDS] in declared order.
    ///
    /// # Errors
    /// Returns an error if a column cannot be converted into the corresponding rust type.
    fn map_row(row: &Row) -> Result<Self, rusqlite::Error>;

    /// Get the value of the field called `name`, or `None` if no such field is declared.
    fn value_of(&self, name: &str) -> Option<Value> {
        Self::FIELDS
            .iter()
            .position(|field| field.name == name)
            .and_then(|index| self.values().into_iter().nth(index))
    }

    /// Whether the record type declares a field called `name`.
    fn has_field(name: &str) -> bool {
        Self::FIELDS.iter().any(|field| field.name == name)
    }
}
