#![allow(missing_docs)]

use rusqlite::{Row, types::Value};

use crate::{
    PrimaryKey, UNSET_PK,
    record::{Field, FieldKind, Record},
};

/// A record type that exists only for tests, mirroring an arbitrary user type.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Custom {
    pub name: String,
    pub size: i64,
    pub note: Option<String>,
    pub pk: PrimaryKey,
}

impl Custom {
    pub(crate) fn new(name: &str, size: i64) -> Self {
        Self {
            name: name.to_owned(),
            size,
            note: Some(format!("{name} note")),
            pk: UNSET_PK,
        }
    }
}

impl Record for Custom {
    const TABLE: &'static str = "custom";
    const FIELDS: &'static [Field] = &[
        Field::new("name", FieldKind::Text),
        Field::new("size", FieldKind::Integer),
        Field::new("note", FieldKind::Text),
    ];

    fn pk(&self) -> PrimaryKey {
        self.pk
    }

    fn set_pk(&mut self, pk: PrimaryKey) {
        self.pk = pk;
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Integer(self.size),
            self.note.clone().map_or(Value::Null, Value::Text),
        ]
    }

    fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            pk: row.get(0)?,
            name: row.get(1)?,
            size: row.get(2)?,
            note: row.get(3)?,
        })
    }
}
