//! Defines the `Expense` record.

use rusqlite::{Row, types::Value};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    PrimaryKey, UNSET_PK,
    record::{Field, FieldKind, Record},
};

/// Money spent on a given day in a [Category](crate::Category).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// The amount of money spent.
    pub amount: i64,
    /// The key of the category the expense belongs to.
    pub category: PrimaryKey,
    /// When the money was spent.
    pub expense_date: Date,
    /// A free-form note.
    pub comment: String,
    /// The primary key of the expense.
    pub pk: PrimaryKey,
}

impl Expense {
    /// Create an expense that has not been added to a store yet.
    pub fn new(
        amount: i64,
        category: PrimaryKey,
        expense_date: Date,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            category,
            expense_date,
            comment: comment.into(),
            pk: UNSET_PK,
        }
    }
}

impl Record for Expense {
    const TABLE: &'static str = "expense";
    const FIELDS: &'static [Field] = &[
        Field::new("amount", FieldKind::Integer),
        Field::new("category", FieldKind::Integer),
        Field::new("expense_date", FieldKind::Date),
        Field::new("comment", FieldKind::Text),
    ];

    fn pk(&self) -> PrimaryKey {
        self.pk
    }

    fn set_pk(&mut self, pk: PrimaryKey) {
        self.pk = pk;
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.amount),
            Value::Integer(self.category),
            Value::Text(self.expense_date.to_string()),
            Value::Text(self.comment.clone()),
        ]
    }

    fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            pk: row.get(0)?,
            amount: row.get(1)?,
            category: row.get(2)?,
            expense_date: row.get(3)?,
            comment: row.get(4)?,
        })
    }
}
