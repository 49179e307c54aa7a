//! This file defines the `Category` record and how a hierarchy of categories is created from an outline.
//! Categories form a tree: each category either has a parent category or is at the root.

use rusqlite::{Row, types::Value};
use serde::{Deserialize, Serialize};

use crate::{
    Error, PrimaryKey, UNSET_PK,
    record::{Field, FieldKind, Record},
    stores::Store,
    tree::TreeEntry,
};

/// A category for expenses, e.g., 'Groceries', 'Eating Out'.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Category {
    /// The name of the category.
    pub name: String,

    /// The key of the parent category, `None` for a top-level category.
    pub parent: Option<PrimaryKey>,

    /// The primary key of the category.
    pub pk: PrimaryKey,
}

impl Category {
    /// Create a category that has not been added to a store yet.
    pub fn new(name: impl Into<String>, parent: Option<PrimaryKey>) -> Self {
        Self {
            name: name.into(),
            parent,
            pk: UNSET_PK,
        }
    }

    /// Add a category to `store` for every entry of an outline, in order.
    ///
    /// Parents are always added before their children, so each child is created
    /// with the key its parent was just given. Parents are resolved by position
    /// in the outline rather than by name, so the same name may appear in
    /// several branches.
    ///
    /// Categories added before an error are kept.
    ///
    /// # Errors
    /// Returns the first error from `entries`, [Error::InvalidInput] if an entry
    /// does not fit under the entries before it, or an error from the store.
    pub fn create_from_tree<I, S>(entries: I, store: &S) -> Result<Vec<Category>, Error>
    where
        I: IntoIterator<Item = Result<TreeEntry, Error>>,
        S: Store<Category> + ?Sized,
    {
        let mut ancestors: Vec<Category> = Vec::new();
        let mut created = Vec::new();

        for entry in entries {
            let entry = entry?;

            if entry.depth > ancestors.len() {
                return Err(Error::InvalidInput(format!(
                    "category \"{}\" is nested deeper than any parent",
                    entry.name
                )));
            }

            ancestors.truncate(entry.depth);
            let parent = ancestors.last();

            if parent.map(|parent| &parent.name) != entry.parent.as_ref() {
                return Err(Error::InvalidInput(format!(
                    "category \"{}\" should be under {:?} but is under {:?}",
                    entry.name,
                    entry.parent,
                    parent.map(|parent| &parent.name)
                )));
            }

            let mut category = Category::new(entry.name, parent.map(|parent| parent.pk));
            store.add(&mut category)?;
            tracing::debug!("created category {category:?} from outline");

            ancestors.push(category.clone());
            created.push(category);
        }

        Ok(created)
    }
}

impl Record for Category {
    const TABLE: &'static str = "category";
    const FIELDS: &'static [Field] = &[
        Field::new("name", FieldKind::Text),
        Field::new("parent", FieldKind::Integer),
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
            self.parent.map_or(Value::Null, Value::Integer),
        ]
    }

    fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            pk: row.get(0)?,
            name: row.get(1)?,
            parent: row.get(2)?,
        })
    }
}
