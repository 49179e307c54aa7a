//! The operations behind the bookkeeper's screens: recording expenses,
//! editing categories and keeping the budgets up to date.
//!
//! A [Ledger] only talks to storage through the [Store] contract, so it runs
//! the same over SQLite or in memory.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use rusqlite::Connection;
use serde::Serialize;
use time::Date;

use crate::{
    Error, PrimaryKey,
    budget::{Budget, BudgetPeriod},
    category::Category,
    expense::Expense,
    filter::Filter,
    stores::{SQLiteStore, Store},
    tree::read_tree,
};

/// The categories created for a new database, as an outline.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "groceries",
    "entertainment",
    "transport",
    "books",
    "clothes",
    "household goods",
    "medicine",
    "restaurants",
];

/// An expense as shown to the user, with the category name in place of its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseRow {
    /// The primary key of the expense.
    pub pk: PrimaryKey,
    /// The amount of money spent.
    pub amount: i64,
    /// The category name, or the raw key if the category no longer exists.
    pub category: String,
    /// When the money was spent.
    pub expense_date: Date,
    /// A free-form note.
    pub comment: String,
}

/// A category as shown to the user, with the parent name in place of its key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    /// The primary key of the category.
    pub pk: PrimaryKey,
    /// The name of the category.
    pub name: String,
    /// The parent name, the raw key if the parent no longer exists, or `None` at the root.
    pub parent: Option<String>,
}

/// A [Ledger] backed by a single SQLite database.
pub type SQLiteLedger = Ledger<SQLiteStore<Category>, SQLiteStore<Expense>, SQLiteStore<Budget>>;

/// Creates a [Ledger] that keeps all its records in the database behind `connection`.
///
/// The tables for the records are created if they do not exist.
///
/// # Errors
/// Returns an error if a table cannot be created.
pub fn create_sqlite_ledger(connection: Connection) -> Result<SQLiteLedger, Error> {
    let connection = Arc::new(Mutex::new(connection));

    Ok(Ledger::new(
        SQLiteStore::new(connection.clone())?,
        SQLiteStore::new(connection.clone())?,
        SQLiteStore::new(connection)?,
    ))
}

/// Coordinates the category, expense and budget stores.
///
/// Every change to the expenses is followed by recomputing the budgets, so the
/// amount of each budget row always reflects the expenses in its period.
#[derive(Debug, Clone)]
pub struct Ledger<C, E, B> {
    categories: C,
    expenses: E,
    budgets: B,
}

impl<C, E, B> Ledger<C, E, B>
where
    C: Store<Category>,
    E: Store<Expense>,
    B: Store<Budget>,
{
    /// Create a ledger over the given stores.
    pub fn new(categories: C, expenses: E, budgets: B) -> Self {
        Self {
            categories,
            expenses,
            budgets,
        }
    }

    /// The category store.
    pub fn categories(&self) -> &C {
        &self.categories
    }

    /// The expense store.
    pub fn expenses(&self) -> &E {
        &self.expenses
    }

    /// The budget store.
    pub fn budgets(&self) -> &B {
        &self.budgets
    }

    /// Fill empty stores with the default categories and one budget row per
    /// period, then bring the budgets up to date for `today`.
    ///
    /// Stores that already hold records are left alone, so this is safe to call on every start-up.
    ///
    /// # Errors
    /// Returns an error from the stores.
    pub fn seed_defaults(&self, today: Date) -> Result<(), Error> {
        if self.categories.get_all(None)?.is_empty() {
            let created = self.import_categories(DEFAULT_CATEGORIES)?;
            tracing::info!("seeded {} default categories", created.len());
        }

        if self.budgets.get_all(None)?.is_empty() {
            for period in BudgetPeriod::ALL {
                self.budgets
                    .add(&mut Budget::new(period, period.default_limit()))?;
            }
            tracing::info!("seeded the default budgets");
        }

        self.recompute_budgets(today)?;

        Ok(())
    }

    /// Add the categories described by an indented outline.
    ///
    /// See [read_tree](crate::read_tree) for the outline format.
    ///
    /// # Errors
    /// Returns [Error::InvalidInput] if the outline is malformed, or an error from the store.
    pub fn import_categories<I>(&self, lines: I) -> Result<Vec<Category>, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Category::create_from_tree(read_tree(lines), &self.categories)
    }

    /// Add a category named `name` under `parent`, or at the root if `parent` is `None`.
    ///
    /// # Errors
    /// Returns [Error::InvalidInput] if the name is blank or the parent does not
    /// exist, or an error from the store.
    pub fn add_category(&self, name: &str, parent: Option<PrimaryKey>) -> Result<Category, Error> {
        let name = validate_category_name(name)?;
        self.ensure_category_exists_if_set(parent)?;

        let mut category = Category::new(name, parent);
        self.categories.add(&mut category)?;

        Ok(category)
    }

    /// Rename or move a category.
    ///
    /// # Errors
    /// Returns [Error::InvalidInput] if the name is blank, the parent does not
    /// exist or the move would make the category its own ancestor,
    /// [Error::InvalidState] if the category has no key, or an error from the store.
    pub fn update_category(&self, category: &Category) -> Result<(), Error> {
        let category = Category {
            name: validate_category_name(&category.name)?.to_owned(),
            ..category.clone()
        };
        self.ensure_category_exists_if_set(category.parent)?;

        let categories = self.categories.get_all(None)?;
        let parents: HashMap<PrimaryKey, Option<PrimaryKey>> = categories
            .iter()
            .map(|category| (category.pk, category.parent))
            .collect();

        // Stored data may already hold a cycle that does not pass through `category`.
        let mut ancestor = category.parent;
        for _ in 0..=parents.len() {
            let Some(pk) = ancestor else {
                break;
            };

            if pk == category.pk {
                return Err(Error::InvalidInput(format!(
                    "category \"{}\" cannot be placed under itself",
                    category.name
                )));
            }
            ancestor = parents.get(&pk).copied().flatten();
        }

        self.categories.update(&category)
    }

    /// Delete the categories with the given keys.
    ///
    /// Expenses and subcategories that refer to a deleted category keep the key.
    ///
    /// # Errors
    /// Returns [Error::NotFound] for the first key that does not exist; the
    /// categories before it are still deleted.
    pub fn delete_categories(&self, pks: &[PrimaryKey]) -> Result<(), Error> {
        for &pk in pks {
            self.categories.delete(pk)?;
        }

        Ok(())
    }

    /// Get every category with its parent's name.
    ///
    /// # Errors
    /// Returns an error from the store.
    pub fn category_rows(&self) -> Result<Vec<CategoryRow>, Error> {
        let categories = self.categories.get_all(None)?;
        let names = names_by_key(&categories);

        Ok(categories
            .iter()
            .map(|category| CategoryRow {
                pk: category.pk,
                name: category.name.clone(),
                parent: category.parent.map(|parent| display_name(&names, parent)),
            })
            .collect())
    }

    /// Record an expense and update the budgets.
    ///
    /// # Errors
    /// Returns [Error::InvalidInput] if the category does not exist or a budget
    /// total would overflow, [Error::InvalidState] if the expense already has a
    /// key, or an error from the stores.
    pub fn add_expense(&self, mut expense: Expense, today: Date) -> Result<Expense, Error> {
        self.ensure_category_exists(expense.category)?;

        let mut expenses = self.expenses.get_all(None)?;
        expenses.push(expense.clone());
        ensure_totals_fit(&expenses, today)?;

        self.expenses.add(&mut expense)?;
        self.recompute_budgets(today)?;

        Ok(expense)
    }

    /// Overwrite an expense and update the budgets.
    ///
    /// # Errors
    /// Returns [Error::InvalidInput] if the category does not exist or a budget
    /// total would overflow, [Error::InvalidState] if the expense has no key, or
    /// an error from the stores.
    pub fn update_expense(&self, expense: &Expense, today: Date) -> Result<(), Error> {
        self.ensure_category_exists(expense.category)?;

        let mut expenses = self.expenses.get_all(None)?;
        expenses.retain(|stored| stored.pk != expense.pk);
        expenses.push(expense.clone());
        ensure_totals_fit(&expenses, today)?;

        self.expenses.update(expense)?;
        self.recompute_budgets(today)?;

        Ok(())
    }

    /// Delete the expenses with the given keys and update the budgets.
    ///
    /// # Errors
    /// Returns [Error::NotFound] for the first key that does not exist; the
    /// expenses before it are still deleted and the budgets still updated.
    pub fn delete_expenses(&self, pks: &[PrimaryKey], today: Date) -> Result<(), Error> {
        let deleted = pks.iter().try_for_each(|&pk| self.expenses.delete(pk));

        self.recompute_budgets(today)?;

        deleted
    }

    /// Get the expenses whose comment matches `comment_pattern`, or every
    /// expense, with category names.
    ///
    /// # Errors
    /// Returns an error from the stores.
    pub fn expense_rows(&self, comment_pattern: Option<&str>) -> Result<Vec<ExpenseRow>, Error> {
        let filter = comment_pattern.map(|pattern| Filter::new().field("comment", pattern));
        let expenses = self.expenses.get_all(filter.as_ref())?;
        let categories = self.categories.get_all(None)?;
        let names = names_by_key(&categories);

        Ok(expenses
            .into_iter()
            .map(|expense| ExpenseRow {
                pk: expense.pk,
                amount: expense.amount,
                category: display_name(&names, expense.category),
                expense_date: expense.expense_date,
                comment: expense.comment,
            })
            .collect())
    }

    /// Recompute how much has been spent in each budget period ending `today`
    /// and store it, keeping the limits.
    ///
    /// Returns the updated budget rows.
    ///
    /// # Errors
    /// Returns an error from the stores.
    pub fn recompute_budgets(&self, today: Date) -> Result<Vec<Budget>, Error> {
        let expenses = self.expenses.get_all(None)?;
        let mut budgets = self.budgets.get_all(None)?;

        for budget in budgets.iter_mut() {
            budget.amount = budget.time.total_spent(&expenses, today)?;
            self.budgets.update(budget)?;
        }

        tracing::debug!("recomputed budgets for {today}: {budgets:?}");

        Ok(budgets)
    }

    /// Change the spending limit for `period` and update the budgets.
    ///
    /// # Errors
    /// Returns [Error::InvalidInput] if the limit is negative,
    /// [Error::InvalidState] if there is no budget row for `period`, or an
    /// error from the stores.
    pub fn set_budget_limit(
        &self,
        period: BudgetPeriod,
        limit: i64,
        today: Date,
    ) -> Result<Vec<Budget>, Error> {
        if limit < 0 {
            return Err(Error::InvalidInput(format!(
                "the budget limit must not be negative, got {limit}"
            )));
        }

        let filter = Filter::new().field("time", period.label());
        let mut budget = self
            .budgets
            .get_all(Some(&filter))?
            .into_iter()
            .next()
            .ok_or_else(|| Error::InvalidState(format!("there is no budget for the {period}")))?;

        budget.budget = limit;
        self.budgets.update(&budget)?;

        self.recompute_budgets(today)
    }

    fn ensure_category_exists(&self, pk: PrimaryKey) -> Result<(), Error> {
        match self.categories.get(pk)? {
            Some(_) => Ok(()),
            None => Err(Error::InvalidInput(format!(
                "there is no category with the key {pk}"
            ))),
        }
    }

    fn ensure_category_exists_if_set(&self, pk: Option<PrimaryKey>) -> Result<(), Error> {
        match pk {
            Some(pk) => self.ensure_category_exists(pk),
            None => Ok(()),
        }
    }
}

fn ensure_totals_fit(expenses: &[Expense], today: Date) -> Result<(), Error> {
    for period in BudgetPeriod::ALL {
        period.total_spent(expenses, today)?;
    }

    Ok(())
}

fn validate_category_name(name: &str) -> Result<&str, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::InvalidInput(
            "category name cannot be empty".to_owned(),
        ));
    }

    Ok(name)
}

fn names_by_key(categories: &[Category]) -> HashMap<PrimaryKey, &str> {
    categories
        .iter()
        .map(|category| (category.pk, category.name.as_str()))
        .collect()
}

fn display_name(names: &HashMap<PrimaryKey, &str>, pk: PrimaryKey) -> String {
    names
        .get(&pk)
        .map_or_else(|| pk.to_string(), |name| (*name).to_owned())
}

#[cfg(test)]
mod ledger_tests {
    use rusqlite::Connection;
    use time::{Duration, macros::date};

    use crate::{
        Error, PrimaryKey,
        budget::{Budget, BudgetPeriod},
        category::Category,
        expense::Expense,
        stores::{MemoryStore, Store},
    };

    use super::{
        CategoryRow, DEFAULT_CATEGORIES, Ledger, SQLiteLedger, create_sqlite_ledger,
    };

    type MemoryLedger = Ledger<MemoryStore<Category>, MemoryStore<Expense>, MemoryStore<Budget>>;

    const TODAY: time::Date = date!(2024 - 06 - 15);

    fn memory_ledger() -> MemoryLedger {
        let ledger = Ledger::new(MemoryStore::new(), MemoryStore::new(), MemoryStore::new());
        ledger.seed_defaults(TODAY).unwrap();
        ledger
    }

    fn sqlite_ledger() -> SQLiteLedger {
        let ledger = create_sqlite_ledger(Connection::open_in_memory().unwrap()).unwrap();
        ledger.seed_defaults(TODAY).unwrap();
        ledger
    }

    fn amounts(budgets: &[Budget]) -> Vec<(BudgetPeriod, i64, i64)> {
        budgets
            .iter()
            .map(|budget| (budget.time, budget.amount, budget.budget))
            .collect()
    }

    #[test]
    fn seeds_budgets_with_keys_one_to_three() {
        let ledger = sqlite_ledger();

        let budgets = ledger.budgets().get_all(None).unwrap();

        assert_eq!(
            budgets
                .iter()
                .map(|budget| (budget.pk, budget.time, budget.amount, budget.budget))
                .collect::<Vec<_>>(),
            vec![
                (1, BudgetPeriod::Day, 0, 1000),
                (2, BudgetPeriod::Week, 0, 7000),
                (3, BudgetPeriod::Month, 0, 30000),
            ]
        );
    }

    #[test]
    fn seeds_default_categories_at_the_root() {
        let ledger = memory_ledger();

        let categories = ledger.categories().get_all(None).unwrap();

        assert_eq!(
            categories
                .iter()
                .map(|category| category.name.as_str())
                .collect::<Vec<_>>(),
            DEFAULT_CATEGORIES
        );
        assert!(categories.iter().all(|category| category.parent.is_none()));
    }

    #[test]
    fn seeding_twice_changes_nothing() {
        let ledger = memory_ledger();
        ledger.set_budget_limit(BudgetPeriod::Day, 5, TODAY).unwrap();

        ledger.seed_defaults(TODAY).unwrap();

        assert_eq!(
            ledger.categories().get_all(None).unwrap().len(),
            DEFAULT_CATEGORIES.len()
        );
        let budgets = ledger.budgets().get_all(None).unwrap();
        assert_eq!(budgets.len(), 3);
        assert_eq!(budgets[0].budget, 5);
    }

    #[test]
    fn expense_today_counts_towards_every_budget() {
        for ledger in [&memory_ledger() as &dyn ExpenseLedger, &sqlite_ledger()] {
            ledger.record(Expense::new(500, 1, TODAY, "lunch"));

            assert_eq!(
                amounts(&ledger.budget_rows()),
                vec![
                    (BudgetPeriod::Day, 500, 1000),
                    (BudgetPeriod::Week, 500, 7000),
                    (BudgetPeriod::Month, 500, 30000),
                ]
            );
        }
    }

    #[test]
    fn older_expenses_only_count_towards_longer_periods() {
        let ledger = memory_ledger();

        ledger
            .add_expense(Expense::new(10, 1, TODAY - Duration::days(3), ""), TODAY)
            .unwrap();
        ledger
            .add_expense(Expense::new(100, 1, TODAY - Duration::days(20), ""), TODAY)
            .unwrap();
        ledger
            .add_expense(Expense::new(1000, 1, TODAY - Duration::days(40), ""), TODAY)
            .unwrap();

        assert_eq!(
            amounts(&ledger.budgets().get_all(None).unwrap()),
            vec![
                (BudgetPeriod::Day, 0, 1000),
                (BudgetPeriod::Week, 10, 7000),
                (BudgetPeriod::Month, 110, 30000),
            ]
        );
    }

    #[test]
    fn updating_and_deleting_expenses_recomputes_budgets() {
        let ledger = sqlite_ledger();
        let mut expense = ledger
            .add_expense(Expense::new(500, 1, TODAY, ""), TODAY)
            .unwrap();

        expense.amount = 200;
        ledger.update_expense(&expense, TODAY).unwrap();
        assert_eq!(ledger.budgets().get(1).unwrap().unwrap().amount, 200);

        ledger.delete_expenses(&[expense.pk], TODAY).unwrap();
        assert_eq!(ledger.budgets().get(1).unwrap().unwrap().amount, 0);
    }

    #[test]
    fn overflowing_expense_is_rejected_before_storing() {
        for ledger in [&memory_ledger() as &dyn ExpenseLedger, &sqlite_ledger()] {
            ledger.record(Expense::new(i64::MAX, 1, TODAY, ""));

            let result = ledger.try_record(Expense::new(1, 1, TODAY, ""));

            assert!(matches!(result, Err(Error::InvalidInput(_))));
            assert_eq!(ledger.expense_count(), 1);
            assert_eq!(ledger.budget_rows()[0].amount, i64::MAX);
        }
    }

    #[test]
    fn overflowing_update_is_rejected() {
        let ledger = memory_ledger();
        ledger
            .add_expense(Expense::new(i64::MAX, 1, TODAY, ""), TODAY)
            .unwrap();
        let mut expense = ledger
            .add_expense(Expense::new(0, 1, TODAY, ""), TODAY)
            .unwrap();

        expense.amount = 1;
        let result = ledger.update_expense(&expense, TODAY);

        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(ledger.expenses().get(expense.pk).unwrap().unwrap().amount, 0);
    }

    #[test]
    fn updating_large_expense_in_place_is_allowed() {
        let ledger = memory_ledger();
        let mut expense = ledger
            .add_expense(Expense::new(i64::MAX, 1, TODAY, ""), TODAY)
            .unwrap();

        expense.amount = i64::MAX - 1;
        ledger.update_expense(&expense, TODAY).unwrap();

        assert_eq!(ledger.budgets().get(1).unwrap().unwrap().amount, i64::MAX - 1);
    }

    #[test]
    fn deleting_with_missing_key_still_recomputes_budgets() {
        for ledger in [&memory_ledger() as &dyn ExpenseLedger, &sqlite_ledger()] {
            let pk = ledger.record(Expense::new(500, 1, TODAY, ""));

            let result = ledger.delete(&[pk, 999]);

            assert!(matches!(result, Err(Error::NotFound { pk: 999, .. })));
            assert_eq!(ledger.expense_count(), 0);
            assert!(ledger.budget_rows().iter().all(|budget| budget.amount == 0));
        }
    }

    #[test]
    fn seeding_later_moves_budget_windows() {
        for ledger in [&memory_ledger() as &dyn ExpenseLedger, &sqlite_ledger()] {
            ledger.record(Expense::new(500, 1, TODAY, ""));

            ledger.seed(TODAY + Duration::days(60));

            assert!(ledger.budget_rows().iter().all(|budget| budget.amount == 0));
        }
    }

    #[test]
    fn expense_needs_existing_category() {
        let ledger = memory_ledger();

        let result = ledger.add_expense(Expense::new(500, 999, TODAY, ""), TODAY);

        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(ledger.expenses().get_all(None), Ok(vec![]));
    }

    #[test]
    fn set_budget_limit_keeps_spending() {
        let ledger = memory_ledger();
        ledger
            .add_expense(Expense::new(500, 1, TODAY, ""), TODAY)
            .unwrap();

        let budgets = ledger
            .set_budget_limit(BudgetPeriod::Week, 100, TODAY)
            .unwrap();

        assert_eq!(budgets[1].budget, 100);
        assert_eq!(budgets[1].amount, 500);
        assert_eq!(budgets[1].remaining(), -400);
    }

    #[test]
    fn set_budget_limit_rejects_negative_limit() {
        let ledger = memory_ledger();

        let result = ledger.set_budget_limit(BudgetPeriod::Week, -1, TODAY);

        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn set_budget_limit_without_row_fails() {
        let ledger: MemoryLedger =
            Ledger::new(MemoryStore::new(), MemoryStore::new(), MemoryStore::new());

        let result = ledger.set_budget_limit(BudgetPeriod::Week, 10, TODAY);

        assert!(matches!(result, Err(Error::InvalidState(_))));
    }

    #[test]
    fn expense_rows_show_category_names() {
        let ledger = memory_ledger();
        let books = ledger
            .categories()
            .get_all(Some(&crate::Filter::new().field("name", "books")))
            .unwrap()
            .remove(0);
        ledger
            .add_expense(Expense::new(30, books.pk, TODAY, "novel"), TODAY)
            .unwrap();
        ledger
            .add_expense(Expense::new(5, 1, TODAY, "bread"), TODAY)
            .unwrap();
        ledger.delete_categories(&[1]).unwrap();

        let rows = ledger.expense_rows(None).unwrap();

        assert_eq!(rows[0].category, "books");
        assert_eq!(rows[0].comment, "novel");
        assert_eq!(rows[1].category, "1");
    }

    #[test]
    fn expense_rows_filter_by_comment() {
        let ledger = memory_ledger();
        ledger
            .add_expense(Expense::new(30, 1, TODAY, "Novel"), TODAY)
            .unwrap();
        ledger
            .add_expense(Expense::new(5, 1, TODAY, "bread"), TODAY)
            .unwrap();

        let rows = ledger.expense_rows(Some("nov%")).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 30);
    }

    #[test]
    fn category_rows_show_parent_names() {
        let ledger = sqlite_ledger();
        let food = ledger.add_category("food", None).unwrap();
        let snacks = ledger.add_category("snacks", Some(food.pk)).unwrap();

        let rows = ledger.category_rows().unwrap();

        assert_eq!(
            rows.last(),
            Some(&CategoryRow {
                pk: snacks.pk,
                name: "snacks".to_owned(),
                parent: Some("food".to_owned()),
            })
        );
    }

    #[test]
    fn add_category_validates_input() {
        let ledger = memory_ledger();

        assert!(matches!(
            ledger.add_category("  ", None),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            ledger.add_category("orphan", Some(999)),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn add_category_trims_name() {
        let ledger = memory_ledger();

        let category = ledger.add_category("  pets ", None).unwrap();

        assert_eq!(category.name, "pets");
    }

    #[test]
    fn update_category_renames_and_moves() {
        let ledger = memory_ledger();
        let food = ledger.add_category("food", None).unwrap();
        let mut snacks = ledger.add_category("snack", None).unwrap();

        snacks.name = "snacks".to_owned();
        snacks.parent = Some(food.pk);
        ledger.update_category(&snacks).unwrap();

        assert_eq!(ledger.categories().get(snacks.pk), Ok(Some(snacks)));
    }

    #[test]
    fn update_category_trims_name() {
        let ledger = memory_ledger();
        let mut pets = ledger.add_category("pets", None).unwrap();

        pets.name = "  animals ".to_owned();
        ledger.update_category(&pets).unwrap();

        assert_eq!(ledger.categories().get(pets.pk).unwrap().unwrap().name, "animals");
    }

    #[test]
    fn update_category_rejects_cycles() {
        let ledger = memory_ledger();
        let mut food = ledger.add_category("food", None).unwrap();
        let snacks = ledger.add_category("snacks", Some(food.pk)).unwrap();

        food.parent = Some(snacks.pk);
        let under_child = ledger.update_category(&food);
        food.parent = Some(food.pk);
        let under_itself = ledger.update_category(&food);

        assert!(matches!(under_child, Err(Error::InvalidInput(_))));
        assert!(matches!(under_itself, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn import_categories_builds_hierarchy() {
        let ledger = sqlite_ledger();

        let created = ledger
            .import_categories(["pets", "    food", "    vet"])
            .unwrap();

        assert_eq!(created[1].parent, Some(created[0].pk));
        assert_eq!(created[2].parent, Some(created[0].pk));
    }

    #[test]
    fn delete_missing_category_fails() {
        let ledger = memory_ledger();

        let result = ledger.delete_categories(&[999]);

        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    /// Lets one test body run against ledgers over different stores.
    trait ExpenseLedger {
        fn try_record(&self, expense: Expense) -> Result<Expense, Error>;
        fn record(&self, expense: Expense) -> PrimaryKey;
        fn delete(&self, pks: &[PrimaryKey]) -> Result<(), Error>;
        fn seed(&self, today: time::Date);
        fn expense_count(&self) -> usize;
        fn budget_rows(&self) -> Vec<Budget>;
    }

    impl<C, E, B> ExpenseLedger for Ledger<C, E, B>
    where
        C: Store<Category>,
        E: Store<Expense>,
        B: Store<Budget>,
    {
        fn try_record(&self, expense: Expense) -> Result<Expense, Error> {
            self.add_expense(expense, TODAY)
        }

        fn record(&self, expense: Expense) -> PrimaryKey {
            self.add_expense(expense, TODAY).unwrap().pk
        }

        fn delete(&self, pks: &[PrimaryKey]) -> Result<(), Error> {
            self.delete_expenses(pks, TODAY)
        }

        fn seed(&self, today: time::Date) {
            self.seed_defaults(today).unwrap();
        }

        fn expense_count(&self) -> usize {
            self.expenses.get_all(None).unwrap().len()
        }

        fn budget_rows(&self) -> Vec<Budget> {
            self.budgets.get_all(None).unwrap()
        }
    }
}
