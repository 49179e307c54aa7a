//! Defines the `Budget` record: a spending limit and the running total for a period ending today.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Row,
    types::{FromSql, FromSqlError, FromSqlResult, Value, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::{
    Error, PrimaryKey, UNSET_PK,
    expense::Expense,
    record::{Field, FieldKind, Record},
};

/// The span of time a budget covers, counted back from today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    /// The last day.
    Day,
    /// The last week.
    Week,
    /// The last 30 days.
    Month,
}

impl BudgetPeriod {
    /// Every period, in the order their budget rows are created.
    pub const ALL: [BudgetPeriod; 3] = [BudgetPeriod::Day, BudgetPeriod::Week, BudgetPeriod::Month];

    /// The label stored in the `time` column.
    pub fn label(self) -> &'static str {
        match self {
            BudgetPeriod::Day => "day",
            BudgetPeriod::Week => "week",
            BudgetPeriod::Month => "month",
        }
    }

    /// How far back from today the period reaches.
    pub fn lookback(self) -> Duration {
        match self {
            BudgetPeriod::Day => Duration::days(1),
            BudgetPeriod::Week => Duration::days(7),
            BudgetPeriod::Month => Duration::days(30),
        }
    }

    /// The limit a freshly seeded budget row gets.
    pub fn default_limit(self) -> i64 {
        match self {
            BudgetPeriod::Day => 1000,
            BudgetPeriod::Week => 7000,
            BudgetPeriod::Month => 30000,
        }
    }

    /// The earliest date that counts towards the period, inclusive.
    pub fn window_start(self, today: Date) -> Date {
        today.checked_sub(self.lookback()).unwrap_or(Date::MIN)
    }

    /// The total amount of the expenses that fall within the period ending `today`.
    ///
    /// Expenses dated after `today` are counted too.
    ///
    /// # Errors
    /// Returns [Error::InvalidInput] if the total does not fit in an `i64`.
    pub fn total_spent<'a>(
        self,
        expenses: impl IntoIterator<Item = &'a Expense>,
        today: Date,
    ) -> Result<i64, Error> {
        let start = self.window_start(today);

        expenses
            .into_iter()
            .filter(|expense| expense.expense_date >= start)
            .try_fold(0_i64, |total, expense| {
                total.checked_add(expense.amount).ok_or_else(|| {
                    Error::InvalidInput(format!("the total spent in the {self} is too large"))
                })
            })
    }
}

impl Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for BudgetPeriod {
    type Err = Error;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        BudgetPeriod::ALL
            .into_iter()
            .find(|period| period.label() == label)
            .ok_or_else(|| Error::InvalidInput(format!("\"{label}\" is not a budget period")))
    }
}

impl FromSql for BudgetPeriod {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// The spending limit for a period and how much has been spent in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// The period the budget covers.
    pub time: BudgetPeriod,
    /// The amount spent in the period, recomputed from the expenses.
    pub amount: i64,
    /// The spending limit set by the user.
    pub budget: i64,
    /// The primary key of the budget.
    pub pk: PrimaryKey,
}

impl Budget {
    /// Create a budget with nothing spent that has not been added to a store yet.
    pub fn new(time: BudgetPeriod, budget: i64) -> Self {
        Self {
            time,
            amount: 0,
            budget,
            pk: UNSET_PK,
        }
    }

    /// How much is left before the limit is reached, negative when over budget.
    ///
    /// Saturates at the bounds of `i64`.
    pub fn remaining(&self) -> i64 {
        self.budget.saturating_sub(self.amount)
    }
}

impl Record for Budget {
    const TABLE: &'static str = "budget";
    const FIELDS: &'static [Field] = &[
        Field::new("time", FieldKind::Text),
        Field::new("amount", FieldKind::Integer),
        Field::new("budget", FieldKind::Integer),
    ];

    fn pk(&self) -> PrimaryKey {
        self.pk
    }

    fn set_pk(&mut self, pk: PrimaryKey) {
        self.pk = pk;
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.time.label().to_owned()),
            Value::Integer(self.amount),
            Value::Integer(self.budget),
        ]
    }

    fn map_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            pk: row.get(0)?,
            time: row.get(1)?,
            amount: row.get(2)?,
            budget: row.get(3)?,
        })
    }
}
