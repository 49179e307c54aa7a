use std::{fs, path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use serde::Serialize;
use time::{Date, macros::format_description};

use bookkeeper::{
    BudgetPeriod, Category, Error, Expense, PrimaryKey, SQLiteLedger, Store, create_sqlite_ledger,
    setup_logging, today_in,
};

/// Track expenses by category against daily, weekly and monthly budgets.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, default_value = "bookkeeper.db")]
    db_path: PathBuf,

    /// The canonical timezone that decides what "today" is, e.g. "Pacific/Auckland".
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// Also append debug logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database and seed the default categories and budgets.
    Init,

    /// Record an expense.
    AddExpense {
        /// The amount of money spent.
        #[arg(long)]
        amount: i64,
        /// The key of the expense's category.
        #[arg(long)]
        category: PrimaryKey,
        /// When the money was spent (YYYY-MM-DD), defaults to today.
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
        /// A free-form note.
        #[arg(long, default_value = "")]
        comment: String,
    },

    /// Overwrite an expense.
    UpdateExpense {
        /// The key of the expense to overwrite.
        pk: PrimaryKey,
        /// The amount of money spent.
        #[arg(long)]
        amount: i64,
        /// The key of the expense's category.
        #[arg(long)]
        category: PrimaryKey,
        /// When the money was spent (YYYY-MM-DD), defaults to today.
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
        /// A free-form note.
        #[arg(long, default_value = "")]
        comment: String,
    },

    /// Delete expenses.
    DeleteExpense {
        /// The keys of the expenses to delete.
        #[arg(required = true)]
        pks: Vec<PrimaryKey>,
    },

    /// List expenses.
    Expenses {
        /// Only list expenses whose comment matches this pattern (`%` and `_` are wildcards).
        #[arg(long)]
        comment: Option<String>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Show how much has been spent against each budget.
    Budgets {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Change the spending limit of a budget.
    SetBudget {
        /// The budget period: day, week or month.
        period: BudgetPeriod,
        /// The new limit.
        limit: i64,
    },

    /// List categories.
    Categories {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Add a category.
    AddCategory {
        /// The name of the category.
        name: String,
        /// The key of the parent category, omit for a top-level category.
        #[arg(long)]
        parent: Option<PrimaryKey>,
    },

    /// Rename or move a category.
    UpdateCategory {
        /// The key of the category to change.
        pk: PrimaryKey,
        /// The new name.
        name: String,
        /// The key of the new parent category, omit for a top-level category.
        #[arg(long)]
        parent: Option<PrimaryKey>,
    },

    /// Delete categories.
    DeleteCategory {
        /// The keys of the categories to delete.
        #[arg(required = true)]
        pks: Vec<PrimaryKey>,
    },

    /// Add the categories from a text outline, one name per line, four spaces per nesting level.
    ImportCategories {
        /// The outline file.
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = setup_logging(args.log_file.as_deref()) {
        eprintln!("Could not open log file: {error}");
        return ExitCode::FAILURE;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Error> {
    let today = today_in(&args.timezone)?;

    let connection = Connection::open(&args.db_path)?;
    let ledger = create_sqlite_ledger(connection)?;
    ledger.seed_defaults(today)?;

    match args.command {
        Command::Init => {
            println!("Database ready at {:#?}", args.db_path);
        }
        Command::AddExpense {
            amount,
            category,
            date,
            comment,
        } => {
            let expense = Expense::new(amount, category, date.unwrap_or(today), comment);
            let expense = ledger.add_expense(expense, today)?;
            println!("Added expense {}", expense.pk);
            print_budgets(&ledger, false)?;
        }
        Command::UpdateExpense {
            pk,
            amount,
            category,
            date,
            comment,
        } => {
            let mut expense = Expense::new(amount, category, date.unwrap_or(today), comment);
            expense.pk = pk;
            ledger.update_expense(&expense, today)?;
            print_budgets(&ledger, false)?;
        }
        Command::DeleteExpense { pks } => {
            ledger.delete_expenses(&pks, today)?;
            print_budgets(&ledger, false)?;
        }
        Command::Expenses { comment, json } => {
            let rows = ledger.expense_rows(comment.as_deref())?;

            if json {
                print_json(&rows)?;
            } else {
                println!("{:>5}  {:>10}  {:<10}  {:<20}  comment", "pk", "amount", "date", "category");
                for row in rows {
                    println!(
                        "{:>5}  {:>10}  {:<10}  {:<20}  {}",
                        row.pk, row.amount, row.expense_date, row.category, row.comment
                    );
                }
            }
        }
        Command::Budgets { json } => print_budgets(&ledger, json)?,
        Command::SetBudget { period, limit } => {
            ledger.set_budget_limit(period, limit, today)?;
            print_budgets(&ledger, false)?;
        }
        Command::Categories { json } => {
            let rows = ledger.category_rows()?;

            if json {
                print_json(&rows)?;
            } else {
                println!("{:>5}  {:<25}  parent", "pk", "name");
                for row in rows {
                    println!(
                        "{:>5}  {:<25}  {}",
                        row.pk,
                        row.name,
                        row.parent.unwrap_or_default()
                    );
                }
            }
        }
        Command::AddCategory { name, parent } => {
            let category = ledger.add_category(&name, parent)?;
            println!("Added category {}", category.pk);
        }
        Command::UpdateCategory { pk, name, parent } => {
            let mut category = Category::new(name, parent);
            category.pk = pk;
            ledger.update_category(&category)?;
        }
        Command::DeleteCategory { pks } => ledger.delete_categories(&pks)?,
        Command::ImportCategories { file } => {
            let outline = fs::read_to_string(&file).map_err(|error| {
                Error::InvalidInput(format!("could not read {}: {error}", file.display()))
            })?;
            let created = ledger.import_categories(outline.lines())?;
            println!("Added {} categories", created.len());
        }
    }

    Ok(())
}

fn print_budgets(ledger: &SQLiteLedger, json: bool) -> Result<(), Error> {
    let budgets = ledger.budgets().get_all(None)?;

    if json {
        return print_json(&budgets);
    }

    println!("{:<6}  {:>10}  {:>10}  {:>10}", "period", "spent", "budget", "remaining");
    for budget in budgets {
        println!(
            "{:<6}  {:>10}  {:>10}  {:>10}",
            budget.time.label(),
            budget.amount,
            budget.budget,
            budget.remaining()
        );
    }

    Ok(())
}

fn print_json(value: &impl Serialize) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

fn parse_date(text: &str) -> Result<Date, String> {
    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map_err(|error| format!("expected a date like 2024-01-31: {error}"))
}
