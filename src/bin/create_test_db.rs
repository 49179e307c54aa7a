use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use bookkeeper::{Expense, Filter, Store, create_sqlite_ledger};

/// A utility for creating a test database for bookkeeper.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Sample expenses as (days ago, amount, category name, comment).
const SAMPLE_EXPENSES: &[(i64, i64, &str, &str)] = &[
    (0, 250, "groceries", "bread and milk"),
    (1, 1200, "restaurants", "dinner"),
    (3, 90, "transport", "bus fare"),
    (6, 2500, "books", "textbook"),
    (12, 4300, "clothes", "winter coat"),
    (25, 800, "medicine", "pharmacy"),
    (45, 1500, "entertainment", "concert"),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;
    let ledger = create_sqlite_ledger(conn)?;
    let today = OffsetDateTime::now_utc().date();

    ledger.seed_defaults(today)?;

    println!("Creating sample expenses...");

    for &(days_ago, amount, category_name, comment) in SAMPLE_EXPENSES {
        let category = ledger
            .categories()
            .get_all(Some(&Filter::new().field("name", category_name)))?
            .into_iter()
            .next()
            .ok_or_else(|| format!("missing default category {category_name:?}"))?;

        ledger.add_expense(
            Expense::new(
                amount,
                category.pk,
                today - Duration::days(days_ago),
                comment,
            ),
            today,
        )?;
    }

    println!("Success!");

    Ok(())
}
