use std::{error::Error, path::PathBuf};

use clap::Parser;
use rusqlite::{Connection, OpenFlags};
use time::{Duration, OffsetDateTime};

use outlay_rs::{
    Amount, Category, Description, Email, NewExpense, NewUser, PasswordHash, StrongPassword,
    Username, create_expense, create_user, initialize_db,
};

/// Seed a new Outlay database with an account and some spending to look at.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Where to create the SQLite database. The file must not exist yet.
    #[arg(long, short)]
    output_path: PathBuf,

    /// How many days of sample expenses to create, ending today (UTC).
    #[arg(long, default_value_t = 14)]
    days: u32,
}

/// (category, description, cents), handed out in turn.
const SAMPLE_EXPENSES: [(&str, &str, i64); 8] = [
    ("Food", "Lunch", 1250),
    ("Transit", "Bus", 275),
    ("Food", "Groceries", 8640),
    ("Treats", "Coffee", 550),
    ("Transit", "Train", 510),
    ("Bills", "Phone", 3000),
    ("Food", "Dinner", 2200),
    ("Treats", "Movie", 1800),
];

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE;
    if args.output_path.exists() {
        return Err(format!("{} already exists", args.output_path.display()).into());
    }
    let connection = Connection::open_with_flags(&args.output_path, flags)?;
    initialize_db(&connection)?;

    let user = create_user(
        NewUser {
            email: Email::new("test@example.com")?,
            username: Username::new("test")?,
            password_hash: PasswordHash::create(
                &StrongPassword::trusted("test"),
                PasswordHash::DEFAULT_COST,
            )?,
        },
        &connection,
    )?;
    println!("Created user \"test\" with the password \"test\"");

    let today = OffsetDateTime::now_utc().date();
    let mut samples = SAMPLE_EXPENSES.iter().cycle();
    let mut created = 0;

    for days_ago in (0..args.days).rev() {
        let date = today - Duration::days(days_ago.into());

        // One to three expenses a day.
        for (category, description, cents) in samples.by_ref().take(1 + days_ago as usize % 3) {
            create_expense(
                NewExpense {
                    user_id: user.id,
                    category: Category::new(category)?,
                    description: Description::new(description)?,
                    amount: Amount::from_cents(*cents),
                    date,
                },
                &connection,
            )?;
            created += 1;
        }
    }

    println!(
        "Created {created} expenses over {} days in {}",
        args.days,
        args.output_path.display()
    );

    Ok(())
}
