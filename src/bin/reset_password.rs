use std::{io, path::PathBuf, process::ExitCode};

use clap::Parser;
use rusqlite::{Connection, OpenFlags};

use outlay_rs::{PasswordHash, StrongPassword, Username, get_user_by_username, update_password};

/// Set a new password for an Outlay account.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "OUTLAY_DB_PATH")]
    db_path: PathBuf,

    /// The username of the account to reset.
    #[arg(long)]
    username: String,
}

fn main() -> ExitCode {
    match run(&Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("\x1b[31;1m{message}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    // Without SQLITE_OPEN_CREATE, a mistyped path fails instead of creating an empty database.
    let connection = Connection::open_with_flags(&args.db_path, OpenFlags::SQLITE_OPEN_READ_WRITE)
        .map_err(|error| format!("Could not open {}: {error}", args.db_path.display()))?;

    let username = Username::new(&args.username).map_err(|error| error.to_string())?;
    let user = get_user_by_username(&username, &connection)
        .map_err(|error| error.to_string())?
        .ok_or_else(|| format!("There is no user named \"{username}\"."))?;

    println!("Resetting the password for {} ({})", user.username, user.email);

    let Some(password) = prompt_new_password()? else {
        return Ok(());
    };
    let password_hash = PasswordHash::create(&password, PasswordHash::DEFAULT_COST)
        .map_err(|error| format!("Could not hash the password: {error}"))?;
    update_password(user.id, &password_hash, &connection).map_err(|error| error.to_string())?;

    println!("Password updated.");

    Ok(())
}

/// Ask until the same strong password is typed twice. `None` means the input
/// ended first.
fn prompt_new_password() -> Result<Option<StrongPassword>, String> {
    loop {
        let Some(first) = prompt("New password: ")? else {
            return Ok(None);
        };
        let password = match StrongPassword::check(&first) {
            Ok(password) => password,
            Err(error) => {
                eprintln!("{error}");
                continue;
            }
        };

        let Some(second) = prompt("Type it again: ")? else {
            return Ok(None);
        };
        if first == second {
            return Ok(Some(password));
        }

        eprintln!("The passwords do not match, try again.");
    }
}

fn prompt(message: &str) -> Result<Option<String>, String> {
    match rpassword::prompt_password(message) {
        Ok(password) => Ok(Some(password)),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(error) => Err(format!("Could not read the password: {error}")),
    }
}
