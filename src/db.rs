//! Sets up the application's SQLite database and guards access to it.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{Error, expense::create_expense_table, user::create_user_table};

/// The single database connection shared by every request handler.
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Wrap an initialized connection so handlers can share it.
pub fn share(connection: Connection) -> SharedConnection {
    Arc::new(Mutex::new(connection))
}

/// Take the database lock for the rest of the caller's scope.
///
/// # Errors
///
/// Returns [Error::DatabaseLock] if another thread panicked while holding the lock.
pub fn lock(db: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, Error> {
    db.lock().map_err(|error| {
        tracing::error!("database lock is poisoned: {error}");
        Error::DatabaseLock
    })
}

/// Create the tables for users and expenses if they do not exist yet.
///
/// Foreign key enforcement is switched on for `connection` so that deleting a
/// user also deletes their expenses.
///
/// # Errors
///
/// Returns an [Error::Database] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // SQLite ignores this pragma inside a transaction.
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_expense_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
