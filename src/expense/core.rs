//! Database operations for expenses.

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    Error,
    expense::{Category, Description, Expense, ExpenseFields, ExpenseId, NewExpense},
    user::UserID,
};

/// Initialize the expense table and indexes.
///
/// The user table must exist first.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            category TEXT NOT NULL,
            description TEXT NOT NULL,
            amount INTEGER NOT NULL,
            date TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expense_user_date ON expense(user_id, date);
        CREATE INDEX IF NOT EXISTS idx_expense_user_category ON expense(user_id, category);",
    )?;

    Ok(())
}

/// Record an expense and return it with its generated ID.
pub fn create_expense(new_expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    connection.execute(
        "INSERT INTO expense (user_id, category, description, amount, date)
        VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            new_expense.user_id.as_i64(),
            new_expense.category.as_ref(),
            new_expense.description.as_ref(),
            new_expense.amount,
            new_expense.date,
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Expense {
        id,
        user_id: new_expense.user_id,
        category: new_expense.category,
        description: new_expense.description,
        amount: new_expense.amount,
        date: new_expense.date,
    })
}

/// Retrieve a single expense by ID.
///
/// This does not check who owns the expense, request handlers should use
/// [crate::expense::get_owned_expense] instead.
pub fn get_expense(expense_id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category, description, amount, date
            FROM expense WHERE id = :id;",
        )?
        .query_row(&[(":id", &expense_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve a user's expenses on `date` in the order they were recorded.
pub fn get_expenses_for_date(
    user_id: UserID,
    date: Date,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category, description, amount, date
            FROM expense WHERE user_id = ?1 AND date = ?2
            ORDER BY id ASC;",
        )?
        .query_map((user_id.as_i64(), date), map_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Update an expense's category, description and amount.
///
/// The date and owner of an expense never change.
///
/// # Errors
///
/// Returns [Error::NotFound] if the expense doesn't exist.
pub fn update_expense(
    expense_id: ExpenseId,
    fields: &ExpenseFields,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE expense SET category = ?1, description = ?2, amount = ?3 WHERE id = ?4",
        (
            fields.category.as_ref(),
            fields.description.as_ref(),
            fields.amount,
            expense_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete an expense by ID.
///
/// # Errors
///
/// Returns [Error::NotFound] if the expense doesn't exist.
pub fn delete_expense(expense_id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1", [expense_id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let raw_category: String = row.get(2)?;
    let raw_description: String = row.get(3)?;

    Ok(Expense {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        category: Category::new_unchecked(&raw_category),
        description: Description::new_unchecked(&raw_description),
        amount: row.get(4)?,
        date: row.get(5)?,
    })
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use rusqlite::Connection;
    use time::Date;

    use crate::{
        expense::{Amount, Category, Description, Expense, NewExpense, create_expense},
        user::UserID,
    };

    /// Insert an expense, panicking if it could not be created.
    #[track_caller]
    pub(crate) fn must_create_expense(
        user_id: UserID,
        category: &str,
        description: &str,
        cents: i64,
        date: Date,
        connection: &Connection,
    ) -> Expense {
        create_expense(
            NewExpense {
                user_id,
                category: Category::new(category).unwrap(),
                description: Description::new(description).unwrap(),
                amount: Amount::from_cents(cents),
                date,
            },
            connection,
        )
        .expect("Could not create test expense")
    }
}
