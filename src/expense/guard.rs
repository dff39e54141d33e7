//! Checks that a user may act on an expense.

use rusqlite::Connection;

use crate::{
    Error,
    expense::{Expense, ExpenseId, get_expense},
    user::UserID,
};

fn check_owner(session_user: UserID, expense: &Expense) -> Result<(), Error> {
    if expense.user_id == session_user {
        Ok(())
    } else {
        tracing::warn!(
            "user {session_user} tried to access expense {} owned by user {}",
            expense.id,
            expense.user_id
        );
        Err(Error::Forbidden)
    }
}

/// Fetch an expense only if it belongs to `session_user`.
///
/// # Errors
///
/// Returns [Error::NotFound] if the expense doesn't exist, or
/// [Error::Forbidden] if it belongs to another user.
pub fn get_owned_expense(
    expense_id: ExpenseId,
    session_user: UserID,
    connection: &Connection,
) -> Result<Expense, Error> {
    let expense = get_expense(expense_id, connection)?;
    check_owner(session_user, &expense)?;

    Ok(expense)
}
