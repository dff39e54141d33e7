//! Expense deletion endpoint.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert,
    db,
    expense::{ExpenseId, ExpenseState, delete_expense, get_owned_expense},
    user::UserID,
};

/// Delete an expense owned by the logged in user and confirm with an alert.
pub async fn delete_expense_endpoint(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let deleted = db::lock(&state.db).and_then(|connection| {
        get_owned_expense(expense_id, user_id, &connection)?;
        delete_expense(expense_id, &connection)
    });

    match deleted {
        Ok(()) => {
            tracing::debug!("user {user_id} deleted expense {expense_id}");
            Alert::SuccessSimple {
                message: "Expense deleted successfully".to_owned(),
            }
            .into_response()
        }
        Err(error) => {
            tracing::debug!("could not delete expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}
