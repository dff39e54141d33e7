//! The endpoint for recording a new expense.

use axum::{
    Extension, Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    db, endpoints,
    expense::{ExpenseFields, ExpenseForm, ExpenseState, NewExpense, create_expense},
    timezone::local_today,
    user::UserID,
};

/// Record an expense against today's date in the server's timezone, then
/// redirect to the page for today.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let fields = match ExpenseFields::try_from(&form) {
        Ok(fields) => fields,
        Err(error) => {
            tracing::debug!("rejected new expense from user {user_id}: {error}");
            return error.into_alert_response();
        }
    };

    let today = match local_today(&state.timezone) {
        Ok(today) => today,
        Err(error) => {
            tracing::error!("could not get today's date: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match db::lock(&state.db) {
        Ok(connection) => connection,
        Err(error) => return error.into_alert_response(),
    };

    let new_expense = NewExpense {
        user_id,
        category: fields.category,
        description: fields.description,
        amount: fields.amount,
        date: today,
    };

    match create_expense(new_expense, &connection) {
        Ok(expense) => {
            tracing::debug!("user {user_id} recorded expense {}", expense.id);

            (
                HxRedirect(endpoints::format_endpoint(endpoints::DAY_PAGE, today)),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not create expense: {error}");
            error.into_alert_response()
        }
    }
}
