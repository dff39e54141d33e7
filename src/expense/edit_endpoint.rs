//! The endpoint for saving changes to an expense.

use axum::{
    Extension, Form,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    db, endpoints,
    expense::{
        ExpenseFields, ExpenseForm, ExpenseId, ExpenseState, get_owned_expense, update_expense,
    },
    user::UserID,
};

/// Replace the category, description and amount of an expense owned by the
/// logged in user, then redirect to the page for the day it was spent.
pub async fn update_expense_endpoint(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let connection = match db::lock(&state.db) {
        Ok(connection) => connection,
        Err(error) => return error.into_alert_response(),
    };

    let expense = match get_owned_expense(expense_id, user_id, &connection) {
        Ok(expense) => expense,
        Err(error) => return error.into_alert_response(),
    };

    let fields = match ExpenseFields::try_from(&form) {
        Ok(fields) => fields,
        Err(error) => {
            tracing::debug!("rejected changes to expense {expense_id}: {error}");
            return error.into_alert_response();
        }
    };

    match update_expense(expense_id, &fields, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::format_endpoint(endpoints::DAY_PAGE, expense.date)),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not update expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}
