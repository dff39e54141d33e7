//! The page for changing the details of an expense.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, db, endpoints,
    expense::{
        Expense, ExpenseForm, ExpenseId, ExpenseState,
        form::{FormAction, expense_form},
        get_owned_expense, today_endpoint,
    },
    html::{CONTENT_STYLE, link, page},
    navigation::nav_bar,
    user::UserID,
};

/// The edit form for an expense owned by the logged in user. Someone else's
/// expense gets the 403 page, and a missing one the 404 page.
pub async fn get_edit_expense_page(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let expense = get_owned_expense(expense_id, user_id, &*db::lock(&state.db)?)?;
    let today_url = today_endpoint(&state.timezone)?;

    Ok(edit_expense_view(&expense, &today_url).into_response())
}

fn edit_expense_view(expense: &Expense, today_url: &str) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_EXPENSE_PAGE, expense.id);
    let update_url = endpoints::format_endpoint(endpoints::EXPENSE_API, expense.id);
    let day_url = endpoints::format_endpoint(endpoints::DAY_PAGE, expense.date);

    let values = ExpenseForm {
        category: expense.category.to_string(),
        description: expense.description.to_string(),
        amount: expense.amount.to_string(),
    };

    let body = html! {
        (nav_bar(&edit_url, today_url))

        main class=(CONTENT_STYLE) {
            div class="w-full max-w-md space-y-4" {
                (expense_form(FormAction::Update(&update_url), &values))

                p class="text-sm text-gray-500 dark:text-gray-400" {
                    "Spent on " (expense.date) ". " (link(&day_url, "Back to the day"))
                }
            }
        }
    };

    page("Edit Expense", &[], &body)
}
