//! The page listing the expenses recorded on a single day.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    Error, db, endpoints,
    expense::{
        Expense, ExpenseForm, ExpenseState,
        form::{FormAction, expense_form},
        get_expenses_for_date, parse_date_param, total_expense_for_date,
    },
    html::{
        CELL_STYLE, CONTENT_STYLE, DANGER_LINK_STYLE, LINK_STYLE, TABLE_HEAD_STYLE,
        TABLE_ROW_STYLE, format_currency, link, page,
    },
    navigation::nav_bar,
    timezone::local_today,
    user::UserID,
};

/// The expenses the logged in user recorded on the date in the path. Only
/// today's page has the form for adding more.
pub async fn get_day_page(
    Path(raw_date): Path<String>,
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let date = parse_date_param(&raw_date)?;
    let today = local_today(&state.timezone)
        .inspect_err(|error| tracing::error!("could not get today's date: {error}"))?;

    let (expenses, total) = db::lock(&state.db)
        .and_then(|connection| {
            Ok((
                get_expenses_for_date(user_id, date, &connection)?,
                total_expense_for_date(user_id, date, &connection)?,
            ))
        })
        .inspect_err(|error| tracing::error!("could not load expenses for {date}: {error}"))?;

    let today_url = endpoints::format_endpoint(endpoints::DAY_PAGE, today);

    Ok(day_view(
        date,
        date == today,
        &today_url,
        &expenses,
        total.map(format_currency),
    )
    .into_response())
}

fn day_view(
    date: Date,
    is_today: bool,
    today_url: &str,
    expenses: &[Expense],
    total: Option<String>,
) -> Markup {
    let day_url = endpoints::format_endpoint(endpoints::DAY_PAGE, date);
    let charts_url = endpoints::format_endpoint(endpoints::DAY_CHARTS_PAGE, date);

    let body = html! {
        (nav_bar(&day_url, today_url))

        main class=(CONTENT_STYLE) {
            div class="w-full max-w-screen-lg space-y-6" {
                div class="flex flex-wrap items-baseline justify-between gap-2" {
                    h1 class="text-2xl font-bold" { "Expenses on " (date) }

                    @if let Some(total) = &total {
                        p class="text-lg" {
                            "Total: " span id="day-total" class="font-semibold" { (total) }
                        }
                    }
                }

                @if is_today {
                    div class="max-w-md" {
                        (expense_form(FormAction::Create(endpoints::EXPENSES_API), &ExpenseForm::default()))
                    }
                }

                @if expenses.is_empty() {
                    p class="text-gray-500 dark:text-gray-400" { "Nothing here yet..." }
                } @else {
                    (expenses_table(expenses))
                    (link(&charts_url, "View charts for this day"))
                }
            }
        }
    };

    page(&format!("Expenses on {date}"), &[], &body)
}

/// Edit and delete controls for one expense. Deleting asks first, then
/// removes the row once the server confirms.
fn row_actions(expense: &Expense) -> Markup {
    html! {
        div class="flex gap-4" {
            a href=(endpoints::format_endpoint(endpoints::EDIT_EXPENSE_PAGE, expense.id)) class=(LINK_STYLE) {
                "Edit"
            }
            button
                type="button"
                hx-delete=(endpoints::format_endpoint(endpoints::EXPENSE_API, expense.id))
                hx-confirm={ "Delete \"" (expense.description) "\"?" }
                hx-target="closest tr"
                hx-swap="delete"
                hx-target-error="#alert-container"
                class=(DANGER_LINK_STYLE)
            {
                "Delete"
            }
        }
    }
}

fn expenses_table(expenses: &[Expense]) -> Markup {
    html! {
        div class="relative overflow-x-auto shadow-md rounded" {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                thead class=(TABLE_HEAD_STYLE) {
                    tr {
                        @for heading in ["Category", "Description", "Amount", "Actions"] {
                            th scope="col" class=(CELL_STYLE) { (heading) }
                        }
                    }
                }
                tbody {
                    @for expense in expenses {
                        tr class=(TABLE_ROW_STYLE) {
                            td class=(CELL_STYLE) { (expense.category) }
                            td class=(CELL_STYLE) { (expense.description) }
                            td class=(CELL_STYLE) { (format_currency(expense.amount)) }
                            td class=(CELL_STYLE) { (row_actions(expense)) }
                        }
                    }
                }
            }
        }
    }
}
