//! Expenses: what a user spent, on what, and when.
//!
//! This module contains the expense types and their database operations, the
//! aggregation queries behind the charts, and the pages and endpoints for
//! recording, editing and reviewing expenses.

mod aggregation;
mod amount;
mod charts;
mod charts_page;
pub(crate) mod core;
mod create_endpoint;
mod day_page;
mod delete_endpoint;
pub(crate) mod domain;
mod edit_endpoint;
mod edit_page;
mod form;
mod guard;
mod overview_page;

pub use aggregation::{
    CategoryBreakdown, DateTotal, build_category_breakdown, build_date_series,
    category_total_for_date, category_usage_count, distinct_categories_for_date,
    distinct_expense_dates, total_expense_for_date,
};
pub use amount::Amount;
pub use charts_page::get_day_charts_page;
pub use core::{
    create_expense, create_expense_table, delete_expense, get_expense, get_expenses_for_date,
    update_expense,
};
pub use create_endpoint::create_expense_endpoint;
pub use day_page::get_day_page;
pub use delete_endpoint::delete_expense_endpoint;
pub use domain::{
    Category, Description, Expense, ExpenseFields, ExpenseForm, ExpenseId, NewExpense,
};
pub use edit_endpoint::update_expense_endpoint;
pub use edit_page::get_edit_expense_page;
pub use guard::get_owned_expense;
pub use overview_page::get_overview_page;

use axum::extract::FromRef;
use time::{Date, macros::format_description};

use crate::{AppState, Error, db::SharedConnection, endpoints, timezone::local_today};

/// What the expense pages and endpoints need from [AppState].
#[derive(Debug, Clone)]
pub struct ExpenseState {
    pub db: SharedConnection,
    /// Decides which date counts as today, e.g. "Pacific/Auckland".
    pub timezone: String,
}

impl FromRef<AppState> for ExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db: state.db.clone(),
            timezone: state.timezone.clone(),
        }
    }
}

/// Parse a date path parameter in the form "2024-01-05".
///
/// # Errors
///
/// Returns [Error::NotFound] if `raw_date` is not a valid calendar date, so a
/// mistyped URL shows the 404 page.
pub(crate) fn parse_date_param(raw_date: &str) -> Result<Date, Error> {
    Date::parse(raw_date, format_description!("[year]-[month]-[day]")).map_err(|error| {
        tracing::debug!("invalid date in path \"{raw_date}\": {error}");
        Error::NotFound
    })
}

/// The URL of the page for today's expenses in `timezone`.
pub(crate) fn today_endpoint(timezone: &str) -> Result<String, Error> {
    let today = local_today(timezone)
        .inspect_err(|error| tracing::error!("could not get today's date: {error}"))?;

    Ok(endpoints::format_endpoint(endpoints::DAY_PAGE, today))
}
