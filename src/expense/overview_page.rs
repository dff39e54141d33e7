//! The landing page for logged in users.
//!
//! Shows a form for recording an expense today, every day with expenses and
//! what was spent on it, and a chart of the daily totals.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, db, endpoints,
    expense::{
        DateTotal, ExpenseForm, ExpenseState, build_date_series,
        charts::{ExpenseChart, charts_script, charts_view, echarts_library, expense_trend_chart},
        form::{FormAction, expense_form},
        today_endpoint,
    },
    html::{CELL_STYLE, CONTENT_STYLE, TABLE_HEAD_STYLE, TABLE_ROW_STYLE, format_currency, link, page},
    navigation::nav_bar,
    user::UserID,
};

pub async fn get_overview_page(
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let today_url = today_endpoint(&state.timezone)?;
    let series = build_date_series(user_id, &*db::lock(&state.db)?)
        .inspect_err(|error| tracing::error!("could not total expenses per day: {error}"))?;

    Ok(overview_view(&today_url, &series).into_response())
}

fn overview_view(today_url: &str, series: &[DateTotal]) -> Markup {
    let charts = if series.is_empty() {
        Vec::new()
    } else {
        vec![ExpenseChart {
            id: "expense-trend-chart",
            options: expense_trend_chart(series).to_string(),
        }]
    };

    let body = html! {
        (nav_bar(endpoints::OVERVIEW_PAGE, today_url))

        main class=(CONTENT_STYLE) {
            div class="w-full max-w-screen-lg space-y-6" {
                div class="max-w-md" {
                    (expense_form(
                        FormAction::Create(endpoints::EXPENSES_API),
                        &ExpenseForm::default(),
                    ))
                }

                @if series.is_empty() {
                    section id="no-expenses" {
                        h2 class="text-xl font-bold" { "Nothing here yet..." }
                        p { "Expenses you record will show up here, grouped by day." }
                    }
                } @else {
                    (charts_view(&charts))
                    (daily_totals_table(series))
                }
            }
        }
    };

    let head = if charts.is_empty() {
        Vec::new()
    } else {
        vec![echarts_library(), charts_script(&charts)]
    };

    page("Overview", &head, &body)
}

fn daily_totals_table(series: &[DateTotal]) -> Markup {
    html! {
        div class="relative overflow-x-auto shadow-md rounded" {
            table id="daily-totals" class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                thead class=(TABLE_HEAD_STYLE) {
                    tr {
                        th scope="col" class=(CELL_STYLE) { "Date" }
                        th scope="col" class=(CELL_STYLE) { "Total" }
                    }
                }
                tbody {
                    @for day in series {
                        tr class=(TABLE_ROW_STYLE) {
                            td class=(CELL_STYLE) {
                                (link(&endpoints::format_endpoint(endpoints::DAY_PAGE, day.date), &day.date.to_string()))
                            }
                            td class=(CELL_STYLE) { (format_currency(day.total)) }
                        }
                    }
                }
            }
        }
    }
}
