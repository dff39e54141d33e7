//! The page charting how a day's spending splits across categories.

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
        ExpenseState, build_category_breakdown,
        charts::{
            ExpenseChart, category_frequency_chart, charts_script, charts_view, echarts_library,
            expense_breakdown_chart,
        },
        parse_date_param, today_endpoint,
    },
    html::{CONTENT_STYLE, link, page},
    navigation::nav_bar,
    user::UserID,
};

/// The expenditure breakdown and category frequency charts for the date in
/// the path.
pub async fn get_day_charts_page(
    Path(raw_date): Path<String>,
    State(state): State<ExpenseState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let date = parse_date_param(&raw_date)?;
    let today_url = today_endpoint(&state.timezone)?;
    let breakdown = build_category_breakdown(user_id, date, &*db::lock(&state.db)?)
        .inspect_err(|error| tracing::error!("could not break down spending on {date}: {error}"))?;

    if breakdown.is_empty() {
        return Ok(charts_no_data_view(date, &today_url).into_response());
    }

    let charts = [
        ExpenseChart {
            id: "expenditure-breakdown-chart",
            options: expense_breakdown_chart(&breakdown).to_string(),
        },
        ExpenseChart {
            id: "category-frequency-chart",
            options: category_frequency_chart(&breakdown).to_string(),
        },
    ];

    Ok(charts_page_view(date, &today_url, &charts).into_response())
}

fn charts_page_view(date: Date, today_url: &str, charts: &[ExpenseChart]) -> Markup {
    let charts_url = endpoints::format_endpoint(endpoints::DAY_CHARTS_PAGE, date);
    let day_url = endpoints::format_endpoint(endpoints::DAY_PAGE, date);

    let body = html! {
        (nav_bar(&charts_url, today_url))

        main class=(CONTENT_STYLE) {
            div class="w-full space-y-4" {
                h1 class="text-2xl font-bold" { "Spending on " (date) }
                p { (link(&day_url, "Back to the expenses for this day")) }

                (charts_view(charts))
            }
        }
    };

    page(
        &format!("Charts for {date}"),
        &[echarts_library(), charts_script(charts)],
        &body,
    )
}

fn charts_no_data_view(date: Date, today_url: &str) -> Markup {
    let charts_url = endpoints::format_endpoint(endpoints::DAY_CHARTS_PAGE, date);

    let body = html! {
        (nav_bar(&charts_url, today_url))

        main class=(CONTENT_STYLE) {
            h1 class="text-2xl font-bold mb-4" { "Nothing here yet..." }

            p {
                "No expenses were recorded on " (date) ". "
                (link(today_url, "Record today's expenses"))
                " to see them charted."
            }
        }
    };

    page(&format!("Charts for {date}"), &[], &body)
}
