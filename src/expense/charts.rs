//! ECharts visualisations of a user's spending.
//!
//! - **Expense pattern**: the total spent on each day that has expenses.
//! - **Expenditure breakdown**: the amount spent in each category on a single day.
//! - **Category frequency**: how often each of the day's categories has ever been used.
//!
//! Each chart is serialised to an ECharts configuration object and rendered
//! alongside an HTML container and the JavaScript that initialises it.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger,
    },
    series::{Bar, Line, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    expense::{CategoryBreakdown, DateTotal},
    html::HeadElement,
};

/// A chart with its HTML container ID and ECharts configuration.
pub(crate) struct ExpenseChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders a grid of empty containers that [charts_script] draws the charts into.
pub(crate) fn charts_view(charts: &[ExpenseChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Make JSON safe to embed in a `<script>` element.
///
/// Category names are user input, and a literal `</script>` inside one would
/// end the element early. JSON allows these escapes anywhere in a string.
fn script_safe_json(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());

    for character in json.chars() {
        match character {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            _ => escaped.push(character),
        }
    }

    escaped
}

/// The JavaScript that draws each chart into its container once the page has
/// loaded. Charts follow the system colour scheme and resize with the window.
///
/// Chart options must not contain JavaScript with `<`, `>` or `&` outside of
/// strings, since those are escaped.
pub(crate) fn charts_script(charts: &[ExpenseChart]) -> HeadElement {
    let mut script = String::from("document.addEventListener('DOMContentLoaded', function() {\n");

    for chart in charts {
        script.push_str(&format!(
            r#"(function() {{
    const chart = echarts.init(document.getElementById("{id}"));
    chart.setOption({options});
    window.addEventListener('resize', chart.resize);

    const darkMode = window.matchMedia('(prefers-color-scheme: dark)');
    const applyTheme = function() {{ chart.setTheme(darkMode.matches ? 'dark' : 'default'); }};
    darkMode.addEventListener('change', applyTheme);
    applyTheme();
}})();
"#,
            id = chart.id,
            options = script_safe_json(&chart.options),
        ));
    }

    script.push_str("});");

    HeadElement::InlineScript(PreEscaped(script))
}

/// The ECharts library, which must come before [charts_script].
pub(crate) fn echarts_library() -> HeadElement {
    HeadElement::ScriptFile("/static/echarts.6.0.0.min.js")
}

/// A line chart of the total spent per day, in the order the days were first used.
pub(crate) fn expense_trend_chart(series: &[DateTotal]) -> Chart {
    let (labels, values): (Vec<String>, Vec<f64>) = series
        .iter()
        .map(|point| (point.date.to_string(), point.total.as_f64()))
        .unzip();

    Chart::new()
        .title(Title::new().text("Expense pattern").subtext("Total spent per day"))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Total").data(values))
}

/// A bar chart of the amount spent in each category on one day.
pub(crate) fn expense_breakdown_chart(breakdown: &CategoryBreakdown) -> Chart {
    let (labels, values): (Vec<String>, Vec<f64>) = breakdown
        .totals
        .iter()
        .map(|(category, total)| (category.clone(), total.as_f64()))
        .unzip();

    Chart::new()
        .title(
            Title::new()
                .text("Expenditure breakdown")
                .subtext("Amount spent per category"),
        )
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Spent").data(values))
}

/// A doughnut chart of how many expenses have ever been recorded under each
/// of the day's categories.
pub(crate) fn category_frequency_chart(breakdown: &CategoryBreakdown) -> Chart {
    let data: Vec<(f64, &str)> = breakdown
        .frequencies
        .iter()
        .map(|(category, count)| (*count as f64, category.as_str()))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Expenses category frequency")
                .subtext("Expenses recorded per category, all time"),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().bottom("2%"))
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

/// Formats axis labels and tooltips as dollars. Zero is a real amount and
/// shows as "$0.00"; only a missing value shows as "-".
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "value",
        "const currencyFormatter = new Intl.NumberFormat('en-US', { style: 'currency', currency: 'USD' });
        return (value == null) ? '-' : currencyFormatter.format(value);",
    )
}

fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
