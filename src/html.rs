//! The page shell and the small pieces of markup shared between pages.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};

use crate::expense::Amount;

pub const LINK_STYLE: &str = "underline text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400";

pub const BUTTON_STYLE: &str = "w-full rounded px-4 py-2 text-white bg-blue-600 \
    hover:enabled:bg-blue-700 disabled:bg-blue-800";

pub const DANGER_LINK_STYLE: &str = "underline cursor-pointer bg-transparent border-none \
    text-red-600 hover:text-red-500 dark:text-red-500";

pub const LABEL_STYLE: &str = "block mb-2 text-sm font-medium";

pub const INPUT_STYLE: &str = "block w-full rounded p-2.5 text-sm border \
    bg-gray-50 border-gray-300 dark:bg-gray-700 dark:border-gray-600 \
    focus:border-blue-600 focus:ring-blue-600";

pub const TABLE_HEAD_STYLE: &str = "text-xs uppercase text-gray-700 bg-gray-50 \
    dark:text-gray-400 dark:bg-gray-700";

pub const TABLE_ROW_STYLE: &str = "border-b bg-white dark:bg-gray-800 dark:border-gray-700";

pub const CELL_STYLE: &str = "px-6 py-4";

/// Centres page content below the navigation bar.
pub const CONTENT_STYLE: &str = "mx-auto flex flex-col items-center px-6 py-8 \
    text-gray-900 dark:text-white";

/// Styles every page needs: the request spinner, the `$` prefix on amount
/// inputs, and chart tooltips that stay under the mobile navigation bar.
const SHARED_CSS: &str = r#"
.htmx-indicator { display: none; }
.htmx-request .htmx-indicator, .htmx-request.htmx-indicator { display: inline-block; }
.spinner {
    width: 1em; height: 1em; margin-right: 0.5em; vertical-align: -0.125em;
    border: 2px solid currentColor; border-right-color: transparent;
    border-radius: 50%; animation: spin 0.7s linear infinite;
}
@keyframes spin { to { transform: rotate(360deg); } }
.currency { position: relative; }
.currency::before {
    content: "$"; position: absolute; left: 0.6rem; top: 50%;
    transform: translateY(-50%); pointer-events: none;
}
.currency input { padding-left: 1.4rem; }
.echarts-tooltip { z-index: 30 !important; }
"#;

/// Extra tags for a page's `<head>`.
pub enum HeadElement {
    ScriptFile(&'static str),
    /// Must already be safe to place inside a `<script>` element.
    InlineScript(PreEscaped<String>),
}

/// A complete HTML document.
pub fn page(title: &str, head: &[HeadElement], body: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " | Outlay" }
                link rel="icon" type="image/png" href="/static/favicon-128x128.png";
                link rel="stylesheet" href="/static/main.css";
                script src="/static/htmx-2.0.8-min.js" {}
                script src="/static/htmx-ext-response-targets-2.0.4.js" {}
                style { (PreEscaped(SHARED_CSS)) }

                @for element in head {
                    @match element {
                        HeadElement::ScriptFile(src) => script src=(src) {}
                        HeadElement::InlineScript(source) => script { (source) }
                    }
                }
            }

            body
                hx-ext="response-targets"
                class="min-h-screen bg-gray-50 dark:bg-gray-900 pb-24 lg:pb-0"
            {
                (body)

                // Alerts are swapped in here out-of-band.
                div
                    id="alert-container"
                    class="hidden fixed bottom-4 left-1/2 -translate-x-1/2 z-50 w-full max-w-md px-4"
                {}
            }
        }
    }
}

/// The centred card holding the log-in and registration forms.
pub fn auth_card(heading: &str, content: &Markup) -> Markup {
    html! {
        main class="mx-auto flex max-w-md flex-col items-center px-6 py-8 text-gray-900 dark:text-white" {
            p class="mb-6 text-2xl font-semibold" { "Outlay" }

            section class="w-full rounded-lg bg-white p-6 shadow sm:p-8 dark:bg-gray-800" {
                h1 class="mb-6 text-xl font-bold md:text-2xl" { (heading) }
                (content)
            }
        }
    }
}

/// A labelled input with room for a validation message underneath.
///
/// The input's `id` is its `name` with underscores turned into dashes.
pub struct Field<'a> {
    pub label: &'a str,
    pub name: &'a str,
    pub kind: &'a str,
    pub value: &'a str,
    pub max_length: Option<usize>,
    pub error: Option<&'a str>,
}

impl<'a> Field<'a> {
    pub fn new(label: &'a str, name: &'a str, kind: &'a str) -> Self {
        Self {
            label,
            name,
            kind,
            value: "",
            max_length: None,
            error: None,
        }
    }

    pub fn value(self, value: &'a str) -> Self {
        Self { value, ..self }
    }

    pub fn max_length(self, max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            ..self
        }
    }

    pub fn error(self, error: Option<&'a str>) -> Self {
        Self { error, ..self }
    }

    pub fn render(&self) -> Markup {
        let id = self.name.replace('_', "-");

        html! {
            div {
                label for=(id) class=(LABEL_STYLE) { (self.label) }
                input
                    id=(id)
                    name=(self.name)
                    type=(self.kind)
                    value=(self.value)
                    maxlength=[self.max_length]
                    class=(INPUT_STYLE)
                    required
                    autofocus[self.error.is_some()];

                @if let Some(error) = self.error {
                    p class="field-error mt-1 text-red-500" { (error) }
                }
            }
        }
    }
}

/// A full-width submit button that shows a spinner while its form is in flight.
pub fn submit_button(label: &str) -> Markup {
    html! {
        button type="submit" class=(BUTTON_STYLE) {
            span class="htmx-indicator spinner" aria-hidden="true" {}
            (label)
        }
    }
}

pub fn link(url: &str, text: &str) -> Markup {
    html! { a href=(url) class=(LINK_STYLE) { (text) } }
}

/// Dollars and cents with thousands separators, e.g. "$1,234.50".
pub fn format_currency(amount: Amount) -> String {
    static WHOLE_DOLLARS: OnceLock<Formatter> = OnceLock::new();

    let cents = amount.cents();
    let dollars = cents / 100;
    let grouped = WHOLE_DOLLARS.get_or_init(|| {
        Formatter::new()
            .precision(Precision::Decimals(0))
            .separator(',')
            .unwrap_or_else(|_| Formatter::new().precision(Precision::Decimals(0)))
    });

    // numfmt switches to scientific notation from 10^12 upwards.
    let dollars = if dollars < 1_000_000_000_000 {
        grouped.fmt_string(dollars)
    } else {
        dollars.to_string()
    };

    format!("${dollars}.{:02}", cents % 100)
}
