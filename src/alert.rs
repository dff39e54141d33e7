//! Alert system for displaying success and error messages to users.
//!
//! Alerts are HTML fragments that HTMX swaps into the `#alert-container`
//! element that every page includes.

use axum::response::{Html, IntoResponse, Response};
use maud::html;

/// A dismissable message shown at the bottom of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with extra details.
    Success { message: String, details: String },
    /// A success message on its own.
    SuccessSimple { message: String },
    /// An error message with extra details, e.g. how to fix the error.
    Error { message: String, details: String },
    /// An error message on its own.
    ErrorSimple { message: String },
}

impl Alert {
    pub fn into_html(self) -> Html<String> {
        let (message, details, is_error) = match self {
            Alert::Success { message, details } => (message, details, false),
            Alert::SuccessSimple { message } => (message, String::new(), false),
            Alert::Error { message, details } => (message, details, true),
            Alert::ErrorSimple { message } => (message, String::new(), true),
        };

        let container_style = if is_error {
            "flex items-start p-4 mb-4 text-sm rounded-lg border \
            text-red-800 bg-red-50 border-red-300 \
            dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
        } else {
            "flex items-start p-4 mb-4 text-sm rounded-lg border \
            text-green-800 bg-green-50 border-green-300 \
            dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
        };

        let markup = html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(container_style) role="alert"
                {
                    div class="flex-1"
                    {
                        p class="font-semibold" data-alert-message { (message) }

                        @if !details.is_empty()
                        {
                            p class="mt-1" { (details) }
                        }
                    }

                    button
                        type="button"
                        class="ms-3 font-bold"
                        aria-label="Dismiss"
                        onclick="this.closest('#alert-container').classList.add('hidden')"
                    {
                        "×"
                    }
                }
            }
        };

        Html(markup.into_string())
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
