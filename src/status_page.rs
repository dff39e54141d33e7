//! Full-page responses for requests that cannot be served: missing routes,
//! other users' data, and server failures.
use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::html;

use crate::{
    endpoints,
    html::{LINK_STYLE, page},
};

pub(crate) struct StatusPage {
    status: StatusCode,
    headline: Cow<'static, str>,
    hint: Cow<'static, str>,
}

impl StatusPage {
    pub(crate) fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            headline: "Nothing lives here.".into(),
            hint: "Check the address, or head back to your overview.".into(),
        }
    }

    pub(crate) fn forbidden() -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            headline: "That isn't yours.".into(),
            hint: "The expense you asked for was recorded by another account.".into(),
        }
    }

    pub(crate) fn server_error() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            headline: "The server tripped over this request.".into(),
            hint: "Try again in a moment. The server log has the details.".into(),
        }
    }

    pub(crate) fn bad_timezone(name: &str) -> Self {
        Self {
            hint: format!(
                "\"{name}\" is not a canonical timezone name. Fix the server's \
                timezone setting, e.g. \"Pacific/Auckland\"."
            )
            .into(),
            ..Self::server_error()
        }
    }
}

impl IntoResponse for StatusPage {
    fn into_response(self) -> Response {
        let code = self.status.as_str().to_owned();
        let body = html! {
            main class="mx-auto max-w-screen-sm px-4 py-16 text-center text-gray-900 dark:text-white"
            {
                p class="text-7xl font-extrabold text-blue-600 dark:text-blue-500" { (code) }
                h1 class="my-4 text-3xl font-bold" { (self.headline) }
                p class="mb-8 text-lg" { (self.hint) }
                a href=(endpoints::OVERVIEW_PAGE) class=(LINK_STYLE) { "Go to the overview" }
            }
        };

        (self.status, page(&code, &[], &body)).into_response()
    }
}

/// Fallback for unknown routes.
pub(crate) async fn get_not_found_page() -> Response {
    StatusPage::not_found().into_response()
}

pub(crate) async fn get_error_page() -> Response {
    StatusPage::server_error().into_response()
}

/// Send an HTMX client to the error page after a failed form submission.
pub(crate) fn error_page_redirect() -> Response {
    (
        HxRedirect(endpoints::ERROR_PAGE.to_owned()),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
        .into_response()
}
