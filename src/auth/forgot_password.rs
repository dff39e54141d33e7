//! The page explaining how to reset a forgotten password.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{auth_card, link, page},
};

fn forgot_password_template() -> Markup {
    let instructions = html! {
        div class="space-y-4 text-gray-900 dark:text-white"
        {
            p class="text-justify"
            {
                "Passwords can only be reset by whoever runs this server. Ask them to
                run the 'reset_password' program from the directory the server runs in,
                pointing it at the database file and your username:"
            }

            pre class="p-2 rounded bg-gray-100 dark:bg-gray-700 text-sm overflow-x-auto"
            {
                code { "reset_password --db-path outlay.db --username <your username>" }
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Remembered it? "
                (link(endpoints::LOG_IN_PAGE, "Log in here"))
            }
        }
    };

    page(
        "Forgot Password",
        &[],
        &auth_card("Forgot your password?", &instructions),
    )
}

/// Renders a page describing how the user's password can be reset.
pub async fn get_forgot_password_page() -> Response {
    forgot_password_template().into_response()
}
