//! The log-in page and form handler.

use std::sync::Mutex;

use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    Error,
    auth::{AccountState, REMEMBERED_SESSION_LENGTH, Session, return_path::safe_return_path},
    db, endpoints,
    html::{Field, auth_card, link, page, submit_button},
    status_page::error_page_redirect,
    user::{USERNAME_MAX_LENGTH, User, Username, get_user_by_username},
};

/// Shown for both unknown usernames and wrong passwords, so the form does
/// not reveal which usernames exist.
pub const BAD_CREDENTIALS_MESSAGE: &str = "Incorrect username or password.";

#[derive(Deserialize)]
pub struct LogInQuery {
    pub redirect_url: Option<String>,
}

#[derive(Deserialize)]
pub struct LogInForm {
    pub username: String,
    pub password: String,
    /// A checkbox: present with any value when ticked, absent otherwise.
    pub remember_me: Option<String>,
    pub redirect_url: Option<String>,
}

fn log_in_form(username: &str, error: Option<&str>, return_to: Option<&str>) -> Markup {
    html! {
        form hx-post=(endpoints::LOG_IN_API) hx-disabled-elt="find button" class="space-y-5" {
            @if let Some(return_to) = return_to {
                input type="hidden" name="redirect_url" value=(return_to);
            }

            (Field::new("Username", "username", "text")
                .value(username)
                .max_length(USERNAME_MAX_LENGTH)
                .render())
            (Field::new("Password", "password", "password").error(error).render())

            label class="flex items-center gap-3 text-sm" {
                input type="checkbox" name="remember_me" class="rounded-xs";
                "Keep me logged in for a week"
            }

            (submit_button("Log in"))

            p class="text-sm text-gray-500 dark:text-gray-400" {
                "Forgot your password? " (link(endpoints::FORGOT_PASSWORD_PAGE, "Reset it"))
                br;
                "New here? " (link(endpoints::REGISTER_PAGE, "Create an account"))
            }
        }
    }
}

pub async fn get_log_in_page(Query(query): Query<LogInQuery>) -> Response {
    let return_to = query.redirect_url.as_deref().and_then(safe_return_path);
    let form = log_in_form("", None, return_to.as_deref());

    page("Log in", &[], &auth_card("Log in", &form)).into_response()
}

/// The account for `username`, if `password` is right.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] for a malformed or unknown username
/// and for a wrong password.
fn check_credentials(username: &str, password: &str, db: &Mutex<Connection>) -> Result<User, Error> {
    let username = Username::new(username).map_err(|_| Error::InvalidCredentials)?;
    let user = get_user_by_username(&username, &*db::lock(db)?)?.ok_or(Error::InvalidCredentials)?;

    if user.password_hash.matches(password)? {
        Ok(user)
    } else {
        Err(Error::InvalidCredentials)
    }
}

/// Start a session and send the browser on to `redirect_url`, or the
/// overview. Failed attempts get the form back with an error.
pub async fn post_log_in(
    State(state): State<AccountState>,
    jar: PrivateCookieJar,
    Form(form): Form<LogInForm>,
) -> Response {
    let return_to = form.redirect_url.as_deref().and_then(safe_return_path);

    let user = match check_credentials(&form.username, &form.password, &state.db) {
        Ok(user) => user,
        Err(Error::InvalidCredentials) => {
            tracing::info!("failed log-in for {:?}", form.username);
            return log_in_form(&form.username, Some(BAD_CREDENTIALS_MESSAGE), return_to.as_deref())
                .into_response();
        }
        Err(error) => {
            tracing::error!("could not check credentials: {error}");
            return error_page_redirect();
        }
    };

    let lifetime = match form.remember_me {
        Some(_) => REMEMBERED_SESSION_LENGTH,
        None => state.sessions.lifetime,
    };

    match Session::start(user.id, lifetime).and_then(|session| session.save(jar)) {
        Ok(jar) => {
            let destination = return_to.unwrap_or_else(|| endpoints::OVERVIEW_PAGE.to_owned());
            (StatusCode::SEE_OTHER, HxRedirect(destination), jar).into_response()
        }
        Err(error) => {
            tracing::error!("could not start session for user {}: {error}", user.id);
            error_page_redirect()
        }
    }
}
