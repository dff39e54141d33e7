//! Account registration.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    Error, PasswordHash,
    auth::{AccountState, Session},
    db, endpoints,
    html::{Field, auth_card, link, page, submit_button},
    password::StrongPassword,
    status_page::error_page_redirect,
    user::{EMAIL_MAX_LENGTH, Email, NewUser, USERNAME_MAX_LENGTH, Username, create_user},
};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Input {
    Email,
    Username,
    Password,
    ConfirmPassword,
}

/// Why the form was sent back, and which input to show the message under.
struct Rejection {
    input: Input,
    message: String,
}

impl Rejection {
    fn new(input: Input, message: impl Into<String>) -> Self {
        Self {
            input,
            message: message.into(),
        }
    }
}

fn registration_form(form: &RegisterForm, rejection: Option<&Rejection>) -> Markup {
    let error_under = |input: Input| {
        rejection
            .filter(|rejection| rejection.input == input)
            .map(|rejection| rejection.message.as_str())
    };

    html! {
        form hx-post=(endpoints::USERS_API) hx-disabled-elt="find button" class="space-y-5" {
            (Field::new("Email", "email", "email")
                .value(&form.email)
                .max_length(EMAIL_MAX_LENGTH)
                .error(error_under(Input::Email))
                .render())
            (Field::new("Username", "username", "text")
                .value(&form.username)
                .max_length(USERNAME_MAX_LENGTH)
                .error(error_under(Input::Username))
                .render())
            (Field::new("Password", "password", "password")
                .error(error_under(Input::Password))
                .render())
            (Field::new("Confirm password", "confirm_password", "password")
                .error(error_under(Input::ConfirmPassword))
                .render())

            (submit_button("Create Account"))

            p class="text-sm text-gray-500 dark:text-gray-400" {
                "Already registered? " (link(endpoints::LOG_IN_PAGE, "Log in"))
            }
        }
    }
}

pub async fn get_register_page() -> Response {
    let form = registration_form(&RegisterForm::default(), None);

    page("Register", &[], &auth_card("Create Account", &form)).into_response()
}

/// Check each input in the order they appear on the form.
fn validate(form: &RegisterForm) -> Result<(Email, Username, StrongPassword), Rejection> {
    let email =
        Email::new(&form.email).map_err(|error| Rejection::new(Input::Email, error.to_string()))?;
    let username = Username::new(&form.username)
        .map_err(|error| Rejection::new(Input::Username, error.to_string()))?;
    let password = StrongPassword::check(&form.password)
        .map_err(|error| Rejection::new(Input::Password, error.to_string()))?;

    if form.password != form.confirm_password {
        return Err(Rejection::new(Input::ConfirmPassword, "Passwords do not match"));
    }

    Ok((email, username, password))
}

/// Create the account and log the new user straight in. Invalid or taken
/// details send the form back with a message under the offending input.
pub async fn register_user(
    State(state): State<AccountState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    let (email, username, password) = match validate(&form) {
        Ok(valid) => valid,
        Err(rejection) => return registration_form(&form, Some(&rejection)).into_response(),
    };

    let password_hash = match PasswordHash::create(&password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("could not hash new password: {error}");
            return error_page_redirect();
        }
    };

    let new_user = NewUser {
        email,
        username,
        password_hash,
    };
    let created = db::lock(&state.db).and_then(|connection| create_user(new_user, &connection));

    let user = match created {
        Ok(user) => user,
        Err(Error::UsernameTaken) => {
            let rejection = Rejection::new(Input::Username, "Username taken, try again");
            return registration_form(&form, Some(&rejection)).into_response();
        }
        Err(Error::EmailTaken) => {
            let rejection = Rejection::new(Input::Email, "Email taken, try again");
            return registration_form(&form, Some(&rejection)).into_response();
        }
        Err(error) => {
            tracing::error!("could not save new user: {error}");
            return error_page_redirect();
        }
    };

    tracing::info!("registered {} as user {}", user.username, user.id);

    match Session::start(user.id, state.sessions.lifetime).and_then(|session| session.save(jar)) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::OVERVIEW_PAGE.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not start session for new user {}: {error}", user.id);
            error_page_redirect()
        }
    }
}
