//! The crate-wide error type and how each error is shown to the user.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE;

use crate::{alert::Alert, status_page::StatusPage};

/// Everything that can go wrong while handling a request.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The request has no session cookie, or the cookie could not be
    /// decrypted, or the session it holds has expired.
    #[error("no active session")]
    NoSession,

    #[error("session expiry is out of range")]
    SessionExpiryOverflow,

    /// The password was rejected by the strength check. Holds the feedback
    /// shown to the user.
    #[error("password is too weak: {0}")]
    WeakPassword(String),

    /// bcrypt failed. The message is for the server log only.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("the username is already taken")]
    UsernameTaken,

    #[error("the email is already taken")]
    EmailTaken,

    #[error("invalid username: {0}")]
    InvalidUsername(String),

    #[error("invalid email: {0}")]
    InvalidEmail(String),

    #[error("category cannot be empty")]
    EmptyCategory,

    #[error("description cannot be empty")]
    EmptyDescription,

    #[error("{field} must be at most {max} characters")]
    TextTooLong {
        /// The field name shown to the user.
        field: &'static str,
        /// The maximum number of characters.
        max: usize,
    },

    /// Not a decimal number, or larger than the biggest amount accepted.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    #[error("amount cannot be negative")]
    NegativeAmount,

    /// No such row, route or day.
    #[error("not found")]
    NotFound,

    /// The row exists but belongs to another user.
    #[error("belongs to another user")]
    Forbidden,

    #[error("database error: {0}")]
    Database(rusqlite::Error),

    #[error("could not acquire the database lock")]
    DatabaseLock,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configured timezone name is not in the tz database.
    #[error("unknown timezone \"{0}\"")]
    UnknownTimezone(String),

    #[error("JSON serialization failed: {0}")]
    Json(String),
}

impl From<rusqlite::Error> for Error {
    fn from(error: rusqlite::Error) -> Self {
        match error {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            rusqlite::Error::SqliteFailure(failure, Some(ref message))
                if failure.extended_code == SQLITE_CONSTRAINT_UNIQUE =>
            {
                match unique_column(message) {
                    Some("username") => Error::UsernameTaken,
                    Some("email") => Error::EmailTaken,
                    _ => Error::Database(error),
                }
            }
            error => Error::Database(error),
        }
    }
}

/// The column named in a message like "UNIQUE constraint failed: user.email".
fn unique_column(message: &str) -> Option<&str> {
    message.rsplit_once('.').map(|(_, column)| column)
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => StatusPage::not_found().into_response(),
            Error::Forbidden => StatusPage::forbidden().into_response(),
            Error::UnknownTimezone(name) => StatusPage::bad_timezone(&name).into_response(),
            error => {
                tracing::error!("request failed: {error}");
                StatusPage::server_error().into_response()
            }
        }
    }
}

impl Error {
    /// Render the error as an alert for HTMX to swap into the page.
    pub fn into_alert_response(self) -> Response {
        let (status, alert) = match self {
            error @ (Error::EmptyCategory
            | Error::EmptyDescription
            | Error::TextTooLong { .. }
            | Error::InvalidAmount(_)
            | Error::NegativeAmount) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid expense".to_owned(),
                    details: sentence_case(&error.to_string()),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Expense not found".to_owned(),
                    details: "It may have been deleted already. Refresh the page to check."
                        .to_owned(),
                },
            ),
            Error::Forbidden => (
                StatusCode::FORBIDDEN,
                Alert::ErrorSimple {
                    message: "You do not have access to this expense.".to_owned(),
                },
            ),
            Error::UnknownTimezone(name) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Server timezone is misconfigured".to_owned(),
                    details: format!("\"{name}\" is not a canonical timezone name."),
                },
            ),
            error => {
                tracing::error!("request failed: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details: "Check the server logs for details.".to_owned(),
                    },
                )
            }
        };

        (status, alert.into_html()).into_response()
    }
}

fn sentence_case(text: &str) -> String {
    let mut chars = text.chars();

    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::Error;

    fn duplicate_insert(column: &str) -> rusqlite::Error {
        let connection = Connection::open_in_memory().unwrap();
        connection
            .execute_batch(&format!(
                "CREATE TABLE user (id INTEGER PRIMARY KEY, {column} TEXT UNIQUE);
                INSERT INTO user ({column}) VALUES ('a');"
            ))
            .unwrap();

        connection
            .execute(&format!("INSERT INTO user ({column}) VALUES ('a')"), ())
            .unwrap_err()
    }

    #[test]
    fn duplicate_username_is_taken() {
        assert_eq!(Error::from(duplicate_insert("username")), Error::UsernameTaken);
    }

    #[test]
    fn duplicate_email_is_taken() {
        assert_eq!(Error::from(duplicate_insert("email")), Error::EmailTaken);
    }

    #[test]
    fn other_unique_violations_stay_database_errors() {
        let error = Error::from(duplicate_insert("nickname"));

        assert!(matches!(error, Error::Database(_)), "got {error:?}");
    }

    #[test]
    fn no_rows_is_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }

    #[test]
    fn forbidden_page_is_403() {
        assert_eq!(
            Error::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn invalid_expense_alert_is_400() {
        let response = Error::NegativeAmount.into_alert_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_expense_alert_is_404() {
        let response = Error::NotFound.into_alert_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
