//! Logging out.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::session::end_session, endpoints};

/// End the session and show the log-in page.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    (end_session(jar), Redirect::to(endpoints::LOG_IN_PAGE)).into_response()
}
