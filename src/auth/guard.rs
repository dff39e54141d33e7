//! Middleware that admits requests carrying a live session.
//!
//! Admitted requests get the session's [UserID](crate::user::UserID) as a request extension and
//! have their session renewed on the way out. Anyone else is sent to the
//! log-in page with a `redirect_url` back to where they were.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;
use axum_htmx::HxRedirect;

use crate::auth::{
    SessionConfig,
    return_path::{log_in_url, return_path_for},
    session::Session,
};

/// How a turned-away request is sent to the log-in page.
#[derive(Clone, Copy)]
enum LogInRedirect {
    /// A browser navigation: plain `303 See Other`.
    Page,
    /// An HTMX call: `HX-Redirect` so the whole page changes, not a fragment.
    Htmx,
}

impl LogInRedirect {
    fn respond(self, location: &str) -> Response {
        match self {
            LogInRedirect::Page => Redirect::to(location).into_response(),
            LogInRedirect::Htmx => (HxRedirect(location.to_owned()), StatusCode::OK).into_response(),
        }
    }
}

/// Guard for pages.
pub async fn require_session(
    State(config): State<SessionConfig>,
    request: Request,
    next: Next,
) -> Response {
    guard(config, request, next, LogInRedirect::Page).await
}

/// Guard for the HTMX API routes.
pub async fn require_session_hx(
    State(config): State<SessionConfig>,
    request: Request,
    next: Next,
) -> Response {
    guard(config, request, next, LogInRedirect::Htmx).await
}

async fn guard(
    config: SessionConfig,
    mut request: Request,
    next: Next,
    redirect: LogInRedirect,
) -> Response {
    let jar = PrivateCookieJar::from_headers(request.headers(), config.key.clone());

    let session = match Session::from_jar(&jar) {
        Ok(session) => session,
        Err(error) => {
            tracing::debug!("{} {} turned away: {error}", request.method(), request.uri());
            let return_to = return_path_for(&request);
            return redirect.respond(&log_in_url(return_to.as_deref()));
        }
    };

    request.extensions_mut().insert(session.user_id);
    let response = next.run(request).await;

    match session.renew(config.lifetime).and_then(|renewed| renewed.save(jar)) {
        Ok(jar) => (jar, response).into_response(),
        Err(error) => {
            tracing::error!("could not renew session for user {}: {error}", session.user_id);
            response
        }
    }
}
