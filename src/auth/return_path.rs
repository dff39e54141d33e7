//! Where to send a user once they have logged in.
//!
//! The page a visitor was turned away from travels through the log-in form
//! as the `redirect_url` query parameter. Only same-site paths are honoured.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

/// Reduce `target` to a same-site path and query.
///
/// Returns `None` for absolute or protocol-relative URLs, and for the log-in
/// and registration pages themselves.
pub fn safe_return_path(target: &str) -> Option<String> {
    let uri: Uri = target.parse().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    local_path(&uri)
}

/// The log-in page URL that returns to `return_to` afterwards.
pub fn log_in_url(return_to: Option<&str>) -> String {
    let return_to = return_to.unwrap_or(endpoints::OVERVIEW_PAGE);

    match serde_urlencoded::to_string([("redirect_url", return_to)]) {
        Ok(query) => format!("{}?{query}", endpoints::LOG_IN_PAGE),
        Err(error) => {
            tracing::error!("could not encode return path {return_to:?}: {error}");
            endpoints::LOG_IN_PAGE.to_owned()
        }
    }
}

/// The page the user was looking at when `request` was made.
///
/// API calls come from HTMX, which names the page in `HX-Current-URL`. That
/// header holds a full URL, so only its path and query are kept.
pub fn return_path_for(request: &Request) -> Option<String> {
    if !request.uri().path().starts_with("/api/") {
        return request
            .uri()
            .path_and_query()
            .and_then(|path| safe_return_path(path.as_str()));
    }

    let current_page = request
        .headers()
        .get("hx-current-url")
        .and_then(|value| value.to_str().ok());

    let Some(current_page) = current_page else {
        tracing::warn!("API request without HX-Current-URL, returning to the overview");
        return None;
    };

    let path = current_page.parse::<Uri>().ok().and_then(|uri| local_path(&uri));
    if path.is_none() {
        tracing::warn!("ignoring unusable HX-Current-URL {current_page:?}");
    }

    path
}

fn local_path(uri: &Uri) -> Option<String> {
    let path_and_query = uri.path_and_query()?.as_str();

    let leaves_site = !path_and_query.starts_with('/') || path_and_query.starts_with("//");
    let is_auth_page = matches!(
        uri.path(),
        endpoints::LOG_IN_PAGE | endpoints::REGISTER_PAGE
    );

    (!leaves_site && !is_auth_page).then(|| path_and_query.to_owned())
}
