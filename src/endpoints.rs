//! Route paths.
//!
//! Paths with a `{placeholder}` segment are turned into concrete URLs with
//! [format_endpoint].

pub const ROOT: &str = "/";
/// Expense trends across every day the user has recorded something.
pub const OVERVIEW_PAGE: &str = "/overview";
/// The expenses recorded on one day, plus the form for adding more.
pub const DAY_PAGE: &str = "/days/{date}";
/// Per-category charts for one day.
pub const DAY_CHARTS_PAGE: &str = "/days/{date}/charts";
pub const EDIT_EXPENSE_PAGE: &str = "/expenses/{expense_id}/edit";
pub const REGISTER_PAGE: &str = "/register";
pub const LOG_IN_PAGE: &str = "/log_in";
pub const FORGOT_PASSWORD_PAGE: &str = "/forgot_password";
/// Where HTMX requests are sent after the server fails to handle them.
pub const ERROR_PAGE: &str = "/error";
pub const STATIC: &str = "/static";

pub const LOG_IN_API: &str = "/api/log_in";
pub const LOG_OUT_API: &str = "/api/log_out";
/// Registration form submissions.
pub const USERS_API: &str = "/api/users";
pub const EXPENSES_API: &str = "/api/expenses";
pub const EXPENSE_API: &str = "/api/expenses/{expense_id}";

/// Fill the `{placeholder}` segment of `path` with `value`.
///
/// Paths without a placeholder come back unchanged. Only the first
/// placeholder is filled.
pub fn format_endpoint(path: &str, value: impl std::fmt::Display) -> String {
    match path.split_once('{') {
        Some((prefix, rest)) => {
            let suffix = rest.split_once('}').map_or("", |(_, suffix)| suffix);
            format!("{prefix}{value}{suffix}")
        }
        None => path.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Uri;
    use time::macros::date;

    use crate::endpoints;

    use super::format_endpoint;

    #[test]
    fn every_route_parses_as_a_uri() {
        let routes = [
            endpoints::ROOT,
            endpoints::OVERVIEW_PAGE,
            endpoints::DAY_PAGE,
            endpoints::DAY_CHARTS_PAGE,
            endpoints::EDIT_EXPENSE_PAGE,
            endpoints::REGISTER_PAGE,
            endpoints::LOG_IN_PAGE,
            endpoints::FORGOT_PASSWORD_PAGE,
            endpoints::ERROR_PAGE,
            endpoints::STATIC,
            endpoints::LOG_IN_API,
            endpoints::LOG_OUT_API,
            endpoints::USERS_API,
            endpoints::EXPENSES_API,
            endpoints::EXPENSE_API,
        ];

        for route in routes {
            assert!(route.parse::<Uri>().is_ok(), "{route} is not a valid URI");
        }
    }

    #[test]
    fn fills_trailing_placeholder() {
        assert_eq!(format_endpoint(endpoints::EXPENSE_API, 7), "/api/expenses/7");
    }

    #[test]
    fn fills_placeholder_before_suffix() {
        let url = format_endpoint(endpoints::DAY_CHARTS_PAGE, date!(2024 - 01 - 05));

        assert_eq!(url, "/days/2024-01-05/charts");
        assert!(url.parse::<Uri>().is_ok());
    }

    #[test]
    fn path_without_placeholder_is_unchanged() {
        assert_eq!(format_endpoint(endpoints::OVERVIEW_PAGE, 1), "/overview");
    }
}
