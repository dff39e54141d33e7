//! Every route in the app, and which of them need a session.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        get_forgot_password_page, get_log_in_page, get_log_out, get_register_page, post_log_in,
        register_user, require_session, require_session_hx,
    },
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_day_charts_page, get_day_page,
        get_edit_expense_page, get_overview_page, update_expense_endpoint,
    },
    status_page::{get_error_page, get_not_found_page},
};

/// The app's router. Static files are served from `static/` under the
/// working directory.
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route(endpoints::LOG_IN_PAGE, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT_API, get(get_log_out))
        .route(endpoints::REGISTER_PAGE, get(get_register_page))
        .route(endpoints::USERS_API, post(register_user))
        .route(endpoints::FORGOT_PASSWORD_PAGE, get(get_forgot_password_page))
        .route(endpoints::ERROR_PAGE, get(get_error_page));

    let pages = Router::new()
        .route(endpoints::ROOT, get(|| async { Redirect::to(endpoints::OVERVIEW_PAGE) }))
        .route(endpoints::OVERVIEW_PAGE, get(get_overview_page))
        .route(endpoints::DAY_PAGE, get(get_day_page))
        .route(endpoints::DAY_CHARTS_PAGE, get(get_day_charts_page))
        .route(endpoints::EDIT_EXPENSE_PAGE, get(get_edit_expense_page))
        .layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            require_session,
        ));

    // HTMX only follows HX-Redirect, so API routes send the browser to the
    // log-in page that way.
    let api = Router::new()
        .route(endpoints::EXPENSES_API, post(create_expense_endpoint))
        .route(
            endpoints::EXPENSE_API,
            put(update_expense_endpoint).delete(delete_expense_endpoint),
        )
        .layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            require_session_hx,
        ));

    Router::new()
        .merge(public)
        .merge(pages)
        .merge(api)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_not_found_page)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        AppState,
        auth::session::SESSION_COOKIE,
        endpoints::{self, format_endpoint},
        timezone::local_today,
    };

    use super::build_router;

    fn get_test_server() -> TestServer {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        let state = AppState::new(connection, "very secret", "Etc/UTC")
            .expect("Could not create app state");

        TestServer::new(build_router(state))
    }

    /// Register a new account and return its session cookie.
    async fn register(server: &TestServer, username: &str) -> Cookie<'static> {
        let response = server
            .post(endpoints::USERS_API)
            .form(&[
                ("email", format!("{username}@example.com")),
                ("username", username.to_owned()),
                ("password", "quiet-harbour-lamp-42".to_owned()),
                ("confirm_password", "quiet-harbour-lamp-42".to_owned()),
            ])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        response.cookie(SESSION_COOKIE)
    }

    #[tokio::test]
    async fn pages_redirect_to_log_in_without_session() {
        let server = get_test_server();

        let response = server.get(endpoints::OVERVIEW_PAGE).await;

        response.assert_status_see_other();
        assert_eq!(
            response.header("location"),
            "/log_in?redirect_url=%2Foverview"
        );
    }

    #[tokio::test]
    async fn api_routes_redirect_htmx_to_log_in_without_session() {
        let server = get_test_server();

        let response = server
            .post(endpoints::EXPENSES_API)
            .form(&[("category", "Food"), ("description", "Lunch"), ("amount", "1")])
            .await;

        let location = response.header("hx-redirect");
        assert!(
            location.to_str().unwrap().starts_with(endpoints::LOG_IN_PAGE),
            "got HX-Redirect {location:?}"
        );
    }

    #[tokio::test]
    async fn root_redirects_to_overview() {
        let server = get_test_server();
        let session = register(&server, "alice").await;

        let response = server.get(endpoints::ROOT).add_cookie(session).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::OVERVIEW_PAGE);
    }

    #[tokio::test]
    async fn log_out_ends_session() {
        let server = get_test_server();
        let session = register(&server, "alice").await;

        let response = server.get(endpoints::LOG_OUT_API).add_cookie(session).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::LOG_IN_PAGE);
        assert_eq!(
            response.cookie(SESSION_COOKIE).max_age(),
            Some(time::Duration::ZERO)
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        server
            .get("/no/such/page")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn record_and_review_expenses() {
        let server = get_test_server();
        let session = register(&server, "alice").await;
        let today_url = format_endpoint(endpoints::DAY_PAGE, local_today("Etc/UTC").unwrap());

        let response = server
            .post(endpoints::EXPENSES_API)
            .add_cookie(session.clone())
            .form(&[("category", "Food"), ("description", "Lunch"), ("amount", "12.50")])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("hx-redirect"), today_url.as_str());

        let response = server.get(&today_url).add_cookie(session.clone()).await;
        response.assert_status_ok();
        let page = response.text();
        assert!(page.contains("Lunch"));
        assert!(page.contains("$12.50"));

        let response = server
            .get(endpoints::OVERVIEW_PAGE)
            .add_cookie(session.clone())
            .await;
        response.assert_status_ok();
        assert!(response.text().contains("expense-trend-chart"));

        let charts_url = format!("{today_url}/charts");
        let response = server.get(&charts_url).add_cookie(session).await;
        response.assert_status_ok();
        assert!(response.text().contains("category-frequency-chart"));
    }

    #[tokio::test]
    async fn malformed_day_is_not_found() {
        let server = get_test_server();
        let session = register(&server, "alice").await;

        server
            .get("/days/2024-02-30")
            .add_cookie(session)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn users_cannot_touch_each_others_expenses() {
        let server = get_test_server();
        let alice = register(&server, "alice").await;
        let bob = register(&server, "bobby").await;

        server
            .post(endpoints::EXPENSES_API)
            .add_cookie(alice.clone())
            .form(&[("category", "Food"), ("description", "Lunch"), ("amount", "12.50")])
            .await
            .assert_status(StatusCode::SEE_OTHER);
        let expense_url = format_endpoint(endpoints::EXPENSE_API, 1);

        server
            .get(&format_endpoint(endpoints::EDIT_EXPENSE_PAGE, 1))
            .add_cookie(bob.clone())
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .put(&expense_url)
            .add_cookie(bob.clone())
            .form(&[("category", "Rent"), ("description", "Rent"), ("amount", "1")])
            .await
            .assert_status(StatusCode::FORBIDDEN);
        server
            .delete(&expense_url)
            .add_cookie(bob)
            .await
            .assert_status(StatusCode::FORBIDDEN);

        server
            .delete(&expense_url)
            .add_cookie(alice)
            .await
            .assert_status_ok();
    }
}
