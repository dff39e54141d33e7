//! Outlay is a web app for recording day-to-day expenses and seeing where the
//! money goes.
//!
//! This library provides a REST API that directly serves HTML pages. Users
//! register, log in, record expenses against free-text categories, and view
//! charts built from aggregates over their own expenses.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod config;
mod db;
mod endpoints;
mod error;
mod expense;
mod html;
mod logging;
mod navigation;
mod password;
mod routing;
mod status_page;
mod timezone;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use config::ServerConfig;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use expense::{
    Amount, Category, CategoryBreakdown, DateTotal, Description, NewExpense,
    build_category_breakdown, build_date_series, category_total_for_date, category_usage_count,
    create_expense, distinct_categories_for_date, distinct_expense_dates, total_expense_for_date,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use password::{PasswordHash, StrongPassword};
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use user::{
    Email, NewUser, User, UserID, Username, create_user, get_user_by_id, get_user_by_username,
    update_password,
};

/// Resolve once the process is asked to stop, by Ctrl+C or SIGTERM, and give
/// in-flight requests on `handle`'s server a second to finish.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let interrupt = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("could not listen for Ctrl+C: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(error) => {
                tracing::error!("could not listen for SIGTERM: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        () = interrupt => "Ctrl+C",
        () = terminate => "SIGTERM",
    };

    tracing::info!("received {signal}, shutting down");
    handle.graceful_shutdown(Some(Duration::from_secs(1)));
}
