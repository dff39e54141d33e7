//! Everything request handlers share.

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;

use crate::{
    Error,
    auth::SessionConfig,
    db::{SharedConnection, initialize, share},
};

/// Handlers take the slice they need through `FromRef`: see
/// [AccountState](crate::auth::AccountState) and `ExpenseState`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub sessions: SessionConfig,
    /// A canonical tz database name, e.g. "Pacific/Auckland". Decides which
    /// date counts as today.
    pub timezone: String,
    pub db: SharedConnection,
}

impl AppState {
    /// Create any missing tables in `connection` and derive the session key
    /// from `secret`.
    ///
    /// # Errors
    ///
    /// Returns [Error::Database] if the tables could not be created.
    pub fn new(connection: Connection, secret: &str, timezone: &str) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self {
            sessions: SessionConfig::from_secret(secret),
            timezone: timezone.to_owned(),
            db: share(connection),
        })
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.key.clone()
    }
}
