//! Accounts and sessions: registration, logging in and out, and the
//! middleware that keeps private pages private.

mod forgot_password;
mod guard;
mod log_in;
mod log_out;
mod register;
mod return_path;
pub(crate) mod session;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::{AppState, db::SharedConnection};

pub use forgot_password::get_forgot_password_page;
pub use guard::{require_session, require_session_hx};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use register::{get_register_page, register_user};
pub use session::{REMEMBERED_SESSION_LENGTH, Session, SessionConfig};

/// What the log-in and registration handlers need: somewhere to look up
/// accounts, and the means to start a session.
#[derive(Debug, Clone)]
pub struct AccountState {
    pub sessions: SessionConfig,
    pub db: SharedConnection,
}

impl FromRef<AppState> for AccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            sessions: state.sessions.clone(),
            db: state.db.clone(),
        }
    }
}

impl FromRef<AccountState> for Key {
    fn from_ref(state: &AccountState) -> Self {
        state.sessions.key.clone()
    }
}
