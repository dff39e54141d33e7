//! Command line and environment configuration for the web server.

use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

use crate::{Error, timezone::get_local_offset};

/// The web server for Outlay, an expense tracker.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct ServerConfig {
    /// File path to the application SQLite database.
    #[arg(long, env = "OUTLAY_DB_PATH")]
    pub db_path: PathBuf,

    /// The port to serve the app from.
    #[arg(short, long, env = "OUTLAY_PORT", default_value_t = 3000)]
    pub port: u16,

    /// The canonical name of the timezone that expenses are dated in, e.g. "Pacific/Auckland".
    #[arg(long, env = "OUTLAY_TIMEZONE", default_value = "Etc/UTC")]
    pub timezone: String,

    /// The log filter, e.g. "info" or "outlay_rs=debug,tower_http=info".
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// The secret used to derive the key that encrypts auth cookies.
    #[arg(long, env = "SECRET", hide_env_values = true)]
    pub secret: String,
}

impl ServerConfig {
    /// Check the settings that clap cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns [Error::UnknownTimezone] if the timezone is not a known
    /// canonical timezone name, or [Error::InvalidConfig] if the secret is blank.
    pub fn validate(&self) -> Result<(), Error> {
        if get_local_offset(&self.timezone).is_none() {
            return Err(Error::UnknownTimezone(self.timezone.clone()));
        }

        if self.secret.trim().is_empty() {
            return Err(Error::InvalidConfig("the secret must not be blank".to_owned()));
        }

        Ok(())
    }

    /// The local address to listen on.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], self.port))
    }
}
