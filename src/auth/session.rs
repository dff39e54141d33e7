//! The log-in session, carried in an encrypted cookie.
//!
//! The cookie holds `{"user_id": .., "expires_at": <unix seconds>}`. It is
//! encrypted with [SessionConfig::key], so the browser can neither read nor
//! forge it.

use axum::extract::FromRef;
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, Key, SameSite},
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use time::{Duration, OffsetDateTime};

use crate::{AppState, Error, user::UserID};

pub(crate) const SESSION_COOKIE: &str = "session";

/// How long a session lasts without activity.
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::minutes(5);

/// Session length when the user ticks "remember me".
pub const REMEMBERED_SESSION_LENGTH: Duration = Duration::days(7);

/// How sessions are sealed and how long they last.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub key: Key,
    /// Added to the expiry on every authenticated request. Never shorter
    /// than [SESSION_IDLE_TIMEOUT].
    pub lifetime: Duration,
}

impl SessionConfig {
    /// Derive the cookie key from `secret`. The same secret always gives the
    /// same key, so sessions survive a server restart.
    pub fn from_secret(secret: &str) -> Self {
        Self {
            key: Key::from(&Sha512::digest(secret)),
            lifetime: SESSION_IDLE_TIMEOUT,
        }
    }
}

impl FromRef<AppState> for SessionConfig {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<SessionConfig> for Key {
    fn from_ref(config: &SessionConfig) -> Self {
        config.key.clone()
    }
}

/// Who is logged in, and until when (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserID,
    #[serde(with = "time::serde::timestamp")]
    pub expires_at: OffsetDateTime,
}

impl Session {
    /// # Errors
    ///
    /// Returns [Error::SessionExpiryOverflow] if `lifetime` pushes the expiry
    /// past the largest representable date.
    pub fn start(user_id: UserID, lifetime: Duration) -> Result<Self, Error> {
        let expires_at = OffsetDateTime::now_utc()
            .checked_add(lifetime)
            .ok_or(Error::SessionExpiryOverflow)?;

        Ok(Self {
            user_id,
            expires_at,
        })
    }

    /// # Errors
    ///
    /// Returns [Error::NoSession] if the cookie is missing, unreadable or expired.
    pub fn from_jar(jar: &PrivateCookieJar) -> Result<Self, Error> {
        let cookie = jar.get(SESSION_COOKIE).ok_or(Error::NoSession)?;

        let session: Session = serde_json::from_str(cookie.value()).map_err(|error| {
            tracing::debug!("discarding unreadable session cookie: {error}");
            Error::NoSession
        })?;

        if session.expires_at <= OffsetDateTime::now_utc() {
            return Err(Error::NoSession);
        }

        Ok(session)
    }

    /// Push the expiry out to at least `lifetime` from now. Never shortens a
    /// session, so a remembered session keeps its week.
    ///
    /// # Errors
    ///
    /// Returns [Error::SessionExpiryOverflow] if the new expiry is out of range.
    pub fn renew(self, lifetime: Duration) -> Result<Self, Error> {
        let renewed = Session::start(self.user_id, lifetime.max(SESSION_IDLE_TIMEOUT))?;

        Ok(Self {
            expires_at: self.expires_at.max(renewed.expires_at),
            ..self
        })
    }

    /// Write the session into `jar`, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns [Error::Json] if the session could not be encoded.
    pub fn save(&self, jar: PrivateCookieJar) -> Result<PrivateCookieJar, Error> {
        let value = serde_json::to_string(self).map_err(|error| Error::Json(error.to_string()))?;

        Ok(jar.add(session_cookie(value, self.expires_at)))
    }
}

/// Overwrite the session cookie with one the browser discards immediately.
pub fn end_session(jar: PrivateCookieJar) -> PrivateCookieJar {
    let mut cookie = session_cookie(String::new(), OffsetDateTime::UNIX_EPOCH);
    cookie.set_max_age(Duration::ZERO);

    jar.add(cookie)
}

fn session_cookie(value: String, expires_at: OffsetDateTime) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .expires(expires_at)
        .build()
}


#[cfg(test)]
mod tests {
    use axum::{
        http::{HeaderMap, header::COOKIE},
        response::IntoResponse,
    };
    use axum_extra::extract::{PrivateCookieJar, cookie::Cookie};
    use time::{Duration, OffsetDateTime};

    use crate::{Error, user::UserID};

    use super::{
        REMEMBERED_SESSION_LENGTH, SESSION_COOKIE, SESSION_IDLE_TIMEOUT, Session, SessionConfig,
        end_session, test_helpers::test_sessions,
    };

    /// Send `jar`'s cookies back the way a browser would.
    fn round_trip(jar: PrivateCookieJar, config: &SessionConfig) -> PrivateCookieJar {
        let response = jar.into_response();
        let mut headers = HeaderMap::new();
        for set_cookie in response.headers().get_all("set-cookie") {
            let cookie = Cookie::parse(set_cookie.to_str().unwrap().to_owned()).unwrap();
            headers.append(
                COOKIE,
                format!("{}={}", cookie.name(), cookie.value()).parse().unwrap(),
            );
        }

        PrivateCookieJar::from_headers(&headers, config.key.clone())
    }

    #[test]
    fn saved_session_reads_back() {
        let config = test_sessions();
        let session = Session::start(UserID::new(3), SESSION_IDLE_TIMEOUT).unwrap();

        let jar = round_trip(
            session.save(PrivateCookieJar::new(config.key.clone())).unwrap(),
            &config,
        );

        let read = Session::from_jar(&jar).unwrap();
        assert_eq!(read.user_id, UserID::new(3));
        assert_eq!(
            read.expires_at.unix_timestamp(),
            session.expires_at.unix_timestamp()
        );
    }

    #[test]
    fn cookie_from_another_key_is_ignored() {
        let session = Session::start(UserID::new(3), SESSION_IDLE_TIMEOUT).unwrap();
        let jar = session
            .save(PrivateCookieJar::new(test_sessions().key))
            .unwrap();

        let other = SessionConfig::from_secret("some other secret entirely");
        let jar = round_trip(jar, &other);

        assert_eq!(Session::from_jar(&jar), Err(Error::NoSession));
    }

    #[test]
    fn expired_session_is_rejected() {
        let config = test_sessions();
        let session = Session {
            user_id: UserID::new(3),
            expires_at: OffsetDateTime::now_utc() - Duration::seconds(1),
        };

        let jar = round_trip(
            session.save(PrivateCookieJar::new(config.key.clone())).unwrap(),
            &config,
        );

        assert_eq!(Session::from_jar(&jar), Err(Error::NoSession));
    }

    #[test]
    fn missing_cookie_is_no_session() {
        let jar = PrivateCookieJar::new(test_sessions().key);

        assert_eq!(Session::from_jar(&jar), Err(Error::NoSession));
    }

    #[test]
    fn expiry_is_stored_as_unix_seconds() {
        let session = Session {
            user_id: UserID::new(1),
            expires_at: OffsetDateTime::UNIX_EPOCH + Duration::seconds(90),
        };

        assert_eq!(
            serde_json::to_string(&session).unwrap(),
            r#"{"user_id":1,"expires_at":90}"#
        );
    }

    #[test]
    fn renewal_extends_short_session() {
        let session = Session {
            user_id: UserID::new(1),
            expires_at: OffsetDateTime::now_utc() + Duration::seconds(10),
        };

        let renewed = session.renew(SESSION_IDLE_TIMEOUT).unwrap();

        assert!(renewed.expires_at > OffsetDateTime::now_utc() + Duration::minutes(4));
    }

    #[test]
    fn renewal_keeps_remembered_expiry() {
        let session = Session::start(UserID::new(1), REMEMBERED_SESSION_LENGTH).unwrap();

        let renewed = session.renew(SESSION_IDLE_TIMEOUT).unwrap();

        assert_eq!(renewed.expires_at, session.expires_at);
    }

    #[test]
    fn renewal_never_goes_below_idle_timeout() {
        let session = Session {
            user_id: UserID::new(1),
            expires_at: OffsetDateTime::now_utc(),
        };

        let renewed = session.renew(Duration::seconds(1)).unwrap();

        assert!(renewed.expires_at > OffsetDateTime::now_utc() + Duration::minutes(4));
    }

    #[test]
    fn overflowing_lifetime_is_an_error() {
        assert_eq!(
            Session::start(UserID::new(1), Duration::MAX),
            Err(Error::SessionExpiryOverflow)
        );
    }

    #[test]
    fn ended_session_cookie_is_already_expired() {
        let jar = end_session(PrivateCookieJar::new(test_sessions().key));

        let cookie = jar.into_response().headers()["set-cookie"]
            .to_str()
            .unwrap()
            .to_owned();
        let cookie = Cookie::parse(cookie).unwrap();
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
    }
}
