//! Accounts: validated usernames and emails, and the `user` table.

use std::fmt;

use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, PasswordHash};

/// The row ID of a user. Expenses and sessions refer to their owner by this ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserID(i64);

impl UserID {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub const USERNAME_MIN_LENGTH: usize = 4;
pub const USERNAME_MAX_LENGTH: usize = 10;
pub const EMAIL_MAX_LENGTH: usize = 30;

/// A login name of 4 to 10 characters, surrounding whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// # Errors
    ///
    /// Returns [Error::InvalidUsername] if the trimmed name is too short or too long.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        match name.chars().count() {
            USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH => Ok(Self(name.to_owned())),
            _ => Err(Error::InvalidUsername(format!(
                "must be between {USERNAME_MIN_LENGTH} and {USERNAME_MAX_LENGTH} characters"
            ))),
        }
    }

    /// Wrap a name that was validated before it was stored.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An address with a single `@` and something on both sides of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// # Errors
    ///
    /// Returns [Error::InvalidEmail] if the address is malformed or longer
    /// than [EMAIL_MAX_LENGTH] characters.
    pub fn new(address: &str) -> Result<Self, Error> {
        let address = address.trim();

        if address.chars().count() > EMAIL_MAX_LENGTH {
            return Err(Error::InvalidEmail(format!(
                "must be at most {EMAIL_MAX_LENGTH} characters"
            )));
        }

        let well_formed = address
            .split_once('@')
            .is_some_and(|(mailbox, host)| {
                !mailbox.is_empty() && !host.is_empty() && !host.contains('@')
            });

        if well_formed {
            Ok(Self(address.to_owned()))
        } else {
            Err(Error::InvalidEmail(format!("{address} is not an email address")))
        }
    }

    pub fn new_unchecked(address: &str) -> Self {
        Self(address.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserID,
    pub email: Email,
    pub username: Username,
    pub password_hash: PasswordHash,
}

/// An account that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: Email,
    pub username: Username,
    pub password_hash: PasswordHash,
}

pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS user (
            id INTEGER PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            username TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        );",
    )
}

/// Save `new_user` and return it with its assigned ID.
///
/// # Errors
///
/// Returns [Error::UsernameTaken] or [Error::EmailTaken] when another account
/// already uses the name or address.
pub fn create_user(new_user: NewUser, connection: &Connection) -> Result<User, Error> {
    let id = connection.query_row(
        "INSERT INTO user (email, username, password) VALUES (?1, ?2, ?3) RETURNING id",
        (
            new_user.email.as_str(),
            new_user.username.as_str(),
            new_user.password_hash.as_str(),
        ),
        |row| row.get(0),
    )?;

    Ok(User {
        id: UserID::new(id),
        email: new_user.email,
        username: new_user.username,
        password_hash: new_user.password_hash,
    })
}

/// # Errors
///
/// Returns [Error::NotFound] if no account has the ID.
pub fn get_user_by_id(id: UserID, connection: &Connection) -> Result<User, Error> {
    Ok(connection.query_row(
        "SELECT id, email, username, password FROM user WHERE id = ?1",
        [id.as_i64()],
        read_user,
    )?)
}

/// Look up the account for a log-in attempt. An unknown name is `Ok(None)`.
pub fn get_user_by_username(
    username: &Username,
    connection: &Connection,
) -> Result<Option<User>, Error> {
    Ok(connection
        .query_row(
            "SELECT id, email, username, password FROM user WHERE username = ?1",
            [username.as_str()],
            read_user,
        )
        .optional()?)
}

/// # Errors
///
/// Returns [Error::NotFound] if no account has the ID.
pub fn update_password(
    id: UserID,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<(), Error> {
    let changed = connection.execute(
        "UPDATE user SET password = ?1 WHERE id = ?2",
        (password_hash.as_str(), id.as_i64()),
    )?;

    match changed {
        0 => Err(Error::NotFound),
        _ => Ok(()),
    }
}

fn read_user(row: &Row) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: UserID::new(row.get(0)?),
        email: Email::new_unchecked(&row.get::<_, String>(1)?),
        username: Username::new_unchecked(&row.get::<_, String>(2)?),
        password_hash: PasswordHash::from_stored(row.get(3)?),
    })
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use rusqlite::Connection;

    use crate::{
        PasswordHash,
        user::{Email, NewUser, User, Username, create_user},
    };

    /// Save an account called `username`. Its password hash is not a real
    /// bcrypt hash, so it cannot log in.
    #[track_caller]
    pub(crate) fn must_create_user(username: &str, connection: &Connection) -> User {
        create_user(
            NewUser {
                email: Email::new_unchecked(&format!("{username}@example.com")),
                username: Username::new_unchecked(username),
                password_hash: PasswordHash::from_stored("not-a-hash".to_owned()),
            },
            connection,
        )
        .expect("Could not create test user")
    }
}
