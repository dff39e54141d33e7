//! Password strength checks and bcrypt hashing.

use std::fmt;

use zxcvbn::{Score, zxcvbn};

use crate::Error;

/// A plain-text password that scored well enough on the zxcvbn strength check.
///
/// Never printed: the `Debug` impl masks the text.
#[derive(Clone, PartialEq)]
pub struct StrongPassword(String);

impl StrongPassword {
    /// # Errors
    ///
    /// Returns [Error::WeakPassword] with zxcvbn's suggestions if `raw` scores
    /// below three out of four.
    pub fn check(raw: &str) -> Result<Self, Error> {
        let entropy = zxcvbn(raw, &[]);

        if entropy.score() >= Score::Three {
            return Ok(Self(raw.to_owned()));
        }

        let advice = entropy
            .feedback()
            .map(|feedback| feedback.to_string())
            .unwrap_or_else(|| "Use a longer password.".to_owned());

        Err(Error::WeakPassword(advice))
    }

    /// Skip the strength check, for seeding fixture accounts.
    pub fn trusted(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

impl fmt::Debug for StrongPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StrongPassword(********)")
    }
}

/// A salted bcrypt hash as stored in the user table.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with `cost` rounds. Tests use the minimum cost of 4.
    ///
    /// # Errors
    ///
    /// Returns [Error::Hashing] if bcrypt rejects the cost.
    pub fn create(password: &StrongPassword, cost: u32) -> Result<Self, Error> {
        bcrypt::hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::Hashing(error.to_string()))
    }

    /// Wrap a hash read back from the database.
    pub fn from_stored(hash: String) -> Self {
        Self(hash)
    }

    /// # Errors
    ///
    /// Returns [Error::Hashing] if the stored hash is malformed.
    pub fn matches(&self, raw: &str) -> Result<bool, Error> {
        bcrypt::verify(raw, &self.0).map_err(|error| Error::Hashing(error.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
