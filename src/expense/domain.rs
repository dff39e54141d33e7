//! Core expense domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, expense::Amount, user::UserID};

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// The longest category, in characters, that will be accepted.
pub const CATEGORY_MAX_LENGTH: usize = 30;

/// The longest description, in characters, that will be accepted.
pub const DESCRIPTION_MAX_LENGTH: usize = 50;

/// A validated, non-empty expense category, e.g. "Food" or "Transit".
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Category(String);

impl Category {
    /// Create a category.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategory] if `name` is empty
    /// after trimming, or [Error::TextTooLong] if it is longer than
    /// [CATEGORY_MAX_LENGTH] characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategory)
        } else if name.chars().count() > CATEGORY_MAX_LENGTH {
            Err(Error::TextTooLong {
                field: "category",
                max: CATEGORY_MAX_LENGTH,
            })
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a category without validation.
    ///
    /// The caller should ensure that the string is trimmed, not empty and not
    /// too long.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::new(s)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated, non-empty description of what the money was spent on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Description(String);

impl Description {
    /// Create a description.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyDescription] if `text` is
    /// empty after trimming, or [Error::TextTooLong] if it is longer than
    /// [DESCRIPTION_MAX_LENGTH] characters.
    pub fn new(text: &str) -> Result<Self, Error> {
        let text = text.trim();

        if text.is_empty() {
            Err(Error::EmptyDescription)
        } else if text.chars().count() > DESCRIPTION_MAX_LENGTH {
            Err(Error::TextTooLong {
                field: "description",
                max: DESCRIPTION_MAX_LENGTH,
            })
        } else {
            Ok(Self(text.to_string()))
        }
    }

    /// Create a description without validation.
    pub fn new_unchecked(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl AsRef<str> for Description {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Description {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Money a user spent on a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    pub id: ExpenseId,
    pub user_id: UserID,
    pub category: Category,
    pub description: Description,
    pub amount: Amount,
    pub date: Date,
}

/// The data needed to record a new expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    /// The user that spent the money.
    pub user_id: UserID,
    /// What kind of thing the money was spent on.
    pub category: Category,
    /// What the money was spent on.
    pub description: Description,
    /// How much was spent.
    pub amount: Amount,
    /// The day the money was spent.
    pub date: Date,
}

/// Form data for creating and editing expenses.
///
/// Fields are raw strings so that validation errors can be reported back to
/// the user as an alert instead of a generic 422 response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseForm {
    pub category: String,
    pub description: String,
    pub amount: String,
}

/// The validated fields of an [ExpenseForm].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseFields {
    pub category: Category,
    pub description: Description,
    pub amount: Amount,
}

impl TryFrom<&ExpenseForm> for ExpenseFields {
    type Error = Error;

    fn try_from(form: &ExpenseForm) -> Result<Self, Self::Error> {
        Ok(Self {
            category: Category::new(&form.category)?,
            description: Description::new(&form.description)?,
            amount: form.amount.parse()?,
        })
    }
}

#[cfg(test)]
mod category_tests {
    use crate::{
        Error,
        expense::{Category, domain::CATEGORY_MAX_LENGTH},
    };

    #[test]
    fn new_fails_on_empty_string() {
        let category = Category::new("");

        assert_eq!(category, Err(Error::EmptyCategory));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        let category = Category::new("\n\t \r");

        assert_eq!(category, Err(Error::EmptyCategory));
    }

    #[test]
    fn new_trims_whitespace() {
        let category = Category::new("  Food ").unwrap();

        assert_eq!(category.as_ref(), "Food");
    }

    #[test]
    fn new_fails_on_long_string() {
        let category = Category::new(&"a".repeat(CATEGORY_MAX_LENGTH + 1));

        assert_eq!(
            category,
            Err(Error::TextTooLong {
                field: "category",
                max: CATEGORY_MAX_LENGTH
            })
        );
    }

    #[test]
    fn length_is_counted_in_characters() {
        let category = Category::new(&"🔥".repeat(CATEGORY_MAX_LENGTH));

        assert!(category.is_ok());
    }
}
