//! A validated display name shared by wallets, categories, goals and bills.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::Error;

/// The maximum number of user-perceived characters (graphemes) in a name.
pub const MAX_NAME_LENGTH: usize = 64;

/// A trimmed, non-empty name of at most [MAX_NAME_LENGTH] graphemes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    /// Create a name, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return:
    /// - [Error::EmptyName] if `name` is empty or only whitespace,
    /// - [Error::NameTooLong] if `name` has more than [MAX_NAME_LENGTH] graphemes.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            return Err(Error::EmptyName);
        }

        if name.graphemes(true).count() > MAX_NAME_LENGTH {
            return Err(Error::NameTooLong(MAX_NAME_LENGTH));
        }

        Ok(Self(name.to_owned()))
    }

    /// Create a name without validation.
    ///
    /// The caller should ensure that the string is trimmed and not empty,
    /// e.g. because it was loaded from the database.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// The key used to compare names regardless of letter case.
    pub fn comparison_key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
