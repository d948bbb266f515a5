//! Secret value types
//!
//! Every secret is an immutable value object compared by content:
//! - [`Credential`] - username/password pair
//! - [`Token`] - a typed security token
//! - [`TokenPair`] - OAuth-style access/refresh token pair
//!
//! Length limits are checked by [`Secret::validate`], never by the
//! constructors.

mod credential;
mod token;
mod token_pair;

pub use credential::{Credential, PASSWORD_MAX_LENGTH, USERNAME_MAX_LENGTH};
pub use token::{Token, TokenType};
pub use token_pair::TokenPair;

use std::fmt;

use crate::error::SecretResult;

/// Discriminates the kinds of secret the stores can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretKind {
    /// Username/password pair
    Credential,
    /// Single security token
    Token,
    /// Access/refresh token pair
    TokenPair,
}

impl SecretKind {
    /// All kinds, in declaration order
    pub const ALL: [Self; 3] = [Self::Credential, Self::Token, Self::TokenPair];

    /// Discriminator used to namespace native store keys
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Credential => "Credential",
            Self::Token => "Token",
            Self::TokenPair => "OAuth2Token",
        }
    }
}

impl fmt::Display for SecretKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Capability shared by every secret type
pub trait Secret: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// The kind of this secret
    const KIND: SecretKind;

    /// Checks length and required-field constraints
    ///
    /// # Errors
    ///
    /// Returns `SecretError::Validation` describing the first violated
    /// constraint.
    fn validate(&self) -> SecretResult<()>;
}

/// Counts characters as Unicode scalar values
pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Returns true if the string is empty or whitespace only
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
