//! Username/password credential

use std::fmt;
use std::hash::{Hash, Hasher};

use secrecy::{ExposeSecret, SecretString};

use crate::error::{SecretError, SecretResult};

use super::{Secret, SecretKind, char_len};

/// Maximum number of characters in a username
pub const USERNAME_MAX_LENGTH: usize = 511;

/// Maximum number of characters in a password or token value
pub const PASSWORD_MAX_LENGTH: usize = 2047;

/// Credential for user authentication
///
/// Absent fields are normalized to the empty string. Both fields compare
/// case-sensitively.
#[derive(Clone)]
pub struct Credential {
    username: String,
    password: SecretString,
}

impl Credential {
    /// Creates a credential from a username and password
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Creates a credential with only a username; the password is empty
    #[must_use]
    pub fn with_username(username: impl Into<String>) -> Self {
        Self::new(username, String::new())
    }

    /// Creates a credential from optional parts, treating `None` as empty
    #[must_use]
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Self {
        Self::new(username.unwrap_or_default(), password.unwrap_or_default())
    }

    /// Unique identifier of the user
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Secret related to the username
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

impl Secret for Credential {
    const KIND: SecretKind = SecretKind::Credential;

    fn validate(&self) -> SecretResult<()> {
        if char_len(self.password()) > PASSWORD_MAX_LENGTH {
            return Err(SecretError::Validation(format!(
                "the password cannot be longer than {PASSWORD_MAX_LENGTH} characters"
            )));
        }
        if char_len(&self.username) > USERNAME_MAX_LENGTH {
            return Err(SecretError::Validation(format!(
                "the username cannot be longer than {USERNAME_MAX_LENGTH} characters"
            )));
        }
        Ok(())
    }
}

impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username && self.password() == other.password()
    }
}

impl Eq for Credential {}

/// Feeds both fields to the hasher in order rather than computing
/// `hash(username) + 7 * hash(password)`; only agreement with `Eq` matters.
impl Hash for Credential {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.username.hash(state);
        self.password().hash(state);
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
