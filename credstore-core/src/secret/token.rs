//! Security tokens and their types

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use crate::error::{SecretError, SecretResult};

use super::{Credential, PASSWORD_MAX_LENGTH, Secret, SecretKind, char_len, is_blank};

/// Purpose of a security token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenType {
    /// Unknown or unrecognized token
    #[default]
    Unknown,
    /// Access token issued by an identity provider
    Access,
    /// Refresh token used to obtain new access tokens
    Refresh,
    /// Personal access token
    Personal,
    /// Federated authentication token
    Federated,
    /// Token used by tests only
    Test,
}

/// Row of the token type table
struct TokenTypeInfo {
    token_type: TokenType,
    symbol: &'static str,
    description: Option<&'static str>,
}

/// Symbolic and display names for every token type, in ordinal order
static TOKEN_TYPES: [TokenTypeInfo; 6] = [
    TokenTypeInfo {
        token_type: TokenType::Unknown,
        symbol: "Unknown",
        description: None,
    },
    TokenTypeInfo {
        token_type: TokenType::Access,
        symbol: "Access",
        description: Some("Azure Directory Access Token"),
    },
    TokenTypeInfo {
        token_type: TokenType::Refresh,
        symbol: "Refresh",
        description: Some("Azure Directory Refresh Token"),
    },
    TokenTypeInfo {
        token_type: TokenType::Personal,
        symbol: "Personal",
        description: Some("Personal Access Token"),
    },
    TokenTypeInfo {
        token_type: TokenType::Federated,
        symbol: "Federated",
        description: Some("Federated Authentication Token"),
    },
    TokenTypeInfo {
        token_type: TokenType::Test,
        symbol: "Test",
        description: Some("Test-only Token"),
    },
];

/// Lowercased friendly name to token type, built on first use
static FRIENDLY_NAMES: LazyLock<HashMap<String, TokenType>> = LazyLock::new(|| {
    TOKEN_TYPES
        .iter()
        .map(|info| {
            let name = info.description.unwrap_or(info.symbol);
            (name.to_lowercase(), info.token_type)
        })
        .collect()
});

impl TokenType {
    /// All token types, in ordinal order
    pub const ALL: [Self; 6] = [
        Self::Unknown,
        Self::Access,
        Self::Refresh,
        Self::Personal,
        Self::Federated,
        Self::Test,
    ];

    fn info(self) -> &'static TokenTypeInfo {
        &TOKEN_TYPES[self.code() as usize]
    }

    /// Ordinal code of this type
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Access => 1,
            Self::Refresh => 2,
            Self::Personal => 3,
            Self::Federated => 4,
            Self::Test => 5,
        }
    }

    /// Symbolic name, as written in the XML `Type` element
    #[must_use]
    pub fn symbol(self) -> &'static str {
        self.info().symbol
    }

    /// Human-friendly description, if the type has one
    #[must_use]
    pub fn description(self) -> Option<&'static str> {
        self.info().description
    }

    /// Description if present, symbolic name otherwise
    #[must_use]
    pub fn friendly_name(self) -> &'static str {
        self.description().unwrap_or_else(|| self.symbol())
    }

    /// Looks up a type by its exact symbolic name
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        TOKEN_TYPES
            .iter()
            .find(|info| info.symbol == symbol)
            .map(|info| info.token_type)
    }

    /// Looks up a type by friendly name, falling back to the symbolic name.
    /// Both comparisons ignore case.
    ///
    /// # Errors
    ///
    /// Returns `SecretError::Validation` if the name is blank or matches no
    /// known type.
    pub fn from_friendly_name(name: &str) -> SecretResult<Self> {
        if is_blank(name) {
            return Err(SecretError::Validation(
                "the token type name is empty".to_string(),
            ));
        }
        if let Some(token_type) = FRIENDLY_NAMES.get(&name.to_lowercase()) {
            return Ok(*token_type);
        }
        TOKEN_TYPES
            .iter()
            .find(|info| info.symbol.eq_ignore_ascii_case(name))
            .map(|info| info.token_type)
            .ok_or_else(|| {
                SecretError::Validation(format!("unexpected token type '{name}' encountered"))
            })
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for TokenType {
    type Err = SecretError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s)
            .ok_or_else(|| SecretError::MalformedSecret(format!("unknown token type '{s}'")))
    }
}

/// A security token, usually acquired from an authentication service
///
/// Two tokens are equal when their types match and their values match
/// ignoring case. The target identity does not take part in equality.
#[derive(Clone)]
pub struct Token {
    token_type: TokenType,
    value: SecretString,
    target_identity: Uuid,
}

impl Token {
    /// Creates a token with the default (nil) target identity
    ///
    /// # Errors
    ///
    /// Returns `SecretError::Validation` if the value is blank.
    pub fn new(value: impl Into<String>, token_type: TokenType) -> SecretResult<Self> {
        Self::with_target_identity(value, token_type, Uuid::nil())
    }

    /// Creates a token bound to a target identity
    ///
    /// # Errors
    ///
    /// Returns `SecretError::Validation` if the value is blank.
    pub fn with_target_identity(
        value: impl Into<String>,
        token_type: TokenType,
        target_identity: Uuid,
    ) -> SecretResult<Self> {
        let value = value.into();
        if is_blank(&value) {
            return Err(SecretError::Validation(
                "the token value is empty".to_string(),
            ));
        }
        Ok(Self {
            token_type,
            value: SecretString::from(value),
            target_identity,
        })
    }

    /// Creates a token whose type is given by friendly name
    ///
    /// # Errors
    ///
    /// Returns `SecretError::Validation` if the value is blank or the name
    /// matches no known token type.
    pub fn from_friendly_name(value: impl Into<String>, type_name: &str) -> SecretResult<Self> {
        let token_type = TokenType::from_friendly_name(type_name)?;
        Self::new(value, token_type)
    }

    /// The type of the token
    #[must_use]
    pub const fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// The raw contents of the token
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.expose_secret()
    }

    /// The identity the token was issued for; nil when unset
    #[must_use]
    pub const fn target_identity(&self) -> Uuid {
        self.target_identity
    }

    /// Returns true when a non-default target identity is set
    #[must_use]
    pub fn has_target_identity(&self) -> bool {
        !self.target_identity.is_nil()
    }

    /// Converts a personal access token into a credential whose username is
    /// the token type's friendly name
    ///
    /// # Errors
    ///
    /// Returns `SecretError::Validation` for any type other than
    /// [`TokenType::Personal`].
    pub fn to_credential(&self) -> SecretResult<Credential> {
        if self.token_type != TokenType::Personal {
            return Err(SecretError::Validation(format!(
                "cannot convert {self} to credentials"
            )));
        }
        Ok(Credential::new(self.to_string(), self.value()))
    }

    fn folded_value(&self) -> impl Iterator<Item = char> + '_ {
        self.value().chars().flat_map(char::to_lowercase)
    }
}

impl Secret for Token {
    const KIND: SecretKind = SecretKind::Token;

    fn validate(&self) -> SecretResult<()> {
        if is_blank(self.value()) {
            return Err(SecretError::Validation(
                "the token value cannot be empty".to_string(),
            ));
        }
        if char_len(self.value()) > PASSWORD_MAX_LENGTH {
            return Err(SecretError::Validation(format!(
                "the token value cannot be longer than {PASSWORD_MAX_LENGTH} characters"
            )));
        }
        Ok(())
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.token_type == other.token_type && self.folded_value().eq(other.folded_value())
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u8(self.token_type.code());
        for c in self.folded_value() {
            c.hash(state);
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token_type.friendly_name())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("token_type", &self.token_type)
            .field("value", &"[REDACTED]")
            .field("target_identity", &self.target_identity)
            .finish()
    }
}
