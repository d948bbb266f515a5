//! OAuth-style access/refresh token pair

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::error::{SecretError, SecretResult};

use super::{Secret, SecretKind, Token, TokenType, is_blank};

/// An access token together with the refresh token that renews it
///
/// Equality compares both tokens; `parameters` are carried along but are
/// neither compared nor persisted.
#[derive(Debug, Clone)]
pub struct TokenPair {
    access_token: Token,
    refresh_token: Token,
    parameters: HashMap<String, String>,
}

impl TokenPair {
    /// Creates a token pair from raw access and refresh token values
    ///
    /// # Errors
    ///
    /// Returns `SecretError::Validation` if either value is blank.
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> SecretResult<Self> {
        let access_token = access_token.into();
        let refresh_token = refresh_token.into();
        if is_blank(&access_token) {
            return Err(SecretError::Validation(
                "the access token is empty".to_string(),
            ));
        }
        if is_blank(&refresh_token) {
            return Err(SecretError::Validation(
                "the refresh token is empty".to_string(),
            ));
        }
        Ok(Self {
            access_token: Token::new(access_token, TokenType::Access)?,
            refresh_token: Token::new(refresh_token, TokenType::Refresh)?,
            parameters: HashMap::new(),
        })
    }

    /// Attaches additional token parameters
    #[must_use]
    pub fn with_parameters(mut self, parameters: HashMap<String, String>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Parses a token pair from an XML document supplied by the caller
    ///
    /// # Errors
    ///
    /// Returns `SecretError::Serialization` for malformed XML and
    /// `SecretError::MalformedSecret` when a token element is missing.
    pub fn from_xml_document(xml: &str) -> SecretResult<Self> {
        crate::codec::decode(xml)
    }

    /// Access token, used to grant access to resources
    #[must_use]
    pub const fn access_token(&self) -> &Token {
        &self.access_token
    }

    /// Refresh token, used to obtain new access tokens
    #[must_use]
    pub const fn refresh_token(&self) -> &Token {
        &self.refresh_token
    }

    /// Additional token parameters
    #[must_use]
    pub const fn parameters(&self) -> &HashMap<String, String> {
        &self.parameters
    }
}

impl Secret for TokenPair {
    const KIND: SecretKind = SecretKind::TokenPair;

    fn validate(&self) -> SecretResult<()> {
        self.access_token.validate()?;
        self.refresh_token.validate()
    }
}

impl PartialEq for TokenPair {
    fn eq(&self, other: &Self) -> bool {
        self.access_token == other.access_token && self.refresh_token == other.refresh_token
    }
}

impl Eq for TokenPair {}

impl Hash for TokenPair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.access_token.hash(state);
        self.refresh_token.hash(state);
    }
}
