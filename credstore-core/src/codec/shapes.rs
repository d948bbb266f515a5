//! Element shapes of the three secret types

use uuid::Uuid;

use crate::error::{SecretError, SecretResult};
use crate::secret::{Credential, Token, TokenPair, TokenType};

use super::{ROOT_ELEMENT, XmlElement, XmlSecret};

const PASSWORD: &str = "Password";
const USERNAME: &str = "Username";
const TYPE: &str = "Type";
const VALUE: &str = "Value";
const TARGET_IDENTITY: &str = "targetIdentity";
const ACCESS_TOKEN: &str = "accessToken";
const REFRESH_TOKEN: &str = "refreshToken";

/// Re-labels a constructor failure on decoded data as a malformed secret
fn malformed(err: SecretError) -> SecretError {
    match err {
        SecretError::Validation(msg) => SecretError::MalformedSecret(msg),
        other => other,
    }
}

impl XmlSecret for Credential {
    fn to_element(&self) -> XmlElement {
        XmlElement::new(ROOT_ELEMENT)
            .with_child(PASSWORD, self.password())
            .with_child(USERNAME, self.username())
    }

    fn from_element(element: &XmlElement) -> SecretResult<Self> {
        let password = element.required_child(PASSWORD)?;
        let username = element.required_child(USERNAME)?;
        Ok(Self::new(username, password))
    }
}

impl XmlSecret for Token {
    fn to_element(&self) -> XmlElement {
        let element = XmlElement::new(ROOT_ELEMENT)
            .with_child(TYPE, self.token_type().symbol())
            .with_child(VALUE, self.value());
        if self.has_target_identity() {
            element.with_child(
                TARGET_IDENTITY,
                self.target_identity().hyphenated().to_string(),
            )
        } else {
            element
        }
    }

    fn from_element(element: &XmlElement) -> SecretResult<Self> {
        let token_type: TokenType = element.required_child(TYPE)?.parse()?;
        let value = element.required_child(VALUE)?;
        let target_identity = match element.child_text(TARGET_IDENTITY) {
            Some(text) => Uuid::parse_str(text.trim()).map_err(|e| {
                SecretError::MalformedSecret(format!("invalid targetIdentity '{text}': {e}"))
            })?,
            None => Uuid::nil(),
        };
        Self::with_target_identity(value, token_type, target_identity).map_err(malformed)
    }
}

impl XmlSecret for TokenPair {
    fn to_element(&self) -> XmlElement {
        XmlElement::new(ROOT_ELEMENT)
            .with_child(ACCESS_TOKEN, self.access_token().value())
            .with_child(REFRESH_TOKEN, self.refresh_token().value())
    }

    fn from_element(element: &XmlElement) -> SecretResult<Self> {
        let access_token = element.required_child(ACCESS_TOKEN)?;
        let refresh_token = element.required_child(REFRESH_TOKEN)?;
        Self::new(access_token, refresh_token).map_err(malformed)
    }
}
