//! Property tests for secret equality and validation rules

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use credstore_core::{
    Credential, PASSWORD_MAX_LENGTH, Secret, SecretError, Token, TokenType, USERNAME_MAX_LENGTH,
};
use proptest::prelude::*;

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

proptest! {
    /// Property: token values compare ignoring case, with equal hashes
    #[test]
    fn token_value_case_insensitive(value in "[a-zA-Z][a-zA-Z0-9]{0,40}") {
        let upper = Token::new(value.to_uppercase(), TokenType::Access).unwrap();
        let lower = Token::new(value.to_lowercase(), TokenType::Access).unwrap();
        prop_assert_eq!(&upper, &lower);
        prop_assert_eq!(hash_of(&upper), hash_of(&lower));
    }

    /// Property: tokens of different types never compare equal
    #[test]
    fn token_type_distinguishes(value in "[a-z0-9]{1,20}") {
        let access = Token::new(value.clone(), TokenType::Access).unwrap();
        let refresh = Token::new(value, TokenType::Refresh).unwrap();
        prop_assert_ne!(access, refresh);
    }

    /// Property: credential usernames compare case-sensitively
    #[test]
    fn credential_username_case_sensitive(name in "[a-z]{1,20}", password in "[a-z]{0,20}") {
        let lower = Credential::new(name.clone(), password.clone());
        let upper = Credential::new(name.to_uppercase(), password.clone());
        prop_assert_ne!(&lower, &upper);
        prop_assert_eq!(&lower, &Credential::new(name, password));
    }

    /// Property: equal credentials hash equally; swapping fields changes the hash input
    #[test]
    fn credential_hash_agrees_with_eq(username in "[a-z]{1,20}", password in "[A-Z]{1,20}") {
        let first = Credential::new(username.clone(), password.clone());
        let second = Credential::new(username.clone(), password.clone());
        prop_assert_eq!(hash_of(&first), hash_of(&second));

        let swapped = Credential::new(password, username);
        prop_assert_ne!(&first, &swapped);
        prop_assert_ne!(hash_of(&first), hash_of(&swapped));
    }

    /// Property: credential validation accepts exactly the lengths in range
    #[test]
    fn credential_length_limits(username_len in 0usize..600, password_len in 0usize..2200) {
        let credential = Credential::new("é".repeat(username_len), "p".repeat(password_len));
        let valid = username_len <= USERNAME_MAX_LENGTH && password_len <= PASSWORD_MAX_LENGTH;
        match credential.validate() {
            Ok(()) => prop_assert!(valid),
            Err(e) => {
                prop_assert!(!valid);
                prop_assert!(matches!(e, SecretError::Validation(_)));
            }
        }
    }

    /// Property: token validation rejects only overlong values
    #[test]
    fn token_length_limit(len in 1usize..2200) {
        let token = Token::new("t".repeat(len), TokenType::Personal).unwrap();
        prop_assert_eq!(token.validate().is_ok(), len <= PASSWORD_MAX_LENGTH);
    }

    /// Property: friendly name lookup ignores case
    #[test]
    fn friendly_name_case_insensitive(idx in 0usize..TokenType::ALL.len(), upper in any::<bool>()) {
        let token_type = TokenType::ALL[idx];
        let name = token_type.friendly_name();
        let query = if upper { name.to_uppercase() } else { name.to_lowercase() };
        prop_assert_eq!(TokenType::from_friendly_name(&query).unwrap(), token_type);
    }
}

#[test]
fn constructors_accept_overlong_values() {
    let long = "x".repeat(PASSWORD_MAX_LENGTH + 1);
    let credential = Credential::new(long.clone(), long.clone());
    assert!(credential.validate().is_err());
    assert!(Token::new(long, TokenType::Test).is_ok());
}

#[test]
fn blank_token_values_rejected_at_construction() {
    assert!(matches!(
        Token::new("  ", TokenType::Access),
        Err(SecretError::Validation(_))
    ));
}

#[test]
fn unknown_friendly_name_rejected() {
    assert!(Token::from_friendly_name("v", "Not A Token Type").is_err());
    let token = Token::from_friendly_name("v", "personal access token").unwrap();
    assert_eq!(token.token_type(), TokenType::Personal);
}
