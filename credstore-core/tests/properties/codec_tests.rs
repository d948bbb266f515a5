//! Property tests for the canonical XML codec

use credstore_core::codec::{self, XmlElement};
use credstore_core::{Credential, SecretError, Token, TokenPair, TokenType};
use proptest::prelude::*;
use uuid::Uuid;

/// Printable text including characters the writer must escape
fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 <>&'\"!#%./:;=?@_~-]{0,64}"
}

/// Text with at least one non-space character
fn non_blank_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9<>&'\"]{1}[a-zA-Z0-9 <>&'\"._~-]{0,63}"
}

fn token_type() -> impl Strategy<Value = TokenType> {
    prop::sample::select(TokenType::ALL.to_vec())
}

fn uuid() -> impl Strategy<Value = Uuid> {
    prop_oneof![Just(Uuid::nil()), any::<u128>().prop_map(Uuid::from_u128)]
}

proptest! {
    /// Property: credentials survive encode/decode field for field
    #[test]
    fn credential_roundtrip(username in text(), password in text()) {
        let credential = Credential::new(username.clone(), password.clone());
        let decoded: Credential = codec::decode(&codec::encode(&credential).unwrap()).unwrap();
        prop_assert_eq!(decoded.username(), username.as_str());
        prop_assert_eq!(decoded.password(), password.as_str());

        let from_document: Credential =
            codec::decode(&codec::encode_document(&credential).unwrap()).unwrap();
        prop_assert_eq!(from_document, credential);
    }

    /// Property: tokens keep type, exact value, and target identity
    #[test]
    fn token_roundtrip(value in non_blank_text(), token_type in token_type(), id in uuid()) {
        let token = Token::with_target_identity(value.clone(), token_type, id).unwrap();
        let decoded: Token = codec::decode(&codec::encode(&token).unwrap()).unwrap();
        prop_assert_eq!(decoded.token_type(), token_type);
        prop_assert_eq!(decoded.value(), value.as_str());
        prop_assert_eq!(decoded.target_identity(), id);
        prop_assert_eq!(decoded, token);
    }

    /// Property: targetIdentity appears exactly when it is not nil
    #[test]
    fn target_identity_omission(value in non_blank_text(), id in uuid()) {
        let token = Token::with_target_identity(value, TokenType::Access, id).unwrap();
        let xml = codec::encode(&token).unwrap();
        prop_assert_eq!(xml.contains("<targetIdentity>"), !id.is_nil());
        if !id.is_nil() {
            let expected = format!("<targetIdentity>{}</targetIdentity>", id.hyphenated());
            prop_assert!(xml.contains(&expected));
        }
    }

    /// Property: token pairs keep both raw token values
    #[test]
    fn token_pair_roundtrip(access in non_blank_text(), refresh in non_blank_text()) {
        let pair = TokenPair::new(access.clone(), refresh.clone()).unwrap();
        let decoded = TokenPair::from_xml_document(&codec::encode_document(&pair).unwrap()).unwrap();
        prop_assert_eq!(decoded.access_token().value(), access.as_str());
        prop_assert_eq!(decoded.refresh_token().value(), refresh.as_str());
        prop_assert_eq!(decoded.access_token().token_type(), TokenType::Access);
        prop_assert_eq!(decoded.refresh_token().token_type(), TokenType::Refresh);
    }

    /// Property: encoded children appear in canonical order
    #[test]
    fn credential_child_order(username in text(), password in text()) {
        let element = XmlElement::parse(
            &codec::encode(&Credential::new(username, password)).unwrap(),
        )
        .unwrap();
        let names: Vec<&str> = element.children().iter().map(|(n, _)| n.as_str()).collect();
        prop_assert_eq!(names, vec!["Password", "Username"]);
        prop_assert_eq!(element.name(), "value");
    }

    /// Property: encoded text escapes markup characters and nothing else
    #[test]
    fn credential_encoding_exact_bytes(username in text(), password in text()) {
        let xml = codec::encode(&Credential::new(username.clone(), password.clone())).unwrap();
        prop_assert_eq!(
            xml,
            format!(
                "<value><Password>{}</Password><Username>{}</Username></value>",
                escape(&password),
                escape(&username)
            )
        );
    }

    /// Property: unknown children never change the decoded value
    #[test]
    fn unknown_children_ignored(username in text(), password in text(), extra in text()) {
        let xml = format!(
            "<value><Extra>{}</Extra><Password>{}</Password><Username>{}</Username></value>",
            escape(&extra),
            escape(&password),
            escape(&username)
        );
        let decoded: Credential = codec::decode(&xml).unwrap();
        prop_assert_eq!(decoded, Credential::new(username, password));
    }

    /// Property: a truncated document is a serialization error, never a value
    #[test]
    fn truncated_document_rejected(username in text(), password in text(), cut in 1usize..20) {
        let xml = codec::encode(&Credential::new(username, password)).unwrap();
        let truncated = &xml[..xml.len() - cut.min(xml.len() - 1)];
        let result = codec::decode::<Credential>(truncated);
        prop_assert!(matches!(result, Err(SecretError::Serialization(_))));
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[test]
fn token_scenario_exact_bytes() {
    let id = Uuid::parse_str("ffffffff-ffff-ffff-ffff-ffffffffffff").unwrap();
    let token = Token::with_target_identity("1", TokenType::Access, id).unwrap();
    assert_eq!(
        codec::encode(&token).unwrap(),
        "<value><Type>Access</Type><Value>1</Value>\
         <targetIdentity>ffffffff-ffff-ffff-ffff-ffffffffffff</targetIdentity></value>"
    );
}

#[test]
fn persisted_form_has_declaration() {
    let xml = codec::encode_document(&Credential::new("u", "p")).unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.ends_with("<value><Password>p</Password><Username>u</Username></value>"));
}
