//! Canonical XML format shared by every backend
//!
//! A secret is written as a single `<value>` element whose children are
//! text-only elements in a fixed order, for example:
//!
//! ```text
//! <value><Password>s3cr3t</Password><Username>alice</Username></value>
//! ```
//!
//! Backends persist the whole document form, which prefixes the element
//! with a standard UTF-8 XML declaration. Decoding ignores unknown child
//! elements. Malformed XML is reported as `SecretError::Serialization`;
//! well-formed XML missing required fields as `SecretError::MalformedSecret`.

mod shapes;

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesEnd, BytesRef, BytesStart, BytesText, Event};

use crate::error::{SecretError, SecretResult};

/// Name of the root element of every secret
pub const ROOT_ELEMENT: &str = "value";

/// Declaration written at the top of persisted documents
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// A secret type with a canonical XML shape
pub trait XmlSecret: Sized {
    /// Projects the secret onto its root element
    fn to_element(&self) -> XmlElement;

    /// Rebuilds the secret from a parsed root element
    ///
    /// # Errors
    ///
    /// Returns `SecretError::MalformedSecret` if a required child is
    /// missing or holds an invalid value.
    fn from_element(element: &XmlElement) -> SecretResult<Self>;
}

/// An element with text-only children, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    children: Vec<(String, String)>,
}

impl XmlElement {
    /// Creates an element with no children
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Appends a text child
    #[must_use]
    pub fn with_child(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.children.push((name.into(), text.into()));
        self
    }

    /// Element name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Children as `(name, text)` pairs
    #[must_use]
    pub fn children(&self) -> &[(String, String)] {
        &self.children
    }

    /// Text of the first child with the given name
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.children
            .iter()
            .find(|(child, _)| child == name)
            .map(|(_, text)| text.as_str())
    }

    /// Text of a child that must be present
    ///
    /// # Errors
    ///
    /// Returns `SecretError::MalformedSecret` if no such child exists.
    pub fn required_child(&self, name: &str) -> SecretResult<&str> {
        self.child_text(name).ok_or_else(|| {
            SecretError::MalformedSecret(format!(
                "<{}> is missing required element <{name}>",
                self.name
            ))
        })
    }

    /// Writes the element without an XML declaration
    ///
    /// # Errors
    ///
    /// Returns `SecretError::Serialization` if the writer fails.
    pub fn to_xml_string(&self) -> SecretResult<String> {
        let mut writer = Writer::new(Vec::new());
        write_event(&mut writer, Event::Start(BytesStart::new(self.name.as_str())))?;
        for (name, text) in &self.children {
            write_event(&mut writer, Event::Start(BytesStart::new(name.as_str())))?;
            if !text.is_empty() {
                write_event(
                    &mut writer,
                    Event::Text(BytesText::from_escaped(escape_text(text))),
                )?;
            }
            write_event(&mut writer, Event::End(BytesEnd::new(name.as_str())))?;
        }
        write_event(&mut writer, Event::End(BytesEnd::new(self.name.as_str())))?;

        String::from_utf8(writer.into_inner())
            .map_err(|e| SecretError::Serialization(format!("writer produced invalid UTF-8: {e}")))
    }

    /// Parses the root element of an XML document or fragment
    ///
    /// Grandchildren are skipped; only direct children contribute text.
    ///
    /// # Errors
    ///
    /// Returns `SecretError::Serialization` if the input is not well-formed
    /// or has no single root element.
    pub fn parse(xml: &str) -> SecretResult<Self> {
        let xml = xml.trim_start_matches('\u{feff}');
        let mut reader = Reader::from_str(xml);

        let mut root: Option<Self> = None;
        let mut root_closed = false;
        let mut depth = 0_usize;
        let mut child: Option<(String, String)> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                SecretError::Serialization(format!(
                    "{e} at position {}",
                    reader.error_position()
                ))
            })?;

            match event {
                Event::Start(e) => {
                    let name = element_name(&e);
                    depth += 1;
                    match depth {
                        1 => {
                            if root_closed {
                                return Err(multiple_roots());
                            }
                            root = Some(Self::new(name));
                        }
                        2 => child = Some((name, String::new())),
                        _ => {}
                    }
                }
                Event::Empty(e) => {
                    let name = element_name(&e);
                    match depth {
                        0 => {
                            if root.is_some() {
                                return Err(multiple_roots());
                            }
                            root = Some(Self::new(name));
                            root_closed = true;
                        }
                        1 => {
                            if let Some(root) = root.as_mut() {
                                root.children.push((name, String::new()));
                            }
                        }
                        _ => {}
                    }
                }
                Event::Text(e) => {
                    let text = String::from_utf8_lossy(&e);
                    if depth == 0 && !text.trim().is_empty() {
                        return Err(SecretError::Serialization(
                            "text content outside the root element".to_string(),
                        ));
                    }
                    if depth == 2
                        && let Some((_, buf)) = child.as_mut()
                    {
                        buf.push_str(&text);
                    }
                }
                Event::CData(e) => {
                    if depth == 2
                        && let Some((_, buf)) = child.as_mut()
                    {
                        buf.push_str(&String::from_utf8_lossy(&e));
                    }
                }
                Event::GeneralRef(e) => {
                    let resolved = resolve_reference(&e)?;
                    if depth == 0 {
                        return Err(SecretError::Serialization(
                            "entity reference outside the root element".to_string(),
                        ));
                    }
                    if depth == 2
                        && let Some((_, buf)) = child.as_mut()
                    {
                        buf.push_str(&resolved);
                    }
                }
                Event::End(_) => {
                    if depth == 2
                        && let (Some(done), Some(root)) = (child.take(), root.as_mut())
                    {
                        root.children.push(done);
                    }
                    if depth == 1 {
                        root_closed = true;
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions, doctype
                _ => {}
            }
        }

        if depth != 0 {
            return Err(SecretError::Serialization(
                "unexpected end of document: unclosed element".to_string(),
            ));
        }
        root.ok_or_else(|| SecretError::Serialization("document has no root element".to_string()))
    }
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> SecretResult<()> {
    writer
        .write_event(event)
        .map_err(|e| SecretError::Serialization(e.to_string()))
}

/// Escapes `<`, `>` and `&` only; `\r` becomes `&#13;` so XML readers
/// do not fold it into a newline
fn escape_text(text: &str) -> Cow<'_, str> {
    let escaped = partial_escape(text);
    if escaped.contains('\r') {
        Cow::Owned(escaped.replace('\r', "&#13;"))
    } else {
        escaped
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn multiple_roots() -> SecretError {
    SecretError::Serialization("document has more than one root element".to_string())
}

/// Expands `&name;` and `&#NN;` references
fn resolve_reference(e: &BytesRef<'_>) -> SecretResult<Cow<'static, str>> {
    if let Some(ch) = e
        .resolve_char_ref()
        .map_err(|err| SecretError::Serialization(err.to_string()))?
    {
        return Ok(Cow::Owned(ch.to_string()));
    }
    let name = String::from_utf8_lossy(e);
    quick_xml::escape::resolve_predefined_entity(&name)
        .map(Cow::Borrowed)
        .ok_or_else(|| SecretError::Serialization(format!("unknown entity reference &{name};")))
}

/// Encodes a secret as its canonical element, without declaration
///
/// # Errors
///
/// Returns `SecretError::Serialization` if the writer fails.
pub fn encode<T: XmlSecret>(secret: &T) -> SecretResult<String> {
    secret.to_element().to_xml_string()
}

/// Encodes a secret as a complete document, the form backends persist
///
/// # Errors
///
/// Returns `SecretError::Serialization` if the writer fails.
pub fn encode_document<T: XmlSecret>(secret: &T) -> SecretResult<String> {
    Ok(format!("{XML_DECLARATION}\n{}", encode(secret)?))
}

/// Decodes a secret from a document or a bare element
///
/// # Errors
///
/// Returns `SecretError::Serialization` for malformed XML and
/// `SecretError::MalformedSecret` for well-formed XML that does not
/// describe a `T`.
pub fn decode<T: XmlSecret>(xml: &str) -> SecretResult<T> {
    let element = XmlElement::parse(xml)?;
    T::from_element(&element)
}
