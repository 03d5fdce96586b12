//! The `<atom:link>` value type and the per-type XML capability it needs.
//!
//! `AtomLink` is decoded from a loosely-typed YAML mapping (unknown keys and
//! non-string values are tolerated) and written to XML as a start/end pair
//! carrying exactly three attributes in a fixed order.

use std::collections::HashMap;
use std::fmt;
use std::io::Write;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::error::FeedError;

/// Types that know how to write themselves as a single XML element.
///
/// The generic writer hands over the element name so the same value can be
/// written as `link` on its own or as `atom:link` inside a channel.
pub trait MarshalsToXml {
    fn write_xml<W: Write>(&self, writer: &mut Writer<W>, name: &str) -> Result<(), FeedError>;
}

/// A YAML scalar of any type.
///
/// `Display` renders the string form used when a scalar lands in a string
/// field. Null renders as the empty string.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

/// Source text of a YAML scalar.
///
/// `1.10`, `0x1F` or a 23-digit number keep the exact characters the editor
/// typed. Resolved booleans and numbers are only accepted from formats that
/// do not hand over the text. Mappings and sequences are rejected.
pub(crate) struct ScalarText(pub(crate) String);

impl<'de> Deserialize<'de> for ScalarText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(ScalarTextVisitor)
    }
}

struct ScalarTextVisitor;

impl<'de> Visitor<'de> for ScalarTextVisitor {
    type Value = ScalarText;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar value")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ScalarText, E> {
        Ok(ScalarText(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<ScalarText, E> {
        Ok(ScalarText(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<ScalarText, E> {
        Ok(ScalarText(Scalar::Bool(v).to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ScalarText, E> {
        Ok(ScalarText(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ScalarText, E> {
        Ok(ScalarText(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<ScalarText, E> {
        Ok(ScalarText(Scalar::Float(v).to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<ScalarText, E> {
        Ok(ScalarText(String::new()))
    }
}

/// String field decoder: the scalar's source text, null as the empty string.
pub(crate) fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let text = Option::<ScalarText>::deserialize(deserializer)?;
    Ok(text.map(|t| t.0).unwrap_or_default())
}

/// A syndication `<atom:link>` pointing at the feed itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AtomLink {
    pub href: String,
    pub rel: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl AtomLink {
    /// Builds a link from the `href`, `rel` and `type` keys of `map`.
    ///
    /// Missing keys leave the field empty; values of any scalar type are
    /// coerced to their string form. Never fails.
    pub fn from_map(map: &HashMap<String, Scalar>) -> Self {
        let field = |key: &str| map.get(key).map(Scalar::to_string).unwrap_or_default();
        Self {
            href: field("href"),
            rel: field("rel"),
            kind: field("type"),
        }
    }
}

/// Collects the three link keys as source text and skips everything else,
/// nested values included.
struct AtomLinkVisitor;

impl<'de> Visitor<'de> for AtomLinkVisitor {
    type Value = AtomLink;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping with href, rel and type")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<AtomLink, A::Error> {
        let mut map = HashMap::new();
        while let Some(ScalarText(key)) = access.next_key::<ScalarText>()? {
            match key.as_str() {
                "href" | "rel" | "type" => {
                    let value = access
                        .next_value::<Option<ScalarText>>()?
                        .map_or(Scalar::Null, |text| Scalar::Str(text.0));
                    map.insert(key, value);
                }
                _ => {
                    access.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(AtomLink::from_map(&map))
    }
}

impl<'de> Deserialize<'de> for AtomLink {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AtomLinkVisitor)
    }
}

impl MarshalsToXml for AtomLink {
    fn write_xml<W: Write>(&self, writer: &mut Writer<W>, name: &str) -> Result<(), FeedError> {
        let mut start = BytesStart::new(name);
        start.push_attribute(("href", self.href.as_str()));
        start.push_attribute(("rel", self.rel.as_str()));
        start.push_attribute(("type", self.kind.as_str()));

        writer
            .write_event(Event::Start(start))
            .map_err(FeedError::xml_write)?;
        // Empty text keeps `</link>` on the same line as the start tag.
        writer
            .write_event(Event::Text(BytesText::new("")))
            .map_err(FeedError::xml_write)?;
        writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(FeedError::xml_write)?;
        Ok(())
    }
}
