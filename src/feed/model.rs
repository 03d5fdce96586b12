use serde::{Deserialize, Deserializer, Serialize};

use super::atom::{scalar_text, AtomLink};

/// Root element name of every XML feed this crate reads or writes.
pub const RSS_ROOT: &str = "rss";

// ============================================================================
// XML Feed Model
// ============================================================================

/// An RSS document: root element name plus the channel contents.
///
/// `items` is always present; a channel without `<item>` children, or a
/// document without a channel, yields an empty vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlFeed {
    /// Local name of the root element. Always `rss` for parsed documents.
    pub xml_name: String,
    pub title: String,
    pub atom_link: Option<AtomLink>,
    pub items: Vec<XmlItem>,
}

/// One `<item>` inside the channel. Field text is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlItem {
    pub title: String,
    pub description: String,
    /// RFC 2822 date text, never parsed.
    pub pub_date: String,
    pub link: String,
}

// ============================================================================
// YAML Feed Model
// ============================================================================

/// The YAML editing format of a feed.
///
/// An absent `items` key and an explicit `items: []` both decode to an
/// empty vector, and an empty vector is written without the `items` key.
/// The XML writer, by contrast, always emits the channel element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YamlFeed {
    #[serde(default, deserialize_with = "scalar_text")]
    pub title: String,

    #[serde(
        rename = "atomLink",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub atom_link: Option<AtomLink>,

    #[serde(
        default,
        deserialize_with = "nullable_items",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub items: Vec<YamlItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YamlItem {
    #[serde(default, deserialize_with = "scalar_text")]
    pub title: String,
    #[serde(default, deserialize_with = "scalar_text")]
    pub description: String,
    #[serde(rename = "pubDate", default, deserialize_with = "scalar_text")]
    pub pub_date: String,
    #[serde(default, deserialize_with = "scalar_text")]
    pub link: String,
}

/// `items:` with no value, and `- ` entries with no value, decode as empty.
fn nullable_items<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<YamlItem>, D::Error> {
    let items = Option::<Vec<Option<YamlItem>>>::deserialize(deserializer)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}
