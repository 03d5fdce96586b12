//! Mapping between the XML and YAML feed models.
//!
//! Both directions copy every string verbatim and keep item order. The XML
//! root element name has no YAML counterpart: it is dropped on the way to
//! YAML and set to `rss` on the way back.

use super::error::FeedError;
use super::model::{XmlFeed, XmlItem, YamlFeed, YamlItem, RSS_ROOT};

impl From<&XmlItem> for YamlItem {
    fn from(item: &XmlItem) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone(),
            pub_date: item.pub_date.clone(),
            link: item.link.clone(),
        }
    }
}

impl From<&YamlItem> for XmlItem {
    fn from(item: &YamlItem) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone(),
            pub_date: item.pub_date.clone(),
            link: item.link.clone(),
        }
    }
}

/// Converts a parsed RSS document into the YAML model.
///
/// Currently infallible; callers should still handle the error, which is
/// reserved for field validation.
pub fn to_yaml(feed: &XmlFeed) -> Result<YamlFeed, FeedError> {
    let yaml = YamlFeed {
        title: feed.title.clone(),
        atom_link: feed.atom_link.clone(),
        items: feed.items.iter().map(YamlItem::from).collect(),
    };
    tracing::debug!(items = yaml.items.len(), "Converted XML feed to YAML");
    Ok(yaml)
}

/// Converts the YAML model into an RSS document rooted at `<rss>`.
///
/// Currently infallible, see [`to_yaml`].
pub fn to_xml(feed: &YamlFeed) -> Result<XmlFeed, FeedError> {
    let xml = XmlFeed {
        xml_name: RSS_ROOT.to_string(),
        title: feed.title.clone(),
        atom_link: feed.atom_link.clone(),
        items: feed.items.iter().map(XmlItem::from).collect(),
    };
    tracing::debug!(items = xml.items.len(), "Converted YAML feed to XML");
    Ok(xml)
}
