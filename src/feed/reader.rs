use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::atom::{AtomLink, Scalar};
use super::error::FeedError;
use super::model::{XmlFeed, XmlItem, YamlFeed, RSS_ROOT};

/// Qualified name of the channel's self link.
const ATOM_LINK: &[u8] = b"atom:link";

/// SEC-003: Maximum allowed element nesting depth.
/// Bounds the path stack for maliciously crafted deeply nested documents.
const MAX_XML_DEPTH: usize = 50;

/// Item children whose text is kept.
const ITEM_FIELDS: [&str; 4] = ["title", "description", "pubDate", "link"];

/// Parses an RSS document into an [`XmlFeed`].
///
/// Only `channel/title`, `channel/atom:link` and the four item fields are
/// read; every other element is skipped. Reading stops once the root
/// element closes.
///
/// # Errors
///
/// - [`FeedError::XmlParse`] for malformed XML, a missing root element, or
///   input that ends with elements still open
/// - [`FeedError::UnexpectedRoot`] when the root element is not `<rss>`
pub fn read_xml(bytes: &[u8]) -> Result<XmlFeed, FeedError> {
    // SEC-002: quick-xml (0.37) never expands <!ENTITY> declarations; only the
    // five predefined entities are unescaped.
    let mut reader = Reader::from_reader(bytes);

    let mut feed = XmlFeed::default();
    let mut buf = Vec::new();
    let mut path: Vec<String> = Vec::new();
    let mut item: Option<XmlItem> = None;
    let mut text = String::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(FeedError::xml_parse)? {
            Event::Start(e) => {
                let name = local_name(&e)?;
                if path.is_empty() {
                    if name != RSS_ROOT {
                        return Err(FeedError::UnexpectedRoot(name));
                    }
                    feed.xml_name = name.clone();
                } else if in_channel(&path) {
                    if e.name().as_ref() == ATOM_LINK {
                        feed.atom_link = Some(read_atom_link(&e, &reader)?);
                    } else if name == "item" {
                        item = Some(XmlItem::default());
                    }
                }
                path.push(name);
                // SEC-003: Reject excessively nested documents
                if path.len() > MAX_XML_DEPTH {
                    return Err(FeedError::XmlParse(format!(
                        "XML nesting depth exceeds maximum of {} levels",
                        MAX_XML_DEPTH
                    )));
                }
                if in_field(&path) {
                    text.clear();
                }
            }
            Event::Empty(e) => {
                let name = local_name(&e)?;
                if path.is_empty() {
                    if name != RSS_ROOT {
                        return Err(FeedError::UnexpectedRoot(name));
                    }
                    feed.xml_name = name;
                    break;
                }
                if in_channel(&path) {
                    if e.name().as_ref() == ATOM_LINK {
                        feed.atom_link = Some(read_atom_link(&e, &reader)?);
                    } else if name == "item" {
                        feed.items.push(XmlItem::default());
                    }
                }
            }
            // Only a field's own character data is kept; text inside nested
            // markup such as `<b>` in a description is skipped.
            Event::Text(e) => {
                if in_field(&path) {
                    text.push_str(&e.unescape().map_err(FeedError::xml_parse)?);
                }
            }
            Event::CData(e) => {
                if in_field(&path) {
                    let decoded = reader.decoder().decode(&e).map_err(FeedError::xml_parse)?;
                    text.push_str(&decoded);
                }
            }
            Event::End(_) => {
                let fields: Vec<&str> = path.iter().map(String::as_str).collect();
                match fields.as_slice() {
                    [_, "channel", "title"] => feed.title = std::mem::take(&mut text),
                    [_, "channel", "item"] => {
                        if let Some(done) = item.take() {
                            feed.items.push(done);
                        }
                    }
                    [_, "channel", "item", field] => {
                        if let Some(current) = item.as_mut() {
                            let slot = match *field {
                                "title" => Some(&mut current.title),
                                "description" => Some(&mut current.description),
                                "pubDate" => Some(&mut current.pub_date),
                                "link" => Some(&mut current.link),
                                _ => None,
                            };
                            if let Some(slot) = slot {
                                *slot = std::mem::take(&mut text);
                            }
                        }
                    }
                    _ => {}
                }
                path.pop();
                if path.is_empty() {
                    break;
                }
            }
            Event::Eof => {
                return Err(match path.last() {
                    Some(open) => FeedError::XmlParse(format!(
                        "unexpected end of input, <{}> is not closed",
                        open
                    )),
                    None => FeedError::XmlParse("no root element found".to_string()),
                });
            }
            _ => {}
        }
        buf.clear();
    }

    tracing::debug!(
        title = %feed.title,
        items = feed.items.len(),
        "Parsed XML feed"
    );
    Ok(feed)
}

/// Parses the YAML editing format into a [`YamlFeed`].
///
/// An empty or null document yields an empty feed. String fields keep the
/// scalar's source text, so `1.10` stays `1.10` rather than becoming a number.
///
/// # Errors
///
/// [`FeedError::YamlParse`] for malformed YAML or a value of the wrong shape,
/// such as a scalar where the feed mapping or the item sequence is expected.
pub fn read_yaml(bytes: &[u8]) -> Result<YamlFeed, FeedError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(YamlFeed::default());
    }

    let feed = serde_yaml::from_slice::<Option<YamlFeed>>(bytes)?.unwrap_or_default();
    tracing::debug!(
        title = %feed.title,
        items = feed.items.len(),
        "Parsed YAML feed"
    );
    Ok(feed)
}

fn in_channel(path: &[String]) -> bool {
    path.len() == 2 && path[1] == "channel"
}

/// True while the innermost open element is the channel title or an item field.
fn in_field(path: &[String]) -> bool {
    match path {
        [_, channel, title] => channel == "channel" && title == "title",
        [_, channel, item, field] => {
            channel == "channel" && item == "item" && ITEM_FIELDS.contains(&field.as_str())
        }
        _ => false,
    }
}

fn local_name(e: &BytesStart<'_>) -> Result<String, FeedError> {
    std::str::from_utf8(e.local_name().as_ref())
        .map(str::to_string)
        .map_err(FeedError::xml_parse)
}

/// Collects the `href`, `rel` and `type` attributes of an `<atom:link>`.
fn read_atom_link(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<AtomLink, FeedError> {
    let decoder = reader.decoder();
    let mut attrs = HashMap::new();

    for attr_result in e.attributes() {
        let attr = match attr_result {
            Ok(attr) => attr,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed atom:link attribute");
                continue;
            }
        };
        let key = std::str::from_utf8(attr.key.as_ref()).map_err(FeedError::xml_parse)?;
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(FeedError::xml_parse)?;
        attrs.insert(key.to_string(), Scalar::Str(value.into_owned()));
    }

    Ok(AtomLink::from_map(&attrs))
}
