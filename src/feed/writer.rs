use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use super::atom::MarshalsToXml;
use super::error::FeedError;
use super::model::{XmlFeed, XmlItem, YamlFeed, RSS_ROOT};

/// Namespace declared on the root when the channel carries an `atom:link`.
const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// Writes `value` as the top-level element `name` of a new document.
///
/// Output is the XML declaration, the element indented by two spaces, and
/// a single trailing newline.
pub fn marshal_xml<T: MarshalsToXml>(value: &T, name: &str) -> Result<Vec<u8>, FeedError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(FeedError::xml_write)?;
    value.write_xml(&mut writer, name)?;

    let mut bytes = writer.into_inner().into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

/// Serializes an RSS document.
///
/// The channel element is always written, even with no title and no items.
pub fn write_xml(feed: &XmlFeed) -> Result<Vec<u8>, FeedError> {
    let root = if feed.xml_name.is_empty() {
        RSS_ROOT
    } else {
        feed.xml_name.as_str()
    };
    marshal_xml(feed, root)
}

/// Serializes the YAML model in block style. Empty `items` are omitted.
pub fn write_yaml(feed: &YamlFeed) -> Result<Vec<u8>, FeedError> {
    serde_yaml::to_string(feed)
        .map(String::into_bytes)
        .map_err(FeedError::YamlWrite)
}

impl MarshalsToXml for XmlFeed {
    fn write_xml<W: Write>(&self, writer: &mut Writer<W>, name: &str) -> Result<(), FeedError> {
        let mut root = BytesStart::new(name);
        if self.atom_link.is_some() {
            root.push_attribute(("xmlns:atom", ATOM_NAMESPACE));
        }
        writer
            .write_event(Event::Start(root))
            .map_err(FeedError::xml_write)?;
        writer
            .write_event(Event::Start(BytesStart::new("channel")))
            .map_err(FeedError::xml_write)?;

        if let Some(link) = &self.atom_link {
            link.write_xml(writer, "atom:link")?;
        }
        write_text_element(writer, "title", &self.title)?;
        for item in &self.items {
            item.write_xml(writer, "item")?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("channel")))
            .map_err(FeedError::xml_write)?;
        writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(FeedError::xml_write)?;
        Ok(())
    }
}

impl MarshalsToXml for XmlItem {
    fn write_xml<W: Write>(&self, writer: &mut Writer<W>, name: &str) -> Result<(), FeedError> {
        writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(FeedError::xml_write)?;
        write_text_element(writer, "title", &self.title)?;
        write_text_element(writer, "description", &self.description)?;
        write_text_element(writer, "pubDate", &self.pub_date)?;
        write_text_element(writer, "link", &self.link)?;
        writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(FeedError::xml_write)?;
        Ok(())
    }
}

/// `<name>text</name>` on one line; empty text still gets the closing tag.
fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), FeedError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(FeedError::xml_write)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(FeedError::xml_write)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(FeedError::xml_write)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::atom::AtomLink;
    use crate::feed::model::YamlItem;
    use crate::feed::reader::{read_xml, read_yaml};
    use pretty_assertions::assert_eq;

    fn single_item_feed() -> XmlFeed {
        XmlFeed {
            xml_name: "rss".to_string(),
            title: "My Podcast".to_string(),
            atom_link: None,
            items: vec![XmlItem {
                title: "My first episode".to_string(),
                description: "Hello world!".to_string(),
                pub_date: "Tue, 27 Jan 2015 20:00:00 +0000".to_string(),
                link: "http://mypodcast.com/mypodcast-1.mp3".to_string(),
            }],
        }
    }

    #[test]
    fn test_write_xml_single_item_exact() {
        let xml = String::from_utf8(write_xml(&single_item_feed()).unwrap()).unwrap();
        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss>
  <channel>
    <title>My Podcast</title>
    <item>
      <title>My first episode</title>
      <description>Hello world!</description>
      <pubDate>Tue, 27 Jan 2015 20:00:00 +0000</pubDate>
      <link>http://mypodcast.com/mypodcast-1.mp3</link>
    </item>
  </channel>
</rss>
"#;
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_write_xml_empty_feed_keeps_channel() {
        let xml = String::from_utf8(write_xml(&XmlFeed::default()).unwrap()).unwrap();
        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss>
  <channel>
    <title></title>
  </channel>
</rss>
"#;
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_write_xml_with_atom_link() {
        let feed = XmlFeed {
            atom_link: Some(AtomLink {
                href: "http://link.to/feed.xml".to_string(),
                rel: "self".to_string(),
                kind: "application/rss+xml".to_string(),
            }),
            ..single_item_feed()
        };

        let xml = String::from_utf8(write_xml(&feed).unwrap()).unwrap();
        assert!(xml.contains(r#"<rss xmlns:atom="http://www.w3.org/2005/Atom">"#));
        assert!(xml.contains(
            r#"    <atom:link href="http://link.to/feed.xml" rel="self" type="application/rss+xml"></atom:link>"#
        ));

        assert_eq!(read_xml(xml.as_bytes()).unwrap(), feed);
    }

    #[test]
    fn test_write_xml_reads_back() {
        let feed = single_item_feed();
        let bytes = write_xml(&feed).unwrap();
        assert_eq!(read_xml(&bytes).unwrap(), feed);
    }

    #[test]
    fn test_write_xml_escapes_text() {
        let feed = XmlFeed {
            title: "Tom & Jerry <live>".to_string(),
            ..XmlFeed::default()
        };
        let bytes = write_xml(&feed).unwrap();
        let xml = String::from_utf8(bytes.clone()).unwrap();
        assert!(xml.contains("Tom &amp; Jerry &lt;live&gt;"));
        assert_eq!(read_xml(&bytes).unwrap().title, "Tom & Jerry <live>");
    }

    #[test]
    fn test_write_yaml_omits_empty_items() {
        let feed = YamlFeed {
            title: "My Podcast".to_string(),
            atom_link: None,
            items: Vec::new(),
        };
        let yaml = String::from_utf8(write_yaml(&feed).unwrap()).unwrap();
        assert_eq!(yaml, "title: My Podcast\n");
    }

    #[test]
    fn test_write_yaml_block_style() {
        let feed = YamlFeed {
            title: "My Podcast".to_string(),
            atom_link: None,
            items: vec![YamlItem {
                title: "My first episode".to_string(),
                description: "Hello world!".to_string(),
                pub_date: "Tue, 27 Jan 2015 20:00:00 +0000".to_string(),
                link: "http://mypodcast.com/mypodcast-1.mp3".to_string(),
            }],
        };

        let bytes = write_yaml(&feed).unwrap();
        let yaml = String::from_utf8(bytes.clone()).unwrap();
        assert!(yaml.starts_with("title: My Podcast\nitems:\n- title: My first episode\n"));
        assert!(yaml.contains("\n  pubDate: "));
        assert!(!yaml.contains("atomLink"));
        assert_eq!(read_yaml(&bytes).unwrap(), feed);
    }
}
