//! Podcast feed conversion between RSS XML and the YAML editing format.
//!
//! Conversion is a pipeline of pure functions:
//!
//! - **Reading**: [`read_xml`] and [`read_yaml`] parse raw bytes into a model
//! - **Converting**: [`to_yaml`] and [`to_xml`] map one model onto the other
//! - **Writing**: [`write_xml`] and [`write_yaml`] serialize a model to bytes
//!
//! # Architecture
//!
//! - [`atom`] - The `AtomLink` value type and the [`MarshalsToXml`] capability
//! - [`model`] - XML and YAML feed models
//! - `reader` - Event-based XML reader (`quick-xml`) and YAML reader (`serde_yaml`)
//! - `convert` - Model-to-model mapping
//! - `writer` - Indented XML writer and block-style YAML writer
//!
//! # Round-trip asymmetry
//!
//! The XML writer always emits `<channel>`, while the YAML writer drops the
//! `items` key when there are no items. A YAML file without `items` and one
//! with `items: []` read back identically.
//!
//! # Example
//!
//! ```
//! use pan::feed::{read_xml, to_yaml, write_yaml};
//!
//! let xml = b"<rss><channel><title>My Podcast</title></channel></rss>";
//! let feed = to_yaml(&read_xml(xml)?)?;
//! assert_eq!(write_yaml(&feed)?, b"title: My Podcast\n");
//! # Ok::<(), pan::feed::FeedError>(())
//! ```

pub mod atom;
mod convert;
mod error;
pub mod model;
mod reader;
mod writer;

pub use atom::{AtomLink, MarshalsToXml, Scalar};
pub use convert::{to_xml, to_yaml};
pub use error::FeedError;
pub use model::{XmlFeed, XmlItem, YamlFeed, YamlItem};
pub use reader::{read_xml, read_yaml};
pub use writer::{marshal_xml, write_xml, write_yaml};
