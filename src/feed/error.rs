use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors produced while reading, converting or writing a feed.
///
/// None of these are logged by the library; callers decide how to present them.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The input bytes are not well-formed XML.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// The XML document root is something other than `<rss>`.
    #[error("Unexpected root element <{0}>, expected <rss>")]
    UnexpectedRoot(String),

    /// The input bytes are not valid YAML, or do not have the feed shape.
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// A model could not be mapped onto the other representation.
    ///
    /// Nothing raises this yet; the converters keep a fallible signature
    /// so field validation can be added later.
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// The XML writer failed.
    #[error("XML write error: {0}")]
    XmlWrite(String),

    /// The YAML writer failed.
    #[error("YAML write error: {0}")]
    YamlWrite(serde_yaml::Error),
}

impl FeedError {
    pub(crate) fn xml_parse(err: impl std::fmt::Display) -> Self {
        FeedError::XmlParse(err.to_string())
    }

    pub(crate) fn xml_write(err: impl std::fmt::Display) -> Self {
        FeedError::XmlWrite(err.to_string())
    }
}
