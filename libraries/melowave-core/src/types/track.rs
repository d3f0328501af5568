//! Track descriptor captured from a view item

use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::hash::{Hash, Hasher};

/// Identity-bearing record for one track
///
/// `source` is the media locator and doubles as the identity key: two
/// descriptors are equal iff their sources are equal, whatever their
/// display strings say. The serialized field names match the persisted
/// record layout (`src`, `title`, `artist`, `cover`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackDescriptor {
    /// Media locator (required, identity key)
    #[serde(rename = "src")]
    pub source: String,

    /// Display title (may be empty)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    /// Display artist (may be empty)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub artist: String,

    /// Cover image locator (may be empty)
    #[serde(rename = "cover", default, deserialize_with = "null_as_empty")]
    pub cover_locator: String,
}

impl TrackDescriptor {
    /// Create a descriptor with empty display strings
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            title: String::new(),
            artist: String::new(),
            cover_locator: String::new(),
        }
    }

    /// Build a descriptor from raw view-item attributes
    ///
    /// Missing display attributes become empty strings. A missing or empty
    /// source is rejected since it is the identity key.
    pub fn from_attributes(
        source: Option<&str>,
        title: Option<&str>,
        artist: Option<&str>,
        cover_locator: Option<&str>,
    ) -> Result<Self> {
        let source = source
            .filter(|s| !s.is_empty())
            .ok_or(CoreError::MissingAttribute("source"))?;

        Ok(Self {
            source: source.to_string(),
            title: title.unwrap_or_default().to_string(),
            artist: artist.unwrap_or_default().to_string(),
            cover_locator: cover_locator.unwrap_or_default().to_string(),
        })
    }

    /// Set the display title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the display artist
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    /// Set the cover image locator
    #[must_use]
    pub fn with_cover(mut self, cover_locator: impl Into<String>) -> Self {
        self.cover_locator = cover_locator.into();
        self
    }

    /// Whether this descriptor refers to the given source
    pub fn is(&self, source: &str) -> bool {
        self.source == source
    }
}

impl PartialEq for TrackDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for TrackDescriptor {}

impl Hash for TrackDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

// Older records wrote `null` for attributes the view item lacked.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
