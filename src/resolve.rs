//! Image metadata resolution.
//!
//! The filter does not own image metadata. It asks a [`MetadataResolver`]
//! for each identifier; hosts implement the trait over their media store.
//! [`MediaLibrary`] is an in-memory implementation used by the CLI and
//! tests.

use crate::error::{Error, Result};
use crate::model::{ImageId, ImageMetadata};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Trait for looking up image descriptions and URLs.
///
/// Lookups cannot fail: unknown images resolve to an empty description
/// and no URL.
pub trait MetadataResolver: Send + Sync {
    /// Get the accessibility description for an image (empty if none set).
    fn resolve_description(&self, id: ImageId) -> String;

    /// Get the canonical URL of an image, if it exists.
    fn resolve_url(&self, id: ImageId) -> Option<String>;

    /// Resolve description and URL together.
    fn resolve(&self, id: ImageId) -> ImageMetadata {
        ImageMetadata {
            description: self.resolve_description(id),
            url: self.resolve_url(id),
        }
    }
}

/// One record in a media library JSON file.
#[derive(Debug, Deserialize)]
struct MediaRecord {
    id: i64,
    #[serde(flatten)]
    metadata: ImageMetadata,
}

/// In-memory media library keyed by image identifier.
#[derive(Debug, Clone, Default)]
pub struct MediaLibrary {
    items: HashMap<ImageId, ImageMetadata>,
}

impl MediaLibrary {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an image's metadata.
    pub fn insert(&mut self, id: ImageId, metadata: ImageMetadata) -> Option<ImageMetadata> {
        self.items.insert(id, metadata)
    }

    /// Builder-style insert.
    pub fn with_image(mut self, id: ImageId, metadata: ImageMetadata) -> Self {
        self.insert(id, metadata);
        self
    }

    /// Get an image's metadata.
    pub fn get(&self, id: ImageId) -> Option<&ImageMetadata> {
        self.items.get(&id)
    }

    /// Number of images in the library.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the library is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Parse a library from a JSON array of records.
    ///
    /// ```
    /// use autoalt::MediaLibrary;
    ///
    /// let library = MediaLibrary::from_json_str(
    ///     r#"[{ "id": 42, "alt": "A red fox", "url": "https://site/fox.jpg" }]"#,
    /// )?;
    /// assert_eq!(library.len(), 1);
    /// # Ok::<(), autoalt::Error>(())
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<MediaRecord> = serde_json::from_str(json)?;
        let mut library = Self::new();

        for record in records {
            let id = u64::try_from(record.id)
                .ok()
                .and_then(ImageId::new)
                .ok_or_else(|| {
                    Error::InvalidMedia(format!("id must be positive, got {}", record.id))
                })?;
            if library.insert(id, record.metadata).is_some() {
                log::warn!("Media record {} appears more than once, last one wins", id);
            }
        }

        Ok(library)
    }

    /// Load a library from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl FromIterator<(ImageId, ImageMetadata)> for MediaLibrary {
    fn from_iter<I: IntoIterator<Item = (ImageId, ImageMetadata)>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl MetadataResolver for MediaLibrary {
    fn resolve_description(&self, id: ImageId) -> String {
        self.items
            .get(&id)
            .map(|m| m.description.clone())
            .unwrap_or_default()
    }

    fn resolve_url(&self, id: ImageId) -> Option<String> {
        self.items.get(&id).and_then(|m| m.url.clone())
    }

    fn resolve(&self, id: ImageId) -> ImageMetadata {
        self.items.get(&id).cloned().unwrap_or_default()
    }
}
