//! Image identifiers and resolved image metadata.

use serde::{Deserialize, Serialize};
use std::num::NonZeroU64;

/// Positive integer key of an image in the external media store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(NonZeroU64);

impl ImageId {
    /// Create an identifier, rejecting zero.
    pub fn new(id: u64) -> Option<Self> {
        NonZeroU64::new(id).map(Self)
    }

    /// Get the raw integer value.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Description text and canonical URL resolved for one image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Accessibility description (may be empty)
    #[serde(default, alias = "alt")]
    pub description: String,

    /// URL the image is served under, if the store knows the image
    #[serde(default)]
    pub url: Option<String>,
}

impl ImageMetadata {
    /// Create metadata with both description and URL.
    pub fn new(description: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            url: Some(url.into()),
        }
    }

    /// Check whether there is any description text to apply.
    pub fn has_description(&self) -> bool {
        !self.description.is_empty()
    }

    /// Get the URL if it can be used as a literal `src` match target.
    ///
    /// Empty URLs and values containing whitespace, double quotes or angle
    /// brackets can never appear as a well-formed attribute value. An
    /// apostrophe is a legal URL character and is accepted.
    pub fn usable_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| is_usable_url(url))
    }
}

fn is_usable_url(url: &str) -> bool {
    !url.is_empty()
        && !url
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '<' | '>'))
}
