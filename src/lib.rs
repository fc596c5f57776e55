//! # autoalt
//!
//! Fill in missing image `alt` text in rendered content blocks.
//!
//! Given a block's rendered HTML, its type name and attributes, autoalt
//! decides whether the block shows images, looks up each image's
//! accessibility description in a media store, and writes that text into
//! the matching `<img>` tag's `alt` attribute.
//!
//! ## Quick Start
//!
//! ```
//! use autoalt::{process_block, BlockDescriptor, ImageId, ImageMetadata, MediaLibrary};
//!
//! let library = MediaLibrary::new().with_image(
//!     ImageId::new(42).unwrap(),
//!     ImageMetadata::new("A red fox", "https://site/fox.jpg"),
//! );
//! let block = BlockDescriptor::new("core/image").with_attribute("id", 42);
//!
//! let html = process_block(r#"<img src="https://site/fox.jpg" alt=""/>"#, &block, &library);
//! assert_eq!(html, r#"<img src="https://site/fox.jpg" alt="A red fox"/>"#);
//! ```
//!
//! ## Features
//!
//! - **Configurable block table**: which block types carry images and where
//!   their identifiers live ([`RuleSet`])
//! - **Tag-level patching**: no HTML parser, every byte outside the edited
//!   attribute is preserved
//! - **Curated text wins**: non-empty `alt` attributes are never overwritten
//! - **Batch processing**: independent blocks are filtered in parallel with Rayon

pub mod error;
pub mod extract;
pub mod filter;
pub mod model;
pub mod patch;
pub mod resolve;
pub mod rules;

// Re-export commonly used types
pub use error::{Error, Result};
pub use extract::{extract_ids, parse_image_id};
pub use filter::{AltTextFilter, FilterReport, FilterResult};
pub use model::{BlockDescriptor, ImageId, ImageMetadata, RenderedBlock};
pub use patch::{
    escape_attribute, patch_fragment, MarkupPatcher, MatchPolicy, PatchOptions, PatchOutcome,
    PatchResult,
};
pub use resolve::{MediaLibrary, MetadataResolver};
pub use rules::{AttributePath, BlockTypeRule, RuleSet};

/// Filter one rendered block with the default WordPress rules.
///
/// Returns the fragment with `alt` text filled in, or the fragment
/// unchanged when the block is not an image block or nothing can be
/// resolved or matched.
pub fn process_block<R>(fragment: &str, block: &BlockDescriptor, resolver: &R) -> String
where
    R: MetadataResolver + ?Sized,
{
    AltTextFilter::new().process(fragment, block, resolver)
}

/// Check whether a block type is an image block under the default rules.
///
/// # Example
///
/// ```
/// assert!(autoalt::is_image_block(Some("core/image")));
/// assert!(!autoalt::is_image_block(Some("core/paragraph")));
/// assert!(!autoalt::is_image_block(None));
/// ```
pub fn is_image_block(type_name: Option<&str>) -> bool {
    RuleSet::wordpress().classify(type_name)
}
