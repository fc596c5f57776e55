//! Data model for content blocks and the images they reference.
//!
//! These types are the inputs and outputs shared by the classifier, the
//! identifier extractor and the markup patcher. Everything here is plain
//! data; none of it owns or caches image metadata beyond one invocation.

mod block;
mod image;

pub use block::{BlockDescriptor, RenderedBlock};
pub use image::{ImageId, ImageMetadata};
