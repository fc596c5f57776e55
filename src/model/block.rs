//! Content block descriptors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A rendered content block's declared type and attributes.
///
/// Field aliases accept the `blockName`/`attrs` shape block editors emit,
/// so a parsed block can be deserialized directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    /// Declared block type (e.g., "core/image"). Freeform content has none.
    #[serde(default, alias = "blockName")]
    pub type_name: Option<String>,

    /// Block-specific structured data. Absent is treated as empty.
    #[serde(default, alias = "attrs")]
    pub attributes: Option<Map<String, Value>>,
}

impl BlockDescriptor {
    /// Create a block of the given type with an empty attribute map.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            attributes: Some(Map::new()),
        }
    }

    /// Create a block with no declared type.
    pub fn untyped() -> Self {
        Self::default()
    }

    /// Set an attribute value.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Drop the attribute map entirely.
    pub fn without_attributes(mut self) -> Self {
        self.attributes = None;
        self
    }

    /// Get the block type name, if declared.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Look up a single attribute.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.as_ref().and_then(|attrs| attrs.get(key))
    }
}

/// One block together with its rendered markup, the unit of batch input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderedBlock {
    /// Block type and attributes
    pub block: BlockDescriptor,

    /// Markup produced by the host renderer
    pub html: String,
}

impl RenderedBlock {
    /// Pair a block with its rendered markup.
    pub fn new(block: BlockDescriptor, html: impl Into<String>) -> Self {
        Self {
            block,
            html: html.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_builder() {
        let block = BlockDescriptor::new("core/image").with_attribute("id", 42);
        assert_eq!(block.type_name(), Some("core/image"));
        assert_eq!(block.attribute("id"), Some(&json!(42)));
        assert_eq!(block.attribute("missing"), None);
    }

    #[test]
    fn test_block_without_attributes() {
        let block = BlockDescriptor::new("core/image")
            .with_attribute("id", 1)
            .without_attributes();
        assert!(block.attributes.is_none());
        assert_eq!(block.attribute("id"), None);
    }

    #[test]
    fn test_deserialize_editor_shape() {
        let block: BlockDescriptor = serde_json::from_value(json!({
            "blockName": "qi-blocks/image-gallery",
            "attrs": { "images": [{ "id": 1 }, { "id": 3 }] }
        }))
        .unwrap();

        assert_eq!(block.type_name(), Some("qi-blocks/image-gallery"));
        assert!(block.attribute("images").unwrap().is_array());
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let block: BlockDescriptor = serde_json::from_value(json!({})).unwrap();
        assert_eq!(block, BlockDescriptor::untyped());

        let block: BlockDescriptor =
            serde_json::from_value(json!({ "blockName": null, "attrs": null })).unwrap();
        assert!(block.type_name.is_none());
        assert!(block.attributes.is_none());
    }
}
