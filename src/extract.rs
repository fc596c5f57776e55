//! Image identifier extraction from block attributes.

use crate::model::{BlockDescriptor, ImageId};
use crate::rules::{AttributePath, RuleSet};
use serde_json::Value;
use std::collections::HashSet;

/// Collect the image identifiers a block references.
///
/// The result is deduplicated in first-seen order and never contains zero,
/// negative or unparsable values. Malformed attribute data contributes
/// nothing instead of failing the whole extraction.
///
/// # Example
///
/// ```
/// use autoalt::{extract_ids, BlockDescriptor, RuleSet};
/// use serde_json::json;
///
/// let block = BlockDescriptor::new("qi-blocks/image-gallery")
///     .with_attribute("images", json!([{ "id": 5 }, { "id": 5 }, { "id": 7 }]));
/// let ids: Vec<u64> = extract_ids(&block, &RuleSet::wordpress())
///     .into_iter()
///     .map(|id| id.get())
///     .collect();
/// assert_eq!(ids, vec![5, 7]);
/// ```
pub fn extract_ids(block: &BlockDescriptor, rules: &RuleSet) -> Vec<ImageId> {
    let Some(attributes) = block.attributes.as_ref() else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for path in rules.paths_for(block.type_name()) {
        let Some(value) = attributes.get(&path.key) else {
            continue;
        };
        for id in ids_at(value, path) {
            if seen.insert(id) {
                ids.push(id);
            }
        }
    }

    ids
}

fn ids_at(value: &Value, path: &AttributePath) -> Vec<ImageId> {
    if !path.is_list_of_objects {
        return parse_image_id(value).into_iter().collect();
    }

    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_object()?.get(&path.item_key))
            .filter_map(parse_image_id)
            .collect(),
        _ => Vec::new(),
    }
}

/// Parse one attribute value as an image identifier.
///
/// Positive JSON integers are accepted, as are strings holding a positive
/// decimal integer. Anything else yields `None`.
pub fn parse_image_id(value: &Value) -> Option<ImageId> {
    match value {
        Value::Number(n) => n.as_u64().and_then(ImageId::new),
        Value::String(s) => s.trim().parse::<u64>().ok().and_then(ImageId::new),
        _ => None,
    }
}
