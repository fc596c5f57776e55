//! Block classification rules.
//!
//! A [`RuleSet`] decides which block types carry images and where their
//! image identifiers live. It is plain configuration: build it in code,
//! start from [`RuleSet::wordpress`], or load it from JSON.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

fn default_item_key() -> String {
    "id".to_string()
}

/// Where an image identifier lives inside a block's attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributePath {
    /// Attribute key on the block
    pub key: String,

    /// The attribute is a list of objects (e.g., a gallery)
    #[serde(default)]
    pub is_list_of_objects: bool,

    /// Identifier field inside each list element
    #[serde(default = "default_item_key")]
    pub item_key: String,
}

impl AttributePath {
    /// A single scalar attribute holding one identifier.
    pub fn scalar(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            is_list_of_objects: false,
            item_key: default_item_key(),
        }
    }

    /// A list attribute whose elements each carry an `id` field.
    pub fn list(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            is_list_of_objects: true,
            item_key: default_item_key(),
        }
    }

    /// Set the identifier field read from each list element.
    pub fn with_item_key(mut self, item_key: impl Into<String>) -> Self {
        self.item_key = item_key.into();
        self
    }

    fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(Error::InvalidRule("attribute key is empty".into()));
        }
        if self.is_list_of_objects && self.item_key.trim().is_empty() {
            return Err(Error::InvalidRule(format!(
                "list attribute '{}' has an empty item key",
                self.key
            )));
        }
        Ok(())
    }
}

impl Default for AttributePath {
    fn default() -> Self {
        Self::scalar("id")
    }
}

/// Identifier locations for one block type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTypeRule {
    /// Block type name this rule applies to
    pub type_name: String,

    /// Attribute paths holding identifiers, read in order
    pub paths: Vec<AttributePath>,
}

impl BlockTypeRule {
    /// Create a rule for a block type.
    pub fn new(type_name: impl Into<String>, paths: Vec<AttributePath>) -> Self {
        Self {
            type_name: type_name.into(),
            paths,
        }
    }
}

/// Classification and extraction configuration.
///
/// [`Default`] is the WordPress table, but fields missing from a JSON
/// document are taken from [`RuleSet::empty`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default = "RuleSet::empty")]
pub struct RuleSet {
    /// Block type names the filter acts on, besides those with a rule
    pub targets: Vec<String>,

    /// Identifier locations per block type
    pub rules: Vec<BlockTypeRule>,

    /// Read `fallback_path` for block types without a rule
    pub fallback_enabled: bool,

    /// Path used for unmapped block types when fallback is enabled
    pub fallback_path: AttributePath,
}

impl RuleSet {
    /// Create an empty rule set (no targets, fallback disabled).
    pub fn empty() -> Self {
        Self {
            targets: Vec::new(),
            rules: Vec::new(),
            fallback_enabled: false,
            fallback_path: AttributePath::default(),
        }
    }

    /// The block table used on WordPress sites.
    ///
    /// `core/image` has no explicit rule; it reaches its `id` attribute
    /// through the fallback path.
    pub fn wordpress() -> Self {
        Self::empty()
            .with_target("core/image")
            .with_rule(BlockTypeRule::new(
                "generateblocks/image",
                vec![AttributePath::scalar("mediaId")],
            ))
            .with_rule(BlockTypeRule::new(
                "editorskit/image",
                vec![AttributePath::scalar("imageID")],
            ))
            .with_rule(BlockTypeRule::new(
                "editorskit/advanced-image",
                vec![AttributePath::scalar("imageID")],
            ))
            .with_rule(BlockTypeRule::new(
                "qi-blocks/media-image",
                vec![AttributePath::scalar("mediaId")],
            ))
            .with_rule(BlockTypeRule::new(
                "qi-blocks/image-slider",
                vec![AttributePath::list("images")],
            ))
            .with_rule(BlockTypeRule::new(
                "qi-blocks/image-gallery",
                vec![AttributePath::list("images")],
            ))
            .with_fallback(true)
    }

    /// Add a target block type without a dedicated rule.
    pub fn with_target(mut self, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        if !self.targets.contains(&type_name) {
            self.targets.push(type_name);
        }
        self
    }

    /// Add a rule and register its block type as a target.
    pub fn with_rule(mut self, rule: BlockTypeRule) -> Self {
        self = self.with_target(rule.type_name.clone());
        if self.rules.iter().any(|r| r.type_name == rule.type_name) {
            log::warn!(
                "Duplicate rule for block type '{}', first rule wins",
                rule.type_name
            );
        }
        self.rules.push(rule);
        self
    }

    /// Enable or disable the fallback path for unmapped block types.
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback_enabled = enabled;
        self
    }

    /// Set the fallback path.
    pub fn with_fallback_path(mut self, path: AttributePath) -> Self {
        self.fallback_path = path;
        self
    }

    /// Check whether a block type is one the filter acts on.
    ///
    /// Matching is exact. A type with a rule is always a target. Absent
    /// type names never are.
    pub fn classify(&self, type_name: Option<&str>) -> bool {
        match type_name {
            Some(name) => {
                self.targets.iter().any(|t| t == name)
                    || self.rules.iter().any(|r| r.type_name == name)
            }
            None => false,
        }
    }

    /// Get the identifier paths for a block type.
    ///
    /// Unmapped types get the fallback path when fallback is enabled and
    /// nothing otherwise.
    pub fn paths_for(&self, type_name: Option<&str>) -> &[AttributePath] {
        let rule = type_name.and_then(|name| self.rules.iter().find(|r| r.type_name == name));
        match rule {
            Some(rule) => rule.paths.as_slice(),
            None if self.fallback_enabled => std::slice::from_ref(&self.fallback_path),
            None => &[],
        }
    }

    /// Check the rule set for empty names and keys.
    pub fn validate(&self) -> Result<()> {
        for target in &self.targets {
            if target.trim().is_empty() {
                return Err(Error::InvalidRule("target block type is empty".into()));
            }
        }

        let mut seen = HashSet::new();
        for rule in &self.rules {
            if rule.type_name.trim().is_empty() {
                return Err(Error::InvalidRule("rule block type is empty".into()));
            }
            if !seen.insert(rule.type_name.as_str()) {
                log::warn!(
                    "Duplicate rule for block type '{}', first rule wins",
                    rule.type_name
                );
            }
            for path in &rule.paths {
                path.validate()?;
            }
        }

        self.fallback_path.validate()
    }

    /// Parse and validate a rule set from JSON.
    ///
    /// Missing fields are taken from [`RuleSet::empty`], so a file only
    /// describes its own block types. Built-in WordPress types are not
    /// mixed in.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rules: RuleSet = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load and validate a rule set from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serialize the rule set to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::wordpress()
    }
}
