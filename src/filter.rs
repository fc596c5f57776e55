//! The alt-text filter: classify, extract, resolve, patch.
//!
//! One call handles one rendered block. Each stage degrades to "leave the
//! fragment alone" instead of failing, so the filter always returns usable
//! markup.

use crate::extract::extract_ids;
use crate::model::{BlockDescriptor, ImageId, RenderedBlock};
use crate::patch::{MarkupPatcher, PatchOptions, PatchOutcome};
use crate::resolve::MetadataResolver;
use crate::rules::RuleSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Counters describing what the filter did to one block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterReport {
    /// Block type was one the filter acts on
    pub is_target: bool,

    /// Valid image identifiers found in the block
    pub images_found: u32,

    /// Images whose tag received alt text
    pub patched: u32,

    /// Images skipped because they have no description
    pub missing_description: u32,

    /// Images skipped because no usable URL was resolved
    pub missing_url: u32,

    /// Images whose tag already carried alt text
    pub already_described: u32,

    /// Images with no tag matching their URL
    pub unmatched: u32,
}

impl FilterReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether any tag was rewritten.
    pub fn changed(&self) -> bool {
        self.patched > 0
    }

    /// Add another report's counters to this one.
    pub fn merge(&mut self, other: &FilterReport) {
        self.is_target |= other.is_target;
        self.images_found += other.images_found;
        self.patched += other.patched;
        self.missing_description += other.missing_description;
        self.missing_url += other.missing_url;
        self.already_described += other.already_described;
        self.unmatched += other.unmatched;
    }
}

/// Filtered markup with its report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterResult {
    /// The resulting markup
    pub content: String,

    /// What happened while filtering
    pub report: FilterReport,
}

impl FilterResult {
    fn passthrough(fragment: &str, report: FilterReport) -> Self {
        Self {
            content: fragment.to_string(),
            report,
        }
    }
}

/// Fills in missing `alt` attributes on image blocks.
///
/// # Example
///
/// ```
/// use autoalt::{AltTextFilter, BlockDescriptor, ImageId, ImageMetadata, MediaLibrary};
///
/// let library = MediaLibrary::new().with_image(
///     ImageId::new(42).unwrap(),
///     ImageMetadata::new("A red fox", "https://site/fox.jpg"),
/// );
/// let block = BlockDescriptor::new("core/image").with_attribute("id", 42);
///
/// let html = AltTextFilter::new().process(
///     r#"<img src="https://site/fox.jpg" alt=""/>"#,
///     &block,
///     &library,
/// );
/// assert_eq!(html, r#"<img src="https://site/fox.jpg" alt="A red fox"/>"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AltTextFilter {
    rules: RuleSet,
    patcher: MarkupPatcher,
}

impl AltTextFilter {
    /// Create a filter with the WordPress rule set and default patch options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rule set.
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Replace the patch options.
    pub fn with_patch_options(mut self, options: PatchOptions) -> Self {
        self.patcher = MarkupPatcher::new(options);
        self
    }

    /// Ignore block types that have no explicit rule.
    pub fn without_fallback(mut self) -> Self {
        self.rules.fallback_enabled = false;
        self
    }

    /// Patch every tag sharing an image's URL, not just the first.
    pub fn replace_all(self) -> Self {
        let options = self.patcher.options().clone().replace_all();
        self.with_patch_options(options)
    }

    /// Get the rule set.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Check whether the filter acts on a block.
    pub fn is_target(&self, block: &BlockDescriptor) -> bool {
        self.rules.classify(block.type_name())
    }

    /// Get the image identifiers of a block, whether or not it is a target.
    pub fn extract(&self, block: &BlockDescriptor) -> Vec<ImageId> {
        extract_ids(block, &self.rules)
    }

    /// Filter one rendered block and return the resulting markup.
    pub fn process<R>(&self, fragment: &str, block: &BlockDescriptor, resolver: &R) -> String
    where
        R: MetadataResolver + ?Sized,
    {
        self.process_with_report(fragment, block, resolver).content
    }

    /// Filter one rendered block and report what happened.
    ///
    /// Identifiers are applied one at a time in extraction order, so the
    /// output is deterministic.
    pub fn process_with_report<R>(
        &self,
        fragment: &str,
        block: &BlockDescriptor,
        resolver: &R,
    ) -> FilterResult
    where
        R: MetadataResolver + ?Sized,
    {
        let mut report = FilterReport::new();

        if !self.is_target(block) {
            log::debug!(
                "Skipping block {:?}: not an image block",
                block.type_name().unwrap_or("<none>")
            );
            return FilterResult::passthrough(fragment, report);
        }
        report.is_target = true;

        let ids = self.extract(block);
        report.images_found = u32::try_from(ids.len()).unwrap_or(u32::MAX);
        if ids.is_empty() {
            log::debug!(
                "Block {:?} has no valid image identifiers",
                block.type_name().unwrap_or("<none>")
            );
            return FilterResult::passthrough(fragment, report);
        }

        let mut content = fragment.to_string();
        for id in ids {
            let metadata = resolver.resolve(id);

            if !metadata.has_description() {
                log::debug!("Image {} has no description", id);
                report.missing_description += 1;
                continue;
            }

            let Some(url) = metadata.usable_url() else {
                log::debug!("Image {} has no usable URL", id);
                report.missing_url += 1;
                continue;
            };

            let result = self.patcher.patch(&content, url, &metadata.description);
            match result.outcome {
                PatchOutcome::Inserted | PatchOutcome::Replaced => {
                    report.patched += 1;
                    content = result.content;
                }
                PatchOutcome::AlreadyDescribed => {
                    log::debug!("Image {} already has alt text", id);
                    report.already_described += 1;
                }
                PatchOutcome::NoMatch => {
                    log::debug!("No <img> with src {:?} for image {}", url, id);
                    report.unmatched += 1;
                }
                PatchOutcome::NoDescription => report.missing_description += 1,
            }
        }

        FilterResult { content, report }
    }

    /// Filter many independent blocks in parallel.
    ///
    /// Results come back in input order.
    pub fn process_batch<R>(&self, blocks: &[RenderedBlock], resolver: &R) -> Vec<FilterResult>
    where
        R: MetadataResolver + ?Sized,
    {
        blocks
            .par_iter()
            .map(|item| self.process_with_report(&item.html, &item.block, resolver))
            .collect()
    }
}
