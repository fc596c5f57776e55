//! Markup patching: write description text into an image's `alt` attribute.
//!
//! The patcher locates `<img>` tags whose `src` equals a known URL and
//! fills in their `alt` attribute. It never parses the whole document:
//! each candidate tag is tokenised on its own and everything outside the
//! edited attribute is copied through byte-for-byte.
//!
//! # Example
//!
//! ```
//! use autoalt::patch::{MarkupPatcher, PatchOptions, PatchOutcome};
//!
//! let patcher = MarkupPatcher::new(PatchOptions::default());
//! let result = patcher.patch(
//!     r#"<img src="https://site/fox.jpg" alt=""/>"#,
//!     "https://site/fox.jpg",
//!     "A red fox",
//! );
//! assert_eq!(result.outcome, PatchOutcome::Replaced);
//! assert_eq!(result.content, r#"<img src="https://site/fox.jpg" alt="A red fox"/>"#);
//! ```

mod escape;
mod scanner;

pub use escape::escape_attribute;

/// Which tags to patch when several share the same `src`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Only the first tag with a matching `src` is considered
    #[default]
    First,
    /// Every tag with a matching `src` is patched
    All,
}

/// Options for the markup patcher.
#[derive(Debug, Clone, Default)]
pub struct PatchOptions {
    /// Match policy for repeated `src` values
    pub policy: MatchPolicy,
}

impl PatchOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the match policy.
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Patch every tag with a matching `src`.
    pub fn replace_all(self) -> Self {
        self.with_policy(MatchPolicy::All)
    }
}

/// What a patch call did to the fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// An `alt` attribute was added in front of `src`
    Inserted,
    /// An empty `alt` attribute was filled in
    Replaced,
    /// The matching tag already had non-empty `alt` text
    AlreadyDescribed,
    /// No tag has the requested `src`
    NoMatch,
    /// The description was empty, nothing to write
    NoDescription,
}

/// Patched fragment plus what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchResult {
    /// The resulting fragment (a copy of the input when unchanged)
    pub content: String,

    /// Outcome for the first matching tag that was touched
    pub outcome: PatchOutcome,

    /// Number of tags rewritten
    pub tags_patched: u32,
}

impl PatchResult {
    fn unchanged(fragment: &str, outcome: PatchOutcome) -> Self {
        Self {
            content: fragment.to_string(),
            outcome,
            tags_patched: 0,
        }
    }

    /// Check whether the fragment was modified.
    pub fn is_changed(&self) -> bool {
        self.tags_patched > 0
    }
}

/// Writes `alt` text into `<img>` tags located by their `src`.
#[derive(Debug, Clone, Default)]
pub struct MarkupPatcher {
    options: PatchOptions,
}

impl MarkupPatcher {
    /// Create a patcher with the given options.
    pub fn new(options: PatchOptions) -> Self {
        Self { options }
    }

    /// Get the patcher options.
    pub fn options(&self) -> &PatchOptions {
        &self.options
    }

    /// Annotate the image whose `src` is exactly `url` with `description`.
    ///
    /// A missing `alt` is inserted before `src`, an empty one is filled in
    /// and a non-empty one is kept as is. The `src` comparison is
    /// byte-for-byte. The input is never modified; when nothing matches the
    /// returned content equals the input.
    pub fn patch(&self, fragment: &str, url: &str, description: &str) -> PatchResult {
        if description.is_empty() {
            return PatchResult::unchanged(fragment, PatchOutcome::NoDescription);
        }

        let escaped = escape_attribute(description);
        let mut out = String::with_capacity(fragment.len() + escaped.len() + 8);
        let mut copied = 0;
        let mut first_outcome = None;
        let mut tags_patched = 0;
        let mut described = false;

        for tag in scanner::img_tags(fragment) {
            let Some(src) = tag.attribute("src") else {
                continue;
            };
            if src.value != Some(url) {
                continue;
            }
            log::trace!(
                "Matched <img> at bytes {:?} (self-closing: {})",
                tag.span,
                tag.self_closing
            );

            let outcome = match tag.attribute("alt") {
                None => {
                    out.push_str(&fragment[copied..src.span.start]);
                    push_alt(&mut out, &escaped);
                    out.push(' ');
                    copied = src.span.start;
                    PatchOutcome::Inserted
                }
                Some(alt) if alt.is_empty() => {
                    out.push_str(&fragment[copied..alt.span.start]);
                    push_alt(&mut out, &escaped);
                    copied = alt.span.end;
                    PatchOutcome::Replaced
                }
                Some(_) => {
                    log::trace!("Keeping existing alt text on <img src=\"{}\">", url);
                    PatchOutcome::AlreadyDescribed
                }
            };

            if outcome == PatchOutcome::AlreadyDescribed {
                described = true;
            } else {
                tags_patched += 1;
                first_outcome.get_or_insert(outcome);
            }

            if self.options.policy == MatchPolicy::First {
                break;
            }
        }

        let Some(outcome) = first_outcome else {
            let outcome = if described {
                PatchOutcome::AlreadyDescribed
            } else {
                PatchOutcome::NoMatch
            };
            return PatchResult::unchanged(fragment, outcome);
        };

        out.push_str(&fragment[copied..]);
        PatchResult {
            content: out,
            outcome,
            tags_patched,
        }
    }
}

fn push_alt(out: &mut String, escaped: &str) {
    out.push_str("alt=\"");
    out.push_str(escaped);
    out.push('"');
}

/// Patch a fragment with default options (first matching tag only).
pub fn patch_fragment(fragment: &str, url: &str, description: &str) -> String {
    MarkupPatcher::default()
        .patch(fragment, url, description)
        .content
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://site/fox.jpg";

    #[test]
    fn test_replace_empty_alt() {
        let result = MarkupPatcher::default().patch(
            r#"<img src="https://site/fox.jpg" alt=""/>"#,
            URL,
            "A red fox",
        );
        assert_eq!(result.outcome, PatchOutcome::Replaced);
        assert_eq!(
            result.content,
            r#"<img src="https://site/fox.jpg" alt="A red fox"/>"#
        );
    }

    #[test]
    fn test_insert_missing_alt() {
        let result = MarkupPatcher::default().patch(
            r#"<figure><img class="wp-image-42" src="https://site/fox.jpg"></figure>"#,
            URL,
            "A red fox",
        );
        assert_eq!(result.outcome, PatchOutcome::Inserted);
        assert_eq!(
            result.content,
            r#"<figure><img class="wp-image-42" alt="A red fox" src="https://site/fox.jpg"></figure>"#
        );
    }

    #[test]
    fn test_valueless_alt_counts_as_empty() {
        let result = MarkupPatcher::default().patch(
            r#"<img alt src="https://site/fox.jpg">"#,
            URL,
            "A red fox",
        );
        assert_eq!(result.outcome, PatchOutcome::Replaced);
        assert_eq!(
            result.content,
            r#"<img alt="A red fox" src="https://site/fox.jpg">"#
        );
    }

    #[test]
    fn test_keeps_curated_alt() {
        let html = r#"<img src="https://site/fox.jpg" alt="curated"/>"#;
        let result = MarkupPatcher::default().patch(html, URL, "new");
        assert_eq!(result.outcome, PatchOutcome::AlreadyDescribed);
        assert_eq!(result.content, html);
        assert!(!result.is_changed());
    }

    #[test]
    fn test_empty_alt_on_other_image_is_untouched() {
        let html = r#"<img src="https://site/other.jpg" alt=""><img src="https://site/fox.jpg">"#;
        let result = MarkupPatcher::default().patch(html, URL, "A red fox");
        assert_eq!(
            result.content,
            r#"<img src="https://site/other.jpg" alt=""><img alt="A red fox" src="https://site/fox.jpg">"#
        );
    }

    #[test]
    fn test_no_match() {
        let html = r#"<img src="https://site/fox.jpg?w=300" alt="">"#;
        let result = MarkupPatcher::default().patch(html, URL, "A red fox");
        assert_eq!(result.outcome, PatchOutcome::NoMatch);
        assert_eq!(result.content, html);
    }

    #[test]
    fn test_empty_description_is_noop() {
        let html = r#"<img src="https://site/fox.jpg" alt="">"#;
        let result = MarkupPatcher::default().patch(html, URL, "");
        assert_eq!(result.outcome, PatchOutcome::NoDescription);
        assert_eq!(result.content, html);
    }

    #[test]
    fn test_first_policy_patches_one_tag() {
        let html = r#"<img src="https://site/fox.jpg"><img src="https://site/fox.jpg">"#;
        let result = MarkupPatcher::default().patch(html, URL, "fox");
        assert_eq!(result.tags_patched, 1);
        assert_eq!(
            result.content,
            r#"<img alt="fox" src="https://site/fox.jpg"><img src="https://site/fox.jpg">"#
        );
    }

    #[test]
    fn test_all_policy_patches_every_tag() {
        let html = r#"<img src="https://site/fox.jpg"><img alt="kept" src="https://site/fox.jpg"><img src="https://site/fox.jpg" alt=''>"#;
        let patcher = MarkupPatcher::new(PatchOptions::new().replace_all());
        let result = patcher.patch(html, URL, "fox");
        assert_eq!(result.tags_patched, 2);
        assert_eq!(result.outcome, PatchOutcome::Inserted);
        assert_eq!(
            result.content,
            r#"<img alt="fox" src="https://site/fox.jpg"><img alt="kept" src="https://site/fox.jpg"><img src="https://site/fox.jpg" alt="fox">"#
        );
    }

    #[test]
    fn test_escapes_description() {
        let result = MarkupPatcher::default().patch(
            r#"<img src="https://site/fox.jpg" alt="">"#,
            URL,
            r#"The "red" fox"#,
        );
        assert_eq!(
            result.content,
            r#"<img src="https://site/fox.jpg" alt="The &quot;red&quot; fox">"#
        );
    }

    #[test]
    fn test_patch_fragment_is_idempotent() {
        let html = r#"<p>before</p><img src="https://site/fox.jpg" width="300"/>"#;
        let once = patch_fragment(html, URL, "A red fox");
        let twice = patch_fragment(&once, URL, "A red fox");
        assert_ne!(once, html);
        assert_eq!(once, twice);
    }
}
