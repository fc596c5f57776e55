//! Integration tests for the markup patcher.

use autoalt::patch::{MarkupPatcher, MatchPolicy, PatchOptions, PatchOutcome};
use autoalt::patch_fragment;

const URL: &str = "https://site/fox.jpg";

#[test]
fn test_attribute_order_does_not_matter() {
    let cases = [
        (
            r#"<img src="https://site/fox.jpg" class="a" alt="">"#,
            r#"<img src="https://site/fox.jpg" class="a" alt="Fox">"#,
        ),
        (
            r#"<img alt="" class="a" src="https://site/fox.jpg">"#,
            r#"<img alt="Fox" class="a" src="https://site/fox.jpg">"#,
        ),
        (
            r#"<img width="10" height="10" src="https://site/fox.jpg" />"#,
            r#"<img width="10" height="10" alt="Fox" src="https://site/fox.jpg" />"#,
        ),
    ];

    for (input, expected) in cases {
        assert_eq!(patch_fragment(input, URL, "Fox"), expected);
    }
}

#[test]
fn test_url_with_pattern_characters() {
    let url = "https://site/a+b(1)[2].jpg?w=300&h=200";
    let html = format!(r#"<img src="{url}">"#);
    let patched = patch_fragment(&html, url, "Pattern");
    assert_eq!(patched, format!(r#"<img alt="Pattern" src="{url}">"#));

    // Near misses are not matches.
    let near = r#"<img src="https://site/ab(1)[2].jpg?w=300&h=200">"#;
    assert_eq!(patch_fragment(near, url, "Pattern"), near);
}

#[test]
fn test_src_match_is_exact() {
    let html = r#"<img src="https://site/fox.jpg-scaled"><img src="HTTPS://site/fox.jpg">"#;
    assert_eq!(patch_fragment(html, URL, "Fox"), html);
}

#[test]
fn test_single_quoted_and_unquoted_src() {
    assert_eq!(
        patch_fragment("<img src='https://site/fox.jpg'>", URL, "Fox"),
        r#"<img alt="Fox" src='https://site/fox.jpg'>"#
    );
    assert_eq!(
        patch_fragment("<img src=https://site/fox.jpg alt=''>", URL, "Fox"),
        r#"<img src=https://site/fox.jpg alt="Fox">"#
    );
}

#[test]
fn test_surrounding_markup_untouched() {
    let html = concat!(
        r#"<figure class="wp-block-image size-large">"#,
        r#"<a href="https://site/fox.jpg"><img src="https://site/fox.jpg" alt="" class="wp-image-42"/></a>"#,
        r#"<figcaption>alt="" is here too</figcaption></figure>"#,
    );
    let patched = patch_fragment(html, URL, "A red fox");
    assert_eq!(
        patched,
        concat!(
            r#"<figure class="wp-block-image size-large">"#,
            r#"<a href="https://site/fox.jpg"><img src="https://site/fox.jpg" alt="A red fox" class="wp-image-42"/></a>"#,
            r#"<figcaption>alt="" is here too</figcaption></figure>"#,
        )
    );
}

#[test]
fn test_first_policy_stops_at_described_tag() {
    let html = r#"<img src="https://site/fox.jpg" alt="curated"><img src="https://site/fox.jpg">"#;
    let result = MarkupPatcher::default().patch(html, URL, "Fox");
    assert_eq!(result.outcome, PatchOutcome::AlreadyDescribed);
    assert_eq!(result.content, html);

    let all = MarkupPatcher::new(PatchOptions::new().with_policy(MatchPolicy::All));
    let result = all.patch(html, URL, "Fox");
    assert_eq!(result.outcome, PatchOutcome::Inserted);
    assert_eq!(
        result.content,
        r#"<img src="https://site/fox.jpg" alt="curated"><img alt="Fox" src="https://site/fox.jpg">"#
    );
}

#[test]
fn test_malformed_markup_left_alone() {
    for html in [
        r#"<img src="https://site/fox.jpg"#,
        r#"<img src="https://site/fox.jpg" alt="unterminated>"#,
        "<<<>>>",
        "",
    ] {
        let result = MarkupPatcher::default().patch(html, URL, "Fox");
        assert!(!result.is_changed());
        assert_eq!(result.content, html);
    }
}

#[test]
fn test_gt_inside_quoted_attribute() {
    let html = r#"<img data-caption="a > b" src="https://site/fox.jpg">"#;
    assert_eq!(
        patch_fragment(html, URL, "Fox"),
        r#"<img data-caption="a > b" alt="Fox" src="https://site/fox.jpg">"#
    );
}
