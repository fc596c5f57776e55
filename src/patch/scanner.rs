//! Single-pass scanner for `<img>` start tags.
//!
//! Each tag is tokenised on its own: the scanner finds `<img`, then walks
//! the attributes up to the closing `>` or `/>`. Quoted values may contain
//! `>`. Offsets are byte positions into the scanned fragment, always on
//! ASCII delimiters, so slicing with them is safe for any UTF-8 input.

use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

fn img_tag_start() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<img[\s/>]").expect("img tag pattern is valid"))
}

/// One attribute inside a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Attribute<'a> {
    /// Attribute name as written
    pub name: &'a str,
    /// Unquoted value; `None` for a valueless attribute
    pub value: Option<&'a str>,
    /// Byte range of the whole `name="value"` text
    pub span: Range<usize>,
}

impl Attribute<'_> {
    /// An attribute with no value or an empty one.
    pub fn is_empty(&self) -> bool {
        self.value.map_or(true, str::is_empty)
    }
}

/// A complete `<img ...>` start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImgTag<'a> {
    /// Byte range from `<` through the closing `>`
    pub span: Range<usize>,
    pub attributes: Vec<Attribute<'a>>,
    pub self_closing: bool,
}

impl<'a> ImgTag<'a> {
    /// First attribute with the given name, compared ASCII case-insensitively.
    pub fn attribute(&self, name: &str) -> Option<&Attribute<'a>> {
        self.attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
    }
}

/// Iterate over the `<img>` tags of a fragment in document order.
pub(crate) fn img_tags(html: &str) -> ImgTags<'_> {
    ImgTags { html, pos: 0 }
}

pub(crate) struct ImgTags<'a> {
    html: &'a str,
    pos: usize,
}

impl<'a> Iterator for ImgTags<'a> {
    type Item = ImgTag<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let start = img_tag_start().find_at(self.html, self.pos)?.start();
            match parse_tag(self.html, start) {
                Some(tag) => {
                    self.pos = tag.span.end;
                    return Some(tag);
                }
                None => {
                    log::trace!("Unterminated <img> tag at byte {}", start);
                    self.pos = start + 1;
                }
            }
        }
    }
}

fn is_name_terminator(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'=' | b'>' | b'/')
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Parse the tag starting at `start` (which points at `<img`).
///
/// Returns `None` when the tag never closes.
fn parse_tag(html: &str, start: usize) -> Option<ImgTag<'_>> {
    let bytes = html.as_bytes();
    let mut pos = start + "<img".len();
    let mut attributes = Vec::new();

    loop {
        pos = skip_whitespace(bytes, pos);
        match *bytes.get(pos)? {
            b'>' => {
                return Some(ImgTag {
                    span: start..pos + 1,
                    attributes,
                    self_closing: false,
                });
            }
            b'/' if bytes.get(pos + 1) == Some(&b'>') => {
                return Some(ImgTag {
                    span: start..pos + 2,
                    attributes,
                    self_closing: true,
                });
            }
            b'/' => {
                pos += 1;
                continue;
            }
            _ => {}
        }

        let name_start = pos;
        while pos < bytes.len() && !is_name_terminator(bytes[pos]) {
            pos += 1;
        }
        if pos == name_start {
            // stray '='
            pos += 1;
            continue;
        }
        let name = &html[name_start..pos];

        let eq = skip_whitespace(bytes, pos);
        if bytes.get(eq) != Some(&b'=') {
            attributes.push(Attribute {
                name,
                value: None,
                span: name_start..pos,
            });
            continue;
        }

        let value_start = skip_whitespace(bytes, eq + 1);
        let (value, end) = match *bytes.get(value_start)? {
            quote @ (b'"' | b'\'') => {
                let open = value_start + 1;
                let close = open + html[open..].find(quote as char)?;
                (&html[open..close], close + 1)
            }
            b'>' => ("", value_start),
            _ => {
                let mut end = value_start;
                while end < bytes.len() && !bytes[end].is_ascii_whitespace() && bytes[end] != b'>'
                {
                    end += 1;
                }
                (&html[value_start..end], end)
            }
        };

        attributes.push(Attribute {
            name,
            value: Some(value),
            span: name_start..end,
        });
        pos = end;
    }
}
