//! Attribute value escaping.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Named references left intact. Any other `&name;` is plain text.
const KNOWN_ENTITIES: &[&str] = &[
    "AElig", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "Ccedil", "Eacute",
    "Ecirc", "Egrave", "Euml", "Iacute", "Icirc", "Igrave", "Iuml", "Ntilde", "OElig", "Oacute",
    "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "Uacute", "Ucirc", "Ugrave", "Uuml",
    "aacute", "acirc", "acute", "aelig", "agrave", "amp", "apos", "aring", "atilde", "auml",
    "bdquo", "brvbar", "bull", "ccedil", "cedil", "cent", "copy", "dagger", "deg", "divide",
    "eacute", "ecirc", "egrave", "euml", "euro", "frac12", "frac14", "frac34", "gt", "hellip",
    "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "ldquo", "lsaquo", "lsquo",
    "lt", "macr", "mdash", "micro", "middot", "nbsp", "ndash", "not", "ntilde", "oacute",
    "ocirc", "oelig", "ograve", "ordf", "ordm", "oslash", "otilde", "ouml", "para", "permil",
    "plusmn", "pound", "prime", "quot", "raquo", "rdquo", "reg", "rsaquo", "rsquo", "sbquo",
    "sect", "shy", "sup1", "sup2", "sup3", "szlig", "thorn", "times", "trade", "uacute",
    "ucirc", "ugrave", "uml", "uuml", "yacute", "yen", "yuml",
];

fn char_reference() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^&(?:([A-Za-z][A-Za-z0-9]{1,31})|#[0-9]{1,7}|#[xX][0-9A-Fa-f]{1,6});")
            .expect("character reference pattern is valid")
    })
}

fn starts_char_reference(text: &str) -> bool {
    match char_reference().captures(text) {
        Some(caps) => caps
            .get(1)
            .map_or(true, |name| KNOWN_ENTITIES.contains(&name.as_str())),
        None => false,
    }
}

/// Escape text for use inside a double-quoted HTML attribute.
///
/// `<`, `>`, `"` and `'` are always escaped. An `&` is escaped unless it
/// already starts a numeric reference or a known named entity, so text that
/// was escaped once is not escaped again. Unknown names such as `&D;` in
/// `R&D;` are escaped.
///
/// # Example
///
/// ```
/// use autoalt::escape_attribute;
///
/// assert_eq!(escape_attribute(r#"5" & "6""#), "5&quot; &amp; &quot;6&quot;");
/// assert_eq!(escape_attribute("Tom &amp; Jerry"), "Tom &amp; Jerry");
/// ```
pub fn escape_attribute(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for (i, c) in text.char_indices() {
        match c {
            '&' if starts_char_reference(&text[i..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(escape_attribute("A red fox"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escapes_markup_characters() {
        assert_eq!(
            escape_attribute(r#"<b>"quoted" it's</b>"#),
            "&lt;b&gt;&quot;quoted&quot; it&#039;s&lt;/b&gt;"
        );
    }

    #[test]
    fn test_ampersand_handling() {
        assert_eq!(escape_attribute("salt & pepper"), "salt &amp; pepper");
        assert_eq!(escape_attribute("a&b"), "a&amp;b");
        assert_eq!(escape_attribute("&copy; 2024"), "&copy; 2024");
        assert_eq!(escape_attribute("&#169; &#xA9;"), "&#169; &#xA9;");
        assert_eq!(escape_attribute("&#;"), "&amp;#;");
        assert_eq!(escape_attribute("trailing &"), "trailing &amp;");
    }

    #[test]
    fn test_unknown_entity_name_is_escaped() {
        assert_eq!(escape_attribute("R&D;"), "R&amp;D;");
        assert_eq!(escape_attribute("&foo; &nbsp;"), "&amp;foo; &nbsp;");
        assert_eq!(escape_attribute("&eacute;t&eacute;"), "&eacute;t&eacute;");
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(escape_attribute("여우 & 숲"), "여우 &amp; 숲");
    }
}
