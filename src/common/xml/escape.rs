use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;
use phf::phf_map;
use std::borrow::Cow;

static PREDEFINED_ENTITIES: phf::Map<&'static str, &'static str> = phf_map! {
    "amp" => "&",
    "lt" => "<",
    "gt" => ">",
    "quot" => "\"",
    "apos" => "'",
};

// Character data only needs the markup-significant characters escaped
static TEXT_ESCAPER: Lazy<Option<AhoCorasick>> =
    Lazy::new(|| AhoCorasick::builder().build(["&", "<", ">"]).ok());

// Attribute values are written double-quoted; whitespace controls become
// character references.
static ATTR_ESCAPER: Lazy<Option<AhoCorasick>> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "\t", "\n", "\r"])
        .ok()
});

// LeftmostLongest so `&amp;lt;` decodes to `&lt;` rather than `<`
static XML_UNESCAPER: Lazy<Option<AhoCorasick>> = Lazy::new(|| {
    AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostLongest)
        .build(["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
        .ok()
});

fn escape_with(escaper: &Lazy<Option<AhoCorasick>>, replacements: &[&str], s: &str) -> String {
    match Lazy::force(escaper) {
        Some(ac) => ac.replace_all(s, replacements),
        None => s.to_string(),
    }
}

/// Check whether a character may appear in an XML 1.0 document.
///
/// Excludes the C0 controls other than tab, line feed, and carriage return,
/// and the noncharacters U+FFFE and U+FFFF.
///
/// # Examples
///
/// ```
/// use docfill::common::xml::is_xml_char;
/// assert!(is_xml_char('\t'));
/// assert!(is_xml_char('\u{a0}'));
/// assert!(!is_xml_char('\u{b}'));
/// assert!(!is_xml_char('\u{fffe}'));
/// ```
#[inline]
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{d7ff}' | '\u{e000}'..='\u{fffd}' | '\u{10000}'..='\u{10ffff}'
    )
}

/// Drop characters XML 1.0 cannot carry, even as character references.
fn strip_illegal(s: &str) -> Cow<'_, str> {
    if s.chars().all(is_xml_char) {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.chars().filter(|&c| is_xml_char(c)).collect())
    }
}

/// Escape a string for use as XML character data.
///
/// # Examples
///
/// ```
/// use docfill::common::xml::escape_text;
/// assert_eq!(escape_text("Qty < 5 & rate > 2"), "Qty &lt; 5 &amp; rate &gt; 2");
/// assert_eq!(escape_text("\"quoted\""), "\"quoted\"");
/// assert_eq!(escape_text("a\u{1}b"), "ab");
/// ```
#[inline]
pub fn escape_text(s: &str) -> String {
    escape_with(&TEXT_ESCAPER, &["&amp;", "&lt;", "&gt;"], &strip_illegal(s))
}

/// Escape a string for use inside a double-quoted XML attribute value.
///
/// # Examples
///
/// ```
/// use docfill::common::xml::escape_attr;
/// assert_eq!(escape_attr("a \"b\" & c"), "a &quot;b&quot; &amp; c");
/// assert_eq!(escape_attr("x\ty"), "x&#x9;y");
/// ```
#[inline]
pub fn escape_attr(s: &str) -> String {
    escape_with(
        &ATTR_ESCAPER,
        &["&amp;", "&lt;", "&gt;", "&quot;", "&#x9;", "&#xA;", "&#xD;"],
        &strip_illegal(s),
    )
}

/// Unescape the five predefined XML entities.
///
/// Unknown or malformed entities are left unchanged.
///
/// # Examples
///
/// ```
/// use docfill::common::xml::unescape_xml;
/// assert_eq!(unescape_xml("&lt;a &amp; b&gt;"), "<a & b>");
/// assert_eq!(unescape_xml("&amp;lt;"), "&lt;");
/// assert_eq!(unescape_xml("&invalid;"), "&invalid;");
/// ```
#[inline]
pub fn unescape_xml(s: &str) -> String {
    escape_with(&XML_UNESCAPER, &["&", "<", ">", "\"", "'"], s)
}

/// Resolve the body of a general entity reference (the part between `&` and `;`).
///
/// Handles the predefined entities and decimal/hex character references.
/// Returns `None` for anything else, which callers keep verbatim.
///
/// # Examples
///
/// ```
/// use docfill::common::xml::resolve_entity;
/// assert_eq!(resolve_entity("amp").as_deref(), Some("&"));
/// assert_eq!(resolve_entity("#x41").as_deref(), Some("A"));
/// assert_eq!(resolve_entity("#160").as_deref(), Some("\u{a0}"));
/// assert_eq!(resolve_entity("nbsp"), None);
/// ```
pub fn resolve_entity(name: &str) -> Option<String> {
    if let Some(reference) = name.strip_prefix('#') {
        let code = match reference.strip_prefix('x').or_else(|| reference.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => reference.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }

    PREDEFINED_ENTITIES.get(name).map(|s| s.to_string())
}
