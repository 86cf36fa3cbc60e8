//! Tokenizer for placeholder and section marker syntax.
//!
//! Recognized tags:
//!
//! - `{{ path }}` - placeholder, `path` made of ASCII letters, digits, `_`, `.`
//! - `{{ #name }}` - section start, `name` made of ASCII letters, digits, `_`
//! - `{{ /name }}` - section end
//!
//! Whitespace is allowed after `{{` and before `}}`, but not between the
//! sigil and the name. Anything that does not form a complete tag is plain
//! text, so malformed markers pass through untouched.

use memchr::memmem;
use smallvec::SmallVec;

const OPEN: &[u8] = b"{{";
const CLOSE: &str = "}}";

/// A piece of template text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Literal text between tags
    Text(&'a str),
    /// `{{path}}`
    Placeholder {
        /// Dotted path inside the braces
        path: &'a str,
        /// The full tag as written
        raw: &'a str,
    },
    /// `{{#name}}`
    SectionStart { name: &'a str, raw: &'a str },
    /// `{{/name}}`
    SectionEnd { name: &'a str, raw: &'a str },
}

impl<'a> Token<'a> {
    /// The source text this token covers.
    pub fn raw(&self) -> &'a str {
        match *self {
            Token::Text(text) => text,
            Token::Placeholder { raw, .. }
            | Token::SectionStart { raw, .. }
            | Token::SectionEnd { raw, .. } => raw,
        }
    }

    /// Check whether this token is a section start or end marker.
    #[inline]
    pub fn is_marker(&self) -> bool {
        matches!(self, Token::SectionStart { .. } | Token::SectionEnd { .. })
    }
}

#[derive(Clone, Copy)]
enum TagKind {
    Placeholder,
    Start,
    End,
}

#[inline]
fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[inline]
fn is_path_byte(b: u8) -> bool {
    is_name_byte(b) || b == b'.'
}

/// Try to read a complete tag starting at `start`, which must point at `{{`.
///
/// Returns the token and the byte offset just past its closing `}}`.
fn parse_tag(source: &str, start: usize) -> Option<(Token<'_>, usize)> {
    let after_open = &source[start + OPEN.len()..];
    let body = after_open.trim_start();

    let (kind, ident_area) = match body.as_bytes().first()? {
        b'#' => (TagKind::Start, &body[1..]),
        b'/' => (TagKind::End, &body[1..]),
        _ => (TagKind::Placeholder, body),
    };

    let accept: fn(u8) -> bool = match kind {
        TagKind::Placeholder => is_path_byte,
        TagKind::Start | TagKind::End => is_name_byte,
    };
    let ident_len = ident_area
        .bytes()
        .position(|b| !accept(b))
        .unwrap_or(ident_area.len());
    if ident_len == 0 {
        return None;
    }

    let ident = &ident_area[..ident_len];
    let tail = ident_area[ident_len..].trim_start();
    if !tail.starts_with(CLOSE) {
        return None;
    }

    let end = source.len() - tail.len() + CLOSE.len();
    let raw = &source[start..end];
    let token = match kind {
        TagKind::Placeholder => Token::Placeholder { path: ident, raw },
        TagKind::Start => Token::SectionStart { name: ident, raw },
        TagKind::End => Token::SectionEnd { name: ident, raw },
    };
    Some((token, end))
}

/// Iterator over the tokens of a string.
///
/// Created by [`tokens`]. Concatenating every token's [`Token::raw`] yields
/// the input again.
pub struct Tokens<'a> {
    source: &'a str,
    pos: usize,
    pending: Option<(Token<'a>, usize)>,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((token, end)) = self.pending.take() {
            self.pos = end;
            return Some(token);
        }
        if self.pos >= self.source.len() {
            return None;
        }

        let bytes = self.source.as_bytes();
        let mut search = self.pos;
        while let Some(offset) = memmem::find(&bytes[search..], OPEN) {
            let start = search + offset;
            if let Some((token, end)) = parse_tag(self.source, start) {
                if start == self.pos {
                    self.pos = end;
                    return Some(token);
                }
                let text = &self.source[self.pos..start];
                self.pending = Some((token, end));
                self.pos = start;
                return Some(Token::Text(text));
            }
            // `{` is ASCII, so one byte forward stays on a char boundary
            search = start + 1;
        }

        let text = &self.source[self.pos..];
        self.pos = self.source.len();
        Some(Token::Text(text))
    }
}

/// Iterate over the tokens of `source`.
pub fn tokens(source: &str) -> Tokens<'_> {
    Tokens {
        source,
        pos: 0,
        pending: None,
    }
}

/// Collect the tokens of `source`.
///
/// # Examples
///
/// ```
/// use docfill::template::token::{Token, tokenize};
///
/// let tokens = tokenize("Qty: {{ qty }} {{#items}}");
/// assert_eq!(tokens[0], Token::Text("Qty: "));
/// assert_eq!(tokens[1], Token::Placeholder { path: "qty", raw: "{{ qty }}" });
/// assert_eq!(tokens[3], Token::SectionStart { name: "items", raw: "{{#items}}" });
/// ```
pub fn tokenize(source: &str) -> SmallVec<[Token<'_>; 8]> {
    tokens(source).collect()
}

/// Name of the first section start marker in `text`, if any.
pub fn first_section_start(text: &str) -> Option<&str> {
    tokens(text).find_map(|token| match token {
        Token::SectionStart { name, .. } => Some(name),
        _ => None,
    })
}

/// Check whether `text` holds an end marker for section `name`.
///
/// Only the first end marker counts, whatever its name.
pub fn first_section_end_is(text: &str, name: &str) -> bool {
    tokens(text)
        .find_map(|token| match token {
            Token::SectionEnd { name, .. } => Some(name),
            _ => None,
        })
        .is_some_and(|found| found == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn kinds(source: &str) -> Vec<String> {
        tokens(source)
            .map(|t| match t {
                Token::Text(s) => format!("T({})", s),
                Token::Placeholder { path, .. } => format!("P({})", path),
                Token::SectionStart { name, .. } => format!("S({})", name),
                Token::SectionEnd { name, .. } => format!("E({})", name),
            })
            .collect()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(kinds("no tags here"), vec!["T(no tags here)"]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_placeholders_and_markers() {
        assert_eq!(
            kinds("{{#items}}{{description}} x {{qty}}{{/items}}"),
            vec!["S(items)", "P(description)", "T( x )", "P(qty)", "E(items)"]
        );
    }

    #[test]
    fn test_whitespace_tolerance() {
        assert_eq!(kinds("{{  customer.name\t}}"), vec!["P(customer.name)"]);
        assert_eq!(kinds("{{ #items }}"), vec!["S(items)"]);
        assert_eq!(kinds("{{\u{a0}/items\u{a0}}}"), vec!["E(items)"]);
    }

    #[test]
    fn test_no_space_after_sigil() {
        assert_eq!(kinds("{{# items}}"), vec!["T({{# items}})"]);
        assert_eq!(kinds("{{/ items}}"), vec!["T({{/ items}})"]);
    }

    #[test]
    fn test_identifier_rules() {
        // Dots are allowed in paths but not in section names
        assert_eq!(kinds("{{#a.b}}"), vec!["T({{#a.b}})"]);
        assert_eq!(kinds("{{a-b}}"), vec!["T({{a-b}})"]);
        assert_eq!(kinds("{{}}"), vec!["T({{}})"]);
        assert_eq!(kinds("{{ }}"), vec!["T({{ }})"]);
        assert_eq!(kinds("{{ä}}"), vec!["T({{ä}})"]);
    }

    #[test]
    fn test_unclosed_and_nested_braces() {
        assert_eq!(kinds("{{name"), vec!["T({{name)"]);
        assert_eq!(kinds("{{name}"), vec!["T({{name})"]);
        assert_eq!(kinds("{{{name}}}"), vec!["T({)", "P(name)", "T(})"]);
        assert_eq!(kinds("{{ {{x}}"), vec!["T({{ )", "P(x)"]);
    }

    #[test]
    fn test_multibyte_text_around_tags() {
        assert_eq!(kinds("Größe: {{size}} €"), vec!["T(Größe: )", "P(size)", "T( €)"]);
    }

    #[test]
    fn test_raw_keeps_original_spelling() {
        let all = tokenize("a {{ x }} b");
        assert_eq!(all[1].raw(), "{{ x }}");
        assert!(!all[1].is_marker());
    }

    #[test]
    fn test_marker_queries() {
        assert_eq!(first_section_start("x {{#rows}} {{#other}}"), Some("rows"));
        assert_eq!(first_section_start("{{/rows}}"), None);
        assert!(first_section_end_is("{{/rows}}", "rows"));
        assert!(!first_section_end_is("{{/other}} {{/rows}}", "rows"));
        assert!(!first_section_end_is("{{#rows}}", "rows"));
    }

    proptest! {
        #[test]
        fn raw_tokens_reassemble_input(source in "[a-z{}#/. _]{0,40}") {
            let rebuilt: String = tokens(&source).map(|t| t.raw()).collect();
            prop_assert_eq!(rebuilt, source);
        }

        #[test]
        fn wrapped_paths_are_placeholders(
            path in "[A-Za-z0-9_][A-Za-z0-9_.]{0,12}",
            left in "[ \t]{0,3}",
            right in "[ \t]{0,3}",
        ) {
            let source = format!("{{{{{}{}{}}}}}", left, path, right);
            let all = tokenize(&source);
            prop_assert_eq!(all.len(), 1);
            prop_assert_eq!(all[0], Token::Placeholder { path: &path, raw: &source });
        }

        #[test]
        fn no_empty_text_tokens(source in "\\PC{0,30}") {
            prop_assert!(tokens(&source).all(|t| t.raw() != ""));
        }
    }
}
