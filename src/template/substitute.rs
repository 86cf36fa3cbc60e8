//! Scalar placeholder substitution on paragraphs.

use crate::ooxml::docx::Paragraph;
use crate::template::context::{Context, resolve};
use crate::template::token::{Token, tokens};

/// Replace every placeholder in `text` with its resolved value.
///
/// Section markers and plain text are copied verbatim.
///
/// # Examples
///
/// ```
/// use docfill::template::{Context, render};
///
/// let ctx: Context = [("name", "Ada")].into_iter().collect();
/// assert_eq!(render("Hi {{ name }}, {{missing}}!", &ctx), "Hi Ada, !");
/// assert_eq!(render("{{#items}}", &ctx), "{{#items}}");
/// ```
pub fn render(text: &str, context: &Context) -> String {
    let mut out = String::with_capacity(text.len());
    for token in tokens(text) {
        match token {
            Token::Placeholder { path, .. } => out.push_str(&resolve(path, context)),
            other => out.push_str(other.raw()),
        }
    }
    out
}

/// Substitute placeholders in one paragraph.
///
/// The paragraph's run texts are joined and rendered. When the result
/// differs, the runs collapse into a single plain run holding it. Paragraphs
/// without runs, or whose text does not change, are left as they are.
///
/// Returns whether the paragraph was rewritten.
pub fn substitute(paragraph: &mut Paragraph, context: &Context) -> bool {
    rewrite(paragraph, |text| render(text, context))
}

/// Remove every section marker from `text`.
///
/// Start markers are removed first, then end markers in the remaining text.
pub fn strip_markers(text: &str) -> String {
    let without_starts: String = tokens(text)
        .filter(|t| !matches!(t, Token::SectionStart { .. }))
        .map(|t| t.raw())
        .collect();
    tokens(&without_starts)
        .filter(|t| !matches!(t, Token::SectionEnd { .. }))
        .map(|t| t.raw())
        .collect()
}

/// Remove section markers from a paragraph, collapsing its runs if any
/// marker was present.
pub fn strip_paragraph_markers(paragraph: &mut Paragraph) -> bool {
    rewrite(paragraph, strip_markers)
}

fn rewrite<F>(paragraph: &mut Paragraph, f: F) -> bool
where
    F: FnOnce(&str) -> String,
{
    if paragraph.run_count() == 0 {
        return false;
    }

    let text = paragraph.text();
    let replaced = f(&text);
    if replaced == text {
        return false;
    }

    paragraph.collapse_runs(&replaced);
    true
}
