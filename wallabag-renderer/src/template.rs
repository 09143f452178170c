//! [`NoteTemplate`] placeholder substitution and the built-in templates.
//!
//! A placeholder is `{{name}}` (inner whitespace allowed). Known names are
//! replaced by the matching [`NoteContext`] field; anything else is copied
//! through untouched, braces included. Substitution is single-pass, so a
//! value that itself contains `{{…}}` is never expanded again.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use wallabag_core::Article;

use crate::context::{NoteContext, RenderOptions};

/// Built-in template for article notes.
pub const DEFAULT_TEMPLATE: &str = "## {{article_title}}\n\
[original]({{original_link}}) | [wallabag]({{wallabag_link}})\n\
\n\
{{content}}\n";

/// Built-in template for notes that point at an exported PDF.
pub const PDF_TEMPLATE: &str = "## {{article_title}}\n\
[original]({{original_link}}) | [wallabag]({{wallabag_link}})\n\
\n\
PDF: [[{{pdf_link}}]]\n";

/// Which note a template is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteKind {
    /// Full article note.
    Article,
    /// Note referencing a downloaded PDF.
    PdfReference,
}

/// A template source ready to be filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTemplate {
    source: String,
}

impl NoteTemplate {
    /// Wrap raw template text. CRLF line endings are normalised to LF.
    pub fn new(source: impl Into<String>) -> Self {
        NoteTemplate {
            source: source.into().replace("\r\n", "\n"),
        }
    }

    /// Built-in template for `kind`.
    pub fn builtin(kind: NoteKind) -> Self {
        match kind {
            NoteKind::Article => NoteTemplate::new(DEFAULT_TEMPLATE),
            NoteKind::PdfReference => NoteTemplate::new(PDF_TEMPLATE),
        }
    }

    /// Raw template text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render `article` with `opts`.
    pub fn fill(&self, article: &Article, opts: &RenderOptions) -> String {
        let ctx = NoteContext::from_article(article, opts);
        self.render(&ctx)
    }

    /// Render with a caller-provided [`NoteContext`].
    pub fn render(&self, ctx: &NoteContext) -> String {
        substitute(&self.source, &ctx.to_variables())
    }
}

/// Built-in templates plus an optional user template.
///
/// The user template, when present, overrides both note kinds.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    article: NoteTemplate,
    pdf_reference: NoteTemplate,
    user: Option<NoteTemplate>,
}

impl TemplateSet {
    /// Built-in templates only.
    pub fn builtin() -> Self {
        TemplateSet {
            article: NoteTemplate::builtin(NoteKind::Article),
            pdf_reference: NoteTemplate::builtin(NoteKind::PdfReference),
            user: None,
        }
    }

    /// Built-ins overridden by `user` text.
    pub fn with_user(user: Option<String>) -> Self {
        TemplateSet {
            user: user.map(NoteTemplate::new),
            ..TemplateSet::builtin()
        }
    }

    /// Template to render for `kind`.
    pub fn for_kind(&self, kind: NoteKind) -> &NoteTemplate {
        if let Some(user) = &self.user {
            return user;
        }
        match kind {
            NoteKind::Article => &self.article,
            NoteKind::PdfReference => &self.pdf_reference,
        }
    }
}

/// `{{ name }}` with optional inner whitespace.
static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z_]+)\s*\}\}").expect("valid placeholder regex"));

fn substitute(source: &str, vars: &HashMap<String, String>) -> String {
    PLACEHOLDER_RE
        .replace_all(source, |caps: &Captures<'_>| match vars.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn known_placeholders_are_replaced() {
        let out = substitute("# {{article_title}} ({{ id }})", &vars(&[("article_title", "T"), ("id", "3")]));
        assert_eq!(out, "# T (3)");
    }

    #[test]
    fn unknown_placeholders_pass_through() {
        let out = substitute("{{nope}} and {{id}}", &vars(&[("id", "3")]));
        assert_eq!(out, "{{nope}} and 3");
    }

    #[rstest]
    #[case::stray_open_before_placeholder("code: {{ x = {{id}}", "code: {{ x = 3")]
    #[case::triple_braces("{{{article_title}}}", "{T}")]
    #[case::unclosed_then_closed("{{id {{article_title}}", "{{id T")]
    fn placeholder_after_stray_braces_is_replaced(#[case] input: &str, #[case] expected: &str) {
        let out = substitute(input, &vars(&[("article_title", "T"), ("id", "3")]));
        assert_eq!(out, expected);
    }

    #[test]
    fn unterminated_placeholder_is_kept() {
        let out = substitute("a {{id", &vars(&[("id", "3")]));
        assert_eq!(out, "a {{id");
    }

    #[test]
    fn substituted_values_are_not_reexpanded() {
        let out = substitute("{{content}}", &vars(&[("content", "{{id}}"), ("id", "3")]));
        assert_eq!(out, "{{id}}");
    }

    #[test]
    fn user_template_overrides_both_kinds() {
        let set = TemplateSet::with_user(Some("mine".to_string()));
        assert_eq!(set.for_kind(NoteKind::Article).source(), "mine");
        assert_eq!(set.for_kind(NoteKind::PdfReference).source(), "mine");
    }

    #[test]
    fn builtin_set_picks_kind_template() {
        let set = TemplateSet::builtin();
        assert!(set.for_kind(NoteKind::Article).source().contains("{{content}}"));
        assert!(set.for_kind(NoteKind::PdfReference).source().contains("{{pdf_link}}"));
    }

    #[test]
    fn crlf_template_is_normalised() {
        let t = NoteTemplate::new("a\r\nb\r\n");
        assert_eq!(t.source(), "a\nb\n");
    }
}
