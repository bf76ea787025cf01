//! Escape oracle
//!
//! Given a candidate text fragment and the context it will land in, decide
//! whether literal characters need a nowiki guard so they do not re-parse as
//! markup. The oracle is a trait so callers can substitute a smarter (or
//! out-of-process) implementation; [`WikitextEscapeHandler`] covers the
//! common hazards.

use once_cell::sync::Lazy;
use regex::Regex;

/// Context handed to the oracle alongside the fragment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapeInput<'a> {
    pub text: &'a str,
    /// The fragment would start at start-of-line.
    pub on_sol: bool,
    /// Serializing the HTML of an attribute value.
    pub in_attribute: bool,
    /// Unflushed tail of the output line the fragment will be appended to.
    pub curr_line: &'a str,
}

/// Which post-pass rewrites the escaping made potentially applicable.
/// Mirrored into the serializer state so the post-pass only runs scans that
/// can match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostPassTriggers {
    pub indent_pre_nowiki: bool,
    pub quote_nowiki: bool,
    pub self_closing_nowiki: bool,
}

impl PostPassTriggers {
    pub fn merge(&mut self, other: PostPassTriggers) {
        self.indent_pre_nowiki |= other.indent_pre_nowiki;
        self.quote_nowiki |= other.quote_nowiki;
        self.self_closing_nowiki |= other.self_closing_nowiki;
    }

    pub fn any(&self) -> bool {
        self.indent_pre_nowiki || self.quote_nowiki || self.self_closing_nowiki
    }
}

/// Oracle verdict on a text fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct EscapedText {
    pub text: String,
    pub triggers: PostPassTriggers,
}

impl EscapedText {
    pub fn unchanged(text: &str) -> Self {
        EscapedText {
            text: text.to_string(),
            triggers: PostPassTriggers::default(),
        }
    }
}

/// Oracle verdict on a template argument value.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateArgEscape {
    pub text: String,
    /// The value cannot survive as a positional parameter and must be
    /// emitted named.
    pub force_named: bool,
}

/// The escape decision interface (C3). Total: implementations always return
/// a usable fragment.
pub trait EscapeHandler {
    fn escape_text(&self, input: &EscapeInput) -> EscapedText;

    fn escape_template_arg(&self, value: &str, positional: bool) -> TemplateArgEscape;
}

static INLINE_MARKUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"''|\[\[|\]\]|\{\{|\}\}|~{3,}|</?[a-zA-Z][^>]*>").unwrap()
});

static LEADING_SOL_MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([*#:;=]+|-{4,}|\{\|)").unwrap());

static LEADING_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t]+").unwrap());

/// Default oracle for plain wikitext output.
#[derive(Debug, Clone, Copy, Default)]
pub struct WikitextEscapeHandler;

impl WikitextEscapeHandler {
    fn wrap_nowiki(text: &str) -> String {
        // A literal </nowiki> inside the guard would end it early.
        let safe = text.replace("</nowiki>", "&lt;/nowiki&gt;");
        format!("<nowiki>{safe}</nowiki>")
    }
}

impl EscapeHandler for WikitextEscapeHandler {
    fn escape_text(&self, input: &EscapeInput) -> EscapedText {
        let text = input.text;
        let mut triggers = PostPassTriggers::default();

        if text.is_empty() {
            return EscapedText::unchanged(text);
        }

        // Inline markup anywhere makes the whole fragment unsafe.
        if INLINE_MARKUP.is_match(text) {
            return EscapedText {
                text: Self::wrap_nowiki(text),
                triggers,
            };
        }

        let mut out = String::new();
        let mut rest = text;

        if input.on_sol {
            if let Some(ws) = LEADING_WS.find(rest) {
                // Leading whitespace at SOL opens an indent-pre block.
                out.push_str("<nowiki>");
                out.push_str(ws.as_str());
                out.push_str("</nowiki>");
                rest = &rest[ws.end()..];
                triggers.indent_pre_nowiki = true;
            } else if let Some(m) = LEADING_SOL_MARKUP.find(rest) {
                out.push_str(&Self::wrap_nowiki(m.as_str()));
                rest = &rest[m.end()..];
            }
        }

        // A fragment starting with a quote right after an emitted quote run
        // would lengthen the run.
        if rest.starts_with('\'') && input.curr_line.ends_with('\'') {
            out.push_str("<nowiki/>");
            triggers.quote_nowiki = true;
            triggers.self_closing_nowiki = true;
        }

        out.push_str(rest);
        EscapedText { text: out, triggers }
    }

    fn escape_template_arg(&self, value: &str, positional: bool) -> TemplateArgEscape {
        let force_named = positional && value.contains('=');
        let text = if value.contains('|') || value.contains("}}") {
            Self::wrap_nowiki(value)
        } else {
            value.to_string()
        };
        TemplateArgEscape { text, force_named }
    }
}
