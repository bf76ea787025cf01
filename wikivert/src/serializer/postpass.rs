//! Post-pass nowiki stripping
//!
//! The emit layer inserts nowiki guards conservatively; once the whole
//! buffer exists, some of them turn out to be redundant. Three line-wise
//! rewrites remove them. Every rewrite is best-effort: a line whose
//! bracket/quote pairing cannot be resolved is left untouched, and each scan
//! only runs when the corresponding trigger flag was set during emission.

use crate::serializer::escape::PostPassTriggers;
use crate::tags;
use once_cell::sync::Lazy;
use regex::Regex;

/// Run the enabled rewrites over the final buffer.
pub fn run(out: String, triggers: &PostPassTriggers, scrub_wikitext: bool) -> String {
    let mut text = out;
    if triggers.indent_pre_nowiki {
        text = map_lines(&text, |line| strip_indent_pre_nowiki(line, scrub_wikitext));
    }
    if triggers.quote_nowiki {
        text = map_lines(&text, strip_quote_nowikis);
    }
    if triggers.self_closing_nowiki {
        text = map_lines(&text, strip_trailing_nowikis);
    }
    text
}

fn map_lines(text: &str, f: impl Fn(&str) -> String) -> String {
    text.split('\n').map(|l| f(l)).collect::<Vec<_>>().join("\n")
}

static INDENT_PRE_GUARD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<nowiki>(\s+)</nowiki>").unwrap());

/// `SOL → transparent prefix → <nowiki>ws</nowiki> → rest`. The guard kept
/// the whitespace from opening an indent-pre block; when the rest of the
/// line is entirely SOL-transparent or contains a block-level HTML tag, no
/// indent-pre can form and the guard (with its whitespace) goes away.
fn strip_indent_pre_nowiki(line: &str, scrub_wikitext: bool) -> String {
    let prefix_len = tags::sol_transparent_prefix_len(line);
    let (prefix, tail) = line.split_at(prefix_len);
    let Some(m) = INDENT_PRE_GUARD.find(tail) else {
        return line.to_string();
    };
    let rest = &tail[m.end()..];
    if tags::is_sol_transparent(rest) || tags::has_block_tag(rest) || scrub_wikitext {
        format!("{prefix}{rest}")
    } else {
        line.to_string()
    }
}

static QUOTE_SCAN_DELIMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'{5}|'{3}|'{2}|\[\[|\]\]|\{\{|\}\}|</?\w+(?:\s[^>]*)?/?>").unwrap());

#[derive(Debug, Clone, PartialEq)]
struct Tok {
    text: String,
    is_delim: bool,
}

fn tokenize_line(line: &str) -> Vec<Tok> {
    let mut toks = Vec::new();
    let mut last = 0;
    for m in QUOTE_SCAN_DELIMS.find_iter(line) {
        toks.push(Tok {
            text: line[last..m.start()].to_string(),
            is_delim: false,
        });
        toks.push(Tok {
            text: m.as_str().to_string(),
            is_delim: true,
        });
        last = m.end();
    }
    toks.push(Tok {
        text: line[last..].to_string(),
        is_delim: false,
    });
    toks
}

fn is_quote_marker(tok: &str) -> bool {
    matches!(tok, "''" | "'''" | "'''''")
}

fn tag_name(tok: &str) -> Option<&str> {
    let inner = tok.strip_prefix('<')?;
    let inner = inner.strip_prefix('/').unwrap_or(inner);
    let end = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    Some(&inner[..end])
}

/// Ends with exactly one `'` (a lone literal apostrophe, not a marker tail).
fn ends_with_single_quote(text: &str) -> bool {
    text.ends_with('\'') && !text.ends_with("''")
}

/// Strip `<nowiki/>` guards sitting between a literal trailing `'` and a
/// quote marker, when the bracket/quote stack proves the guard redundant.
fn strip_quote_nowikis(line: &str) -> String {
    let toks = tokenize_line(line);
    let mut quote_stack: Vec<String> = Vec::new();
    let mut bracket_stack: Vec<&str> = Vec::new();
    let mut skip_until: Option<String> = None;
    let mut strip: Vec<usize> = Vec::new();

    for (i, tok) in toks.iter().enumerate() {
        if !tok.is_delim {
            continue;
        }
        let t = tok.text.as_str();

        if let Some(closer) = &skip_until {
            if t == closer {
                skip_until = None;
            }
            continue;
        }

        if t.ends_with("/>") {
            // Self-closing tags stay off the stack; <nowiki/> is the strip
            // candidate.
            if tag_name(t) == Some("nowiki") {
                let prev_single_quote = i > 0 && ends_with_single_quote(&toks[i - 1].text);
                let next_is_marker = toks
                    .get(i + 1)
                    .filter(|n| !n.is_delim && n.text.is_empty())
                    .and_then(|_| toks.get(i + 2))
                    .is_some_and(|n| n.is_delim && is_quote_marker(&n.text));
                if prev_single_quote && next_is_marker {
                    let depth_zero = quote_stack.is_empty();
                    // The one safe depth-1 shape: a single open italic whose
                    // closing '' ends the line right after the guard.
                    let closes_line = toks.get(i + 2).is_some_and(|n| n.text == "''")
                        && toks[i + 3..].iter().all(|n| !n.is_delim && n.text.is_empty());
                    let known_shape =
                        quote_stack.len() == 1 && quote_stack[0] == "''" && closes_line;
                    if depth_zero || known_shape {
                        strip.push(i);
                    }
                }
            }
            continue;
        }

        if is_quote_marker(t) {
            if quote_stack.last().map(String::as_str) == Some(t) {
                quote_stack.pop();
            } else {
                quote_stack.push(t.to_string());
            }
            continue;
        }

        match t {
            "[[" => bracket_stack.push("[["),
            "{{" => bracket_stack.push("{{"),
            "]]" => {
                if bracket_stack.pop() != Some("[[") {
                    return line.to_string();
                }
            }
            "}}" => {
                if bracket_stack.pop() != Some("{{") {
                    return line.to_string();
                }
            }
            _ => {
                // Opaque regions: nothing inside <ref> or <nowiki> counts.
                if t.starts_with("</") {
                    continue;
                }
                match tag_name(t) {
                    Some("ref") => skip_until = Some("</ref>".to_string()),
                    Some("nowiki") => skip_until = Some("</nowiki>".to_string()),
                    _ => {}
                }
            }
        }
    }

    if strip.is_empty() || !bracket_stack.is_empty() || !quote_stack.is_empty() {
        return line.to_string();
    }
    toks.iter()
        .enumerate()
        .filter(|(i, _)| !strip.contains(i))
        .map(|(_, tok)| tok.text.as_str())
        .collect()
}

static TRAILING_NOWIKIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^=]*?)(?:<nowiki\s*/>\s*)+$").unwrap());

/// Drop runs of `<nowiki/>` at end-of-line. The `[^=]` guard keeps
/// intentional `|param = <nowiki/>` placeholders alive.
fn strip_trailing_nowikis(line: &str) -> String {
    match TRAILING_NOWIKIS.captures(line) {
        Some(caps) => caps[1].to_string(),
        None => line.to_string(),
    }
}
