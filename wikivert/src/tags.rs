//! Wiki dialect constants
//!
//! Tag classification sets used throughout the serializer. These are fixed
//! properties of the wikitext dialect rather than runtime configuration, so
//! they live here as compiled-in sets instead of on [`crate::env::Env`].

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Elements that never take a closing tag.
static VOID_ELEMENTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ]
    .into_iter()
    .collect()
});

/// Block-level HTML tags. A separator that lands next to one of these never
/// needs indent-pre protection, and whitespace-only text between two of them
/// is layout, not content.
static BLOCK_TAGS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "address",
        "article",
        "aside",
        "blockquote",
        "body",
        "caption",
        "center",
        "dd",
        "div",
        "dl",
        "dt",
        "fieldset",
        "figcaption",
        "figure",
        "footer",
        "h1",
        "h2",
        "h3",
        "h4",
        "h5",
        "h6",
        "header",
        "hgroup",
        "hr",
        "html",
        "li",
        "main",
        "nav",
        "ol",
        "p",
        "pre",
        "section",
        "table",
        "tbody",
        "td",
        "tfoot",
        "th",
        "thead",
        "tr",
        "ul",
    ]
    .into_iter()
    .collect()
});

/// Tags whose children are structural rows/cells rather than flow content.
static TABLE_STRUCTURE_TAGS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["table", "tbody", "thead", "tfoot", "tr"].into_iter().collect());

/// List container tags.
static LIST_TAGS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["ul", "ol", "dl"].into_iter().collect());

/// List item tags.
static LIST_ITEM_TAGS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["li", "dt", "dd"].into_iter().collect());

/// Wikitext that is invisible at start-of-line: whitespace, comments and
/// category links. Used to decide whether a leading-space guard is needed.
static SOL_TRANSPARENT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^(?:[ \t]|<!--.*?-->|\[\[[Cc]ategory:[^\]]*\]\])*").unwrap()
});

/// Opening or closing occurrence of a block-level HTML tag inside a line.
static BLOCK_TAG_IN_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)</?(?:div|p|table|tbody|thead|tfoot|caption|tr|td|th|ul|ol|dl|li|dt|dd|blockquote|center|pre|h[1-6]|hr|section|article|aside|figure|figcaption|header|footer|nav)\b",
    )
    .unwrap()
});

pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(tag)
}

pub fn is_block_tag(tag: &str) -> bool {
    BLOCK_TAGS.contains(tag)
}

pub fn is_table_structure_tag(tag: &str) -> bool {
    TABLE_STRUCTURE_TAGS.contains(tag)
}

pub fn is_list_tag(tag: &str) -> bool {
    LIST_TAGS.contains(tag)
}

pub fn is_list_item_tag(tag: &str) -> bool {
    LIST_ITEM_TAGS.contains(tag)
}

pub fn is_heading_tag(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Byte length of the SOL-transparent prefix of `line`.
pub fn sol_transparent_prefix_len(line: &str) -> usize {
    SOL_TRANSPARENT_PREFIX
        .find(line)
        .map(|m| m.end())
        .unwrap_or(0)
}

/// True when the whole fragment is invisible at start-of-line.
pub fn is_sol_transparent(text: &str) -> bool {
    sol_transparent_prefix_len(text) == text.len()
}

/// True when the line contains at least one block-level HTML tag.
pub fn has_block_tag(line: &str) -> bool {
    BLOCK_TAG_IN_LINE.is_match(line)
}
