//! Selective serialization: source reuse
//!
//! In selser mode, a subtree that the diff left untouched and whose DSR
//! still points at valid source is emitted as the original bytes, wrapped in
//! a constrained chunk so neighboring output knows its boundary characters.
//! A reused node's handler is never invoked.

use crate::dom::{Dom, NodeId};
use crate::error::SerializeError;
use crate::serializer::chunk::Chunk;
use crate::serializer::templates;
use crate::serializer::Serializer;
use crate::tags;

/// Tags whose zero-width DSR is legitimate: implicit paragraphs, line
/// breaks, and auto-inserted list containers.
fn zero_width_tag_ok(tag: &str) -> bool {
    matches!(tag, "p" | "br" | "ol")
}

/// Try to emit `node` verbatim from the original source. Returns
/// `Some(next)` when reuse happened, with the node the walker should
/// continue from; `None` means fall through to normal handler emission.
pub fn try_source_reuse(
    ser: &mut Serializer,
    node: NodeId,
) -> Result<Option<Option<NodeId>>, SerializeError> {
    if !ser.state.selser.enabled || ser.state.selser.in_modified_content {
        return Ok(None);
    }
    if !ser.dom.diff(node).is_empty() {
        return Ok(None);
    }
    let Some(el) = ser.dom.element(node) else {
        return Ok(None);
    };
    let Some(dsr) = el.dp.dsr else {
        return Ok(None);
    };
    if !dsr.is_valid() {
        return Ok(None);
    }
    let zero_ok = el.dp.fostered || el.dp.misnested || zero_width_tag_ok(&el.name);
    if dsr.is_zero_width() && !zero_ok {
        return Ok(None);
    }
    if !ser.env.reuse_oracle.source_still_valid(ser.dom, node) {
        return Ok(None);
    }
    let Some(src) = ser.env.source_range(&dsr) else {
        // Offsets point outside the supplied source: disqualify, re-emit.
        return Ok(None);
    };
    let src = src.to_string();

    // Reused source may legitimately span lines even where emitted output
    // could not.
    let suspend_single_line = templates::is_first_encapsulation_wrapper(ser.dom, node)
        || top_level_list(ser.dom, node)
        || table_sole_child_of_dd(ser.dom, node);
    if suspend_single_line {
        ser.state.single_line.disable();
    }
    let result = ser.emit(Chunk::from_source(&src, node));
    if suspend_single_line {
        ser.state.single_line.pop();
    }
    result?;

    let next = if templates::is_first_encapsulation_wrapper(ser.dom, node) {
        templates::skip_past_envelope(ser.dom, node)
    } else {
        ser.dom.next_sibling(node)
    };
    Ok(Some(next))
}

fn top_level_list(dom: &Dom, node: NodeId) -> bool {
    dom.tag(node).is_some_and(tags::is_list_tag) && dom.parent(node) == Some(dom.body())
}

fn table_sole_child_of_dd(dom: &Dom, node: NodeId) -> bool {
    if dom.tag(node) != Some("table") {
        return false;
    }
    match dom.parent(node) {
        Some(parent) => dom.tag(parent) == Some("dd") && dom.children(parent).len() == 1,
        None => false,
    }
}

/// Only the subtree below `node` changed and its tag widths are still
/// trustworthy: the handler may emit the open/close tags from reused source
/// while recursing into the modified children.
pub fn wrapper_unmodified(ser: &Serializer, node: NodeId) -> bool {
    if !ser.state.selser.enabled {
        return false;
    }
    if !ser.dom.diff(node).only_subtree_changed() {
        return false;
    }
    let Some(el) = ser.dom.element(node) else {
        return false;
    };
    let Some(dsr) = el.dp.dsr else {
        return false;
    };
    if !dsr.is_valid() {
        return false;
    }
    let widths_trustworthy = matches!(el.name.as_str(), "td" | "th" | "tr");
    widths_trustworthy
        || (dsr.has_valid_widths() && !el.dp.auto_inserted_start && !el.dp.auto_inserted_end)
}

/// Original open/close tag text for a wrapper whose widths are valid.
pub fn reused_tag_srcs(ser: &Serializer, node: NodeId) -> Option<(String, String)> {
    let dsr = ser.dom.element(node)?.dp.dsr?;
    let (start, end) = dsr.range()?;
    let open_w = dsr.open_width? as usize;
    let close_w = dsr.close_width? as usize;
    if start + open_w > end || end < close_w || end - close_w < start + open_w {
        return None;
    }
    let open = ser.env.source_between(start, start + open_w)?.to_string();
    let close = ser.env.source_between(end - close_w, end)?.to_string();
    Some((open, close))
}
