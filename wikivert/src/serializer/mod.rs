//! The wikitext serializer: DOM walker and dispatcher
//!
//! Visits the annotated DOM in document order. Per node it consults
//! provenance, tries the selser reuse path, and otherwise dispatches to a
//! tag handler; every emitted chunk flows through the separator engine so
//! the pending inter-node whitespace resolves exactly once between any two
//! neighbors. After the walk the post-pass rewrites the buffer.
//!
//! The walk is plain sequenced recursion threading `&mut` state: sibling
//! emission order is document order by construction, and the scoped-flag
//! helpers guarantee balanced enter/exit of the pre/nowiki/single-line
//! contexts even on early error returns.

pub mod attributes;
pub mod chunk;
pub mod escape;
pub mod handlers;
pub mod postpass;
pub mod selser;
pub mod separators;
pub mod state;
pub mod templates;

use crate::dom::provenance::DiffMark;
use crate::dom::{Dom, NodeId, NodeKind};
use crate::env::Env;
use crate::error::SerializeError;
use chunk::{fuses_into_markup, Chunk};
use escape::EscapeInput;
use handlers::{resolve_handler, HandlerRegistry};
use once_cell::sync::Lazy;
use regex::Regex;
use separators::{ConstraintInfo, SepType};
use state::SerializerState;
use std::sync::Arc;

/// Serialize the document below `dom.body()` to wikitext.
pub fn serialize(dom: &Dom, env: &Env) -> Result<String, SerializeError> {
    if env.options.selser && env.page_src.is_none() {
        return Err(SerializeError::MissingOriginalSource);
    }
    let mut ser = Serializer::new(dom, env, env.options.selser);
    ser.serialize_children(dom.body())?;
    ser.flush_trailing_comments();
    let triggers = ser.state.triggers;
    let out = std::mem::take(&mut ser.state.out);
    Ok(postpass::run(out, &triggers, env.options.scrub_wikitext))
}

/// Serialize the children of one node with a fresh serializer. Used for
/// nested bodies (template parameters, extension bodies); selser never
/// applies inside them and the caller chooses the start-of-line footing.
pub(crate) fn serialize_fragment(
    dom: &Dom,
    env: &Env,
    root: NodeId,
    on_sol: bool,
) -> Result<String, SerializeError> {
    let mut ser = Serializer::new(dom, env, false);
    ser.state.on_sol = on_sol;
    ser.serialize_children(root)?;
    Ok(ser.state.out)
}

static DOUBLE_NL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n+").unwrap());
static TRAILING_NL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*$").unwrap());
static LEADING_WS_NL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ \t]*\n+\s*").unwrap());
static AMP_ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"&(#?[0-9a-zA-Z]+;)").unwrap());

pub struct Serializer<'a> {
    pub dom: &'a Dom,
    pub env: &'a Env,
    pub state: SerializerState,
    registry: Arc<HandlerRegistry>,
}

impl<'a> Serializer<'a> {
    pub fn new(dom: &'a Dom, env: &'a Env, selser: bool) -> Self {
        Serializer {
            dom,
            env,
            state: SerializerState::new(selser),
            registry: Arc::new(HandlerRegistry::with_defaults()),
        }
    }

    /// Swap in a caller-extended handler registry.
    pub fn with_registry(mut self, registry: HandlerRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    /// Serialize the children of `parent` in document order.
    pub fn serialize_children(&mut self, parent: NodeId) -> Result<(), SerializeError> {
        let mut last_emitted: Option<NodeId> = None;
        let mut cur = self.dom.first_child(parent);

        while let Some(node) = cur {
            let natural_next = self.dom.next_sibling(node);
            match &self.dom.node(node).kind {
                NodeKind::Comment(_) => {
                    self.fold_comment(node);
                    cur = natural_next;
                }
                NodeKind::Text(_) => {
                    if self.text_is_separator(node) {
                        self.fold_separator_text(node);
                    } else {
                        self.pre_emission(last_emitted, parent, node);
                        self.serialize_text(node)?;
                        last_emitted = Some(node);
                    }
                    cur = natural_next;
                }
                NodeKind::Element(_) => {
                    if let Some(mark) = diff_marker(self.dom, node) {
                        self.apply_diff_marker(mark);
                        cur = natural_next;
                        continue;
                    }
                    self.pre_emission(last_emitted, parent, node);
                    let explicit = self.serialize_element(node)?;
                    last_emitted = Some(node);
                    cur = match explicit {
                        Some(next) => next,
                        None => natural_next,
                    };
                }
            }
        }

        if let Some(last) = last_emitted {
            self.update_separator(last, parent, SepType::ChildParent);
        }
        Ok(())
    }

    /// Constraint update plus modification-flag shift, common to text and
    /// element emission.
    fn pre_emission(&mut self, last_emitted: Option<NodeId>, parent: NodeId, node: NodeId) {
        match last_emitted {
            Some(prev) => self.update_separator(prev, node, SepType::Sibling),
            None => self.update_separator(parent, node, SepType::ParentChild),
        }
        self.state.selser.prev_node_unmodified = self.state.selser.curr_node_unmodified;
        self.state.selser.curr_node_unmodified =
            self.state.selser.enabled && self.dom.diff(node).is_empty();
    }

    /// Serialize one element. `Some(next)` is an explicit jump (selser and
    /// encapsulation advance past whole envelopes, possibly to the end).
    fn serialize_element(
        &mut self,
        node: NodeId,
    ) -> Result<Option<Option<NodeId>>, SerializeError> {
        if let Some(next) = selser::try_source_reuse(self, node)? {
            return Ok(Some(next));
        }

        // Reused source already covers the hack fragment; only fresh
        // emission re-creates it.
        if let Some(src) = self.dom.dp(node).li_hack_src {
            self.emit_str(&src)?;
        }

        if templates::is_first_encapsulation_wrapper(self.dom, node) {
            let next = templates::serialize_encapsulation(self, node)?;
            return Ok(Some(next));
        }

        let wrapper_unmodified = selser::wrapper_unmodified(self, node);
        let handler = resolve_handler(self.dom, &self.registry, node);

        let inserted = self.dom.diff(node).contains(DiffMark::Inserted);
        let next = if inserted {
            let saved = self.state.selser.in_modified_content;
            self.state.selser.in_modified_content = true;
            let r = handler.handle(self, node, wrapper_unmodified);
            self.state.selser.in_modified_content = saved;
            r?
        } else {
            handler.handle(self, node, wrapper_unmodified)?
        };
        Ok(next.map(Some))
    }

    /// Text emission.
    fn serialize_text(&mut self, node: NodeId) -> Result<(), SerializeError> {
        let raw = self
            .dom
            .text(node)
            .expect("serialize_text on a non-text node")
            .to_string();

        let double_newline_count = DOUBLE_NL.find_iter(&raw).count();
        let mut text = raw;

        let mut trailing: Option<String> = None;
        if let Some(m) = TRAILING_NL.find(&text) {
            trailing = Some(m.as_str().to_string());
            text.truncate(m.start());
        }

        if !self.state.in_indent_pre {
            let parent_all_text = self
                .dom
                .parent(node)
                .is_some_and(|p| self.dom.all_children_are_text(p));
            let html_pre_blank_line =
                self.state.in_html_pre && parent_all_text && double_newline_count == 1;
            if !html_pre_blank_line {
                text = DOUBLE_NL.replace_all(&text, "\n").into_owned();
            }
            // Leading newline runs were already consumed by the preceding
            // separator.
            text = LEADING_WS_NL.replace(&text, "").into_owned();
        }

        let mut text = AMP_ENTITY.replace_all(&text, "&amp;$1").into_owned();
        if self.state.in_no_wiki {
            text = text.replace("</nowiki>", "&lt;/nowiki&gt;");
        }

        self.state.escape_text = (self.state.on_sol || !self.state.selser.curr_node_unmodified)
            && !self.state.in_no_wiki
            && !self.state.in_html_pre;
        let result = self.emit(Chunk::Plain(text));
        self.state.escape_text = false;
        result?;

        if let Some(trail) = trailing {
            if self.state.sep.src.is_none() {
                self.state.sep.src = Some(trail);
            }
            // A separator that already has src keeps it; the stripped
            // newlines are dropped.
        }
        Ok(())
    }

    /// Whitespace-only text between block-level structure is layout: it
    /// belongs to the separator, not the content.
    fn text_is_separator(&self, node: NodeId) -> bool {
        let Some(text) = self.dom.text(node) else {
            return false;
        };
        if !text.trim().is_empty() {
            return false;
        }
        let block_side = |sibling: Option<NodeId>| match sibling {
            Some(s) => self.dom.tag(s).is_some_and(crate::tags::is_block_tag),
            None => self
                .dom
                .parent(node)
                .and_then(|p| self.dom.tag(p))
                .is_some_and(crate::tags::is_block_tag),
        };
        block_side(self.dom.prev_sibling(node)) && block_side(self.dom.next_sibling(node))
    }

    fn fold_separator_text(&mut self, node: NodeId) {
        let text = self.dom.text(node).unwrap_or_default().to_string();
        match &mut self.state.sep.src {
            Some(src) => src.push_str(&text),
            None => self.state.sep.src = Some(text),
        }
    }

    /// Comments are invisible to wiki layout; they ride along in the
    /// pending separator.
    fn fold_comment(&mut self, node: NodeId) {
        let data = self.dom.comment(node).unwrap_or_default();
        let comment = format!("<!--{}-->", data.replace("-->", "--&gt;"));
        match &mut self.state.sep.src {
            Some(src) => src.push_str(&comment),
            None => self.state.sep.src = Some(comment),
        }
    }

    fn apply_diff_marker(&mut self, mark: DiffMark) {
        if matches!(mark, DiffMark::Inserted | DiffMark::Deleted) {
            // Content around the marker changed even though the neighbor
            // nodes themselves may carry no marks.
            self.state.selser.curr_node_unmodified = false;
        }
    }

    /// Update the pending separator between `a` and `b` from both handlers'
    /// contracts, including the zero-width parent-child rewrite and
    /// selser recovery of the original inter-node gap.
    fn update_separator(&mut self, a: NodeId, b: NodeId, sep_type: SepType) {
        let (mut na, mut nb, mut st) = (a, b, sep_type);
        if st == SepType::Sibling {
            // A zero-width node is invisible in the source; surrounding
            // whitespace constrains its first child directly.
            if let Some(el) = self.dom.element(b) {
                if el.dp.dsr.is_some_and(|d| d.is_zero_width()) {
                    if let Some(first) = self.dom.first_child(b) {
                        na = b;
                        nb = first;
                        st = SepType::ParentChild;
                    }
                }
            }
        }

        let ha = resolve_handler(self.dom, &self.registry, na);
        let hb = resolve_handler(self.dom, &self.registry, nb);
        let (ca, cb) = match st {
            SepType::Sibling => (ha.after(self.dom, na, nb), hb.before(self.dom, nb, na)),
            SepType::ParentChild => {
                (ha.first_child(self.dom, na, nb), hb.before(self.dom, nb, na))
            }
            SepType::ChildParent => {
                (ha.after(self.dom, na, nb), hb.last_child(self.dom, nb, na))
            }
        };
        let combined = separators::combine(ca, cb);
        self.state.sep.constraints = separators::combine(self.state.sep.constraints, combined);
        self.state.sep.info = Some(ConstraintInfo {
            sep_type: st,
            node_a: na,
            node_b: nb,
            on_sol: self.state.on_sol,
        });

        if self.state.selser.enabled && self.state.sep.src.is_none() && st == SepType::Sibling {
            self.recover_original_gap(na, nb);
        }
    }

    /// In selser mode, the literal whitespace/comments between two
    /// unmodified neighbors come straight from the source.
    fn recover_original_gap(&mut self, a: NodeId, b: NodeId) {
        if !self.dom.diff(a).is_empty() || !self.dom.diff(b).is_empty() {
            return;
        }
        let (Some(da), Some(db)) = (
            self.dom.element(a).and_then(|el| el.dp.dsr),
            self.dom.element(b).and_then(|el| el.dp.dsr),
        ) else {
            return;
        };
        let (Some((_, a_end)), Some((b_start, _))) = (da.range(), db.range()) else {
            return;
        };
        if a_end > b_start {
            return;
        }
        if let Some(gap) = self.env.source_between(a_end, b_start) {
            if separators::is_separator_text(gap) {
                self.state.sep.src = Some(gap.to_string());
                self.state.sep.src_verbatim = true;
            }
        }
    }

    /// Append one chunk, resolving the pending separator first and guarding
    /// boundary characters that would fuse into markup.
    pub fn emit(&mut self, chunk: Chunk) -> Result<(), SerializeError> {
        if chunk.text().is_empty() {
            return Ok(());
        }

        let sep = separators::build_sep(&mut self.state);
        if !sep.is_empty() {
            self.state.push_raw(&sep);
            self.state.last_bounded_right = None;
        }

        let mut text = chunk.text().to_string();
        if self.state.escape_text && !self.state.in_no_wiki && !self.state.in_html_pre {
            let env = self.env;
            let escaped = {
                let input = EscapeInput {
                    text: &text,
                    on_sol: self.state.on_sol,
                    in_attribute: self.state.in_attribute,
                    curr_line: self.state.curr_line(),
                };
                env.escape.escape_text(&input)
            };
            self.state.triggers.merge(escaped.triggers);
            text = escaped.text;
        }

        // Boundary metadata: either the previous chunk told us its right
        // edge, or the incoming chunk is constrained and must check the
        // buffer's last character.
        let prev_edge = self.state.last_bounded_right.or_else(|| {
            if matches!(chunk, Chunk::Bounded(_)) {
                self.state.out.chars().last()
            } else {
                None
            }
        });
        let incoming_edge = match &chunk {
            Chunk::Bounded(b) => b.left,
            Chunk::Plain(_) => text.chars().next(),
        };
        if let (Some(r), Some(l)) = (prev_edge, incoming_edge) {
            if fuses_into_markup(r, l) {
                self.state.push_raw("<nowiki/>");
                if r == '\'' {
                    self.state.triggers.quote_nowiki = true;
                }
                self.state.triggers.self_closing_nowiki = true;
            }
        }

        self.state.push_raw(&text);
        self.state.last_bounded_right = chunk.right_boundary();
        Ok(())
    }

    pub fn emit_str(&mut self, s: &str) -> Result<(), SerializeError> {
        self.emit(Chunk::Plain(s.to_string()))
    }

    /// Run `f` and return what it appended instead of keeping it in the
    /// buffer. The pending separator and boundary state are shelved so the
    /// captured content stands alone.
    pub fn capture(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<(), SerializeError>,
    ) -> Result<String, SerializeError> {
        let mark = self.state.mark();
        let saved_sep = std::mem::take(&mut self.state.sep);
        let saved_edge = self.state.last_bounded_right.take();
        self.state.on_sol = false;
        let result = f(self);
        let text = self.state.rewind_to(mark);
        self.state.sep = saved_sep;
        self.state.last_bounded_right = saved_edge;
        result?;
        Ok(text)
    }

    pub fn with_html_pre<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.state.in_html_pre;
        self.state.in_html_pre = true;
        let r = f(self);
        self.state.in_html_pre = saved;
        r
    }

    pub fn with_no_wiki<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.state.in_no_wiki;
        self.state.in_no_wiki = true;
        let r = f(self);
        self.state.in_no_wiki = saved;
        r
    }

    pub fn with_indent_pre<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.state.in_indent_pre;
        self.state.in_indent_pre = true;
        let r = f(self);
        self.state.in_indent_pre = saved;
        r
    }

    pub fn with_single_line<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.state.single_line.enforce();
        let r = f(self);
        self.state.single_line.pop();
        r
    }

    /// A trailing separator that carries comments must not be dropped on
    /// the floor at end-of-document.
    fn flush_trailing_comments(&mut self) {
        if let Some(src) = self.state.sep.src.take() {
            if src.contains("<!--") {
                let trimmed = src.trim_end().to_string();
                self.state.push_raw(&trimmed);
            }
        }
    }
}

/// Diff-marker meta-elements annotate the position, not a node.
fn diff_marker(dom: &Dom, node: NodeId) -> Option<DiffMark> {
    if dom.tag(node) != Some("meta") {
        return None;
    }
    dom.attr(node, "typeof")?
        .split_whitespace()
        .find_map(|tok| tok.strip_prefix("mw:DiffMarker/"))
        .and_then(crate::dom::provenance::DiffMarks::from_marker_name)
}
