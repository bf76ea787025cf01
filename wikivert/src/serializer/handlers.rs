//! Per-tag handlers and their registry
//!
//! A handler owns the surface form of one tag: what markup to emit and what
//! whitespace it tolerates around itself (the four-sided separator
//! contract). The registry maps `(tag, syntax-variant)` to handlers with a
//! per-tag default; nodes nothing claims fall back to the generic HTML
//! element handler so output stays parseable.

use crate::dom::{Dom, NodeId};
use crate::error::SerializeError;
use crate::serializer::chunk::{BoundedText, Chunk};
use crate::serializer::separators::SepConstraint;
use crate::serializer::{attributes, selser, templates, Serializer};
use crate::tags;
use std::collections::HashMap;
use std::sync::Arc;

/// One tag's serialization strategy plus its separator contract.
///
/// `handle` may return the node the walker should continue from; returning
/// `None` advances to the natural next sibling.
pub trait DomHandler: Send + Sync {
    fn handle(
        &self,
        ser: &mut Serializer,
        node: NodeId,
        wrapper_unmodified: bool,
    ) -> Result<Option<NodeId>, SerializeError>;

    fn before(&self, _dom: &Dom, _node: NodeId, _other: NodeId) -> SepConstraint {
        SepConstraint::default()
    }

    fn after(&self, _dom: &Dom, _node: NodeId, _other: NodeId) -> SepConstraint {
        SepConstraint::default()
    }

    fn first_child(&self, _dom: &Dom, _node: NodeId, _child: NodeId) -> SepConstraint {
        SepConstraint::default()
    }

    fn last_child(&self, _dom: &Dom, _node: NodeId, _child: NodeId) -> SepConstraint {
        SepConstraint::default()
    }
}

fn vs_parent(dom: &Dom, node: NodeId, other: NodeId) -> bool {
    dom.parent(node) == Some(other)
}

/// Registry of handlers keyed by tag, with optional syntax-variant entries.
pub struct HandlerRegistry {
    variants: HashMap<(String, String), Arc<dyn DomHandler>>,
    defaults: HashMap<String, Arc<dyn DomHandler>>,
    html: Arc<dyn DomHandler>,
    encapsulation: Arc<dyn DomHandler>,
    null: Arc<dyn DomHandler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        HandlerRegistry {
            variants: HashMap::new(),
            defaults: HashMap::new(),
            html: Arc::new(HtmlElementHandler),
            encapsulation: Arc::new(EncapsulationHandler),
            null: Arc::new(NullHandler),
        }
    }

    /// A registry with the standard wikitext handlers pre-registered.
    pub fn with_defaults() -> Self {
        let mut reg = Self::new();
        reg.register("body", Arc::new(BodyHandler));
        reg.register("p", Arc::new(ParagraphHandler));
        for h in ["h1", "h2", "h3", "h4", "h5", "h6"] {
            reg.register(h, Arc::new(HeadingHandler));
        }
        reg.register("b", Arc::new(QuoteHandler));
        reg.register("i", Arc::new(QuoteHandler));
        reg.register("a", Arc::new(LinkHandler));
        for t in ["ul", "ol", "dl"] {
            reg.register(t, Arc::new(ListHandler));
        }
        for t in ["li", "dt", "dd"] {
            reg.register(t, Arc::new(ListItemHandler));
        }
        reg.register("table", Arc::new(TableHandler));
        for t in ["tbody", "thead", "tfoot"] {
            reg.register(t, Arc::new(TableSectionHandler));
        }
        reg.register("tr", Arc::new(TableRowHandler));
        reg.register("td", Arc::new(TableCellHandler));
        reg.register("th", Arc::new(TableCellHandler));
        reg.register("caption", Arc::new(CaptionHandler));
        reg.register("pre", Arc::new(IndentPreHandler));
        reg.register_variant("pre", "html", Arc::new(HtmlElementHandler));
        reg.register("hr", Arc::new(HrHandler));
        reg.register("meta", Arc::new(MetaHandler));
        reg.register("link", Arc::new(MetaHandler));
        reg.register("span", Arc::new(SpanHandler));
        reg
    }

    pub fn register(&mut self, tag: &str, handler: Arc<dyn DomHandler>) {
        self.defaults.insert(tag.to_string(), handler);
    }

    pub fn register_variant(&mut self, tag: &str, stx: &str, handler: Arc<dyn DomHandler>) {
        self.variants
            .insert((tag.to_string(), stx.to_string()), handler);
    }

    fn variant(&self, tag: &str, stx: Option<&str>) -> Option<Arc<dyn DomHandler>> {
        let stx = stx?;
        self.variants
            .get(&(tag.to_string(), stx.to_string()))
            .cloned()
    }

    fn default_for(&self, tag: &str) -> Option<Arc<dyn DomHandler>> {
        self.defaults.get(tag).cloned()
    }

    pub fn html_handler(&self) -> Arc<dyn DomHandler> {
        self.html.clone()
    }

    pub fn encapsulation_handler(&self) -> Arc<dyn DomHandler> {
        self.encapsulation.clone()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Handler selection. Text and comment nodes resolve to a null
/// handler that only contributes empty separator contracts; the walker
/// serializes them itself.
pub fn resolve_handler(dom: &Dom, reg: &HandlerRegistry, node: NodeId) -> Arc<dyn DomHandler> {
    let Some(el) = dom.element(node) else {
        return reg.null.clone();
    };

    if templates::is_first_encapsulation_wrapper(dom, node) {
        return reg.encapsulation_handler();
    }

    let tag = el.name.as_str();
    let stx = el.dp.syntax();
    if let Some(h) = reg.variant(tag, stx) {
        return h;
    }
    if stx == Some("html") && tag != "a" {
        return reg.html_handler();
    }
    // A freshly inserted node under HTML-syntax list/table structure keeps
    // the parent's surface syntax; wiki markup there would re-parse
    // differently.
    if el.dp.dsr.is_none() {
        if let Some(parent) = dom.parent(node) {
            if let Some(pel) = dom.element(parent) {
                let structural = tags::is_list_tag(&pel.name)
                    || tags::is_list_item_tag(&pel.name)
                    || tags::is_table_structure_tag(&pel.name);
                if structural && pel.dp.is_html_syntax() {
                    return reg.html_handler();
                }
            }
        }
    }
    reg.default_for(tag).unwrap_or_else(|| reg.html_handler())
}

struct NullHandler;

impl DomHandler for NullHandler {
    fn handle(
        &self,
        _ser: &mut Serializer,
        _node: NodeId,
        _wrapper_unmodified: bool,
    ) -> Result<Option<NodeId>, SerializeError> {
        unreachable!("text and comment nodes are serialized by the walker");
    }
}

struct BodyHandler;

impl DomHandler for BodyHandler {
    fn handle(
        &self,
        ser: &mut Serializer,
        node: NodeId,
        _wrapper_unmodified: bool,
    ) -> Result<Option<NodeId>, SerializeError> {
        ser.serialize_children(node)?;
        Ok(None)
    }
}

struct ParagraphHandler;

impl DomHandler for ParagraphHandler {
    fn handle(
        &self,
        ser: &mut Serializer,
        node: NodeId,
        _wrapper_unmodified: bool,
    ) -> Result<Option<NodeId>, SerializeError> {
        ser.serialize_children(node)?;
        Ok(None)
    }

    fn before(&self, dom: &Dom, node: NodeId, other: NodeId) -> SepConstraint {
        if vs_parent(dom, node, other) {
            SepConstraint::sol_range(0, 2)
        } else if dom.tag(other) == Some("p") {
            SepConstraint::sol_range(2, 2)
        } else {
            SepConstraint::sol_range(1, 2)
        }
    }

    fn after(&self, dom: &Dom, node: NodeId, other: NodeId) -> SepConstraint {
        if vs_parent(dom, node, other) {
            SepConstraint::range(0, 2)
        } else if dom.tag(other) == Some("p") {
            SepConstraint::sol_range(2, 2)
        } else {
            SepConstraint::sol_range(1, 2)
        }
    }
}

struct HeadingHandler;

impl DomHandler for HeadingHandler {
    fn handle(
        &self,
        ser: &mut Serializer,
        node: NodeId,
        _wrapper_unmodified: bool,
    ) -> Result<Option<NodeId>, SerializeError> {
        let level = ser
            .dom
            .tag(node)
            .and_then(|t| t.strip_prefix('h'))
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(2)
            .min(6);
        let marker = "=".repeat(level);
        ser.emit_str(&marker)?;
        ser.with_single_line(|s| s.serialize_children(node))?;
        ser.emit_str(&marker)?;
        Ok(None)
    }

    fn before(&self, dom: &Dom, node: NodeId, other: NodeId) -> SepConstraint {
        if vs_parent(dom, node, other) {
            SepConstraint::sol_range(0, 2)
        } else {
            SepConstraint::sol_range(1, 2)
        }
    }

    fn after(&self, _dom: &Dom, _node: NodeId, _other: NodeId) -> SepConstraint {
        SepConstraint::sol_range(1, 2)
    }
}

struct QuoteHandler;

impl QuoteHandler {
    fn marker(dom: &Dom, node: NodeId) -> &'static str {
        if dom.tag(node) == Some("b") {
            "'''"
        } else {
            "''"
        }
    }
}

impl DomHandler for QuoteHandler {
    fn handle(
        &self,
        ser: &mut Serializer,
        node: NodeId,
        _wrapper_unmodified: bool,
    ) -> Result<Option<NodeId>, SerializeError> {
        let marker = Self::marker(ser.dom, node);
        let quotes = |text: &str| {
            Chunk::Bounded(BoundedText {
                text: text.to_string(),
                left: Some('\''),
                right: Some('\''),
                node,
            })
        };
        ser.emit(quotes(marker))?;
        ser.serialize_children(node)?;
        ser.emit(quotes(marker))?;
        Ok(None)
    }
}

struct LinkHandler;

impl DomHandler for LinkHandler {
    fn handle(
        &self,
        ser: &mut Serializer,
        node: NodeId,
        wrapper_unmodified: bool,
    ) -> Result<Option<NodeId>, SerializeError> {
        let rel = ser.dom.attr(node, "rel").unwrap_or("").to_string();
        let href = ser.dom.attr(node, "href").unwrap_or("").to_string();

        if rel.split_whitespace().any(|t| t == "mw:WikiLink") {
            let target = href.strip_prefix("./").unwrap_or(&href).to_string();
            let content = ser.capture(|s| s.serialize_children(node))?;
            let text = if content == target || content.is_empty() {
                format!("[[{target}]]")
            } else {
                format!("[[{target}|{content}]]")
            };
            ser.emit(Chunk::from_source(&text, node))?;
            return Ok(None);
        }

        if rel.split_whitespace().any(|t| t == "mw:ExtLink") {
            let content = ser.capture(|s| s.serialize_children(node))?;
            let text = if content.is_empty() || content == href {
                // Bare URLs autolink.
                href.clone()
            } else {
                format!("[{href} {content}]")
            };
            ser.emit(Chunk::from_source(&text, node))?;
            return Ok(None);
        }

        HtmlElementHandler.handle(ser, node, wrapper_unmodified)
    }
}

struct ListHandler;

impl DomHandler for ListHandler {
    fn handle(
        &self,
        ser: &mut Serializer,
        node: NodeId,
        _wrapper_unmodified: bool,
    ) -> Result<Option<NodeId>, SerializeError> {
        ser.serialize_children(node)?;
        Ok(None)
    }

    fn before(&self, dom: &Dom, node: NodeId, other: NodeId) -> SepConstraint {
        if vs_parent(dom, node, other) {
            if dom.tag(other).is_some_and(tags::is_list_item_tag) {
                // Nested list: starts on the line after its item text.
                SepConstraint::sol_range(1, 1)
            } else {
                SepConstraint::sol_range(0, 2)
            }
        } else {
            SepConstraint::sol_range(1, 2)
        }
    }

    fn after(&self, dom: &Dom, node: NodeId, other: NodeId) -> SepConstraint {
        if vs_parent(dom, node, other) {
            SepConstraint::range(0, 2)
        } else {
            SepConstraint::sol_range(1, 2)
        }
    }
}

/// Bullet run for a list item, derived from its list-structure ancestors.
/// HTML-syntax ancestors contribute nothing; their subtree serializes as
/// HTML anyway.
fn list_bullets(dom: &Dom, item: NodeId) -> String {
    let mut bullets = Vec::new();
    let mut cur = item;
    loop {
        let Some(parent) = dom.parent(cur) else { break };
        let Some(pel) = dom.element(parent) else { break };
        if pel.dp.is_html_syntax() {
            break;
        }
        let bullet = match (pel.name.as_str(), dom.tag(cur)) {
            ("ul", Some("li")) => '*',
            ("ol", Some("li")) => '#',
            ("dl", Some("dt")) => ';',
            ("dl", Some("dd")) => ':',
            _ => break,
        };
        bullets.push(bullet);
        match dom.parent(parent) {
            Some(gp) if dom.tag(gp).is_some_and(tags::is_list_item_tag) => cur = gp,
            _ => break,
        }
    }
    bullets.iter().rev().collect()
}

struct ListItemHandler;

impl DomHandler for ListItemHandler {
    fn handle(
        &self,
        ser: &mut Serializer,
        node: NodeId,
        _wrapper_unmodified: bool,
    ) -> Result<Option<NodeId>, SerializeError> {
        let bullets = list_bullets(ser.dom, node);
        ser.emit_str(&bullets)?;
        ser.serialize_children(node)?;
        Ok(None)
    }

    fn before(&self, dom: &Dom, node: NodeId, other: NodeId) -> SepConstraint {
        if vs_parent(dom, node, other) {
            SepConstraint::sol_range(0, 1)
        } else {
            SepConstraint::sol_range(1, 1)
        }
    }

    fn after(&self, _dom: &Dom, _node: NodeId, _other: NodeId) -> SepConstraint {
        SepConstraint::range(0, 1)
    }
}

struct TableHandler;

impl DomHandler for TableHandler {
    fn handle(
        &self,
        ser: &mut Serializer,
        node: NodeId,
        wrapper_unmodified: bool,
    ) -> Result<Option<NodeId>, SerializeError> {
        let reused = if wrapper_unmodified {
            selser::reused_tag_srcs(ser, node)
        } else {
            None
        };
        let (open, close) = match reused {
            Some(pair) => pair,
            None => {
                let attrs = attributes::serialize_attributes(ser.dom, node);
                let open = if attrs.is_empty() {
                    "{|".to_string()
                } else {
                    format!("{{| {attrs}")
                };
                (open, "|}".to_string())
            }
        };
        ser.emit_str(&open)?;
        ser.serialize_children(node)?;
        ser.emit_str(&close)?;
        Ok(None)
    }

    fn before(&self, dom: &Dom, node: NodeId, other: NodeId) -> SepConstraint {
        if vs_parent(dom, node, other) {
            SepConstraint::sol_range(0, 2)
        } else {
            SepConstraint::sol_range(1, 2)
        }
    }

    fn after(&self, dom: &Dom, node: NodeId, other: NodeId) -> SepConstraint {
        if vs_parent(dom, node, other) {
            SepConstraint::range(0, 2)
        } else {
            SepConstraint::sol_range(1, 2)
        }
    }

    fn first_child(&self, _dom: &Dom, _node: NodeId, _child: NodeId) -> SepConstraint {
        SepConstraint::sol_range(1, 1)
    }

    fn last_child(&self, _dom: &Dom, _node: NodeId, _child: NodeId) -> SepConstraint {
        SepConstraint::sol_range(1, 1)
    }
}

struct TableSectionHandler;

impl DomHandler for TableSectionHandler {
    fn handle(
        &self,
        ser: &mut Serializer,
        node: NodeId,
        _wrapper_unmodified: bool,
    ) -> Result<Option<NodeId>, SerializeError> {
        ser.serialize_children(node)?;
        Ok(None)
    }
}

/// The first row of a table is implicit in wikitext unless it carries
/// attributes of its own.
fn is_implicit_first_row(dom: &Dom, tr: NodeId) -> bool {
    if dom.element(tr).is_some_and(|el| !el.attrs.is_empty()) {
        return false;
    }
    let mut prev = dom.prev_sibling(tr);
    while let Some(p) = prev {
        if dom.tag(p) == Some("tr") {
            return false;
        }
        prev = dom.prev_sibling(p);
    }
    // Inside a section: the section itself must be the first one.
    if let Some(parent) = dom.parent(tr) {
        if dom.tag(parent) != Some("table") {
            let mut prev = dom.prev_sibling(parent);
            while let Some(p) = prev {
                if dom.tag(p).is_some_and(|t| matches!(t, "tbody" | "thead" | "tfoot")) {
                    return false;
                }
                prev = dom.prev_sibling(p);
            }
        }
    }
    true
}

struct TableRowHandler;

impl DomHandler for TableRowHandler {
    fn handle(
        &self,
        ser: &mut Serializer,
        node: NodeId,
        wrapper_unmodified: bool,
    ) -> Result<Option<NodeId>, SerializeError> {
        if wrapper_unmodified {
            if let Some((open, _)) = selser::reused_tag_srcs(ser, node) {
                if !open.is_empty() {
                    ser.emit_str(&open)?;
                }
                ser.serialize_children(node)?;
                return Ok(None);
            }
        }
        if !is_implicit_first_row(ser.dom, node) {
            let attrs = attributes::serialize_attributes(ser.dom, node);
            let open = if attrs.is_empty() {
                "|-".to_string()
            } else {
                format!("|- {attrs}")
            };
            ser.emit_str(&open)?;
        }
        ser.serialize_children(node)?;
        Ok(None)
    }

    fn before(&self, _dom: &Dom, _node: NodeId, _other: NodeId) -> SepConstraint {
        SepConstraint::sol_range(0, 1)
    }

    fn after(&self, _dom: &Dom, _node: NodeId, _other: NodeId) -> SepConstraint {
        SepConstraint::range(0, 1)
    }
}

struct TableCellHandler;

impl DomHandler for TableCellHandler {
    fn handle(
        &self,
        ser: &mut Serializer,
        node: NodeId,
        wrapper_unmodified: bool,
    ) -> Result<Option<NodeId>, SerializeError> {
        let open = if wrapper_unmodified {
            selser::reused_tag_srcs(ser, node).map(|(open, _)| open)
        } else {
            None
        };
        let open = match open {
            Some(open) => open,
            None => {
                let sym = if ser.dom.tag(node) == Some("th") { "!" } else { "|" };
                let attrs = attributes::serialize_attributes(ser.dom, node);
                if attrs.is_empty() {
                    sym.to_string()
                } else {
                    // Attribute form: `| attrs | content`.
                    format!("{sym}{attrs} |")
                }
            }
        };
        ser.emit_str(&open)?;
        ser.serialize_children(node)?;
        Ok(None)
    }

    fn before(&self, _dom: &Dom, _node: NodeId, _other: NodeId) -> SepConstraint {
        SepConstraint::sol_range(0, 1)
    }

    fn after(&self, _dom: &Dom, _node: NodeId, _other: NodeId) -> SepConstraint {
        SepConstraint::range(0, 1)
    }
}

struct CaptionHandler;

impl DomHandler for CaptionHandler {
    fn handle(
        &self,
        ser: &mut Serializer,
        node: NodeId,
        _wrapper_unmodified: bool,
    ) -> Result<Option<NodeId>, SerializeError> {
        ser.emit_str("|+")?;
        ser.serialize_children(node)?;
        Ok(None)
    }

    fn before(&self, _dom: &Dom, _node: NodeId, _other: NodeId) -> SepConstraint {
        SepConstraint::sol_range(0, 1)
    }

    fn after(&self, _dom: &Dom, _node: NodeId, _other: NodeId) -> SepConstraint {
        SepConstraint::range(0, 1)
    }
}

struct IndentPreHandler;

impl DomHandler for IndentPreHandler {
    fn handle(
        &self,
        ser: &mut Serializer,
        node: NodeId,
        _wrapper_unmodified: bool,
    ) -> Result<Option<NodeId>, SerializeError> {
        let content =
            ser.with_indent_pre(|s| s.capture(|s2| s2.serialize_children(node)))?;
        let mut out = String::with_capacity(content.len() + 8);
        out.push(' ');
        out.push_str(&content.replace('\n', "\n "));
        ser.emit_str(&out)?;
        Ok(None)
    }

    fn before(&self, dom: &Dom, node: NodeId, other: NodeId) -> SepConstraint {
        if vs_parent(dom, node, other) {
            SepConstraint::sol_range(0, 2)
        } else {
            SepConstraint::sol_range(1, 2)
        }
    }

    fn after(&self, _dom: &Dom, _node: NodeId, _other: NodeId) -> SepConstraint {
        SepConstraint::sol_range(1, 2)
    }
}

struct HrHandler;

impl DomHandler for HrHandler {
    fn handle(
        &self,
        ser: &mut Serializer,
        _node: NodeId,
        _wrapper_unmodified: bool,
    ) -> Result<Option<NodeId>, SerializeError> {
        ser.emit_str("----")?;
        Ok(None)
    }

    fn before(&self, _dom: &Dom, _node: NodeId, _other: NodeId) -> SepConstraint {
        SepConstraint::sol_range(1, 2)
    }

    fn after(&self, _dom: &Dom, _node: NodeId, _other: NodeId) -> SepConstraint {
        SepConstraint {
            min: Some(0),
            max: Some(2),
            force_sol: true,
            ..SepConstraint::default()
        }
    }
}

/// Metas and links are mostly page-property carriers whose wikitext form,
/// when they have one, was preserved verbatim in provenance.
struct MetaHandler;

impl DomHandler for MetaHandler {
    fn handle(
        &self,
        ser: &mut Serializer,
        node: NodeId,
        _wrapper_unmodified: bool,
    ) -> Result<Option<NodeId>, SerializeError> {
        let src = ser.dom.dp(node).src;
        match src {
            Some(src) => ser.emit_str(&src)?,
            None => log::debug!(
                "<{}> without preserved source; emitting nothing",
                ser.dom.tag(node).unwrap_or("meta")
            ),
        }
        Ok(None)
    }
}

struct SpanHandler;

impl DomHandler for SpanHandler {
    fn handle(
        &self,
        ser: &mut Serializer,
        node: NodeId,
        wrapper_unmodified: bool,
    ) -> Result<Option<NodeId>, SerializeError> {
        if ser.dom.has_typeof(node, "mw:Entity") {
            if let Some(src) = ser.dom.dp(node).src {
                ser.emit_str(&src)?;
            } else if let Some(text) = ser.dom.first_child(node).and_then(|c| ser.dom.text(c)) {
                let text = text.to_string();
                ser.emit_str(&text)?;
            }
            return Ok(None);
        }
        if ser.dom.has_typeof(node, "mw:Nowiki") {
            ser.emit_str("<nowiki>")?;
            ser.with_no_wiki(|s| s.serialize_children(node))?;
            ser.emit_str("</nowiki>")?;
            return Ok(None);
        }
        HtmlElementHandler.handle(ser, node, wrapper_unmodified)
    }
}

/// Generic HTML element fallback.
pub struct HtmlElementHandler;

impl DomHandler for HtmlElementHandler {
    fn handle(
        &self,
        ser: &mut Serializer,
        node: NodeId,
        wrapper_unmodified: bool,
    ) -> Result<Option<NodeId>, SerializeError> {
        let el = ser
            .dom
            .element(node)
            .expect("html element handler invoked on a non-element");
        let dp = el.dp.clone();
        let tag = el.name.clone();
        let tag_name = dp.src_tag_name.clone().unwrap_or_else(|| tag.clone());
        let void = tags::is_void_element(&tag);

        let reused = if wrapper_unmodified {
            selser::reused_tag_srcs(ser, node)
        } else {
            None
        };

        if !dp.auto_inserted_start {
            match &reused {
                Some((open, _)) if !open.is_empty() => {
                    let open = open.clone();
                    ser.emit_str(&open)?;
                }
                _ => {
                    let attrs = attributes::serialize_attributes(ser.dom, node);
                    let mut open = format!("<{tag_name}");
                    if !attrs.is_empty() {
                        open.push(' ');
                        open.push_str(&attrs);
                    }
                    if (void && !dp.no_close) || dp.self_close {
                        open.push_str(" /");
                    }
                    open.push('>');
                    ser.emit_str(&open)?;
                }
            }
        }

        match tag.as_str() {
            "pre" => ser.with_html_pre(|s| s.serialize_children(node))?,
            "nowiki" => ser.with_no_wiki(|s| s.serialize_children(node))?,
            _ => ser.serialize_children(node)?,
        }

        if !(dp.auto_inserted_end || void || dp.self_close) {
            match &reused {
                Some((_, close)) if !close.is_empty() => {
                    let close = close.clone();
                    ser.emit_str(&close)?;
                }
                _ => ser.emit_str(&format!("</{tag_name}>"))?,
            }
        }
        Ok(None)
    }
}

/// Encapsulated template/extension regions emit from data-mw as one unit.
struct EncapsulationHandler;

impl DomHandler for EncapsulationHandler {
    fn handle(
        &self,
        ser: &mut Serializer,
        node: NodeId,
        _wrapper_unmodified: bool,
    ) -> Result<Option<NodeId>, SerializeError> {
        templates::serialize_encapsulation(ser, node)
    }
}
