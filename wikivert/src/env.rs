//! Serialization environment
//!
//! [`Env`] carries the per-run inputs the core consults while walking: the
//! original page source (required for selser), the edited-document handle for
//! cross-document extension-body lookups, the escape oracle and the selser
//! reuse oracle. Wiki dialect constants live in [`crate::tags`], not here.

use crate::dom::provenance::Dsr;
use crate::dom::{Dom, NodeId};
use crate::serializer::escape::{EscapeHandler, WikitextEscapeHandler};

/// Knobs for one serialization run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Reuse original source bytes for unmodified subtrees.
    pub selser: bool,
    /// Let the post-pass drop whitespace whose only effect was an accidental
    /// indent-pre.
    pub scrub_wikitext: bool,
}

/// Caller-supplied check that a node's recorded source range still means the
/// same thing in the edited context. The default accepts everything the DSR
/// bounds accept.
pub trait ReuseOracle {
    fn source_still_valid(&self, dom: &Dom, node: NodeId) -> bool;
}

struct AcceptAll;

impl ReuseOracle for AcceptAll {
    fn source_still_valid(&self, _dom: &Dom, _node: NodeId) -> bool {
        true
    }
}

pub struct Env {
    pub options: SerializeOptions,
    /// Original wikitext of the page; required when `options.selser` is set.
    pub page_src: Option<String>,
    /// Document searched second for extension `body.id` targets.
    pub edited_doc: Option<Dom>,
    pub escape: Box<dyn EscapeHandler>,
    pub reuse_oracle: Box<dyn ReuseOracle>,
}

impl Env {
    pub fn new(options: SerializeOptions) -> Self {
        Env {
            options,
            page_src: None,
            edited_doc: None,
            escape: Box::new(WikitextEscapeHandler),
            reuse_oracle: Box::new(AcceptAll),
        }
    }

    pub fn with_page_src(mut self, src: impl Into<String>) -> Self {
        self.page_src = Some(src.into());
        self
    }

    pub fn with_edited_doc(mut self, doc: Dom) -> Self {
        self.edited_doc = Some(doc);
        self
    }

    pub fn with_escape_handler(mut self, handler: Box<dyn EscapeHandler>) -> Self {
        self.escape = handler;
        self
    }

    pub fn with_reuse_oracle(mut self, oracle: Box<dyn ReuseOracle>) -> Self {
        self.reuse_oracle = oracle;
        self
    }

    /// Slice the original source for a DSR range, refusing ranges that fall
    /// outside the page or off a char boundary.
    pub fn source_range(&self, dsr: &Dsr) -> Option<&str> {
        let src = self.page_src.as_deref()?;
        let (start, end) = dsr.range()?;
        if end > src.len() || !src.is_char_boundary(start) || !src.is_char_boundary(end) {
            return None;
        }
        Some(&src[start..end])
    }

    /// Slice between two source offsets, with the same bounds discipline.
    pub fn source_between(&self, start: usize, end: usize) -> Option<&str> {
        let src = self.page_src.as_deref()?;
        if start > end || end > src.len() {
            return None;
        }
        if !src.is_char_boundary(start) || !src.is_char_boundary(end) {
            return None;
        }
        Some(&src[start..end])
    }
}

impl Default for Env {
    fn default() -> Self {
        Env::new(SerializeOptions::default())
    }
}
