//! Wikitext serialization for provenance-annotated HTML DOMs
//!
//! This crate turns the annotated HTML DOM a round-trip-aware wiki parser
//! produces back into wikitext that re-parses to the same HTML. Every node
//! carries a provenance record (source offsets, original surface syntax,
//! auto-insertion flags, template envelopes); the serializer uses it to pick
//! a wikitext or HTML surface form per node, negotiate the whitespace
//! between neighbors, escape literal text, and — in selser mode — re-emit
//! original source bytes for anything the edit did not touch.
//!
//! TLDR for integrators:
//! - Full serialization: `html_to_wikitext(html, &Env::default())`.
//! - Selective serialization: build an `Env` with `SerializeOptions { selser: true, .. }`
//!   and the original page source; diff annotations on the DOM decide
//!   what gets re-emitted.
//! - The per-tag handler registry and the escape oracle are extension
//!   points; swap them through `Serializer::with_registry` and
//!   `Env::with_escape_handler`.
//!
//! # Architecture
//!
//! The hard part is that four concerns resolve simultaneously per node:
//! surface form, separator whitespace, escaping, and source reuse. The
//! split keeps each in one place:
//!
//! ```text
//! .
//! ├── error.rs            # SerializeError
//! ├── env.rs              # per-run inputs: source, options, oracles
//! ├── tags.rs             # wiki dialect constants (block/void/... sets)
//! ├── dom
//! │   ├── mod.rs          # arena DOM the serializer walks
//! │   ├── provenance.rs   # data-parsoid / data-mw / diff wire types
//! │   └── ingest.rs       # annotated HTML -> arena DOM (html5ever)
//! └── serializer
//!     ├── mod.rs          # walker + dispatcher
//!     ├── state.rs        # output buffer and context flags
//!     ├── chunk.rs        # constrained-text emission units
//!     ├── separators.rs   # inter-node whitespace negotiation
//!     ├── handlers.rs     # per-tag handlers + registry
//!     ├── templates.rs    # {{...}} / <ext> emission from data-mw
//!     ├── attributes.rs   # attribute filtering and restoration
//!     ├── selser.rs       # original-source reuse path
//!     ├── escape.rs       # escape oracle trait + default impl
//!     └── postpass.rs     # redundant-nowiki stripping
//! ```
//!
//! # Library Choices
//!
//! HTML parsing is `html5ever` + `markup5ever_rcdom` (browser-grade,
//! handles the malformed input wikis accumulate); the provenance wire
//! formats are serde derives inflated with `serde_json`. The fixed
//! pattern scans (post-pass guards, attribute filters) use `regex`
//! behind `once_cell` statics. Anomalies route through the `log` facade
//! so embedders choose the sink.

pub mod dom;
pub mod env;
pub mod error;
pub mod serializer;
pub mod tags;

pub use dom::{Dom, NodeId};
pub use env::{Env, SerializeOptions};
pub use error::SerializeError;
pub use serializer::{serialize, Serializer};

/// Serialize an already-built DOM to wikitext.
pub fn serialize_document(dom: &Dom, env: &Env) -> Result<String, SerializeError> {
    serializer::serialize(dom, env)
}

/// Parse annotated HTML and serialize it to wikitext in one step.
pub fn html_to_wikitext(html: &str, env: &Env) -> Result<String, SerializeError> {
    let dom = dom::ingest::parse_html(html)?;
    serializer::serialize(&dom, env)
}
