//! Annotated-HTML ingest
//!
//! Parses a Parsoid-annotated HTML page with `html5ever` and inflates the
//! per-node `data-parsoid` / `data-mw` / `data-parsoid-diff` attributes into
//! the typed provenance records of [`crate::dom`]. The serializer core never
//! sees raw JSON.
//!
//! Malformed provenance on a single node is logged and replaced with
//! defaults; ingest never fails for one bad node.

use crate::dom::provenance::{DataMw, DataParsoid, DiffMarks};
use crate::dom::{Dom, NodeId};
use crate::error::SerializeError;
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse annotated HTML into an arena [`Dom`]. Accepts full documents and
/// bare fragments; either way the `<body>` children become the tree.
pub fn parse_html(html: &str) -> Result<Dom, SerializeError> {
    let rcdom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|e| SerializeError::IngestError(e.to_string()))?;

    let body = find_element(&rcdom.document, "body")
        .ok_or_else(|| SerializeError::IngestError("document has no <body>".to_string()))?;

    let mut dom = Dom::new();
    let root = dom.body();
    convert_children(&mut dom, root, &body);
    Ok(dom)
}

fn find_element(handle: &Handle, name: &str) -> Option<Handle> {
    if let NodeData::Element { name: qname, .. } = &handle.data {
        if qname.local.as_ref() == name {
            return Some(handle.clone());
        }
    }
    for child in handle.children.borrow().iter() {
        if let Some(found) = find_element(child, name) {
            return Some(found);
        }
    }
    None
}

fn convert_children(dom: &mut Dom, parent: NodeId, handle: &Handle) {
    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Element { name, attrs, .. } => {
                let tag = name.local.as_ref().to_string();
                let id = dom.append_element(parent, &tag);

                let mut dp = DataParsoid::default();
                let mut mw: Option<DataMw> = None;
                for attr in attrs.borrow().iter() {
                    let key = attr.name.local.as_ref();
                    let value = attr.value.as_ref();
                    match key {
                        "data-parsoid" => {
                            dp = inflate(tag.as_str(), key, value).unwrap_or_default()
                        }
                        "data-mw" => mw = inflate(tag.as_str(), key, value),
                        "data-parsoid-diff" => match DiffMarks::from_json(value) {
                            Ok(marks) => dom.set_diff(id, marks),
                            Err(err) => {
                                log::warn!("<{tag}>: unreadable data-parsoid-diff ({err})")
                            }
                        },
                        _ => {
                            let el = dom.element_mut(id).unwrap();
                            el.attrs.push((key.to_string(), value.to_string()));
                        }
                    }
                }
                let el = dom.element_mut(id).unwrap();
                el.dp = dp;
                el.mw = mw;

                convert_children(dom, id, child);
            }
            NodeData::Text { contents } => {
                let text = contents.borrow();
                if !text.is_empty() {
                    dom.append_text(parent, text.as_ref());
                }
            }
            NodeData::Comment { contents } => {
                dom.append_comment(parent, contents.as_ref());
            }
            // Doctypes and processing instructions carry nothing we emit.
            _ => {}
        }
    }
}

fn inflate<T: serde::de::DeserializeOwned>(tag: &str, key: &str, json: &str) -> Option<T> {
    match serde_json::from_str(json) {
        Ok(v) => Some(v),
        Err(err) => {
            log::warn!("<{tag}>: unreadable {key} attribute ({err}); using defaults");
            None
        }
    }
}
