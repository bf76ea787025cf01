//! Attribute serialization
//!
//! Turns an element's live attribute list plus provenance into the attribute
//! string of an emitted tag. Parser-generated bookkeeping is filtered out,
//! templated names are resolved through data-mw, and attributes the
//! sanitizer removed are restored from their `sa` snapshots.

use crate::dom::{Dom, NodeId};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Attributes that exist for round-trip bookkeeping, never for output.
const IGNORED_ATTRS: &[&str] = &[
    "data-parsoid",
    "data-mw",
    "data-ve-changed",
    "data-parsoid-changed",
    "data-parsoid-diff",
    "data-parsoid-serialize",
];

static PARSER_GENERATED_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^mw[\w-]{2,}$").unwrap());
static MWT_ABOUT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#mwt\d+$").unwrap());
static MW_TYPEOF_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^mw:\S+$").unwrap());

pub fn entity_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn value_as_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Look up the wikitext form of a templated attribute key or value recorded
/// in `data-mw.attribs`. Each record is a `[key, value]` pair where either
/// side is a plain string or a `{txt, html}` object.
fn templated_attr_text(dom: &Dom, node: NodeId, key: &str) -> Option<String> {
    let mw = dom.element(node)?.mw.as_ref()?;
    for pair in mw.attribs.as_ref()? {
        let arr = pair.as_array()?;
        if arr.len() != 2 {
            continue;
        }
        let k_txt = match &arr[0] {
            Value::String(s) => s.clone(),
            Value::Object(o) => o.get("txt").map(value_as_text).unwrap_or_default(),
            _ => continue,
        };
        if k_txt != key {
            continue;
        }
        return match &arr[1] {
            Value::String(s) => Some(s.clone()),
            Value::Object(o) => o.get("txt").map(value_as_text),
            _ => None,
        };
    }
    None
}

/// Serialize the attributes of `node` per the filtering rules. Returns the
/// attribute string without a leading space; empty when nothing survives.
pub fn serialize_attributes(dom: &Dom, node: NodeId) -> String {
    let Some(el) = dom.element(node) else {
        return String::new();
    };
    let dp = &el.dp;
    let mut parts: Vec<String> = Vec::new();
    let mut live_keys: Vec<&str> = Vec::new();

    for (key, value) in &el.attrs {
        live_keys.push(key.as_str());

        if IGNORED_ATTRS.contains(&key.as_str()) {
            continue;
        }

        if key == "id" && PARSER_GENERATED_ID.is_match(value) {
            let confirmed = dp.shadows("id")
                || dp.sa.as_ref().is_some_and(|sa| sa.contains_key("id"));
            if !confirmed {
                log::warn!("dropping unconfirmed parser-generated id \"{value}\"");
                continue;
            }
        }

        let mut value = value.clone();
        if key == "about" && MWT_ABOUT.is_match(&value) {
            continue;
        }
        if key == "typeof" {
            let rest: Vec<&str> = value
                .split_whitespace()
                .filter(|tok| !MW_TYPEOF_TOKEN.is_match(tok))
                .collect();
            if rest.is_empty() {
                continue;
            }
            value = rest.join(" ");
        }

        // Templated attributes round-trip through data-mw; a data-x- prefix
        // guards names that would otherwise be treated as templated.
        let out_key = key.strip_prefix("data-x-").unwrap_or(key).to_string();
        if let Some(resolved) = templated_attr_text(dom, node, &out_key) {
            value = resolved;
        }

        if !value.is_empty() {
            // Values recovered verbatim from the source keep their original
            // entity spelling.
            let reused = dp
                .sa
                .as_ref()
                .and_then(|sa| sa.get(key.as_str()))
                .map(value_as_text)
                .filter(|orig| {
                    dp.a
                        .as_ref()
                        .and_then(|a| a.get(key.as_str()))
                        .map(value_as_text)
                        .as_deref()
                        == Some(value.as_str())
                        || *orig == value
                });
            let emitted = match reused {
                Some(orig) => orig,
                None => entity_escape(&value),
            };
            parts.push(format!("{out_key}=\"{emitted}\""));
        } else if out_key.contains('{') || out_key.contains('<') {
            parts.push(out_key);
        } else {
            parts.push(format!("{out_key}=\"\""));
        }
    }

    // Restore attributes the sanitizer stripped: recorded in `sa`, absent
    // from the live list, and shadowed as absent in `a`.
    if let Some(sa) = &dp.sa {
        for (key, orig) in sa {
            if live_keys.contains(&key.as_str()) {
                continue;
            }
            let shadow_absent = dp
                .a
                .as_ref()
                .map_or(true, |a| a.get(key).map_or(true, Value::is_null));
            if shadow_absent {
                parts.push(format!("{key}=\"{}\"", value_as_text(orig)));
            }
        }
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Dom;
    use serde_json::json;

    fn element_with_attrs(attrs: &[(&str, &str)]) -> (Dom, NodeId) {
        let mut dom = Dom::new();
        let node = dom.append_element(dom.body(), "span");
        let el = dom.element_mut(node).unwrap();
        for (k, v) in attrs {
            el.attrs.push((k.to_string(), v.to_string()));
        }
        (dom, node)
    }

    #[test]
    fn test_ignored_attrs_dropped() {
        let (dom, node) = element_with_attrs(&[
            ("data-parsoid-diff", "{}"),
            ("data-parsoid-serialize", "x"),
            ("class", "keep"),
        ]);
        assert_eq!(serialize_attributes(&dom, node), "class=\"keep\"");
    }

    #[test]
    fn test_unconfirmed_parser_id_dropped() {
        let (dom, node) = element_with_attrs(&[("id", "mwAb"), ("class", "c")]);
        assert_eq!(serialize_attributes(&dom, node), "class=\"c\"");
    }

    #[test]
    fn test_confirmed_parser_id_kept() {
        let (mut dom, node) = element_with_attrs(&[("id", "mwAb")]);
        let el = dom.element_mut(node).unwrap();
        el.dp.a = Some(
            json!({"id": "mwAb"})
                .as_object()
                .cloned()
                .unwrap(),
        );
        assert_eq!(serialize_attributes(&dom, node), "id=\"mwAb\"");
    }

    #[test]
    fn test_user_id_kept_without_provenance() {
        let (dom, node) = element_with_attrs(&[("id", "my-anchor")]);
        assert_eq!(serialize_attributes(&dom, node), "id=\"my-anchor\"");
    }

    #[test]
    fn test_about_and_typeof_stripping() {
        let (dom, node) = element_with_attrs(&[
            ("about", "#mwt3"),
            ("typeof", "mw:Transclusion"),
            ("class", "c"),
        ]);
        assert_eq!(serialize_attributes(&dom, node), "class=\"c\"");

        let (dom, node) = element_with_attrs(&[("typeof", "mw:Extension/ref custom")]);
        assert_eq!(serialize_attributes(&dom, node), "typeof=\"custom\"");
    }

    #[test]
    fn test_non_mwt_about_kept() {
        let (dom, node) = element_with_attrs(&[("about", "#other")]);
        assert_eq!(serialize_attributes(&dom, node), "about=\"#other\"");
    }

    #[test]
    fn test_value_entity_escaping() {
        let (dom, node) = element_with_attrs(&[("title", "a \"b\" & <c>")]);
        assert_eq!(
            serialize_attributes(&dom, node),
            "title=\"a &quot;b&quot; &amp; &lt;c&gt;\""
        );
    }

    #[test]
    fn test_empty_value_forms() {
        let (dom, node) = element_with_attrs(&[("hidden", "")]);
        assert_eq!(serialize_attributes(&dom, node), "hidden=\"\"");

        let (dom, node) = element_with_attrs(&[("{{tpl}}", "")]);
        assert_eq!(serialize_attributes(&dom, node), "{{tpl}}");
    }

    #[test]
    fn test_data_x_prefix_stripped() {
        let (dom, node) = element_with_attrs(&[("data-x-{{tpl}}", "")]);
        assert_eq!(serialize_attributes(&dom, node), "{{tpl}}");
    }

    #[test]
    fn test_sanitized_away_restoration_order() {
        let (mut dom, node) = element_with_attrs(&[("class", "foo")]);
        let el = dom.element_mut(node).unwrap();
        el.dp.sa = Some(json!({"style": "color:red"}).as_object().cloned().unwrap());
        el.dp.a = Some(json!({"style": null}).as_object().cloned().unwrap());
        assert_eq!(
            serialize_attributes(&dom, node),
            "class=\"foo\" style=\"color:red\""
        );
    }

    #[test]
    fn test_live_attr_not_restored_twice() {
        let (mut dom, node) = element_with_attrs(&[("style", "color:blue")]);
        let el = dom.element_mut(node).unwrap();
        el.dp.sa = Some(json!({"style": "color:red"}).as_object().cloned().unwrap());
        let out = serialize_attributes(&dom, node);
        assert_eq!(out.matches("style").count(), 1);
    }
}
