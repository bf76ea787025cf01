//! Template and extension emission
//!
//! Encapsulated regions (typeof `mw:Transclusion`, `mw:Extension/<name>`)
//! are emitted as one `{{…}}` or `<ext…>` unit from their `data-mw`
//! envelope; the DOM below the wrapper is generated output and never
//! serialized directly.

use crate::dom::ingest;
use crate::dom::provenance::{param_from_value, MwParam, MwPart, ParamInfo, TemplateInfo};
use crate::dom::{Dom, NodeId};
use crate::error::SerializeError;
use crate::serializer::chunk::Chunk;
use crate::serializer::{serialize_fragment, Serializer};
use serde_json::Value;

/// The extension name out of a `mw:Extension/<name>` typeof token.
pub fn extension_name(dom: &Dom, node: NodeId) -> Option<String> {
    dom.attr(node, "typeof")?
        .split_whitespace()
        .find_map(|tok| tok.strip_prefix("mw:Extension/"))
        .map(|s| s.to_string())
}

/// First wrapper of an encapsulated region: carries the encapsulation typeof
/// and no preceding sibling shares its `about`.
pub fn is_first_encapsulation_wrapper(dom: &Dom, node: NodeId) -> bool {
    if !dom.has_typeof(node, "mw:Transclusion") && extension_name(dom, node).is_none() {
        return false;
    }
    let about = dom.attr(node, "about");
    if about.is_none() {
        return true;
    }
    match dom.prev_sibling(node) {
        Some(prev) => dom.attr(prev, "about") != about,
        None => true,
    }
}

/// Node after the whole encapsulated envelope (all `about`-siblings).
pub fn skip_past_envelope(dom: &Dom, node: NodeId) -> Option<NodeId> {
    let mut cur = node;
    if let Some(about) = dom.attr(node, "about") {
        while let Some(next) = dom.next_sibling(cur) {
            if dom.attr(next, "about") == Some(about) {
                cur = next;
            } else {
                break;
            }
        }
    }
    dom.next_sibling(cur)
}

/// Emit an encapsulated region and return the node to continue from.
pub fn serialize_encapsulation(
    ser: &mut Serializer,
    node: NodeId,
) -> Result<Option<NodeId>, SerializeError> {
    if ser.dom.has_typeof(node, "mw:Transclusion") {
        if let Some(text) = transclusion_text(ser, node)? {
            ser.emit(Chunk::from_source(&text, node))?;
        }
    } else if let Some(name) = extension_name(ser.dom, node) {
        if let Some(text) = extension_text(ser, node, &name)? {
            ser.emit(Chunk::from_source(&text, node))?;
        }
    }
    Ok(skip_past_envelope(ser.dom, node))
}

fn transclusion_text(
    ser: &Serializer,
    node: NodeId,
) -> Result<Option<String>, SerializeError> {
    let el = ser.dom.element(node).expect("transclusion wrapper is an element");
    let Some(parts) = el.mw.as_ref().and_then(|mw| mw.parts.clone()) else {
        log::error!("transclusion wrapper without data-mw parts; dropping");
        return Ok(None);
    };
    let pi = el.dp.pi.clone().unwrap_or_default();

    let mut out = String::new();
    for part in &parts {
        match part {
            MwPart::Literal(text) => out.push_str(text),
            MwPart::Template { template } => {
                out.push_str(&template_text(ser, template, pi.get(template.i))?)
            }
        }
    }
    Ok(Some(out))
}

fn template_text(
    ser: &Serializer,
    template: &TemplateInfo,
    pi: Option<&Vec<ParamInfo>>,
) -> Result<String, SerializeError> {
    let target = match &template.target.wt {
        Some(wt) => wt.clone(),
        None => {
            log::error!("template target without wt form; using empty target");
            String::new()
        }
    };
    let mut out = format!("{{{{{target}");

    // Original argument order from the preserved parameter info, then any
    // new arguments in wire order.
    let mut order: Vec<String> = Vec::new();
    if let Some(infos) = pi {
        for info in infos {
            if template.params.contains_key(&info.k) && !order.contains(&info.k) {
                order.push(info.k.clone());
            }
        }
    }
    for key in template.params.keys() {
        if !order.contains(key) {
            order.push(key.clone());
        }
    }

    let mut positional_counter = 1usize;
    for key in &order {
        let param = param_from_value(&template.params[key]);
        let info = pi.and_then(|infos| infos.iter().find(|i| &i.k == key));
        let value = param_value_text(ser, key, &param)?;

        let out_key = match param.key.as_ref().and_then(|k| k.wt.clone()) {
            Some(wt) => wt,
            None => key.trim().to_string(),
        };

        let named_in_pi = info.is_some_and(|i| i.named);
        let positional =
            !named_in_pi && out_key == positional_counter.to_string();
        let escaped = ser.env.escape.escape_template_arg(&value, positional);
        let positional = positional && !escaped.force_named;

        if positional {
            out.push('|');
            out.push_str(&escaped.text);
            positional_counter += 1;
        } else {
            let spc = named_spacing(&out_key, info);
            out.push('|');
            out.push_str(&spc[0]);
            out.push_str(&out_key);
            out.push_str(&spc[1]);
            out.push('=');
            out.push_str(&spc[2]);
            out.push_str(escaped.text.trim());
            out.push_str(&spc[3]);
        }
    }
    out.push_str("}}");
    Ok(out)
}

/// Spacing around `=` for a named parameter. Parameters the original source
/// knew about keep their recorded spacing (or the spaced house style when
/// none was recorded); new parameters and blank keys are compact.
fn named_spacing(key: &str, info: Option<&ParamInfo>) -> [String; 4] {
    let compact = || std::array::from_fn(|_| String::new());
    if key.is_empty() {
        return compact();
    }
    match info {
        Some(i) => match &i.spc {
            Some(spc) if spc.len() == 4 => [
                spc[0].clone(),
                spc[1].clone(),
                spc[2].clone(),
                spc[3].clone(),
            ],
            _ => [
                String::new(),
                " ".to_string(),
                " ".to_string(),
                String::new(),
            ],
        },
        None => compact(),
    }
}

fn param_value_text(
    ser: &Serializer,
    key: &str,
    param: &MwParam,
) -> Result<String, SerializeError> {
    match &param.wt {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => {
            log::error!("parameter \"{key}\" wt form is not a string; coercing");
            Ok(tokens_to_string(other))
        }
        None => match &param.html {
            Some(html) => serialize_html_fragment(ser, html),
            None => Ok(String::new()),
        },
    }
}

/// Reduce a malformed token-ish JSON value to the text it would have
/// produced.
pub fn tokens_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(tokens_to_string).collect(),
        Value::Object(map) => map.get("src").map(tokens_to_string).unwrap_or_default(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
    }
}

fn extension_text(
    ser: &Serializer,
    node: NodeId,
    name: &str,
) -> Result<Option<String>, SerializeError> {
    let el = ser.dom.element(node).expect("extension wrapper is an element");
    let mw = el.mw.clone().unwrap_or_default();

    let mut out = format!("<{name}");
    if let Some(attrs) = &mw.attrs {
        for (key, value) in attrs {
            let text = match value {
                Value::String(s) => s.clone(),
                other => tokens_to_string(other),
            };
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&crate::serializer::attributes::entity_escape(&text));
            out.push('"');
        }
    }

    let Some(body) = &mw.body else {
        out.push_str(" />");
        return Ok(Some(out));
    };

    let content = if let Some(html) = &body.html {
        Some(serialize_html_fragment(ser, html)?)
    } else if let Some(id) = &body.id {
        resolve_body_by_id(ser, id)?
    } else {
        body.extsrc.clone()
    };

    match content {
        Some(content) => {
            out.push('>');
            out.push_str(&content);
            out.push_str(&format!("</{name}>"));
            Ok(Some(out))
        }
        None => {
            log::error!("extension <{name}> body could not be resolved; dropping call");
            Ok(None)
        }
    }
}

/// Body lookup by element id: current document first, then the
/// caller-supplied edited document.
fn resolve_body_by_id(ser: &Serializer, id: &str) -> Result<Option<String>, SerializeError> {
    if let Some(target) = ser.dom.element_by_html_id(id) {
        return Ok(Some(serialize_fragment(ser.dom, ser.env, target, false)?));
    }
    if let Some(edited) = &ser.env.edited_doc {
        if let Some(target) = edited.element_by_html_id(id) {
            return Ok(Some(serialize_fragment(edited, ser.env, target, false)?));
        }
    }
    Ok(None)
}

/// Serialize a nested HTML body (template parameter or extension body) with
/// a fresh serializer that does not start at start-of-line.
fn serialize_html_fragment(ser: &Serializer, html: &str) -> Result<String, SerializeError> {
    let dom = ingest::parse_html(html)?;
    let body = dom.body();
    serialize_fragment(&dom, ser.env, body, false)
}
