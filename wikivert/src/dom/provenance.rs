//! Per-node provenance metadata
//!
//! Wire-format mirrors of the `data-parsoid`, `data-mw` and
//! `data-parsoid-diff` attributes a round-trip-aware wiki parser leaves on
//! every node. Field names follow the JSON forms exactly (camelCase renames)
//! so that [`crate::dom::ingest`] can inflate them with serde and the rest of
//! the crate reads plain typed fields.

use serde::de::{Deserializer, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

/// Data Source Range: `[start, end, open_width, close_width]` byte offsets
/// into the original wikitext. Any component may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dsr {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub open_width: Option<i64>,
    pub close_width: Option<i64>,
}

impl Dsr {
    pub fn new(start: i64, end: i64, open: i64, close: i64) -> Self {
        Dsr {
            start: Some(start),
            end: Some(end),
            open_width: Some(open),
            close_width: Some(close),
        }
    }

    /// A DSR is usable for source reuse when `0 <= start <= end`.
    pub fn is_valid(&self) -> bool {
        match (self.start, self.end) {
            (Some(s), Some(e)) => 0 <= s && s <= e,
            _ => false,
        }
    }

    /// Both tag widths are known and non-negative.
    pub fn has_valid_widths(&self) -> bool {
        matches!((self.open_width, self.close_width), (Some(o), Some(c)) if o >= 0 && c >= 0)
    }

    pub fn is_zero_width(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if s == e)
    }

    /// Source span of the node's own content (inside the tags), when the
    /// offsets and widths allow it.
    pub fn inner_range(&self) -> Option<(usize, usize)> {
        let (s, e) = (self.start?, self.end?);
        let (o, c) = (self.open_width?, self.close_width?);
        if s < 0 || o < 0 || c < 0 || s + o > e - c {
            return None;
        }
        Some(((s + o) as usize, (e - c) as usize))
    }

    pub fn range(&self) -> Option<(usize, usize)> {
        if !self.is_valid() {
            return None;
        }
        Some((self.start? as usize, self.end? as usize))
    }
}

// The wire form is a JSON array, usually of length 4, with nulls for absent
// components and sometimes fewer entries.
impl<'de> Deserialize<'de> for Dsr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DsrVisitor;

        impl<'de> Visitor<'de> for DsrVisitor {
            type Value = Dsr;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an array of up to four optional integers")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Dsr, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut parts = [None; 4];
                for slot in parts.iter_mut() {
                    match seq.next_element::<Option<i64>>()? {
                        Some(v) => *slot = v,
                        None => break,
                    }
                }
                // Drain any extra entries rather than erroring on them.
                while seq.next_element::<Value>()?.is_some() {}
                Ok(Dsr {
                    start: parts[0],
                    end: parts[1],
                    open_width: parts[2],
                    close_width: parts[3],
                })
            }
        }

        deserializer.deserialize_seq(DsrVisitor)
    }
}

/// Preserved parameter info for one template parameter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParamInfo {
    pub k: String,
    pub named: bool,
    /// Original spacing around `=`: `[before-key, after-key, before-value, after-value]`.
    pub spc: Option<Vec<String>>,
}

/// The `data-parsoid` provenance record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataParsoid {
    pub dsr: Option<Dsr>,
    /// Surface syntax that produced the node: "wiki", "html" or a
    /// tag-specific variant.
    pub stx: Option<String>,
    #[serde(rename = "autoInsertedStart")]
    pub auto_inserted_start: bool,
    #[serde(rename = "autoInsertedEnd")]
    pub auto_inserted_end: bool,
    #[serde(rename = "selfClose")]
    pub self_close: bool,
    #[serde(rename = "noClose")]
    pub no_close: bool,
    pub fostered: bool,
    pub misnested: bool,
    #[serde(rename = "liHackSrc")]
    pub li_hack_src: Option<String>,
    #[serde(rename = "srcTagName")]
    pub src_tag_name: Option<String>,
    /// Literal source for nodes serialized opaquely (magic words, …).
    pub src: Option<String>,
    /// Shadow of live attribute values at parse time.
    pub a: Option<Map<String, Value>>,
    /// Sanitized-away attribute snapshots (original source strings).
    pub sa: Option<Map<String, Value>>,
    /// Preserved parameter info per template part.
    pub pi: Option<Vec<Vec<ParamInfo>>>,
}

impl DataParsoid {
    pub fn syntax(&self) -> Option<&str> {
        self.stx.as_deref()
    }

    pub fn is_html_syntax(&self) -> bool {
        self.stx.as_deref() == Some("html")
    }

    /// The shadow map records a live value for `key`.
    pub fn shadows(&self, key: &str) -> bool {
        self.a.as_ref().is_some_and(|a| a.contains_key(key))
    }
}

/// Target of a transclusion part.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MwTarget {
    pub wt: Option<String>,
    pub function: Option<String>,
}

/// One template parameter value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MwParam {
    /// Wikitext form. Should be a string; anything else is coerced with a
    /// logged error.
    pub wt: Option<Value>,
    /// HTML form, serialized recursively when `wt` is absent.
    pub html: Option<String>,
    pub key: Option<MwKey>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MwKey {
    pub wt: Option<String>,
}

/// One transclusion part out of `data-mw.parts`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MwPart {
    /// Literal wikitext between templates of a multi-part transclusion.
    Literal(String),
    Template {
        template: TemplateInfo,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TemplateInfo {
    pub target: MwTarget,
    /// Parameter map in wire order; values are lazily read as [`MwParam`].
    pub params: Map<String, Value>,
    /// Index into `data-parsoid.pi`.
    pub i: usize,
}

/// Extension body resolution inputs, in priority order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MwBody {
    pub html: Option<String>,
    pub id: Option<String>,
    pub extsrc: Option<String>,
}

/// The `data-mw` envelope.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataMw {
    pub parts: Option<Vec<MwPart>>,
    /// Extension tag name.
    pub name: Option<String>,
    /// Extension attributes, canonicalized to `key="value"` on output.
    pub attrs: Option<Map<String, Value>>,
    pub body: Option<MwBody>,
    /// Templated-attribute records: `[[key, value], …]` where each side is a
    /// string or a `{txt, html}` object.
    pub attribs: Option<Vec<Value>>,
}

/// One mark out of a node's diff annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffMark {
    Inserted,
    Deleted,
    Moved,
    ChildrenChanged,
    SubtreeChanged,
}

/// Diff annotation on a node, from `data-parsoid-diff` or a diff-marker meta.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffMarks {
    pub marks: Vec<DiffMark>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DiffWire {
    #[serde(default)]
    diff: Vec<DiffMark>,
}

impl DiffMarks {
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn contains(&self, mark: DiffMark) -> bool {
        self.marks.contains(&mark)
    }

    /// The node itself is untouched; only its subtree changed.
    pub fn only_subtree_changed(&self) -> bool {
        !self.marks.is_empty()
            && self
                .marks
                .iter()
                .all(|m| matches!(m, DiffMark::ChildrenChanged | DiffMark::SubtreeChanged))
    }

    /// Parse the `data-parsoid-diff` attribute value.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let wire: DiffWire = serde_json::from_str(json)?;
        Ok(DiffMarks { marks: wire.diff })
    }

    /// Parse a single mark name from a diff-marker meta `typeof`.
    pub fn from_marker_name(name: &str) -> Option<DiffMark> {
        match name {
            "inserted" => Some(DiffMark::Inserted),
            "deleted" => Some(DiffMark::Deleted),
            "moved" => Some(DiffMark::Moved),
            "children-changed" => Some(DiffMark::ChildrenChanged),
            "subtree-changed" => Some(DiffMark::SubtreeChanged),
            _ => None,
        }
    }
}

/// Read a parameter value out of a [`TemplateInfo`] params map.
pub fn param_from_value(value: &Value) -> MwParam {
    match serde_json::from_value::<MwParam>(value.clone()) {
        Ok(p) => p,
        Err(err) => {
            log::error!("malformed template parameter value ({err}); treating as wt");
            MwParam {
                wt: Some(value.clone()),
                html: None,
                key: None,
            }
        }
    }
}
