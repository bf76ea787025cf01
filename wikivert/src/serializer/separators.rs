//! Separator engine
//!
//! Between any two emitted nodes there is one logical separator. Both
//! neighbors' handlers declare what they can tolerate (min/max newlines,
//! start-of-line requirements); this module combines the two contracts and
//! resolves them into a concrete whitespace string, preferring original
//! source text when it already satisfies the constraints.

use crate::dom::NodeId;
use crate::serializer::state::SerializerState;
use once_cell::sync::Lazy;
use regex::Regex;

/// One side of a handler's separator contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SepConstraint {
    pub min: Option<u8>,
    pub max: Option<u8>,
    pub force_sol: bool,
    /// The node needs a space between itself and a non-empty preceding line
    /// when no newline ends up separating them.
    pub space: bool,
}

impl SepConstraint {
    pub fn range(min: u8, max: u8) -> Self {
        SepConstraint {
            min: Some(min),
            max: Some(max),
            ..SepConstraint::default()
        }
    }

    pub fn sol_range(min: u8, max: u8) -> Self {
        SepConstraint {
            min: Some(min),
            max: Some(max),
            force_sol: true,
            ..SepConstraint::default()
        }
    }

    pub fn exact(n: u8) -> Self {
        Self::range(n, n)
    }

    pub fn with_space(mut self) -> Self {
        self.space = true;
        self
    }
}

/// Structural relationship the separator sits across.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SepType {
    Sibling,
    ParentChild,
    ChildParent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintInfo {
    pub sep_type: SepType,
    pub node_a: NodeId,
    pub node_b: NodeId,
    pub on_sol: bool,
}

/// The pending separator between the last emitted node and the next one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Separator {
    pub constraints: SepConstraint,
    /// Candidate literal text (whitespace/comments) reused from the source.
    pub src: Option<String>,
    /// The src is the recorded gap between two unmodified selser nodes: it
    /// round-tripped before, so constraints do not get to reshape it.
    pub src_verbatim: bool,
    pub info: Option<ConstraintInfo>,
}

/// Combine two contracts into one. `min` takes the larger demand, `max` the
/// smaller tolerance; an infeasible pair resolves by letting `min` win
/// (correctness over aesthetics). A start-of-line demand from either side
/// sticks.
pub fn combine(a: SepConstraint, b: SepConstraint) -> SepConstraint {
    let min = match (a.min, b.min) {
        (Some(x), Some(y)) => Some(x.max(y)),
        (x, y) => x.or(y),
    };
    let mut max = match (a.max, b.max) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (x, y) => x.or(y),
    };
    if let (Some(mn), Some(mx)) = (min, max) {
        if mn > mx {
            max = Some(mn);
        }
    }
    SepConstraint {
        min,
        max,
        force_sol: a.force_sol || b.force_sol,
        space: a.space || b.space,
    }
}

pub fn count_newlines(s: &str) -> usize {
    s.bytes().filter(|&b| b == b'\n').count()
}

static SEP_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^(?:\s|<!--.*?-->)*$").unwrap());

static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

/// Candidate source text is only usable as a separator when it is made of
/// whitespace and comments.
pub fn is_separator_text(s: &str) -> bool {
    SEP_SHAPE.is_match(s)
}

/// Resolve and consume the pending separator. Called by the emit layer right
/// before the next chunk lands, so `state.on_sol` and the current line still
/// describe the position the separator starts at.
pub fn build_sep(state: &mut SerializerState) -> String {
    let sep = std::mem::take(&mut state.sep);
    let c = sep.constraints;
    let min = c.min.unwrap_or(0) as usize;
    let max = c.max.map(|m| m as usize);

    if state.single_line.enforced() {
        // Inside single-line regions newline demands degrade to a space.
        if min > 0 && !state.curr_line().is_empty() {
            return " ".to_string();
        }
        return String::new();
    }

    let src_nl = sep.src.as_deref().map(count_newlines).unwrap_or(0);

    let satisfied = |s: &str| {
        let n = count_newlines(s);
        n >= min
            && max.map_or(true, |m| n <= m)
            && (!c.force_sol || s.ends_with('\n') || state.on_sol)
            && is_separator_text(s)
    };

    if let Some(src) = &sep.src {
        if satisfied(src) || (sep.src_verbatim && is_separator_text(src)) {
            return src.clone();
        }
    }

    let mut n = src_nl.max(min);
    if let Some(m) = max {
        n = n.min(m.max(min));
    }
    // Comments riding in an unsatisfying src are still content; re-seat them
    // inside the synthesized newlines instead of dropping them.
    let comments: String = sep
        .src
        .as_deref()
        .map(|s| COMMENT.find_iter(s).map(|m| m.as_str()).collect())
        .unwrap_or_default();
    let mut out = if comments.is_empty() {
        "\n".repeat(n)
    } else if n == 0 {
        comments
    } else {
        format!("\n{comments}{}", "\n".repeat(n - 1))
    };
    // Zero-newline synthesis: a node that requires a leading space gets one
    // unless the preceding line is empty.
    if out.is_empty() && c.space && !state.curr_line().is_empty() {
        out.push(' ');
    }
    if c.force_sol && !out.ends_with('\n') && !state.on_sol {
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_takes_union_of_demands() {
        let a = SepConstraint::range(1, 2);
        let b = SepConstraint::range(2, 3);
        let c = combine(a, b);
        assert_eq!((c.min, c.max), (Some(2), Some(2)));
    }

    #[test]
    fn test_combine_infeasible_min_wins() {
        let a = SepConstraint::range(2, 2);
        let b = SepConstraint::range(0, 0);
        let c = combine(a, b);
        assert_eq!((c.min, c.max), (Some(2), Some(2)));
    }

    #[test]
    fn test_combine_force_sol_sticks() {
        let a = SepConstraint::sol_range(0, 1);
        let b = SepConstraint::default();
        assert!(combine(a, b).force_sol);
        assert!(combine(b, a).force_sol);
    }

    #[test]
    fn test_combine_is_idempotent() {
        let a = SepConstraint::sol_range(1, 2);
        let b = SepConstraint::range(2, 4);
        let once = combine(a, b);
        assert_eq!(combine(once, once), once);
    }

    #[test]
    fn test_separator_text_shape() {
        assert!(is_separator_text("\n \n"));
        assert!(is_separator_text("\n<!-- c -->\n"));
        assert!(!is_separator_text("\nfoo\n"));
    }

    #[test]
    fn test_build_sep_keeps_satisfying_src() {
        let mut state = SerializerState::new(false);
        state.sep.constraints = SepConstraint::range(1, 2);
        state.sep.src = Some("\n<!-- keep me -->\n".to_string());
        assert_eq!(build_sep(&mut state), "\n<!-- keep me -->\n");
    }

    #[test]
    fn test_build_sep_synthesizes_clamped_newlines() {
        let mut state = SerializerState::new(false);
        state.sep.constraints = SepConstraint::range(1, 2);
        state.sep.src = Some("\n\n\n\n".to_string());
        assert_eq!(build_sep(&mut state), "\n\n");

        let mut state = SerializerState::new(false);
        state.sep.constraints = SepConstraint::range(2, 2);
        assert_eq!(build_sep(&mut state), "\n\n");
    }

    #[test]
    fn test_build_sep_preserves_comments_when_synthesizing() {
        let mut state = SerializerState::new(false);
        state.sep.constraints = SepConstraint::range(2, 2);
        state.sep.src = Some("<!-- note -->".to_string());
        assert_eq!(build_sep(&mut state), "\n<!-- note -->\n");
    }

    #[test]
    fn test_build_sep_force_sol_appends_newline() {
        let mut state = SerializerState::new(false);
        state.push_raw("text");
        state.sep.constraints = SepConstraint {
            force_sol: true,
            ..SepConstraint::default()
        };
        assert_eq!(build_sep(&mut state), "\n");
    }

    #[test]
    fn test_build_sep_leading_space_when_node_requires_it() {
        let mut state = SerializerState::new(false);
        state.push_raw("cell");
        state.sep.constraints = SepConstraint::range(0, 0).with_space();
        assert_eq!(build_sep(&mut state), " ");
    }

    #[test]
    fn test_build_sep_no_space_on_empty_preceding_line() {
        let mut state = SerializerState::new(false);
        state.sep.constraints = SepConstraint::range(0, 0).with_space();
        assert_eq!(build_sep(&mut state), "");
    }

    #[test]
    fn test_build_sep_newlines_satisfy_space_requirement() {
        let mut state = SerializerState::new(false);
        state.push_raw("text");
        state.sep.constraints = SepConstraint::range(1, 2).with_space();
        assert_eq!(build_sep(&mut state), "\n");
    }

    #[test]
    fn test_build_sep_single_line_context_degrades_to_space() {
        let mut state = SerializerState::new(false);
        state.push_raw("= heading");
        state.single_line.enforce();
        state.sep.constraints = SepConstraint::range(1, 2);
        assert_eq!(build_sep(&mut state), " ");
    }
}
