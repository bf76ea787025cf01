//! Serializer state
//!
//! One [`SerializerState`] exists per serialization and owns the output
//! buffer plus every context flag the walker and handlers coordinate
//! through. Nothing appends to `out` directly except [`SerializerState::push_raw`],
//! and the emit layer only calls that after resolving the pending separator.

use crate::serializer::escape::PostPassTriggers;
use crate::serializer::separators::Separator;

/// Selser bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelserState {
    pub enabled: bool,
    /// Inside content that the diff marked as new or rewritten.
    pub in_modified_content: bool,
    pub curr_node_unmodified: bool,
    pub prev_node_unmodified: bool,
}

/// Stack of single-line-only regions (heading bodies, table-cell attributes).
/// Selser temporarily pushes a disabled frame for structures whose reused
/// source may span lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingleLineContext {
    stack: Vec<bool>,
}

impl SingleLineContext {
    pub fn enforce(&mut self) {
        self.stack.push(true);
    }

    pub fn disable(&mut self) {
        self.stack.push(false);
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }

    pub fn enforced(&self) -> bool {
        *self.stack.last().unwrap_or(&false)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SerializerState {
    pub out: String,
    /// Byte offset where the unflushed output line starts.
    line_start: usize,
    /// The next character would land at start-of-line.
    pub on_sol: bool,
    /// Route the next emitted chunk through the escape oracle.
    pub escape_text: bool,
    pub in_no_wiki: bool,
    pub in_html_pre: bool,
    pub in_indent_pre: bool,
    pub in_attribute: bool,
    pub selser: SelserState,
    pub sep: Separator,
    pub single_line: SingleLineContext,
    /// Which post-pass rewrites can possibly match the buffer.
    pub triggers: PostPassTriggers,
    /// Right boundary character of the last emitted constrained chunk.
    pub last_bounded_right: Option<char>,
}

impl SerializerState {
    pub fn new(selser: bool) -> Self {
        SerializerState {
            on_sol: true,
            selser: SelserState {
                enabled: selser,
                ..SelserState::default()
            },
            ..SerializerState::default()
        }
    }

    /// Append text to the output, maintaining `on_sol` and the current-line
    /// window. Callers go through the emit layer, never here.
    pub fn push_raw(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.out.push_str(s);
        let appended_at = self.out.len() - s.len();
        if let Some(pos) = s.rfind('\n') {
            self.line_start = appended_at + pos + 1;
        }
        self.on_sol = self.out.ends_with('\n');
    }

    /// Unflushed tail of the output (text since the last newline).
    pub fn curr_line(&self) -> &str {
        &self.out[self.line_start..]
    }

    /// Snapshot used by [`crate::serializer::Serializer::capture`] to rewind.
    pub fn mark(&self) -> (usize, usize, bool) {
        (self.out.len(), self.line_start, self.on_sol)
    }

    pub fn rewind_to(&mut self, mark: (usize, usize, bool)) -> String {
        let tail = self.out.split_off(mark.0);
        self.line_start = mark.1;
        self.on_sol = mark.2;
        tail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_sol_tracking() {
        let mut state = SerializerState::new(false);
        assert!(state.on_sol);
        state.push_raw("foo");
        assert!(!state.on_sol);
        assert_eq!(state.curr_line(), "foo");
        state.push_raw("\nbar");
        assert!(!state.on_sol);
        assert_eq!(state.curr_line(), "bar");
        state.push_raw("\n");
        assert!(state.on_sol);
        assert_eq!(state.curr_line(), "");
    }

    #[test]
    fn test_single_line_context_stack() {
        let mut ctx = SingleLineContext::default();
        assert!(!ctx.enforced());
        ctx.enforce();
        assert!(ctx.enforced());
        ctx.disable();
        assert!(!ctx.enforced());
        ctx.pop();
        assert!(ctx.enforced());
        ctx.pop();
        assert!(!ctx.enforced());
    }

    #[test]
    fn test_rewind_restores_line_window() {
        let mut state = SerializerState::new(false);
        state.push_raw("line\n");
        let mark = state.mark();
        state.push_raw("captured text");
        let tail = state.rewind_to(mark);
        assert_eq!(tail, "captured text");
        assert!(state.on_sol);
        assert_eq!(state.curr_line(), "");
    }
}
