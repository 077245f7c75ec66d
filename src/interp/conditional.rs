//! Conditional engine state
//!
//! One frame per open `if` block. The original console shared a single
//! failed/closing pair across all nesting depths, which let nested blocks
//! corrupt each other; here each depth carries its own pair and `endif`
//! simply pops. An `if` encountered while the gate is closed pushes a
//! born-closed frame so its `elif`/`else`/`endif` pair up without executing.

#[derive(Debug, Clone, Copy, Default)]
struct Frame {
    /// The branch probe failed; `elif`/`else` may still take this block
    failed: bool,
    /// Lines in the current branch are being skipped
    closing: bool,
}

/// Stack of open conditional blocks
#[derive(Debug, Default)]
pub struct ConditionalStack {
    frames: Vec<Frame>,
}

impl ConditionalStack {
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn in_block(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Whether ordinary commands at the current depth should be dispatched
    pub fn gate_open(&self) -> bool {
        self.frames.last().map_or(true, |f| !f.closing)
    }

    /// Open a block whose probe is about to run
    pub fn push_open(&mut self) {
        self.frames.push(Frame::default());
    }

    /// Open a block inside a skipped branch; nothing in it may execute,
    /// including its `elif`/`else` branches
    pub fn push_skipped(&mut self) {
        self.frames.push(Frame {
            failed: false,
            closing: true,
        });
    }

    /// Record a probe outcome on the innermost block
    pub fn set_branch(&mut self, probe_failed: bool) {
        if let Some(top) = self.frames.last_mut() {
            top.closing = probe_failed;
            top.failed = probe_failed;
        }
    }

    /// Whether the innermost block is still looking for a branch to take
    pub fn top_failed(&self) -> bool {
        self.frames.last().is_some_and(|f| f.failed)
    }

    /// Skip the rest of the innermost block (a prior branch already ran)
    pub fn skip_branch(&mut self) {
        if let Some(top) = self.frames.last_mut() {
            top.closing = true;
        }
    }

    /// `elif`/`else`/`endif` reach the engine unconditionally; clear the
    /// skip flag before the control command decides what happens next
    pub fn clear_closing(&mut self) {
        if let Some(top) = self.frames.last_mut() {
            top.closing = false;
        }
    }

    /// Close the innermost block; no-op when no block is open
    pub fn pop(&mut self) {
        self.frames.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_open_outside_any_block() {
        let stack = ConditionalStack::default();
        assert!(stack.gate_open());
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_failed_probe_closes_branch() {
        let mut stack = ConditionalStack::default();
        stack.push_open();
        stack.set_branch(true);
        assert!(!stack.gate_open());
        assert!(stack.top_failed());
    }

    #[test]
    fn test_successful_probe_keeps_gate_open() {
        let mut stack = ConditionalStack::default();
        stack.push_open();
        stack.set_branch(false);
        assert!(stack.gate_open());
        assert!(!stack.top_failed());
    }

    #[test]
    fn test_elif_after_taken_branch_skips() {
        let mut stack = ConditionalStack::default();
        stack.push_open();
        stack.set_branch(false);
        // elif: branch already taken, so the rest of the block closes
        stack.clear_closing();
        assert!(!stack.top_failed());
        stack.skip_branch();
        assert!(!stack.gate_open());
    }

    #[test]
    fn test_endif_restores_outer_state() {
        let mut stack = ConditionalStack::default();
        stack.push_open();
        stack.set_branch(false);
        stack.push_open();
        stack.set_branch(true);
        assert!(!stack.gate_open());
        stack.pop();
        assert!(stack.gate_open());
        stack.pop();
        assert!(stack.gate_open());
    }

    #[test]
    fn test_skipped_nested_block_stays_closed() {
        let mut stack = ConditionalStack::default();
        stack.push_open();
        stack.set_branch(true); // outer probe failed, branch skipped
        stack.push_skipped(); // nested if inside the skipped branch

        // elif inside the skipped nested block: failed=false, so it closes again
        stack.clear_closing();
        assert!(!stack.top_failed());
        stack.skip_branch();
        assert!(!stack.gate_open());

        stack.pop();
        // Back in the outer block, which is still skipping but waiting for elif/else.
        assert!(stack.top_failed());
        assert!(!stack.gate_open());
    }

    #[test]
    fn test_pop_on_empty_stack_is_noop() {
        let mut stack = ConditionalStack::default();
        stack.pop();
        assert_eq!(stack.depth(), 0);
    }
}
