//! Call stack and activation records
//!
//! A [`StackFrame`] is one function activation: its variable bindings, the
//! memo of already-evaluated expression nodes, the return-value slot, and
//! the heap blocks backing its local arrays. The [`CallStack`] keeps the
//! permanent global frame apart from the transient activations pushed on
//! call and popped on return, so the current frame always exists and frame
//! lookups are the two-tier policy of the source language: current frame
//! first, global frame as the fallback. There is no nested block scope and
//! no closure capture.

use super::value::{Address, Value};
use crate::ast::{DeclId, NodeId};
use crate::interpreter::errors::EvalError;
use rustc_hash::FxHashMap;

/// One function activation record
#[derive(Debug, Clone, Default)]
pub struct StackFrame {
    vars: FxHashMap<DeclId, Value>,
    node_values: FxHashMap<NodeId, Value>,
    return_value: Value,
    returned: bool,
    /// Heap blocks owned by this frame's array declarations, released when
    /// the frame is popped
    arrays: Vec<Address>,
}

impl StackFrame {
    pub fn new() -> Self {
        StackFrame::default()
    }

    /// Bind (or rebind) a declared variable in this frame
    pub fn bind(&mut self, decl: DeclId, value: Value) {
        self.vars.insert(decl, value);
    }

    pub fn has_decl(&self, decl: DeclId) -> bool {
        self.vars.contains_key(&decl)
    }

    pub fn value_of(&self, decl: DeclId) -> Option<Value> {
        self.vars.get(&decl).copied()
    }

    /// Record the value of an evaluated expression node, to be consumed by
    /// its parent
    pub fn memo(&mut self, node: NodeId, value: Value) {
        self.node_values.insert(node, value);
    }

    /// Value memoized for `node`; absence means the walker asked for a
    /// result before visiting the node, which is a traversal-order bug.
    pub fn memo_of(&self, node: NodeId) -> Result<Value, EvalError> {
        self.node_values
            .get(&node)
            .copied()
            .ok_or(EvalError::UnevaluatedNode(node))
    }

    pub fn set_return(&mut self, value: Value) {
        self.return_value = value;
    }

    /// Return value stored by the function, `Int(0)` if no `return` ran
    pub fn return_value(&self) -> Value {
        self.return_value
    }

    pub fn mark_returned(&mut self) {
        self.returned = true;
    }

    pub fn has_returned(&self) -> bool {
        self.returned
    }

    /// Register a heap block backing a local array declaration
    pub fn own_array(&mut self, base: Address) {
        self.arrays.push(base);
    }

    pub fn owned_arrays(&self) -> &[Address] {
        &self.arrays
    }
}

/// The call stack: a permanent global frame plus transient activations
#[derive(Debug, Clone, Default)]
pub struct CallStack {
    global: StackFrame,
    frames: Vec<StackFrame>,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack::default()
    }

    pub fn push(&mut self, frame: StackFrame) {
        self.frames.push(frame);
    }

    /// Pop the current activation. The global frame is never popped; popping
    /// with no activation on the stack is a protocol bug.
    pub fn pop(&mut self) -> Result<StackFrame, EvalError> {
        self.frames.pop().ok_or(EvalError::StackUnderflow)
    }

    /// The currently executing frame: the newest activation, or the global
    /// frame outside any call
    pub fn current(&self) -> &StackFrame {
        self.frames.last().unwrap_or(&self.global)
    }

    pub fn current_mut(&mut self) -> &mut StackFrame {
        self.frames.last_mut().unwrap_or(&mut self.global)
    }

    pub fn global(&self) -> &StackFrame {
        &self.global
    }

    pub fn global_mut(&mut self) -> &mut StackFrame {
        &mut self.global
    }

    /// Number of frames including the global one
    pub fn depth(&self) -> usize {
        self.frames.len() + 1
    }

    /// Two-tier variable resolution: current frame, else global frame
    pub fn lookup(&self, decl: DeclId) -> Result<Value, EvalError> {
        self.current()
            .value_of(decl)
            .or_else(|| self.global.value_of(decl))
            .ok_or(EvalError::UnboundVariable(decl))
    }

    /// Rebind `decl` in whichever tier currently owns it
    pub fn bind_owning(&mut self, decl: DeclId, value: Value) -> Result<(), EvalError> {
        if self.current().has_decl(decl) {
            self.current_mut().bind(decl, value);
            Ok(())
        } else if self.global.has_decl(decl) {
            self.global.bind(decl, value);
            Ok(())
        } else {
            Err(EvalError::UnboundVariable(decl))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_prefers_current_frame() {
        let mut stack = CallStack::new();
        stack.global_mut().bind(7, Value::Int(1));
        let mut frame = StackFrame::new();
        frame.bind(7, Value::Int(2));
        stack.push(frame);
        assert_eq!(stack.lookup(7).unwrap(), Value::Int(2));
        stack.pop().unwrap();
        assert_eq!(stack.lookup(7).unwrap(), Value::Int(1));
    }

    #[test]
    fn lookup_falls_back_to_global() {
        let mut stack = CallStack::new();
        stack.global_mut().bind(3, Value::Int(9));
        stack.push(StackFrame::new());
        assert_eq!(stack.lookup(3).unwrap(), Value::Int(9));
    }

    #[test]
    fn bind_owning_writes_to_the_owning_tier() {
        let mut stack = CallStack::new();
        stack.global_mut().bind(1, Value::Int(0));
        let mut frame = StackFrame::new();
        frame.bind(2, Value::Int(0));
        stack.push(frame);

        stack.bind_owning(1, Value::Int(10)).unwrap();
        stack.bind_owning(2, Value::Int(20)).unwrap();
        assert_eq!(stack.global().value_of(1), Some(Value::Int(10)));
        assert_eq!(stack.current().value_of(2), Some(Value::Int(20)));
    }

    #[test]
    fn unbound_lookup_is_fatal() {
        let stack = CallStack::new();
        assert!(matches!(
            stack.lookup(99),
            Err(EvalError::UnboundVariable(99))
        ));
    }

    #[test]
    fn popping_below_the_global_frame_underflows() {
        let mut stack = CallStack::new();
        assert!(matches!(stack.pop(), Err(EvalError::StackUnderflow)));
    }

    #[test]
    fn memo_of_unvisited_node_is_an_ordering_bug() {
        let frame = StackFrame::new();
        assert!(matches!(
            frame.memo_of(5),
            Err(EvalError::UnevaluatedNode(5))
        ));
    }

    #[test]
    fn return_value_defaults_to_zero() {
        let frame = StackFrame::new();
        assert_eq!(frame.return_value(), Value::Int(0));
        assert!(!frame.has_returned());
    }
}
