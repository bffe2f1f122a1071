//! Runtime error types for the evaluator
//!
//! Errors fall into two layers with different propagation rules:
//!
//! - [`EvalError`]: contract violations between the front end, the walker,
//!   and the engine (unbound variables, out-of-order evaluation, stack
//!   underflow). These are bugs, not user-program misbehavior, and abort the
//!   run via `Result` propagation.
//! - [`Diagnostic`]: dynamic misbehavior of the evaluated program (bad
//!   memory accesses, invalid frees, division by zero). These are reported
//!   through the active [`Console`](crate::interpreter::console::Console)
//!   and replaced by a sentinel value so the surrounding computation keeps
//!   going. The evaluator is a best-effort tool, not a safety monitor.

use crate::ast::{DeclId, FuncId, NodeId};
use crate::memory::value::Address;
use thiserror::Error;

/// Fatal errors that abort the run
#[derive(Debug, Error)]
pub enum EvalError {
    /// Reference to a declaration absent from both the current and the
    /// global frame; the front end handed over an unresolved tree.
    #[error("unbound variable (declaration {0})")]
    UnboundVariable(DeclId),

    /// An expression's value was requested before its node was visited,
    /// which means the walker and the engine disagree on traversal order.
    #[error("expression node {0} consumed before it was evaluated")]
    UnevaluatedNode(NodeId),

    /// A frame was popped that was never pushed
    #[error("call stack underflow")]
    StackUnderflow,

    /// The program has no entry-point function
    #[error("no entry point found")]
    NoEntryPoint,

    /// A call expression names a function the program does not contain
    #[error("call to unknown function {0}")]
    UnknownFunction(FuncId),

    /// An intrinsic was called without its required argument
    #[error("intrinsic '{0}' called without an argument")]
    IntrinsicArity(&'static str),

    /// The input intrinsic could not read an integer
    #[error("failed to read integer input: {0}")]
    Input(String),
}

/// Recoverable conditions raised by the evaluated program
///
/// Each of these is reported once and answered with a sentinel (reads yield
/// -1, writes are skipped, division by zero yields 0) so execution continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// Heap read or write outside any live block
    #[error("invalid memory access at {addr:#x}")]
    InvalidMemoryAccess { addr: Address },

    /// Free of an address not inside any live block
    #[error("invalid free of {addr:#x}")]
    InvalidFree { addr: Address },

    #[error("division by zero")]
    DivisionByZero,

    /// Arithmetic that makes no sense on pointer operands
    /// (pointer + pointer, pointer in `*` or `/`, negating a pointer)
    #[error("invalid pointer arithmetic: {0}")]
    InvalidPointerArithmetic(&'static str),

    /// The base of a subscript is not a variable reference
    #[error("array target is not a variable reference")]
    InvalidArrayTarget,

    /// Assignment into an expression shape the evaluator does not support
    #[error("unsupported assignment target")]
    UnsupportedAssignmentTarget,
}
