//! Execution engine for the C-subset evaluator
//!
//! This module provides the core execution logic:
//! - [`engine`]: the [`engine::Interpreter`] itself: state, initialization,
//!   lifecycle, declarations and returns
//! - [`walker`]: AST traversal and control flow
//! - [`expressions`]: expression semantics and memoization
//! - [`calls`]: the call protocol and the four intrinsics
//! - [`console`]: the I/O and diagnostics seam
//! - [`errors`]: the fatal/recoverable error split
//!
//! # Execution model
//!
//! The walker drives traversal top-down; at each expression node it visits
//! the children and then asks the engine to compute and memoize the node's
//! value in the current frame. Control statements decide which subtrees to
//! enter. A single [`engine::Interpreter`] exclusively owns the call stack
//! and the heap for the whole run; evaluation is synchronous and
//! single-threaded, and an infinite loop in the evaluated program is an
//! infinite loop in the host.

pub mod calls;
pub mod console;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod expressions;
pub mod walker;
