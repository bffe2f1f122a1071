//! Memory model for the evaluator
//!
//! This module provides the core memory abstractions:
//! - [`value`]: tagged runtime values ([`value::Value::Int`],
//!   [`value::Value::Ptr`]) one machine word wide
//! - [`stack`]: the call stack, with the permanent global frame and one
//!   activation record per live function call
//! - [`heap`]: the heap simulator that backs both `MALLOC`-ed blocks and
//!   local arrays, validating every access
//!
//! # Addresses
//!
//! Addresses are byte granular but storage is word granular: a block of `n`
//! words spans `n * WORD_SIZE` bytes of address space, and an access lands
//! in the word containing its address. Pointer arithmetic scales integer
//! offsets by [`WORD_SIZE`](crate::interpreter::constants::WORD_SIZE), so
//! `p + 1` moves one element forward.

pub mod heap;
pub mod stack;
pub mod value;
