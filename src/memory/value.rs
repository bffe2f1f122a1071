//! Runtime value representation
//!
//! The legacy evaluator this one replaces kept everything in a single
//! untyped machine word. Here values are tagged instead: a [`Value::Int`]
//! for integers and sign-extended characters, a [`Value::Ptr`] for heap and
//! array addresses. The tag pair is what the arithmetic rules pattern-match
//! on (pointer-plus-integer scales, pointer-times-pointer is rejected),
//! while [`Value::as_word`] and [`Value::as_addr`] keep the word-sized view
//! available where the source language treats addresses as plain integers.

/// Memory address type (64-bit, byte granular)
pub type Address = u64;

/// A runtime value: one machine word, tagged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value {
    /// Integer or sign-extended character
    Int(i64),
    /// Heap or array address
    Ptr(Address),
}

impl Default for Value {
    fn default() -> Self {
        Value::Int(0)
    }
}

impl Value {
    /// Null pointer
    pub const NULL: Value = Value::Ptr(0);

    /// Raw word view, used by comparisons and output
    pub fn as_word(self) -> i64 {
        match self {
            Value::Int(n) => n,
            Value::Ptr(a) => a as i64,
        }
    }

    /// Interpret this value as an address. Integers pass through unchanged:
    /// source programs may carry addresses in integer-typed variables, and 0
    /// is the null pointer either way.
    pub fn as_addr(self) -> Address {
        match self {
            Value::Int(n) => n as Address,
            Value::Ptr(a) => a,
        }
    }

    pub fn is_ptr(self) -> bool {
        matches!(self, Value::Ptr(_))
    }

    /// The truth test used by `if`, `while`, and `for`: exactly 1 selects
    /// the branch or continues the loop.
    pub fn is_one(self) -> bool {
        matches!(self, Value::Int(1))
    }
}
