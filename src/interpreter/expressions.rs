//! Expression semantics
//!
//! `impl Interpreter` methods that compute one expression node's value from
//! its already-visited children and memoize it in the current frame. The
//! walker guarantees child-before-parent order; these methods read children
//! through [`Interpreter::value_of`] and never traverse.
//!
//! Arithmetic dispatches on the value tag pair: integer-only operations
//! use plain word arithmetic, additive operations with exactly one pointer
//! operand scale the integer side by the word size, and tag combinations
//! that make no sense (pointer + pointer, pointers in `*` or `/`) are
//! reported and answered with the sentinel.

use crate::ast::{BinOp, DeclId, Expr, UnOp};
use crate::interpreter::constants::WORD_SIZE;
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::{Diagnostic, EvalError};
use crate::memory::value::Value;

impl Interpreter<'_, '_> {
    /// Two-tier variable reference, memoized on the reference node
    pub(crate) fn eval_var_ref(&mut self, expr: &Expr, decl: DeclId) -> Result<(), EvalError> {
        let value = self.stack().lookup(decl)?;
        self.stack_mut().current_mut().memo(expr.id, value);
        Ok(())
    }

    /// A parenthesized expression equals its inner expression, memoized on
    /// the outer node
    pub(crate) fn eval_paren(&mut self, expr: &Expr, inner: &Expr) -> Result<(), EvalError> {
        let value = self.value_of(inner)?;
        self.stack_mut().current_mut().memo(expr.id, value);
        Ok(())
    }

    /// `sizeof` always yields the machine word size: the evaluator has only
    /// one word-sized representation regardless of the operand type.
    pub(crate) fn eval_sizeof(&mut self, expr: &Expr) -> Result<(), EvalError> {
        self.stack_mut()
            .current_mut()
            .memo(expr.id, Value::Int(WORD_SIZE as i64));
        Ok(())
    }

    pub(crate) fn eval_unary(
        &mut self,
        expr: &Expr,
        op: UnOp,
        operand: &Expr,
    ) -> Result<(), EvalError> {
        let operand = self.value_of(operand)?;
        let value = match op {
            UnOp::Plus => operand,
            UnOp::Minus => match operand {
                Value::Int(n) => Value::Int(n.wrapping_neg()),
                Value::Ptr(_) => self.diag(Diagnostic::InvalidPointerArithmetic(
                    "negation of a pointer",
                )),
            },
            UnOp::Deref => match self.heap().read(operand.as_addr()) {
                Ok(v) => v,
                Err(d) => self.diag(d),
            },
        };
        self.stack_mut().current_mut().memo(expr.id, value);
        Ok(())
    }

    /// Additive, multiplicative, and comparison operators (assignment is
    /// [`Interpreter::eval_assign`]). Both operands were visited right
    /// before left by the walker.
    pub(crate) fn eval_binary(
        &mut self,
        expr: &Expr,
        op: BinOp,
        lhs: &Expr,
        rhs: &Expr,
    ) -> Result<(), EvalError> {
        let rv = self.value_of(rhs)?;
        let lv = self.value_of(lhs)?;
        let value = match op {
            BinOp::Add | BinOp::Sub => self.additive(op, lv, rv),
            BinOp::Mul | BinOp::Div => self.multiplicative(op, lv, rv),
            BinOp::Gt => Value::Int((lv.as_word() > rv.as_word()) as i64),
            BinOp::Lt => Value::Int((lv.as_word() < rv.as_word()) as i64),
            BinOp::Ge => Value::Int((lv.as_word() >= rv.as_word()) as i64),
            BinOp::Le => Value::Int((lv.as_word() <= rv.as_word()) as i64),
            BinOp::Eq => Value::Int((lv.as_word() == rv.as_word()) as i64),
            BinOp::Ne => Value::Int((lv.as_word() != rv.as_word()) as i64),
            BinOp::Assign => return Err(EvalError::UnevaluatedNode(expr.id)),
        };
        self.stack_mut().current_mut().memo(expr.id, value);
        Ok(())
    }

    /// `+`/`-` with pointer scaling: the integer side of a pointer/integer
    /// pair is scaled by the word size so `p + 1` moves one element.
    fn additive(&mut self, op: BinOp, lv: Value, rv: Value) -> Value {
        let word = WORD_SIZE as i64;
        match (op, lv, rv) {
            (BinOp::Add, Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_add(b)),
            (BinOp::Sub, Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_sub(b)),
            (BinOp::Add, Value::Ptr(p), Value::Int(k)) | (BinOp::Add, Value::Int(k), Value::Ptr(p)) => {
                Value::Ptr(p.wrapping_add_signed(k.wrapping_mul(word)))
            }
            (BinOp::Sub, Value::Ptr(p), Value::Int(k)) => {
                Value::Ptr(p.wrapping_sub(k.wrapping_mul(word) as u64))
            }
            (BinOp::Sub, Value::Int(k), Value::Ptr(p)) => {
                Value::Int(k.wrapping_mul(word).wrapping_sub(p as i64))
            }
            // Raw address difference; the subset has no use for a scaled one
            (BinOp::Sub, Value::Ptr(a), Value::Ptr(b)) => {
                Value::Int((a as i64).wrapping_sub(b as i64))
            }
            (_, Value::Ptr(_), Value::Ptr(_)) => {
                self.diag(Diagnostic::InvalidPointerArithmetic("pointer + pointer"))
            }
            // All tag pairs of Add/Sub are covered above
            _ => self.diag(Diagnostic::InvalidPointerArithmetic("unscalable operands")),
        }
    }

    fn multiplicative(&mut self, op: BinOp, lv: Value, rv: Value) -> Value {
        let (Value::Int(a), Value::Int(b)) = (lv, rv) else {
            return self.diag(Diagnostic::InvalidPointerArithmetic(
                "pointer in multiplicative operator",
            ));
        };
        match op {
            BinOp::Mul => Value::Int(a.wrapping_mul(b)),
            _ => {
                if b == 0 {
                    self.diag(Diagnostic::DivisionByZero);
                    Value::Int(0)
                } else {
                    Value::Int(a.wrapping_div(b))
                }
            }
        }
    }

    /// Assignment. The walker evaluated the right-hand side (and the index
    /// or address subexpression of the target) already; this dispatches on
    /// the left-hand side's shape.
    pub(crate) fn eval_assign(
        &mut self,
        expr: &Expr,
        lhs: &Expr,
        rhs: &Expr,
    ) -> Result<(), EvalError> {
        use crate::ast::ExprKind;

        let value = self.value_of(rhs)?;
        let result = match &lhs.kind {
            ExprKind::VarRef(decl) => {
                self.stack_mut().bind_owning(*decl, value)?;
                self.stack_mut().current_mut().memo(lhs.id, value);
                value
            }
            ExprKind::Subscript { array, index } => {
                let index = self.value_of(index)?;
                match self.element_addr(array, index)? {
                    Some(addr) => {
                        if let Err(d) = self.heap_mut().write(addr, value) {
                            self.diag(d);
                        }
                    }
                    None => {
                        self.diag(Diagnostic::InvalidArrayTarget);
                    }
                }
                value
            }
            ExprKind::Unary {
                op: UnOp::Deref,
                operand,
            } => {
                let addr = self.value_of(operand)?.as_addr();
                if let Err(d) = self.heap_mut().write(addr, value) {
                    self.diag(d);
                }
                value
            }
            _ => self.diag(Diagnostic::UnsupportedAssignmentTarget),
        };
        self.stack_mut().current_mut().memo(expr.id, result);
        Ok(())
    }

    /// Array subscript in read context
    pub(crate) fn eval_subscript(
        &mut self,
        expr: &Expr,
        array: &Expr,
        index: &Expr,
    ) -> Result<(), EvalError> {
        let index = self.value_of(index)?;
        let value = match self.element_addr(array, index)? {
            Some(addr) => match self.heap().read(addr) {
                Ok(v) => v,
                Err(d) => self.diag(d),
            },
            None => self.diag(Diagnostic::InvalidArrayTarget),
        };
        self.stack_mut().current_mut().memo(expr.id, value);
        Ok(())
    }

    /// Address of `base[index]`. `None` means the base is not a variable
    /// reference (reported as [`Diagnostic::InvalidArrayTarget`] by the
    /// caller); an unbound base declaration is a fatal contract violation.
    fn element_addr(&self, array: &Expr, index: Value) -> Result<Option<u64>, EvalError> {
        let Some(decl) = Self::array_base_decl(array) else {
            return Ok(None);
        };
        let base = self.stack().lookup(decl)?.as_addr();
        Ok(Some(
            base.wrapping_add_signed(index.as_word().wrapping_mul(WORD_SIZE as i64)),
        ))
    }
}
