//! AST walker
//!
//! Traversal methods on [`Interpreter`]: expression nodes are visited
//! post-order (children first, then the semantic method that memoizes the
//! node's value), statements and control flow decide which subtrees to walk
//! at all.
//!
//! Early return is a control signal, not a mutable flag: every statement
//! visit yields a [`Flow`], and blocks, loops, and conditionals stop as soon
//! as a visit reports [`Flow::Returned`]. The signal dies at the call
//! boundary: a `return` unwinds the callee's remaining statements, never
//! the caller's.
//!
//! Evaluation order is fixed for determinism and must stay as it is:
//! the right-hand side before the left for assignment, the right operand
//! before the left for the other binary operators, arguments left to right,
//! and for loops condition, then body, then step.

use crate::ast::{BinOp, Expr, ExprKind, Stmt, UnOp};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::EvalError;
use crate::memory::value::Value;

/// How a statement visit ended
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Execution continues with the next statement
    Continue,
    /// A `return` executed; the rest of the current function is skipped
    Returned,
}

impl Interpreter<'_, '_> {
    /// Visit statements in order, stopping at the first `return`
    pub(crate) fn visit_block(&mut self, stmts: &[Stmt]) -> Result<Flow, EvalError> {
        for stmt in stmts {
            if self.visit_stmt(stmt)? == Flow::Returned {
                return Ok(Flow::Returned);
            }
        }
        Ok(Flow::Continue)
    }

    pub(crate) fn visit_stmt(&mut self, stmt: &Stmt) -> Result<Flow, EvalError> {
        match stmt {
            Stmt::Decl(decls) => {
                for decl in decls {
                    self.exec_decl(decl)?;
                }
                Ok(Flow::Continue)
            }

            Stmt::Expr(expr) => {
                self.visit_expr(expr)?;
                Ok(Flow::Continue)
            }

            Stmt::Block(stmts) => self.visit_block(stmts),

            Stmt::If { cond, then, els } => {
                if self.eval_cond(cond)?.is_one() {
                    self.visit_block(then)
                } else if let Some(els) = els {
                    self.visit_block(els)
                } else {
                    Ok(Flow::Continue)
                }
            }

            Stmt::While { cond, body } => {
                while self.eval_cond(cond)?.is_one() {
                    if self.visit_block(body)? == Flow::Returned {
                        return Ok(Flow::Returned);
                    }
                }
                Ok(Flow::Continue)
            }

            Stmt::For {
                init,
                cond,
                step,
                body,
            } => {
                if let Some(init) = init {
                    if self.visit_stmt(init)? == Flow::Returned {
                        return Ok(Flow::Returned);
                    }
                }
                loop {
                    if let Some(cond) = cond {
                        if !self.eval_cond(cond)?.is_one() {
                            return Ok(Flow::Continue);
                        }
                    }
                    // No condition: loop until the body returns
                    if self.visit_block(body)? == Flow::Returned {
                        return Ok(Flow::Returned);
                    }
                    if let Some(step) = step {
                        self.visit_expr(step)?;
                    }
                }
            }

            Stmt::Return(expr) => {
                self.exec_return(expr.as_ref())?;
                Ok(Flow::Returned)
            }
        }
    }

    /// Visit one expression node: children first, semantic method last
    pub(crate) fn visit_expr(&mut self, expr: &Expr) -> Result<(), EvalError> {
        match &expr.kind {
            // Literals are recomputed on demand, never memoized
            ExprKind::IntLiteral(_) | ExprKind::CharLiteral(_) => Ok(()),

            ExprKind::VarRef(decl) => self.eval_var_ref(expr, *decl),

            ExprKind::Paren(inner) => {
                self.visit_expr(inner)?;
                self.eval_paren(expr, inner)
            }

            // Coercion wrappers are transparent; the child's value is the
            // wrapper's value
            ExprKind::Cast(inner) => self.visit_expr(inner),

            ExprKind::Unary { op, operand } => {
                self.visit_expr(operand)?;
                self.eval_unary(expr, *op, operand)
            }

            ExprKind::Binary {
                op: BinOp::Assign,
                lhs,
                rhs,
            } => {
                self.visit_expr(rhs)?;
                self.visit_assign_target(lhs)?;
                self.eval_assign(expr, lhs, rhs)
            }

            ExprKind::Binary { op, lhs, rhs } => {
                self.visit_expr(rhs)?;
                self.visit_expr(lhs)?;
                self.eval_binary(expr, *op, lhs, rhs)
            }

            ExprKind::Subscript { array, index } => {
                self.visit_expr(index)?;
                self.eval_subscript(expr, array, index)
            }

            ExprKind::Call { callee, args } => self.visit_call(expr, *callee, args),

            ExprKind::SizeOf => self.eval_sizeof(expr),
        }
    }

    /// Visit the subexpressions an assignment target needs: the index of a
    /// subscript, the address of a dereference. A plain variable reference
    /// is resolved by the engine, not evaluated; unsupported shapes are
    /// reported there too.
    fn visit_assign_target(&mut self, lhs: &Expr) -> Result<(), EvalError> {
        match &lhs.kind {
            ExprKind::Subscript { index, .. } => self.visit_expr(index),
            ExprKind::Unary {
                op: UnOp::Deref,
                operand,
            } => self.visit_expr(operand),
            _ => Ok(()),
        }
    }

    /// Evaluate a branch/loop condition and hand back its value
    fn eval_cond(&mut self, cond: &Expr) -> Result<Value, EvalError> {
        self.visit_expr(cond)?;
        self.value_of(cond)
    }
}
