//! Evaluator state and lifecycle
//!
//! [`Interpreter`] owns the call stack and the heap for one run and carries
//! the function-role table built during initialization: every function
//! declaration is tagged exactly once (entry point, one of the four
//! intrinsics, or ordinary user function) and the tagging is immutable for
//! the rest of the run.
//!
//! The semantic methods are spread over sibling modules, all as
//! `impl Interpreter` blocks: [`walker`](super::walker) drives traversal,
//! [`expressions`](super::expressions) computes expression values, and
//! [`calls`](super::calls) implements the call protocol and the intrinsics.

use crate::ast::{DeclId, Expr, ExprKind, FuncId, Program, VarDecl};
use crate::interpreter::console::Console;
use crate::interpreter::constants::{
    ALLOC_NAME, ENTRY_NAME, FREE_NAME, INPUT_NAME, OUTPUT_NAME, SENTINEL,
};
use crate::interpreter::errors::{Diagnostic, EvalError};
use crate::memory::heap::Heap;
use crate::memory::stack::{CallStack, StackFrame};
use crate::memory::value::Value;

/// Role a function declaration was tagged with at initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FnRole {
    Entry,
    Input,
    Output,
    Alloc,
    Free,
    User,
}

/// The evaluator: call stack, heap, role table, and the active console
pub struct Interpreter<'p, 'c> {
    program: &'p Program,
    stack: CallStack,
    heap: Heap,
    roles: Vec<FnRole>,
    entry: Option<FuncId>,
    console: &'c mut dyn Console,
}

impl<'p, 'c> Interpreter<'p, 'c> {
    /// Initialize the evaluator: tag every function's role by name and
    /// evaluate the top-level declarations into the global frame.
    pub fn new(program: &'p Program, console: &'c mut dyn Console) -> Result<Self, EvalError> {
        let mut entry = None;
        let roles = program
            .functions
            .iter()
            .enumerate()
            .map(|(id, f)| match f.name.as_str() {
                ENTRY_NAME => {
                    entry = Some(id);
                    FnRole::Entry
                }
                INPUT_NAME => FnRole::Input,
                OUTPUT_NAME => FnRole::Output,
                ALLOC_NAME => FnRole::Alloc,
                FREE_NAME => FnRole::Free,
                _ => FnRole::User,
            })
            .collect();

        let mut interp = Interpreter {
            program,
            stack: CallStack::new(),
            heap: Heap::new(),
            roles,
            entry,
            console,
        };

        // Global variables live in the permanent frame 0; outside any call
        // the current frame *is* the global frame.
        for decl in &program.globals {
            interp.exec_decl(decl)?;
        }
        Ok(interp)
    }

    /// Execute the entry point to completion and yield its return value
    pub fn run(&mut self) -> Result<i64, EvalError> {
        let entry = self.entry.ok_or(EvalError::NoEntryPoint)?;
        let program = self.program;
        let func = program
            .functions
            .get(entry)
            .ok_or(EvalError::UnknownFunction(entry))?;
        tracing::trace!(name = %func.name, "entering entry point");

        self.stack.push(StackFrame::new());
        if let Some(body) = &func.body {
            let _ = self.visit_block(body)?;
        }
        let frame = self.stack.pop()?;
        self.release_frame(&frame);
        tracing::trace!(ret = frame.return_value().as_word(), "entry point finished");
        Ok(frame.return_value().as_word())
    }

    /// Report a recoverable diagnostic and hand back the sentinel the
    /// surrounding computation continues with
    pub(crate) fn diag(&mut self, diagnostic: Diagnostic) -> Value {
        tracing::warn!(%diagnostic, "recoverable runtime error");
        self.console.report(diagnostic);
        Value::Int(SENTINEL)
    }

    pub(crate) fn stack(&self) -> &CallStack {
        &self.stack
    }

    pub(crate) fn stack_mut(&mut self) -> &mut CallStack {
        &mut self.stack
    }

    pub(crate) fn heap(&self) -> &Heap {
        &self.heap
    }

    pub(crate) fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    pub(crate) fn console_mut(&mut self) -> &mut dyn Console {
        &mut *self.console
    }

    pub(crate) fn program(&self) -> &'p Program {
        self.program
    }

    pub(crate) fn role_of(&self, func: FuncId) -> Result<FnRole, EvalError> {
        self.roles
            .get(func)
            .copied()
            .ok_or(EvalError::UnknownFunction(func))
    }

    /// Value of an already-visited expression. Literals are recomputed
    /// directly (never memoized); coercion wrappers delegate to their child;
    /// everything else comes out of the current frame's memo.
    pub(crate) fn value_of(&self, expr: &Expr) -> Result<Value, EvalError> {
        match &expr.kind {
            ExprKind::IntLiteral(n) => Ok(Value::Int(*n)),
            ExprKind::CharLiteral(c) => Ok(Value::Int(*c as i64)),
            ExprKind::Cast(inner) => self.value_of(inner),
            _ => self.stack.current().memo_of(expr.id),
        }
    }

    /// Execute one variable declaration in the current frame: 0 if
    /// uninitialized, the evaluated initializer otherwise; arrays become
    /// zero-filled heap blocks owned by the frame.
    pub(crate) fn exec_decl(&mut self, decl: &VarDecl) -> Result<(), EvalError> {
        let value = match decl.array_len {
            Some(len) => {
                let base = self.heap.allocate(len);
                self.stack.current_mut().own_array(base);
                Value::Ptr(base)
            }
            None => match &decl.init {
                Some(init) => {
                    self.visit_expr(init)?;
                    self.value_of(init)?
                }
                None => Value::Int(0),
            },
        };
        self.stack.current_mut().bind(decl.id, value);
        Ok(())
    }

    /// Execute a `return`: store the value (if any) and mark the frame
    pub(crate) fn exec_return(&mut self, expr: Option<&Expr>) -> Result<(), EvalError> {
        if let Some(expr) = expr {
            self.visit_expr(expr)?;
            let value = self.value_of(expr)?;
            self.stack.current_mut().set_return(value);
        }
        self.stack.current_mut().mark_returned();
        Ok(())
    }

    /// Release the heap blocks backing a popped frame's local arrays
    pub(crate) fn release_frame(&mut self, frame: &StackFrame) {
        for &base in frame.owned_arrays() {
            // Already gone if the program freed it explicitly
            let _ = self.heap.free(base);
        }
    }

    /// Declaration behind a subscript base: a variable reference, possibly
    /// wrapped in coercion casts or parentheses
    pub(crate) fn array_base_decl(expr: &Expr) -> Option<DeclId> {
        match &expr.kind {
            ExprKind::VarRef(decl) => Some(*decl),
            ExprKind::Cast(inner) | ExprKind::Paren(inner) => Self::array_base_decl(inner),
            _ => None,
        }
    }
}
