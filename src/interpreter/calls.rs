//! Call protocol and intrinsic dispatch
//!
//! A call expression is either one of the four intrinsics (input, output,
//! allocate, free, recognized by the role tag assigned at initialization)
//! or a user function. User calls evaluate every argument in the caller's
//! frame, left to right by parameter position, build a fresh frame binding
//! each parameter declaration, push it, walk the body, and pop. The popped
//! frame's return value (0 if no `return` ran) becomes the call node's memo
//! in the caller, unless the callee is marked no-return.

use crate::ast::{Expr, FuncId};
use crate::interpreter::constants::{ALLOC_NAME, FREE_NAME, OUTPUT_NAME};
use crate::interpreter::engine::{FnRole, Interpreter};
use crate::interpreter::errors::EvalError;
use crate::memory::stack::StackFrame;
use crate::memory::value::Value;

impl Interpreter<'_, '_> {
    pub(crate) fn visit_call(
        &mut self,
        expr: &Expr,
        callee: FuncId,
        args: &[Expr],
    ) -> Result<(), EvalError> {
        // Arguments are evaluated in the caller's frame, left to right
        for arg in args {
            self.visit_expr(arg)?;
        }

        match self.role_of(callee)? {
            FnRole::Input => {
                let value = self.console_mut().read_int()?;
                self.stack_mut()
                    .current_mut()
                    .memo(expr.id, Value::Int(value));
            }

            FnRole::Output => {
                let arg = args.first().ok_or(EvalError::IntrinsicArity(OUTPUT_NAME))?;
                let value = self.value_of(arg)?;
                self.console_mut().print_int(value.as_word());
                // The call's result is unspecified and never consumed
            }

            FnRole::Alloc => {
                let arg = args.first().ok_or(EvalError::IntrinsicArity(ALLOC_NAME))?;
                let words = self.value_of(arg)?.as_word().max(0) as usize;
                let base = self.heap_mut().allocate(words);
                self.stack_mut()
                    .current_mut()
                    .memo(expr.id, Value::Ptr(base));
            }

            FnRole::Free => {
                let arg = args.first().ok_or(EvalError::IntrinsicArity(FREE_NAME))?;
                let addr = self.value_of(arg)?.as_addr();
                if let Err(d) = self.heap_mut().free(addr) {
                    self.diag(d);
                }
            }

            FnRole::Entry | FnRole::User => self.call_user(expr, callee, args)?,
        }
        Ok(())
    }

    fn call_user(&mut self, expr: &Expr, callee: FuncId, args: &[Expr]) -> Result<(), EvalError> {
        let program = self.program();
        let func = program
            .functions
            .get(callee)
            .ok_or(EvalError::UnknownFunction(callee))?;
        tracing::trace!(name = %func.name, depth = self.stack().depth(), "call");

        // Argument values come out of the caller's frame before the push
        let mut frame = StackFrame::new();
        for (param, arg) in func.params.iter().zip(args) {
            frame.bind(param.id, self.value_of(arg)?);
        }
        self.stack_mut().push(frame);

        if let Some(body) = &func.body {
            // A `return` in the body ends here; it never unwinds the caller
            let _ = self.visit_block(body)?;
        }

        let frame = self.stack_mut().pop()?;
        self.release_frame(&frame);
        if !func.no_return {
            self.stack_mut()
                .current_mut()
                .memo(expr.id, frame.return_value());
        }
        tracing::trace!(name = %func.name, ret = frame.return_value().as_word(), "return");
        Ok(())
    }
}
