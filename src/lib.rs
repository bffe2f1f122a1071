//! # Introduction
//!
//! `cwalk` is a tree-walking evaluator for a restricted C subset: integers,
//! characters, pointers, fixed-size arrays, functions, conditionals, loops,
//! and four built-in intrinsics (`GET` integer input, `PRINT` integer
//! output, `MALLOC` heap allocation, `FREE` heap deallocation). It consumes
//! an already-built AST from an external front end and executes it directly;
//! no intermediate code is emitted.
//!
//! ## Execution pipeline
//!
//! ```text
//! front-end AST → Interpreter (walker + engine) → console output
//! ```
//!
//! 1. [`ast`]: the input contract, kind-tagged nodes with resolved type
//!    classifications and stable identities.
//! 2. [`interpreter`]: walks the AST. The engine owns the call stack and
//!    heap, memoizes each expression's value in the current frame, and
//!    dispatches the intrinsics through a [`Console`].
//! 3. [`memory`]: the memory model. Tagged word-sized [`Value`]s, the
//!    two-tier [`memory::stack::CallStack`], and the validity-checked
//!    [`memory::heap::Heap`] that backs both `MALLOC` blocks and local
//!    arrays.
//!
//! Dynamic misbehavior of the evaluated program (bad pointers, invalid
//! frees, division by zero) is reported through the console and answered
//! with a sentinel so the run continues; contract violations between front
//! end and evaluator are fatal [`EvalError`]s.
//!
//! ## Example
//!
//! ```
//! use cwalk::ast::{BinOp, Expr, Function, Program, Stmt, TypeClass, VarDecl};
//! use cwalk::{Interpreter, MockConsole};
//!
//! // int main() { int a = 3; int b = 4; PRINT(a + b); return 0; }
//! let mut program = Program::new();
//! let print = program.add_function(Function::extern_decl(
//!     "PRINT",
//!     vec![VarDecl::new("v", TypeClass::Int)],
//! ));
//! let a = VarDecl::new("a", TypeClass::Int).with_init(Expr::int(3));
//! let b = VarDecl::new("b", TypeClass::Int).with_init(Expr::int(4));
//! let sum = Expr::binary(BinOp::Add, Expr::var(&a), Expr::var(&b));
//! program.add_function(Function::new(
//!     "main",
//!     vec![],
//!     vec![
//!         Stmt::Decl(vec![a.clone()]),
//!         Stmt::Decl(vec![b.clone()]),
//!         Stmt::Expr(Expr::call(print, vec![sum])),
//!         Stmt::Return(Some(Expr::int(0))),
//!     ],
//! ));
//!
//! let mut console = MockConsole::new();
//! Interpreter::new(&program, &mut console).unwrap().run().unwrap();
//! assert_eq!(console.output(), ["7"]);
//! ```

pub mod ast;
pub mod interpreter;
pub mod memory;

pub use interpreter::console::{Console, MockConsole, StdConsole};
pub use interpreter::engine::Interpreter;
pub use interpreter::errors::{Diagnostic, EvalError};
pub use memory::value::Value;
