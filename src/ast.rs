//! Input AST contract for the evaluator
//!
//! The evaluator does not lex or parse anything itself: an external front end
//! hands it a finished tree built from the types in this module. Every node
//! carries a kind tag, a resolved [`TypeClass`], and a stable identity:
//!
//! - [`NodeId`]: identity of an expression node, the memoization key inside a
//!   stack frame (each expression's value is recorded once per visit and
//!   consumed by its parent);
//! - [`DeclId`]: identity of a variable or parameter declaration, the key for
//!   variable bindings;
//! - [`FuncId`]: index of a function in [`Program::functions`].
//!
//! Identities only need to be stable and unique, so the constructors here
//! allocate them from a process-wide counter. A front end with its own
//! numbering can fill in the fields directly instead.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Unique identifier for expression nodes, used as the per-frame memo key
pub type NodeId = usize;

/// Unique identifier for variable/parameter declarations
pub type DeclId = usize;

/// Index of a function in [`Program::functions`]
pub type FuncId = usize;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

fn fresh_id() -> usize {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Resolved type classification attached to every expression and declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    Int,
    Char,
    Pointer,
    Array,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Plus,
    Minus,
    Deref,
}

/// An expression node: stable identity, type classification, and kind tag
#[derive(Debug, Clone)]
pub struct Expr {
    pub id: NodeId,
    pub ty: TypeClass,
    pub kind: ExprKind,
}

/// Expression kinds understood by the evaluator
#[derive(Debug, Clone)]
pub enum ExprKind {
    IntLiteral(i64),
    CharLiteral(i8),
    VarRef(DeclId),
    Paren(Box<Expr>),
    /// Implicit type-coercion wrapper inserted by the front end; the
    /// evaluator treats it as transparent and delegates to the child.
    Cast(Box<Expr>),
    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Subscript {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        callee: FuncId,
        args: Vec<Expr>,
    },
    SizeOf,
}

/// A variable or parameter declaration
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub id: DeclId,
    pub name: String,
    pub ty: TypeClass,
    /// Element count for array declarations, `None` for scalars
    pub array_len: Option<usize>,
    pub init: Option<Expr>,
}

/// A statement node
#[derive(Debug, Clone)]
pub enum Stmt {
    Decl(Vec<VarDecl>),
    Expr(Expr),
    Block(Vec<Stmt>),
    If {
        cond: Expr,
        then: Vec<Stmt>,
        els: Option<Vec<Stmt>>,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
    },
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        step: Option<Expr>,
        body: Vec<Stmt>,
    },
    Return(Option<Expr>),
}

/// A function definition (or extern declaration, when `body` is `None`)
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub params: Vec<VarDecl>,
    pub body: Option<Vec<Stmt>>,
    /// Functions marked no-return never produce a call result
    pub no_return: bool,
}

/// A whole translation unit: top-level variables plus function definitions
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub globals: Vec<VarDecl>,
    pub functions: Vec<Function>,
}

impl Expr {
    /// Build an expression with a freshly allocated [`NodeId`]
    pub fn new(ty: TypeClass, kind: ExprKind) -> Self {
        Expr {
            id: fresh_id(),
            ty,
            kind,
        }
    }

    pub fn int(n: i64) -> Self {
        Expr::new(TypeClass::Int, ExprKind::IntLiteral(n))
    }

    pub fn ch(c: i8) -> Self {
        Expr::new(TypeClass::Char, ExprKind::CharLiteral(c))
    }

    /// Reference to a declared variable; the type classification is taken
    /// from the declaration.
    pub fn var(decl: &VarDecl) -> Self {
        Expr::new(decl.ty, ExprKind::VarRef(decl.id))
    }

    pub fn paren(inner: Expr) -> Self {
        let ty = inner.ty;
        Expr::new(ty, ExprKind::Paren(Box::new(inner)))
    }

    /// Implicit-coercion wrapper reclassifying `inner` as `ty`
    pub fn cast(ty: TypeClass, inner: Expr) -> Self {
        Expr::new(ty, ExprKind::Cast(Box::new(inner)))
    }

    pub fn unary(op: UnOp, operand: Expr) -> Self {
        let ty = match op {
            // Dereferencing yields the pointee; the subset has no pointer
            // chains deeper than the front end already collapsed, so Int.
            UnOp::Deref => TypeClass::Int,
            _ => operand.ty,
        };
        Expr::new(
            ty,
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
        )
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        let ty = match op {
            BinOp::Assign => lhs.ty,
            BinOp::Add | BinOp::Sub => {
                if lhs.ty == TypeClass::Pointer || rhs.ty == TypeClass::Pointer {
                    TypeClass::Pointer
                } else {
                    TypeClass::Int
                }
            }
            _ => TypeClass::Int,
        };
        Expr::new(
            ty,
            ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
        )
    }

    pub fn subscript(array: Expr, index: Expr) -> Self {
        Expr::new(
            TypeClass::Int,
            ExprKind::Subscript {
                array: Box::new(array),
                index: Box::new(index),
            },
        )
    }

    pub fn call(callee: FuncId, args: Vec<Expr>) -> Self {
        Expr::new(TypeClass::Int, ExprKind::Call { callee, args })
    }

    pub fn sizeof() -> Self {
        Expr::new(TypeClass::Int, ExprKind::SizeOf)
    }

    /// Override the type classification (e.g. a call returning a pointer)
    pub fn with_ty(mut self, ty: TypeClass) -> Self {
        self.ty = ty;
        self
    }
}

impl VarDecl {
    /// Declare a scalar variable with a freshly allocated [`DeclId`]
    pub fn new(name: impl Into<String>, ty: TypeClass) -> Self {
        VarDecl {
            id: fresh_id(),
            name: name.into(),
            ty,
            array_len: None,
            init: None,
        }
    }

    /// Declare a fixed-size array of `len` elements
    pub fn array(name: impl Into<String>, len: usize) -> Self {
        VarDecl {
            id: fresh_id(),
            name: name.into(),
            ty: TypeClass::Array,
            array_len: Some(len),
            init: None,
        }
    }

    pub fn with_init(mut self, init: Expr) -> Self {
        self.init = Some(init);
        self
    }
}

impl Function {
    pub fn new(name: impl Into<String>, params: Vec<VarDecl>, body: Vec<Stmt>) -> Self {
        Function {
            name: name.into(),
            params,
            body: Some(body),
            no_return: false,
        }
    }

    /// Body-less declaration, as the front end produces for the intrinsics
    pub fn extern_decl(name: impl Into<String>, params: Vec<VarDecl>) -> Self {
        Function {
            name: name.into(),
            params,
            body: None,
            no_return: false,
        }
    }
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    /// Append a function and return its [`FuncId`]
    pub fn add_function(&mut self, f: Function) -> FuncId {
        self.functions.push(f);
        self.functions.len() - 1
    }
}
