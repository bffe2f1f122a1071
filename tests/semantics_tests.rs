// Focused tests for the evaluator's operational semantics: evaluation
// order, pointer scaling, scoping tiers, early return, and the
// report-and-continue error policy.

use cwalk::ast::{BinOp, Expr, Function, Program, Stmt, TypeClass, UnOp, VarDecl};
use cwalk::{Diagnostic, Interpreter, MockConsole};

struct Fixture {
    program: Program,
    print: usize,
    malloc: usize,
    free: usize,
}

fn fixture() -> Fixture {
    let mut program = Program::new();
    program.add_function(Function::extern_decl("GET", vec![]));
    let print = program.add_function(Function::extern_decl(
        "PRINT",
        vec![VarDecl::new("v", TypeClass::Int)],
    ));
    let malloc = program.add_function(Function::extern_decl(
        "MALLOC",
        vec![VarDecl::new("size", TypeClass::Int)],
    ));
    let free = program.add_function(Function::extern_decl(
        "FREE",
        vec![VarDecl::new("ptr", TypeClass::Pointer)],
    ));
    Fixture {
        program,
        print,
        malloc,
        free,
    }
}

fn run(program: &Program, console: &mut MockConsole) -> i64 {
    let mut interp = Interpreter::new(program, console).expect("initialization failed");
    interp.run().expect("execution failed")
}

fn main_with(fx: &mut Fixture, body: Vec<Stmt>) {
    fx.program.add_function(Function::new("main", vec![], body));
}

fn print_expr(fx: &Fixture, e: Expr) -> Stmt {
    Stmt::Expr(Expr::call(fx.print, vec![e]))
}

fn assign(lhs: Expr, rhs: Expr) -> Stmt {
    Stmt::Expr(Expr::binary(BinOp::Assign, lhs, rhs))
}

#[test]
fn literals_evaluate_to_themselves() {
    let mut fx = fixture();
    let body = vec![
        print_expr(&fx, Expr::int(0)),
        print_expr(&fx, Expr::int(-17)),
        print_expr(&fx, Expr::ch(65)),
        // Characters are sign-extended
        print_expr(&fx, Expr::ch(-1)),
        print_expr(&fx, Expr::paren(Expr::int(9))),
        Stmt::Return(None),
    ];
    main_with(&mut fx, body);

    let mut console = MockConsole::new();
    run(&fx.program, &mut console);
    assert_eq!(console.output(), ["0", "-17", "65", "-1", "9"]);
}

#[test]
fn integer_arithmetic_round_trips() {
    // (a + b) - b == a for non-pointer operands
    let mut fx = fixture();
    let a = VarDecl::new("a", TypeClass::Int).with_init(Expr::int(123));
    let b = VarDecl::new("b", TypeClass::Int).with_init(Expr::int(-45));
    let body = vec![
        Stmt::Decl(vec![a.clone(), b.clone()]),
        print_expr(
            &fx,
            Expr::binary(
                BinOp::Sub,
                Expr::paren(Expr::binary(BinOp::Add, Expr::var(&a), Expr::var(&b))),
                Expr::var(&b),
            ),
        ),
        print_expr(&fx, Expr::binary(BinOp::Div, Expr::int(7), Expr::int(2))),
        print_expr(&fx, Expr::binary(BinOp::Mul, Expr::int(-6), Expr::int(3))),
        print_expr(&fx, Expr::unary(UnOp::Minus, Expr::int(8))),
        Stmt::Return(None),
    ];
    main_with(&mut fx, body);

    let mut console = MockConsole::new();
    run(&fx.program, &mut console);
    assert_eq!(console.output(), ["123", "3", "-18", "-8"]);
}

#[test]
fn comparisons_yield_one_or_zero() {
    let mut fx = fixture();
    let body = vec![
        print_expr(&fx, Expr::binary(BinOp::Lt, Expr::int(2), Expr::int(3))),
        print_expr(&fx, Expr::binary(BinOp::Ge, Expr::int(2), Expr::int(3))),
        print_expr(&fx, Expr::binary(BinOp::Eq, Expr::int(5), Expr::int(5))),
        print_expr(&fx, Expr::binary(BinOp::Ne, Expr::int(5), Expr::int(5))),
        Stmt::Return(None),
    ];
    main_with(&mut fx, body);

    let mut console = MockConsole::new();
    run(&fx.program, &mut console);
    assert_eq!(console.output(), ["1", "0", "1", "0"]);
}

#[test]
fn pointer_arithmetic_scales_by_word_size() {
    // p = MALLOC(4); (p + 2) - p == 16 (raw address difference)
    let mut fx = fixture();
    let p = VarDecl::new("p", TypeClass::Pointer)
        .with_init(Expr::call(fx.malloc, vec![Expr::int(4)]).with_ty(TypeClass::Pointer));
    let p_plus_2 = Expr::paren(Expr::binary(
        BinOp::Add,
        Expr::var(&p),
        Expr::int(2),
    ));
    let body = vec![
        Stmt::Decl(vec![p.clone()]),
        print_expr(&fx, Expr::binary(BinOp::Sub, p_plus_2, Expr::var(&p))),
        // Scaling is commutative: 2 + p lands on the same element
        print_expr(
            &fx,
            Expr::binary(
                BinOp::Sub,
                Expr::paren(Expr::binary(BinOp::Add, Expr::int(2), Expr::var(&p))),
                Expr::var(&p),
            ),
        ),
        Stmt::Return(None),
    ];
    main_with(&mut fx, body);

    let mut console = MockConsole::new();
    run(&fx.program, &mut console);
    assert_eq!(console.output(), ["16", "16"]);
}

#[test]
fn deref_through_pointer_offset() {
    // p = MALLOC(3); *(p + 1) = 7; PRINT(*(p + 1));
    let mut fx = fixture();
    let p = VarDecl::new("p", TypeClass::Pointer)
        .with_init(Expr::call(fx.malloc, vec![Expr::int(3)]).with_ty(TypeClass::Pointer));
    let elem = || {
        Expr::unary(
            UnOp::Deref,
            Expr::paren(Expr::binary(BinOp::Add, Expr::var(&p), Expr::int(1))),
        )
    };
    let body = vec![
        Stmt::Decl(vec![p.clone()]),
        assign(elem(), Expr::int(7)),
        print_expr(&fx, elem()),
        Stmt::Return(None),
    ];
    main_with(&mut fx, body);

    let mut console = MockConsole::new();
    run(&fx.program, &mut console);
    assert_eq!(console.output(), ["7"]);
}

#[test]
fn sizeof_is_the_word_size() {
    let mut fx = fixture();
    let body = vec![print_expr(&fx, Expr::sizeof()), Stmt::Return(None)];
    main_with(&mut fx, body);

    let mut console = MockConsole::new();
    run(&fx.program, &mut console);
    assert_eq!(console.output(), ["8"]);
}

#[test]
fn local_shadows_global_until_frame_pops() {
    // int g = 10;
    // void f() { int g = 99; PRINT(g); }   // same declaration, local tier
    // int main() { f(); PRINT(g); }
    let mut fx = fixture();
    let g = VarDecl::new("g", TypeClass::Int).with_init(Expr::int(10));
    fx.program.globals = vec![g.clone()];
    let shadow = g.clone().with_init(Expr::int(99));
    let f_id = fx.program.add_function(Function::new(
        "f",
        vec![],
        vec![
            Stmt::Decl(vec![shadow]),
            Stmt::Expr(Expr::call(fx.print, vec![Expr::var(&g)])),
            Stmt::Return(None),
        ],
    ));
    let body = vec![
        Stmt::Expr(Expr::call(f_id, vec![])),
        Stmt::Expr(Expr::call(fx.print, vec![Expr::var(&g)])),
        Stmt::Return(None),
    ];
    main_with(&mut fx, body);

    let mut console = MockConsole::new();
    run(&fx.program, &mut console);
    assert_eq!(console.output(), ["99", "10"]);
}

#[test]
fn function_without_local_writes_the_global_tier() {
    // int g = 1; void bump() { g = g + 1; } main: bump(); bump(); PRINT(g);
    let mut fx = fixture();
    let g = VarDecl::new("g", TypeClass::Int).with_init(Expr::int(1));
    fx.program.globals = vec![g.clone()];
    let bump = fx.program.add_function(Function::new(
        "bump",
        vec![],
        vec![
            assign(
                Expr::var(&g),
                Expr::binary(BinOp::Add, Expr::var(&g), Expr::int(1)),
            ),
            Stmt::Return(None),
        ],
    ));
    let body = vec![
        Stmt::Expr(Expr::call(bump, vec![])),
        Stmt::Expr(Expr::call(bump, vec![])),
        Stmt::Expr(Expr::call(fx.print, vec![Expr::var(&g)])),
        Stmt::Return(None),
    ];
    main_with(&mut fx, body);

    let mut console = MockConsole::new();
    run(&fx.program, &mut console);
    assert_eq!(console.output(), ["3"]);
}

#[test]
fn return_inside_nested_loop_skips_the_rest_of_the_function() {
    // while (1 == 1) { if (1 == 1) { return 5; } } PRINT(99);
    let mut fx = fixture();
    let one = || Expr::binary(BinOp::Eq, Expr::int(1), Expr::int(1));
    let body = vec![
        Stmt::While {
            cond: one(),
            body: vec![Stmt::If {
                cond: one(),
                then: vec![Stmt::Return(Some(Expr::int(5)))],
                els: None,
            }],
        },
        print_expr(&fx, Expr::int(99)),
    ];
    main_with(&mut fx, body);

    let mut console = MockConsole::new();
    assert_eq!(run(&fx.program, &mut console), 5);
    assert!(console.output().is_empty());
}

#[test]
fn binary_operands_evaluate_right_before_left() {
    // int fa() { PRINT(1); return 10; }
    // int fb() { PRINT(2); return 20; }
    // main: PRINT(fa() + fb());  → fb's side effect first
    let mut fx = fixture();
    let fa = fx.program.add_function(Function::new(
        "fa",
        vec![],
        vec![
            print_expr(&fx, Expr::int(1)),
            Stmt::Return(Some(Expr::int(10))),
        ],
    ));
    let fb = fx.program.add_function(Function::new(
        "fb",
        vec![],
        vec![
            print_expr(&fx, Expr::int(2)),
            Stmt::Return(Some(Expr::int(20))),
        ],
    ));
    let body = vec![
        print_expr(
            &fx,
            Expr::binary(
                BinOp::Add,
                Expr::call(fa, vec![]),
                Expr::call(fb, vec![]),
            ),
        ),
        Stmt::Return(None),
    ];
    main_with(&mut fx, body);

    let mut console = MockConsole::new();
    run(&fx.program, &mut console);
    assert_eq!(console.output(), ["2", "1", "30"]);
}

#[test]
fn division_by_zero_reports_and_yields_zero() {
    let mut fx = fixture();
    let body = vec![
        print_expr(&fx, Expr::binary(BinOp::Div, Expr::int(10), Expr::int(0))),
        print_expr(&fx, Expr::int(1)),
        Stmt::Return(None),
    ];
    main_with(&mut fx, body);

    let mut console = MockConsole::new();
    run(&fx.program, &mut console);
    assert_eq!(console.output(), ["0", "1"]);
    assert_eq!(console.diagnostics(), [Diagnostic::DivisionByZero]);
}

#[test]
fn unsupported_assignment_target_reports_and_continues() {
    // 5 = 3; PRINT(1);
    let mut fx = fixture();
    let body = vec![
        assign(Expr::int(5), Expr::int(3)),
        print_expr(&fx, Expr::int(1)),
        Stmt::Return(None),
    ];
    main_with(&mut fx, body);

    let mut console = MockConsole::new();
    run(&fx.program, &mut console);
    assert_eq!(console.output(), ["1"]);
    assert_eq!(
        console.diagnostics(),
        [Diagnostic::UnsupportedAssignmentTarget]
    );
}

#[test]
fn pointer_misuse_reports_and_yields_the_sentinel() {
    // p + p, p * 2, and -p are each reported; the result is -1 and the run
    // continues.
    let mut fx = fixture();
    let p = VarDecl::new("p", TypeClass::Pointer)
        .with_init(Expr::call(fx.malloc, vec![Expr::int(1)]).with_ty(TypeClass::Pointer));
    let body = vec![
        Stmt::Decl(vec![p.clone()]),
        print_expr(&fx, Expr::binary(BinOp::Add, Expr::var(&p), Expr::var(&p))),
        print_expr(&fx, Expr::binary(BinOp::Mul, Expr::var(&p), Expr::int(2))),
        print_expr(&fx, Expr::unary(UnOp::Minus, Expr::var(&p))),
        Stmt::Return(None),
    ];
    main_with(&mut fx, body);

    let mut console = MockConsole::new();
    run(&fx.program, &mut console);
    assert_eq!(console.output(), ["-1", "-1", "-1"]);
    assert!(matches!(
        console.diagnostics(),
        [
            Diagnostic::InvalidPointerArithmetic(_),
            Diagnostic::InvalidPointerArithmetic(_),
            Diagnostic::InvalidPointerArithmetic(_),
        ]
    ));
}

#[test]
fn zero_size_allocation_can_be_freed() {
    // int *p = MALLOC(0); FREE(p);  → a valid, if useless, round trip
    let mut fx = fixture();
    let p = VarDecl::new("p", TypeClass::Pointer)
        .with_init(Expr::call(fx.malloc, vec![Expr::int(0)]).with_ty(TypeClass::Pointer));
    let body = vec![
        Stmt::Decl(vec![p.clone()]),
        Stmt::Expr(Expr::call(fx.free, vec![Expr::var(&p)])),
        Stmt::Return(None),
    ];
    main_with(&mut fx, body);

    let mut console = MockConsole::new();
    run(&fx.program, &mut console);
    assert!(console.diagnostics().is_empty());
}

#[test]
fn free_of_a_never_allocated_address_reports() {
    let mut fx = fixture();
    let body = vec![
        Stmt::Expr(Expr::call(fx.free, vec![Expr::int(123)])),
        print_expr(&fx, Expr::int(1)),
        Stmt::Return(None),
    ];
    main_with(&mut fx, body);

    let mut console = MockConsole::new();
    run(&fx.program, &mut console);
    assert_eq!(console.output(), ["1"]);
    assert_eq!(
        console.diagnostics(),
        [Diagnostic::InvalidFree { addr: 123 }]
    );
}

#[test]
fn subscript_base_must_be_a_variable_reference() {
    // (0)[1] = 2;
    let mut fx = fixture();
    let body = vec![
        assign(
            Expr::subscript(Expr::int(0), Expr::int(1)),
            Expr::int(2),
        ),
        Stmt::Return(None),
    ];
    main_with(&mut fx, body);

    let mut console = MockConsole::new();
    run(&fx.program, &mut console);
    assert_eq!(console.diagnostics(), [Diagnostic::InvalidArrayTarget]);
}

#[test]
fn arrays_hold_pointers_too() {
    // int *arr[2]; arr[0] = MALLOC(1); *arr[0] = 11; PRINT(*arr[0]);
    let mut fx = fixture();
    let arr = VarDecl::array("arr", 2);
    let slot = || Expr::subscript(Expr::var(&arr), Expr::int(0));
    let body = vec![
        Stmt::Decl(vec![arr.clone()]),
        assign(
            slot(),
            Expr::call(fx.malloc, vec![Expr::int(1)]).with_ty(TypeClass::Pointer),
        ),
        assign(Expr::unary(UnOp::Deref, slot()), Expr::int(11)),
        print_expr(&fx, Expr::unary(UnOp::Deref, slot())),
        Stmt::Return(None),
    ];
    main_with(&mut fx, body);

    let mut console = MockConsole::new();
    run(&fx.program, &mut console);
    assert_eq!(console.output(), ["11"]);
    assert!(console.diagnostics().is_empty());
}

#[test]
fn local_arrays_die_with_their_frame() {
    // int *escape() { int arr[2]; return arr; }
    // main: int *p = escape(); *p;  → invalid access
    let mut fx = fixture();
    let arr = VarDecl::array("arr", 2);
    let escape = fx.program.add_function(Function::new(
        "escape",
        vec![],
        vec![
            Stmt::Decl(vec![arr.clone()]),
            Stmt::Return(Some(Expr::var(&arr))),
        ],
    ));
    let p = VarDecl::new("p", TypeClass::Pointer)
        .with_init(Expr::call(escape, vec![]).with_ty(TypeClass::Pointer));
    let body = vec![
        Stmt::Decl(vec![p.clone()]),
        print_expr(&fx, Expr::unary(UnOp::Deref, Expr::var(&p))),
        Stmt::Return(None),
    ];
    main_with(&mut fx, body);

    let mut console = MockConsole::new();
    run(&fx.program, &mut console);
    assert_eq!(console.output(), ["-1"]);
    assert!(matches!(
        console.diagnostics(),
        [Diagnostic::InvalidMemoryAccess { .. }]
    ));
}

#[test]
fn no_return_callee_produces_no_result() {
    // A function tagged no-return can still be called as a statement
    let mut fx = fixture();
    let mut quiet = Function::new(
        "quiet",
        vec![],
        vec![print_expr(&fx, Expr::int(4)), Stmt::Return(None)],
    );
    quiet.no_return = true;
    let quiet_id = fx.program.add_function(quiet);
    let body = vec![
        Stmt::Expr(Expr::call(quiet_id, vec![])),
        print_expr(&fx, Expr::int(5)),
        Stmt::Return(None),
    ];
    main_with(&mut fx, body);

    let mut console = MockConsole::new();
    run(&fx.program, &mut console);
    assert_eq!(console.output(), ["4", "5"]);
}

#[test]
fn for_loop_without_condition_stops_on_return() {
    // for (;;) { n = n + 1; if (n == 3) { return n; } }
    let mut fx = fixture();
    let n = VarDecl::new("n", TypeClass::Int).with_init(Expr::int(0));
    main_with(
        &mut fx,
        vec![
            Stmt::Decl(vec![n.clone()]),
            Stmt::For {
                init: None,
                cond: None,
                step: None,
                body: vec![
                    assign(
                        Expr::var(&n),
                        Expr::binary(BinOp::Add, Expr::var(&n), Expr::int(1)),
                    ),
                    Stmt::If {
                        cond: Expr::binary(BinOp::Eq, Expr::var(&n), Expr::int(3)),
                        then: vec![Stmt::Return(Some(Expr::var(&n)))],
                        els: None,
                    },
                ],
            },
        ],
    );

    let mut console = MockConsole::new();
    assert_eq!(run(&fx.program, &mut console), 3);
}

#[test]
fn if_takes_else_branch_on_non_one() {
    // if (2) PRINT(1); else PRINT(0);  → 2 is not "true"
    let mut fx = fixture();
    let body = vec![
        Stmt::If {
            cond: Expr::int(2),
            then: vec![print_expr(&fx, Expr::int(1))],
            els: Some(vec![print_expr(&fx, Expr::int(0))]),
        },
        Stmt::Return(None),
    ];
    main_with(&mut fx, body);

    let mut console = MockConsole::new();
    run(&fx.program, &mut console);
    assert_eq!(console.output(), ["0"]);
}
