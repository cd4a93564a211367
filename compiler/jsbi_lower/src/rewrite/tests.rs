#![allow(clippy::expect_used, reason = "Tests use expect for clarity")]

use jsbi_ir::{print_unit, AssignOp, BinaryOp, Span, TreeBuilder, UnaryOp};
use pretty_assertions::assert_eq;

use super::*;
use crate::{lower_module, LowerOutcome};

const IMPORT: &str = "import JSBI from \"jsbi/dist/jsbi.mjs\";\n";

struct Lowered {
    text: String,
    outcome: LowerOutcome,
}

fn lower_with(
    config: &LowerConfig,
    build: impl FnOnce(&mut TreeBuilder<'_>) -> Vec<NodeId>,
) -> Lowered {
    let interner = StringInterner::new();
    let mut arena = NodeArena::new();
    let mut b = TreeBuilder::new(&mut arena, &interner);
    let stmts = build(&mut b);
    let root = b.program(&stmts);
    let outcome = lower_module(&mut arena, root, &interner, config).expect("root is a program");
    let printed = print_unit(&arena, root, &interner);
    let first_line = printed.find('\n').map_or(0, |i| i + 1);
    let text = printed[first_line..].to_owned();
    Lowered { text, outcome }
}

/// Lower with the default config and return the output without the import.
fn lower(build: impl FnOnce(&mut TreeBuilder<'_>) -> Vec<NodeId>) -> Lowered {
    lower_with(&LowerConfig::default(), build)
}

fn stmt(b: &mut TreeBuilder<'_>, expr: NodeId) -> NodeId {
    b.expr_stmt(expr)
}

// === Literals and constructor calls ===

#[test]
fn literal_becomes_factory_call_with_decimal_text() {
    let out = lower(|b| {
        let lit = b.bigint("123456789012345678901234567890");
        vec![stmt(b, lit)]
    });
    assert_eq!(
        out.text,
        "JSBI.BigInt(\"123456789012345678901234567890\");\n"
    );
    assert_eq!(out.outcome.stats.literals, 1);
    assert_eq!(out.outcome.stats.total(), 1);
}

#[test]
fn constructor_call_swaps_callee() {
    let out = lower(|b| {
        let ctor = b.ident("BigInt");
        let s = b.string("5");
        let call = b.call(ctor, &[s]);
        let decl = b.let_("n_d", call);
        let stat = b.path(&["BigInt", "asIntN"]);
        let bits = b.number("64");
        let n = b.ident("n_d");
        let cast = b.call(stat, &[bits, n]);
        vec![decl, stmt(b, cast)]
    });
    assert_eq!(
        out.text,
        "let n_d = JSBI.BigInt(\"5\");\nJSBI.asIntN(64, n_d);\n"
    );
    assert_eq!(out.outcome.stats.constructor_calls, 2);
}

#[test]
fn constructor_arguments_are_rewritten_too() {
    let out = lower(|b| {
        let ctor = b.ident("BigInt");
        let lit = b.bigint("7");
        let call = b.call(ctor, &[lit]);
        vec![stmt(b, call)]
    });
    assert_eq!(out.text, "JSBI.BigInt(JSBI.BigInt(\"7\"));\n");
}

// === Binary and unary operators ===

#[test]
fn binary_keeps_operand_order() {
    let out = lower(|b| {
        let two = b.bigint("2");
        let one = b.bigint("1");
        let sub = b.binary(BinaryOp::Sub, two, one);
        vec![stmt(b, sub)]
    });
    assert_eq!(
        out.text,
        "JSBI.subtract(JSBI.BigInt(\"2\"), JSBI.BigInt(\"1\"));\n"
    );
}

#[test]
fn nested_binary_rewrites_outside_in() {
    let out = lower(|b| {
        let acc = b.ident("acc");
        let two = b.bigint("2");
        let sixteen = b.bigint("16");
        let pow = b.binary(BinaryOp::Exp, two, sixteen);
        let mul = b.binary(BinaryOp::Mul, acc, pow);
        vec![stmt(b, mul)]
    });
    assert_eq!(
        out.text,
        "JSBI.multiply(acc, JSBI.exponentiate(JSBI.BigInt(\"2\"), JSBI.BigInt(\"16\")));\n"
    );
    assert_eq!(out.outcome.stats.binary, 2);
    assert_eq!(out.outcome.stats.literals, 2);
}

#[test]
fn mixed_taint_is_still_rewritten() {
    let out = lower(|b| {
        let two = b.bigint("2");
        let decl = b.let_("t", two);
        let t = b.ident("t");
        let limit = b.number("10586");
        let lt = b.binary(BinaryOp::Lt, t, limit);
        vec![decl, stmt(b, lt)]
    });
    assert_eq!(
        out.text,
        "let t = JSBI.BigInt(\"2\");\nJSBI.lessThan(t, 10586);\n"
    );
}

#[test]
fn taint_flows_through_bindings() {
    let out = lower(|b| {
        let one = b.bigint("1");
        let a_decl = b.let_("a", one);
        let a = b.ident("a");
        let plain_one = b.number("1");
        let sum = b.binary(BinaryOp::Add, a, plain_one);
        let b_decl = b.let_("b", sum);
        let b_use = b.ident("b");
        let two = b.number("2");
        let product = b.binary(BinaryOp::Mul, b_use, two);
        vec![a_decl, b_decl, stmt(b, product)]
    });
    assert_eq!(
        out.text,
        "let a = JSBI.BigInt(\"1\");\n\
         let b = JSBI.add(a, 1);\n\
         JSBI.multiply(b, 2);\n"
    );
    assert_eq!(out.outcome.facts.tainted_binding_count(), 2);
}

#[test]
fn untainted_code_is_untouched() {
    let out = lower(|b| {
        let four = b.number("4");
        let decl = b.let_("n_t", four);
        let n = b.ident("n_t");
        let half = b.number("0.5");
        let ge = b.binary(BinaryOp::GtEq, n, half);
        vec![decl, stmt(b, ge)]
    });
    assert_eq!(out.text, "let n_t = 4;\nn_t >= 0.5;\n");
    assert_eq!(out.outcome.stats.total(), 0);
    assert_eq!(out.outcome.facts.tainted_node_count(), 0);
}

#[test]
fn unmapped_operator_is_left_but_operands_are_rewritten() {
    let out = lower(|b| {
        let a = b.ident("a");
        let one = b.bigint("1");
        let eq = b.binary(BinaryOp::LooseEq, a, one);
        vec![stmt(b, eq)]
    });
    assert_eq!(out.text, "a == JSBI.BigInt(\"1\");\n");
}

#[test]
fn unary_minus_and_bitwise_not() {
    let out = lower(|b| {
        let five = b.bigint("5");
        let neg = b.unary(UnaryOp::Neg, five);
        let x = b.ident("x");
        let one = b.bigint("1");
        let or = b.binary(BinaryOp::BitOr, x, one);
        let not = b.unary(UnaryOp::BitNot, or);
        let plain = b.ident("y");
        let untouched = b.unary(UnaryOp::Neg, plain);
        vec![stmt(b, neg), stmt(b, not), stmt(b, untouched)]
    });
    assert_eq!(
        out.text,
        "JSBI.unaryMinus(JSBI.BigInt(\"5\"));\n\
         JSBI.bitwiseNot(JSBI.bitwiseOr(x, JSBI.BigInt(\"1\")));\n\
         -y;\n"
    );
    assert_eq!(out.outcome.stats.unary, 2);
}

// === Compound assignment ===

#[test]
fn compound_assignment_expands() {
    let out = lower(|b| {
        let two = b.bigint("2");
        let y_decl = b.let_("y", two);
        let x = b.ident("x");
        let y = b.ident("y");
        let sub = b.assign(AssignOp::Sub, x, y);
        vec![y_decl, stmt(b, sub)]
    });
    assert_eq!(
        out.text,
        "let y = JSBI.BigInt(\"2\");\nx = JSBI.subtract(x, y);\n"
    );
    assert_eq!(out.outcome.stats.compound_assignments, 1);
}

#[test]
fn compound_assignment_settles_value_first() {
    let out = lower(|b| {
        let log = b.path(&["console", "log"]);
        let n = b.ident("n_b");
        let one = b.bigint("1");
        let sub = b.assign(AssignOp::Sub, n, one);
        let call = b.call(log, &[sub]);
        vec![stmt(b, call)]
    });
    assert_eq!(
        out.text,
        "console.log(n_b = JSBI.subtract(n_b, JSBI.BigInt(\"1\")));\n"
    );
}

#[test]
fn compound_assignment_on_member_clones_target() {
    let out = lower(|b| {
        let o = b.ident("o");
        let target = b.member(o, "v");
        let one = b.bigint("1");
        let add = b.assign(AssignOp::Add, target, one);
        vec![stmt(b, add)]
    });
    assert_eq!(out.text, "o.v = JSBI.add(o.v, JSBI.BigInt(\"1\"));\n");
}

#[test]
fn logical_and_untainted_compounds_are_left() {
    let out = lower(|b| {
        let x = b.ident("x");
        let one = b.number("1");
        let add = b.assign(AssignOp::Add, x, one);
        let y = b.ident("y");
        let lit = b.bigint("1");
        let or = b.assign(AssignOp::Or, y, lit);
        vec![stmt(b, add), stmt(b, or)]
    });
    assert_eq!(out.text, "x += 1;\ny ||= JSBI.BigInt(\"1\");\n");
}

#[test]
fn compound_clone_keeps_binding_resolution() {
    let interner = StringInterner::new();
    let mut arena = NodeArena::new();
    let mut b = TreeBuilder::new(&mut arena, &interner);
    let one = b.bigint("1");
    let decl = b.let_("x", one);
    let x = b.ident("x");
    let two = b.bigint("2");
    let assign = b.assign(AssignOp::Mul, x, two);
    let s = b.expr_stmt(assign);
    let root = b.program(&[decl, s]);

    let outcome = lower_module(&mut arena, root, &interner, &LowerConfig::default())
        .expect("program root");
    let NodeKind::Assign { value, .. } = *arena.kind(assign) else {
        panic!("expected assignment, got {:?}", arena.kind(assign));
    };
    let NodeKind::Call { args, .. } = *arena.kind(value) else {
        panic!("expected call, got {:?}", arena.kind(value));
    };
    let copy = arena.list(args)[0];
    assert_ne!(copy, x);
    assert_eq!(outcome.scopes.binding_of(copy), outcome.scopes.binding_of(x));
    assert!(outcome.facts.is_rewritten(value));
    assert!(outcome.facts.is_tainted(value));
}

// === Idempotence ===

#[test]
fn second_pass_changes_nothing() {
    let interner = StringInterner::new();
    let mut arena = NodeArena::new();
    let mut b = TreeBuilder::new(&mut arena, &interner);
    let five = b.bigint("5");
    let decl = b.let_("x", five);
    let x = b.ident("x");
    let one = b.bigint("1");
    let assign = b.assign(AssignOp::Sub, x, one);
    let s1 = b.expr_stmt(assign);
    let x2 = b.ident("x");
    let three = b.number("3");
    let pow = b.path(&["Math", "pow"]);
    let call = b.call(pow, &[x2, three]);
    let s2 = b.expr_stmt(call);
    let root = b.program(&[decl, s1, s2]);

    let config = LowerConfig::default();
    let scopes = ScopeTree::build(&arena, root);
    let mut rewriter = Rewriter::new(&mut arena, &interner, scopes, &config);
    rewriter.rewrite_subtree(root);
    let first = rewriter.stats();
    rewriter.rewrite_subtree(root);
    rewriter.rewrite_subtree(assign);
    rewriter.rewrite_subtree(call);
    assert_eq!(rewriter.stats(), first);
    let _ = rewriter.finish();

    assert_eq!(
        print_unit(&arena, root, &interner),
        "let x = JSBI.BigInt(\"5\");\n\
         x = JSBI.subtract(x, JSBI.BigInt(\"1\"));\n\
         JSBI.exponentiate(x, 3);\n"
    );
}

#[test]
fn second_pass_leaves_uses_before_the_binding_alone() {
    let interner = StringInterner::new();
    let mut arena = NodeArena::new();
    let mut b = TreeBuilder::new(&mut arena, &interner);
    let a = b.ident("a");
    let one = b.number("1");
    let sum = b.binary(BinaryOp::Add, a, one);
    let ret = b.ret(Some(sum));
    let func = b.function("f", &[], &[ret]);
    let lit = b.bigint("1");
    let decl = b.let_("a", lit);
    let root = b.program(&[func, decl]);

    let config = LowerConfig::default();
    let scopes = ScopeTree::build(&arena, root);
    let mut rewriter = Rewriter::new(&mut arena, &interner, scopes, &config);
    rewriter.rewrite_subtree(root);
    let first = rewriter.stats();
    assert_eq!(first.literals, 1);
    assert_eq!(first.binary, 0);

    rewriter.rewrite_subtree(root);
    rewriter.rewrite_subtree(sum);
    assert_eq!(rewriter.stats(), first);
    assert!(rewriter.facts().is_settled(sum));
    let _ = rewriter.finish();

    assert_eq!(
        print_unit(&arena, root, &interner),
        "function f() {\n    return a + 1;\n}\n\
         let a = JSBI.BigInt(\"1\");\n"
    );
}

#[test]
fn prebuilt_names_drive_the_rewrite() {
    let config = LowerConfig::with_library("Big", "./big.mjs");
    let interner = StringInterner::new();
    let mut arena = NodeArena::new();
    let mut b = TreeBuilder::new(&mut arena, &interner);
    let lit = b.bigint("3");
    let neg = b.unary(UnaryOp::Neg, lit);
    let root = {
        let s = b.expr_stmt(neg);
        b.program(&[s])
    };

    let names = LibraryNames::intern(&config, &interner);
    let interned = interner.len();
    let scopes = ScopeTree::build(&arena, root);
    let mut rewriter = Rewriter::with_names(&mut arena, &interner, scopes, names, true);
    rewriter.rewrite_subtree(root);
    assert_eq!(rewriter.stats().unary, 1);
    let _ = rewriter.finish();

    // Only the method name is new; library names came in prebuilt.
    assert_eq!(interner.len(), interned + 1);
    assert_eq!(
        print_unit(&arena, root, &interner),
        "Big.unaryMinus(Big.BigInt(\"3\"));\n"
    );
}

// === Member calls ===

#[test]
fn math_calls_are_redirected() {
    let out = lower(|b| {
        let two = b.bigint("2");
        let decl = b.let_("a", two);
        let pow = b.path(&["Math", "pow"]);
        let a = b.ident("a");
        let three = b.number("3");
        let call = b.call(pow, &[a, three]);
        let max = b.path(&["Math", "max"]);
        let one = b.number("1");
        let lit = b.bigint("9");
        let max_call = b.call(max, &[one, lit]);
        let m_decl = b.const_("m", max_call);
        vec![decl, stmt(b, call), m_decl]
    });
    assert_eq!(
        out.text,
        "let a = JSBI.BigInt(\"2\");\n\
         JSBI.exponentiate(a, 3);\n\
         const m = JSBI.max(1, JSBI.BigInt(\"9\"));\n"
    );
    assert_eq!(out.outcome.stats.method_calls, 2);
    assert_eq!(out.outcome.facts.tainted_binding_count(), 2);
}

#[test]
fn other_receivers_are_kept_but_tainted() {
    let out = lower(|b| {
        let parts = b.ident("parts");
        let reduce = b.member(parts, "reduce");
        let f = b.ident("f");
        let zero = b.bigint("0");
        let call = b.call(reduce, &[f, zero]);
        let decl = b.const_("total", call);
        let total = b.ident("total");
        let one = b.number("1");
        let sum = b.binary(BinaryOp::Add, total, one);
        vec![decl, stmt(b, sum)]
    });
    assert_eq!(
        out.text,
        "const total = parts.reduce(f, JSBI.BigInt(\"0\"));\n\
         JSBI.add(total, 1);\n"
    );
}

#[test]
fn member_calls_without_big_int_arguments_are_left() {
    let out = lower(|b| {
        let ceil = b.path(&["Math", "ceil"]);
        let random = b.path(&["Math", "random"]);
        let r = b.call(random, &[]);
        let k = b.number("1000");
        let mul = b.binary(BinaryOp::Mul, r, k);
        let call = b.call(ceil, &[mul]);
        vec![stmt(b, call)]
    });
    assert_eq!(out.text, "Math.ceil(Math.random() * 1000);\n");
    assert_eq!(out.outcome.stats.total(), 0);
}

#[test]
fn math_affordance_can_be_disabled() {
    let config = LowerConfig::default().without_math_affordance();
    let out = lower_with(&config, |b| {
        let pow = b.path(&["Math", "pow"]);
        let a = b.ident("a");
        let two = b.bigint("2");
        let call = b.call(pow, &[a, two]);
        vec![stmt(b, call)]
    });
    assert_eq!(out.text, "Math.pow(a, JSBI.BigInt(\"2\"));\n");
    assert_eq!(out.outcome.stats.method_calls, 0);
}

// === Declarator propagation ===

#[test]
fn rewrite_inside_arrow_taints_outer_declarator() {
    let out = lower(|b| {
        let ctor = b.ident("BigInt");
        let s = b.string("10086");
        let body = b.call(ctor, &[s]);
        let arrow = b.arrow(&[], body);
        let decl = b.const_("random", arrow);
        vec![decl]
    });
    assert_eq!(
        out.text,
        "const random = () => JSBI.BigInt(\"10086\");\n"
    );
    assert_eq!(out.outcome.facts.tainted_binding_count(), 1);
}

#[test]
fn call_of_tainted_binding_is_not_big_int() {
    let out = lower(|b| {
        let ctor = b.ident("BigInt");
        let s = b.string("1");
        let body = b.call(ctor, &[s]);
        let arrow = b.arrow(&[], body);
        let decl = b.const_("f", arrow);
        let f = b.ident("f");
        let call = b.call(f, &[]);
        let one = b.number("1");
        let sum = b.binary(BinaryOp::Add, call, one);
        vec![decl, stmt(b, sum)]
    });
    assert_eq!(
        out.text,
        "const f = () => JSBI.BigInt(\"1\");\nf() + 1;\n"
    );
}

// === Configuration and spans ===

#[test]
fn binary_is_classified_before_operand_member_call() {
    let out = lower(|b| {
        let two_n = b.bigint("2");
        let decl_a = b.let_("a", two_n);
        let pow = b.path(&["Math", "pow"]);
        let a = b.ident("a");
        let two = b.number("2");
        let call = b.call(pow, &[a, two]);
        let one = b.number("1");
        let sum = b.binary(BinaryOp::Add, call, one);
        let decl_c = b.let_("c", sum);
        let c = b.ident("c");
        let ten = b.number("10");
        let lt = b.binary(BinaryOp::Lt, c, ten);
        vec![decl_a, decl_c, stmt(b, lt)]
    });
    // The sum was decided before its left operand became a library call,
    // but that call still taints `c`.
    assert_eq!(
        out.text,
        "let a = JSBI.BigInt(\"2\");\n\
         let c = JSBI.exponentiate(a, 2) + 1;\n\
         JSBI.lessThan(c, 10);\n"
    );
    assert_eq!(out.outcome.stats.method_calls, 1);
    assert_eq!(out.outcome.stats.binary, 1);
}

#[test]
fn custom_library_name() {
    let config = LowerConfig::with_library("Big", "./big.mjs");
    let interner = StringInterner::new();
    let mut arena = NodeArena::new();
    let mut b = TreeBuilder::new(&mut arena, &interner);
    let a = b.bigint("1");
    let c = b.bigint("2");
    let sum = b.binary(BinaryOp::Add, a, c);
    let s = b.expr_stmt(sum);
    let root = b.program(&[s]);

    lower_module(&mut arena, root, &interner, &config).expect("program root");
    assert_eq!(
        print_unit(&arena, root, &interner),
        "import Big from \"./big.mjs\";\n\
         Big.add(Big.BigInt(\"1\"), Big.BigInt(\"2\"));\n"
    );
}

#[test]
fn rewritten_node_keeps_id_and_span() {
    let interner = StringInterner::new();
    let mut arena = NodeArena::new();
    let mut b = TreeBuilder::new(&mut arena, &interner);
    b.at(Span::new(10, 13));
    let lit = b.bigint("42");
    b.at(Span::DUMMY);
    let s = b.expr_stmt(lit);
    let root = b.program(&[s]);

    let outcome = lower_module(&mut arena, root, &interner, &LowerConfig::default())
        .expect("program root");
    assert!(matches!(arena.kind(lit), NodeKind::Call { .. }));
    assert_eq!(arena.span(lit), Span::new(10, 13));
    assert!(outcome.facts.is_tainted(lit));
    assert!(outcome.facts.is_rewritten(lit));
}

#[test]
fn output_always_starts_with_one_import() {
    let interner = StringInterner::new();
    let mut arena = NodeArena::new();
    let root = TreeBuilder::new(&mut arena, &interner).program(&[]);
    lower_module(&mut arena, root, &interner, &LowerConfig::default()).expect("program root");
    assert_eq!(print_unit(&arena, root, &interner), IMPORT);
}
