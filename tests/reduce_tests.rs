// tests/reduce_tests.rs

use infix_expr::{
    Bindings, Node, NodeKind, OperatorTable, OptimizerTable, PrintConfig, Shape, Span, Value,
    evaluate, parse, print, reduce,
};

fn bindings(pairs: Vec<(&str, Value)>) -> Bindings {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn reduce_src(source: &str, partial: &Bindings) -> Node {
    let node = parse(source).unwrap();
    reduce(
        &node,
        partial,
        &OperatorTable::builtin(),
        &OptimizerTable::builtin(),
    )
}

/// Reduces `source` and prints the result.
fn reduced(source: &str, partial: &Bindings) -> String {
    print(&reduce_src(source, partial), &PrintConfig::default()).unwrap()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_partial_conjunction_keeps_remaining_side() {
    let partial = bindings(vec![("x", 10.into())]);
    assert_eq!(reduced("x != 0 && y == x - 1", &partial), "y == 9");
}

#[test]
fn test_partial_conjunction_collapses() {
    let partial = bindings(vec![("x", 0.into())]);
    let node = reduce_src("x != 0 && y == x - 1", &partial);
    assert_eq!(node.as_literal(), Some(&Value::Boolean(false)));
}

// ============================================================================
// Substitution and folding
// ============================================================================

#[test]
fn test_unbound_tree_is_unchanged() {
    let node = parse("x + y * f(z)").unwrap();
    let out = reduce(
        &node,
        &Bindings::new(),
        &OperatorTable::builtin(),
        &OptimizerTable::builtin(),
    );
    assert_eq!(out, node);
}

#[test]
fn test_constant_folding() {
    assert_eq!(reduced("1 + 2 * 3", &Bindings::new()), "7");
    assert_eq!(reduced("max(1, 4) ** 0.5", &Bindings::new()), "2");
    assert_eq!(reduced("[1, 2 + 1]", &Bindings::new()), "[1, 3]");
    assert_eq!(reduced("'a' + 'b'", &Bindings::new()), "\"ab\"");
}

#[test]
fn test_bound_variables_become_literals() {
    let partial = bindings(vec![("x", 5u8.into()), ("items", vec![1, 2].into())]);
    let node = reduce_src("x", &partial);
    assert_eq!(node.as_literal(), Some(&Value::Number(5.0)));
    assert_eq!(reduced("x in items || y", &partial), "y");
}

#[test]
fn test_fold_takes_node_span() {
    let node = reduce_src("a + (1 + 2)", &Bindings::new());
    assert_eq!(node.children()[1].span, Span::new(4, 7));
}

#[test]
fn test_failing_fold_is_kept() {
    let out = reduce_src("7 % 0", &Bindings::new());
    assert_eq!(out, parse("7 % 0").unwrap());

    let out = reduce_src("x + [1, 2][5]", &Bindings::new());
    assert_eq!(print(&out, &PrintConfig::default()).unwrap(), "x + [1, 2][5]");
}

#[test]
fn test_unknown_operator_is_kept() {
    let out = reduce_src("lookup(1, 2)", &Bindings::new());
    assert_eq!(out, parse("lookup(1, 2)").unwrap());
}

// ============================================================================
// Built-in optimizers
// ============================================================================

#[test]
fn test_logical_identities() {
    let none = Bindings::new();
    assert_eq!(reduced("true && x", &none), "x");
    assert_eq!(reduced("x && true", &none), "x");
    assert_eq!(reduced("x && false", &none), "false");
    assert_eq!(reduced("false || x", &none), "x");
    assert_eq!(reduced("x || true", &none), "true");
}

#[test]
fn test_arithmetic_identities() {
    let none = Bindings::new();
    assert_eq!(reduced("0 + x", &none), "x");
    assert_eq!(reduced("x + 0", &none), "x");
    assert_eq!(reduced("x - 0", &none), "x");
    assert_eq!(reduced("0 - x", &none), "-x");
    assert_eq!(reduced("x * 0", &none), "0");
    assert_eq!(reduced("1 * x", &none), "x");
    assert_eq!(reduced("x / 1", &none), "x");
    assert_eq!(reduced("1 / x", &none), "1 / x");
}

#[test]
fn test_zero_minus_builds_prefix_node() {
    let node = reduce_src("0 - (a + b)", &Bindings::new());
    let NodeKind::Operator { name, shape, args } = &node.kind else {
        panic!("expected operator, got {:?}", node);
    };
    assert_eq!(name, "-");
    assert_eq!(*shape, Shape::Prefix);
    assert_eq!(args.len(), 1);
    assert_eq!(print(&node, &PrintConfig::default()).unwrap(), "-(a + b)");
}

#[test]
fn test_ternary_with_known_condition() {
    let partial = bindings(vec![("debug", false.into())]);
    assert_eq!(reduced("debug ? verbose : quiet * 2", &partial), "quiet * 2");
    assert_eq!(reduced("true ? a : b", &Bindings::new()), "a");
    assert_eq!(reduced("c ? a : b", &Bindings::new()), "c ? a : b");
}

#[test]
fn test_optimizers_see_reduced_children() {
    let partial = bindings(vec![("n", 3.into())]);
    assert_eq!(reduced("(n - 3) * price + tax * (n - 2)", &partial), "tax");
}

#[test]
fn test_custom_optimizer() {
    let mut optimizers = OptimizerTable::builtin();
    optimizers.insert("??", |node: Node| match node.children() {
        [left, _] if left.as_literal().is_some_and(|v| !v.is_null()) => left.clone(),
        _ => node,
    });
    let node = parse("'set' ?? fallback").unwrap();
    let out = reduce(&node, &Bindings::new(), &OperatorTable::builtin(), &optimizers);
    assert_eq!(out.as_literal(), Some(&Value::String("set".into())));
}

#[test]
fn test_without_optimizers_only_folds() {
    let node = parse("x * 0 + (1 + 1)").unwrap();
    let out = reduce(
        &node,
        &Bindings::new(),
        &OperatorTable::builtin(),
        &OptimizerTable::new(),
    );
    assert_eq!(print(&out, &PrintConfig::default()).unwrap(), "x * 0 + 2");
}

// ============================================================================
// Nested expressions
// ============================================================================

#[test]
fn test_expression_binding_is_inlined() {
    let partial = bindings(vec![
        ("total", parse("price * qty").unwrap().into()),
        ("price", 2.into()),
    ]);
    assert_eq!(reduced("total > 10", &partial), "2 * qty > 10");
}

#[test]
fn test_self_referential_binding_stays_variable() {
    let partial = bindings(vec![("a", parse("a + 1").unwrap().into())]);
    let node = reduce_src("a * 2", &partial);
    assert_eq!(node, parse("a * 2").unwrap());
}

// ============================================================================
// Laws on fixed inputs
// ============================================================================

#[test]
fn test_reduce_is_idempotent() {
    let partial = bindings(vec![("x", 2.into()), ("flag", true.into())]);
    let ops = OperatorTable::builtin();
    let opts = OptimizerTable::builtin();
    for source in [
        "x + y * (x - 2)",
        "flag && (y > x || z)",
        "flag ? [x, y][0] : z",
        "0 - (y - 0)",
    ] {
        let once = reduce(&parse(source).unwrap(), &partial, &ops, &opts);
        let twice = reduce(&once, &partial, &ops, &opts);
        assert_eq!(once, twice, "{}", source);
    }
}

#[test]
fn test_reduce_preserves_results() {
    let partial = bindings(vec![("x", 4.into())]);
    let mut full = partial.clone();
    full.insert("y".into(), 3.into());
    full.insert("s".into(), "ab".into());

    let ops = OperatorTable::builtin();
    let opts = OptimizerTable::builtin();
    for source in [
        "x * y + 1",
        "x > 3 && y < 10",
        "s + 'c' == 'abc' ? x ** 2 : -y",
        "y in [x, x - 1]",
        "floor(y / x) + min(x, y)",
    ] {
        let node = parse(source).unwrap();
        let reduced = reduce(&node, &partial, &ops, &opts);
        assert_eq!(
            evaluate(&reduced, &full, &ops).unwrap(),
            evaluate(&node, &full, &ops).unwrap(),
            "{}",
            source
        );
    }
}
