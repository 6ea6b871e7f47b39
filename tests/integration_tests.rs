// tests/integration_tests.rs

use infix_expr::{
    Bindings, EvalError, Node, Opaque, OperatorTable, OptimizerTable, Value, evaluate, parse,
    vars, vars_count,
};

fn bindings(pairs: Vec<(&str, Value)>) -> Bindings {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn eval_with(source: &str, bindings: &Bindings) -> Result<Value, EvalError> {
    let node = parse(source).unwrap();
    evaluate(&node, bindings, &OperatorTable::builtin())
}

fn eval(source: &str) -> Value {
    eval_with(source, &Bindings::new()).unwrap()
}

fn eval_err(source: &str) -> EvalError {
    eval_with(source, &Bindings::new()).unwrap_err()
}

fn num(n: f64) -> Value {
    Value::Number(n)
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_polynomial() {
    let b = bindings(vec![("x", (-1).into()), ("y", 3.into()), ("z", 5.into())]);
    assert_eq!(eval_with("x + y * z**2", &b).unwrap(), num(74.0));
}

#[test]
fn test_ternary_branch_with_negation() {
    let b = bindings(vec![("x", (-6.4).into())]);
    let result = eval_with("x > 0 ? x ** 0.5 : -x + 1", &b).unwrap();
    let n = result.as_float().unwrap();
    assert!((n - 7.4).abs() < 1e-12, "got {}", n);
}

#[test]
fn test_membership() {
    let source = "item in [1, 2, 3, 5]";
    assert_eq!(
        eval_with(source, &bindings(vec![("item", 3.into())])).unwrap(),
        Value::Boolean(true)
    );
    assert_eq!(
        eval_with(source, &bindings(vec![("item", 4.into())])).unwrap(),
        Value::Boolean(false)
    );
}

#[test]
fn test_function_call_in_comparison() {
    let b = bindings(vec![("a", 9.into())]);
    assert_eq!(eval_with("floor(a / 2) == 4", &b).unwrap(), Value::Boolean(true));
}

#[test]
fn test_indexing_computed_receiver() {
    let b = bindings(vec![
        ("a", vec![1, 2, 3].into()),
        ("b", vec![4, 5, 6].into()),
        ("foo", false.into()),
    ]);
    assert_eq!(eval_with("a[2] + (foo ? a : b)[1+1]", &b).unwrap(), num(9.0));
}

#[test]
fn test_left_associative_chain() {
    assert_eq!(eval("2 - 6 - 10 - 2"), num(-16.0));
}

// ============================================================================
// Built-in operators
// ============================================================================

#[test]
fn test_arithmetic() {
    assert_eq!(eval("1 + 2 * 3 - 4 / 2"), num(5.0));
    assert_eq!(eval("2 ** 10"), num(1024.0));
    assert_eq!(eval("2 ** 3 ** 2"), num(512.0));
    assert_eq!(eval("-3 + +2"), num(-1.0));
    assert_eq!(eval("1 / 0"), num(f64::INFINITY));
    assert_eq!(eval("'foo' + 'bar'"), Value::String("foobar".into()));
}

#[test]
fn test_modulo() {
    assert_eq!(eval("7 % 3"), num(1.0));
    assert_eq!(eval("-7 % 3"), num(-1.0));
    let err = eval_err("7 % 0");
    assert_eq!(err.root_cause().to_string(), "%: division by zero at 0..5");
}

#[test]
fn test_mixed_addition_rejected() {
    let err = eval_err("1 + 'a'");
    assert_eq!(err.to_string(), "+: cannot add number and string at 0..7");
}

#[test]
fn test_bitwise() {
    assert_eq!(eval("6 & 3"), num(2.0));
    assert_eq!(eval("6 | 3"), num(7.0));
    assert_eq!(eval("6 ^ 3"), num(5.0));
    assert_eq!(eval("1 << 4"), num(16.0));
    assert_eq!(eval("-16 >> 2"), num(-4.0));
    assert_eq!(eval("~0"), num(-1.0));
}

#[test]
fn test_shift_saturation() {
    assert_eq!(eval("1 << 64"), num(0.0));
    assert_eq!(eval("-1 >> 100"), num(-1.0));
    assert_eq!(eval("1 >> 100"), num(0.0));
}

#[test]
fn test_negative_shift() {
    let err = eval_err("1 << -1");
    assert_eq!(err.root_cause().to_string(), "<<: negative shift count -1 at 0..7");
}

#[test]
fn test_bitwise_requires_integers() {
    let err = eval_err("1.5 & 1");
    assert!(matches!(
        err.root_cause(),
        EvalError::Type { expected: "integer", .. }
    ));
}

#[test]
fn test_comparison() {
    assert_eq!(eval("1 == 1"), Value::Boolean(true));
    assert_eq!(eval("1 == '1'"), Value::Boolean(false));
    assert_eq!(eval("'a' != 'b'"), Value::Boolean(true));
    assert_eq!(eval("[1, 2] == [1, 2]"), Value::Boolean(true));
    assert_eq!(eval("2 >= 2 && 1 < 2 && 3 > 2 && 2 <= 1"), Value::Boolean(false));
}

#[test]
fn test_ordering_is_numeric_only() {
    let err = eval_err("'a' < 'b'");
    assert_eq!(err.to_string(), "lhs of < at 0..3: expected number, got string");
}

#[test]
fn test_regex_match() {
    let b = bindings(vec![("name", "abbbc".into())]);
    assert_eq!(eval_with("name =~ '^ab+c$'", &b).unwrap(), Value::Boolean(true));
    assert_eq!(eval_with("name !~ '^ab+c$'", &b).unwrap(), Value::Boolean(false));
    let err = eval_err("'x' =~ '('");
    assert!(err.to_string().starts_with("=~: invalid regex"));
}

#[test]
fn test_logic() {
    assert_eq!(eval("!true || !false"), Value::Boolean(true));
    assert_eq!(eval("true && false"), Value::Boolean(false));
    let err = eval_err("1 && true");
    assert_eq!(err.to_string(), "lhs of && at 0..1: expected boolean, got number");
}

#[test]
fn test_short_circuit() {
    assert_eq!(eval("false && missing"), Value::Boolean(false));
    assert_eq!(eval("true || missing"), Value::Boolean(true));
    assert_eq!(eval("true ? 1 : missing"), num(1.0));
    assert_eq!(eval("false ? missing : 2"), num(2.0));
}

#[test]
fn test_coalesce() {
    let b = bindings(vec![("n", Value::Null), ("m", 1.into())]);
    assert_eq!(eval_with("n ?? 5", &b).unwrap(), num(5.0));
    assert_eq!(eval_with("m ?? missing", &b).unwrap(), num(1.0));
}

#[test]
fn test_sequences() {
    assert_eq!(eval("[]"), Value::Array(vec![]));
    assert_eq!(eval("'b' in ['a', 'b']"), Value::Boolean(true));
    assert_eq!(eval("[1, [2, 3]][1][0]"), num(2.0));
    assert_eq!(eval("[1, 2, 3][2]"), num(3.0));
}

#[test]
fn test_index_out_of_range() {
    let b = bindings(vec![("a", vec![1, 2, 3].into())]);
    for source in ["a[-1]", "a[3]"] {
        let err = eval_with(source, &b).unwrap_err();
        assert!(
            matches!(err, EvalError::Operator { ref name, .. } if name == "[]"),
            "{}: {:?}",
            source,
            err
        );
    }
    assert_eq!(
        eval_with("a[-1]", &b).unwrap_err().to_string(),
        "[]: index -1 out of range for sequence of length 3 at 0..5"
    );
    let err = eval_with("a[0.5]", &b).unwrap_err();
    assert!(matches!(err.root_cause(), EvalError::Type { expected: "integer", .. }));
}

#[test]
fn test_in_requires_sequence() {
    let err = eval_err("1 in 5");
    assert_eq!(err.to_string(), "rhs of in at 5..6: expected sequence, got number");
}

#[test]
fn test_math_functions() {
    assert_eq!(eval("floor(2.7)"), num(2.0));
    assert_eq!(eval("ceil(2.1)"), num(3.0));
    assert_eq!(eval("round(2.5)"), num(3.0));
    assert_eq!(eval("round(-2.5)"), num(-3.0));
    assert_eq!(eval("sqrt(16)"), num(4.0));
    assert_eq!(eval("sin(0)"), num(0.0));
    assert_eq!(eval("cos(0)"), num(1.0));
    assert_eq!(eval("abs(-3)"), num(3.0));
    assert_eq!(eval("max(1, 5, 3)"), num(5.0));
    assert_eq!(eval("min(4, 2)"), num(2.0));
    assert_eq!(eval("max(7)"), num(7.0));
}

#[test]
fn test_arity_errors() {
    assert_eq!(eval_err("max()").to_string(), "max expects at least 1 arguments, got 0");
    assert_eq!(eval_err("floor(1, 2)").to_string(), "floor expects 1 arguments, got 2");
}

// ============================================================================
// Variables and bindings
// ============================================================================

#[test]
fn test_undefined_variable() {
    let err = eval_err("x + 1");
    assert_eq!(err.to_string(), "lhs of + at 0..1: variable undefined: x at 0..1");
    assert!(matches!(
        err.root_cause(),
        EvalError::UndefinedVariable { name, .. } if name == "x"
    ));
}

#[test]
fn test_undefined_operator() {
    assert!(matches!(
        eval_err("nope(1)"),
        EvalError::UndefinedOperator { ref name, .. } if name == "nope"
    ));
    assert!(matches!(
        eval_err("1 to 2"),
        EvalError::UndefinedOperator { ref name, .. } if name == "to"
    ));
}

#[test]
fn test_names_are_case_sensitive() {
    let b = bindings(vec![("Price", 1.into())]);
    assert!(eval_with("price", &b).is_err());
    assert_eq!(eval_with("Price", &b).unwrap(), num(1.0));
}

#[test]
fn test_host_numbers_are_widened() {
    let b = bindings(vec![
        ("small", 3u8.into()),
        ("wide", (-2i64).into()),
        ("single", 1.5f32.into()),
        ("items", vec![10u16, 20u16].into()),
    ]);
    assert_eq!(eval_with("small", &b).unwrap(), num(3.0));
    assert_eq!(eval_with("small + wide + single", &b).unwrap(), num(2.5));
    assert_eq!(eval_with("items", &b).unwrap(), Value::Array(vec![num(10.0), num(20.0)]));
    assert_eq!(eval_with("items[1] / 4", &b).unwrap(), num(5.0));
}

#[test]
fn test_opaque_values_pass_through() {
    let handle = Opaque::new(String::from("connection"));
    let b = bindings(vec![("h", handle.clone().into())]);
    assert_eq!(eval_with("h", &b).unwrap(), Value::Opaque(handle));
    assert_eq!(eval_with("h == h", &b).unwrap(), Value::Boolean(true));
}

#[test]
fn test_nested_expression_binding() {
    let b = bindings(vec![
        ("total", parse("price * qty").unwrap().into()),
        ("price", 2.5.into()),
        ("qty", 4.into()),
    ]);
    assert_eq!(eval_with("total + 1", &b).unwrap(), num(11.0));
}

#[test]
fn test_self_reference() {
    let b = bindings(vec![("a", parse("a + 1").unwrap().into())]);
    let err = eval_with("a * 2", &b).unwrap_err();
    assert!(matches!(
        err.root_cause(),
        EvalError::SelfReference { name, .. } if name == "a"
    ));
}

#[test]
fn test_transitive_self_reference() {
    let b = bindings(vec![
        ("a", parse("b + 1").unwrap().into()),
        ("b", parse("c * 2").unwrap().into()),
        ("c", parse("a").unwrap().into()),
    ]);
    let err = eval_with("a", &b).unwrap_err();
    assert!(matches!(err.root_cause(), EvalError::SelfReference { .. }));
}

#[test]
fn test_shared_subexpression_is_not_a_cycle() {
    let b = bindings(vec![
        ("a", parse("b + b").unwrap().into()),
        ("b", parse("c").unwrap().into()),
        ("c", 3.into()),
    ]);
    assert_eq!(eval_with("a", &b).unwrap(), num(6.0));
}

// ============================================================================
// Free variables
// ============================================================================

#[test]
fn test_vars_lists_each_name_once() {
    let node = parse("a[i] + (foo ? a : b)[i + 1]").unwrap();
    let names: Vec<String> = vars(&node).into_iter().collect();
    assert_eq!(names, ["a", "b", "foo", "i"]);
}

#[test]
fn test_vars_count_occurrences() {
    let counts = vars_count(&parse("x * x + f(x, y)").unwrap());
    assert_eq!(counts.get("x"), Some(&3));
    assert_eq!(counts.get("y"), Some(&1));
    assert_eq!(counts.get("f"), None);
}

#[test]
fn test_vars_of_constant_expression() {
    assert!(vars(&parse("1 + max(2, 3)").unwrap()).is_empty());
}

#[test]
fn test_vars_inside_nested_expression_literal() {
    let inner = parse("price * qty").unwrap();
    let node = Node::operator(
        "+",
        infix_expr::Shape::Infix,
        vec![parse("tax").unwrap(), Node::literal(inner, Default::default())],
        Default::default(),
    );
    let names: Vec<String> = vars(&node).into_iter().collect();
    assert_eq!(names, ["price", "qty", "tax"]);
}

// ============================================================================
// Error labels
// ============================================================================

#[test]
fn test_argument_labels() {
    let cases = [
        ("1 ? 2 : 3", "ternary condition at 0..1: expected boolean, got number"),
        ("true ? x : 3", "ternary then-branch at 7..8: variable undefined: x at 7..8"),
        ("false ? 1 : x", "ternary else-branch at 12..13: variable undefined: x at 12..13"),
        ("[1, x]", "array item #2 at 4..5: variable undefined: x at 4..5"),
        ("x[0]", "indexed value at 0..1: variable undefined: x at 0..1"),
        ("[1][x]", "index at 4..5: variable undefined: x at 4..5"),
        ("max(1, x)", "argument #2 of max at 7..8: variable undefined: x at 7..8"),
        ("-x", "operand of - at 1..2: variable undefined: x at 1..2"),
        ("1 - x", "rhs of - at 4..5: variable undefined: x at 4..5"),
    ];
    for (source, expected) in cases {
        assert_eq!(eval_err(source).to_string(), expected, "{}", source);
    }
}

#[test]
fn test_labels_chain_outermost_first() {
    let err = eval_err("1 + (2 * x)");
    assert_eq!(
        err.to_string(),
        "rhs of + at 4..11: rhs of * at 9..10: variable undefined: x at 9..10"
    );
}

// ============================================================================
// Custom operators
// ============================================================================

#[test]
fn test_custom_operator() {
    let mut ops = OperatorTable::builtin();
    ops.insert("len", |ctx| {
        ctx.check_arg_count(1)?;
        match ctx.arg(0)? {
            Value::String(s) => Ok(Value::Number(s.chars().count() as f64)),
            Value::Array(items) => Ok(Value::Number(items.len() as f64)),
            other => Err(ctx.format_error(format!("no length for {}", other.type_name()))),
        }
    });
    let node = parse("len('héllo') + len([1, 2])").unwrap();
    assert_eq!(evaluate(&node, &Bindings::new(), &ops).unwrap(), num(7.0));

    let node = parse("len(1)").unwrap();
    let err = evaluate(&node, &Bindings::new(), &ops).unwrap_err();
    assert_eq!(err.to_string(), "len: no length for number at 0..6");
}

#[test]
fn test_word_infix_operator() {
    let mut ops = OperatorTable::builtin();
    ops.insert("to", |ctx| {
        let from = ctx.integer_arg(0)?;
        let to = ctx.integer_arg(1)?;
        Ok(Value::Array((from..=to).map(|n| Value::Number(n as f64)).collect()))
    });
    let node = parse("2 in 1 to 3").unwrap();
    assert_eq!(
        evaluate(&node, &Bindings::new(), &ops).unwrap(),
        Value::Boolean(true)
    );
}

#[test]
fn test_equivalent_replacement_keeps_results() {
    let mut ops = OperatorTable::builtin();
    ops.insert("+", |ctx| Ok(Value::Number(ctx.numeric_arg(0)? + ctx.numeric_arg(1)?)));
    let node = parse("1 + 2 + x").unwrap();
    let b = bindings(vec![("x", 3.into())]);
    assert_eq!(
        evaluate(&node, &b, &ops).unwrap(),
        evaluate(&node, &b, &OperatorTable::builtin()).unwrap()
    );
}

#[test]
fn test_removed_operator() {
    let mut ops = OperatorTable::builtin();
    assert!(ops.remove("+").is_some());
    let node = parse("1 + 2").unwrap();
    assert!(matches!(
        evaluate(&node, &Bindings::new(), &ops),
        Err(EvalError::UndefinedOperator { .. })
    ));
}

#[test]
fn test_operator_controls_evaluation_order() {
    let mut ops = OperatorTable::new();
    ops.insert("second", |ctx| ctx.arg(1));
    let node = parse("second(missing, 2)").unwrap();
    assert_eq!(evaluate(&node, &Bindings::new(), &ops).unwrap(), num(2.0));
}

// ============================================================================
// Sharing
// ============================================================================

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_types_are_shareable() {
    assert_send_sync::<Node>();
    assert_send_sync::<Value>();
    assert_send_sync::<OperatorTable>();
    assert_send_sync::<OptimizerTable>();
}

#[test]
fn test_concurrent_evaluation() {
    let node = parse("x * 2").unwrap();
    let ops = OperatorTable::builtin();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let (node, ops) = (&node, &ops);
                s.spawn(move || {
                    let b = bindings(vec![("x", i.into())]);
                    evaluate(node, &b, ops).unwrap()
                })
            })
            .collect();
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), num(i as f64 * 2.0));
        }
    });
}
