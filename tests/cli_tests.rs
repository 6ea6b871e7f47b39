// tests/cli_tests.rs
#![cfg(feature = "cli")]

use infix_expr::cli::{
    CliError, execute_eval, execute_print, execute_reduce, execute_tokens, execute_vars,
};

#[test]
fn test_eval_prints_json() {
    let out = execute_eval("x + y * z ** 2", Some(r#"{"x": -1, "y": 3, "z": 5}"#)).unwrap();
    assert_eq!(out, "74");
    assert_eq!(execute_eval("[1, 'a', 2 > 1]", None).unwrap(), r#"[1,"a",true]"#);
    assert_eq!(execute_eval("7 / 2", None).unwrap(), "3.5");
}

#[test]
fn test_eval_with_blank_bindings() {
    assert_eq!(execute_eval("1 + 1", Some("  \n")).unwrap(), "2");
}

#[test]
fn test_eval_errors() {
    assert!(matches!(execute_eval("x", None), Err(CliError::Eval(_))));
    assert!(matches!(
        execute_eval("x", Some("{bad json")),
        Err(CliError::Json(_))
    ));
    assert!(matches!(
        execute_eval("x", Some(r#"{"x": {"nested": 1}}"#)),
        Err(CliError::UnsupportedJson("object"))
    ));
    assert!(matches!(
        execute_eval("x", Some("[1]")),
        Err(CliError::BindingsNotObject)
    ));
}

#[test]
fn test_parse_error_has_line_and_column() {
    let err = execute_print("a +\n  (b", false).unwrap_err();
    assert!(matches!(err, CliError::Parse { line: 2, column: 3, .. }));
    assert_eq!(
        err.to_string(),
        "parse error at line 2, column 3: unmatched bracket '(' at position 6"
    );
}

#[test]
fn test_reduce() {
    let out = execute_reduce("x != 0 && y == x - 1", Some(r#"{"x": 10}"#), false).unwrap();
    assert_eq!(out, "y == 9");
    let out = execute_reduce("x != 0 && y == x - 1", Some(r#"{"x": 10}"#), true).unwrap();
    assert_eq!(out, "y = 9");
}

#[test]
fn test_print() {
    assert_eq!(execute_print("((a + b)) * c", false).unwrap(), "(a + b) * c");
    assert_eq!(execute_print("a && !b", true).unwrap(), "a AND NOT(b)");
}

#[test]
fn test_vars() {
    assert_eq!(execute_vars("b + a * b", false).unwrap(), "a\nb");
    assert_eq!(execute_vars("b + a * b", true).unwrap(), "a 1\nb 2");
    assert_eq!(execute_vars("1 + 2", false).unwrap(), "");
}

#[test]
fn test_tokens() {
    let out = execute_tokens("max(x, 'a')").unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        [
            "0..3\tidentifier\tmax",
            "3..4\tbracket\t(",
            "4..5\tidentifier\tx",
            "5..6\toperator\t,",
            "7..10\tstring\t\"a\"",
            "10..11\tbracket\t)",
        ]
    );
    assert_eq!(execute_tokens("").unwrap(), "");
    assert!(matches!(execute_tokens("a @"), Err(CliError::Lex(_))));
}
