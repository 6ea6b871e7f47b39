//! The subcommands, each returning its output as text.

use super::{CliError, bindings_from_json, value_to_json};
use crate::{
    Bindings, Node, OperatorTable, OptimizerTable, PrintConfig, Span, TokenKind, evaluate, parse,
    print, reduce, tokenize, vars, vars_count,
};

fn parse_source(expression: &str) -> Result<Node, CliError> {
    parse(expression).map_err(|source| {
        let (line, column) = Span::new(source.position(), 0).line_col(expression);
        CliError::Parse {
            source,
            line,
            column,
        }
    })
}

fn load_bindings(bindings: Option<&str>) -> Result<Bindings, CliError> {
    match bindings {
        Some(json) if !json.trim().is_empty() => bindings_from_json(json),
        _ => Ok(Bindings::new()),
    }
}

fn print_config(sql: bool) -> PrintConfig {
    if sql {
        PrintConfig::sql()
    } else {
        PrintConfig::default()
    }
}

/// Evaluates `expression` with the built-in operators; the result is JSON.
pub fn execute_eval(expression: &str, bindings: Option<&str>) -> Result<String, CliError> {
    let node = parse_source(expression)?;
    let bindings = load_bindings(bindings)?;
    let value = evaluate(&node, &bindings, &OperatorTable::builtin())?;
    Ok(value_to_json(value).to_string())
}

/// Reduces `expression` against the (partial) bindings and prints the result.
pub fn execute_reduce(expression: &str, bindings: Option<&str>, sql: bool) -> Result<String, CliError> {
    let node = parse_source(expression)?;
    let partial = load_bindings(bindings)?;
    let reduced = reduce(
        &node,
        &partial,
        &OperatorTable::builtin(),
        &OptimizerTable::builtin(),
    );
    Ok(print(&reduced, &print_config(sql))?)
}

pub fn execute_print(expression: &str, sql: bool) -> Result<String, CliError> {
    let node = parse_source(expression)?;
    Ok(print(&node, &print_config(sql))?)
}

/// One variable per line, sorted; with `count`, each followed by its number
/// of occurrences.
pub fn execute_vars(expression: &str, count: bool) -> Result<String, CliError> {
    let node = parse_source(expression)?;
    let lines: Vec<String> = if count {
        vars_count(&node)
            .into_iter()
            .map(|(name, n)| format!("{} {}", name, n))
            .collect()
    } else {
        vars(&node).into_iter().collect()
    };
    Ok(lines.join("\n"))
}

/// One token per line: span, kind and text. The end token is omitted.
pub fn execute_tokens(expression: &str) -> Result<String, CliError> {
    let lines: Vec<String> = tokenize(expression)?
        .iter()
        .filter_map(|token| {
            let (kind, text) = match &token.kind {
                TokenKind::Identifier(name) => ("identifier", name.clone()),
                TokenKind::Number(n) => ("number", n.to_string()),
                TokenKind::String(s) => ("string", format!("{:?}", s)),
                TokenKind::Operator(op) => ("operator", op.clone()),
                TokenKind::Bracket(c) => ("bracket", c.to_string()),
                TokenKind::End => return None,
            };
            Some(format!("{}\t{}\t{}", token.span, kind, text))
        })
        .collect();
    Ok(lines.join("\n"))
}
