//! Free-variable queries over an expression tree.

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    ast::{Node, NodeKind},
    value::Value,
};

/// Names of all variables referenced by `node`.
///
/// Nested expressions held in literals (`Value::Expr`) are searched as well.
///
/// # Examples
///
/// ```
/// use infix_expr::{parse, vars};
///
/// let node = parse("x * x + max(y, 2)").unwrap();
/// let names: Vec<_> = vars(&node).into_iter().collect();
/// assert_eq!(names, ["x", "y"]);
/// ```
pub fn vars(node: &Node) -> BTreeSet<String> {
    vars_count(node).into_keys().collect()
}

/// Every referenced variable with the number of times it occurs.
pub fn vars_count(node: &Node) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    collect(node, &mut counts);
    counts
}

fn collect(node: &Node, counts: &mut BTreeMap<String, usize>) {
    match &node.kind {
        NodeKind::Variable(name) => {
            *counts.entry(name.clone()).or_insert(0) += 1;
        }
        NodeKind::Literal(value) => collect_value(value, counts),
        NodeKind::Operator { args, .. } => {
            for arg in args {
                collect(arg, counts);
            }
        }
    }
}

fn collect_value(value: &Value, counts: &mut BTreeMap<String, usize>) {
    match value {
        Value::Expr(inner) => collect(inner, counts),
        Value::Array(items) => {
            for item in items {
                collect_value(item, counts);
            }
        }
        _ => {}
    }
}
