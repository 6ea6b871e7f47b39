//! Partial evaluation.
//!
//! [`reduce`] substitutes the variables it knows, folds every operator whose
//! arguments are all literals, and hands whatever remains to the optimizer
//! registered for the operator's name.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::ast::{Node, NodeKind, Shape};
use crate::evaluator::{evaluate, references};
use crate::operators::OperatorTable;
use crate::value::{Bindings, Value};

/// A rewrite applied to an operator node the reducer could not fold.
pub type Optimizer = Arc<dyn Fn(Node) -> Node + Send + Sync>;

/// Map of operator name -> optimizer.
#[derive(Clone, Default)]
pub struct OptimizerTable {
    optimizers: HashMap<String, Optimizer>,
}

impl OptimizerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity and absorption rules for `&& || + - * / ?:`.
    pub fn builtin() -> Self {
        let mut table = OptimizerTable::new();
        table
            .insert("&&", optimize_and)
            .insert("||", optimize_or)
            .insert("+", optimize_add)
            .insert("-", optimize_subtract)
            .insert("*", optimize_multiply)
            .insert("/", optimize_divide)
            .insert("?:", optimize_ternary);
        table
    }

    pub fn insert<F>(&mut self, name: impl Into<String>, optimizer: F) -> &mut Self
    where
        F: Fn(Node) -> Node + Send + Sync + 'static,
    {
        self.optimizers.insert(name.into(), Arc::new(optimizer));
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Optimizer> {
        self.optimizers.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Optimizer> {
        self.optimizers.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.optimizers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for OptimizerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptimizerTable")
            .field("optimizers", &self.names())
            .finish()
    }
}

/// Reduces `node` as far as `partial` allows.
///
/// Reduction never fails: an operator whose evaluation errors on literal
/// arguments is kept as an operator node, so the error surfaces when the
/// result is evaluated.
///
/// # Examples
///
/// ```
/// use infix_expr::{parse, print, reduce, Bindings, OperatorTable, OptimizerTable, PrintConfig, Value};
///
/// let node = parse("x != 0 && y == x - 1").unwrap();
/// let mut partial = Bindings::new();
/// partial.insert("x".into(), Value::from(10));
///
/// let reduced = reduce(&node, &partial, &OperatorTable::builtin(), &OptimizerTable::builtin());
/// assert_eq!(print(&reduced, &PrintConfig::default()).unwrap(), "y == 9");
/// ```
pub fn reduce(
    node: &Node,
    partial: &Bindings,
    operators: &OperatorTable,
    optimizers: &OptimizerTable,
) -> Node {
    match &node.kind {
        NodeKind::Literal(_) => node.clone(),

        NodeKind::Variable(name) => match partial.get(name) {
            None => node.clone(),
            Some(Value::Expr(inner)) => {
                if references(name, inner, partial, &mut HashSet::new()) {
                    debug!(variable = name.as_str(), "self-referential binding left in place");
                    return node.clone();
                }
                reduce(inner, partial, operators, optimizers)
            }
            Some(value) => Node::literal(value.clone().widen(), node.span),
        },

        NodeKind::Operator { name, shape, args } => {
            let args: Vec<Node> = args
                .iter()
                .map(|arg| reduce(arg, partial, operators, optimizers))
                .collect();
            let rebuilt = Node::operator(name.clone(), *shape, args, node.span);

            if rebuilt.children().iter().all(Node::is_literal) && operators.contains(name) {
                match evaluate(&rebuilt, &Bindings::new(), operators) {
                    Ok(value) => {
                        debug!(operator = name.as_str(), "folded");
                        return Node::literal(value, node.span);
                    }
                    Err(err) => {
                        debug!(operator = name.as_str(), error = %err, "fold failed");
                        return rebuilt;
                    }
                }
            }

            match optimizers.get(name) {
                Some(optimizer) => {
                    let optimized = optimizer(rebuilt);
                    debug!(operator = name.as_str(), "optimizer applied");
                    optimized
                }
                None => rebuilt,
            }
        }
    }
}

fn literal_bool(node: &Node) -> Option<bool> {
    node.as_literal().and_then(Value::as_bool)
}

fn literal_number(node: &Node) -> Option<f64> {
    match node.as_literal() {
        Some(Value::Number(n)) => Some(*n),
        _ => None,
    }
}

fn binary_operands(node: &Node) -> Option<(&Node, &Node)> {
    match node.children() {
        [left, right] => Some((left, right)),
        _ => None,
    }
}

fn optimize_and(node: Node) -> Node {
    let Some((left, right)) = binary_operands(&node) else {
        return node;
    };
    match (literal_bool(left), literal_bool(right)) {
        (Some(false), _) => left.clone(),
        (_, Some(false)) => right.clone(),
        (Some(true), _) => right.clone(),
        (_, Some(true)) => left.clone(),
        _ => node,
    }
}

fn optimize_or(node: Node) -> Node {
    let Some((left, right)) = binary_operands(&node) else {
        return node;
    };
    match (literal_bool(left), literal_bool(right)) {
        (Some(true), _) => left.clone(),
        (_, Some(true)) => right.clone(),
        (Some(false), _) => right.clone(),
        (_, Some(false)) => left.clone(),
        _ => node,
    }
}

fn optimize_add(node: Node) -> Node {
    let Some((left, right)) = binary_operands(&node) else {
        return node;
    };
    match (literal_number(left), literal_number(right)) {
        (Some(n), _) if n == 0.0 => right.clone(),
        (_, Some(n)) if n == 0.0 => left.clone(),
        _ => node,
    }
}

fn optimize_subtract(node: Node) -> Node {
    let Some((left, right)) = binary_operands(&node) else {
        return node;
    };
    match (literal_number(left), literal_number(right)) {
        (Some(n), _) if n == 0.0 => {
            let span = node.span;
            Node::operator("-", Shape::Prefix, vec![right.clone()], span)
        }
        (_, Some(n)) if n == 0.0 => left.clone(),
        _ => node,
    }
}

fn optimize_multiply(node: Node) -> Node {
    let Some((left, right)) = binary_operands(&node) else {
        return node;
    };
    match (literal_number(left), literal_number(right)) {
        (Some(n), _) if n == 0.0 => left.clone(),
        (_, Some(n)) if n == 0.0 => right.clone(),
        (Some(n), _) if n == 1.0 => right.clone(),
        (_, Some(n)) if n == 1.0 => left.clone(),
        _ => node,
    }
}

fn optimize_divide(node: Node) -> Node {
    let Some((left, right)) = binary_operands(&node) else {
        return node;
    };
    match literal_number(right) {
        Some(n) if n == 1.0 => left.clone(),
        _ => node,
    }
}

fn optimize_ternary(node: Node) -> Node {
    let NodeKind::Operator { args, .. } = &node.kind else {
        return node;
    };
    if args.len() != 3 {
        return node;
    }
    match literal_bool(&args[0]) {
        Some(true) => args[1].clone(),
        Some(false) => args[2].clone(),
        None => node,
    }
}
