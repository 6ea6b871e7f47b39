use std::collections::HashSet;

use thiserror::Error;
use tracing::trace;

use crate::{
    ast::{Node, NodeKind, Shape, Span},
    operators::OperatorTable,
    value::{Bindings, Value},
    vars::vars,
};

/// Errors that can occur during evaluation.
///
/// Failures inside an operator's arguments are wrapped in
/// [`EvalError::Argument`], once per level, so the rendered message reads
/// from the outermost operator inwards.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Variable name not present in the bindings
    #[error("variable undefined: {name} at {span}")]
    UndefinedVariable { name: String, span: Span },

    /// Operator name not present in the operator table
    #[error("operator undefined: {name} at {span}")]
    UndefinedOperator { name: String, span: Span },

    /// Variable bound to an expression that refers back to the variable
    #[error("variable {name} references itself at {span}")]
    SelfReference { name: String, span: Span },

    /// Operator called with the wrong number of arguments
    #[error("{name} expects {expected} arguments, got {got}")]
    Arity {
        name: String,
        expected: String,
        got: usize,
        span: Span,
    },

    /// Argument of the wrong kind
    #[error("expected {expected}, got {found}")]
    Type { expected: &'static str, found: String },

    /// Domain error raised by an operator via [`EvalContext::format_error`]
    #[error("{name}: {message} at {span}")]
    Operator {
        name: String,
        span: Span,
        message: String,
    },

    /// Failure while evaluating one argument of an operator
    #[error("{label} at {span}: {source}")]
    Argument {
        label: String,
        span: Span,
        source: Box<EvalError>,
    },
}

impl EvalError {
    /// The innermost error, with every [`EvalError::Argument`] layer removed.
    pub fn root_cause(&self) -> &EvalError {
        match self {
            EvalError::Argument { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type EvalResult<T> = Result<T, EvalError>;

/// The argument source handed to an operator for one invocation.
///
/// Operators never see the tree directly. Each call to [`EvalContext::arg`]
/// evaluates the corresponding subtree, so an operator decides which of its
/// arguments are evaluated and in what order.
pub struct EvalContext<'a> {
    name: &'a str,
    shape: Shape,
    args: &'a [Node],
    span: Span,
    bindings: &'a Bindings,
    operators: &'a OperatorTable,
}

impl<'a> EvalContext<'a> {
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Evaluates argument `index`.
    ///
    /// Host numbers are widened to `f64`. Failures are labeled with the
    /// argument's role ("lhs of +", "array item #2", ...) and its span.
    pub fn arg(&self, index: usize) -> EvalResult<Value> {
        let node = self.args.get(index).ok_or_else(|| {
            self.format_error(format!("missing {}", self.label(index)))
        })?;
        eval_node(node, self.bindings, self.operators)
            .map(Value::widen)
            .map_err(|err| EvalError::Argument {
                label: self.label(index),
                span: node.span,
                source: Box::new(err),
            })
    }

    pub fn boolean_arg(&self, index: usize) -> EvalResult<bool> {
        match self.arg(index)? {
            Value::Boolean(b) => Ok(b),
            other => Err(self.type_error(index, "boolean", other.type_name())),
        }
    }

    pub fn numeric_arg(&self, index: usize) -> EvalResult<f64> {
        match self.arg(index)? {
            Value::Number(n) => Ok(n),
            other => Err(self.type_error(index, "number", other.type_name())),
        }
    }

    /// A number with no fractional part that fits in an `i64`.
    pub fn integer_arg(&self, index: usize) -> EvalResult<i64> {
        const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63

        let n = self.numeric_arg(index)?;
        if !n.is_finite() || n.fract() != 0.0 {
            return Err(self.type_error(index, "integer", "non-integral number"));
        }
        if !(-LIMIT..LIMIT).contains(&n) {
            return Err(self.type_error(index, "integer", "out-of-range number"));
        }
        Ok(n as i64)
    }

    pub fn string_arg(&self, index: usize) -> EvalResult<String> {
        match self.arg(index)? {
            Value::String(s) => Ok(s),
            other => Err(self.type_error(index, "string", other.type_name())),
        }
    }

    pub fn sequence_arg(&self, index: usize) -> EvalResult<Vec<Value>> {
        match self.arg(index)? {
            Value::Array(items) => Ok(items),
            other => Err(self.type_error(index, "sequence", other.type_name())),
        }
    }

    pub fn check_arg_count(&self, expected: usize) -> EvalResult<()> {
        if self.args.len() != expected {
            return Err(self.arity_error(expected.to_string()));
        }
        Ok(())
    }

    /// Accepts between `min` and `max` arguments; `None` means no upper bound.
    pub fn check_arg_range(&self, min: usize, max: Option<usize>) -> EvalResult<()> {
        let count = self.args.len();
        let ok = count >= min && max.is_none_or(|max| count <= max);
        if ok {
            return Ok(());
        }
        let expected = match max {
            Some(max) if max == min => min.to_string(),
            Some(max) => format!("{} to {}", min, max),
            None => format!("at least {}", min),
        };
        Err(self.arity_error(expected))
    }

    /// An error tagged with this operator's name and span.
    pub fn format_error(&self, message: impl Into<String>) -> EvalError {
        EvalError::Operator {
            name: self.name.to_string(),
            span: self.span,
            message: message.into(),
        }
    }

    fn arity_error(&self, expected: String) -> EvalError {
        EvalError::Arity {
            name: self.name.to_string(),
            expected,
            got: self.args.len(),
            span: self.span,
        }
    }

    fn type_error(&self, index: usize, expected: &'static str, found: &str) -> EvalError {
        let span = self.args.get(index).map(|n| n.span).unwrap_or(self.span);
        EvalError::Argument {
            label: self.label(index),
            span,
            source: Box::new(EvalError::Type {
                expected,
                found: found.to_string(),
            }),
        }
    }

    /// Role of argument `index`, derived from the shape the operator was
    /// written in.
    fn label(&self, index: usize) -> String {
        match (self.shape, index) {
            (Shape::Infix, 0) => format!("lhs of {}", self.name),
            (Shape::Infix, _) => format!("rhs of {}", self.name),
            (Shape::Prefix, _) => format!("operand of {}", self.name),
            (Shape::Ternary, 0) => "ternary condition".to_string(),
            (Shape::Ternary, 1) => "ternary then-branch".to_string(),
            (Shape::Ternary, _) => "ternary else-branch".to_string(),
            (Shape::Array, i) => format!("array item #{}", i + 1),
            (Shape::Indexer, 0) => "indexed value".to_string(),
            (Shape::Indexer, _) => "index".to_string(),
            (Shape::Call, i) => format!("argument #{} of {}", i + 1, self.name),
        }
    }
}

/// Evaluates `node` against `bindings`, dispatching operators through
/// `operators`.
///
/// # Examples
///
/// ```
/// use infix_expr::{evaluate, parse, Bindings, OperatorTable, Value};
///
/// let node = parse("x + y * z ** 2").unwrap();
/// let mut bindings = Bindings::new();
/// bindings.insert("x".into(), Value::from(-1));
/// bindings.insert("y".into(), Value::from(3));
/// bindings.insert("z".into(), Value::from(5));
///
/// let result = evaluate(&node, &bindings, &OperatorTable::builtin()).unwrap();
/// assert_eq!(result, Value::Number(74.0));
/// ```
pub fn evaluate(node: &Node, bindings: &Bindings, operators: &OperatorTable) -> EvalResult<Value> {
    eval_node(node, bindings, operators).map(Value::widen)
}

fn eval_node(node: &Node, bindings: &Bindings, operators: &OperatorTable) -> EvalResult<Value> {
    match &node.kind {
        NodeKind::Literal(value) => Ok(value.clone()),

        NodeKind::Variable(name) => match bindings.get(name) {
            None => Err(EvalError::UndefinedVariable {
                name: name.clone(),
                span: node.span,
            }),
            Some(Value::Expr(inner)) => {
                if references(name, inner, bindings, &mut HashSet::new()) {
                    return Err(EvalError::SelfReference {
                        name: name.clone(),
                        span: node.span,
                    });
                }
                eval_node(inner, bindings, operators)
            }
            Some(value) => Ok(value.clone().widen()),
        },

        NodeKind::Operator { name, shape, args } => {
            let operator = operators.get(name).ok_or_else(|| EvalError::UndefinedOperator {
                name: name.clone(),
                span: node.span,
            })?;
            trace!(operator = name.as_str(), args = args.len(), "dispatch");
            let ctx = EvalContext {
                name,
                shape: *shape,
                args,
                span: node.span,
                bindings,
                operators,
            };
            operator(&ctx)
        }
    }
}

/// True when `node`, or any expression bound to a variable it mentions,
/// mentions `name`.
pub(crate) fn references(
    name: &str,
    node: &Node,
    bindings: &Bindings,
    seen: &mut HashSet<String>,
) -> bool {
    for var in vars(node) {
        if var == name {
            return true;
        }
        if !seen.insert(var.clone()) {
            continue;
        }
        if let Some(Value::Expr(inner)) = bindings.get(&var)
            && references(name, inner, bindings, seen)
        {
            return true;
        }
    }
    false
}
