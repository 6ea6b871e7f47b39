//! Turning expression trees back into source text.
//!
//! The printed form of an operator is chosen from its (possibly renamed)
//! name and its arity, never from the [`Shape`](crate::ast::Shape) it was
//! parsed with, so trees built by hand or by the reducer print the same way
//! as parsed ones. Parentheses are inserted only where the shared
//! precedence table requires them.
//!
//! # Examples
//!
//! ```
//! use infix_expr::{parse, print, PrintConfig};
//!
//! let node = parse("(x + y) * 2").unwrap();
//! assert_eq!(print(&node, &PrintConfig::default()).unwrap(), "(x + y) * 2");
//!
//! let node = parse("a == 'b' && !c").unwrap();
//! assert_eq!(print(&node, &PrintConfig::sql()).unwrap(), "a = 'b' AND NOT(c)");
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::ast::operators::{self, MAX_PRECEDENCE, PREFIX, TERNARY};
use crate::ast::{Node, NodeKind, Span};
use crate::lexer::OPERATOR_CHARS;
use crate::value::Value;

/// A literal that has no text form.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrintError {
    #[error("cannot print non-finite number {value} at {span}")]
    NonFinite { value: f64, span: Span },

    #[error("cannot print {kind} literal at {span}")]
    Unprintable { kind: &'static str, span: Span },
}

pub type PrintResult<T> = Result<T, PrintError>;

type Format<T> = Arc<dyn Fn(T) -> String + Send + Sync>;
type StrFormat = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// How literals, variables and operators are spelled.
///
/// The default configuration prints the language itself; [`PrintConfig::sql`]
/// is a preset for SQL `WHERE` clauses.
#[derive(Clone)]
pub struct PrintConfig {
    boolean: Format<bool>,
    number: Format<f64>,
    string: StrFormat,
    variable: StrFormat,
    renames: HashMap<String, String>,
    arity_renames: HashMap<(String, usize), String>,
    infix: HashSet<String>,
    precedence: HashMap<(String, usize), u8>,
    list_open: String,
    list_separator: String,
    list_close: String,
}

impl Default for PrintConfig {
    fn default() -> Self {
        PrintConfig {
            boolean: Arc::new(|b| b.to_string()),
            number: Arc::new(|n| n.to_string()),
            string: Arc::new(|s: &str| format!("\"{}\"", escape_string(s))),
            variable: Arc::new(|s: &str| s.to_string()),
            renames: HashMap::new(),
            arity_renames: HashMap::new(),
            infix: HashSet::new(),
            precedence: HashMap::new(),
            list_open: "[".to_string(),
            list_separator: ", ".to_string(),
            list_close: "]".to_string(),
        }
    }
}

impl PrintConfig {
    /// SQL dialect: keyword logic operators, `=` / `<>`, single-quoted
    /// strings and parenthesized lists.
    pub fn sql() -> Self {
        PrintConfig::default()
            .with_boolean_format(|b| String::from(if b { "TRUE" } else { "FALSE" }))
            .with_string_format(|s| format!("'{}'", s.replace('\'', "''")))
            .rename("&&", "AND")
            .rename("||", "OR")
            .rename("!", "NOT")
            .rename("in", "IN")
            .rename("==", "=")
            .rename("!=", "<>")
            .rename("**", "POWER")
            .rename("??", "COALESCE")
            .infix("AND")
            .infix("OR")
            .infix("IN")
            .list_delimiters("(", ", ", ")")
    }

    pub fn with_boolean_format(mut self, f: impl Fn(bool) -> String + Send + Sync + 'static) -> Self {
        self.boolean = Arc::new(f);
        self
    }

    /// Formatter for finite numbers. Non-finite numbers are always an error.
    pub fn with_number_format(mut self, f: impl Fn(f64) -> String + Send + Sync + 'static) -> Self {
        self.number = Arc::new(f);
        self
    }

    pub fn with_string_format(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.string = Arc::new(f);
        self
    }

    pub fn with_variable_mapper(mut self, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.variable = Arc::new(f);
        self
    }

    /// Prints operator `name` as `to`, whatever its arity.
    pub fn rename(mut self, name: impl Into<String>, to: impl Into<String>) -> Self {
        self.renames.insert(name.into(), to.into());
        self
    }

    /// Prints operator `name` as `to` when applied to `arity` operands.
    /// Takes priority over [`PrintConfig::rename`].
    pub fn rename_arity(mut self, name: impl Into<String>, arity: usize, to: impl Into<String>) -> Self {
        self.arity_renames.insert((name.into(), arity), to.into());
        self
    }

    /// Prints the binary operator with printed name `name` infix even though
    /// it is spelled with letters.
    pub fn infix(mut self, name: impl Into<String>) -> Self {
        self.infix.insert(name.into());
        self
    }

    /// Overrides the precedence of the operator printed as `name` with
    /// `arity` operands.
    pub fn precedence(mut self, name: impl Into<String>, arity: usize, precedence: u8) -> Self {
        self.precedence.insert((name.into(), arity), precedence);
        self
    }

    pub fn list_delimiters(
        mut self,
        open: impl Into<String>,
        separator: impl Into<String>,
        close: impl Into<String>,
    ) -> Self {
        self.list_open = open.into();
        self.list_separator = separator.into();
        self.list_close = close.into();
        self
    }

    fn printed_name<'n>(&'n self, name: &'n str, arity: usize) -> &'n str {
        if let Some(to) = self.arity_renames.get(&(name.to_string(), arity)) {
            return to;
        }
        self.renames.get(name).map(String::as_str).unwrap_or(name)
    }
}

impl fmt::Debug for PrintConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrintConfig")
            .field("renames", &self.renames)
            .field("arity_renames", &self.arity_renames)
            .field("infix", &self.infix)
            .field("precedence", &self.precedence)
            .field("list_open", &self.list_open)
            .field("list_separator", &self.list_separator)
            .field("list_close", &self.list_close)
            .finish_non_exhaustive()
    }
}

/// Printed form of an operator node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    List,
    Index,
    Infix,
    Prefix,
    Ternary,
    Call,
}

fn is_symbolic(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(|c| c.is_alphanumeric() || c == '_')
}

pub struct Printer<'a> {
    config: &'a PrintConfig,
}

impl<'a> Printer<'a> {
    pub fn new(config: &'a PrintConfig) -> Self {
        Printer { config }
    }

    pub fn print(&self, node: &Node) -> PrintResult<String> {
        self.print_node(node)
    }

    fn form(&self, printed: &str, arity: usize) -> Form {
        match (printed, arity) {
            ("array", _) => Form::List,
            ("[]", 2) => Form::Index,
            ("?:", 3) => Form::Ternary,
            (name, 2) if is_symbolic(name) || name == "in" || self.config.infix.contains(name) => {
                Form::Infix
            }
            (name, 1) if is_symbolic(name) => Form::Prefix,
            _ => Form::Call,
        }
    }

    /// Binding strength of `node` as printed, used to decide whether it
    /// needs parentheses inside its parent.
    fn precedence_of(&self, node: &Node) -> u8 {
        match &node.kind {
            NodeKind::Literal(value) => match value.as_float() {
                Some(n) if n.is_sign_negative() => PREFIX,
                _ => MAX_PRECEDENCE,
            },
            NodeKind::Variable(_) => MAX_PRECEDENCE,
            NodeKind::Operator { name, args, .. } => {
                let arity = args.len();
                let printed = self.config.printed_name(name, arity);
                let natural = match self.form(printed, arity) {
                    Form::List | Form::Index | Form::Call => return MAX_PRECEDENCE,
                    Form::Ternary => TERNARY,
                    Form::Prefix => PREFIX,
                    Form::Infix => operators::precedence(name, arity),
                };
                self.config
                    .precedence
                    .get(&(printed.to_string(), arity))
                    .copied()
                    .unwrap_or(natural)
            }
        }
    }

    fn print_node(&self, node: &Node) -> PrintResult<String> {
        match &node.kind {
            NodeKind::Literal(value) => self.print_value(value, node.span),
            NodeKind::Variable(name) => Ok((self.config.variable)(name)),
            NodeKind::Operator { name, args, .. } => {
                let printed = self.config.printed_name(name, args.len());
                match (self.form(printed, args.len()), args.as_slice()) {
                    (Form::List, items) => self.print_list(items.iter().map(|n| self.print_node(n))),
                    (Form::Index, [receiver, index]) => Ok(format!(
                        "{}[{}]",
                        self.wrap(receiver, |p| p < MAX_PRECEDENCE)?,
                        self.print_node(index)?
                    )),
                    (Form::Infix, [left, right]) => {
                        let own = self.precedence_of(node);
                        let (left, right) = if operators::is_right_associative(name) {
                            (self.wrap(left, |p| p <= own)?, self.wrap(right, |p| p < own)?)
                        } else {
                            (self.wrap(left, |p| p < own)?, self.wrap(right, |p| p <= own)?)
                        };
                        Ok(format!("{} {} {}", left, printed, right))
                    }
                    (Form::Prefix, [operand]) => self.print_prefix(node, printed, operand),
                    (Form::Ternary, [condition, then_branch, else_branch]) => Ok(format!(
                        "{} ? {} : {}",
                        self.wrap(condition, |p| p <= TERNARY)?,
                        self.wrap(then_branch, |p| p <= TERNARY)?,
                        self.wrap(else_branch, |p| p < TERNARY)?
                    )),
                    (_, args) => {
                        let args = args
                            .iter()
                            .map(|n| self.print_node(n))
                            .collect::<PrintResult<Vec<_>>>()?;
                        Ok(format!("{}({})", printed, args.join(", ")))
                    }
                }
            }
        }
    }

    /// Prints `operand` after a prefix operator. An operand that would lex
    /// together with the operator is parenthesized.
    fn print_prefix(&self, node: &Node, printed: &str, operand: &Node) -> PrintResult<String> {
        let own = self.precedence_of(node);
        let text = self.print_node(operand)?;
        let glued = text.starts_with(|c: char| OPERATOR_CHARS.contains(c));
        if glued || self.precedence_of(operand) < own {
            Ok(format!("{}({})", printed, text))
        } else {
            Ok(format!("{}{}", printed, text))
        }
    }

    fn wrap(&self, node: &Node, needs_parens: impl Fn(u8) -> bool) -> PrintResult<String> {
        let text = self.print_node(node)?;
        if needs_parens(self.precedence_of(node)) {
            Ok(format!("({})", text))
        } else {
            Ok(text)
        }
    }

    fn print_list(&self, items: impl Iterator<Item = PrintResult<String>>) -> PrintResult<String> {
        let items = items.collect::<PrintResult<Vec<_>>>()?;
        Ok(format!(
            "{}{}{}",
            self.config.list_open,
            items.join(&self.config.list_separator),
            self.config.list_close
        ))
    }

    fn print_value(&self, value: &Value, span: Span) -> PrintResult<String> {
        match value {
            Value::Boolean(b) => Ok((self.config.boolean)(*b)),
            Value::Number(_) | Value::Integer(_) | Value::Float32(_) => {
                let n = value.as_float().unwrap_or(f64::NAN);
                if !n.is_finite() {
                    return Err(PrintError::NonFinite { value: n, span });
                }
                Ok((self.config.number)(n))
            }
            Value::String(s) => Ok((self.config.string)(s)),
            Value::Array(items) => self.print_list(items.iter().map(|v| self.print_value(v, span))),
            Value::Null | Value::Opaque(_) | Value::Expr(_) => Err(PrintError::Unprintable {
                kind: value.type_name(),
                span,
            }),
        }
    }
}

/// Escapes backslashes, double quotes and line breaks for a double-quoted
/// string literal.
pub fn escape_string(s: &str) -> String {
    s.chars()
        .flat_map(|c| match c {
            '"' => vec!['\\', '"'],
            '\\' => vec!['\\', '\\'],
            '\n' => vec!['\\', 'n'],
            '\r' => vec!['\\', 'r'],
            c => vec![c],
        })
        .collect()
}

/// Prints `node` with `config`.
pub fn print(node: &Node, config: &PrintConfig) -> PrintResult<String> {
    Printer::new(config).print(node)
}

#[test]
fn test_escape_string() {
    assert_eq!(escape_string(r#"a"b\c"#), r#"a\"b\\c"#);
    assert_eq!(escape_string("line\r\nnext"), "line\\r\\nnext");
    assert_eq!(escape_string("tab\tkept"), "tab\tkept");
}

#[test]
fn test_symbolic_names() {
    assert!(is_symbolic("+"));
    assert!(is_symbolic("=~"));
    assert!(!is_symbolic("in"));
    assert!(!is_symbolic("max"));
    assert!(!is_symbolic(""));
}

#[test]
fn test_arity_rename_wins() {
    let config = PrintConfig::default().rename("-", "minus").rename_arity("-", 1, "neg");
    assert_eq!(config.printed_name("-", 1), "neg");
    assert_eq!(config.printed_name("-", 2), "minus");
    assert_eq!(config.printed_name("+", 2), "+");
}
