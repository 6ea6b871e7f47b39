//! An embeddable infix expression language.
//!
//! Source text is [`parse`]d into a [`Node`] tree, which can be
//! [`evaluate`]d against variable [`Bindings`], partially evaluated with
//! [`reduce`], inspected with [`vars`], and printed back to text (in this
//! language or another dialect) with [`print`]. Operators live in an
//! [`OperatorTable`]; the evaluator knows nothing about any particular
//! operator.

pub mod ast;
pub mod evaluator;
pub mod lexer;
pub mod operators;
pub mod parser;
pub mod printer;
pub mod reducer;
pub mod value;
pub mod vars;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{Node, NodeKind, Shape, Span, Token, TokenKind};
pub use evaluator::{EvalContext, EvalError, EvalResult, evaluate};
pub use lexer::{LexError, Lexer, tokenize};
pub use operators::{Operator, OperatorTable};
pub use parser::{ParseError, Parser, parse, try_parse};
pub use printer::{PrintConfig, PrintError, Printer, print};
pub use reducer::{Optimizer, OptimizerTable, reduce};
pub use value::{Bindings, Opaque, Value};
pub use vars::{vars, vars_count};
