//! # Abstract Syntax Tree
//!
//! This module defines the tokens and tree nodes of the expression language,
//! a small infix language for arithmetic, boolean and string expressions.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[node]** - Tree nodes (literal, variable, operator)
//! - **[operators]** - The precedence table shared by parser and printer
//! - **[span]** - Byte ranges into the source text
//!
//! ## Quick Start
//!
//! ```text
//! x > 0 ? sqrt(x) : -x + 1
//! ```
//!
//! parses into a single `?:` operator node whose three arguments are the
//! condition and the two branches.
//!
//! ## Core Concepts
//!
//! ### Uniform operators
//!
//! There is exactly one node kind for operator application. Infix `a + b`,
//! prefix `-a`, the ternary, calls like `max(a, b)`, array literals `[a, b]`
//! and indexers `a[i]` all become [`NodeKind::Operator`] with a name and an
//! argument vector. The [`Shape`] tag only records how the operator was
//! written so that error messages can say "lhs of +" or "array item #2".
//!
//! ### Spans
//!
//! Every node carries the [`Span`] of source it was parsed from, covering
//! the whole subtree. Spans never take part in equality.
pub mod node;
pub mod operators;
pub mod span;
pub mod tokens;

pub use node::{Node, NodeKind, Shape};
pub use span::Span;
pub use tokens::{Token, TokenKind};
