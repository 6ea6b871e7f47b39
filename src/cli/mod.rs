//! CLI support for infix-expr
//!
//! The `infix` binary is a thin clap front end over these functions, which
//! return the text to print so they can be driven from tests or other tools.

mod convert;
mod run;

pub use convert::{bindings_from_json, json_to_value, value_to_json};
pub use run::{execute_eval, execute_print, execute_reduce, execute_tokens, execute_vars};

use std::io;

use thiserror::Error;

use crate::{EvalError, LexError, ParseError, PrintError};

/// Errors that can occur during CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("parse error at line {line}, column {column}: {source}")]
    Parse {
        source: ParseError,
        line: usize,
        column: usize,
    },

    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),

    #[error("print error: {0}")]
    Print(#[from] PrintError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("bindings must be a JSON object")]
    BindingsNotObject,

    #[error("unsupported JSON {0} in bindings")]
    UnsupportedJson(&'static str),
}
