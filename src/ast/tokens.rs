use crate::ast::Span;

/// The kind and payload of a lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Field name, variable, function name or word operator
    ///
    /// Must start with a letter or underscore, followed by letters, digits,
    /// or underscores.
    ///
    /// # Examples
    /// ```text
    /// price
    /// item_count
    /// in
    /// ```
    Identifier(String),

    /// Number literal, always held as `f64`
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 3.14
    /// .5
    /// 0xFF
    /// ```
    Number(f64),

    /// String literal with escapes already decoded
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// 'it\'s'
    /// ```
    String(String),

    /// A run of operator characters, or a standalone comma
    ///
    /// # Examples
    /// ```text
    /// +
    /// **
    /// !=
    /// ,
    /// ```
    Operator(String),

    /// One of `( ) [ ] { }`
    Bracket(char),

    /// End of input
    End,
}

/// A token together with the bytes of input it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    pub fn is_end(&self) -> bool {
        matches!(self.kind, TokenKind::End)
    }

    /// True for an operator token spelled exactly `symbol`.
    pub fn is_operator(&self, symbol: &str) -> bool {
        matches!(&self.kind, TokenKind::Operator(s) if s == symbol)
    }

    pub fn is_bracket(&self, bracket: char) -> bool {
        matches!(self.kind, TokenKind::Bracket(c) if c == bracket)
    }

    /// Short human-readable description used in parse errors.
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Identifier(name) => format!("identifier '{}'", name),
            TokenKind::Number(n) => format!("number {}", n),
            TokenKind::String(s) => format!("string {:?}", s),
            TokenKind::Operator(op) => format!("operator '{}'", op),
            TokenKind::Bracket(c) => format!("'{}'", c),
            TokenKind::End => "end of input".to_string(),
        }
    }
}
