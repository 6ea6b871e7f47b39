use thiserror::Error;
use tracing::trace;

use crate::{
    ast::{
        Node, Shape, Span, Token, TokenKind,
        operators::{self, PREFIX, TERNARY},
    },
    lexer::{LexError, Lexer},
};

/// Errors produced while parsing an expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The lexer could not tokenize part of the input
    #[error(transparent)]
    Lex(#[from] LexError),

    /// A token that cannot start or continue an expression here
    #[error("unexpected {found} at position {position}")]
    UnexpectedToken { found: String, position: usize },

    /// Input ended where a value was expected
    #[error("unexpected end of input at position {position}")]
    UnexpectedEnd { position: usize },

    /// An opening bracket was never closed, or a closing one never opened
    #[error("unmatched bracket '{bracket}' at position {position}")]
    UnmatchedBracket { bracket: char, position: usize },

    /// A ternary `?` without its `:`
    #[error("expected ':' at position {position}")]
    ExpectedColon { position: usize },

    /// A complete expression followed by more input
    #[error("unexpected trailing {found} at position {position}")]
    TrailingInput { found: String, position: usize },

    /// Brackets, prefix operators or operator chains nested past [`MAX_DEPTH`]
    #[error("expression nested too deeply at position {position}")]
    TooDeep { position: usize },
}

impl ParseError {
    /// Byte offset in the source the error points at.
    pub fn position(&self) -> usize {
        match self {
            ParseError::Lex(e) => e.position,
            ParseError::UnexpectedToken { position, .. }
            | ParseError::UnexpectedEnd { position }
            | ParseError::UnmatchedBracket { position, .. }
            | ParseError::ExpectedColon { position }
            | ParseError::TrailingInput { position, .. }
            | ParseError::TooDeep { position } => *position,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Deepest nesting the parser accepts. Bounds both the parser's own
/// recursion and the height of every tree it returns, which keeps the
/// recursive passes over the tree within the stack.
pub const MAX_DEPTH: usize = 256;

/// A subtree and its height.
struct Parsed {
    node: Node,
    height: usize,
}

impl Parsed {
    fn leaf(node: Node) -> Self {
        Parsed { node, height: 1 }
    }
}

/// Precedence-climbing parser over a [`Lexer`].
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Parser { lexer, depth: 0 }
    }

    fn peek(&mut self) -> &Token {
        self.lexer.peek()
    }

    fn advance(&mut self) -> Token {
        self.lexer.next_token()
    }

    fn check_bracket(&mut self, bracket: char) -> bool {
        self.peek().is_bracket(bracket)
    }

    fn check_operator(&mut self, symbol: &str) -> bool {
        self.peek().is_operator(symbol)
    }

    /// Builds the error for an unexpected token, preferring the lexer's
    /// error when the token is the end marker it produced.
    fn unexpected(&mut self, token: &Token) -> ParseError {
        if let Some(err) = self.lexer.error() {
            return ParseError::Lex(err.clone());
        }
        match token.kind {
            TokenKind::End => ParseError::UnexpectedEnd {
                position: token.span.position,
            },
            _ => ParseError::UnexpectedToken {
                found: token.describe(),
                position: token.span.position,
            },
        }
    }

    fn unmatched(&mut self, bracket: char, position: usize) -> ParseError {
        if let Some(err) = self.lexer.error() {
            return ParseError::Lex(err.clone());
        }
        ParseError::UnmatchedBracket { bracket, position }
    }

    /// Consumes the closing bracket matching `open`, whose opening token
    /// started at `open_position`. Returns the closing token's span.
    fn expect_closing(&mut self, open: char, close: char, open_position: usize) -> ParseResult<Span> {
        if self.check_bracket(close) {
            Ok(self.advance().span)
        } else {
            Err(self.unmatched(open, open_position))
        }
    }

    /// Binary precedence of the next token, if it can continue an
    /// expression as an infix operator.
    fn peek_binary(&mut self) -> Option<(String, u8)> {
        match &self.peek().kind {
            TokenKind::Operator(op) if op != ":" && op != "," => {
                Some((op.clone(), operators::binary_precedence(op)))
            }
            TokenKind::Identifier(name) if name != "true" && name != "false" => {
                Some((name.clone(), operators::binary_precedence(name)))
            }
            _ => None,
        }
    }

    /// Runs `f` one nesting level deeper, failing once the parser is
    /// [`MAX_DEPTH`] levels down.
    fn descend<T>(&mut self, position: usize, f: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep { position });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Builds an operator node over `args`, enforcing the tree height limit.
    fn build(&self, name: String, shape: Shape, args: Vec<Parsed>, span: Span) -> ParseResult<Parsed> {
        let height = 1 + args.iter().map(|arg| arg.height).max().unwrap_or(0);
        if height > MAX_DEPTH {
            return Err(ParseError::TooDeep {
                position: span.position,
            });
        }
        let args = args.into_iter().map(|arg| arg.node).collect();
        Ok(Parsed {
            node: Node::operator(name, shape, args, span),
            height,
        })
    }

    /// Parse value expressions (atoms): literals, variables, calls,
    /// parenthesized expressions, array literals and prefix operators
    fn parse_value(&mut self) -> ParseResult<Parsed> {
        let position = self.peek().span.position;
        self.descend(position, Self::parse_value_inner)
    }

    fn parse_value_inner(&mut self) -> ParseResult<Parsed> {
        let token = self.advance();
        let span = token.span;

        match token.kind {
            TokenKind::Number(n) => Ok(Parsed::leaf(Node::literal(n, span))),
            TokenKind::String(s) => Ok(Parsed::leaf(Node::literal(s, span))),

            TokenKind::Identifier(name) => {
                if name == "true" {
                    Ok(Parsed::leaf(Node::literal(true, span)))
                } else if name == "false" {
                    Ok(Parsed::leaf(Node::literal(false, span)))
                } else if self.check_bracket('(') {
                    let open = self.advance().span;
                    let (args, end) = self.parse_args('(', ')', open.position)?;
                    self.build(name, Shape::Call, args, span.cover(end))
                } else {
                    Ok(Parsed::leaf(Node::variable(name, span)))
                }
            }

            TokenKind::Bracket('(') => {
                let inner = self.expression(TERNARY)?;
                let end = self.expect_closing('(', ')', span.position)?;
                Ok(Parsed {
                    node: inner.node.with_span(span.cover(end)),
                    height: inner.height,
                })
            }

            TokenKind::Bracket('[') => {
                let (args, end) = self.parse_args('[', ']', span.position)?;
                self.build("array".to_string(), Shape::Array, args, span.cover(end))
            }

            TokenKind::Operator(op) if op != "," && op != ":" => {
                let operand = self.parse_indexer()?;
                let operand = self.parse_binary(operand, PREFIX)?;
                let full = span.cover(operand.node.span);
                self.build(op, Shape::Prefix, vec![operand], full)
            }

            _ => Err(self.unexpected(&token)),
        }
    }

    /// Parse a comma-separated list up to the `close` bracket. The opening
    /// bracket has already been consumed. Trailing commas are allowed.
    fn parse_args(&mut self, open: char, close: char, open_position: usize) -> ParseResult<(Vec<Parsed>, Span)> {
        let mut args = vec![];

        loop {
            if self.check_bracket(close) {
                let end = self.advance().span;
                return Ok((args, end));
            }
            if self.peek().is_end() {
                return Err(self.unmatched(open, open_position));
            }

            args.push(self.expression(operators::COMMA + 1)?);

            if self.check_operator(",") {
                self.advance();
            } else if !self.check_bracket(close) {
                return Err(self.unmatched(open, open_position));
            }
        }
    }

    /// Parse a value followed by any number of `[index]` groups
    fn parse_indexer(&mut self) -> ParseResult<Parsed> {
        let mut node = self.parse_value()?;

        while self.check_bracket('[') {
            let open = self.advance().span;
            let index = self.descend(open.position, |p| p.expression(TERNARY))?;
            let end = self.expect_closing('[', ']', open.position)?;
            let span = node.node.span.cover(end);
            node = self.build("[]".to_string(), Shape::Indexer, vec![node, index], span)?;
        }
        Ok(node)
    }

    /// Fold infix operators onto `left` while their precedence is at least
    /// `min_precedence`.
    fn parse_binary(&mut self, mut left: Parsed, min_precedence: u8) -> ParseResult<Parsed> {
        while let Some((op, precedence)) = self.peek_binary() {
            if precedence < min_precedence {
                break;
            }
            let position = self.advance().span.position;

            if op == "?" {
                left = self.descend(position, |p| p.parse_ternary(left))?;
                continue;
            }

            let mut right = self.parse_indexer()?;
            while let Some((next, next_precedence)) = self.peek_binary() {
                let climbs = next_precedence > precedence
                    || (next_precedence == precedence && operators::is_right_associative(&next));
                if !climbs {
                    break;
                }
                let position = self.peek().span.position;
                right = self.descend(position, |p| p.parse_binary(right, next_precedence))?;
            }

            let span = left.node.span.cover(right.node.span);
            left = self.build(op, Shape::Infix, vec![left, right], span)?;
        }
        Ok(left)
    }

    /// Parse the branches of `condition ? then : else`; the `?` has been
    /// consumed.
    fn parse_ternary(&mut self, condition: Parsed) -> ParseResult<Parsed> {
        let then_branch = self.expression(TERNARY + 1)?;

        if !self.check_operator(":") {
            if let Some(err) = self.lexer.error() {
                return Err(ParseError::Lex(err.clone()));
            }
            let position = self.peek().span.position;
            return Err(ParseError::ExpectedColon { position });
        }
        self.advance();

        let else_branch = self.expression(TERNARY)?;
        let span = condition.node.span.cover(else_branch.node.span);
        self.build(
            "?:".to_string(),
            Shape::Ternary,
            vec![condition, then_branch, else_branch],
            span,
        )
    }

    fn expression(&mut self, min_precedence: u8) -> ParseResult<Parsed> {
        let left = self.parse_indexer()?;
        self.parse_binary(left, min_precedence)
    }

    /// Parse an expression whose infix operators all bind at least as
    /// tightly as `min_precedence`.
    pub fn parse_expression(&mut self, min_precedence: u8) -> ParseResult<Node> {
        Ok(self.expression(min_precedence)?.node)
    }

    /// Parse a complete expression; the whole input must be consumed.
    pub fn parse(&mut self) -> ParseResult<Node> {
        trace!(source = self.lexer.source(), "parse");
        let node = self.parse_expression(TERNARY)?;

        let token = self.advance();
        if let Some(err) = self.lexer.error() {
            return Err(ParseError::Lex(err.clone()));
        }
        match token.kind {
            TokenKind::End => {
                trace!(nodes = node.size(), "parsed");
                Ok(node)
            }
            TokenKind::Bracket(bracket @ (')' | ']' | '}')) => Err(ParseError::UnmatchedBracket {
                bracket,
                position: token.span.position,
            }),
            _ => Err(ParseError::TrailingInput {
                found: token.describe(),
                position: token.span.position,
            }),
        }
    }
}

/// Parses `source` into an expression tree.
///
/// # Examples
///
/// ```
/// use infix_expr::{parse, NodeKind};
///
/// let node = parse("x + y * 2").unwrap();
/// assert!(matches!(node.kind, NodeKind::Operator { ref name, .. } if name == "+"));
/// assert!(parse("(1 + 2(").is_err());
/// ```
pub fn parse(source: &str) -> ParseResult<Node> {
    Parser::new(Lexer::new(source)).parse()
}

/// Parses `source`, falling back to a string literal of the whole input when
/// it is not a valid expression.
pub fn try_parse(source: &str) -> Node {
    match parse(source) {
        Ok(node) => node,
        Err(err) => {
            trace!(%err, "falling back to a string literal");
            Node::literal(source, Span::new(0, source.len()))
        }
    }
}
