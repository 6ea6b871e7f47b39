use thiserror::Error;

use crate::ast::{Span, Token, TokenKind};

/// Characters that make up operator tokens.
pub(crate) const OPERATOR_CHARS: &str = "~!#$%^&*-+|\\=:./?<>";

/// No token rule matched at `position`.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("unexpected character '{found}' at position {position}")]
pub struct LexError {
    pub position: usize,
    pub found: char,
}

impl LexError {
    pub fn span(&self) -> Span {
        Span::new(self.position, self.found.len_utf8())
    }
}

/// Splits expression source into tokens on demand.
///
/// The lexer never fails outright: when no rule matches, it records a
/// [`LexError`] and from then on reports end of input at that offset. The
/// parser checks [`Lexer::error`] once it stops.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    peeked: Option<Token>,
    error: Option<LexError>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            position: 0,
            peeked: None,
            error: None,
        }
    }

    /// The source text being scanned.
    pub fn source(&self) -> &'a str {
        self.input
    }

    /// Looks at the next token without consuming it.
    pub fn peek(&mut self) -> &Token {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.scan(),
        };
        self.peeked.insert(token)
    }

    /// Consumes the next token. Once the end is reached, keeps returning it.
    pub fn next_token(&mut self) -> Token {
        match self.peeked.take() {
            Some(token) => token,
            None => self.scan(),
        }
    }

    /// The error that stopped the scan, if a suffix of input was not
    /// tokenizable.
    pub fn error(&self) -> Option<&LexError> {
        self.error.as_ref()
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input[self.position..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let start = self.position;
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
        self.input[start..self.position].to_string()
    }

    fn read_hex(&mut self) -> Option<f64> {
        let rest = &self.input[self.position..];
        if !rest.starts_with("0x") {
            return None;
        }
        let digits: &str = {
            let tail = &rest[2..];
            let len = tail
                .find(|c: char| !c.is_ascii_hexdigit())
                .unwrap_or(tail.len());
            &tail[..len]
        };
        if digits.is_empty() {
            return None;
        }
        // Accumulate in f64 so arbitrarily long literals don't overflow.
        let value = digits
            .chars()
            .filter_map(|c| c.to_digit(16))
            .fold(0.0f64, |acc, d| acc * 16.0 + d as f64);
        self.position += 2 + digits.len();
        Some(value)
    }

    fn read_number(&mut self) -> Option<f64> {
        let start = self.position;

        while self.current_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.current_char() == Some('.')
            && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.advance();
            while self.current_char().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        if self.position == start {
            return None;
        }
        // Digits with at most one interior '.', so parsing cannot fail.
        self.input[start..self.position].parse::<f64>().ok()
    }

    /// Reads a quoted string. Returns `None` and leaves the position
    /// untouched when the closing quote is missing.
    fn read_string(&mut self, quote: char) -> Option<String> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    return Some(result);
                }
                '\\' => {
                    self.advance(); // Consume backslash
                    match self.current_char() {
                        Some('n') => result.push('\n'),
                        Some('t') => result.push('\t'),
                        Some('r') => result.push('\r'),
                        Some(other) => result.push(other),
                        None => break,
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        self.position = start;
        None
    }

    fn read_operator(&mut self) -> String {
        let start = self.position;
        while self.current_char().is_some_and(|c| OPERATOR_CHARS.contains(c)) {
            self.advance();
        }
        self.input[start..self.position].to_string()
    }

    fn scan(&mut self) -> Token {
        if self.error.is_some() {
            return Token::new(TokenKind::End, Span::new(self.position, 0));
        }

        self.skip_whitespace();
        let start = self.position;

        let kind = match self.current_char() {
            None => TokenKind::End,
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                TokenKind::Identifier(self.read_identifier())
            }
            Some(ch) if ch.is_ascii_digit() || ch == '.' => {
                if let Some(n) = self.read_hex().or_else(|| self.read_number()) {
                    TokenKind::Number(n)
                } else {
                    // A lone '.' is an operator.
                    TokenKind::Operator(self.read_operator())
                }
            }
            Some(quote @ ('"' | '\'')) => match self.read_string(quote) {
                Some(s) => TokenKind::String(s),
                None => return self.fail(quote),
            },
            Some(bracket @ ('(' | ')' | '[' | ']' | '{' | '}')) => {
                self.advance();
                TokenKind::Bracket(bracket)
            }
            Some(',') => {
                self.advance();
                TokenKind::Operator(",".to_string())
            }
            Some(ch) if OPERATOR_CHARS.contains(ch) => {
                TokenKind::Operator(self.read_operator())
            }
            Some(ch) => return self.fail(ch),
        };

        Token::new(kind, Span::new(start, self.position - start))
    }

    fn fail(&mut self, found: char) -> Token {
        self.error = Some(LexError {
            position: self.position,
            found,
        });
        Token::new(TokenKind::End, Span::new(self.position, 0))
    }
}

/// Scans the whole input, returning every token up to and including the end
/// token.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.is_end();
        tokens.push(token);
        if done {
            break;
        }
    }
    match lexer.error() {
        Some(err) => Err(err.clone()),
        None => Ok(tokens),
    }
}

#[test]
fn test_peek_is_idempotent() {
    let mut lexer = Lexer::new("a + b");
    let first = lexer.peek().clone();
    assert_eq!(lexer.peek(), &first);
    assert_eq!(lexer.next_token(), first);
    assert_eq!(lexer.next_token().kind, TokenKind::Operator("+".into()));
}

#[test]
fn test_end_repeats() {
    let mut lexer = Lexer::new("x");
    assert_eq!(lexer.next_token().kind, TokenKind::Identifier("x".into()));
    assert!(lexer.next_token().is_end());
    assert!(lexer.next_token().is_end());
    assert!(lexer.error().is_none());
}

#[test]
fn test_error_after_exhaust() {
    let mut lexer = Lexer::new("a @ b");
    assert_eq!(lexer.next_token().kind, TokenKind::Identifier("a".into()));
    let end = lexer.next_token();
    assert!(end.is_end());
    assert_eq!(end.span.position, 2);
    assert_eq!(lexer.error().map(|e| e.position), Some(2));
    assert!(lexer.next_token().is_end());
}
