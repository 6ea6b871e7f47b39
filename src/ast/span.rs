use std::fmt;

/// A byte range in the expression source.
///
/// Spans are stored as `(position, length)` pairs. Line and column numbers
/// are only computed when an error is rendered, via [`Span::line_col`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the first byte
    pub position: usize,
    /// Number of bytes covered
    pub length: usize,
}

impl Span {
    pub fn new(position: usize, length: usize) -> Self {
        Span { position, length }
    }

    /// Byte offset one past the last covered byte.
    pub fn end(&self) -> usize {
        self.position + self.length
    }

    /// Smallest span containing both `self` and `other`.
    pub fn cover(&self, other: Span) -> Span {
        let start = self.position.min(other.position);
        let end = self.end().max(other.end());
        Span::new(start, end - start)
    }

    /// Resolves the start of the span to a 1-based `(line, column)` pair.
    ///
    /// Columns count characters, not bytes. Offsets past the end of `source`
    /// resolve to the position just after the last character.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let mut line = 1;
        let mut column = 1;
        for (offset, ch) in source.char_indices() {
            if offset >= self.position {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        (line, column)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.position, self.end())
    }
}
