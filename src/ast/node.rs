use crate::ast::Span;
use crate::value::Value;

/// How an operator node was written in the source.
///
/// Only used for diagnostics: the printer re-derives the printed form from
/// the operator's name and arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// `name(a, b)`
    Call,
    /// `a + b`
    Infix,
    /// `-a`
    Prefix,
    /// `c ? a : b`
    Ternary,
    /// `[a, b]`
    Array,
    /// `a[i]`
    Indexer,
}

/// The three node variants of the expression tree.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Literal value
    ///
    /// The parser only produces booleans, numbers and strings. The reducer
    /// may fold any value into a literal.
    ///
    /// # Examples
    /// ```text
    /// 42
    /// "hello"
    /// true
    /// ```
    Literal(Value),

    /// Variable reference, resolved against the bindings
    ///
    /// # Examples
    /// ```text
    /// price
    /// _count
    /// ```
    Variable(String),

    /// Operator application
    ///
    /// Every operator form (infix, prefix, ternary, call, array literal and
    /// indexer) is represented by this one variant.
    ///
    /// # Examples
    /// ```text
    /// a + b        // Operator { name: "+", args: [a, b] }
    /// -a           // Operator { name: "-", args: [a] }
    /// c ? a : b    // Operator { name: "?:", args: [c, a, b] }
    /// max(a, b)    // Operator { name: "max", args: [a, b] }
    /// [a, b]       // Operator { name: "array", args: [a, b] }
    /// a[i]         // Operator { name: "[]", args: [a, i] }
    /// ```
    Operator {
        name: String,
        shape: Shape,
        args: Vec<Node>,
    },
}

/// A node of the expression tree together with its source span.
///
/// Equality is semantic: spans and shape tags are ignored.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Node { kind, span }
    }

    pub fn literal(value: impl Into<Value>, span: Span) -> Self {
        Node::new(NodeKind::Literal(value.into()), span)
    }

    pub fn variable(name: impl Into<String>, span: Span) -> Self {
        Node::new(NodeKind::Variable(name.into()), span)
    }

    pub fn operator(name: impl Into<String>, shape: Shape, args: Vec<Node>, span: Span) -> Self {
        Node::new(
            NodeKind::Operator {
                name: name.into(),
                shape,
                args,
            },
            span,
        )
    }

    /// The literal value, if this is a literal node.
    pub fn as_literal(&self) -> Option<&Value> {
        match &self.kind {
            NodeKind::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, NodeKind::Literal(_))
    }

    /// Operator name and arguments, if this is an operator node.
    pub fn as_operator(&self) -> Option<(&str, &[Node])> {
        match &self.kind {
            NodeKind::Operator { name, args, .. } => Some((name.as_str(), args.as_slice())),
            _ => None,
        }
    }

    /// Children of the node; empty for literals and variables.
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Operator { args, .. } => args,
            _ => &[],
        }
    }

    /// Number of nodes in the tree rooted here.
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(Node::size).sum::<usize>()
    }

    /// Returns the node with its span replaced.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

impl PartialEq for NodeKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NodeKind::Literal(a), NodeKind::Literal(b)) => a == b,
            (NodeKind::Variable(a), NodeKind::Variable(b)) => a == b,
            (
                NodeKind::Operator {
                    name: n1, args: a1, ..
                },
                NodeKind::Operator {
                    name: n2, args: a2, ..
                },
            ) => n1 == n2 && a1 == a2,
            _ => false,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}
