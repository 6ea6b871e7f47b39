//! Operator precedence, shared by the parser and the printer.

/// Separator inside calls and array literals (`,`).
pub const COMMA: u8 = 0;
/// Ternary conditional (`?:`, and the `?` / `:` tokens that spell it).
pub const TERNARY: u8 = 1;
/// Null-coalescing (`??`).
pub const COALESCE: u8 = 2;
/// Logical OR (`||`).
pub const OR: u8 = 3;
/// Logical AND (`&&`).
pub const AND: u8 = 4;
/// Comparison, regex match and membership.
pub const COMPARISON: u8 = 5;
/// Any binary operator not listed elsewhere.
pub const DEFAULT_BINARY: u8 = 6;
/// Bitwise operators and shifts.
pub const BITWISE: u8 = 7;
/// `+` and `-`.
pub const ADDITIVE: u8 = 8;
/// `*`, `/` and `%`.
pub const MULTIPLICATIVE: u8 = 9;
/// Every operator used in prefix position.
pub const PREFIX: u8 = 10;
/// Exponentiation (`**`).
pub const POWER: u8 = 11;
/// Atoms: literals, variables, calls, array literals and indexers.
pub const MAX_PRECEDENCE: u8 = u8::MAX;

/// Precedence of operator `name` applied to `arity` operands.
///
/// Unary use always gets [`PREFIX`]; ternary `?:` gets [`TERNARY`]; binary
/// operators are looked up in the table and fall back to
/// [`DEFAULT_BINARY`]. Any other arity is printed as a call and has
/// [`MAX_PRECEDENCE`].
pub fn precedence(name: &str, arity: usize) -> u8 {
    match arity {
        1 => PREFIX,
        2 => binary_precedence(name),
        3 if name == "?:" => TERNARY,
        _ => MAX_PRECEDENCE,
    }
}

/// Precedence of `name` in binary (infix) position.
pub fn binary_precedence(name: &str) -> u8 {
    match name {
        "**" => POWER,
        "*" | "/" | "%" => MULTIPLICATIVE,
        "+" | "-" => ADDITIVE,
        "&" | "|" | "^" | "<<" | ">>" => BITWISE,
        "==" | "!=" | ">" | "<" | ">=" | "<=" | "=~" | "!~" | "in" => COMPARISON,
        "&&" => AND,
        "||" => OR,
        "??" => COALESCE,
        "?:" | "?" | ":" => TERNARY,
        "," => COMMA,
        _ => DEFAULT_BINARY,
    }
}

/// Operators that group right-to-left when chained.
pub fn is_right_associative(name: &str) -> bool {
    name == "**"
}

#[test]
fn test_table_ordering() {
    assert!(precedence("**", 2) > precedence("-", 1));
    assert!(precedence("-", 1) > precedence("*", 2));
    assert!(precedence("*", 2) > precedence("+", 2));
    assert!(precedence("+", 2) > precedence("<<", 2));
    assert!(precedence("<<", 2) > precedence("foo", 2));
    assert!(precedence("foo", 2) > precedence("in", 2));
    assert!(precedence("==", 2) > precedence("&&", 2));
    assert!(precedence("&&", 2) > precedence("||", 2));
    assert!(precedence("||", 2) > precedence("??", 2));
    assert!(precedence("??", 2) > precedence("?:", 3));
    assert!(precedence("?", 2) > precedence(",", 2));
}

#[test]
fn test_non_operator_arities() {
    assert_eq!(precedence("max", 0), MAX_PRECEDENCE);
    assert_eq!(precedence("max", 4), MAX_PRECEDENCE);
    assert_eq!(precedence("clamp", 3), MAX_PRECEDENCE);
}
