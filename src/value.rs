use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::ast::Node;

/// Variable bindings supplied at evaluation or reduction time.
///
/// Names are matched exactly and case-sensitively.
pub type Bindings = HashMap<String, Value>;

/// A value flowing through evaluation.
///
/// The evaluator computes with [`Value::Number`] only. Host numbers of every
/// other width enter through the [`From`] impls as [`Value::Integer`] or
/// [`Value::Float32`] and are widened to `f64` when first read (see
/// [`Value::widen`]).
///
/// # Examples
///
/// ```
/// use infix_expr::Value;
///
/// let flag = Value::from(true);
/// let count = Value::from(3u8);
/// let ratio = Value::from(0.5);
/// let name = Value::from("widget");
/// let items = Value::from(vec![1, 2, 3]);
///
/// assert_eq!(count.widen(), Value::Number(3.0));
/// assert_eq!(items.widen(), Value::Array(vec![1.0.into(), 2.0.into(), 3.0.into()]));
/// # let _ = (flag, ratio, name);
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// Absence of a value; what `??` falls through on
    Null,

    /// Boolean (true/false)
    Boolean(bool),

    /// Double-precision number, the only numeric type operators see
    Number(f64),

    /// Host integer of any width, widened to `Number` on first read
    Integer(i128),

    /// Host single-precision float, widened to `Number` on first read
    Float32(f32),

    /// UTF-8 string
    String(String),

    /// Ordered sequence (homogeneous or heterogeneous)
    Array(Vec<Value>),

    /// Host value the language does not inspect
    Opaque(Opaque),

    /// Pre-parsed expression, evaluated in place of the variable bound to it
    Expr(Arc<Node>),
}

/// An opaque host value. Two opaque values are equal only when they are the
/// same allocation.
#[derive(Clone)]
pub struct Opaque(pub Arc<dyn Any + Send + Sync>);

impl Opaque {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Opaque(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Opaque({:p})", Arc::as_ptr(&self.0))
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            (Boolean(a), Boolean(b)) => a == b,
            (Number(a), Number(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            (Float32(a), Float32(b)) => a == b,
            (String(a), String(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            (Opaque(a), Opaque(b)) => a == b,
            (Expr(a), Expr(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Converts host numbers to `Number`, recursing into arrays.
    ///
    /// Integers too large for `f64` lose precision the same way an `as`
    /// cast does. Every other variant is returned unchanged.
    pub fn widen(self) -> Value {
        match self {
            Value::Integer(n) => Value::Number(n as f64),
            Value::Float32(n) => Value::Number(n as f64),
            Value::Array(items) => Value::Array(items.into_iter().map(Value::widen).collect()),
            other => other,
        }
    }

    /// Human-readable kind name, used in type errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) | Value::Integer(_) | Value::Float32(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Opaque(_) => "opaque",
            Value::Expr(_) => "expression",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as float, widening host numbers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Integer(n) => Some(*n as f64),
            Value::Float32(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float32(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Opaque(o) => write!(f, "{:?}", o),
            Value::Expr(_) => write!(f, "<expression>"),
        }
    }
}

macro_rules! from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Integer(n as i128)
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl From<u128> for Value {
    fn from(n: u128) -> Self {
        match i128::try_from(n) {
            Ok(n) => Value::Integer(n),
            Err(_) => Value::Number(n as f64),
        }
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float32(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Expr(Arc::new(node))
    }
}

impl From<Opaque> for Value {
    fn from(o: Opaque) -> Self {
        Value::Opaque(o)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
