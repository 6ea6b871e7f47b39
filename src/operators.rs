//! The operator table and the built-in operator library.
//!
//! From the evaluator's point of view an operator is an opaque callable that
//! receives an [`EvalContext`] and returns a value. The built-ins below are
//! ordinary entries in that table; callers can replace or extend them.

pub mod arithmetic;
pub mod bitwise;
pub mod comparison;
pub mod logical;
pub mod math;
pub mod sequence;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::evaluator::{EvalContext, EvalResult};
use crate::value::Value;

/// A callable operator.
pub type Operator = Arc<dyn Fn(&EvalContext<'_>) -> EvalResult<Value> + Send + Sync>;

/// Signature of the built-in operator functions.
pub type EvalFn = fn(&EvalContext<'_>) -> EvalResult<Value>;

/// A built-in operator: its name in the table and its function.
pub struct OperatorDefinition {
    pub name: &'static str,
    pub eval_fn: EvalFn,
}

/// Map of operator name -> callable.
#[derive(Clone, Default)]
pub struct OperatorTable {
    operators: HashMap<String, Operator>,
}

impl OperatorTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in library: comparison, logic, arithmetic, bitwise,
    /// branching, sequences and numeric functions.
    pub fn builtin() -> Self {
        let mut table = OperatorTable::new();
        let groups = [
            arithmetic::operators(),
            bitwise::operators(),
            comparison::operators(),
            logical::operators(),
            math::operators(),
            sequence::operators(),
        ];
        for def in groups.into_iter().flatten() {
            table.insert(def.name, def.eval_fn);
        }
        table
    }

    /// Registers `operator` under `name`, replacing any previous entry.
    pub fn insert<F>(&mut self, name: impl Into<String>, operator: F) -> &mut Self
    where
        F: Fn(&EvalContext<'_>) -> EvalResult<Value> + Send + Sync + 'static,
    {
        self.operators.insert(name.into(), Arc::new(operator));
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Operator> {
        self.operators.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Operator> {
        self.operators.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operators.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.operators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for OperatorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorTable")
            .field("operators", &self.names())
            .finish()
    }
}
