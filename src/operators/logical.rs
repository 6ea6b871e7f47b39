//! Logical and branching operators.
//!
//! These evaluate their first argument and only then decide which of the
//! remaining arguments, if any, to evaluate.

use crate::evaluator::{EvalContext, EvalResult};
use crate::operators::OperatorDefinition;
use crate::value::Value;

fn and_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    ctx.check_arg_count(2)?;
    if !ctx.boolean_arg(0)? {
        return Ok(Value::Boolean(false));
    }
    ctx.boolean_arg(1).map(Value::Boolean)
}

fn or_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    ctx.check_arg_count(2)?;
    if ctx.boolean_arg(0)? {
        return Ok(Value::Boolean(true));
    }
    ctx.boolean_arg(1).map(Value::Boolean)
}

fn not_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    ctx.check_arg_count(1)?;
    ctx.boolean_arg(0).map(|b| Value::Boolean(!b))
}

fn ternary_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    ctx.check_arg_count(3)?;
    if ctx.boolean_arg(0)? {
        ctx.arg(1)
    } else {
        ctx.arg(2)
    }
}

fn coalesce_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    ctx.check_arg_count(2)?;
    match ctx.arg(0)? {
        Value::Null => ctx.arg(1),
        value => Ok(value),
    }
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition { name: "&&", eval_fn: and_eval },
        OperatorDefinition { name: "||", eval_fn: or_eval },
        OperatorDefinition { name: "!", eval_fn: not_eval },
        OperatorDefinition { name: "?:", eval_fn: ternary_eval },
        OperatorDefinition { name: "??", eval_fn: coalesce_eval },
    ]
}
