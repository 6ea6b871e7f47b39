//! Numeric functions.

use crate::evaluator::{EvalContext, EvalResult};
use crate::operators::OperatorDefinition;
use crate::value::Value;

fn unary(ctx: &EvalContext<'_>, f: fn(f64) -> f64) -> EvalResult<Value> {
    ctx.check_arg_count(1)?;
    ctx.numeric_arg(0).map(|n| Value::Number(f(n)))
}

fn floor_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    unary(ctx, f64::floor)
}

fn ceil_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    unary(ctx, f64::ceil)
}

/// Rounds half away from zero.
fn round_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    unary(ctx, f64::round)
}

fn sqrt_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    unary(ctx, f64::sqrt)
}

fn sin_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    unary(ctx, f64::sin)
}

fn cos_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    unary(ctx, f64::cos)
}

fn abs_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    unary(ctx, f64::abs)
}

fn fold(ctx: &EvalContext<'_>, pick: fn(f64, f64) -> f64) -> EvalResult<Value> {
    ctx.check_arg_range(1, None)?;
    let mut acc = ctx.numeric_arg(0)?;
    for i in 1..ctx.arg_count() {
        acc = pick(acc, ctx.numeric_arg(i)?);
    }
    Ok(Value::Number(acc))
}

fn max_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    fold(ctx, f64::max)
}

fn min_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    fold(ctx, f64::min)
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition { name: "floor", eval_fn: floor_eval },
        OperatorDefinition { name: "ceil", eval_fn: ceil_eval },
        OperatorDefinition { name: "round", eval_fn: round_eval },
        OperatorDefinition { name: "sqrt", eval_fn: sqrt_eval },
        OperatorDefinition { name: "sin", eval_fn: sin_eval },
        OperatorDefinition { name: "cos", eval_fn: cos_eval },
        OperatorDefinition { name: "abs", eval_fn: abs_eval },
        OperatorDefinition { name: "max", eval_fn: max_eval },
        OperatorDefinition { name: "min", eval_fn: min_eval },
    ]
}
