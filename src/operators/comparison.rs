//! Comparison and regex-match operators.

use regex::Regex;

use crate::evaluator::{EvalContext, EvalResult};
use crate::operators::OperatorDefinition;
use crate::value::Value;

/// Equal only when both values have the same kind and equal content.
fn eq_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    ctx.check_arg_count(2)?;
    let left = ctx.arg(0)?;
    let right = ctx.arg(1)?;
    Ok(Value::Boolean(left == right))
}

fn ne_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    ctx.check_arg_count(2)?;
    let left = ctx.arg(0)?;
    let right = ctx.arg(1)?;
    Ok(Value::Boolean(left != right))
}

fn numeric_pair(ctx: &EvalContext<'_>) -> EvalResult<(f64, f64)> {
    ctx.check_arg_count(2)?;
    Ok((ctx.numeric_arg(0)?, ctx.numeric_arg(1)?))
}

fn gt_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    let (a, b) = numeric_pair(ctx)?;
    Ok(Value::Boolean(a > b))
}

fn ge_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    let (a, b) = numeric_pair(ctx)?;
    Ok(Value::Boolean(a >= b))
}

fn lt_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    let (a, b) = numeric_pair(ctx)?;
    Ok(Value::Boolean(a < b))
}

fn le_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    let (a, b) = numeric_pair(ctx)?;
    Ok(Value::Boolean(a <= b))
}

fn is_match(ctx: &EvalContext<'_>) -> EvalResult<bool> {
    ctx.check_arg_count(2)?;
    let subject = ctx.string_arg(0)?;
    let pattern = ctx.string_arg(1)?;
    let re = Regex::new(&pattern)
        .map_err(|e| ctx.format_error(format!("invalid regex: {e}")))?;
    Ok(re.is_match(&subject))
}

fn match_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    is_match(ctx).map(Value::Boolean)
}

fn not_match_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    is_match(ctx).map(|m| Value::Boolean(!m))
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition { name: "==", eval_fn: eq_eval },
        OperatorDefinition { name: "!=", eval_fn: ne_eval },
        OperatorDefinition { name: ">", eval_fn: gt_eval },
        OperatorDefinition { name: ">=", eval_fn: ge_eval },
        OperatorDefinition { name: "<", eval_fn: lt_eval },
        OperatorDefinition { name: "<=", eval_fn: le_eval },
        OperatorDefinition { name: "=~", eval_fn: match_eval },
        OperatorDefinition { name: "!~", eval_fn: not_match_eval },
    ]
}
