//! Bitwise operators on integral operands. Results are widened back to `f64`.

use crate::evaluator::{EvalContext, EvalResult};
use crate::operators::OperatorDefinition;
use crate::value::Value;

fn int_pair(ctx: &EvalContext<'_>) -> EvalResult<(i64, i64)> {
    ctx.check_arg_count(2)?;
    Ok((ctx.integer_arg(0)?, ctx.integer_arg(1)?))
}

fn shift_count(ctx: &EvalContext<'_>, count: i64) -> EvalResult<u32> {
    if count < 0 {
        return Err(ctx.format_error(format!("negative shift count {}", count)));
    }
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

fn bit_and_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    let (a, b) = int_pair(ctx)?;
    Ok(Value::Number((a & b) as f64))
}

fn bit_or_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    let (a, b) = int_pair(ctx)?;
    Ok(Value::Number((a | b) as f64))
}

fn bit_xor_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    let (a, b) = int_pair(ctx)?;
    Ok(Value::Number((a ^ b) as f64))
}

/// Shifts of 64 bits or more produce 0.
fn shift_left_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    let (a, b) = int_pair(ctx)?;
    let count = shift_count(ctx, b)?;
    let result = a.checked_shl(count).unwrap_or(0);
    Ok(Value::Number(result as f64))
}

/// Arithmetic shift; shifts of 64 bits or more fill with the sign bit.
fn shift_right_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    let (a, b) = int_pair(ctx)?;
    let count = shift_count(ctx, b)?;
    let result = a.checked_shr(count).unwrap_or(if a < 0 { -1 } else { 0 });
    Ok(Value::Number(result as f64))
}

fn bit_not_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    ctx.check_arg_count(1)?;
    let a = ctx.integer_arg(0)?;
    Ok(Value::Number(!a as f64))
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition { name: "&", eval_fn: bit_and_eval },
        OperatorDefinition { name: "|", eval_fn: bit_or_eval },
        OperatorDefinition { name: "^", eval_fn: bit_xor_eval },
        OperatorDefinition { name: "<<", eval_fn: shift_left_eval },
        OperatorDefinition { name: ">>", eval_fn: shift_right_eval },
        OperatorDefinition { name: "~", eval_fn: bit_not_eval },
    ]
}
