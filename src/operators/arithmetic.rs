//! Arithmetic operators. Binary forms evaluate left to right.

use crate::evaluator::{EvalContext, EvalResult};
use crate::operators::OperatorDefinition;
use crate::value::Value;

fn add_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    ctx.check_arg_range(1, Some(2))?;
    if ctx.arg_count() == 1 {
        return ctx.numeric_arg(0).map(Value::Number);
    }
    match (ctx.arg(0)?, ctx.arg(1)?) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
        (a, b) => Err(ctx.format_error(format!(
            "cannot add {} and {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

fn subtract_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    ctx.check_arg_range(1, Some(2))?;
    if ctx.arg_count() == 1 {
        return ctx.numeric_arg(0).map(|n| Value::Number(-n));
    }
    let a = ctx.numeric_arg(0)?;
    let b = ctx.numeric_arg(1)?;
    Ok(Value::Number(a - b))
}

fn multiply_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    ctx.check_arg_count(2)?;
    let a = ctx.numeric_arg(0)?;
    let b = ctx.numeric_arg(1)?;
    Ok(Value::Number(a * b))
}

fn divide_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    ctx.check_arg_count(2)?;
    let a = ctx.numeric_arg(0)?;
    let b = ctx.numeric_arg(1)?;
    Ok(Value::Number(a / b))
}

/// Integer remainder; the sign follows the dividend.
fn modulo_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    ctx.check_arg_count(2)?;
    let a = ctx.integer_arg(0)?;
    let b = ctx.integer_arg(1)?;
    match a.checked_rem(b) {
        Some(r) => Ok(Value::Number(r as f64)),
        None if b == 0 => Err(ctx.format_error("division by zero")),
        // i64::MIN % -1
        None => Ok(Value::Number(0.0)),
    }
}

fn power_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    ctx.check_arg_count(2)?;
    let base = ctx.numeric_arg(0)?;
    let exponent = ctx.numeric_arg(1)?;
    Ok(Value::Number(base.powf(exponent)))
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition { name: "+", eval_fn: add_eval },
        OperatorDefinition { name: "-", eval_fn: subtract_eval },
        OperatorDefinition { name: "*", eval_fn: multiply_eval },
        OperatorDefinition { name: "/", eval_fn: divide_eval },
        OperatorDefinition { name: "%", eval_fn: modulo_eval },
        OperatorDefinition { name: "**", eval_fn: power_eval },
    ]
}
