//! Array construction, membership and indexing.

use crate::evaluator::{EvalContext, EvalResult};
use crate::operators::OperatorDefinition;
use crate::value::Value;

fn array_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    let items = (0..ctx.arg_count())
        .map(|i| ctx.arg(i))
        .collect::<EvalResult<Vec<_>>>()?;
    Ok(Value::Array(items))
}

/// Linear scan comparing with value equality.
fn in_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    ctx.check_arg_count(2)?;
    let needle = ctx.arg(0)?;
    let haystack = ctx.sequence_arg(1)?;
    Ok(Value::Boolean(haystack.contains(&needle)))
}

fn index_eval(ctx: &EvalContext<'_>) -> EvalResult<Value> {
    ctx.check_arg_count(2)?;
    let items = ctx.sequence_arg(0)?;
    let index = ctx.integer_arg(1)?;
    usize::try_from(index)
        .ok()
        .and_then(|i| items.get(i).cloned())
        .ok_or_else(|| {
            ctx.format_error(format!(
                "index {} out of range for sequence of length {}",
                index,
                items.len()
            ))
        })
}

pub fn operators() -> Vec<OperatorDefinition> {
    vec![
        OperatorDefinition { name: "array", eval_fn: array_eval },
        OperatorDefinition { name: "in", eval_fn: in_eval },
        OperatorDefinition { name: "[]", eval_fn: index_eval },
    ]
}
