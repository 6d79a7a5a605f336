use std::io::Write;

use strand_lang_core::ast::{Expression, InfixKind, Statement};

use crate::environment::Environment;
use crate::value::{RuntimeError, Sequence, Value};

/// Execute one statement against the environment.  `print` output goes to
/// `out`, with no separators or implicit newlines.
pub fn execute_statement(
    statement: &Statement,
    environment: &mut Environment,
    out: &mut impl Write,
) -> Result<(), RuntimeError> {
    match statement {
        Statement::Print(expression) => {
            match eval_expression(expression, environment)? {
                Value::Int(value) => write!(out, "{}", value)?,
                // A sequence prints as a string: each element is one byte.
                Value::Seq(seq) => {
                    let bytes = seq
                        .to_vec()
                        .into_iter()
                        .map(|element| element as u8)
                        .collect::<Vec<_>>();
                    out.write_all(&bytes)?;
                }
            }
            Ok(())
        }
        Statement::Compound(statements) => {
            for statement in statements {
                execute_statement(statement, environment, out)?;
            }
            Ok(())
        }
        Statement::If { condition, body } => {
            if eval_condition(condition, environment)? != 0 {
                execute_statement(body, environment, out)?;
            }
            Ok(())
        }
        Statement::While { condition, body } => {
            // The condition is re-evaluated before every iteration,
            // including the first.
            while eval_condition(condition, environment)? != 0 {
                execute_statement(body, environment, out)?;
            }
            Ok(())
        }
        Statement::Push { target, value } => {
            let target = eval_expression(target, environment)?;
            let value = eval_expression(value, environment)?;
            match (target, value) {
                (Value::Seq(seq), Value::Int(value)) => {
                    seq.push(value);
                    Ok(())
                }
                _ => Err(RuntimeError::TypeMismatch),
            }
        }
        Statement::Assign {
            target,
            index: None,
            value,
        } => {
            // Moving the value into the environment transfers the handle:
            // assignment aliases a sequence, it never copies one.
            let value = eval_expression(value, environment)?;
            environment.set(target.name.clone(), value);
            Ok(())
        }
        Statement::Assign {
            target,
            index: Some(index),
            value,
        } => {
            let result = eval_expression(value, environment)?;
            let Value::Int(index) = eval_expression(index, environment)? else {
                return Err(RuntimeError::TypeMismatch);
            };
            let Value::Seq(seq) = environment.get(&target.name) else {
                return Err(RuntimeError::TypeMismatch);
            };
            if index < 0 || index as usize >= seq.len() {
                return Err(RuntimeError::IndexOutOfBounds);
            }
            let Value::Int(value) = result else {
                return Err(RuntimeError::TypeMismatch);
            };
            // In-place element update; no new alias is created.
            seq.set(index as usize, value);
            Ok(())
        }
    }
}

/// Evaluate an `if`/`while` condition, which must be an integer.
fn eval_condition(condition: &Expression, environment: &Environment) -> Result<i32, RuntimeError> {
    match eval_expression(condition, environment)? {
        Value::Int(value) => Ok(value),
        Value::Seq(_) => Err(RuntimeError::TypeMismatch),
    }
}

pub fn eval_expression(
    expression: &Expression,
    environment: &Environment,
) -> Result<Value, RuntimeError> {
    match expression {
        Expression::Literal(value) => Ok(Value::Int(*value)),
        Expression::Variable(identifier) => Ok(environment.get(&identifier.name)),
        Expression::Infix(kind, left, right) => {
            eval_infix_operation(*kind, left, right, environment)
        }
        Expression::Index(target, index) => {
            let target = eval_expression(target, environment)?;
            let index = eval_expression(index, environment)?;
            let Value::Seq(seq) = target else {
                return Err(RuntimeError::TypeMismatch);
            };
            let Value::Int(index) = index else {
                return Err(RuntimeError::TypeMismatch);
            };
            seq.get(index)
                .map(Value::Int)
                .ok_or(RuntimeError::IndexOutOfBounds)
        }
        Expression::SequenceLiteral(elements) => {
            let seq = Sequence::new();
            for element in elements {
                let Value::Int(value) = eval_expression(element, environment)? else {
                    return Err(RuntimeError::TypeMismatch);
                };
                seq.push(value);
            }
            Ok(Value::Seq(seq))
        }
        Expression::Len(expression) => match eval_expression(expression, environment)? {
            Value::Seq(seq) => Ok(Value::Int(seq.len() as i32)),
            Value::Int(_) => Err(RuntimeError::TypeMismatch),
        },
    }
}

fn eval_infix_operation(
    kind: InfixKind,
    left: &Expression,
    right: &Expression,
    environment: &Environment,
) -> Result<Value, RuntimeError> {
    // `&&` and `||` type-check and short-circuit on the left operand; the
    // decisive operand's value comes back unmodified, not normalized to
    // 0/1.  Everything else evaluates both operands up front.
    match kind {
        InfixKind::And => {
            let left = eval_int_operand(left, environment)?;
            if left == 0 {
                return Ok(Value::Int(left));
            }
            eval_int_operand(right, environment).map(Value::Int)
        }
        InfixKind::Or => {
            let left = eval_int_operand(left, environment)?;
            if left != 0 {
                return Ok(Value::Int(left));
            }
            eval_int_operand(right, environment).map(Value::Int)
        }
        _ => {
            let left = eval_expression(left, environment)?;
            let right = eval_expression(right, environment)?;
            eval_infix_values(kind, left, right)
        }
    }
}

fn eval_int_operand(
    expression: &Expression,
    environment: &Environment,
) -> Result<i32, RuntimeError> {
    match eval_expression(expression, environment)? {
        Value::Int(value) => Ok(value),
        Value::Seq(_) => Err(RuntimeError::TypeMismatch),
    }
}

fn eval_infix_values(kind: InfixKind, left: Value, right: Value) -> Result<Value, RuntimeError> {
    use InfixKind::*;
    match (kind, left, right) {
        (Plus, Value::Int(left), Value::Int(right)) => {
            Ok(Value::Int(left.wrapping_add(right)))
        }
        // `+` never errors on sequences: it concatenates, appending or
        // prepending a lone integer, always into a fresh sequence.
        (Plus, Value::Seq(left), Value::Seq(right)) => {
            let mut elements = left.to_vec();
            elements.extend(right.to_vec());
            Ok(Value::Seq(Sequence::from_elements(elements)))
        }
        (Plus, Value::Seq(left), Value::Int(right)) => {
            let mut elements = left.to_vec();
            elements.push(right);
            Ok(Value::Seq(Sequence::from_elements(elements)))
        }
        (Plus, Value::Int(left), Value::Seq(right)) => {
            let mut elements = vec![left];
            elements.extend(right.to_vec());
            Ok(Value::Seq(Sequence::from_elements(elements)))
        }
        (Minus, Value::Int(left), Value::Int(right)) => {
            Ok(Value::Int(left.wrapping_sub(right)))
        }
        (Multiply, Value::Int(left), Value::Int(right)) => {
            Ok(Value::Int(left.wrapping_mul(right)))
        }
        (Multiply, Value::Seq(seq), Value::Int(times))
        | (Multiply, Value::Int(times), Value::Seq(seq)) => Ok(Value::Seq(repeat(&seq, times))),
        (Divide, Value::Int(_), Value::Int(0)) => Err(RuntimeError::DivideByZero),
        (Divide, Value::Int(left), Value::Int(right)) => {
            Ok(Value::Int(left.wrapping_div(right)))
        }
        (LessThan, Value::Int(left), Value::Int(right)) => {
            Ok(Value::Int((left < right) as i32))
        }
        // Lexicographic: the first differing element decides; an exhausted
        // prefix makes the shorter sequence the lesser one.
        (LessThan, Value::Seq(left), Value::Seq(right)) => {
            Ok(Value::Int((left.to_vec() < right.to_vec()) as i32))
        }
        (Equal, Value::Int(left), Value::Int(right)) => Ok(Value::Int((left == right) as i32)),
        (Equal, Value::Seq(left), Value::Seq(right)) => {
            Ok(Value::Int((left.to_vec() == right.to_vec()) as i32))
        }
        // Mismatched tags compare unequal rather than failing.
        (Equal, _, _) => Ok(Value::Int(0)),
        _ => Err(RuntimeError::TypeMismatch),
    }
}

/// The elements of `seq`, repeated in order.  Zero or negative counts give
/// an empty sequence.
fn repeat(seq: &Sequence, times: i32) -> Sequence {
    let elements = seq.to_vec();
    let mut out = Vec::new();
    for _ in 0..times {
        out.extend_from_slice(&elements);
    }
    Sequence::from_elements(out)
}
