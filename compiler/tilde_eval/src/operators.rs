//! Arithmetic and comparison on values.
//!
//! Integer `+ - * **` are checked; mixing an `Int` with a `Float` promotes
//! to `Float`; `/` always produces a `Float`. `Bool` is not a number.
//! Host objects get first refusal through their operator hooks.

use crate::errors::{binary_type_mismatch, unary_type_mismatch, EvalError, EvalResult};
use crate::Value;
use std::cmp::Ordering;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Eq,
    NotEq,
    Gt,
    GtEq,
    Lt,
    LtEq,
}

impl BinaryOp {
    pub const fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "**",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Pos,
    Neg,
    Abs,
}

impl UnaryOp {
    pub const fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Pos => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Abs => "abs",
        }
    }
}

/// Numeric view of a value.
#[derive(Copy, Clone)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn of(value: &Value) -> Option<Num> {
        match value {
            Value::Int(n) => Some(Num::Int(*n)),
            Value::Float(f) => Some(Num::Float(*f)),
            _ => None,
        }
    }

    #[allow(clippy::cast_precision_loss, reason = "int to float promotion")]
    fn to_f64(self) -> f64 {
        match self {
            Num::Int(n) => n as f64,
            Num::Float(f) => f,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Num::Int(n) => n == 0,
            Num::Float(f) => f == 0.0,
        }
    }
}

pub fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    if let Value::Host(object) = left {
        if let Some(result) = object.binary_op(op, right, false) {
            return result.map_err(EvalError::from);
        }
    }
    if let Value::Host(object) = right {
        if let Some(result) = object.binary_op(op, left, true) {
            return result.map_err(EvalError::from);
        }
    }

    match op {
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::NotEq => Ok(Value::Bool(left != right)),
        BinaryOp::Gt | BinaryOp::GtEq | BinaryOp::Lt | BinaryOp::LtEq => compare(op, left, right),
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => arithmetic(op, left, right, i64::checked_sub, |a, b| a - b),
        BinaryOp::Mul => arithmetic(op, left, right, i64::checked_mul, |a, b| a * b),
        BinaryOp::Div => divide(left, right),
        BinaryOp::Pow => power(left, right),
    }
}

pub fn evaluate_unary(op: UnaryOp, operand: &Value) -> EvalResult {
    if let Value::Host(object) = operand {
        if let Some(result) = object.unary_op(op) {
            return result.map_err(EvalError::from);
        }
    }

    let overflow = || EvalError::IntegerOverflow { op: op.symbol() };
    match (op, operand) {
        (UnaryOp::Pos, Value::Int(_) | Value::Float(_)) => Ok(operand.clone()),
        (UnaryOp::Neg, Value::Int(n)) => n.checked_neg().map(Value::Int).ok_or_else(overflow),
        (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Abs, Value::Int(n)) => n.checked_abs().map(Value::Int).ok_or_else(overflow),
        (UnaryOp::Abs, Value::Float(f)) => Ok(Value::Float(f.abs())),
        _ => Err(unary_type_mismatch(op.symbol(), operand)),
    }
}

fn add(left: &Value, right: &Value) -> EvalResult {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            Ok(Value::string(joined))
        }
        (Value::List(a), Value::List(b)) => {
            let mut joined = Vec::with_capacity(a.len() + b.len());
            joined.extend(a.iter().cloned());
            joined.extend(b.iter().cloned());
            Ok(Value::list(joined))
        }
        _ => arithmetic(BinaryOp::Add, left, right, i64::checked_add, |a, b| a + b),
    }
}

fn arithmetic(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> EvalResult {
    match (Num::of(left), Num::of(right)) {
        (Some(Num::Int(a)), Some(Num::Int(b))) => int_op(a, b)
            .map(Value::Int)
            .ok_or(EvalError::IntegerOverflow { op: op.symbol() }),
        (Some(a), Some(b)) => Ok(Value::Float(float_op(a.to_f64(), b.to_f64()))),
        _ => Err(binary_type_mismatch(op.symbol(), left, right)),
    }
}

fn divide(left: &Value, right: &Value) -> EvalResult {
    let (Some(a), Some(b)) = (Num::of(left), Num::of(right)) else {
        return Err(binary_type_mismatch("/", left, right));
    };
    if b.is_zero() {
        return Err(EvalError::DivisionByZero);
    }
    Ok(Value::Float(a.to_f64() / b.to_f64()))
}

fn power(left: &Value, right: &Value) -> EvalResult {
    let (Some(base), Some(exp)) = (Num::of(left), Num::of(right)) else {
        return Err(binary_type_mismatch("**", left, right));
    };
    if let (Num::Int(base), Num::Int(exp)) = (base, exp) {
        if exp >= 0 {
            return int_power(base, exp);
        }
    }
    if base.is_zero() && exp.to_f64() < 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    let result = base.to_f64().powf(exp.to_f64());
    if result.is_nan() && !base.to_f64().is_nan() && !exp.to_f64().is_nan() {
        return Err(EvalError::MathDomain { function: "**" });
    }
    Ok(Value::Float(result))
}

/// Non-negative integer power. Bases with magnitude at most one never
/// overflow, whatever the exponent.
fn int_power(base: i64, exp: i64) -> EvalResult {
    let result = match (base, u32::try_from(exp)) {
        _ if exp == 0 => Some(1),
        (0 | 1, _) => Some(base),
        (-1, _) => Some(if exp % 2 == 0 { 1 } else { -1 }),
        (_, Ok(exp)) => base.checked_pow(exp),
        (_, Err(_)) => None,
    };
    result
        .map(Value::Int)
        .ok_or(EvalError::IntegerOverflow { op: "**" })
}

fn compare(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Some(a.as_str().cmp(b.as_str())),
        _ => match (Num::of(left), Num::of(right)) {
            (Some(a), Some(b)) => a.to_f64().partial_cmp(&b.to_f64()),
            _ => return Err(binary_type_mismatch(op.symbol(), left, right)),
        },
    };
    // NaN compares false on every ordering.
    let Some(ordering) = ordering else {
        return Ok(Value::Bool(false));
    };
    let result = match op {
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::GtEq => ordering != Ordering::Less,
        BinaryOp::Lt => ordering == Ordering::Less,
        _ => ordering != Ordering::Greater,
    };
    Ok(Value::Bool(result))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests unwrap operator results")]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;

    fn binary(op: BinaryOp, left: impl Into<Value>, right: impl Into<Value>) -> EvalResult {
        evaluate_binary(op, &left.into(), &right.into())
    }

    fn float(result: EvalResult) -> f64 {
        match result.unwrap() {
            Value::Float(f) => f,
            other => panic!("expected a float, got {other:?}"),
        }
    }

    #[test]
    fn test_int_arithmetic_stays_int() {
        assert_eq!(binary(BinaryOp::Add, 2_i64, 3_i64).unwrap(), Value::Int(5_i64));
        assert_eq!(binary(BinaryOp::Sub, 2_i64, 3_i64).unwrap(), Value::Int(-1_i64));
        assert_eq!(binary(BinaryOp::Mul, 4_i64, 3_i64).unwrap(), Value::Int(12_i64));
        assert_eq!(binary(BinaryOp::Pow, 2_i64, 10_i64).unwrap(), Value::Int(1024));
    }

    #[test]
    fn test_mixed_arithmetic_promotes() {
        assert_eq!(float(binary(BinaryOp::Add, 1_i64, 0.5)), 1.5);
        assert_eq!(float(binary(BinaryOp::Mul, 2.0, 3_i64)), 6.0);
    }

    #[test]
    fn test_division_is_always_float() {
        assert_eq!(float(binary(BinaryOp::Div, 6_i64, 3_i64)), 2.0);
        assert_eq!(float(binary(BinaryOp::Div, 1_i64, 4_i64)), 0.25);
        let err = binary(BinaryOp::Div, 1_i64, 0_i64).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ZeroDivision);
        let err = binary(BinaryOp::Div, 1.0, 0.0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ZeroDivision);
    }

    #[test]
    fn test_negative_int_exponent_gives_float() {
        assert_eq!(float(binary(BinaryOp::Pow, 2_i64, -1_i64)), 0.5);
        assert_eq!(
            binary(BinaryOp::Pow, 0_i64, -1_i64).unwrap_err().kind(),
            ErrorKind::ZeroDivision
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = binary(BinaryOp::Add, i64::MAX, 1_i64).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
        let err = binary(BinaryOp::Pow, 10_i64, 40_i64).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
        let err = binary(BinaryOp::Pow, 2_i64, 5_000_000_000_i64).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
        let err = evaluate_unary(UnaryOp::Neg, &Value::Int(i64::MIN)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Overflow);
    }

    #[test]
    fn test_unit_bases_ignore_exponent_size() {
        let huge = 5_000_000_000_i64;
        assert_eq!(binary(BinaryOp::Pow, 1_i64, huge).unwrap(), Value::Int(1));
        assert_eq!(binary(BinaryOp::Pow, 0_i64, huge).unwrap(), Value::Int(0));
        assert_eq!(binary(BinaryOp::Pow, 0_i64, 0_i64).unwrap(), Value::Int(1));
        assert_eq!(binary(BinaryOp::Pow, -1_i64, huge).unwrap(), Value::Int(1));
        assert_eq!(binary(BinaryOp::Pow, -1_i64, huge + 1).unwrap(), Value::Int(-1));
    }

    #[test]
    fn test_concatenation() {
        assert_eq!(binary(BinaryOp::Add, "ab", "cd").unwrap(), Value::from("abcd"));
        let joined = binary(
            BinaryOp::Add,
            vec![Value::Int(1)],
            vec![Value::Int(2), Value::Int(3)],
        )
        .unwrap();
        assert_eq!(
            joined,
            Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
    }

    #[test]
    fn test_bool_is_not_numeric() {
        let err = binary(BinaryOp::Add, true, 1_i64).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported operand types for `+`: `bool` and `int`"
        );
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(binary(BinaryOp::Lt, 1_i64, 1.5).unwrap(), Value::Bool(true));
        assert_eq!(binary(BinaryOp::GtEq, 2_i64, 2_i64).unwrap(), Value::Bool(true));
        assert_eq!(binary(BinaryOp::Gt, "b", "a").unwrap(), Value::Bool(true));
        assert_eq!(binary(BinaryOp::Eq, 1_i64, 1.0).unwrap(), Value::Bool(true));
        assert_eq!(binary(BinaryOp::NotEq, "a", 1_i64).unwrap(), Value::Bool(true));
        assert_eq!(binary(BinaryOp::Lt, f64::NAN, 1_i64).unwrap(), Value::Bool(false));
        assert_eq!(
            binary(BinaryOp::Lt, "a", 1_i64).unwrap_err().kind(),
            ErrorKind::Type
        );
    }

    #[test]
    fn test_unary() {
        assert_eq!(evaluate_unary(UnaryOp::Neg, &Value::Int(3)).unwrap(), Value::Int(-3));
        assert_eq!(evaluate_unary(UnaryOp::Pos, &Value::Float(2.5)).unwrap(), Value::Float(2.5));
        assert_eq!(evaluate_unary(UnaryOp::Abs, &Value::Int(-4)).unwrap(), Value::Int(4));
        assert_eq!(
            evaluate_unary(UnaryOp::Neg, &Value::from("x")).unwrap_err().kind(),
            ErrorKind::Type
        );
    }
}
