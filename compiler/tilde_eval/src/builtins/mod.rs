//! The builtin table.
//!
//! Operators reach the evaluator as calls to these names (`a + b` is
//! `+(a, b)`), so one table covers operators and functions alike. The root
//! scope of every interpreter binds each name to its `Value::Builtin`.
//!
//! `and`, `or` and `not` see their arguments unevaluated and are handled by
//! the interpreter's call path; everything else is applied here to
//! already-evaluated arguments.


use crate::errors::{argument_type, EvalError, EvalResult};
use crate::operators::{evaluate_binary, evaluate_unary, BinaryOp, UnaryOp};
use crate::Value;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    Or,
    And,
    Not,
    Eq,
    NotEq,
    Gt,
    GtEq,
    Lt,
    LtEq,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Sqrt,
    Exp,
    Sin,
    Cos,
    Tan,
    Sinh,
    Cosh,
    Tanh,
    Len,
    Abs,
    Union,
}

impl Builtin {
    pub const ALL: [Builtin; 25] = [
        Builtin::Or,
        Builtin::And,
        Builtin::Not,
        Builtin::Eq,
        Builtin::NotEq,
        Builtin::Gt,
        Builtin::GtEq,
        Builtin::Lt,
        Builtin::LtEq,
        Builtin::Add,
        Builtin::Sub,
        Builtin::Mul,
        Builtin::Div,
        Builtin::Pow,
        Builtin::Sqrt,
        Builtin::Exp,
        Builtin::Sin,
        Builtin::Cos,
        Builtin::Tan,
        Builtin::Sinh,
        Builtin::Cosh,
        Builtin::Tanh,
        Builtin::Len,
        Builtin::Abs,
        Builtin::Union,
    ];

    /// Name the builtin is bound to.
    pub const fn name(self) -> &'static str {
        match self {
            Builtin::Or => "or",
            Builtin::And => "and",
            Builtin::Not => "not",
            Builtin::Eq => "==",
            Builtin::NotEq => "!=",
            Builtin::Gt => ">",
            Builtin::GtEq => ">=",
            Builtin::Lt => "<",
            Builtin::LtEq => "<=",
            Builtin::Add => "+",
            Builtin::Sub => "-",
            Builtin::Mul => "*",
            Builtin::Div => "/",
            Builtin::Pow => "**",
            Builtin::Sqrt => "sqrt",
            Builtin::Exp => "exp",
            Builtin::Sin => "sin",
            Builtin::Cos => "cos",
            Builtin::Tan => "tan",
            Builtin::Sinh => "sinh",
            Builtin::Cosh => "cosh",
            Builtin::Tanh => "tanh",
            Builtin::Len => "len",
            Builtin::Abs => "abs",
            Builtin::Union => "union",
        }
    }

    /// Whether the builtin controls evaluation of its own arguments.
    #[inline]
    pub const fn is_lazy(self) -> bool {
        matches!(self, Builtin::And | Builtin::Or | Builtin::Not)
    }
}

/// Apply an eager builtin to evaluated arguments.
pub fn apply(builtin: Builtin, args: &[Value]) -> EvalResult {
    match builtin {
        Builtin::Eq => binary(builtin, BinaryOp::Eq, args),
        Builtin::NotEq => binary(builtin, BinaryOp::NotEq, args),
        Builtin::Gt => binary(builtin, BinaryOp::Gt, args),
        Builtin::GtEq => binary(builtin, BinaryOp::GtEq, args),
        Builtin::Lt => binary(builtin, BinaryOp::Lt, args),
        Builtin::LtEq => binary(builtin, BinaryOp::LtEq, args),
        Builtin::Mul => binary(builtin, BinaryOp::Mul, args),
        Builtin::Div => binary(builtin, BinaryOp::Div, args),
        Builtin::Pow => binary(builtin, BinaryOp::Pow, args),
        Builtin::Add => match args {
            [operand] => evaluate_unary(UnaryOp::Pos, operand),
            [left, right] => evaluate_binary(BinaryOp::Add, left, right),
            _ => Err(arity(builtin, "1 or 2", args.len())),
        },
        Builtin::Sub => match args {
            [operand] => evaluate_unary(UnaryOp::Neg, operand),
            [left, right] => evaluate_binary(BinaryOp::Sub, left, right),
            _ => Err(arity(builtin, "1 or 2", args.len())),
        },
        Builtin::Sqrt => {
            let x = number(builtin, args)?;
            if x < 0.0 {
                return Err(EvalError::MathDomain { function: "sqrt" });
            }
            Ok(Value::Float(x.sqrt()))
        }
        Builtin::Exp => number(builtin, args).map(|x| Value::Float(x.exp())),
        Builtin::Sin => number(builtin, args).map(|x| Value::Float(x.sin())),
        Builtin::Cos => number(builtin, args).map(|x| Value::Float(x.cos())),
        Builtin::Tan => number(builtin, args).map(|x| Value::Float(x.tan())),
        Builtin::Sinh => number(builtin, args).map(|x| Value::Float(x.sinh())),
        Builtin::Cosh => number(builtin, args).map(|x| Value::Float(x.cosh())),
        Builtin::Tanh => number(builtin, args).map(|x| Value::Float(x.tanh())),
        Builtin::Abs => {
            let [operand] = args else {
                return Err(arity(builtin, "1", args.len()));
            };
            evaluate_unary(UnaryOp::Abs, operand)
        }
        Builtin::Len => {
            let [operand] = args else {
                return Err(arity(builtin, "1", args.len()));
            };
            len(operand)
        }
        Builtin::Union => union(args),
        Builtin::And | Builtin::Or | Builtin::Not => Err(EvalError::NotCallable {
            type_name: format!("lazy builtin `{}`", builtin.name()),
        }),
    }
}

#[cold]
pub(crate) fn arity(builtin: Builtin, expected: &'static str, got: usize) -> EvalError {
    EvalError::BuiltinArity {
        name: builtin.name(),
        expected,
        got,
    }
}

fn binary(builtin: Builtin, op: BinaryOp, args: &[Value]) -> EvalResult {
    match args {
        [left, right] => evaluate_binary(op, left, right),
        _ => Err(arity(builtin, "2", args.len())),
    }
}

fn number(builtin: Builtin, args: &[Value]) -> EvalResult<f64> {
    let [operand] = args else {
        return Err(arity(builtin, "1", args.len()));
    };
    operand
        .as_float()
        .ok_or_else(|| argument_type(builtin.name(), "a number", operand))
}

fn len(operand: &Value) -> EvalResult {
    let len = match operand {
        Value::List(items) => items.len(),
        Value::Str(s) => s.chars().count(),
        Value::Host(object) => object
            .len()
            .ok_or_else(|| argument_type("len", "a sized value", operand))?,
        _ => return Err(argument_type("len", "a sized value", operand)),
    };
    i64::try_from(len)
        .map(Value::Int)
        .map_err(|_| EvalError::IntegerOverflow { op: "len" })
}

/// Concatenate lists and iterable host objects into one list.
fn union(args: &[Value]) -> EvalResult {
    let mut joined = Vec::new();
    for arg in args {
        match arg {
            Value::List(items) => joined.extend(items.iter().cloned()),
            Value::Host(object) => joined.extend(
                object
                    .elements()
                    .map_err(|_| argument_type("union", "a list", arg))?,
            ),
            _ => return Err(argument_type("union", "a list", arg)),
        }
    }
    Ok(Value::list(joined))
}
