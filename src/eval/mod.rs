mod functions;
mod limits;

pub use functions::{Argument, Function};
pub use limits::Limits;

use std::f64::consts;
use tracing::trace;
use crate::{Error, Number};
use crate::parser::{BinaryOperator, Expr, ParserError, UnaryOperator};
use functions::overflow;


/// Walks an [`Expr`] tree and computes its value under a set of [`Limits`].
///
/// Evaluation is a closed `match` over the node types. Operators and
/// functions are dispatched through explicit tables, there is no generic
/// lookup a pattern could use to reach anything else.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    limits: &'a Limits
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator enforcing `limits`.
    pub fn new(limits: &'a Limits) -> Self {
        Self { limits }
    }

    /// Evaluates `expr` to a single number.
    ///
    /// # Errors
    /// - [`Error::OutOfBounds`] when a literal, operand, argument or result exceeds its bound.
    /// - [`Error::Syntax`] for operators that are parsed but not allowed and for indirect calls.
    /// - [`Error::UndefinedFunction`], [`Error::TooManyArguments`] for rejected calls.
    /// - [`Error::DivisionByZero`], [`Error::InvalidOperation`] for arithmetic failures.
    ///
    /// # Examples
    /// ```
    /// use dice_calc::{parse_to_expr, Evaluator, Limits, Number};
    ///
    /// let limits = Limits::default();
    /// let expr = parse_to_expr("1 + 2 * 3").unwrap();
    /// assert_eq!(Evaluator::new(&limits).evaluate(&expr), Ok(Number::Int(7)));
    /// ```
    pub fn evaluate(&self, expr: &Expr) -> Result<Number, Error> {
        match expr {
            Expr::Number(value) => self.check_literal(*value),

            Expr::Name(name) => constant(name)
                .ok_or_else(|| Error::invalid(format!("name '{name}' has no value"))),

            Expr::Str(_) => Err(Error::invalid("string used as a number")),

            Expr::UnaryOperator { op, operand } => {
                let value = self.evaluate(operand)?;
                self.check_result(unary(*op, value)?)
            },

            Expr::BinaryOperator { op, left, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                self.check_operands(*op, left, right)?;
                self.check_result(binary(*op, left, right)?)
            },

            Expr::Call { callee, args, kwargs } => self.call(callee, args, kwargs)
        }
    }

    fn call(&self, callee: &Expr, args: &[Expr], kwargs: &[(String, Expr)]) -> Result<Number, Error> {
        let Expr::Name(name) = callee else {
            return Err(ParserError::IndirectCall.into());
        };

        let count = args.len() + kwargs.len();
        if count > self.limits.max_arguments {
            return Err(Error::TooManyArguments { count, limit: self.limits.max_arguments });
        }

        let function = Function::from_name(name)
            .filter(|function| self.limits.allows(*function))
            .ok_or_else(|| Error::UndefinedFunction(name.clone()))?;

        let args = args.iter()
            .map(|arg| self.argument(arg))
            .collect::<Result<Vec<_>, _>>()?;

        let kwargs = kwargs.iter()
            .map(|(name, value)| Ok((name.clone(), self.evaluate(value)?)))
            .collect::<Result<Vec<_>, Error>>()?;

        if let Some(limit) = self.limits.function_bound(function) {
            let numbers = args.iter()
                .filter_map(|arg| match arg {
                    Argument::Number(value) => Some(*value),
                    Argument::Text(_) => None
                })
                .chain(kwargs.iter().map(|(_, value)| *value));

            for value in numbers {
                if value.magnitude() > limit {
                    return Err(Error::OutOfBounds { value, limit });
                }
            }
        }

        trace!(%function, args = args.len(), kwargs = kwargs.len(), "calling function");
        self.check_result(function.apply(&args, &kwargs)?)
    }

    fn argument(&self, expr: &Expr) -> Result<Argument, Error> {
        match expr {
            Expr::Str(text) => Ok(Argument::Text(text.clone())),
            other => self.evaluate(other).map(Argument::Number)
        }
    }

    fn check_operands(&self, op: BinaryOperator, left: Number, right: Number) -> Result<(), Error> {
        let Some((left_max, right_max)) = self.limits.operator_bound(op) else {
            return Ok(());
        };

        if left.magnitude() > left_max {
            return Err(Error::OutOfBounds { value: left, limit: left_max });
        }
        if right.magnitude() > right_max {
            return Err(Error::OutOfBounds { value: right, limit: right_max });
        }

        Ok(())
    }

    fn check_literal(&self, value: Number) -> Result<Number, Error> {
        if value.magnitude() > self.limits.max_number {
            return Err(Error::OutOfBounds { value, limit: self.limits.max_number });
        }

        Ok(value)
    }

    fn check_result(&self, value: Number) -> Result<Number, Error> {
        if let Number::Float(v) = value {
            if !v.is_finite() {
                return Err(Error::invalid(format!("non-finite result {v}")));
            }
        }

        self.check_literal(value)
    }
}


fn constant(name: &str) -> Option<Number> {
    match name {
        "pi" => Some(Number::Float(consts::PI)),
        "tau" => Some(Number::Float(consts::TAU)),
        "e" => Some(Number::Float(consts::E)),
        _ => None
    }
}

fn unary(op: UnaryOperator, value: Number) -> Result<Number, Error> {
    use UnaryOperator as Op;
    match (op, value) {
        (Op::Plus, value) => Ok(value),
        (Op::Minus, Number::Int(v)) => v.checked_neg()
            .map(Number::Int)
            .ok_or_else(|| overflow(-(v as f64))),
        (Op::Minus, Number::Float(v)) => Ok(Number::Float(-v)),
        (Op::Invert, Number::Int(v)) => Ok(Number::Int(!v)),
        (Op::Invert, Number::Float(_)) => Err(Error::invalid("bad operand type for unary ~: float")),
        (Op::Not, _) => Err(ParserError::OperatorNotAllowed(op.to_string()).into())
    }
}

fn binary(op: BinaryOperator, left: Number, right: Number) -> Result<Number, Error> {
    use BinaryOperator as Op;
    match op {
        Op::Add => arithmetic(left, right, i64::checked_add, |a, b| a + b),
        Op::Subtract => arithmetic(left, right, i64::checked_sub, |a, b| a - b),
        Op::Multiply => arithmetic(left, right, i64::checked_mul, |a, b| a * b),
        Op::Divide => {
            if right.is_zero() {
                return Err(Error::DivisionByZero);
            }
            Ok(Number::Float(left.as_f64() / right.as_f64()))
        },
        Op::FloorDiv => floor_div(left, right),
        Op::Modulo => modulo(left, right),
        Op::Power => power(left, right),
        Op::BitAnd => bitwise(op, left, right, |a, b| a & b),
        Op::BitOr => bitwise(op, left, right, |a, b| a | b),
        Op::BitXor => bitwise(op, left, right, |a, b| a ^ b),
        Op::LShift => shift_left(left, right),
        Op::RShift => shift_right(left, right),
        Op::MatMul => Err(ParserError::OperatorNotAllowed(op.to_string()).into())
    }
}

fn arithmetic(
    left: Number,
    right: Number,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64
) -> Result<Number, Error> {
    match (left, right) {
        (Number::Int(a), Number::Int(b)) => int_op(a, b)
            .map(Number::Int)
            .ok_or_else(|| overflow(float_op(a as f64, b as f64))),
        (a, b) => Ok(Number::Float(float_op(a.as_f64(), b.as_f64())))
    }
}

fn floor_div(left: Number, right: Number) -> Result<Number, Error> {
    if right.is_zero() {
        return Err(Error::DivisionByZero);
    }

    match (left, right) {
        (Number::Int(a), Number::Int(b)) => {
            let quotient = a.checked_div(b).ok_or_else(|| overflow(a as f64 / b as f64))?;
            let floored = if a % b != 0 && (a < 0) != (b < 0) { quotient - 1 } else { quotient };
            Ok(Number::Int(floored))
        },
        (a, b) => Ok(Number::Float((a.as_f64() / b.as_f64()).floor()))
    }
}

fn modulo(left: Number, right: Number) -> Result<Number, Error> {
    if right.is_zero() {
        return Err(Error::DivisionByZero);
    }

    // the result takes the sign of the divisor
    match (left, right) {
        (Number::Int(a), Number::Int(b)) => {
            let rest = a.wrapping_rem(b);
            let rest = if rest != 0 && (rest < 0) != (b < 0) { rest + b } else { rest };
            Ok(Number::Int(rest))
        },
        (a, b) => {
            let (a, b) = (a.as_f64(), b.as_f64());
            let rest = a % b;
            let rest = if rest != 0.0 && (rest < 0.0) != (b < 0.0) { rest + b } else { rest };
            Ok(Number::Float(rest))
        }
    }
}

fn power(left: Number, right: Number) -> Result<Number, Error> {
    if left.is_zero() && right.as_f64() < 0.0 {
        return Err(Error::DivisionByZero);
    }

    match (left, right) {
        (Number::Int(base), Number::Int(exp)) if exp >= 0 => u32::try_from(exp)
            .ok()
            .and_then(|exp| base.checked_pow(exp))
            .map(Number::Int)
            .ok_or_else(|| overflow((base as f64).powf(exp as f64))),
        (base, exp) => Ok(Number::Float(base.as_f64().powf(exp.as_f64())))
    }
}

fn integers(op: BinaryOperator, left: Number, right: Number) -> Result<(i64, i64), Error> {
    match (left, right) {
        (Number::Int(a), Number::Int(b)) => Ok((a, b)),
        _ => Err(Error::invalid(format!("unsupported operand type for {op}: float")))
    }
}

fn bitwise(op: BinaryOperator, left: Number, right: Number, f: fn(i64, i64) -> i64) -> Result<Number, Error> {
    let (a, b) = integers(op, left, right)?;
    Ok(Number::Int(f(a, b)))
}

fn shift_left(left: Number, right: Number) -> Result<Number, Error> {
    let (value, count) = integers(BinaryOperator::LShift, left, right)?;
    if count < 0 {
        return Err(Error::invalid("negative shift count"));
    }
    if value == 0 {
        return Ok(Number::Int(0));
    }
    if count >= 64 {
        return Err(overflow(value as f64 * 2f64.powf(count as f64)));
    }

    let shifted = i128::from(value) << count;
    i64::try_from(shifted)
        .map(Number::Int)
        .map_err(|_| overflow(shifted as f64))
}

fn shift_right(left: Number, right: Number) -> Result<Number, Error> {
    let (value, count) = integers(BinaryOperator::RShift, left, right)?;
    if count < 0 {
        return Err(Error::invalid("negative shift count"));
    }

    let shifted = if count >= 64 {
        if value < 0 { -1 } else { 0 }
    } else {
        value >> count
    };

    Ok(Number::Int(shifted))
}
