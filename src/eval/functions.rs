use std::cmp::Ordering;
use std::fmt::Display;
use serde::{Deserialize, Serialize};
use crate::{Error, Number};


/// A callable function of the evaluator.
///
/// The set is closed: a name that does not map to one of these variants is
/// undefined no matter what the configuration says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Function {
    /// Smallest integer not below `x`.
    Ceil,
    /// Largest integer not above `x`.
    Floor,
    /// `x` with its fraction dropped.
    Trunc,
    /// `x` rounded half to even, optionally to `ndigits` places.
    Round,
    /// Absolute value as a float.
    Fabs,
    /// Absolute value, keeping integers integral.
    Abs,
    /// Magnitude of `x` with the sign of `y`.
    Copysign,
    /// `n!` of a non-negative integer.
    Factorial,
    /// Greatest common divisor of integers.
    Gcd,
    /// IEEE 754 remainder of `x` by `y`.
    Remainder,
    /// `e` raised to `x`.
    Exp,
    /// Natural logarithm, or logarithm in the given base.
    Log,
    /// `ln(1 + x)`.
    Log1p,
    /// Base 2 logarithm.
    Log2,
    /// Base 10 logarithm.
    Log10,
    /// Square root.
    Sqrt,
    /// Arc cosine, in radians.
    Acos,
    /// Arc sine, in radians.
    Asin,
    /// Arc tangent, in radians.
    Atan,
    /// Arc tangent of `y / x` using both signs.
    Atan2,
    /// Cosine of radians.
    Cos,
    /// Euclidean norm of the arguments.
    Hypot,
    /// Sine of radians.
    Sin,
    /// Tangent of radians.
    Tan,
    /// Radians to degrees.
    Degrees,
    /// Degrees to radians.
    Radians,
    /// Inverse hyperbolic cosine.
    Acosh,
    /// Inverse hyperbolic sine.
    Asinh,
    /// Inverse hyperbolic tangent.
    Atanh,
    /// Hyperbolic cosine.
    Cosh,
    /// Hyperbolic sine.
    Sinh,
    /// Hyperbolic tangent.
    Tanh,
    /// Smallest argument.
    Min,
    /// Largest argument.
    Max,
    /// Truncation to an integer.
    Int,
    /// Conversion to a float.
    Float,
    /// Code point of a one-character string.
    Ord,
}

/// An evaluated call argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// A numeric argument.
    Number(Number),
    /// A string literal, only meaningful to `ord`.
    Text(String),
}

impl Function {
    /// Every function, in declaration order.
    pub const ALL: [Function; 37] = [
        Function::Ceil, Function::Floor, Function::Trunc, Function::Round,
        Function::Fabs, Function::Abs, Function::Copysign, Function::Factorial,
        Function::Gcd, Function::Remainder, Function::Exp, Function::Log,
        Function::Log1p, Function::Log2, Function::Log10, Function::Sqrt,
        Function::Acos, Function::Asin, Function::Atan, Function::Atan2,
        Function::Cos, Function::Hypot, Function::Sin, Function::Tan,
        Function::Degrees, Function::Radians, Function::Acosh, Function::Asinh,
        Function::Atanh, Function::Cosh, Function::Sinh, Function::Tanh,
        Function::Min, Function::Max, Function::Int, Function::Float,
        Function::Ord,
    ];

    /// The name a pattern calls the function by.
    pub fn name(self) -> &'static str {
        match self {
            Function::Ceil => "ceil",
            Function::Floor => "floor",
            Function::Trunc => "trunc",
            Function::Round => "round",
            Function::Fabs => "fabs",
            Function::Abs => "abs",
            Function::Copysign => "copysign",
            Function::Factorial => "factorial",
            Function::Gcd => "gcd",
            Function::Remainder => "remainder",
            Function::Exp => "exp",
            Function::Log => "log",
            Function::Log1p => "log1p",
            Function::Log2 => "log2",
            Function::Log10 => "log10",
            Function::Sqrt => "sqrt",
            Function::Acos => "acos",
            Function::Asin => "asin",
            Function::Atan => "atan",
            Function::Atan2 => "atan2",
            Function::Cos => "cos",
            Function::Hypot => "hypot",
            Function::Sin => "sin",
            Function::Tan => "tan",
            Function::Degrees => "degrees",
            Function::Radians => "radians",
            Function::Acosh => "acosh",
            Function::Asinh => "asinh",
            Function::Atanh => "atanh",
            Function::Cosh => "cosh",
            Function::Sinh => "sinh",
            Function::Tanh => "tanh",
            Function::Min => "min",
            Function::Max => "max",
            Function::Int => "int",
            Function::Float => "float",
            Function::Ord => "ord"
        }
    }

    /// Looks a function up by its call name.
    pub fn from_name(name: &str) -> Option<Self> {
        Function::ALL.into_iter().find(|function| function.name() == name)
    }

    /// Applies the function to already evaluated arguments.
    ///
    /// # Errors
    /// [`Error::InvalidOperation`] for wrong arity, wrong argument types,
    /// unsupported keyword arguments and domain errors that do not already
    /// show up as non-finite floats. [`Error::OutOfBounds`] when an integer
    /// result does not fit.
    pub fn apply(self, args: &[Argument], kwargs: &[(String, Number)]) -> Result<Number, Error> {
        use Function as F;

        if self != F::Round {
            if let Some((name, _)) = kwargs.first() {
                return Err(Error::invalid(format!("{self}() got an unexpected keyword argument '{name}'")));
            }
        }

        let value = match self {
            F::Ceil => self.rounding(args, f64::ceil)?,
            F::Floor => self.rounding(args, f64::floor)?,
            F::Trunc => self.rounding(args, f64::trunc)?,
            F::Round => self.round(args, kwargs)?,
            F::Fabs => self.unary(args, f64::abs)?,
            F::Abs => match self.single_number(args)? {
                Number::Int(v) => Number::Int(v.checked_abs().ok_or_else(|| overflow(-(v as f64)))?),
                Number::Float(v) => Number::Float(v.abs())
            },
            F::Copysign => self.binary(args, f64::copysign)?,
            F::Factorial => Number::Int(factorial(self.single_int(args)?)?),
            F::Gcd => Number::Int(gcd(&self.integers(args)?)?),
            F::Remainder => self.binary(args, remainder)?,
            F::Exp => self.unary(args, f64::exp)?,
            F::Log => self.log(args)?,
            F::Log1p => self.unary(args, f64::ln_1p)?,
            F::Log2 => self.unary(args, f64::log2)?,
            F::Log10 => self.unary(args, f64::log10)?,
            F::Sqrt => self.unary(args, f64::sqrt)?,
            F::Acos => self.unary(args, f64::acos)?,
            F::Asin => self.unary(args, f64::asin)?,
            F::Atan => self.unary(args, f64::atan)?,
            F::Atan2 => self.binary(args, f64::atan2)?,
            F::Cos => self.unary(args, f64::cos)?,
            F::Hypot => Number::Float(self.floats(args)?.into_iter().fold(0.0, f64::hypot)),
            F::Sin => self.unary(args, f64::sin)?,
            F::Tan => self.unary(args, f64::tan)?,
            F::Degrees => self.unary(args, f64::to_degrees)?,
            F::Radians => self.unary(args, f64::to_radians)?,
            F::Acosh => self.unary(args, f64::acosh)?,
            F::Asinh => self.unary(args, f64::asinh)?,
            F::Atanh => self.unary(args, f64::atanh)?,
            F::Cosh => self.unary(args, f64::cosh)?,
            F::Sinh => self.unary(args, f64::sinh)?,
            F::Tanh => self.unary(args, f64::tanh)?,
            F::Min => self.extreme(args, Ordering::Less)?,
            F::Max => self.extreme(args, Ordering::Greater)?,
            F::Int => self.int(args)?,
            F::Float => self.float(args)?,
            F::Ord => self.ord(args)?
        };

        Ok(value)
    }

    fn arity(self, args: &[Argument], expected: usize) -> Result<(), Error> {
        if args.len() == expected {
            Ok(())
        } else {
            Err(Error::invalid(format!("{self}() takes {expected} argument(s), {} given", args.len())))
        }
    }

    fn number(self, arg: &Argument) -> Result<Number, Error> {
        match arg {
            Argument::Number(v) => Ok(*v),
            Argument::Text(_) => Err(Error::invalid(format!("{self}() expects a number, not a string")))
        }
    }

    fn integer(self, arg: &Argument) -> Result<i64, Error> {
        self.number(arg)?
            .as_int()
            .ok_or_else(|| Error::invalid(format!("{self}() expects an integer")))
    }

    fn single_number(self, args: &[Argument]) -> Result<Number, Error> {
        self.arity(args, 1)?;
        self.number(&args[0])
    }

    fn single_int(self, args: &[Argument]) -> Result<i64, Error> {
        self.arity(args, 1)?;
        self.integer(&args[0])
    }

    fn floats(self, args: &[Argument]) -> Result<Vec<f64>, Error> {
        args.iter()
            .map(|arg| self.number(arg).map(Number::as_f64))
            .collect()
    }

    fn integers(self, args: &[Argument]) -> Result<Vec<i64>, Error> {
        args.iter()
            .map(|arg| self.integer(arg))
            .collect()
    }

    fn unary(self, args: &[Argument], f: fn(f64) -> f64) -> Result<Number, Error> {
        Ok(Number::Float(f(self.single_number(args)?.as_f64())))
    }

    fn binary(self, args: &[Argument], f: fn(f64, f64) -> f64) -> Result<Number, Error> {
        self.arity(args, 2)?;
        let x = self.number(&args[0])?.as_f64();
        let y = self.number(&args[1])?.as_f64();
        Ok(Number::Float(f(x, y)))
    }

    fn rounding(self, args: &[Argument], f: fn(f64) -> f64) -> Result<Number, Error> {
        match self.single_number(args)? {
            Number::Int(v) => Ok(Number::Int(v)),
            Number::Float(v) => Ok(Number::Int(float_to_int(f(v))?))
        }
    }

    fn round(self, args: &[Argument], kwargs: &[(String, Number)]) -> Result<Number, Error> {
        let mut ndigits = None;
        for (name, value) in kwargs {
            if name != "ndigits" || ndigits.is_some() {
                return Err(Error::invalid(format!("round() got an unexpected keyword argument '{name}'")));
            }
            ndigits = Some(*value);
        }

        let value = match (args, ndigits) {
            ([value], _) => self.number(value)?,
            ([value, digits], None) => {
                ndigits = Some(self.number(digits)?);
                self.number(value)?
            },
            _ => return Err(Error::invalid(format!("round() takes 1 or 2 arguments, {} given", args.len())))
        };

        let Some(ndigits) = ndigits else {
            return match value {
                Number::Int(v) => Ok(Number::Int(v)),
                Number::Float(v) => Ok(Number::Int(float_to_int(v.round_ties_even())?))
            };
        };

        let ndigits = ndigits.as_int()
            .ok_or_else(|| Error::invalid("round() ndigits must be an integer"))?;

        match value {
            Number::Int(v) => Ok(Number::Int(round_int(v, ndigits))),
            Number::Float(v) => Ok(Number::Float(round_float(v, ndigits)))
        }
    }

    fn log(self, args: &[Argument]) -> Result<Number, Error> {
        match args {
            [x] => Ok(Number::Float(self.number(x)?.as_f64().ln())),
            [x, base] => {
                let x = self.number(x)?.as_f64();
                let base = self.number(base)?.as_f64();
                Ok(Number::Float(x.ln() / base.ln()))
            },
            _ => Err(Error::invalid(format!("log() takes 1 or 2 arguments, {} given", args.len())))
        }
    }

    fn extreme(self, args: &[Argument], wanted: Ordering) -> Result<Number, Error> {
        if args.len() < 2 {
            return Err(Error::invalid(format!("{self}() needs at least two arguments")));
        }

        let mut best = self.number(&args[0])?;
        for arg in &args[1..] {
            let candidate = self.number(arg)?;
            let ordering = match (candidate, best) {
                (Number::Int(c), Number::Int(b)) => Some(c.cmp(&b)),
                (c, b) => c.as_f64().partial_cmp(&b.as_f64())
            };
            if ordering == Some(wanted) {
                best = candidate;
            }
        }

        Ok(best)
    }

    fn int(self, args: &[Argument]) -> Result<Number, Error> {
        match args {
            [] => Ok(Number::Int(0)),
            [Argument::Number(Number::Int(v))] => Ok(Number::Int(*v)),
            [Argument::Number(Number::Float(v))] => Ok(Number::Int(float_to_int(v.trunc())?)),
            [Argument::Text(text)] => text.trim()
                .parse::<i64>()
                .map(Number::Int)
                .map_err(|_| Error::invalid(format!("invalid literal for int(): {text:?}"))),
            _ => Err(Error::invalid(format!("int() takes at most 1 argument, {} given", args.len())))
        }
    }

    fn float(self, args: &[Argument]) -> Result<Number, Error> {
        match args {
            [] => Ok(Number::Float(0.0)),
            [Argument::Number(v)] => Ok(Number::Float(v.as_f64())),
            [Argument::Text(text)] => text.trim()
                .parse::<f64>()
                .map(Number::Float)
                .map_err(|_| Error::invalid(format!("could not convert string to float: {text:?}"))),
            _ => Err(Error::invalid(format!("float() takes at most 1 argument, {} given", args.len())))
        }
    }

    fn ord(self, args: &[Argument]) -> Result<Number, Error> {
        self.arity(args, 1)?;

        let Argument::Text(text) = &args[0] else {
            return Err(Error::invalid("ord() expects a string"));
        };

        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(Number::Int(ch as i64)),
            _ => Err(Error::invalid(format!("ord() expects a single character, got {text:?}")))
        }
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}


pub(crate) fn overflow(approximate: f64) -> Error {
    Error::OutOfBounds { value: Number::Float(approximate), limit: i64::MAX as f64 }
}

pub(crate) fn float_to_int(value: f64) -> Result<i64, Error> {
    if !value.is_finite() {
        return Err(Error::invalid(format!("cannot convert {value} to integer")));
    }

    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if value.abs() >= i64::MAX as f64 {
        return Err(overflow(value));
    }

    Ok(value as i64)
}

fn factorial(n: i64) -> Result<i64, Error> {
    if n < 0 {
        return Err(Error::invalid("factorial() not defined for negative values"));
    }

    (2..=n).try_fold(1i64, |acc, k| acc.checked_mul(k).ok_or_else(|| overflow(f64::INFINITY)))
}

fn gcd(values: &[i64]) -> Result<i64, Error> {
    let mut result = 0u64;
    for value in values {
        let mut a = result;
        let mut b = value.unsigned_abs();
        while b != 0 {
            (a, b) = (b, a % b);
        }
        result = a;
    }

    i64::try_from(result).map_err(|_| overflow(result as f64))
}

fn remainder(x: f64, y: f64) -> f64 {
    if y == 0.0 {
        return f64::NAN;
    }
    if y.is_infinite() && x.is_finite() {
        return x;
    }
    x - (x / y).round_ties_even() * y
}

fn round_int(value: i64, ndigits: i64) -> i64 {
    if ndigits >= 0 {
        return value;
    }

    let Some(scale) = u32::try_from(-ndigits).ok().and_then(|exp| 10i64.checked_pow(exp)) else {
        return 0;
    };

    let quotient = value.div_euclid(scale);
    let rest = value.rem_euclid(scale);
    let half = scale / 2;

    let rounded = if rest > half || (rest == half && quotient % 2 != 0) {
        quotient + 1
    } else {
        quotient
    };

    rounded.saturating_mul(scale)
}

pub(crate) fn round_float(value: f64, ndigits: i64) -> f64 {
    let ndigits = ndigits.clamp(-308, 308) as i32;
    if ndigits >= 0 {
        let scale = 10f64.powi(ndigits);
        let scaled = value * scale;
        if !scaled.is_finite() {
            return value;
        }
        scaled.round_ties_even() / scale
    } else {
        let scale = 10f64.powi(-ndigits);
        (value / scale).round_ties_even() * scale
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    fn nums<const N: usize>(values: [Number; N]) -> Vec<Argument> {
        values.into_iter().map(Argument::Number).collect()
    }

    fn apply(function: Function, values: &[Number]) -> Result<Number, Error> {
        let args: Vec<Argument> = values.iter().copied().map(Argument::Number).collect();
        function.apply(&args, &[])
    }

    proptest! {
        #[test]
        fn test_name_round_trips(index in 0usize..Function::ALL.len()) {
            let function = Function::ALL[index];
            prop_assert_eq!(Function::from_name(function.name()), Some(function));
        }

        #[test]
        fn test_gcd_divides_both(a in 1i64..10_000, b in 1i64..10_000) {
            let g = gcd(&[a, b]).unwrap();
            prop_assert_eq!(a % g, 0);
            prop_assert_eq!(b % g, 0);
        }

        #[test]
        fn test_max_is_not_smaller(a in -1000i64..1000, b in -1000i64..1000) {
            let max = apply(Function::Max, &[Number::Int(a), Number::Int(b)]).unwrap();
            prop_assert_eq!(max, Number::Int(a.max(b)));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(Function::from_name("eval"), None);
        assert_eq!(Function::from_name("__import__"), None);
    }

    #[test]
    fn test_factorial() {
        assert_eq!(apply(Function::Factorial, &[Number::Int(0)]), Ok(Number::Int(1)));
        assert_eq!(apply(Function::Factorial, &[Number::Int(5)]), Ok(Number::Int(120)));
        assert_eq!(apply(Function::Factorial, &[Number::Int(20)]), Ok(Number::Int(2_432_902_008_176_640_000)));
        assert!(matches!(apply(Function::Factorial, &[Number::Int(21)]), Err(Error::OutOfBounds { .. })));
        assert!(matches!(apply(Function::Factorial, &[Number::Int(-1)]), Err(Error::InvalidOperation(_))));
        assert!(matches!(apply(Function::Factorial, &[Number::Float(3.0)]), Err(Error::InvalidOperation(_))));
    }

    #[test]
    fn test_rounding_functions_return_integers() {
        assert_eq!(apply(Function::Ceil, &[Number::Float(1.2)]), Ok(Number::Int(2)));
        assert_eq!(apply(Function::Floor, &[Number::Float(-1.2)]), Ok(Number::Int(-2)));
        assert_eq!(apply(Function::Trunc, &[Number::Float(-1.8)]), Ok(Number::Int(-1)));
        assert_eq!(apply(Function::Ceil, &[Number::Int(7)]), Ok(Number::Int(7)));
    }

    #[test]
    fn test_round_half_to_even() {
        assert_eq!(apply(Function::Round, &[Number::Float(2.5)]), Ok(Number::Int(2)));
        assert_eq!(apply(Function::Round, &[Number::Float(3.5)]), Ok(Number::Int(4)));
        assert_eq!(apply(Function::Round, &[Number::Int(1250), Number::Int(-2)]), Ok(Number::Int(1200)));
        assert_eq!(apply(Function::Round, &[Number::Int(1350), Number::Int(-2)]), Ok(Number::Int(1400)));
    }

    #[test]
    fn test_round_with_keyword() {
        let args = nums([Number::Float(3.14159)]);
        let kwargs = [("ndigits".to_string(), Number::Int(2))];
        assert_eq!(Function::Round.apply(&args, &kwargs), Ok(Number::Float(3.14)));

        let kwargs = [("digits".to_string(), Number::Int(2))];
        assert!(matches!(Function::Round.apply(&args, &kwargs), Err(Error::InvalidOperation(_))));
    }

    #[test]
    fn test_keyword_rejected_for_other_functions() {
        let args = nums([Number::Float(0.5)]);
        let kwargs = [("x".to_string(), Number::Int(1))];
        assert!(matches!(Function::Sin.apply(&args, &kwargs), Err(Error::InvalidOperation(_))));
    }

    #[test]
    fn test_abs_keeps_type() {
        assert_eq!(apply(Function::Abs, &[Number::Int(-3)]), Ok(Number::Int(3)));
        assert_eq!(apply(Function::Fabs, &[Number::Int(-3)]), Ok(Number::Float(3.0)));
        assert!(matches!(apply(Function::Abs, &[Number::Int(i64::MIN)]), Err(Error::OutOfBounds { .. })));
    }

    #[test]
    fn test_min_max_need_two_arguments() {
        assert!(matches!(apply(Function::Max, &[Number::Int(1)]), Err(Error::InvalidOperation(_))));
        assert_eq!(apply(Function::Min, &[Number::Int(3), Number::Float(2.5)]), Ok(Number::Float(2.5)));
    }

    #[test]
    fn test_log_with_base() {
        assert_eq!(apply(Function::Log, &[Number::Int(8), Number::Int(2)]).unwrap().as_f64().round(), 3.0);
        let log10 = apply(Function::Log10, &[Number::Int(1000)]).unwrap().as_f64();
        assert!((log10 - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_gcd_variadic() {
        assert_eq!(apply(Function::Gcd, &[]), Ok(Number::Int(0)));
        assert_eq!(apply(Function::Gcd, &[Number::Int(12), Number::Int(-18), Number::Int(30)]), Ok(Number::Int(6)));
    }

    #[test]
    fn test_hypot() {
        assert_eq!(apply(Function::Hypot, &[Number::Int(3), Number::Int(4)]), Ok(Number::Float(5.0)));
    }

    #[test]
    fn test_remainder() {
        assert_eq!(apply(Function::Remainder, &[Number::Int(10), Number::Int(3)]), Ok(Number::Float(1.0)));
        assert_eq!(apply(Function::Remainder, &[Number::Int(11), Number::Int(3)]), Ok(Number::Float(-1.0)));
    }

    #[test]
    fn test_ord() {
        let args = vec![Argument::Text("a".into())];
        assert_eq!(Function::Ord.apply(&args, &[]), Ok(Number::Int(97)));

        let args = vec![Argument::Text("ab".into())];
        assert!(matches!(Function::Ord.apply(&args, &[]), Err(Error::InvalidOperation(_))));

        assert!(matches!(apply(Function::Ord, &[Number::Int(1)]), Err(Error::InvalidOperation(_))));
    }

    #[test]
    fn test_int_and_float_conversions() {
        assert_eq!(apply(Function::Int, &[Number::Float(-2.7)]), Ok(Number::Int(-2)));
        assert_eq!(apply(Function::Float, &[Number::Int(2)]), Ok(Number::Float(2.0)));
        assert_eq!(Function::Int.apply(&[Argument::Text(" 42 ".into())], &[]), Ok(Number::Int(42)));
        assert!(matches!(apply(Function::Int, &[Number::Float(f64::NAN)]), Err(Error::InvalidOperation(_))));
    }

    #[test]
    fn test_string_rejected_by_numeric_functions() {
        let args = vec![Argument::Text("1".into())];
        assert!(matches!(Function::Sqrt.apply(&args, &[]), Err(Error::InvalidOperation(_))));
    }

    #[test]
    fn test_serialized_names_match() {
        for function in Function::ALL {
            let value = toml::Value::try_from(function).unwrap();
            assert_eq!(value.as_str(), Some(function.name()));
        }
    }
}
