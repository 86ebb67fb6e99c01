use std::convert::From;
use std::fmt::Display;
use serde::{Deserialize, Serialize};
use crate::Number;


/// A node of the syntax tree produced by [`crate::Parser`].
///
/// The tree is strict: every node owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// An integer or float literal.
    Number(Number),
    /// A bare identifier, only `pi`, `tau` and `e` have a value.
    Name(String),
    /// A quoted string, only meaningful as a function argument.
    Str(String),
    /// A prefix operator applied to an operand.
    UnaryOperator {
        /// The operator.
        op: UnaryOperator,
        /// The operand.
        operand: Box<Expr>
    },
    /// An infix operator.
    BinaryOperator {
        /// The operator.
        op: BinaryOperator,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>
    },
    /// A call, `callee(args..., name=value...)`.
    Call {
        /// The expression being called, a [`Expr::Name`] for direct calls.
        callee: Box<Expr>,
        /// Positional arguments in order.
        args: Vec<Expr>,
        /// Keyword arguments in order.
        kwargs: Vec<(String, Expr)>
    }
}

impl Expr {
    fn unary_op<T: Into<Expr>>(op: UnaryOperator, operand: T) -> Self {
        Self::UnaryOperator { op, operand: Box::new(operand.into()) }
    }

    /// `+operand`.
    pub fn pos<T: Into<Expr>>(operand: T) -> Self {
        Self::unary_op(UnaryOperator::Plus, operand)
    }

    /// `-operand`.
    pub fn neg<T: Into<Expr>>(operand: T) -> Self {
        Self::unary_op(UnaryOperator::Minus, operand)
    }

    /// `~operand`.
    pub fn invert<T: Into<Expr>>(operand: T) -> Self {
        Self::unary_op(UnaryOperator::Invert, operand)
    }

    /// `not operand`.
    pub fn not<T: Into<Expr>>(operand: T) -> Self {
        Self::unary_op(UnaryOperator::Not, operand)
    }

    /// `left op right` for any infix operator.
    pub fn binary_op<L: Into<Expr>, R: Into<Expr>>(op: BinaryOperator, left: L, right: R) -> Self {
        Self::BinaryOperator { op, left: Box::new(left.into()), right: Box::new(right.into()) }
    }

    /// `left + right`.
    pub fn add<L: Into<Expr>, R: Into<Expr>>(left: L, right: R) -> Self {
        Self::binary_op(BinaryOperator::Add, left, right)
    }

    /// `left - right`.
    pub fn sub<L: Into<Expr>, R: Into<Expr>>(left: L, right: R) -> Self {
        Self::binary_op(BinaryOperator::Subtract, left, right)
    }

    /// `left * right`.
    pub fn mul<L: Into<Expr>, R: Into<Expr>>(left: L, right: R) -> Self {
        Self::binary_op(BinaryOperator::Multiply, left, right)
    }

    /// `left / right`.
    pub fn div<L: Into<Expr>, R: Into<Expr>>(left: L, right: R) -> Self {
        Self::binary_op(BinaryOperator::Divide, left, right)
    }

    /// `left ** right`.
    pub fn pow<L: Into<Expr>, R: Into<Expr>>(left: L, right: R) -> Self {
        Self::binary_op(BinaryOperator::Power, left, right)
    }

    /// A direct call of the function `name` with positional arguments only.
    pub fn call<I: IntoIterator<Item = Expr>>(name: &str, args: I) -> Self {
        Self::Call {
            callee: Box::new(Expr::Name(name.into())),
            args: args.into_iter().collect(),
            kwargs: Vec::new()
        }
    }
}

impl From<Number> for Expr {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Number(Number::Int(value))
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::Number(Number::Float(value))
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Number(v) => write!(f, "{v}"),
            Expr::Name(name) => write!(f, "{name}"),
            Expr::Str(text) => write!(f, "{text:?}"),
            Expr::UnaryOperator { op: UnaryOperator::Not, operand } => write!(f, "not {operand}"),
            Expr::UnaryOperator { op, operand } => write!(f, "{op}{operand}"),
            Expr::BinaryOperator { op, left, right } =>
                write!(f, "({left} {op} {right})"),
            Expr::Call { callee, args, kwargs } => {
                write!(f, "{callee}(")?;
                let positional = args.iter().map(ToString::to_string);
                let keyword = kwargs.iter().map(|(name, value)| format!("{name}={value}"));
                let all: Vec<String> = positional.chain(keyword).collect();
                write!(f, "{})", all.join(", "))
            }
        }
    }
}


/// Prefix operators understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// `+x`
    Plus,
    /// `-x`
    Minus,
    /// `~x`, bitwise complement.
    Invert,
    /// `not x`, parsed but never evaluated.
    Not,
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOperator::Plus => write!(f, "+"),
            UnaryOperator::Minus => write!(f, "-"),
            UnaryOperator::Invert => write!(f, "~"),
            UnaryOperator::Not => write!(f, "not")
        }
    }
}


/// Infix operators understood by the parser.
///
/// The serialized names are the keys of the operator bound table in the
/// configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryOperator {
    /// `+`
    #[serde(rename = "add")]
    Add,
    /// `-`
    #[serde(rename = "sub")]
    Subtract,
    /// `*`
    #[serde(rename = "mul")]
    Multiply,
    /// `/`, true division.
    #[serde(rename = "div")]
    Divide,
    /// `//`, floor division.
    FloorDiv,
    /// `%`, remainder with the divisor's sign.
    #[serde(rename = "mod")]
    Modulo,
    /// `**`
    #[serde(rename = "pow")]
    Power,
    /// `@`, parsed but never evaluated.
    MatMul,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `<<`
    LShift,
    /// `>>`
    RShift,
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::FloorDiv => "//",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Power => "**",
            BinaryOperator::MatMul => "@",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitOr => "|",
            BinaryOperator::BitXor => "^",
            BinaryOperator::LShift => "<<",
            BinaryOperator::RShift => ">>"
        };

        write!(f, "{symbol}")
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_expr_constructors(left in 1..100i64, right in 1..100i64) {
            let add_expr = Expr::add(left, right);
            let sub_expr = Expr::sub(left, right);
            let mul_expr = Expr::mul(left, right);
            let div_expr = Expr::div(left, right);
            let pow_expr = Expr::pow(left, right);

            prop_assert!(matches!(add_expr, Expr::BinaryOperator { op: BinaryOperator::Add, .. }), "add_expr = {add_expr:?}");
            prop_assert!(matches!(sub_expr, Expr::BinaryOperator { op: BinaryOperator::Subtract, .. }), "sub_expr = {sub_expr:?}");
            prop_assert!(matches!(mul_expr, Expr::BinaryOperator { op: BinaryOperator::Multiply, .. }), "mul_expr = {mul_expr:?}");
            prop_assert!(matches!(div_expr, Expr::BinaryOperator { op: BinaryOperator::Divide, .. }), "div_expr = {div_expr:?}");
            prop_assert!(matches!(pow_expr, Expr::BinaryOperator { op: BinaryOperator::Power, .. }), "pow_expr = {pow_expr:?}");
        }

        #[test]
        fn test_expr_unary_constructors(value in 1..100i64) {
            let pos_expr = Expr::pos(value);
            let neg_expr = Expr::neg(value);
            let invert_expr = Expr::invert(value);
            let not_expr = Expr::not(value);

            prop_assert!(matches!(pos_expr, Expr::UnaryOperator { op: UnaryOperator::Plus, .. }), "pos_expr = {pos_expr:?}");
            prop_assert!(matches!(neg_expr, Expr::UnaryOperator { op: UnaryOperator::Minus, .. }), "neg_expr = {neg_expr:?}");
            prop_assert!(matches!(invert_expr, Expr::UnaryOperator { op: UnaryOperator::Invert, .. }), "invert_expr = {invert_expr:?}");
            prop_assert!(matches!(not_expr, Expr::UnaryOperator { op: UnaryOperator::Not, .. }), "not_expr = {not_expr:?}");
        }

        #[test]
        fn test_expr_from_i64(value in any::<i64>()) {
            let expr: Expr = value.into();
            prop_assert!(matches!(expr, Expr::Number(Number::Int(v)) if v == value), "expr = {expr:?}");
        }
    }

    #[test]
    fn test_display_binary() {
        let expr = Expr::add(1i64, Expr::mul(2i64, 3i64));
        assert_eq!(expr.to_string(), "(1 + (2 * 3))");
    }

    #[test]
    fn test_display_call() {
        let expr = Expr::Call {
            callee: Box::new(Expr::Name("round".into())),
            args: vec![Expr::Name("pi".into())],
            kwargs: vec![("ndigits".into(), Expr::from(2i64))]
        };
        assert_eq!(expr.to_string(), "round(pi, ndigits=2)");
    }

    #[test]
    fn test_operator_table_keys() {
        let key = toml::Value::try_from(BinaryOperator::Power).unwrap();
        assert_eq!(key.as_str(), Some("pow"));
        let key = toml::Value::try_from(BinaryOperator::LShift).unwrap();
        assert_eq!(key.as_str(), Some("lshift"));
    }
}
