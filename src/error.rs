use crate::Number;
use crate::parser::ParserError;


/// Everything that can go wrong while rolling a pattern.
///
/// None of these reach the end user verbatim, [`crate::roll_pattern`]
/// replaces them all with [`crate::BAD_PATTERN`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The pattern is longer than the configured maximum.
    #[error("Pattern is {length} characters long, the limit is {limit}")]
    PatternTooLong {
        /// Actual length in characters.
        length: usize,
        /// Configured maximum.
        limit: usize
    },

    /// The expanded statement does not parse, or uses a forbidden construct.
    #[error("Syntax error - {0}")]
    Syntax(#[from] ParserError),

    /// A call to a function that is unknown or not allowed.
    #[error("Undefined function: {0}")]
    UndefinedFunction(String),

    /// A literal, operand, argument or result exceeds its bound.
    #[error("Value {value} is out of bounds, the limit is {limit}")]
    OutOfBounds {
        /// The offending value.
        value: Number,
        /// The bound it exceeds.
        limit: f64
    },

    /// A call with more arguments than allowed.
    #[error("Too many arguments: {count}, the limit is {limit}")]
    TooManyArguments {
        /// Arguments given.
        count: usize,
        /// Configured maximum.
        limit: usize
    },

    /// `/`, `//` or `%` by zero.
    #[error("Division by zero")]
    DivisionByZero,

    /// Type errors, domain errors, wrong arity and non-finite results.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// The reply is longer than the configured maximum.
    #[error("Result is {length} characters long, the limit is {limit}")]
    ResultTooLong {
        /// Actual length in characters.
        length: usize,
        /// Configured maximum.
        limit: usize
    },

    /// A dice token with an impossible range.
    #[error("Invalid dice range: {0}")]
    Range(String),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidOperation(message.into())
    }
}
