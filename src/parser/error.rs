/// Everything the lexer and parser can reject.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParserError {
    /// Wraps an error with the character position it was found at.
    #[error("At position {0} - {1}")]
    AtPosition(usize, Box<ParserError>),

    /// A character that starts no token.
    #[error("Invalid token: {0}")]
    Token(char),

    /// A malformed numeric literal.
    #[error("Invalid number: {0}")]
    Number(String),

    /// A quote without its closing quote.
    #[error("String literal was not closed")]
    UnclosedString,

    /// Nothing but whitespace.
    #[error("Input string is empty")]
    Empty,

    /// `(` without a matching `)`.
    #[error("Parenthesis was not closed")]
    UnclosedParenthesis,

    /// A token that cannot start an expression.
    #[error("Unexpected prefix: {0}")]
    UnexpectedPrefix(String),

    /// A token that cannot follow an expression.
    #[error("Unexpected infix: {0}")]
    UnexpectedInfix(String),

    /// Tokens left over after a complete expression.
    #[error("Unexpected token after expression: {0}")]
    TrailingInput(String),

    /// A malformed or repeated keyword argument.
    #[error("Invalid keyword argument: {0}")]
    KeywordArgument(String),

    /// A positional argument after a keyword argument.
    #[error("Positional argument follows keyword argument")]
    PositionalAfterKeyword,

    /// An operator that is parsed but may not be evaluated.
    #[error("Operator not allowed: {0}")]
    OperatorNotAllowed(String),

    /// A call whose callee is not a plain name.
    #[error("Indirect call")]
    IndirectCall,
}

impl ParserError {
    /// The error without its position wrapper.
    pub fn err(&self) -> &Self {
        match self {
            ParserError::AtPosition(_, err) => err.as_ref(),
            other => other
        }
    }

    /// The position, if this error carries one.
    pub fn pos(&self) -> Option<&usize> {
        match self {
            ParserError::AtPosition(position, _) => Some(position),
            _ => None
        }
    }

    /// Attaches `position` unless a position is already attached.
    pub fn at_pos(self, position: usize) -> Self {
        match self {
            ParserError::AtPosition(_, _) => self,
            other => ParserError::AtPosition(position, Box::new(other))
        }
    }
}

/// Result of lexing and parsing.
pub type Result<T> = std::result::Result<T, ParserError>;
