use crate::parser::error::*;
use crate::parser::{Lexer, Token, Expr, BinaryOperator};


#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest = 1,
    BitOr = 2,
    BitXor = 3,
    BitAnd = 4,
    Shift = 5,
    Sum = 6,
    Product = 7,
    Prefix = 8,
    Power = 9,
    Call = 10,
}

impl Precedence {
    fn of_token(token: &Token) -> Self {
        match token {
            Token::Pipe => Precedence::BitOr,
            Token::Caret => Precedence::BitXor,
            Token::Ampersand => Precedence::BitAnd,
            Token::ShiftLeft | Token::ShiftRight => Precedence::Shift,
            Token::Plus | Token::Minus => Precedence::Sum,
            Token::Star | Token::Slash | Token::DoubleSlash | Token::Percent | Token::At => Precedence::Product,
            Token::DoubleStar => Precedence::Power,
            Token::LeftParenthesis => Precedence::Call,
            _ => Precedence::Lowest
        }
    }
}

fn binary_operator(token: &Token) -> Option<BinaryOperator> {
    use BinaryOperator as Op;
    let op = match token {
        Token::Plus => Op::Add,
        Token::Minus => Op::Subtract,
        Token::Star => Op::Multiply,
        Token::Slash => Op::Divide,
        Token::DoubleSlash => Op::FloorDiv,
        Token::Percent => Op::Modulo,
        Token::DoubleStar => Op::Power,
        Token::At => Op::MatMul,
        Token::Ampersand => Op::BitAnd,
        Token::Pipe => Op::BitOr,
        Token::Caret => Op::BitXor,
        Token::ShiftLeft => Op::LShift,
        Token::ShiftRight => Op::RShift,
        _ => return None
    };

    Some(op)
}


/// A Pratt parser for arithmetic expressions.
///
/// The parser takes the already expanded pattern, tokenizes it and builds a
/// single [`Expr`] tree. Operator precedence follows the usual rules:
/// bitwise operators bind loosest, then shifts, sums, products, unary
/// prefixes, and finally the right associative power operator and calls.
#[derive(Debug)]
pub struct Parser {
    lexer: Lexer,
    current: Token,
    peek: Token
}

impl Parser {
    /// Creates a new `Parser` instance for the given input string.
    ///
    /// # Errors
    /// Returns [`ParserError::Empty`] for blank input, or any lexer error
    /// found in the first two tokens.
    ///
    /// # Examples
    /// ```
    /// use dice_calc::{Parser, ParserError};
    ///
    /// let parser_result = Parser::new("4 + 3");
    /// assert!(parser_result.is_ok());
    ///
    /// let empty_parser_result = Parser::new("  ").unwrap_err();
    /// assert!(matches!(empty_parser_result.err(), ParserError::Empty));
    /// ```
    pub fn new(input: &str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;

        if current == Token::Eof {
            return Err(ParserError::Empty);
        }

        let peek = lexer.next_token()?;
        Ok(Self { lexer, current, peek })
    }

    /// Parses the entire input into an [`Expr`].
    ///
    /// The whole input must form exactly one expression, anything left over
    /// after it is an error.
    ///
    /// # Errors
    /// Returns a `ParserError` if any syntax errors are encountered during parsing.
    /// The error will be wrapped with positional information using [`ParserError::at_pos()`].
    ///
    /// # Examples
    /// ```
    /// use dice_calc::{Parser, ParserError};
    ///
    /// let mut parser = Parser::new("1 + 2").unwrap();
    /// let expr = parser.parse().unwrap();
    /// assert_eq!(format!("{expr}"), "(1 + 2)");
    ///
    /// let mut invalid_parser = Parser::new("1 +").unwrap();
    /// let err = invalid_parser.parse().unwrap_err();
    /// assert!(matches!(err.err(), ParserError::UnexpectedPrefix(_)))
    /// ```
    pub fn parse(&mut self) -> Result<Expr> {
        self.parse_expression()
            .map_err(|err| err.at_pos(self.lexer.position))
    }

    fn parse_expression(&mut self) -> Result<Expr> {
        let expr = self.parse_tokens(Precedence::Lowest)?;

        if self.peek != Token::Eof {
            return Err(ParserError::TrailingInput(format!("{:?}", self.peek)));
        }

        Ok(expr)
    }

    fn next_token(&mut self) -> Result<()> {
        let peek = self.lexer.next_token()?;
        self.current = std::mem::replace(&mut self.peek, peek);

        Ok(())
    }

    fn parse_tokens(&mut self, precedence: Precedence) -> Result<Expr> {
        let mut expr = self.parse_prefix()?;

        while self.peek != Token::Eof && precedence < self.peek_precedence() {
            self.next_token()?;
            expr = self.parse_infix(expr)?;
        }

        Ok(expr)
    }

    fn parse_prefix(&mut self) -> Result<Expr> {
        match &self.current {
            Token::Number(v) => Ok((*v).into()),
            Token::Name(name) => Ok(Expr::Name(name.clone())),
            Token::Str(text) => Ok(Expr::Str(text.clone())),

            Token::Minus => {
                self.next_token()?;
                let operand = self.parse_tokens(Precedence::Prefix)?;
                Ok(Expr::neg(operand))
            },

            Token::Plus => {
                self.next_token()?;
                let operand = self.parse_tokens(Precedence::Prefix)?;
                Ok(Expr::pos(operand))
            },

            Token::Tilde => {
                self.next_token()?;
                let operand = self.parse_tokens(Precedence::Prefix)?;
                Ok(Expr::invert(operand))
            },

            Token::Not => {
                self.next_token()?;
                let operand = self.parse_tokens(Precedence::Lowest)?;
                Ok(Expr::not(operand))
            },

            Token::LeftParenthesis => {
                self.next_token()?;
                let expr = self.parse_tokens(Precedence::Lowest)?;

                if self.peek != Token::RightParenthesis {
                    return Err(ParserError::UnclosedParenthesis);
                }

                self.next_token()?;
                Ok(expr)
            },

            other => Err(ParserError::UnexpectedPrefix(format!("{other:?}")))
        }
    }

    fn parse_infix(&mut self, expr: Expr) -> Result<Expr> {
        if self.current == Token::LeftParenthesis {
            return self.parse_call(expr);
        }

        match binary_operator(&self.current) {
            Some(_) => self.parse_binary_op(expr),
            None => Err(ParserError::UnexpectedInfix(format!("{:?}", self.current)))
        }
    }

    fn parse_binary_op(&mut self, left: Expr) -> Result<Expr> {
        let token = self.current.clone();
        let Some(op) = binary_operator(&token) else {
            return Err(ParserError::UnexpectedInfix(format!("{token:?}")));
        };

        self.next_token()?;

        // the right side of `**` may carry its own sign and groups to the right
        let precedence = match op {
            BinaryOperator::Power => Precedence::Prefix,
            _ => Precedence::of_token(&token)
        };
        let right = self.parse_tokens(precedence)?;

        Ok(Expr::binary_op(op, left, right))
    }

    fn parse_call(&mut self, callee: Expr) -> Result<Expr> {
        let mut args = Vec::new();
        let mut kwargs: Vec<(String, Expr)> = Vec::new();

        if self.peek == Token::RightParenthesis {
            self.next_token()?;
            return Ok(Expr::Call { callee: Box::new(callee), args, kwargs });
        }

        loop {
            self.next_token()?;

            if let (Token::Name(name), Token::Assign) = (&self.current, &self.peek) {
                let name = name.clone();
                if kwargs.iter().any(|(existing, _)| *existing == name) {
                    return Err(ParserError::KeywordArgument(name));
                }

                self.next_token()?;
                self.next_token()?;
                let value = self.parse_tokens(Precedence::Lowest)?;
                kwargs.push((name, value));
            } else {
                if !kwargs.is_empty() {
                    return Err(ParserError::PositionalAfterKeyword);
                }
                args.push(self.parse_tokens(Precedence::Lowest)?);
            }

            match self.peek {
                Token::Comma => {
                    self.next_token()?;
                    if self.peek == Token::RightParenthesis {
                        self.next_token()?;
                        break;
                    }
                },
                Token::RightParenthesis => {
                    self.next_token()?;
                    break;
                },
                Token::Assign => return Err(ParserError::KeywordArgument(format!("{:?}", self.current))),
                _ => return Err(ParserError::UnclosedParenthesis)
            }
        }

        Ok(Expr::Call { callee: Box::new(callee), args, kwargs })
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::of_token(&self.peek)
    }
}


/// Parses an expression string directly into an [`Expr`].
/// This is a convenience function that creates a [`Parser`] and calls its `parse` method.
///
/// # Errors
/// Returns a `ParserError` if any syntax errors are encountered during parsing.
///
/// # Examples
/// ```
/// use dice_calc::parse_to_expr;
///
/// let expr_result = parse_to_expr("max(3, 4) * 2");
/// assert!(expr_result.is_ok());
/// ```
pub fn parse_to_expr(input: &str) -> Result<Expr> {
    let mut parser = Parser::new(input)?;
    parser.parse()
}
