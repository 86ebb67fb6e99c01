use crate::Number;
use crate::parser::error::*;


#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(Number),
    Name(String),
    Str(String),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    At,
    Tilde,
    Ampersand,
    Pipe,
    Caret,
    ShiftLeft,
    ShiftRight,
    LeftParenthesis,
    RightParenthesis,
    Comma,
    Assign,
    Not,
    Eof,
}


#[derive(Debug)]
pub(crate) struct Lexer {
    input: Vec<char>,
    pub position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let Some(ch) = self.current() else {
            return Ok(Token::Eof);
        };

        match ch {
            '+' => self.single(Token::Plus),
            '-' => self.single(Token::Minus),
            '%' => self.single(Token::Percent),
            '@' => self.single(Token::At),
            '~' => self.single(Token::Tilde),
            '&' => self.single(Token::Ampersand),
            '|' => self.single(Token::Pipe),
            '^' => self.single(Token::Caret),
            '(' => self.single(Token::LeftParenthesis),
            ')' => self.single(Token::RightParenthesis),
            ',' => self.single(Token::Comma),
            '=' => self.single(Token::Assign),
            '*' => self.double('*', Token::Star, Token::DoubleStar),
            '/' => self.double('/', Token::Slash, Token::DoubleSlash),
            '<' => self.shift('<', Token::ShiftLeft),
            '>' => self.shift('>', Token::ShiftRight),
            '\'' | '"' => self.read_string(ch),
            '0'..='9' => self.read_number(),
            '.' if self.peek_char().is_some_and(|c| c.is_ascii_digit()) => self.read_number(),
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.read_identifier()),
            _ => Err(ParserError::Token(ch))
        }
    }

    fn current(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn single(&mut self, token: Token) -> Result<Token> {
        self.position += 1;
        Ok(token)
    }

    fn double(&mut self, second: char, single: Token, double: Token) -> Result<Token> {
        if self.peek_char() == Some(second) {
            self.position += 2;
            Ok(double)
        } else {
            self.position += 1;
            Ok(single)
        }
    }

    fn shift(&mut self, ch: char, token: Token) -> Result<Token> {
        if self.peek_char() == Some(ch) {
            self.position += 2;
            Ok(token)
        } else {
            Err(ParserError::Token(ch))
        }
    }

    fn skip_whitespace(&mut self) {
        while self.current().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    fn skip_digits(&mut self) -> usize {
        let start = self.position;
        while self.current().is_some_and(|c| c.is_ascii_digit()) {
            self.position += 1;
        }
        self.position - start
    }

    fn read_number(&mut self) -> Result<Token> {
        let start = self.position;
        let mut is_float = false;

        self.skip_digits();

        if self.current() == Some('.') {
            is_float = true;
            self.position += 1;
            self.skip_digits();
        }

        if matches!(self.current(), Some('e' | 'E')) {
            is_float = true;
            self.position += 1;
            if matches!(self.current(), Some('+' | '-')) {
                self.position += 1;
            }
            if self.skip_digits() == 0 {
                let text: String = self.input[start..self.position].iter().collect();
                return Err(ParserError::Number(text));
            }
        }

        let text: String = self.input[start..self.position].iter().collect();
        let parse_float = |text: &str| {
            text.parse::<f64>()
                .map(|v| Token::Number(Number::Float(v)))
                .map_err(|_| ParserError::Number(text.into()))
        };

        if is_float {
            return parse_float(&text);
        }

        // integers wider than i64 become floats and fail the magnitude check later
        match text.parse::<i64>() {
            Ok(v) => Ok(Token::Number(Number::Int(v))),
            Err(_) => parse_float(&text)
        }
    }

    fn read_identifier(&mut self) -> Token {
        let start = self.position;
        while self.current().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.position += 1;
        }

        let identifier: String = self.input[start..self.position].iter().collect();
        match identifier.as_str() {
            "not" => Token::Not,
            _ => Token::Name(identifier)
        }
    }

    fn read_string(&mut self, quote: char) -> Result<Token> {
        self.position += 1;
        let start = self.position;

        while let Some(ch) = self.current() {
            if ch == quote {
                let text: String = self.input[start..self.position].iter().collect();
                self.position += 1;
                return Ok(Token::Str(text));
            }
            self.position += 1;
        }

        Err(ParserError::UnclosedString)
    }
}
