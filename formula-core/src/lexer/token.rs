use std::fmt::Display;

use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // {/ <цифра> /}[.{/ <цифра> /}]
    Number,

    // Арифметика
    Plus, // +
    Minus, // -
    Mul, // *
    Div, // /
    Pow, // ^

    LParen, // (
    RParen, // )

    // Логические операции
    And, // &
    Or, // |
    Not, // !

    // Операции группы отношения
    Equal, // =
    NotEqual, // !=
    GreaterThan, // >
    GreaterThanOrEqual, // >=
    LessThan, // <
    LessThanOrEqual, // <=

    Comma, // ,

    // {<буква>|_ {<буква>|<цифра>|_}}
    Identifier,
    // MAX, MIN, IF, ...
    Function,

    Eof,
}

impl TokenKind {
    /// Kind of a one-character operator or delimiter.
    pub fn from_symbol(ch: char) -> Option<TokenKind> {
        Some(match ch {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Mul,
            '/' => TokenKind::Div,
            '^' => TokenKind::Pow,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '&' => TokenKind::And,
            '|' => TokenKind::Or,
            '=' => TokenKind::Equal,
            ',' => TokenKind::Comma,
            _ => return None
        })
    }

    pub fn is_comparison(&self) -> bool {
        matches!(self,
            TokenKind::Equal
            | TokenKind::NotEqual
            | TokenKind::GreaterThan
            | TokenKind::GreaterThanOrEqual
            | TokenKind::LessThan
            | TokenKind::LessThanOrEqual
        )
    }

    pub fn is_operator(&self) -> bool {
        match self {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Mul
            | TokenKind::Div
            | TokenKind::Pow
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::Not => true,
            kind => kind.is_comparison(),
        }
    }

    pub fn as_literal(&self) -> &'static str {
        match self {
            TokenKind::Number => "number",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Mul => "*",
            TokenKind::Div => "/",
            TokenKind::Pow => "^",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::And => "&",
            TokenKind::Or => "|",
            TokenKind::Not => "!",
            TokenKind::Equal => "=",
            TokenKind::NotEqual => "!=",
            TokenKind::GreaterThan => ">",
            TokenKind::GreaterThanOrEqual => ">=",
            TokenKind::LessThan => "<",
            TokenKind::LessThanOrEqual => "<=",
            TokenKind::Comma => ",",
            TokenKind::Identifier => "identifier",
            TokenKind::Function => "function",
            TokenKind::Eof => "end of input",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Number
            | TokenKind::Identifier
            | TokenKind::Function
            | TokenKind::Eof => write!(f, "{}", self.as_literal()),
            _ => write!(f, "`{}`", self.as_literal()),
        }
    }
}

/// One lexical unit. `text` holds the literal, the bare identifier name
/// (braces stripped) or the uppercased function name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: SrcSpan,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: SrcSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Identifier => write!(f, "{{{}}}", self.text),
            TokenKind::Eof => write!(f, "{}", self.kind.as_literal()),
            _ => write!(f, "{}", self.text),
        }
    }
}
