use std::fmt::Display;

use crate::{
    environment::prelude::Arity,
    lexer::prelude::{Token, TokenKind},
    utils::prelude::{ErrorKind, SrcSpan}
};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    UnexpectedToken {
        token: Token,
        expected: Vec<String>,
    },
    UnexpectedEof {
        expected: Vec<String>,
    },
    WrongArgumentCount {
        function: String,
        expected: Arity,
        got: usize,
    },
    IncompleteParse {
        token: Token,
    },
    TooDeep {
        max_depth: usize,
    },
    UnknownFunction {
        name: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub error: ParseErrorType,
    pub span: SrcSpan,
    /// Token cursor when the error was raised.
    pub index: usize,
}

fn found(token: &Token) -> String {
    match token.kind {
        TokenKind::Number => format!("the number {}", token.text),
        TokenKind::Identifier => format!("the identifier {token}"),
        TokenKind::Function => format!("the function `{}`", token.text),
        kind => format!("{kind}"),
    }
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        match &self.error {
            ParseErrorType::TooDeep { .. } => ErrorKind::TooDeep,
            ParseErrorType::UnknownFunction { .. } => ErrorKind::System,
            _ => ErrorKind::IllegalSyntax,
        }
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            ParseErrorType::UnexpectedToken { token, expected } => {
                let messages = std::iter::once(format!("Found {}, expected one of: ", found(token)))
                    .chain(expected.iter().map(|s| format!("- {s}")))
                    .collect();

                ("Not expected this", messages)
            },
            ParseErrorType::UnexpectedEof { expected } => {
                let messages = std::iter::once("Expected one of: ".to_string())
                    .chain(expected.iter().map(|s| format!("- {s}")))
                    .collect();

                ("Unexpected end of input", messages)
            },
            ParseErrorType::WrongArgumentCount { function, expected, got } => {
                ("Wrong number of arguments", vec![format!("`{function}` requires {expected}, but got {got}")])
            },
            ParseErrorType::IncompleteParse { token } => {
                ("Expected end of input", vec![format!("Found {} after a complete expression", found(token))])
            },
            ParseErrorType::TooDeep { max_depth } => {
                ("Expression is nested too deeply", vec![format!("The limit is {max_depth} grammar levels")])
            },
            ParseErrorType::UnknownFunction { name } => {
                ("Function has no arity rule", vec![format!("`{name}` is missing from the registry")])
            }
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (message, extra) = self.details();

        write!(f, "{message} at index {} (token {})", self.span.start, self.index)?;

        if !extra.is_empty() {
            write!(f, ": {}", extra.join(" "))?;
        }

        Ok(())
    }
}

pub fn parse_error<T>(error: ParseErrorType, span: SrcSpan, index: usize) -> Result<T, ParseError> {
    Err(ParseError { error, span, index })
}
