use std::fmt::Display;

use crate::utils::prelude::{ErrorKind, SrcSpan};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexicalErrorType {
    UnrecognizedToken { tok: char },
    MultipleFloatingPoints,
    MissingDigitAfterPeriod { found: Option<char> },
    NumberOutOfRange { literal: String },
    InvalidIdentifierStart { found: Option<char> },
    MissingIdentifierEnd { found: Option<char> },
    UnknownFunction { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalError {
    pub error: LexicalErrorType,
    pub location: SrcSpan
}

fn describe(found: &Option<char>) -> String {
    match found {
        Some(ch) => format!("found {ch:?}"),
        None => "found end of input".to_string(),
    }
}

impl LexicalError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::IllegalCharacter
    }

    /// The character the cursor stopped on, if there was one.
    pub fn offending_char(&self) -> Option<char> {
        match &self.error {
            LexicalErrorType::UnrecognizedToken { tok } => Some(*tok),
            LexicalErrorType::MultipleFloatingPoints => Some('.'),
            LexicalErrorType::MissingDigitAfterPeriod { found }
            | LexicalErrorType::InvalidIdentifierStart { found }
            | LexicalErrorType::MissingIdentifierEnd { found } => *found,
            LexicalErrorType::NumberOutOfRange { .. }
            | LexicalErrorType::UnknownFunction { .. } => None,
        }
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            LexicalErrorType::UnrecognizedToken { tok } => {
                ("Unexpected character", vec![format!("Don't know what to do with {tok:?}")])
            },
            LexicalErrorType::MultipleFloatingPoints => {
                ("Only one `.` is allowed in a number", vec![])
            },
            LexicalErrorType::MissingDigitAfterPeriod { found } => {
                ("Expected a digit after `.`", vec![format!("Numbers must end with a digit, {}", describe(found))])
            },
            LexicalErrorType::NumberOutOfRange { literal } => {
                ("Number cannot be represented exactly", vec![format!("`{literal}` has too many digits")])
            },
            LexicalErrorType::InvalidIdentifierStart { found } => {
                ("Identifier must start with a letter or `_`", vec![describe(found)])
            },
            LexicalErrorType::MissingIdentifierEnd { found } => {
                ("Expected `}` after an identifier", vec![describe(found)])
            },
            LexicalErrorType::UnknownFunction { name } => {
                ("Unknown function name", vec![format!("No function `{name}` is registered")])
            }
        }
    }
}

impl Display for LexicalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (message, extra) = self.details();

        write!(f, "{message} at index {}", self.location.start)?;

        if !extra.is_empty() {
            write!(f, " ({})", extra.join("; "))?;
        }

        Ok(())
    }
}
