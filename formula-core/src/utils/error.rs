use std::fmt::Display;

use termcolor::Buffer;
use thiserror::Error;

use crate::{
    eval::prelude::EvalError,
    lexer::prelude::LexicalError,
    parser::prelude::ParseError,
};
use super::diagnostic::{Diagnostic, Label, Level, Location};

/// Name shown in rendered diagnostics in place of a file path.
const FORMULA_NAME: &str = "formula";

/// The four failure classes a formula can hit, plus the depth guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Lexing met an unrecognised or malformed character sequence.
    IllegalCharacter,
    /// The token stream does not follow the grammar.
    IllegalSyntax,
    /// Arithmetic precondition violated, or an identifier has no value.
    IllegalCalculation,
    /// Nesting went past the configured maximum depth.
    TooDeep,
    /// An invariant the grammar should guarantee was broken.
    System,
}

impl ErrorKind {
    pub fn title(&self) -> &'static str {
        match self {
            ErrorKind::IllegalCharacter => "Illegal character",
            ErrorKind::IllegalSyntax => "Illegal syntax",
            ErrorKind::IllegalCalculation => "Illegal calculation",
            ErrorKind::TooDeep => "Expression too deep",
            ErrorKind::System => "System error",
        }
    }

    pub fn is_user_error(&self) -> bool {
        !matches!(self, ErrorKind::System)
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title().to_lowercase())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("{}: {error}", .error.kind())]
    Lex {
        src: String,
        error: LexicalError
    },
    #[error("{}: {error}", .error.kind())]
    Parse {
        src: String,
        error: ParseError
    },
    #[error("{}: {error}", .error.kind())]
    Eval {
        src: Option<String>,
        error: EvalError
    },
    #[error("IO operation failed: {err}")]
    StdIo {
        err: std::io::ErrorKind
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Lex { error, .. } => error.kind(),
            Error::Parse { error, .. } => error.kind(),
            Error::Eval { error, .. } => error.kind(),
            Error::StdIo { .. } => ErrorKind::System,
        }
    }

    /// Attaches the formula text to an evaluation error so it renders with spans.
    pub fn with_source(self, formula: &str) -> Self {
        match self {
            Error::Eval { error, .. } => Error::Eval {
                src: Some(formula.to_string()),
                error
            },
            other => other,
        }
    }

    pub fn pretty_string(&self) -> String {
        let mut nocolor = Buffer::no_color();

        match self.pretty(&mut nocolor) {
            Ok(()) => String::from_utf8_lossy(&nocolor.into_inner()).into_owned(),
            Err(_) => self.to_string(),
        }
    }

    pub fn pretty(&self, buf: &mut Buffer) -> std::io::Result<()> {
        use std::io::Write;

        for diagnostic in self.to_diagnostics() {
            diagnostic.write(buf)?;
            writeln!(buf)?;
        }

        Ok(())
    }

    pub fn to_diagnostics(&self) -> Vec<Diagnostic<'_>> {
        match self {
            Error::Lex { src, error } => {
                let (label, extra) = error.details();

                vec![Diagnostic {
                    title: error.kind().title().into(),
                    text: extra.join("\n"),
                    level: Level::Error,
                    location: Some(Location {
                        src,
                        name: FORMULA_NAME.into(),
                        label: Label {
                            text: Some(label.to_string()),
                            span: error.location,
                        },
                        extra_labels: vec![],
                    }),
                }]
            },
            Error::Parse { src, error } => {
                let (label, extra) = error.details();

                vec![Diagnostic {
                    title: error.kind().title().into(),
                    text: extra.join("\n"),
                    level: Level::Error,
                    location: Some(Location {
                        src,
                        name: FORMULA_NAME.into(),
                        label: Label {
                            text: Some(label.to_string()),
                            span: error.span,
                        },
                        extra_labels: vec![],
                    }),
                }]
            },
            Error::Eval { src: Some(src), error } => {
                let (label, extra) = error.details();

                let extra_labels = error.frames.iter()
                    .map(|frame| Label {
                        text: Some(format!("while applying `{}`", frame.operator)),
                        span: frame.span,
                    })
                    .collect();

                vec![Diagnostic {
                    title: error.kind().title().into(),
                    text: extra.join("\n"),
                    level: Level::Error,
                    location: Some(Location {
                        src,
                        name: FORMULA_NAME.into(),
                        label: Label {
                            text: Some(label.to_string()),
                            span: error.span,
                        },
                        extra_labels,
                    }),
                }]
            },
            Error::Eval { src: None, error } => {
                let (label, extra) = error.details();

                let text = std::iter::once(format!("{label} (at {})", error.span))
                    .chain(extra)
                    .chain(error.frames.iter()
                        .map(|frame| format!("while applying `{}` at {}", frame.operator, frame.span)))
                    .collect::<Vec<String>>()
                    .join("\n");

                vec![Diagnostic {
                    title: error.kind().title().into(),
                    text,
                    level: Level::Error,
                    location: None,
                }]
            },
            Error::StdIo { err } => {
                vec![Diagnostic {
                    title: "Standard IO error".into(),
                    text: format!("{err}"),
                    level: Level::Error,
                    location: None,
                }]
            }
        }
    }
}
