use std::fmt::Display;

use crate::{
    environment::prelude::CallError,
    lexer::prelude::Token,
    parser::prelude::BinaryOperator,
    utils::prelude::{ErrorKind, SrcSpan}
};

#[derive(Debug, Clone, PartialEq)]
pub enum EvalErrorType {
    MissingIdentifier {
        name: String
    },
    MalformedDecimal {
        text: String
    },
    DivisionByZero,
    ZeroToNegativePower,
    InvalidPower,
    Overflow {
        operator: BinaryOperator
    },
    Call {
        function: String,
        error: CallError
    },
}

/// An operator or function application the error passed through.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub operator: String,
    pub span: SrcSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvalError {
    pub error: EvalErrorType,
    pub span: SrcSpan,
    /// Enclosing applications, innermost first.
    pub frames: Vec<Frame>,
}

impl EvalError {
    pub fn new(error: EvalErrorType, span: SrcSpan) -> Self {
        Self {
            error,
            span,
            frames: vec![],
        }
    }

    /// Records that the error propagated out of the application at `token`.
    pub fn through(mut self, token: &Token) -> Self {
        self.frames.push(Frame {
            operator: token.text.clone(),
            span: token.span,
        });

        self
    }

    pub fn kind(&self) -> ErrorKind {
        match &self.error {
            EvalErrorType::MalformedDecimal { .. } => ErrorKind::System,
            EvalErrorType::Call { error, .. } => match error {
                CallError::WrongArgumentCount { .. } => ErrorKind::IllegalSyntax,
                CallError::UnknownFunction { .. } => ErrorKind::System,
                CallError::Overflow => ErrorKind::IllegalCalculation,
            },
            _ => ErrorKind::IllegalCalculation,
        }
    }

    pub fn details(&self) -> (&'static str, Vec<String>) {
        match &self.error {
            EvalErrorType::MissingIdentifier { name } => {
                ("Identifier has no value", vec![format!("No value was bound to `{{{name}}}`")])
            },
            EvalErrorType::MalformedDecimal { text } => {
                ("Value is not a decimal number", vec![format!("Could not read {text:?} as a decimal")])
            },
            EvalErrorType::DivisionByZero => ("Division by zero", vec![]),
            EvalErrorType::ZeroToNegativePower => {
                ("Zero raised to a negative power", vec!["This would divide by zero".to_string()])
            },
            EvalErrorType::InvalidPower => {
                ("Power has no real result", vec!["A negative base needs a whole exponent".to_string()])
            },
            EvalErrorType::Overflow { operator } => {
                ("Arithmetic overflow", vec![format!("The result of `{operator}` does not fit in a decimal")])
            },
            EvalErrorType::Call { function, error } => {
                ("Function call failed", vec![format!("{function}: {error}")])
            }
        }
    }
}

impl Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (message, extra) = self.details();

        write!(f, "{message} at index {}", self.span.start)?;

        if !extra.is_empty() {
            write!(f, " ({})", extra.join("; "))?;
        }

        for frame in &self.frames {
            write!(f, ", in `{}` at index {}", frame.operator, frame.span.start)?;
        }

        Ok(())
    }
}
