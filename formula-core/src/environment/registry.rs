use std::collections::HashMap;
use std::fmt::Display;

use rust_decimal::Decimal;
use thiserror::Error;

use super::value::truthy;

/// How many arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Exact(usize),
    AtLeastOne,
    Any,
}

impl Arity {
    pub fn check(&self, count: usize) -> bool {
        match self {
            Arity::Exact(expected) => *expected == count,
            Arity::AtLeastOne => count > 0,
            Arity::Any => true,
        }
    }
}

impl Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arity::Exact(1) => write!(f, "1 argument"),
            Arity::Exact(expected) => write!(f, "{expected} arguments"),
            Arity::AtLeastOne => write!(f, "at least 1 argument"),
            Arity::Any => write!(f, "any number of arguments"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("unknown function `{name}`")]
    UnknownFunction {
        name: String
    },
    #[error("`{function}` requires {expected}, but got {got}")]
    WrongArgumentCount {
        function: String,
        expected: Arity,
        got: usize
    },
    #[error("arithmetic overflow")]
    Overflow,
}

/// Function body; receives the already evaluated arguments.
pub type Builtin = fn(&[Decimal]) -> Result<Decimal, CallError>;

#[derive(Clone, Copy)]
pub struct Function {
    pub arity: Arity,
    pub call: Builtin,
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Function table shared by the lexer (name lookup), the parser (arity
/// check) and the interpreter (application). Names are stored uppercase.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    functions: HashMap<String, Function>,
}

impl Registry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// `MAX`, `MIN`, `IF`, `SUM`, `AVG` and `ABS`.
    pub fn standard() -> Self {
        Self::empty()
            .with("MAX", Arity::AtLeastOne, max)
            .with("MIN", Arity::AtLeastOne, min)
            .with("IF", Arity::Exact(3), if_)
            .with("SUM", Arity::Any, sum)
            .with("AVG", Arity::AtLeastOne, avg)
            .with("ABS", Arity::Exact(1), abs)
    }

    pub fn with(mut self, name: &str, arity: Arity, call: Builtin) -> Self {
        self.register(name, arity, call);
        self
    }

    pub fn register(&mut self, name: &str, arity: Arity, call: Builtin) -> &mut Self {
        self.functions.insert(name.to_ascii_uppercase(), Function { arity, call });
        self
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.functions.get(&name.to_ascii_uppercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn arity(&self, name: &str) -> Option<Arity> {
        self.get(name).map(|function| function.arity)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names = self.functions.keys()
            .map(String::as_str)
            .collect::<Vec<&str>>();

        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Checks the argument count again, then applies the function.
    pub fn call(&self, name: &str, args: &[Decimal]) -> Result<Decimal, CallError> {
        let function = self.get(name).ok_or_else(|| CallError::UnknownFunction {
            name: name.to_string()
        })?;

        if !function.arity.check(args.len()) {
            return Err(CallError::WrongArgumentCount {
                function: name.to_ascii_uppercase(),
                expected: function.arity,
                got: args.len(),
            });
        }

        (function.call)(args)
    }
}

fn missing(function: &str, expected: Arity, got: usize) -> CallError {
    CallError::WrongArgumentCount {
        function: function.to_string(),
        expected,
        got,
    }
}

// The first of several equal values wins, so `MAX(1.0, 1)` keeps `1.0`.
fn max(args: &[Decimal]) -> Result<Decimal, CallError> {
    args.iter()
        .copied()
        .reduce(|best, next| if next > best { next } else { best })
        .ok_or_else(|| missing("MAX", Arity::AtLeastOne, 0))
}

fn min(args: &[Decimal]) -> Result<Decimal, CallError> {
    args.iter()
        .copied()
        .reduce(|best, next| if next < best { next } else { best })
        .ok_or_else(|| missing("MIN", Arity::AtLeastOne, 0))
}

fn if_(args: &[Decimal]) -> Result<Decimal, CallError> {
    match args {
        [condition, then, otherwise] => Ok(if truthy(condition) { *then } else { *otherwise }),
        _ => Err(missing("IF", Arity::Exact(3), args.len())),
    }
}

fn sum(args: &[Decimal]) -> Result<Decimal, CallError> {
    args.iter()
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(*value))
        .ok_or(CallError::Overflow)
}

fn avg(args: &[Decimal]) -> Result<Decimal, CallError> {
    if args.is_empty() {
        return Err(missing("AVG", Arity::AtLeastOne, 0));
    }

    sum(args)?
        .checked_div(Decimal::from(args.len()))
        .ok_or(CallError::Overflow)
}

fn abs(args: &[Decimal]) -> Result<Decimal, CallError> {
    match args {
        [value] => Ok(value.abs()),
        _ => Err(missing("ABS", Arity::Exact(1), args.len())),
    }
}
