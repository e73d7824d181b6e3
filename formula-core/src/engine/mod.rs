
use std::path::Path;

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use utf8_chars::BufReadCharsExt;

use crate::{
    environment::prelude::{Bindings, Registry},
    eval::prelude::Interpreter,
    lexer::prelude::{scan, Token},
    parser::prelude::{Node, Parser, DEFAULT_MAX_DEPTH},
    utils::prelude::Error
};

/// Resource limits applied to every parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Grammar levels the parser may descend; each parenthesis costs eight.
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A formula read from a file, kept with its text for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub source: String,
    pub root: Node,
}

/// Lex, parse and evaluate with one registry and one set of limits.
///
/// An engine is immutable once built, so a single instance can serve any
/// number of threads.
#[derive(Debug, Clone)]
pub struct Engine {
    registry: Registry,
    limits: Limits,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Registry::standard())
    }
}

impl Engine {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            limits: Limits::default(),
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.limits.max_depth = max_depth;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn lex(&self, formula: &str) -> Result<Vec<Token>, Error> {
        log::debug!("lexing {formula:?}");

        scan(formula, &self.registry).map_err(|error| Error::Lex {
            src: formula.to_string(),
            error
        })
    }

    pub fn parse(&self, formula: &str) -> Result<Node, Error> {
        let tokens = self.lex(formula)?;

        log::debug!("parsing {} tokens", tokens.len());

        let node = Parser::new(tokens, &self.registry)
            .with_max_depth(self.limits.max_depth)
            .parse()
            .map_err(|error| Error::Parse {
                src: formula.to_string(),
                error
            })?;

        log::trace!("ast: {node:?}");

        Ok(node)
    }

    /// Reads a formula from a UTF-8 file. Trailing line breaks are dropped;
    /// any other line break is still an illegal character.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Parsed, Error> {
        let path = path.as_ref();

        log::debug!("reading formula from {}", path.display());

        let file = std::fs::File::open(path)
            .map_err(|err| Error::StdIo { err: err.kind() })?;

        let file_size = file.metadata()
            .map_err(|err| Error::StdIo { err: err.kind() })?.len() as usize;

        let mut source = String::with_capacity(file_size);
        let mut reader = std::io::BufReader::new(file);

        for ch in reader.chars() {
            source.push(ch.map_err(|err| Error::StdIo { err: err.kind() })?);
        }

        let trimmed = source.trim_end_matches(['\r', '\n']).len();
        source.truncate(trimmed);

        let root = self.parse(&source)?;

        Ok(Parsed { source, root })
    }

    pub fn evaluate(&self, node: &Node, bindings: &Bindings) -> Result<Decimal, Error> {
        log::debug!("evaluating {node} with {} bindings", bindings.len());

        let value = Interpreter::new(&self.registry, bindings)
            .evaluate(node)
            .map_err(|error| Error::Eval { src: None, error })?;

        log::debug!("{node} = {value}");

        Ok(value)
    }

    /// Parses and evaluates in one go; evaluation errors keep the formula text.
    pub fn eval_str(&self, formula: &str, bindings: &Bindings) -> Result<Decimal, Error> {
        let node = self.parse(formula)?;

        self.evaluate(&node, bindings)
            .map_err(|err| err.with_source(formula))
    }
}

static DEFAULT_ENGINE: Lazy<Engine> = Lazy::new(Engine::default);

/// Shared engine with the standard registry and default limits.
pub fn default_engine() -> &'static Engine {
    &DEFAULT_ENGINE
}

pub fn parse(formula: &str) -> Result<Node, Error> {
    default_engine().parse(formula)
}

pub fn evaluate(node: &Node, bindings: &Bindings) -> Result<Decimal, Error> {
    default_engine().evaluate(node, bindings)
}
