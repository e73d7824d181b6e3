pub mod lexer;
pub mod parser;
pub mod environment;
pub mod eval;
pub mod engine;
pub mod utils;

pub use rust_decimal::Decimal;

pub use engine::{default_engine, evaluate, parse, Engine, Limits, Parsed};
pub use environment::prelude::{Arity, Bindings, Registry};
pub use parser::prelude::{Node, Postfix};
pub use utils::prelude::{Error, ErrorKind};
