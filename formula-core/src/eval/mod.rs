pub mod error;
pub mod interpreter;

pub mod prelude {
    pub use super::{
        error::*,
        interpreter::*
    };
}
