pub mod bindings;
pub mod registry;
pub mod value;

pub mod prelude {
    pub use super::{
        bindings::*,
        registry::*,
        value::*
    };
}
