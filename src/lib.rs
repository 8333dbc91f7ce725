pub mod error;
pub mod fuel;
pub mod intcode;
pub mod program;
pub mod search;

pub use error::{Error, Fault, ParseError, Result};
