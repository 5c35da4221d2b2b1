mod core;
mod parser;
mod printer;

pub use self::core::{Flag, FlagSet};
pub use self::parser::ParseError;
