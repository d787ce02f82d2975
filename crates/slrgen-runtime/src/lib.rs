//! Runtime implementation for the `slrgen` parser generator.

pub mod definition;
pub mod driver;
pub mod parser;

mod util;

pub use crate::{
    definition::{Movement, ParseDef},
    driver::{DriverReport, LineDriver, SyntaxError},
    parser::{Lexeme, ParseOutcome, Parser, Token},
};
