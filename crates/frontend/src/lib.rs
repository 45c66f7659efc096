pub mod lexer;
pub mod parser;

extern crate runtime;
extern crate tools;

pub use parser::{parse, Parser};
