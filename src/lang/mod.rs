/*!
# Rust Language Module

This Rust module provides lexical analysis and parsing of the BASIC language.

*/

#[macro_use]
mod error;
mod lex;
mod parse;

pub use error::Error;
pub use error::ErrorCode;
pub use error::ErrorKind;
pub use lex::lex;
pub use lex::Lexer;
pub use parse::parse_program;
pub use parse::Parser;

pub mod ast;
pub mod token;

/// Character range of a construct within the source text.
pub type Column = std::ops::Range<usize>;

/// One based line of the source text, when known.
pub type LineNumber = Option<usize>;

#[cfg(test)]
mod tests;
