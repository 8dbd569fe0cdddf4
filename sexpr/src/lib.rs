//! S-expressions as a configuration format.
//!
//! # Syntax
//!
//! This crate implements a minimalist version of s-expressions.
//! The syntax of the s-expressions is as follows:
//!
//! - **Lists** are sequences of values, delimited on the outside by `(` and `)`
//!   and separated by whitespace.
//!
//! - **Atoms** are strings, either appearing verbatim without delimiters or
//!   enclosed within double quotes. Verbatim atoms end at whitespace, `(`, `)`,
//!   `"` or `;`. Within quoted strings, the following escaping rules apply:
//!
//!    - `\"` and `\\` are used to escape `"` and `\`.
//!    - `\n`, `\r` and `\t` stand for the newline, carriage return and tab characters.
//!    - A backslash before any other character is kept, together with that character.
//!
//! - **Comments** begin with a `;` and extend to the end of the line.
//!
//! # Configuration
//!
//! A document parsed with [`parse_document`] can be queried by dot-separated
//! paths through [`Config`](config::Config).

pub mod config;
pub(crate) mod escape;
pub mod lexer;
pub mod parser;
pub mod util;
pub mod value;

pub use config::{Config, ConfigError};
pub use lexer::{tokenize, LexError, LexErrorKind, Token};
pub use parser::{
    parse_all, parse_document, parse_one, parse_streaming, Exprs, ParseError, ParseErrorKind,
};
pub use value::{Sexp, TypeMismatch};
