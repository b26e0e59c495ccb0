//! Front-end of the Tarn expression language: a hand-written lexer, a
//! Pratt parser and a multi-pass semantic analyzer that together turn
//! UTF-8 source text into a fully typed syntax tree. Code generation,
//! the REPL shell and the runtime live elsewhere and consume the
//! [`Compilation`] this crate produces.

pub mod analysis;
pub mod arena;
pub mod arena_ctx;
pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod compile;
pub mod error;
pub mod formatter;
pub mod intern;
pub mod lexer;
pub mod parser;
pub mod scope;
pub mod source;
pub mod style;
pub mod suggest;
pub mod token;
pub mod types;

pub use compile::{compile, parse, Compilation};
