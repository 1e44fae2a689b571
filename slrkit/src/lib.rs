
//! Lexer and SLR(1) parser generation.
//!
//! Terminals are declared as pattern trees on a [`lexer::Tokenizer`],
//! which compiles them into one minimized DFA. Productions over those
//! terminals go into a [`parser::AugmentedGrammar`], from which a
//! [`parser::ParsingTable`] is built. A [`parser::Parser`] then runs
//! the table over the tokens of a [`lexer::Lexer`].

pub mod lexer;
pub mod parser;
pub mod ids;
pub mod encoding;
pub mod decode;
pub mod diagnostics;
mod error;

pub use error::{Error, Result};
