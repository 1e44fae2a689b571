
use std::io;

use thiserror::Error;

use crate::diagnostics::Window;

use super::types::PatternError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizerError {
    #[error("terminals can't be declared once the transitions are built")]
    AlreadyBuilt,
    #[error("no terminal has been declared")]
    NoPatterns,
    #[error("invalid pattern for terminal {name}: {source}")]
    Pattern { name: String, source: PatternError },
}

#[derive(Debug, Error)]
pub enum LexError {
    #[error("unexpected token {0}")]
    UnexpectedToken(Window),
    #[error("the tokenizer's transitions are not built")]
    NotBuilt,
    #[error("token longer than {limit} bytes")]
    TokenTooLong { limit: usize },
    #[error("range of {len} bytes at {offset} is outside a buffer of {available} bytes")]
    OutOfBounds { offset: usize, len: usize, available: usize },
    #[error("could not read input: {0}")]
    Io(#[from] io::Error),
}

impl LexError {
    /*
     * Tokenizers only know about the buffer they're given;
     * the lexer moves their windows to stream offsets.
     */
    pub fn shifted(self, by: usize) -> LexError {
        match self {
            LexError::UnexpectedToken(window) => LexError::UnexpectedToken(window.shifted(by)),
            other => other,
        }
    }
}
