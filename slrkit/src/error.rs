
use thiserror::Error;

use crate::decode::DecodeError;
use crate::encoding::EncodingError;
use crate::ids::IdError;
use crate::lexer::{LexError, PatternError, TokenizerError};
use crate::parser::{GrammarError, ParseError};

/*
 * Any error of the crate, for callers that just want to use `?`
 * all the way from declaring terminals to running the parser.
 */
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Id(#[from] IdError),
}

pub type Result<T> = std::result::Result<T, Error>;
