mod types;
mod builders;
mod macros;
mod nfa;
mod thompson;
mod subset;
mod minimize;
mod dfa;
mod token;
mod error;
mod tokenizer;
mod stream;

pub use types::{Greediness, Literal, PatternError, RegExp};
pub use builders::*;
pub use nfa::{Automaton, Fragment, InputChar, State, StateId};
pub use thompson::Compiler;
pub use subset::subset_construction;
pub use minimize::minimize;
pub use dfa::{Match, Matcher};
pub use token::{Token, TokenClass, END_OF_INPUT};
pub use error::{LexError, TokenizerError};
pub use tokenizer::{MatchHook, MatchVerdict, Scanned, Tokenizer};
pub use stream::{Lexer, LexerConfig};
pub use crate::encoding::Encoding;
