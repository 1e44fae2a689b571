
use thiserror::Error;

use crate::decode::DecodeError;
use crate::lexer::{LexError, TokenClass};

use super::pda::SyntaxError;
use super::table::Action;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("the grammar has no production")]
    NoProductions,
    #[error("production of {lhs} has an empty right-hand side")]
    EmptyProduction { lhs: String },
    #[error("production of {lhs} uses the end-of-input terminal")]
    ReservedTerminal { lhs: String },
    #[error("{name} is the synthesized start symbol and cannot appear in a production")]
    ReservedNonTerminal { name: String },
    #[error("grammar is not SLR(1): conflict between {existing} and {candidate} in state {state} on terminal class {class}")]
    NotSlr1 { state: usize, class: TokenClass, existing: Action, candidate: Action },
    #[error("terminal {name} has class {class}, but the table is only {width} terminals wide")]
    TerminalOutOfRange { name: String, class: TokenClass, width: usize },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("{0}")]
    Syntax(Box<SyntaxError>),
    #[error("the token stream ended without an end-of-input token")]
    UnexpectedEnd,
    #[error("production {production} has no terminal {terminal} left to take")]
    ArgumentOutOfRange { terminal: String, production: usize },
    #[error("semantic action failed: {0}")]
    Action(String),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("no goto from state {state} on {non_terminal}")]
    MissingGoto { state: usize, non_terminal: String },
}
