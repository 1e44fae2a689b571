
mod types;
mod error;
mod grammar;
mod items;
mod sets;
mod builder;
mod table;
mod pda;

pub use types::{NonTerminal, Production, SemanticAction, Symbol, Terminal};
pub use error::{GrammarError, ParseError};
pub use grammar::{AugmentedGrammar, Grammar};
pub use items::{Item, ItemSet};
pub use sets::{first_sets, follow_sets};
pub use table::{Action, ParsingTable};
pub use pda::{ErrorHandling, ParseOutcome, Parser, Reduction, SyntaxError};
