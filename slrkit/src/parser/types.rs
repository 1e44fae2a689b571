
use std::fmt;
use std::rc::Rc;

use crate::lexer::{TokenClass, END_OF_INPUT};

use super::error::ParseError;
use super::pda::Reduction;

/*
 * A terminal is a name on top of a token class. Two terminals
 * are the same symbol iff they have the same class.
 */
#[derive(Clone, Debug)]
pub struct Terminal {
    name: Rc<str>,
    class: TokenClass,
}

impl Terminal {
    pub fn new(name: &str, class: TokenClass) -> Terminal {
        Terminal { name: Rc::from(name), class }
    }

    pub fn end_of_input() -> Terminal {
        Terminal::new("$", END_OF_INPUT)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> TokenClass {
        self.class
    }

    pub fn sym(&self) -> Symbol {
        Symbol::Terminal(self.clone())
    }
}

impl PartialEq for Terminal {
    fn eq(&self, other: &Terminal) -> bool {
        self.class == other.class
    }
}

impl Eq for Terminal {}

// Non-terminals are identified by their name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NonTerminal {
    name: Rc<str>,
}

impl NonTerminal {
    pub fn new(name: &str) -> NonTerminal {
        NonTerminal { name: Rc::from(name) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sym(&self) -> Symbol {
        Symbol::NonTerminal(self.clone())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Symbol {
    Terminal(Terminal),
    NonTerminal(NonTerminal),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Terminal(t) => t.name(),
            Symbol::NonTerminal(n) => n.name(),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/*
 * The way the table builder names symbols: non-terminals by
 * their index in the grammar, terminals by their class. The
 * derived order puts every non-terminal before the terminals.
 */
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub(crate) enum SymbolId {
    N(usize),
    T(TokenClass),
}

/*
 * Run on each reduction, with the caller's context and the
 * tokens matched by the production's terminals.
 */
pub type SemanticAction<C> = Box<dyn Fn(&mut C, &mut Reduction) -> Result<(), ParseError>>;

pub struct Production<C> {
    lhs: NonTerminal,
    rhs: Vec<Symbol>,
    action: Option<SemanticAction<C>>,
    // Set when the production is added to a grammar.
    pub(super) id: Option<usize>,
}

impl<C> Production<C> {
    pub fn new(lhs: &NonTerminal, rhs: impl IntoIterator<Item = Symbol>) -> Production<C> {
        Production {
            lhs: lhs.clone(),
            rhs: rhs.into_iter().collect(),
            action: None,
            id: None,
        }
    }

    pub fn with_action(
        mut self,
        action: impl Fn(&mut C, &mut Reduction) -> Result<(), ParseError> + 'static,
    )
        -> Production<C>
    {
        self.action = Some(Box::new(action));
        self
    }

    pub fn lhs(&self) -> &NonTerminal {
        &self.lhs
    }

    pub fn rhs(&self) -> &[Symbol] {
        &self.rhs
    }

    pub fn action(&self) -> Option<&SemanticAction<C>> {
        self.action.as_ref()
    }

    pub fn id(&self) -> Option<usize> {
        self.id
    }

    // How many tokens a reduction by this production hands out.
    pub fn terminal_count(&self) -> usize {
        self.rhs.iter().filter(|s| matches!(s, Symbol::Terminal(_))).count()
    }
}

impl<C> fmt::Display for Production<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.lhs.name())?;
        for sym in self.rhs.iter() {
            write!(f, " {}", sym)?;
        }
        Ok(())
    }
}

impl<C> fmt::Debug for Production<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
