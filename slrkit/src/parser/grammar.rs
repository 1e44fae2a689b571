
use std::ops::Deref;

use crate::lexer::END_OF_INPUT;

use super::error::GrammarError;
use super::types::*;

/*
 * An ordered list of productions. A production's id is its
 * index in that list. Symbols are numbered in order of first
 * appearance, scanning each production's right-hand side and
 * then its left-hand side.
 */
pub struct Grammar<C> {
    productions: Vec<Production<C>>,
    non_terminals: Vec<NonTerminal>,
    // Always starts with the end-of-input terminal.
    terminals: Vec<Terminal>,
}

impl<C> Grammar<C> {
    pub fn new() -> Grammar<C> {
        Grammar {
            productions: Vec::new(),
            non_terminals: Vec::new(),
            terminals: vec![Terminal::end_of_input()],
        }
    }

    pub(crate) fn check(production: &Production<C>) -> Result<(), GrammarError> {
        let lhs = || production.lhs().name().to_string();
        if production.rhs().is_empty() {
            return Err(GrammarError::EmptyProduction { lhs: lhs() })
        }
        let reserved = production.rhs().iter().any(|s| match s {
            Symbol::Terminal(t) => t.class() == END_OF_INPUT,
            Symbol::NonTerminal(_) => false,
        });
        if reserved {
            return Err(GrammarError::ReservedTerminal { lhs: lhs() })
        }
        Ok(())
    }

    pub fn add(&mut self, mut production: Production<C>) -> Result<usize, GrammarError> {
        Grammar::check(&production)?;

        let seen: Vec<Symbol> = production.rhs().iter()
            .cloned()
            .chain(std::iter::once(production.lhs().sym()))
            .collect();
        for sym in seen {
            match sym {
                Symbol::Terminal(t) => {
                    if !self.terminals.contains(&t) {
                        self.terminals.push(t);
                    }
                },
                Symbol::NonTerminal(n) => {
                    if !self.non_terminals.contains(&n) {
                        self.non_terminals.push(n);
                    }
                },
            }
        }

        let id = self.productions.len();
        production.id = Some(id);
        self.productions.push(production);
        Ok(id)
    }

    pub fn productions(&self) -> &[Production<C>] {
        &self.productions
    }

    pub fn production(&self, id: usize) -> &Production<C> {
        &self.productions[id]
    }

    pub fn non_terminals(&self) -> &[NonTerminal] {
        &self.non_terminals
    }

    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals
    }

    // Non-terminals first, then terminals.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.non_terminals.iter().map(NonTerminal::sym)
            .chain(self.terminals.iter().map(Terminal::sym))
            .collect()
    }

    pub fn non_terminal_index(&self, nt: &NonTerminal) -> Option<usize> {
        self.non_terminals.iter().position(|n| n == nt)
    }

    pub fn productions_of<'a>(&'a self, nt: &'a NonTerminal) -> impl Iterator<Item = &'a Production<C>> + 'a {
        self.productions.iter().filter(move |p| p.lhs() == nt)
    }

    pub(crate) fn symbol_id(&self, sym: &Symbol) -> Option<SymbolId> {
        match sym {
            Symbol::Terminal(t) => Some(SymbolId::T(t.class())),
            Symbol::NonTerminal(n) => self.non_terminal_index(n).map(SymbolId::N),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.productions.is_empty()
    }
}

impl<C> Default for Grammar<C> {
    fn default() -> Self {
        Grammar::new()
    }
}

/*
 * A grammar whose production 0 is `S' -> S`, where S is the
 * left-hand side of the first production added by the user.
 */
pub struct AugmentedGrammar<C> {
    grammar: Grammar<C>,
    start: Option<NonTerminal>,
}

impl<C> AugmentedGrammar<C> {
    pub fn new() -> AugmentedGrammar<C> {
        AugmentedGrammar {
            grammar: Grammar::new(),
            start: None,
        }
    }

    /*
     * The first production fixes the start symbol. Nothing is
     * recorded unless the production is accepted, and no later
     * production may mention the synthesized start symbol.
     */
    pub fn add(&mut self, production: Production<C>) -> Result<usize, GrammarError> {
        Grammar::check(&production)?;

        let start = match &self.start {
            Some(start) => start.clone(),
            None => NonTerminal::new(&format!("{}'", production.lhs().name())),
        };
        let mentions_start = production.lhs() == &start
            || production.rhs().iter().any(|s| match s {
                Symbol::NonTerminal(n) => n == &start,
                Symbol::Terminal(_) => false,
            });
        if mentions_start {
            return Err(GrammarError::ReservedNonTerminal { name: start.name().to_string() })
        }

        if self.start.is_none() {
            self.grammar.add(Production::new(&start, [production.lhs().sym()]))?;
            self.start = Some(start);
        }
        self.grammar.add(production)
    }

    // The synthesized start symbol.
    pub fn start(&self) -> Option<&NonTerminal> {
        self.start.as_ref()
    }
}

impl<C> Default for AugmentedGrammar<C> {
    fn default() -> Self {
        AugmentedGrammar::new()
    }
}

impl<C> Deref for AugmentedGrammar<C> {
    type Target = Grammar<C>;

    fn deref(&self) -> &Grammar<C> {
        &self.grammar
    }
}
