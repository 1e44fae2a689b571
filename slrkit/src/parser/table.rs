
use std::fmt;

use crate::lexer::{TokenClass, END_OF_INPUT};

use super::builder::Builder;
use super::error::GrammarError;
use super::grammar::AugmentedGrammar;
use super::sets::{first_sets, follow_sets};
use super::types::*;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Error,
    Shift(usize),
    Reduce(usize),
    Accept,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Error => write!(f, "."),
            Action::Shift(state) => write!(f, "s{}", state),
            Action::Reduce(production) => write!(f, "r{}", production),
            Action::Accept => write!(f, "acc"),
        }
    }
}

/*
 * The SLR(1) action and goto tables. Actions are indexed by
 * (state, token class), gotos by (state, non-terminal index).
 */
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ParsingTable {
    actions: Vec<Action>,
    gotos: Vec<Option<usize>>,
    width: usize,
    nt_count: usize,
}

impl ParsingTable {
    /*
     * Builds the tables for `grammar`, with one action column per
     * token class below `terminal_classes` (the number of classes
     * the lexer knows about, end-of-input included).
     */
    pub fn build<C>(grammar: &AugmentedGrammar<C>, terminal_classes: usize) -> Result<ParsingTable, GrammarError> {
        if grammar.is_empty() {
            return Err(GrammarError::NoProductions)
        }
        let width = terminal_classes.max(1);
        for t in grammar.terminals() {
            if t.class() >= width {
                return Err(GrammarError::TerminalOutOfRange {
                    name: t.name().to_string(),
                    class: t.class(),
                    width,
                })
            }
        }

        let automaton = Builder::new(grammar).build();
        let first = first_sets(grammar);
        let follow = follow_sets(grammar, &first);

        let nt_count = grammar.non_terminals().len();
        let states = automaton.sets.len();
        let mut table = ParsingTable {
            actions: vec![Action::Error; states * width],
            gotos: vec![None; states * nt_count],
            width,
            nt_count,
        };

        // Shifts and gotos come straight from the transitions.
        for (state, transitions) in automaton.transitions.iter().enumerate() {
            for (sym, target) in transitions.iter() {
                match sym {
                    SymbolId::T(class) => table.set(state, *class, Action::Shift(*target))?,
                    SymbolId::N(nt) => table.gotos[state * nt_count + nt] = Some(*target),
                }
            }
        }

        let start = grammar.start().and_then(|s| grammar.non_terminal_index(s));
        for (state, set) in automaton.sets.iter().enumerate() {
            for item in set.kernel().iter().filter(|item| item.is_complete(grammar)) {
                let lhs = grammar.non_terminal_index(grammar.production(item.production).lhs());
                if lhs == start {
                    table.set(state, END_OF_INPUT, Action::Accept)?;
                } else if let Some(lhs) = lhs {
                    for class in follow[lhs].iter() {
                        table.set(state, *class, Action::Reduce(item.production))?;
                    }
                }
            }
        }

        log::debug!("parsing table: {} states, {} terminal classes, {} non-terminals", states, width, nt_count);
        Ok(table)
    }

    fn set(&mut self, state: usize, class: TokenClass, action: Action) -> Result<(), GrammarError> {
        let cell = &mut self.actions[state * self.width + class];
        if *cell != Action::Error {
            return Err(GrammarError::NotSlr1 { state, class, existing: *cell, candidate: action })
        }
        *cell = action;
        Ok(())
    }

    pub fn action(&self, state: usize, class: TokenClass) -> Action {
        if class >= self.width || state >= self.state_count() {
            return Action::Error
        }
        self.actions[state * self.width + class]
    }

    pub fn goto(&self, state: usize, non_terminal: usize) -> Option<usize> {
        if non_terminal >= self.nt_count {
            return None
        }
        self.gotos.get(state * self.nt_count + non_terminal).copied().flatten()
    }

    // Classes with a non-error action in `state`.
    pub fn expected(&self, state: usize) -> Vec<TokenClass> {
        (0..self.width).filter(|class| self.action(state, *class) != Action::Error).collect()
    }

    pub fn state_count(&self) -> usize {
        self.actions.len() / self.width
    }

    pub fn terminal_count(&self) -> usize {
        self.width
    }

    pub fn non_terminal_count(&self) -> usize {
        self.nt_count
    }
}

impl fmt::Display for ParsingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state |")?;
        for class in 0..self.width {
            write!(f, " {:>5}", format!("t{}", class))?;
        }
        write!(f, " |")?;
        for nt in 0..self.nt_count {
            write!(f, " {:>5}", format!("n{}", nt))?;
        }
        writeln!(f)?;

        for state in 0..self.state_count() {
            write!(f, "{:>5} |", state)?;
            for class in 0..self.width {
                write!(f, " {:>5}", self.action(state, class).to_string())?;
            }
            write!(f, " |")?;
            for nt in 0..self.nt_count {
                match self.goto(state, nt) {
                    Some(target) => write!(f, " {:>5}", target)?,
                    None => write!(f, " {:>5}", ".")?,
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
