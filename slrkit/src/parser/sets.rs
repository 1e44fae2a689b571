
use std::collections::BTreeSet;

use crate::lexer::{TokenClass, END_OF_INPUT};

use super::grammar::AugmentedGrammar;
use super::types::*;

/*
 * First(n) for every non-terminal, indexed like the grammar's
 * non-terminals. Productions are never empty, so only the
 * leftmost symbol of each production matters.
 */
pub fn first_sets<C>(grammar: &AugmentedGrammar<C>) -> Vec<BTreeSet<TokenClass>> {
    struct Visitor<'a, C> {
        grammar: &'a AugmentedGrammar<C>,
        found: BTreeSet<TokenClass>,
        visited: BTreeSet<usize>,
    }

    impl<C> Visitor<'_, C> {
        fn visit(&mut self, sym: &Symbol) {
            match sym {
                Symbol::Terminal(t) => {
                    self.found.insert(t.class());
                },
                Symbol::NonTerminal(n) => {
                    let index = match self.grammar.non_terminal_index(n) {
                        Some(index) => index,
                        None => return,
                    };
                    if self.visited.insert(index) {
                        let grammar = self.grammar;
                        grammar.productions_of(n)
                            .filter_map(|p| p.rhs().first())
                            .for_each(|first| self.visit(first));
                    }
                },
            }
        }
    }

    grammar.non_terminals().iter().map(|n| {
        let mut visitor = Visitor {
            grammar,
            found: BTreeSet::new(),
            visited: BTreeSet::new(),
        };
        visitor.visit(&n.sym());
        visitor.found
    }).collect()
}

/*
 * Follow(n) for every non-terminal, iterated to a fixed point.
 * The end-of-input marker follows the start symbol.
 */
pub fn follow_sets<C>(grammar: &AugmentedGrammar<C>, first: &[BTreeSet<TokenClass>]) -> Vec<BTreeSet<TokenClass>> {
    let mut follow = vec![BTreeSet::new(); grammar.non_terminals().len()];
    if let Some(start) = grammar.start().and_then(|s| grammar.non_terminal_index(s)) {
        follow[start].insert(END_OF_INPUT);
    }

    loop {
        let mut changed = false;

        for production in grammar.productions() {
            let lhs = match grammar.non_terminal_index(production.lhs()) {
                Some(lhs) => lhs,
                None => continue,
            };
            let rhs = production.rhs();

            for (i, sym) in rhs.iter().enumerate() {
                let b = match sym {
                    Symbol::NonTerminal(n) => match grammar.non_terminal_index(n) {
                        Some(b) => b,
                        None => continue,
                    },
                    Symbol::Terminal(_) => continue,
                };

                let added: BTreeSet<TokenClass> = match rhs.get(i + 1) {
                    Some(Symbol::Terminal(t)) => std::iter::once(t.class()).collect(),
                    Some(Symbol::NonTerminal(n)) => match grammar.non_terminal_index(n) {
                        Some(next) => first[next].clone(),
                        None => BTreeSet::new(),
                    },
                    None => follow[lhs].clone(),
                };

                let before = follow[b].len();
                follow[b].extend(added);
                changed |= follow[b].len() != before;
            }
        }

        if !changed {
            break
        }
    }

    follow
}
