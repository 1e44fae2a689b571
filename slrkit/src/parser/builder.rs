
use std::collections::BTreeMap;

use super::grammar::AugmentedGrammar;
use super::items::*;
use super::types::*;

/*
 * The canonical LR(0) collection: the item sets and, for each,
 * the transitions on grammar symbols.
 */
pub(crate) struct ItemSetAutomaton {
    pub(crate) sets: Vec<ItemSet>,
    pub(crate) transitions: Vec<BTreeMap<SymbolId, usize>>,
}

pub(crate) struct Builder<'a, C> {
    grammar: &'a AugmentedGrammar<C>,
    symbols: Vec<Symbol>,
    // Stores the states that are built, and the transition
    // map for each state.
    states: Vec<(ItemSet, BTreeMap<SymbolId, usize>)>,
    index: BTreeMap<Vec<Item>, usize>,
}

impl<'a, C> Builder<'a, C> {
    pub(crate) fn new(grammar: &'a AugmentedGrammar<C>) -> Builder<'a, C> {
        Builder {
            grammar,
            symbols: grammar.symbols(),
            states: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /*
     * Finds the id of the state with the given kernel, creating
     * it if it doesn't exist yet.
     */
    fn state_id(&mut self, kernel: Vec<Item>) -> usize {
        if let Some(id) = self.index.get(&kernel) {
            return *id
        }

        let id = self.states.len();
        let set = ItemSet::new(kernel.clone(), self.grammar);
        self.states.push((set, BTreeMap::new()));
        self.index.insert(kernel, id);
        id
    }

    /*
     * Computes the transitions from the given state. New states
     * are appended, and will be visited in turn by `build`.
     */
    fn transitions_from(&mut self, id: usize) {
        let grammar = self.grammar;
        let symbols = std::mem::take(&mut self.symbols);

        for symbol in symbols.iter() {
            let kernel = self.states[id].0.goto_kernel(grammar, symbol);
            if kernel.is_empty() {
                continue
            }

            let target = self.state_id(kernel);
            if let Some(sym_id) = grammar.symbol_id(symbol) {
                self.states[id].1.insert(sym_id, target);
            }
        }

        self.symbols = symbols;
    }

    pub(crate) fn build(mut self) -> ItemSetAutomaton {
        if !self.grammar.is_empty() {
            self.state_id(vec![Item::new(0, 0)]);
        }

        let mut id = 0;
        while id < self.states.len() {
            self.transitions_from(id);
            id += 1;
        }

        log::debug!("LR(0) automaton: {} item sets", self.states.len());

        let (sets, transitions) = self.states.into_iter().unzip();
        ItemSetAutomaton { sets, transitions }
    }
}
