
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use super::grammar::Grammar;
use super::types::*;

/*
 * An LR(0) item: a production with a bullet (the dot) somewhere
 * in its right-hand side. Items order by production, then dot.
 */
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Item {
    pub production: usize,
    pub dot: usize,
}

impl Item {
    pub fn new(production: usize, dot: usize) -> Item {
        Item { production, dot }
    }

    /*
     * Returns the symbol after the bullet (if it exists, None
     * otherwise).
     */
    pub fn next_symbol<'g, C>(&self, grammar: &'g Grammar<C>) -> Option<&'g Symbol> {
        grammar.production(self.production).rhs().get(self.dot)
    }

    pub fn is_complete<C>(&self, grammar: &Grammar<C>) -> bool {
        self.dot == grammar.production(self.production).rhs().len()
    }

    /*
     * Moves the bullet to the right.
     */
    pub fn advance(&self) -> Item {
        Item::new(self.production, self.dot + 1)
    }
}

/*
 * The kernel items given by the caller, followed by the items
 * added by the closure. The closure only depends on the kernel,
 * so two sets are compared (and hashed) by their kernels alone.
 */
#[derive(Clone, Debug)]
pub struct ItemSet {
    items: Vec<Item>,
    kernel_len: usize,
}

impl ItemSet {
    pub fn new<C>(kernel: Vec<Item>, grammar: &Grammar<C>) -> ItemSet {
        let kernel_len = kernel.len();
        let mut items = kernel;
        let mut present: BTreeSet<Item> = items.iter().copied().collect();

        // Items are appended while we walk them; the new ones get
        // their own closure in turn.
        let mut i = 0;
        while i < items.len() {
            if let Some(Symbol::NonTerminal(nt)) = items[i].next_symbol(grammar) {
                for id in grammar.productions_of(nt).filter_map(Production::id) {
                    let item = Item::new(id, 0);
                    if present.insert(item) {
                        items.push(item);
                    }
                }
            }
            i += 1;
        }

        ItemSet { items, kernel_len }
    }

    pub fn kernel(&self) -> &[Item] {
        &self.items[..self.kernel_len]
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /*
     * The kernel of Goto(self, symbol): every item with `symbol`
     * after its bullet, advanced past it. Kept sorted so that the
     * same kernel reached along different paths compares equal.
     */
    pub fn goto_kernel<C>(&self, grammar: &Grammar<C>, symbol: &Symbol) -> Vec<Item> {
        let kernel: BTreeSet<Item> = self.items.iter()
            .filter(|item| item.next_symbol(grammar) == Some(symbol))
            .map(Item::advance)
            .collect();
        kernel.into_iter().collect()
    }
}

impl PartialEq for ItemSet {
    fn eq(&self, other: &ItemSet) -> bool {
        self.kernel() == other.kernel()
    }
}

impl Eq for ItemSet {}

impl Hash for ItemSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kernel().hash(state)
    }
}
