
use crate::ids::IdSource;

use super::nfa::Automaton;

// Marks an undefined transition in the dense table.
const DEAD: u32 = u32::MAX;

/*
 * Outcome of one `Matcher::scan`.
 *
 * `at_edge` tells whether the walk ran out of input while more
 * input could still have extended (or changed) the match. The
 * streaming lexer uses it to keep such a token for the next
 * refill instead of cutting it at the buffer boundary.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    Token { len: usize, class: usize, at_edge: bool },
    /*
     * The input ended before any accepting state was reached.
     * `class` is the class the consumed bytes were on their way
     * to, if any accepting state can still be reached.
     */
    Unterminated { len: usize, class: Option<usize> },
}

/*
 * A DFA compiled into a dense `state × 256` transition table,
 * with side tables for the accepting flag, the token class
 * (for a non-accepting state, the class it leads to) and
 * whether a state has any outgoing transition at all.
 */
#[derive(Debug, Clone)]
pub struct Matcher {
    next: Vec<u32>,
    accepting: Vec<bool>,
    class: Vec<Option<usize>>,
    has_exits: Vec<bool>,
}

impl Matcher {
    // The DFA's state 0 is its start state and gets dense id 0.
    pub fn compile(dfa: &Automaton) -> Matcher {
        let order = if dfa.is_empty() { Vec::new() } else { dfa.reachable_from(0) };

        let mut ids = IdSource::new();
        let mut dense = vec![DEAD; dfa.len()];
        for id in order.iter() {
            dense[*id] = ids.take() as u32;
        }

        let count = ids.upcoming();
        let mut matcher = Matcher {
            next: vec![DEAD; count * 256],
            accepting: vec![false; count],
            class: vec![None; count],
            has_exits: vec![false; count],
        };

        for id in order {
            let state = dfa.state(id);
            let from = dense[id] as usize;

            if state.accepting {
                matcher.accepting[from] = true;
                matcher.class[from] = Some(state.class);
            }

            for (byte, dests) in state.byte_transitions() {
                if let Some(dest) = dests.first() {
                    matcher.next[from * 256 + byte as usize] = dense[*dest];
                    matcher.has_exits[from] = true;
                }
            }
        }

        matcher.propagate_classes();
        matcher
    }

    /*
     * Gives every non-accepting state the largest class among the
     * accepting states it can reach.
     */
    fn propagate_classes(&mut self) {
        let mut changed = true;
        while changed {
            changed = false;
            for state in 0..self.state_count() {
                if self.accepting[state] {
                    continue
                }
                let reachable = self.next[state * 256..(state + 1) * 256].iter()
                    .filter(|next| **next != DEAD)
                    .filter_map(|next| self.class[*next as usize])
                    .max();
                if reachable > self.class[state] {
                    self.class[state] = reachable;
                    changed = true;
                }
            }
        }
    }

    pub fn state_count(&self) -> usize {
        self.accepting.len()
    }

    pub fn step(&self, state: usize, byte: u8) -> Option<usize> {
        match self.next[state * 256 + byte as usize] {
            DEAD => None,
            next => Some(next as usize),
        }
    }

    pub fn accepts(&self, state: usize) -> Option<usize> {
        if self.accepting[state] {
            self.class[state]
        } else {
            None
        }
    }

    /*
     * Longest-match scan of `input` from its first byte.
     *
     * `accept(class, len)` is asked each time the walk enters an
     * accepting state; returning false makes that position count
     * as non-accepting. Returns None when the input starts with
     * something no pattern matches (or when it is empty).
     */
    pub fn scan(&self, input: &[u8], accept: &mut dyn FnMut(usize, usize) -> bool) -> Option<Match> {
        if self.state_count() == 0 || input.is_empty() {
            return None
        }

        let mut state = 0;
        let mut last: Option<(usize, usize)> = None;

        for (pos, byte) in input.iter().enumerate() {
            state = match self.step(state, *byte) {
                Some(next) => next,
                None => {
                    return last.map(|(len, class)| Match::Token { len, class, at_edge: false })
                },
            };

            if let Some(class) = self.accepts(state) {
                let len = pos + 1;
                if accept(class, len) {
                    last = Some((len, class));
                }
            }
        }

        let at_edge = self.has_exits[state];
        Some(match last {
            Some((len, class)) => Match::Token { len, class, at_edge },
            None => Match::Unterminated { len: input.len(), class: self.class[state] },
        })
    }
}
