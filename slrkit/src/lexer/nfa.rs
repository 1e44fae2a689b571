
use std::collections::{BTreeMap, BTreeSet};

pub type StateId = usize;

/*
 * Transition labels. Epsilon sorts after every byte, which
 * keeps byte transitions in order when iterating a state.
 */
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum InputChar {
    Byte(u8),
    Epsilon,
}

#[derive(Clone, Debug)]
pub struct State {
    pub id: StateId,
    // Only used for debugging output.
    pub name: String,
    pub transitions: BTreeMap<InputChar, Vec<StateId>>,
    pub accepting: bool,
    // Meaningful iff `accepting`.
    pub class: usize,
    /*
     * Set on the states of a lazy repetition's body: the class
     * whose match ends the repetition. Once a match of that class
     * is possible, the subset construction drops these states.
     */
    pub lazy: Option<usize>,
}

impl State {
    /*
     * The destination on `byte`, assuming this state belongs to a
     * DFA (so there is at most one).
     */
    pub fn next(&self, byte: u8) -> Option<StateId> {
        self.transitions.get(&InputChar::Byte(byte)).and_then(|dests| dests.first().copied())
    }

    pub fn byte_transitions(&self) -> impl Iterator<Item = (u8, &Vec<StateId>)> {
        self.transitions.iter().filter_map(|(c, dests)| match c {
            InputChar::Byte(b) => Some((*b, dests)),
            InputChar::Epsilon => None,
        })
    }
}

/*
 * A named (start, terminator) pair of states inside an
 * `Automaton`. The terminator is where the next fragment
 * gets wired in; it only becomes accepting when somebody
 * marks it so.
 */
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    pub name: String,
    pub start: StateId,
    pub terminator: StateId,
}

/*
 * Arena holding the states of one or more automata. States
 * refer to each other by index, so cycles are not a problem,
 * and nothing is freed before the whole arena is dropped.
 *
 * The same type is used for NFAs and DFAs; a DFA simply has
 * no epsilon edges and at most one destination per byte.
 */
#[derive(Clone, Debug, Default)]
pub struct Automaton {
    states: Vec<State>,
}

impl Automaton {
    pub fn new() -> Automaton {
        Automaton { states: Vec::new() }
    }

    pub fn add_state(&mut self, name: impl Into<String>) -> StateId {
        let id = self.states.len();
        self.states.push(State {
            id,
            name: name.into(),
            transitions: BTreeMap::new(),
            accepting: false,
            class: 0,
            lazy: None,
        });
        id
    }

    pub fn add_transition(&mut self, from: StateId, input: InputChar, to: StateId) {
        let dests = self.states[from].transitions.entry(input).or_insert_with(Vec::new);
        if !dests.contains(&to) {
            dests.push(to);
        }
    }

    pub fn add_epsilon(&mut self, from: StateId, to: StateId) {
        self.add_transition(from, InputChar::Epsilon, to)
    }

    pub fn set_accepting(&mut self, id: StateId, class: usize) {
        let state = &mut self.states[id];
        state.accepting = true;
        state.class = class;
    }

    pub fn set_lazy(&mut self, id: StateId, class: usize) {
        self.states[id].lazy = Some(class);
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn is_deterministic(&self) -> bool {
        self.states.iter().all(|s| {
            s.transitions.iter().all(|(c, dests)| *c != InputChar::Epsilon && dests.len() <= 1)
        })
    }

    /*
     * All the states reachable from `set` through epsilon edges
     * only (including `set` itself).
     */
    pub fn epsilon_closure(&self, set: &BTreeSet<StateId>) -> BTreeSet<StateId> {
        let mut closure = set.clone();
        let mut stack: Vec<StateId> = set.iter().copied().collect();

        while let Some(id) = stack.pop() {
            if let Some(dests) = self.states[id].transitions.get(&InputChar::Epsilon) {
                for dest in dests {
                    if closure.insert(*dest) {
                        stack.push(*dest);
                    }
                }
            }
        }

        closure
    }

    /*
     * Drops the states of lazy repetitions whose class has an
     * accepting state in `set`: the repetition stops as soon as
     * the rest of its pattern can end the match.
     */
    pub fn prune_lazy(&self, set: &mut BTreeSet<StateId>) {
        let accepted: BTreeSet<usize> = set.iter()
            .map(|id| &self.states[*id])
            .filter(|s| s.accepting)
            .map(|s| s.class)
            .collect();
        if !accepted.is_empty() {
            set.retain(|id| self.states[*id].lazy.map_or(true, |class| !accepted.contains(&class)));
        }
    }

    /*
     * Reachable states in breadth-first order, following every
     * kind of edge.
     */
    pub fn reachable_from(&self, start: StateId) -> Vec<StateId> {
        let mut seen = BTreeSet::new();
        let mut order = Vec::new();
        let mut queue = std::collections::VecDeque::new();
        seen.insert(start);
        queue.push_back(start);

        while let Some(id) = queue.pop_front() {
            order.push(id);
            for dest in self.states[id].transitions.values().flatten() {
                if seen.insert(*dest) {
                    queue.push_back(*dest);
                }
            }
        }

        order
    }

    /*
     * Runs the automaton from `start` over the whole `input`.
     * Returns the class of the match if the input is accepted.
     * When several accepting states are active the largest
     * class wins, as in the subset construction.
     */
    pub fn simulate(&self, start: StateId, input: &[u8]) -> Option<usize> {
        let mut current = self.epsilon_closure(&BTreeSet::from([start]));
        self.prune_lazy(&mut current);

        for byte in input {
            let moved: BTreeSet<StateId> = current.iter()
                .filter_map(|id| self.states[*id].transitions.get(&InputChar::Byte(*byte)))
                .flatten()
                .copied()
                .collect();
            if moved.is_empty() {
                return None
            }
            current = self.epsilon_closure(&moved);
            self.prune_lazy(&mut current);
        }

        current.iter()
            .map(|id| &self.states[*id])
            .filter(|s| s.accepting)
            .map(|s| s.class)
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epsilon_closure_follows_chains() {
        let mut a = Automaton::new();
        let s: Vec<StateId> = (0..4).map(|i| a.add_state(format!("s{}", i))).collect();
        a.add_epsilon(s[0], s[1]);
        a.add_epsilon(s[1], s[2]);
        a.add_epsilon(s[2], s[0]);
        a.add_transition(s[2], InputChar::Byte(b'x'), s[3]);

        let closure = a.epsilon_closure(&BTreeSet::from([s[0]]));
        assert_eq!(closure, BTreeSet::from([s[0], s[1], s[2]]));
    }

    #[test]
    fn simulate_picks_largest_class() {
        let mut a = Automaton::new();
        let start = a.add_state("start");
        let x = a.add_state("x");
        let y = a.add_state("y");
        a.add_transition(start, InputChar::Byte(b'a'), x);
        a.add_transition(start, InputChar::Byte(b'a'), y);
        a.set_accepting(x, 3);
        a.set_accepting(y, 5);

        assert!(!a.is_deterministic());
        assert_eq!(a.simulate(start, b"a"), Some(5));
        assert_eq!(a.simulate(start, b""), None);
        assert_eq!(a.simulate(start, b"aa"), None);
    }
}
