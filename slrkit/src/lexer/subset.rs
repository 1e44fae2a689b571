
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::nfa::*;

/*
 * Converts the NFA rooted at `start` into an equivalent DFA,
 * returned as a fresh automaton whose state 0 is the start.
 *
 * A DFA state is accepting as soon as one of its NFA states
 * is, and it takes the largest class among them, so that an
 * overlapping terminal declared later wins. Lazy repetitions
 * are cut where their class first accepts (`prune_lazy`).
 */
pub fn subset_construction(nfa: &Automaton, start: StateId) -> Automaton {
    struct Ctx<'a> {
        nfa: &'a Automaton,
        dfa: Automaton,
        ids: BTreeMap<BTreeSet<StateId>, StateId>,
        unmarked: VecDeque<(BTreeSet<StateId>, StateId)>,
    }

    impl Ctx<'_> {
        fn visit(&mut self, set: BTreeSet<StateId>) -> StateId {
            if let Some(id) = self.ids.get(&set) {
                return *id
            }

            let names: Vec<String> = set.iter().map(|id| id.to_string()).collect();
            let id = self.dfa.add_state(format!("{{{}}}", names.join(",")));

            let nfa = self.nfa;
            let class = set.iter()
                .map(|s| nfa.state(*s))
                .filter(|s| s.accepting)
                .map(|s| s.class)
                .max();
            if let Some(class) = class {
                self.dfa.set_accepting(id, class);
            }

            self.ids.insert(set.clone(), id);
            self.unmarked.push_back((set, id));
            id
        }

        fn mark(&mut self, set: &BTreeSet<StateId>, from: StateId) {
            // Group the moves by byte, so that we only look at the bytes
            // that actually lead somewhere.
            let mut moves: BTreeMap<u8, BTreeSet<StateId>> = BTreeMap::new();
            for id in set.iter() {
                for (byte, dests) in self.nfa.state(*id).byte_transitions() {
                    moves.entry(byte).or_insert_with(BTreeSet::new).extend(dests.iter().copied());
                }
            }

            for (byte, moved) in moves {
                let mut target = self.nfa.epsilon_closure(&moved);
                self.nfa.prune_lazy(&mut target);
                let to = self.visit(target);
                self.dfa.add_transition(from, InputChar::Byte(byte), to);
            }
        }
    }

    let mut ctx = Ctx {
        nfa,
        dfa: Automaton::new(),
        ids: BTreeMap::new(),
        unmarked: VecDeque::new(),
    };

    // The start set is visited first, so it gets id 0.
    let mut initial = nfa.epsilon_closure(&BTreeSet::from([start]));
    nfa.prune_lazy(&mut initial);
    ctx.visit(initial);

    while let Some((set, id)) = ctx.unmarked.pop_front() {
        ctx.mark(&set, id);
    }

    log::trace!("subset construction: {} NFA states -> {} DFA states", nfa.len(), ctx.dfa.len());
    ctx.dfa
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Encoding;
    use crate::lexer::builders::*;
    use crate::lexer::thompson::Compiler;
    use crate::lexer::types::RegExp;

    use proptest::prelude::*;

    fn nfa_of(exp: &RegExp) -> (Automaton, StateId) {
        let mut nfa = Automaton::new();
        let frag = Compiler::new(&mut nfa, Encoding::Ascii).compile(exp).unwrap();
        nfa.set_accepting(frag.terminator, 1);
        (nfa, frag.start)
    }

    #[test]
    fn doubled_letters() {
        let exp = choice([literal("aa"), literal("bb"), literal("cc")]);
        let (nfa, start) = nfa_of(&exp);
        let dfa = subset_construction(&nfa, start);

        assert!(dfa.is_deterministic());
        for input in [&b"aa"[..], b"bb", b"cc"] {
            assert_eq!(dfa.simulate(0, input), Some(1));
        }
        assert_eq!(dfa.simulate(0, b"ab"), None);
        assert_eq!(dfa.simulate(0, b"a"), None);
    }

    #[test]
    fn later_class_wins_on_overlap() {
        let mut nfa = Automaton::new();
        let start = nfa.add_state("start");
        for (class, exp) in [(1, literal("if")), (2, at_least_one_of(range_of('a', 'z', Encoding::Ascii)))] {
            let frag = Compiler::new(&mut nfa, Encoding::Ascii).compile(&exp).unwrap();
            nfa.set_accepting(frag.terminator, class);
            nfa.add_epsilon(start, frag.start);
        }

        let dfa = subset_construction(&nfa, start);
        assert_eq!(dfa.simulate(0, b"if"), Some(2));
        assert_eq!(dfa.simulate(0, b"i"), Some(2));
    }

    proptest! {
        #[test]
        fn dfa_accepts_what_the_nfa_accepts(input in "[abc]{0,8}") {
            let exp = sequence([
                any_number_of(choice([literal("ab"), literal("c")])),
                optional(literal("a")),
                at_least_one_of(literal("b")),
            ]);
            let (nfa, start) = nfa_of(&exp);
            let dfa = subset_construction(&nfa, start);

            prop_assert_eq!(nfa.simulate(start, input.as_bytes()), dfa.simulate(0, input.as_bytes()));
        }
    }
}
