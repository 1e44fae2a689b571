
use std::collections::BTreeMap;

use super::nfa::*;

/*
 * Moore-style partition refinement. States start out grouped by
 * (accepting, class) and groups are split until every member of
 * a group goes to the same groups on every byte. Only the states
 * reachable from state 0 are kept.
 *
 * Groups are numbered in breadth-first order of their first
 * member, so the start state stays 0 and rebuilding from the
 * same DFA always gives the same numbering.
 */
pub fn minimize(dfa: &Automaton) -> Automaton {
    if dfa.is_empty() {
        return Automaton::new()
    }

    let order = dfa.reachable_from(0);
    let mut group: Vec<usize> = vec![usize::MAX; dfa.len()];

    let mut initial: BTreeMap<Option<usize>, usize> = BTreeMap::new();
    for id in order.iter() {
        let state = dfa.state(*id);
        let key = if state.accepting { Some(state.class) } else { None };
        let next = initial.len();
        group[*id] = *initial.entry(key).or_insert(next);
    }
    let mut count = initial.len();

    loop {
        let mut signatures: BTreeMap<(usize, Vec<(u8, usize)>), usize> = BTreeMap::new();
        let mut refined = vec![usize::MAX; dfa.len()];

        for id in order.iter() {
            let moves = dfa.state(*id)
                .byte_transitions()
                .filter_map(|(byte, dests)| dests.first().map(|d| (byte, group[*d])))
                .collect();
            let next = signatures.len();
            refined[*id] = *signatures.entry((group[*id], moves)).or_insert(next);
        }

        let refined_count = signatures.len();
        group = refined;
        if refined_count == count {
            break
        }
        count = refined_count;
    }

    let mut min = Automaton::new();
    let mut representative: Vec<Option<StateId>> = vec![None; count];
    for id in order.iter() {
        if representative[group[*id]].is_none() {
            representative[group[*id]] = Some(*id);
        }
    }

    for (g, rep) in representative.iter().enumerate() {
        let name = match rep {
            Some(rep) => format!("[{}]", dfa.state(*rep).name),
            None => format!("[{}]", g),
        };
        min.add_state(name);
    }

    for (g, rep) in representative.iter().enumerate() {
        let state = match rep {
            Some(rep) => dfa.state(*rep),
            None => continue,
        };
        if state.accepting {
            min.set_accepting(g, state.class);
        }
        for (byte, dests) in state.byte_transitions() {
            if let Some(dest) = dests.first() {
                min.add_transition(g, InputChar::Byte(byte), group[*dest]);
            }
        }
    }

    log::trace!("minimization: {} DFA states -> {} states", dfa.len(), min.len());
    min
}
