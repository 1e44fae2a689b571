
use std::collections::{BTreeMap, VecDeque};

use super::builders::{any_number_of, sequence};
use super::nfa::*;
use super::subset::subset_construction;
use super::types::{Greediness, Literal, PatternError, RegExp};
use crate::encoding::Encoding;

/*
 * Thompson construction: every node becomes a fragment with
 * a single entry and a single exit, and fragments are glued
 * together with epsilon edges.
 *
 * The encoding has already been resolved for the whole pattern;
 * the compiler pushes it down to every text leaf.
 *
 * The body states of lazy repetitions are remembered until
 * `accept` tells which class they belong to.
 */
pub struct Compiler<'a> {
    nfa: &'a mut Automaton,
    encoding: Encoding,
    lazy: Vec<StateId>,
}

impl<'a> Compiler<'a> {
    pub fn new(nfa: &'a mut Automaton, encoding: Encoding) -> Compiler<'a> {
        Compiler { nfa, encoding, lazy: Vec::new() }
    }

    // Makes `frag` accept `class`, lazy repetitions included.
    pub fn accept(self, frag: &Fragment, class: usize) {
        self.nfa.set_accepting(frag.terminator, class);
        for id in self.lazy {
            self.nfa.set_lazy(id, class);
        }
    }

    fn fragment(&self, name: &str, start: StateId, terminator: StateId) -> Fragment {
        Fragment {
            name: name.to_string(),
            start,
            terminator,
        }
    }

    pub fn compile(&mut self, exp: &RegExp) -> Result<Fragment, PatternError> {
        match exp {
            RegExp::Literal(lit) => self.literal(lit),
            RegExp::Sequence(parts) => {
                let mut frags = Vec::with_capacity(parts.len());
                for part in parts {
                    frags.push(self.compile(part)?);
                }
                Ok(self.chain("sequence", frags))
            },
            RegExp::Alternation(alternatives) => {
                let entry = self.nfa.add_state("choice");
                let exit = self.nfa.add_state("choice-end");
                for alternative in alternatives {
                    let frag = self.compile(alternative)?;
                    self.nfa.add_epsilon(entry, frag.start);
                    self.nfa.add_epsilon(frag.terminator, exit);
                }
                Ok(self.fragment("choice", entry, exit))
            },
            RegExp::Optional(child) => {
                let frag = self.compile(child)?;
                let entry = self.nfa.add_state("optional");
                let exit = self.nfa.add_state("optional-end");
                self.nfa.add_epsilon(entry, frag.start);
                self.nfa.add_epsilon(entry, exit);
                self.nfa.add_epsilon(frag.terminator, exit);
                Ok(self.fragment("optional", entry, exit))
            },
            RegExp::Repetition { child, at_least_one: false, greediness } => {
                let frag = self.body(child, *greediness)?;
                Ok(self.star(frag))
            },
            RegExp::Repetition { child, at_least_one: true, greediness } => {
                // x+ is x x*; the child is compiled twice so that the
                // mandatory copy has no way around it.
                let once = self.compile(child)?;
                let more = self.body(child, *greediness)?;
                let more = self.star(more);
                Ok(self.chain("at-least-one", vec![once, more]))
            },
            RegExp::NegatedClass { exceptions, .. } => self.negated_class(exceptions),
            RegExp::RepeatUntil { repeated, suffix } => self.repeat_until(repeated, suffix),
        }
    }

    // The looping part of a repetition.
    fn body(&mut self, child: &RegExp, greediness: Greediness) -> Result<Fragment, PatternError> {
        let first = self.nfa.len();
        let frag = self.compile(child)?;
        if greediness == Greediness::Lazy {
            self.lazy.extend(first..self.nfa.len());
        }
        Ok(frag)
    }

    fn literal(&mut self, lit: &Literal) -> Result<Fragment, PatternError> {
        let bytes = lit.to_bytes(self.encoding)?;
        let start = self.nfa.add_state("literal");
        let mut curr = start;

        for byte in bytes {
            let next = self.nfa.add_state(format!("literal-{:#04x}", byte));
            self.nfa.add_transition(curr, InputChar::Byte(byte), next);
            curr = next;
        }

        Ok(self.fragment("literal", start, curr))
    }

    fn chain(&mut self, name: &str, frags: Vec<Fragment>) -> Fragment {
        let mut frags = frags.into_iter();
        let first = match frags.next() {
            Some(first) => first,
            None => {
                let only = self.nfa.add_state(name);
                return self.fragment(name, only, only)
            },
        };

        let start = first.start;
        let mut terminator = first.terminator;
        for frag in frags {
            self.nfa.add_epsilon(terminator, frag.start);
            terminator = frag.terminator;
        }

        self.fragment(name, start, terminator)
    }

    fn star(&mut self, frag: Fragment) -> Fragment {
        let entry = self.nfa.add_state("star");
        let exit = self.nfa.add_state("star-end");
        self.nfa.add_epsilon(entry, frag.start);
        self.nfa.add_epsilon(entry, exit);
        self.nfa.add_epsilon(frag.terminator, frag.start);
        self.nfa.add_epsilon(frag.terminator, exit);
        self.fragment("star", entry, exit)
    }

    /*
     * Any single code unit except the exceptions. This is built
     * directly as a deterministic trie: the trunk accepts every
     * legal byte sequence of one code unit, and the exceptions
     * are carved out as side branches that rejoin the trunk as
     * soon as they stop matching an exception.
     */
    fn negated_class(&mut self, exceptions: &[char]) -> Result<Fragment, PatternError> {
        let ranges = self.encoding.unit_ranges();
        let width = ranges.len();

        let mut encoded = Vec::with_capacity(exceptions.len());
        for ch in exceptions {
            encoded.push(self.encoding.encode(*ch)?);
        }

        let entry = self.nfa.add_state("except");
        let exit = self.nfa.add_state("except-end");

        // trunk[d] consumes the byte at depth d of a code unit that
        // can no longer be an exception; trunk[width] is the exit.
        let mut trunk: Vec<Option<StateId>> = vec![None; width + 1];
        trunk[width] = Some(exit);

        let mut branches: BTreeMap<Vec<u8>, StateId> = BTreeMap::new();
        branches.insert(Vec::new(), entry);
        let mut queue = VecDeque::from([(Vec::<u8>::new(), entry)]);

        while let Some((prefix, state)) = queue.pop_front() {
            let depth = prefix.len();

            for byte in ranges[depth].clone() {
                let mut next_prefix = prefix.clone();
                next_prefix.push(byte);

                let is_prefix = encoded.iter().any(|e| e.starts_with(&next_prefix));
                let dest = if !is_prefix {
                    self.trunk_state(&mut trunk, depth + 1, &ranges)
                } else if depth + 1 == width {
                    // A whole exception: carved out.
                    continue
                } else if let Some(branch) = branches.get(&next_prefix) {
                    *branch
                } else {
                    let branch = self.nfa.add_state(format!("except-branch-{}", depth + 1));
                    branches.insert(next_prefix.clone(), branch);
                    queue.push_back((next_prefix, branch));
                    branch
                };

                self.nfa.add_transition(state, InputChar::Byte(byte), dest);
            }
        }

        Ok(self.fragment("except", entry, exit))
    }

    fn trunk_state(
        &mut self,
        trunk: &mut Vec<Option<StateId>>,
        depth: usize,
        ranges: &[std::ops::RangeInclusive<u8>],
    ) -> StateId {
        if let Some(state) = trunk[depth] {
            return state
        }

        let state = self.nfa.add_state(format!("except-trunk-{}", depth));
        trunk[depth] = Some(state);
        let next = self.trunk_state(trunk, depth + 1, ranges);
        for byte in ranges[depth].clone() {
            self.nfa.add_transition(state, InputChar::Byte(byte), next);
        }
        state
    }

    /*
     * Compiles `pattern` on its own and returns it as a DFA
     * (state 0 is the start).
     */
    fn sub_dfa(&self, pattern: &RegExp) -> Result<Automaton, PatternError> {
        let mut scratch = Automaton::new();
        let mut compiler = Compiler::new(&mut scratch, self.encoding);
        let frag = compiler.compile(pattern)?;
        compiler.accept(&frag, 1);
        Ok(subset_construction(&scratch, frag.start))
    }

    /*
     * The DFA of `repeated* suffix`, copied in with every accepting
     * state cut off from its transitions. A walk through it stops
     * at the first position where the suffix can end, and the
     * subset construction keeps every suffix attempt alive at once,
     * so overlapping partial delimiters need no backtracking.
     */
    fn repeat_until(&mut self, repeated: &RegExp, suffix: &RegExp) -> Result<Fragment, PatternError> {
        let dfa = self.sub_dfa(&sequence([any_number_of(repeated.clone()), suffix.clone()]))?;

        let states: Vec<StateId> = (0..dfa.len())
            .map(|id| self.nfa.add_state(format!("until-{}", id)))
            .collect();
        let exit = self.nfa.add_state("until-end");

        for (id, state) in dfa.states().iter().enumerate() {
            if state.accepting {
                self.nfa.add_epsilon(states[id], exit);
                continue
            }
            for (byte, dests) in state.byte_transitions() {
                if let Some(dest) = dests.first() {
                    self.nfa.add_transition(states[id], InputChar::Byte(byte), states[*dest]);
                }
            }
        }

        Ok(self.fragment("until", states[0], exit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::builders::*;

    fn accepts(exp: &RegExp, encoding: Encoding, input: &[u8]) -> bool {
        let mut nfa = Automaton::new();
        let mut compiler = Compiler::new(&mut nfa, encoding);
        let frag = compiler.compile(exp).unwrap();
        compiler.accept(&frag, 1);
        nfa.simulate(frag.start, input).is_some()
    }

    #[test]
    fn literal_and_sequence() {
        let exp = sequence([literal("ab"), literal(b"\x00c")]);
        assert!(accepts(&exp, Encoding::Ascii, b"ab\x00c"));
        assert!(!accepts(&exp, Encoding::Ascii, b"ab"));
    }

    #[test]
    fn text_follows_the_encoding() {
        let exp = literal("ab");
        assert!(accepts(&exp, Encoding::Ucs2Le, b"a\x00b\x00"));
        assert!(!accepts(&exp, Encoding::Ucs2Le, b"ab"));
    }

    #[test]
    fn repetitions() {
        let star = any_number_of(literal("ab"));
        assert!(accepts(&star, Encoding::Ascii, b""));
        assert!(accepts(&star, Encoding::Ascii, b"ababab"));
        assert!(!accepts(&star, Encoding::Ascii, b"aba"));

        let plus = at_least_one_of(literal("ab"));
        assert!(!accepts(&plus, Encoding::Ascii, b""));
        assert!(accepts(&plus, Encoding::Ascii, b"ab"));
        assert!(accepts(&plus, Encoding::Ascii, b"abab"));

        let opt = sequence([optional(literal("-")), literal("1")]);
        assert!(accepts(&opt, Encoding::Ascii, b"-1"));
        assert!(accepts(&opt, Encoding::Ascii, b"1"));
        assert!(!accepts(&opt, Encoding::Ascii, b"--1"));
    }

    #[test]
    fn negated_class_single_byte() {
        let exp = literal_except(Encoding::Ascii, ['"', '\\']);
        assert!(accepts(&exp, Encoding::Ascii, b"a"));
        assert!(!accepts(&exp, Encoding::Ascii, b"\""));
        assert!(!accepts(&exp, Encoding::Ascii, b"\\"));
        assert!(!accepts(&exp, Encoding::Ascii, b"\x80"));
        assert!(!accepts(&exp, Encoding::Ascii, b"ab"));
    }

    #[test]
    fn negated_class_wide() {
        let exp = literal_except(Encoding::Ucs2Le, ['a']);
        assert!(!accepts(&exp, Encoding::Ucs2Le, b"a\x00"));
        // Shares its first byte with the exception.
        assert!(accepts(&exp, Encoding::Ucs2Le, b"a\x01"));
        assert!(accepts(&exp, Encoding::Ucs2Le, b"b\x00"));
        assert!(!accepts(&exp, Encoding::Ucs2Le, b"b"));

        let exp = literal_except(Encoding::Utf32Be, ['x']);
        assert!(accepts(&exp, Encoding::Utf32Be, b"\x00\x00\x00y"));
        assert!(!accepts(&exp, Encoding::Utf32Be, b"\x00\x00\x00x"));
        assert!(!accepts(&exp, Encoding::Utf32Be, b"\x01\x00\x00y"));
    }

    #[test]
    fn repeat_until_is_shortest_to_delimiter() {
        let comment = sequence([literal("/*"), repeat_until(any_char(), literal("*/"))]);
        assert!(accepts(&comment, Encoding::Ascii, b"/* hello */"));
        assert!(accepts(&comment, Encoding::Ascii, b"/**/"));
        assert!(accepts(&comment, Encoding::Ascii, b"/* a **/"));
        assert!(!accepts(&comment, Encoding::Ascii, b"/* a */ b */"));
        assert!(!accepts(&comment, Encoding::Ascii, b"/* a "));
    }

    #[test]
    fn repeat_until_overlapping_delimiter() {
        let exp = repeat_until(any_char(), literal("aab"));
        assert!(accepts(&exp, Encoding::Ascii, b"xaaab"));
        assert!(accepts(&exp, Encoding::Ascii, b"aab"));
        assert!(!accepts(&exp, Encoding::Ascii, b"aaba"));
    }

    #[test]
    fn repeat_until_stops_when_repeated_fails() {
        // A string body can't contain a raw newline.
        let exp = sequence([
            literal("\""),
            repeat_until(literal_except(Encoding::Ascii, ['\n', '"']), literal("\"")),
        ]);
        assert!(accepts(&exp, Encoding::Ascii, b"\"abc\""));
        assert!(accepts(&exp, Encoding::Ascii, b"\"\""));
        assert!(!accepts(&exp, Encoding::Ascii, b"\"ab\ncd\""));
    }

    #[test]
    fn repeat_until_delimiter_outside_repeated() {
        let comment = sequence([
            literal("/*"),
            repeat_until(literal_except(Encoding::Ascii, ['*']), literal("*/")),
        ]);
        assert!(accepts(&comment, Encoding::Ascii, b"/* a */"));
        assert!(accepts(&comment, Encoding::Ascii, b"/**/"));
        // The body may not contain a star of its own.
        assert!(!accepts(&comment, Encoding::Ascii, b"/* a * b */"));

        let quoted = sequence([literal("'"), repeat_until(literal_except(Encoding::Ascii, ['\'']), literal("'"))]);
        assert!(accepts(&quoted, Encoding::Ascii, b"'a'"));
        assert!(!accepts(&quoted, Encoding::Ascii, b"'a'b'"));
    }

    #[test]
    fn lazy_body_stops_where_the_rest_matches() {
        let exp = sequence([
            literal("<"),
            any_number_of_with(any_char(), Greediness::Lazy),
            literal(">"),
            at_least_one_of(range_of('0', '9', Encoding::Ascii)),
        ]);
        assert!(accepts(&exp, Encoding::Ascii, b"<a>123"));
        assert!(accepts(&exp, Encoding::Ascii, b"<a>b>1"));
        assert!(!accepts(&exp, Encoding::Ascii, b"<a>1>2"));
    }
}
