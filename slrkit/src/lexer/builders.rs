
//! Combinators building [`RegExp`] trees.
//!
//! ```ignore
//! let ident = sequence([
//!     choice([range_of('a', 'z', Encoding::Ascii), literal('_')]),
//!     any_number_of(choice([range_of('a', 'z', Encoding::Ascii), range_of('0', '9', Encoding::Ascii)])),
//! ]);
//! ```

use super::types::{Greediness, Literal, RegExp};
use crate::encoding::Encoding;

pub fn literal(lit: impl Into<Literal>) -> RegExp {
    RegExp::Literal(lit.into())
}

/*
 * A literal whose text is pinned to `encoding`. Raw byte
 * literals are not affected by encodings.
 */
pub fn literal_in(lit: impl Into<Literal>, encoding: Encoding) -> RegExp {
    match lit.into() {
        Literal::Text { text, .. } => RegExp::Literal(Literal::Text { text, encoding: Some(encoding) }),
        bytes => RegExp::Literal(bytes),
    }
}

pub fn sequence(parts: impl IntoIterator<Item = RegExp>) -> RegExp {
    RegExp::Sequence(parts.into_iter().collect())
}

pub fn choice(alternatives: impl IntoIterator<Item = RegExp>) -> RegExp {
    RegExp::Alternation(alternatives.into_iter().collect())
}

pub fn optional(exp: RegExp) -> RegExp {
    RegExp::Optional(Box::new(exp))
}

pub fn any_number_of(exp: RegExp) -> RegExp {
    any_number_of_with(exp, Greediness::Greedy)
}

pub fn any_number_of_with(exp: RegExp, greediness: Greediness) -> RegExp {
    RegExp::Repetition {
        child: Box::new(exp),
        at_least_one: false,
        greediness,
    }
}

pub fn at_least_one_of(exp: RegExp) -> RegExp {
    at_least_one_of_with(exp, Greediness::Greedy)
}

pub fn at_least_one_of_with(exp: RegExp, greediness: Greediness) -> RegExp {
    RegExp::Repetition {
        child: Box::new(exp),
        at_least_one: true,
        greediness,
    }
}

/*
 * Any character of the inclusive range `lo..=hi`.
 */
pub fn range_of(lo: char, hi: char, encoding: Encoding) -> RegExp {
    choice((lo..=hi).map(|ch| literal_in(ch, encoding)))
}

pub fn literal_except(encoding: Encoding, exceptions: impl IntoIterator<Item = char>) -> RegExp {
    RegExp::NegatedClass {
        exceptions: exceptions.into_iter().collect(),
        encoding: Some(encoding),
    }
}

/*
 * Any single character of the pattern's encoding.
 */
pub fn any_char() -> RegExp {
    RegExp::NegatedClass {
        exceptions: Vec::new(),
        encoding: None,
    }
}

pub fn repeat_until(repeated: RegExp, suffix: RegExp) -> RegExp {
    RegExp::RepeatUntil {
        repeated: Box::new(repeated),
        suffix: Box::new(suffix),
    }
}
