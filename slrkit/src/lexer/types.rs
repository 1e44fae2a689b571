
use thiserror::Error;

use crate::encoding::{Encoding, EncodingError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern can match the empty string or nothing at all")]
    Empty,
    #[error("pattern mixes the {first} and {second} encodings")]
    MixedEncodings { first: Encoding, second: Encoding },
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Greediness {
    Greedy,
    Lazy,
}

impl Default for Greediness {
    fn default() -> Self {
        Greediness::Greedy
    }
}

/*
 * Literal leaves are either raw bytes, or text that only
 * becomes bytes once the pattern's encoding is known.
 */
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Literal {
    Bytes(Vec<u8>),
    Text { text: String, encoding: Option<Encoding> },
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RegExp {
    Literal(Literal),
    Sequence(Vec<RegExp>),
    Alternation(Vec<RegExp>),
    Optional(Box<RegExp>),
    Repetition {
        child: Box<RegExp>,
        at_least_one: bool,
        greediness: Greediness,
    },
    // Any single code unit except the listed characters.
    NegatedClass {
        exceptions: Vec<char>,
        encoding: Option<Encoding>,
    },
    // Shortest run of `repeated` that ends with `suffix`.
    RepeatUntil {
        repeated: Box<RegExp>,
        suffix: Box<RegExp>,
    },
}

impl Literal {
    pub fn is_empty(&self) -> bool {
        match self {
            Literal::Bytes(bytes) => bytes.is_empty(),
            Literal::Text { text, .. } => text.is_empty(),
        }
    }

    pub fn to_bytes(&self, encoding: Encoding) -> Result<Vec<u8>, EncodingError> {
        match self {
            Literal::Bytes(bytes) => Ok(bytes.clone()),
            Literal::Text { text, .. } => encoding.encode_str(text),
        }
    }
}

impl From<&[u8]> for Literal {
    fn from(bytes: &[u8]) -> Self {
        Literal::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Literal {
    fn from(bytes: &[u8; N]) -> Self {
        Literal::Bytes(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Literal {
    fn from(bytes: Vec<u8>) -> Self {
        Literal::Bytes(bytes)
    }
}

impl From<u8> for Literal {
    fn from(byte: u8) -> Self {
        Literal::Bytes(vec![byte])
    }
}

impl From<char> for Literal {
    fn from(ch: char) -> Self {
        Literal::Text { text: ch.to_string(), encoding: None }
    }
}

impl From<&str> for Literal {
    fn from(text: &str) -> Self {
        Literal::Text { text: text.to_string(), encoding: None }
    }
}

impl From<String> for Literal {
    fn from(text: String) -> Self {
        Literal::Text { text, encoding: None }
    }
}

impl RegExp {
    fn children(&self) -> Vec<&RegExp> {
        match self {
            RegExp::Literal(_) | RegExp::NegatedClass { .. } => vec![],
            RegExp::Sequence(parts) | RegExp::Alternation(parts) => parts.iter().collect(),
            RegExp::Optional(child) | RegExp::Repetition { child, .. } => vec![&**child],
            RegExp::RepeatUntil { repeated, suffix } => vec![&**repeated, &**suffix],
        }
    }

    fn explicit_encoding(&self) -> Option<Encoding> {
        match self {
            RegExp::Literal(Literal::Text { encoding, .. }) => *encoding,
            RegExp::NegatedClass { encoding, .. } => *encoding,
            _ => None,
        }
    }

    /*
     * Finds the encoding of the whole pattern: the first explicit
     * one in pre-order, or `default` when there is none. Leaves
     * that name another encoding are an error.
     */
    pub fn resolve_encoding(&self, default: Encoding) -> Result<Encoding, PatternError> {
        let mut found: Option<Encoding> = None;
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            if let Some(enc) = node.explicit_encoding() {
                match found {
                    None => found = Some(enc),
                    Some(first) if first != enc => {
                        return Err(PatternError::MixedEncodings { first, second: enc })
                    },
                    _ => (),
                }
            }
            // Reversed so that the leftmost child is visited first.
            stack.extend(node.children().into_iter().rev());
        }

        Ok(found.unwrap_or(default))
    }

    /*
     * Does the pattern match the empty string (or is it empty
     * itself)? Such patterns would produce zero-length tokens.
     */
    pub fn nullable(&self) -> bool {
        match self {
            RegExp::Literal(lit) => lit.is_empty(),
            RegExp::Sequence(parts) => parts.iter().all(RegExp::nullable),
            RegExp::Alternation(parts) => parts.is_empty() || parts.iter().any(RegExp::nullable),
            RegExp::Optional(_) => true,
            RegExp::Repetition { child, at_least_one, .. } => !at_least_one || child.nullable(),
            RegExp::NegatedClass { .. } => false,
            RegExp::RepeatUntil { suffix, .. } => suffix.nullable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::builders::*;

    #[test]
    fn encoding_resolution() {
        let p = sequence([literal("ab"), literal_in('c', Encoding::Ucs2Le)]);
        assert_eq!(p.resolve_encoding(Encoding::Ascii), Ok(Encoding::Ucs2Le));

        let p = sequence([literal("ab"), literal(b"cd")]);
        assert_eq!(p.resolve_encoding(Encoding::Latin1), Ok(Encoding::Latin1));

        let p = choice([literal_in('a', Encoding::Ascii), literal_except(Encoding::Ucs2Be, ['x'])]);
        assert_eq!(
            p.resolve_encoding(Encoding::Ascii),
            Err(PatternError::MixedEncodings { first: Encoding::Ascii, second: Encoding::Ucs2Be })
        );
    }

    #[test]
    fn nullability() {
        assert!(any_number_of(literal("a")).nullable());
        assert!(optional(literal("a")).nullable());
        assert!(!at_least_one_of(literal("a")).nullable());
        assert!(literal("").nullable());
        assert!(choice(Vec::new()).nullable());
        assert!(!sequence([optional(literal("a")), literal("b")]).nullable());
    }
}
