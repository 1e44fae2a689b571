
//! Primitive decoders turning token bytes into strings and numbers.

use thiserror::Error;

use crate::encoding::{Encoding, EncodingError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error("{text:?} is not a valid {expected}")]
    NotANumber { text: String, expected: &'static str },
}

pub fn decode_str(bytes: &[u8], encoding: Encoding) -> Result<String, DecodeError> {
    Ok(encoding.decode(bytes)?)
}

/*
 * Splits `[+-]digits[.digits]` into its parts, or returns
 * `None` if the text doesn't have that shape.
 */
fn split_number(text: &str) -> Option<(bool, &str, Option<&str>)> {
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (int, frac) = match rest.find('.') {
        Some(dot) => (&rest[..dot], Some(&rest[dot + 1..])),
        None => (rest, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int) || !frac.map_or(true, all_digits) {
        return None
    }

    Some((negative, int, frac))
}

pub fn decode_int(bytes: &[u8], encoding: Encoding) -> Result<i64, DecodeError> {
    let text = decode_str(bytes, encoding)?;
    let not_a_number = || DecodeError::NotANumber {
        text: text.clone(),
        expected: "integer",
    };

    match split_number(&text) {
        Some((negative, int, None)) => {
            // Parse with the sign attached so that i64::MIN stays representable.
            let signed = if negative { format!("-{}", int) } else { int.to_string() };
            signed.parse().map_err(|_| not_a_number())
        },
        _ => Err(not_a_number()),
    }
}

pub fn decode_float(bytes: &[u8], encoding: Encoding) -> Result<f64, DecodeError> {
    let text = decode_str(bytes, encoding)?;
    let not_a_number = || DecodeError::NotANumber {
        text: text.clone(),
        expected: "float",
    };

    let (negative, int, frac) = split_number(&text).ok_or_else(not_a_number)?;
    let normalized = match frac {
        Some(frac) => format!("{}.{}", int, frac),
        None => int.to_string(),
    };
    let value: f64 = normalized.parse().map_err(|_| not_a_number())?;

    Ok(if negative { -value } else { value })
}
