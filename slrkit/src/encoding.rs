
use std::fmt;
use std::ops::RangeInclusive;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("{ch:?} cannot be represented in {encoding}")]
    Unencodable { ch: char, encoding: Encoding },
    #[error("{len} bytes is not a whole number of {width}-byte code units")]
    Misaligned { len: usize, width: usize },
    #[error("invalid {encoding} code unit {unit:#x}")]
    InvalidUnit { unit: u32, encoding: Encoding },
}

/*
 * Text encodings with a fixed number of bytes per code point.
 * Both the pattern compiler (to turn characters into byte
 * sequences) and the decoders (to turn token bytes back into
 * text) go through this type.
 */
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Encoding {
    Ascii,
    Latin1,
    Ucs2Le,
    Ucs2Be,
    Utf32Le,
    Utf32Be,
}

impl Encoding {
    pub fn width(self) -> usize {
        match self {
            Encoding::Ascii | Encoding::Latin1 => 1,
            Encoding::Ucs2Le | Encoding::Ucs2Be => 2,
            Encoding::Utf32Le | Encoding::Utf32Be => 4,
        }
    }

    pub fn max_code_point(self) -> u32 {
        match self {
            Encoding::Ascii => 0x7f,
            Encoding::Latin1 => 0xff,
            Encoding::Ucs2Le | Encoding::Ucs2Be => 0xffff,
            Encoding::Utf32Le | Encoding::Utf32Be => 0x10ffff,
        }
    }

    pub fn encode(self, ch: char) -> Result<Vec<u8>, EncodingError> {
        let cp = ch as u32;
        if cp > self.max_code_point() {
            return Err(EncodingError::Unencodable { ch, encoding: self });
        }

        Ok(match self {
            Encoding::Ascii | Encoding::Latin1 => vec![cp as u8],
            Encoding::Ucs2Le => (cp as u16).to_le_bytes().to_vec(),
            Encoding::Ucs2Be => (cp as u16).to_be_bytes().to_vec(),
            Encoding::Utf32Le => cp.to_le_bytes().to_vec(),
            Encoding::Utf32Be => cp.to_be_bytes().to_vec(),
        })
    }

    pub fn encode_str(self, s: &str) -> Result<Vec<u8>, EncodingError> {
        let mut bytes = Vec::with_capacity(s.len() * self.width());
        for ch in s.chars() {
            bytes.extend(self.encode(ch)?);
        }
        Ok(bytes)
    }

    pub fn decode(self, bytes: &[u8]) -> Result<String, EncodingError> {
        let width = self.width();
        if bytes.len() % width != 0 {
            return Err(EncodingError::Misaligned { len: bytes.len(), width });
        }

        bytes.chunks(width).map(|unit| {
            let cp = match self {
                Encoding::Ascii | Encoding::Latin1 => unit[0] as u32,
                Encoding::Ucs2Le => u16::from_le_bytes([unit[0], unit[1]]) as u32,
                Encoding::Ucs2Be => u16::from_be_bytes([unit[0], unit[1]]) as u32,
                Encoding::Utf32Le => u32::from_le_bytes([unit[0], unit[1], unit[2], unit[3]]),
                Encoding::Utf32Be => u32::from_be_bytes([unit[0], unit[1], unit[2], unit[3]]),
            };

            if cp > self.max_code_point() {
                return Err(EncodingError::InvalidUnit { unit: cp, encoding: self });
            }
            char::from_u32(cp).ok_or(EncodingError::InvalidUnit { unit: cp, encoding: self })
        }).collect()
    }

    /*
     * The bytes that may legally appear at each position of a
     * code unit. This over-approximates a little for UTF-32
     * (0x10_0000..=0x10_ffff share their high byte with
     * invalid values), which is fine for lexing purposes.
     */
    pub fn unit_ranges(self) -> Vec<RangeInclusive<u8>> {
        match self {
            Encoding::Ascii => vec![0x00..=0x7f],
            Encoding::Latin1 => vec![0x00..=0xff],
            Encoding::Ucs2Le | Encoding::Ucs2Be => vec![0x00..=0xff, 0x00..=0xff],
            Encoding::Utf32Le => vec![0x00..=0xff, 0x00..=0xff, 0x00..=0x10, 0x00..=0x00],
            Encoding::Utf32Be => vec![0x00..=0x00, 0x00..=0x10, 0x00..=0xff, 0x00..=0xff],
        }
    }
}

impl Default for Encoding {
    fn default() -> Self {
        Encoding::Ascii
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Encoding::Ascii => "ASCII",
            Encoding::Latin1 => "Latin-1",
            Encoding::Ucs2Le => "UCS-2LE",
            Encoding::Ucs2Be => "UCS-2BE",
            Encoding::Utf32Le => "UTF-32LE",
            Encoding::Utf32Be => "UTF-32BE",
        };
        write!(f, "{}", name)
    }
}
