
use std::fmt;
use std::rc::Rc;

use crate::decode::{self, DecodeError};
use crate::diagnostics::Window;
use crate::encoding::Encoding;

pub type TokenClass = usize;

// Class of the synthetic token that ends every token stream.
pub const END_OF_INPUT: TokenClass = 0;

/*
 * A view into one chunk of input. Cloning a token is cheap,
 * the bytes are shared with the chunk (and with every other
 * token cut from it), which stays alive as long as one of
 * its tokens does.
 */
#[derive(Clone)]
pub struct Token {
    chunk: Rc<[u8]>,
    offset: usize,
    len: usize,
    class: TokenClass,
    // Absolute offset of the first byte in the input stream.
    position: usize,
}

impl Token {
    pub fn new(chunk: Rc<[u8]>, offset: usize, len: usize, class: TokenClass, position: usize) -> Token {
        assert!(offset + len <= chunk.len(), "Token out of its chunk.");
        Token { chunk, offset, len, class, position }
    }

    pub fn end_of_input(position: usize) -> Token {
        Token {
            chunk: Rc::from(Vec::new()),
            offset: 0,
            len: 0,
            class: END_OF_INPUT,
            position,
        }
    }

    pub fn class(&self) -> TokenClass {
        self.class
    }

    pub fn is_end(&self) -> bool {
        self.class == END_OF_INPUT
    }

    pub fn bytes(&self) -> &[u8] {
        &self.chunk[self.offset..self.offset + self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn position(&self) -> usize {
        self.position
    }

    // An owned copy of the bytes, independent of the chunk.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes().to_vec()
    }

    /*
     * The bytes around the start of this token. Only the token's
     * own chunk is looked at, so the window may be shorter near
     * a chunk boundary.
     */
    pub fn window(&self) -> Window {
        Window::around(&self.chunk, self.offset, self.position - self.offset)
    }

    pub fn text(&self, encoding: Encoding) -> Result<String, DecodeError> {
        decode::decode_str(self.bytes(), encoding)
    }

    pub fn int(&self, encoding: Encoding) -> Result<i64, DecodeError> {
        decode::decode_int(self.bytes(), encoding)
    }

    pub fn float(&self, encoding: Encoding) -> Result<f64, DecodeError> {
        decode::decode_float(self.bytes(), encoding)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Token) -> bool {
        self.class == other.class && self.bytes() == other.bytes()
    }
}

impl Eq for Token {}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_end() {
            write!(f, "<end@{}>", self.position)
        } else {
            write!(
                f, "<{}:{:?}@{}>",
                self.class, String::from_utf8_lossy(self.bytes()), self.position,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_share_their_chunk() {
        let chunk: Rc<[u8]> = Rc::from(&b"12+-3"[..]);
        let a = Token::new(chunk.clone(), 0, 2, 1, 10);
        let b = Token::new(chunk.clone(), 3, 2, 1, 13);

        assert_eq!(Rc::strong_count(&chunk), 3);
        assert_eq!(a.int(Encoding::Ascii), Ok(12));
        assert_eq!(b.int(Encoding::Ascii), Ok(-3));
        assert_eq!(b.window().offset, 13);
        assert_eq!(b.window().caret, 3);
    }

    #[test]
    fn equality_is_by_class_and_content() {
        let a = Token::new(Rc::from(&b"x+x"[..]), 0, 1, 4, 0);
        let b = Token::new(Rc::from(&b"x+x"[..]), 2, 1, 4, 2);
        let c = Token::new(Rc::from(&b"x+x"[..]), 2, 1, 5, 2);
        assert_eq!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, Token::end_of_input(3));
        assert!(Token::end_of_input(3).is_end());
    }

    #[test]
    fn debug_shows_class_and_text() {
        let t = Token::new(Rc::from(&b"abc"[..]), 1, 2, 7, 41);
        assert_eq!(format!("{:?}", t), "<7:\"bc\"@41>");
        assert_eq!(format!("{:?}", Token::end_of_input(3)), "<end@3>");
    }
}
