
use std::fmt;

// How many bytes are kept on each side of an error position.
pub const WINDOW_RADIUS: usize = 8;

/*
 * A few bytes of input around a position, kept so that
 * error messages can show context without re-reading the
 * input (which the streaming lexer can't do anyway).
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    // Absolute offset of the error position in the input stream.
    pub offset: usize,
    pub bytes: Vec<u8>,
    // Index of the error position inside `bytes`.
    pub caret: usize,
}

impl Window {
    /*
     * Cuts a window around `pos` out of `buffer`; `base` is the
     * absolute stream offset of `buffer[0]`.
     */
    pub fn around(buffer: &[u8], pos: usize, base: usize) -> Window {
        let pos = pos.min(buffer.len());
        let start = pos.saturating_sub(WINDOW_RADIUS);
        let end = (pos + WINDOW_RADIUS).min(buffer.len());
        Window {
            offset: base + pos,
            bytes: buffer[start..end].to_vec(),
            caret: pos - start,
        }
    }

    pub fn shifted(mut self, by: usize) -> Window {
        self.offset += by;
        self
    }
}

fn escaped(bytes: &[u8]) -> String {
    bytes.iter().flat_map(|b| std::ascii::escape_default(*b)).map(char::from).collect()
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let before = escaped(&self.bytes[..self.caret]);
        let after = escaped(&self.bytes[self.caret..]);
        write!(f, "at byte {}: \"{}\" here--> \"{}\"", self.offset, before, after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_clamped_to_the_buffer() {
        let w = Window::around(b"abc", 1, 100);
        assert_eq!(w.offset, 101);
        assert_eq!(w.bytes, b"abc");
        assert_eq!(w.caret, 1);

        let w = Window::around(b"0123456789abcdefghij", 15, 0);
        assert_eq!(w.bytes, b"789abcdefghij");
        assert_eq!(w.caret, 8);
    }

    #[test]
    fn display_escapes_bytes() {
        let w = Window::around(b"a\nb", 2, 0);
        assert_eq!(w.to_string(), "at byte 2: \"a\\n\" here--> \"b\"");
    }
}
