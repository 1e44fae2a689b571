
use std::collections::VecDeque;
use std::io::{self, Read};
use std::rc::Rc;

use super::error::LexError;
use super::token::Token;
use super::tokenizer::Tokenizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerConfig {
    // Size of the first buffer; it only grows for tokens longer than that.
    pub chunk_size: usize,
    pub max_token_len: Option<usize>,
}

impl Default for LexerConfig {
    fn default() -> Self {
        LexerConfig {
            chunk_size: 4096,
            max_token_len: None,
        }
    }
}

impl LexerConfig {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> LexerConfig {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_max_token_len(mut self, max_token_len: usize) -> LexerConfig {
        self.max_token_len = Some(max_token_len);
        self
    }
}

/*
 * Reads a byte source chunk by chunk and yields its tokens,
 * ignored classes left out, followed by one end-of-input token.
 *
 * Each refill reads once from the source into a fresh chunk.
 * A token that may go on past the end of the chunk is not cut:
 * its bytes are copied to the front of the next chunk and it
 * is scanned again once more input is there.
 */
pub struct Lexer<'t, R> {
    tokenizer: &'t mut Tokenizer,
    source: R,
    config: LexerConfig,
    capacity: usize,
    pending: VecDeque<Token>,
    carry: Vec<u8>,
    // Stream offset of the first byte of `carry` (or of the next chunk).
    base: usize,
    exhausted: bool,
    done: bool,
}

// One read, retried when interrupted.
fn read_some(source: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match source.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            res => return res,
        }
    }
}

impl<'t, R: Read> Lexer<'t, R> {
    pub fn new(tokenizer: &'t mut Tokenizer, source: R) -> Lexer<'t, R> {
        Lexer::with_config(tokenizer, source, LexerConfig::default())
    }

    pub fn with_config(tokenizer: &'t mut Tokenizer, source: R, config: LexerConfig) -> Lexer<'t, R> {
        Lexer {
            tokenizer,
            source,
            capacity: config.chunk_size.max(1),
            config,
            pending: VecDeque::new(),
            carry: Vec::new(),
            base: 0,
            exhausted: false,
            done: false,
        }
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &*self.tokenizer
    }

    // Current size of the buffer.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn grow(&mut self) -> Result<(), LexError> {
        match self.config.max_token_len {
            Some(limit) if self.capacity >= limit => Err(LexError::TokenTooLong { limit }),
            Some(limit) => {
                self.capacity = (self.capacity * 2).min(limit);
                Ok(())
            },
            None => {
                self.capacity *= 2;
                Ok(())
            },
        }
    }

    fn refill(&mut self) -> Result<(), LexError> {
        let mut buf = std::mem::take(&mut self.carry);
        let carried = buf.len();
        if carried >= self.capacity {
            self.grow()?;
            log::debug!("token at byte {} fills the buffer, growing it to {} bytes", self.base, self.capacity);
        }

        buf.resize(self.capacity, 0);
        let read = read_some(&mut self.source, &mut buf[carried..])?;
        if read == 0 {
            self.exhausted = true;
        }

        let filled = carried + read;
        buf.truncate(filled);
        let chunk: Rc<[u8]> = Rc::from(buf);

        log::trace!("refill: {} carried bytes, {} read, stream offset {}", carried, read, self.base);

        let base = self.base;
        self.tokenizer
            .tokenize_chunk(&chunk, 0, filled, !self.exhausted)
            .map_err(|e| e.shifted(base))?;

        for s in self.tokenizer.scanned() {
            if !self.tokenizer.is_ignored(s.class) {
                self.pending.push_back(Token::new(chunk.clone(), s.offset, s.len, s.class, base + s.offset));
            }
        }

        match self.tokenizer.carry_offset() {
            Some(offset) => {
                self.carry = chunk[offset..].to_vec();
                self.base += offset;
            },
            None => self.base += filled,
        }

        Ok(())
    }
}

impl<R: Read> Iterator for Lexer<'_, R> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(Ok(token))
            }
            if self.done {
                return None
            }
            if self.exhausted && self.carry.is_empty() {
                self.done = true;
                return Some(Ok(Token::end_of_input(self.base)))
            }
            if let Err(e) = self.refill() {
                self.done = true;
                return Some(Err(e))
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for Lexer<'_, R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::Encoding;
    use crate::lexer::builders::*;
    use crate::lexer::token::END_OF_INPUT;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn words() -> Tokenizer {
        let mut t = Tokenizer::new();
        t.use_terminal("word", at_least_one_of(range_of('a', 'z', Encoding::Ascii))).unwrap();
        t.ignore_terminal(at_least_one_of(literal(" "))).unwrap();
        t.build_transitions().unwrap();
        t
    }

    fn lex(t: &mut Tokenizer, input: &[u8], config: LexerConfig) -> Result<Vec<(Vec<u8>, usize)>, LexError> {
        Lexer::with_config(t, input, config)
            .map(|tok| tok.map(|tok| (tok.to_vec(), tok.position())))
            .collect()
    }

    #[test]
    fn ends_with_one_end_marker() {
        init();
        let mut t = words();
        let mut lexer = Lexer::new(&mut t, &b"ab cd"[..]);

        assert_eq!(lexer.next().unwrap().unwrap().bytes(), b"ab");
        assert_eq!(lexer.next().unwrap().unwrap().bytes(), b"cd");
        let end = lexer.next().unwrap().unwrap();
        assert_eq!(end.class(), END_OF_INPUT);
        assert_eq!(end.position(), 5);
        assert!(lexer.next().is_none());
        assert!(lexer.next().is_none());
    }

    #[test]
    fn tokens_straddling_chunks() {
        init();
        let mut t = words();
        let input = b"alpha beta gamma delta";
        let whole = lex(&mut t, input, LexerConfig::default()).unwrap();
        let split = lex(&mut t, input, LexerConfig::default().with_chunk_size(3)).unwrap();

        assert_eq!(whole, split);
        assert_eq!(whole[1], (b"beta".to_vec(), 6));
        assert_eq!(whole.len(), 5);
    }

    #[test]
    fn buffer_grows_for_long_tokens() {
        let mut t = words();
        let mut lexer = Lexer::with_config(&mut t, &b"abcdefghij k"[..], LexerConfig::default().with_chunk_size(2));
        assert_eq!(lexer.next().unwrap().unwrap().bytes(), b"abcdefghij");
        assert!(lexer.capacity() >= 10);
    }

    #[test]
    fn token_length_limit() {
        let mut t = words();
        let config = LexerConfig::default().with_chunk_size(2).with_max_token_len(4);
        match lex(&mut t, b"abcdefghij", config) {
            Err(LexError::TokenTooLong { limit }) => assert_eq!(limit, 4),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn errors_carry_stream_offsets() {
        let mut t = words();
        let mut lexer = Lexer::with_config(&mut t, &b"abc de?f"[..], LexerConfig::default().with_chunk_size(4));
        let results: Vec<_> = lexer.by_ref().collect();

        match results.last() {
            Some(Err(LexError::UnexpectedToken(w))) => assert_eq!(w.offset, 6),
            other => panic!("unexpected result {:?}", other),
        }
        assert!(lexer.next().is_none());
    }

    #[test]
    fn returned_tokens_survive_refills() {
        let mut t = words();
        let tokens: Vec<Token> = Lexer::with_config(&mut t, &b"one two three"[..], LexerConfig::default().with_chunk_size(4))
            .collect::<Result<_, _>>()
            .unwrap();
        let texts: Vec<&[u8]> = tokens.iter().map(Token::bytes).collect();
        assert_eq!(texts, vec![&b"one"[..], b"two", b"three", b""]);
    }
}
