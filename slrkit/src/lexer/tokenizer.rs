
use crate::diagnostics::Window;
use crate::encoding::Encoding;
use crate::ids::IdSource;
use crate::parser::Terminal;

use super::dfa::{Match, Matcher};
use super::error::{LexError, TokenizerError};
use super::minimize::minimize;
use super::nfa::Automaton;
use super::subset::subset_construction;
use super::thompson::Compiler;
use super::token::{TokenClass, END_OF_INPUT};
use super::types::{PatternError, RegExp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchVerdict {
    Keep,
    Discard,
}

/*
 * Called with the candidate lexeme each time the scanner reaches
 * an accepting position of the hook's class. `Discard` makes the
 * scanner ignore that position, so a shorter match (possibly of
 * another class) is used instead.
 */
pub type MatchHook = Box<dyn Fn(&[u8]) -> MatchVerdict>;

struct ClassInfo {
    name: String,
    // None for the end-of-input class.
    pattern: Option<(RegExp, Encoding)>,
    ignored: bool,
    hook: Option<MatchHook>,
}

// One token found by `tokenize`, relative to the scanned buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scanned {
    pub offset: usize,
    pub len: usize,
    pub class: TokenClass,
}

/*
 * Collects the terminal patterns, compiles them into a single
 * matcher and cuts buffers into tokens.
 *
 * Class ids are handed out in declaration order, starting at 1;
 * class 0 is the end-of-input marker.
 */
pub struct Tokenizer {
    ids: IdSource,
    classes: Vec<ClassInfo>,
    encoding: Encoding,
    matcher: Option<Matcher>,
    scanned: Vec<Scanned>,
    carry: Option<usize>,
}

impl Tokenizer {
    pub fn new() -> Tokenizer {
        let mut ids = IdSource::new();
        let end = ids.take();
        debug_assert_eq!(end, END_OF_INPUT);

        Tokenizer {
            ids,
            classes: vec![ClassInfo {
                name: "$".to_string(),
                pattern: None,
                ignored: false,
                hook: None,
            }],
            encoding: Encoding::default(),
            matcher: None,
            scanned: Vec::new(),
            carry: None,
        }
    }

    // Encoding of the patterns that don't name one themselves.
    pub fn with_encoding(mut self, encoding: Encoding) -> Tokenizer {
        self.encoding = encoding;
        self
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    fn declare(
        &mut self,
        name: Option<&str>,
        pattern: RegExp,
        ignored: bool,
        hook: Option<MatchHook>,
    )
        -> Result<TokenClass, TokenizerError>
    {
        if self.matcher.is_some() {
            return Err(TokenizerError::AlreadyBuilt)
        }

        let class = self.ids.upcoming();
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("<ignored {}>", class),
        };
        let invalid = |source| TokenizerError::Pattern { name: name.clone(), source };

        let encoding = pattern.resolve_encoding(self.encoding).map_err(invalid)?;
        if pattern.nullable() {
            return Err(invalid(PatternError::Empty))
        }

        let taken = self.ids.take();
        debug_assert_eq!(taken, class);
        self.classes.push(ClassInfo {
            name,
            pattern: Some((pattern, encoding)),
            ignored,
            hook,
        });

        Ok(class)
    }

    pub fn use_terminal(&mut self, name: &str, pattern: RegExp) -> Result<Terminal, TokenizerError> {
        let class = self.declare(Some(name), pattern, false, None)?;
        Ok(Terminal::new(name, class))
    }

    pub fn use_terminal_with(
        &mut self,
        name: &str,
        pattern: RegExp,
        hook: impl Fn(&[u8]) -> MatchVerdict + 'static,
    )
        -> Result<Terminal, TokenizerError>
    {
        let class = self.declare(Some(name), pattern, false, Some(Box::new(hook)))?;
        Ok(Terminal::new(name, class))
    }

    pub fn ignore_terminal(&mut self, pattern: RegExp) -> Result<TokenClass, TokenizerError> {
        self.declare(None, pattern, true, None)
    }

    pub fn ignore_terminal_with(
        &mut self,
        pattern: RegExp,
        hook: impl Fn(&[u8]) -> MatchVerdict + 'static,
    )
        -> Result<TokenClass, TokenizerError>
    {
        self.declare(None, pattern, true, Some(Box::new(hook)))
    }

    /*
     * Compiles every declared pattern into one matcher: a shared
     * start state branches into each pattern's NFA, and the union
     * goes through subset construction and minimization.
     */
    pub fn build_transitions(&mut self) -> Result<(), TokenizerError> {
        if self.matcher.is_some() {
            return Err(TokenizerError::AlreadyBuilt)
        }
        if self.classes.len() <= 1 {
            return Err(TokenizerError::NoPatterns)
        }

        let mut nfa = Automaton::new();
        let start = nfa.add_state("start");

        for (class, info) in self.classes.iter().enumerate() {
            if let Some((pattern, encoding)) = &info.pattern {
                let mut compiler = Compiler::new(&mut nfa, *encoding);
                let frag = compiler
                    .compile(pattern)
                    .map_err(|source| TokenizerError::Pattern { name: info.name.clone(), source })?;
                compiler.accept(&frag, class);
                nfa.add_epsilon(start, frag.start);
            }
        }

        let dfa = subset_construction(&nfa, start);
        let min = minimize(&dfa);
        let matcher = Matcher::compile(&min);

        log::debug!(
            "built transitions for {} classes: {} NFA states, {} DFA states, {} after minimization",
            self.classes.len() - 1, nfa.len(), dfa.len(), matcher.state_count(),
        );

        self.matcher = Some(matcher);
        Ok(())
    }

    pub fn is_built(&self) -> bool {
        self.matcher.is_some()
    }

    // Number of classes, the end-of-input class included.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn is_ignored(&self, class: TokenClass) -> bool {
        self.classes.get(class).map_or(false, |info| info.ignored)
    }

    pub fn class_name(&self, class: TokenClass) -> Option<&str> {
        self.classes.get(class).map(|info| info.name.as_str())
    }

    /*
     * Cuts `buffer[offset..offset + len]` into tokens, which can
     * then be read with `scanned`. Returns the index of the last
     * token found, if any.
     *
     * The buffer is taken to be the whole remaining input: a token
     * running into its end is accepted as is, even when it never
     * reached an accepting state (it then gets the class it was
     * on its way to).
     */
    pub fn tokenize(&mut self, buffer: &[u8], offset: usize, len: usize) -> Result<Option<usize>, LexError> {
        self.tokenize_chunk(buffer, offset, len, false)
    }

    /*
     * Like `tokenize`, but when `more_input` is set the last token
     * is not cut at the end of the buffer if more bytes could still
     * extend it. Its offset is then available from `carry_offset`,
     * and the caller is expected to scan it again with the next
     * chunk of input appended.
     */
    pub fn tokenize_chunk(
        &mut self,
        buffer: &[u8],
        offset: usize,
        len: usize,
        more_input: bool,
    )
        -> Result<Option<usize>, LexError>
    {
        self.scanned.clear();
        self.carry = None;

        let matcher = self.matcher.as_ref().ok_or(LexError::NotBuilt)?;
        let end = match offset.checked_add(len) {
            Some(end) if end <= buffer.len() => end,
            _ => return Err(LexError::OutOfBounds { offset, len, available: buffer.len() }),
        };
        let classes = &self.classes;
        let mut pos = offset;

        while pos < end {
            let input = &buffer[pos..end];
            let mut accept = |class: usize, len: usize| match &classes[class].hook {
                Some(hook) => hook(&input[..len]) == MatchVerdict::Keep,
                None => true,
            };

            let found = match matcher.scan(input, &mut accept) {
                Some(Match::Token { len, class, at_edge }) if !(at_edge && more_input) => Some((len, class)),
                Some(Match::Unterminated { len, class: Some(class) }) if !more_input && accept(class, len) => {
                    Some((len, class))
                },
                Some(_) if more_input => {
                    self.carry = Some(pos);
                    break
                },
                _ => None,
            };

            match found {
                Some((len, class)) => {
                    self.scanned.push(Scanned { offset: pos, len, class });
                    if log::log_enabled!(log::Level::Trace) {
                        log::trace!(
                            "token {} {:?} at {}",
                            classes[class].name, String::from_utf8_lossy(&input[..len]), pos,
                        );
                    }
                    pos += len;
                },
                None => return Err(LexError::UnexpectedToken(Window::around(buffer, pos, 0))),
            }
        }

        Ok(self.scanned.len().checked_sub(1))
    }

    pub fn scanned(&self) -> &[Scanned] {
        &self.scanned
    }

    // Where the token left for the next chunk starts, if any.
    pub fn carry_offset(&self) -> Option<usize> {
        self.carry
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Tokenizer::new()
    }
}
