
use std::fmt;

use crate::diagnostics::Window;
use crate::lexer::{LexError, Token, TokenClass};

use super::error::ParseError;
use super::grammar::AugmentedGrammar;
use super::table::{Action, ParsingTable};
use super::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    Accepted,
    // A syntax error was handled by the error hook.
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorHandling {
    Handled,
    Unhandled,
}

#[derive(Debug, Clone)]
pub struct SyntaxError {
    pub state_stack: Vec<usize>,
    pub token: Token,
    pub expected: Vec<TokenClass>,
    pub window: Window,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f, "syntax error: unexpected {:?} in state {} (expected classes {:?}) {}",
            self.token,
            self.state_stack.last().copied().unwrap_or(0),
            self.expected,
            self.window,
        )
    }
}

/*
 * The tokens matched by the terminals of the production being
 * reduced, oldest first. `take` removes what it returns, so a
 * terminal that appears twice is taken once per occurrence,
 * the rightmost first.
 */
pub struct Reduction {
    production: usize,
    values: Vec<Option<Token>>,
}

impl Reduction {
    pub fn production(&self) -> usize {
        self.production
    }

    pub fn take(&mut self, terminal: &Terminal) -> Result<Token, ParseError> {
        self.values.iter_mut()
            .rev()
            .find(|v| v.as_ref().map_or(false, |t| t.class() == terminal.class()))
            .and_then(Option::take)
            .ok_or_else(|| ParseError::ArgumentOutOfRange {
                terminal: terminal.name().to_string(),
                production: self.production,
            })
    }

    // Tokens not taken yet.
    pub fn remaining(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/*
 * Shift-reduce driver for one token stream. Semantic values of
 * non-terminals are kept by the actions themselves, in the
 * context passed to `parse_input`.
 */
pub struct Parser<'g, C, L> {
    table: &'g ParsingTable,
    grammar: &'g AugmentedGrammar<C>,
    tokens: L,
    on_accept: Option<Box<dyn FnMut() + 'g>>,
    on_syntax_error: Option<Box<dyn FnMut(&SyntaxError) -> ErrorHandling + 'g>>,
}

impl<'g, C, L> Parser<'g, C, L>
    where L: Iterator<Item = Result<Token, LexError>>,
{
    pub fn new(table: &'g ParsingTable, grammar: &'g AugmentedGrammar<C>, tokens: L) -> Parser<'g, C, L> {
        Parser {
            table,
            grammar,
            tokens,
            on_accept: None,
            on_syntax_error: None,
        }
    }

    pub fn on_accept(mut self, hook: impl FnMut() + 'g) -> Parser<'g, C, L> {
        self.on_accept = Some(Box::new(hook));
        self
    }

    pub fn on_syntax_error(mut self, hook: impl FnMut(&SyntaxError) -> ErrorHandling + 'g) -> Parser<'g, C, L> {
        self.on_syntax_error = Some(Box::new(hook));
        self
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        match self.tokens.next() {
            Some(token) => Ok(token?),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    pub fn parse_input(&mut self, ctx: &mut C) -> Result<ParseOutcome, ParseError> {
        let mut states: Vec<usize> = vec![0];
        let mut values: Vec<Option<Token>> = Vec::new();
        let mut lookahead = self.next_token()?;

        loop {
            let state = states[states.len() - 1];

            match self.table.action(state, lookahead.class()) {
                Action::Shift(target) => {
                    log::trace!("shift {:?}, go to state {}", lookahead, target);
                    states.push(target);
                    values.push(Some(lookahead));
                    lookahead = self.next_token()?;
                },
                Action::Reduce(id) => {
                    let production = self.grammar.production(id);
                    states.truncate(states.len() - production.rhs().len());

                    let top = states[states.len() - 1];
                    let target = self.grammar.non_terminal_index(production.lhs())
                        .and_then(|nt| self.table.goto(top, nt))
                        .ok_or_else(|| ParseError::MissingGoto {
                            state: top,
                            non_terminal: production.lhs().name().to_string(),
                        })?;
                    states.push(target);

                    let window = values.split_off(values.len() - production.terminal_count());
                    let mut reduction = Reduction { production: id, values: window };
                    if log::log_enabled!(log::Level::Trace) {
                        log::trace!("reduce {}, go to state {}", production, target);
                    }
                    if let Some(action) = production.action() {
                        action(ctx, &mut reduction)?;
                    }
                },
                Action::Accept => {
                    log::trace!("accept");
                    if let Some(hook) = self.on_accept.as_mut() {
                        hook();
                    }
                    return Ok(ParseOutcome::Accepted)
                },
                Action::Error => {
                    let error = SyntaxError {
                        state_stack: states.clone(),
                        expected: self.table.expected(state),
                        window: lookahead.window(),
                        token: lookahead,
                    };
                    let handling = match self.on_syntax_error.as_mut() {
                        Some(hook) => hook(&error),
                        None => ErrorHandling::Unhandled,
                    };
                    return match handling {
                        ErrorHandling::Handled => Ok(ParseOutcome::Rejected),
                        ErrorHandling::Unhandled => Err(ParseError::Syntax(Box::new(error))),
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn token(class: TokenClass, text: &str) -> Token {
        Token::new(Rc::from(text.as_bytes()), 0, text.len(), class, 0)
    }

    #[test]
    fn take_scans_backward_and_removes() {
        let a = Terminal::new("a", 1);
        let b = Terminal::new("b", 2);
        let mut r = Reduction {
            production: 3,
            values: vec![Some(token(1, "first")), Some(token(2, "b")), Some(token(1, "second"))],
        };

        assert_eq!(r.take(&a).unwrap().bytes(), b"second");
        assert_eq!(r.take(&a).unwrap().bytes(), b"first");
        assert_eq!(r.remaining(), 1);
        assert!(matches!(
            r.take(&a),
            Err(ParseError::ArgumentOutOfRange { production: 3, .. })
        ));
        assert_eq!(r.take(&b).unwrap().bytes(), b"b");
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn parses_a_token_stream() {
        // S -> ( S ) | x, counting the parentheses.
        let s = NonTerminal::new("S");
        let lpar = Terminal::new("(", 1);
        let rpar = Terminal::new(")", 2);
        let x = Terminal::new("x", 3);

        let mut g: AugmentedGrammar<usize> = AugmentedGrammar::new();
        let (l, r) = (lpar.clone(), rpar.clone());
        g.add(Production::new(&s, [lpar.sym(), s.sym(), rpar.sym()]).with_action(move |depth: &mut usize, red: &mut Reduction| {
            red.take(&r)?;
            red.take(&l)?;
            *depth += 1;
            Ok(())
        })).unwrap();
        g.add(Production::new(&s, [x.sym()])).unwrap();
        let table = ParsingTable::build(&g, 4).unwrap();

        let input = vec![token(1, "("), token(1, "("), token(3, "x"), token(2, ")"), token(2, ")"), Token::end_of_input(5)];
        let mut accepted = false;
        let mut depth = 0;
        let outcome = Parser::new(&table, &g, input.into_iter().map(Ok))
            .on_accept(|| accepted = true)
            .parse_input(&mut depth)
            .unwrap();

        assert_eq!(outcome, ParseOutcome::Accepted);
        assert!(accepted);
        assert_eq!(depth, 2);
    }

    #[test]
    fn syntax_errors() {
        let s = NonTerminal::new("S");
        let x = Terminal::new("x", 1);
        let mut g: AugmentedGrammar<()> = AugmentedGrammar::new();
        g.add(Production::new(&s, [x.sym(), x.sym()])).unwrap();
        let table = ParsingTable::build(&g, 2).unwrap();

        let input = || vec![token(1, "x"), Token::end_of_input(1)].into_iter().map(Ok);

        match Parser::new(&table, &g, input()).parse_input(&mut ()) {
            Err(ParseError::Syntax(err)) => {
                assert!(err.token.is_end());
                assert_eq!(err.expected, vec![1]);
                assert_eq!(err.state_stack.len(), 2);
            },
            other => panic!("expected a syntax error, got {:?}", other),
        }

        let mut seen = 0;
        let outcome = Parser::new(&table, &g, input())
            .on_syntax_error(|_| {
                seen += 1;
                ErrorHandling::Handled
            })
            .parse_input(&mut ())
            .unwrap();
        assert_eq!(outcome, ParseOutcome::Rejected);
        assert_eq!(seen, 1);

        let truncated = vec![token(1, "x")].into_iter().map(Ok);
        assert!(matches!(
            Parser::new(&table, &g, truncated).parse_input(&mut ()),
            Err(ParseError::UnexpectedEnd)
        ));
    }
}
