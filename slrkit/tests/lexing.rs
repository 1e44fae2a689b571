use proptest::prelude::*;

use slrkit::lexer::*;
use slrkit::pattern;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn lex_all(tokenizer: &mut Tokenizer, input: &[u8], chunk_size: usize) -> Result<Vec<Token>, LexError> {
    let config = LexerConfig::default().with_chunk_size(chunk_size);
    Lexer::with_config(tokenizer, input, config).collect()
}

#[test]
fn prefix_free_literals_without_separators() {
    init();
    let mut t = Tokenizer::new();
    let words = ["lexem", "123", "ley", ",", "6", ".", "7", "&", "#"];
    let terminals: Vec<_> = words.iter()
        .map(|w| t.use_terminal(w, literal(*w)).unwrap())
        .collect();
    t.build_transitions().unwrap();

    let tokens = lex_all(&mut t, b"lexem123ley,6.7&#", 4096).unwrap();
    assert_eq!(tokens.len(), words.len() + 1);

    let mut offset = 0;
    for ((token, word), terminal) in tokens.iter().zip(words.iter()).zip(terminals.iter()) {
        assert_eq!(token.class(), terminal.class());
        assert_eq!(token.bytes(), word.as_bytes());
        assert_eq!(token.position(), offset);
        offset += word.len();
    }
    assert!(tokens[words.len()].is_end());
}

#[test]
fn longest_match() {
    let mut t = Tokenizer::new();
    t.use_terminal("ab", literal("ab")).unwrap();
    let abc = t.use_terminal("abc", literal("abc")).unwrap();
    t.build_transitions().unwrap();

    let tokens = lex_all(&mut t, b"abc", 4096).unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].class(), abc.class());
    assert_eq!(tokens[0].bytes(), b"abc");
}

#[test]
fn block_comments_end_at_the_first_delimiter() {
    let mut t = Tokenizer::new();
    let comment = t.use_terminal("comment", pattern!(("/*" & (_ .. "*/")))).unwrap();
    let word = t.use_terminal("word", at_least_one_of(range_of('a', 'z', Encoding::Ascii))).unwrap();
    t.ignore_terminal(literal(" ")).unwrap();
    t.build_transitions().unwrap();

    let tokens = lex_all(&mut t, b"/* a **/ b /**/", 4096).unwrap();
    let found: Vec<(usize, &[u8])> = tokens.iter().map(|t| (t.class(), t.bytes())).collect();
    assert_eq!(found, vec![
        (comment.class(), &b"/* a **/"[..]),
        (word.class(), &b"b"[..]),
        (comment.class(), &b"/**/"[..]),
        (END_OF_INPUT, &b""[..]),
    ]);
}

#[test]
fn wide_negated_class() {
    let mut t = Tokenizer::new().with_encoding(Encoding::Ucs2Le);
    let quote = t.use_terminal("quote", literal('"')).unwrap();
    let body = t.use_terminal("body", at_least_one_of(literal_except(Encoding::Ucs2Le, ['"']))).unwrap();
    t.build_transitions().unwrap();

    let input = Encoding::Ucs2Le.encode_str("\"h\u{e9}\u{4e16}\"").unwrap();
    let tokens = lex_all(&mut t, &input, 4096).unwrap();

    let classes: Vec<usize> = tokens.iter().map(Token::class).collect();
    assert_eq!(classes, vec![quote.class(), body.class(), quote.class(), END_OF_INPUT]);
    assert_eq!(tokens[1].text(Encoding::Ucs2Le).unwrap(), "h\u{e9}\u{4e16}");
}

#[test]
fn later_terminal_wins_ties() {
    let mut t = Tokenizer::new();
    let keyword = t.use_terminal("while", literal("while")).unwrap();
    let ident = t.use_terminal("ident", at_least_one_of(range_of('a', 'z', Encoding::Ascii))).unwrap();
    t.build_transitions().unwrap();

    let tokens = lex_all(&mut t, b"while", 4096).unwrap();
    assert_eq!(tokens[0].class(), ident.class());
    assert_ne!(tokens[0].class(), keyword.class());
}

#[test]
fn vetoed_match_falls_back() {
    let mut t = Tokenizer::new();
    let digit = t.use_terminal("digit", range_of('0', '9', Encoding::Ascii)).unwrap();
    // Numbers of more than three digits are refused.
    let number = t.use_terminal_with(
        "number",
        at_least_one_of(range_of('0', '9', Encoding::Ascii)),
        |bytes| if bytes.len() <= 3 { MatchVerdict::Keep } else { MatchVerdict::Discard },
    ).unwrap();
    t.build_transitions().unwrap();

    let tokens = lex_all(&mut t, b"12345", 4096).unwrap();
    let found: Vec<(usize, Vec<u8>)> = tokens.iter().map(|t| (t.class(), t.to_vec())).collect();
    assert_eq!(found, vec![
        (number.class(), b"123".to_vec()),
        (number.class(), b"45".to_vec()),
        (END_OF_INPUT, Vec::new()),
    ]);
    assert_ne!(digit.class(), number.class());
}

#[test]
fn unclosed_comment_runs_to_the_end() {
    let mut t = Tokenizer::new();
    let word = t.use_terminal("word", at_least_one_of(range_of('a', 'z', Encoding::Ascii))).unwrap();
    let comment = t.use_terminal("comment", pattern!(("/*" & (_ .. "*/")))).unwrap();
    t.ignore_terminal(literal(" ")).unwrap();
    t.build_transitions().unwrap();

    for chunk_size in [2, 3, 4096] {
        let tokens = lex_all(&mut t, b"ab /* cd", chunk_size).unwrap();
        let found: Vec<(usize, Vec<u8>)> = tokens.iter().map(|t| (t.class(), t.to_vec())).collect();
        assert_eq!(found, vec![
            (word.class(), b"ab".to_vec()),
            (comment.class(), b"/* cd".to_vec()),
            (END_OF_INPUT, Vec::new()),
        ]);
    }
}

#[test]
fn lazy_then_greedy() {
    let mut t = Tokenizer::new();
    let tagged = t.use_terminal("tagged", sequence([
        literal("<"),
        any_number_of_with(any_char(), Greediness::Lazy),
        literal(">"),
        at_least_one_of(range_of('0', '9', Encoding::Ascii)),
    ])).unwrap();
    t.ignore_terminal(literal(" ")).unwrap();
    t.build_transitions().unwrap();

    let tokens = lex_all(&mut t, b"<a>123 <b>4", 4).unwrap();
    let found: Vec<(usize, Vec<u8>)> = tokens.iter().map(|t| (t.class(), t.to_vec())).collect();
    assert_eq!(found, vec![
        (tagged.class(), b"<a>123".to_vec()),
        (tagged.class(), b"<b>4".to_vec()),
        (END_OF_INPUT, Vec::new()),
    ]);
}

#[test]
fn delimiter_outside_the_repeated_class() {
    let mut t = Tokenizer::new();
    let comment = t.use_terminal("comment", sequence([
        literal("/*"),
        repeat_until(literal_except(Encoding::Ascii, ['*']), literal("*/")),
    ])).unwrap();
    t.ignore_terminal(literal(" ")).unwrap();
    t.build_transitions().unwrap();

    let tokens = lex_all(&mut t, b"/* a */ /**/", 4096).unwrap();
    let found: Vec<(usize, Vec<u8>)> = tokens.iter().map(|t| (t.class(), t.to_vec())).collect();
    assert_eq!(found, vec![
        (comment.class(), b"/* a */".to_vec()),
        (comment.class(), b"/**/".to_vec()),
        (END_OF_INPUT, Vec::new()),
    ]);
}

fn json_like() -> Tokenizer {
    let mut t = Tokenizer::new();
    t.use_terminal("string", sequence([
        literal('"'),
        any_number_of(literal_except(Encoding::Ascii, ['"'])),
        literal('"'),
    ])).unwrap();
    t.use_terminal("number", at_least_one_of(range_of('0', '9', Encoding::Ascii))).unwrap();
    t.use_terminal("name", at_least_one_of(range_of('a', 'z', Encoding::Ascii))).unwrap();
    for punct in ["{", "}", "[", "]", ":", ","] {
        t.use_terminal(punct, literal(punct)).unwrap();
    }
    t.ignore_terminal(at_least_one_of(choice([literal(" "), literal("\n")]))).unwrap();
    t.ignore_terminal(pattern!(("/*" & (_ .. "*/")))).unwrap();
    t.build_transitions().unwrap();
    t
}

proptest! {
    #[test]
    fn chunk_size_does_not_change_tokens(
        words in prop::collection::vec(
            prop_oneof![
                "[a-z]{1,12}",
                "[0-9]{1,12}",
                "\"[a-z ]{0,10}\"",
                "/\\*[a-z* ]{0,8}\\*/",
                "[{}:,\\[\\]]",
            ],
            0..20,
        ),
        chunk_size in 1usize..16,
    ) {
        init();
        let input = words.join(" ");
        let mut t = json_like();

        let whole = lex_all(&mut t, input.as_bytes(), 1 << 16).unwrap();
        let chunked = lex_all(&mut t, input.as_bytes(), chunk_size).unwrap();

        prop_assert_eq!(&whole, &chunked);
        let positions: Vec<usize> = whole.iter().map(Token::position).collect();
        let chunked_positions: Vec<usize> = chunked.iter().map(Token::position).collect();
        prop_assert_eq!(positions, chunked_positions);
    }
}
