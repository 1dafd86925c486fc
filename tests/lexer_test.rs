use color_eyre::eyre::Result;
use proptest::prelude::*;

use cadl::lexer::{
    formatter::{BasicFormatter, LineFormatter, ToFormatter, TokenFormatter},
    Lexer, Token, TokenKind,
};

fn dump<F: TokenFormatter>(scanner: &mut Lexer, formatter: &F) -> String {
    let mut buffer = String::new();
    loop {
        match scanner.next_token() {
            Ok(token) => {
                buffer.push_str(&formatter.format(&token));
                if matches!(token.kind, TokenKind::Eof) {
                    break;
                }
            }
            Err(error) => {
                buffer.push_str(&formatter.format_lexical_error(&error));
            }
        }
        buffer.push('\n');
    }
    buffer
}

fn check(input: &str, expected: &str, test_name: &str) {
    let mut scanner = Lexer::new(input);
    let formatter: BasicFormatter = scanner.create_formatter();
    let actual = dump(&mut scanner, &formatter);
    assert_eq!(actual, expected, "Failed the test {test_name}");
}

fn check_lines(input: &str, expected: &str, test_name: &str) {
    let mut scanner = Lexer::new(input);
    let formatter: LineFormatter = scanner.create_formatter();
    let actual = dump(&mut scanner, &formatter);
    assert_eq!(actual, expected, "Failed the test {test_name}");
}

#[test]
fn smoke_test() {
    check("", "EOF  null", "smoke");
}

#[test]
fn test_all() -> Result<()> {
    let cases = [
        (
            "cat_declaration",
            "cat Miso { ears = \"pointy\"; }",
            "CAT cat null\nID Miso null\nLCURLY { null\nID ears null\nASSIGN = null\n\
             STRING \"pointy\" pointy\nSEMI ; null\nRCURLY } null\nEOF  null",
        ),
        (
            "keywords",
            "cat draw else func if randomcat return while",
            "CAT cat null\nDRAW draw null\nELSE else null\nFUNC func null\nIF if null\n\
             RANDOMCAT randomcat null\nRETURN return null\nWHILE while null\nEOF  null",
        ),
        (
            "keyword_prefixes_are_identifiers",
            "cats drawing _if",
            "ID cats null\nID drawing null\nID _if null\nEOF  null",
        ),
        (
            "operators",
            "== != = ! ( ) , .",
            "EQ == null\nNOTEQ != null\nASSIGN = null\nNOT ! null\nLPAREN ( null\n\
             RPAREN ) null\nCOMMA , null\nDOT . null\nEOF  null",
        ),
        (
            "operators_without_spaces",
            "a==b!=!c",
            "ID a null\nEQ == null\nID b null\nNOTEQ != null\nNOT ! null\nID c null\nEOF  null",
        ),
        (
            "integers",
            "0 007 42x",
            "INTEGER 0 0\nINTEGER 007 7\nINTEGER 42 42\nID x null\nEOF  null",
        ),
        (
            "integer_overflow",
            "99999999999999999999",
            "INTEGER 99999999999999999999 overflow\nEOF  null",
        ),
        (
            "strings",
            "\"\" \"two words\" \"a//b\"",
            "STRING \"\" \nSTRING \"two words\" two words\nSTRING \"a//b\" a//b\nEOF  null",
        ),
        (
            "comments",
            "draw X // draw Y\nreturn // trailing",
            "DRAW draw null\nID X null\nRETURN return null\nEOF  null",
        ),
        (
            "unexpected_character",
            "@ x",
            "[line 1] Error: Unexpected character: @\nID x null\nEOF  null",
        ),
        (
            "lone_slash",
            "a / b",
            "ID a null\n[line 1] Error: Unexpected character: /\nID b null\nEOF  null",
        ),
        (
            "unterminated_string",
            "a\n\"oops",
            "ID a null\n[line 2] Error: Unterminated string.\nEOF  null",
        ),
    ];
    for (test_name, input, expected) in cases {
        check(input, expected, test_name);
    }
    Ok(())
}

#[test]
fn test_line_format() {
    check_lines(
        "cat A;\ndraw A;",
        "(1) CAT cat null\n(1) ID A null\n(1) SEMI ; null\n(2) DRAW draw null\n\
         (2) ID A null\n(2) SEMI ; null\n(2) EOF  null",
        "line_numbers",
    );
    check_lines(
        "x\n\n#",
        "(1) ID x null\n(3) ERROR UNEXPECTED_CHAR #\n(3) EOF  null",
        "line_error",
    );
}

#[test]
fn eof_is_repeated() {
    let mut scanner = Lexer::new("x");
    assert_eq!(scanner.next_token().map(|t| t.kind), Ok(TokenKind::Ident));
    for _ in 0..3 {
        assert_eq!(scanner.next_token().map(|t| t.kind), Ok(TokenKind::Eof));
    }
}

#[test]
fn iterator_stops_before_eof() {
    let kinds: Vec<TokenKind> = Lexer::new("draw Miso;")
        .map(|token| token.map(|t| t.kind))
        .collect::<Result<_, _>>()
        .expect("Valid input");
    assert_eq!(
        kinds,
        vec![TokenKind::KeywordDraw, TokenKind::Ident, TokenKind::Semicolon]
    );
}

// Property-based tests

fn symbol_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("(".to_string()),
        Just(")".to_string()),
        Just("{".to_string()),
        Just("}".to_string()),
        Just(",".to_string()),
        Just(".".to_string()),
        Just(";".to_string()),
        Just("!".to_string()),
        Just("!=".to_string()),
        Just("=".to_string()),
        Just("==".to_string()),
    ]
}

fn integer_literal_strategy() -> impl Strategy<Value = String> {
    "[0-9]{1,18}".prop_map(|s| s)
}

fn string_literal_strategy() -> impl Strategy<Value = String> {
    "[^\"]*".prop_map(|s: String| format!("\"{}\"", s))
}

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]*".prop_map(|s: String| s)
}

fn keyword_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("cat".to_string()),
        Just("draw".to_string()),
        Just("else".to_string()),
        Just("func".to_string()),
        Just("if".to_string()),
        Just("randomcat".to_string()),
        Just("return".to_string()),
        Just("while".to_string()),
    ]
}

fn comment_strategy() -> impl Strategy<Value = String> {
    "[^\n]*".prop_map(|s: String| format!("//{}\n", s))
}

fn token_sequence_with_comments_strategy() -> impl Strategy<Value = String> {
    const MIN_TOKEN_COUNT: usize = 1;
    const MAX_TOKEN_COUNT: usize = 100;
    prop::collection::vec(
        prop_oneof![
            symbol_strategy(),
            integer_literal_strategy(),
            string_literal_strategy(),
            identifier_strategy(),
            keyword_strategy(),
            comment_strategy(),
        ],
        MIN_TOKEN_COUNT..MAX_TOKEN_COUNT,
    )
    .prop_map(|tokens| tokens.join(" "))
}

fn token_sequence_without_comments_strategy() -> impl Strategy<Value = Vec<String>> {
    const MIN_TOKEN_COUNT: usize = 1;
    const MAX_TOKEN_COUNT: usize = 100;
    prop::collection::vec(
        prop_oneof![
            symbol_strategy(),
            integer_literal_strategy(),
            string_literal_strategy(),
            identifier_strategy(),
            keyword_strategy(),
        ],
        MIN_TOKEN_COUNT..MAX_TOKEN_COUNT,
    )
}

proptest! {
    #[test]
    fn lexer_handles_valid_tokens_without_comments(input in token_sequence_without_comments_strategy()) {
        // Add 1 to include EOF token
        let expected_num_tokens = input.len() + 1;
        let input = input.join(" ");
        let mut scanner = Lexer::new(&input);
        let mut num_tokens = 0;
        loop {
            num_tokens += 1;
            match scanner.next_token() {
                Ok(Token {kind: TokenKind::Eof, ..}) => {
                    break;
                },
                token => {
                    prop_assert!(token.is_ok());
                }
            }
        }
        prop_assert_eq!(num_tokens, expected_num_tokens);
    }

    #[test]
    fn lexer_handles_valid_tokens_with_comments(input in token_sequence_with_comments_strategy()) {
        let mut scanner = Lexer::new(&input);
        loop {
            match scanner.next_token() {
                Ok(Token {kind: TokenKind::Eof, ..}) => {
                    break;
                },
                token => {
                    prop_assert!(token.is_ok());
                }
            }
        }
    }

    #[test]
    fn lexer_spans_match_source(input in token_sequence_without_comments_strategy()) {
        let input = input.join(" ");
        let scanner = Lexer::new(&input);
        for token in Lexer::new(&input) {
            let token = token.expect("Only valid tokens are generated");
            let lexeme = scanner.get_lexeme(&token.span);
            prop_assert!(lexeme.is_some_and(|l| !l.is_empty() && !l.starts_with(' ')));
        }
    }

    #[test]
    fn lexer_terminates_on_any_input(input in any::<String>()) {
        let mut scanner = Lexer::new(&input);
        let mut steps = 0;
        while !matches!(scanner.next_token(), Ok(Token { kind: TokenKind::Eof, .. })) {
            steps += 1;
            prop_assert!(steps <= input.len());
        }
    }
}
