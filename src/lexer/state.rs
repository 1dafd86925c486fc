use super::{
    cursor::SourceChar,
    token::{Span, Token, TokenKind, KEYWORD_HASHMAP},
    LexicalError, LexicalErrorKind,
};

pub enum LexerStateTransition {
    Stay,
    ChangeState(LexerState),
    ChangeStateAndEmit {
        new_state: LexerState,
        token_or_error: Result<Token, LexicalError>,
    },
    ChangeStateAndEmitAndPutBack {
        new_state: LexerState,
        token_or_error: Result<Token, LexicalError>,
        put_back: SourceChar,
    },
}

#[derive(Debug, Clone, Copy, Default)]
pub enum LexerState {
    #[default]
    Normal,
    Ident {
        start: usize,
    },
    Integer {
        start: usize,
    },
    String {
        start: usize,
    },
    /// Saw `=`, could become `==`.
    Equal {
        start: usize,
    },
    /// Saw `!`, could become `!=`.
    Bang {
        start: usize,
    },
    /// Saw `/`, only valid as the start of a comment.
    Slash {
        start: usize,
    },
    Comment,
}

impl LexerState {
    pub fn execute(&self, source: &str, next_char: &Option<SourceChar>) -> LexerStateTransition {
        match *self {
            LexerState::Normal => Self::execute_normal(source, next_char),
            LexerState::Ident { start } => Self::execute_word(source, next_char, start, true),
            LexerState::Integer { start } => Self::execute_word(source, next_char, start, false),
            LexerState::String { start } => Self::execute_string(source, next_char, start),
            LexerState::Equal { start } => Self::execute_operator(
                next_char,
                start,
                TokenKind::Equal,
                TokenKind::EqualEqual,
            ),
            LexerState::Bang { start } => Self::execute_operator(
                next_char,
                start,
                TokenKind::Bang,
                TokenKind::BangEqual,
            ),
            LexerState::Slash { start } => Self::execute_slash(next_char, start),
            LexerState::Comment => match next_char {
                Some(SourceChar { value: '\n', .. }) => {
                    LexerStateTransition::ChangeState(LexerState::Normal)
                }
                Some(_) => LexerStateTransition::Stay,
                None => LexerStateTransition::ChangeStateAndEmit {
                    new_state: LexerState::Normal,
                    token_or_error: Ok(eof(source)),
                },
            },
        }
    }

    fn execute_normal(source: &str, next_char: &Option<SourceChar>) -> LexerStateTransition {
        let Some(c) = *next_char else {
            return LexerStateTransition::ChangeStateAndEmit {
                new_state: LexerState::Normal,
                token_or_error: Ok(eof(source)),
            };
        };

        let start = c.offset;
        let just = move |kind: TokenKind| LexerStateTransition::ChangeStateAndEmit {
            new_state: LexerState::Normal,
            token_or_error: Ok(Token {
                kind,
                span: Span::new(start, 1),
            }),
        };

        match c.value {
            // Single character tokens
            '(' => just(TokenKind::LeftParenthesis),
            ')' => just(TokenKind::RightParenthesis),
            '{' => just(TokenKind::LeftBrace),
            '}' => just(TokenKind::RightBrace),
            ',' => just(TokenKind::Comma),
            '.' => just(TokenKind::Dot),
            ';' => just(TokenKind::Semicolon),
            // Possibly two character tokens
            '=' => LexerStateTransition::ChangeState(LexerState::Equal { start }),
            '!' => LexerStateTransition::ChangeState(LexerState::Bang { start }),
            '/' => LexerStateTransition::ChangeState(LexerState::Slash { start }),
            // Literals
            '"' => LexerStateTransition::ChangeState(LexerState::String { start }),
            '0'..='9' => LexerStateTransition::ChangeState(LexerState::Integer { start }),
            'a'..='z' | 'A'..='Z' | '_' => {
                LexerStateTransition::ChangeState(LexerState::Ident { start })
            }
            v if v.is_whitespace() => LexerStateTransition::Stay,
            v => LexerStateTransition::ChangeStateAndEmit {
                new_state: LexerState::Normal,
                token_or_error: Err(LexicalError {
                    kind: LexicalErrorKind::Unrecognized(v),
                    span: Span::new(start, v.len_utf8()),
                }),
            },
        }
    }

    /// Identifiers/keywords and integers both run until a character that can't continue them.
    fn execute_word(
        source: &str,
        next_char: &Option<SourceChar>,
        start: usize,
        is_ident: bool,
    ) -> LexerStateTransition {
        let continues = |c: char| {
            if is_ident {
                c.is_ascii_alphanumeric() || c == '_'
            } else {
                c.is_ascii_digit()
            }
        };

        let finish = |end: usize| {
            let span = Span::between(start, end);
            let kind = if is_ident {
                KEYWORD_HASHMAP
                    .get(&source[span.range()])
                    .copied()
                    .unwrap_or(TokenKind::Ident)
            } else {
                TokenKind::IntegerLiteral
            };
            Token { kind, span }
        };

        match *next_char {
            Some(c) if continues(c.value) => LexerStateTransition::Stay,
            Some(c) => LexerStateTransition::ChangeStateAndEmitAndPutBack {
                new_state: LexerState::Normal,
                token_or_error: Ok(finish(c.offset)),
                put_back: c,
            },
            None => LexerStateTransition::ChangeStateAndEmit {
                new_state: LexerState::Normal,
                token_or_error: Ok(finish(source.len())),
            },
        }
    }

    fn execute_string(
        source: &str,
        next_char: &Option<SourceChar>,
        start: usize,
    ) -> LexerStateTransition {
        match *next_char {
            Some(c) if c.value == '"' => LexerStateTransition::ChangeStateAndEmit {
                new_state: LexerState::Normal,
                token_or_error: Ok(Token {
                    kind: TokenKind::StringLiteral,
                    span: Span::between(start, c.next_offset()),
                }),
            },
            Some(_) => LexerStateTransition::Stay,
            None => LexerStateTransition::ChangeStateAndEmit {
                new_state: LexerState::Normal,
                token_or_error: Err(LexicalError {
                    kind: LexicalErrorKind::UnclosedString,
                    span: Span::between(start, source.len()),
                }),
            },
        }
    }

    fn execute_operator(
        next_char: &Option<SourceChar>,
        start: usize,
        single: TokenKind,
        double: TokenKind,
    ) -> LexerStateTransition {
        match *next_char {
            Some(c) if c.value == '=' => LexerStateTransition::ChangeStateAndEmit {
                new_state: LexerState::Normal,
                token_or_error: Ok(Token {
                    kind: double,
                    span: Span::new(start, 2),
                }),
            },
            Some(c) => LexerStateTransition::ChangeStateAndEmitAndPutBack {
                new_state: LexerState::Normal,
                token_or_error: Ok(Token {
                    kind: single,
                    span: Span::new(start, 1),
                }),
                put_back: c,
            },
            None => LexerStateTransition::ChangeStateAndEmit {
                new_state: LexerState::Normal,
                token_or_error: Ok(Token {
                    kind: single,
                    span: Span::new(start, 1),
                }),
            },
        }
    }

    fn execute_slash(next_char: &Option<SourceChar>, start: usize) -> LexerStateTransition {
        let error = Err(LexicalError {
            kind: LexicalErrorKind::Unrecognized('/'),
            span: Span::new(start, 1),
        });
        match *next_char {
            Some(c) if c.value == '/' => LexerStateTransition::ChangeState(LexerState::Comment),
            Some(c) => LexerStateTransition::ChangeStateAndEmitAndPutBack {
                new_state: LexerState::Normal,
                token_or_error: error,
                put_back: c,
            },
            None => LexerStateTransition::ChangeStateAndEmit {
                new_state: LexerState::Normal,
                token_or_error: error,
            },
        }
    }
}

fn eof(source: &str) -> Token {
    Token {
        kind: TokenKind::Eof,
        span: Span::new(source.len(), 0),
    }
}
