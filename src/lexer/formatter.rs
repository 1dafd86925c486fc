use super::{
    token::{Token, TokenKind},
    LineBreaks,
};
use crate::lexer::{Lexer, LexicalError, LexicalErrorKind};

/// Interface for creating new token formatters.
pub trait TokenFormatter {
    /// Formats a token into a string.
    fn format(&self, token: &Token) -> String;
    /// Formats a lexer error into a string.
    fn format_lexical_error(&self, error: &LexicalError) -> String;
}

pub trait ToFormatter<F>
where
    F: TokenFormatter,
{
    fn create_formatter(&self) -> F;
}

/// `KIND lexeme value` per token, in the style of a token dump.
pub struct BasicFormatter<'src> {
    text: &'src str,
    line_breaks: LineBreaks,
}

impl<'src> BasicFormatter<'src> {
    pub fn new(text: &'src str) -> Self {
        Self {
            text,
            line_breaks: LineBreaks::new(text),
        }
    }

    fn format_value(&self, token: &Token) -> String {
        let lexeme = &self.text[token.span.range()];
        match token.kind {
            TokenKind::Eof => "EOF  null".into(),
            TokenKind::IntegerLiteral => match lexeme.parse::<i64>() {
                Ok(value) => format!("INTEGER {lexeme} {value}"),
                Err(_) => format!("INTEGER {lexeme} overflow"),
            },
            TokenKind::StringLiteral => {
                let value = &lexeme[1..lexeme.len() - 1];
                format!("STRING {lexeme} {value}")
            }
            kind => format!("{kind} {lexeme} null"),
        }
    }
}

impl<'src> ToFormatter<BasicFormatter<'src>> for Lexer<'src> {
    fn create_formatter(&self) -> BasicFormatter<'src> {
        BasicFormatter {
            text: self.get_source(),
            line_breaks: self.get_line_breaks(),
        }
    }
}

impl<'src> TokenFormatter for BasicFormatter<'src> {
    fn format(&self, token: &Token) -> String {
        self.format_value(token)
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        let line = self.line_breaks.get_line_from_span(error.span);
        match error.kind {
            LexicalErrorKind::Unrecognized(c) => {
                format!("[line {line}] Error: Unexpected character: {c}")
            }
            LexicalErrorKind::UnclosedString => {
                format!("[line {line}] Error: Unterminated string.")
            }
        }
    }
}

/// Same as [`BasicFormatter`] but every token is prefixed by its line.
pub struct LineFormatter<'src> {
    inner: BasicFormatter<'src>,
}

impl<'src> LineFormatter<'src> {
    pub fn new(text: &'src str) -> Self {
        Self {
            inner: BasicFormatter::new(text),
        }
    }

    pub fn get_line_breaks(&self) -> &LineBreaks {
        &self.inner.line_breaks
    }
}

impl<'src> ToFormatter<LineFormatter<'src>> for Lexer<'src> {
    fn create_formatter(&self) -> LineFormatter<'src> {
        LineFormatter {
            inner: self.create_formatter(),
        }
    }
}

impl<'src> TokenFormatter for LineFormatter<'src> {
    fn format(&self, token: &Token) -> String {
        let line = self.inner.line_breaks.get_line_from_span(token.span);
        format!("({line}) {}", self.inner.format_value(token))
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        let line = self.inner.line_breaks.get_line_from_span(error.span);
        match error.kind {
            LexicalErrorKind::Unrecognized(c) => format!("({line}) ERROR UNEXPECTED_CHAR {c}"),
            LexicalErrorKind::UnclosedString => {
                format!("({line}) ERROR UNTERMINATED_STRING null")
            }
        }
    }
}

pub struct DebugFormatter;

impl<'src> ToFormatter<DebugFormatter> for Lexer<'src> {
    fn create_formatter(&self) -> DebugFormatter {
        DebugFormatter {}
    }
}

impl TokenFormatter for DebugFormatter {
    fn format(&self, token: &Token) -> String {
        format!("{token:?}")
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        format!("{error:?}")
    }
}
