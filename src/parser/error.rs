use crate::lexer::{LexicalError, Span, TokenKind};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParserErrorKind {
    #[error("Expected {expected} but got token {actual}.")]
    UnexpectedToken {
        actual: TokenKind,
        expected: TokenKind,
    },
    #[error("Expected a statement but got {0}.")]
    InvalidStatement(TokenKind),
    #[error("Expected an expression but got {0}.")]
    NonExpression(TokenKind),
    #[error("Expected `{{` or `;` after a cat name but got {0}.")]
    InvalidCatSuffix(TokenKind),
    #[error("Expected at least one trait but got {0}.")]
    MissingTrait(TokenKind),
    #[error("Expected `.`, `=` or `(` after an identifier but got {0}.")]
    InvalidIdentSuffix(TokenKind),
    #[error("Expected end of input but got {0}.")]
    TrailingInput(TokenKind),
    #[error("Integer literal does not fit in 64 bits.")]
    InvalidInteger,
    #[error("Unknown binary operator {0}.")]
    UnknownOperator(TokenKind),
    #[error("Encountered a lexer error {0}.")]
    LexicalError(#[from] LexicalError),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("syntax error: {kind}")]
pub struct ParserError {
    #[source]
    pub kind: ParserErrorKind,
    pub span: Span,
}

impl ParserError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            ParserErrorKind::UnexpectedToken { .. } => "PA001",
            ParserErrorKind::InvalidStatement(_) => "PA002",
            ParserErrorKind::NonExpression(_) => "PA003",
            ParserErrorKind::InvalidCatSuffix(_) => "PA004",
            ParserErrorKind::MissingTrait(_) => "PA005",
            ParserErrorKind::InvalidIdentSuffix(_) => "PA006",
            ParserErrorKind::TrailingInput(_) => "PA007",
            ParserErrorKind::InvalidInteger => "PA008",
            ParserErrorKind::UnknownOperator(_) => "PA009",
            ParserErrorKind::LexicalError(ref e) => e.code(),
        }
    }
}

impl From<LexicalError> for ParserError {
    fn from(value: LexicalError) -> Self {
        Self {
            span: value.span,
            kind: ParserErrorKind::LexicalError(value),
        }
    }
}
