mod span;

pub use span::Span;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::LazyLock;

/// The hashmap for keywords
pub static KEYWORD_HASHMAP: LazyLock<HashMap<&'static str, TokenKind>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    map.insert("cat", TokenKind::KeywordCat);
    map.insert("draw", TokenKind::KeywordDraw);
    map.insert("else", TokenKind::KeywordElse);
    map.insert("func", TokenKind::KeywordFunc);
    map.insert("if", TokenKind::KeywordIf);
    map.insert("randomcat", TokenKind::KeywordRandomCat);
    map.insert("return", TokenKind::KeywordReturn);
    map.insert("while", TokenKind::KeywordWhile);
    map
});

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Parentheses
    LeftParenthesis,
    RightParenthesis,
    // Braces
    LeftBrace,
    RightBrace,
    // Miscellaneous
    Comma,
    Dot,
    Semicolon,
    // Operators
    Bang,
    BangEqual,
    Equal,
    EqualEqual,

    // Literals
    IntegerLiteral,
    StringLiteral,
    Ident,

    // Keywords
    KeywordCat,
    KeywordDraw,
    KeywordElse,
    KeywordFunc,
    KeywordIf,
    KeywordRandomCat,
    KeywordReturn,
    KeywordWhile,

    // End of file.
    Eof,
}

impl TokenKind {
    /// Tokens that may start an expression.
    pub fn starts_expression(&self) -> bool {
        matches!(
            self,
            TokenKind::IntegerLiteral
                | TokenKind::Ident
                | TokenKind::StringLiteral
                | TokenKind::LeftParenthesis
                | TokenKind::Bang
        )
    }

    /// Tokens that may start a statement.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::KeywordCat
                | TokenKind::Ident
                | TokenKind::KeywordFunc
                | TokenKind::KeywordDraw
                | TokenKind::KeywordRandomCat
                | TokenKind::KeywordReturn
                | TokenKind::KeywordWhile
                | TokenKind::KeywordIf
                | TokenKind::LeftBrace
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::LeftParenthesis => write!(f, "LPAREN"),
            TokenKind::RightParenthesis => write!(f, "RPAREN"),
            TokenKind::LeftBrace => write!(f, "LCURLY"),
            TokenKind::RightBrace => write!(f, "RCURLY"),
            TokenKind::Comma => write!(f, "COMMA"),
            TokenKind::Dot => write!(f, "DOT"),
            TokenKind::Semicolon => write!(f, "SEMI"),
            TokenKind::Bang => write!(f, "NOT"),
            TokenKind::BangEqual => write!(f, "NOTEQ"),
            TokenKind::Equal => write!(f, "ASSIGN"),
            TokenKind::EqualEqual => write!(f, "EQ"),
            TokenKind::IntegerLiteral => write!(f, "INTEGER"),
            TokenKind::StringLiteral => write!(f, "STRING"),
            TokenKind::Ident => write!(f, "ID"),
            TokenKind::KeywordCat => write!(f, "CAT"),
            TokenKind::KeywordDraw => write!(f, "DRAW"),
            TokenKind::KeywordElse => write!(f, "ELSE"),
            TokenKind::KeywordFunc => write!(f, "FUNC"),
            TokenKind::KeywordIf => write!(f, "IF"),
            TokenKind::KeywordRandomCat => write!(f, "RANDOMCAT"),
            TokenKind::KeywordReturn => write!(f, "RETURN"),
            TokenKind::KeywordWhile => write!(f, "WHILE"),
            TokenKind::Eof => write!(f, "EOF"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}
