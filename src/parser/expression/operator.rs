use crate::lexer::TokenKind;

/// The only binary operators CADL has; both sit on the same precedence level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualityOperator {
    EqualEqual,
    BangEqual,
}

impl EqualityOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
        }
    }

    pub fn apply(&self, is_equal: bool) -> bool {
        match self {
            Self::EqualEqual => is_equal,
            Self::BangEqual => !is_equal,
        }
    }
}

impl TryFrom<TokenKind> for EqualityOperator {
    type Error = TokenKind;

    fn try_from(kind: TokenKind) -> Result<Self, Self::Error> {
        match kind {
            TokenKind::EqualEqual => Ok(Self::EqualEqual),
            TokenKind::BangEqual => Ok(Self::BangEqual),
            other => Err(other),
        }
    }
}
