use thiserror::Error;

use crate::{lexer::Span, string::IdentName};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    #[error("{0} was not declared")]
    Undeclared(IdentName),
    #[error("{0} already declared")]
    AlreadyDeclared(IdentName),
    #[error("{cat} has no trait {trait_name}")]
    TraitKeyMissing {
        cat: IdentName,
        trait_name: IdentName,
    },
    #[error("{0} is not a cat")]
    NotACat(IdentName),
    #[error("{0} is not a function")]
    InvalidCallee(IdentName),
    #[error("maximum recursion depth exceeded calling {0}")]
    RecursionLimit(IdentName),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub span: Span,
}

impl RuntimeError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            RuntimeErrorKind::Undeclared(_) => "RT001",
            RuntimeErrorKind::AlreadyDeclared(_) => "RT002",
            RuntimeErrorKind::TraitKeyMissing { .. } => "RT003",
            RuntimeErrorKind::NotACat(_) => "RT004",
            RuntimeErrorKind::InvalidCallee(_) => "RT005",
            RuntimeErrorKind::RecursionLimit(_) => "RT006",
        }
    }
}
