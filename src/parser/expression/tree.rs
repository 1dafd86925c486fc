use compact_str::CompactString;

use super::EqualityOperator;
use crate::{lexer::Span, string::Ident};

/// `Miso` or `Miso.ears`.
#[derive(Debug, Clone)]
pub struct IdentifierExpression {
    pub name: Ident,
    pub trait_name: Option<Ident>,
}

#[derive(Debug, Clone)]
pub struct CallExpression {
    pub callee: Ident,
    pub arguments: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Expression {
    Identifier(IdentifierExpression),
    Integer {
        value: i64,
        span: Span,
    },
    String {
        value: CompactString,
        span: Span,
    },
    Equality {
        operator: EqualityOperator,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    Not {
        operand: Box<Expression>,
        span: Span,
    },
    Call(CallExpression),
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Identifier(IdentifierExpression { name, trait_name }) => match trait_name {
                Some(trait_name) => name.span.merge(&trait_name.span),
                None => name.span,
            },
            Expression::Integer { span, .. } => *span,
            Expression::String { span, .. } => *span,
            Expression::Equality { lhs, rhs, .. } => lhs.span().merge(&rhs.span()),
            Expression::Not { span, .. } => *span,
            Expression::Call(call) => call.span,
        }
    }
}
