mod operator;
mod tree;

pub use operator::EqualityOperator;
pub use tree::{CallExpression, Expression, IdentifierExpression};
