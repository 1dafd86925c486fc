use super::expression::Expression;
use crate::{lexer::Span, string::Ident};

#[derive(Debug, Clone, Default)]
pub struct StatementList {
    pub statements: Vec<Statement>,
}

impl StatementList {
    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.statements.iter()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum Statement {
    // Declarations
    CatDecl(CatDecl),
    CatDeclSimple(CatDeclSimple),
    FunctionDecl(FunctionDecl),
    RandomCatDecl(RandomCatDecl),
    // Identifier statements
    Assign(AssignStatement),
    TraitAssign(TraitAssignStatement),
    AssignRandomCat(AssignRandomCatStatement),
    Call(CallStatement),
    // Everything else
    Draw(DrawStatement),
    Return(ReturnStatement),
    While(WhileStatement),
    If(IfStatement),
    Block(BlockStatement),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::CatDecl(decl) => decl.span,
            Statement::CatDeclSimple(decl) => decl.span,
            Statement::FunctionDecl(decl) => decl.span,
            Statement::RandomCatDecl(decl) => decl.span,
            Statement::Assign(stmt) => stmt.span,
            Statement::TraitAssign(stmt) => stmt.span,
            Statement::AssignRandomCat(stmt) => stmt.span,
            Statement::Call(stmt) => stmt.span,
            Statement::Draw(stmt) => stmt.span,
            Statement::Return(stmt) => stmt.span,
            Statement::While(stmt) => stmt.span,
            Statement::If(stmt) => stmt.span,
            Statement::Block(stmt) => stmt.span,
        }
    }
}

/// `name = value` inside a cat body.
#[derive(Debug, Clone)]
pub struct Trait {
    pub name: Ident,
    pub value: Expression,
}

/// `cat Miso { ears = "pointy"; }`
#[derive(Debug, Clone)]
pub struct CatDecl {
    pub name: Ident,
    pub traits: Vec<Trait>,
    pub span: Span,
}

/// `cat Miso;`
#[derive(Debug, Clone)]
pub struct CatDeclSimple {
    pub name: Ident,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: Ident,
    pub parameters: Vec<Ident>,
    pub body: Box<Statement>,
    pub span: Span,
}

/// `randomcat Miso;`
#[derive(Debug, Clone)]
pub struct RandomCatDecl {
    pub name: Ident,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct AssignStatement {
    pub target: Ident,
    pub value: Expression,
    pub span: Span,
}

/// `Miso.mood = "happy";`
#[derive(Debug, Clone)]
pub struct TraitAssignStatement {
    pub target: Ident,
    pub trait_name: Ident,
    pub value: Expression,
    pub span: Span,
}

/// `Miso = randomcat;`
#[derive(Debug, Clone)]
pub struct AssignRandomCatStatement {
    pub target: Ident,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CallStatement {
    pub callee: Ident,
    pub arguments: Vec<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct DrawStatement {
    pub target: Ident,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStatement {
    pub value: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Box<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfStatement {
    pub condition: Expression,
    pub success: Box<Statement>,
    /// `None` when there is no `else`, which is different from an empty `else {}`.
    pub failure: Option<Box<Statement>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BlockStatement {
    pub body: StatementList,
    pub span: Span,
}
