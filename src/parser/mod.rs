pub mod error;
pub mod expression;
pub mod formatter;
pub mod statement;

use std::collections::VecDeque;

use crate::{
    lexer::{Lexer, Span, Token, TokenKind},
    string::Ident,
};
use error::{ParserError, ParserErrorKind};
use expression::{CallExpression, EqualityOperator, Expression, IdentifierExpression};
use statement::{
    AssignRandomCatStatement, AssignStatement, BlockStatement, CallStatement, CatDecl,
    CatDeclSimple, DrawStatement, FunctionDecl, IfStatement, RandomCatDecl, ReturnStatement,
    Statement, StatementList, Trait, TraitAssignStatement, WhileStatement,
};

const LEXEME_MSG: &str = "Lexed tokens always have a valid span.";

/// A whole parsed program: the top level statement list.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub body: StatementList,
}

impl Program {
    pub fn iter(&self) -> std::slice::Iter<'_, Statement> {
        self.body.iter()
    }
}

/// Cursor over the lexer with as much lookahead as the grammar asks for.
pub struct TokenStream<'src> {
    lexer: Lexer<'src>,
    lookahead: VecDeque<Token>,
    previous_end: usize,
}

impl<'src> TokenStream<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            lexer: Lexer::new(source),
            lookahead: VecDeque::new(),
            previous_end: 0,
        }
    }

    fn peek_nth(&mut self, n: usize) -> Result<Token, ParserError> {
        while self.lookahead.len() <= n {
            let token = self.lexer.next_token()?;
            self.lookahead.push_back(token);
        }
        Ok(self.lookahead[n])
    }

    /// The current token, without consuming it.
    pub fn peek(&mut self) -> Result<Token, ParserError> {
        self.peek_nth(0)
    }

    /// The token after the current one, without consuming anything.
    pub fn peek_second(&mut self) -> Result<Token, ParserError> {
        self.peek_nth(1)
    }

    pub fn next_token(&mut self) -> Result<Token, ParserError> {
        let token = match self.lookahead.pop_front() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        self.previous_end = token.span.end();
        Ok(token)
    }

    /// Consumes the current token if it has the expected kind; leaves it in place otherwise.
    pub fn expect(&mut self, expected: TokenKind) -> Result<Token, ParserError> {
        let token = self.peek()?;
        if token.kind != expected {
            Err(ParserError {
                kind: ParserErrorKind::UnexpectedToken {
                    actual: token.kind,
                    expected,
                },
                span: token.span,
            })
        } else {
            self.next_token()
        }
    }

    pub fn eat_if(&mut self, next: TokenKind) -> Result<Option<Token>, ParserError> {
        let token = self.peek()?;
        if token.kind != next {
            Ok(None)
        } else {
            self.next_token().map(Some)
        }
    }

    pub fn at_end(&mut self) -> Result<bool, ParserError> {
        Ok(matches!(self.peek()?.kind, TokenKind::Eof))
    }

    pub fn get_lexeme(&self, span: &Span) -> Option<&'src str> {
        self.lexer.get_lexeme(span)
    }

    /// Span from `start` up to the end of the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        Span::between(start.start, self.previous_end.max(start.end()))
    }
}

pub struct Parser<'src> {
    stream: TokenStream<'src>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            stream: TokenStream::new(source),
        }
    }

    /// Parses the whole input. Anything left after the statement list is an error.
    pub fn parse(&mut self) -> Result<Program, ParserError> {
        let body = self.parse_statement_list()?;
        if !self.stream.at_end()? {
            let token = self.stream.peek()?;
            return Err(ParserError {
                kind: ParserErrorKind::TrailingInput(token.kind),
                span: token.span,
            });
        }
        Ok(Program { body })
    }

    fn expect_ident(&mut self) -> Result<Ident, ParserError> {
        let token = self.stream.expect(TokenKind::Ident)?;
        let lexeme = self.stream.get_lexeme(&token.span).expect(LEXEME_MSG);
        Ok(Ident::new(lexeme, token.span))
    }

    /// Consumes an optional `;`.
    fn eat_terminator(&mut self) -> Result<(), ParserError> {
        let _ = self.stream.eat_if(TokenKind::Semicolon)?;
        Ok(())
    }
}

// Statements
impl<'src> Parser<'src> {
    fn parse_statement_list(&mut self) -> Result<StatementList, ParserError> {
        let mut statements = Vec::new();
        while self.stream.peek()?.kind.starts_statement() {
            statements.push(self.parse_statement()?);
        }
        Ok(StatementList { statements })
    }

    pub fn parse_statement(&mut self) -> Result<Statement, ParserError> {
        let first = self.stream.peek()?;
        log::trace!("Parsing statement starting with {}", first.kind);
        match first.kind {
            TokenKind::KeywordCat => self.parse_cat_declaration(first.span),
            TokenKind::KeywordFunc => self.parse_function_declaration(first.span),
            TokenKind::KeywordDraw => {
                let _ = self.stream.expect(TokenKind::KeywordDraw)?;
                let target = self.expect_ident()?;
                self.eat_terminator()?;
                Ok(Statement::Draw(DrawStatement {
                    target,
                    span: self.stream.span_from(first.span),
                }))
            }
            TokenKind::KeywordRandomCat => {
                let _ = self.stream.expect(TokenKind::KeywordRandomCat)?;
                let name = self.expect_ident()?;
                self.eat_terminator()?;
                Ok(Statement::RandomCatDecl(RandomCatDecl {
                    name,
                    span: self.stream.span_from(first.span),
                }))
            }
            TokenKind::Ident => self.parse_ident_statement(first.span),
            TokenKind::KeywordReturn => {
                let _ = self.stream.expect(TokenKind::KeywordReturn)?;
                let value = if self.stream.peek()?.kind.starts_expression() {
                    Some(self.parse_expression()?)
                } else {
                    None
                };
                self.eat_terminator()?;
                Ok(Statement::Return(ReturnStatement {
                    value,
                    span: self.stream.span_from(first.span),
                }))
            }
            TokenKind::KeywordWhile => {
                let _ = self.stream.expect(TokenKind::KeywordWhile)?;
                let condition = self.parse_condition()?;
                let body = self.parse_statement()?;
                Ok(Statement::While(WhileStatement {
                    condition,
                    body: Box::new(body),
                    span: self.stream.span_from(first.span),
                }))
            }
            TokenKind::KeywordIf => {
                let _ = self.stream.expect(TokenKind::KeywordIf)?;
                let condition = self.parse_condition()?;
                let success = self.parse_statement()?;
                let failure = match self.stream.eat_if(TokenKind::KeywordElse)? {
                    Some(_) => Some(Box::new(self.parse_statement()?)),
                    None => None,
                };
                Ok(Statement::If(IfStatement {
                    condition,
                    success: Box::new(success),
                    failure,
                    span: self.stream.span_from(first.span),
                }))
            }
            TokenKind::LeftBrace => {
                let _ = self.stream.expect(TokenKind::LeftBrace)?;
                let body = self.parse_statement_list()?;
                let _ = self.stream.expect(TokenKind::RightBrace)?;
                Ok(Statement::Block(BlockStatement {
                    body,
                    span: self.stream.span_from(first.span),
                }))
            }
            kind => Err(ParserError {
                kind: ParserErrorKind::InvalidStatement(kind),
                span: first.span,
            }),
        }
    }

    /// `( expression )` after `while` and `if`.
    fn parse_condition(&mut self) -> Result<Expression, ParserError> {
        let _ = self.stream.expect(TokenKind::LeftParenthesis)?;
        let condition = self.parse_expression()?;
        let _ = self.stream.expect(TokenKind::RightParenthesis)?;
        Ok(condition)
    }

    fn parse_cat_declaration(&mut self, start: Span) -> Result<Statement, ParserError> {
        let _ = self.stream.expect(TokenKind::KeywordCat)?;
        let name = self.expect_ident()?;

        let suffix = self.stream.peek()?;
        match suffix.kind {
            TokenKind::LeftBrace => {
                let _ = self.stream.expect(TokenKind::LeftBrace)?;
                let traits = self.parse_trait_list()?;
                let _ = self.stream.expect(TokenKind::RightBrace)?;
                Ok(Statement::CatDecl(CatDecl {
                    name,
                    traits,
                    span: self.stream.span_from(start),
                }))
            }
            TokenKind::Semicolon => {
                let _ = self.stream.expect(TokenKind::Semicolon)?;
                Ok(Statement::CatDeclSimple(CatDeclSimple {
                    name,
                    span: self.stream.span_from(start),
                }))
            }
            kind => Err(ParserError {
                kind: ParserErrorKind::InvalidCatSuffix(kind),
                span: suffix.span,
            }),
        }
    }

    fn parse_trait_list(&mut self) -> Result<Vec<Trait>, ParserError> {
        let first = self.stream.peek()?;
        if first.kind != TokenKind::Ident {
            return Err(ParserError {
                kind: ParserErrorKind::MissingTrait(first.kind),
                span: first.span,
            });
        }

        let mut traits = Vec::new();
        while self.stream.peek()?.kind == TokenKind::Ident {
            let name = self.expect_ident()?;
            let _ = self.stream.expect(TokenKind::Equal)?;
            let value = self.parse_expression()?;
            self.eat_terminator()?;
            traits.push(Trait { name, value });
        }
        Ok(traits)
    }

    fn parse_function_declaration(&mut self, start: Span) -> Result<Statement, ParserError> {
        let _ = self.stream.expect(TokenKind::KeywordFunc)?;
        let name = self.expect_ident()?;
        let _ = self.stream.expect(TokenKind::LeftParenthesis)?;

        let mut parameters = Vec::new();
        if self.stream.peek()?.kind == TokenKind::Ident {
            parameters.push(self.expect_ident()?);
            while self.stream.eat_if(TokenKind::Comma)?.is_some() {
                parameters.push(self.expect_ident()?);
            }
        }

        let _ = self.stream.expect(TokenKind::RightParenthesis)?;
        let body = self.parse_statement()?;
        Ok(Statement::FunctionDecl(FunctionDecl {
            name,
            parameters,
            body: Box::new(body),
            span: self.stream.span_from(start),
        }))
    }

    /// Trait assignment, randomcat assignment, call or plain assignment, chosen by what follows the name.
    fn parse_ident_statement(&mut self, start: Span) -> Result<Statement, ParserError> {
        let target = self.expect_ident()?;

        let suffix = self.stream.peek()?;
        let assigns_random_cat = suffix.kind == TokenKind::Equal
            && self.stream.peek_second()?.kind == TokenKind::KeywordRandomCat;
        let statement = match suffix.kind {
            TokenKind::Dot => {
                let _ = self.stream.expect(TokenKind::Dot)?;
                let trait_name = self.expect_ident()?;
                let _ = self.stream.expect(TokenKind::Equal)?;
                let value = self.parse_expression()?;
                self.eat_terminator()?;
                Statement::TraitAssign(TraitAssignStatement {
                    target,
                    trait_name,
                    value,
                    span: self.stream.span_from(start),
                })
            }
            TokenKind::Equal if assigns_random_cat => {
                let _ = self.stream.expect(TokenKind::Equal)?;
                let _ = self.stream.expect(TokenKind::KeywordRandomCat)?;
                self.eat_terminator()?;
                Statement::AssignRandomCat(AssignRandomCatStatement {
                    target,
                    span: self.stream.span_from(start),
                })
            }
            TokenKind::LeftParenthesis => {
                let arguments = self.parse_arguments()?;
                self.eat_terminator()?;
                Statement::Call(CallStatement {
                    callee: target,
                    arguments,
                    span: self.stream.span_from(start),
                })
            }
            TokenKind::Equal => {
                let _ = self.stream.expect(TokenKind::Equal)?;
                let value = self.parse_expression()?;
                self.eat_terminator()?;
                Statement::Assign(AssignStatement {
                    target,
                    value,
                    span: self.stream.span_from(start),
                })
            }
            kind => {
                return Err(ParserError {
                    kind: ParserErrorKind::InvalidIdentSuffix(kind),
                    span: suffix.span,
                })
            }
        };
        Ok(statement)
    }

    /// `( [expression (, expression)*] )`
    fn parse_arguments(&mut self) -> Result<Vec<Expression>, ParserError> {
        let _ = self.stream.expect(TokenKind::LeftParenthesis)?;
        let mut arguments = Vec::new();
        if self.stream.peek()?.kind.starts_expression() {
            arguments.push(self.parse_expression()?);
            while self.stream.eat_if(TokenKind::Comma)?.is_some() {
                arguments.push(self.parse_expression()?);
            }
        }
        let _ = self.stream.expect(TokenKind::RightParenthesis)?;
        Ok(arguments)
    }
}

// Expressions
impl<'src> Parser<'src> {
    pub fn parse_expression(&mut self) -> Result<Expression, ParserError> {
        let token = self.stream.peek()?;
        if !token.kind.starts_expression() {
            return Err(ParserError {
                kind: ParserErrorKind::NonExpression(token.kind),
                span: token.span,
            });
        }
        self.parse_equality()
    }

    /// Left associative chain of `==` and `!=`.
    fn parse_equality(&mut self) -> Result<Expression, ParserError> {
        let mut lhs = self.parse_primary()?;

        while matches!(
            self.stream.peek()?.kind,
            TokenKind::EqualEqual | TokenKind::BangEqual
        ) {
            let token = self.stream.next_token()?;
            let operator = EqualityOperator::try_from(token.kind).map_err(|kind| ParserError {
                kind: ParserErrorKind::UnknownOperator(kind),
                span: token.span,
            })?;
            let rhs = self.parse_primary()?;
            lhs = Expression::Equality {
                operator,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_primary(&mut self) -> Result<Expression, ParserError> {
        let token = self.stream.peek()?;
        match token.kind {
            TokenKind::IntegerLiteral => {
                let _ = self.stream.next_token()?;
                let lexeme = self.stream.get_lexeme(&token.span).expect(LEXEME_MSG);
                let value = lexeme.parse().map_err(|_| ParserError {
                    kind: ParserErrorKind::InvalidInteger,
                    span: token.span,
                })?;
                Ok(Expression::Integer {
                    value,
                    span: token.span,
                })
            }
            TokenKind::StringLiteral => {
                let _ = self.stream.next_token()?;
                let lexeme = self.stream.get_lexeme(&token.span).expect(LEXEME_MSG);
                let value = lexeme
                    .get(1..lexeme.len() - 1)
                    .expect("String literal tokens are at least length 2.");
                Ok(Expression::String {
                    value: value.into(),
                    span: token.span,
                })
            }
            TokenKind::Ident => {
                let name = self.expect_ident()?;
                match self.stream.peek()?.kind {
                    TokenKind::Dot => {
                        let _ = self.stream.expect(TokenKind::Dot)?;
                        let trait_name = self.expect_ident()?;
                        Ok(Expression::Identifier(IdentifierExpression {
                            name,
                            trait_name: Some(trait_name),
                        }))
                    }
                    TokenKind::LeftParenthesis => {
                        let arguments = self.parse_arguments()?;
                        Ok(Expression::Call(CallExpression {
                            span: self.stream.span_from(name.span),
                            callee: name,
                            arguments,
                        }))
                    }
                    _ => Ok(Expression::Identifier(IdentifierExpression {
                        name,
                        trait_name: None,
                    })),
                }
            }
            TokenKind::LeftParenthesis => {
                let _ = self.stream.expect(TokenKind::LeftParenthesis)?;
                let inner = self.parse_expression()?;
                let _ = self.stream.expect(TokenKind::RightParenthesis)?;
                Ok(inner)
            }
            TokenKind::Bang => {
                let _ = self.stream.expect(TokenKind::Bang)?;
                let operand = self.parse_primary()?;
                Ok(Expression::Not {
                    operand: Box::new(operand),
                    span: self.stream.span_from(token.span),
                })
            }
            kind => Err(ParserError {
                kind: ParserErrorKind::NonExpression(kind),
                span: token.span,
            }),
        }
    }
}
