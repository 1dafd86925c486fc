use super::{
    error::{ParserError, ParserErrorKind},
    expression::{CallExpression, Expression, IdentifierExpression},
    statement::{Statement, StatementList, Trait},
    Program,
};
use crate::lexer::{LexicalErrorKind, LineBreaks};
use ariadne::{Color, Label, Report, ReportKind, Source};
use std::fmt::Write;

const WRITE_FMT_MSG: &str = "Encountered an error while attempting to write format string to buffer.";
const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";
const INDENT: &str = "    ";

pub trait ProgramFormatter {
    fn format(&self, program: &Program) -> String;
}

pub struct DebugProgramFormatter;

impl ProgramFormatter for DebugProgramFormatter {
    fn format(&self, program: &Program) -> String {
        format!("{program:#?}")
    }
}

/// One s-expression per top level statement. Spans are left out so two trees
/// with the same shape print the same.
pub struct SExpressionFormatter;

impl SExpressionFormatter {
    pub fn format_expression(expr: &Expression) -> String {
        match expr {
            Expression::Identifier(IdentifierExpression { name, trait_name }) => match trait_name
            {
                Some(trait_name) => format!("{name}.{trait_name}"),
                None => format!("{name}"),
            },
            Expression::Integer { value, .. } => format!("{value}"),
            Expression::String { value, .. } => format!("\"{value}\""),
            Expression::Equality { operator, lhs, rhs } => format!(
                "({} {} {})",
                operator.symbol(),
                Self::format_expression(lhs),
                Self::format_expression(rhs)
            ),
            Expression::Not { operand, .. } => {
                format!("(! {})", Self::format_expression(operand))
            }
            Expression::Call(CallExpression {
                callee, arguments, ..
            }) => Self::format_call(callee.as_str(), arguments),
        }
    }

    fn format_call(callee: &str, arguments: &[Expression]) -> String {
        let mut buffer = format!("(call {callee}");
        for argument in arguments.iter() {
            buffer.push(' ');
            buffer.push_str(&Self::format_expression(argument));
        }
        buffer.push(')');
        buffer
    }

    fn format_list(head: &str, body: &StatementList) -> String {
        let mut buffer = format!("({head}");
        for stmt in body.iter() {
            buffer.push(' ');
            buffer.push_str(&Self::format_statement(stmt));
        }
        buffer.push(')');
        buffer
    }

    pub fn format_statement(statement: &Statement) -> String {
        match statement {
            Statement::CatDecl(decl) => {
                let mut buffer = format!("(cat {}", decl.name);
                for Trait { name, value } in decl.traits.iter() {
                    buffer
                        .write_fmt(format_args!(" ({name} {})", Self::format_expression(value)))
                        .expect(WRITE_FMT_MSG);
                }
                buffer.push(')');
                buffer
            }
            Statement::CatDeclSimple(decl) => format!("(cat {})", decl.name),
            Statement::FunctionDecl(decl) => {
                let parameters: Vec<&str> = decl.parameters.iter().map(|p| p.as_str()).collect();
                format!(
                    "(func {} ({}) {})",
                    decl.name,
                    parameters.join(" "),
                    Self::format_statement(&decl.body)
                )
            }
            Statement::RandomCatDecl(decl) => format!("(randomcat {})", decl.name),
            Statement::Assign(stmt) => format!(
                "(= {} {})",
                stmt.target,
                Self::format_expression(&stmt.value)
            ),
            Statement::TraitAssign(stmt) => format!(
                "(= {}.{} {})",
                stmt.target,
                stmt.trait_name,
                Self::format_expression(&stmt.value)
            ),
            Statement::AssignRandomCat(stmt) => format!("(= {} randomcat)", stmt.target),
            Statement::Call(stmt) => Self::format_call(stmt.callee.as_str(), &stmt.arguments),
            Statement::Draw(stmt) => format!("(draw {})", stmt.target),
            Statement::Return(stmt) => match stmt.value {
                Some(ref value) => format!("(return {})", Self::format_expression(value)),
                None => "(return nil)".into(),
            },
            Statement::While(stmt) => format!(
                "(while {} {})",
                Self::format_expression(&stmt.condition),
                Self::format_statement(&stmt.body)
            ),
            Statement::If(stmt) => {
                let condition = Self::format_expression(&stmt.condition);
                let success = Self::format_statement(&stmt.success);
                match stmt.failure {
                    Some(ref failure) => format!(
                        "(if {condition} {success} {})",
                        Self::format_statement(failure)
                    ),
                    None => format!("(if {condition} {success})"),
                }
            }
            Statement::Block(block) => Self::format_list("block", &block.body),
        }
    }
}

impl ProgramFormatter for SExpressionFormatter {
    fn format(&self, program: &Program) -> String {
        let lines: Vec<String> = program.iter().map(Self::format_statement).collect();
        lines.join("\n")
    }
}

/// Prints a tree back out as CADL source that parses to the same tree.
pub struct SourceFormatter;

impl SourceFormatter {
    pub fn format_expression(expr: &Expression) -> String {
        match expr {
            Expression::Equality { operator, lhs, rhs } => format!(
                "{} {} {}",
                Self::format_expression(lhs),
                operator.symbol(),
                Self::format_operand(rhs)
            ),
            Expression::Identifier(IdentifierExpression { name, trait_name }) => match trait_name
            {
                Some(trait_name) => format!("{name}.{trait_name}"),
                None => format!("{name}"),
            },
            Expression::Integer { value, .. } => format!("{value}"),
            Expression::String { value, .. } => format!("\"{value}\""),
            Expression::Not { operand, .. } => format!("!{}", Self::format_operand(operand)),
            Expression::Call(CallExpression {
                callee, arguments, ..
            }) => format!("{callee}({})", Self::format_arguments(arguments)),
        }
    }

    /// Operands of `!` and the right side of `==`/`!=` are primaries, so nested equalities need parentheses.
    fn format_operand(expr: &Expression) -> String {
        match expr {
            Expression::Equality { .. } => format!("({})", Self::format_expression(expr)),
            _ => Self::format_expression(expr),
        }
    }

    fn format_arguments(arguments: &[Expression]) -> String {
        let arguments: Vec<String> = arguments.iter().map(Self::format_expression).collect();
        arguments.join(", ")
    }

    fn format_block(buffer: &mut String, body: &StatementList, depth: usize) {
        buffer.push_str("{\n");
        for stmt in body.iter() {
            buffer.push_str(&INDENT.repeat(depth + 1));
            Self::format_statement(buffer, stmt, depth + 1);
            buffer.push('\n');
        }
        buffer.push_str(&INDENT.repeat(depth));
        buffer.push('}');
    }

    pub fn format_statement(buffer: &mut String, statement: &Statement, depth: usize) {
        match statement {
            Statement::CatDecl(decl) => {
                buffer
                    .write_fmt(format_args!("cat {} {{\n", decl.name))
                    .expect(WRITE_FMT_MSG);
                for Trait { name, value } in decl.traits.iter() {
                    buffer
                        .write_fmt(format_args!(
                            "{}{name} = {};\n",
                            INDENT.repeat(depth + 1),
                            Self::format_expression(value)
                        ))
                        .expect(WRITE_FMT_MSG);
                }
                buffer.push_str(&INDENT.repeat(depth));
                buffer.push('}');
            }
            Statement::CatDeclSimple(decl) => {
                buffer
                    .write_fmt(format_args!("cat {};", decl.name))
                    .expect(WRITE_FMT_MSG);
            }
            Statement::FunctionDecl(decl) => {
                let parameters: Vec<&str> = decl.parameters.iter().map(|p| p.as_str()).collect();
                buffer
                    .write_fmt(format_args!("func {}({}) ", decl.name, parameters.join(", ")))
                    .expect(WRITE_FMT_MSG);
                Self::format_statement(buffer, &decl.body, depth);
            }
            Statement::RandomCatDecl(decl) => {
                buffer
                    .write_fmt(format_args!("randomcat {};", decl.name))
                    .expect(WRITE_FMT_MSG);
            }
            Statement::Assign(stmt) => {
                buffer
                    .write_fmt(format_args!(
                        "{} = {};",
                        stmt.target,
                        Self::format_expression(&stmt.value)
                    ))
                    .expect(WRITE_FMT_MSG);
            }
            Statement::TraitAssign(stmt) => {
                buffer
                    .write_fmt(format_args!(
                        "{}.{} = {};",
                        stmt.target,
                        stmt.trait_name,
                        Self::format_expression(&stmt.value)
                    ))
                    .expect(WRITE_FMT_MSG);
            }
            Statement::AssignRandomCat(stmt) => {
                buffer
                    .write_fmt(format_args!("{} = randomcat;", stmt.target))
                    .expect(WRITE_FMT_MSG);
            }
            Statement::Call(stmt) => {
                buffer
                    .write_fmt(format_args!(
                        "{}({});",
                        stmt.callee,
                        Self::format_arguments(&stmt.arguments)
                    ))
                    .expect(WRITE_FMT_MSG);
            }
            Statement::Draw(stmt) => {
                buffer
                    .write_fmt(format_args!("draw {};", stmt.target))
                    .expect(WRITE_FMT_MSG);
            }
            Statement::Return(stmt) => match stmt.value {
                Some(ref value) => buffer
                    .write_fmt(format_args!("return {};", Self::format_expression(value)))
                    .expect(WRITE_FMT_MSG),
                None => buffer.push_str("return;"),
            },
            Statement::While(stmt) => {
                buffer
                    .write_fmt(format_args!(
                        "while ({}) ",
                        Self::format_expression(&stmt.condition)
                    ))
                    .expect(WRITE_FMT_MSG);
                Self::format_statement(buffer, &stmt.body, depth);
            }
            Statement::If(stmt) => {
                buffer
                    .write_fmt(format_args!(
                        "if ({}) ",
                        Self::format_expression(&stmt.condition)
                    ))
                    .expect(WRITE_FMT_MSG);
                Self::format_statement(buffer, &stmt.success, depth);
                if let Some(ref failure) = stmt.failure {
                    buffer.push_str(" else ");
                    Self::format_statement(buffer, failure, depth);
                }
            }
            Statement::Block(block) => Self::format_block(buffer, &block.body, depth),
        }
    }
}

impl ProgramFormatter for SourceFormatter {
    fn format(&self, program: &Program) -> String {
        let mut buffer = String::new();
        for stmt in program.iter() {
            Self::format_statement(&mut buffer, stmt, 0);
            buffer.push('\n');
        }
        buffer
    }
}

pub trait ParserErrorFormatter {
    fn format_error(&self, error: &ParserError) -> String;
}

pub struct DebugParserFormatter;

impl ParserErrorFormatter for DebugParserFormatter {
    fn format_error(&self, error: &ParserError) -> String {
        format!("{error:?}")
    }
}

/// `(line) [Syntax] message`
pub struct BasicParserFormatter {
    line_breaks: LineBreaks,
}

impl BasicParserFormatter {
    pub fn new(text: &str) -> Self {
        Self {
            line_breaks: LineBreaks::new(text),
        }
    }
}

impl ParserErrorFormatter for BasicParserFormatter {
    fn format_error(&self, error: &ParserError) -> String {
        let line = self.line_breaks.get_line_from_span(error.span);
        format!("({line}) [Syntax] {}", error.kind)
    }
}

pub struct PrettyParserFormatter<'src> {
    text: &'src str,
    path: &'src str,
}

impl<'src> PrettyParserFormatter<'src> {
    pub fn new(text: &'src str, path: &'src str) -> Self {
        Self { text, path }
    }

    fn label_message(kind: &ParserErrorKind) -> String {
        match kind {
            ParserErrorKind::UnexpectedToken { actual, expected } => {
                format!("Expected {expected} but got {actual}")
            }
            ParserErrorKind::InvalidStatement(kind) => format!("{kind} can't start a statement"),
            ParserErrorKind::NonExpression(kind) => format!("{kind} can't start an expression"),
            ParserErrorKind::InvalidCatSuffix(kind) => {
                format!("Expected `{{` or `;` here, not {kind}")
            }
            ParserErrorKind::MissingTrait(kind) => format!("Expected a trait name, not {kind}"),
            ParserErrorKind::InvalidIdentSuffix(kind) => {
                format!("Expected `.`, `=` or `(` here, not {kind}")
            }
            ParserErrorKind::TrailingInput(kind) => format!("Unexpected {kind} after program"),
            ParserErrorKind::InvalidInteger => "Too large for a 64 bit integer".into(),
            ParserErrorKind::UnknownOperator(kind) => format!("{kind} is not an operator"),
            ParserErrorKind::LexicalError(e) => match e.kind {
                LexicalErrorKind::Unrecognized(c) => format!("Unexpected character {c}"),
                LexicalErrorKind::UnclosedString => "String starts here".into(),
            },
        }
    }
}

impl<'src> ParserErrorFormatter for PrettyParserFormatter<'src> {
    fn format_error(&self, error: &ParserError) -> String {
        let path = self.path;
        let span = error.span;
        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, span.range()))
            .with_code(error.code())
            .with_message(format!("{}", error.kind))
            .with_label(
                Label::new((path, span.range()))
                    .with_message(Self::label_message(&error.kind))
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(self.text)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}
