use ariadne::{Color, Label, Report, ReportKind, Source};

use super::{
    error::{RuntimeError, RuntimeErrorKind},
    value::CadlValue,
    MAX_CALL_DEPTH,
};
use crate::lexer::LineBreaks;

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

pub trait ValueFormatter {
    fn format(&self, value: &CadlValue) -> String;
    fn format_error(&self, error: &RuntimeError) -> String;
}

pub struct DebugFormatter;

impl ValueFormatter for DebugFormatter {
    fn format(&self, value: &CadlValue) -> String {
        format!("{value:?}")
    }

    fn format_error(&self, error: &RuntimeError) -> String {
        format!("{error:?}")
    }
}

/// `(line) [Runtime] message`
pub struct BasicFormatter {
    line_breaks: LineBreaks,
}

impl BasicFormatter {
    pub fn new(text: &str) -> Self {
        Self {
            line_breaks: LineBreaks::new(text),
        }
    }
}

impl ValueFormatter for BasicFormatter {
    fn format(&self, value: &CadlValue) -> String {
        format!("{value}")
    }

    fn format_error(&self, error: &RuntimeError) -> String {
        let line = self.line_breaks.get_line_from_span(error.span);
        format!("({line}) [Runtime] {}", error.kind)
    }
}

pub struct PrettyFormatter<'src> {
    text: &'src str,
    path: &'src str,
}

impl<'src> PrettyFormatter<'src> {
    pub fn new(text: &'src str, path: &'src str) -> Self {
        Self { text, path }
    }

    fn label_message(kind: &RuntimeErrorKind) -> String {
        match kind {
            RuntimeErrorKind::Undeclared(_) => "Not declared in any enclosing scope".into(),
            RuntimeErrorKind::AlreadyDeclared(_) => "Already declared in this scope".into(),
            RuntimeErrorKind::TraitKeyMissing { cat, .. } => format!("Not a trait of {cat}"),
            RuntimeErrorKind::NotACat(_) => "Expected a cat".into(),
            RuntimeErrorKind::InvalidCallee(_) => "Expected a function".into(),
            RuntimeErrorKind::RecursionLimit(_) => {
                format!("Nested more than {MAX_CALL_DEPTH} calls deep")
            }
        }
    }
}

impl<'src> ValueFormatter for PrettyFormatter<'src> {
    fn format(&self, value: &CadlValue) -> String {
        format!("{value}")
    }

    fn format_error(&self, error: &RuntimeError) -> String {
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
