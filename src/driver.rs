//! Entry points that take CADL source all the way to output.

use thiserror::Error;

use crate::{
    interpreter::{error::RuntimeError, ProgramState, SystemContext, TreeWalkInterpreter},
    parser::{
        error::ParserError,
        formatter::{ProgramFormatter, SExpressionFormatter},
        Parser, Program,
    },
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CadlError {
    #[error(transparent)]
    Parser(#[from] ParserError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl CadlError {
    pub fn code(&self) -> &'static str {
        match self {
            CadlError::Parser(e) => e.code(),
            CadlError::Runtime(e) => e.code(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InterpretOptions {
    /// Write the syntax tree instead of running the program.
    pub dump: bool,
    /// Return errors to the caller instead of writing them to the context.
    pub propagate_errors: bool,
    /// Seed for `randomcat`. Without one every run is different.
    pub seed: Option<u64>,
}

pub fn parse(source: &str) -> Result<Program, ParserError> {
    Parser::new(source).parse()
}

fn create_interpreter<C: SystemContext>(context: C, seed: Option<u64>) -> TreeWalkInterpreter<C> {
    match seed {
        Some(seed) => TreeWalkInterpreter::with_seed(context, seed),
        None => TreeWalkInterpreter::new(context),
    }
}

fn run_source<C: SystemContext>(
    source: &str,
    options: &InterpretOptions,
    context: &mut C,
) -> Result<(), CadlError> {
    let program = parse(source)?;
    if options.dump {
        context.writeln(&SExpressionFormatter.format(&program));
        return Ok(());
    }
    let mut interpreter = create_interpreter(&mut *context, options.seed);
    interpreter.run(&program)?;
    Ok(())
}

/// Parses and runs `source` against a fresh symbol table.
pub fn interpret<C: SystemContext>(
    source: &str,
    options: &InterpretOptions,
    context: &mut C,
) -> Result<(), CadlError> {
    match run_source(source, options, context) {
        Err(error) if !options.propagate_errors => {
            log::debug!("Reporting {} as output", error.code());
            context.writeln(&format!("error: {error}"));
            Ok(())
        }
        result => result,
    }
}

/// An interpreter whose bindings outlive a single input.
pub struct Session<C: SystemContext> {
    interpreter: TreeWalkInterpreter<C>,
}

impl<C: SystemContext> Session<C> {
    pub fn new(context: C, seed: Option<u64>) -> Self {
        Self {
            interpreter: create_interpreter(context, seed),
        }
    }

    /// Runs one input. Bindings made before a failing statement are kept.
    pub fn eval(&mut self, source: &str) -> Result<ProgramState, CadlError> {
        let program = parse(source)?;
        Ok(self.interpreter.run(&program)?)
    }

    pub fn reset(&mut self) {
        self.interpreter.reset();
    }

    pub fn depth(&self) -> usize {
        self.interpreter.symbols().depth()
    }

    pub fn context(&self) -> &C {
        self.interpreter.context()
    }

    pub fn into_context(self) -> C {
        self.interpreter.into_context()
    }
}
