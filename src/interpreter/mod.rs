pub mod context;
pub mod error;
pub mod formatter;
pub mod mood;
pub mod random;
pub mod symbol_table;
mod tree;
pub mod value;

pub use tree::{TreeWalkInterpreter, TreeWalkStatementInterpreter, MAX_CALL_DEPTH};
use value::CadlValue;

/// What the enclosing construct should do after a statement ran.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgramState {
    Run,
    Return(CadlValue),
}

pub trait SystemContext {
    fn writeln(&mut self, text: &str);
}

impl<C> SystemContext for &mut C
where
    C: SystemContext + ?Sized,
{
    fn writeln(&mut self, text: &str) {
        (**self).writeln(text);
    }
}
