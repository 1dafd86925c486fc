use std::collections::HashMap;

use thiserror::Error;

use super::{
    error::{RuntimeError, RuntimeErrorKind},
    value::CadlValue,
};
use crate::{lexer::Span, string::IdentName};

pub type Scope = HashMap<IdentName, CadlValue>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SymbolTableError {
    #[error("{0} was not declared")]
    Undeclared(IdentName),
    #[error("{0} already declared")]
    AlreadyDeclared(IdentName),
}

impl SymbolTableError {
    /// Attaches the location of the name that caused the error.
    pub fn at(self, span: Span) -> RuntimeError {
        let kind = match self {
            SymbolTableError::Undeclared(name) => RuntimeErrorKind::Undeclared(name),
            SymbolTableError::AlreadyDeclared(name) => RuntimeErrorKind::AlreadyDeclared(name),
        };
        RuntimeError { kind, span }
    }
}

/// Stack of scopes. The first scope is the global one and is never popped;
/// the last is the innermost.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new()],
        }
    }

    /// Drops every binding and leaves a single empty global scope.
    pub fn initialize(&mut self) {
        self.scopes.clear();
        self.scopes.push(Scope::new());
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
        log::trace!("Pushed scope, depth is now {}", self.depth());
    }

    /// Removes the innermost scope. The global scope stays, in which case `None` is returned.
    pub fn pop_scope(&mut self) -> Option<Scope> {
        if self.scopes.len() <= 1 {
            log::warn!("Attempted to pop the global scope");
            return None;
        }
        let scope = self.scopes.pop();
        log::trace!("Popped scope, depth is now {}", self.depth());
        scope
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn declare(&mut self, name: &str, value: CadlValue) -> Result<(), SymbolTableError> {
        let scope = self
            .scopes
            .last_mut()
            .expect("The global scope is never popped.");
        if scope.contains_key(name) {
            return Err(SymbolTableError::AlreadyDeclared(name.into()));
        }
        scope.insert(name.into(), value);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<CadlValue, SymbolTableError> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .cloned()
            .ok_or_else(|| SymbolTableError::Undeclared(name.into()))
    }

    /// Rebinds the innermost existing binding of `name`. Never creates a binding.
    pub fn update(&mut self, name: &str, value: CadlValue) -> Result<(), SymbolTableError> {
        match self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
        {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(SymbolTableError::Undeclared(name.into())),
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| scope.contains_key(name))
    }

    pub fn is_local(&self, name: &str) -> bool {
        self.scopes
            .last()
            .is_some_and(|scope| scope.contains_key(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_prefers_innermost_scope() {
        let mut table = SymbolTable::new();
        table.declare("x", CadlValue::Integer(1)).unwrap();
        table.push_scope();
        table.declare("x", CadlValue::Integer(2)).unwrap();
        assert_eq!(table.lookup("x").unwrap(), CadlValue::Integer(2));
        table.pop_scope();
        assert_eq!(table.lookup("x").unwrap(), CadlValue::Integer(1));
    }

    #[test]
    fn redeclaring_in_same_scope_fails() {
        let mut table = SymbolTable::new();
        table.declare("Miso", CadlValue::Integer(1)).unwrap();
        assert_eq!(
            table.declare("Miso", CadlValue::Integer(2)),
            Err(SymbolTableError::AlreadyDeclared("Miso".into()))
        );
    }

    #[test]
    fn shadowing_outer_scope_is_allowed() {
        let mut table = SymbolTable::new();
        table.declare("Miso", CadlValue::Integer(1)).unwrap();
        table.push_scope();
        assert!(table.declare("Miso", CadlValue::Integer(2)).is_ok());
        assert!(table.is_local("Miso"));
    }

    #[test]
    fn update_rebinds_innermost_existing_binding() {
        let mut table = SymbolTable::new();
        table.declare("x", CadlValue::Integer(1)).unwrap();
        table.push_scope();
        table.update("x", CadlValue::Integer(5)).unwrap();
        assert!(!table.is_local("x"));
        table.pop_scope();
        assert_eq!(table.lookup("x").unwrap(), CadlValue::Integer(5));
    }

    #[test]
    fn update_and_lookup_of_missing_name_fail() {
        let mut table = SymbolTable::new();
        assert_eq!(
            table.update("ghost", CadlValue::Integer(1)),
            Err(SymbolTableError::Undeclared("ghost".into()))
        );
        assert_eq!(
            table.lookup("ghost"),
            Err(SymbolTableError::Undeclared("ghost".into()))
        );
        assert!(!table.exists("ghost"));
    }

    #[test]
    fn global_scope_is_never_popped() {
        let mut table = SymbolTable::new();
        table.declare("x", CadlValue::Integer(1)).unwrap();
        assert!(table.pop_scope().is_none());
        assert_eq!(table.depth(), 1);
        assert!(table.exists("x"));
    }

    #[test]
    fn initialize_discards_everything() {
        let mut table = SymbolTable::new();
        table.declare("x", CadlValue::Integer(1)).unwrap();
        table.push_scope();
        table.initialize();
        assert_eq!(table.depth(), 1);
        assert!(!table.exists("x"));
    }
}
