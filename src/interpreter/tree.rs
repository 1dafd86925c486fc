use std::rc::Rc;

use rand::{rngs::StdRng, SeedableRng};

use super::{
    error::{RuntimeError, RuntimeErrorKind},
    mood::{apply_mood_override, MOOD_TRAIT},
    random::generate_random_traits,
    symbol_table::SymbolTable,
    value::{CadlValue, Cat, Function, Traits},
    ProgramState, SystemContext,
};
use crate::{
    parser::{
        expression::{CallExpression, Expression, IdentifierExpression},
        statement::{
            AssignRandomCatStatement, AssignStatement, BlockStatement, CallStatement, CatDecl,
            CatDeclSimple, DrawStatement, FunctionDecl, IfStatement, RandomCatDecl,
            ReturnStatement, Statement, StatementList, TraitAssignStatement, WhileStatement,
        },
        Program,
    },
    render::render_cat,
    string::Ident,
};

/// Deepest function call nesting before evaluation stops with an error.
pub const MAX_CALL_DEPTH: usize = 200;

pub struct TreeWalkInterpreter<C: SystemContext> {
    symbols: SymbolTable,
    context: C,
    interpreter: TreeWalkStatementInterpreter,
}

impl<C> TreeWalkInterpreter<C>
where
    C: SystemContext,
{
    pub fn new(context: C) -> Self {
        Self {
            symbols: SymbolTable::new(),
            context,
            interpreter: TreeWalkStatementInterpreter::create(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(context: C, seed: u64) -> Self {
        Self {
            symbols: SymbolTable::new(),
            context,
            interpreter: TreeWalkStatementInterpreter::create(StdRng::seed_from_u64(seed)),
        }
    }

    /// Runs every top-level statement. A top-level `return` stops the program early.
    pub fn run(&mut self, program: &Program) -> Result<ProgramState, RuntimeError> {
        let state = self.interpreter.interpret_statement_list(
            &mut self.symbols,
            &mut self.context,
            &program.body,
        )?;
        if let ProgramState::Return(ref value) = state {
            log::debug!("Program returned {value} at top level");
        }
        Ok(state)
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    /// Forgets every binding. Output already written stays in the context.
    pub fn reset(&mut self) {
        self.symbols.initialize();
    }
}

pub struct TreeWalkStatementInterpreter {
    rng: StdRng,
}

impl TreeWalkStatementInterpreter {
    fn create(rng: StdRng) -> Self {
        Self { rng }
    }

    fn interpret_statement_list<C: SystemContext>(
        &mut self,
        symbols: &mut SymbolTable,
        context: &mut C,
        list: &StatementList,
    ) -> Result<ProgramState, RuntimeError> {
        for stmt in list.iter() {
            match self.interpret_statement(symbols, context, stmt)? {
                ProgramState::Run => {}
                state @ ProgramState::Return(_) => return Ok(state),
            }
        }
        Ok(ProgramState::Run)
    }

    pub fn interpret_statement<C: SystemContext>(
        &mut self,
        symbols: &mut SymbolTable,
        context: &mut C,
        statement: &Statement,
    ) -> Result<ProgramState, RuntimeError> {
        match statement {
            Statement::CatDecl(decl) => self.interpret_cat_declaration(symbols, context, decl),
            Statement::CatDeclSimple(decl) => self.interpret_simple_cat_declaration(symbols, decl),
            Statement::FunctionDecl(decl) => self.interpret_function_declaration(symbols, decl),
            Statement::RandomCatDecl(decl) => {
                self.interpret_random_cat_declaration(symbols, decl)
            }
            Statement::Assign(stmt) => self.interpret_assign_statement(symbols, context, stmt),
            Statement::TraitAssign(stmt) => {
                self.interpret_trait_assign_statement(symbols, context, stmt)
            }
            Statement::AssignRandomCat(stmt) => {
                self.interpret_assign_random_cat_statement(symbols, stmt)
            }
            Statement::Call(stmt) => self.interpret_call_statement(symbols, context, stmt),
            Statement::Draw(stmt) => self.interpret_draw_statement(symbols, context, stmt),
            Statement::Return(stmt) => self.interpret_return_statement(symbols, context, stmt),
            Statement::While(stmt) => self.interpret_while_statement(symbols, context, stmt),
            Statement::If(stmt) => self.interpret_if_statement(symbols, context, stmt),
            Statement::Block(stmt) => self.interpret_block_statement(symbols, context, stmt),
        }
    }

    pub fn evaluate<C: SystemContext>(
        &mut self,
        symbols: &mut SymbolTable,
        context: &mut C,
        expr: &Expression,
    ) -> Result<CadlValue, RuntimeError> {
        match expr {
            Expression::Identifier(ident) => Self::evaluate_identifier(symbols, ident),
            Expression::Integer { value, .. } => Ok(CadlValue::Integer(*value)),
            Expression::String { value, .. } => Ok(CadlValue::String(value.clone())),
            Expression::Equality { operator, lhs, rhs } => {
                let lhs = self.evaluate(symbols, context, lhs)?;
                let rhs = self.evaluate(symbols, context, rhs)?;
                Ok(CadlValue::Bool(operator.apply(lhs.is_equal(&rhs))))
            }
            Expression::Not { operand, .. } => {
                let operand = self.evaluate(symbols, context, operand)?;
                Ok(CadlValue::Bool(operand.logical_not()))
            }
            Expression::Call(CallExpression {
                callee, arguments, ..
            }) => self.call_function(symbols, context, callee, arguments),
        }
    }
}

// Declarations
impl TreeWalkStatementInterpreter {
    fn interpret_cat_declaration<C: SystemContext>(
        &mut self,
        symbols: &mut SymbolTable,
        context: &mut C,
        decl: &CatDecl,
    ) -> Result<ProgramState, RuntimeError> {
        let mut traits = Traits::new();
        for item in decl.traits.iter() {
            let value = self.evaluate(symbols, context, &item.value)?;
            traits.insert(item.name.name.clone(), value);
        }
        symbols
            .declare(&decl.name.name, CadlValue::Cat(Cat::new(traits)))
            .map_err(|e| e.at(decl.name.span))?;
        Ok(ProgramState::Run)
    }

    fn interpret_simple_cat_declaration(
        &mut self,
        symbols: &mut SymbolTable,
        decl: &CatDeclSimple,
    ) -> Result<ProgramState, RuntimeError> {
        symbols
            .declare(&decl.name.name, CadlValue::Cat(Cat::empty()))
            .map_err(|e| e.at(decl.name.span))?;
        Ok(ProgramState::Run)
    }

    fn interpret_function_declaration(
        &mut self,
        symbols: &mut SymbolTable,
        decl: &FunctionDecl,
    ) -> Result<ProgramState, RuntimeError> {
        let function = Function {
            name: decl.name.clone(),
            parameters: decl.parameters.clone(),
            body: (*decl.body).clone(),
        };
        symbols
            .declare(&decl.name.name, CadlValue::Function(Rc::new(function)))
            .map_err(|e| e.at(decl.name.span))?;
        Ok(ProgramState::Run)
    }

    // The cat stays traitless until it is assigned `randomcat`.
    fn interpret_random_cat_declaration(
        &mut self,
        symbols: &mut SymbolTable,
        decl: &RandomCatDecl,
    ) -> Result<ProgramState, RuntimeError> {
        symbols
            .declare(&decl.name.name, CadlValue::Cat(Cat::empty()))
            .map_err(|e| e.at(decl.name.span))?;
        Ok(ProgramState::Run)
    }
}

// Identifier statements
impl TreeWalkStatementInterpreter {
    fn interpret_assign_statement<C: SystemContext>(
        &mut self,
        symbols: &mut SymbolTable,
        context: &mut C,
        stmt: &AssignStatement,
    ) -> Result<ProgramState, RuntimeError> {
        let value = self.evaluate(symbols, context, &stmt.value)?;
        symbols
            .update(&stmt.target.name, value)
            .map_err(|e| e.at(stmt.target.span))?;
        Ok(ProgramState::Run)
    }

    fn interpret_trait_assign_statement<C: SystemContext>(
        &mut self,
        symbols: &mut SymbolTable,
        context: &mut C,
        stmt: &TraitAssignStatement,
    ) -> Result<ProgramState, RuntimeError> {
        let cat = Self::lookup_cat(symbols, &stmt.target)?;
        let value = self.evaluate(symbols, context, &stmt.value)?;
        {
            let mut traits = cat.traits_mut();
            traits.insert(stmt.trait_name.name.clone(), value);
            if stmt.trait_name.as_str() == MOOD_TRAIT {
                if let Some(mood) = apply_mood_override(&mut traits) {
                    log::debug!("{} is now {mood}", stmt.target);
                }
            }
        }
        symbols
            .update(&stmt.target.name, CadlValue::Cat(cat))
            .map_err(|e| e.at(stmt.target.span))?;
        Ok(ProgramState::Run)
    }

    fn interpret_assign_random_cat_statement(
        &mut self,
        symbols: &mut SymbolTable,
        stmt: &AssignRandomCatStatement,
    ) -> Result<ProgramState, RuntimeError> {
        let traits = generate_random_traits(&mut self.rng);
        symbols
            .update(&stmt.target.name, CadlValue::Cat(Cat::new(traits)))
            .map_err(|e| e.at(stmt.target.span))?;
        Ok(ProgramState::Run)
    }

    fn interpret_call_statement<C: SystemContext>(
        &mut self,
        symbols: &mut SymbolTable,
        context: &mut C,
        stmt: &CallStatement,
    ) -> Result<ProgramState, RuntimeError> {
        let _ = self.call_function(symbols, context, &stmt.callee, &stmt.arguments)?;
        Ok(ProgramState::Run)
    }
}

// Everything else
impl TreeWalkStatementInterpreter {
    fn interpret_draw_statement<C: SystemContext>(
        &mut self,
        symbols: &mut SymbolTable,
        context: &mut C,
        stmt: &DrawStatement,
    ) -> Result<ProgramState, RuntimeError> {
        let cat = Self::lookup_cat(symbols, &stmt.target)?;
        let art = {
            let mut traits = cat.traits_mut();
            apply_mood_override(&mut traits);
            render_cat(&traits)
        };
        context.writeln(&art);
        Ok(ProgramState::Run)
    }

    fn interpret_return_statement<C: SystemContext>(
        &mut self,
        symbols: &mut SymbolTable,
        context: &mut C,
        stmt: &ReturnStatement,
    ) -> Result<ProgramState, RuntimeError> {
        let value = match stmt.value {
            Some(ref expr) => self.evaluate(symbols, context, expr)?,
            None => CadlValue::Nil,
        };
        Ok(ProgramState::Return(value))
    }

    fn interpret_while_statement<C: SystemContext>(
        &mut self,
        symbols: &mut SymbolTable,
        context: &mut C,
        stmt: &WhileStatement,
    ) -> Result<ProgramState, RuntimeError> {
        while self
            .evaluate(symbols, context, &stmt.condition)?
            .is_truthy()
        {
            match self.interpret_statement(symbols, context, &stmt.body)? {
                ProgramState::Run => {}
                state @ ProgramState::Return(_) => return Ok(state),
            }
        }
        Ok(ProgramState::Run)
    }

    fn interpret_if_statement<C: SystemContext>(
        &mut self,
        symbols: &mut SymbolTable,
        context: &mut C,
        stmt: &IfStatement,
    ) -> Result<ProgramState, RuntimeError> {
        if self
            .evaluate(symbols, context, &stmt.condition)?
            .is_truthy()
        {
            self.interpret_statement(symbols, context, &stmt.success)
        } else if let Some(ref failure) = stmt.failure {
            self.interpret_statement(symbols, context, failure)
        } else {
            Ok(ProgramState::Run)
        }
    }

    // Blocks group statements but do not open a scope.
    fn interpret_block_statement<C: SystemContext>(
        &mut self,
        symbols: &mut SymbolTable,
        context: &mut C,
        stmt: &BlockStatement,
    ) -> Result<ProgramState, RuntimeError> {
        self.interpret_statement_list(symbols, context, &stmt.body)
    }
}

// Expressions
impl TreeWalkStatementInterpreter {
    fn lookup(symbols: &SymbolTable, name: &Ident) -> Result<CadlValue, RuntimeError> {
        symbols.lookup(&name.name).map_err(|e| e.at(name.span))
    }

    fn lookup_cat(symbols: &SymbolTable, name: &Ident) -> Result<Cat, RuntimeError> {
        let value = Self::lookup(symbols, name)?;
        value.as_cat().cloned().ok_or_else(|| RuntimeError {
            kind: RuntimeErrorKind::NotACat(name.name.clone()),
            span: name.span,
        })
    }

    fn evaluate_identifier(
        symbols: &SymbolTable,
        ident: &IdentifierExpression,
    ) -> Result<CadlValue, RuntimeError> {
        let Some(ref trait_name) = ident.trait_name else {
            return Self::lookup(symbols, &ident.name);
        };
        let cat = Self::lookup_cat(symbols, &ident.name)?;
        let value = cat.get_trait(&trait_name.name);
        value.ok_or_else(|| RuntimeError {
            kind: RuntimeErrorKind::TraitKeyMissing {
                cat: ident.name.name.clone(),
                trait_name: trait_name.name.clone(),
            },
            span: trait_name.span,
        })
    }

    /// Calls `callee` in a fresh scope. Each argument is evaluated in that scope
    /// just before its parameter is declared, so later arguments see earlier
    /// parameters. Surplus arguments are ignored and missing ones leave their
    /// parameters unbound.
    fn call_function<C: SystemContext>(
        &mut self,
        symbols: &mut SymbolTable,
        context: &mut C,
        callee: &Ident,
        arguments: &[Expression],
    ) -> Result<CadlValue, RuntimeError> {
        let function = match Self::lookup(symbols, callee)? {
            CadlValue::Function(function) => function,
            _ => {
                return Err(RuntimeError {
                    kind: RuntimeErrorKind::InvalidCallee(callee.name.clone()),
                    span: callee.span,
                })
            }
        };
        if symbols.depth() > MAX_CALL_DEPTH {
            return Err(RuntimeError {
                kind: RuntimeErrorKind::RecursionLimit(function.name.name.clone()),
                span: callee.span,
            });
        }

        symbols.push_scope();
        log::debug!("Calling {} at depth {}", function.name, symbols.depth());
        let result = self.invoke(symbols, context, &function, arguments);
        symbols.pop_scope();
        result
    }

    fn invoke<C: SystemContext>(
        &mut self,
        symbols: &mut SymbolTable,
        context: &mut C,
        function: &Function,
        arguments: &[Expression],
    ) -> Result<CadlValue, RuntimeError> {
        for (parameter, argument) in function.parameters.iter().zip(arguments) {
            let value = self.evaluate(symbols, context, argument)?;
            symbols
                .declare(&parameter.name, value)
                .map_err(|e| e.at(parameter.span))?;
        }
        match self.interpret_statement(symbols, context, &function.body)? {
            ProgramState::Run => Ok(CadlValue::Nil),
            ProgramState::Return(value) => Ok(value),
        }
    }
}
