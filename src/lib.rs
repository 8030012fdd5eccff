//! Operational semantics for a small guarded-command language.
//!
//! Programs are built directly as abstract syntax ([`ast`]), optionally
//! checked for well-scopedness ([`well_scoped`]) and run by either of two
//! independent evaluators: the recursive big-step [`Interpreter`] or the
//! small-step stack [`Machine`]. Where the language leaves a choice open,
//! both ask a [`choice::Chooser`], so runs can be random, seeded or
//! exhaustively enumerated.

pub mod ast;
pub mod choice;
pub mod config;
pub mod environment;
pub mod error;
pub mod explore;
pub mod interpreter;
pub mod resolver;
pub mod vm;

#[cfg(test)]
mod properties;

pub use ast::{ArithOp, CompareOp, Expr, GuardedCommand, Program, Stmt, Symbol, Test};
pub use config::{DoStrategy, EvalConfig};
pub use environment::Store;
pub use error::{BuildError, RuntimeError};
pub use explore::outcomes;
pub use interpreter::Interpreter;
pub use resolver::Resolver;
pub use vm::{Control, Instr, Machine, MachineError, Value};

/// True iff every variable read and assignment target is covered by the
/// declared names or an enclosing `Local`.
pub fn well_scoped(program: &Program) -> bool {
    Resolver::well_scoped(program)
}

/// Runs the program with the big-step evaluator and random choice.
pub fn evaluate_big_step(program: &Program) -> Result<Store, RuntimeError> {
    evaluate_big_step_with(program, &EvalConfig::default())
}

pub fn evaluate_big_step_with(program: &Program, config: &EvalConfig) -> Result<Store, RuntimeError> {
    Interpreter::new(config).interpret(program)
}

/// Runs a bare statement against a caller-supplied store.
pub fn evaluate_statement(stmt: &Stmt, store: Store, config: &EvalConfig) -> Result<Store, RuntimeError> {
    Interpreter::new(config).evaluate_statement(stmt, store)
}

/// Runs the stack machine from the given stacks until the control stack
/// is empty. The top of each stack is the last element.
pub fn evaluate_stack_machine(
    control: Vec<Control>,
    results: Vec<Value>,
    store: Store,
) -> Result<Store, MachineError> {
    evaluate_stack_machine_with(control, results, store, &EvalConfig::default())
}

pub fn evaluate_stack_machine_with(
    control: Vec<Control>,
    results: Vec<Value>,
    store: Store,
    config: &EvalConfig,
) -> Result<Store, MachineError> {
    Machine::new(control, results, store, config).run()
}

/// Runs the program on the stack machine from the same initial store the
/// big-step evaluator uses.
pub fn run_stack_machine(program: &Program, config: &EvalConfig) -> Result<Store, MachineError> {
    Machine::load(program, config).run()
}
