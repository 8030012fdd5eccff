use crate::ast::Symbol;
use thiserror::Error;

/// Raised when an AST node is built from arguments of the wrong kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Type mismatch: expected {expected}, found {found}.")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("Invalid variable name {name:?}.")]
    InvalidSymbol { name: String },
    #[error("Unknown {family} operator {name:?}.")]
    UnknownOperator { family: &'static str, name: String },
}

/// Faults shared by both evaluators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Division by zero: {lhs} / 0.")]
    DivisionByZero { lhs: i64 },
    #[error("Integer overflow in {lhs} {op} {rhs}.")]
    Overflow { op: &'static str, lhs: i64, rhs: i64 },
    #[error("Variable {id} is not bound in the store.")]
    UnboundVariable { id: Symbol },
    #[error("Variable {id} was read before it was assigned.")]
    Uninitialized { id: Symbol },
}
