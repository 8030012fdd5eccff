use crate::ast::{ArithOp, CompareOp, Expr, GuardedCommand, Stmt, Symbol, Test};
use std::fmt::Display;

/// Operator tokens left on the control stack to combine results once
/// their operands have been evaluated.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Instr {
    Arith(ArithOp),
    Compare(CompareOp),
    And,
    Or,
    /// Pops a value and the target symbol below it
    Assign,
    /// Pops a guard; keeps the branch body or falls to the continuation
    If,
    /// Pops a guard; re-arms the loop around the body or drops it
    Do,
}

/// An item on the control stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Expr(Expr),
    Test(Test),
    Stmt(Stmt),
    Instr(Instr),
    /// Assignment target waiting under an `Assign` token
    Symbol(Symbol),
    /// Fair `Do` iteration: pops one guard result per alternative and runs
    /// one of the enabled bodies
    Select(Vec<GuardedCommand>),
}

impl From<Stmt> for Control {
    fn from(stmt: Stmt) -> Self {
        Control::Stmt(stmt)
    }
}

impl From<Expr> for Control {
    fn from(expr: Expr) -> Self {
        Control::Expr(expr)
    }
}

impl From<Test> for Control {
    fn from(test: Test) -> Self {
        Control::Test(test)
    }
}

impl From<Instr> for Control {
    fn from(instr: Instr) -> Self {
        Control::Instr(instr)
    }
}

impl Display for Instr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instr::Arith(ArithOp::Add) => write!(f, "OP_ADD"),
            Instr::Arith(ArithOp::Sub) => write!(f, "OP_SUBTRACT"),
            Instr::Arith(ArithOp::Mul) => write!(f, "OP_MULTIPLY"),
            Instr::Arith(ArithOp::Div) => write!(f, "OP_DIVIDE"),
            Instr::Compare(CompareOp::Eq) => write!(f, "OP_EQUAL"),
            Instr::Compare(CompareOp::Lt) => write!(f, "OP_LT"),
            Instr::Compare(CompareOp::Gt) => write!(f, "OP_GT"),
            Instr::And => write!(f, "OP_AND"),
            Instr::Or => write!(f, "OP_OR"),
            Instr::Assign => write!(f, "OP_ASSIGN"),
            Instr::If => write!(f, "OP_IF"),
            Instr::Do => write!(f, "OP_DO"),
        }
    }
}

impl Display for Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Control::Expr(expr) => write!(f, "{:<10} {}", "EXPR", expr),
            Control::Test(test) => write!(f, "{:<10} {}", "TEST", test),
            Control::Stmt(stmt) => write!(f, "{:<10} {}", "STMT", stmt),
            Control::Instr(instr) => write!(f, "{}", instr),
            Control::Symbol(id) => write!(f, "{:<10} {}", "SYM", id),
            Control::Select(alts) => write!(f, "{:<10} {}", "SELECT", alts.len()),
        }
    }
}
