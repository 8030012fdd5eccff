//! Kind-checked construction from untyped terms.
//!
//! The typed constructors on [`Expr`], [`Test`] and [`Stmt`] cannot be
//! misused. Callers assembling trees from untyped data go through the
//! builders here instead: every argument is checked against the kind the
//! node expects and a [`BuildError::TypeMismatch`] is returned before any
//! node is produced.

use super::{ArithOp, CompareOp, Expr, GuardedCommand, Program, Stmt, Symbol, Test};
use crate::error::BuildError;

/// An untyped constructor argument.
#[derive(Clone, Debug, PartialEq)]
pub enum Term {
    Int(i64),
    Name(String),
    Expr(Expr),
    Test(Test),
    Stmt(Stmt),
    List(Vec<Term>),
}

impl Term {
    pub fn kind(&self) -> &'static str {
        match self {
            Term::Int(_) => "integer",
            Term::Name(_) => "symbol",
            Term::Expr(_) => "expression",
            Term::Test(_) => "test",
            Term::Stmt(_) => "statement",
            Term::List(_) => "list",
        }
    }

    fn mismatch(&self, expected: &'static str) -> BuildError {
        BuildError::TypeMismatch {
            expected,
            found: self.kind(),
        }
    }

    pub fn into_int(self) -> Result<i64, BuildError> {
        match self {
            Term::Int(n) => Ok(n),
            other => Err(other.mismatch("integer")),
        }
    }

    pub fn into_symbol(self) -> Result<Symbol, BuildError> {
        match self {
            Term::Name(name) => Symbol::new(&name),
            other => Err(other.mismatch("symbol")),
        }
    }

    pub fn into_expr(self) -> Result<Expr, BuildError> {
        match self {
            Term::Expr(expr) => Ok(expr),
            other => Err(other.mismatch("expression")),
        }
    }

    pub fn into_test(self) -> Result<Test, BuildError> {
        match self {
            Term::Test(test) => Ok(test),
            other => Err(other.mismatch("test")),
        }
    }

    pub fn into_stmt(self) -> Result<Stmt, BuildError> {
        match self {
            Term::Stmt(stmt) => Ok(stmt),
            other => Err(other.mismatch("statement")),
        }
    }

    pub fn into_list(self) -> Result<Vec<Term>, BuildError> {
        match self {
            Term::List(items) => Ok(items),
            other => Err(other.mismatch("list")),
        }
    }

    fn into_operator_name(self) -> Result<String, BuildError> {
        match self {
            Term::Name(name) => Ok(name),
            other => Err(other.mismatch("symbol")),
        }
    }

    /// A list of two-element `[test, statement]` lists.
    fn into_alternatives(self) -> Result<Vec<GuardedCommand>, BuildError> {
        self.into_list()?
            .into_iter()
            .map(|pair| {
                let pair = pair.into_list()?;
                let mismatch = |_: Vec<Term>| BuildError::TypeMismatch {
                    expected: "(test, statement) pair",
                    found: "list",
                };
                let [guard, body]: [Term; 2] = pair.try_into().map_err(mismatch)?;
                Ok(GuardedCommand::new(guard.into_test()?, body.into_stmt()?))
            })
            .collect()
    }
}

impl From<i64> for Term {
    fn from(n: i64) -> Self {
        Term::Int(n)
    }
}

impl From<&str> for Term {
    fn from(name: &str) -> Self {
        Term::Name(name.to_string())
    }
}

impl From<Expr> for Term {
    fn from(expr: Expr) -> Self {
        Term::Expr(expr)
    }
}

impl From<Test> for Term {
    fn from(test: Test) -> Self {
        Term::Test(test)
    }
}

impl From<Stmt> for Term {
    fn from(stmt: Stmt) -> Self {
        Term::Stmt(stmt)
    }
}

impl From<Vec<Term>> for Term {
    fn from(items: Vec<Term>) -> Self {
        Term::List(items)
    }
}

pub fn constant(value: Term) -> Result<Expr, BuildError> {
    Ok(Expr::constant(value.into_int()?))
}

pub fn var(name: Term) -> Result<Expr, BuildError> {
    Ok(Expr::var(name.into_symbol()?))
}

pub fn binop(lhs: Term, rhs: Term, op: Term) -> Result<Expr, BuildError> {
    let lhs = lhs.into_expr()?;
    let rhs = rhs.into_expr()?;
    let op: ArithOp = op.into_operator_name()?.parse()?;
    Ok(Expr::binop(lhs, rhs, op))
}

pub fn compare(lhs: Term, rhs: Term, op: Term) -> Result<Test, BuildError> {
    let lhs = lhs.into_expr()?;
    let rhs = rhs.into_expr()?;
    let op: CompareOp = op.into_operator_name()?.parse()?;
    Ok(Test::compare(lhs, rhs, op))
}

pub fn and(lhs: Term, rhs: Term) -> Result<Test, BuildError> {
    Ok(Test::and(lhs.into_test()?, rhs.into_test()?))
}

pub fn or(lhs: Term, rhs: Term) -> Result<Test, BuildError> {
    Ok(Test::or(lhs.into_test()?, rhs.into_test()?))
}

pub fn assign(target: Term, value: Term) -> Result<Stmt, BuildError> {
    Ok(Stmt::assign(target.into_symbol()?, value.into_expr()?))
}

pub fn compose(first: Term, second: Term) -> Result<Stmt, BuildError> {
    Ok(Stmt::compose(first.into_stmt()?, second.into_stmt()?))
}

pub fn if_(alternatives: Term) -> Result<Stmt, BuildError> {
    Ok(Stmt::If(alternatives.into_alternatives()?))
}

pub fn do_(alternatives: Term) -> Result<Stmt, BuildError> {
    Ok(Stmt::Do(alternatives.into_alternatives()?))
}

pub fn local(name: Term, body: Term) -> Result<Stmt, BuildError> {
    Ok(Stmt::local(name.into_symbol()?, body.into_stmt()?))
}

pub fn program(names: Term, root: Term) -> Result<Program, BuildError> {
    let names = names
        .into_list()?
        .into_iter()
        .map(Term::into_symbol)
        .collect::<Result<Vec<Symbol>, BuildError>>()?;
    Ok(Program::new(names, root.into_stmt()?))
}
