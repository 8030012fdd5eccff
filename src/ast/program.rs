use super::{Expr, Symbol, Test};
use std::fmt::Display;

/// A program: declared variable names plus the root statement.
/// Names need not be unique.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    pub names: Vec<Symbol>,
    pub root: Stmt,
}

/// A `(guard, body)` alternative of an `If` or `Do`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardedCommand {
    pub guard: Test,
    pub body: Stmt,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Stmt {
    Skip,
    Assign(Symbol, Expr),
    Compose(Box<Stmt>, Box<Stmt>),
    /// Runs one alternative whose guard holds, or nothing if none does
    If(Vec<GuardedCommand>),
    /// Repeats enabled alternatives until no guard holds
    Do(Vec<GuardedCommand>),
    /// Fresh variable, undefined until assigned
    Local(Symbol, Box<Stmt>),
}

impl Program {
    pub fn new(names: Vec<Symbol>, root: Stmt) -> Program {
        Program { names, root }
    }
}

impl GuardedCommand {
    pub fn new(guard: Test, body: Stmt) -> GuardedCommand {
        GuardedCommand { guard, body }
    }
}

impl From<(Test, Stmt)> for GuardedCommand {
    fn from((guard, body): (Test, Stmt)) -> Self {
        GuardedCommand { guard, body }
    }
}

impl Stmt {
    pub fn assign(target: Symbol, value: Expr) -> Stmt {
        Stmt::Assign(target, value)
    }

    pub fn compose(first: Stmt, second: Stmt) -> Stmt {
        Stmt::Compose(Box::new(first), Box::new(second))
    }

    pub fn if_<I, P>(alternatives: I) -> Stmt
    where
        I: IntoIterator<Item = P>,
        P: Into<GuardedCommand>,
    {
        Stmt::If(alternatives.into_iter().map(Into::into).collect())
    }

    pub fn do_<I, P>(alternatives: I) -> Stmt
    where
        I: IntoIterator<Item = P>,
        P: Into<GuardedCommand>,
    {
        Stmt::Do(alternatives.into_iter().map(Into::into).collect())
    }

    pub fn local(name: Symbol, body: Stmt) -> Stmt {
        Stmt::Local(name, Box::new(body))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Stmt::Skip => "skip",
            Stmt::Assign(_, _) => "assign",
            Stmt::Compose(_, _) => "compose",
            Stmt::If(_) => "if",
            Stmt::Do(_) => "do",
            Stmt::Local(_, _) => "local",
        }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::Skip => write!(f, "skip"),
            Stmt::Assign(id, expr) => write!(f, "{} := {}", id, expr),
            Stmt::Compose(first, second) => write!(f, "{}; {}", first, second),
            Stmt::If(alts) | Stmt::Do(alts) => {
                let (open, close) = match self {
                    Stmt::If(_) => ("if", "fi"),
                    _ => ("do", "od"),
                };
                let arms = alts
                    .iter()
                    .map(|alt| format!("{} -> {}", alt.guard, alt.body))
                    .collect::<Vec<String>>()
                    .join(" [] ");
                write!(f, "{} {} {}", open, arms, close)
            }
            Stmt::Local(id, body) => write!(f, "local {} in {{ {} }}", id, body),
        }
    }
}
