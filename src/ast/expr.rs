use super::Symbol;
use crate::error::{BuildError, RuntimeError};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Lt,
    Gt,
}

/// Integer-valued expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Const(i64),
    Var(Symbol),
    /// LHS, RHS, Operator
    BinOp(Box<Expr>, Box<Expr>, ArithOp),
}

/// Boolean-valued test. Both operands of `And`/`Or` are always evaluated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Test {
    /// LHS, RHS, Operator
    Compare(Expr, Expr, CompareOp),
    And(Box<Test>, Box<Test>),
    Or(Box<Test>, Box<Test>),
    True,
    False,
}

impl ArithOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }

    /// Checked 64-bit arithmetic. Division rounds toward negative infinity.
    pub fn apply(&self, lhs: i64, rhs: i64) -> Result<i64, RuntimeError> {
        let overflow = || RuntimeError::Overflow {
            op: self.symbol(),
            lhs,
            rhs,
        };
        match self {
            ArithOp::Add => lhs.checked_add(rhs).ok_or_else(overflow),
            ArithOp::Sub => lhs.checked_sub(rhs).ok_or_else(overflow),
            ArithOp::Mul => lhs.checked_mul(rhs).ok_or_else(overflow),
            ArithOp::Div => {
                if rhs == 0 {
                    return Err(RuntimeError::DivisionByZero { lhs });
                }
                let quotient = lhs.checked_div(rhs).ok_or_else(overflow)?;
                if lhs % rhs != 0 && (lhs < 0) != (rhs < 0) {
                    Ok(quotient - 1)
                } else {
                    Ok(quotient)
                }
            }
        }
    }
}

impl CompareOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
        }
    }

    pub fn apply(&self, lhs: i64, rhs: i64) -> bool {
        match self {
            CompareOp::Eq => lhs == rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Gt => lhs > rhs,
        }
    }
}

impl FromStr for ArithOp {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "add" | "plus" | "+" => ArithOp::Add,
            "sub" | "minus" | "-" => ArithOp::Sub,
            "mul" | "times" | "*" => ArithOp::Mul,
            "div" | "/" => ArithOp::Div,
            name => {
                return Err(BuildError::UnknownOperator {
                    family: "arithmetic",
                    name: name.to_string(),
                })
            }
        })
    }
}

impl FromStr for CompareOp {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "eq" | "==" => CompareOp::Eq,
            "lt" | "less" | "<" => CompareOp::Lt,
            "gt" | "greater" | ">" => CompareOp::Gt,
            name => {
                return Err(BuildError::UnknownOperator {
                    family: "comparison",
                    name: name.to_string(),
                })
            }
        })
    }
}

impl Expr {
    pub fn constant(value: i64) -> Expr {
        Expr::Const(value)
    }

    pub fn var(name: Symbol) -> Expr {
        Expr::Var(name)
    }

    pub fn binop(lhs: Expr, rhs: Expr, op: ArithOp) -> Expr {
        Expr::BinOp(Box::new(lhs), Box::new(rhs), op)
    }
}

impl Test {
    pub fn compare(lhs: Expr, rhs: Expr, op: CompareOp) -> Test {
        Test::Compare(lhs, rhs, op)
    }

    pub fn and(lhs: Test, rhs: Test) -> Test {
        Test::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: Test, rhs: Test) -> Test {
        Test::Or(Box::new(lhs), Box::new(rhs))
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Const(n) => write!(f, "{}", n),
            Expr::Var(id) => write!(f, "{}", id),
            Expr::BinOp(lhs, rhs, op) => write!(f, "({} {} {})", op.symbol(), lhs, rhs),
        }
    }
}

impl Display for Test {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Test::Compare(lhs, rhs, op) => write!(f, "({} {} {})", op.symbol(), lhs, rhs),
            Test::And(lhs, rhs) => write!(f, "(and {} {})", lhs, rhs),
            Test::Or(lhs, rhs) => write!(f, "(or {} {})", lhs, rhs),
            Test::True => write!(f, "true"),
            Test::False => write!(f, "false"),
        }
    }
}
