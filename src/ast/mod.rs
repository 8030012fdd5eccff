pub mod expr;
pub mod program;
pub mod symbol;
pub mod term;

pub use expr::{ArithOp, CompareOp, Expr, Test};
pub use program::{GuardedCommand, Program, Stmt};
pub use symbol::Symbol;
pub use term::Term;
