use super::ast::{Expr, GuardedCommand, Program, Stmt, Symbol, Test};

/// Names visible at a point in the tree. Each `Local` links a new frame
/// onto its parent, so a binding never escapes the body that introduced it.
#[derive(Clone, Copy)]
enum Scope<'a> {
    Declared(&'a [Symbol]),
    Local(&'a Symbol, &'a Scope<'a>),
}

impl<'a> Scope<'a> {
    fn contains(&self, id: &Symbol) -> bool {
        match self {
            Scope::Declared(names) => names.contains(id),
            Scope::Local(name, parent) => *name == id || parent.contains(id),
        }
    }
}

/// Static well-scopedness check.
pub struct Resolver {
    unresolved: Vec<Symbol>,
}

impl Resolver {
    pub fn new() -> Resolver {
        Resolver {
            unresolved: Vec::new(),
        }
    }

    /// Every variable read or assignment target not covered by the
    /// declared names or an enclosing `Local`, in visit order.
    pub fn unresolved(mut self, program: &Program) -> Vec<Symbol> {
        self.resolve_stmt(&program.root, &Scope::Declared(&program.names));
        self.unresolved
    }

    pub fn well_scoped(program: &Program) -> bool {
        Resolver::new().unresolved(program).is_empty()
    }

    fn resolve_stmt(&mut self, stmt: &Stmt, scope: &Scope) {
        match stmt {
            Stmt::Skip => {}
            Stmt::Assign(id, expr) => {
                self.resolve_name(id, scope);
                self.resolve_expr(expr, scope);
            }
            Stmt::Compose(first, second) => {
                self.resolve_stmt(first, scope);
                self.resolve_stmt(second, scope);
            }
            Stmt::If(alts) | Stmt::Do(alts) => self.resolve_alternatives(alts, scope),
            Stmt::Local(id, body) => self.resolve_stmt(body, &Scope::Local(id, scope)),
        }
    }

    // alternatives see the incoming scope, never each other's locals
    fn resolve_alternatives(&mut self, alts: &[GuardedCommand], scope: &Scope) {
        for alt in alts {
            self.resolve_test(&alt.guard, scope);
            self.resolve_stmt(&alt.body, scope);
        }
    }

    fn resolve_test(&mut self, test: &Test, scope: &Scope) {
        match test {
            Test::Compare(lhs, rhs, _) => {
                self.resolve_expr(lhs, scope);
                self.resolve_expr(rhs, scope);
            }
            Test::And(lhs, rhs) | Test::Or(lhs, rhs) => {
                self.resolve_test(lhs, scope);
                self.resolve_test(rhs, scope);
            }
            Test::True | Test::False => {}
        }
    }

    fn resolve_expr(&mut self, expr: &Expr, scope: &Scope) {
        match expr {
            Expr::Const(_) => {}
            Expr::Var(id) => self.resolve_name(id, scope),
            Expr::BinOp(lhs, rhs, _) => {
                self.resolve_expr(lhs, scope);
                self.resolve_expr(rhs, scope);
            }
        }
    }

    fn resolve_name(&mut self, id: &Symbol, scope: &Scope) {
        if !scope.contains(id) {
            self.unresolved.push(id.clone());
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Resolver::new()
    }
}
