use super::{
    ast::{Expr, GuardedCommand, Program, Stmt, Test},
    choice::Chooser,
    config::{DoStrategy, EvalConfig},
    environment::Store,
    error::RuntimeError,
};
use std::result::Result;

/// Big-step evaluator: each statement maps a store to the store after it.
pub struct Interpreter<C: Chooser = Box<dyn Chooser>> {
    chooser: C,
    do_strategy: DoStrategy,
}

impl Interpreter {
    pub fn new(config: &EvalConfig) -> Interpreter {
        Interpreter {
            chooser: config.chooser(),
            do_strategy: config.do_strategy,
        }
    }
}

impl<C: Chooser> Interpreter<C> {
    pub fn with_chooser(chooser: C, do_strategy: DoStrategy) -> Interpreter<C> {
        Interpreter {
            chooser,
            do_strategy,
        }
    }

    /// Runs the program from a fresh store with every declared name
    /// bound to undefined.
    #[tracing::instrument(level = "debug", skip_all, fields(names = program.names.len()))]
    pub fn interpret(&mut self, program: &Program) -> Result<Store, RuntimeError> {
        self.evaluate_statement(&program.root, Store::declared(&program.names))
    }

    pub fn evaluate_statement(&mut self, stmt: &Stmt, store: Store) -> Result<Store, RuntimeError> {
        tracing::trace!(kind = stmt.kind_name(), "statement");
        match stmt {
            Stmt::Skip => Ok(store),
            Stmt::Assign(id, expr) => {
                let value = self.evaluate_expr(expr, &store)?;
                Ok(store.with(id.clone(), value))
            }
            Stmt::Compose(first, second) => {
                let store = self.evaluate_statement(first, store)?;
                self.evaluate_statement(second, store)
            }
            Stmt::If(alts) => self.evaluate_if(alts, store),
            Stmt::Do(alts) => match self.do_strategy {
                DoStrategy::Exhaust => self.evaluate_do_exhaust(alts, store),
                DoStrategy::Fair => self.evaluate_do_fair(alts, store),
            },
            Stmt::Local(id, body) => {
                let mut store = store;
                store.bind(id.clone());
                self.evaluate_statement(body, store)
            }
        }
    }

    /// Tries the alternatives in a random order and runs the first one whose
    /// guard holds. Falls through as `Skip` when none does.
    fn evaluate_if(&mut self, alts: &[GuardedCommand], store: Store) -> Result<Store, RuntimeError> {
        let order = self.chooser.permutation(alts.len());
        tracing::debug!(?order, "if: alternative order");
        for idx in order {
            let alt = &alts[idx];
            if self.evaluate_test(&alt.guard, &store)? {
                return self.evaluate_statement(&alt.body, store);
            }
        }
        Ok(store)
    }

    fn evaluate_do_exhaust(
        &mut self,
        alts: &[GuardedCommand],
        store: Store,
    ) -> Result<Store, RuntimeError> {
        let order = self.chooser.permutation(alts.len());
        tracing::debug!(?order, "do: alternative order");
        let mut store = store;
        for idx in order {
            let alt = &alts[idx];
            while self.evaluate_test(&alt.guard, &store)? {
                store = self.evaluate_statement(&alt.body, store)?;
            }
        }
        Ok(store)
    }

    fn evaluate_do_fair(
        &mut self,
        alts: &[GuardedCommand],
        store: Store,
    ) -> Result<Store, RuntimeError> {
        let mut store = store;
        loop {
            let mut enabled = Vec::with_capacity(alts.len());
            for alt in alts {
                if self.evaluate_test(&alt.guard, &store)? {
                    enabled.push(alt);
                }
            }
            if enabled.is_empty() {
                return Ok(store);
            }
            let pick = match enabled.len() {
                1 => 0,
                len => self.chooser.choose(len),
            };
            tracing::debug!(pick, enabled = enabled.len(), "do: fair pick");
            store = self.evaluate_statement(&enabled[pick].body, store)?;
        }
    }

    pub fn evaluate_test(&self, test: &Test, store: &Store) -> Result<bool, RuntimeError> {
        // right operand first, matching the machine's fault order
        Ok(match test {
            Test::Compare(lhs, rhs, op) => {
                let rhs = self.evaluate_expr(rhs, store)?;
                let lhs = self.evaluate_expr(lhs, store)?;
                op.apply(lhs, rhs)
            }
            // no short circuit: both sides are evaluated so faults surface
            Test::And(lhs, rhs) => {
                let rhs = self.evaluate_test(rhs, store)?;
                let lhs = self.evaluate_test(lhs, store)?;
                lhs && rhs
            }
            Test::Or(lhs, rhs) => {
                let rhs = self.evaluate_test(rhs, store)?;
                let lhs = self.evaluate_test(lhs, store)?;
                lhs || rhs
            }
            Test::True => true,
            Test::False => false,
        })
    }

    pub fn evaluate_expr(&self, expr: &Expr, store: &Store) -> Result<i64, RuntimeError> {
        match expr {
            Expr::Const(n) => Ok(*n),
            Expr::Var(id) => store.lookup(id),
            Expr::BinOp(lhs, rhs, op) => {
                let rhs = self.evaluate_expr(rhs, store)?;
                let lhs = self.evaluate_expr(lhs, store)?;
                op.apply(lhs, rhs)
            }
        }
    }
}
