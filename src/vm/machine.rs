use super::control::{Control, Instr};
use super::value::Value;
use crate::ast::{Expr, GuardedCommand, Program, Stmt, Symbol, Test};
use crate::choice::Chooser;
use crate::config::{DoStrategy, EvalConfig};
use crate::environment::Store;
use crate::error::RuntimeError;
use thiserror::Error;

/// Small-step evaluator over explicit control and result stacks.
///
/// Each [`Machine::step`] pops exactly one control item. Terms on the
/// control stack are unfolded into sub-terms and operator tokens; tokens
/// pop their operands off the result stack. The store is threaded through
/// by value and replaced on every assignment. A run can be paused after
/// any step and resumed later.
pub struct Machine<C: Chooser = Box<dyn Chooser>> {
    control: Vec<Control>,
    results: Vec<Value>,
    store: Store,
    chooser: C,
    do_strategy: DoStrategy,
    steps: u64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MachineError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("Step {step}: {stack} stack underflow.")]
    StackUnderflow { stack: &'static str, step: u64 },
    #[error("Step {step}: malformed control stack, expected {expected}, found {found}.")]
    MalformedControl {
        expected: &'static str,
        found: String,
        step: u64,
    },
    #[error("Step {step}: expected {expected} result, found {found}.")]
    ResultType {
        expected: &'static str,
        found: Value,
        step: u64,
    },
}

/// Outcome of a single transition.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    Continue,
    Halted,
}

impl Machine {
    pub fn new(
        control: Vec<Control>,
        results: Vec<Value>,
        store: Store,
        config: &EvalConfig,
    ) -> Machine {
        Machine::with_chooser(control, results, store, config.chooser(), config.do_strategy)
    }

    /// Loads the program's root statement with every declared name bound
    /// to undefined.
    pub fn load(program: &Program, config: &EvalConfig) -> Machine {
        Machine::new(
            vec![Control::Stmt(program.root.clone())],
            Vec::new(),
            Store::declared(&program.names),
            config,
        )
    }
}

impl<C: Chooser> Machine<C> {
    pub fn with_chooser(
        control: Vec<Control>,
        results: Vec<Value>,
        store: Store,
        chooser: C,
        do_strategy: DoStrategy,
    ) -> Machine<C> {
        Machine {
            control,
            results,
            store,
            chooser,
            do_strategy,
            steps: 0,
        }
    }

    pub fn control(&self) -> &[Control] {
        &self.control
    }

    pub fn results(&self) -> &[Value] {
        &self.results
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Transitions taken so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_halted(&self) -> bool {
        self.control.is_empty()
    }

    /// Steps until the control stack is empty and returns the final store.
    #[tracing::instrument(level = "debug", skip_all, fields(depth = self.control.len()))]
    pub fn run(mut self) -> Result<Store, MachineError> {
        while let Step::Continue = self.step()? {}
        tracing::debug!(steps = self.steps, "halted");
        Ok(self.store)
    }

    pub fn step(&mut self) -> Result<Step, MachineError> {
        let current = match self.control.pop() {
            Some(current) => current,
            None => return Ok(Step::Halted),
        };
        self.steps += 1;
        tracing::trace!(step = self.steps, depth = self.control.len(), "{}", current);
        match current {
            Control::Instr(instr) => self.apply(instr)?,
            Control::Expr(expr) => self.unfold_expr(expr)?,
            Control::Test(test) => self.unfold_test(test),
            Control::Stmt(stmt) => self.unfold_stmt(stmt),
            Control::Select(alts) => self.select(alts)?,
            Control::Symbol(id) => {
                return Err(MachineError::MalformedControl {
                    expected: "term or instruction",
                    found: Control::Symbol(id).to_string(),
                    step: self.steps,
                })
            }
        }
        Ok(if self.control.is_empty() {
            Step::Halted
        } else {
            Step::Continue
        })
    }

    fn unfold_expr(&mut self, expr: Expr) -> Result<(), MachineError> {
        match expr {
            Expr::Const(n) => self.results.push(Value::Int(n)),
            Expr::Var(id) => {
                let value = self.store.lookup(&id)?;
                self.results.push(Value::Int(value));
            }
            // rhs is on top, so it runs first and lhs ends up on top of results
            Expr::BinOp(lhs, rhs, op) => {
                self.control.push(Control::Instr(Instr::Arith(op)));
                self.control.push(Control::Expr(*lhs));
                self.control.push(Control::Expr(*rhs));
            }
        }
        Ok(())
    }

    fn unfold_test(&mut self, test: Test) {
        match test {
            Test::Compare(lhs, rhs, op) => {
                self.control.push(Control::Instr(Instr::Compare(op)));
                self.control.push(Control::Expr(lhs));
                self.control.push(Control::Expr(rhs));
            }
            Test::And(lhs, rhs) => {
                self.control.push(Control::Instr(Instr::And));
                self.control.push(Control::Test(*lhs));
                self.control.push(Control::Test(*rhs));
            }
            Test::Or(lhs, rhs) => {
                self.control.push(Control::Instr(Instr::Or));
                self.control.push(Control::Test(*lhs));
                self.control.push(Control::Test(*rhs));
            }
            Test::True => self.results.push(Value::Bool(true)),
            Test::False => self.results.push(Value::Bool(false)),
        }
    }

    fn unfold_stmt(&mut self, stmt: Stmt) {
        match stmt {
            Stmt::Skip => {}
            Stmt::Assign(id, expr) => {
                self.control.push(Control::Symbol(id));
                self.control.push(Control::Instr(Instr::Assign));
                self.control.push(Control::Expr(expr));
            }
            Stmt::Compose(first, second) => {
                self.control.push(Control::Stmt(*second));
                self.control.push(Control::Stmt(*first));
            }
            Stmt::If(alts) => self.unfold_if(alts),
            Stmt::Do(alts) => match self.do_strategy {
                DoStrategy::Exhaust => self.unfold_do(alts),
                DoStrategy::Fair => self.unfold_fair_do(alts),
            },
            Stmt::Local(id, body) => {
                self.store.bind(id);
                self.control.push(Control::Stmt(*body));
            }
        }
    }

    /// Picks one alternative as the head; the rest wait underneath as the
    /// continuation taken if the head's guard fails.
    fn unfold_if(&mut self, mut alts: Vec<GuardedCommand>) {
        if alts.is_empty() {
            return;
        }
        let pick = self.pick(alts.len());
        tracing::debug!(pick, of = alts.len(), "if: head");
        let head = alts.remove(pick);
        let rest = if alts.is_empty() {
            Stmt::Skip
        } else {
            Stmt::If(alts)
        };
        self.control.push(Control::Stmt(rest));
        self.control.push(Control::Stmt(head.body));
        self.control.push(Control::Instr(Instr::If));
        self.control.push(Control::Test(head.guard));
    }

    /// Seeds a guard/body cycle for every alternative at once. The first
    /// alternative in the drawn order ends up on top and runs first.
    fn unfold_do(&mut self, alts: Vec<GuardedCommand>) {
        let order = self.chooser.permutation(alts.len());
        tracing::debug!(?order, "do: alternative order");
        let mut alts: Vec<Option<GuardedCommand>> = alts.into_iter().map(Some).collect();
        for idx in order.into_iter().rev() {
            if let Some(alt) = alts[idx].take() {
                self.control.push(Control::Stmt(alt.body));
                self.control.push(Control::Test(alt.guard.clone()));
                self.control.push(Control::Instr(Instr::Do));
                self.control.push(Control::Test(alt.guard));
            }
        }
    }

    /// Queues every guard, first alternative on top, under a `Select`.
    fn unfold_fair_do(&mut self, alts: Vec<GuardedCommand>) {
        if alts.is_empty() {
            return;
        }
        let guards: Vec<Test> = alts.iter().map(|alt| alt.guard.clone()).collect();
        self.control.push(Control::Select(alts));
        for guard in guards.into_iter().rev() {
            self.control.push(Control::Test(guard));
        }
    }

    fn select(&mut self, alts: Vec<GuardedCommand>) -> Result<(), MachineError> {
        let mut guards = Vec::with_capacity(alts.len());
        for _ in 0..alts.len() {
            guards.push(self.pop_bool()?);
        }
        guards.reverse();
        let enabled: Vec<usize> = guards
            .iter()
            .enumerate()
            .filter_map(|(idx, holds)| if *holds { Some(idx) } else { None })
            .collect();
        if enabled.is_empty() {
            return Ok(());
        }
        let pick = enabled[self.pick(enabled.len())];
        tracing::debug!(pick, enabled = enabled.len(), "do: fair pick");
        let body = alts[pick].body.clone();
        self.control.push(Control::Stmt(Stmt::Do(alts)));
        self.control.push(Control::Stmt(body));
        Ok(())
    }

    fn apply(&mut self, instr: Instr) -> Result<(), MachineError> {
        match instr {
            Instr::Arith(op) => {
                let lhs = self.pop_int()?;
                let rhs = self.pop_int()?;
                self.results.push(Value::Int(op.apply(lhs, rhs)?));
            }
            Instr::Compare(op) => {
                let lhs = self.pop_int()?;
                let rhs = self.pop_int()?;
                self.results.push(Value::Bool(op.apply(lhs, rhs)));
            }
            Instr::And => {
                let lhs = self.pop_bool()?;
                let rhs = self.pop_bool()?;
                self.results.push(Value::Bool(lhs && rhs));
            }
            Instr::Or => {
                let lhs = self.pop_bool()?;
                let rhs = self.pop_bool()?;
                self.results.push(Value::Bool(lhs || rhs));
            }
            Instr::Assign => {
                let value = self.pop_int()?;
                let id = self.pop_symbol()?;
                self.store.assign(id, value);
            }
            Instr::If => {
                if self.pop_bool()? {
                    let body = self.pop_stmt()?;
                    // drop the remaining alternatives
                    self.pop_stmt()?;
                    self.control.push(Control::Stmt(body));
                } else {
                    self.pop_stmt()?;
                }
            }
            Instr::Do => {
                if self.pop_bool()? {
                    let guard = self.pop_test()?;
                    let body = self.pop_stmt()?;
                    self.control.push(Control::Stmt(Stmt::Do(vec![GuardedCommand::new(
                        guard,
                        body.clone(),
                    )])));
                    self.control.push(Control::Stmt(body));
                } else {
                    self.pop_test()?;
                    self.pop_stmt()?;
                }
            }
        }
        Ok(())
    }

    fn pick(&mut self, len: usize) -> usize {
        if len > 1 {
            self.chooser.choose(len)
        } else {
            0
        }
    }

    fn pop_result(&mut self) -> Result<Value, MachineError> {
        self.results.pop().ok_or(MachineError::StackUnderflow {
            stack: "result",
            step: self.steps,
        })
    }

    fn pop_int(&mut self) -> Result<i64, MachineError> {
        match self.pop_result()? {
            Value::Int(n) => Ok(n),
            found => Err(MachineError::ResultType {
                expected: "integer",
                found,
                step: self.steps,
            }),
        }
    }

    fn pop_bool(&mut self) -> Result<bool, MachineError> {
        match self.pop_result()? {
            Value::Bool(b) => Ok(b),
            found => Err(MachineError::ResultType {
                expected: "boolean",
                found,
                step: self.steps,
            }),
        }
    }

    fn pop_control(&mut self) -> Result<Control, MachineError> {
        self.control.pop().ok_or(MachineError::StackUnderflow {
            stack: "control",
            step: self.steps,
        })
    }

    fn malformed(&self, expected: &'static str, found: Control) -> MachineError {
        MachineError::MalformedControl {
            expected,
            found: found.to_string(),
            step: self.steps,
        }
    }

    fn pop_stmt(&mut self) -> Result<Stmt, MachineError> {
        match self.pop_control()? {
            Control::Stmt(stmt) => Ok(stmt),
            other => Err(self.malformed("statement", other)),
        }
    }

    fn pop_test(&mut self) -> Result<Test, MachineError> {
        match self.pop_control()? {
            Control::Test(test) => Ok(test),
            other => Err(self.malformed("test", other)),
        }
    }

    fn pop_symbol(&mut self) -> Result<Symbol, MachineError> {
        match self.pop_control()? {
            Control::Symbol(id) => Ok(id),
            other => Err(self.malformed("symbol", other)),
        }
    }
}
