use super::choice::{Chooser, RandomChooser};

/// How a `Do` picks the next alternative to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DoStrategy {
    /// Order the alternatives once, then run each one until its guard fails
    /// before moving on to the next.
    #[default]
    Exhaust,
    /// Before every iteration evaluate all guards and pick uniformly among
    /// the ones that hold.
    Fair,
}

/// Evaluation settings shared by both evaluators.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalConfig {
    /// Seed for choice order; `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub do_strategy: DoStrategy,
}

impl EvalConfig {
    pub fn new() -> EvalConfig {
        EvalConfig::default()
    }

    pub fn seed(mut self, seed: u64) -> EvalConfig {
        self.seed = Some(seed);
        self
    }

    pub fn do_strategy(mut self, strategy: DoStrategy) -> EvalConfig {
        self.do_strategy = strategy;
        self
    }

    pub fn chooser(&self) -> Box<dyn Chooser> {
        match self.seed {
            Some(seed) => Box::new(RandomChooser::seeded(seed)),
            None => Box::new(RandomChooser::from_entropy()),
        }
    }
}
