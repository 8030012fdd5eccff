//! Strategies for resolving nondeterministic choice.
//!
//! Both evaluators ask a [`Chooser`] whenever the language leaves a choice
//! open: which alternative of an `If` to try first, in what order to run
//! the alternatives of a `Do`. Swapping the chooser turns a random run into
//! a reproducible or exhaustive one.

use rand::{rngs::StdRng, Rng, SeedableRng};

pub trait Chooser {
    /// Picks an index in `0..len`. Never called with `len == 0`.
    fn choose(&mut self, len: usize) -> usize;

    /// An ordering of `0..len`, drawn one position at a time. The last
    /// position is forced and is not asked for.
    fn permutation(&mut self, len: usize) -> Vec<usize> {
        let mut remaining: Vec<usize> = (0..len).collect();
        let mut order = Vec::with_capacity(len);
        while remaining.len() > 1 {
            let pick = self.choose(remaining.len());
            order.push(remaining.remove(pick));
        }
        order.extend(remaining);
        order
    }
}

impl<C: Chooser + ?Sized> Chooser for Box<C> {
    fn choose(&mut self, len: usize) -> usize {
        (**self).choose(len)
    }

    fn permutation(&mut self, len: usize) -> Vec<usize> {
        (**self).permutation(len)
    }
}

impl<C: Chooser + ?Sized> Chooser for &mut C {
    fn choose(&mut self, len: usize) -> usize {
        (**self).choose(len)
    }

    fn permutation(&mut self, len: usize) -> Vec<usize> {
        (**self).permutation(len)
    }
}

/// Uniform random choice.
pub struct RandomChooser {
    rng: StdRng,
}

impl RandomChooser {
    pub fn seeded(seed: u64) -> RandomChooser {
        RandomChooser {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> RandomChooser {
        RandomChooser {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Chooser for RandomChooser {
    fn choose(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Always takes the first option, so alternatives run in source order.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstChooser;

impl Chooser for FirstChooser {
    fn choose(&mut self, _len: usize) -> usize {
        0
    }
}

/// Replays a fixed prefix of picks, then takes the first option.
/// Records how many options each choice point offered.
#[derive(Debug, Default, Clone)]
pub struct ScriptedChooser {
    script: Vec<usize>,
    offered: Vec<usize>,
}

impl ScriptedChooser {
    pub fn new(script: Vec<usize>) -> ScriptedChooser {
        ScriptedChooser {
            script,
            offered: Vec::new(),
        }
    }

    /// The picks actually made, in order.
    pub fn trace(&self) -> Vec<usize> {
        (0..self.offered.len())
            .map(|i| self.script.get(i).copied().unwrap_or(0))
            .collect()
    }

    /// The next script in lexicographic order after this run, or `None`
    /// once every combination of picks has been tried.
    pub fn next_script(&self) -> Option<Vec<usize>> {
        let mut picks = self.trace();
        while let Some(last) = picks.pop() {
            let len = self.offered[picks.len()];
            if last + 1 < len {
                picks.push(last + 1);
                return Some(picks);
            }
        }
        None
    }
}

impl Chooser for ScriptedChooser {
    fn choose(&mut self, len: usize) -> usize {
        let idx = self.offered.len();
        self.offered.push(len);
        match self.script.get(idx) {
            Some(&pick) if pick < len => pick,
            Some(_) => {
                // out-of-range pick: clamp so the trace stays replayable
                self.script[idx] = len - 1;
                len - 1
            }
            None => 0,
        }
    }
}
