// Uniform "pick one of N" capability used by the rollout agent
//
// Rollouts never reach for a global generator; they are handed a Chooser so
// tests and replays can substitute a deterministic one.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::rc::Rc;

/// Picks an index uniformly from `0..len`
pub trait Chooser {
    /// `len` is always non-zero
    fn choose_index(&mut self, len: usize) -> usize;
}

/// Picks one option, or `None` if there are no options
pub fn choose<'a, T>(chooser: &mut dyn Chooser, options: &'a [T]) -> Option<&'a T> {
    if options.is_empty() {
        return None;
    }
    options.get(chooser.choose_index(options.len()))
}

/// Chooser backed by any `rand` generator
#[derive(Debug, Clone)]
pub struct RandomChooser<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomChooser<R> {
    pub fn new(rng: R) -> Self {
        RandomChooser { rng }
    }
}

impl RandomChooser<StdRng> {
    /// Reproducible chooser for a given seed
    pub fn seeded(seed: u64) -> Self {
        RandomChooser::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Chooser for RandomChooser<R> {
    fn choose_index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// Seed the rollout chooser is reset to before `tick` of a game
pub fn tick_seed(game_seed: u64, tick: u32) -> u64 {
    game_seed
        .wrapping_add(1)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(tick as u64)
}

/// Seeded chooser whose generator can be reset through any clone of the handle
///
/// A game hands one clone to the agent and keeps another to reseed it before
/// every decision, so each tick's random stream depends only on its seed.
#[derive(Clone)]
pub struct SharedChooser {
    inner: Rc<RefCell<RandomChooser<StdRng>>>,
}

impl SharedChooser {
    pub fn seeded(seed: u64) -> Self {
        SharedChooser {
            inner: Rc::new(RefCell::new(RandomChooser::seeded(seed))),
        }
    }

    pub fn reseed(&self, seed: u64) {
        *self.inner.borrow_mut() = RandomChooser::seeded(seed);
    }
}

impl Chooser for SharedChooser {
    fn choose_index(&mut self, len: usize) -> usize {
        self.inner.borrow_mut().choose_index(len)
    }
}

/// Always picks the first option
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstChoice;

impl Chooser for FirstChoice {
    fn choose_index(&mut self, _len: usize) -> usize {
        0
    }
}
