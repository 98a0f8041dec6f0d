//! Deterministic randomness: shuffles and dice.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical deals and rolls
//! - **Context streams**: Shuffling and dice draw from independent streams
//! - **Serializable**: O(1) state capture and restore
//! - **Pluggable dice**: the resolver only sees the `Dice` trait, so tests and
//!   replays can script exact roll sequences with `LoadedDice`
//!
//! ```
//! use magnate::core::{Dice, GameRng};
//!
//! let mut rng = GameRng::new(42);
//! let mut dice = rng.for_context("dice");
//!
//! let roll = dice.roll(10);
//! assert!((1..=10).contains(&roll));
//! ```

use std::collections::VecDeque;
use std::hash::{Hash, Hasher};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Source of die rolls.
///
/// The only randomness contract the rules need: an integer in `[1, sides]`.
pub trait Dice {
    /// Roll a die with `sides` faces, returning a value in `1..=sides`.
    fn roll(&mut self, sides: u8) -> u8;
}

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Fork this RNG into an independent, deterministic branch.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self.seed.wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }

    /// Create an independent stream for a named purpose ("deal", "dice").
    ///
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        let context_seed = hasher.finish();

        Self {
            inner: ChaCha8Rng::seed_from_u64(context_seed),
            seed: context_seed,
            fork_counter: 0,
        }
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

impl Dice for GameRng {
    fn roll(&mut self, sides: u8) -> u8 {
        self.inner.gen_range(1..=sides.max(1))
    }
}

/// Serializable RNG state for checkpointing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
    /// Fork counter for deterministic branching
    pub fork_counter: u64,
}

/// Dice that replay a scripted sequence, then fall back to a seeded RNG.
///
/// Scripted values are clamped into `1..=sides`.
///
/// ```
/// use magnate::core::{Dice, LoadedDice};
///
/// let mut dice = LoadedDice::new([10, 3], 7);
/// assert_eq!(dice.roll(10), 10);
/// assert_eq!(dice.roll(10), 3);
/// assert!((1..=6).contains(&dice.roll(6)));
/// ```
#[derive(Clone, Debug)]
pub struct LoadedDice {
    script: VecDeque<u8>,
    fallback: GameRng,
}

impl LoadedDice {
    /// Create dice that return `script` in order before rolling randomly.
    pub fn new(script: impl IntoIterator<Item = u8>, seed: u64) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback: GameRng::new(seed),
        }
    }

    /// Append more scripted values.
    pub fn push(&mut self, values: impl IntoIterator<Item = u8>) {
        self.script.extend(values);
    }

    /// Scripted values not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Dice for LoadedDice {
    fn roll(&mut self, sides: u8) -> u8 {
        match self.script.pop_front() {
            Some(value) => value.clamp(1, sides.max(1)),
            None => self.fallback.roll(sides),
        }
    }
}
