//! Core building blocks: seats, suits and tokens, RNG, configuration.
//!
//! Nothing in here knows about cards, districts or moves.

pub mod config;
pub mod player;
pub mod rng;
pub mod tokens;

pub use config::{GameConfig, UnknownVariant, Variant, CREDIT_LIMIT, DEFAULT_HAND_SIZE};
pub use player::{PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::{Dice, GameRng, GameRngState, LoadedDice};
pub use tokens::{Suit, Tokens, SUIT_COUNT};
