//! # magnate
//!
//! Rules and economy engine for a two-player district-building card game
//! played with a six-suit deck.
//!
//! ## Design Principles
//!
//! 1. **Moves are text**: A move is a `/`-separated list of sub-actions
//!    (`Buy:3MV,a,M2,V1/Trade:K,S`). The same grammar is parsed, validated,
//!    autocompleted and serialized.
//!
//! 2. **Speculative validation**: Every move is replayed against a clone of
//!    the current turn state. The state is built from `im` persistent
//!    collections, so that clone is O(1).
//!
//! 3. **Configuration Over Convention**: Variant rules are read from derived
//!    `GameConfig` settings, never from inline flag checks.
//!
//! ## Modules
//!
//! - `core`: Players, suits and tokens, RNG and dice, configuration
//! - `cards`: Card catalogue and draw pile
//! - `economy`: Token ledger, deeds and escrow, spend checks
//! - `board`: Districts and their per-player stacks
//! - `moves`: Sub-action types, parser and serializer
//! - `rules`: Move validator, turn context, autocomplete
//! - `game`: Turn state, dice and taxation, scoring, turn controller, snapshots
//! - `ai`: Greedy move generator

pub mod ai;
pub mod board;
pub mod cards;
pub mod core;
pub mod economy;
pub mod game;
pub mod moves;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    Dice, GameConfig, GameRng, GameRngState, LoadedDice, PlayerId, PlayerMap, Suit, Tokens, Variant,
};

pub use crate::cards::{CardCatalogue, CardDefinition, CardId, CardRegistry, Deck, Rank};

pub use crate::economy::{Deed, DeedLedger, SpendError, SpendStatus, TokenLedger};

pub use crate::board::{Board, District, DistrictId};

pub use crate::moves::{format_move, parse_move, ActionKind, ParseError, Parsed, SubAction};

pub use crate::rules::{EngineError, MoveError, Outcome, Rejection, Validation, Validator};

pub use crate::game::{
    Choice, Event, Game, GameBuilder, GameResult, Roll, ScoreSheet, Snapshot, SnapshotError, TurnState,
};
