//! Versioned snapshots of a whole game.
//!
//! A snapshot carries the configuration, the game-over flag and winners, and
//! the full stack of turn states. It is encoded as JSON for presentation
//! layers and with bincode for compact storage.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::controller::Game;
use super::scoring::GameResult;
use super::state::TurnState;
use crate::core::{Dice, GameConfig, GameRng, GameRngState, PlayerId, UnknownVariant};

/// Current snapshot format.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Snapshot decoding or restore failure.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid snapshot encoding: {0}")]
    Binary(#[from] bincode::Error),

    #[error("unsupported snapshot version {found}, expected {SNAPSHOT_VERSION}")]
    Version { found: u32 },

    #[error("snapshot has no turn states")]
    EmptyStack,

    #[error("snapshot is a player view without seed or shuffle state")]
    Redacted,

    #[error("snapshot declares {declared} players but its states seat {found}")]
    PlayerCount { declared: usize, found: usize },

    #[error(transparent)]
    UnknownVariant(#[from] UnknownVariant),
}

/// A game at rest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub numplayers: usize,
    pub variants: Vec<String>,
    pub handsize: usize,
    /// Deal seed, absent from player views.
    pub seed: Option<u64>,
    /// Reshuffle stream, so a restored game shuffles the discard identically.
    /// Absent from player views.
    pub rng: Option<GameRngState>,
    pub gameover: bool,
    /// Winners once the game is over, empty before.
    pub winner: Vec<PlayerId>,
    /// Every committed ply, oldest first.
    pub stack: Vec<TurnState>,
}

impl Snapshot {
    /// Capture a game.
    #[must_use]
    pub fn of<D: Dice>(game: &Game<D>) -> Self {
        let config = game.config();
        let stack: Vec<TurnState> = game.plies().cloned().collect();
        Self {
            version: SNAPSHOT_VERSION,
            numplayers: game.state().hands.player_count(),
            variants: config.variant_names(),
            handsize: config.hand_size,
            seed: Some(config.seed),
            rng: Some(game.rng_state()),
            gameover: game.is_over(),
            winner: game.result().map(GameResult::players).unwrap_or_default(),
            stack,
        }
    }

    /// The view `viewer` is allowed to see, without the seed or shuffle state.
    #[must_use]
    pub fn stripped(&self, viewer: PlayerId) -> Self {
        Self {
            seed: None,
            rng: None,
            stack: self.stack.iter().map(|s| s.stripped(viewer)).collect(),
            ..self.clone()
        }
    }

    /// Whether this is a player view that cannot be resumed.
    #[must_use]
    pub fn is_redacted(&self) -> bool {
        self.seed.is_none() || self.rng.is_none()
    }

    /// Latest ply.
    #[must_use]
    pub fn latest(&self) -> Option<&TurnState> {
        self.stack.last()
    }

    /// Rebuild the configuration. A player view keeps the default seed.
    pub fn config(&self) -> Result<GameConfig, SnapshotError> {
        let config = GameConfig::from_variant_names(&self.variants)?.with_hand_size(self.handsize);
        Ok(match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        })
    }

    /// The recorded result, if the game is over.
    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        if !self.gameover {
            return None;
        }
        match self.winner.as_slice() {
            [only] => Some(GameResult::Winner(*only)),
            players => Some(GameResult::Winners(players.to_vec())),
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.checked()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)?;
        snapshot.checked()
    }

    /// Resume the game with dice forked from the reshuffle stream.
    pub fn restore(self) -> Result<Game<GameRng>, SnapshotError> {
        let state = self.rng.as_ref().ok_or(SnapshotError::Redacted)?;
        let dice = GameRng::from_state(state).fork();
        self.restore_with(dice)
    }

    /// Resume the game with a custom dice source.
    pub fn restore_with<D: Dice>(self, dice: D) -> Result<Game<D>, SnapshotError> {
        let snapshot = self.checked()?;
        if snapshot.is_redacted() {
            return Err(SnapshotError::Redacted);
        }
        let config = snapshot.config()?;
        let result = snapshot.result();
        let rng = snapshot
            .rng
            .as_ref()
            .map(GameRng::from_state)
            .ok_or(SnapshotError::Redacted)?;
        Game::from_parts(config, dice, rng, snapshot.stack, result).ok_or(SnapshotError::EmptyStack)
    }

    fn checked(self) -> Result<Self, SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Version { found: self.version });
        }
        let Some(first) = self.stack.first() else {
            return Err(SnapshotError::EmptyStack);
        };
        let found = first.hands.player_count();
        if found != self.numplayers {
            return Err(SnapshotError::PlayerCount {
                declared: self.numplayers,
                found,
            });
        }
        Ok(self)
    }
}

impl<D: Dice> Game<D> {
    /// Capture the game as a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(self)
    }
}
