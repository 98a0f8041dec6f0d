//! Turn state, dice, scoring and the turn controller.
//!
//! ## Key Types
//!
//! - `TurnState`: One ply, built from persistent collections
//! - `Game`: History stack plus the commit sequence
//! - `Snapshot`: Versioned JSON/bincode form of a whole game

pub mod controller;
pub mod dice;
pub mod event;
pub mod scoring;
pub mod snapshot;
pub mod state;

pub use controller::{centers, Game, GameBuilder};
pub use dice::{fewest_held, resolve_roll, roll_dice, CROWN_DAY, INCOME_SIDES, TAX_CAP, TAX_SIDES};
pub use event::{ClaimHow, Event, PlaceHow};
pub use scoring::{ace_value, district_total, score, DistrictScore, GameResult, ScoreSheet};
pub use snapshot::{Snapshot, SnapshotError, SNAPSHOT_VERSION};
pub use state::{Choice, Roll, TurnState};
