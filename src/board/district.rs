//! District board.
//!
//! Each district has a shared centre card and one stack per player. A card
//! may join a stack only if it shares a suit with the stack's top card, or
//! with the centre while the stack is empty. The Excuse matches anything.

use std::fmt;

use im::Vector;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::{CardCatalogue, CardDefinition, CardId};
use crate::core::{PlayerId, PlayerMap};

/// Highest district letter the move grammar accepts.
pub const MAX_DISTRICTS: usize = 9;

/// District index, written as a letter `a`..`i` in moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DistrictId(pub u8);

impl DistrictId {
    /// Create a district id from an index.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Index into the board.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Move-string letter.
    #[must_use]
    pub fn letter(self) -> char {
        char::from(b'a' + self.0)
    }

    /// Parse a move-string letter (case-insensitive).
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        let lower = letter.to_ascii_lowercase();
        if !lower.is_ascii_lowercase() {
            return None;
        }
        let index = lower as u8 - b'a';
        (usize::from(index) < MAX_DISTRICTS).then_some(Self(index))
    }
}

impl fmt::Display for DistrictId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Why a card cannot join a stack.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("no district `{0}`")]
    NoSuchDistrict(DistrictId),
    #[error("`{card}` shares no suit with `{top}`")]
    SuitMismatch { card: CardId, top: CardId },
}

/// One column of the tableau.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    /// Shared reference card.
    pub center: CardId,
    /// Per-player stacks, bottom first.
    pub stacks: PlayerMap<Vector<CardId>>,
}

impl District {
    /// Empty district around `center`.
    #[must_use]
    pub fn new(center: CardId, player_count: usize) -> Self {
        Self {
            center,
            stacks: PlayerMap::with_default(player_count),
        }
    }

    /// The card a new placement by `player` must match.
    #[must_use]
    pub fn top(&self, player: PlayerId) -> &CardId {
        self.stacks[player].last().unwrap_or(&self.center)
    }
}

/// The full tableau.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    districts: Vector<District>,
}

impl Board {
    /// Board with one district per centre card, in order.
    pub fn new(centers: impl IntoIterator<Item = CardId>, player_count: usize) -> Self {
        Self {
            districts: centers
                .into_iter()
                .map(|c| District::new(c, player_count))
                .collect(),
        }
    }

    /// Number of districts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.districts.len()
    }

    /// No districts?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }

    /// Every district id on this board.
    pub fn ids(&self) -> impl Iterator<Item = DistrictId> {
        (0..self.districts.len() as u8).map(DistrictId)
    }

    /// Look up a district.
    #[must_use]
    pub fn district(&self, id: DistrictId) -> Option<&District> {
        self.districts.get(id.index())
    }

    /// Iterate over districts in order.
    pub fn iter(&self) -> impl Iterator<Item = (DistrictId, &District)> {
        self.districts
            .iter()
            .enumerate()
            .map(|(i, d)| (DistrictId(i as u8), d))
    }

    /// Check that `card` may join `player`'s stack in `district`.
    pub fn check_placement(
        &self,
        catalogue: &dyn CardCatalogue,
        district: DistrictId,
        player: PlayerId,
        card: &CardDefinition,
    ) -> Result<(), BoardError> {
        let top = self
            .district(district)
            .ok_or(BoardError::NoSuchDistrict(district))?
            .top(player);

        let fits = catalogue.resolve(top).is_some_and(|t| card.can_follow(t));
        if fits {
            Ok(())
        } else {
            Err(BoardError::SuitMismatch {
                card: card.id.clone(),
                top: top.clone(),
            })
        }
    }

    /// Push a card onto a stack without checking suits.
    pub fn place(&mut self, district: DistrictId, player: PlayerId, card: CardId) -> Result<(), BoardError> {
        let d = self
            .districts
            .get_mut(district.index())
            .ok_or(BoardError::NoSuchDistrict(district))?;
        d.stacks[player].push_back(card);
        Ok(())
    }

    /// Every card a player has placed, with its district.
    pub fn placed_by(&self, player: PlayerId) -> impl Iterator<Item = (DistrictId, &CardId)> {
        self.iter()
            .flat_map(move |(id, d)| d.stacks[player].iter().map(move |c| (id, c)))
    }

    /// Count of placements of `card` anywhere on the board.
    #[must_use]
    pub fn occurrences(&self, card: &CardId) -> usize {
        self.districts
            .iter()
            .flat_map(|d| d.stacks.iter())
            .map(|(_, stack)| stack.iter().filter(|c| *c == card).count())
            .sum()
    }
}
