//! Move rejection taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{BoardError, DistrictId};
use crate::cards::{CardId, UnknownCard};
use crate::core::Suit;
use crate::economy::{EscrowError, SpendError, Unaffordable};
use crate::moves::{ActionKind, ParseError};

/// Why a district refused a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    /// No shared suit with the card it must follow.
    SuitMismatch,
    /// The mover already holds a deed in the district.
    Deeded,
}

/// A sub-action the rules refuse.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("malformed action: {0}")]
    MalformedMove(#[from] ParseError),
    #[error("{0} action left unfinished before the end of the move")]
    UnfinishedAction(ActionKind),
    #[error("unknown card `{0}`")]
    UnknownCard(CardId),
    #[error("`{0}` is not in hand")]
    CardNotInHand(CardId),
    #[error("no district `{0}`")]
    NoSuchDistrict(DistrictId),
    #[error("`{card}` cannot go in district {district} ({reason:?})")]
    InvalidPlacement {
        card: CardId,
        district: DistrictId,
        reason: Placement,
    },
    #[error(transparent)]
    Unaffordable(#[from] Unaffordable),
    #[error("invalid payment: {0}")]
    InvalidSpend(#[from] SpendError),
    #[error("`{0}` cannot be deeded")]
    UndeedableCard(CardId),
    #[error("already holding {cap} open deeds")]
    OverLeveraged { cap: usize },
    #[error("no open deed of yours for `{0}`")]
    NoSuchDeed(CardId),
    #[error("no pending choice for `{0}`")]
    NoSuchChoice(CardId),
    #[error("`{card}` has no {suit} suit")]
    ForeignSuit { card: CardId, suit: Suit },
    #[error("cannot trade {from} for {to}")]
    InvalidTrade { from: Suit, to: Suit },
    #[error("no card actions left this turn")]
    ActionBudgetExceeded,
    #[error("a forced choice must be resolved first")]
    ForcedChoicePending,
    #[error("the game is over")]
    GameOver,
    #[error("move is not ready to commit")]
    NotReady,
}

impl From<UnknownCard> for MoveError {
    fn from(err: UnknownCard) -> Self {
        MoveError::UnknownCard(err.0)
    }
}

impl From<EscrowError> for MoveError {
    fn from(err: EscrowError) -> Self {
        match err {
            EscrowError::NoDeed(card) => MoveError::NoSuchDeed(card),
            EscrowError::Overfunded { price, escrow } => {
                MoveError::InvalidSpend(SpendError::ExceedsPrice { price, paid: escrow })
            }
        }
    }
}

impl MoveError {
    /// Lift a board error for a placement into `district`.
    pub(crate) fn placement(district: DistrictId, err: BoardError) -> Self {
        match err {
            BoardError::NoSuchDistrict(d) => MoveError::NoSuchDistrict(d),
            BoardError::SuitMismatch { card, .. } => MoveError::InvalidPlacement {
                card,
                district,
                reason: Placement::SuitMismatch,
            },
        }
    }
}

/// A rejected move: the offending sub-action's index and the reason.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("action {index}: {error}")]
pub struct Rejection {
    pub index: usize,
    pub error: MoveError,
}

impl Rejection {
    #[must_use]
    pub fn new(index: usize, error: MoveError) -> Self {
        Self { index, error }
    }
}

/// Failure on the trusted commit path.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("trusted move {ply} `{text}` rejected: {rejection}")]
    Rejected {
        ply: usize,
        text: String,
        rejection: Rejection,
    },
}
