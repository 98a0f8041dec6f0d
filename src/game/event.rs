//! Result/event log entries.
//!
//! Each committed turn carries the events it produced, in order. Presentation
//! layers consume these; the engine never reads them back.

use serde::{Deserialize, Serialize};

use crate::board::DistrictId;
use crate::cards::CardId;
use crate::core::{PlayerId, Suit, Tokens};

/// How a card reached the board (or its deed slot).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceHow {
    /// Bought outright.
    #[serde(rename = "B")]
    Bought,
    /// Deeded, waiting on escrow.
    #[serde(rename = "D")]
    Deeded,
    /// Deed completed by Add.
    #[serde(rename = "A")]
    Added,
}

/// Why tokens were claimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimHow {
    /// Crown Day: every player receives their crown vector.
    Crowns,
    /// Rank-matching income.
    Income,
    /// A forced choice resolved by Choose.
    Choice,
}

/// A single log entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Event {
    Place {
        player: PlayerId,
        card: CardId,
        district: DistrictId,
        how: PlaceHow,
    },
    Add {
        player: PlayerId,
        card: CardId,
        tokens: Tokens,
    },
    Sell {
        player: PlayerId,
        card: CardId,
        tokens: Tokens,
    },
    Convert {
        player: PlayerId,
        from: Suit,
        to: Suit,
    },
    Prefer {
        player: PlayerId,
        card: CardId,
        suit: Suit,
    },
    Capture {
        player: PlayerId,
        suit: Suit,
        forfeited: u32,
    },
    Roll {
        dice: [u8; 2],
        primary: u8,
        taxes: Vec<u8>,
    },
    /// `player` is `None` for a Crown Day claim, which covers everyone.
    Claim {
        player: Option<PlayerId>,
        how: ClaimHow,
        tokens: Tokens,
    },
    DeckDraw {
        player: PlayerId,
        count: usize,
    },
    Reshuffle {
        count: usize,
    },
    Eog,
    Winners {
        players: Vec<PlayerId>,
    },
}

impl Event {
    /// Tag used on the wire.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Event::Place { .. } => "place",
            Event::Add { .. } => "add",
            Event::Sell { .. } => "sell",
            Event::Convert { .. } => "convert",
            Event::Prefer { .. } => "prefer",
            Event::Capture { .. } => "capture",
            Event::Roll { .. } => "roll",
            Event::Claim { .. } => "claim",
            Event::DeckDraw { .. } => "deckDraw",
            Event::Reshuffle { .. } => "reshuffle",
            Event::Eog => "eog",
            Event::Winners { .. } => "winners",
        }
    }
}
