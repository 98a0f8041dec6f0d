//! Card definitions - static card data.
//!
//! A card id is a short string: a rank character followed by the card's
//! suit letters (`"1M"`, `"3MV"`, `"TMVK"`), or `"X"` for the Excuse.
//! `CardDefinition` resolves that id to rank, suits and price.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Suit;

/// Score value of Pawns and Courts, the highest a placed card can be worth.
pub const COURT_VALUE: u32 = 10;

/// Opaque card identifier.
///
/// An empty id is the face-down placeholder used in stripped snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub String);

impl CardId {
    /// Create a card id, normalised to upper case.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().to_ascii_uppercase())
    }

    /// Face-down placeholder.
    #[must_use]
    pub fn hidden() -> Self {
        Self(String::new())
    }

    /// Is this the face-down placeholder?
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a card id from move text, checking only its shape.
    ///
    /// ```
    /// use magnate::cards::CardId;
    ///
    /// assert_eq!(CardId::parse("3mv"), Some(CardId::new("3MV")));
    /// assert_eq!(CardId::parse("3"), None);
    /// assert_eq!(CardId::parse("3MVLYK"), None);
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let upper = text.trim().to_ascii_uppercase();
        if upper == "X" {
            return Some(Self(upper));
        }

        let mut chars = upper.chars();
        if Rank::from_char(chars.next()?)? == Rank::Excuse {
            return None;
        }
        let suits = chars.as_str();
        let shaped = (1..=3).contains(&suits.len())
            && suits.chars().all(|c| Suit::from_letter(c).is_some());
        shaped.then_some(Self(upper))
    }

    /// Borrow the raw id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Card rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// Rank 1. Scores by adjacency.
    Ace,
    /// Ranks 2 through 9.
    Numeral(u8),
    /// District centre in every game.
    Pawn,
    /// Buyable, or a district centre under `Variant::Mega`.
    Court,
    /// Dealt at setup; fixes a player's crown-count vector.
    Crown,
    /// Wildcard centre that matches any suit.
    Excuse,
}

impl Rank {
    /// Rank from the leading character of a card id.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            '1' => Some(Rank::Ace),
            d @ '2'..='9' => Some(Rank::Numeral(d as u8 - b'0')),
            'P' => Some(Rank::Pawn),
            'T' => Some(Rank::Court),
            'C' => Some(Rank::Crown),
            'X' => Some(Rank::Excuse),
            _ => None,
        }
    }

    /// Die face that pays income for this rank (1..=9), if any.
    #[must_use]
    pub const fn income_roll(self) -> Option<u8> {
        match self {
            Rank::Ace => Some(1),
            Rank::Numeral(n) => Some(n),
            _ => None,
        }
    }
}

/// Static card definition.
///
/// ```
/// use magnate::cards::{CardDefinition, CardId, Rank};
/// use magnate::core::Suit;
///
/// let journey = CardDefinition::new("3MV", "Journey", Rank::Numeral(3), &[Suit::Moons, Suit::Waves], 3);
/// assert!(journey.has_suit(Suit::Waves));
/// assert_eq!(journey.score_value(), Some(3));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Card id.
    pub id: CardId,

    /// Display name.
    pub name: String,

    /// Rank.
    pub rank: Rank,

    /// Suits, one to three (none for the Excuse).
    pub suits: SmallVec<[Suit; 3]>,

    /// Tokens needed to buy the card outright.
    pub price: u32,
}

impl CardDefinition {
    /// Create a new card definition.
    #[must_use]
    pub fn new(id: impl AsRef<str>, name: impl Into<String>, rank: Rank, suits: &[Suit], price: u32) -> Self {
        Self {
            id: CardId::new(id),
            name: name.into(),
            rank,
            suits: SmallVec::from_slice(suits),
            price,
        }
    }

    /// Does the card carry this suit?
    #[must_use]
    pub fn has_suit(&self, suit: Suit) -> bool {
        self.suits.contains(&suit)
    }

    /// Do the two cards share a suit?
    #[must_use]
    pub fn shares_suit(&self, other: &CardDefinition) -> bool {
        self.suits.iter().any(|&s| other.has_suit(s))
    }

    /// The Excuse matches anything.
    #[must_use]
    pub fn is_excuse(&self) -> bool {
        self.rank == Rank::Excuse
    }

    /// Can this card legally follow `top` in a district stack?
    #[must_use]
    pub fn can_follow(&self, top: &CardDefinition) -> bool {
        self.is_excuse() || top.is_excuse() || self.shares_suit(top)
    }

    /// Does a primary roll of `roll` pay income for this card?
    #[must_use]
    pub fn pays_on(&self, roll: u8) -> bool {
        self.rank.income_roll() == Some(roll)
    }

    /// Rank-2 cards cannot be deeded.
    #[must_use]
    pub fn is_deedable(&self) -> bool {
        self.rank != Rank::Numeral(2)
    }

    /// Fixed score value. Aces score by adjacency and return `None`.
    #[must_use]
    pub fn score_value(&self) -> Option<u32> {
        match self.rank {
            Rank::Ace => None,
            Rank::Numeral(n) => Some(u32::from(n)),
            Rank::Pawn | Rank::Court => Some(COURT_VALUE),
            Rank::Crown | Rank::Excuse => Some(0),
        }
    }
}
