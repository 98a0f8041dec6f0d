//! Deed ledger: part-paid reservations of a card against a district.
//!
//! A deed is opened by a Deed action, grows only through Add, and is closed
//! exactly when its escrow reaches the card's price, at which point the caller
//! places the card. Deeds are never cancelled.

use im::OrdMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::DistrictId;
use crate::cards::CardId;
use crate::core::{PlayerId, Suit, Tokens};

/// Escrow bookkeeping failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EscrowError {
    #[error("no open deed for `{0}`")]
    NoDeed(CardId),
    #[error("escrow {escrow} would exceed price {price}")]
    Overfunded { price: u32, escrow: u32 },
}

/// An open deed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deed {
    /// Player who opened it.
    pub owner: PlayerId,
    /// District the card will join.
    pub district: DistrictId,
    /// Tokens committed so far. Only the card's suits are ever non-zero.
    pub escrow: Tokens,
    /// Suit credited when income lands on this card.
    pub preferred: Option<Suit>,
}

impl Deed {
    /// A fresh deed with nothing in escrow.
    #[must_use]
    pub fn new(owner: PlayerId, district: DistrictId) -> Self {
        Self {
            owner,
            district,
            escrow: Tokens::zero(),
            preferred: None,
        }
    }
}

/// All open deeds, keyed by card.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeedLedger {
    deeds: OrdMap<CardId, Deed>,
}

impl DeedLedger {
    /// Empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a deed for `card`.
    pub fn open(&mut self, card: CardId, deed: Deed) {
        self.deeds.insert(card, deed);
    }

    /// The deed for `card`, if open.
    #[must_use]
    pub fn get(&self, card: &CardId) -> Option<&Deed> {
        self.deeds.get(card)
    }

    /// Add tokens to a deed's escrow. Returns true when escrow now equals `price`.
    pub fn escrow_add(&mut self, card: &CardId, price: u32, tokens: &Tokens) -> Result<bool, EscrowError> {
        let deed = self
            .deeds
            .get_mut(card)
            .ok_or_else(|| EscrowError::NoDeed(card.clone()))?;

        let escrow = (deed.escrow + *tokens).total();
        if escrow > price {
            return Err(EscrowError::Overfunded { price, escrow });
        }

        deed.escrow += *tokens;
        Ok(escrow == price)
    }

    /// Set or overwrite a deed's preferred suit.
    pub fn prefer(&mut self, card: &CardId, suit: Suit) -> Result<(), EscrowError> {
        let deed = self
            .deeds
            .get_mut(card)
            .ok_or_else(|| EscrowError::NoDeed(card.clone()))?;
        deed.preferred = Some(suit);
        Ok(())
    }

    /// Close a fully escrowed deed.
    pub fn close(&mut self, card: &CardId) -> Option<Deed> {
        self.deeds.remove(card)
    }

    /// The card a player holds a deed for in `district`, if any.
    #[must_use]
    pub fn in_district(&self, player: PlayerId, district: DistrictId) -> Option<&CardId> {
        self.deeds
            .iter()
            .find(|(_, d)| d.owner == player && d.district == district)
            .map(|(card, _)| card)
    }

    /// Number of deeds a player has open.
    #[must_use]
    pub fn open_count(&self, player: PlayerId) -> usize {
        self.for_player(player).count()
    }

    /// A player's open deeds.
    pub fn for_player(&self, player: PlayerId) -> impl Iterator<Item = (&CardId, &Deed)> {
        self.deeds.iter().filter(move |(_, d)| d.owner == player)
    }

    /// All open deeds.
    pub fn iter(&self) -> impl Iterator<Item = (&CardId, &Deed)> {
        self.deeds.iter()
    }

    /// Tokens held in escrow across every deed.
    #[must_use]
    pub fn escrowed(&self) -> Tokens {
        self.deeds.values().fold(Tokens::zero(), |acc, d| acc + d.escrow)
    }

    /// Number of open deeds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deeds.len()
    }

    /// No deeds open?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deeds.is_empty()
    }

    /// Clear the preferred suit on every deed not owned by `viewer`.
    #[must_use]
    pub fn without_preferences_hidden_from(&self, viewer: PlayerId) -> Self {
        let deeds = self
            .deeds
            .iter()
            .map(|(card, deed)| {
                let mut deed = deed.clone();
                if deed.owner != viewer {
                    deed.preferred = None;
                }
                (card.clone(), deed)
            })
            .collect();
        Self { deeds }
    }
}
