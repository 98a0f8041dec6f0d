//! Token ledger: per-player, per-suit resource counters.
//!
//! Counters never go negative. `credit` always succeeds; `debit` either
//! applies the whole vector or leaves the ledger untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{PlayerId, PlayerMap, Suit, Tokens};

/// A debit that would drive a counter below zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("{player} needs {needed} {suit:?} but holds {held}")]
pub struct Unaffordable {
    /// Debited player.
    pub player: PlayerId,
    /// First suit that fell short.
    pub suit: Suit,
    /// Amount the debit asked for.
    pub needed: u32,
    /// Amount held.
    pub held: u32,
}

/// Per-player token holdings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenLedger {
    holdings: PlayerMap<Tokens>,
}

impl TokenLedger {
    /// Empty ledger for `player_count` players.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            holdings: PlayerMap::with_default(player_count),
        }
    }

    /// A player's holdings.
    #[must_use]
    pub fn holdings(&self, player: PlayerId) -> &Tokens {
        &self.holdings[player]
    }

    /// Tokens of one suit held by a player.
    #[must_use]
    pub fn held(&self, player: PlayerId, suit: Suit) -> u32 {
        self.holdings[player][suit]
    }

    /// Total tokens held by a player.
    #[must_use]
    pub fn total(&self, player: PlayerId) -> u32 {
        self.holdings[player].total()
    }

    /// Tokens in circulation per suit, summed over players.
    #[must_use]
    pub fn circulation(&self) -> Tokens {
        self.holdings
            .iter()
            .fold(Tokens::zero(), |acc, (_, held)| acc + *held)
    }

    /// Add tokens to a player.
    pub fn credit(&mut self, player: PlayerId, tokens: &Tokens) {
        self.holdings[player] += *tokens;
    }

    /// Remove tokens from a player, all or nothing.
    pub fn debit(&mut self, player: PlayerId, tokens: &Tokens) -> Result<(), Unaffordable> {
        let held = self.holdings[player];
        match held.checked_sub(tokens) {
            Ok(remaining) => {
                self.holdings[player] = remaining;
                Ok(())
            }
            Err(suit) => Err(Unaffordable {
                player,
                suit,
                needed: tokens[suit],
                held: held[suit],
            }),
        }
    }

    /// Cap a player's holding of one suit, returning the forfeited amount.
    pub fn cap(&mut self, player: PlayerId, suit: Suit, max: u32) -> u32 {
        let held = &mut self.holdings[player][suit];
        let forfeited = held.saturating_sub(max);
        *held -= forfeited;
        forfeited
    }

    /// Iterate over all players' holdings.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &Tokens)> {
        self.holdings.iter()
    }
}
