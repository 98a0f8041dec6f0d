//! Spend check: is a proposed payment toward a card acceptable?
//!
//! Shared by Buy, Deed and Add. Payments arrive incrementally, so the check
//! takes what has already been committed toward the card (`prior`, the
//! escrow of an open deed or zero) and the new increment (`proposed`).
//!
//! A payment is rejected if it
//! - contributes a suit the card does not carry,
//! - exceeds the price,
//! - reaches the price without at least one token of every card suit, or
//! - leaves fewer tokens of price than there are suits still unfunded.
//!
//! Otherwise it is `Partial` or `Complete`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::CardDefinition;
use crate::core::{Suit, Tokens};

/// An acceptable payment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpendStatus {
    /// More is owed.
    Partial,
    /// Exactly the price, every suit covered.
    Complete,
}

/// An unacceptable payment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SpendError {
    #[error("card has no {0:?} suit")]
    ForeignSuit(Suit),
    #[error("payment of {paid} exceeds price {price}")]
    ExceedsPrice { price: u32, paid: u32 },
    #[error("price reached without any {0:?}")]
    MissingSuit(Suit),
    #[error("{unfunded} suits unfunded with only {remaining} left to pay")]
    Underfunded { remaining: u32, unfunded: usize },
    #[error("a deed cannot be paid in full when it is opened")]
    CompletesDeed,
}

/// Check `proposed` on top of `prior` against `card`'s price and suits.
pub fn check_spend(card: &CardDefinition, prior: &Tokens, proposed: &Tokens) -> Result<SpendStatus, SpendError> {
    if let Some((suit, _)) = proposed.nonzero().find(|&(s, _)| !card.has_suit(s)) {
        return Err(SpendError::ForeignSuit(suit));
    }

    let committed = *prior + *proposed;
    let paid = committed.total();
    if paid > card.price {
        return Err(SpendError::ExceedsPrice { price: card.price, paid });
    }

    let mut unfunded = card.suits.iter().filter(|&&s| committed[s] == 0);
    if paid == card.price {
        return match unfunded.next() {
            Some(&suit) => Err(SpendError::MissingSuit(suit)),
            None => Ok(SpendStatus::Complete),
        };
    }

    let remaining = card.price - paid;
    let unfunded = unfunded.count();
    if unfunded as u32 > remaining {
        return Err(SpendError::Underfunded { remaining, unfunded });
    }

    log::trace!("spend {proposed} on {} leaves {remaining} owed", card.id);
    Ok(SpendStatus::Partial)
}
