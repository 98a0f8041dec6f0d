//! Computer player.
//!
//! Only a legal-but-greedy move generator; there is no search.

pub mod greedy;

pub use greedy::choose_move;

use crate::cards::CardDefinition;
use crate::core::Tokens;

/// A payment from `held` that, on top of `prior`, pays `card` in full.
///
/// Covers every suit `prior` has not funded yet with one token, then tops up
/// from the card suits held most. `None` if `held` cannot cover it.
#[must_use]
pub fn plan_payment(card: &CardDefinition, prior: &Tokens, held: &Tokens) -> Option<Tokens> {
    let owed = card.price.checked_sub(prior.total())?;
    let mut spend = Tokens::zero();

    for &suit in &card.suits {
        if prior[suit] == 0 {
            if held[suit] == 0 {
                return None;
            }
            spend[suit] = 1;
        }
    }
    let mut left = owed.checked_sub(spend.total())?;

    let mut by_supply: Vec<_> = card.suits.iter().copied().collect();
    by_supply.sort_by_key(|&s| std::cmp::Reverse(held[s]));
    for suit in by_supply {
        let take = (held[suit] - spend[suit]).min(left);
        spend[suit] += take;
        left -= take;
    }

    (left == 0 && !spend.is_empty()).then_some(spend)
}
