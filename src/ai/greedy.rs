//! Greedy move generator.
//!
//! Builds a move one sub-action at a time. At each step the candidates are
//! tried in priority order and the first one the validator accepts is kept:
//! - resolve pending forced choices
//! - complete open deeds with an Add
//! - buy the most valuable card it can pay for in full
//! - open a deed
//! - sell the least valuable card
//!
//! Trades are never proposed, so every kept step either resolves a choice,
//! closes a deed or spends a card-action slot, and the loop terminates.

use super::plan_payment;
use crate::cards::{CardCatalogue, CardDefinition, CardId};
use crate::core::{PlayerId, Tokens};
use crate::game::{fewest_held, TurnState};
use crate::moves::{format_move, SubAction};
use crate::rules::{Outcome, Validator};

/// A ready move for `state.current`, or `None` if no legal move was found.
#[must_use]
pub fn choose_move(validator: &Validator<'_>, state: &TurnState) -> Option<String> {
    let mut segments: Vec<String> = Vec::new();

    loop {
        let text = format_move(&segments);
        let validation = validator.validate(state, &text);
        match validation.outcome {
            Outcome::Ready => {
                log::debug!("greedy move for {}: `{text}`", state.current);
                return Some(text);
            }
            Outcome::Rejected(_) | Outcome::Partial => return None,
            Outcome::Open => {}
        }

        let next = candidates(validator.catalogue(), &validation.state)
            .into_iter()
            .map(|action| action.to_string())
            .find(|segment| {
                let mut trial = segments.clone();
                trial.push(segment.clone());
                matches!(
                    validator.validate(state, &format_move(&trial)).outcome,
                    Outcome::Ready | Outcome::Open
                )
            })?;
        segments.push(next);
    }
}

/// Single-step candidates in priority order.
fn candidates(catalogue: &dyn CardCatalogue, state: &TurnState) -> Vec<SubAction> {
    let player = state.current;
    let held = *state.ledger.holdings(player);
    let mut out = Vec::new();

    for choice in state.choices_for(player) {
        out.push(SubAction::Choose {
            card: choice.card.clone(),
            suit: Some(fewest_held(&held, &choice.suits)),
        });
    }

    for (card, deed) in state.deeds.for_player(player) {
        let Some(def) = catalogue.resolve(card) else { continue };
        if let Some(spend) = plan_payment(def, &deed.escrow, &held) {
            out.push(SubAction::Add {
                card: card.clone(),
                spend,
            });
        }
    }

    let hand = ranked_hand(catalogue, state, player);

    for def in hand.iter().rev() {
        let Some(spend) = plan_payment(def, &Tokens::zero(), &held) else { continue };
        for district in state.board.ids() {
            out.push(SubAction::Buy {
                card: def.id.clone(),
                district: Some(district),
                spend,
            });
        }
    }

    for def in hand.iter().rev().filter(|d| d.is_deedable()) {
        for district in state.board.ids() {
            out.push(SubAction::Deed {
                card: def.id.clone(),
                district: Some(district),
                spend: Tokens::zero(),
            });
        }
    }

    for def in &hand {
        out.push(SubAction::Sell { card: def.id.clone() });
    }
    out
}

/// The player's hand, least valuable first.
fn ranked_hand<'a>(catalogue: &'a dyn CardCatalogue, state: &TurnState, player: PlayerId) -> Vec<&'a CardDefinition> {
    let mut hand: Vec<&CardDefinition> = state
        .hand(player)
        .iter()
        .filter_map(|id: &CardId| catalogue.resolve(id))
        .collect();
    hand.sort_by_key(|d| (d.price, d.score_value().unwrap_or(0)));
    hand
}
