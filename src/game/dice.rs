//! Dice and taxation.
//!
//! Once per committed turn: two d10, keep the higher. Either die showing 1
//! brings taxation (one d6, two under `taxtax`). A 10 is Crown Day.
//! Otherwise cards matching the roll pay their owners; deeded cards pay a
//! single token. Taxes cap the taxed suit at one token for everyone, after
//! income is credited.

use smallvec::SmallVec;

use super::event::{ClaimHow, Event};
use super::state::{Choice, Roll, TurnState};
use crate::cards::CardCatalogue;
use crate::core::{Dice, PlayerId, Suit, Tokens};

/// Faces on an income die.
pub const INCOME_SIDES: u8 = 10;

/// Faces on a taxation die.
pub const TAX_SIDES: u8 = 6;

/// Primary roll that triggers Crown Day.
pub const CROWN_DAY: u8 = 10;

/// Holdings a taxed suit is capped to.
pub const TAX_CAP: u32 = 1;

/// Roll income and taxation dice.
pub fn roll_dice<D: Dice + ?Sized>(dice: &mut D, tax_dice: usize) -> Roll {
    let faces = [dice.roll(INCOME_SIDES), dice.roll(INCOME_SIDES)];
    let mut taxes = Vec::new();
    if faces.contains(&1) {
        for _ in 0..tax_dice {
            let face = dice.roll(TAX_SIDES);
            if !taxes.contains(&face) {
                taxes.push(face);
            }
        }
    }

    Roll {
        dice: faces,
        primary: faces[0].max(faces[1]),
        taxes,
    }
}

/// Apply a roll to the state opening `state.current`'s turn.
pub fn resolve_roll(state: &mut TurnState, catalogue: &dyn CardCatalogue, roll: Roll) {
    log::info!(
        "{} rolled {}/{} (primary {}), taxes {:?}",
        state.current,
        roll.dice[0],
        roll.dice[1],
        roll.primary,
        roll.taxes
    );
    state.record(Event::Roll {
        dice: roll.dice,
        primary: roll.primary,
        taxes: roll.taxes.clone(),
    });

    if roll.is_crown_day() {
        crown_day(state);
    } else {
        pay_income(state, catalogue, roll.primary);
    }
    tax(state, &roll);

    state.roll = Some(roll);
}

fn crown_day(state: &mut TurnState) {
    let mut total = Tokens::zero();
    let crowns: Vec<(PlayerId, Tokens)> = state.crowns.iter().map(|(p, t)| (p, *t)).collect();
    for (player, tokens) in crowns {
        state.ledger.credit(player, &tokens);
        total += tokens;
    }
    state.record(Event::Claim {
        player: None,
        how: ClaimHow::Crowns,
        tokens: total,
    });
}

fn pay_income(state: &mut TurnState, catalogue: &dyn CardCatalogue, primary: u8) {
    let roller = state.current;
    let players: Vec<PlayerId> = state.ledger.iter().map(|(p, _)| p).collect();

    for player in players {
        let mut income = Tokens::zero();

        for (_, card) in state.board.placed_by(player) {
            if let Some(def) = catalogue.resolve(card).filter(|d| d.pays_on(primary)) {
                for &suit in &def.suits {
                    income[suit] += 1;
                }
            }
        }

        let mut choices = Vec::new();
        for (card, deed) in state.deeds.for_player(player) {
            let Some(def) = catalogue.resolve(card).filter(|d| d.pays_on(primary)) else {
                continue;
            };
            let suit = match (def.suits.as_slice(), deed.preferred) {
                ([only], _) => *only,
                (_, Some(preferred)) => preferred,
                (suits, None) if player == roller => {
                    choices.push(Choice {
                        player,
                        card: card.clone(),
                        suits: SmallVec::from_slice(suits),
                    });
                    continue;
                }
                (suits, None) => fewest_held(state.ledger.holdings(player), suits),
            };
            income[suit] += 1;
        }

        for choice in choices {
            log::debug!("{player} must choose a suit for `{}`", choice.card);
            state.choices.push_back(choice);
        }
        if !income.is_empty() {
            state.ledger.credit(player, &income);
            state.record(Event::Claim {
                player: Some(player),
                how: ClaimHow::Income,
                tokens: income,
            });
        }
    }
}

/// The suit among `suits` with the fewest tokens held, earliest on ties.
#[must_use]
pub fn fewest_held(held: &Tokens, suits: &[Suit]) -> Suit {
    suits
        .iter()
        .copied()
        .min_by_key(|&s| held[s])
        .unwrap_or(Suit::Moons)
}

fn tax(state: &mut TurnState, roll: &Roll) {
    let players: Vec<PlayerId> = state.ledger.iter().map(|(p, _)| p).collect();
    for suit in roll.taxed_suits() {
        for &player in &players {
            let forfeited = state.ledger.cap(player, suit, TAX_CAP);
            if forfeited > 0 {
                state.record(Event::Capture {
                    player,
                    suit,
                    forfeited,
                });
            }
        }
    }
}
