//! Next-step suggestions for a partial move.
//!
//! Candidates are built with the serializer and kept only if the extended
//! move still validates.

use super::validator::{Outcome, Validator, TRADE_RATE};
use crate::cards::CardId;
use crate::core::{Suit, Tokens};
use crate::game::TurnState;
use crate::moves::{format_move, parse_move, ActionKind, Parsed, SubAction};

/// Legal one-step extensions of `text`, as full move strings.
pub fn suggest(validator: &Validator<'_>, state: &TurnState, text: &str) -> Vec<String> {
    let parsed = parse_move(text);
    let validation = validator.validate_parsed(state, text, &parsed);
    let preview = &validation.state;

    let (prefix, candidates) = match (&validation.outcome, parsed.split_last()) {
        (Outcome::Rejected(_), _) => return Vec::new(),
        (Outcome::Partial, Some((last, head))) => (head, extend(validator, preview, last)),
        _ => (parsed.as_slice(), starts(preview, None)),
    };

    let mut out: Vec<String> = Vec::new();
    for candidate in candidates {
        let mut segments: Vec<String> = prefix.iter().map(ToString::to_string).collect();
        segments.push(candidate.to_string());
        let full = format_move(&segments);
        if !out.contains(&full) && !validator.validate(state, &full).is_rejected() {
            out.push(full);
        }
    }
    out
}

/// Openers for new actions, optionally of a single kind.
fn starts(state: &TurnState, only: Option<ActionKind>) -> Vec<SubAction> {
    let player = state.current;
    let wanted = |kind: ActionKind| only.map_or(true, |k| k == kind);
    let mut out = Vec::new();

    if wanted(ActionKind::Choose) {
        for choice in state.choices_for(player) {
            out.push(SubAction::Choose {
                card: choice.card.clone(),
                suit: None,
            });
        }
    }
    for card in state.hand(player) {
        if wanted(ActionKind::Buy) {
            out.push(SubAction::Buy {
                card: card.clone(),
                district: None,
                spend: Tokens::zero(),
            });
        }
        if wanted(ActionKind::Deed) {
            out.push(SubAction::Deed {
                card: card.clone(),
                district: None,
                spend: Tokens::zero(),
            });
        }
        if wanted(ActionKind::Sell) {
            out.push(SubAction::Sell { card: card.clone() });
        }
    }
    for (card, _) in state.deeds.for_player(player) {
        if wanted(ActionKind::Add) {
            out.push(SubAction::Add {
                card: card.clone(),
                spend: Tokens::zero(),
            });
        }
        if wanted(ActionKind::Prefer) {
            out.push(SubAction::Prefer {
                card: card.clone(),
                suit: None,
            });
        }
    }
    if wanted(ActionKind::Trade) {
        for (from, held) in state.ledger.holdings(player).nonzero() {
            if held >= TRADE_RATE {
                out.push(SubAction::Trade { from, to: None });
            }
        }
    }
    out
}

/// Ways to fill in the next field of an unfinished action.
fn extend(validator: &Validator<'_>, state: &TurnState, last: &Parsed) -> Vec<SubAction> {
    let action = match last {
        Parsed::Started(kind) => return starts(state, Some(*kind)),
        Parsed::Action { action, .. } => action,
        Parsed::Malformed { .. } => return Vec::new(),
    };
    let suits_of = |card: &CardId| -> Vec<Suit> {
        validator
            .catalogue()
            .resolve(card)
            .map(|d| d.suits.to_vec())
            .unwrap_or_default()
    };

    match action {
        SubAction::Buy { card, district: None, .. } => state
            .board
            .ids()
            .map(|d| SubAction::Buy {
                card: card.clone(),
                district: Some(d),
                spend: Tokens::zero(),
            })
            .collect(),
        SubAction::Deed { card, district: None, .. } => state
            .board
            .ids()
            .map(|d| SubAction::Deed {
                card: card.clone(),
                district: Some(d),
                spend: Tokens::zero(),
            })
            .collect(),
        SubAction::Buy { card, district, spend } => suits_of(card)
            .into_iter()
            .map(|s| SubAction::Buy {
                card: card.clone(),
                district: *district,
                spend: *spend + Tokens::of(s, 1),
            })
            .collect(),
        SubAction::Add { card, spend } => suits_of(card)
            .into_iter()
            .map(|s| SubAction::Add {
                card: card.clone(),
                spend: *spend + Tokens::of(s, 1),
            })
            .collect(),
        SubAction::Trade { from, .. } => Suit::ALL
            .into_iter()
            .filter(|to| to != from)
            .map(|to| SubAction::Trade {
                from: *from,
                to: Some(to),
            })
            .collect(),
        SubAction::Prefer { card, .. } => suits_of(card)
            .into_iter()
            .map(|s| SubAction::Prefer {
                card: card.clone(),
                suit: Some(s),
            })
            .collect(),
        SubAction::Choose { card, .. } => suits_of(card)
            .into_iter()
            .map(|s| SubAction::Choose {
                card: card.clone(),
                suit: Some(s),
            })
            .collect(),
        SubAction::Deed { .. } | SubAction::Sell { .. } => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::cards::{CardRegistry, Deck};
    use crate::core::{GameConfig, PlayerId, PlayerMap};
    use crate::economy::{DeedLedger, TokenLedger};
    use im::Vector;

    const P0: PlayerId = PlayerId::new(0);

    fn fixture() -> TurnState {
        let mut hands = PlayerMap::with_default(2);
        hands[P0] = ["3MV", "2MK"].into_iter().map(CardId::new).collect();
        let mut ledger = TokenLedger::new(2);
        ledger.credit(P0, &Tokens::from_array([2, 0, 1, 0, 0, 3]));

        TurnState {
            ledger,
            board: Board::new(["PVLY", "PMSL", "X", "PSVK", "PMYK"].into_iter().map(CardId::new), 2),
            deeds: DeedLedger::new(),
            hands,
            deck: Deck::default(),
            discard: Vector::new(),
            crowns: PlayerMap::with_default(2),
            roll: None,
            choices: Vector::new(),
            current: P0,
            shuffled: false,
            last_move: String::new(),
            log: Vector::new(),
        }
    }

    fn suggestions(text: &str) -> Vec<String> {
        let registry = CardRegistry::standard();
        let config = GameConfig::default();
        suggest(&Validator::new(&registry, &config), &fixture(), text)
    }

    #[test]
    fn test_openers() {
        let s = suggestions("");
        assert!(s.contains(&"Buy:3MV".to_string()));
        assert!(s.contains(&"Sell:2MK".to_string()));
        assert!(s.contains(&"Trade:K".to_string()));
        // 2MK cannot be deeded.
        assert!(!s.contains(&"Deed:2MK".to_string()));
    }

    #[test]
    fn test_districts_for_buy() {
        let s = suggestions("Buy:2MK");
        // Only Moons/Knots centres: PMSL, the Excuse, PSVK, PMYK.
        assert_eq!(s, vec!["Buy:2MK,b", "Buy:2MK,c", "Buy:2MK,d", "Buy:2MK,e"]);
    }

    #[test]
    fn test_spend_increments() {
        let s = suggestions("Buy:3MV,b,M1");
        assert_eq!(s, vec!["Buy:3MV,b,M2", "Buy:3MV,b,M1,V1"]);
    }

    #[test]
    fn test_trade_targets() {
        let s = suggestions("Trade:K");
        assert_eq!(s.len(), 5);
        assert!(s.iter().all(|m| m.starts_with("Trade:K,")));
    }

    #[test]
    fn test_ready_move_only_offers_free_actions() {
        let s = suggestions("Sell:2MK");
        assert!(s.iter().all(|m| m.starts_with("Sell:2MK/Trade:")), "{s:?}");
    }

    #[test]
    fn test_rejected_move_has_no_suggestions() {
        assert!(suggestions("Sell:9LK").is_empty());
    }
}
