//! Turn state: everything one ply of the game needs.
//!
//! Every collection is an `im` persistent structure, so `clone()` is O(1)
//! and speculative validation shares all untouched data with the canonical
//! state.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::event::Event;
use crate::board::Board;
use crate::cards::{CardId, Deck};
use crate::core::{PlayerId, PlayerMap, Suit, Tokens};
use crate::economy::{DeedLedger, TokenLedger};

/// One turn's dice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roll {
    /// The two d10 faces.
    pub dice: [u8; 2],
    /// The higher face.
    pub primary: u8,
    /// Taxation d6 faces, deduplicated. Face `n` taxes suit index `n - 1`.
    pub taxes: Vec<u8>,
}

impl Roll {
    /// Primary roll of 10.
    #[must_use]
    pub fn is_crown_day(&self) -> bool {
        self.primary == 10
    }

    /// Suits hit by taxation.
    pub fn taxed_suits(&self) -> impl Iterator<Item = Suit> + '_ {
        self.taxes
            .iter()
            .filter_map(|&t| Suit::from_index(usize::from(t).wrapping_sub(1)))
    }
}

/// A pending forced choice: `player` must pick which suit `card` pays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub player: PlayerId,
    pub card: CardId,
    pub suits: SmallVec<[Suit; 3]>,
}

/// Snapshot of one ply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub ledger: TokenLedger,
    pub board: Board,
    pub deeds: DeedLedger,
    pub hands: PlayerMap<Vector<CardId>>,
    pub deck: Deck,
    pub discard: Vector<CardId>,
    /// Per-player crown-count vectors, fixed at setup.
    pub crowns: PlayerMap<Tokens>,
    /// The roll that opened `current`'s turn, if any.
    pub roll: Option<Roll>,
    /// Forced choices still to resolve.
    pub choices: Vector<Choice>,
    /// Player to act.
    pub current: PlayerId,
    /// Has the discard pile been reshuffled into the deck?
    pub shuffled: bool,
    /// Move string that produced this ply (empty for the initial state).
    pub last_move: String,
    /// Events produced by that move and the following roll.
    pub log: Vector<Event>,
}

impl TurnState {
    /// A player's hand.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &Vector<CardId> {
        &self.hands[player]
    }

    /// Is `card` in `player`'s hand?
    #[must_use]
    pub fn holds(&self, player: PlayerId, card: &CardId) -> bool {
        self.hands[player].contains(card)
    }

    /// Take `card` out of `player`'s hand. Returns false if it was not there.
    pub fn take_from_hand(&mut self, player: PlayerId, card: &CardId) -> bool {
        let hand = &mut self.hands[player];
        match hand.index_of(card) {
            Some(pos) => {
                hand.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Forced choices owed by `player`.
    pub fn choices_for(&self, player: PlayerId) -> impl Iterator<Item = &Choice> {
        self.choices.iter().filter(move |c| c.player == player)
    }

    /// Position in the queue of `player`'s choice for `card`.
    #[must_use]
    pub fn find_choice(&self, player: PlayerId, card: &CardId) -> Option<usize> {
        self.choices
            .iter()
            .position(|c| c.player == player && &c.card == card)
    }

    /// Append to this ply's log.
    pub fn record(&mut self, event: Event) {
        self.log.push_back(event);
    }

    /// Tokens in play: holdings plus escrow.
    #[must_use]
    pub fn tokens_in_play(&self) -> Tokens {
        self.ledger.circulation() + self.deeds.escrowed()
    }

    /// Copy with `viewer`'s opponents' hidden information removed.
    #[must_use]
    pub fn stripped(&self, viewer: PlayerId) -> Self {
        let mut state = self.clone();
        for (player, hand) in state.hands.iter_mut() {
            if player != viewer {
                *hand = hand.iter().map(|_| CardId::hidden()).collect();
            }
        }
        state.deck = state.deck.face_down();
        state.deeds = state.deeds.without_preferences_hidden_from(viewer);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::DistrictId;
    use crate::economy::Deed;

    const P0: PlayerId = PlayerId::new(0);
    const P1: PlayerId = PlayerId::new(1);

    fn state() -> TurnState {
        let mut hands = PlayerMap::with_default(2);
        hands[P0] = ["3MV", "1K"].into_iter().map(CardId::new).collect();
        hands[P1] = ["9LK"].into_iter().map(CardId::new).collect();
        TurnState {
            ledger: TokenLedger::new(2),
            board: Board::new(["PVLY", "X"].into_iter().map(CardId::new), 2),
            deeds: DeedLedger::new(),
            hands,
            deck: Deck::new(["2MK", "4YK"].into_iter().map(CardId::new)),
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

    #[test]
    fn test_take_from_hand() {
        let mut state = state();
        assert!(state.take_from_hand(P0, &CardId::new("1K")));
        assert!(!state.take_from_hand(P0, &CardId::new("1K")));
        assert_eq!(state.hand(P0).len(), 1);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = state();
        let mut speculative = original.clone();
        speculative.take_from_hand(P0, &CardId::new("3MV"));
        speculative.ledger.credit(P0, &Tokens::of(Suit::Moons, 3));

        assert!(original.holds(P0, &CardId::new("3MV")));
        assert_eq!(original.ledger.total(P0), 0);
    }

    #[test]
    fn test_stripped_hides_opponent() {
        let mut state = state();
        state.deeds.open(CardId::new("5ML"), Deed::new(P1, DistrictId(1)));
        state.deeds.prefer(&CardId::new("5ML"), Suit::Leaves).unwrap();

        let view = state.stripped(P0);
        assert_eq!(view.hand(P0), state.hand(P0));
        assert!(view.hand(P1).iter().all(CardId::is_hidden));
        assert_eq!(view.hand(P1).len(), 1);
        assert!(view.deck.iter().all(CardId::is_hidden));
        assert_eq!(view.deeds.get(&CardId::new("5ML")).unwrap().preferred, None);
    }

    #[test]
    fn test_taxed_suits() {
        let roll = Roll {
            dice: [1, 7],
            primary: 7,
            taxes: vec![1, 6],
        };
        assert_eq!(roll.taxed_suits().collect::<Vec<_>>(), vec![Suit::Moons, Suit::Knots]);
        assert!(!roll.is_crown_day());
    }
}
