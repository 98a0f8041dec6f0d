//! Draw pile.
//!
//! Top of the pile is the end of the vector. Backed by `im::Vector` so a
//! cloned turn state shares the pile with its parent until one of them draws.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::definition::CardId;
use crate::core::GameRng;

/// An ordered pile of cards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vector<CardId>,
}

impl Deck {
    /// Create a pile from cards listed bottom to top.
    pub fn new(cards: impl IntoIterator<Item = CardId>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// Draw up to `n` cards from the top.
    pub fn draw(&mut self, n: usize) -> Vec<CardId> {
        let mut drawn = Vec::with_capacity(n);
        while drawn.len() < n {
            match self.cards.pop_back() {
                Some(card) => drawn.push(card),
                None => break,
            }
        }
        drawn
    }

    /// Remove a specific card. Returns true if it was in the pile.
    pub fn remove(&mut self, id: &CardId) -> bool {
        match self.cards.index_of(id) {
            Some(pos) => {
                self.cards.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Put cards on the bottom of the pile.
    pub fn extend(&mut self, cards: impl IntoIterator<Item = CardId>) {
        for card in cards {
            self.cards.push_front(card);
        }
    }

    /// Shuffle the pile in place.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        let mut cards: Vec<CardId> = self.cards.iter().cloned().collect();
        rng.shuffle(&mut cards);
        self.cards = cards.into_iter().collect();
    }

    /// Cards remaining.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Is the pile exhausted?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cards bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &CardId> {
        self.cards.iter()
    }

    /// Replace every card with the face-down placeholder.
    #[must_use]
    pub fn face_down(&self) -> Self {
        Self::new(self.cards.iter().map(|_| CardId::hidden()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<CardId> {
        raw.iter().map(CardId::new).collect()
    }

    #[test]
    fn test_draw_from_top() {
        let mut deck = Deck::new(ids(&["1M", "2MK", "3MV"]));

        assert_eq!(deck.draw(2), ids(&["3MV", "2MK"]));
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.draw(5), ids(&["1M"]));
        assert!(deck.is_empty());
        assert!(deck.draw(1).is_empty());
    }

    #[test]
    fn test_remove() {
        let mut deck = Deck::new(ids(&["1M", "2MK"]));

        assert!(deck.remove(&CardId::new("1M")));
        assert!(!deck.remove(&CardId::new("1M")));
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn test_extend_goes_to_bottom() {
        let mut deck = Deck::new(ids(&["2MK"]));
        deck.extend(ids(&["1M"]));

        assert_eq!(deck.draw(1), ids(&["2MK"]));
        assert_eq!(deck.draw(1), ids(&["1M"]));
    }

    #[test]
    fn test_shuffle_is_deterministic() {
        let cards = ids(&["1M", "1S", "1V", "1L", "1Y", "1K", "2MK", "2SY", "2VL"]);
        let mut a = Deck::new(cards.clone());
        let mut b = Deck::new(cards);

        a.shuffle(&mut GameRng::new(5));
        b.shuffle(&mut GameRng::new(5));

        assert_eq!(a, b);
        assert_eq!(a.len(), 9);
    }

    #[test]
    fn test_face_down_keeps_size() {
        let deck = Deck::new(ids(&["1M", "2MK"]));
        let hidden = deck.face_down();

        assert_eq!(hidden.len(), 2);
        assert!(hidden.iter().all(CardId::is_hidden));
    }
}
