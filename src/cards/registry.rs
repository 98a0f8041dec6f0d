//! Card catalogue: id → rank, suits, price.
//!
//! The rules consume cards only through the `CardCatalogue` trait. The
//! `CardRegistry` is the in-crate implementation, and `CardRegistry::standard`
//! builds the standard deck (36 cards plus the Excuse).

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::definition::{CardDefinition, CardId, Rank};
use crate::core::Suit;

/// A card id that does not resolve.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown card `{0}`")]
pub struct UnknownCard(pub CardId);

/// Lookup interface for card data.
pub trait CardCatalogue {
    /// Resolve a card id.
    fn resolve(&self, id: &CardId) -> Option<&CardDefinition>;

    /// Every card id in the catalogue, in a stable order.
    fn ids(&self) -> Vec<CardId>;

    /// Resolve a card id or report it as unknown.
    fn lookup(&self, id: &CardId) -> Result<&CardDefinition, UnknownCard> {
        self.resolve(id).ok_or_else(|| UnknownCard(id.clone()))
    }
}

/// Registry of card definitions.
///
/// ```
/// use magnate::cards::{CardCatalogue, CardId, CardRegistry};
///
/// let registry = CardRegistry::standard();
/// let journey = registry.resolve(&CardId::new("3MV")).unwrap();
/// assert_eq!(journey.name, "Journey");
/// assert_eq!(journey.price, 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: FxHashMap<CardId, CardDefinition>,
    order: Vec<CardId>,
}

impl CardRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.id) {
            panic!("Card with ID {} already registered", card.id);
        }
        self.order.push(card.id.clone());
        self.cards.insert(card.id.clone(), card);
    }

    /// The standard deck: six Aces, twenty-four numerals, four Pawns, four
    /// Courts, six Crowns and the Excuse.
    #[must_use]
    pub fn standard() -> Self {
        use Suit::{Knots as K, Leaves as L, Moons as M, Suns as S, Waves as V, Wyrms as Y};

        let mut registry = Self::new();

        for suit in Suit::ALL {
            registry.register(CardDefinition::new(
                format!("1{}", suit.letter()),
                format!("Ace of {suit:?}"),
                Rank::Ace,
                &[suit],
                ACE_PRICE,
            ));
        }

        let numerals: [(u8, &str, [Suit; 2]); 18] = [
            (2, "Author", [M, K]),
            (2, "Desert", [S, Y]),
            (2, "Origin", [V, L]),
            (3, "Journey", [M, V]),
            (3, "Painter", [S, K]),
            (3, "Savage", [L, Y]),
            (4, "Battle", [Y, K]),
            (4, "Mountain", [M, S]),
            (4, "Sailor", [V, L]),
            (5, "Discovery", [S, V]),
            (5, "Forest", [M, L]),
            (5, "Soldier", [Y, K]),
            (6, "Lunatic", [M, V]),
            (6, "Market", [L, K]),
            (6, "Penitent", [S, Y]),
            (7, "Chance Meeting", [M, L]),
            (7, "Castle", [S, K]),
            (7, "Cave", [V, Y]),
        ];
        let high: [(u8, &str, [Suit; 2]); 6] = [
            (8, "Betrayal", [Y, K]),
            (8, "Diplomat", [M, S]),
            (8, "Mill", [V, L]),
            (9, "Darkness", [V, Y]),
            (9, "Merchant", [L, K]),
            (9, "Pact", [M, S]),
        ];
        for (rank, name, suits) in numerals.into_iter().chain(high) {
            registry.register(CardDefinition::new(
                id_for(char::from(b'0' + rank), &suits),
                name,
                Rank::Numeral(rank),
                &suits,
                u32::from(rank),
            ));
        }

        let courtly: [(char, Rank, &str, [Suit; 3]); 8] = [
            ('P', Rank::Pawn, "Borderland", [V, L, Y]),
            ('P', Rank::Pawn, "Harvest", [M, S, L]),
            ('P', Rank::Pawn, "Light Keeper", [S, V, K]),
            ('P', Rank::Pawn, "Watchman", [M, Y, K]),
            ('T', Rank::Court, "Consul", [M, V, K]),
            ('T', Rank::Court, "Island", [S, V, Y]),
            ('T', Rank::Court, "Rite", [M, L, Y]),
            ('T', Rank::Court, "Window", [S, L, K]),
        ];
        for (prefix, rank, name, suits) in courtly {
            registry.register(CardDefinition::new(id_for(prefix, &suits), name, rank, &suits, COURT_PRICE));
        }

        for suit in Suit::ALL {
            registry.register(CardDefinition::new(
                format!("C{}", suit.letter()),
                format!("Crown of {suit:?}"),
                Rank::Crown,
                &[suit],
                0,
            ));
        }

        registry.register(CardDefinition::new("X", "Excuse", Rank::Excuse, &[], 0));
        registry
    }

    /// Ids of every card with the given rank, in registration order.
    #[must_use]
    pub fn ids_of_rank(&self, rank: Rank) -> Vec<CardId> {
        self.order
            .iter()
            .filter(|id| self.cards.get(*id).is_some_and(|c| c.rank == rank))
            .cloned()
            .collect()
    }

    /// Ids of every card matching a predicate, in registration order.
    pub fn find<F>(&self, predicate: F) -> Vec<CardId>
    where
        F: Fn(&CardDefinition) -> bool,
    {
        self.order
            .iter()
            .filter(|id| self.cards.get(*id).is_some_and(&predicate))
            .cloned()
            .collect()
    }

    /// Number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Is the registry empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl CardCatalogue for CardRegistry {
    fn resolve(&self, id: &CardId) -> Option<&CardDefinition> {
        self.cards.get(id)
    }

    fn ids(&self) -> Vec<CardId> {
        self.order.clone()
    }
}

/// Price of an Ace.
pub const ACE_PRICE: u32 = 3;

/// Price of a Pawn or Court.
pub const COURT_PRICE: u32 = 12;

fn id_for(prefix: char, suits: &[Suit]) -> String {
    std::iter::once(prefix).chain(suits.iter().map(|s| s.letter())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_deck_composition() {
        let registry = CardRegistry::standard();

        assert_eq!(registry.len(), 37);
        assert_eq!(registry.ids_of_rank(Rank::Ace).len(), 6);
        assert_eq!(registry.ids_of_rank(Rank::Pawn).len(), 4);
        assert_eq!(registry.ids_of_rank(Rank::Court).len(), 4);
        assert_eq!(registry.ids_of_rank(Rank::Crown).len(), 6);
        assert_eq!(registry.ids_of_rank(Rank::Excuse).len(), 1);
        assert_eq!(registry.find(|c| matches!(c.rank, Rank::Numeral(_))).len(), 24);
    }

    #[test]
    fn test_ids_are_canonical() {
        let registry = CardRegistry::standard();

        for id in registry.ids() {
            let card = registry.resolve(&id).unwrap();
            if card.is_excuse() {
                continue;
            }
            assert_eq!(CardId::parse(id.as_str()), Some(id.clone()));
            let letters: String = card.suits.iter().map(|s| s.letter()).collect();
            assert!(id.as_str().ends_with(&letters));
        }
    }

    #[test]
    fn test_every_suit_has_one_crown_and_one_ace() {
        let registry = CardRegistry::standard();

        for suit in Suit::ALL {
            let crowns = registry.find(|c| c.rank == Rank::Crown && c.has_suit(suit));
            let aces = registry.find(|c| c.rank == Rank::Ace && c.has_suit(suit));
            assert_eq!(crowns.len(), 1);
            assert_eq!(aces.len(), 1);
        }
    }

    #[test]
    fn test_lookup_unknown() {
        let registry = CardRegistry::standard();
        let err = registry.lookup(&CardId::new("9MM")).unwrap_err();
        assert_eq!(err, UnknownCard(CardId::new("9MM")));
        assert_eq!(err.to_string(), "unknown card `9MM`");
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_id_panics() {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::new("1M", "A", Rank::Ace, &[Suit::Moons], 3));
        registry.register(CardDefinition::new("1M", "B", Rank::Ace, &[Suit::Moons], 3));
    }
}
