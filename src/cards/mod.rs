//! Card catalogue and draw pile.
//!
//! ## Key Types
//!
//! - `CardId`: String id, rank character plus suit letters
//! - `CardDefinition`: Rank, suits and price
//! - `CardCatalogue`: Lookup trait the rules are written against
//! - `CardRegistry`: The standard deck
//! - `Deck`: Draw pile with draw/remove/shuffle

pub mod deck;
pub mod definition;
pub mod registry;

pub use deck::Deck;
pub use definition::{CardDefinition, CardId, Rank, COURT_VALUE};
pub use registry::{CardCatalogue, CardRegistry, UnknownCard, ACE_PRICE, COURT_PRICE};
