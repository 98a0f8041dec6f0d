//! Game configuration and rule variants.
//!
//! A game is configured once at setup by a `GameConfig`: the set of active
//! variants, the standard hand size and the seed. Every rule that changes
//! with a variant reads a derived setting from here (`district_count`,
//! `card_actions`, `tax_dice`, `leverage_cap`, `deucey`) instead of checking
//! variant flags inline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of cards a player holds after drawing up.
pub const DEFAULT_HAND_SIZE: usize = 3;

/// Open deeds allowed per player under `Variant::CreditLimit`.
pub const CREDIT_LIMIT: usize = 2;

/// Optional rule variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Nine districts (Courts join the Pawns as centres), two card actions per turn.
    Mega,
    /// Two taxation dice instead of one.
    TaxTax,
    /// Ace adjacency also counts the centre card and the opponent's stack.
    Deucey,
    /// Cap on concurrently open deeds per player.
    CreditLimit,
}

impl Variant {
    /// All known variants.
    pub const ALL: [Variant; 4] = [
        Variant::Mega,
        Variant::TaxTax,
        Variant::Deucey,
        Variant::CreditLimit,
    ];

    /// Serialized name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Variant::Mega => "mega",
            Variant::TaxTax => "taxtax",
            Variant::Deucey => "deucey",
            Variant::CreditLimit => "creditlimit",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognised variant name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown variant `{0}`")]
pub struct UnknownVariant(pub String);

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Variant::ALL
            .into_iter()
            .find(|v| v.name() == lower)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Complete game configuration.
///
/// ```
/// use magnate::core::{GameConfig, Variant};
///
/// let config = GameConfig::new().with_variant(Variant::Mega).with_seed(7);
/// assert_eq!(config.district_count(), 9);
/// assert_eq!(config.card_actions(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Active variants, in the order they were enabled.
    pub variants: Vec<Variant>,

    /// Cards each player draws up to after a turn.
    pub hand_size: usize,

    /// Seed for the deal and, unless overridden, the dice.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            variants: Vec::new(),
            hand_size: DEFAULT_HAND_SIZE,
            seed: 42,
        }
    }
}

impl GameConfig {
    /// Standard game, no variants.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from variant names, as stored in a snapshot.
    pub fn from_variant_names<S: AsRef<str>>(names: &[S]) -> Result<Self, UnknownVariant> {
        names.iter().try_fold(Self::new(), |config, name| {
            Ok(config.with_variant(name.as_ref().parse()?))
        })
    }

    /// Enable a variant. Enabling one twice has no further effect.
    #[must_use]
    pub fn with_variant(mut self, variant: Variant) -> Self {
        if !self.variants.contains(&variant) {
            self.variants.push(variant);
        }
        self
    }

    /// Set the standard hand size.
    #[must_use]
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Is a variant active?
    #[must_use]
    pub fn has(&self, variant: Variant) -> bool {
        self.variants.contains(&variant)
    }

    /// Number of districts on the board.
    #[must_use]
    pub fn district_count(&self) -> usize {
        if self.has(Variant::Mega) { 9 } else { 5 }
    }

    /// Card-action slots (Buy, Deed, Sell) per turn.
    #[must_use]
    pub fn card_actions(&self) -> u8 {
        if self.has(Variant::Mega) { 2 } else { 1 }
    }

    /// Taxation dice rolled when a 1 shows.
    #[must_use]
    pub fn tax_dice(&self) -> usize {
        if self.has(Variant::TaxTax) { 2 } else { 1 }
    }

    /// Maximum open deeds per player, if capped.
    #[must_use]
    pub fn leverage_cap(&self) -> Option<usize> {
        self.has(Variant::CreditLimit).then_some(CREDIT_LIMIT)
    }

    /// Whether Ace adjacency looks past the owner's own stack.
    #[must_use]
    pub fn deucey(&self) -> bool {
        self.has(Variant::Deucey)
    }

    /// Serialized variant names.
    #[must_use]
    pub fn variant_names(&self) -> Vec<String> {
        self.variants.iter().map(ToString::to_string).collect()
    }
}
