//! Suits and per-suit token counts.
//!
//! Six suits in a fixed canonical order. `Tokens` is a vector of one
//! counter per suit; it is the currency of the ledger, escrow, payments and
//! income alike.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Number of suits.
pub const SUIT_COUNT: usize = 6;

/// A card suit, in canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    Moons,
    Suns,
    Waves,
    Leaves,
    Wyrms,
    Knots,
}

impl Suit {
    /// All suits in canonical order.
    pub const ALL: [Suit; SUIT_COUNT] = [
        Suit::Moons,
        Suit::Suns,
        Suit::Waves,
        Suit::Leaves,
        Suit::Wyrms,
        Suit::Knots,
    ];

    /// Canonical index (0..6).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Suit at a canonical index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Single-letter code used in card ids and move strings.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Suit::Moons => 'M',
            Suit::Suns => 'S',
            Suit::Waves => 'V',
            Suit::Leaves => 'L',
            Suit::Wyrms => 'Y',
            Suit::Knots => 'K',
        }
    }

    /// Parse a suit letter (case-insensitive).
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'M' => Some(Suit::Moons),
            'S' => Some(Suit::Suns),
            'V' => Some(Suit::Waves),
            'L' => Some(Suit::Leaves),
            'Y' => Some(Suit::Wyrms),
            'K' => Some(Suit::Knots),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// One counter per suit.
///
/// ```
/// use magnate::core::{Suit, Tokens};
///
/// let spend = Tokens::of(Suit::Moons, 2) + Tokens::of(Suit::Waves, 1);
/// assert_eq!(spend.total(), 3);
/// assert_eq!(spend.to_string(), "M2,V1");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tokens([u32; SUIT_COUNT]);

impl Tokens {
    /// No tokens.
    #[must_use]
    pub const fn zero() -> Self {
        Self([0; SUIT_COUNT])
    }

    /// `count` tokens of a single suit.
    #[must_use]
    pub fn of(suit: Suit, count: u32) -> Self {
        let mut tokens = Self::zero();
        tokens[suit] = count;
        tokens
    }

    /// Build from raw counters in canonical order.
    #[must_use]
    pub const fn from_array(counts: [u32; SUIT_COUNT]) -> Self {
        Self(counts)
    }

    /// Raw counters in canonical order.
    #[must_use]
    pub const fn as_array(&self) -> &[u32; SUIT_COUNT] {
        &self.0
    }

    /// Sum of all counters.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().fold(0, |acc, &n| acc.saturating_add(n))
    }

    /// True if every counter is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&n| n == 0)
    }

    /// Iterate over (suit, count) pairs, zeros included.
    pub fn iter(&self) -> impl Iterator<Item = (Suit, u32)> + '_ {
        Suit::ALL.iter().map(move |&s| (s, self.0[s.index()]))
    }

    /// Iterate over suits with a non-zero count.
    pub fn nonzero(&self) -> impl Iterator<Item = (Suit, u32)> + '_ {
        self.iter().filter(|&(_, n)| n > 0)
    }

    /// Subtract `other`, or report the first suit that would go negative.
    pub fn checked_sub(&self, other: &Tokens) -> Result<Tokens, Suit> {
        let mut out = *self;
        for (suit, n) in other.nonzero() {
            out[suit] = out[suit].checked_sub(n).ok_or(suit)?;
        }
        Ok(out)
    }
}

impl Index<Suit> for Tokens {
    type Output = u32;

    fn index(&self, suit: Suit) -> &u32 {
        &self.0[suit.index()]
    }
}

impl IndexMut<Suit> for Tokens {
    fn index_mut(&mut self, suit: Suit) -> &mut u32 {
        &mut self.0[suit.index()]
    }
}

impl std::ops::Add for Tokens {
    type Output = Tokens;

    fn add(mut self, rhs: Tokens) -> Tokens {
        self += rhs;
        self
    }
}

impl std::ops::AddAssign for Tokens {
    fn add_assign(&mut self, rhs: Tokens) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a = a.saturating_add(b);
        }
    }
}

/// Move-string form: `M2,V1`, suits in canonical order, zeros omitted.
impl fmt::Display for Tokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (suit, n) in self.nonzero() {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{suit}{n}")?;
            first = false;
        }
        Ok(())
    }
}
