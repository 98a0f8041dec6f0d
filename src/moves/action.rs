//! Structured sub-actions and their canonical move-string form.
//!
//! `Display` is the serializer: formatting a `SubAction` and parsing the
//! result with [`parse_move`](super::parse_move) gives back the same action.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::parser::ParseError;
use crate::board::DistrictId;
use crate::cards::CardId;
use crate::core::{Suit, Tokens};

/// Sub-action type keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Buy,
    Deed,
    Sell,
    Add,
    Trade,
    Prefer,
    Choose,
}

impl ActionKind {
    /// All kinds, in the order autocomplete offers them.
    pub const ALL: [ActionKind; 7] = [
        ActionKind::Buy,
        ActionKind::Deed,
        ActionKind::Sell,
        ActionKind::Add,
        ActionKind::Trade,
        ActionKind::Prefer,
        ActionKind::Choose,
    ];

    /// Keyword as written in moves.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ActionKind::Buy => "Buy",
            ActionKind::Deed => "Deed",
            ActionKind::Sell => "Sell",
            ActionKind::Add => "Add",
            ActionKind::Trade => "Trade",
            ActionKind::Prefer => "Prefer",
            ActionKind::Choose => "Choose",
        }
    }

    /// Parse a keyword, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(name))
    }

    /// Does this kind use one of the turn's card-action slots?
    #[must_use]
    pub const fn uses_card_slot(self) -> bool {
        matches!(self, ActionKind::Buy | ActionKind::Deed | ActionKind::Sell)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One step of a turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubAction {
    /// Pay for a card from hand and place it.
    Buy {
        card: CardId,
        district: Option<DistrictId>,
        spend: Tokens,
    },
    /// Reserve a card from hand against a district, escrowing part of its price.
    Deed {
        card: CardId,
        district: Option<DistrictId>,
        spend: Tokens,
    },
    /// Discard a card from hand for tokens.
    Sell { card: CardId },
    /// Escrow more tokens toward an open deed.
    Add { card: CardId, spend: Tokens },
    /// Convert three tokens of one suit into one of another.
    Trade { from: Suit, to: Option<Suit> },
    /// Set the suit an open deed pays income in.
    Prefer { card: CardId, suit: Option<Suit> },
    /// Resolve a pending forced choice.
    Choose { card: CardId, suit: Option<Suit> },
}

impl SubAction {
    /// Type keyword.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            SubAction::Buy { .. } => ActionKind::Buy,
            SubAction::Deed { .. } => ActionKind::Deed,
            SubAction::Sell { .. } => ActionKind::Sell,
            SubAction::Add { .. } => ActionKind::Add,
            SubAction::Trade { .. } => ActionKind::Trade,
            SubAction::Prefer { .. } => ActionKind::Prefer,
            SubAction::Choose { .. } => ActionKind::Choose,
        }
    }

    /// Card the action names, if any.
    #[must_use]
    pub fn card(&self) -> Option<&CardId> {
        match self {
            SubAction::Buy { card, .. }
            | SubAction::Deed { card, .. }
            | SubAction::Sell { card }
            | SubAction::Add { card, .. }
            | SubAction::Prefer { card, .. }
            | SubAction::Choose { card, .. } => Some(card),
            SubAction::Trade { .. } => None,
        }
    }

    /// Are all required fields present?
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self {
            SubAction::Buy { district, spend, .. } => district.is_some() && !spend.is_empty(),
            SubAction::Deed { district, .. } => district.is_some(),
            SubAction::Sell { .. } => true,
            SubAction::Add { spend, .. } => !spend.is_empty(),
            SubAction::Trade { to, .. } => to.is_some(),
            SubAction::Prefer { suit, .. } | SubAction::Choose { suit, .. } => suit.is_some(),
        }
    }
}

fn write_spend(f: &mut fmt::Formatter<'_>, spend: &Tokens) -> fmt::Result {
    for (suit, n) in spend.nonzero() {
        write!(f, ",{suit}{n}")?;
    }
    Ok(())
}

fn write_opt<T: fmt::Display>(f: &mut fmt::Formatter<'_>, value: &Option<T>) -> fmt::Result {
    match value {
        Some(v) => write!(f, ",{v}"),
        None => Ok(()),
    }
}

impl fmt::Display for SubAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.kind())?;
        match self {
            SubAction::Buy { card, district, spend } | SubAction::Deed { card, district, spend } => {
                write!(f, "{card}")?;
                if let Some(d) = district {
                    write!(f, ",{d}")?;
                    write_spend(f, spend)?;
                }
                Ok(())
            }
            SubAction::Sell { card } => write!(f, "{card}"),
            SubAction::Add { card, spend } => {
                write!(f, "{card}")?;
                write_spend(f, spend)
            }
            SubAction::Trade { from, to } => {
                write!(f, "{from}")?;
                write_opt(f, to)
            }
            SubAction::Prefer { card, suit } | SubAction::Choose { card, suit } => {
                write!(f, "{card}")?;
                write_opt(f, suit)
            }
        }
    }
}

/// A parsed move segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Parsed {
    /// A keyword with no payload yet (`"Buy"` or `"Buy:"`).
    Started(ActionKind),
    /// A structurally valid action, possibly missing trailing fields.
    Action { action: SubAction, incomplete: bool },
    /// A segment that can never become valid.
    Malformed { raw: String, error: ParseError },
}

impl Parsed {
    /// Structurally valid (possibly incomplete)?
    #[must_use]
    pub fn valid(&self) -> bool {
        !matches!(self, Parsed::Malformed { .. })
    }

    /// Missing required fields?
    #[must_use]
    pub fn incomplete(&self) -> bool {
        match self {
            Parsed::Started(_) => true,
            Parsed::Action { incomplete, .. } => *incomplete,
            Parsed::Malformed { .. } => false,
        }
    }

    /// Type keyword, if recognised.
    #[must_use]
    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            Parsed::Started(kind) => Some(*kind),
            Parsed::Action { action, .. } => Some(action.kind()),
            Parsed::Malformed { .. } => None,
        }
    }

    /// The action, if one was parsed.
    #[must_use]
    pub fn action(&self) -> Option<&SubAction> {
        match self {
            Parsed::Action { action, .. } => Some(action),
            _ => None,
        }
    }
}

impl From<SubAction> for Parsed {
    fn from(action: SubAction) -> Self {
        let incomplete = !action.is_complete();
        Parsed::Action { action, incomplete }
    }
}

impl fmt::Display for Parsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parsed::Started(kind) => write!(f, "{kind}:"),
            Parsed::Action { action, .. } => write!(f, "{action}"),
            Parsed::Malformed { raw, .. } => f.write_str(raw),
        }
    }
}

/// Join segments into a move string.
pub fn format_move<T: fmt::Display>(segments: &[T]) -> String {
    segments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("/")
}
