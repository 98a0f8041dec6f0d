//! Move-string parser.
//!
//! Grammar (case-insensitive):
//!
//! ```text
//! move    := action ("/" action)* "/"?
//! action  := TYPE (":" payload?)?
//! Buy     := card ("," district ("," spend)?)?
//! Deed    := card ("," district ("," spend)?)?
//! Sell    := card
//! Add     := card ("," spend)?
//! Trade   := suit ("," suit)?
//! Prefer  := card ("," suit)?
//! Choose  := card ("," suit)?
//! spend   := suit count ("," suit count)*
//! ```
//!
//! Parsing is structural only; nothing here looks at game state.

use thiserror::Error;

use super::action::{ActionKind, Parsed, SubAction};
use crate::board::DistrictId;
use crate::cards::CardId;
use crate::core::{Suit, Tokens};

/// Why a segment is malformed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty action")]
    EmptyAction,
    #[error("unknown action type `{0}`")]
    UnknownType(String),
    #[error("`{0}` is not a card id")]
    BadCard(String),
    #[error("`{0}` is not a district")]
    BadDistrict(String),
    #[error("`{0}` is not a suit")]
    BadSuit(String),
    #[error("`{0}` is not a suit and count")]
    BadSpend(String),
    #[error("suit {0} appears twice in one spend")]
    RepeatedSuit(Suit),
    #[error("empty field")]
    EmptyField,
    #[error("too many fields for {0}")]
    TooManyFields(ActionKind),
}

/// Parse a full move string into its segments.
///
/// ```
/// use magnate::moves::{parse_move, Parsed};
///
/// let parsed = parse_move("buy:3mv,a,m2,v1/Sell");
/// assert_eq!(parsed.len(), 2);
/// assert!(parsed[0].valid() && !parsed[0].incomplete());
/// assert!(matches!(parsed[1], Parsed::Started(_)));
/// ```
pub fn parse_move(text: &str) -> Vec<Parsed> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut segments: Vec<&str> = text.split('/').collect();
    if segments.len() > 1 && segments.last().is_some_and(|s| s.trim().is_empty()) {
        segments.pop();
    }

    segments.into_iter().map(parse_action).collect()
}

/// Parse a single segment.
pub fn parse_action(segment: &str) -> Parsed {
    match try_parse_action(segment.trim()) {
        Ok(parsed) => parsed,
        Err(error) => Parsed::Malformed {
            raw: segment.to_string(),
            error,
        },
    }
}

fn try_parse_action(segment: &str) -> Result<Parsed, ParseError> {
    if segment.is_empty() {
        return Err(ParseError::EmptyAction);
    }

    let (keyword, payload) = match segment.split_once(':') {
        Some((k, p)) => (k, p.trim()),
        None => (segment, ""),
    };
    let kind = ActionKind::from_name(keyword).ok_or_else(|| ParseError::UnknownType(keyword.trim().to_string()))?;
    if payload.is_empty() {
        return Ok(Parsed::Started(kind));
    }

    let fields = split_fields(payload)?;
    let action = match kind {
        ActionKind::Buy | ActionKind::Deed => {
            let card = card(fields[0])?;
            let district = fields.get(1).map(|f| district(f)).transpose()?;
            let spend = spend(fields.get(2..).unwrap_or_default())?;
            if kind == ActionKind::Buy {
                SubAction::Buy { card, district, spend }
            } else {
                SubAction::Deed { card, district, spend }
            }
        }
        ActionKind::Sell => {
            at_most(kind, &fields, 1)?;
            SubAction::Sell { card: card(fields[0])? }
        }
        ActionKind::Add => SubAction::Add {
            card: card(fields[0])?,
            spend: spend(&fields[1..])?,
        },
        ActionKind::Trade => {
            at_most(kind, &fields, 2)?;
            SubAction::Trade {
                from: suit(fields[0])?,
                to: fields.get(1).map(|f| suit(f)).transpose()?,
            }
        }
        ActionKind::Prefer | ActionKind::Choose => {
            at_most(kind, &fields, 2)?;
            let card = card(fields[0])?;
            let suit = fields.get(1).map(|f| suit(f)).transpose()?;
            if kind == ActionKind::Prefer {
                SubAction::Prefer { card, suit }
            } else {
                SubAction::Choose { card, suit }
            }
        }
    };

    Ok(Parsed::from(action))
}

/// Comma-split a non-empty payload. A single trailing empty field is dropped.
fn split_fields(payload: &str) -> Result<Vec<&str>, ParseError> {
    let mut fields: Vec<&str> = payload.split(',').map(str::trim).collect();
    if fields.len() > 1 && fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    if fields.iter().any(|f| f.is_empty()) {
        return Err(ParseError::EmptyField);
    }
    Ok(fields)
}

fn at_most(kind: ActionKind, fields: &[&str], max: usize) -> Result<(), ParseError> {
    if fields.len() > max {
        Err(ParseError::TooManyFields(kind))
    } else {
        Ok(())
    }
}

fn card(field: &str) -> Result<CardId, ParseError> {
    CardId::parse(field).ok_or_else(|| ParseError::BadCard(field.to_string()))
}

fn single_char(field: &str) -> Option<char> {
    let mut chars = field.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn district(field: &str) -> Result<DistrictId, ParseError> {
    single_char(field)
        .and_then(DistrictId::from_letter)
        .ok_or_else(|| ParseError::BadDistrict(field.to_string()))
}

fn suit(field: &str) -> Result<Suit, ParseError> {
    single_char(field)
        .and_then(Suit::from_letter)
        .ok_or_else(|| ParseError::BadSuit(field.to_string()))
}

fn spend(fields: &[&str]) -> Result<Tokens, ParseError> {
    let mut tokens = Tokens::zero();
    for field in fields {
        let bad = || ParseError::BadSpend((*field).to_string());

        let mut chars = field.chars();
        let suit = chars.next().and_then(Suit::from_letter).ok_or_else(bad)?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        let count: u32 = digits.parse().map_err(|_| bad())?;
        if count == 0 {
            return Err(bad());
        }
        if tokens[suit] > 0 {
            return Err(ParseError::RepeatedSuit(suit));
        }
        tokens[suit] = count;
    }
    Ok(tokens)
}
