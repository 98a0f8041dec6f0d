//! Move grammar: typed sub-actions, parser and serializer.

pub mod action;
pub mod parser;

pub use action::{format_move, ActionKind, Parsed, SubAction};
pub use parser::{parse_action, parse_move, ParseError};
