//! Move validation.
//!
//! `Validator` replays a parsed move against a speculative clone of the turn
//! state and reports whether it is rejected, partial, open or ready:
//! - every sub-action type has its own rule, dispatched by `match`
//! - rules read the mover and budget from an explicit `TurnContext`
//! - rejections carry the offending sub-action's index

pub mod autocomplete;
pub mod context;
pub mod error;
pub mod validator;

pub use autocomplete::suggest;
pub use context::TurnContext;
pub use error::{EngineError, MoveError, Placement, Rejection};
pub use validator::{sale_value, Outcome, Validation, Validator, TRADE_RATE};
