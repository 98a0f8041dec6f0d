//! Per-turn context threaded through every validator rule.

use super::error::MoveError;
use crate::core::PlayerId;
use crate::game::TurnState;

/// Who is moving and what they still may do this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnContext {
    /// The mover.
    pub player: PlayerId,
    /// Buy/Deed/Sell slots left.
    pub card_actions_left: u8,
    /// Forced choices the mover has not resolved yet.
    pub pending_choices: usize,
    /// Index of the sub-action being checked.
    pub index: usize,
    /// Is it the final sub-action of the move?
    pub is_last: bool,
}

impl TurnContext {
    /// Context at the start of `state.current`'s turn.
    #[must_use]
    pub fn start(state: &TurnState, card_actions: u8) -> Self {
        Self {
            player: state.current,
            card_actions_left: card_actions,
            pending_choices: state.choices_for(state.current).count(),
            index: 0,
            is_last: false,
        }
    }

    /// Point the context at sub-action `index` of `len`.
    pub fn at(&mut self, index: usize, len: usize) {
        self.index = index;
        self.is_last = index + 1 == len;
    }

    /// Fail unless a card-action slot is free.
    pub fn require_card_action(&self) -> Result<(), MoveError> {
        if self.card_actions_left == 0 {
            Err(MoveError::ActionBudgetExceeded)
        } else {
            Ok(())
        }
    }

    /// Use up a card-action slot.
    pub fn spend_card_action(&mut self) -> Result<(), MoveError> {
        self.require_card_action()?;
        self.card_actions_left -= 1;
        Ok(())
    }

    /// Has the turn used everything it must?
    ///
    /// An empty hand leaves nothing to spend slots on.
    #[must_use]
    pub fn is_exhausted(&self, hand_empty: bool) -> bool {
        self.pending_choices == 0 && (self.card_actions_left == 0 || hand_empty)
    }
}
