//! Move validator.
//!
//! Replays a move's sub-actions, in order, against a copy of the turn state.
//! The copy is an `im`-backed clone, so this is cheap enough to run on every
//! keystroke of a partial move. The first failing sub-action stops
//! validation; nothing is ever applied to the caller's state.

use im::Vector;

use super::context::TurnContext;
use super::error::{MoveError, Placement, Rejection};
use crate::board::DistrictId;
use crate::cards::{CardCatalogue, CardDefinition, CardId, Rank};
use crate::core::{GameConfig, Suit, Tokens};
use crate::economy::{check_spend, Deed, SpendError, SpendStatus};
use crate::game::event::{ClaimHow, Event, PlaceHow};
use crate::game::TurnState;
use crate::moves::{parse_move, ActionKind, Parsed, SubAction};

/// Where a validated move stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A sub-action was refused.
    Rejected(Rejection),
    /// Valid so far, but the last sub-action is unfinished.
    Partial,
    /// Valid and finished, but more must be done before committing.
    Open,
    /// The turn's budget is used; the move may be committed.
    Ready,
}

/// Result of validating a move.
#[derive(Clone, Debug)]
pub struct Validation {
    pub outcome: Outcome,
    /// Speculative state after every accepted sub-action.
    pub state: TurnState,
    /// Sub-actions accepted, in order.
    pub actions: Vec<SubAction>,
    /// Context after the last accepted sub-action.
    pub context: TurnContext,
}

impl Validation {
    /// Completion flag: `-1` rejected or partial, `0` open, `1` ready.
    #[must_use]
    pub fn complete(&self) -> i8 {
        match self.outcome {
            Outcome::Rejected(_) | Outcome::Partial => -1,
            Outcome::Open => 0,
            Outcome::Ready => 1,
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.outcome == Outcome::Ready
    }

    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self.outcome, Outcome::Rejected(_))
    }

    #[must_use]
    pub fn rejection(&self) -> Option<&Rejection> {
        match &self.outcome {
            Outcome::Rejected(r) => Some(r),
            _ => None,
        }
    }
}

/// Whether a sub-action finished or is waiting on more input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Done,
    Pending,
}

/// Validates moves for one game's catalogue and configuration.
#[derive(Clone, Copy)]
pub struct Validator<'a> {
    catalogue: &'a dyn CardCatalogue,
    config: &'a GameConfig,
}

impl<'a> Validator<'a> {
    #[must_use]
    pub fn new(catalogue: &'a dyn CardCatalogue, config: &'a GameConfig) -> Self {
        Self { catalogue, config }
    }

    #[must_use]
    pub fn catalogue(&self) -> &'a dyn CardCatalogue {
        self.catalogue
    }

    #[must_use]
    pub fn config(&self) -> &'a GameConfig {
        self.config
    }

    /// Validate a move string for `state.current`.
    #[must_use]
    pub fn validate(&self, state: &TurnState, text: &str) -> Validation {
        let parsed = parse_move(text);
        self.validate_parsed(state, text, &parsed)
    }

    /// Validate already-parsed segments.
    #[must_use]
    pub fn validate_parsed(&self, state: &TurnState, text: &str, parsed: &[Parsed]) -> Validation {
        let mut next = state.clone();
        next.log = Vector::new();
        next.last_move = text.trim().to_string();

        let mut ctx = TurnContext::start(state, self.config.card_actions());
        let mut actions = Vec::with_capacity(parsed.len());
        let mut pending = false;

        for (index, segment) in parsed.iter().enumerate() {
            ctx.at(index, parsed.len());
            match self.check_segment(&mut ctx, &mut next, segment) {
                Ok(step) => {
                    if let Some(action) = segment.action() {
                        actions.push(action.clone());
                    }
                    pending = step == Step::Pending;
                }
                Err(error) => {
                    log::debug!("{} rejected `{segment}` (action {index}): {error}", ctx.player);
                    return Validation {
                        outcome: Outcome::Rejected(Rejection::new(index, error)),
                        state: next,
                        actions,
                        context: ctx,
                    };
                }
            }
        }

        let outcome = if pending {
            Outcome::Partial
        } else if ctx.is_exhausted(next.hand(ctx.player).is_empty()) {
            Outcome::Ready
        } else {
            Outcome::Open
        };
        log::debug!("{} move `{}` is {outcome:?}", ctx.player, next.last_move);

        Validation {
            outcome,
            state: next,
            actions,
            context: ctx,
        }
    }

    fn check_segment(&self, ctx: &mut TurnContext, state: &mut TurnState, segment: &Parsed) -> Result<Step, MoveError> {
        let (kind, action, incomplete) = match segment {
            Parsed::Malformed { error, .. } => return Err(error.clone().into()),
            Parsed::Started(kind) => (*kind, None, true),
            Parsed::Action { action, incomplete } => (action.kind(), Some(action), *incomplete),
        };

        if incomplete && !ctx.is_last {
            return Err(MoveError::UnfinishedAction(kind));
        }
        if ctx.pending_choices > 0 && kind != ActionKind::Choose {
            return Err(MoveError::ForcedChoicePending);
        }
        if kind.uses_card_slot() {
            ctx.require_card_action()?;
        }

        match action {
            None => Ok(Step::Pending),
            Some(action) => self.apply(ctx, state, action),
        }
    }

    fn apply(&self, ctx: &mut TurnContext, state: &mut TurnState, action: &SubAction) -> Result<Step, MoveError> {
        match action {
            SubAction::Buy { card, district, spend } => self.buy(ctx, state, card, *district, spend),
            SubAction::Deed { card, district, spend } => self.deed(ctx, state, card, *district, spend),
            SubAction::Sell { card } => self.sell(ctx, state, card),
            SubAction::Add { card, spend } => self.add(ctx, state, card, spend),
            SubAction::Trade { from, to } => self.trade(ctx, state, *from, *to),
            SubAction::Prefer { card, suit } => self.prefer(ctx, state, card, *suit),
            SubAction::Choose { card, suit } => self.choose(ctx, state, card, *suit),
        }
    }

    fn buy(
        &self,
        ctx: &mut TurnContext,
        state: &mut TurnState,
        card: &CardId,
        district: Option<DistrictId>,
        spend: &Tokens,
    ) -> Result<Step, MoveError> {
        let def = self.hand_card(ctx, state, card)?;
        let Some(district) = district else {
            return Ok(Step::Pending);
        };
        self.check_district(ctx, state, def, district)?;

        let status = check_spend(def, &Tokens::zero(), spend)?;
        state.ledger.debit(ctx.player, spend)?;
        ctx.spend_card_action()?;

        match status {
            SpendStatus::Complete => {
                state.take_from_hand(ctx.player, card);
                state
                    .board
                    .place(district, ctx.player, card.clone())
                    .map_err(|e| MoveError::placement(district, e))?;
                state.record(Event::Place {
                    player: ctx.player,
                    card: card.clone(),
                    district,
                    how: PlaceHow::Bought,
                });
                Ok(Step::Done)
            }
            SpendStatus::Partial if ctx.is_last => Ok(Step::Pending),
            SpendStatus::Partial => Err(MoveError::UnfinishedAction(ActionKind::Buy)),
        }
    }

    fn deed(
        &self,
        ctx: &mut TurnContext,
        state: &mut TurnState,
        card: &CardId,
        district: Option<DistrictId>,
        spend: &Tokens,
    ) -> Result<Step, MoveError> {
        let def = self.hand_card(ctx, state, card)?;
        if !def.is_deedable() {
            return Err(MoveError::UndeedableCard(card.clone()));
        }
        let Some(district) = district else {
            return Ok(Step::Pending);
        };
        self.check_district(ctx, state, def, district)?;

        if let Some(cap) = self.config.leverage_cap() {
            if state.deeds.open_count(ctx.player) >= cap {
                return Err(MoveError::OverLeveraged { cap });
            }
        }

        if check_spend(def, &Tokens::zero(), spend)? == SpendStatus::Complete {
            return Err(SpendError::CompletesDeed.into());
        }
        state.ledger.debit(ctx.player, spend)?;
        ctx.spend_card_action()?;

        state.take_from_hand(ctx.player, card);
        state.deeds.open(
            card.clone(),
            Deed {
                owner: ctx.player,
                district,
                escrow: *spend,
                preferred: None,
            },
        );
        state.record(Event::Place {
            player: ctx.player,
            card: card.clone(),
            district,
            how: PlaceHow::Deeded,
        });
        Ok(Step::Done)
    }

    fn sell(&self, ctx: &mut TurnContext, state: &mut TurnState, card: &CardId) -> Result<Step, MoveError> {
        let def = self.hand_card(ctx, state, card)?;
        ctx.spend_card_action()?;

        let tokens = sale_value(def);
        state.take_from_hand(ctx.player, card);
        state.discard.push_back(card.clone());
        state.ledger.credit(ctx.player, &tokens);
        state.record(Event::Sell {
            player: ctx.player,
            card: card.clone(),
            tokens,
        });
        Ok(Step::Done)
    }

    fn add(&self, ctx: &mut TurnContext, state: &mut TurnState, card: &CardId, spend: &Tokens) -> Result<Step, MoveError> {
        let deed = own_deed(ctx, state, card)?;
        let def = self.catalogue.lookup(card)?;
        if spend.is_empty() {
            return Ok(Step::Pending);
        }

        check_spend(def, &deed.escrow, spend)?;
        state.ledger.debit(ctx.player, spend)?;
        let completed = state.deeds.escrow_add(card, def.price, spend)?;
        state.record(Event::Add {
            player: ctx.player,
            card: card.clone(),
            tokens: *spend,
        });

        if completed {
            state.deeds.close(card);
            state
                .board
                .place(deed.district, ctx.player, card.clone())
                .map_err(|e| MoveError::placement(deed.district, e))?;
            state.record(Event::Place {
                player: ctx.player,
                card: card.clone(),
                district: deed.district,
                how: PlaceHow::Added,
            });
        }
        Ok(Step::Done)
    }

    fn trade(&self, ctx: &mut TurnContext, state: &mut TurnState, from: Suit, to: Option<Suit>) -> Result<Step, MoveError> {
        let Some(to) = to else {
            return Ok(Step::Pending);
        };
        if from == to {
            return Err(MoveError::InvalidTrade { from, to });
        }

        state.ledger.debit(ctx.player, &Tokens::of(from, TRADE_RATE))?;
        state.ledger.credit(ctx.player, &Tokens::of(to, 1));
        state.record(Event::Convert {
            player: ctx.player,
            from,
            to,
        });
        Ok(Step::Done)
    }

    fn prefer(&self, ctx: &mut TurnContext, state: &mut TurnState, card: &CardId, suit: Option<Suit>) -> Result<Step, MoveError> {
        own_deed(ctx, state, card)?;
        let def = self.catalogue.lookup(card)?;
        let Some(suit) = suit else {
            return Ok(Step::Pending);
        };
        if !def.has_suit(suit) {
            return Err(MoveError::ForeignSuit { card: card.clone(), suit });
        }

        state.deeds.prefer(card, suit)?;
        state.record(Event::Prefer {
            player: ctx.player,
            card: card.clone(),
            suit,
        });
        Ok(Step::Done)
    }

    fn choose(&self, ctx: &mut TurnContext, state: &mut TurnState, card: &CardId, suit: Option<Suit>) -> Result<Step, MoveError> {
        let pos = state
            .find_choice(ctx.player, card)
            .ok_or_else(|| MoveError::NoSuchChoice(card.clone()))?;
        let Some(suit) = suit else {
            return Ok(Step::Pending);
        };
        if !state.choices[pos].suits.contains(&suit) {
            return Err(MoveError::ForeignSuit { card: card.clone(), suit });
        }

        state.choices.remove(pos);
        ctx.pending_choices = ctx.pending_choices.saturating_sub(1);

        let tokens = Tokens::of(suit, 1);
        state.ledger.credit(ctx.player, &tokens);
        state.record(Event::Claim {
            player: Some(ctx.player),
            how: ClaimHow::Choice,
            tokens,
        });
        Ok(Step::Done)
    }

    /// Resolve `card` and check the mover holds it.
    fn hand_card(&self, ctx: &TurnContext, state: &TurnState, card: &CardId) -> Result<&'a CardDefinition, MoveError> {
        let def = self.catalogue.lookup(card)?;
        if !state.holds(ctx.player, card) {
            return Err(MoveError::CardNotInHand(card.clone()));
        }
        Ok(def)
    }

    /// Suit match against the stack, and no deed of the mover's in the district.
    fn check_district(
        &self,
        ctx: &TurnContext,
        state: &TurnState,
        def: &CardDefinition,
        district: DistrictId,
    ) -> Result<(), MoveError> {
        state
            .board
            .check_placement(self.catalogue, district, ctx.player, def)
            .map_err(|e| MoveError::placement(district, e))?;

        if state.deeds.in_district(ctx.player, district).is_some() {
            return Err(MoveError::InvalidPlacement {
                card: def.id.clone(),
                district,
                reason: Placement::Deeded,
            });
        }
        Ok(())
    }
}

/// Tokens paid for one token of the target suit.
pub const TRADE_RATE: u32 = 3;

/// Tokens credited for selling a card: one per suit, two for an Ace.
#[must_use]
pub fn sale_value(def: &CardDefinition) -> Tokens {
    let mut tokens = Tokens::zero();
    for &suit in &def.suits {
        tokens[suit] += 1;
    }
    if def.rank == Rank::Ace {
        if let Some(&suit) = def.suits.first() {
            tokens[suit] += 1;
        }
    }
    tokens
}

fn own_deed(ctx: &TurnContext, state: &TurnState, card: &CardId) -> Result<Deed, MoveError> {
    state
        .deeds
        .get(card)
        .filter(|d| d.owner == ctx.player)
        .cloned()
        .ok_or_else(|| MoveError::NoSuchDeed(card.clone()))
}
