//! Turn controller.
//!
//! Owns the history stack. A move is validated against the current ply; if
//! it is ready, the speculative state the validator produced becomes the new
//! ply after draw-up, the end-of-game check, and the next player's roll.

use std::iter;

use im::Vector;

use super::dice::{resolve_roll, roll_dice};
use super::event::Event;
use super::scoring::{score, GameResult, ScoreSheet};
use super::state::TurnState;
use crate::ai::greedy;
use crate::board::Board;
use crate::cards::{CardCatalogue, CardId, CardRegistry, Deck, Rank};
use crate::core::{Dice, GameConfig, GameRng, GameRngState, PlayerId, PlayerMap, Tokens, PLAYER_COUNT};
use crate::economy::{DeedLedger, TokenLedger};
use crate::rules::{suggest, EngineError, MoveError, Outcome, Rejection, TurnContext, Validation, Validator};

/// A game in progress.
pub struct Game<D: Dice = GameRng> {
    config: GameConfig,
    registry: CardRegistry,
    /// Committed plies before `current`, oldest first.
    history: Vec<TurnState>,
    current: TurnState,
    result: Option<GameResult>,
    dice: D,
    /// Shuffles the discard pile on reshuffle.
    rng: GameRng,
}

/// Builder for creating a `Game`.
pub struct GameBuilder<D: Dice = GameRng> {
    config: GameConfig,
    registry: CardRegistry,
    dice: D,
    state: Option<TurnState>,
}

impl GameBuilder<GameRng> {
    pub fn new(config: GameConfig) -> Self {
        let dice = GameRng::new(config.seed).for_context("dice");
        Self {
            config,
            registry: CardRegistry::standard(),
            dice,
            state: None,
        }
    }
}

impl<D: Dice> GameBuilder<D> {
    /// Use a different dice source.
    pub fn with_dice<E: Dice>(self, dice: E) -> GameBuilder<E> {
        GameBuilder {
            config: self.config,
            registry: self.registry,
            dice,
            state: self.state,
        }
    }

    /// Use a different card registry.
    pub fn with_registry(mut self, registry: CardRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Start from a prepared state instead of dealing.
    pub fn with_state(mut self, state: TurnState) -> Self {
        self.state = Some(state);
        self
    }

    /// Build the game.
    pub fn build(self) -> Game<D> {
        let mut rng = GameRng::new(self.config.seed).for_context("deal");
        let current = match self.state {
            Some(state) => state,
            None => deal(&self.config, &self.registry, &mut rng),
        };
        Game {
            config: self.config,
            registry: self.registry,
            history: Vec::new(),
            current,
            result: None,
            dice: self.dice,
            rng,
        }
    }
}

/// Deal the opening state.
fn deal(config: &GameConfig, registry: &CardRegistry, rng: &mut GameRng) -> TurnState {
    // Pawns and the Excuse always found districts; Courts fill any others.
    let excuses = registry.ids_of_rank(Rank::Excuse);
    let mut centers = registry.ids_of_rank(Rank::Pawn);
    let extra = config.district_count().saturating_sub(centers.len() + excuses.len());
    centers.extend(registry.ids_of_rank(Rank::Court).into_iter().take(extra));
    rng.shuffle(&mut centers);
    let middle = centers.len() / 2;
    for excuse in excuses {
        centers.insert(middle, excuse);
    }

    let mut crown_cards = registry.ids_of_rank(Rank::Crown);
    rng.shuffle(&mut crown_cards);
    let per_player = crown_cards.len() / PLAYER_COUNT;
    let crowns = PlayerMap::new(PLAYER_COUNT, |p| {
        crown_cards
            .iter()
            .skip(p.index() * per_player)
            .take(per_player)
            .filter_map(|id| registry.resolve(id))
            .flat_map(|def| def.suits.iter().copied())
            .fold(Tokens::zero(), |acc, suit| acc + Tokens::of(suit, 1))
    });

    let mut pile = registry.find(|d| match d.rank {
        Rank::Ace | Rank::Numeral(_) => true,
        Rank::Court => !centers.contains(&d.id),
        _ => false,
    });
    rng.shuffle(&mut pile);
    let mut deck = Deck::new(pile);

    let mut ledger = TokenLedger::new(PLAYER_COUNT);
    let mut hands: PlayerMap<Vector<CardId>> = PlayerMap::with_default(PLAYER_COUNT);
    for player in PlayerId::all(PLAYER_COUNT) {
        ledger.credit(player, &crowns[player]);
        hands[player] = deck.draw(config.hand_size).into_iter().collect();
    }

    log::info!(
        "dealt {} districts, {} cards in the deck, variants {:?}",
        centers.len(),
        deck.len(),
        config.variant_names()
    );

    TurnState {
        ledger,
        board: Board::new(centers, PLAYER_COUNT),
        deeds: DeedLedger::new(),
        hands,
        deck,
        discard: Vector::new(),
        crowns,
        roll: None,
        choices: Vector::new(),
        current: PlayerId::new(0),
        shuffled: false,
        last_move: String::new(),
        log: Vector::new(),
    }
}

impl Game<GameRng> {
    /// Deal a new game with the default dice.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        GameBuilder::new(config).build()
    }
}

impl<D: Dice> Game<D> {
    /// Reassemble a game from committed plies, oldest first.
    pub(crate) fn from_parts(
        config: GameConfig,
        dice: D,
        rng: GameRng,
        mut plies: Vec<TurnState>,
        result: Option<GameResult>,
    ) -> Option<Self> {
        let current = plies.pop()?;
        Some(Self {
            config,
            registry: CardRegistry::standard(),
            history: plies,
            current,
            result,
            dice,
            rng,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Position of the reshuffle stream.
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    pub fn catalogue(&self) -> &CardRegistry {
        &self.registry
    }

    /// The latest committed ply.
    pub fn state(&self) -> &TurnState {
        &self.current
    }

    /// Every ply, oldest first, ending with the current one.
    pub fn plies(&self) -> impl Iterator<Item = &TurnState> {
        self.history.iter().chain(iter::once(&self.current))
    }

    /// Number of committed moves.
    pub fn moves_played(&self) -> usize {
        self.history.len()
    }

    pub fn current_player(&self) -> PlayerId {
        self.current.current
    }

    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn validator(&self) -> Validator<'_> {
        Validator::new(&self.registry, &self.config)
    }

    /// Validate a move for the current player without committing it.
    pub fn validate(&self, text: &str) -> Validation {
        if self.is_over() {
            return Validation {
                outcome: Outcome::Rejected(Rejection::new(0, MoveError::GameOver)),
                state: self.current.clone(),
                actions: Vec::new(),
                context: TurnContext::start(&self.current, 0),
            };
        }
        self.validator().validate(&self.current, text)
    }

    /// Validate and, if ready, commit a move.
    pub fn play(&mut self, text: &str) -> Result<(), Rejection> {
        let validation = self.validate(text);
        match validation.outcome {
            Outcome::Ready => {
                log::info!("{} plays `{}`", self.current.current, validation.state.last_move);
                self.commit(validation.state);
                Ok(())
            }
            Outcome::Rejected(rejection) => Err(rejection),
            Outcome::Partial | Outcome::Open => Err(Rejection::new(validation.context.index, MoveError::NotReady)),
        }
    }

    /// Commit a sequence of moves known to be legal.
    ///
    /// Any rejection is a hard failure naming the offending ply.
    pub fn replay<S: AsRef<str>>(&mut self, moves: &[S]) -> Result<(), EngineError> {
        for text in moves {
            let text = text.as_ref();
            let ply = self.history.len();
            self.play(text).map_err(|rejection| EngineError::Rejected {
                ply,
                text: text.to_string(),
                rejection,
            })?;
        }
        Ok(())
    }

    /// Drop the latest committed ply. Returns false at the initial state.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                self.result = None;
                true
            }
            None => false,
        }
    }

    /// Legal next steps for a partial move.
    pub fn suggestions(&self, text: &str) -> Vec<String> {
        if self.is_over() {
            return Vec::new();
        }
        suggest(&self.validator(), &self.current, text)
    }

    /// A legal ready move for the current player.
    pub fn greedy_move(&self) -> Option<String> {
        if self.is_over() {
            return None;
        }
        greedy::choose_move(&self.validator(), &self.current)
    }

    /// Score the current board.
    pub fn scores(&self) -> ScoreSheet {
        score(&self.current, &self.registry, self.config.deucey())
    }

    fn commit(&mut self, mut next: TurnState) {
        let mover = next.current;
        self.draw_up(&mut next, mover);

        if self.is_finished(&next) {
            let result = score(&next, &self.registry, self.config.deucey()).result();
            next.record(Event::Eog);
            next.record(Event::Winners {
                players: result.players(),
            });
            log::info!("game over after {} moves: {result:?}", self.history.len() + 1);
            self.result = Some(result);
        } else {
            next.current = mover.next(next.hands.player_count());
            let roll = roll_dice(&mut self.dice, self.config.tax_dice());
            resolve_roll(&mut next, &self.registry, roll);
        }

        let previous = std::mem::replace(&mut self.current, next);
        self.history.push(previous);
    }

    /// Refill the mover's hand, reshuffling the discard pile once per game.
    fn draw_up(&mut self, state: &mut TurnState, player: PlayerId) {
        let need = self.config.hand_size.saturating_sub(state.hand(player).len());
        if need == 0 {
            return;
        }

        let mut drawn = state.deck.draw(need);
        if drawn.len() < need && !state.shuffled {
            let count = state.discard.len();
            state.deck.extend(std::mem::take(&mut state.discard));
            state.deck.shuffle(&mut self.rng);
            state.shuffled = true;
            state.record(Event::Reshuffle { count });
            log::info!("reshuffled {count} discarded cards into the deck");
            drawn.extend(state.deck.draw(need - drawn.len()));
        }

        if !drawn.is_empty() {
            state.record(Event::DeckDraw {
                player,
                count: drawn.len(),
            });
            state.hands[player].extend(drawn);
        }
    }

    /// Deck and its one reshuffle spent, and every hand short.
    fn is_finished(&self, state: &TurnState) -> bool {
        state.deck.is_empty()
            && state.shuffled
            && state
                .hands
                .iter()
                .all(|(_, hand)| hand.len() < self.config.hand_size)
    }
}

/// Ids of the cards dealt as centres, in district order.
pub fn centers(state: &TurnState) -> Vec<CardId> {
    state.board.iter().map(|(_, d)| d.center.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LoadedDice, Variant};

    #[test]
    fn test_deal_standard() {
        let game = Game::new(GameConfig::default());
        let state = game.state();

        assert_eq!(state.board.len(), 5);
        assert_eq!(centers(state)[2], CardId::new("X"));
        for (_, hand) in state.hands.iter() {
            assert_eq!(hand.len(), 3);
        }
        // 6 Aces, 24 numerals and 4 Courts, less two hands.
        assert_eq!(state.deck.len(), 34 - 6);
        for (player, crowns) in state.crowns.iter() {
            assert_eq!(crowns.total(), 3);
            assert_eq!(state.ledger.holdings(player), crowns);
        }
        assert_eq!(state.crowns[PlayerId::new(0)] + state.crowns[PlayerId::new(1)], Tokens::from_array([1; 6]));
        assert!(state.roll.is_none());
    }

    #[test]
    fn test_deal_mega() {
        let game = Game::new(GameConfig::default().with_variant(Variant::Mega));
        let state = game.state();
        assert_eq!(state.board.len(), 9);
        assert_eq!(centers(state)[4], CardId::new("X"));
        assert_eq!(state.deck.len(), 30 - 6);
        assert!(state
            .deck
            .iter()
            .all(|id| game.catalogue().resolve(id).is_some_and(|d| d.rank != Rank::Court)));
    }

    #[test]
    fn test_deal_founds_one_district_per_configured_slot() {
        for config in [
            GameConfig::default(),
            GameConfig::default().with_variant(Variant::Mega),
            GameConfig::default().with_variant(Variant::Mega).with_variant(Variant::Deucey),
        ] {
            let game = Game::new(config.clone());
            let state = game.state();
            assert_eq!(state.board.len(), config.district_count());
            let founders = centers(state);
            assert!(state.deck.iter().all(|id| !founders.contains(id)));
            assert_eq!(founders.iter().filter(|id| id.as_str() == "X").count(), 1);
        }
    }

    #[test]
    fn test_deal_is_deterministic() {
        let a = Game::new(GameConfig::default().with_seed(7));
        let b = Game::new(GameConfig::default().with_seed(7));
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_commit_draws_and_rolls() {
        let mut game = GameBuilder::new(GameConfig::default())
            .with_dice(LoadedDice::new([4, 6], 0))
            .build();
        let card = game.state().hand(PlayerId::new(0))[0].clone();

        game.play(&format!("Sell:{card}")).unwrap();

        let state = game.state();
        assert_eq!(state.current, PlayerId::new(1));
        assert_eq!(state.hand(PlayerId::new(0)).len(), 3);
        assert_eq!(state.roll.as_ref().map(|r| r.primary), Some(6));
        assert_eq!(state.discard, Vector::unit(card));
        let tags: Vec<_> = state.log.iter().map(|e| e.tag()).collect();
        assert_eq!(tags[..3], ["sell", "deckDraw", "roll"]);
        assert_eq!(game.moves_played(), 1);
    }

    #[test]
    fn test_unready_move_is_not_committed() {
        let mut game = Game::new(GameConfig::default());
        let err = game.play("").unwrap_err();
        assert_eq!(err.error, MoveError::NotReady);
        assert_eq!(game.moves_played(), 0);
    }

    #[test]
    fn test_undo() {
        let mut game = Game::new(GameConfig::default());
        let before = game.state().clone();
        let card = before.hand(PlayerId::new(0))[0].clone();

        game.play(&format!("Sell:{card}")).unwrap();
        assert!(game.undo());
        assert_eq!(game.state(), &before);
        assert!(!game.undo());
    }
}
