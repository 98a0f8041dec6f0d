//! Whole-game tests: greedy self-play, history, snapshots.

use std::collections::BTreeMap;

use magnate::cards::CardCatalogue;
use magnate::rules::{MoveError, TRADE_RATE};
use magnate::{
    parse_move, CardId, CardRegistry, EngineError, Event, Game, GameConfig, PlayerId, Rank, Snapshot, SubAction,
    Tokens, TurnState, Variant,
};

/// Generous bound on plies; a game ends well within it.
const MAX_PLIES: usize = 400;

fn self_play(game: &mut Game) -> Vec<String> {
    let mut moves = Vec::new();
    while !game.is_over() && moves.len() < MAX_PLIES {
        let text = game
            .greedy_move()
            .unwrap_or_else(|| panic!("no greedy move at ply {}", moves.len()));
        game.play(&text)
            .unwrap_or_else(|e| panic!("greedy move `{text}` rejected: {e}"));
        moves.push(text);
    }
    moves
}

/// Cards that move between zones: deck, discard, hands, stacks and deeds.
fn cards_in_play(state: &TurnState) -> usize {
    let hands: usize = state.hands.iter().map(|(_, h)| h.len()).sum();
    let stacks: usize = state
        .board
        .iter()
        .map(|(_, d)| d.stacks.iter().map(|(_, s)| s.len()).sum::<usize>())
        .sum();
    state.deck.len() + state.discard.len() + hands + stacks + state.deeds.len()
}

#[test]
fn test_greedy_self_play_finishes() {
    for seed in [1, 2, 3, 42] {
        let mut game = Game::new(GameConfig::default().with_seed(seed));
        let moves = self_play(&mut game);

        assert!(game.is_over(), "seed {seed} still running after {} plies", moves.len());
        let result = game.result().unwrap();
        assert!(!result.players().is_empty());

        let log = &game.state().log;
        assert_eq!(log.iter().filter(|e| e.tag() == "eog").count(), 1);
        assert!(game.greedy_move().is_none());
        assert!(game.suggestions("").is_empty());
    }
}

#[test]
fn test_all_variants_self_play() {
    let config = GameConfig::default()
        .with_variant(Variant::Mega)
        .with_variant(Variant::TaxTax)
        .with_variant(Variant::Deucey)
        .with_variant(Variant::CreditLimit)
        .with_seed(9);
    let mut game = Game::new(config);
    self_play(&mut game);
    assert!(game.is_over());
    assert_eq!(game.state().board.len(), 9);
}

#[test]
fn test_cards_are_conserved() {
    let mut game = Game::new(GameConfig::default().with_seed(5));
    self_play(&mut game);

    let registry = CardRegistry::standard();
    let movable = registry
        .find(|d| matches!(d.rank, Rank::Ace | Rank::Numeral(_) | Rank::Court))
        .len();
    assert_eq!(movable, 34);

    for (ply, state) in game.plies().enumerate() {
        assert_eq!(cards_in_play(state), movable, "ply {ply}");
        for (card, deed) in state.deeds.iter() {
            let price = registry.lookup(card).unwrap().price;
            assert!(deed.escrow.total() < price, "ply {ply}: deed {card} fully paid");
            assert_eq!(state.board.occurrences(card), 0, "ply {ply}: deed {card} on board");
        }
    }
}

/// Signed per-suit token count.
type Flow = [i64; 6];

fn add_tokens(flow: &mut Flow, tokens: &Tokens, sign: i64) {
    for (suit, count) in tokens.iter() {
        flow[suit.index()] += sign * i64::from(count);
    }
}

/// Tokens in play after `after`'s move, derived from `before` and what the
/// move and its roll did.
fn expected_in_play(before: &TurnState, after: &TurnState) -> Flow {
    let mut flow = Flow::default();
    add_tokens(&mut flow, &before.tokens_in_play(), 1);

    for event in after.log.iter() {
        match event {
            Event::Claim { tokens, .. } | Event::Sell { tokens, .. } => add_tokens(&mut flow, tokens, 1),
            Event::Convert { from, to, .. } => {
                flow[from.index()] -= i64::from(TRADE_RATE);
                flow[to.index()] += 1;
            }
            Event::Capture { suit, forfeited, .. } => flow[suit.index()] -= i64::from(*forfeited),
            _ => {}
        }
    }

    // Escrow moves tokens from a ledger into a deed, so only a Buy and the
    // escrow of a deed that closes leave play.
    let mut escrow: BTreeMap<CardId, Tokens> = before.deeds.iter().map(|(c, d)| (c.clone(), d.escrow)).collect();
    for parsed in parse_move(&after.last_move) {
        match parsed.action() {
            Some(SubAction::Buy { spend, .. }) => add_tokens(&mut flow, spend, -1),
            Some(SubAction::Deed { card, spend, .. } | SubAction::Add { card, spend }) => {
                *escrow.entry(card.clone()).or_insert_with(Tokens::zero) += *spend;
            }
            _ => {}
        }
    }
    for (card, held) in &escrow {
        if after.deeds.get(card).is_none() {
            add_tokens(&mut flow, held, -1);
        }
    }
    flow
}

#[test]
fn test_tokens_balance_every_ply() {
    let configs = [
        GameConfig::default(),
        GameConfig::default().with_variant(Variant::Mega).with_variant(Variant::TaxTax),
    ];
    for config in configs {
        for seed in [1, 2, 3, 5, 11, 42] {
            let mut game = Game::new(config.clone().with_seed(seed));
            self_play(&mut game);

            let plies: Vec<&TurnState> = game.plies().collect();
            for pair in plies.windows(2) {
                let (before, after) = (pair[0], pair[1]);
                let mut actual = Flow::default();
                add_tokens(&mut actual, &after.tokens_in_play(), 1);
                assert_eq!(
                    actual,
                    expected_in_play(before, after),
                    "seed {seed}, {:?}, move `{}`",
                    config.variant_names(),
                    after.last_move
                );
            }
        }
    }
}

#[test]
fn test_replay_reproduces_game() {
    let config = GameConfig::default().with_seed(8);
    let mut original = Game::new(config.clone());
    let moves = self_play(&mut original);

    let mut copy = Game::new(config);
    copy.replay(&moves).unwrap();
    assert_eq!(copy.state(), original.state());
    assert_eq!(copy.result(), original.result());
}

#[test]
fn test_replay_names_bad_ply() {
    let mut game = Game::new(GameConfig::default());
    let card = game.state().hand(PlayerId::new(0))[0].clone();
    let moves = [format!("Sell:{card}"), "Sell:ZZ".to_string()];

    let err = game.replay(&moves).unwrap_err();
    let EngineError::Rejected { ply, text, rejection } = err;
    assert_eq!(ply, 1);
    assert_eq!(text, "Sell:ZZ");
    assert_eq!(rejection.index, 0);
    assert_eq!(game.moves_played(), 1);
}

#[test]
fn test_undo_restores_and_reopens() {
    let mut game = Game::new(GameConfig::default().with_seed(4));
    let opening = game.state().clone();
    self_play(&mut game);
    let finished = game.moves_played();
    assert!(game.is_over());

    assert!(game.undo());
    assert!(!game.is_over());
    assert_eq!(game.moves_played(), finished - 1);

    while game.undo() {}
    assert_eq!(game.state(), &opening);
    assert_eq!(game.moves_played(), 0);
}

#[test]
fn test_unready_move_rejected_at_last_action() {
    let mut game = Game::new(GameConfig::default().with_variant(Variant::Mega));
    let card = game.state().hand(PlayerId::new(0))[0].clone();
    // Two card actions per turn under mega, so one sale leaves the move open.
    let err = game.play(&format!("Sell:{card}")).unwrap_err();
    assert_eq!(err.error, MoveError::NotReady);
    assert_eq!(err.index, 0);
}

#[test]
fn test_snapshot_round_trips_mid_game() {
    let mut game = Game::new(GameConfig::default().with_variant(Variant::Deucey).with_seed(6));
    for _ in 0..10 {
        let text = game.greedy_move().unwrap();
        game.play(&text).unwrap();
    }

    let snapshot = game.snapshot();
    assert_eq!(snapshot.stack.len(), 11);

    let json = snapshot.to_json().unwrap();
    assert_eq!(Snapshot::from_json(&json).unwrap(), snapshot);
    let bytes = snapshot.to_bytes().unwrap();
    assert_eq!(Snapshot::from_bytes(&bytes).unwrap(), snapshot);

    let mut restored = snapshot.restore().unwrap();
    assert_eq!(restored.state(), game.state());
    let text = restored.greedy_move().unwrap();
    restored.play(&text).unwrap();
}

#[test]
fn test_stripped_snapshot_hides_opponent_hand() {
    let config = GameConfig::default().with_seed(17);
    let game = Game::new(config.clone());
    let viewer = PlayerId::new(1);
    let opponent = PlayerId::new(0);
    let stripped = game.snapshot().stripped(viewer);
    let state = stripped.latest().unwrap();
    assert_eq!(state.hand(viewer), game.state().hand(viewer));
    assert_eq!(state.hand(opponent).len(), 3);
    assert!(state.hand(opponent).iter().all(|c| c.as_str().is_empty()));

    let json = stripped.to_json().unwrap();
    let opponent_card = game.state().hand(opponent)[0].as_str().to_string();
    assert!(!json.contains(&format!("\"{opponent_card}\"")));

    // The view's configuration must not re-deal the real game.
    assert_eq!(stripped.seed, None);
    assert_eq!(stripped.rng, None);
    let rebuilt_config = stripped.config().unwrap();
    assert_ne!(rebuilt_config.seed, config.seed);
    let rebuilt = Game::new(rebuilt_config);
    assert_ne!(rebuilt.state().hand(opponent), game.state().hand(opponent));
    assert!(stripped.restore().is_err());
}
