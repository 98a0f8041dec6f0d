//! Rule scenarios played through the turn controller.
//!
//! Each test sets up a hand-built table, scripts the dice, commits one move
//! and checks the committed ply.

use im::Vector;
use magnate::core::{LoadedDice, PlayerMap};
use magnate::game::{ClaimHow, Event, PlaceHow};
use magnate::rules::MoveError;
use magnate::{
    Board, CardId, Deck, Deed, DeedLedger, DistrictId, GameBuilder, GameConfig, GameResult, Outcome, PlayerId, Suit,
    TokenLedger, Tokens, TurnState, Validator,
};

const P0: PlayerId = PlayerId::new(0);
const P1: PlayerId = PlayerId::new(1);

fn ids(cards: &[&str]) -> Vector<CardId> {
    cards.iter().copied().map(CardId::new).collect()
}

fn table(hands: [&[&str]; 2], held: [[u32; 6]; 2], deck: &[&str]) -> TurnState {
    let mut ledger = TokenLedger::new(2);
    ledger.credit(P0, &Tokens::from_array(held[0]));
    ledger.credit(P1, &Tokens::from_array(held[1]));
    let mut player_hands = PlayerMap::with_default(2);
    player_hands[P0] = ids(hands[0]);
    player_hands[P1] = ids(hands[1]);

    TurnState {
        ledger,
        board: Board::new(["PVLY", "PMSL", "X", "PSVK", "PMYK"].into_iter().map(CardId::new), 2),
        deeds: DeedLedger::new(),
        hands: player_hands,
        deck: Deck::new(deck.iter().copied().map(CardId::new)),
        discard: Vector::new(),
        crowns: PlayerMap::new(2, |p| {
            if p == P0 {
                Tokens::from_array([1, 1, 1, 0, 0, 0])
            } else {
                Tokens::from_array([0, 0, 0, 1, 1, 1])
            }
        }),
        roll: None,
        choices: Vector::new(),
        current: P0,
        shuffled: false,
        last_move: String::new(),
        log: Vector::new(),
    }
}

const DECK: &[&str] = &["4YK", "5SV", "6LK", "7SK", "8MS", "9LK"];

#[test]
fn test_exact_buy_into_matching_district() {
    let state = table([&["3MV"], &["2SY"]], [[2, 0, 1, 0, 0, 0], [0; 6]], DECK);
    let config = GameConfig::default();
    let mut game = GameBuilder::new(config.clone())
        .with_state(state.clone())
        .with_dice(LoadedDice::new([2, 2], 0))
        .build();

    let validation = Validator::new(game.catalogue(), &config).validate(&state, "Buy:3MV,a,M2,V1");
    assert_eq!(validation.outcome, Outcome::Ready);
    assert_eq!(validation.state.ledger.holdings(P0), &Tokens::zero());
    assert_eq!(validation.state.deeds, state.deeds);

    game.play("Buy:3MV,a,M2,V1").unwrap();

    let after = game.state();
    let district = after.board.district(DistrictId(0)).unwrap();
    assert_eq!(district.stacks[P0], ids(&["3MV"]));
    assert!(after.deeds.is_empty());
    assert_eq!(after.ledger.holdings(P0), &Tokens::zero());

    let places: Vec<&Event> = after.log.iter().filter(|e| e.tag() == "place").collect();
    assert_eq!(places.len(), 1);
    assert!(matches!(places[0], Event::Place { how: PlaceHow::Bought, .. }));
    let json = serde_json::to_value(places[0]).unwrap();
    assert_eq!(json["place"]["how"], "B");
}

#[test]
fn test_crown_day_credits_crowns_once() {
    let state = table([&["2MK"], &["2SY"]], [[0; 6], [0; 6]], DECK);
    let mut game = GameBuilder::new(GameConfig::default())
        .with_state(state.clone())
        .with_dice(LoadedDice::new([10, 4], 0))
        .build();

    game.play("Sell:2MK").unwrap();

    let after = game.state();
    let sale = Tokens::of(Suit::Moons, 1) + Tokens::of(Suit::Knots, 1);
    assert_eq!(after.ledger.holdings(P0), &(sale + state.crowns[P0]));
    assert_eq!(after.ledger.holdings(P1), &state.crowns[P1]);

    let claims: Vec<&Event> = after.log.iter().filter(|e| e.tag() == "claim").collect();
    assert_eq!(claims.len(), 1);
    assert!(matches!(
        claims[0],
        Event::Claim {
            player: None,
            how: ClaimHow::Crowns,
            ..
        }
    ));
}

#[test]
fn test_taxation_caps_holding() {
    let state = table([&["2MK"], &["2SY"]], [[0; 6], [0, 0, 0, 0, 0, 4]], DECK);
    // Die one shows 1, so one d6 follows: 6 taxes Knots.
    let mut game = GameBuilder::new(GameConfig::default())
        .with_state(state)
        .with_dice(LoadedDice::new([1, 5, 6], 0))
        .build();

    game.play("Sell:2MK").unwrap();

    let after = game.state();
    assert_eq!(after.ledger.held(P1, Suit::Knots), 1);
    assert_eq!(after.ledger.held(P0, Suit::Knots), 1);
    let captures: Vec<&Event> = after.log.iter().filter(|e| e.tag() == "capture").collect();
    assert_eq!(
        captures,
        vec![&Event::Capture {
            player: P1,
            suit: Suit::Knots,
            forfeited: 3
        }]
    );
}

#[test]
fn test_game_end_after_reshuffle_is_spent() {
    let mut state = table([&["2MK"], &["3MV", "4YK"]], [[0; 6], [0; 6]], &[]);
    state.shuffled = true;
    let mut game = GameBuilder::new(GameConfig::default())
        .with_state(state)
        .with_dice(LoadedDice::new([], 0))
        .build();

    game.play("Sell:2MK").unwrap();

    assert!(game.is_over());
    // Empty board, so tokens decide: P0 just sold for two.
    assert_eq!(game.result(), Some(&GameResult::Winner(P0)));

    let log = &game.state().log;
    assert_eq!(log.iter().filter(|e| e.tag() == "eog").count(), 1);
    assert_eq!(log.iter().filter(|e| e.tag() == "winners").count(), 1);
    assert_eq!(log.iter().filter(|e| e.tag() == "roll").count(), 0);
    assert_eq!(log.back(), Some(&Event::Winners { players: vec![P0] }));

    let err = game.play("Sell:3MV").unwrap_err();
    assert_eq!(err.error, MoveError::GameOver);

    let snapshot = game.snapshot();
    assert!(snapshot.gameover);
    assert_eq!(snapshot.winner, vec![P0]);
}

#[test]
fn test_discard_reshuffled_once() {
    let mut state = table([&["2MK"], &["3MV", "4YK", "5SV"]], [[0; 6], [0; 6]], &[]);
    state.discard = ids(&["5ML", "6MV"]);
    let mut game = GameBuilder::new(GameConfig::default())
        .with_state(state)
        .with_dice(LoadedDice::new([3, 3], 0))
        .build();

    game.play("Sell:2MK").unwrap();

    let after = game.state();
    assert!(after.shuffled);
    assert!(after.discard.is_empty());
    assert!(after.deck.is_empty());
    assert_eq!(after.hand(P0).len(), 3);
    assert!(after.log.contains(&Event::Reshuffle { count: 3 }));
    assert!(after.log.contains(&Event::DeckDraw { player: P0, count: 3 }));
    assert!(!game.is_over());
}

#[test]
fn test_roller_must_choose_before_acting() {
    let mut state = table([&["2MK"], &["2SY", "3MV"]], [[0; 6], [0; 6]], DECK);
    state
        .deeds
        .open(CardId::new("5ML"), Deed::new(P1, DistrictId(1)));
    // P0 sells, then P1 rolls a 5 and owns the multi-suit deed.
    let mut game = GameBuilder::new(GameConfig::default())
        .with_state(state)
        .with_dice(LoadedDice::new([5, 2, 3, 3], 0))
        .build();
    game.play("Sell:2MK").unwrap();

    assert_eq!(game.current_player(), P1);
    assert_eq!(game.state().choices.len(), 1);

    let err = game.play("Sell:2SY").unwrap_err();
    assert_eq!(err.error, MoveError::ForcedChoicePending);
    assert_eq!(err.index, 0);

    game.play("Choose:5ML,L/Sell:2SY").unwrap();
    assert_eq!(game.moves_played(), 2);
    assert!(game.state().choices.is_empty());
    assert_eq!(game.state().ledger.held(P1, Suit::Leaves), 1);
}
