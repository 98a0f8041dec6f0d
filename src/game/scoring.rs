//! Scoring.
//!
//! Each placed card scores its fixed value (numerals their rank, Pawns and
//! Courts 10). An Ace scores one point per other card in its stack sharing
//! its suit; under `deucey` the centre and the opponent's stack count too.
//! The higher total controls a district. Winner: most districts, then raw
//! score, then tokens held; a full tie shares the win.

use serde::{Deserialize, Serialize};

use super::state::TurnState;
use crate::board::{District, DistrictId};
use crate::cards::{CardCatalogue, CardDefinition, CardId};
use crate::core::{PlayerId, PlayerMap};

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Co-winners after a full tie.
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
        }
    }

    /// Winning players.
    #[must_use]
    pub fn players(&self) -> Vec<PlayerId> {
        match self {
            GameResult::Winner(p) => vec![*p],
            GameResult::Winners(ps) => ps.clone(),
        }
    }
}

/// One district's totals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictScore {
    pub district: DistrictId,
    pub totals: PlayerMap<u32>,
    /// `None` on a tie.
    pub controller: Option<PlayerId>,
}

/// Full score breakdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSheet {
    pub districts: Vec<DistrictScore>,
    /// Districts controlled per player.
    pub controlled: PlayerMap<u32>,
    /// Raw score per player, summed over districts.
    pub raw: PlayerMap<u32>,
    /// Tokens held per player.
    pub tokens: PlayerMap<u32>,
}

impl ScoreSheet {
    /// Apply the tie-break cascade.
    #[must_use]
    pub fn result(&self) -> GameResult {
        let mut leaders: Vec<PlayerId> = self.controlled.player_ids().collect();
        for criterion in [&self.controlled, &self.raw, &self.tokens] {
            let best = leaders.iter().map(|&p| criterion[p]).max().unwrap_or(0);
            leaders.retain(|&p| criterion[p] == best);
            if leaders.len() == 1 {
                return GameResult::Winner(leaders[0]);
            }
        }
        GameResult::Winners(leaders)
    }
}

/// Score the board in `state`.
pub fn score(state: &TurnState, catalogue: &dyn CardCatalogue, deucey: bool) -> ScoreSheet {
    let player_count = state.hands.player_count();
    let mut controlled = PlayerMap::with_default(player_count);
    let mut raw = PlayerMap::with_default(player_count);
    let tokens = PlayerMap::new(player_count, |p| state.ledger.total(p));

    let mut districts = Vec::with_capacity(state.board.len());
    for (id, district) in state.board.iter() {
        let totals = PlayerMap::new(player_count, |p| district_total(district, p, catalogue, deucey));
        let controller = controller(&totals);

        if let Some(p) = controller {
            controlled[p] += 1;
        }
        for (p, total) in totals.iter() {
            raw[p] += *total;
        }
        districts.push(DistrictScore {
            district: id,
            totals,
            controller,
        });
    }

    ScoreSheet {
        districts,
        controlled,
        raw,
        tokens,
    }
}

/// Unique highest total, if any.
fn controller(totals: &PlayerMap<u32>) -> Option<PlayerId> {
    let best = totals.iter().map(|(_, t)| *t).max()?;
    let mut at_best = totals.iter().filter(|(_, t)| **t == best);
    let (leader, _) = at_best.next()?;
    at_best.next().is_none().then_some(leader)
}

/// One player's total in one district.
#[must_use]
pub fn district_total(district: &District, player: PlayerId, catalogue: &dyn CardCatalogue, deucey: bool) -> u32 {
    district.stacks[player]
        .iter()
        .enumerate()
        .filter_map(|(i, card)| catalogue.resolve(card).map(|def| (i, def)))
        .map(|(i, def)| match def.score_value() {
            Some(value) => value,
            None => ace_value(district, player, i, def, catalogue, deucey),
        })
        .sum()
}

/// Adjacency value of the Ace at `position` in `player`'s stack.
#[must_use]
pub fn ace_value(
    district: &District,
    player: PlayerId,
    position: usize,
    ace: &CardDefinition,
    catalogue: &dyn CardCatalogue,
    deucey: bool,
) -> u32 {
    let matches = |card: &CardId| catalogue.resolve(card).is_some_and(|d| d.shares_suit(ace));

    let own = district.stacks[player]
        .iter()
        .enumerate()
        .filter(|&(i, card)| i != position && matches(card))
        .count();

    let mut value = own;
    if deucey {
        value += usize::from(matches(&district.center));
        value += district
            .stacks
            .iter()
            .filter(|&(p, _)| p != player)
            .flat_map(|(_, stack)| stack.iter())
            .filter(|card| matches(*card))
            .count();
    }
    value as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::cards::{CardRegistry, Deck};
    use crate::core::Tokens;
    use crate::economy::{DeedLedger, TokenLedger};
    use im::Vector;

    const P0: PlayerId = PlayerId::new(0);
    const P1: PlayerId = PlayerId::new(1);

    fn fixture() -> TurnState {
        TurnState {
            ledger: TokenLedger::new(2),
            board: Board::new(["PVLY", "PMSL", "X", "PSVK", "PMYK"].into_iter().map(CardId::new), 2),
            deeds: DeedLedger::new(),
            hands: PlayerMap::with_default(2),
            deck: Deck::default(),
            discard: Vector::new(),
            crowns: PlayerMap::with_default(2),
            roll: None,
            choices: Vector::new(),
            current: P0,
            shuffled: false,
            last_move: String::new(),
            log: Vector::new(),
        }
    }

    fn place(state: &mut TurnState, district: u8, player: PlayerId, cards: &[&str]) {
        for card in cards {
            state.board.place(DistrictId(district), player, CardId::new(card)).unwrap();
        }
    }

    #[test]
    fn test_lone_ace_scores_zero() {
        let registry = CardRegistry::standard();
        let mut state = fixture();
        place(&mut state, 1, P0, &["1M"]);
        let sheet = score(&state, &registry, false);
        assert_eq!(sheet.districts[1].totals[P0], 0);
    }

    #[test]
    fn test_ace_counts_matching_neighbours() {
        let registry = CardRegistry::standard();
        let mut state = fixture();
        // Two Moons cards and one without Moons alongside the Ace.
        place(&mut state, 1, P0, &["5ML", "1M", "3MV", "9VY"]);
        let district = state.board.district(DistrictId(1)).unwrap();
        let ace = registry.lookup(&CardId::new("1M")).unwrap();

        assert_eq!(ace_value(district, P0, 1, ace, &registry, false), 2);
        assert_eq!(district_total(district, P0, &registry, false), 5 + 2 + 3 + 9);
    }

    #[test]
    fn test_deucey_counts_center_and_opponent() {
        let registry = CardRegistry::standard();
        let mut state = fixture();
        place(&mut state, 1, P0, &["1M"]);
        place(&mut state, 1, P1, &["8MS", "4YK"]);
        let district = state.board.district(DistrictId(1)).unwrap();
        let ace = registry.lookup(&CardId::new("1M")).unwrap();

        assert_eq!(ace_value(district, P0, 0, ace, &registry, false), 0);
        // PMSL centre plus 8MS.
        assert_eq!(ace_value(district, P0, 0, ace, &registry, true), 2);
    }

    #[test]
    fn test_control_and_cascade() {
        let registry = CardRegistry::standard();
        let mut state = fixture();
        place(&mut state, 0, P0, &["9VY"]);
        place(&mut state, 0, P1, &["4VL"]);
        place(&mut state, 1, P1, &["8MS"]);
        place(&mut state, 3, P0, &["7SK"]);
        place(&mut state, 3, P1, &["7SK"]);

        let sheet = score(&state, &registry, false);
        assert_eq!(sheet.districts[0].controller, Some(P0));
        assert_eq!(sheet.districts[1].controller, Some(P1));
        assert_eq!(sheet.districts[3].controller, None);
        assert_eq!(sheet.districts[2].controller, None);

        // One district each; raw 16 vs 19.
        assert_eq!(sheet.raw[P0], 16);
        assert_eq!(sheet.raw[P1], 19);
        assert_eq!(sheet.result(), GameResult::Winner(P1));
    }

    #[test]
    fn test_token_tiebreak_and_full_tie() {
        let registry = CardRegistry::standard();
        let mut state = fixture();
        place(&mut state, 0, P0, &["9VY"]);
        place(&mut state, 1, P1, &["9LK"]);

        assert_eq!(
            score(&state, &registry, false).result(),
            GameResult::Winners(vec![P0, P1])
        );

        state.ledger.credit(P0, &Tokens::of(crate::core::Suit::Moons, 1));
        let result = score(&state, &registry, false).result();
        assert_eq!(result, GameResult::Winner(P0));
        assert!(result.is_winner(P0));
        assert_eq!(result.players(), vec![P0]);
    }
}
